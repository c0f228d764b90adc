//! `constgen`: generate constant-holder modules from the artifacts listed in
//! a config file.

use clap::{ArgAction, Parser};
use constgen_build::{GenerateError, check, run};
use constgen_config::{ConstgenConfig, DEFAULT_CONFIG_FILE};
use std::{error::Error, path::PathBuf, process::ExitCode};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

///
/// Cli
///

#[derive(Debug, Parser)]
#[command(name = "constgen", version, about = "Generate constant-holder modules from registries")]
struct Cli {
    /// Root directory the artifacts are written below; must already exist.
    output_dir: PathBuf,

    /// Config file listing the artifacts to generate.
    #[arg(long, env = "CONSTGEN_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Compare fresh renders with the files on disk instead of writing.
    #[arg(long)]
    check: bool,

    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

///
/// Outcome
///

#[derive(Debug, Eq, PartialEq)]
enum Outcome {
    Written(usize),
    UpToDate,
    Stale(Vec<PathBuf>),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match execute(&cli) {
        Ok(Outcome::Written(count)) => {
            info!(artifacts = count, "generation complete");
            ExitCode::SUCCESS
        }
        Ok(Outcome::UpToDate) => {
            info!("all artifacts up to date");
            ExitCode::SUCCESS
        }
        Ok(Outcome::Stale(paths)) => {
            error!(stale = paths.len(), "artifacts need regenerating");
            ExitCode::FAILURE
        }
        Err(err) => {
            error!("{}", error_chain(&err));
            ExitCode::FAILURE
        }
    }
}

// RUST_LOG wins over -v
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn execute(cli: &Cli) -> Result<Outcome, GenerateError> {
    let config = ConstgenConfig::load(&cli.config)?;

    if cli.check {
        let stale = check(&config, &cli.output_dir)?;

        return Ok(if stale.is_empty() {
            Outcome::UpToDate
        } else {
            Outcome::Stale(stale)
        });
    }

    let written = run(&config, &cli.output_dir)?;

    Ok(Outcome::Written(written.len()))
}

// "outer: cause: root cause"
fn error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    message
}
