use crate::{
    GenerateError,
    artifact::GeneratedArtifact,
    driver::RegistryFields,
    generator::{ConstantGenerator, Generator},
    persist::{Staged, stage},
    render::RenderOptions,
    spec::{ArtifactSpec, parse_constructor},
};
use constgen_config::{ArtifactConfig, ConstgenConfig};
use constgen_registry::{IdError, QualifiedId, global, manifest::load_manifest};
use std::{
    collections::BTreeMap,
    env, fs, io,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

///
/// RenderedArtifact
///
/// An artifact that has been generated and rendered but not yet written.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RenderedArtifact {
    pub relative_path: PathBuf,
    pub contents: String,
}

/// Generate and render every configured artifact, in config order, without
/// touching the output tree.
pub fn plan(config: &ConstgenConfig) -> Result<Vec<RenderedArtifact>, GenerateError> {
    let options = RenderOptions::from(&config.render);
    let mut targets = BTreeMap::<PathBuf, &str>::new();
    let mut rendered = Vec::with_capacity(config.artifacts.len());

    for artifact in &config.artifacts {
        let generated = generate_artifact(artifact)?;
        let relative_path = generated.relative_path().to_path_buf();

        if let Some(previous) = targets.insert(relative_path.clone(), &artifact.name) {
            return Err(GenerateError::InvalidSpec {
                what: "name",
                input: artifact.name.clone(),
                reason: format!(
                    "writes '{}', already produced by artifact '{previous}'",
                    relative_path.display()
                ),
            });
        }

        rendered.push(RenderedArtifact {
            relative_path,
            contents: generated.render(&options),
        });
    }

    Ok(rendered)
}

/// Generate every artifact, then write them all below `out_dir`. No target
/// file is replaced unless every artifact generated and every staging file
/// was written; only a failing rename in the final step can leave the tree
/// partly updated.
pub fn run(config: &ConstgenConfig, out_dir: &Path) -> Result<Vec<PathBuf>, GenerateError> {
    let rendered = plan(config)?;

    let mut staged = Vec::with_capacity(rendered.len());
    for artifact in &rendered {
        match stage(out_dir, &artifact.relative_path, &artifact.contents) {
            Ok(file) => staged.push(file),
            Err(err) => {
                staged.iter().for_each(Staged::discard);
                return Err(err);
            }
        }
    }

    let mut written = Vec::with_capacity(staged.len());
    let mut pending = staged.into_iter();
    while let Some(file) = pending.next() {
        match file.commit() {
            Ok(path) => written.push(path),
            Err(err) => {
                pending.for_each(|file| file.discard());
                return Err(err);
            }
        }
    }

    Ok(written)
}

/// Relative paths of artifacts whose file under `out_dir` is missing or
/// differs from a fresh render. Files that exist but cannot be read are
/// errors, not stale.
pub fn check(config: &ConstgenConfig, out_dir: &Path) -> Result<Vec<PathBuf>, GenerateError> {
    let mut stale = Vec::new();

    for artifact in plan(config)? {
        let path = out_dir.join(&artifact.relative_path);
        let up_to_date = match fs::read_to_string(&path) {
            Ok(on_disk) => on_disk == artifact.contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => false,
            Err(source) => return Err(GenerateError::Persist { path, source }),
        };

        if !up_to_date {
            warn!(path = %path.display(), "artifact is stale");
            stale.push(artifact.relative_path);
        }
    }

    Ok(stale)
}

/// Body of the `build!` macro: load the config, tell cargo which inputs to
/// watch, then run the pipeline into `OUT_DIR`.
#[doc(hidden)]
pub fn build_script(config_path: &Path) -> Result<Vec<PathBuf>, GenerateError> {
    println!("cargo:rerun-if-changed={}", config_path.display());
    let config = ConstgenConfig::load(config_path)?;

    for artifact in &config.artifacts {
        println!("cargo:rerun-if-changed={}", artifact.registry.display());
    }

    let out_dir = env::var_os("OUT_DIR").ok_or(GenerateError::MissingEnv { var: "OUT_DIR" })?;

    run(&config, Path::new(&out_dir))
}

/// Generate one artifact from a snapshot of the process-wide registry, for
/// build scripts that register their entries in-process.
pub fn generate_registered(
    spec: ArtifactSpec,
    constructor: &str,
) -> Result<GeneratedArtifact, GenerateError> {
    let constructor = parse_constructor(constructor)?;
    let registry = global::snapshot();
    info!(
        artifact = %spec.qualified_name(),
        entries = registry.len(),
        "using global registry"
    );

    let fields = RegistryFields::new(&registry, spec.element_type().clone(), constructor);

    ConstantGenerator::new(spec, fields).generate()
}

fn generate_artifact(config: &ArtifactConfig) -> Result<GeneratedArtifact, GenerateError> {
    let spec = ArtifactSpec::from_config(config)?;
    let constructor = parse_constructor(&config.constructor)?;
    let skip = parse_skip(&config.skip)?;

    let registry = load_manifest(&config.registry)?;
    info!(
        artifact = %spec.qualified_name(),
        registry = %config.registry.display(),
        entries = registry.len(),
        "loaded registry"
    );

    let fields = RegistryFields::new(&registry, spec.element_type().clone(), constructor)
        .with_skip(skip);

    ConstantGenerator::new(spec, fields).generate()
}

fn parse_skip(raw: &[String]) -> Result<Vec<QualifiedId>, GenerateError> {
    raw.iter()
        .map(|id| {
            id.parse().map_err(|err: IdError| GenerateError::InvalidSpec {
                what: "skip",
                input: id.clone(),
                reason: err.to_string(),
            })
        })
        .collect()
}
