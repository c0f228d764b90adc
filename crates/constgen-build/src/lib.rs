//! Build-time generation of constant-holder modules from registries.
//!
//! The engine (`ConstantGenerator`) assembles one Rust module per artifact:
//! a `pub static` per registry entry, a private ordered `VALUES` aggregate
//! and the `values()` accessor. Field lists come from a `FieldSource`; the
//! registry-backed source is `RegistryFields`.

mod artifact;
mod driver;
mod field;
mod generator;
mod macros;
mod persist;
mod pipeline;
mod render;
mod spec;

pub use constgen_config as config;
pub use constgen_registry as registry;

pub use artifact::{Accessor, Aggregate, GeneratedArtifact, VALUES_ACCESSOR, VALUES_FIELD};
pub use driver::{RegistryFields, normalize_name};
pub use field::FieldDescriptor;
pub use generator::{ConstantGenerator, FieldSource, Generator};
pub use pipeline::{RenderedArtifact, check, generate_registered, plan, run};
pub use render::{GENERATED_HEADER, RenderOptions};
pub use spec::{ArtifactSpec, NAMESPACE_SEPARATOR};

#[doc(hidden)]
pub use pipeline::build_script;

use constgen_config::ConfigError;
use constgen_registry::{IdError, RegistryError};
use std::{io, path::PathBuf};
use thiserror::Error as ThisError;

///
/// GenerateError
///
/// Every failure is fatal to the current run; nothing is retried and no
/// partial artifact is written.
///

#[derive(Debug, ThisError)]
pub enum GenerateError {
    #[error("registry entry #{position} ('{entry}') does not resolve to an id")]
    UnresolvedEntry {
        position: usize,
        entry: String,
        #[source]
        reason: IdError,
    },

    #[error("field '{name}' declared twice (positions {first} and {second})")]
    DuplicateField {
        name: String,
        first: usize,
        second: usize,
    },

    #[error("field '{name}' at position {position} uses a reserved name")]
    ReservedField { name: String, position: usize },

    #[error("field '{name}' at position {position} has type '{found}', expected '{expected}'")]
    FieldTypeMismatch {
        name: String,
        position: usize,
        expected: String,
        found: String,
    },

    #[error("invalid field name '{name}': {reason}")]
    InvalidFieldName { name: String, reason: String },

    #[error("invalid {what} '{input}': {reason}")]
    InvalidSpec {
        what: &'static str,
        input: String,
        reason: String,
    },

    #[error("failed to write '{path}'")]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("environment variable {var} is not set")]
    MissingEnv { var: &'static str },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
