//! Ordered, read-only registries of qualified identifiers.
//!
//! - `id`: the `namespace:path` identifier every registry entry resolves to.
//! - `registry`: the narrow `Registry` trait plus the in-memory implementation.
//! - `global`: a process-wide registry for in-process registration.
//! - `manifest`: JSON registry manifests loaded from disk.

pub mod global;
pub mod id;
pub mod manifest;
pub mod registry;

pub use id::{IdError, QualifiedId};
pub use registry::{MemoryRegistry, Registry, RegistryEntry};

use std::{io, path::PathBuf};
use thiserror::Error as ThisError;

///
/// RegistryError
///
/// Failures while loading a registry from outside the process.
///

#[derive(Debug, ThisError)]
pub enum RegistryError {
    #[error("failed to read registry manifest '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid registry manifest '{origin}'")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}
