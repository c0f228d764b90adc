//! JSON registry manifests.
//!
//! ```json
//! {
//!   "namespace": "core",
//!   "entries": ["stone", { "id": "core:oak_log" }, { "label": "ghost" }]
//! }
//! ```
//!
//! Entry order in the file is the registry order.

use crate::{
    RegistryError,
    registry::{MemoryRegistry, RegistryEntry},
};
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestFile {
    #[serde(default)]
    namespace: Option<String>,
    entries: Vec<ManifestEntry>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ManifestEntry {
    Id(String),
    Entry(RegistryEntry),
}

impl From<ManifestEntry> for RegistryEntry {
    fn from(entry: ManifestEntry) -> Self {
        match entry {
            ManifestEntry::Id(id) => Self::with_id(id),
            ManifestEntry::Entry(entry) => entry,
        }
    }
}

/// Parse a manifest held in memory; `origin` names it in errors.
pub fn parse_manifest(json: &str, origin: &str) -> Result<MemoryRegistry, RegistryError> {
    let file: ManifestFile =
        serde_json::from_str(json).map_err(|source| RegistryError::Parse {
            origin: origin.to_string(),
            source,
        })?;

    let mut registry = MemoryRegistry::new();
    if let Some(namespace) = file.namespace {
        registry = registry.with_default_namespace(namespace);
    }
    registry.extend(file.entries.into_iter().map(RegistryEntry::from));

    Ok(registry)
}

/// Load a manifest file from disk.
pub fn load_manifest(path: &Path) -> Result<MemoryRegistry, RegistryError> {
    let json = fs::read_to_string(path).map_err(|source| RegistryError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_manifest(&json, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IdError, registry::Registry};
    use std::io::Write;

    fn resolved(registry: &MemoryRegistry) -> Vec<Result<String, IdError>> {
        registry
            .entries()
            .map(|entry| registry.resolve(entry).map(|id| id.to_string()))
            .collect()
    }

    #[test]
    fn mixed_entry_forms_keep_file_order() {
        let registry = parse_manifest(
            r#"{
                "namespace": "core",
                "entries": ["stone", { "id": "extra:oak_log" }, { "label": "ghost" }]
            }"#,
            "inline",
        )
        .unwrap();

        assert_eq!(
            resolved(&registry),
            [
                Ok("core:stone".to_string()),
                Ok("extra:oak_log".to_string()),
                Err(IdError::Missing),
            ]
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = parse_manifest(r#"{ "entries": [], "extra": 1 }"#, "inline").unwrap_err();

        assert!(matches!(err, RegistryError::Parse { ref origin, .. } if origin == "inline"));
    }

    #[test]
    fn loads_from_disk_and_reports_missing_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "entries": ["core:stone"] }}"#).unwrap();

        let registry = load_manifest(file.path()).unwrap();
        assert_eq!(resolved(&registry), [Ok("core:stone".to_string())]);

        let missing = file.path().with_extension("missing");
        assert!(matches!(
            load_manifest(&missing),
            Err(RegistryError::Io { .. })
        ));
    }
}
