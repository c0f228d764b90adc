use crate::id::{IdError, QualifiedId};
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// Registry
///
/// An ordered, read-only source of entries. Implementations expose only what
/// generation needs: iterate entries in their natural order and resolve each
/// one to its qualified identifier.
///

pub trait Registry {
    type Entry: fmt::Display;

    /// Iterate all entries in stable registration order.
    fn entries(&self) -> impl Iterator<Item = &Self::Entry>;

    /// Resolve an entry to the identifier it is registered under.
    fn resolve(&self, entry: &Self::Entry) -> Result<QualifiedId, IdError>;
}

///
/// RegistryEntry
///
/// One raw entry as it was registered. The identifier is kept unparsed so a
/// malformed or missing id is reported at generation time, not dropped at
/// load time.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl RegistryEntry {
    #[must_use]
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            label: None,
        }
    }

    #[must_use]
    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            id: None,
            label: Some(label.into()),
        }
    }
}

impl fmt::Display for RegistryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.label, &self.id) {
            (Some(label), _) => f.write_str(label),
            (None, Some(id)) => f.write_str(id),
            (None, None) => f.write_str("<unnamed>"),
        }
    }
}

///
/// MemoryRegistry
///

#[derive(Clone, Debug, Default)]
pub struct MemoryRegistry {
    default_namespace: Option<String>,
    entries: Vec<RegistryEntry>,
}

impl MemoryRegistry {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            default_namespace: None,
            entries: Vec::new(),
        }
    }

    /// Namespace applied to ids registered without a `namespace:` prefix.
    #[must_use]
    pub fn with_default_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.default_namespace = Some(namespace.into());
        self
    }

    #[must_use]
    pub fn default_namespace(&self) -> Option<&str> {
        self.default_namespace.as_deref()
    }

    pub fn push(&mut self, entry: RegistryEntry) {
        self.entries.push(entry);
    }

    pub fn register(&mut self, id: &QualifiedId) {
        self.push(RegistryEntry::with_id(id.to_string()));
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl FromIterator<QualifiedId> for MemoryRegistry {
    fn from_iter<I: IntoIterator<Item = QualifiedId>>(iter: I) -> Self {
        let mut registry = Self::new();
        for id in iter {
            registry.register(&id);
        }

        registry
    }
}

impl Extend<RegistryEntry> for MemoryRegistry {
    fn extend<I: IntoIterator<Item = RegistryEntry>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl Registry for MemoryRegistry {
    type Entry = RegistryEntry;

    fn entries(&self) -> impl Iterator<Item = &Self::Entry> {
        self.entries.iter()
    }

    fn resolve(&self, entry: &Self::Entry) -> Result<QualifiedId, IdError> {
        let raw = entry.id.as_deref().ok_or(IdError::Missing)?;

        QualifiedId::parse_with_default(raw, self.default_namespace.as_deref())
    }
}
