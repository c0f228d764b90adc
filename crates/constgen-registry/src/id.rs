use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error as ThisError;

/// Separator between the namespace and the path of a qualified identifier.
pub const SEPARATOR: char = ':';

///
/// IdError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum IdError {
    #[error("entry has no identifier")]
    Missing,

    #[error("identifier '{0}' has no namespace and no default namespace is set")]
    MissingNamespace(String),

    #[error("identifier namespace is empty")]
    EmptyNamespace,

    #[error("identifier path is empty")]
    EmptyPath,

    #[error("invalid character '{ch}' in namespace '{namespace}'")]
    InvalidNamespaceChar { namespace: String, ch: char },

    #[error("invalid character '{ch}' in path '{path}'")]
    InvalidPathChar { path: String, ch: char },
}

///
/// QualifiedId
///
/// A `(namespace, path)` pair uniquely identifying one registry entry,
/// written as `namespace:path`.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct QualifiedId {
    namespace: String,
    path: String,
}

impl QualifiedId {
    /// Build an identifier, validating both halves.
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Result<Self, IdError> {
        let namespace = namespace.into();
        let path = path.into();

        validate_namespace(&namespace)?;
        validate_path(&path)?;

        Ok(Self { namespace, path })
    }

    /// Parse `namespace:path`, falling back to `default_namespace` when the
    /// input carries no namespace.
    pub fn parse_with_default(input: &str, default_namespace: Option<&str>) -> Result<Self, IdError> {
        match input.split_once(SEPARATOR) {
            Some((namespace, path)) => Self::new(namespace, path),
            None => match default_namespace {
                Some(namespace) => Self::new(namespace, input),
                None => Err(IdError::MissingNamespace(input.to_string())),
            },
        }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for QualifiedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.namespace, self.path)
    }
}

impl FromStr for QualifiedId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with_default(s, None)
    }
}

impl TryFrom<String> for QualifiedId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QualifiedId> for String {
    fn from(id: QualifiedId) -> Self {
        id.to_string()
    }
}

const fn is_namespace_char(ch: char) -> bool {
    matches!(ch, 'a'..='z' | '0'..='9' | '_' | '.' | '-')
}

const fn is_path_char(ch: char) -> bool {
    is_namespace_char(ch) || ch == '/'
}

fn validate_namespace(namespace: &str) -> Result<(), IdError> {
    if namespace.is_empty() {
        return Err(IdError::EmptyNamespace);
    }
    if let Some(ch) = namespace.chars().find(|ch| !is_namespace_char(*ch)) {
        return Err(IdError::InvalidNamespaceChar {
            namespace: namespace.to_string(),
            ch,
        });
    }

    Ok(())
}

fn validate_path(path: &str) -> Result<(), IdError> {
    if path.is_empty() {
        return Err(IdError::EmptyPath);
    }
    if let Some(ch) = path.chars().find(|ch| !is_path_char(*ch)) {
        return Err(IdError::InvalidPathChar {
            path: path.to_string(),
            ch,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_namespace_and_path() {
        let id: QualifiedId = "core:oak_log".parse().unwrap();

        assert_eq!(id.namespace(), "core");
        assert_eq!(id.path(), "oak_log");
        assert_eq!(id.to_string(), "core:oak_log");
    }

    #[test]
    fn path_may_contain_slashes_but_namespace_may_not() {
        assert!(QualifiedId::new("core", "block/stone").is_ok());
        assert_eq!(
            QualifiedId::new("co/re", "stone"),
            Err(IdError::InvalidNamespaceChar {
                namespace: "co/re".to_string(),
                ch: '/',
            })
        );
    }

    #[test]
    fn default_namespace_applies_only_without_separator() {
        let id = QualifiedId::parse_with_default("stone", Some("core")).unwrap();
        assert_eq!(id.to_string(), "core:stone");

        let id = QualifiedId::parse_with_default("extra:stone", Some("core")).unwrap();
        assert_eq!(id.namespace(), "extra");

        assert_eq!(
            QualifiedId::parse_with_default("stone", None),
            Err(IdError::MissingNamespace("stone".to_string()))
        );
    }

    #[test]
    fn rejects_empty_halves_and_uppercase() {
        assert_eq!("core:".parse::<QualifiedId>(), Err(IdError::EmptyPath));
        assert_eq!(":stone".parse::<QualifiedId>(), Err(IdError::EmptyNamespace));
        assert!(matches!(
            "core:Stone".parse::<QualifiedId>(),
            Err(IdError::InvalidPathChar { ch: 'S', .. })
        ));
    }

    #[test]
    fn serde_uses_the_display_form() {
        let id = QualifiedId::new("core", "stone").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"core:stone\"");

        let back: QualifiedId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        assert!(serde_json::from_str::<QualifiedId>("\"nope\"").is_err());
    }
}
