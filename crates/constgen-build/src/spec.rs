use crate::{GenerateError, field::validate_ident};
use constgen_config::ArtifactConfig;
use convert_case::{Case, Casing};
use std::path::PathBuf;
use syn::Type;

/// Separator between namespace segments.
pub const NAMESPACE_SEPARATOR: &str = "::";

///
/// ArtifactSpec
///
/// Everything about one artifact that is fixed before its fields exist:
/// where it lives, what it is called, the element type and both doc blocks.
///

#[derive(Clone, Debug)]
pub struct ArtifactSpec {
    namespace: Vec<String>,
    name: String,
    module: String,
    element_type: Type,
    docs: String,
    values_docs: String,
}

impl ArtifactSpec {
    pub fn new(namespace: &str, name: &str, element_type: Type) -> Result<Self, GenerateError> {
        let namespace = parse_namespace(namespace)?;

        let module = name.trim().to_case(Case::Snake);
        validate_ident(&module).map_err(|reason| GenerateError::InvalidSpec {
            what: "name",
            input: name.to_string(),
            reason,
        })?;

        Ok(Self {
            namespace,
            name: name.trim().to_string(),
            module,
            element_type,
            docs: String::new(),
            values_docs: String::new(),
        })
    }

    /// Like `new`, with the element type given as Rust source.
    pub fn parse(namespace: &str, name: &str, element_type: &str) -> Result<Self, GenerateError> {
        let element_type = parse_type(element_type)?;

        Self::new(namespace, name, element_type)
    }

    pub fn from_config(config: &ArtifactConfig) -> Result<Self, GenerateError> {
        Ok(Self::parse(&config.namespace, &config.name, &config.element_type)?
            .with_docs(&config.docs)
            .with_values_docs(&config.values_docs))
    }

    /// Documentation for the generated module.
    #[must_use]
    pub fn with_docs(mut self, docs: impl Into<String>) -> Self {
        self.docs = docs.into();
        self
    }

    /// Documentation for the aggregate accessor.
    #[must_use]
    pub fn with_values_docs(mut self, docs: impl Into<String>) -> Self {
        self.values_docs = docs.into();
        self
    }

    #[must_use]
    pub fn namespace(&self) -> &[String] {
        &self.namespace
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Module (and file stem) the artifact is emitted as.
    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    #[must_use]
    pub const fn element_type(&self) -> &Type {
        &self.element_type
    }

    #[must_use]
    pub fn docs(&self) -> &str {
        &self.docs
    }

    #[must_use]
    pub fn values_docs(&self) -> &str {
        &self.values_docs
    }

    /// `a::b::module`, for logs and error messages.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        self.namespace
            .iter()
            .map(String::as_str)
            .chain([self.module.as_str()])
            .collect::<Vec<_>>()
            .join(NAMESPACE_SEPARATOR)
    }

    /// File path below the output root: one directory per namespace segment.
    #[must_use]
    pub fn relative_path(&self) -> PathBuf {
        let mut path: PathBuf = self.namespace.iter().collect();
        path.push(format!("{}.rs", self.module));

        path
    }
}

pub(crate) fn parse_type(input: &str) -> Result<Type, GenerateError> {
    syn::parse_str(input).map_err(|err| GenerateError::InvalidSpec {
        what: "element type",
        input: input.to_string(),
        reason: err.to_string(),
    })
}

pub(crate) fn parse_constructor(input: &str) -> Result<syn::Path, GenerateError> {
    syn::parse_str(input).map_err(|err| GenerateError::InvalidSpec {
        what: "constructor",
        input: input.to_string(),
        reason: err.to_string(),
    })
}

fn parse_namespace(input: &str) -> Result<Vec<String>, GenerateError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Vec::new());
    }

    input
        .split(NAMESPACE_SEPARATOR)
        .map(|segment| {
            let segment = segment.trim();
            validate_ident(segment)
                .map(|()| segment.to_string())
                .map_err(|reason| GenerateError::InvalidSpec {
                    what: "namespace",
                    input: input.to_string(),
                    reason,
                })
        })
        .collect()
}
