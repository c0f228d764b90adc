use crate::GenerateError;
use proc_macro2::{Ident, TokenStream};
use quote::format_ident;
use syn::Type;

///
/// FieldDescriptor
///
/// One constant to emit: its name, its declared type, and the token recipe
/// that builds its value. Names are validated on construction.
///

#[derive(Clone, Debug)]
pub struct FieldDescriptor {
    name: String,
    value_type: Type,
    initializer: TokenStream,
}

impl FieldDescriptor {
    pub fn new(
        name: impl Into<String>,
        value_type: Type,
        initializer: TokenStream,
    ) -> Result<Self, GenerateError> {
        let name = name.into();
        validate_ident(&name).map_err(|reason| GenerateError::InvalidFieldName {
            name: name.clone(),
            reason,
        })?;

        Ok(Self {
            name,
            value_type,
            initializer,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn value_type(&self) -> &Type {
        &self.value_type
    }

    #[must_use]
    pub const fn initializer(&self) -> &TokenStream {
        &self.initializer
    }

    #[must_use]
    pub fn ident(&self) -> Ident {
        format_ident!("{}", self.name)
    }
}

/// Ensure a string is a plain Rust identifier: ASCII letters, digits and
/// underscores, not starting with a digit, not `_`, not a keyword.
pub(crate) fn validate_ident(ident: &str) -> Result<(), String> {
    let mut chars = ident.chars();
    let Some(first) = chars.next() else {
        return Err("identifier is empty".to_string());
    };

    if first.is_ascii_digit() {
        return Err(format!("identifier '{ident}' starts with a digit"));
    }
    if let Some(ch) = std::iter::once(first)
        .chain(chars)
        .find(|ch| !(ch.is_ascii_alphanumeric() || *ch == '_'))
    {
        return Err(format!("identifier '{ident}' contains invalid character '{ch}'"));
    }
    if ident == "_" {
        return Err("identifier '_' is a placeholder".to_string());
    }

    // keywords
    if syn::parse_str::<syn::Ident>(ident).is_err() {
        return Err(format!("identifier '{ident}' is a reserved keyword"));
    }

    Ok(())
}
