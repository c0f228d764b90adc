use crate::{GenerateError, field::FieldDescriptor, generator::FieldSource};
use constgen_registry::{QualifiedId, Registry};
use proc_macro2::TokenStream;
use quote::quote;
use std::collections::BTreeSet;
use syn::Type;
use tracing::{debug, info, warn};

/// Derive a constant name from a registry path: ASCII uppercase, with each
/// word separator (`/`, `.`, `-`, space) turned into `_`.
#[must_use]
pub fn normalize_name(path: &str) -> String {
    path.chars()
        .map(|ch| match ch {
            '/' | '.' | '-' | ' ' => '_',
            _ => ch.to_ascii_uppercase(),
        })
        .collect()
}

///
/// RegistryFields
///
/// Field source backed by a registry. Every entry becomes one field of the
/// configured type, initialised as `constructor("namespace", "path")`.
///

pub struct RegistryFields<'a, R> {
    registry: &'a R,
    value_type: Type,
    constructor: syn::Path,
    skip: BTreeSet<QualifiedId>,
}

impl<'a, R: Registry> RegistryFields<'a, R> {
    pub const fn new(registry: &'a R, value_type: Type, constructor: syn::Path) -> Self {
        Self {
            registry,
            value_type,
            constructor,
            skip: BTreeSet::new(),
        }
    }

    /// Ids deliberately left out of the artifact.
    #[must_use]
    pub fn with_skip(mut self, skip: impl IntoIterator<Item = QualifiedId>) -> Self {
        self.skip.extend(skip);
        self
    }

    fn initializer(&self, id: &QualifiedId) -> TokenStream {
        let constructor = &self.constructor;
        let namespace = id.namespace();
        let path = id.path();

        quote!(#constructor(#namespace, #path))
    }
}

impl<R: Registry> FieldSource for RegistryFields<'_, R> {
    fn generate_fields(&self) -> Result<Vec<FieldDescriptor>, GenerateError> {
        let mut fields = Vec::new();
        let mut skipped = BTreeSet::new();

        for (position, entry) in self.registry.entries().enumerate() {
            let id = self
                .registry
                .resolve(entry)
                .map_err(|reason| GenerateError::UnresolvedEntry {
                    position,
                    entry: entry.to_string(),
                    reason,
                })?;

            if self.skip.contains(&id) {
                info!(%id, "skipping registry entry");
                skipped.insert(id);
                continue;
            }

            let field = FieldDescriptor::new(
                normalize_name(id.path()),
                self.value_type.clone(),
                self.initializer(&id),
            )?;
            debug!(%id, field = field.name(), "derived constant");

            fields.push(field);
        }

        for id in self.skip.difference(&skipped) {
            warn!(%id, "skip list names an id the registry does not contain");
        }
        info!(
            count = fields.len(),
            skipped = skipped.len(),
            "derived constants from registry"
        );

        Ok(fields)
    }
}
