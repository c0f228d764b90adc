//! ## Crate layout
//! - `build`: the generation engine, the registry-driven field source, the
//!   config pipeline and the `build!` macro for build scripts.
//! - `config`: the `constgen.toml` model.
//! - `registry`: qualified ids, registries, the global registry and JSON
//!   manifests.
//!
//! The `prelude` module brings the traits and the common types into scope.

pub use constgen_build as build;
pub use constgen_config as config;
pub use constgen_registry as registry;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//
// Macros
//

pub use constgen_build::build;

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::{
        build::{
            ArtifactSpec, ConstantGenerator, FieldDescriptor, FieldSource as _, GenerateError,
            Generator as _, RegistryFields, RenderOptions,
        },
        registry::{MemoryRegistry, QualifiedId, Registry as _},
    };
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn prelude_covers_an_in_memory_generation() {
        let registry: MemoryRegistry = ["core:stone", "core:oak_log"]
            .into_iter()
            .map(|id| id.parse::<QualifiedId>().unwrap())
            .collect();
        let spec = ArtifactSpec::parse("", "Blocks", "Block").unwrap();
        let fields = RegistryFields::new(
            &registry,
            spec.element_type().clone(),
            syn::parse_quote!(Block::new),
        );

        let artifact = ConstantGenerator::new(spec, fields).generate().unwrap();

        assert_eq!(artifact.field_names().collect::<Vec<_>>(), ["STONE", "OAK_LOG"]);
        assert!(artifact.render(&RenderOptions::default()).contains("&OAK_LOG,"));
    }
}
