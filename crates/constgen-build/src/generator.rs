use crate::{
    GenerateError,
    artifact::{ArtifactBuilder, GeneratedArtifact},
    field::FieldDescriptor,
    spec::ArtifactSpec,
};
use tracing::{debug, info_span};

///
/// FieldSource
///
/// The data-source hook: produce the ordered field list for one artifact.
/// Implementations must not return duplicate names; entries they leave out
/// on purpose should be logged, never dropped silently.
///

pub trait FieldSource {
    fn generate_fields(&self) -> Result<Vec<FieldDescriptor>, GenerateError>;
}

impl<F> FieldSource for F
where
    F: Fn() -> Result<Vec<FieldDescriptor>, GenerateError>,
{
    fn generate_fields(&self) -> Result<Vec<FieldDescriptor>, GenerateError> {
        self()
    }
}

///
/// Generator
///
/// Anything that turns its configuration into one in-memory artifact.
///

pub trait Generator {
    fn generate(&self) -> Result<GeneratedArtifact, GenerateError>;
}

///
/// ConstantGenerator
///
/// Assembles a constant-holder artifact around the fields of a `FieldSource`.
/// The assembly sequence is fixed here; sources only supply fields.
///

pub struct ConstantGenerator<S> {
    spec: ArtifactSpec,
    source: S,
}

impl<S: FieldSource> ConstantGenerator<S> {
    pub const fn new(spec: ArtifactSpec, source: S) -> Self {
        Self { spec, source }
    }

    #[must_use]
    pub const fn spec(&self) -> &ArtifactSpec {
        &self.spec
    }
}

impl<S: FieldSource> Generator for ConstantGenerator<S> {
    fn generate(&self) -> Result<GeneratedArtifact, GenerateError> {
        let span = info_span!("generate", artifact = %self.spec.qualified_name());
        let _guard = span.enter();

        // holder skeleton: module docs, no constructor
        let mut builder = ArtifactBuilder::new(&self.spec);

        // hook
        let fields = self.source.generate_fields()?;
        debug!(count = fields.len(), "fields received from source");

        // statics, in the order received
        for field in fields {
            builder.add_field(field)?;
        }

        // aggregate + accessor
        Ok(builder.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderOptions;
    use quote::quote;
    use std::cell::Cell;

    type Fields = Result<Vec<FieldDescriptor>, GenerateError>;

    fn spec() -> ArtifactSpec {
        ArtifactSpec::parse("", "Numbers", "u32").unwrap()
    }

    fn numbered(names: &[&str]) -> Vec<FieldDescriptor> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let value = u32::try_from(i).unwrap();
                FieldDescriptor::new(*name, syn::parse_quote!(u32), quote!(#value)).unwrap()
            })
            .collect()
    }

    #[test]
    fn closure_sources_drive_generation_in_order() {
        let generator = ConstantGenerator::new(spec(), || -> Fields { Ok(numbered(&["ONE", "TWO", "THREE"])) });

        let artifact = generator.generate().unwrap();

        assert_eq!(artifact.field_names().collect::<Vec<_>>(), ["ONE", "TWO", "THREE"]);
        assert_eq!(artifact.aggregate().len(), 3);
        assert_eq!(artifact.aggregate().members(), ["ONE", "TWO", "THREE"]);
    }

    #[test]
    fn hook_runs_once_per_generate() {
        let calls = Cell::new(0);
        let generator = ConstantGenerator::new(spec(), || -> Fields {
            calls.set(calls.get() + 1);
            Ok(numbered(&["ONE"]))
        });

        generator.generate().unwrap();
        generator.generate().unwrap();

        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn repeated_generation_is_byte_identical() {
        let generator = ConstantGenerator::new(spec(), || -> Fields { Ok(numbered(&["A", "B"])) });
        let options = RenderOptions::default();

        let first = generator.generate().unwrap().render(&options);
        let second = generator.generate().unwrap().render(&options);

        assert_eq!(first, second);
    }

    #[test]
    fn duplicate_names_fail_the_whole_generation() {
        let generator = ConstantGenerator::new(spec(), || -> Fields { Ok(numbered(&["A", "B", "A"])) });

        let err = generator.generate().unwrap_err();

        assert!(matches!(
            err,
            GenerateError::DuplicateField { ref name, first: 0, second: 2 } if name == "A"
        ));
    }

    #[test]
    fn field_named_like_the_accessor_is_rejected() {
        let generator = ConstantGenerator::new(spec(), || -> Fields {
            Ok(vec![
                FieldDescriptor::new("values", syn::parse_quote!(u32), quote!(1u32)).unwrap(),
            ])
        });

        assert!(matches!(
            generator.generate(),
            Err(GenerateError::ReservedField { ref name, position: 0 }) if name == "values"
        ));
    }

    #[test]
    fn hook_errors_propagate_unchanged() {
        let generator = ConstantGenerator::new(spec(), || -> Fields {
            Err(GenerateError::InvalidFieldName {
                name: "x".to_string(),
                reason: "test".to_string(),
            })
        });

        assert!(matches!(
            generator.generate(),
            Err(GenerateError::InvalidFieldName { .. })
        ));
    }

    #[test]
    fn empty_source_yields_empty_aggregate() {
        let generator = ConstantGenerator::new(spec(), || -> Fields { Ok(Vec::new()) });

        let artifact = generator.generate().unwrap();

        assert!(artifact.fields().is_empty());
        assert!(artifact.aggregate().is_empty());
    }
}
