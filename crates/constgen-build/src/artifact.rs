use crate::{
    GenerateError,
    field::FieldDescriptor,
    persist::persist,
    render::{GENERATED_HEADER, RenderOptions, SourceWriter, doc_lines, print_tokens},
    spec::ArtifactSpec,
};
use proc_macro2::TokenStream;
use quote::{ToTokens, format_ident, quote};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};
use syn::Type;

/// Name of the private static holding every generated constant.
pub const VALUES_FIELD: &str = "VALUES";

/// Name of the public accessor returning the aggregate.
pub const VALUES_ACCESSOR: &str = "values";

///
/// GeneratedArtifact
///
/// A fully assembled constant-holder module: one `pub static` per field, a
/// private aggregate of references to them in declaration order, and the
/// accessor returning that aggregate.
///

#[derive(Clone, Debug)]
pub struct GeneratedArtifact {
    namespace: Vec<String>,
    module: String,
    relative_path: PathBuf,
    docs: String,
    fields: Vec<FieldDescriptor>,
    aggregate: Aggregate,
    accessor: Accessor,
}

impl GeneratedArtifact {
    #[must_use]
    pub fn namespace(&self) -> &[String] {
        &self.namespace
    }

    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    #[must_use]
    pub fn docs(&self) -> &str {
        &self.docs
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(FieldDescriptor::name)
    }

    #[must_use]
    pub const fn aggregate(&self) -> &Aggregate {
        &self.aggregate
    }

    #[must_use]
    pub const fn accessor(&self) -> &Accessor {
        &self.accessor
    }

    /// File path below the output root.
    #[must_use]
    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    /// Render the artifact as the text of a Rust source file.
    #[must_use]
    pub fn render(&self, options: &RenderOptions) -> String {
        let mut w = SourceWriter::new(*options);
        let ty = print_tokens(&self.aggregate.element_type.to_token_stream());

        w.line(GENERATED_HEADER);
        w.blank();

        if !doc_lines(&self.docs).is_empty() {
            w.docs("//!", &self.docs);
            w.blank();
        }

        if !self.fields.is_empty() {
            for field in &self.fields {
                w.line(format!(
                    "pub static {}: {} = {};",
                    field.name(),
                    print_tokens(&field.value_type().to_token_stream()),
                    print_tokens(field.initializer()),
                ));
            }
            w.blank();
        }

        // aggregate
        let header = format!(
            "static {}: [&{ty}; {}] = [",
            self.aggregate.name,
            self.aggregate.members.len()
        );
        if self.aggregate.members.is_empty() {
            w.line(format!("{header}];"));
        } else {
            w.line(header);
            w.indented(|w| {
                for member in &self.aggregate.members {
                    w.line(format!("&{member},"));
                }
            });
            w.line("];");
        }
        w.blank();

        // accessor
        w.docs("///", &self.accessor.docs);
        w.line("#[must_use]");
        w.line(format!(
            "pub fn {}() -> &'static [&'static {ty}] {{",
            self.accessor.name
        ));
        w.indented(|w| w.line(format!("&{}", self.aggregate.name)));
        w.line("}");

        w.finish()
    }

    /// Render and persist below `root`; returns the written path.
    pub fn write_to(&self, root: &Path, options: &RenderOptions) -> Result<PathBuf, GenerateError> {
        persist(root, &self.relative_path, &self.render(options))
    }
}

impl ToTokens for GeneratedArtifact {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let docs = doc_attr_lines(&self.docs);
        let fields = &self.fields;
        let aggregate = &self.aggregate;
        let accessor_docs = doc_attr_lines(&self.accessor.docs);
        let accessor_ident = format_ident!("{}", self.accessor.name);
        let aggregate_ident = format_ident!("{}", aggregate.name);
        let ty = &aggregate.element_type;

        tokens.extend(quote! {
            #( #![doc = #docs] )*

            #( #fields )*

            #aggregate

            #( #[doc = #accessor_docs] )*
            #[must_use]
            pub fn #accessor_ident() -> &'static [&'static #ty] {
                &#aggregate_ident
            }
        });
    }
}

impl ToTokens for FieldDescriptor {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let ident = self.ident();
        let ty = self.value_type();
        let init = self.initializer();

        tokens.extend(quote! {
            pub static #ident: #ty = #init;
        });
    }
}

// doc attribute payloads carry the leading space a `///` comment would
fn doc_attr_lines(text: &str) -> Vec<String> {
    doc_lines(text)
        .into_iter()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!(" {line}")
            }
        })
        .collect()
}

///
/// Aggregate
///
/// The read-only ordered collection of references to every field.
///

#[derive(Clone, Debug)]
pub struct Aggregate {
    name: String,
    element_type: Type,
    members: Vec<String>,
}

impl Aggregate {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn element_type(&self) -> &Type {
        &self.element_type
    }

    /// Referenced field names, in declaration order.
    #[must_use]
    pub fn members(&self) -> &[String] {
        &self.members
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl ToTokens for Aggregate {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let ident = format_ident!("{}", self.name);
        let ty = &self.element_type;
        let len = self.members.len();
        let members = self.members.iter().map(|member| format_ident!("{member}"));

        tokens.extend(quote! {
            static #ident: [&#ty; #len] = [#( &#members ),*];
        });
    }
}

///
/// Accessor
///

#[derive(Clone, Debug)]
pub struct Accessor {
    name: String,
    docs: String,
}

impl Accessor {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn docs(&self) -> &str {
        &self.docs
    }
}

///
/// ArtifactBuilder
///
/// Assembly state for one `generate` call. Owns the name index used to
/// reject duplicates as fields arrive.
///

pub(crate) struct ArtifactBuilder<'a> {
    spec: &'a ArtifactSpec,
    fields: Vec<FieldDescriptor>,
    positions: BTreeMap<String, usize>,
}

impl<'a> ArtifactBuilder<'a> {
    pub(crate) const fn new(spec: &'a ArtifactSpec) -> Self {
        Self {
            spec,
            fields: Vec::new(),
            positions: BTreeMap::new(),
        }
    }

    pub(crate) fn add_field(&mut self, field: FieldDescriptor) -> Result<(), GenerateError> {
        let position = self.fields.len();

        // the aggregate static and the accessor share the value namespace
        if field.name() == VALUES_FIELD || field.name() == VALUES_ACCESSOR {
            return Err(GenerateError::ReservedField {
                name: field.name().to_string(),
                position,
            });
        }

        let expected = print_tokens(&self.spec.element_type().to_token_stream());
        let found = print_tokens(&field.value_type().to_token_stream());
        if expected != found {
            return Err(GenerateError::FieldTypeMismatch {
                name: field.name().to_string(),
                position,
                expected,
                found,
            });
        }
        if let Some(&first) = self.positions.get(field.name()) {
            return Err(GenerateError::DuplicateField {
                name: field.name().to_string(),
                first,
                second: position,
            });
        }

        self.positions.insert(field.name().to_string(), position);
        self.fields.push(field);

        Ok(())
    }

    pub(crate) fn finish(self) -> GeneratedArtifact {
        let spec = self.spec;
        let members = self.fields.iter().map(|f| f.name().to_string()).collect();

        GeneratedArtifact {
            namespace: spec.namespace().to_vec(),
            module: spec.module().to_string(),
            relative_path: spec.relative_path(),
            docs: spec.docs().to_string(),
            fields: self.fields,
            aggregate: Aggregate {
                name: VALUES_FIELD.to_string(),
                element_type: spec.element_type().clone(),
                members,
            },
            accessor: Accessor {
                name: VALUES_ACCESSOR.to_string(),
                docs: spec.values_docs().to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;

    fn spec() -> ArtifactSpec {
        ArtifactSpec::parse("block", "VanillaBlocks", "crate::block::VanillaBlock")
            .unwrap()
            .with_docs("Represents a holder of built-in blocks.\n\nCode autogenerated, do not edit!")
            .with_values_docs("Gets all built-in blocks.")
    }

    fn field(name: &str, path: &str) -> FieldDescriptor {
        FieldDescriptor::new(
            name,
            syn::parse_quote!(crate::block::VanillaBlock),
            quote!(crate::block::VanillaBlock::new("core", #path)),
        )
        .unwrap()
    }

    fn build(fields: Vec<FieldDescriptor>) -> GeneratedArtifact {
        let spec = spec();
        let mut builder = ArtifactBuilder::new(&spec);
        for f in fields {
            builder.add_field(f).unwrap();
        }

        builder.finish()
    }

    const EXPECTED: &str = r#"// @generated by constgen. Do not edit by hand.

//! Represents a holder of built-in blocks.
//!
//! Code autogenerated, do not edit!

pub static STONE: crate::block::VanillaBlock = crate::block::VanillaBlock::new("core", "stone");
pub static OAK_LOG: crate::block::VanillaBlock = crate::block::VanillaBlock::new("core", "oak_log");

static VALUES: [&crate::block::VanillaBlock; 2] = [
    &STONE,
    &OAK_LOG,
];

/// Gets all built-in blocks.
#[must_use]
pub fn values() -> &'static [&'static crate::block::VanillaBlock] {
    &VALUES
}
"#;

    #[test]
    fn renders_statics_aggregate_and_accessor() {
        let artifact = build(vec![field("STONE", "stone"), field("OAK_LOG", "oak_log")]);

        assert_eq!(artifact.render(&RenderOptions::default()), EXPECTED);
        assert_eq!(artifact.aggregate().members(), ["STONE", "OAK_LOG"]);
        assert_eq!(artifact.accessor().name(), "values");
    }

    #[test]
    fn rendered_and_tokenized_forms_parse_as_rust() {
        let artifact = build(vec![field("STONE", "stone"), field("OAK_LOG", "oak_log")]);

        let file = syn::parse_file(&artifact.render(&RenderOptions { indent: 2 })).unwrap();
        assert_eq!(file.items.len(), 4, "two statics, the aggregate, the accessor");

        let file: syn::File = syn::parse2(artifact.to_token_stream()).unwrap();
        assert_eq!(file.items.len(), 4);
        assert_eq!(file.attrs.len(), 3, "one inner doc attribute per doc line");
    }

    #[test]
    fn empty_artifact_renders_an_empty_aggregate() {
        let rendered = build(Vec::new()).render(&RenderOptions::default());

        assert!(rendered.contains("static VALUES: [&crate::block::VanillaBlock; 0] = [];\n"));
        assert!(!rendered.contains("pub static"));
        syn::parse_file(&rendered).unwrap();
    }

    #[test]
    fn indentation_follows_options() {
        let rendered = build(vec![field("STONE", "stone")]).render(&RenderOptions { indent: 2 });

        assert!(rendered.contains("\n  &STONE,\n"));
        assert!(rendered.contains("\n  &VALUES\n"));
    }

    #[test]
    fn builder_rejects_duplicates_and_the_reserved_aggregate_name() {
        let spec = spec();

        let mut builder = ArtifactBuilder::new(&spec);
        builder.add_field(field("STONE", "stone")).unwrap();
        builder.add_field(field("OAK_LOG", "oak_log")).unwrap();
        let err = builder.add_field(field("STONE", "stone")).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::DuplicateField { ref name, first: 0, second: 2 } if name == "STONE"
        ));

        let mut builder = ArtifactBuilder::new(&spec);
        let err = builder.add_field(field("VALUES", "values")).unwrap_err();
        assert!(matches!(err, GenerateError::ReservedField { position: 0, .. }));

        let mut builder = ArtifactBuilder::new(&spec);
        builder.add_field(field("STONE", "stone")).unwrap();
        let err = builder.add_field(field("values", "values")).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::ReservedField { ref name, position: 1 } if name == "values"
        ));
    }

    #[test]
    fn builder_rejects_fields_of_another_type() {
        let spec = spec();
        let mut builder = ArtifactBuilder::new(&spec);
        let stray = FieldDescriptor::new("STONE", syn::parse_quote!(u32), quote!(1)).unwrap();

        let err = builder.add_field(stray).unwrap_err();

        assert!(matches!(
            err,
            GenerateError::FieldTypeMismatch { ref expected, ref found, position: 0, .. }
                if expected == "crate::block::VanillaBlock" && found == "u32"
        ));
    }
}
