//! Text rendering for generated files.
//!
//! Layout (blank lines, indentation, doc comments) is written by
//! `SourceWriter`; types and initializer recipes are token streams printed by
//! `print_tokens`, which spaces tokens the way rustfmt would for the paths,
//! calls, references, literals and generics that appear in them. Other
//! expressions print compactly but keep their meaning: `<` and `>` are always
//! treated as generic brackets, so `a < b` prints as `a<b`.

use constgen_config::{DEFAULT_INDENT, RenderConfig};
use proc_macro2::{Delimiter, Spacing, TokenStream, TokenTree};

/// First line of every generated file.
pub const GENERATED_HEADER: &str = "// @generated by constgen. Do not edit by hand.";

///
/// RenderOptions
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RenderOptions {
    /// Spaces per indentation level.
    pub indent: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
        }
    }
}

impl From<&RenderConfig> for RenderOptions {
    fn from(config: &RenderConfig) -> Self {
        Self {
            indent: config.indent,
        }
    }
}

///
/// SourceWriter
///

pub(crate) struct SourceWriter {
    out: String,
    indent: String,
    level: usize,
}

impl SourceWriter {
    pub(crate) fn new(options: RenderOptions) -> Self {
        Self {
            out: String::new(),
            indent: " ".repeat(options.indent),
            level: 0,
        }
    }

    /// Write one line at the current indentation; empty lines stay empty.
    pub(crate) fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.level {
                self.out.push_str(&self.indent);
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    pub(crate) fn blank(&mut self) {
        self.out.push('\n');
    }

    /// Write `text` as doc comment lines using `marker` (`//!` or `///`).
    pub(crate) fn docs(&mut self, marker: &str, text: &str) {
        for line in doc_lines(text) {
            if line.is_empty() {
                self.line(marker);
            } else {
                self.line(format!("{marker} {line}"));
            }
        }
    }

    pub(crate) fn indented(&mut self, f: impl FnOnce(&mut Self)) {
        self.level += 1;
        f(self);
        self.level -= 1;
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }
}

/// Split a doc block into lines with trailing whitespace removed and outer
/// blank lines dropped.
pub(crate) fn doc_lines(text: &str) -> Vec<&str> {
    let text = text.trim_matches('\n').trim_end();
    if text.is_empty() {
        return Vec::new();
    }

    text.lines().map(str::trim_end).collect()
}

//
// token printing
//

#[derive(Clone, Copy)]
enum Prev {
    Word,
    Lifetime,
    Group,
    Punct {
        ch: char,
        joint: bool,
        after: Option<char>,
        unary: bool,
    },
}

impl Prev {
    // whether the previous token closes an operand (so `(`/`[` is a call or index)
    const fn ends_operand(self) -> bool {
        match self {
            Self::Word | Self::Group => true,
            Self::Lifetime => false,
            Self::Punct {
                ch, after, unary, ..
            } => match ch {
                '>' => !matches!(after, Some('-' | '=')),
                '?' => true,
                '!' => !unary,
                _ => false,
            },
        }
    }

    // whether the next token attaches directly to this one
    const fn binds_right(self) -> bool {
        match self {
            Self::Punct { joint: true, .. }
            | Self::Punct {
                ch: ':',
                after: Some(':'),
                ..
            }
            | Self::Punct {
                ch: '.' | '#' | '$' | '<',
                ..
            } => true,
            Self::Punct { unary, .. } => unary,
            _ => false,
        }
    }
}

/// Print a token stream on one line with deterministic spacing.
pub(crate) fn print_tokens(tokens: &TokenStream) -> String {
    let mut out = String::new();
    let mut prev = None;
    write_stream(&mut out, tokens.clone(), &mut prev);

    out
}

fn write_stream(out: &mut String, tokens: TokenStream, prev: &mut Option<Prev>) {
    for tree in tokens {
        if let TokenTree::Group(group) = &tree
            && group.delimiter() == Delimiter::None
        {
            write_stream(out, group.stream(), prev);
            continue;
        }
        if space_before(*prev, &tree) {
            out.push(' ');
        }

        let next = match tree {
            TokenTree::Ident(ident) => {
                out.push_str(&ident.to_string());
                match *prev {
                    Some(Prev::Punct {
                        ch: '\'',
                        joint: true,
                        ..
                    }) => Prev::Lifetime,
                    _ => Prev::Word,
                }
            }
            TokenTree::Literal(literal) => {
                out.push_str(&literal.to_string());
                Prev::Word
            }
            TokenTree::Punct(punct) => {
                let ch = punct.as_char();
                out.push(ch);
                let after = match *prev {
                    Some(Prev::Punct {
                        ch, joint: true, ..
                    }) => Some(ch),
                    _ => None,
                };
                let unary = matches!(ch, '&' | '*' | '-' | '!')
                    && after.is_none()
                    && !prev.is_some_and(Prev::ends_operand);

                Prev::Punct {
                    ch,
                    joint: punct.spacing() == Spacing::Joint,
                    after,
                    unary,
                }
            }
            TokenTree::Group(group) => {
                let (open, close) = match group.delimiter() {
                    Delimiter::Parenthesis => ("(", ")"),
                    Delimiter::Bracket => ("[", "]"),
                    Delimiter::Brace | Delimiter::None => ("{", "}"),
                };

                let mut inner = String::new();
                write_stream(&mut inner, group.stream(), &mut None);

                out.push_str(open);
                if group.delimiter() == Delimiter::Brace && !inner.is_empty() {
                    out.push(' ');
                    out.push_str(&inner);
                    out.push(' ');
                } else {
                    out.push_str(&inner);
                }
                out.push_str(close);

                Prev::Group
            }
        };
        *prev = Some(next);
    }
}

fn space_before(prev: Option<Prev>, next: &TokenTree) -> bool {
    let Some(prev) = prev else {
        return false;
    };
    if prev.binds_right() {
        return false;
    }

    match next {
        TokenTree::Punct(punct) => match punct.as_char() {
            ',' | ';' | '.' | '?' | '>' => false,
            ':' => punct.spacing() == Spacing::Joint && !prev.ends_operand(),
            '<' | '!' => !(punct.spacing() == Spacing::Alone && matches!(prev, Prev::Word)),
            _ => true,
        },
        TokenTree::Group(group) => match group.delimiter() {
            Delimiter::Parenthesis | Delimiter::Bracket => !prev.ends_operand(),
            Delimiter::Brace | Delimiter::None => true,
        },
        TokenTree::Ident(_) | TokenTree::Literal(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::{ToTokens, quote};

    fn printed(tokens: TokenStream) -> String {
        print_tokens(&tokens)
    }

    #[test]
    fn paths_and_calls_are_tight() {
        assert_eq!(
            printed(quote!(crate::block::VanillaBlock)),
            "crate::block::VanillaBlock"
        );
        assert_eq!(
            printed(quote!(::jet::Key::new("core", "stone"))),
            "::jet::Key::new(\"core\", \"stone\")"
        );
        assert_eq!(printed(quote!(Vec::<u8>::new())), "Vec::<u8>::new()");
    }

    #[test]
    fn references_lifetimes_and_generics() {
        assert_eq!(
            printed(quote!(&'static [&'static Vec<Option<u8>>])),
            "&'static [&'static Vec<Option<u8>>]"
        );
        assert_eq!(printed(quote!(<T as Trait>::ID)), "<T as Trait>::ID");
        assert_eq!(printed(quote!(fn() -> &'static str)), "fn() -> &'static str");
    }

    #[test]
    fn operators_unary_minus_and_macros() {
        assert_eq!(printed(quote!(Point::new(-1, 2 + 3))), "Point::new(-1, 2 + 3)");
        assert_eq!(printed(quote!(vec![1, 2])), "vec![1, 2]");
        assert_eq!(printed(quote!(a != b)), "a != b");
    }

    #[test]
    fn comparisons_print_compactly_and_reparse_unchanged() {
        for tokens in [quote!(a < b), quote!(x > 0), quote!(Point::new(a <= b, c >= d))] {
            let text = printed(tokens.clone());
            let reparsed: syn::Expr = syn::parse_str(&text).unwrap();

            assert_eq!(reparsed.to_token_stream().to_string(), tokens.to_string(), "{text}");
        }
        assert_eq!(printed(quote!(a < b)), "a<b");
    }

    #[test]
    fn struct_literals_pad_braces() {
        assert_eq!(
            printed(quote!(Key { namespace: "core", path: "stone" })),
            "Key { namespace: \"core\", path: \"stone\" }"
        );
        assert_eq!(printed(quote!(Unit {})), "Unit {}");
    }

    #[test]
    fn writer_indents_and_keeps_blank_lines_empty() {
        let mut w = SourceWriter::new(RenderOptions { indent: 2 });
        w.line("fn f() {");
        w.indented(|w| {
            w.line("body();");
            w.line("");
        });
        w.line("}");

        assert_eq!(w.finish(), "fn f() {\n  body();\n\n}\n");
    }

    #[test]
    fn doc_blocks_trim_outer_blank_lines() {
        let mut w = SourceWriter::new(RenderOptions::default());
        w.docs("///", "\nFirst line.  \n\nSecond line.\n\n");

        assert_eq!(w.finish(), "/// First line.\n///\n/// Second line.\n");
        assert!(doc_lines("  \n").is_empty());
    }
}
