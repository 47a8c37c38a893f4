//! Assembling output for a property, a whole class, or a selection of properties.

use std::ops::Range;

use log::debug;

use crate::catalog::TypeCatalog;
use crate::error::EngineError;
use crate::format::grid::{GridKind, definition_lines};
use crate::format::layout::{INDENT, indent_lines};
use crate::format::placeholders::NO_ACCESSIBLE_PROPERTIES;
use crate::format::{FormatContext, FormatEnv, SubPropertyProducer, format};
use crate::profile::{ClassGrouping, Profile};
use crate::property::{PropertyDescriptor, strip_namespace};
use crate::resolve::{Resolution, resolve, resolve_output};

/// Inline expansion stops at this many nested levels.
pub const MAX_EXPANSION_DEPTH: usize = 8;

/// First `$incint$` value in a class pass.
pub const CLASS_FIRST_VALUE: i64 = 0;
/// First `$incint$` value in a selection or single-property pass.
pub const SELECTION_FIRST_VALUE: i64 = 1;

/// Generated markup and a human readable name for what it was generated from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedXaml {
    pub name: String,
    pub output: String,
}

/// A property together with the source span it was declared in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedProperty {
    pub span: Range<usize>,
    pub property: PropertyDescriptor,
}

/// Properties whose span intersects `range`, in source order.
///
/// An empty range (a caret) selects the property containing it.
pub fn properties_in_range(
    properties: &[SpannedProperty],
    range: Range<usize>,
) -> Vec<PropertyDescriptor> {
    properties
        .iter()
        .filter(|p| {
            if range.is_empty() {
                p.span.start <= range.start && range.start <= p.span.end
            } else {
                p.span.start < range.end && range.start < p.span.end
            }
        })
        .map(|p| p.property.clone())
        .collect()
}

/// `A`, `A and B`, or `A, B and N other properties`.
pub fn selection_name(names: &[&str]) -> String {
    match names {
        [] => String::new(),
        [one] => one.to_string(),
        [first, second] => format!("{first} and {second}"),
        [first, second, rest @ ..] => {
            format!("{first}, {second} and {} other properties", rest.len())
        }
    }
}

/// The type names along the current chain of inline expansion.
#[derive(Debug, Clone, Default)]
struct Chain {
    types: Vec<String>,
}

impl Chain {
    fn rooted_at(type_name: &str) -> Self {
        Self {
            types: vec![strip_namespace(type_name)],
        }
    }

    fn contains(&self, type_name: &str) -> bool {
        let wanted = strip_namespace(type_name);
        self.types.iter().any(|t| t.eq_ignore_ascii_case(&wanted))
    }

    fn extended(&self, type_name: &str) -> Self {
        let mut types = self.types.clone();
        types.push(strip_namespace(type_name));
        Self { types }
    }
}

/// One property's output and the number of top-level entries it occupies.
#[derive(Debug)]
struct Rendered {
    text: String,
    rows: usize,
}

impl Rendered {
    fn single(text: String) -> Self {
        Self { text, rows: 1 }
    }
}

/// Drives resolution and formatting for one profile and type catalog.
pub struct Generator<'a> {
    profile: &'a Profile,
    catalog: &'a dyn TypeCatalog,
}

impl<'a> Generator<'a> {
    pub fn new(profile: &'a Profile, catalog: &'a dyn TypeCatalog) -> Result<Self, EngineError> {
        profile.validate()?;
        Ok(Self { profile, catalog })
    }

    fn env(&self) -> FormatEnv<'_> {
        FormatEnv {
            enum_member_output: &self.profile.enum_member_output,
            catalog: self.catalog,
            sub_properties: Some(self),
        }
    }

    /// Output for one property, unwrapped.
    pub fn property(&self, property: &PropertyDescriptor) -> GeneratedXaml {
        let mut ctx = FormatContext::new(SELECTION_FIRST_VALUE);
        let output = self
            .render(property, &mut ctx, &Chain::default())
            .map(|rendered| rendered.text)
            .unwrap_or_default();
        GeneratedXaml {
            name: property.name.clone(),
            output,
        }
    }

    /// Output for every property of a class, wrapped per the profile's grouping.
    pub fn class(&self, type_name: &str, properties: &[PropertyDescriptor]) -> GeneratedXaml {
        let output = self.assemble(
            properties,
            FormatContext::new(CLASS_FIRST_VALUE),
            &Chain::rooted_at(type_name),
        );
        GeneratedXaml {
            name: type_name.to_string(),
            output,
        }
    }

    /// Output for selected properties, wrapped like a class.
    pub fn selection(&self, properties: &[PropertyDescriptor]) -> GeneratedXaml {
        let names: Vec<&str> = properties.iter().map(|p| p.name.as_str()).collect();
        let output = self.assemble(
            properties,
            FormatContext::new(SELECTION_FIRST_VALUE),
            &Chain::default(),
        );
        GeneratedXaml {
            name: selection_name(&names),
            output,
        }
    }

    fn assemble(
        &self,
        properties: &[PropertyDescriptor],
        mut ctx: FormatContext,
        chain: &Chain,
    ) -> String {
        let grouping = self.profile.grouping();

        let mut rows = 0;
        let lines: Vec<String> = if properties.is_empty() {
            vec![NO_ACCESSIBLE_PROPERTIES.to_string()]
        } else {
            properties
                .iter()
                .filter_map(|p| self.render(p, &mut ctx, chain))
                .map(|rendered| {
                    rows += rendered.rows;
                    rendered.text
                })
                .collect()
        };

        let mut body: Vec<String> = Vec::new();
        if let Some(kind) = GridKind::for_grouping(grouping) {
            body.extend(definition_lines(kind, rows));
        }
        body.extend(lines);

        match grouping {
            ClassGrouping::None => body.join("\n"),
            ClassGrouping::Element(open) => wrap(open, element_name(open), &body),
            ClassGrouping::GridWithRows | ClassGrouping::GridWithRowsAndColumns => {
                wrap("Grid", "Grid", &body)
            }
        }
    }

    /// Resolves and formats one property. `None` means it produces no output.
    fn render(
        &self,
        property: &PropertyDescriptor,
        ctx: &mut FormatContext,
        chain: &Chain,
    ) -> Option<Rendered> {
        let rendered = match resolve_output(self.profile, property, self.catalog)? {
            Resolution::Mapped(mapping) => {
                Rendered::single(format(&mapping.output, property, ctx, &self.env()))
            }
            Resolution::Expand => {
                if chain.contains(&property.type_name) || chain.types.len() >= MAX_EXPANSION_DEPTH {
                    debug!(
                        "skipping {} ({}): cycle or depth limit",
                        property.name, property.type_name
                    );
                    return None;
                }
                match self.expand_inline(property, ctx, chain) {
                    Some(rendered) => rendered,
                    None => {
                        let fallback = self.profile.fallback_output.as_deref()?;
                        Rendered::single(format(fallback, property, ctx, &self.env()))
                    }
                }
            }
            Resolution::Fallback(template) => {
                Rendered::single(format(template, property, ctx, &self.env()))
            }
        };
        if rendered.text.trim().is_empty() {
            debug!("{} produced no output", property.name);
            return None;
        }
        Some(rendered)
    }

    /// Formats a complex property's own properties under dotted names.
    ///
    /// `None` when none of them produce output.
    fn expand_inline(
        &self,
        property: &PropertyDescriptor,
        ctx: &mut FormatContext,
        chain: &Chain,
    ) -> Option<Rendered> {
        let chain = chain.extended(&property.type_name);
        let mut rows = 0;
        let lines: Vec<String> = self
            .catalog
            .sub_properties(property)
            .iter()
            .filter_map(|sub| self.render(&sub.nested_under(&property.name), ctx, &chain))
            .map(|rendered| {
                rows += rendered.rows;
                rendered.text
            })
            .collect();
        (!lines.is_empty()).then(|| Rendered {
            text: lines.join("\n"),
            rows,
        })
    }
}

impl SubPropertyProducer for Generator<'_> {
    /// Sub-properties use the profile's sub-property template, or their own mapping
    /// when it has none. They count from zero, independent of the enclosing pass.
    fn sub_property_lines(&self, property: &PropertyDescriptor) -> Vec<String> {
        let mut ctx = FormatContext::new(CLASS_FIRST_VALUE);
        let env = FormatEnv {
            sub_properties: None,
            ..self.env()
        };
        self.catalog
            .sub_properties(property)
            .iter()
            .filter_map(|sub| {
                let template = if self.profile.sub_property_output.trim().is_empty() {
                    resolve(self.profile, sub, self.catalog)
                        .map(|m| m.output.as_str())
                        .or(self.profile.fallback_output.as_deref())?
                } else {
                    self.profile.sub_property_output.as_str()
                };
                let text = format(template, sub, &mut ctx, &env);
                (!text.trim().is_empty()).then_some(text)
            })
            .collect()
    }
}

fn element_name(open: &str) -> &str {
    open.split_whitespace().next().unwrap_or(open)
}

fn wrap(open: &str, close: &str, body: &[String]) -> String {
    let mut out = format!("<{open}>\n");
    for entry in body {
        out.push_str(&indent_lines(entry, INDENT));
        out.push('\n');
    }
    out.push_str(&format!("</{close}>"));
    out
}

/// Output for a single property.
pub fn generate_for_property(
    profile: &Profile,
    property: &PropertyDescriptor,
    catalog: &dyn TypeCatalog,
) -> Result<GeneratedXaml, EngineError> {
    Ok(Generator::new(profile, catalog)?.property(property))
}

/// Output for all of a type's properties.
pub fn generate_for_type(
    profile: &Profile,
    type_name: &str,
    properties: &[PropertyDescriptor],
    catalog: &dyn TypeCatalog,
) -> Result<GeneratedXaml, EngineError> {
    Ok(Generator::new(profile, catalog)?.class(type_name, properties))
}

/// Output for the properties of a selection.
pub fn generate_for_selection(
    profile: &Profile,
    properties: &[PropertyDescriptor],
    catalog: &dyn TypeCatalog,
) -> Result<GeneratedXaml, EngineError> {
    Ok(Generator::new(profile, catalog)?.selection(properties))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(&[], "")]
    #[case(&["Name"], "Name")]
    #[case(&["Name", "Age"], "Name and Age")]
    #[case(&["Name", "Age", "Email"], "Name, Age and 1 other properties")]
    #[case(&["A", "B", "C", "D", "E"], "A, B and 3 other properties")]
    fn selection_names(#[case] names: &[&str], #[case] expected: &str) {
        assert_eq!(selection_name(names), expected);
    }

    fn spanned(name: &str, span: Range<usize>) -> SpannedProperty {
        SpannedProperty {
            span,
            property: PropertyDescriptor::new(name, "string"),
        }
    }

    #[test]
    fn range_selection_uses_intersection() {
        let props = vec![spanned("A", 0..10), spanned("B", 11..20), spanned("C", 21..30)];
        let names = |range: Range<usize>| {
            properties_in_range(&props, range)
                .into_iter()
                .map(|p| p.name)
                .collect::<Vec<_>>()
        };
        assert_eq!(names(5..15), vec!["A", "B"]);
        assert_eq!(names(12..12), vec!["B"]);
        assert_eq!(names(10..11), Vec::<String>::new());
        assert_eq!(names(0..100), vec!["A", "B", "C"]);
    }

    #[test]
    fn chain_detects_cycles_ignoring_namespace() {
        let chain = Chain::rooted_at("MyApp.Person");
        assert!(chain.contains("Person"));
        assert!(!chain.contains("Address"));
        assert!(chain.extended("Address").contains("MyApp.Models.Address"));
    }

    #[test]
    fn wrap_uses_first_word_for_closing_tag() {
        assert_eq!(
            wrap(
                "StackPanel Orientation=\"Horizontal\"",
                element_name("StackPanel Orientation=\"Horizontal\""),
                &["<A />".to_string()]
            ),
            "<StackPanel Orientation=\"Horizontal\">\n    <A />\n</StackPanel>"
        );
    }
}
