//! Template expansion.
//!
//! Placeholders are substituted in a fixed order; each step works on the text
//! produced by the previous one:
//!
//! 1. attribute placeholders (`$attr:Name[key]$`), whose fallbacks may
//!    introduce further placeholders
//! 2. names (`$name$`, `$namewithspaces$`, `$safename$`)
//! 3. synthetic identifiers (`$xname$`, `$repxname$`)
//! 4. `$type$`
//! 5. `$subprops$`, with grid marker rewriting
//! 6. `$enummembers$`
//! 7. `$incint$`
//! 8. `$repint$`
//!
//! The only state carried between calls is the [`FormatContext`] of one pass.

pub mod attributes;
pub mod grid;
pub mod layout;
pub mod names;
pub mod placeholders;

use crate::catalog::TypeCatalog;
use crate::profile::GRID_ROWDEFS;
use crate::property::{PropertyDescriptor, first_type_argument};

use placeholders::*;

/// The shared counter behind `$incint$` and `$repint$`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericState {
    pub next_value: i64,
}

impl NumericState {
    pub fn starting_at(next_value: i64) -> Self {
        Self { next_value }
    }

    /// Consumes the next value.
    pub fn take(&mut self) -> i64 {
        let value = self.next_value;
        self.next_value += 1;
        value
    }

    /// The most recently consumed value.
    pub fn last(&self) -> i64 {
        self.next_value - 1
    }
}

/// Per-pass formatting state. Create one per class, selection or property pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatContext {
    pub numeric: NumericState,
    xname: Option<String>,
}

impl FormatContext {
    pub fn new(first_value: i64) -> Self {
        Self {
            numeric: NumericState::starting_at(first_value),
            xname: None,
        }
    }

    /// The identifier most recently produced by `$xname$` in this pass.
    pub fn last_xname(&self) -> Option<&str> {
        self.xname.as_deref()
    }
}

/// Supplies the already formatted lines for a property's `$subprops$`.
pub trait SubPropertyProducer {
    fn sub_property_lines(&self, property: &PropertyDescriptor) -> Vec<String>;
}

/// What a template may draw on besides the property itself.
pub struct FormatEnv<'a> {
    pub enum_member_output: &'a str,
    pub catalog: &'a dyn TypeCatalog,
    pub sub_properties: Option<&'a dyn SubPropertyProducer>,
}

/// Expands `template` for `property`.
///
/// Never fails: placeholders that cannot be satisfied become empty text.
pub fn format(
    template: &str,
    property: &PropertyDescriptor,
    ctx: &mut FormatContext,
    env: &FormatEnv<'_>,
) -> String {
    if is_no_output(template) {
        return String::new();
    }

    let text = attributes::substitute(template, property);
    let text = substitute_names(&text, &property.name);
    let text = substitute_xnames(&text, template, property, ctx);
    let text = replace_ci(&text, TYPE, &type_token(property));

    let text = if contains_ci(&text, SUB_PROPERTIES) || contains_ci(&text, GRID_ROWDEFS) {
        let lines = match env.sub_properties {
            Some(producer) if contains_ci(&text, SUB_PROPERTIES) => {
                producer.sub_property_lines(property)
            }
            _ => Vec::new(),
        };
        grid::expand_sub_properties(template, &text, &lines)
    } else {
        text
    };

    let text = if contains_ci(&text, ENUM_MEMBERS) {
        let lines = enum_member_lines(property, env);
        layout::expand_block(&text, ENUM_MEMBERS, &lines)
    } else {
        text
    };

    let text = replace_each_ci(&text, INC_INT, || ctx.numeric.take().to_string());
    replace_ci(&text, REP_INT, &ctx.numeric.last().to_string())
}

fn substitute_names(text: &str, name: &str) -> String {
    let text = replace_ci(text, NAME_WITH_SPACES, &names::with_spaces(name));
    let text = replace_ci(&text, SAFE_NAME, &names::safe_name(name));
    replace_ci(&text, NAME, name)
}

fn substitute_xnames(
    text: &str,
    template: &str,
    property: &PropertyDescriptor,
    ctx: &mut FormatContext,
) -> String {
    let mut text = text.to_string();
    if contains_ci(&text, XNAME) {
        let xname = format!(
            "{}{}",
            names::safe_name(&property.name),
            names::element_kind(template)
        );
        text = replace_ci(&text, XNAME, &xname);
        ctx.xname = Some(xname);
    }
    if contains_ci(&text, REP_XNAME) {
        text = match ctx.last_xname() {
            Some(xname) => replace_ci(&text, REP_XNAME, xname),
            None => strip_rep_xname(&text),
        };
    }
    text
}

/// Removes `$repxname$`, taking the whole attribute with it when the placeholder
/// is the attribute's entire value.
fn strip_rep_xname(text: &str) -> String {
    use regex::Regex;
    use std::sync::OnceLock;

    static WHOLE_ATTRIBUTE: OnceLock<Regex> = OnceLock::new();
    let whole = WHOLE_ATTRIBUTE.get_or_init(|| {
        Regex::new(r#"(?i)\s+[\w:.]+\s*=\s*(?:"\$repxname\$"|'\$repxname\$')"#)
            .expect("Invalid repxname attribute regex")
    });
    let text = whole.replace_all(text, "");
    replace_ci(&text, REP_XNAME, "")
}

fn type_token(property: &PropertyDescriptor) -> String {
    let simple = property.simple_type_name();
    if simple.is_empty() {
        return UNKNOWN_TYPE.to_string();
    }
    match first_type_argument(&simple) {
        Some(argument) => names::xaml_type_token(argument),
        None => simple,
    }
}

fn enum_member_lines(property: &PropertyDescriptor, env: &FormatEnv<'_>) -> Vec<String> {
    if env.enum_member_output.trim().is_empty() {
        return Vec::new();
    }
    env.catalog
        .enum_members(property)
        .iter()
        .map(|member| {
            let text = replace_ci(
                env.enum_member_output,
                ENUM_ELEMENT_WITH_SPACES,
                &names::with_spaces(member),
            );
            let text = replace_ci(&text, ENUM_ELEMENT, member);
            let text = replace_ci(&text, ENUM_PROPERTY_NAME, &property.name);
            replace_ci(&text, NAME, &property.name)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{EmptyCatalog, TypeInfo, TypeTable};
    use crate::property::AttributeDescriptor;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const NO_ENV: FormatEnv<'static> = FormatEnv {
        enum_member_output: "",
        catalog: &EmptyCatalog,
        sub_properties: None,
    };

    fn fmt(template: &str, property: &PropertyDescriptor) -> String {
        format(template, property, &mut FormatContext::new(0), &NO_ENV)
    }

    struct FixedLines(Vec<&'static str>);

    impl SubPropertyProducer for FixedLines {
        fn sub_property_lines(&self, _property: &PropertyDescriptor) -> Vec<String> {
            self.0.iter().map(|s| s.to_string()).collect()
        }
    }

    #[rstest]
    #[case("$name$", "ShipDate")]
    #[case("$NameWithSpaces$", "Ship Date")]
    #[case("$safename$", "ShipDate")]
    #[case("$type$", "DateTime")]
    fn simple_placeholders(#[case] template: &str, #[case] expected: &str) {
        let prop = PropertyDescriptor::new("ShipDate", "System.DateTime");
        assert_eq!(fmt(template, &prop), expected);
    }

    #[test]
    fn generic_type_renders_first_argument() {
        let orders = PropertyDescriptor::new("Orders", "List<Order>");
        let tags = PropertyDescriptor::new("Tags", "List<string>");
        let template = "<ListView ItemsSource=\"{x:Bind $name$}\" Tag=\"$type$\" />";
        assert_eq!(
            fmt(template, &orders),
            "<ListView ItemsSource=\"{x:Bind Orders}\" Tag=\"Order\" />"
        );
        assert_eq!(
            fmt(template, &tags),
            "<ListView ItemsSource=\"{x:Bind Tags}\" Tag=\"x:String\" />"
        );
    }

    #[test]
    fn unknown_type_renders_sentinel() {
        assert_eq!(fmt("$type$", &PropertyDescriptor::new("Broken", "")), UNKNOWN_TYPE);
    }

    #[test]
    fn incrementing_then_repeating() {
        let prop = PropertyDescriptor::new("Name", "string");
        let mut ctx = FormatContext::new(0);
        let out = format(
            "<A Grid.Row=\"$incint$\" /><B Grid.Row=\"$repint$\" /><C Grid.Row=\"$repint$\" />",
            &prop,
            &mut ctx,
            &NO_ENV,
        );
        assert_eq!(
            out,
            "<A Grid.Row=\"0\" /><B Grid.Row=\"0\" /><C Grid.Row=\"0\" />"
        );
        assert_eq!(ctx.numeric.next_value, 1);
    }

    #[test]
    fn each_incint_gets_a_distinct_value() {
        let prop = PropertyDescriptor::new("Name", "string");
        let mut ctx = FormatContext::new(3);
        assert_eq!(
            format("$incint$ $incint$", &prop, &mut ctx, &NO_ENV),
            "3 4"
        );
        assert_eq!(format("$incint$", &prop, &mut ctx, &NO_ENV), "5");
    }

    #[test]
    fn repint_without_incint_repeats_previous_value() {
        let prop = PropertyDescriptor::new("Name", "string");
        let mut ctx = FormatContext::new(0);
        format("$incint$", &prop, &mut ctx, &NO_ENV);
        assert_eq!(format("$repint$", &prop, &mut ctx, &NO_ENV), "0");
        assert_eq!(format("$repint$", &prop, &mut ctx, &NO_ENV), "0");
    }

    #[test]
    fn formatting_is_idempotent_with_fresh_state() {
        let prop = PropertyDescriptor::new("Total", "decimal");
        let template =
            "<TextBox x:Name=\"$xname$\" Grid.Row=\"$incint$\" Header=\"$namewithspaces$\" />";
        let first = format(template, &prop, &mut FormatContext::new(0), &NO_ENV);
        let second = format(template, &prop, &mut FormatContext::new(0), &NO_ENV);
        assert_eq!(first, second);
    }

    #[test]
    fn xname_is_remembered_for_the_pass() {
        let mut ctx = FormatContext::new(0);
        let name = PropertyDescriptor::new("Name", "string");
        let age = PropertyDescriptor::new("Age", "int");
        assert_eq!(
            format("<TextBox x:Name=\"$xname$\" />", &name, &mut ctx, &NO_ENV),
            "<TextBox x:Name=\"NameTextBox\" />"
        );
        assert_eq!(
            format(
                "<TextBlock Target=\"{x:Bind $repxname$}\" Text=\"$name$\" />",
                &age,
                &mut ctx,
                &NO_ENV
            ),
            "<TextBlock Target=\"{x:Bind NameTextBox}\" Text=\"Age\" />"
        );
        assert_eq!(ctx.last_xname(), Some("NameTextBox"));
    }

    #[test]
    fn unused_repxname_is_stripped_with_its_attribute() {
        let prop = PropertyDescriptor::new("Age", "int");
        assert_eq!(
            fmt("<TextBlock x:Name=\"$repxname$\" Text=\"$name$\" />", &prop),
            "<TextBlock Text=\"Age\" />"
        );
        assert_eq!(
            fmt("<TextBlock Tag=\"{x:Bind $repxname$}\" />", &prop),
            "<TextBlock Tag=\"{x:Bind }\" />"
        );
    }

    #[test]
    fn attribute_fallback_placeholders_are_substituted() {
        let plain = PropertyDescriptor::new("ShipDate", "DateTime");
        let labelled = PropertyDescriptor::new("ShipDate", "DateTime").with_attribute(
            AttributeDescriptor::new("Display", [(Some("Name"), "\"Shipped\"")]),
        );
        let template = "<DatePicker Header=\"$attr:Display[Name]::§namewithspaces§$\" />";
        assert_eq!(fmt(template, &plain), "<DatePicker Header=\"Ship Date\" />");
        assert_eq!(fmt(template, &labelled), "<DatePicker Header=\"Shipped\" />");
    }

    #[test]
    fn no_output_sentinel_consumes_nothing() {
        let prop = PropertyDescriptor::new("Secret", "string");
        let mut ctx = FormatContext::new(0);
        assert_eq!(format("<NoOutput />", &prop, &mut ctx, &NO_ENV), "");
        assert_eq!(ctx.numeric.next_value, 0);
    }

    #[test]
    fn sub_properties_inside_grid_marker() {
        let lines = FixedLines(vec![
            "<TextBlock Text=\"{x:Bind Id}\" />",
            "<TextBlock Text=\"{x:Bind Total}\" />",
        ]);
        let env = FormatEnv {
            sub_properties: Some(&lines),
            ..NO_ENV
        };
        let prop = PropertyDescriptor::new("Order", "Order");
        let out = format(
            "<GRID-PLUS-ROWDEFS x:Name=\"$xname$\">$subprops$</GRID-PLUS-ROWDEFS>",
            &prop,
            &mut FormatContext::new(0),
            &env,
        );
        assert_eq!(
            out,
            "<Grid x:Name=\"OrderGrid\">
    <Grid.RowDefinitions>
        <RowDefinition Height=\"Auto\" />
        <RowDefinition Height=\"*\" />
    </Grid.RowDefinitions>
    <TextBlock Text=\"{x:Bind Id}\" />
    <TextBlock Text=\"{x:Bind Total}\" />
</Grid>"
        );
    }

    #[test]
    fn sub_properties_without_producer_are_empty() {
        let prop = PropertyDescriptor::new("Order", "Order");
        assert_eq!(
            fmt("<StackPanel>$subprops$</StackPanel>", &prop),
            "<StackPanel></StackPanel>"
        );
    }

    #[test]
    fn enum_members_expand_in_order() {
        let catalog = TypeTable::new().with_type(
            "Priority",
            TypeInfo {
                base: Some("Enum".into()),
                members: vec!["Low".into(), "VeryHigh".into()],
                ..TypeInfo::default()
            },
        );
        let env = FormatEnv {
            enum_member_output:
                "<RadioButton Content=\"$elementwithspaces$\" GroupName=\"$enumname$\" Tag=\"$element$\" />",
            catalog: &catalog,
            sub_properties: None,
        };
        let prop = PropertyDescriptor::new("Level", "Priority");
        let out = format(
            "<StackPanel>$enummembers$</StackPanel>",
            &prop,
            &mut FormatContext::new(0),
            &env,
        );
        assert_eq!(
            out,
            "<StackPanel>
    <RadioButton Content=\"Low\" GroupName=\"Level\" Tag=\"Low\" />
    <RadioButton Content=\"Very High\" GroupName=\"Level\" Tag=\"VeryHigh\" />
</StackPanel>"
        );
    }

    #[test]
    fn enum_members_of_non_enum_are_empty() {
        let env = FormatEnv {
            enum_member_output: "<Item Content=\"$element$\" />",
            ..NO_ENV
        };
        let prop = PropertyDescriptor::new("Name", "string");
        assert_eq!(
            format("<ComboBox>$enummembers$</ComboBox>", &prop, &mut FormatContext::new(0), &env),
            "<ComboBox></ComboBox>"
        );
    }
}
