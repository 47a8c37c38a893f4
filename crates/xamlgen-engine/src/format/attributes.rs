//! `$attr:Name[key]$` placeholders.
//!
//! `key` is a zero-based argument position or an argument name. An optional
//! `::fallback` is used verbatim when the property lacks the attribute; `§`
//! inside it becomes `$` so that fallbacks can carry ordinary placeholders.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use super::placeholders::FALLBACK_DELIMITER;
use crate::property::PropertyDescriptor;

fn attribute_placeholder() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\$attr:([^\[\]$]+)\[([^\]$]*)\](?:::([^$]*))?\$")
            .expect("Invalid attribute placeholder regex")
    })
}

pub fn substitute(text: &str, property: &PropertyDescriptor) -> String {
    attribute_placeholder()
        .replace_all(text, |caps: &Captures<'_>| {
            let name = caps[1].trim();
            match property.attribute(name) {
                Some(attribute) => attribute.argument(&caps[2]).unwrap_or_default().to_string(),
                None => caps
                    .get(3)
                    .map(|fallback| fallback.as_str().replace(FALLBACK_DELIMITER, "$"))
                    .unwrap_or_default(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::AttributeDescriptor;
    use pretty_assertions::assert_eq;

    fn display_property() -> PropertyDescriptor {
        PropertyDescriptor::new("ShipDate", "DateTime").with_attribute(AttributeDescriptor::new(
            "DisplayAttribute",
            [(None, "\"Shipped on\""), (Some("Order"), "3")],
        ))
    }

    #[test]
    fn argument_by_position() {
        assert_eq!(
            substitute("<TextBlock Text=\"$attr:Display[0]$\" />", &display_property()),
            "<TextBlock Text=\"Shipped on\" />"
        );
    }

    #[test]
    fn argument_by_name() {
        assert_eq!(
            substitute("Grid.Row=\"$ATTR:Display[order]$\"", &display_property()),
            "Grid.Row=\"3\""
        );
    }

    #[test]
    fn present_attribute_missing_argument_is_empty() {
        assert_eq!(
            substitute("[$attr:Display[Description]::nope$]", &display_property()),
            "[]"
        );
    }

    #[test]
    fn absent_attribute_uses_fallback() {
        let plain = PropertyDescriptor::new("ShipDate", "DateTime");
        assert_eq!(
            substitute("Header=\"$attr:Display[0]::§namewithspaces§$\"", &plain),
            "Header=\"$namewithspaces$\""
        );
    }

    #[test]
    fn absent_attribute_without_fallback_is_empty() {
        let plain = PropertyDescriptor::new("ShipDate", "DateTime");
        assert_eq!(substitute("<A B=\"$attr:Display[0]$\" />", &plain), "<A B=\"\" />");
    }

    #[test]
    fn other_placeholders_are_untouched() {
        assert_eq!(
            substitute("$name$ $incint$", &display_property()),
            "$name$ $incint$"
        );
    }
}
