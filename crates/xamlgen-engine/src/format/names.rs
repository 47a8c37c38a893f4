//! Name and type renderings used by placeholders.

use crate::profile::{GRID_ROWDEFS, GRID_ROWDEFS_2COLS};

const DEFAULT_ELEMENT_KIND: &str = "Element";

/// The last dotted segment of `name`, split at camel-case boundaries.
///
/// `ShipDate` -> `Ship Date`, `Order.CustomerID` -> `Customer ID`.
pub fn with_spaces(name: &str) -> String {
    let name = name.rsplit('.').next().unwrap_or(name);
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &ch) in chars.iter().enumerate() {
        if ch == '_' {
            if !out.ends_with(' ') && !out.is_empty() {
                out.push(' ');
            }
            continue;
        }
        if i > 0 && ch.is_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary && !out.ends_with(' ') {
                out.push(' ');
            }
        }
        out.push(ch);
    }
    out
}

/// `name` reduced to identifier characters. `Order.Id` -> `OrderId`.
pub fn safe_name(name: &str) -> String {
    let mut out: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    if out.chars().next().is_none_or(|c| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Renders a type argument the way XAML refers to it.
pub fn xaml_type_token(type_name: &str) -> String {
    let token = match type_name.trim() {
        "string" => "x:String",
        "int" => "x:Int32",
        "long" => "x:Int64",
        "short" => "x:Int16",
        "byte" => "x:Byte",
        "bool" => "x:Boolean",
        "double" => "x:Double",
        "float" => "x:Single",
        "decimal" => "x:Decimal",
        "char" => "x:Char",
        "object" => "x:Object",
        other => other,
    };
    token.to_string()
}

/// Name of the template's first element, used to build synthetic `x:Name`s.
///
/// Namespace prefixes are dropped and the grid markers count as `Grid`.
pub fn element_kind(template: &str) -> String {
    let bytes = template.as_bytes();
    let mut i = 0;
    while let Some(offset) = template[i..].find('<') {
        let start = i + offset + 1;
        let len = template[start..]
            .find(|c: char| !(c.is_alphanumeric() || matches!(c, '_' | ':' | '.' | '-')))
            .unwrap_or(template.len() - start);
        if len > 0 && bytes[start].is_ascii_alphabetic() {
            let name = &template[start..start + len];
            if name.eq_ignore_ascii_case(GRID_ROWDEFS)
                || name.eq_ignore_ascii_case(GRID_ROWDEFS_2COLS)
            {
                return "Grid".to_string();
            }
            return name.rsplit(':').next().unwrap_or(name).to_string();
        }
        i = start;
    }
    DEFAULT_ELEMENT_KIND.to_string()
}
