//! Language-agnostic facts about one member of a source type.
//!
//! An external adapter (C#/VB syntax model, reflection, a TOML type table)
//! produces these. The engine never mutates them.

use serde::{Deserialize, Serialize};

/// Conventional suffix on attribute class names (`DisplayAttribute`).
pub const ATTRIBUTE_SUFFIX: &str = "Attribute";

/// One argument passed to a source attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeArgument {
    /// Zero-based position in the argument list.
    #[serde(default)]
    pub index: usize,
    /// Set for named arguments (`Name = "Id"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Source text of the value, quotes included for string literals.
    pub value: String,
}

/// A source attribute applied to a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDescriptor {
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<AttributeArgument>,
}

impl AttributeDescriptor {
    /// An attribute applied without arguments.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    /// Builds an attribute from `(name, value)` pairs, numbering them by position.
    pub fn new<'a>(
        name: impl Into<String>,
        arguments: impl IntoIterator<Item = (Option<&'a str>, &'a str)>,
    ) -> Self {
        Self {
            name: name.into(),
            arguments: arguments
                .into_iter()
                .enumerate()
                .map(|(index, (name, value))| AttributeArgument {
                    index,
                    name: name.map(str::to_string),
                    value: value.to_string(),
                })
                .collect(),
        }
    }

    /// True when `name` refers to this attribute, with or without the `Attribute` suffix.
    pub fn is_named(&self, name: &str) -> bool {
        let own = strip_attribute_suffix(self.name.rsplit('.').next().unwrap_or(&self.name));
        own.eq_ignore_ascii_case(strip_attribute_suffix(name))
    }

    /// Looks up an argument by zero-based position (`"0"`) or by name.
    ///
    /// String literal quotes are removed from the returned value.
    pub fn argument(&self, key: &str) -> Option<&str> {
        let key = key.trim();
        let found = match key.parse::<usize>() {
            Ok(index) => self.arguments.iter().find(|a| a.index == index),
            Err(_) => self.arguments.iter().find(|a| {
                a.name
                    .as_deref()
                    .is_some_and(|n| n.eq_ignore_ascii_case(key))
            }),
        };
        found.map(|a| unquote(&a.value))
    }

    /// Renumbers argument indexes to match list position.
    pub fn renumber(&mut self) {
        for (index, arg) in self.arguments.iter_mut().enumerate() {
            arg.index = index;
        }
    }
}

fn strip_attribute_suffix(name: &str) -> &str {
    match name.len().checked_sub(ATTRIBUTE_SUFFIX.len()) {
        Some(cut)
            if cut > 0
                && name
                    .get(cut..)
                    .is_some_and(|tail| tail.eq_ignore_ascii_case(ATTRIBUTE_SUFFIX)) =>
        {
            &name[..cut]
        }
        _ => name,
    }
}

fn unquote(value: &str) -> &str {
    let v = value.trim();
    v.strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(v)
}

/// Facts about one property, as supplied by the source-language adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    pub name: String,
    /// Possibly generic and possibly namespace-qualified (`List<Order>`).
    /// Empty when the adapter could not resolve the type.
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub is_read_only: bool,
    #[serde(default)]
    pub attributes: Vec<AttributeDescriptor>,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            is_read_only: false,
            attributes: Vec::new(),
        }
    }

    pub fn read_only(mut self) -> Self {
        self.is_read_only = true;
        self
    }

    pub fn with_attribute(mut self, attribute: AttributeDescriptor) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.attributes.iter().find(|a| a.is_named(name))
    }

    /// The type name with namespace qualification removed, generic arguments included.
    pub fn simple_type_name(&self) -> String {
        strip_namespace(&self.type_name)
    }

    /// A copy of this property renamed to `parent.name`.
    pub fn nested_under(&self, parent: &str) -> Self {
        Self {
            name: format!("{parent}.{}", self.name),
            ..self.clone()
        }
    }
}

/// Splits `Outer<Args>` into `("Outer", "Args")`.
pub fn split_generic(type_name: &str) -> Option<(&str, &str)> {
    let open = type_name.find('<')?;
    let close = type_name.rfind('>')?;
    (close > open).then(|| (type_name[..open].trim(), &type_name[open + 1..close]))
}

/// Top-level comma-separated generic arguments of `type_name`.
pub fn type_arguments(type_name: &str) -> Vec<&str> {
    let Some((_, inner)) = split_generic(type_name) else {
        return Vec::new();
    };
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, ch) in inner.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                args.push(inner[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    args.push(inner[start..].trim());
    args
}

/// First generic argument, if the type is generic.
pub fn first_type_argument(type_name: &str) -> Option<&str> {
    type_arguments(type_name).into_iter().next().filter(|a| !a.is_empty())
}

/// Removes namespace qualification from a type and from each of its generic arguments.
pub fn strip_namespace(type_name: &str) -> String {
    let type_name = type_name.trim();
    match split_generic(type_name) {
        Some((outer, _)) => {
            let args: Vec<String> = type_arguments(type_name)
                .into_iter()
                .map(strip_namespace)
                .collect();
            format!("{}<{}>", last_segment(outer), args.join(", "))
        }
        None => last_segment(type_name).to_string(),
    }
}

fn last_segment(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// The single-argument wildcard form `Outer<T>` of a generic type.
pub fn wildcard_form(type_name: &str) -> Option<String> {
    let (outer, _) = split_generic(type_name)?;
    Some(format!("{}<T>", last_segment(outer)))
}
