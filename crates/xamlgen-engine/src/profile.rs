//! Profiles: ordered type-to-markup rules plus the templates used when no
//! rule applies.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Grouping token: wrap in a `Grid` and generate row definitions.
pub const GRID_ROWDEFS: &str = "GRID-PLUS-ROWDEFS";
/// Grouping token: wrap in a `Grid` and generate row and two column definitions.
pub const GRID_ROWDEFS_2COLS: &str = "GRID-PLUS-ROWDEFS-2COLS";

/// Universal type wildcard.
pub const WILDCARD: &str = "T";
/// Type pattern keyword matching any enum.
pub const ENUM_KEYWORD: &str = "enum";

/// A configured set of type-to-markup rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    /// Wrapper element name, one of the grid tokens, or empty for no wrapper.
    #[serde(default)]
    pub class_grouping: String,
    /// Template used when nothing matches. Required for generation.
    #[serde(default)]
    pub fallback_output: Option<String>,
    /// Single-line template for each child property expanded by `$subprops$`.
    #[serde(default)]
    pub sub_property_output: String,
    /// Template for each member expanded by `$enummembers$`.
    #[serde(default)]
    pub enum_member_output: String,
    #[serde(default)]
    pub mappings: Vec<Mapping>,
}

impl Profile {
    /// Checks the invariants generation relies on.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.fallback_output.is_none() {
            return Err(EngineError::MissingFallback {
                profile: self.name.clone(),
            });
        }
        for mapping in &self.mappings {
            if mapping.type_entries().any(|e| e.type_name.is_empty()) {
                return Err(EngineError::InvalidTypePattern {
                    profile: self.name.clone(),
                    pattern: mapping.type_pattern.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn grouping(&self) -> ClassGrouping<'_> {
        ClassGrouping::parse(&self.class_grouping)
    }
}

/// One rule within a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    /// `|`-separated type entries, each optionally requiring an attribute: `string[Required]`.
    pub type_pattern: String,
    /// Case-insensitive substring the property name must contain. Empty matches any name.
    #[serde(default)]
    pub name_contains: String,
    #[serde(default)]
    pub if_read_only: bool,
    pub output: String,
}

impl Mapping {
    pub fn new(type_pattern: &str, output: &str) -> Self {
        Self {
            type_pattern: type_pattern.to_string(),
            output: output.to_string(),
            ..Self::default()
        }
    }

    pub fn read_only(mut self) -> Self {
        self.if_read_only = true;
        self
    }

    pub fn name_contains(mut self, fragment: &str) -> Self {
        self.name_contains = fragment.to_string();
        self
    }

    pub fn type_entries(&self) -> impl Iterator<Item = TypeEntry<'_>> {
        self.type_pattern.split('|').map(TypeEntry::parse)
    }

    /// Whether the name filter is set and `name` contains it, ignoring case.
    pub fn name_filter_matches(&self, name: &str) -> bool {
        !self.name_contains.is_empty()
            && name
                .to_lowercase()
                .contains(&self.name_contains.to_lowercase())
    }
}

/// One `|`-separated entry of a type pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeEntry<'a> {
    pub type_name: &'a str,
    pub attribute: Option<&'a str>,
}

impl<'a> TypeEntry<'a> {
    pub fn parse(entry: &'a str) -> Self {
        let entry = entry.trim();
        // `string[]` is an array type, not an attribute requirement
        if let Some(open) = entry.rfind('[')
            && entry.ends_with(']')
            && open + 1 < entry.len() - 1
            && !entry[open..].contains('>')
        {
            return Self {
                type_name: entry[..open].trim(),
                attribute: Some(entry[open + 1..entry.len() - 1].trim()),
            };
        }
        Self {
            type_name: entry,
            attribute: None,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        self.type_name == WILDCARD
    }

    pub fn is_enum(&self) -> bool {
        self.type_name.eq_ignore_ascii_case(ENUM_KEYWORD)
    }

    pub fn names_type(&self, type_name: &str) -> bool {
        !self.is_wildcard() && self.type_name.eq_ignore_ascii_case(type_name)
    }
}

/// How class-level output is wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassGrouping<'a> {
    None,
    /// Open tag content, e.g. `StackPanel` or `StackPanel Orientation="Horizontal"`.
    Element(&'a str),
    GridWithRows,
    GridWithRowsAndColumns,
}

impl<'a> ClassGrouping<'a> {
    pub fn parse(raw: &'a str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            ClassGrouping::None
        } else if raw.eq_ignore_ascii_case(GRID_ROWDEFS_2COLS) {
            ClassGrouping::GridWithRowsAndColumns
        } else if raw.eq_ignore_ascii_case(GRID_ROWDEFS) {
            ClassGrouping::GridWithRows
        } else {
            ClassGrouping::Element(raw)
        }
    }
}
