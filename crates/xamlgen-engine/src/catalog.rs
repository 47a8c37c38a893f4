//! The seam to the source-language adapter.
//!
//! The engine asks a [`TypeCatalog`] for the things it cannot see in a
//! [`PropertyDescriptor`]: a type's own properties and its enum members.
//! [`TypeTable`] is an in-memory catalog, deserializable from a config file.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::property::{PropertyDescriptor, first_type_argument, strip_namespace};

/// Member names never offered for generation.
pub const DENIED_MEMBER_NAMES: &[&str] = &["EqualityContract"];

/// Base type name that marks a type as an enum.
pub const ENUM_BASE_TYPE: &str = "Enum";

pub trait TypeCatalog {
    /// Public instance properties of the property's type, declared members first,
    /// then each inherited level. For generic types with no entry of their own,
    /// the first type argument is used (`List<Order>` yields `Order`'s properties).
    fn sub_properties(&self, property: &PropertyDescriptor) -> Vec<PropertyDescriptor>;

    /// Declaration-ordered members of the property's enum type. Empty for non-enums.
    fn enum_members(&self, property: &PropertyDescriptor) -> Vec<String>;

    fn is_enum(&self, property: &PropertyDescriptor) -> bool;
}

/// A catalog that knows no types.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyCatalog;

impl TypeCatalog for EmptyCatalog {
    fn sub_properties(&self, _property: &PropertyDescriptor) -> Vec<PropertyDescriptor> {
        Vec::new()
    }

    fn enum_members(&self, _property: &PropertyDescriptor) -> Vec<String> {
        Vec::new()
    }

    fn is_enum(&self, _property: &PropertyDescriptor) -> bool {
        false
    }
}

/// A property entry in a [`TypeInfo`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberInfo {
    #[serde(flatten)]
    pub property: PropertyDescriptor,
    #[serde(default, rename = "static")]
    pub is_static: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    /// Name of the base type; `Enum` marks an enum.
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub properties: Vec<MemberInfo>,
    /// Enum members, in declaration order.
    #[serde(default)]
    pub members: Vec<String>,
}

impl TypeInfo {
    pub fn is_enum(&self) -> bool {
        self.base
            .as_deref()
            .is_some_and(|b| strip_namespace(b) == ENUM_BASE_TYPE)
    }
}

/// Types keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeTable {
    #[serde(default)]
    pub types: BTreeMap<String, TypeInfo>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, name: &str, info: TypeInfo) -> Self {
        self.types.insert(name.to_string(), info);
        self
    }

    /// Numbers attribute arguments by their position, as written in a config file.
    pub fn normalized(mut self) -> Self {
        for info in self.types.values_mut() {
            for member in &mut info.properties {
                for attribute in &mut member.property.attributes {
                    attribute.renumber();
                }
            }
        }
        self
    }

    pub fn get(&self, type_name: &str) -> Option<&TypeInfo> {
        self.types
            .get(type_name)
            .or_else(|| self.types.get(&strip_namespace(type_name)))
    }

    /// The ordered property list for a whole class: declared members, then each
    /// inherited level. Statics and denied names are removed; a member hidden by a
    /// more derived one of the same name is listed once.
    pub fn class_properties(&self, type_name: &str) -> Vec<PropertyDescriptor> {
        let mut seen_types = HashSet::new();
        let mut seen_names = HashSet::new();
        let mut out = Vec::new();
        let mut current = Some(type_name.to_string());

        while let Some(name) = current.take() {
            if !seen_types.insert(strip_namespace(&name)) {
                break;
            }
            let Some(info) = self.get(&name) else {
                break;
            };
            for member in &info.properties {
                if member.is_static
                    || DENIED_MEMBER_NAMES.contains(&member.property.name.as_str())
                    || !seen_names.insert(member.property.name.clone())
                {
                    continue;
                }
                out.push(member.property.clone());
            }
            current = info.base.clone();
        }
        out
    }

    fn type_key_for(&self, property: &PropertyDescriptor) -> Option<String> {
        if self.get(&property.type_name).is_some() {
            return Some(property.type_name.clone());
        }
        first_type_argument(&property.type_name)
            .filter(|arg| self.get(arg).is_some())
            .map(str::to_string)
    }
}

impl TypeCatalog for TypeTable {
    fn sub_properties(&self, property: &PropertyDescriptor) -> Vec<PropertyDescriptor> {
        match self.type_key_for(property) {
            Some(key) if !self.get(&key).is_some_and(TypeInfo::is_enum) => {
                self.class_properties(&key)
            }
            _ => Vec::new(),
        }
    }

    fn enum_members(&self, property: &PropertyDescriptor) -> Vec<String> {
        self.get(&property.type_name)
            .filter(|info| info.is_enum())
            .map(|info| info.members.clone())
            .unwrap_or_default()
    }

    fn is_enum(&self, property: &PropertyDescriptor) -> bool {
        self.get(&property.type_name).is_some_and(TypeInfo::is_enum)
    }
}
