//! Selecting the single best mapping for a property.
//!
//! Resolution walks a fixed sequence of steps; the first step that produces a
//! usable mapping wins. Within a step, candidates keep profile order and the
//! read-only / name-filter precedence picks one of them.

use log::debug;

use crate::catalog::TypeCatalog;
use crate::profile::{Mapping, Profile, TypeEntry};
use crate::property::{PropertyDescriptor, strip_namespace, wildcard_form};

/// What to produce for a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'p> {
    Mapped(&'p Mapping),
    /// No mapping applies, but the type has properties of its own to expand inline.
    Expand,
    Fallback(&'p str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    TypeWithAttribute,
    WildcardWithAttribute,
    Enum,
    ExactType,
    GenericWildcard,
    Wildcard,
}

struct TypeKeys {
    exact: String,
    generic: Option<String>,
}

impl TypeKeys {
    fn of(property: &PropertyDescriptor) -> Self {
        let exact = property.simple_type_name();
        let generic = wildcard_form(&exact);
        Self { exact, generic }
    }

    fn named_by(&self, entry: &TypeEntry<'_>) -> bool {
        if entry.is_wildcard() {
            return false;
        }
        let wanted = strip_namespace(entry.type_name);
        wanted.eq_ignore_ascii_case(&self.exact)
            || self
                .generic
                .as_deref()
                .is_some_and(|g| wanted.eq_ignore_ascii_case(g))
    }
}

fn entry_matches(
    step: Step,
    entry: &TypeEntry<'_>,
    keys: &TypeKeys,
    property: &PropertyDescriptor,
) -> bool {
    let attribute_ok = |e: &TypeEntry<'_>| e.attribute.is_some_and(|a| property.has_attribute(a));
    match step {
        Step::TypeWithAttribute => attribute_ok(entry) && keys.named_by(entry),
        Step::WildcardWithAttribute => attribute_ok(entry) && entry.is_wildcard(),
        Step::Enum => entry.attribute.is_none() && entry.is_enum(),
        Step::ExactType => {
            entry.attribute.is_none()
                && !entry.is_wildcard()
                && strip_namespace(entry.type_name).eq_ignore_ascii_case(&keys.exact)
        }
        Step::GenericWildcard => {
            entry.attribute.is_none()
                && keys.generic.as_deref().is_some_and(|g| {
                    !entry.is_wildcard() && strip_namespace(entry.type_name).eq_ignore_ascii_case(g)
                })
        }
        Step::Wildcard => entry.attribute.is_none() && entry.is_wildcard(),
    }
}

fn candidates<'p>(
    profile: &'p Profile,
    step: Step,
    keys: &TypeKeys,
    property: &PropertyDescriptor,
) -> Vec<&'p Mapping> {
    profile
        .mappings
        .iter()
        .filter(|m| {
            m.type_entries()
                .any(|e| entry_matches(step, &e, keys, property))
        })
        .collect()
}

/// Applies read-only and name-filter precedence to one step's candidates.
///
/// A writable property never takes an `if_read_only` mapping; a read-only property
/// prefers one but may fall back to a writable mapping.
pub fn pick<'p>(candidates: &[&'p Mapping], property: &PropertyDescriptor) -> Option<&'p Mapping> {
    let name = property.name.as_str();
    let first = |read_only: bool, filtered: bool| {
        candidates.iter().copied().find(|m| {
            m.if_read_only == read_only
                && if filtered {
                    m.name_filter_matches(name)
                } else {
                    m.name_contains.is_empty()
                }
        })
    };

    if property.is_read_only
        && let Some(found) = first(true, true).or_else(|| first(true, false))
    {
        return Some(found);
    }
    first(false, true).or_else(|| first(false, false))
}

/// Finds the mapping for `property`, or `None` when no mapping applies.
pub fn resolve<'p>(
    profile: &'p Profile,
    property: &PropertyDescriptor,
    catalog: &dyn TypeCatalog,
) -> Option<&'p Mapping> {
    let keys = TypeKeys::of(property);
    let mut steps = Vec::with_capacity(6);
    if !property.attributes.is_empty() {
        steps.push(Step::TypeWithAttribute);
        steps.push(Step::WildcardWithAttribute);
    }
    if catalog.is_enum(property) {
        steps.push(Step::Enum);
    }
    steps.push(Step::ExactType);
    if keys.generic.is_some() {
        steps.push(Step::GenericWildcard);
    }
    steps.push(Step::Wildcard);

    for step in steps {
        let found = pick(&candidates(profile, step, &keys, property), property);
        if let Some(mapping) = found {
            debug!(
                "{} ({}) resolved at {step:?} to '{}'",
                property.name, property.type_name, mapping.type_pattern
            );
            return Some(mapping);
        }
    }
    None
}

/// Full resolution including inline expansion and the profile fallback.
///
/// Returns `None` only when nothing matches and the profile has no fallback.
pub fn resolve_output<'p>(
    profile: &'p Profile,
    property: &PropertyDescriptor,
    catalog: &dyn TypeCatalog,
) -> Option<Resolution<'p>> {
    if let Some(mapping) = resolve(profile, property, catalog) {
        return Some(Resolution::Mapped(mapping));
    }
    if !catalog.sub_properties(property).is_empty() {
        debug!("{} has no mapping; expanding its properties", property.name);
        return Some(Resolution::Expand);
    }
    profile
        .fallback_output
        .as_deref()
        .map(Resolution::Fallback)
}
