//! Placeholder tokens and case-insensitive text replacement.

pub const NAME: &str = "$name$";
pub const NAME_WITH_SPACES: &str = "$namewithspaces$";
pub const SAFE_NAME: &str = "$safename$";
pub const XNAME: &str = "$xname$";
pub const REP_XNAME: &str = "$repxname$";
pub const TYPE: &str = "$type$";
pub const SUB_PROPERTIES: &str = "$subprops$";
pub const ENUM_MEMBERS: &str = "$enummembers$";
pub const ENUM_ELEMENT: &str = "$element$";
pub const ENUM_ELEMENT_WITH_SPACES: &str = "$elementwithspaces$";
pub const ENUM_PROPERTY_NAME: &str = "$enumname$";
pub const INC_INT: &str = "$incint$";
pub const REP_INT: &str = "$repint$";

/// Stands in for `$` inside an attribute placeholder's fallback text.
pub const FALLBACK_DELIMITER: char = '§';

/// A template consisting only of this produces nothing.
pub const NO_OUTPUT: &str = "<NoOutput />";
pub const NO_ACCESSIBLE_PROPERTIES: &str =
    "<!-- No accessible properties when copying as XAML -->";
pub const UNKNOWN_TYPE: &str = "UNKNOWN-TYPE";

pub fn is_no_output(template: &str) -> bool {
    template.trim().eq_ignore_ascii_case(NO_OUTPUT)
}

pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}

/// Replaces every case-insensitive occurrence of `needle`, asking `next` for each
/// replacement in order of appearance.
pub fn replace_each_ci(haystack: &str, needle: &str, mut next: impl FnMut() -> String) -> String {
    if needle.is_empty() {
        return haystack.to_string();
    }
    // ASCII lowercasing keeps byte offsets aligned with `haystack`
    let lower = haystack.to_ascii_lowercase();
    let needle = needle.to_ascii_lowercase();
    let mut out = String::with_capacity(haystack.len());
    let mut last = 0;
    for (at, _) in lower.match_indices(&needle) {
        out.push_str(&haystack[last..at]);
        out.push_str(&next());
        last = at + needle.len();
    }
    out.push_str(&haystack[last..]);
    out
}

pub fn replace_ci(haystack: &str, needle: &str, replacement: &str) -> String {
    replace_each_ci(haystack, needle, || replacement.to_string())
}
