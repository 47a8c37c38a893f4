//! Indentation and placement of multi-line blocks.

use super::placeholders::replace_each_ci;

pub const INDENT: &str = "    ";

/// Prefixes every non-empty line of `text` with `indent`.
pub fn indent_lines(text: &str, indent: &str) -> String {
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{indent}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Leading whitespace of the last line of `out`.
pub fn current_indent(out: &str) -> String {
    let line_start = out.rfind('\n').map_or(0, |i| i + 1);
    out[line_start..]
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect()
}

/// Appends `lines` to `out` as a block nested one level deeper than `base_indent`
/// (or the current line's indentation).
///
/// When the current line holds only whitespace the block continues from there at
/// that indentation instead of starting a nested block.
pub fn place_block(out: &mut String, lines: &[String], base_indent: Option<&str>) {
    if lines.is_empty() {
        return;
    }
    let line_start = out.rfind('\n').map_or(0, |i| i + 1);
    let on_own_line = out[line_start..].trim().is_empty();
    let own_indent = current_indent(out);

    let sub_lines = lines.iter().flat_map(|l| l.lines());

    if on_own_line && base_indent.is_none() {
        for (i, line) in sub_lines.enumerate() {
            if i > 0 {
                out.push('\n');
                if !line.is_empty() {
                    out.push_str(&own_indent);
                }
            }
            out.push_str(line);
        }
        return;
    }

    let base = base_indent.map_or(own_indent, str::to_string);
    for line in sub_lines {
        out.push('\n');
        if !line.is_empty() {
            out.push_str(&base);
            out.push_str(INDENT);
            out.push_str(line);
        }
    }
    out.push('\n');
    out.push_str(&base);
}

/// Replaces each occurrence of `placeholder` with `lines` placed as a block.
pub fn expand_block(text: &str, placeholder: &str, lines: &[String]) -> String {
    const MARK: &str = "\u{0}";
    // split on a private marker so each occurrence is placed relative to its own line
    let marked = replace_each_ci(text, placeholder, || MARK.to_string());
    let mut parts = marked.split(MARK);
    let mut out = parts.next().unwrap_or_default().to_string();
    for rest in parts {
        place_block(&mut out, lines, None);
        out.push_str(rest);
    }
    out
}
