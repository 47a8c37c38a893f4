//! Grid marker handling and row/column definition synthesis.
//!
//! Templates may wrap `$subprops$` in a `<GRID-PLUS-ROWDEFS>` (or
//! `<GRID-PLUS-ROWDEFS-2COLS>`) pseudo element. The text is split into pieces
//! (plain text, marker open, marker close, sub-property slot) and rebuilt with
//! the markers rendered as `Grid` and the definitions block injected after the
//! opening tag that encloses the slot.

use super::layout::{INDENT, current_indent, place_block};
use super::placeholders::SUB_PROPERTIES;
use crate::profile::{ClassGrouping, GRID_ROWDEFS, GRID_ROWDEFS_2COLS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridKind {
    Rows,
    RowsAndColumns,
}

impl GridKind {
    pub fn for_grouping(grouping: ClassGrouping<'_>) -> Option<Self> {
        match grouping {
            ClassGrouping::GridWithRows => Some(GridKind::Rows),
            ClassGrouping::GridWithRowsAndColumns => Some(GridKind::RowsAndColumns),
            _ => None,
        }
    }
}

/// The `<Grid.RowDefinitions>` block (and column block for [`GridKind::RowsAndColumns`])
/// for `rows` rows, one line per entry, nested with [`INDENT`]. Every row is `Auto`
/// except the last, which takes the remaining space.
pub fn definition_lines(kind: GridKind, rows: usize) -> Vec<String> {
    if rows == 0 {
        return Vec::new();
    }
    let mut lines = vec!["<Grid.RowDefinitions>".to_string()];
    for row in 0..rows {
        let height = if row + 1 == rows { "*" } else { "Auto" };
        lines.push(format!("{INDENT}<RowDefinition Height=\"{height}\" />"));
    }
    lines.push("</Grid.RowDefinitions>".to_string());
    if kind == GridKind::RowsAndColumns {
        lines.push("<Grid.ColumnDefinitions>".to_string());
        lines.push(format!("{INDENT}<ColumnDefinition Width=\"Auto\" />"));
        lines.push(format!("{INDENT}<ColumnDefinition Width=\"*\" />"));
        lines.push("</Grid.ColumnDefinitions>".to_string());
    }
    lines
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Piece<'t> {
    Text(&'t str),
    /// `tail` is everything after the marker name up to and including `>`.
    Open { kind: GridKind, tail: &'t str },
    Close,
    SubProperties,
}

impl Piece<'_> {
    fn is_self_closing_open(&self) -> bool {
        matches!(self, Piece::Open { tail, .. } if tail.trim_end().ends_with("/>"))
    }
}

fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b':')
}

/// Matches a marker name at the start of `lower`, longest token first.
fn marker_at(lower: &str) -> Option<(GridKind, usize)> {
    [
        (GRID_ROWDEFS_2COLS, GridKind::RowsAndColumns),
        (GRID_ROWDEFS, GridKind::Rows),
    ]
    .into_iter()
    .find_map(|(token, kind)| {
        let token = token.to_ascii_lowercase();
        let ends_cleanly = lower
            .as_bytes()
            .get(token.len())
            .is_none_or(|b| !is_name_char(*b));
        (lower.starts_with(&token) && ends_cleanly).then_some((kind, token.len()))
    })
}

fn tokenize(text: &str) -> Vec<Piece<'_>> {
    let lower = text.to_ascii_lowercase();
    let slot = SUB_PROPERTIES.to_ascii_lowercase();
    let mut pieces = Vec::new();
    let mut text_start = 0;
    let mut i = 0;

    while i < text.len() {
        let rest = &lower[i..];
        let found = if rest.starts_with(&slot) {
            Some((Piece::SubProperties, slot.len()))
        } else if let Some(after) = rest.strip_prefix("</") {
            marker_at(after).and_then(|(_, len)| {
                let gt = rest[2 + len..].find('>')?;
                rest[2 + len..2 + len + gt]
                    .trim()
                    .is_empty()
                    .then_some((Piece::Close, 2 + len + gt + 1))
            })
        } else if let Some(after) = rest.strip_prefix('<') {
            marker_at(after).and_then(|(kind, len)| {
                let gt = rest[1 + len..].find('>')?;
                let tail = &text[i + 1 + len..i + 1 + len + gt + 1];
                Some((Piece::Open { kind, tail }, 1 + len + gt + 1))
            })
        } else {
            None
        };

        match found {
            Some((piece, consumed)) => {
                if text_start < i {
                    pieces.push(Piece::Text(&text[text_start..i]));
                }
                pieces.push(piece);
                i += consumed;
                text_start = i;
            }
            None => i += rest.chars().next().map_or(1, char::len_utf8),
        }
    }
    if text_start < text.len() {
        pieces.push(Piece::Text(&text[text_start..]));
    }
    pieces
}

/// Index of the innermost open marker around the first sub-property slot,
/// provided the marker is closed after the slot.
fn enclosing_open(pieces: &[Piece<'_>]) -> Option<usize> {
    let mut open = Vec::new();
    for (idx, piece) in pieces.iter().enumerate() {
        match piece {
            Piece::Open { .. } if !piece.is_self_closing_open() => open.push(idx),
            Piece::Close => {
                open.pop();
            }
            Piece::SubProperties => {
                let candidate = *open.last()?;
                let closed_later = pieces[idx..].iter().any(|p| *p == Piece::Close);
                return closed_later.then_some(candidate);
            }
            _ => {}
        }
    }
    None
}

/// Which definitions the raw template asks for around its `$subprops$`.
pub fn grid_around_sub_properties(raw_template: &str) -> Option<GridKind> {
    let pieces = tokenize(raw_template);
    match pieces.get(enclosing_open(&pieces)?) {
        Some(Piece::Open { kind, .. }) => Some(*kind),
        _ => None,
    }
}

/// Renders grid markers as `Grid`, places `lines` at each sub-property slot and,
/// when the raw template wraps the slot in a marker, injects definitions sized to
/// `lines.len()` after that marker's opening tag.
pub fn expand_sub_properties(raw_template: &str, text: &str, lines: &[String]) -> String {
    let pieces = tokenize(text);
    let target = grid_around_sub_properties(raw_template).and_then(|_| enclosing_open(&pieces));

    let mut out = String::with_capacity(text.len() + lines.iter().map(String::len).sum::<usize>());
    let mut block_indent: Option<String> = None;

    for (idx, piece) in pieces.iter().enumerate() {
        match piece {
            Piece::Text(t) => out.push_str(t),
            Piece::Open { kind, tail } => {
                let indent = current_indent(&out);
                out.push_str("<Grid");
                out.push_str(tail);
                if target == Some(idx) {
                    for line in definition_lines(*kind, lines.len()) {
                        out.push('\n');
                        out.push_str(&indent);
                        out.push_str(INDENT);
                        out.push_str(&line);
                    }
                    block_indent = Some(indent);
                }
            }
            Piece::Close => out.push_str("</Grid>"),
            Piece::SubProperties => place_block(&mut out, lines, block_indent.take().as_deref()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn definitions_for_rows() {
        assert_eq!(
            definition_lines(GridKind::Rows, 3),
            vec![
                "<Grid.RowDefinitions>",
                "    <RowDefinition Height=\"Auto\" />",
                "    <RowDefinition Height=\"Auto\" />",
                "    <RowDefinition Height=\"*\" />",
                "</Grid.RowDefinitions>",
            ]
        );
        assert!(definition_lines(GridKind::Rows, 0).is_empty());
    }

    #[test]
    fn definitions_for_rows_and_columns() {
        let defs = definition_lines(GridKind::RowsAndColumns, 1);
        assert_eq!(defs[1], "    <RowDefinition Height=\"*\" />");
        assert_eq!(
            &defs[3..],
            &[
                "<Grid.ColumnDefinitions>",
                "    <ColumnDefinition Width=\"Auto\" />",
                "    <ColumnDefinition Width=\"*\" />",
                "</Grid.ColumnDefinitions>",
            ]
        );
    }

    #[test]
    fn detects_markers_case_insensitively() {
        assert_eq!(
            grid_around_sub_properties("<grid-plus-rowdefs>$SubProps$</Grid-Plus-RowDefs>"),
            Some(GridKind::Rows)
        );
        assert_eq!(
            grid_around_sub_properties(
                "<GRID-PLUS-ROWDEFS-2COLS Margin=\"4\">$subprops$</GRID-PLUS-ROWDEFS-2COLS>"
            ),
            Some(GridKind::RowsAndColumns)
        );
    }

    #[test]
    fn slot_outside_markers_gets_no_definitions() {
        assert_eq!(
            grid_around_sub_properties("<GRID-PLUS-ROWDEFS></GRID-PLUS-ROWDEFS>$subprops$"),
            None
        );
        assert_eq!(grid_around_sub_properties("<StackPanel>$subprops$</StackPanel>"), None);
        assert_eq!(grid_around_sub_properties("<GRID-PLUS-ROWDEFS>$subprops$"), None);
    }

    #[test]
    fn wraps_sub_properties_in_grid_with_rows() {
        let template = "<GRID-PLUS-ROWDEFS>$subprops$</GRID-PLUS-ROWDEFS>";
        let out = expand_sub_properties(
            template,
            template,
            &lines(&["<A Grid.Row=\"0\" />", "<B Grid.Row=\"1\" />"]),
        );
        assert_eq!(
            out,
            "<Grid>
    <Grid.RowDefinitions>
        <RowDefinition Height=\"Auto\" />
        <RowDefinition Height=\"*\" />
    </Grid.RowDefinitions>
    <A Grid.Row=\"0\" />
    <B Grid.Row=\"1\" />
</Grid>"
        );
    }

    #[test]
    fn marker_attributes_are_kept() {
        let template = "<GRID-PLUS-ROWDEFS-2COLS Margin=\"4\">$subprops$</GRID-PLUS-ROWDEFS-2COLS>";
        let out = expand_sub_properties(template, template, &lines(&["<A />"]));
        assert_eq!(
            out,
            "<Grid Margin=\"4\">
    <Grid.RowDefinitions>
        <RowDefinition Height=\"*\" />
    </Grid.RowDefinitions>
    <Grid.ColumnDefinitions>
        <ColumnDefinition Width=\"Auto\" />
        <ColumnDefinition Width=\"*\" />
    </Grid.ColumnDefinitions>
    <A />
</Grid>"
        );
    }

    #[test]
    fn plain_container_just_nests_lines() {
        let template = "<StackPanel>$subprops$</StackPanel>";
        assert_eq!(
            expand_sub_properties(template, template, &lines(&["<A />"])),
            "<StackPanel>\n    <A />\n</StackPanel>"
        );
    }

    #[test]
    fn similar_element_names_are_not_markers() {
        let text = "<GRID-PLUS-ROWDEFSX>$subprops$</GRID-PLUS-ROWDEFSX>";
        assert_eq!(
            expand_sub_properties(text, text, &[]),
            "<GRID-PLUS-ROWDEFSX></GRID-PLUS-ROWDEFSX>"
        );
    }
}
