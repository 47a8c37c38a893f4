//! Single-pass element scanner.
//!
//! Opening tags of interest are pushed onto a stack; a closing tag pops the most
//! recently opened element with the same name, wherever it sits in the stack.
//! Nested elements of the same name therefore pair innermost-first, and an
//! element that is never closed never shadows the ones around it.

use std::sync::atomic::{AtomicBool, Ordering};

use log::trace;

use crate::cursor::Cursor;
use crate::handler::{ElementMatch, HandlerTable, ScanRecord};
use crate::span::Span;

#[derive(Debug, Clone, Copy)]
struct OpenElement<'t> {
    start: usize,
    name: &'t str,
    indent: &'t str,
}

/// How a tag ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagEnd {
    Open,
    SelfClosing,
    /// The tag ran into another `<` or the end of input before its `>`.
    Unterminated,
}

fn is_name_byte(b: u8) -> bool {
    !(b.is_ascii_whitespace() || matches!(b, b'<' | b'>' | b'/' | b'=' | b'"' | b'\''))
}

fn leading_whitespace(line: &str) -> &str {
    let trimmed = line.trim_start_matches([' ', '\t']);
    &line[..line.len() - trimmed.len()]
}

pub struct Scanner<'t, 'h, R> {
    cur: Cursor<'t>,
    handlers: &'h HandlerTable<R>,
    open: Vec<OpenElement<'t>>,
    /// Name of the most recently opened element, tracked or not.
    last_opened: &'t str,
    records: Vec<ScanRecord<R>>,
}

impl<'t, 'h, R> Scanner<'t, 'h, R> {
    pub fn new(text: &'t str, handlers: &'h HandlerTable<R>) -> Self {
        Self {
            cur: Cursor::new(text),
            handlers,
            open: Vec::new(),
            last_opened: "",
            records: Vec::new(),
        }
    }

    /// Scans to the end of input.
    pub fn run(mut self) -> Vec<ScanRecord<R>> {
        while self.step() {}
        self.finish()
    }

    /// Scans to the end of input unless `cancel` is raised first, in which case
    /// nothing is returned.
    pub fn run_cancellable(mut self, cancel: &AtomicBool) -> Option<Vec<ScanRecord<R>>> {
        loop {
            if cancel.load(Ordering::Relaxed) {
                trace!("scan cancelled at byte {}", self.cur.pos());
                return None;
            }
            if !self.step() {
                return Some(self.finish());
            }
        }
    }

    fn finish(self) -> Vec<ScanRecord<R>> {
        for element in &self.open {
            trace!("dropping unclosed <{}> at {}", element.name, element.start);
        }
        self.records
    }

    /// Consumes one tag, comment or text byte. Returns false at end of input.
    fn step(&mut self) -> bool {
        let Some(b) = self.cur.peek() else {
            return false;
        };
        if b != b'<' {
            self.cur.bump();
        } else if self.cur.starts_with(b"<!--") {
            self.cur.bump_n(4);
            self.cur.skip_past("-->");
        } else if self.cur.starts_with(b"<![CDATA[") {
            self.cur.skip_past("]]>");
        } else {
            self.tag();
        }
        true
    }

    fn tag(&mut self) {
        let start = self.cur.pos();
        self.cur.bump();
        let closing = self.cur.peek() == Some(b'/');
        if closing {
            self.cur.bump();
        }

        let name_start = self.cur.pos();
        self.cur.bump_while(is_name_byte);
        let name = self.cur.slice_from(name_start);

        if !closing {
            if name.is_empty() {
                // A lone `<` in text.
                return;
            }
            self.last_opened = name;
            if self.handlers.is_tracked(name) {
                trace!("push <{name}> at {start}");
                self.open.push(OpenElement {
                    start,
                    name,
                    indent: self.indent_at(start),
                });
            }
        }

        match self.tag_rest() {
            TagEnd::Unterminated => {}
            TagEnd::Open if closing => {
                let name = if name.is_empty() { self.last_opened } else { name };
                self.close(name);
            }
            TagEnd::SelfClosing => self.close(name),
            TagEnd::Open => {}
        }
    }

    /// Skips attributes up to and including the tag's `>`.
    fn tag_rest(&mut self) -> TagEnd {
        let mut quote: Option<u8> = None;
        while let Some(b) = self.cur.peek() {
            match (b, quote) {
                (b'"' | b'\'', None) => quote = Some(b),
                (b'"' | b'\'', Some(q)) if q == b => quote = None,
                (b'>', None) => {
                    self.cur.bump();
                    return TagEnd::Open;
                }
                (b'/', None) if self.cur.starts_with(b"/>") => {
                    self.cur.bump_n(2);
                    return TagEnd::SelfClosing;
                }
                (b'<', None) => return TagEnd::Unterminated,
                _ => {}
            }
            self.cur.bump();
        }
        TagEnd::Unterminated
    }

    /// Pops the most recent open element called `name` and hands it to its handlers.
    fn close(&mut self, name: &str) {
        let Some(idx) = self.open.iter().rposition(|e| e.name == name) else {
            return;
        };
        let element = self.open.remove(idx);
        let text = self.cur.s;
        let handlers = self.handlers;
        let span = Span::new(element.start, self.cur.pos());
        trace!("pop <{}> {}..{}", element.name, span.start, span.end);

        let found = ElementMatch {
            name: element.name,
            span,
            body: &text[span.start..span.end],
            indent: element.indent,
        };
        for handler in handlers.handlers_for(element.name) {
            self.records.push(ScanRecord {
                span,
                element_name: element.name.to_string(),
                result: handler.handle(&found),
            });
        }
    }

    fn indent_at(&self, pos: usize) -> &'t str {
        let text = self.cur.s;
        let line_start = text[..pos].rfind('\n').map_or(0, |i| i + 1);
        leading_whitespace(&text[line_start..pos])
    }
}

/// Runs every registered handler over each completed element of interest,
/// in order of completion.
pub fn scan_markup<R>(text: &str, handlers: &HandlerTable<R>) -> Vec<ScanRecord<R>> {
    Scanner::new(text, handlers).run()
}

/// Like [`scan_markup`], returning `None` if `cancel` is raised before the scan ends.
pub fn scan_markup_cancellable<R>(
    text: &str,
    handlers: &HandlerTable<R>,
    cancel: &AtomicBool,
) -> Option<Vec<ScanRecord<R>>> {
    Scanner::new(text, handlers).run_cancellable(cancel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn spans(text: &str, names: &[&str]) -> Vec<(String, usize, usize)> {
        let mut table = HandlerTable::new();
        for name in names {
            table.register(*name, |_: &ElementMatch<'_>| ());
        }
        scan_markup(text, &table)
            .into_iter()
            .map(|r| (r.element_name, r.span.start, r.span.end))
            .collect()
    }

    #[rstest]
    #[case("", "")]
    #[case("    <Grid>", "    ")]
    #[case("a\n\t<Grid>", "\t")]
    #[case("a\n  x <Grid>", "  ")]
    fn indentation_of_line(#[case] before: &str, #[case] expected: &str) {
        let text = format!("{before}</Grid>");
        let table: HandlerTable<()> = HandlerTable::new();
        let scanner = Scanner::new(&text, &table);
        let pos = before.rfind('<').unwrap_or(before.len());
        assert_eq!(scanner.indent_at(pos), expected);
    }

    #[test]
    fn simple_element() {
        assert_eq!(spans("x<Grid></Grid>y", &["Grid"]), vec![("Grid".into(), 1, 14)]);
    }

    #[test]
    fn untracked_elements_are_ignored() {
        assert_eq!(spans("<StackPanel><TextBlock /></StackPanel>", &["Grid"]), vec![]);
    }

    #[test]
    fn self_closing_tracked_element() {
        assert_eq!(spans("<Grid />", &["Grid"]), vec![("Grid".into(), 0, 8)]);
        assert_eq!(spans("<Grid/>", &["Grid"]), vec![("Grid".into(), 0, 7)]);
    }

    #[test]
    fn quoted_values_may_contain_markup_characters() {
        let text = r#"<Grid Tag="a > b" Other='</Grid>'></Grid>"#;
        assert_eq!(spans(text, &["Grid"]), vec![("Grid".into(), 0, text.len())]);
    }

    #[test]
    fn slash_inside_attribute_value_is_not_self_closing() {
        let text = r#"<Image Source="/Assets/a.png"></Image>"#;
        assert_eq!(spans(text, &["Image"]), vec![("Image".into(), 0, text.len())]);
    }

    #[test]
    fn blank_close_name_uses_last_opened() {
        assert_eq!(spans("<Grid></>", &["Grid"]), vec![("Grid".into(), 0, 9)]);
    }

    #[test]
    fn cdata_is_skipped() {
        assert_eq!(spans("<![CDATA[<Grid></Grid>]]>", &["Grid"]), vec![]);
    }

    #[test]
    fn lone_angle_bracket_in_text() {
        assert_eq!(spans("a < b <Grid></Grid>", &["Grid"]), vec![("Grid".into(), 6, 19)]);
    }

    #[test]
    fn cancelled_scan_returns_nothing() {
        let table = HandlerTable::new().with("Grid", |_: &ElementMatch<'_>| ());
        let cancel = AtomicBool::new(true);
        assert!(scan_markup_cancellable("<Grid></Grid>", &table, &cancel).is_none());

        let cancel = AtomicBool::new(false);
        let records = scan_markup_cancellable("<Grid></Grid>", &table, &cancel);
        assert_eq!(records.map(|r| r.len()), Some(1));
    }
}
