//! # xamlgen-markup
//!
//! Finds elements of interest in XAML text without building a tree.
//!
//! The scanner makes one pass, tracking only the element names that have
//! handlers. Nested elements with the same name pair correctly, and comments,
//! CDATA and quoted attribute values are never mistaken for tags. Malformed
//! input never fails the scan: closing tags with no matching open element are
//! ignored, and elements still open at the end are dropped.
//!
//! ```
//! use xamlgen_markup::{ElementMatch, HandlerTable, scan_markup};
//!
//! let xaml = "<Grid>\n    <Grid></Grid>\n</Grid>";
//! let table = HandlerTable::new().with("Grid", |m: &ElementMatch<'_>| m.indent.len());
//!
//! let found: Vec<_> = scan_markup(xaml, &table)
//!     .into_iter()
//!     .map(|r| (r.span.start, r.span.end, r.result))
//!     .collect();
//! assert_eq!(found, vec![(11, 24, 4), (0, 32, 0)]);
//! ```

pub mod cursor;
pub mod handler;
pub mod scanner;
pub mod span;

pub use handler::{ElementHandler, ElementMatch, HandlerTable, ScanRecord};
pub use scanner::{Scanner, scan_markup, scan_markup_cancellable};
pub use span::Span;
