//! What the scanner calls when an element of interest completes.

use std::collections::HashMap;
use std::fmt;

use crate::span::Span;

/// A completed element, from the `<` of its opening tag to the `>` of its closing tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementMatch<'t> {
    pub name: &'t str,
    pub span: Span,
    /// The full text of the element, tags included.
    pub body: &'t str,
    /// Leading whitespace of the line the element opened on.
    pub indent: &'t str,
}

/// Produces a result for a completed element.
///
/// Any `Fn(&ElementMatch) -> R` is a handler.
pub trait ElementHandler<R> {
    fn handle(&self, element: &ElementMatch<'_>) -> R;
}

impl<R, F> ElementHandler<R> for F
where
    F: Fn(&ElementMatch<'_>) -> R,
{
    fn handle(&self, element: &ElementMatch<'_>) -> R {
        self(element)
    }
}

/// Element names of interest and the handlers registered for each.
///
/// Names are matched exactly; several handlers may share a name and run in
/// registration order.
pub struct HandlerTable<R> {
    by_name: HashMap<String, Vec<Box<dyn ElementHandler<R>>>>,
}

impl<R> Default for HandlerTable<R> {
    fn default() -> Self {
        Self {
            by_name: HashMap::new(),
        }
    }
}

impl<R> fmt::Debug for HandlerTable<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.element_names().collect();
        names.sort_unstable();
        f.debug_struct("HandlerTable").field("elements", &names).finish()
    }
}

impl<R> HandlerTable<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        element: impl Into<String>,
        handler: impl ElementHandler<R> + 'static,
    ) -> &mut Self {
        self.by_name
            .entry(element.into())
            .or_default()
            .push(Box::new(handler));
        self
    }

    /// Builder form of [`HandlerTable::register`].
    pub fn with(
        mut self,
        element: impl Into<String>,
        handler: impl ElementHandler<R> + 'static,
    ) -> Self {
        self.register(element, handler);
        self
    }

    pub fn is_tracked(&self, element: &str) -> bool {
        self.by_name.get(element).is_some_and(|h| !h.is_empty())
    }

    pub fn handlers_for(&self, element: &str) -> &[Box<dyn ElementHandler<R>>] {
        self.by_name.get(element).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn element_names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.values().all(Vec::is_empty)
    }
}

/// One handler's result for one completed element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRecord<R> {
    pub span: Span,
    pub element_name: String,
    pub result: R,
}
