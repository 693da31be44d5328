//! Markup query primitives
//!
//! Extraction code only needs four operations over a parsed page: first
//! descendant match, all descendant matches, the next match anywhere after
//! an element in document order, and the element's text.

use scraper::{ElementRef, Html, Selector};

/// First descendant of `scope` matching `selector`
pub fn find_first<'a>(scope: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    scope.select(selector).next()
}

/// All descendants of `scope` matching `selector`, in document order
pub fn find_all<'a>(scope: ElementRef<'a>, selector: &Selector) -> Vec<ElementRef<'a>> {
    scope.select(selector).collect()
}

/// First element after `anchor` in document order that matches `selector`
///
/// The walk starts right after the anchor's opening tag, so the anchor's
/// own descendants are visited before its following siblings. Nesting is
/// irrelevant: a match inside an unrelated later subtree still counts.
pub fn find_following<'a>(anchor: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    let anchor_node = *anchor;
    let anchor_id = anchor_node.id();

    anchor_node
        .tree()
        .root()
        .descendants()
        .skip_while(|node| node.id() != anchor_id)
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|element| selector.matches(element))
}

/// Concatenated text of an element and its descendants
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Text of an element split into lines, one per text node line
pub fn element_lines(element: ElementRef<'_>) -> Vec<String> {
    element
        .text()
        .flat_map(str::lines)
        .map(str::to_string)
        .collect()
}

/// Root element of a parsed document
pub fn document_root(document: &Html) -> ElementRef<'_> {
    document.root_element()
}
