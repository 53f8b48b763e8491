//! Owned snapshot of a parsed page.
//!
//! Pairing rows are decoded by sibling position, so the snapshot keeps every
//! child the HTML parser produced (whitespace text and comments included) in
//! document order.

use scraper::{ElementRef, Html};
use thiserror::Error;

/// Class substring marking one pairing record.
pub const PAIRING_MARKER: &str = "pairing-row";

/// Deepest element nesting a snapshot accepts. Snapshot, walk and drop all
/// recurse per level, so anything deeper is rejected before it is copied.
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("elements nested deeper than {limit} levels")]
pub struct TooDeep {
    pub limit: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomNode {
    Element(ElementNode),
    Text(String),
    /// Comments, doctypes and processing instructions. Kept as placeholders
    /// so positional offsets match the source markup.
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementNode {
    pub name: String,
    pub class: Option<String>,
    pub children: Vec<DomNode>,
}

impl DomNode {
    pub fn children(&self) -> &[DomNode] {
        match self {
            DomNode::Element(el) => &el.children,
            DomNode::Text(_) | DomNode::Other => &[],
        }
    }

    pub fn class(&self) -> Option<&str> {
        match self {
            DomNode::Element(el) => el.class.as_deref(),
            DomNode::Text(_) | DomNode::Other => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            DomNode::Text(text) => Some(text),
            DomNode::Element(_) | DomNode::Other => None,
        }
    }

    pub fn is_pairing(&self) -> bool {
        self.class().is_some_and(|class| class.contains(PAIRING_MARKER))
    }
}

/// Parses a full HTML document and snapshots it from the `<html>` element.
pub fn parse_document(html: &str) -> Result<DomNode, TooDeep> {
    let document = Html::parse_document(html);
    for err in document.errors.iter().take(8) {
        tracing::debug!(error = %err, "html parse recovered");
    }
    let root = document.root_element();
    check_depth(root)?;
    Ok(DomNode::Element(snapshot(root)))
}

/// Iterative depth check over the parser's arena tree.
fn check_depth(root: ElementRef<'_>) -> Result<(), TooDeep> {
    let mut stack = vec![(root, 1usize)];
    while let Some((el, depth)) = stack.pop() {
        if depth > MAX_DEPTH {
            return Err(TooDeep { limit: MAX_DEPTH });
        }
        stack.extend(
            el.children()
                .filter_map(ElementRef::wrap)
                .map(|child| (child, depth + 1)),
        );
    }
    Ok(())
}

fn snapshot(el: ElementRef<'_>) -> ElementNode {
    let children = el
        .children()
        .map(|child| {
            if let Some(child_el) = ElementRef::wrap(child) {
                DomNode::Element(snapshot(child_el))
            } else if let Some(text) = child.value().as_text() {
                let text: &str = text;
                DomNode::Text(text.to_owned())
            } else {
                DomNode::Other
            }
        })
        .collect();
    ElementNode {
        name: el.value().name().to_string(),
        class: el.value().attr("class").map(str::to_string),
        children,
    }
}

/// Pre-order walk that stops descending at the first pairing marker on each
/// branch. Results are in document order.
pub fn find_pairings(root: &DomNode) -> Vec<&DomNode> {
    let mut out = Vec::new();
    walk(root, &mut out);
    out
}

fn walk<'a>(node: &'a DomNode, out: &mut Vec<&'a DomNode>) {
    if node.is_pairing() {
        out.push(node);
        return;
    }
    for child in node.children() {
        walk(child, out);
    }
}
