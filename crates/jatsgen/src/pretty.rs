//! Deterministic indentation for composed trees.
//!
//! [`indent`] rewrites the whitespace-only text and tails of a tree so that it serializes as
//! two-space indented markup, one element per line. Text that carries content is never
//! touched, so running it again over its own output changes nothing.
//!
//! # Examples
//!
//! ```
//! use jatsgen::{element::Element, pretty::indent};
//!
//! let mut root = Element::new("abstract");
//! root.push_text("p", "null");
//! indent(&mut root);
//! assert_eq!(root.to_xml(), "<abstract>\n  <p>null</p>\n</abstract>");
//! ```

use super::*;

/// One level of indentation.
const INDENT: &str = "  ";

/// Indents `root` in place.
pub fn indent(root: &mut Element) { indent_at(root, 0); }

/// Whether a text slot may be overwritten with layout whitespace.
fn is_blank(slot: &Option<String>) -> bool {
  slot.as_deref().map_or(true, |text| text.trim().is_empty())
}

/// Newline followed by `level` indents.
fn line(level: usize) -> String { format!("\n{}", INDENT.repeat(level)) }

/// Indents `element`, which sits `level` levels below the root.
fn indent_at(element: &mut Element, level: usize) {
  if element.children.is_empty() {
    if level > 0 && is_blank(&element.tail) {
      element.tail = Some(line(level));
    }
    return;
  }

  if is_blank(&element.text) {
    element.text = Some(line(level + 1));
  }

  let last = element.children.len() - 1;
  for (i, child) in element.children.iter_mut().enumerate() {
    indent_at(child, level + 1);
    if is_blank(&child.tail) {
      child.tail = Some(if i < last { line(level + 1) } else { line(level) });
    }
  }
}
