//! Splicing a composed document into the `<front>` region of a template.
//!
//! The template is treated as opaque text: everything before the first `<front>` and after
//! the first `</front>` is kept byte for byte, and the region between them (markers
//! included) is replaced by a freshly laid out `<front><Article>…</Article></front>` block
//! built from the composed document's `Journal-meta` and `article-meta` sections.
//!
//! # Examples
//!
//! ```
//! use jatsgen::splice::splice;
//!
//! # fn example() -> Result<(), jatsgen::errors::JatsError> {
//! let fragment = "<Article><Journal-meta><Issn>1</Issn></Journal-meta></Article>";
//! let combined = splice(fragment, "<doc><front>old</front><body /></doc>")?;
//! assert_eq!(
//!   combined,
//!   "<doc><front>\n  <Article>\n    <Journal-meta>\n      <Issn>1</Issn>\n    </Journal-meta>\n    \
//!    </Article>\n</front><body /></doc>"
//! );
//! # Ok(())
//! # }
//! ```

use super::*;

/// Opening anchor marker.
const FRONT_START: &str = "<front>";

/// Closing anchor marker.
const FRONT_END: &str = "</front>";

/// Depth of the copied section contents inside the `<front>` block.
const SECTION_DEPTH: usize = 3;

/// Replaces the template's `<front>` region with the composed document.
///
/// # Errors
///
/// [`JatsError::MissingAnchor`] if either marker is missing, [`JatsError::AnchorOrder`] if
/// `</front>` comes first, or an XML error if `fragment` is not well formed.
pub fn splice(fragment: &str, template: &str) -> Result<String, JatsError> {
  let root = Element::parse(fragment)?;
  splice_tree(&root, template)
}

/// Replaces the template's `<front>` region with an already parsed composed document.
///
/// See [`splice`].
pub fn splice_tree(root: &Element, template: &str) -> Result<String, JatsError> {
  let start = template.find(FRONT_START).ok_or(JatsError::MissingAnchor(FRONT_START))?;
  let end = template.find(FRONT_END).ok_or(JatsError::MissingAnchor(FRONT_END))?;
  if end < start {
    return Err(JatsError::AnchorOrder);
  }
  debug!("Replacing template bytes {start}..{} with front matter", end + FRONT_END.len());

  let front = build_front(root).to_xml();
  Ok([&template[..start], front.as_str(), &template[end + FRONT_END.len()..]].concat())
}

/// Builds the `<front>` block from a composed document.
///
/// Sections missing from `root` are left out.
pub fn build_front(root: &Element) -> Element {
  let mut front = Element::new("front").with_text("\n  ");
  let article = front.push(Element::new("Article").with_text("\n    "));
  article.tail = Some("\n".to_string());

  for (tag, tail) in [("Journal-meta", "\n    "), ("article-meta", "\n  ")] {
    let Some(section) = root.child(tag) else {
      trace!("Composed document has no {tag} section");
      continue;
    };
    let copy = article.push(Element::new(tag).with_text("\n      "));
    copy_children(section, copy, SECTION_DEPTH);
    if let Some(last) = copy.children.last_mut() {
      last.tail = Some(line(SECTION_DEPTH - 1));
    }
    copy.tail = Some(tail.to_string());
  }
  front
}

/// Copies the children of `source` into `target`, laying them out at `depth`.
///
/// Leaf text and attributes are kept; the source layout whitespace is not.
fn copy_children(source: &Element, target: &mut Element, depth: usize) {
  for child in &source.children {
    let mut copy = Element::new(child.tag.as_str());
    copy.attributes = child.attributes.clone();
    copy.text = child.text.clone().filter(|text| !text.is_empty());
    copy.tail = Some(line(depth));

    if !child.children.is_empty() {
      copy.text = Some(line(depth + 1));
      copy_children(child, &mut copy, depth + 1);
      if let Some(last) = copy.children.last_mut() {
        last.tail = Some(line(depth));
      }
    }
    target.children.push(copy);
  }
}

/// Newline followed by `depth` two-space indents.
fn line(depth: usize) -> String { format!("\n{}", "  ".repeat(depth)) }
