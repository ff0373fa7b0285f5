//! An owned, order-preserving XML element tree.
//!
//! Composition copies whole subtrees (author lists, publication dates) from the source record
//! into the output untouched, and both the pretty printer and the template splicer work by
//! rewriting the whitespace around elements. Both needs call for a tree that keeps text the
//! way the markup had it, so every [`Element`] carries its own `text` (before the first
//! child) and `tail` (after its closing tag, before the next sibling).
//!
//! Parsing is built on `quick_xml`'s event reader. Serialization writes ElementTree-style
//! markup: no declaration, attributes in insertion order, `<tag />` for empty elements.
//!
//! # Examples
//!
//! ```
//! use jatsgen::element::Element;
//!
//! # fn example() -> Result<(), jatsgen::errors::JatsError> {
//! let root = Element::parse(r#"<Journal><Issn>2821-370X</Issn><Volume/></Journal>"#)?;
//! assert_eq!(root.child("Issn").and_then(|e| e.text()), Some("2821-370X"));
//! assert_eq!(root.to_xml(), "<Journal><Issn>2821-370X</Issn><Volume /></Journal>");
//! # Ok(())
//! # }
//! ```

use quick_xml::{
  escape::{escape, partial_escape},
  events::{BytesStart, Event},
  Reader,
};

use super::*;

/// A single XML element with its attributes, text, tail and children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
  /// The element name, including any namespace prefix as written
  pub tag:        String,
  /// Attributes in document order
  pub attributes: Vec<(String, String)>,
  /// Character data between the start tag and the first child (or the end tag)
  pub text:       Option<String>,
  /// Character data between the end tag and the next sibling (or the parent's end tag)
  pub tail:       Option<String>,
  /// Child elements in document order
  pub children:   Vec<Element>,
}

impl Element {
  /// Creates an empty element.
  pub fn new(tag: impl Into<String>) -> Self { Self { tag: tag.into(), ..Self::default() } }

  /// Builder: adds an attribute.
  pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.attributes.push((name.into(), value.into()));
    self
  }

  /// Builder: sets the text.
  pub fn with_text(mut self, text: impl Into<String>) -> Self {
    self.text = Some(text.into());
    self
  }

  /// Appends a child and returns a handle to it.
  pub fn push(&mut self, child: Element) -> &mut Element {
    self.children.push(child);
    let last = self.children.len() - 1;
    &mut self.children[last]
  }

  /// Appends a leaf child carrying `text`.
  pub fn push_text(&mut self, tag: &str, text: impl Into<String>) -> &mut Element {
    self.push(Element::new(tag).with_text(text))
  }

  /// The element's own text, if any.
  pub fn text(&self) -> Option<&str> { self.text.as_deref() }

  /// Looks up an attribute value.
  pub fn attr(&self, name: &str) -> Option<&str> {
    self.attributes.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
  }

  /// The first direct child with the given tag.
  pub fn child(&self, tag: &str) -> Option<&Element> {
    self.children.iter().find(|child| child.tag == tag)
  }

  /// The first descendant (excluding `self`), in document order, with the given tag.
  pub fn find(&self, tag: &str) -> Option<&Element> { self.find_where(&|e| e.tag == tag) }

  /// The first descendant with the given tag whose attribute `name` equals `value`.
  pub fn find_with_attr(&self, tag: &str, name: &str, value: &str) -> Option<&Element> {
    self.find_where(&|e| e.tag == tag && e.attr(name) == Some(value))
  }

  /// Depth-first, pre-order search of the descendants.
  fn find_where(&self, predicate: &dyn Fn(&Element) -> bool) -> Option<&Element> {
    self.children.iter().find_map(|child| {
      if predicate(child) {
        Some(child)
      } else {
        child.find_where(predicate)
      }
    })
  }

  /// The text of the first descendant with the given tag, or `""` if that element has no
  /// text. `None` if no such element exists.
  pub fn find_text(&self, tag: &str) -> Option<&str> {
    self.find(tag).map(|e| e.text().unwrap_or_default())
  }

  /// All character data inside the element, excluding its own tail.
  pub fn text_content(&self) -> String {
    let mut out = String::new();
    self.collect_text(&mut out);
    out
  }

  /// Helper for [`Element::text_content`].
  fn collect_text(&self, out: &mut String) {
    if let Some(text) = &self.text {
      out.push_str(text);
    }
    for child in &self.children {
      child.collect_text(out);
      if let Some(tail) = &child.tail {
        out.push_str(tail);
      }
    }
  }

  /// Parses a document and returns its root element.
  ///
  /// The declaration, comments, processing instructions and doctype are dropped; CDATA is
  /// kept as text. Character data outside the root element is discarded.
  ///
  /// # Errors
  ///
  /// Returns [`JatsError::Xml`] for malformed markup and [`JatsError::MalformedXml`] when the
  /// document has no root or leaves elements unclosed.
  pub fn parse(xml: &str) -> Result<Element, JatsError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
      match reader.read_event()? {
        Event::Start(start) => stack.push(start_element(&start)?),
        Event::Empty(start) => {
          let element = start_element(&start)?;
          close_element(element, &mut stack, &mut root);
        },
        Event::End(_) => {
          let element = stack
            .pop()
            .ok_or_else(|| JatsError::MalformedXml("unexpected closing tag".to_string()))?;
          close_element(element, &mut stack, &mut root);
        },
        Event::Text(text) => append_text(&mut stack, &text.unescape()?),
        Event::CData(data) =>
          append_text(&mut stack, &String::from_utf8_lossy(&data.into_inner())),
        Event::Eof => break,
        _ => (),
      }
    }

    if !stack.is_empty() {
      return Err(JatsError::MalformedXml(format!("{} unclosed element(s)", stack.len())));
    }
    root.ok_or_else(|| JatsError::MalformedXml("no root element".to_string()))
  }

  /// Serializes the element, its descendants and its tail.
  pub fn to_xml(&self) -> String {
    let mut out = String::new();
    self.write_xml(&mut out);
    out
  }

  /// Helper for [`Element::to_xml`].
  fn write_xml(&self, out: &mut String) {
    out.push('<');
    out.push_str(&self.tag);
    for (name, value) in &self.attributes {
      out.push(' ');
      out.push_str(name);
      out.push_str("=\"");
      out.push_str(&escape(value.as_str()));
      out.push('"');
    }

    let text = self.text.as_deref().filter(|t| !t.is_empty());
    if text.is_none() && self.children.is_empty() {
      out.push_str(" />");
    } else {
      out.push('>');
      if let Some(text) = text {
        out.push_str(&partial_escape(text));
      }
      for child in &self.children {
        child.write_xml(out);
      }
      out.push_str("</");
      out.push_str(&self.tag);
      out.push('>');
    }

    if let Some(tail) = &self.tail {
      out.push_str(&partial_escape(tail.as_str()));
    }
  }
}

/// Builds an element (without children) from a start or empty tag.
fn start_element(start: &BytesStart) -> Result<Element, JatsError> {
  let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()));
  for attr in start.attributes() {
    let attr = attr.map_err(quick_xml::Error::from)?;
    let name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
    let value = attr.unescape_value()?.into_owned();
    element.attributes.push((name, value));
  }
  Ok(element)
}

/// Attaches a finished element to its parent, or makes it the root.
fn close_element(element: Element, stack: &mut [Element], root: &mut Option<Element>) {
  match stack.last_mut() {
    Some(parent) => parent.children.push(element),
    None =>
      if root.is_none() {
        *root = Some(element);
      },
  }
}

/// Routes character data to the open element's text or to its last child's tail.
fn append_text(stack: &mut [Element], data: &str) {
  let Some(open) = stack.last_mut() else {
    return;
  };
  let slot = match open.children.last_mut() {
    Some(last) => &mut last.tail,
    None => &mut open.text,
  };
  slot.get_or_insert_with(String::new).push_str(data);
}

#[cfg(test)]
mod tests {
  use super::*;

  const RECORD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- exported -->
<ArticleSet>
  <Article>
    <ELocationID EIdType="pii">x1</ELocationID>
    <ELocationID EIdType="doi">10.1/abc</ELocationID>
    <Abstract>Fish &amp; chips <i>now</i> served</Abstract>
  </Article>
</ArticleSet>"#;

  #[test]
  fn test_parse_keeps_text_and_tails() -> anyhow::Result<()> {
    let root = Element::parse(RECORD)?;
    assert_eq!(root.tag, "ArticleSet");
    assert_eq!(root.text(), Some("\n  "));
    let article = root.child("Article").unwrap();
    assert_eq!(article.tail.as_deref(), Some("\n"));
    let abstract_elem = article.child("Abstract").unwrap();
    assert_eq!(abstract_elem.text(), Some("Fish & chips "));
    assert_eq!(abstract_elem.children[0].tail.as_deref(), Some(" served"));
    assert_eq!(abstract_elem.text_content(), "Fish & chips now served");
    Ok(())
  }

  #[test]
  fn test_find_by_attribute_in_document_order() -> anyhow::Result<()> {
    let root = Element::parse(RECORD)?;
    assert_eq!(root.find("ELocationID").and_then(|e| e.text()), Some("x1"));
    let doi = root.find_with_attr("ELocationID", "EIdType", "doi").unwrap();
    assert_eq!(doi.text(), Some("10.1/abc"));
    assert!(root.find_with_attr("ELocationID", "EIdType", "isbn").is_none());
    assert_eq!(root.find_text("Volume"), None);
    Ok(())
  }

  #[test]
  fn test_serialize_escapes_and_short_empty_tags() {
    let mut root = Element::new("Keywords").with_attr("note", "a \"b\" & c");
    root.push_text("Keyword", "x < y");
    root.push(Element::new("Empty"));
    root.push_text("Blank", "");
    assert_eq!(
      root.to_xml(),
      "<Keywords note=\"a &quot;b&quot; &amp; c\"><Keyword>x &lt; y</Keyword><Empty /><Blank \
       /></Keywords>"
    );
  }

  #[test]
  fn test_round_trip_preserves_markup() -> anyhow::Result<()> {
    let xml = "<a x=\"1\">\n  <b>t</b>\n  <c />\n</a>";
    assert_eq!(Element::parse(xml)?.to_xml(), xml);
    Ok(())
  }

  #[test]
  fn test_malformed_documents() {
    assert!(matches!(Element::parse(""), Err(JatsError::MalformedXml(_))));
    assert!(Element::parse("<a><b></a>").is_err());
    assert!(Element::parse("<a><b>").is_err());
  }
}
