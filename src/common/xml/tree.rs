//! A small retained XML tree.
//!
//! Text and attribute values are stored in their escaped form exactly as they
//! appeared in the source, so a parse/write cycle reproduces the content of
//! every element the caller did not touch. Names are kept qualified
//! (`w:style`); namespace resolution is not needed for WordprocessingML parts
//! that always use the conventional prefixes.

use super::escape::{escape_xml, unescape_xml};
use crate::common::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// A node in the retained tree.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    /// Character data, still escaped
    Text(String),
    /// Comments, processing instructions and CDATA sections, verbatim
    Raw(String),
}

impl XmlNode {
    pub fn write_to(&self, out: &mut String) {
        match self {
            XmlNode::Element(e) => e.write_to(out),
            XmlNode::Text(t) | XmlNode::Raw(t) => out.push_str(t),
        }
    }
}

/// An element with its attributes and children in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    pub name: String,
    attrs: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter; `value` is escaped.
    pub fn with_attr(mut self, key: &str, value: &str) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Builder-style child append.
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    /// Unescaped value of an attribute.
    pub fn attr(&self, key: &str) -> Option<String> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| unescape_xml(v))
    }

    pub fn has_attr(&self, key: &str) -> bool {
        self.attrs.iter().any(|(k, _)| k == key)
    }

    /// Set an attribute, keeping its position when it already exists.
    pub fn set_attr(&mut self, key: &str, value: &str) {
        let escaped = escape_xml(value);
        match self.attrs.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = escaped,
            None => self.attrs.push((key.to_string(), escaped)),
        }
    }

    pub fn remove_attr(&mut self, key: &str) {
        self.attrs.retain(|(k, _)| k != key);
    }

    /// Iterate over element children, skipping text and raw nodes.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut XmlElement> {
        self.children.iter_mut().filter_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|e| e.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut XmlElement> {
        self.elements_mut().find(|e| e.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.elements().filter(move |e| e.name == name)
    }

    /// Remove every child element with the given name.
    pub fn remove_children(&mut self, name: &str) {
        self.children
            .retain(|node| !matches!(node, XmlNode::Element(e) if e.name == name));
    }

    pub fn push(&mut self, child: XmlElement) {
        self.children.push(XmlNode::Element(child));
    }

    /// Return the named child, inserting an empty one when missing.
    ///
    /// `order` lists the schema sequence of the parent's children. A new
    /// child goes before the first existing sibling that the sequence places
    /// after it; names absent from `order` sort last.
    pub fn get_or_insert_ordered(&mut self, name: &str, order: &[&str]) -> &mut XmlElement {
        let index = match self.position_of(name) {
            Some(index) => index,
            None => {
                let rank = rank_of(name, order);
                let index = self
                    .children
                    .iter()
                    .position(|node| match node {
                        XmlNode::Element(e) => rank_of(&e.name, order) > rank,
                        _ => false,
                    })
                    .unwrap_or(self.children.len());
                self.children
                    .insert(index, XmlNode::Element(XmlElement::new(name)));
                index
            },
        };

        match &mut self.children[index] {
            XmlNode::Element(e) => e,
            _ => unreachable!(),
        }
    }

    fn position_of(&self, name: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|node| matches!(node, XmlNode::Element(e) if e.name == name))
    }

    /// Concatenated, unescaped text of all descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                XmlNode::Element(e) => e.collect_text(out),
                XmlNode::Text(t) => out.push_str(&unescape_xml(t)),
                XmlNode::Raw(_) => {},
            }
        }
    }

    /// Serialize this element and its subtree.
    pub fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attrs {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(value);
            out.push('"');
        }

        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }

        out.push('>');
        for node in &self.children {
            node.write_to(out);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }

    pub fn to_xml_string(&self) -> String {
        let mut out = String::with_capacity(256);
        self.write_to(&mut out);
        out
    }

    /// Serialize as a standalone part with an XML declaration.
    pub fn to_part_xml(&self) -> String {
        let mut out = String::with_capacity(4096);
        out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        out.push('\n');
        self.write_to(&mut out);
        out
    }
}

fn rank_of(name: &str, order: &[&str]) -> usize {
    order.iter().position(|n| *n == name).unwrap_or(usize::MAX)
}

fn element_from_start(e: &BytesStart<'_>) -> Result<XmlElement> {
    let mut element = XmlElement::new(String::from_utf8_lossy(e.name().as_ref()).into_owned());
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = String::from_utf8_lossy(&attr.value).into_owned();
        element.attrs.push((key, value));
    }
    Ok(element)
}

fn append_text(stack: &mut [XmlElement], text: &str) {
    let Some(top) = stack.last_mut() else {
        return;
    };
    match top.children.last_mut() {
        Some(XmlNode::Text(existing)) => existing.push_str(text),
        _ => top.children.push(XmlNode::Text(text.to_string())),
    }
}

fn append_node(stack: &mut [XmlElement], root: &mut Option<XmlElement>, node: XmlNode) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => match node {
            XmlNode::Element(e) if root.is_none() => *root = Some(e),
            XmlNode::Element(e) => {
                return Err(Error::Xml(format!("second root element <{}>", e.name)));
            },
            // Comments and PIs outside the root are dropped
            _ => {},
        },
    }
    Ok(())
}

/// Parse a complete XML part and return its root element.
pub fn parse_xml(xml: &str) -> Result<XmlElement> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => stack.push(element_from_start(e)?),
            Event::Empty(ref e) => {
                let element = element_from_start(e)?;
                append_node(&mut stack, &mut root, XmlNode::Element(element))?;
            },
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| Error::Xml("unbalanced end tag".to_string()))?;
                append_node(&mut stack, &mut root, XmlNode::Element(element))?;
            },
            Event::Text(ref t) => append_text(&mut stack, &String::from_utf8_lossy(t)),
            Event::GeneralRef(ref r) => {
                append_text(&mut stack, &format!("&{};", String::from_utf8_lossy(r)));
            },
            Event::CData(ref c) => {
                let raw = format!("<![CDATA[{}]]>", String::from_utf8_lossy(c));
                append_node(&mut stack, &mut root, XmlNode::Raw(raw))?;
            },
            Event::Comment(ref c) => {
                let raw = format!("<!--{}-->", String::from_utf8_lossy(c));
                append_node(&mut stack, &mut root, XmlNode::Raw(raw))?;
            },
            Event::PI(ref p) => {
                let raw = format!("<?{}?>", String::from_utf8_lossy(p));
                append_node(&mut stack, &mut root, XmlNode::Raw(raw))?;
            },
            Event::Decl(_) | Event::DocType(_) => {},
            Event::Eof => break,
        }
    }

    if !stack.is_empty() {
        return Err(Error::Xml(format!("unclosed element <{}>", stack[stack.len() - 1].name)));
    }
    root.ok_or_else(|| Error::Xml("document has no root element".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_preserves_content() {
        let xml = r#"<w:styles xmlns:w="urn:w"><!-- keep --><w:style w:type="paragraph" w:styleId="A&amp;B"><w:name w:val="a &amp; b"/><w:t xml:space="preserve"> x &lt; y </w:t></w:style></w:styles>"#;
        let root = parse_xml(xml).unwrap();
        assert_eq!(root.to_xml_string(), xml);
    }

    #[test]
    fn test_attr_is_unescaped_on_read() {
        let root = parse_xml(r#"<a name="Tom &amp; Jerry"/>"#).unwrap();
        assert_eq!(root.attr("name").as_deref(), Some("Tom & Jerry"));
    }

    #[test]
    fn test_set_attr_escapes_and_keeps_position() {
        let mut root = parse_xml(r#"<a x="1" y="2"/>"#).unwrap();
        root.set_attr("x", "<3");
        root.set_attr("z", "4");
        assert_eq!(root.to_xml_string(), r#"<a x="&lt;3" y="2" z="4"/>"#);
    }

    #[test]
    fn test_get_or_insert_ordered() {
        const ORDER: &[&str] = &["w:pStyle", "w:keepNext", "w:spacing", "w:ind", "w:jc"];
        let mut ppr = parse_xml("<w:pPr><w:keepNext/><w:jc/></w:pPr>").unwrap();
        ppr.get_or_insert_ordered("w:spacing", ORDER).set_attr("w:after", "240");
        ppr.get_or_insert_ordered("w:pStyle", ORDER);
        assert_eq!(
            ppr.to_xml_string(),
            r#"<w:pPr><w:pStyle/><w:keepNext/><w:spacing w:after="240"/><w:jc/></w:pPr>"#
        );
        // existing child is reused
        ppr.get_or_insert_ordered("w:spacing", ORDER).set_attr("w:before", "20");
        assert_eq!(ppr.children_named("w:spacing").count(), 1);
    }

    #[test]
    fn test_text_collects_descendants() {
        let root = parse_xml("<p><r><t>Hello</t></r><r><t> &amp; bye</t></r></p>").unwrap();
        assert_eq!(root.text(), "Hello & bye");
    }

    #[test]
    fn test_rejects_unclosed() {
        assert!(parse_xml("<a><b></b>").is_err());
        assert!(parse_xml("").is_err());
    }
}
