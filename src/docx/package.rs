//! OPC package reading and writing.
//!
//! A package is held as an ordered list of named parts. Relationship and
//! content-type parts get small typed wrappers over the retained XML tree;
//! every other part is opaque bytes.

use super::constants::{content_type as ct, namespace as ns};
use crate::common::xml::{XmlElement, XmlNode, parse_xml};
use crate::common::{Error, Result};
use std::io::{Cursor, Read, Write};
use zip::ZipArchive;
use zip::write::{SimpleFileOptions, ZipWriter};

pub(crate) const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
pub(crate) const PACKAGE_RELS_PART: &str = "_rels/.rels";

/// A named part of the package.
#[derive(Debug, Clone)]
struct Part {
    name: String,
    data: Vec<u8>,
}

/// An in-memory OPC package.
#[derive(Debug, Clone, Default)]
pub(crate) struct Package {
    parts: Vec<Part>,
}

impl Package {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Read every part of a ZIP archive, keeping archive order.
    pub(crate) fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| Error::InvalidTemplate(format!("not a ZIP package: {}", e)))?;
        let mut parts = Vec::with_capacity(archive.len());

        for index in 0..archive.len() {
            let mut file = archive.by_index(index)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().trim_start_matches('/').to_string();
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)?;
            parts.push(Part { name, data });
        }

        Ok(Self { parts })
    }

    pub(crate) fn get(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.data.as_slice())
    }

    /// Part content as UTF-8 text.
    pub(crate) fn get_str(&self, name: &str) -> Result<Option<&str>> {
        match self.get(name) {
            Some(data) => Ok(Some(std::str::from_utf8(strip_bom(data))?)),
            None => Ok(None),
        }
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.parts.iter().any(|p| p.name == name)
    }

    /// Replace a part's content, or append the part when new.
    pub(crate) fn set(&mut self, name: &str, data: Vec<u8>) {
        match self.parts.iter_mut().find(|p| p.name == name) {
            Some(part) => part.data = data,
            None => self.parts.push(Part {
                name: name.to_string(),
                data,
            }),
        }
    }

    /// Write the package as a ZIP archive, content types first.
    #[cfg(test)]
    pub(crate) fn to_bytes(&self) -> Result<Vec<u8>> {
        self.to_bytes_with(&[])
    }

    /// Write the package with some parts replaced (or added) by `updates`.
    pub(crate) fn to_bytes_with(&self, updates: &[(&str, &[u8])]) -> Result<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        let updated = |name: &str| {
            updates
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, data)| *data)
        };
        let mut entries: Vec<(&str, &[u8])> = self
            .parts
            .iter()
            .map(|p| (p.name.as_str(), updated(&p.name).unwrap_or(&p.data)))
            .collect();
        for &(name, data) in updates {
            if !self.contains(name) {
                entries.push((name, data));
            }
        }
        entries.sort_by_key(|(name, _)| *name != CONTENT_TYPES_PART);

        for (name, data) in entries {
            writer.start_file(name, options)?;
            writer.write_all(data)?;
        }

        Ok(writer.finish()?.into_inner())
    }
}

fn strip_bom(data: &[u8]) -> &[u8] {
    data.strip_prefix(b"\xEF\xBB\xBF".as_slice()).unwrap_or(data)
}

/// Name of the relationships part belonging to `part`.
///
/// `word/document.xml` maps to `word/_rels/document.xml.rels`.
pub(crate) fn rels_part_name(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}

/// Resolve a relationship target against the part that owns it.
pub(crate) fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = match source_part.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    for segment in target.split('/') {
        match segment {
            "" | "." => {},
            ".." => {
                segments.pop();
            },
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// A relationships part (`*.rels`).
#[derive(Debug, Clone)]
pub(crate) struct Relationships {
    root: XmlElement,
}

impl Relationships {
    pub(crate) fn new() -> Self {
        Self {
            root: XmlElement::new("Relationships").with_attr("xmlns", ns::OPC_RELATIONSHIPS),
        }
    }

    pub(crate) fn from_xml(xml: &str) -> Result<Self> {
        let root = parse_xml(xml)?;
        if root.name != "Relationships" {
            return Err(Error::InvalidTemplate(format!(
                "relationships part has root <{}>",
                root.name
            )));
        }
        Ok(Self { root })
    }

    /// Target of the first relationship of `rel_type`.
    pub(crate) fn target_of(&self, rel_type: &str) -> Option<String> {
        self.root
            .children_named("Relationship")
            .find(|r| r.attr("Type").as_deref() == Some(rel_type))
            .and_then(|r| r.attr("Target"))
    }

    /// Add an internal relationship and return its new ID.
    pub(crate) fn add(&mut self, rel_type: &str, target: &str) -> String {
        let id = self.next_id();
        self.root.push(
            XmlElement::new("Relationship")
                .with_attr("Id", &id)
                .with_attr("Type", rel_type)
                .with_attr("Target", target),
        );
        id
    }

    /// Highest `rIdN` plus one.
    fn next_id(&self) -> String {
        let max = self
            .root
            .children_named("Relationship")
            .filter_map(|r| r.attr("Id"))
            .filter_map(|id| id.strip_prefix("rId").and_then(|n| n.parse::<u32>().ok()))
            .max()
            .unwrap_or(0);
        format!("rId{}", max + 1)
    }

    pub(crate) fn to_xml(&self) -> String {
        self.root.to_part_xml()
    }
}

/// The `[Content_Types].xml` part.
#[derive(Debug, Clone)]
pub(crate) struct ContentTypes {
    root: XmlElement,
}

impl ContentTypes {
    pub(crate) fn new() -> Self {
        let mut types = Self {
            root: XmlElement::new("Types").with_attr("xmlns", ns::OPC_CONTENT_TYPES),
        };
        types.ensure_default("rels", ct::OPC_RELATIONSHIPS);
        types.ensure_default("xml", ct::XML);
        types
    }

    pub(crate) fn from_xml(xml: &str) -> Result<Self> {
        let root = parse_xml(xml)?;
        if root.name != "Types" {
            return Err(Error::InvalidTemplate(format!(
                "content types part has root <{}>",
                root.name
            )));
        }
        Ok(Self { root })
    }

    /// Register a default content type for a file extension, once.
    pub(crate) fn ensure_default(&mut self, extension: &str, content_type: &str) {
        let exists = self.root.children_named("Default").any(|d| {
            d.attr("Extension")
                .is_some_and(|e| e.eq_ignore_ascii_case(extension))
        });
        if !exists {
            let position = self
                .root
                .children
                .iter()
                .position(|n| matches!(n, XmlNode::Element(e) if e.name == "Override"))
                .unwrap_or(self.root.children.len());
            self.root.children.insert(
                position,
                XmlNode::Element(
                    XmlElement::new("Default")
                        .with_attr("Extension", extension)
                        .with_attr("ContentType", content_type),
                ),
            );
        }
    }

    /// Register an override for a part name (without the leading slash).
    pub(crate) fn ensure_override(&mut self, part: &str, content_type: &str) {
        let part_name = format!("/{}", part);
        let exists = self
            .root
            .children_named("Override")
            .any(|o| o.attr("PartName").as_deref() == Some(part_name.as_str()));
        if !exists {
            self.root.push(
                XmlElement::new("Override")
                    .with_attr("PartName", &part_name)
                    .with_attr("ContentType", content_type),
            );
        }
    }

    pub(crate) fn to_xml(&self) -> String {
        self.root.to_part_xml()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::constants::relationship_type as rt;

    #[test]
    fn test_rels_part_name() {
        assert_eq!(rels_part_name("word/document.xml"), "word/_rels/document.xml.rels");
        assert_eq!(rels_part_name("document.xml"), "_rels/document.xml.rels");
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(resolve_target("word/document.xml", "styles.xml"), "word/styles.xml");
        assert_eq!(resolve_target("word/document.xml", "media/image1.png"), "word/media/image1.png");
        assert_eq!(resolve_target("word/document.xml", "../customXml/item1.xml"), "customXml/item1.xml");
        assert_eq!(resolve_target("", "/word/document.xml"), "word/document.xml");
        assert_eq!(resolve_target("", "word/document.xml"), "word/document.xml");
    }

    #[test]
    fn test_relationship_ids_continue_after_max() {
        let mut rels = Relationships::from_xml(
            r#"<Relationships xmlns="urn:r"><Relationship Id="rId3" Type="t" Target="a"/><Relationship Id="rId9" Type="t" Target="b"/></Relationships>"#,
        )
        .unwrap();
        assert_eq!(rels.add(rt::IMAGE, "media/image1.png"), "rId10");
        assert_eq!(rels.target_of(rt::IMAGE).as_deref(), Some("media/image1.png"));

        let mut empty = Relationships::new();
        assert_eq!(empty.add(rt::STYLES, "styles.xml"), "rId1");
    }

    #[test]
    fn test_content_type_defaults_precede_overrides() {
        let mut types = ContentTypes::new();
        types.ensure_override("word/document.xml", ct::WML_DOCUMENT_MAIN);
        types.ensure_default("png", "image/png");
        types.ensure_default("PNG", "image/png");
        let xml = types.to_xml();
        assert_eq!(xml.matches("Extension=\"png\"").count(), 1);
        assert!(xml.find("Extension=\"png\"").unwrap() < xml.find("<Override").unwrap());
    }

    #[test]
    fn test_zip_round_trip_keeps_parts() {
        let mut package = Package::new();
        package.set("word/document.xml", b"<doc/>".to_vec());
        package.set(CONTENT_TYPES_PART, b"<Types/>".to_vec());
        package.set("word/document.xml", b"<doc2/>".to_vec());

        let bytes = package.to_bytes().unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        assert_eq!(archive.by_index(0).unwrap().name(), CONTENT_TYPES_PART);

        let read = Package::from_bytes(&bytes).unwrap();
        assert_eq!(read.get("word/document.xml"), Some(b"<doc2/>".as_slice()));
        assert!(read.contains(CONTENT_TYPES_PART));
    }

    #[test]
    fn test_rejects_non_zip() {
        assert!(matches!(
            Package::from_bytes(b"plain text"),
            Err(Error::InvalidTemplate(_))
        ));
    }
}
