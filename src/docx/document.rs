/// The in-memory WordprocessingML document.
///
/// Content already present in a template body is kept as retained XML and
/// written back unchanged; content appended through this API is modelled with
/// [`Paragraph`] and [`Table`] and serialized after it.
use super::constants::{content_type as ct, namespace as ns, relationship_type as rt};
use super::image::{ImageData, InlinePicture};
use super::package::{
    CONTENT_TYPES_PART, ContentTypes, PACKAGE_RELS_PART, Package, Relationships, rels_part_name,
    resolve_target,
};
use super::paragraph::Paragraph;
use super::run::{BreakType, Run};
use super::section::{Section, SectionStart};
use super::style::{StyleSheet, StyleType, default_styles_xml};
use super::table::Table;
use super::template::blank_package;
use crate::common::xml::{XmlElement, XmlNode, parse_xml};
use crate::common::{Error, Length, Result};
use std::path::Path;

/// Namespace declarations the serialized body relies on.
const REQUIRED_NAMESPACES: &[(&str, &str)] = &[
    ("xmlns:w", ns::WML_MAIN),
    ("xmlns:r", ns::OFC_RELATIONSHIPS),
    ("xmlns:wp", ns::DML_WORDPROCESSING_DRAWING),
    ("xmlns:a", ns::DML_MAIN),
    ("xmlns:pic", ns::DML_PICTURE),
];

/// A block-level element of the body.
#[derive(Debug, Clone)]
enum BodyElement {
    /// Template content, written back verbatim
    Xml(XmlNode),
    Paragraph(Paragraph),
    Table(Table),
}

/// A WordprocessingML document opened from a template or created blank.
#[derive(Debug, Clone)]
pub struct Document {
    package: Package,
    document_part: String,
    styles_part: String,
    /// `w:document` with an emptied `w:body`
    root: XmlElement,
    body: Vec<BodyElement>,
    /// The final (body-level) section
    section: Section,
    styles: StyleSheet,
    rels: Relationships,
    content_types: ContentTypes,
    next_drawing_id: u32,
}

impl Document {
    /// Create a blank document from the built-in default template.
    pub fn new() -> Result<Self> {
        Self::from_package(blank_package()?)
    }

    /// Open a `.docx` file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::info!("opening template {}", path.display());
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Open a `.docx` package held in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_package(Package::from_bytes(bytes)?)
    }

    fn from_package(package: Package) -> Result<Self> {
        let content_types = match package.get_str(CONTENT_TYPES_PART)? {
            Some(xml) => ContentTypes::from_xml(xml)?,
            None => {
                return Err(Error::InvalidTemplate(
                    "missing [Content_Types].xml".to_string(),
                ));
            },
        };

        let document_part = package
            .get_str(PACKAGE_RELS_PART)?
            .map(Relationships::from_xml)
            .transpose()?
            .and_then(|rels| rels.target_of(rt::OFFICE_DOCUMENT))
            .map(|target| resolve_target("", &target))
            .ok_or_else(|| Error::InvalidTemplate("no main document part".to_string()))?;

        let document_xml = package.get_str(&document_part)?.ok_or_else(|| {
            Error::InvalidTemplate(format!("main document part {} is missing", document_part))
        })?;
        let mut root = parse_xml(document_xml)?;
        if root.name != "w:document" {
            return Err(Error::InvalidTemplate(format!(
                "main document part has root <{}>",
                root.name
            )));
        }
        for (key, uri) in REQUIRED_NAMESPACES {
            if !root.has_attr(key) {
                root.set_attr(key, uri);
            }
        }
        let next_drawing_id = max_drawing_id(&root) + 1;

        let body_element = root
            .child_mut("w:body")
            .ok_or_else(|| Error::InvalidTemplate("document has no <w:body>".to_string()))?;
        let mut children = std::mem::take(&mut body_element.children);
        let last_element = children
            .iter()
            .rposition(|node| matches!(node, XmlNode::Element(_)));
        let section = match last_element {
            Some(index)
                if matches!(&children[index], XmlNode::Element(e) if e.name == "w:sectPr") =>
            {
                match children.remove(index) {
                    XmlNode::Element(e) => Section::from_element(e),
                    _ => unreachable!(),
                }
            },
            _ => Section::default(),
        };
        let body = children.into_iter().map(BodyElement::Xml).collect();

        let rels = match package.get_str(&rels_part_name(&document_part))? {
            Some(xml) => Relationships::from_xml(xml)?,
            None => Relationships::new(),
        };

        let mut document = Self {
            package,
            styles_part: String::new(),
            root,
            body,
            section,
            styles: StyleSheet::from_xml(&default_styles_xml()?)?,
            rels,
            content_types,
            next_drawing_id,
            document_part,
        };
        document.load_styles()?;
        Ok(document)
    }

    /// Load the styles part, adding the default one when the package has none.
    fn load_styles(&mut self) -> Result<()> {
        let existing = self
            .rels
            .target_of(rt::STYLES)
            .map(|target| resolve_target(&self.document_part, &target))
            .filter(|part| self.package.contains(part));

        match existing {
            Some(part) => {
                if let Some(xml) = self.package.get_str(&part)? {
                    self.styles = StyleSheet::from_xml(xml)?;
                }
                self.styles_part = part;
            },
            None => {
                let part = resolve_target(&self.document_part, "styles.xml");
                self.rels.add(rt::STYLES, "styles.xml");
                self.content_types.ensure_override(&part, ct::WML_STYLES);
                self.styles_part = part;
            },
        }
        Ok(())
    }

    pub fn styles(&self) -> &StyleSheet {
        &self.styles
    }

    pub fn styles_mut(&mut self) -> &mut StyleSheet {
        &mut self.styles
    }

    /// Append a paragraph with `text` as its only run.
    ///
    /// `style` is a paragraph style name; an unknown name is
    /// [`Error::MissingStyle`]. Empty text adds no run.
    pub fn add_paragraph(&mut self, text: &str, style: Option<&str>) -> Result<ParagraphMut<'_>> {
        let style_id = self.paragraph_style_id(style)?;
        let mut paragraph = Paragraph::new();
        paragraph.set_style_id(style_id);
        if !text.is_empty() {
            paragraph.add_run_with_text(text);
        }
        Ok(self.push_paragraph(paragraph))
    }

    /// Append a heading. Level 0 uses the `Title` style and level `n` uses
    /// `Heading n`, unless `style` names another paragraph style.
    pub fn add_heading(
        &mut self,
        text: &str,
        level: u8,
        style: Option<&str>,
    ) -> Result<ParagraphMut<'_>> {
        let default_style = match level {
            0 => "Title".to_string(),
            n => format!("Heading {}", n),
        };
        self.add_paragraph(text, Some(style.unwrap_or(default_style.as_str())))
    }

    /// Append a paragraph holding a single page break.
    pub fn add_page_break(&mut self) -> ParagraphMut<'_> {
        let mut paragraph = Paragraph::new();
        paragraph.add_run().add_break(BreakType::Page);
        self.push_paragraph(paragraph)
    }

    /// Append a `rows × cols` table spanning the content width of the
    /// current section, with equal columns.
    pub fn add_table(&mut self, rows: usize, cols: usize, style: Option<&str>) -> Result<&mut Table> {
        let style_id = match style {
            Some(name) => Some(self.styles.style_id(name, StyleType::Table)?),
            None => None,
        };
        let content_width = self
            .section
            .content_width()
            .unwrap_or_else(|| Length::inches(6.5));
        let column_width = content_width.twips() / cols.max(1) as i64;

        let mut table = Table::new(rows, cols, column_width);
        table.style = style_id;
        self.body.push(BodyElement::Table(table));
        match self.body.last_mut() {
            Some(BodyElement::Table(t)) => Ok(t),
            _ => unreachable!(),
        }
    }

    /// Embed `image` in a new paragraph of its own.
    ///
    /// A missing dimension is derived from the native aspect ratio; with
    /// neither, the image keeps its native size at 72 dpi.
    pub fn add_picture(
        &mut self,
        image: &ImageData,
        width: Option<Length>,
        height: Option<Length>,
    ) -> Result<InlinePicture> {
        let (width, height) = image.scaled_size(width, height);
        let extension = image.format().extension();

        let media_dir = resolve_target(&self.document_part, "media");
        let index = (1..)
            .find(|n| {
                !self
                    .package
                    .contains(&format!("{}/image{}.{}", media_dir, n, extension))
            })
            .unwrap_or(1);
        let target = format!("media/image{}.{}", index, extension);
        self.package.set(
            &resolve_target(&self.document_part, &target),
            image.bytes().to_vec(),
        );
        self.content_types
            .ensure_default(extension, image.format().mime_type());
        let rel_id = self.rels.add(rt::IMAGE, &target);

        let picture = InlinePicture {
            rel_id,
            id: self.next_drawing_id,
            name: image.name().to_string(),
            width,
            height,
        };
        self.next_drawing_id += 1;
        log::debug!(
            "embedded {} as {} ({} x {} EMU)",
            image.name(),
            target,
            width.emus(),
            height.emus()
        );

        let mut paragraph = Paragraph::new();
        paragraph.add_run().add_drawing(picture.clone());
        self.push_paragraph(paragraph);
        Ok(picture)
    }

    /// Start a new section and return it.
    ///
    /// The section that ends here moves into the properties of a new empty
    /// paragraph. The new section copies its page setup, drops header and
    /// footer references, and starts as `start`.
    pub fn add_section(&mut self, start: SectionStart) -> &mut Section {
        let mut next = self.section.clone();
        next.clear_header_footer_refs();
        next.set_start_type(start);

        let previous = std::mem::replace(&mut self.section, next);
        let mut paragraph = Paragraph::new();
        paragraph.section = Some(previous);
        self.body.push(BodyElement::Paragraph(paragraph));
        &mut self.section
    }

    /// The section the body currently ends in.
    pub fn last_section(&self) -> &Section {
        &self.section
    }

    /// Paragraphs appended through this API, in document order.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.body.iter().filter_map(|element| match element {
            BodyElement::Paragraph(p) => Some(p),
            _ => None,
        })
    }

    /// Tables appended through this API, in document order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.body.iter().filter_map(|element| match element {
            BodyElement::Table(t) => Some(t),
            _ => None,
        })
    }

    fn paragraph_style_id(&self, style: Option<&str>) -> Result<Option<String>> {
        style
            .map(|name| self.styles.style_id(name, StyleType::Paragraph))
            .transpose()
    }

    fn push_paragraph(&mut self, paragraph: Paragraph) -> ParagraphMut<'_> {
        self.body.push(BodyElement::Paragraph(paragraph));
        ParagraphMut {
            index: self.body.len() - 1,
            doc: self,
        }
    }

    /// Serialize the main document part.
    pub fn to_xml(&self) -> Result<String> {
        let mut body = String::with_capacity(4096);
        for element in &self.body {
            match element {
                BodyElement::Xml(node) => node.write_to(&mut body),
                BodyElement::Paragraph(paragraph) => paragraph.to_xml(&mut body)?,
                BodyElement::Table(table) => table.to_xml(&mut body)?,
            }
        }
        self.section.to_xml(&mut body);

        let mut root = self.root.clone();
        if let Some(body_element) = root.child_mut("w:body") {
            body_element.children = vec![XmlNode::Raw(body)];
        }
        Ok(root.to_part_xml())
    }

    /// Write the whole package. Parts the document does not model are
    /// copied from the template unchanged.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let document = self.to_xml()?;
        let styles = self.styles.to_xml();
        let rels = self.rels.to_xml();
        let content_types = self.content_types.to_xml();
        let rels_part = rels_part_name(&self.document_part);

        self.package.to_bytes_with(&[
            (self.document_part.as_str(), document.as_bytes()),
            (self.styles_part.as_str(), styles.as_bytes()),
            (rels_part.as_str(), rels.as_bytes()),
            (CONTENT_TYPES_PART, content_types.as_bytes()),
        ])
    }

    /// Save the document to a `.docx` file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        log::info!("saved document to {}", path.display());
        Ok(())
    }
}

/// Highest `wp:docPr` ID in the tree.
fn max_drawing_id(element: &XmlElement) -> u32 {
    element
        .elements()
        .map(|child| {
            let own = if child.name == "wp:docPr" {
                child
                    .attr("id")
                    .and_then(|id| id.parse::<u32>().ok())
                    .unwrap_or(0)
            } else {
                0
            };
            own.max(max_drawing_id(child))
        })
        .max()
        .unwrap_or(0)
}

/// A paragraph just appended to a [`Document`], still open for runs.
#[derive(Debug)]
pub struct ParagraphMut<'a> {
    doc: &'a mut Document,
    index: usize,
}

impl<'a> ParagraphMut<'a> {
    /// Append a run. `style` is a character style name.
    pub fn add_run(&mut self, text: &str, style: Option<&str>) -> Result<&mut Run> {
        let style_id = match style {
            Some(name) => Some(self.doc.styles.style_id(name, StyleType::Character)?),
            None => None,
        };
        let run = self.paragraph_mut().add_run_with_text(text);
        run.set_style_id(style_id);
        Ok(run)
    }

    pub fn paragraph(&self) -> &Paragraph {
        match &self.doc.body[self.index] {
            BodyElement::Paragraph(p) => p,
            _ => unreachable!(),
        }
    }

    pub fn paragraph_mut(&mut self) -> &mut Paragraph {
        match &mut self.doc.body[self.index] {
            BodyElement::Paragraph(p) => p,
            _ => unreachable!(),
        }
    }

    /// The owning document, for appending further content while this
    /// paragraph stays open.
    pub fn document(&mut self) -> &mut Document {
        self.doc
    }
}
