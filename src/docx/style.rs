/// Style support for DOCX documents.
///
/// The style part is kept as a retained XML tree. Lookups go by UI name,
/// case-insensitively, and edits only touch the properties they set.
use crate::common::xml::{XmlElement, XmlNode, escape_xml, parse_xml};
use crate::common::{Error, Length, Result};
use std::fmt::Write as FmtWrite;

/// Schema order of `w:style` children.
const STYLE_ORDER: &[&str] = &[
    "w:name",
    "w:aliases",
    "w:basedOn",
    "w:next",
    "w:link",
    "w:autoRedefine",
    "w:hidden",
    "w:uiPriority",
    "w:semiHidden",
    "w:unhideWhenUsed",
    "w:qFormat",
    "w:locked",
    "w:personal",
    "w:personalCompose",
    "w:personalReply",
    "w:rsid",
    "w:pPr",
    "w:rPr",
    "w:tblPr",
    "w:trPr",
    "w:tcPr",
    "w:tblStylePr",
];

/// Schema order of `w:pPr` children.
const P_PR_ORDER: &[&str] = &[
    "w:pStyle",
    "w:keepNext",
    "w:keepLines",
    "w:pageBreakBefore",
    "w:framePr",
    "w:widowControl",
    "w:numPr",
    "w:suppressLineNumbers",
    "w:pBdr",
    "w:shd",
    "w:tabs",
    "w:suppressAutoHyphens",
    "w:kinsoku",
    "w:wordWrap",
    "w:overflowPunct",
    "w:topLinePunct",
    "w:autoSpaceDE",
    "w:autoSpaceDN",
    "w:bidi",
    "w:adjustRightInd",
    "w:snapToGrid",
    "w:spacing",
    "w:ind",
    "w:contextualSpacing",
    "w:mirrorIndents",
    "w:suppressOverlap",
    "w:jc",
    "w:textDirection",
    "w:textAlignment",
    "w:textboxTightWrap",
    "w:outlineLvl",
    "w:divId",
    "w:cnfStyle",
    "w:rPr",
    "w:sectPr",
    "w:pPrChange",
];

/// Schema order of `w:rPr` children.
const R_PR_ORDER: &[&str] = &[
    "w:rStyle",
    "w:rFonts",
    "w:b",
    "w:bCs",
    "w:i",
    "w:iCs",
    "w:caps",
    "w:smallCaps",
    "w:strike",
    "w:dstrike",
    "w:outline",
    "w:shadow",
    "w:emboss",
    "w:imprint",
    "w:noProof",
    "w:snapToGrid",
    "w:vanish",
    "w:webHidden",
    "w:color",
    "w:spacing",
    "w:w",
    "w:kern",
    "w:position",
    "w:sz",
    "w:szCs",
    "w:highlight",
    "w:u",
    "w:effect",
    "w:bdr",
    "w:shd",
    "w:fitText",
    "w:vertAlign",
    "w:rtl",
    "w:cs",
    "w:em",
    "w:lang",
    "w:eastAsianLayout",
    "w:specVanish",
    "w:oMath",
];

/// Style type (`w:type` attribute).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleType {
    Paragraph,
    Character,
    Table,
    Numbering,
}

impl StyleType {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Character => "character",
            Self::Table => "table",
            Self::Numbering => "numbering",
        }
    }

    fn from_xml(value: &str) -> Self {
        match value {
            "character" => Self::Character,
            "table" => Self::Table,
            "numbering" => Self::Numbering,
            _ => Self::Paragraph,
        }
    }
}

/// The document's style sheet (`word/styles.xml`).
#[derive(Debug, Clone)]
pub struct StyleSheet {
    root: XmlElement,
}

impl StyleSheet {
    pub(crate) fn from_xml(xml: &str) -> Result<Self> {
        let root = parse_xml(xml)?;
        if root.name != "w:styles" {
            return Err(Error::InvalidTemplate(format!(
                "styles part has root <{}>",
                root.name
            )));
        }
        Ok(Self { root })
    }

    pub(crate) fn to_xml(&self) -> String {
        self.root.to_part_xml()
    }

    /// Look up a style by UI name, ignoring case.
    pub fn get(&self, name: &str) -> Option<Style<'_>> {
        self.root
            .children_named("w:style")
            .find(|e| name_matches(e, name))
            .map(|element| Style { element })
    }

    /// Look up a style by UI name for editing.
    pub fn get_mut(&mut self, name: &str) -> Option<StyleMut<'_>> {
        self.root
            .elements_mut()
            .find(|e| e.name == "w:style" && name_matches(e, name))
            .map(|element| StyleMut { element })
    }

    /// Like [`get_mut`](Self::get_mut), failing with [`Error::MissingStyle`].
    pub fn require_mut(&mut self, name: &str) -> Result<StyleMut<'_>> {
        self.get_mut(name)
            .ok_or_else(|| Error::MissingStyle(name.to_string()))
    }

    /// Resolve a UI name to the style ID that content references.
    ///
    /// The style must exist and be of `kind`.
    pub fn style_id(&self, name: &str, kind: StyleType) -> Result<String> {
        self.root
            .children_named("w:style")
            .filter(|e| name_matches(e, name))
            .map(|element| Style { element })
            .find(|style| style.style_type() == kind)
            .map(|style| style.style_id())
            .ok_or_else(|| Error::MissingStyle(name.to_string()))
    }

    /// Return the named style, adding an empty one of `kind` when absent.
    ///
    /// A new paragraph style is based on `Normal`. Its ID is the name with
    /// spaces removed.
    pub fn ensure_style(&mut self, name: &str, kind: StyleType) -> StyleMut<'_> {
        let position = self
            .root
            .children
            .iter()
            .position(|node| matches!(node, XmlNode::Element(e) if e.name == "w:style" && name_matches(e, name)));
        let index = match position {
            Some(index) => index,
            None => {
                let style_id: String = name.chars().filter(|c| !c.is_whitespace()).collect();
                let mut element = XmlElement::new("w:style")
                    .with_attr("w:type", kind.as_str())
                    .with_attr("w:customStyle", "1")
                    .with_attr("w:styleId", &style_id)
                    .with_child(XmlElement::new("w:name").with_attr("w:val", name));
                if kind == StyleType::Paragraph {
                    element.push(XmlElement::new("w:basedOn").with_attr("w:val", "Normal"));
                    element.push(XmlElement::new("w:qFormat"));
                }
                self.root.push(element);
                self.root.children.len() - 1
            },
        };

        match &mut self.root.children[index] {
            XmlNode::Element(element) => StyleMut { element },
            _ => unreachable!(),
        }
    }

    /// Number of style definitions.
    pub fn len(&self) -> usize {
        self.root.children_named("w:style").count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn name_matches(element: &XmlElement, name: &str) -> bool {
    element
        .child("w:name")
        .and_then(|n| n.attr("w:val"))
        .is_some_and(|v| v.to_lowercase() == name.to_lowercase())
}

/// Read-only view of a style definition.
#[derive(Debug, Clone, Copy)]
pub struct Style<'a> {
    element: &'a XmlElement,
}

impl Style<'_> {
    pub fn name(&self) -> String {
        self.element
            .child("w:name")
            .and_then(|n| n.attr("w:val"))
            .unwrap_or_default()
    }

    pub fn style_id(&self) -> String {
        self.element.attr("w:styleId").unwrap_or_default()
    }

    pub fn style_type(&self) -> StyleType {
        self.element
            .attr("w:type")
            .map(|t| StyleType::from_xml(&t))
            .unwrap_or(StyleType::Paragraph)
    }

    pub fn space_before(&self) -> Option<Length> {
        self.spacing_attr("w:before")
    }

    pub fn space_after(&self) -> Option<Length> {
        self.spacing_attr("w:after")
    }

    pub fn font_name(&self) -> Option<String> {
        self.run_props()?.child("w:rFonts")?.attr("w:ascii")
    }

    pub fn font_size(&self) -> Option<Length> {
        let half_points: f64 = self.run_props()?.child("w:sz")?.attr("w:val")?.parse().ok()?;
        Some(Length::pt(half_points / 2.0))
    }

    pub fn bold(&self) -> Option<bool> {
        toggle_value(self.run_props()?.child("w:b")?)
    }

    pub fn italic(&self) -> Option<bool> {
        toggle_value(self.run_props()?.child("w:i")?)
    }

    fn run_props(&self) -> Option<&XmlElement> {
        self.element.child("w:rPr")
    }

    fn spacing_attr(&self, attr: &str) -> Option<Length> {
        let twips: i64 = self
            .element
            .child("w:pPr")?
            .child("w:spacing")?
            .attr(attr)?
            .parse()
            .ok()?;
        Some(Length::from_twips(twips))
    }
}

fn toggle_value(element: &XmlElement) -> Option<bool> {
    match element.attr("w:val").as_deref() {
        None | Some("1") | Some("true") | Some("on") => Some(true),
        Some(_) => Some(false),
    }
}

/// Editable handle to a style definition.
#[derive(Debug)]
pub struct StyleMut<'a> {
    element: &'a mut XmlElement,
}

impl StyleMut<'_> {
    pub fn set_space_before(&mut self, value: Length) -> &mut Self {
        self.spacing().set_attr("w:before", &value.twips().to_string());
        self
    }

    pub fn set_space_after(&mut self, value: Length) -> &mut Self {
        self.spacing().set_attr("w:after", &value.twips().to_string());
        self
    }

    /// Set the Latin font family (`w:ascii` and `w:hAnsi`).
    pub fn set_font_name(&mut self, name: &str) -> &mut Self {
        let fonts = self.run_props().get_or_insert_ordered("w:rFonts", R_PR_ORDER);
        fonts.remove_attr("w:asciiTheme");
        fonts.remove_attr("w:hAnsiTheme");
        fonts.set_attr("w:ascii", name);
        fonts.set_attr("w:hAnsi", name);
        self
    }

    pub fn set_font_size(&mut self, size: Length) -> &mut Self {
        self.run_props()
            .get_or_insert_ordered("w:sz", R_PR_ORDER)
            .set_attr("w:val", &size.half_points().to_string());
        self
    }

    /// Set or clear bold. `Some(false)` writes an explicit off value.
    pub fn set_bold(&mut self, bold: Option<bool>) -> &mut Self {
        self.set_toggle("w:b", bold);
        self
    }

    pub fn set_italic(&mut self, italic: Option<bool>) -> &mut Self {
        self.set_toggle("w:i", italic);
        self
    }

    fn spacing(&mut self) -> &mut XmlElement {
        self.element
            .get_or_insert_ordered("w:pPr", STYLE_ORDER)
            .get_or_insert_ordered("w:spacing", P_PR_ORDER)
    }

    fn run_props(&mut self) -> &mut XmlElement {
        self.element.get_or_insert_ordered("w:rPr", STYLE_ORDER)
    }

    fn set_toggle(&mut self, name: &str, value: Option<bool>) {
        match value {
            None => {
                if let Some(rpr) = self.element.child_mut("w:rPr") {
                    rpr.remove_children(name);
                }
            },
            Some(on) => {
                let toggle = self.run_props().get_or_insert_ordered(name, R_PR_ORDER);
                if on {
                    toggle.remove_attr("w:val");
                } else {
                    toggle.set_attr("w:val", "0");
                }
            },
        }
    }
}

/// A style definition used to build the default style sheet.
#[derive(Debug, Clone)]
pub(crate) struct StyleDef {
    style_id: &'static str,
    name: String,
    style_type: StyleType,
    is_default: bool,
    based_on: Option<&'static str>,
    next: Option<&'static str>,
    priority: Option<i32>,
    is_quick_style: bool,
    keep_next: bool,
    outline_level: Option<u8>,
    space_before: Option<u32>,
    space_after: Option<u32>,
    indent_left: Option<u32>,
    font_name: Option<&'static str>,
    font_size: Option<u32>,
    bold: bool,
    italic: bool,
    color: Option<&'static str>,
    table_borders: bool,
}

impl StyleDef {
    fn new(style_id: &'static str, name: impl Into<String>, style_type: StyleType) -> Self {
        Self {
            style_id,
            name: name.into(),
            style_type,
            is_default: false,
            based_on: None,
            next: None,
            priority: None,
            is_quick_style: false,
            keep_next: false,
            outline_level: None,
            space_before: None,
            space_after: None,
            indent_left: None,
            font_name: None,
            font_size: None,
            bold: false,
            italic: false,
            color: None,
            table_borders: false,
        }
    }

    fn paragraph(style_id: &'static str, name: impl Into<String>) -> Self {
        let mut style = Self::new(style_id, name, StyleType::Paragraph);
        style.based_on = Some("Normal");
        style.next = Some("Normal");
        style
    }

    fn to_xml(&self, xml: &mut String) -> Result<()> {
        write!(
            xml,
            r#"<w:style w:type="{}""#,
            self.style_type.as_str()
        )?;
        if self.is_default {
            xml.push_str(r#" w:default="1""#);
        }
        write!(xml, r#" w:styleId="{}">"#, self.style_id)?;
        write!(xml, r#"<w:name w:val="{}"/>"#, escape_xml(&self.name))?;

        if let Some(based_on) = self.based_on {
            write!(xml, r#"<w:basedOn w:val="{}"/>"#, based_on)?;
        }
        if let Some(next) = self.next {
            write!(xml, r#"<w:next w:val="{}"/>"#, next)?;
        }
        if let Some(priority) = self.priority {
            write!(xml, r#"<w:uiPriority w:val="{}"/>"#, priority)?;
        }
        if self.is_quick_style {
            xml.push_str("<w:qFormat/>");
        }

        let has_para_props = self.keep_next
            || self.outline_level.is_some()
            || self.space_before.is_some()
            || self.space_after.is_some()
            || self.indent_left.is_some();
        if has_para_props {
            xml.push_str("<w:pPr>");
            if self.keep_next {
                xml.push_str("<w:keepNext/><w:keepLines/>");
            }
            if self.space_before.is_some() || self.space_after.is_some() {
                xml.push_str("<w:spacing");
                if let Some(before) = self.space_before {
                    write!(xml, r#" w:before="{}""#, before)?;
                }
                if let Some(after) = self.space_after {
                    write!(xml, r#" w:after="{}""#, after)?;
                }
                xml.push_str("/>");
            }
            if let Some(left) = self.indent_left {
                write!(xml, r#"<w:ind w:left="{}"/>"#, left)?;
            }
            if let Some(level) = self.outline_level {
                write!(xml, r#"<w:outlineLvl w:val="{}"/>"#, level)?;
            }
            xml.push_str("</w:pPr>");
        }

        let has_run_props = self.font_name.is_some()
            || self.font_size.is_some()
            || self.bold
            || self.italic
            || self.color.is_some();
        if has_run_props {
            xml.push_str("<w:rPr>");
            if let Some(font) = self.font_name {
                write!(xml, r#"<w:rFonts w:ascii="{0}" w:hAnsi="{0}"/>"#, font)?;
            }
            if self.bold {
                xml.push_str("<w:b/><w:bCs/>");
            }
            if self.italic {
                xml.push_str("<w:i/><w:iCs/>");
            }
            if let Some(color) = self.color {
                write!(xml, r#"<w:color w:val="{}"/>"#, color)?;
            }
            if let Some(size) = self.font_size {
                write!(xml, r#"<w:sz w:val="{0}"/><w:szCs w:val="{0}"/>"#, size)?;
            }
            xml.push_str("</w:rPr>");
        }

        if self.style_type == StyleType::Table {
            xml.push_str(r#"<w:tblPr><w:tblInd w:w="0" w:type="dxa"/>"#);
            if self.table_borders {
                xml.push_str("<w:tblBorders>");
                for side in ["top", "left", "bottom", "right", "insideH", "insideV"] {
                    write!(
                        xml,
                        r#"<w:{} w:val="single" w:sz="4" w:space="0" w:color="auto"/>"#,
                        side
                    )?;
                }
                xml.push_str("</w:tblBorders>");
            }
            xml.push_str(r#"<w:tblCellMar><w:left w:w="108" w:type="dxa"/><w:right w:w="108" w:type="dxa"/></w:tblCellMar></w:tblPr>"#);
        }

        xml.push_str("</w:style>");
        Ok(())
    }
}

/// Style definitions of a blank document.
fn builtin_styles() -> Vec<StyleDef> {
    let mut styles = Vec::new();

    let mut normal = StyleDef::new("Normal", "Normal", StyleType::Paragraph);
    normal.is_default = true;
    normal.is_quick_style = true;
    styles.push(normal);

    let mut font = StyleDef::new("DefaultParagraphFont", "Default Paragraph Font", StyleType::Character);
    font.is_default = true;
    font.priority = Some(1);
    styles.push(font);

    let mut table_normal = StyleDef::new("TableNormal", "Normal Table", StyleType::Table);
    table_normal.is_default = true;
    table_normal.priority = Some(99);
    styles.push(table_normal);

    let mut title = StyleDef::paragraph("Title", "Title");
    title.priority = Some(10);
    title.is_quick_style = true;
    title.space_after = Some(300);
    title.font_name = Some("Calibri Light");
    title.font_size = Some(56);
    title.color = Some("17365D");
    styles.push(title);

    const HEADINGS: [(&str, u32); 9] = [
        ("Heading1", 28),
        ("Heading2", 26),
        ("Heading3", 24),
        ("Heading4", 22),
        ("Heading5", 22),
        ("Heading6", 22),
        ("Heading7", 22),
        ("Heading8", 22),
        ("Heading9", 22),
    ];
    for (index, (id, size)) in HEADINGS.into_iter().enumerate() {
        let level = index + 1;
        let mut heading = StyleDef::paragraph(id, format!("Heading {}", level));
        heading.priority = Some(9);
        heading.is_quick_style = true;
        heading.keep_next = true;
        heading.outline_level = Some(index as u8);
        heading.space_before = Some(if level == 1 { 480 } else { 200 });
        heading.font_name = Some("Calibri Light");
        heading.font_size = Some(size);
        heading.bold = level <= 4;
        heading.italic = level == 4;
        heading.color = Some(if level == 1 { "365F91" } else { "4F81BD" });
        styles.push(heading);
    }

    let mut caption = StyleDef::paragraph("Caption", "Caption");
    caption.priority = Some(35);
    caption.is_quick_style = true;
    caption.space_after = Some(200);
    caption.font_size = Some(18);
    caption.bold = true;
    caption.color = Some("4F81BD");
    styles.push(caption);

    let mut list = StyleDef::paragraph("ListParagraph", "List Paragraph");
    list.priority = Some(34);
    list.is_quick_style = true;
    list.indent_left = Some(720);
    styles.push(list);

    let mut toc_heading = StyleDef::paragraph("TOCHeading", "TOC Heading");
    toc_heading.based_on = Some("Heading1");
    toc_heading.priority = Some(39);
    toc_heading.is_quick_style = true;
    toc_heading.outline_level = Some(9);
    styles.push(toc_heading);

    for (id, name, indent) in [("TOC1", "toc 1", None), ("TOC2", "toc 2", Some(220)), ("TOC3", "toc 3", Some(440))] {
        let mut toc = StyleDef::paragraph(id, name);
        toc.priority = Some(39);
        toc.space_after = Some(100);
        toc.indent_left = indent;
        styles.push(toc);
    }

    let mut figures = StyleDef::paragraph("TableofFigures", "table of figures");
    figures.priority = Some(99);
    styles.push(figures);

    let mut grid = StyleDef::new("TableGrid", "Table Grid", StyleType::Table);
    grid.based_on = Some("TableNormal");
    grid.priority = Some(59);
    grid.table_borders = true;
    styles.push(grid);

    let mut strong = StyleDef::new("Strong", "Strong", StyleType::Character);
    strong.based_on = Some("DefaultParagraphFont");
    strong.priority = Some(22);
    strong.is_quick_style = true;
    strong.bold = true;
    styles.push(strong);

    let mut emphasis = StyleDef::new("Emphasis", "Emphasis", StyleType::Character);
    emphasis.based_on = Some("DefaultParagraphFont");
    emphasis.priority = Some(20);
    emphasis.is_quick_style = true;
    emphasis.italic = true;
    styles.push(emphasis);

    styles
}

/// Generate the styles.xml part of a blank document.
pub(crate) fn default_styles_xml() -> Result<String> {
    let mut xml = String::with_capacity(8192);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    xml.push_str(r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#);

    xml.push_str("<w:docDefaults>");
    xml.push_str("<w:rPrDefault><w:rPr>");
    xml.push_str(r#"<w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:eastAsia="Calibri" w:cs="Calibri"/>"#);
    xml.push_str(r#"<w:sz w:val="22"/><w:szCs w:val="22"/><w:lang w:val="en-US" w:eastAsia="en-US" w:bidi="ar-SA"/>"#);
    xml.push_str("</w:rPr></w:rPrDefault>");
    xml.push_str(r#"<w:pPrDefault><w:pPr><w:spacing w:after="200" w:line="276" w:lineRule="auto"/></w:pPr></w:pPrDefault>"#);
    xml.push_str("</w:docDefaults>");

    for style in builtin_styles() {
        style.to_xml(&mut xml)?;
    }

    xml.push_str("</w:styles>");
    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> StyleSheet {
        StyleSheet::from_xml(&default_styles_xml().unwrap()).unwrap()
    }

    #[test]
    fn test_builtin_sheet_has_facade_styles() {
        let styles = sheet();
        for name in ["Normal", "Title", "Heading 1", "Heading 9", "Caption", "List Paragraph", "TOC Heading", "Table Grid"] {
            assert!(styles.get(name).is_some(), "missing {name}");
        }
    }

    #[test]
    fn test_lookup_ignores_case() {
        let styles = sheet();
        assert_eq!(styles.get("heading 1").unwrap().style_id(), "Heading1");
        assert_eq!(styles.get("TOC 2").unwrap().style_id(), "TOC2");
        assert!(styles.get("Heading 10").is_none());
    }

    #[test]
    fn test_style_id_checks_type() {
        let styles = sheet();
        assert_eq!(styles.style_id("Table Grid", StyleType::Table).unwrap(), "TableGrid");
        assert!(matches!(
            styles.style_id("Table Grid", StyleType::Paragraph),
            Err(Error::MissingStyle(name)) if name == "Table Grid"
        ));
        assert!(matches!(
            styles.style_id("Légende Figure", StyleType::Paragraph),
            Err(Error::MissingStyle(_))
        ));
    }

    #[test]
    fn test_edit_normal_font() {
        let mut styles = sheet();
        styles
            .require_mut("Normal")
            .unwrap()
            .set_font_name("Calibri")
            .set_font_size(Length::pt(11.0))
            .set_bold(Some(false))
            .set_italic(Some(false));

        let normal = styles.get("Normal").unwrap();
        assert_eq!(normal.font_name().as_deref(), Some("Calibri"));
        assert_eq!(normal.font_size(), Some(Length::pt(11.0)));
        assert_eq!(normal.bold(), Some(false));
        assert_eq!(normal.italic(), Some(false));
    }

    #[test]
    fn test_edit_spacing_keeps_other_properties() {
        let mut styles = sheet();
        styles
            .require_mut("Heading 1")
            .unwrap()
            .set_space_before(Length::pt(6.0))
            .set_space_after(Length::pt(12.0));

        let heading = styles.get("Heading 1").unwrap();
        assert_eq!(heading.space_before(), Some(Length::pt(6.0)));
        assert_eq!(heading.space_after(), Some(Length::pt(12.0)));
        assert_eq!(heading.bold(), Some(true));

        let xml = styles.to_xml();
        let start = xml.find(r#"w:styleId="Heading1""#).unwrap();
        let style_xml = &xml[start..];
        let keep_next = style_xml.find("<w:keepNext/>").unwrap();
        let spacing = style_xml.find(r#"<w:spacing w:before="120" w:after="240"/>"#).unwrap();
        let outline = style_xml.find("<w:outlineLvl").unwrap();
        assert!(keep_next < spacing && spacing < outline);
    }

    #[test]
    fn test_clear_toggle() {
        let mut styles = sheet();
        styles.require_mut("Strong").unwrap().set_bold(None);
        assert_eq!(styles.get("Strong").unwrap().bold(), None);
    }

    #[test]
    fn test_require_mut_missing() {
        let mut styles = sheet();
        assert!(matches!(styles.require_mut("Chapitre"), Err(Error::MissingStyle(n)) if n == "Chapitre"));
    }

    #[test]
    fn test_ensure_style_adds_once() {
        let mut styles = sheet();
        let count = styles.len();
        styles
            .ensure_style("Légende Figure", StyleType::Paragraph)
            .set_italic(Some(true));
        styles.ensure_style("légende figure", StyleType::Paragraph);
        assert_eq!(styles.len(), count + 1);
        assert_eq!(
            styles.style_id("Légende Figure", StyleType::Paragraph).unwrap(),
            "LégendeFigure"
        );
        assert_eq!(styles.get("Légende Figure").unwrap().italic(), Some(true));

        // existing styles are returned untouched
        styles.ensure_style("Heading 1", StyleType::Paragraph);
        assert_eq!(styles.len(), count + 1);
    }

    #[test]
    fn test_rejects_foreign_root() {
        assert!(matches!(
            StyleSheet::from_xml("<foo/>"),
            Err(Error::InvalidTemplate(_))
        ));
    }
}
