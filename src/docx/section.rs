/// Section types for DOCX documents.
///
/// A section is held as its `w:sectPr` element so that properties the crate
/// does not model (columns, grids, header references) survive edits.
use crate::common::Length;
use crate::common::xml::XmlElement;
use std::fmt;

/// Schema order of `w:sectPr` children.
const SECT_PR_ORDER: &[&str] = &[
    "w:headerReference",
    "w:footerReference",
    "w:footnotePr",
    "w:endnotePr",
    "w:type",
    "w:pgSz",
    "w:pgMar",
    "w:paperSrc",
    "w:pgBorders",
    "w:lnNumType",
    "w:pgNumType",
    "w:cols",
    "w:formProt",
    "w:vAlign",
    "w:noEndnote",
    "w:titlePg",
    "w:textDirection",
    "w:bidi",
    "w:rtlGutter",
    "w:docGrid",
    "w:printerSettings",
    "w:sectPrChange",
];

/// Page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    /// Convert orientation to XML string representation.
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Portrait => "portrait",
            Self::Landscape => "landscape",
        }
    }

    pub(crate) fn from_xml(value: &str) -> Self {
        match value {
            "landscape" => Self::Landscape,
            _ => Self::Portrait,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a section starts relative to the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectionStart {
    Continuous,
    NewColumn,
    #[default]
    NewPage,
    EvenPage,
    OddPage,
}

impl SectionStart {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Continuous => "continuous",
            Self::NewColumn => "nextColumn",
            Self::NewPage => "nextPage",
            Self::EvenPage => "evenPage",
            Self::OddPage => "oddPage",
        }
    }

    pub(crate) fn from_xml(value: &str) -> Self {
        match value {
            "continuous" => Self::Continuous,
            "nextColumn" => Self::NewColumn,
            "evenPage" => Self::EvenPage,
            "oddPage" => Self::OddPage,
            _ => Self::NewPage,
        }
    }
}

/// Section properties: page setup, margins and start type.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    element: XmlElement,
}

impl Default for Section {
    /// US Letter portrait with one-inch margins.
    fn default() -> Self {
        let element = XmlElement::new("w:sectPr")
            .with_child(
                XmlElement::new("w:pgSz")
                    .with_attr("w:w", "12240")
                    .with_attr("w:h", "15840"),
            )
            .with_child(
                XmlElement::new("w:pgMar")
                    .with_attr("w:top", "1440")
                    .with_attr("w:right", "1440")
                    .with_attr("w:bottom", "1440")
                    .with_attr("w:left", "1440")
                    .with_attr("w:header", "720")
                    .with_attr("w:footer", "720")
                    .with_attr("w:gutter", "0"),
            )
            .with_child(XmlElement::new("w:cols").with_attr("w:space", "720"))
            .with_child(XmlElement::new("w:docGrid").with_attr("w:linePitch", "360"));
        Self { element }
    }
}

impl Section {
    pub(crate) fn from_element(element: XmlElement) -> Self {
        Self { element }
    }

    pub fn start_type(&self) -> SectionStart {
        self.element
            .child("w:type")
            .and_then(|e| e.attr("w:val"))
            .map(|v| SectionStart::from_xml(&v))
            .unwrap_or_default()
    }

    pub fn set_start_type(&mut self, start: SectionStart) {
        if start == SectionStart::NewPage {
            // nextPage is the schema default
            self.element.remove_children("w:type");
            return;
        }
        self.element
            .get_or_insert_ordered("w:type", SECT_PR_ORDER)
            .set_attr("w:val", start.as_str());
    }

    pub fn orientation(&self) -> Orientation {
        self.element
            .child("w:pgSz")
            .and_then(|e| e.attr("w:orient"))
            .map(|v| Orientation::from_xml(&v))
            .unwrap_or_default()
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        let pg_sz = self.element.get_or_insert_ordered("w:pgSz", SECT_PR_ORDER);
        match orientation {
            Orientation::Portrait => pg_sz.remove_attr("w:orient"),
            Orientation::Landscape => pg_sz.set_attr("w:orient", orientation.as_str()),
        }
    }

    pub fn page_width(&self) -> Option<Length> {
        self.twips_attr("w:pgSz", "w:w")
    }

    pub fn set_page_width(&mut self, width: Option<Length>) {
        self.set_twips_attr("w:pgSz", "w:w", width);
    }

    pub fn page_height(&self) -> Option<Length> {
        self.twips_attr("w:pgSz", "w:h")
    }

    pub fn set_page_height(&mut self, height: Option<Length>) {
        self.set_twips_attr("w:pgSz", "w:h", height);
    }

    pub fn left_margin(&self) -> Option<Length> {
        self.twips_attr("w:pgMar", "w:left")
    }

    pub fn right_margin(&self) -> Option<Length> {
        self.twips_attr("w:pgMar", "w:right")
    }

    /// Page width minus the left and right margins.
    pub fn content_width(&self) -> Option<Length> {
        let width = self.page_width()?.emus();
        let left = self.left_margin().map_or(0, |m| m.emus());
        let right = self.right_margin().map_or(0, |m| m.emus());
        Some(Length::from_emus(width - left - right))
    }

    /// Drop header and footer references so the section shows none of its own.
    pub(crate) fn clear_header_footer_refs(&mut self) {
        self.element.remove_children("w:headerReference");
        self.element.remove_children("w:footerReference");
    }

    pub(crate) fn to_xml(&self, xml: &mut String) {
        self.element.write_to(xml);
    }

    fn twips_attr(&self, child: &str, attr: &str) -> Option<Length> {
        self.element
            .child(child)?
            .attr(attr)?
            .parse::<i64>()
            .ok()
            .map(Length::from_twips)
    }

    fn set_twips_attr(&mut self, child: &str, attr: &str, value: Option<Length>) {
        match value {
            Some(length) => self
                .element
                .get_or_insert_ordered(child, SECT_PR_ORDER)
                .set_attr(attr, &length.twips().to_string()),
            None => {
                if let Some(e) = self.element.child_mut(child) {
                    e.remove_attr(attr);
                }
            },
        }
    }
}
