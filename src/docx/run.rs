/// Run types and implementation for DOCX documents.
use super::image::InlinePicture;
use crate::common::Result;
use crate::common::xml::{check_xml_text, escape_xml};
use std::fmt::Write as FmtWrite;

/// Kind of a `w:br` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakType {
    Line,
    Page,
    Column,
}

/// Marker of a complex field (`w:fldChar`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCharType {
    Begin,
    Separate,
    End,
}

impl FieldCharType {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Begin => "begin",
            Self::Separate => "separate",
            Self::End => "end",
        }
    }
}

/// Run content item. A run may hold several, written in order.
#[derive(Debug, Clone)]
pub enum RunContent {
    /// Plain text, free of line breaks and tabs
    Text(String),
    Break(BreakType),
    Tab,
    FieldChar(FieldCharType),
    /// Field instruction, written with `xml:space="preserve"`
    InstrText(String),
    Drawing(InlinePicture),
}

/// A run of text sharing one set of character properties.
#[derive(Debug, Clone, Default)]
pub struct Run {
    pub(crate) content: Vec<RunContent>,
    /// Character style ID
    pub(crate) style: Option<String>,
    pub(crate) bold: Option<bool>,
    pub(crate) italic: Option<bool>,
}

impl Run {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_text(text: &str) -> Self {
        let mut run = Self::new();
        if !text.is_empty() {
            run.add_text(text);
        }
        run
    }

    /// Append text to the run. `\n`, `\r\n` and `\r` become line breaks and
    /// `\t` becomes a tab, as Word would store them.
    pub fn add_text(&mut self, text: &str) -> &mut Self {
        let mut pending = String::new();
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            let item = match c {
                '\r' if chars.peek() == Some(&'\n') => continue,
                '\n' | '\r' => RunContent::Break(BreakType::Line),
                '\t' => RunContent::Tab,
                _ => {
                    pending.push(c);
                    continue;
                },
            };
            if !pending.is_empty() {
                self.content.push(RunContent::Text(std::mem::take(&mut pending)));
            }
            self.content.push(item);
        }
        if !pending.is_empty() {
            self.content.push(RunContent::Text(pending));
        }
        self
    }

    pub fn add_break(&mut self, kind: BreakType) -> &mut Self {
        self.content.push(RunContent::Break(kind));
        self
    }

    pub fn add_field_char(&mut self, kind: FieldCharType) -> &mut Self {
        self.content.push(RunContent::FieldChar(kind));
        self
    }

    pub fn add_instr_text(&mut self, instruction: &str) -> &mut Self {
        self.content
            .push(RunContent::InstrText(instruction.to_string()));
        self
    }

    pub(crate) fn add_drawing(&mut self, picture: InlinePicture) -> &mut Self {
        self.content.push(RunContent::Drawing(picture));
        self
    }

    /// Concatenated text of the run; line breaks read back as `\n` and
    /// tabs as `\t`.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|c| match c {
                RunContent::Text(s) => Some(s.as_str()),
                RunContent::Break(BreakType::Line) => Some("\n"),
                RunContent::Tab => Some("\t"),
                _ => None,
            })
            .collect()
    }

    pub fn content(&self) -> &[RunContent] {
        &self.content
    }

    /// Make the text bold. `None` inherits from the style.
    pub fn bold(&mut self, bold: impl Into<Option<bool>>) -> &mut Self {
        self.bold = bold.into();
        self
    }

    /// Make the text italic. `None` inherits from the style.
    pub fn italic(&mut self, italic: impl Into<Option<bool>>) -> &mut Self {
        self.italic = italic.into();
        self
    }

    pub fn is_bold(&self) -> Option<bool> {
        self.bold
    }

    pub fn is_italic(&self) -> Option<bool> {
        self.italic
    }

    pub fn style_id(&self) -> Option<&str> {
        self.style.as_deref()
    }

    pub(crate) fn set_style_id(&mut self, style_id: Option<String>) {
        self.style = style_id;
    }

    fn has_properties(&self) -> bool {
        self.style.is_some() || self.bold.is_some() || self.italic.is_some()
    }

    pub(crate) fn to_xml(&self, xml: &mut String) -> Result<()> {
        xml.push_str("<w:r>");

        if self.has_properties() {
            xml.push_str("<w:rPr>");
            if let Some(ref style) = self.style {
                write!(xml, "<w:rStyle w:val=\"{}\"/>", escape_xml(style))?;
            }
            write_toggle(xml, "w:b", self.bold);
            write_toggle(xml, "w:i", self.italic);
            xml.push_str("</w:rPr>");
        }

        for item in &self.content {
            match item {
                RunContent::Text(text) => {
                    check_xml_text(text)?;
                    write!(xml, "<w:t xml:space=\"preserve\">{}</w:t>", escape_xml(text))?;
                },
                RunContent::Break(BreakType::Line) => xml.push_str("<w:br/>"),
                RunContent::Break(BreakType::Page) => xml.push_str("<w:br w:type=\"page\"/>"),
                RunContent::Break(BreakType::Column) => {
                    xml.push_str("<w:br w:type=\"column\"/>")
                },
                RunContent::Tab => xml.push_str("<w:tab/>"),
                RunContent::FieldChar(kind) => {
                    write!(xml, "<w:fldChar w:fldCharType=\"{}\"/>", kind.as_str())?;
                },
                RunContent::InstrText(instruction) => {
                    check_xml_text(instruction)?;
                    write!(
                        xml,
                        "<w:instrText xml:space=\"preserve\">{}</w:instrText>",
                        escape_xml(instruction)
                    )?;
                },
                RunContent::Drawing(picture) => picture.to_xml(xml)?,
            }
        }

        xml.push_str("</w:r>");
        Ok(())
    }
}

/// Write a toggle property: `<w:b/>` for on, `<w:b w:val="0"/>` for off.
fn write_toggle(xml: &mut String, name: &str, value: Option<bool>) {
    match value {
        Some(true) => {
            xml.push('<');
            xml.push_str(name);
            xml.push_str("/>");
        },
        Some(false) => {
            xml.push('<');
            xml.push_str(name);
            xml.push_str(" w:val=\"0\"/>");
        },
        None => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xml_of(run: &Run) -> String {
        let mut xml = String::new();
        run.to_xml(&mut xml).unwrap();
        xml
    }

    #[test]
    fn test_plain_text_run() {
        let run = Run::with_text("a < b");
        assert_eq!(
            xml_of(&run),
            "<w:r><w:t xml:space=\"preserve\">a &lt; b</w:t></w:r>"
        );
    }

    #[test]
    fn test_formatting_order() {
        let mut run = Run::with_text("World");
        run.bold(true).italic(false);
        run.set_style_id(Some("Strong".to_string()));
        assert_eq!(
            xml_of(&run),
            "<w:r><w:rPr><w:rStyle w:val=\"Strong\"/><w:b/><w:i w:val=\"0\"/></w:rPr><w:t xml:space=\"preserve\">World</w:t></w:r>"
        );
    }

    #[test]
    fn test_field_sequence_stays_in_one_run() {
        let mut run = Run::new();
        run.add_field_char(FieldCharType::Begin)
            .add_instr_text("TOC \\o \"1-3\"")
            .add_field_char(FieldCharType::Separate)
            .add_text("Right-click to update field.")
            .add_field_char(FieldCharType::End);
        let xml = xml_of(&run);
        assert_eq!(xml.matches("<w:r>").count(), 1);
        let begin = xml.find("begin").unwrap();
        let instr = xml.find("<w:instrText").unwrap();
        let separate = xml.find("separate").unwrap();
        let text = xml.find("<w:t ").unwrap();
        let end = xml.find("\"end\"").unwrap();
        assert!(begin < instr && instr < separate && separate < text && text < end);
        assert!(xml.contains("TOC \\o &quot;1-3&quot;"));
    }

    #[test]
    fn test_newlines_and_tabs_become_elements() {
        let run = Run::with_text("line1\nline2\ttab\n");
        assert_eq!(
            xml_of(&run),
            "<w:r><w:t xml:space=\"preserve\">line1</w:t><w:br/><w:t xml:space=\"preserve\">line2</w:t><w:tab/><w:t xml:space=\"preserve\">tab</w:t><w:br/></w:r>"
        );
        assert_eq!(run.text(), "line1\nline2\ttab\n");

        let crlf = Run::with_text("a\r\nb\rc");
        assert_eq!(crlf.text(), "a\nb\nc");
    }

    #[test]
    fn test_control_character_fails_serialization() {
        let run = Run::with_text("bad\u{1}char");
        let mut xml = String::new();
        assert!(matches!(run.to_xml(&mut xml), Err(crate::Error::Xml(_))));
    }

    #[test]
    fn test_empty_text_is_not_written() {
        assert_eq!(xml_of(&Run::with_text("")), "<w:r></w:r>");
    }

    #[test]
    fn test_page_break() {
        let mut run = Run::new();
        run.add_break(BreakType::Page);
        assert_eq!(xml_of(&run), "<w:r><w:br w:type=\"page\"/></w:r>");
        assert_eq!(run.text(), "");
    }
}
