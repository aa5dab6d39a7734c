/// Paragraph types and implementation for DOCX documents.
use super::run::Run;
use super::section::Section;
use crate::common::Result;
use crate::common::xml::escape_xml;
use std::fmt::Write as FmtWrite;

/// A paragraph appended by this crate.
#[derive(Debug, Clone, Default)]
pub struct Paragraph {
    pub(crate) runs: Vec<Run>,
    /// Paragraph style ID
    pub(crate) style: Option<String>,
    /// Section that ends with this paragraph
    pub(crate) section: Option<Section>,
}

impl Paragraph {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add a new empty run to the paragraph.
    pub fn add_run(&mut self) -> &mut Run {
        self.runs.push(Run::new());
        self.last_run()
    }

    /// Add a run with text.
    pub fn add_run_with_text(&mut self, text: &str) -> &mut Run {
        self.runs.push(Run::with_text(text));
        self.last_run()
    }

    fn last_run(&mut self) -> &mut Run {
        let index = self.runs.len() - 1;
        &mut self.runs[index]
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn style_id(&self) -> Option<&str> {
        self.style.as_deref()
    }

    /// Set the paragraph style by ID.
    pub fn set_style_id(&mut self, style_id: Option<String>) {
        self.style = style_id;
    }

    /// Text of all runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(Run::text).collect()
    }

    pub(crate) fn to_xml(&self, xml: &mut String) -> Result<()> {
        xml.push_str("<w:p>");

        if self.style.is_some() || self.section.is_some() {
            xml.push_str("<w:pPr>");
            if let Some(ref style) = self.style {
                write!(xml, "<w:pStyle w:val=\"{}\"/>", escape_xml(style))?;
            }
            // sectPr is the last pPr child but one (pPrChange)
            if let Some(ref section) = self.section {
                section.to_xml(xml);
            }
            xml.push_str("</w:pPr>");
        }

        for run in &self.runs {
            run.to_xml(xml)?;
        }

        xml.push_str("</w:p>");
        Ok(())
    }
}
