use super::entity::RenderContext;
use crate::common::Result;
use crate::docx::{Document, FieldCharType};

/// A table-of-contents field, optionally headed by a title paragraph.
///
/// Only the field is written. Word fills in the entries when the reader
/// updates fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntity {
    pub title: Option<String>,
    /// Field instruction written verbatim
    pub command: String,
}

impl TocEntity {
    pub fn new(title: Option<String>, command: impl Into<String>) -> Self {
        Self {
            title,
            command: command.into(),
        }
    }

    pub(crate) fn render(&self, doc: &mut Document, ctx: &mut RenderContext<'_>) -> Result<()> {
        let config = ctx.config;
        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            doc.add_paragraph(title, Some(config.styles.toc_heading.as_str()))?;
        }

        let mut paragraph = doc.add_paragraph("", None)?;
        paragraph
            .add_run("", None)?
            .add_field_char(FieldCharType::Begin)
            .add_instr_text(&self.command)
            .add_field_char(FieldCharType::Separate)
            .add_text(&config.toc.placeholder)
            .add_field_char(FieldCharType::End);
        Ok(())
    }
}
