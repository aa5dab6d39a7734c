use super::entity::RenderContext;
use crate::common::Result;
use crate::docx::Document;

/// A heading. Level 0 is the document title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleEntity {
    pub text: String,
    pub level: u8,
    /// Overrides the level's default style
    pub style: Option<String>,
}

impl TitleEntity {
    pub fn new(text: impl Into<String>, level: u8) -> Self {
        Self {
            text: text.into(),
            level,
            style: None,
        }
    }

    pub fn set_style(&mut self, style: impl Into<String>) -> &mut Self {
        self.style = Some(style.into());
        self
    }

    pub(crate) fn render(&self, doc: &mut Document, _ctx: &mut RenderContext<'_>) -> Result<()> {
        doc.add_heading(&self.text, self.level, self.style.as_deref())?;
        Ok(())
    }
}
