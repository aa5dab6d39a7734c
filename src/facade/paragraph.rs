//! Paragraph entity and the spans rendered inside it.

use super::entity::RenderContext;
use crate::common::Result;
use crate::docx::{Document, ParagraphMut};

/// Content added to an open paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    /// Plain run with an optional character style
    Normal { text: String, style: Option<String> },
    Bold { text: String, style: Option<String> },
    Italic { text: String, style: Option<String> },
    /// A separate list paragraph appended to the document. Spans after it
    /// still go to the enclosing paragraph.
    Item { text: String, style: Option<String> },
    /// Run whose text comes from the facade's resolver
    Reference { key: String },
}

impl Span {
    fn render(&self, paragraph: &mut ParagraphMut<'_>, ctx: &RenderContext<'_>) -> Result<()> {
        match self {
            Span::Normal { text, style } => {
                paragraph.add_run(text, style.as_deref())?;
            },
            Span::Bold { text, style } => {
                paragraph.add_run(text, style.as_deref())?.bold(true);
            },
            Span::Italic { text, style } => {
                paragraph.add_run(text, style.as_deref())?.italic(true);
            },
            Span::Item { text, style } => {
                let style = style.as_deref().unwrap_or(ctx.config.styles.list_item.as_str());
                paragraph.document().add_paragraph(text, Some(style))?;
            },
            Span::Reference { key } => match ctx.resolver {
                Some(resolve) => {
                    paragraph.add_run(&resolve(key.as_str()), None)?;
                },
                None => log::warn!("no resolver for reference '{}', skipped", key),
            },
        }
        Ok(())
    }
}

/// A paragraph: lead text in an optional style, then spans in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParagraphEntity {
    pub text: String,
    pub style: Option<String>,
    pub spans: Vec<Span>,
}

impl ParagraphEntity {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn set_style(&mut self, style: impl Into<String>) -> &mut Self {
        self.style = Some(style.into());
        self
    }

    pub fn push(&mut self, span: Span) -> &mut Self {
        self.spans.push(span);
        self
    }

    pub fn normal(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(Span::Normal {
            text: text.into(),
            style: None,
        })
    }

    pub fn bold(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(Span::Bold {
            text: text.into(),
            style: None,
        })
    }

    pub fn italic(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(Span::Italic {
            text: text.into(),
            style: None,
        })
    }

    /// Append a list item in the configured list style.
    pub fn item(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(Span::Item {
            text: text.into(),
            style: None,
        })
    }

    /// Append a run resolved from `key` at render time.
    pub fn reference(&mut self, key: impl Into<String>) -> &mut Self {
        self.push(Span::Reference { key: key.into() })
    }

    pub(crate) fn render(&self, doc: &mut Document, ctx: &mut RenderContext<'_>) -> Result<()> {
        let mut paragraph = doc.add_paragraph(&self.text, self.style.as_deref())?;
        for span in &self.spans {
            span.render(&mut paragraph, ctx)?;
        }
        Ok(())
    }
}
