use super::entity::{CaptionKind, RenderContext};
use crate::common::Result;
use crate::docx::{Document, Table};
use std::fmt;

/// Writes the cells of a freshly created table.
///
/// Any `FnMut(&mut Table) -> Result<()>` closure implements it.
pub trait PopulateTable {
    fn populate(&mut self, table: &mut Table) -> Result<()>;
}

impl<F> PopulateTable for F
where
    F: FnMut(&mut Table) -> Result<()>,
{
    fn populate(&mut self, table: &mut Table) -> Result<()> {
        self(table)
    }
}

/// A table of fixed size whose cells are filled by a caller routine.
pub struct TableEntity {
    pub rows: usize,
    pub cols: usize,
    pub style: Option<String>,
    pub caption: Option<String>,
    /// Caption number; see [`CaptionConfig`](super::CaptionConfig)
    pub key: Option<String>,
    populate: Box<dyn PopulateTable>,
}

impl fmt::Debug for TableEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableEntity")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("style", &self.style)
            .field("caption", &self.caption)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl TableEntity {
    pub fn new(rows: usize, cols: usize, populate: impl PopulateTable + 'static) -> Self {
        Self {
            rows,
            cols,
            style: None,
            caption: None,
            key: None,
            populate: Box::new(populate),
        }
    }

    pub fn set_style(&mut self, style: impl Into<String>) -> &mut Self {
        self.style = Some(style.into());
        self
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) -> &mut Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn set_key(&mut self, key: impl Into<String>) -> &mut Self {
        self.key = Some(key.into());
        self
    }

    pub(crate) fn render(&mut self, doc: &mut Document, ctx: &mut RenderContext<'_>) -> Result<()> {
        let table = doc.add_table(self.rows, self.cols, self.style.as_deref())?;
        self.populate.populate(table)?;

        if let Some(caption) = self.caption.as_deref().filter(|c| !c.is_empty()) {
            let config = ctx.config;
            let key = ctx.caption_key(CaptionKind::Table, self.key.as_deref());
            let text = config.labels.caption(&config.labels.table, &key, caption);
            doc.add_paragraph(&text, Some(config.styles.table_caption.as_str()))?;
        }
        Ok(())
    }
}
