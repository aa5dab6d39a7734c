//! The entity sum type and the state shared while rendering.

use super::config::FacadeConfig;
use super::paragraph::ParagraphEntity;
use super::picture::PictureEntity;
use super::section::SectionBreakEntity;
use super::table::TableEntity;
use super::title::TitleEntity;
use super::toc::TocEntity;
use crate::common::Result;
use crate::docx::Document;

/// Maps a reference key to its display text.
pub type Resolver = Box<dyn Fn(&str) -> String>;

/// A document fragment that renders itself into a [`Document`].
#[derive(Debug)]
pub enum Entity {
    Title(TitleEntity),
    Paragraph(ParagraphEntity),
    Picture(PictureEntity),
    Table(TableEntity),
    PageBreak,
    SectionBreak(SectionBreakEntity),
    TableOfContents(TocEntity),
}

impl Entity {
    /// Short name of the variant, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Entity::Title(_) => "title",
            Entity::Paragraph(_) => "paragraph",
            Entity::Picture(_) => "picture",
            Entity::Table(_) => "table",
            Entity::PageBreak => "page break",
            Entity::SectionBreak(_) => "section break",
            Entity::TableOfContents(_) => "table of contents",
        }
    }

    pub(crate) fn render(&mut self, doc: &mut Document, ctx: &mut RenderContext<'_>) -> Result<()> {
        match self {
            Entity::Title(title) => title.render(doc, ctx),
            Entity::Paragraph(paragraph) => paragraph.render(doc, ctx),
            Entity::Picture(picture) => picture.render(doc, ctx),
            Entity::Table(table) => table.render(doc, ctx),
            Entity::PageBreak => {
                doc.add_page_break();
                Ok(())
            },
            Entity::SectionBreak(section) => {
                section.render(doc);
                Ok(())
            },
            Entity::TableOfContents(toc) => toc.render(doc, ctx),
        }
    }
}

/// Which caption counter a numbered caption draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CaptionKind {
    Figure,
    Table,
}

/// Configuration and counters for one render pass.
pub(crate) struct RenderContext<'a> {
    pub(crate) config: &'a FacadeConfig,
    pub(crate) resolver: Option<&'a Resolver>,
    figures: u32,
    tables: u32,
}

impl<'a> RenderContext<'a> {
    pub(crate) fn new(config: &'a FacadeConfig, resolver: Option<&'a Resolver>) -> Self {
        Self {
            config,
            resolver,
            figures: 0,
            tables: 0,
        }
    }

    /// Caption number of a captioned entity: its explicit key, the next
    /// number of its kind when auto numbering is on, else the placeholder.
    pub(crate) fn caption_key(&mut self, kind: CaptionKind, key: Option<&str>) -> String {
        if let Some(key) = key {
            return key.to_string();
        }
        if !self.config.captions.auto_number {
            return self.config.labels.placeholder_key.clone();
        }
        let counter = match kind {
            CaptionKind::Figure => &mut self.figures,
            CaptionKind::Table => &mut self.tables,
        };
        *counter += 1;
        counter.to_string()
    }
}
