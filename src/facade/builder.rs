//! The builder API: one method per entity kind, then a single render.

use super::config::FacadeConfig;
use super::container::EntityContainer;
use super::entity::{Entity, RenderContext, Resolver};
use super::paragraph::ParagraphEntity;
use super::picture::PictureEntity;
use super::section::SectionBreakEntity;
use super::table::{PopulateTable, TableEntity};
use super::title::TitleEntity;
use super::toc::TocEntity;
use crate::common::{Error, Result};
use crate::docx::{Document, Orientation, SectionStart, Table};
use std::fmt;
use std::path::{Path, PathBuf};

/// Runs against the opened document before any entity renders.
pub type PreHook = Box<dyn FnOnce(&mut Document) -> Result<()>>;

/// Everything fixed at construction time.
#[derive(Default)]
pub struct DocxOptions {
    /// Template to open; also the default save target
    pub template: Option<PathBuf>,
    pub pre_hook: Option<PreHook>,
    /// Resolves reference spans
    pub resolver: Option<Resolver>,
    pub config: FacadeConfig,
}

impl fmt::Debug for DocxOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocxOptions")
            .field("template", &self.template)
            .field("pre_hook", &self.pre_hook.is_some())
            .field("resolver", &self.resolver.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl DocxOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn template(mut self, path: impl Into<PathBuf>) -> Self {
        self.template = Some(path.into());
        self
    }

    pub fn pre_hook(mut self, hook: impl FnOnce(&mut Document) -> Result<()> + 'static) -> Self {
        self.pre_hook = Some(Box::new(hook));
        self
    }

    pub fn resolver(mut self, resolver: impl Fn(&str) -> String + 'static) -> Self {
        self.resolver = Some(Box::new(resolver));
        self
    }

    pub fn config(mut self, config: FacadeConfig) -> Self {
        self.config = config;
        self
    }
}

/// Declarative document builder.
///
/// Entities are collected in call order and rendered in one pass by
/// [`render`](Docx::render) or [`save`](Docx::save). Each method returns the
/// appended entity so its fields can still be changed before rendering.
///
/// # Example
///
/// ```rust,no_run
/// use docx_compose::{Docx, DocxOptions};
///
/// let mut docx = Docx::new(DocxOptions::new().template("report.docx"));
/// docx.title("Intro");
/// docx.paragraph("Hello ").bold("World");
/// docx.picture("chart.png").set_caption("Monthly totals").set_key("1");
/// docx.save(None)?;
/// # Ok::<(), docx_compose::Error>(())
/// ```
#[derive(Debug)]
pub struct Docx {
    options: DocxOptions,
    container: EntityContainer,
}

impl Default for Docx {
    fn default() -> Self {
        Self::new(DocxOptions::default())
    }
}

impl Docx {
    pub fn new(options: DocxOptions) -> Self {
        Self {
            options,
            container: EntityContainer::new(),
        }
    }

    pub fn config(&self) -> &FacadeConfig {
        &self.options.config
    }

    pub fn entities(&self) -> &[Entity] {
        self.container.entities()
    }

    /// Table of contents with the configured title and command.
    pub fn toc(&mut self) -> &mut TocEntity {
        let toc = &self.options.config.toc;
        let entity = TocEntity::new(toc.title.clone(), toc.command.clone());
        self.push_toc(entity)
    }

    pub fn toc_with(&mut self, title: Option<&str>, command: &str) -> &mut TocEntity {
        self.push_toc(TocEntity::new(title.map(str::to_string), command))
    }

    /// List of figures: a TOC field over the figure captions.
    pub fn list_of_figures(&mut self) -> &mut TocEntity {
        let config = &self.options.config;
        let entity = TocEntity::new(
            config.toc.list_of_figures_title.clone(),
            config.list_of_figures_command(),
        );
        self.push_toc(entity)
    }

    fn push_toc(&mut self, entity: TocEntity) -> &mut TocEntity {
        match self.container.append(Entity::TableOfContents(entity)) {
            Entity::TableOfContents(toc) => toc,
            _ => unreachable!(),
        }
    }

    /// Document title in the configured title style.
    pub fn title(&mut self, text: impl Into<String>) -> &mut TitleEntity {
        let mut entity = TitleEntity::new(text, 0);
        entity.set_style(self.options.config.styles.title.clone());
        self.push_title(entity)
    }

    pub fn heading(&mut self, text: impl Into<String>, level: u8) -> &mut TitleEntity {
        self.push_title(TitleEntity::new(text, level))
    }

    pub fn section_title(&mut self, text: impl Into<String>) -> &mut TitleEntity {
        self.heading(text, 1)
    }

    pub fn subsection_title(&mut self, text: impl Into<String>) -> &mut TitleEntity {
        self.heading(text, 2)
    }

    pub fn subsubsection_title(&mut self, text: impl Into<String>) -> &mut TitleEntity {
        self.heading(text, 3)
    }

    fn push_title(&mut self, entity: TitleEntity) -> &mut TitleEntity {
        match self.container.append(Entity::Title(entity)) {
            Entity::Title(title) => title,
            _ => unreachable!(),
        }
    }

    pub fn paragraph(&mut self, text: impl Into<String>) -> &mut ParagraphEntity {
        self.push_paragraph(ParagraphEntity::new(text))
    }

    /// Paragraph holding a single bold run.
    pub fn bold(&mut self, text: impl Into<String>) -> &mut ParagraphEntity {
        let mut entity = ParagraphEntity::new("");
        entity.bold(text);
        self.push_paragraph(entity)
    }

    fn push_paragraph(&mut self, entity: ParagraphEntity) -> &mut ParagraphEntity {
        match self.container.append(Entity::Paragraph(entity)) {
            Entity::Paragraph(paragraph) => paragraph,
            _ => unreachable!(),
        }
    }

    /// Picture from the image root, fitted to the page at render time.
    pub fn picture(&mut self, filename: impl Into<PathBuf>) -> &mut PictureEntity {
        match self
            .container
            .append(Entity::Picture(PictureEntity::new(filename)))
        {
            Entity::Picture(picture) => picture,
            _ => unreachable!(),
        }
    }

    /// Table filled by `populate` once created.
    pub fn table<F>(&mut self, rows: usize, cols: usize, populate: F) -> &mut TableEntity
    where
        F: FnMut(&mut Table) -> Result<()> + 'static,
    {
        self.table_with(rows, cols, populate)
    }

    pub fn table_with(
        &mut self,
        rows: usize,
        cols: usize,
        populate: impl PopulateTable + 'static,
    ) -> &mut TableEntity {
        match self
            .container
            .append(Entity::Table(TableEntity::new(rows, cols, populate)))
        {
            Entity::Table(table) => table,
            _ => unreachable!(),
        }
    }

    pub fn page_break(&mut self) {
        self.container.append(Entity::PageBreak);
    }

    pub fn section_break(
        &mut self,
        start: SectionStart,
        orientation: Orientation,
    ) -> &mut SectionBreakEntity {
        match self
            .container
            .append(Entity::SectionBreak(SectionBreakEntity::new(start, orientation)))
        {
            Entity::SectionBreak(section) => section,
            _ => unreachable!(),
        }
    }

    /// Open the template (or a blank document), run the pre hook, then
    /// render every entity. Nothing is written.
    pub fn render(self) -> Result<Document> {
        let Docx { options, container } = self;
        let DocxOptions {
            template,
            pre_hook,
            resolver,
            config,
        } = options;

        let mut doc = match &template {
            Some(path) => Document::open(path)?,
            None => Document::new()?,
        };
        if let Some(hook) = pre_hook {
            hook(&mut doc)?;
        }

        log::info!("rendering {} entities", container.len());
        let mut ctx = RenderContext::new(&config, resolver.as_ref());
        container.render(&mut doc, &mut ctx)?;
        Ok(doc)
    }

    /// Render and write the document to `target`, or back to the template
    /// when no target is given. Returns the path written.
    pub fn save(self, target: Option<&Path>) -> Result<PathBuf> {
        let target = target
            .map(Path::to_path_buf)
            .or_else(|| self.options.template.clone())
            .ok_or(Error::NoTarget)?;
        let doc = self.render()?;
        doc.save(&target)?;
        Ok(target)
    }
}
