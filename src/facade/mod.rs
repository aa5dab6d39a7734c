//! Declarative document builder.
//!
//! Callers describe a document as an ordered list of entities (titles,
//! paragraphs with spans, pictures, tables, breaks and table-of-contents
//! fields) through [`Docx`]. Nothing touches a document until
//! [`Docx::render`] or [`Docx::save`]: the template is then opened, baseline
//! styles are applied once, and every entity renders in order.
//!
//! # Example
//!
//! ```rust,no_run
//! use docx_compose::{Docx, DocxOptions, FacadeConfig, Orientation, SectionStart};
//! use docx_compose::docx::Table;
//! use std::path::Path;
//!
//! let options = DocxOptions::new()
//!     .config(FacadeConfig::french())
//!     .template("modele.docx")
//!     .resolver(|key| format!("section {}", key));
//! let mut docx = Docx::new(options);
//!
//! docx.toc();
//! docx.title("Introduction");
//! docx.paragraph("Voir ").reference("methods");
//! docx.section_break(SectionStart::NewPage, Orientation::Landscape);
//! docx.table(2, 2, |table: &mut Table| {
//!     if let Some(cell) = table.cell(0, 0) {
//!         cell.set_text("Total");
//!     }
//!     Ok(())
//! })
//! .set_caption("Résultats");
//! docx.save(Some(Path::new("rapport.docx")))?;
//! # Ok::<(), docx_compose::Error>(())
//! ```
mod builder;
mod config;
mod container;
mod entity;
mod paragraph;
mod picture;
mod section;
mod table;
mod title;
mod toc;

pub use builder::{Docx, DocxOptions, PreHook};
pub use config::{CaptionConfig, FacadeConfig, Labels, StyleNames, TocConfig};
pub use container::{BaselineStyles, EntityContainer, FontBaseline, SpacingBaseline};
pub use entity::{Entity, Resolver};
pub use paragraph::{ParagraphEntity, Span};
pub use picture::{PictureEntity, PictureExtent, PictureGeometry, resolve_extent};
pub use section::SectionBreakEntity;
pub use table::{PopulateTable, TableEntity};
pub use title::TitleEntity;
pub use toc::TocEntity;

#[cfg(test)]
mod tests;
