//! docx-compose - declarative Word documents from a template
//!
//! Describe a report as an ordered list of entities and let the builder write
//! it into a `.docx` template in one pass.
//!
//! # Features
//!
//! - **Declarative builder**: titles, paragraphs with bold/italic/reference
//!   spans, pictures, tables, page and section breaks, tables of contents
//! - **Template aware**: styles, headers and any other part of the template
//!   are kept as they are
//! - **Picture auto-layout**: pictures fit the current page orientation
//! - **Localized labels**: caption labels and style names come from a
//!   [`FacadeConfig`], loadable from YAML
//!
//! # Example
//!
//! ```no_run
//! use docx_compose::{Docx, DocxOptions, Length, Orientation, SectionStart};
//! use docx_compose::docx::Table;
//!
//! # fn main() -> docx_compose::Result<()> {
//! let mut docx = Docx::new(DocxOptions::new().template("template.docx"));
//! docx.toc();
//! docx.page_break();
//! docx.section_title("Results");
//! docx.paragraph("Totals are ").bold("up");
//! docx.picture("chart.png")
//!     .set_width(Length::cm(12.0))
//!     .set_caption("Monthly totals");
//! docx.section_break(SectionStart::NewPage, Orientation::Landscape);
//! docx.table(2, 3, |table: &mut Table| {
//!     for (col, header) in ["Month", "In", "Out"].iter().enumerate() {
//!         if let Some(cell) = table.cell(0, col) {
//!             cell.set_text(header);
//!         }
//!     }
//!     Ok(())
//! });
//! let written = docx.save(None)?;
//! println!("wrote {}", written.display());
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Editing a document directly
//!
//! ```no_run
//! use docx_compose::docx::Document;
//!
//! # fn main() -> docx_compose::Result<()> {
//! let mut doc = Document::open("template.docx")?;
//! doc.add_heading("Appendix", 1, None)?;
//! doc.add_paragraph("See attached.", None)?;
//! doc.save("out.docx")?;
//! # Ok(())
//! # }
//! ```

pub mod common;
pub mod docx;
pub mod facade;

pub use common::{Error, Length, Result};
pub use docx::{Document, Orientation, SectionStart};
pub use facade::{Docx, DocxOptions, FacadeConfig};
