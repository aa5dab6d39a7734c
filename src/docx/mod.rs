//! Word (.docx) document layer.
//!
//! A small writable model of a WordprocessingML package: open a template or
//! start from the built-in blank document, edit named styles, append
//! paragraphs, tables, pictures and sections, then save.
//!
//! # Example
//!
//! ```rust,no_run
//! use docx_compose::docx::{Document, SectionStart};
//!
//! let mut doc = Document::open("template.docx")?;
//! doc.add_heading("Results", 1, None)?;
//! let mut para = doc.add_paragraph("Measured ", None)?;
//! para.add_run("twice", None)?.bold(true);
//! doc.add_section(SectionStart::NewPage);
//! doc.save("report.docx")?;
//! # Ok::<(), docx_compose::Error>(())
//! ```
pub mod constants;
pub mod document;
pub mod image;
pub(crate) mod package;
pub mod paragraph;
pub mod run;
pub mod section;
pub mod style;
pub mod table;
pub(crate) mod template;

pub use document::{Document, ParagraphMut};
pub use image::{DEFAULT_DPI, ImageData, ImageFormat, InlinePicture};
pub use paragraph::Paragraph;
pub use run::{BreakType, FieldCharType, Run, RunContent};
pub use section::{Orientation, Section, SectionStart};
pub use style::{Style, StyleMut, StyleSheet, StyleType};
pub use table::{Cell, Row, Table};
