//! XML helpers shared by the package reader and writers.
//!
//! Generated parts are written as strings (see the writers in `docx`), while
//! parts read from a template are held in the retained tree from [`tree`] so
//! that they can be edited and written back without losing content.

mod escape;
pub mod tree;

pub use escape::{check_xml_text, escape_xml, is_xml_char, unescape_xml};
pub use tree::{XmlElement, XmlNode, parse_xml};
