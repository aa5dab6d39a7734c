use crate::docx::{Document, Orientation, SectionStart};

/// Ends the current section and starts a new one, rotating the page when
/// the orientation changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SectionBreakEntity {
    pub start_type: SectionStart,
    pub orientation: Orientation,
}

impl SectionBreakEntity {
    pub fn new(start_type: SectionStart, orientation: Orientation) -> Self {
        Self {
            start_type,
            orientation,
        }
    }

    pub(crate) fn render(&self, doc: &mut Document) {
        let previous = doc.last_section().orientation();
        let section = doc.add_section(self.start_type);
        if previous != self.orientation {
            let (width, height) = (section.page_width(), section.page_height());
            section.set_page_width(height);
            section.set_page_height(width);
            section.set_orientation(self.orientation);
        }
    }
}
