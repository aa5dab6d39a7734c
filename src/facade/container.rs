//! Ordered entity storage and the one-time style setup that precedes
//! rendering.

use super::entity::{Entity, RenderContext};
use crate::common::{Length, Result};
use crate::docx::Document;
use serde::{Deserialize, Serialize};

/// Paragraph spacing applied to a named style. Fields left out of a
/// config file take the caption defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacingBaseline {
    pub style: String,
    pub space_before: Length,
    pub space_after: Length,
}

impl SpacingBaseline {
    fn new(style: &str, before_pt: f64, after_pt: f64) -> Self {
        Self {
            style: style.to_string(),
            space_before: Length::pt(before_pt),
            space_after: Length::pt(after_pt),
        }
    }
}

impl Default for SpacingBaseline {
    fn default() -> Self {
        Self::new("Caption", 1.0, 12.0)
    }
}

/// Font settings applied to the body text style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontBaseline {
    pub style: String,
    pub font_name: String,
    pub font_size: Length,
    pub bold: bool,
    pub italic: bool,
}

impl Default for FontBaseline {
    fn default() -> Self {
        Self {
            style: "Normal".to_string(),
            font_name: "Calibri".to_string(),
            font_size: Length::pt(11.0),
            bold: false,
            italic: false,
        }
    }
}

/// Typography every rendered document starts from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaselineStyles {
    pub caption: SpacingBaseline,
    pub body: FontBaseline,
    pub headings: Vec<SpacingBaseline>,
}

impl Default for BaselineStyles {
    fn default() -> Self {
        Self {
            caption: SpacingBaseline::default(),
            body: FontBaseline::default(),
            headings: vec![
                SpacingBaseline::new("Heading 1", 6.0, 12.0),
                SpacingBaseline::new("Heading 2", 6.0, 12.0),
            ],
        }
    }
}

impl BaselineStyles {
    /// Apply the settings to the document's styles. The first missing
    /// style fails the whole call.
    pub fn apply(&self, doc: &mut Document) -> Result<()> {
        let styles = doc.styles_mut();

        styles
            .require_mut(&self.caption.style)?
            .set_space_before(self.caption.space_before)
            .set_space_after(self.caption.space_after);

        styles
            .require_mut(&self.body.style)?
            .set_font_name(&self.body.font_name)
            .set_font_size(self.body.font_size)
            .set_italic(Some(self.body.italic))
            .set_bold(Some(self.body.bold));

        for heading in &self.headings {
            styles
                .require_mut(&heading.style)?
                .set_space_before(heading.space_before)
                .set_space_after(heading.space_after);
        }
        Ok(())
    }
}

/// The entities of one document, in document order.
#[derive(Debug, Default)]
pub struct EntityContainer {
    entities: Vec<Entity>,
}

impl EntityContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entity and return it for further configuration.
    pub fn append(&mut self, entity: Entity) -> &mut Entity {
        self.entities.push(entity);
        let index = self.entities.len() - 1;
        &mut self.entities[index]
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Set up baseline styles.
    pub fn initialize(&self, doc: &mut Document, baseline: &BaselineStyles) -> Result<()> {
        baseline.apply(doc)
    }

    /// Initialize styles once, then render every entity in order.
    ///
    /// Consumes the container, so no entity can render twice.
    pub(crate) fn render(mut self, doc: &mut Document, ctx: &mut RenderContext<'_>) -> Result<()> {
        self.initialize(doc, &ctx.config.baseline)?;
        for (index, entity) in self.entities.iter_mut().enumerate() {
            log::debug!("rendering entity {} ({})", index, entity.kind());
            entity.render(doc, ctx)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Error;
    use crate::docx::SectionStart;
    use crate::facade::{FacadeConfig, SectionBreakEntity};
    use crate::docx::Orientation;

    #[test]
    fn test_append_returns_stored_entity() {
        let mut container = EntityContainer::new();
        container.append(Entity::PageBreak);
        match container.append(Entity::SectionBreak(SectionBreakEntity::new(
            SectionStart::NewPage,
            Orientation::Portrait,
        ))) {
            Entity::SectionBreak(section) => section.orientation = Orientation::Landscape,
            _ => unreachable!(),
        }
        assert_eq!(container.len(), 2);
        assert!(matches!(
            &container.entities()[1],
            Entity::SectionBreak(s) if s.orientation == Orientation::Landscape
        ));
    }

    #[test]
    fn test_baseline_applied_without_entities() {
        let mut doc = Document::new().unwrap();
        let config = FacadeConfig::default();
        let mut ctx = RenderContext::new(&config, None);
        EntityContainer::new().render(&mut doc, &mut ctx).unwrap();

        let styles = doc.styles();
        let caption = styles.get("Caption").unwrap();
        assert_eq!(caption.space_before(), Some(Length::pt(1.0)));
        assert_eq!(caption.space_after(), Some(Length::pt(12.0)));
        let normal = styles.get("Normal").unwrap();
        assert_eq!(normal.font_name().as_deref(), Some("Calibri"));
        assert_eq!(normal.font_size(), Some(Length::pt(11.0)));
        assert_eq!(normal.bold(), Some(false));
        assert_eq!(normal.italic(), Some(false));
        for name in ["Heading 1", "Heading 2"] {
            let heading = styles.get(name).unwrap();
            assert_eq!(heading.space_before(), Some(Length::pt(6.0)));
            assert_eq!(heading.space_after(), Some(Length::pt(12.0)));
        }
    }

    #[test]
    fn test_missing_baseline_style_aborts_before_entities() {
        let mut doc = Document::new().unwrap();
        let mut config = FacadeConfig::default();
        config.baseline.headings.push(SpacingBaseline::new("Chapitre", 0.0, 0.0));
        let mut ctx = RenderContext::new(&config, None);

        let mut container = EntityContainer::new();
        container.append(Entity::PageBreak);
        let err = container.render(&mut doc, &mut ctx).unwrap_err();
        assert!(matches!(err, Error::MissingStyle(name) if name == "Chapitre"));
        assert_eq!(doc.paragraphs().count(), 0);
    }
}
