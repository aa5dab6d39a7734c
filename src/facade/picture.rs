//! Picture entity and the page-fitting policy for its extent.
//!
//! The width of a picture follows the page orientation; its height is bounded
//! by a per-orientation ceiling. When the ceiling binds, the width constraint
//! is dropped so the embedded picture keeps its aspect ratio.

use super::entity::{CaptionKind, RenderContext};
use crate::common::{Length, Result};
use crate::docx::{Document, ImageData, Orientation};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Page-fitting constants for pictures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PictureGeometry {
    /// Width used on portrait pages when the caller gives none
    pub default_width: Length,
    /// Width used on landscape pages, whatever the caller asked for
    pub landscape_width: Length,
    pub landscape_max_height: Length,
    pub portrait_max_height: Length,
}

impl Default for PictureGeometry {
    fn default() -> Self {
        Self {
            default_width: Length::cm(17.8),
            landscape_width: Length::cm(25.5),
            landscape_max_height: Length::cm(13.0),
            portrait_max_height: Length::cm(19.5),
        }
    }
}

impl PictureGeometry {
    pub fn max_height(&self, orientation: Orientation) -> Length {
        match orientation {
            Orientation::Landscape => self.landscape_max_height,
            Orientation::Portrait => self.portrait_max_height,
        }
    }
}

/// The dimensions handed to the embed call. A `None` side is derived from
/// the image's aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PictureExtent {
    pub width: Option<Length>,
    pub height: Option<Length>,
}

/// Fit a picture of pixel aspect ratio `aspect_ratio` (width over height)
/// to a page of the given orientation.
///
/// Degenerate ratios are not rejected: a zero ratio makes the candidate
/// height infinite and the ceiling binds; a NaN ratio never exceeds it.
pub fn resolve_extent(
    requested_width: Option<Length>,
    requested_height: Option<Length>,
    orientation: Orientation,
    aspect_ratio: f64,
    geometry: &PictureGeometry,
) -> PictureExtent {
    let base = match orientation {
        Orientation::Landscape => geometry.landscape_width,
        Orientation::Portrait => requested_width.unwrap_or(geometry.default_width),
    };
    let ceiling = geometry.max_height(orientation);
    let candidate = base.emus() as f64 / aspect_ratio;

    let too_tall = candidate > ceiling.emus() as f64
        || requested_height.is_some_and(|h| h > ceiling);
    if too_tall {
        PictureExtent {
            width: None,
            height: Some(ceiling),
        }
    } else {
        PictureExtent {
            width: Some(base),
            height: requested_height,
        }
    }
}

/// A picture loaded from the image root, with an optional caption.
#[derive(Debug, Clone, PartialEq)]
pub struct PictureEntity {
    /// Path relative to the configured image root
    pub filename: PathBuf,
    pub width: Option<Length>,
    pub height: Option<Length>,
    pub caption: Option<String>,
    /// Caption number; see [`CaptionConfig`](super::CaptionConfig)
    pub key: Option<String>,
}

impl PictureEntity {
    pub fn new(filename: impl Into<PathBuf>) -> Self {
        Self {
            filename: filename.into(),
            width: None,
            height: None,
            caption: None,
            key: None,
        }
    }

    pub fn set_width(&mut self, width: Length) -> &mut Self {
        self.width = Some(width);
        self
    }

    pub fn set_height(&mut self, height: Length) -> &mut Self {
        self.height = Some(height);
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

    pub(crate) fn render(&self, doc: &mut Document, ctx: &mut RenderContext<'_>) -> Result<()> {
        let config = ctx.config;
        let orientation = doc.last_section().orientation();
        let path = config.image_root.join(&self.filename);
        let image = ImageData::from_path(&path)?;

        let extent = resolve_extent(
            self.width,
            self.height,
            orientation,
            image.aspect_ratio(),
            &config.picture,
        );
        log::debug!(
            "picture {} ({}x{} px, {} page): width {:?}, height {:?}",
            path.display(),
            image.px_width(),
            image.px_height(),
            orientation,
            extent.width.map(|w| w.to_string()),
            extent.height.map(|h| h.to_string()),
        );
        doc.add_picture(&image, extent.width, extent.height)?;

        if let Some(caption) = self.caption.as_deref().filter(|c| !c.is_empty()) {
            let key = ctx.caption_key(CaptionKind::Figure, self.key.as_deref());
            let text = config.labels.caption(&config.labels.figure, &key, caption);
            doc.add_paragraph(&text, Some(config.styles.figure_caption.as_str()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn geometry() -> PictureGeometry {
        PictureGeometry::default()
    }

    #[test]
    fn test_landscape_wide_picture_is_bounded_by_height() {
        // 25.5cm / 2.0 = 12.75cm fits under 13cm
        let extent = resolve_extent(None, None, Orientation::Landscape, 2.0, &geometry());
        assert_eq!(extent.width, Some(Length::cm(25.5)));
        assert_eq!(extent.height, None);

        // 25.5cm / 1.5 = 17cm exceeds 13cm
        let extent = resolve_extent(None, None, Orientation::Landscape, 1.5, &geometry());
        assert_eq!(
            extent,
            PictureExtent {
                width: None,
                height: Some(Length::cm(13.0))
            }
        );
    }

    #[test]
    fn test_landscape_ignores_requested_width() {
        let extent = resolve_extent(
            Some(Length::cm(5.0)),
            None,
            Orientation::Landscape,
            4.0,
            &geometry(),
        );
        assert_eq!(extent.width, Some(Length::cm(25.5)));
    }

    #[test]
    fn test_portrait_uses_requested_width() {
        let extent = resolve_extent(
            Some(Length::cm(10.0)),
            Some(Length::cm(4.0)),
            Orientation::Portrait,
            1.0,
            &geometry(),
        );
        assert_eq!(extent.width, Some(Length::cm(10.0)));
        assert_eq!(extent.height, Some(Length::cm(4.0)));
    }

    #[test]
    fn test_portrait_tall_picture() {
        // 17.8cm / 0.5 = 35.6cm exceeds 19.5cm
        let extent = resolve_extent(None, None, Orientation::Portrait, 0.5, &geometry());
        assert_eq!(extent.width, None);
        assert_eq!(extent.height, Some(Length::cm(19.5)));
    }

    #[test]
    fn test_requested_height_above_ceiling() {
        let extent = resolve_extent(
            Some(Length::cm(2.0)),
            Some(Length::cm(20.0)),
            Orientation::Portrait,
            1.0,
            &geometry(),
        );
        assert_eq!(extent.width, None);
        assert_eq!(extent.height, Some(Length::cm(19.5)));
    }

    #[test]
    fn test_shared_ceiling_config() {
        // both ceilings at 13cm: portrait pictures clamp like landscape ones
        let mut legacy = geometry();
        legacy.portrait_max_height = legacy.landscape_max_height;
        let extent = resolve_extent(None, None, Orientation::Portrait, 1.0, &legacy);
        assert_eq!(extent.height, Some(Length::cm(13.0)));
        let extent = resolve_extent(None, None, Orientation::Portrait, 1.0, &geometry());
        assert_eq!(extent.width, Some(Length::cm(17.8)));
    }

    #[test]
    fn test_degenerate_ratios_pass_through() {
        let extent = resolve_extent(None, None, Orientation::Portrait, 0.0, &geometry());
        assert_eq!(extent.height, Some(Length::cm(19.5)));
        let extent = resolve_extent(None, None, Orientation::Portrait, f64::NAN, &geometry());
        assert_eq!(extent.width, Some(Length::cm(17.8)));
    }

    proptest! {
        #[test]
        fn prop_extent_matches_policy(
            width_cm in 1.0f64..40.0,
            height_cm in proptest::option::of(1.0f64..40.0),
            ratio in 0.05f64..20.0,
            landscape in any::<bool>(),
        ) {
            let geometry = geometry();
            let orientation = if landscape { Orientation::Landscape } else { Orientation::Portrait };
            let width = Length::cm(width_cm);
            let height = height_cm.map(Length::cm);
            let extent = resolve_extent(Some(width), height, orientation, ratio, &geometry);

            let base = if landscape { geometry.landscape_width } else { width };
            let ceiling = geometry.max_height(orientation);
            let exceeds = base.emus() as f64 / ratio > ceiling.emus() as f64
                || height.is_some_and(|h| h > ceiling);
            if exceeds {
                prop_assert_eq!(extent, PictureExtent { width: None, height: Some(ceiling) });
            } else {
                prop_assert_eq!(extent, PictureExtent { width: Some(base), height });
            }
            // the resolved height never exceeds the ceiling
            prop_assert!(extent.height.is_none_or(|h| h <= ceiling));
        }
    }
}
