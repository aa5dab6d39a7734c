//! Facade configuration: caption labels, style names, TOC defaults,
//! picture geometry and baseline typography.
//!
//! Every section has defaults, so a YAML file only needs the keys it
//! changes. Lengths are written with units (`"17.8cm"`, `"12pt"`).

use super::container::BaselineStyles;
use super::picture::PictureGeometry;
use crate::common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Text put around caption numbers.
///
/// Values are stored without surrounding whitespace; [`Labels::caption`]
/// adds the spacing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    /// Prefix of figure captions
    pub figure: String,
    pub table: String,
    /// Between the number and the caption text
    pub separator: String,
    /// Put a space before the separator, as French typography does
    pub space_before_separator: bool,
    /// Number written when a captioned entity has no key
    pub placeholder_key: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            figure: "Figure".to_string(),
            table: "Table".to_string(),
            separator: ":".to_string(),
            space_before_separator: false,
            placeholder_key: "?".to_string(),
        }
    }
}

impl Labels {
    /// Caption text: `"{label} {key}{separator} {text}"`.
    pub fn caption(&self, label: &str, key: &str, text: &str) -> String {
        let gap = if self.space_before_separator { " " } else { "" };
        format!(
            "{} {}{}{} {}",
            label.trim(),
            key,
            gap,
            self.separator.trim(),
            text
        )
    }
}

/// Names of the styles the facade renders with. Every name must exist in
/// the document when the entity using it renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleNames {
    /// Style of [`Docx::title`](super::Docx::title)
    pub title: String,
    pub figure_caption: String,
    pub table_caption: String,
    /// Style of the heading written above a table of contents
    pub toc_heading: String,
    pub list_item: String,
}

impl Default for StyleNames {
    fn default() -> Self {
        Self {
            title: "Title".to_string(),
            figure_caption: "Caption".to_string(),
            table_caption: "Caption".to_string(),
            toc_heading: "TOC Heading".to_string(),
            list_item: "List Paragraph".to_string(),
        }
    }
}

/// Defaults for table-of-contents fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TocConfig {
    pub title: Option<String>,
    /// Field instruction, e.g. `TOC \o "1-3" \h \z \u`
    pub command: String,
    pub list_of_figures_title: Option<String>,
    /// Shown until the reader updates the field
    pub placeholder: String,
}

impl Default for TocConfig {
    fn default() -> Self {
        Self {
            title: Some("Contents".to_string()),
            command: r#"TOC \o "1-3" \h \z \u"#.to_string(),
            list_of_figures_title: Some("Table of Figures".to_string()),
            placeholder: "Right-click to update field.".to_string(),
        }
    }
}

/// Caption numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionConfig {
    /// Number captions without an explicit key, counting figures and
    /// tables separately
    pub auto_number: bool,
}

/// Complete facade configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacadeConfig {
    pub labels: Labels,
    pub styles: StyleNames,
    pub toc: TocConfig,
    pub picture: PictureGeometry,
    pub captions: CaptionConfig,
    pub baseline: BaselineStyles,
    /// Directory picture file names are resolved against
    pub image_root: PathBuf,
}

impl Default for FacadeConfig {
    fn default() -> Self {
        Self {
            labels: Labels::default(),
            styles: StyleNames::default(),
            toc: TocConfig::default(),
            picture: PictureGeometry::default(),
            captions: CaptionConfig::default(),
            baseline: BaselineStyles::default(),
            image_root: PathBuf::from("images"),
        }
    }
}

impl FacadeConfig {
    /// French labels and the style names of French report templates.
    pub fn french() -> Self {
        Self {
            labels: Labels {
                table: "Tableau".to_string(),
                space_before_separator: true,
                ..Labels::default()
            },
            styles: StyleNames {
                title: "Chapitre".to_string(),
                figure_caption: "Légende Figure".to_string(),
                table_caption: "Légende Tableau".to_string(),
                toc_heading: "Illustration Index Heading".to_string(),
                list_item: "List Paragraph".to_string(),
            },
            toc: TocConfig {
                title: Some("Table des matières".to_string()),
                list_of_figures_title: Some("Table des figures".to_string()),
                placeholder: "Clic droit pour mettre à jour le champ.".to_string(),
                ..TocConfig::default()
            },
            ..Self::default()
        }
    }

    /// Parse a YAML document. Missing keys keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_saphyr::from_str(yaml).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_saphyr::to_string(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Field instruction listing the captions of all figures.
    pub fn list_of_figures_command(&self) -> String {
        format!(r#"TOC \h \z \c "{}""#, self.labels.figure.trim())
    }
}
