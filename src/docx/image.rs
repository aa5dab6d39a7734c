/// Image support for DOCX documents.
use crate::common::unit::px_to_emu;
use crate::common::xml::escape_xml;
use crate::common::{Error, Length, Result};
use std::fmt::Write as FmtWrite;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Resolution assumed for images, matching Word's behaviour for files
/// without usable density metadata.
pub const DEFAULT_DPI: u32 = 72;

/// Image formats that can be embedded and measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
}

impl ImageFormat {
    /// Detect image format from byte signature.
    pub fn detect_from_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 8 {
            return None;
        }

        // PNG signature
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }

        // JPEG signature
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        // GIF signature
        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Some(Self::Gif);
        }

        // BMP signature
        if data.starts_with(b"BM") {
            return Some(Self::Bmp);
        }

        // TIFF signature (little-endian and big-endian)
        if data.starts_with(&[0x49, 0x49, 0x2A, 0x00])
            || data.starts_with(&[0x4D, 0x4D, 0x00, 0x2A])
        {
            return Some(Self::Tiff);
        }

        None
    }

    /// Get file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
        }
    }

    /// Get MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
        }
    }
}

/// An image loaded into memory and measured.
#[derive(Debug, Clone)]
pub struct ImageData {
    bytes: Vec<u8>,
    format: ImageFormat,
    px_width: u32,
    px_height: u32,
    /// File name used for the drawing's name
    name: String,
}

impl ImageData {
    /// Read and measure an image file.
    ///
    /// A file that does not exist yields [`Error::MissingImage`]; one that
    /// cannot be decoded yields [`Error::UnreadableImage`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::MissingImage(path.to_path_buf()),
            _ => Error::Io(e),
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Self::from_bytes(bytes, name).map_err(|e| match e {
            Error::UnreadableImage { reason, .. } => Error::UnreadableImage {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })
    }

    /// Measure an image held in memory.
    pub fn from_bytes(bytes: Vec<u8>, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let unreadable = |reason: String| Error::UnreadableImage {
            path: PathBuf::from(&name),
            reason,
        };

        let format = ImageFormat::detect_from_bytes(&bytes)
            .ok_or_else(|| unreadable("unknown image format".to_string()))?;
        let (px_width, px_height) = image::ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()
            .map_err(|e| unreadable(e.to_string()))?
            .into_dimensions()
            .map_err(|e| unreadable(e.to_string()))?;

        Ok(Self {
            bytes,
            format,
            px_width,
            px_height,
            name,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn px_width(&self) -> u32 {
        self.px_width
    }

    pub fn px_height(&self) -> u32 {
        self.px_height
    }

    /// Pixel aspect ratio, width over height. Not guarded against zero.
    pub fn aspect_ratio(&self) -> f64 {
        self.px_width as f64 / self.px_height as f64
    }

    /// Native size at [`DEFAULT_DPI`].
    pub fn native_size(&self) -> (Length, Length) {
        (
            Length::from_emus(px_to_emu(self.px_width, DEFAULT_DPI)),
            Length::from_emus(px_to_emu(self.px_height, DEFAULT_DPI)),
        )
    }

    /// Resolve the drawn extent from optional requested dimensions.
    ///
    /// A missing dimension is derived from the other one and the native
    /// aspect ratio; with neither, the native size is used.
    pub fn scaled_size(&self, width: Option<Length>, height: Option<Length>) -> (Length, Length) {
        let (native_width, native_height) = self.native_size();
        match (width, height) {
            (Some(w), Some(h)) => (w, h),
            (None, None) => (native_width, native_height),
            (None, Some(h)) => {
                let scale = h.emus() as f64 / native_height.emus() as f64;
                (
                    Length::from_emus((native_width.emus() as f64 * scale).round() as i64),
                    h,
                )
            },
            (Some(w), None) => {
                let scale = w.emus() as f64 / native_width.emus() as f64;
                (
                    w,
                    Length::from_emus((native_height.emus() as f64 * scale).round() as i64),
                )
            },
        }
    }
}

/// An inline picture placed in a run (`w:drawing/wp:inline`).
#[derive(Debug, Clone)]
pub struct InlinePicture {
    pub(crate) rel_id: String,
    /// Unique drawing object ID within the document
    pub(crate) id: u32,
    pub(crate) name: String,
    pub(crate) width: Length,
    pub(crate) height: Length,
}

impl InlinePicture {
    pub fn width(&self) -> Length {
        self.width
    }

    pub fn height(&self) -> Length {
        self.height
    }

    /// Serialize the inline picture to XML.
    pub(crate) fn to_xml(&self, xml: &mut String) -> Result<()> {
        let cx = self.width.emus();
        let cy = self.height.emus();
        let name = escape_xml(&self.name);

        write!(
            xml,
            r#"<w:drawing><wp:inline distT="0" distB="0" distL="0" distR="0"><wp:extent cx="{cx}" cy="{cy}"/><wp:docPr id="{id}" name="Picture {id}"/><wp:cNvGraphicFramePr><a:graphicFrameLocks xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" noChangeAspect="1"/></wp:cNvGraphicFramePr><a:graphic xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture"><pic:pic xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture"><pic:nvPicPr><pic:cNvPr id="0" name="{name}"/><pic:cNvPicPr/></pic:nvPicPr><pic:blipFill><a:blip r:embed="{rel}"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill><pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing>"#,
            id = self.id,
            rel = escape_xml(&self.rel_id),
        )?;

        Ok(())
    }
}
