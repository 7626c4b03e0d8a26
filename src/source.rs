use std::fs;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, ImageFormat};
use tracing::debug;

use crate::ConvertResult;

/// Media type assumed when the file name gives no hint.
pub const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

/// A user-selected file: raw bytes plus the name and declared media type.
///
/// The declared media type is trusted for selection and for the embedded
/// data URL; decoding sniffs the actual bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    name: String,
    media_type: String,
    bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, declaring its media type from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> ConvertResult<Self> {
        let path = path.as_ref();
        let media_type = media_type_for_path(path);
        Self::from_path_with_media_type(path, media_type)
    }

    /// Read a file from disk with an explicitly declared media type.
    pub fn from_path_with_media_type(
        path: impl AsRef<Path>,
        media_type: impl Into<String>,
    ) -> ConvertResult<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, media_type, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Whether the declared media type is an image type.
    pub fn is_image(&self) -> bool {
        is_image_media_type(&self.media_type)
    }

    /// `data:<media type>;base64,<payload>` view of the file.
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.media_type,
            STANDARD.encode(&self.bytes)
        )
    }

    /// Decode the bytes into pixels, sniffing the format from the content.
    pub fn decode(&self) -> ConvertResult<DynamicImage> {
        let image = image::load_from_memory(&self.bytes)?;
        debug!(
            name = %self.name,
            width = image.width(),
            height = image.height(),
            "decoded source image"
        );
        Ok(image)
    }

    /// Pixel dimensions without decoding the whole image.
    pub fn dimensions(&self) -> ConvertResult<(u32, u32)> {
        let reader = image::ImageReader::new(std::io::Cursor::new(&self.bytes))
            .with_guessed_format()?;
        Ok(reader.into_dimensions()?)
    }
}

/// Whether a media type names an image (`image/*`).
pub fn is_image_media_type(media_type: &str) -> bool {
    media_type.starts_with("image/")
}

/// Declared media type for a path, derived from its extension.
pub fn media_type_for_path(path: &Path) -> &'static str {
    match ImageFormat::from_path(path) {
        Ok(format) => format.to_mime_type(),
        Err(_) if has_svg_extension(path) => "image/svg+xml",
        Err(_) => UNKNOWN_MEDIA_TYPE,
    }
}

fn has_svg_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
}

/// On-screen view of the selected file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    data_url: String,
}

impl Preview {
    pub fn of(file: &SourceFile) -> Self {
        Self {
            data_url: file.data_url(),
        }
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }
}
