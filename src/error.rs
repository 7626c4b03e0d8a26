use thiserror::Error;

/// Result type alias for operations that may fail with [`ConvertError`].
pub type ConvertResult<T> = std::result::Result<T, ConvertError>;

/// Error types that can occur while selecting, converting, or inspecting images.
///
/// This enum covers file selection, image decoding, tracing, SVG parsing,
/// and settings validation.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The selected file does not declare an `image/*` media type.
    #[error("{name} is not an image (declared media type `{media_type}`)")]
    InvalidFileType { name: String, media_type: String },
    /// A conversion was requested before any file was selected.
    #[error("No file selected")]
    NoFileSelected,
    /// Image loading, decoding, or encoding error.
    #[error("Image processing failed: {0}")]
    Image(#[from] image::ImageError),
    /// File system I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Vectorization or tracing operation failed.
    #[error("Tracing failed: {0}")]
    Trace(String),
    /// Auto-trace requested in a build without a vectorizer.
    #[error("Auto-trace is unavailable: built without the `vectorizer-vtracer` feature")]
    TraceUnavailable,
    /// Malformed SVG markup.
    #[error("Invalid SVG: {0}")]
    Svg(#[from] quick_xml::Error),
    /// Malformed attribute inside SVG markup.
    #[error("Invalid SVG attribute: {0}")]
    SvgAttribute(#[from] quick_xml::events::attributes::AttrError),
    /// Malformed data URL or missing embedded image.
    #[error("Invalid data URL: {0}")]
    DataUrl(String),
    /// Invalid base64 payload inside a data URL.
    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    /// Settings file could not be parsed.
    #[error("Invalid settings file: {0}")]
    Settings(#[from] serde_json::Error),
    /// A settings field lies outside its allowed range.
    #[error("Setting `{name}` = {value} is out of range ({min}..={max})")]
    InvalidSetting {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}
