pub mod blur;
pub mod config;
pub mod embed;
pub mod error;
pub mod palette;
pub mod session;
pub mod source;
pub mod svg;
pub mod vectorizer;

pub use config::{ColorSampling, ConversionMethod, ConversionSettings, Preset};
pub use embed::{DataUrl, decode_data_url, embed_svg, extract_embedded};
pub use error::{ConvertError, ConvertResult};
pub use session::{ConversionResult, Session, download_name};
pub use source::{Preview, SourceFile};
pub use svg::{SvgSummary, inspect_svg};
pub use vectorizer::ImageVectorizer;
#[cfg(feature = "vectorizer-vtracer")]
pub use vectorizer::vtracer::{TraceOptions, VtracerSvgVectorizer, trace_to_svg_string};

use tracing::info;

/// Environment variable naming a JSON settings file.
pub const ENV_SETTINGS_PATH: &str = "IMG2SVG_SETTINGS";
/// Environment variable naming the directory downloads are written to.
pub const ENV_OUTPUT_DIR: &str = "IMG2SVG_OUTPUT_DIR";

/// Entry point for configuring and running a single conversion.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    /// Method selector and tuning parameters.
    settings: ConversionSettings,
    /// Tracer geometry knobs, only consulted by the trace method.
    #[cfg(feature = "vectorizer-vtracer")]
    trace_options: TraceOptions,
}

impl Converter {
    pub fn new(settings: ConversionSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Replace the conversion settings.
    pub fn with_settings(mut self, settings: ConversionSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Switch between embedding and tracing.
    pub fn with_method(mut self, method: ConversionMethod) -> Self {
        self.settings.method = method;
        self
    }

    /// Set the geometry options passed to the tracer.
    #[cfg(feature = "vectorizer-vtracer")]
    pub fn with_trace_options(mut self, options: TraceOptions) -> Self {
        self.trace_options = options;
        self
    }

    /// Get a reference to the conversion settings.
    pub fn settings(&self) -> &ConversionSettings {
        &self.settings
    }

    /// Convert one file with the configured method, producing a fresh result.
    pub fn convert(&self, file: &SourceFile) -> ConvertResult<ConversionResult> {
        if !file.is_image() {
            return Err(ConvertError::InvalidFileType {
                name: file.name().to_string(),
                media_type: file.media_type().to_string(),
            });
        }
        self.settings.validate()?;

        let svg = match self.settings.method {
            ConversionMethod::Embed => embed_svg(file)?,
            ConversionMethod::Trace => self.trace(file)?,
        };
        info!(
            name = file.name(),
            method = ?self.settings.method,
            svg_bytes = svg.len(),
            "converted image"
        );
        Ok(ConversionResult::new(svg, file.name()))
    }

    #[cfg(feature = "vectorizer-vtracer")]
    fn trace(&self, file: &SourceFile) -> ConvertResult<String> {
        let rgba = file.decode()?.to_rgba8();
        VtracerSvgVectorizer::new(self.trace_options.clone()).vectorize(&rgba, &self.settings)
    }

    #[cfg(not(feature = "vectorizer-vtracer"))]
    fn trace(&self, _file: &SourceFile) -> ConvertResult<String> {
        Err(ConvertError::TraceUnavailable)
    }
}
