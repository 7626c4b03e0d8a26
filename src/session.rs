use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::Converter;
use crate::config::ConversionSettings;
use crate::source::{Preview, SourceFile};
use crate::{ConvertError, ConvertResult};

/// Generated SVG markup together with the file it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    svg: String,
    original_file_name: String,
}

impl ConversionResult {
    pub fn new(svg: String, original_file_name: impl Into<String>) -> Self {
        Self {
            svg,
            original_file_name: original_file_name.into(),
        }
    }

    pub fn svg(&self) -> &str {
        &self.svg
    }

    pub fn original_file_name(&self) -> &str {
        &self.original_file_name
    }

    /// File name offered for download, see [`download_name`].
    pub fn download_name(&self) -> String {
        download_name(&self.original_file_name)
    }

    /// Write the SVG into `dir` under its download name, returning the written path.
    pub fn save_in(&self, dir: impl AsRef<Path>) -> ConvertResult<PathBuf> {
        let path = dir.as_ref().join(self.download_name());
        self.save(&path)?;
        Ok(path)
    }

    /// Write the SVG to an explicit path.
    pub fn save(&self, path: impl AsRef<Path>) -> ConvertResult<()> {
        fs::write(path, &self.svg)?;
        Ok(())
    }
}

/// Text before the first `.` of the file name, with `.svg` appended.
pub fn download_name(file_name: &str) -> String {
    let base = file_name.split('.').next().unwrap_or_default();
    format!("{base}.svg")
}

/// The state behind one conversion screen: the selected file, its preview, and the latest result.
#[derive(Debug, Clone, Default)]
pub struct Session {
    converter: Converter,
    selected: Option<SourceFile>,
    preview: Option<Preview>,
    result: Option<ConversionResult>,
}

impl Session {
    pub fn new(converter: Converter) -> Self {
        Self {
            converter,
            ..Self::default()
        }
    }

    /// Select a new file. Non-image files are rejected and leave the session untouched.
    pub fn select(&mut self, file: SourceFile) -> ConvertResult<()> {
        if !file.is_image() {
            warn!(
                name = file.name(),
                media_type = file.media_type(),
                "rejected non-image file"
            );
            return Err(ConvertError::InvalidFileType {
                name: file.name().to_string(),
                media_type: file.media_type().to_string(),
            });
        }
        debug!(name = file.name(), bytes = file.bytes().len(), "selected file");
        self.preview = Some(Preview::of(&file));
        self.selected = Some(file);
        self.result = None;
        Ok(())
    }

    /// Convert the selected file with the current settings, replacing any previous result.
    pub fn convert(&mut self) -> ConvertResult<&ConversionResult> {
        let file = self.selected.as_ref().ok_or(ConvertError::NoFileSelected)?;
        self.result = None;
        let result = self.converter.convert(file)?;
        Ok(self.result.insert(result))
    }

    pub fn selected(&self) -> Option<&SourceFile> {
        self.selected.as_ref()
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn result(&self) -> Option<&ConversionResult> {
        self.result.as_ref()
    }

    /// Consume the session, keeping only the latest result.
    pub fn into_result(self) -> Option<ConversionResult> {
        self.result
    }

    pub fn settings(&self) -> &ConversionSettings {
        self.converter.settings()
    }

    /// Replace the settings used by later conversions; the current result is kept.
    pub fn set_settings(&mut self, settings: ConversionSettings) {
        self.converter = self.converter.clone().with_settings(settings);
    }

    /// Forget the selected file, preview, and result.
    pub fn clear(&mut self) {
        self.selected = None;
        self.preview = None;
        self.result = None;
    }
}
