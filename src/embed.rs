use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::Event;
use tracing::debug;

use crate::source::SourceFile;
use crate::{ConvertError, ConvertResult};

/// Wrap the file's bytes, untouched, in an SVG document sized to the decoded pixels.
pub fn embed_svg(file: &SourceFile) -> ConvertResult<String> {
    let (width, height) = file.dimensions()?;
    // A full decode catches corrupt data that header sniffing alone accepts.
    file.decode()?;
    debug!(name = file.name(), width, height, "embedding image");
    Ok(embed_svg_with_dimensions(&file.data_url(), width, height))
}

/// Render the embed template for an already-known data URL and size.
pub fn embed_svg_with_dimensions(data_url: &str, width: u32, height: u32) -> String {
    let data_url = escape(data_url);
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink"
     width="{width}" height="{height}" viewBox="0 0 {width} {height}">
  <image x="0" y="0" width="{width}" height="{height}"
         xlink:href="{data_url}" />
</svg>"#
    )
}

/// A decoded `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub media_type: String,
    pub bytes: Vec<u8>,
}

/// Parse a `data:<media type>;base64,<payload>` URL.
pub fn decode_data_url(url: &str) -> ConvertResult<DataUrl> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| ConvertError::DataUrl("missing `data:` scheme".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ConvertError::DataUrl("missing `,` before payload".to_string()))?;
    let media_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| ConvertError::DataUrl("only base64 payloads are supported".to_string()))?;
    let bytes = STANDARD.decode(payload.trim())?;
    Ok(DataUrl {
        media_type: media_type.to_string(),
        bytes,
    })
}

/// Recover the raster embedded by [`embed_svg`] from an SVG document.
pub fn extract_embedded(svg: &str) -> ConvertResult<DataUrl> {
    let mut reader = Reader::from_str(svg);
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"image" => {
                for attr in e.attributes() {
                    let attr = attr?;
                    if attr.key.local_name().as_ref() == b"href" {
                        let value = attr.unescape_value()?;
                        return decode_data_url(&value);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Err(ConvertError::DataUrl(
        "no embedded <image> element found".to_string(),
    ))
}
