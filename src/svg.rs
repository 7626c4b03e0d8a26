use std::collections::BTreeSet;
use std::fmt;

use image::Rgba;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::ConvertResult;

/// A single `<path>` produced by the tracer, stripped of its fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracedPath {
    pub d: String,
    pub transform: Option<String>,
}

/// Pull every `<path>` out of a tracer-generated document.
pub fn parse_traced_paths(svg: &str) -> ConvertResult<Vec<TracedPath>> {
    let mut reader = Reader::from_str(svg);
    let mut paths = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"path" => {
                let mut d = None;
                let mut transform = None;
                for attr in e.attributes() {
                    let attr = attr?;
                    match attr.key.as_ref() {
                        b"d" => d = Some(attr.unescape_value()?.into_owned()),
                        b"transform" => transform = Some(attr.unescape_value()?.into_owned()),
                        _ => {}
                    }
                }
                if let Some(d) = d.filter(|d| !d.trim().is_empty()) {
                    paths.push(TracedPath { d, transform });
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(paths)
}

/// Paths sharing one fill colour.
#[derive(Debug, Clone)]
struct Layer {
    color: Rgba<u8>,
    paths: Vec<TracedPath>,
}

/// Traced output assembled layer by layer; `Display` renders the markup.
#[derive(Debug, Clone)]
pub struct SvgDocument {
    width: u32,
    height: u32,
    layers: Vec<Layer>,
}

impl SvgDocument {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            layers: Vec::new(),
        }
    }

    /// Append the paths of one palette layer, filled with `color`.
    pub fn add_layer(&mut self, color: Rgba<u8>, paths: Vec<TracedPath>) {
        if !paths.is_empty() {
            self.layers.push(Layer { color, paths });
        }
    }

    /// Number of paths across all layers.
    pub fn path_count(&self) -> usize {
        self.layers.iter().map(|layer| layer.paths.len()).sum()
    }
}

/// `#RRGGBB` for the colour channels of a pixel.
pub fn hex_color(color: Rgba<u8>) -> String {
    let [r, g, b, _] = color.0;
    format!("#{r:02X}{g:02X}{b:02X}")
}

impl fmt::Display for SvgDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(
            f,
            r#"<svg version="1.1" xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        )?;
        for layer in &self.layers {
            let fill = hex_color(layer.color);
            let alpha = layer.color.0[3];
            let opacity = if alpha < 255 {
                format!(r#" fill-opacity="{:.3}""#, f32::from(alpha) / 255.0)
            } else {
                String::new()
            };
            for path in &layer.paths {
                write!(f, r#"<path d="{}" fill="{fill}"{opacity}"#, path.d.trim())?;
                if let Some(transform) = &path.transform {
                    write!(f, r#" transform="{transform}""#)?;
                }
                writeln!(f, "/>")?;
            }
        }
        write!(f, "</svg>")
    }
}

/// Structural facts about an SVG document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SvgSummary {
    pub width: Option<String>,
    pub height: Option<String>,
    pub view_box: Option<String>,
    pub paths: usize,
    pub images: usize,
    /// Distinct `fill` values of `<path>` elements.
    pub fills: BTreeSet<String>,
}

/// Walk an SVG document and collect its root size, path and image counts and fills.
pub fn inspect_svg(svg: &str) -> ConvertResult<SvgSummary> {
    let mut reader = Reader::from_str(svg);
    let mut summary = SvgSummary::default();
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                b"svg" => read_root(&e, &mut summary)?,
                b"path" => {
                    summary.paths += 1;
                    for attr in e.attributes() {
                        let attr = attr?;
                        if attr.key.as_ref() == b"fill" {
                            summary.fills.insert(attr.unescape_value()?.into_owned());
                        }
                    }
                }
                b"image" => summary.images += 1,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(summary)
}

fn read_root(e: &BytesStart<'_>, summary: &mut SvgSummary) -> ConvertResult<()> {
    for attr in e.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?.into_owned();
        match attr.key.as_ref() {
            b"width" => summary.width = Some(value),
            b"height" => summary.height = Some(value),
            b"viewBox" => summary.view_box = Some(value),
            _ => {}
        }
    }
    Ok(())
}
