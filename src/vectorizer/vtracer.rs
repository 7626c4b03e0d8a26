use image::{GrayImage, Luma, RgbaImage};
use tracing::{debug, info};
use visioncortex::PathSimplifyMode;
use vtracer::{ColorImage, ColorMode, Config, Hierarchical, SvgFile, convert};

use crate::config::ConversionSettings;
use crate::palette::quantize;
use crate::svg::{SvgDocument, parse_traced_paths};
use crate::{ConvertError, ConvertResult};

use super::ImageVectorizer;

/// Geometry knobs handed to VTracer for every palette layer.
#[derive(Debug, Clone)]
pub struct TraceOptions {
    pub tracer_mode: PathSimplifyMode,
    pub tracer_corner_threshold: i32,
    pub tracer_length_threshold: f64,
    pub tracer_max_iterations: usize,
    pub tracer_splice_threshold: i32,
    pub tracer_path_precision: Option<u32>,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            tracer_mode: PathSimplifyMode::Spline,
            tracer_corner_threshold: 60,
            tracer_length_threshold: 4.0,
            tracer_max_iterations: 10,
            tracer_splice_threshold: 45,
            tracer_path_precision: Some(2),
        }
    }
}

/// VTracer-based SVG vectorizer: quantizes colours, then traces each palette layer.
#[derive(Debug, Clone, Default)]
pub struct VtracerSvgVectorizer {
    pub options: TraceOptions,
}

impl VtracerSvgVectorizer {
    pub fn new(options: TraceOptions) -> Self {
        Self { options }
    }
}

impl ImageVectorizer for VtracerSvgVectorizer {
    type Output = String;

    fn vectorize(
        &self,
        image: &RgbaImage,
        settings: &ConversionSettings,
    ) -> ConvertResult<Self::Output> {
        trace_to_svg_string(image, settings, &self.options)
    }
}

/// Trace an RGBA image into SVG markup.
pub fn trace_to_svg_string(
    image: &RgbaImage,
    settings: &ConversionSettings,
    options: &TraceOptions,
) -> ConvertResult<String> {
    Ok(trace_document(image, settings, options)?.to_string())
}

/// Trace an RGBA image into a document with one fill colour per palette layer.
pub fn trace_document(
    image: &RgbaImage,
    settings: &ConversionSettings,
    options: &TraceOptions,
) -> ConvertResult<SvgDocument> {
    let (width, height) = image.dimensions();
    let quantized = quantize(image, settings);

    let mut document = SvgDocument::new(width, height);
    for (index, color) in quantized.palette.iter().enumerate() {
        let members = quantized.pixel_count(index);
        if members == 0 || color.0[3] == 0 {
            debug!(index, members, alpha = color.0[3], "skipping palette layer");
            continue;
        }
        let layer = mask_to_color_image(&quantized.layer_mask(index));
        let svg_file = trace(layer, settings.path_omit, options)?;
        let paths = parse_traced_paths(&svg_file.to_string())?;
        debug!(index, members, paths = paths.len(), "traced palette layer");
        document.add_layer(*color, paths);
    }

    info!(
        width,
        height,
        colors = quantized.palette.len(),
        paths = document.path_count(),
        "traced image"
    );
    Ok(document)
}

/// Convert a layer mask into the VTracer input, with members drawn black on white.
pub fn mask_to_color_image(mask: &GrayImage) -> ColorImage {
    let (w, h) = mask.dimensions();
    let (w_usize, h_usize) = (w as usize, h as usize);
    let mut rgba = vec![0u8; 4 * w_usize * h_usize];

    for (i, Luma([g])) in mask.pixels().enumerate() {
        let v = 255u8.saturating_sub(*g);
        let idx = i * 4;
        rgba[idx] = v;
        rgba[idx + 1] = v;
        rgba[idx + 2] = v;
        rgba[idx + 3] = 255;
    }

    ColorImage {
        pixels: rgba,
        width: w_usize,
        height: h_usize,
    }
}

/// Trace one binary layer with VTracer, omitting regions smaller than `path_omit` per side.
pub fn trace(img: ColorImage, path_omit: u32, options: &TraceOptions) -> ConvertResult<SvgFile> {
    let cfg = Config {
        color_mode: ColorMode::Binary,
        hierarchical: Hierarchical::Cutout,
        mode: options.tracer_mode,
        filter_speckle: path_omit as usize,
        color_precision: 8,
        layer_difference: 0,
        corner_threshold: options.tracer_corner_threshold,
        length_threshold: options.tracer_length_threshold,
        max_iterations: options.tracer_max_iterations,
        splice_threshold: options.tracer_splice_threshold,
        path_precision: options.tracer_path_precision,
    };

    let svg_file = convert(img, cfg).map_err(ConvertError::Trace)?;
    Ok(svg_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColorSampling;
    use crate::svg::inspect_svg;
    use image::Rgba;

    /// Four flat quadrants in distinct colours.
    fn quadrants(size: u32) -> RgbaImage {
        let half = size / 2;
        RgbaImage::from_fn(size, size, |x, y| match (x < half, y < half) {
            (true, true) => Rgba([230, 20, 20, 255]),
            (false, true) => Rgba([20, 230, 20, 255]),
            (true, false) => Rgba([20, 20, 230, 255]),
            (false, false) => Rgba([240, 240, 240, 255]),
        })
    }

    mod mask_to_color_image {
        use super::*;

        #[test]
        fn members_become_black() {
            let mut mask = GrayImage::new(2, 1);
            mask.put_pixel(0, 0, Luma([255]));
            let img = mask_to_color_image(&mask);
            assert_eq!(img.width, 2);
            assert_eq!(img.height, 1);
            assert_eq!(img.pixels, vec![0, 0, 0, 255, 255, 255, 255, 255]);
        }
    }

    mod trace_document {
        use super::*;

        #[test]
        fn two_colours_yield_at_most_two_fills() {
            let image = quadrants(32);
            let settings = ConversionSettings::trace()
                .with_number_of_colors(2)
                .with_seed(Some(11));
            let svg = trace_to_svg_string(&image, &settings, &TraceOptions::default()).unwrap();
            let summary = inspect_svg(&svg).unwrap();

            assert!(summary.paths > 0);
            assert!(summary.fills.len() <= 2, "fills: {:?}", summary.fills);
            assert_eq!(summary.width.as_deref(), Some("32"));
            assert_eq!(summary.height.as_deref(), Some("32"));
        }

        #[test]
        fn fills_come_from_the_palette() {
            let image = quadrants(32);
            let settings = ConversionSettings::trace()
                .with_number_of_colors(4)
                .with_seed(Some(3));
            let svg = trace_to_svg_string(&image, &settings, &TraceOptions::default()).unwrap();
            let summary = inspect_svg(&svg).unwrap();

            let expected = ["#E61414", "#14E614", "#1414E6", "#F0F0F0"];
            assert_eq!(summary.fills.len(), 4, "fills: {:?}", summary.fills);
            for fill in &summary.fills {
                assert!(expected.contains(&fill.as_str()), "unexpected fill {fill}");
            }
        }

        #[test]
        fn blur_still_respects_colour_bound() {
            let image = quadrants(24);
            let settings = ConversionSettings::trace()
                .with_number_of_colors(3)
                .with_blur(3, 64)
                .with_seed(Some(5));
            let svg = trace_to_svg_string(&image, &settings, &TraceOptions::default()).unwrap();
            assert!(inspect_svg(&svg).unwrap().fills.len() <= 3);
        }

        #[test]
        fn transparent_layers_are_skipped() {
            let image = RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 0]));
            let settings = ConversionSettings::trace()
                .with_number_of_colors(2)
                .with_seed(Some(1));
            let document = trace_document(&image, &settings, &TraceOptions::default()).unwrap();
            assert_eq!(document.path_count(), 0);
        }

        #[test]
        fn path_omit_drops_small_regions() {
            // White ground with a 2x2 speck and a 15x15 block, both black.
            let image = RgbaImage::from_fn(40, 40, |x, y| {
                let speck = (5..7).contains(&x) && (5..7).contains(&y);
                let block = (20..35).contains(&x) && (20..35).contains(&y);
                if speck || block {
                    Rgba([0, 0, 0, 255])
                } else {
                    Rgba([255, 255, 255, 255])
                }
            });
            let traced = |path_omit: u32| {
                let mut settings = ConversionSettings::trace()
                    .with_number_of_colors(2)
                    .with_color_sampling(ColorSampling::Generated);
                settings.path_omit = path_omit;
                let document = trace_document(&image, &settings, &TraceOptions::default()).unwrap();
                let fills = inspect_svg(&document.to_string()).unwrap().fills;
                (document.path_count(), fills.contains("#000000"))
            };

            // The white ground is one large region and survives every threshold.
            assert_eq!(traced(0), (3, true));
            assert_eq!(traced(8), (2, true));
            assert_eq!(traced(20), (1, false));
        }

        #[test]
        fn vectorizer_trait_matches_free_function() {
            let image = quadrants(16);
            let settings = ConversionSettings::trace()
                .with_number_of_colors(2)
                .with_seed(Some(9));
            let via_trait = VtracerSvgVectorizer::default()
                .vectorize(&image, &settings)
                .unwrap();
            let direct = trace_to_svg_string(&image, &settings, &TraceOptions::default()).unwrap();
            assert_eq!(via_trait, direct);
        }
    }
}
