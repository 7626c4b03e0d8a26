use image::{GrayImage, Luma, Rgba, RgbaImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::blur::selective_blur;
use crate::config::{ColorSampling, ConversionSettings};

/// An image reduced to a palette: one palette index per pixel, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quantized {
    pub palette: Vec<Rgba<u8>>,
    pub indices: Vec<usize>,
    pub width: u32,
    pub height: u32,
}

impl Quantized {
    /// Number of pixels assigned to palette entry `index`.
    pub fn pixel_count(&self, index: usize) -> usize {
        self.indices.iter().filter(|&&i| i == index).count()
    }

    /// Binary mask of palette entry `index`: 255 where the pixel belongs to it, 0 elsewhere.
    pub fn layer_mask(&self, index: usize) -> GrayImage {
        let mut mask = GrayImage::new(self.width, self.height);
        for (px, &i) in mask.pixels_mut().zip(&self.indices) {
            *px = Luma([if i == index { 255 } else { 0 }]);
        }
        mask
    }
}

/// Build the RNG for random palette steps, seeded when a seed is configured.
pub fn palette_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn random_color<R: Rng>(rng: &mut R) -> Rgba<u8> {
    Rgba([rng.r#gen(), rng.r#gen(), rng.r#gen(), rng.r#gen()])
}

/// Evenly spaced grays below 8 colours, otherwise an RGB cube topped up with random colours.
pub fn generate_palette<R: Rng>(count: usize, rng: &mut R) -> Vec<Rgba<u8>> {
    let mut palette = Vec::with_capacity(count);
    if count < 8 {
        let step = 255 / count.saturating_sub(1).max(1);
        for i in 0..count {
            let v = (i * step).min(255) as u8;
            palette.push(Rgba([v, v, v, 255]));
        }
        return palette;
    }

    let per_edge = (count as f64).cbrt().floor() as usize;
    // Float cube roots can land just below an exact cube.
    let per_edge = if (per_edge + 1).pow(3) <= count {
        per_edge + 1
    } else {
        per_edge
    };
    let step = 255 / (per_edge - 1).max(1);
    for r in 0..per_edge {
        for g in 0..per_edge {
            for b in 0..per_edge {
                palette.push(Rgba([
                    (r * step) as u8,
                    (g * step) as u8,
                    (b * step) as u8,
                    255,
                ]));
            }
        }
    }
    while palette.len() < count {
        palette.push(random_color(rng));
    }
    palette
}

/// `count` pixels picked uniformly at random.
pub fn sample_palette_random<R: Rng>(
    count: usize,
    image: &RgbaImage,
    rng: &mut R,
) -> Vec<Rgba<u8>> {
    let (w, h) = image.dimensions();
    (0..count)
        .map(|_| *image.get_pixel(rng.gen_range(0..w), rng.gen_range(0..h)))
        .collect()
}

/// `count` pixels picked on an evenly spaced interior grid.
pub fn sample_palette_grid(count: usize, image: &RgbaImage) -> Vec<Rgba<u8>> {
    let (w, h) = image.dimensions();
    let cols = (count as f64).sqrt().ceil().max(1.0) as usize;
    let rows = count.div_ceil(cols);
    let step_x = f64::from(w) / (cols + 1) as f64;
    let step_y = f64::from(h) / (rows + 1) as f64;

    let mut palette = Vec::with_capacity(count);
    'rows: for j in 0..rows {
        for i in 0..cols {
            if palette.len() == count {
                break 'rows;
            }
            let x = (((i + 1) as f64 * step_x) as u32).min(w - 1);
            let y = (((j + 1) as f64 * step_y) as u32).min(h - 1);
            palette.push(*image.get_pixel(x, y));
        }
    }
    palette
}

/// Initial palette for the configured sampling mode.
pub fn initial_palette<R: Rng>(
    settings: &ConversionSettings,
    image: &RgbaImage,
    rng: &mut R,
) -> Vec<Rgba<u8>> {
    let count = settings.number_of_colors as usize;
    let empty = image.width() == 0 || image.height() == 0;
    match settings.color_sampling {
        ColorSampling::Random if !empty => sample_palette_random(count, image, rng),
        ColorSampling::Deterministic if !empty => sample_palette_grid(count, image),
        _ => generate_palette(count, rng),
    }
}

/// Index of the palette entry with the smallest rectilinear RGBA distance; ties keep the lowest index.
pub fn nearest_index(palette: &[Rgba<u8>], px: &Rgba<u8>) -> usize {
    let mut best = 0;
    let mut best_distance = u32::MAX;
    for (k, entry) in palette.iter().enumerate() {
        let distance: u32 = entry
            .0
            .iter()
            .zip(px.0.iter())
            .map(|(&a, &b)| u32::from(a.abs_diff(b)))
            .sum();
        if distance < best_distance {
            best_distance = distance;
            best = k;
        }
    }
    best
}

#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    sum: [u64; 4],
    n: u64,
}

impl Accumulator {
    fn add(&mut self, px: &Rgba<u8>) {
        for (s, &c) in self.sum.iter_mut().zip(px.0.iter()) {
            *s += u64::from(c);
        }
        self.n += 1;
    }

    fn mean(&self) -> Option<Rgba<u8>> {
        if self.n == 0 {
            return None;
        }
        let avg = |c: u64| (c / self.n) as u8;
        Some(Rgba([
            avg(self.sum[0]),
            avg(self.sum[1]),
            avg(self.sum[2]),
            avg(self.sum[3]),
        ]))
    }
}

/// Iteratively refine `palette` against the image and assign every pixel to an entry.
///
/// From the second cycle on each entry moves to the mean of its pixels; entries
/// covering less than `min_color_ratio` of the image are re-seeded randomly
/// unless the final cycle is next.
pub fn quantize_with_palette<R: Rng>(
    image: &RgbaImage,
    mut palette: Vec<Rgba<u8>>,
    cycles: u32,
    min_color_ratio: f64,
    rng: &mut R,
) -> Quantized {
    let (width, height) = image.dimensions();
    let pixel_total = (width as u64 * height as u64).max(1) as f64;
    let mut indices = vec![0usize; width as usize * height as usize];
    let mut accumulators = vec![Accumulator::default(); palette.len()];
    let cycles = cycles.max(1);

    for cycle in 0..cycles {
        if cycle > 0 {
            for (entry, acc) in palette.iter_mut().zip(&accumulators) {
                if let Some(mean) = acc.mean() {
                    *entry = mean;
                }
                if (acc.n as f64) / pixel_total < min_color_ratio && cycle < cycles - 1 {
                    *entry = random_color(rng);
                }
            }
        }

        accumulators.iter_mut().for_each(|acc| *acc = Accumulator::default());
        for (slot, px) in indices.iter_mut().zip(image.pixels()) {
            let k = nearest_index(&palette, px);
            accumulators[k].add(px);
            *slot = k;
        }
    }

    debug!(
        colors = palette.len(),
        cycles,
        width,
        height,
        "quantized image"
    );
    Quantized {
        palette,
        indices,
        width,
        height,
    }
}

/// Reduce the image to `settings.number_of_colors` palette entries.
///
/// The palette is sampled from the original pixels; the selective blur is
/// applied before quantization.
pub fn quantize(image: &RgbaImage, settings: &ConversionSettings) -> Quantized {
    let mut rng = palette_rng(settings.seed);
    let palette = initial_palette(settings, image, &mut rng);
    let prepared = selective_blur(image, settings.blur_radius, settings.blur_delta);
    quantize_with_palette(
        &prepared,
        palette,
        settings.color_quant_cycles,
        settings.min_color_ratio,
        &mut rng,
    )
}
