use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::filter::gaussian_blur_f32;

/// Gaussian blur that leaves high-contrast pixels alone.
///
/// A blurred pixel whose summed absolute RGBA difference from the original
/// exceeds `delta` keeps its original value, so edges stay sharp while flat
/// regions lose noise. A radius of 0 returns the image unchanged.
pub fn selective_blur(image: &RgbaImage, radius: u32, delta: u32) -> RgbaImage {
    if radius == 0 || image.width() == 0 || image.height() == 0 {
        return image.clone();
    }

    // Blur in float so flat regions round back to their exact value.
    let float = DynamicImage::ImageRgba8(image.clone()).to_rgba32f();
    let blurred = gaussian_blur_f32(&float, radius as f32);

    let mut out = image.clone();
    for (px, smooth) in out.pixels_mut().zip(blurred.pixels()) {
        let candidate = Rgba(smooth.0.map(to_channel));
        let diff: u32 = candidate
            .0
            .iter()
            .zip(px.0.iter())
            .map(|(&a, &b)| u32::from(a.abs_diff(b)))
            .sum();
        if diff <= delta {
            *px = candidate;
        }
    }
    out
}

fn to_channel(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(w: u32, h: u32, a: [u8; 4], b: [u8; 4]) -> RgbaImage {
        RgbaImage::from_fn(w, h, |x, y| if (x + y) % 2 == 0 { Rgba(a) } else { Rgba(b) })
    }

    mod unit {
        use super::*;

        #[test]
        fn zero_radius_is_identity() {
            let image = checker(4, 4, [0, 0, 0, 255], [255, 255, 255, 255]);
            assert_eq!(selective_blur(&image, 0, 1024), image);
        }

        #[test]
        fn uniform_image_unchanged() {
            let image = RgbaImage::from_pixel(6, 6, Rgba([40, 80, 120, 255]));
            assert_eq!(selective_blur(&image, 3, 20), image);
        }

        #[test]
        fn opaque_input_stays_opaque() {
            let image = checker(7, 5, [90, 90, 90, 255], [96, 96, 96, 255]);
            for radius in 1..=5 {
                let out = selective_blur(&image, radius, 1024);
                assert!(out.pixels().all(|px| px.0[3] == 255), "radius {radius}");
            }
        }

        #[test]
        fn zero_delta_keeps_every_changed_pixel() {
            let image = checker(6, 6, [0, 0, 0, 255], [255, 255, 255, 255]);
            assert_eq!(selective_blur(&image, 2, 0), image);
        }

        #[test]
        fn low_contrast_noise_is_smoothed() {
            let image = checker(8, 8, [100, 100, 100, 255], [104, 104, 104, 255]);
            let out = selective_blur(&image, 2, 1024);
            assert_ne!(out, image);
            for px in out.pixels() {
                assert!((100..=104).contains(&px.0[0]));
            }
        }
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(24))]

            /// selective_blur: dimensions are preserved
            #[test]
            fn preserves_dimensions(w in 1u32..16, h in 1u32..16, radius in 0u32..=5) {
                let image = checker(w, h, [10, 20, 30, 255], [200, 100, 50, 255]);
                prop_assert_eq!(selective_blur(&image, radius, 20).dimensions(), (w, h));
            }

            /// selective_blur: no output pixel drifts further than delta from its source
            #[test]
            fn bounded_by_delta(delta in 0u32..200, radius in 1u32..=5) {
                let image = checker(9, 7, [10, 20, 30, 255], [60, 70, 80, 255]);
                let out = selective_blur(&image, radius, delta);
                for (o, i) in out.pixels().zip(image.pixels()) {
                    let diff: u32 = o.0.iter().zip(i.0.iter()).map(|(&a, &b)| u32::from(a.abs_diff(b))).sum();
                    prop_assert!(diff <= delta);
                }
            }
        }
    }
}
