use image::RgbaImage;

use crate::ConvertResult;
use crate::config::ConversionSettings;

/// A trait representing an algorithm that can turn a raster image into a vector representation.
pub trait ImageVectorizer {
    type Output;

    fn vectorize(
        &self,
        image: &RgbaImage,
        settings: &ConversionSettings,
    ) -> ConvertResult<Self::Output>;
}

#[cfg(feature = "vectorizer-vtracer")]
pub mod vtracer;
