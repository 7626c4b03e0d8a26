use std::fs;
use std::path::Path;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{ConvertError, ConvertResult};

/// Which strategy turns the selected image into SVG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionMethod {
    /// Wrap the original bytes in an `<image>` element.
    #[default]
    Embed,
    /// Quantize colours and trace each palette layer into paths.
    Trace,
}

/// How the initial palette is chosen before quantization.
///
/// Settings files may name a mode or use its numeric code (0, 1, 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSampling {
    /// Evenly spaced grays (fewer than 8 colours) or an RGB cube.
    Generated,
    /// Pixels picked uniformly at random.
    Random,
    /// Pixels picked on an evenly spaced grid.
    #[default]
    Deterministic,
}

impl<'de> Deserialize<'de> for ColorSampling {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Code(u64),
            Name(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Code(0) => Ok(Self::Generated),
            Repr::Code(1) => Ok(Self::Random),
            Repr::Code(2) => Ok(Self::Deterministic),
            Repr::Code(code) => Err(D::Error::custom(format!(
                "unknown colorsampling code {code}, expected 0, 1 or 2"
            ))),
            Repr::Name(name) => match name.as_str() {
                "generated" => Ok(Self::Generated),
                "random" => Ok(Self::Random),
                "deterministic" => Ok(Self::Deterministic),
                _ => Err(D::Error::unknown_variant(
                    &name,
                    &["generated", "random", "deterministic"],
                )),
            },
        }
    }
}

/// Flat record of conversion parameters.
///
/// Fields carry only per-field bounds; see [`ConversionSettings::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionSettings {
    pub method: ConversionMethod,
    /// Traced regions smaller than this many pixels per side are omitted.
    #[serde(rename = "pathomit")]
    pub path_omit: u32,
    #[serde(rename = "numberofcolors")]
    pub number_of_colors: u32,
    #[serde(rename = "colorsampling")]
    pub color_sampling: ColorSampling,
    /// Palette entries covering less than this fraction of pixels are re-seeded between cycles.
    #[serde(rename = "mincolorratio")]
    pub min_color_ratio: f64,
    #[serde(rename = "colorquantcycles")]
    pub color_quant_cycles: u32,
    /// Selective blur radius, 0 disables the blur.
    #[serde(rename = "blurradius")]
    pub blur_radius: u32,
    /// Blurred pixels differing from the original by more than this keep the original value.
    #[serde(rename = "blurdelta")]
    pub blur_delta: u32,
    /// Seed for random palette steps; `None` draws from the OS.
    pub seed: Option<u64>,
}

pub const PATH_OMIT_MAX: u32 = 256;
pub const NUMBER_OF_COLORS_MIN: u32 = 2;
pub const NUMBER_OF_COLORS_MAX: u32 = 256;
pub const COLOR_QUANT_CYCLES_MIN: u32 = 1;
pub const COLOR_QUANT_CYCLES_MAX: u32 = 20;
pub const BLUR_RADIUS_MAX: u32 = 5;
pub const BLUR_DELTA_MAX: u32 = 1024;

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            method: ConversionMethod::Embed,
            path_omit: 8,
            number_of_colors: 16,
            color_sampling: ColorSampling::Deterministic,
            min_color_ratio: 0.0,
            color_quant_cycles: 3,
            blur_radius: 0,
            blur_delta: 20,
            seed: None,
        }
    }
}

impl ConversionSettings {
    /// Settings for the auto-trace strategy with default tuning.
    pub fn trace() -> Self {
        Self {
            method: ConversionMethod::Trace,
            ..Self::default()
        }
    }

    /// Set the conversion method.
    pub fn with_method(mut self, method: ConversionMethod) -> Self {
        self.method = method;
        self
    }

    /// Set the palette size.
    pub fn with_number_of_colors(mut self, number_of_colors: u32) -> Self {
        self.number_of_colors = number_of_colors;
        self
    }

    /// Set the palette sampling mode.
    pub fn with_color_sampling(mut self, color_sampling: ColorSampling) -> Self {
        self.color_sampling = color_sampling;
        self
    }

    /// Set the selective blur radius and delta.
    pub fn with_blur(mut self, radius: u32, delta: u32) -> Self {
        self.blur_radius = radius;
        self.blur_delta = delta;
        self
    }

    /// Set the seed used for random palette steps.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Load settings from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> ConvertResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse settings from JSON text. Missing fields keep their defaults.
    pub fn from_json_str(text: &str) -> ConvertResult<Self> {
        let settings: Self = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check every field against its bounds.
    pub fn validate(&self) -> ConvertResult<()> {
        check_range("pathomit", self.path_omit, 0, PATH_OMIT_MAX)?;
        check_range(
            "numberofcolors",
            self.number_of_colors,
            NUMBER_OF_COLORS_MIN,
            NUMBER_OF_COLORS_MAX,
        )?;
        if !(0.0..=1.0).contains(&self.min_color_ratio) {
            return Err(ConvertError::InvalidSetting {
                name: "mincolorratio",
                value: self.min_color_ratio,
                min: 0.0,
                max: 1.0,
            });
        }
        check_range(
            "colorquantcycles",
            self.color_quant_cycles,
            COLOR_QUANT_CYCLES_MIN,
            COLOR_QUANT_CYCLES_MAX,
        )?;
        check_range("blurradius", self.blur_radius, 0, BLUR_RADIUS_MAX)?;
        check_range("blurdelta", self.blur_delta, 0, BLUR_DELTA_MAX)?;
        Ok(())
    }
}

fn check_range(name: &'static str, value: u32, min: u32, max: u32) -> ConvertResult<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConvertError::InvalidSetting {
            name,
            value: f64::from(value),
            min: f64::from(min),
            max: f64::from(max),
        })
    }
}

/// Named starting points for the auto-trace settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Default,
    /// Two generated grays.
    Posterized1,
    /// Four sampled colours over a blurred image.
    Posterized2,
    /// Large palette, nothing omitted.
    Detailed,
    /// Strong selective blur.
    Smoothed,
    /// Seven generated grays, single cycle.
    Grayscale,
    /// 27-entry RGB cube, single cycle.
    FixedPalette,
    RandomSampling1,
    RandomSampling2,
}

impl Preset {
    /// Trace settings for this preset.
    pub fn settings(self) -> ConversionSettings {
        let base = ConversionSettings::trace();
        match self {
            Preset::Default => base,
            Preset::Posterized1 => ConversionSettings {
                color_sampling: ColorSampling::Generated,
                number_of_colors: 2,
                ..base
            },
            Preset::Posterized2 => ConversionSettings {
                number_of_colors: 4,
                blur_radius: 5,
                ..base
            },
            Preset::Detailed => ConversionSettings {
                path_omit: 0,
                number_of_colors: 64,
                ..base
            },
            Preset::Smoothed => ConversionSettings {
                blur_radius: 5,
                blur_delta: 64,
                ..base
            },
            Preset::Grayscale => ConversionSettings {
                color_sampling: ColorSampling::Generated,
                color_quant_cycles: 1,
                number_of_colors: 7,
                ..base
            },
            Preset::FixedPalette => ConversionSettings {
                color_sampling: ColorSampling::Generated,
                color_quant_cycles: 1,
                number_of_colors: 27,
                ..base
            },
            Preset::RandomSampling1 => ConversionSettings {
                color_sampling: ColorSampling::Random,
                number_of_colors: 8,
                ..base
            },
            Preset::RandomSampling2 => ConversionSettings {
                color_sampling: ColorSampling::Random,
                number_of_colors: 64,
                ..base
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod validate {
        use super::*;

        mod unit {
            use super::*;

            #[test]
            fn defaults_are_valid() {
                assert!(ConversionSettings::default().validate().is_ok());
                assert!(ConversionSettings::trace().validate().is_ok());
            }

            #[test]
            fn single_colour_rejected() {
                let settings = ConversionSettings::trace().with_number_of_colors(1);
                let err = settings.validate().unwrap_err();
                match err {
                    ConvertError::InvalidSetting { name, value, .. } => {
                        assert_eq!(name, "numberofcolors");
                        assert_eq!(value, 1.0);
                    }
                    other => panic!("unexpected error: {other:?}"),
                }
            }

            #[test]
            fn blur_radius_above_five_rejected() {
                let settings = ConversionSettings::trace().with_blur(6, 20);
                assert!(matches!(
                    settings.validate(),
                    Err(ConvertError::InvalidSetting {
                        name: "blurradius",
                        ..
                    })
                ));
            }

            #[test]
            fn negative_ratio_rejected() {
                let settings = ConversionSettings {
                    min_color_ratio: -0.1,
                    ..ConversionSettings::trace()
                };
                assert!(settings.validate().is_err());
            }

            #[test]
            fn zero_cycles_rejected() {
                let settings = ConversionSettings {
                    color_quant_cycles: 0,
                    ..ConversionSettings::trace()
                };
                assert!(settings.validate().is_err());
            }

            #[test]
            fn every_preset_is_valid_trace() {
                for preset in [
                    Preset::Default,
                    Preset::Posterized1,
                    Preset::Posterized2,
                    Preset::Detailed,
                    Preset::Smoothed,
                    Preset::Grayscale,
                    Preset::FixedPalette,
                    Preset::RandomSampling1,
                    Preset::RandomSampling2,
                ] {
                    let settings = preset.settings();
                    assert_eq!(settings.method, ConversionMethod::Trace);
                    assert!(settings.validate().is_ok(), "{preset:?}");
                }
            }
        }

        mod prop {
            use super::*;
            use proptest::prelude::*;

            proptest! {
                /// validate: palette sizes inside the bounds always pass
                #[test]
                fn colours_in_range_accepted(n in NUMBER_OF_COLORS_MIN..=NUMBER_OF_COLORS_MAX) {
                    let settings = ConversionSettings::trace().with_number_of_colors(n);
                    prop_assert!(settings.validate().is_ok());
                }

                /// validate: blur radii beyond the maximum always fail
                #[test]
                fn blur_out_of_range_rejected(r in (BLUR_RADIUS_MAX + 1)..1000u32) {
                    let settings = ConversionSettings::trace().with_blur(r, 20);
                    prop_assert!(settings.validate().is_err());
                }
            }
        }
    }

    mod json {
        use super::*;

        #[test]
        fn partial_file_keeps_defaults() {
            let settings =
                ConversionSettings::from_json_str(r#"{"method":"trace","numberofcolors":4}"#)
                    .unwrap();
            assert_eq!(settings.method, ConversionMethod::Trace);
            assert_eq!(settings.number_of_colors, 4);
            assert_eq!(settings.path_omit, 8);
            assert_eq!(settings.color_sampling, ColorSampling::Deterministic);
            assert_eq!(settings.blur_delta, 20);
        }

        #[test]
        fn sampling_names_parse() {
            let settings =
                ConversionSettings::from_json_str(r#"{"colorsampling":"random","seed":7}"#)
                    .unwrap();
            assert_eq!(settings.color_sampling, ColorSampling::Random);
            assert_eq!(settings.seed, Some(7));
        }

        #[test]
        fn sampling_codes_parse() {
            for (code, expected) in [
                (0, ColorSampling::Generated),
                (1, ColorSampling::Random),
                (2, ColorSampling::Deterministic),
            ] {
                let json = format!(r#"{{"colorsampling":{code}}}"#);
                let settings = ConversionSettings::from_json_str(&json).unwrap();
                assert_eq!(settings.color_sampling, expected);
            }
        }

        #[test]
        fn unknown_sampling_rejected() {
            for json in [r#"{"colorsampling":3}"#, r#"{"colorsampling":"spiral"}"#] {
                let err = ConversionSettings::from_json_str(json).unwrap_err();
                assert!(matches!(err, ConvertError::Settings(_)), "{json}");
            }
        }

        #[test]
        fn out_of_range_value_rejected() {
            let err = ConversionSettings::from_json_str(r#"{"colorquantcycles":99}"#).unwrap_err();
            assert!(matches!(err, ConvertError::InvalidSetting { .. }));
        }

        #[test]
        fn malformed_json_rejected() {
            let err = ConversionSettings::from_json_str("{ nope").unwrap_err();
            assert!(matches!(err, ConvertError::Settings(_)));
        }

        #[test]
        fn file_round_trip() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("settings.json");
            let original = Preset::Smoothed.settings().with_seed(Some(3));
            fs::write(&path, serde_json::to_string(&original).unwrap()).unwrap();

            let loaded = ConversionSettings::from_json_file(&path).unwrap();
            assert_eq!(loaded, original);
        }
    }
}
