use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use img2svg::{ColorSampling, Preset};
use visioncortex::PathSimplifyMode;

/// Command line interface definition.
#[derive(Parser, Debug)]
#[command(author, version, about, propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct GlobalOptions {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Wrap the image, unchanged, in an SVG document
    Embed(EmbedCommand),
    /// Trace the image into coloured SVG paths
    Trace(TraceCommand),
    /// Print the structure of an SVG document
    Inspect(InspectCommand),
    /// Recover the raster embedded by `embed`
    Extract(ExtractCommand),
}

#[derive(Args, Debug)]
pub struct InputArgs {
    /// Input image path
    pub input: PathBuf,
    /// Declared media type (defaults to the one implied by the file extension)
    #[arg(long = "media-type")]
    pub media_type: Option<String>,
}

#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Output SVG path (defaults to `<name>.svg` next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Directory for `<name>.svg` when no explicit output is given
    #[arg(long = "out-dir", env = img2svg::ENV_OUTPUT_DIR)]
    pub out_dir: Option<PathBuf>,
    /// Print the SVG to stdout
    #[arg(long)]
    pub stdout: bool,
    /// Copy the SVG to the clipboard (OSC 52 terminal escape)
    #[arg(long)]
    pub copy: bool,
}

#[derive(Args, Debug)]
pub struct EmbedCommand {
    #[command(flatten)]
    pub input: InputArgs,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct TraceCommand {
    #[command(flatten)]
    pub input: InputArgs,
    #[command(flatten)]
    pub output: OutputArgs,
    #[command(flatten)]
    pub settings: TraceSettingsArgs,
    #[command(flatten)]
    pub trace_options: TraceOptionsArgs,
}

#[derive(Args, Debug)]
pub struct InspectCommand {
    /// SVG file to inspect
    pub input: PathBuf,
}

#[derive(Args, Debug)]
pub struct ExtractCommand {
    /// SVG file produced by `embed`
    pub input: PathBuf,
    /// Output image path (defaults to the SVG name with the embedded format's extension)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Named settings presets.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PresetArg {
    Default,
    Posterized1,
    Posterized2,
    Detailed,
    Smoothed,
    Grayscale,
    FixedPalette,
    RandomSampling1,
    RandomSampling2,
}

impl From<PresetArg> for Preset {
    fn from(value: PresetArg) -> Self {
        match value {
            PresetArg::Default => Preset::Default,
            PresetArg::Posterized1 => Preset::Posterized1,
            PresetArg::Posterized2 => Preset::Posterized2,
            PresetArg::Detailed => Preset::Detailed,
            PresetArg::Smoothed => Preset::Smoothed,
            PresetArg::Grayscale => Preset::Grayscale,
            PresetArg::FixedPalette => Preset::FixedPalette,
            PresetArg::RandomSampling1 => Preset::RandomSampling1,
            PresetArg::RandomSampling2 => Preset::RandomSampling2,
        }
    }
}

/// Initial palette sampling modes.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ColorSamplingArg {
    Generated,
    Random,
    Deterministic,
}

impl From<ColorSamplingArg> for ColorSampling {
    fn from(value: ColorSamplingArg) -> Self {
        match value {
            ColorSamplingArg::Generated => ColorSampling::Generated,
            ColorSamplingArg::Random => ColorSampling::Random,
            ColorSamplingArg::Deterministic => ColorSampling::Deterministic,
        }
    }
}

#[derive(Args, Debug)]
pub struct TraceSettingsArgs {
    /// Preset the other settings start from
    #[arg(long, value_enum, default_value_t = PresetArg::Default)]
    pub preset: PresetArg,
    /// JSON settings file; replaces the preset
    #[arg(long, env = img2svg::ENV_SETTINGS_PATH)]
    pub settings: Option<PathBuf>,
    /// Number of palette colours
    #[arg(long = "colors")]
    pub number_of_colors: Option<u32>,
    /// Omit traced regions smaller than this many pixels per side
    #[arg(long = "path-omit")]
    pub path_omit: Option<u32>,
    /// How the initial palette is chosen
    #[arg(long = "color-sampling", value_enum)]
    pub color_sampling: Option<ColorSamplingArg>,
    /// Re-seed palette colours covering less than this fraction of pixels
    #[arg(long = "min-color-ratio")]
    pub min_color_ratio: Option<f64>,
    /// Colour quantization cycles
    #[arg(long = "quant-cycles")]
    pub color_quant_cycles: Option<u32>,
    /// Selective blur radius (0 disables)
    #[arg(long = "blur-radius")]
    pub blur_radius: Option<u32>,
    /// Selective blur delta
    #[arg(long = "blur-delta")]
    pub blur_delta: Option<u32>,
    /// Seed for random palette steps
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Path simplification modes for SVG vectorization.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum TracerMode {
    None,
    Polygon,
    Spline,
}

impl From<TracerMode> for PathSimplifyMode {
    /// Convert TracerMode to visioncortex::PathSimplifyMode.
    fn from(value: TracerMode) -> Self {
        match value {
            TracerMode::None => PathSimplifyMode::None,
            TracerMode::Polygon => PathSimplifyMode::Polygon,
            TracerMode::Spline => PathSimplifyMode::Spline,
        }
    }
}

#[derive(Args, Debug)]
pub struct TraceOptionsArgs {
    /// Path simplification mode
    #[arg(long = "mode", value_enum, default_value_t = TracerMode::Spline)]
    pub mode: TracerMode,
    /// Corner threshold in degrees
    #[arg(long = "corner-threshold", default_value_t = 60)]
    pub corner_threshold: i32,
    /// Segment length threshold
    #[arg(long = "length-threshold", default_value_t = 4.0)]
    pub length_threshold: f64,
    /// Maximum subdivision iterations
    #[arg(long = "max-iterations", default_value_t = 10)]
    pub max_iterations: usize,
    /// Splice threshold in degrees
    #[arg(long = "splice-threshold", default_value_t = 45)]
    pub splice_threshold: i32,
    /// Path precision override (decimal places)
    #[arg(long = "path-precision")]
    pub path_precision: Option<u32>,
    /// Disable explicit path precision override
    #[arg(long = "no-path-precision")]
    pub no_path_precision: bool,
}
