use img2svg::{
    ConversionMethod, ConversionSettings, ConvertResult, Converter, Preset, TraceOptions,
};

use crate::cli::{TraceCommand, TraceOptionsArgs, TraceSettingsArgs};

use super::utils::{convert_input, deliver};

/// The main function to run the trace command.
pub fn run(cmd: TraceCommand) -> ConvertResult<()> {
    let settings = resolve_settings(&cmd.settings)?;
    let options = trace_options(&cmd.trace_options);
    let converter = Converter::new(settings).with_trace_options(options);
    let result = convert_input(converter, &cmd.input)?;
    deliver(&result, &cmd.input.input, &cmd.output)
}

/// Start from the settings file or preset, then apply explicit flags.
fn resolve_settings(args: &TraceSettingsArgs) -> ConvertResult<ConversionSettings> {
    let mut settings = match &args.settings {
        Some(path) => ConversionSettings::from_json_file(path)?,
        None => Preset::from(args.preset).settings(),
    };
    settings.method = ConversionMethod::Trace;

    if let Some(n) = args.number_of_colors {
        settings.number_of_colors = n;
    }
    if let Some(path_omit) = args.path_omit {
        settings.path_omit = path_omit;
    }
    if let Some(sampling) = args.color_sampling {
        settings.color_sampling = sampling.into();
    }
    if let Some(ratio) = args.min_color_ratio {
        settings.min_color_ratio = ratio;
    }
    if let Some(cycles) = args.color_quant_cycles {
        settings.color_quant_cycles = cycles;
    }
    if let Some(radius) = args.blur_radius {
        settings.blur_radius = radius;
    }
    if let Some(delta) = args.blur_delta {
        settings.blur_delta = delta;
    }
    if args.seed.is_some() {
        settings.seed = args.seed;
    }

    settings.validate()?;
    Ok(settings)
}

fn trace_options(args: &TraceOptionsArgs) -> TraceOptions {
    let default_opts = TraceOptions::default();
    let tracer_path_precision = if args.no_path_precision {
        None
    } else {
        args.path_precision.or(default_opts.tracer_path_precision)
    };

    TraceOptions {
        tracer_mode: args.mode.into(),
        tracer_corner_threshold: args.corner_threshold,
        tracer_length_threshold: args.length_threshold,
        tracer_max_iterations: args.max_iterations,
        tracer_splice_threshold: args.splice_threshold,
        tracer_path_precision,
    }
}
