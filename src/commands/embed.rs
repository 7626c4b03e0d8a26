use img2svg::{ConversionMethod, ConversionSettings, Converter, ConvertResult};

use crate::cli::EmbedCommand;

use super::utils::{convert_input, deliver};

/// The main function to run the embed command.
pub fn run(cmd: EmbedCommand) -> ConvertResult<()> {
    let converter =
        Converter::new(ConversionSettings::default().with_method(ConversionMethod::Embed));
    let result = convert_input(converter, &cmd.input)?;
    deliver(&result, &cmd.input.input, &cmd.output)
}
