use std::fs;

use image::ImageFormat;
use img2svg::{ConvertResult, extract_embedded};

use crate::cli::ExtractCommand;

use super::utils::derive_extension_path;

/// The main function to run the extract command.
pub fn run(cmd: ExtractCommand) -> ConvertResult<()> {
    let svg = fs::read_to_string(&cmd.input)?;
    let embedded = extract_embedded(&svg)?;
    let output_path = cmd.output.clone().unwrap_or_else(|| {
        let extension = ImageFormat::from_mime_type(&embedded.media_type)
            .and_then(|format| format.extensions_str().first().copied())
            .unwrap_or("bin");
        derive_extension_path(&cmd.input, extension)
    });

    fs::write(&output_path, &embedded.bytes)?;
    println!(
        "Embedded {} image saved to {}",
        embedded.media_type,
        output_path.display()
    );
    Ok(())
}
