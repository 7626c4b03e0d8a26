use std::fs;

use img2svg::{ConvertResult, extract_embedded, inspect_svg};

use crate::cli::InspectCommand;

/// The main function to run the inspect command.
pub fn run(cmd: InspectCommand) -> ConvertResult<()> {
    let svg = fs::read_to_string(&cmd.input)?;
    let summary = inspect_svg(&svg)?;

    println!("{}", cmd.input.display());
    println!(
        "  size: {} x {}",
        summary.width.as_deref().unwrap_or("?"),
        summary.height.as_deref().unwrap_or("?")
    );
    if let Some(view_box) = &summary.view_box {
        println!("  viewBox: {view_box}");
    }
    println!("  paths: {}", summary.paths);
    if !summary.fills.is_empty() {
        let fills: Vec<&str> = summary.fills.iter().map(String::as_str).collect();
        println!("  fills ({}): {}", fills.len(), fills.join(" "));
    }
    println!("  images: {}", summary.images);
    if summary.images > 0 {
        match extract_embedded(&svg) {
            Ok(embedded) => {
                let decoded = image::load_from_memory(&embedded.bytes)
                    .map(|img| format!("{} x {}", img.width(), img.height()))
                    .unwrap_or_else(|_| "undecodable".to_string());
                println!(
                    "  embedded: {} ({} bytes, {decoded})",
                    embedded.media_type,
                    embedded.bytes.len()
                );
            }
            Err(err) => println!("  embedded: none readable ({err})"),
        }
    }

    Ok(())
}
