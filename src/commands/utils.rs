use std::io::{self, Write};
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use img2svg::{ConversionResult, ConvertError, ConvertResult, Converter, Session, SourceFile};

use crate::cli::{InputArgs, OutputArgs};

/// Select the input in a fresh session and convert it.
pub fn convert_input(converter: Converter, input: &InputArgs) -> ConvertResult<ConversionResult> {
    let file = match &input.media_type {
        Some(media_type) => {
            SourceFile::from_path_with_media_type(&input.input, media_type.as_str())?
        }
        None => SourceFile::from_path(&input.input)?,
    };
    let mut session = Session::new(converter);
    session.select(file)?;
    session.convert()?;
    session.into_result().ok_or(ConvertError::NoFileSelected)
}

/// Offer the result as a download file, inline text, and/or clipboard contents.
pub fn deliver(result: &ConversionResult, input: &Path, args: &OutputArgs) -> ConvertResult<()> {
    if args.stdout {
        println!("{}", result.svg());
    }
    if args.copy {
        copy_to_clipboard(result.svg())?;
        eprintln!("SVG copied to clipboard");
    }

    let explicit_target = args.output.is_some() || args.out_dir.is_some();
    if explicit_target || !(args.stdout || args.copy) {
        let path = match (&args.output, &args.out_dir) {
            (Some(path), _) => path.clone(),
            (None, Some(dir)) => dir.join(result.download_name()),
            (None, None) => sibling_path(input, &result.download_name()),
        };
        result.save(&path)?;
        if args.stdout {
            eprintln!("SVG saved to {}", path.display());
        } else {
            println!("SVG saved to {}", path.display());
        }
    }
    Ok(())
}

/// Path for `file_name` in the same directory as `input`.
pub fn sibling_path(input: &Path, file_name: &str) -> PathBuf {
    let mut path = input.to_path_buf();
    path.set_file_name(file_name);
    path
}

/// Derive a file path by changing the extension.
pub fn derive_extension_path(input: &Path, extension: &str) -> PathBuf {
    let mut path = input.to_path_buf();
    path.set_extension(extension);
    path
}

/// OSC 52 escape asking the terminal to place `text` on the system clipboard.
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}

fn copy_to_clipboard(text: &str) -> ConvertResult<()> {
    let mut stderr = io::stderr().lock();
    stderr.write_all(osc52_sequence(text).as_bytes())?;
    stderr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sibling_path_keeps_directory() {
        let path = sibling_path(Path::new("in/dir/photo.jpeg"), "photo.svg");
        assert_eq!(path, PathBuf::from("in/dir/photo.svg"));
    }

    #[test]
    fn extension_path_replaces_extension() {
        let path = derive_extension_path(Path::new("out/logo.svg"), "png");
        assert_eq!(path, PathBuf::from("out/logo.png"));
    }

    #[test]
    fn osc52_wraps_base64_payload() {
        assert_eq!(osc52_sequence("hi"), "\x1b]52;c;aGk=\x07");
    }
}
