use img2svg::ConvertError;

pub fn report_error(err: &ConvertError) {
    match err {
        ConvertError::InvalidFileType { name, media_type } => {
            eprintln!("{name} is not an image (declared media type `{media_type}`).");
            eprintln!();
            eprintln!("Supported inputs include JPG, PNG, GIF, WebP, BMP and TIFF.");
            eprintln!("  - Use --media-type image/<type> if the extension is misleading");
        }
        ConvertError::InvalidSetting { .. } | ConvertError::Settings(_) => {
            eprintln!("{err}");
            eprintln!();
            eprintln!(
                "Check the trace flags and the settings file given by --settings or {}.",
                img2svg::ENV_SETTINGS_PATH
            );
        }
        _ => {
            eprintln!("{err}");
        }
    }
}
