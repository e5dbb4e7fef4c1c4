use std::path::{Path, PathBuf};

use langswitch::LocalizationOptions;

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct OptionOverrides {
    pub language_dir: Option<PathBuf>,
    pub extension: Option<String>,
    pub diagnostic_mode: Option<bool>,
}

/// Build manager options from an optional TOML file plus command-line overrides.
///
/// A relative `language_dir` in the file is resolved against the file's directory.
/// Without a config file, missing keys print bare unless `diagnostic_mode` is overridden.
pub fn load_options(
    config_path: Option<&Path>,
    overrides: OptionOverrides,
) -> Result<LocalizationOptions, String> {
    let mut options = match config_path {
        Some(path) => read_config_file(path)?,
        None => LocalizationOptions::default().with_diagnostic_mode(false),
    };

    if let Some(dir) = overrides.language_dir {
        options = options.with_language_dir(dir);
    }
    if let Some(extension) = overrides.extension {
        options = options.with_extension(extension);
    }
    if let Some(diagnostic_mode) = overrides.diagnostic_mode {
        options = options.with_diagnostic_mode(diagnostic_mode);
    }

    options.validate().map_err(|e| e.to_string())?;
    Ok(options)
}

fn read_config_file(path: &Path) -> Result<LocalizationOptions, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
    let mut options: LocalizationOptions = toml::from_str(&content)
        .map_err(|e| format!("Invalid config {}: {}", path.display(), e))?;

    if options.language_dir.is_relative() {
        if let Some(parent) = path.parent() {
            options.language_dir = parent.join(&options.language_dir);
        }
    }
    Ok(options)
}
