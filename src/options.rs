//! Options controlling where language files live and how lookups fall back.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::Error;

/// Name of the language directory relative to the application's base directory.
pub const DEFAULT_LANGUAGE_DIR: &str = "Lang";
pub const DEFAULT_EXTENSION: &str = "xaml";
pub const DEFAULT_RESERVED_FILE_NAME: &str = ".Builtin";

/// Configuration for a [`crate::LocalizationManager`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LocalizationOptions {
    /// Directory scanned for language files.
    pub language_dir: PathBuf,
    /// Extension of language files, with or without the leading dot.
    pub extension: String,
    /// File stem that is never treated as a selectable language (the exported built-in).
    pub reserved_file_name: String,
    /// Whether missing keys render as `|"<file>":<key>|` instead of the bare key.
    pub diagnostic_mode: bool,
}

impl Default for LocalizationOptions {
    fn default() -> Self {
        Self {
            language_dir: default_language_dir(),
            extension: DEFAULT_EXTENSION.to_string(),
            reserved_file_name: DEFAULT_RESERVED_FILE_NAME.to_string(),
            diagnostic_mode: cfg!(debug_assertions),
        }
    }
}

impl LocalizationOptions {
    /// Creates default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the language directory.
    pub fn with_language_dir(mut self, language_dir: impl Into<PathBuf>) -> Self {
        self.language_dir = language_dir.into();
        self
    }

    /// Sets the language file extension.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Sets the reserved built-in file stem.
    pub fn with_reserved_file_name(mut self, reserved_file_name: impl Into<String>) -> Self {
        self.reserved_file_name = reserved_file_name.into();
        self
    }

    /// Enables/disables diagnostic placeholders for missing keys.
    pub fn with_diagnostic_mode(mut self, diagnostic_mode: bool) -> Self {
        self.diagnostic_mode = diagnostic_mode;
        self
    }

    /// The extension without its leading dot.
    pub fn normalized_extension(&self) -> &str {
        self.extension.trim_start_matches('.')
    }

    /// Where [`crate::LocalizationManager::save_builtin_localization`] writes the template.
    pub fn builtin_file_path(&self) -> PathBuf {
        self.language_dir.join(format!(
            "{}.{}",
            self.reserved_file_name,
            self.normalized_extension()
        ))
    }

    /// Rejects options that would make discovery or export meaningless.
    pub fn validate(&self) -> Result<(), Error> {
        if self.normalized_extension().is_empty() {
            return Err(Error::Config("extension must not be empty".to_string()));
        }
        if self.reserved_file_name.is_empty() {
            return Err(Error::Config(
                "reserved file name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// `<directory of the running executable>/Lang`, or `./Lang` when that cannot be resolved.
pub fn default_language_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_LANGUAGE_DIR)))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LANGUAGE_DIR))
}
