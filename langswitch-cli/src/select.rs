use std::path::PathBuf;

use langswitch::LocalizationManager;
use tracing::info;

/// Which language a command should run with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// An arbitrary language file.
    File(PathBuf),
    /// A discovered language, by file stem (case-insensitive).
    Language(String),
    /// Whatever matches the system locale, falling back to the built-in language.
    Locale,
}

/// Discover languages and activate the requested one.
pub fn apply_selection(manager: &LocalizationManager, selection: &Selection) -> Result<(), String> {
    match selection {
        Selection::File(path) => {
            if manager.set_language_from_file(path) {
                Ok(())
            } else {
                Err(format!("Cannot load language file {}", path.display()))
            }
        }
        Selection::Language(stem) => {
            let languages = manager.discover_languages();
            let language = languages
                .iter()
                .find(|l| l.file_name().eq_ignore_ascii_case(stem))
                .cloned()
                .ok_or_else(|| format!("Unknown language: {}", stem))?;

            if manager.set_language(&language) {
                return Ok(());
            }
            // The file changed since discovery; refresh so the listing reflects the disk.
            let remaining = manager.discover_languages();
            info!("language list refreshed, {} available", remaining.len());
            Err(format!("Cannot load language {}", language))
        }
        Selection::Locale => {
            manager.discover_languages();
            if !manager.match_current_locale() {
                info!("no language matches the system locale, using the built-in language");
            }
            Ok(())
        }
    }
}
