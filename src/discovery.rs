//! Scanning a directory for language files.

use std::{
    collections::HashSet,
    ffi::OsStr,
    fs::File,
    io::{BufReader, ErrorKind},
    path::Path,
};

use tracing::{debug, warn};

use crate::{
    error::Error,
    language::Language,
    table::{LANGUAGE_NAME_KEY, peek_field},
    traits::decode_bom,
};

/// Builds the set of selectable languages found in `folder`.
///
/// The built-in language is always part of the result. Files are candidates when their
/// extension equals `extension` (leading dot optional) and their stem differs from
/// `reserved_file_name`. A candidate that cannot be opened or parsed is skipped; the scan
/// goes on. A missing folder simply yields the built-in language alone.
pub fn discover(folder: &Path, extension: &str, reserved_file_name: &str) -> HashSet<Language> {
    let mut languages = HashSet::new();
    languages.insert(Language::builtin().clone());

    let extension = extension.trim_start_matches('.');
    let entries = match std::fs::read_dir(folder) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(folder = %folder.display(), "language folder does not exist");
            return languages;
        }
        Err(e) => {
            warn!(folder = %folder.display(), error = %e, "cannot read language folder");
            return languages;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() || !is_candidate(&path, extension, reserved_file_name) {
            continue;
        }

        match read_language_name(&path) {
            Ok(name) => {
                languages.insert(Language::new(name, path));
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "skipping unreadable language file");
            }
        }
    }

    debug!(
        folder = %folder.display(),
        count = languages.len(),
        "language discovery finished"
    );
    languages
}

fn is_candidate(path: &Path, extension: &str, reserved_file_name: &str) -> bool {
    path.extension().and_then(OsStr::to_str) == Some(extension)
        && path.file_stem().and_then(OsStr::to_str) != Some(reserved_file_name)
}

fn read_language_name(path: &Path) -> Result<String, Error> {
    let file = File::open(path)?;
    peek_field(BufReader::new(decode_bom(file)), LANGUAGE_NAME_KEY)
}
