//! Identity of a selectable language resource.
//!
//! A [`Language`] is a handle to a file, not a name: equality and hashing only look at the
//! file path (case-insensitively), never at the display name.

use std::{
    fmt::Display,
    hash::{Hash, Hasher},
    path::{Path, PathBuf},
};

use lazy_static::lazy_static;
use serde::Serialize;

/// Display name of the built-in language.
pub const BUILTIN_LANGUAGE_NAME: &str = "ɥsᴉlƃuƎ";

/// Sentinel path of the built-in language. It is not a real file.
pub const BUILTIN_FILE_TOKEN: &str = "uᴉ-ʇlᴉnq";

lazy_static! {
    static ref BUILTIN_LANGUAGE: Language = Language::new(BUILTIN_LANGUAGE_NAME, BUILTIN_FILE_TOKEN);
}

/// A discoverable language resource identified by its file path.
#[derive(Debug, Clone, Serialize)]
pub struct Language {
    name: String,
    file_path: PathBuf,
    file_name: String,
}

impl Language {
    /// Creates a language from a display name and the path of its resource file.
    ///
    /// The file name is derived from the path (stem without the final extension).
    pub fn new(name: impl Into<String>, file_path: impl Into<PathBuf>) -> Self {
        let file_path = file_path.into();
        let file_name = file_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name: name.into(),
            file_path,
            file_name,
        }
    }

    /// The reserved built-in language.
    pub fn builtin() -> &'static Language {
        &BUILTIN_LANGUAGE
    }

    /// Whether this language refers to the built-in sentinel.
    ///
    /// Matches on the file name token only, so a language constructed elsewhere with the
    /// sentinel path still counts as built-in.
    pub fn is_builtin(&self) -> bool {
        self.file_name == BUILTIN_LANGUAGE.file_name
    }

    /// Human readable display name; may be empty.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// File stem of [`Language::file_path`].
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    fn path_key(&self) -> String {
        self.file_path.to_string_lossy().to_lowercase()
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.name.trim().is_empty() {
            write!(f, "({})", self.file_name)
        } else {
            write!(f, "{} ({})", self.name, self.file_name)
        }
    }
}

impl PartialEq for Language {
    fn eq(&self, other: &Self) -> bool {
        self.file_path == other.file_path || self.path_key() == other.path_key()
    }
}

impl Eq for Language {}

impl Hash for Language {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path_key().hash(state);
    }
}
