//! All error types for the langswitch crate.
//!
//! These are returned from the fallible building blocks (parsing, serialization, export).
//! The manager's language-switching operations recover from them and report `bool`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid resource: {0}")]
    InvalidResource(String),

    #[error("language file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("superseded by a newer call")]
    Superseded,

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Creates a new invalid resource error
    pub fn invalid_resource(message: impl Into<String>) -> Self {
        Error::InvalidResource(message.into())
    }
}
