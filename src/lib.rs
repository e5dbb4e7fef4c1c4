#![forbid(unsafe_code)]
//! Runtime language switching for desktop applications.
//!
//! Language files are plain XML documents: one root element, one child element per string.
//! A [`LocalizationManager`] discovers them in a directory, keeps one of them active with a
//! built-in table as terminal fallback, and tells subscribed observers whenever the active
//! language changes.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use langswitch::{LanguageChanged, LocalizationManager, LocalizationOptions};
//!
//! let manager = Arc::new(LocalizationManager::new(
//!     LocalizationOptions::new().with_language_dir("Lang"),
//! ));
//! manager.discover_languages();
//! manager.match_current_locale();
//!
//! let view = Arc::clone(&manager);
//! let subscription = manager.subscribe(Arc::new(move |_: &LanguageChanged| {
//!     println!("{}", view.get_localized_string("SelectLanguage"));
//! }));
//! # drop(subscription);
//! ```

pub mod discovery;
pub mod error;
pub mod language;
pub mod locale;
pub mod manager;
pub mod observer;
pub mod options;
pub mod table;
pub mod traits;

// Re-export most used types for easy consumption
pub use crate::{
    discovery::discover,
    error::Error,
    language::Language,
    manager::LocalizationManager,
    observer::{LanguageChanged, LanguageObserver, ObserverRegistry, Subscription},
    options::LocalizationOptions,
    table::{TranslationTable, peek_field},
};
