//! CLI library for testing purposes

pub mod config;
pub mod select;
pub mod view;

pub use config::{OptionOverrides, load_options};
pub use select::{Selection, apply_selection};
