//! Directory-backed localization text lookup.
//!
//! Selectors of the form `segment.key` are resolved against flat lang files
//! for a current language, falling back to a default language, then to a
//! caller-supplied default, then to the selector itself.

pub mod config;
pub mod error;
pub mod i18n;

pub use error::{LangError, Result};
pub use i18n::{LangFileFormat, LangRegistry, Language, Lookup};
