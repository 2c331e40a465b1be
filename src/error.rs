use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by directory registration and text lookups.
///
/// A missing text key is not an error: lookups fall back to the caller's
/// default or to the selector itself.
#[derive(Debug, Error)]
pub enum LangError {
    /// The directory could not be canonicalized (usually it does not exist).
    #[error("cannot resolve lang files directory {path}: {source}")]
    Resolution {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A lookup was attempted before any directory was registered.
    #[error("there are no lang files directories defined")]
    NoDirectories,

    /// The selector has no `.` separator or an empty text key.
    #[error("incorrect selector '{0}'")]
    InvalidSelector(String),

    /// Neither the default-language nor the current-language pass found a file.
    #[error("lang file for '{segment}' is not found in available lang directories (last probed: {path})")]
    LangFileNotFound { segment: String, path: PathBuf },

    /// A lang file exists but is not a flat string-to-string mapping.
    #[error("incorrect lang file {path}: {reason}")]
    InvalidLangFile { path: PathBuf, reason: String },

    /// `translate` was called before any instance was created.
    #[error("language object is not created yet")]
    NoInstance,

    /// The language code cannot be used as a path component.
    #[error("invalid language code '{0}'")]
    InvalidLanguage(String),

    /// A lang file exists but could not be read.
    #[error("failed to read lang file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, LangError>;
