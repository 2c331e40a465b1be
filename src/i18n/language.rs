//! Language type: validated language code.
//!
//! Language codes are joined into lang file paths (`{dir}/{code}/{segment}.ext`),
//! so a code must be a single, non-traversing path component.

use std::fmt;

use crate::error::{LangError, Result};

/// A validated language code (e.g. "en", "es", "pt-BR").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Language {
    code: String,
}

impl Language {
    /// Create a Language from a code string.
    ///
    /// # Returns
    /// * `Ok(Language)` if the code is usable as a directory name
    /// * `Err(LangError::InvalidLanguage)` if it is empty, `.`/`..`, or contains
    ///   a path separator
    ///
    /// # Example
    /// ```
    /// use langtext::i18n::Language;
    ///
    /// let spanish = Language::from_code("es").unwrap();
    /// assert_eq!(spanish.code(), "es");
    /// ```
    pub fn from_code(code: &str) -> Result<Language> {
        let invalid = code.is_empty()
            || code == "."
            || code == ".."
            || code.contains(['/', '\\'])
            || code.contains('\0');
        if invalid {
            return Err(LangError::InvalidLanguage(code.to_string()));
        }
        Ok(Language {
            code: code.to_string(),
        })
    }

    /// Parse an optional code, keeping `None` as "no language".
    pub(crate) fn from_optional(code: Option<&str>) -> Result<Option<Language>> {
        code.map(Language::from_code).transpose()
    }

    /// Get the language code.
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}
