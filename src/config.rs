//! Environment configuration for the lookup registry.
//!
//! Reads `LANG_FILES_DIRS`, `LANG_CURRENT`, `LANG_DEFAULT` and
//! `LANG_FILE_FORMAT`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use crate::i18n::{LangFileFormat, LangRegistry, Lookup};

/// Lookup settings read from the environment.
#[derive(Debug, Clone)]
pub struct LangConfig {
    /// Lang files directories, in search order
    pub lang_files_dirs: Vec<PathBuf>,

    /// Current (overlay) language
    pub current_lang: Option<String>,

    /// Default (base) language; `None` reads base files from directory roots
    pub default_lang: Option<String>,

    /// Lang file format (`json` or `toml`)
    pub format: LangFileFormat,
}

impl LangConfig {
    /// Build the config from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from any variable source (`name -> value`).
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |name: &str| var(name).filter(|v| !v.trim().is_empty());

        let dirs = non_empty("LANG_FILES_DIRS").context("LANG_FILES_DIRS not set")?;
        let lang_files_dirs: Vec<PathBuf> = std::env::split_paths(&dirs)
            .filter(|p| !p.as_os_str().is_empty())
            .collect();

        let format = match non_empty("LANG_FILE_FORMAT") {
            Some(name) => LangFileFormat::from_name(&name)
                .with_context(|| format!("Unknown LANG_FILE_FORMAT '{}'", name))?,
            None => LangFileFormat::default(),
        };

        Ok(Self {
            lang_files_dirs,
            current_lang: non_empty("LANG_CURRENT"),
            default_lang: non_empty("LANG_DEFAULT"),
            format,
        })
    }

    /// Register the directories on `registry` and return the configured instance.
    pub fn apply(&self, registry: &LangRegistry) -> Result<Arc<Lookup>> {
        if self.lang_files_dirs.is_empty() {
            bail!("No lang files directories configured");
        }
        registry.set_format(self.format);
        for dir in &self.lang_files_dirs {
            registry
                .add_lang_files_dir(dir)
                .with_context(|| format!("Failed to add lang files directory {:?}", dir))?;
        }
        let lookup = registry
            .get_instance(self.current_lang.as_deref(), self.default_lang.as_deref())
            .context("Invalid language in configuration")?;
        Ok(lookup)
    }
}
