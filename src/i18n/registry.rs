//! Lang registry: lang files directories and the lookup instance factory.
//!
//! A `LangRegistry` owns the ordered set of directories searched for lang
//! files and memoizes one `Lookup` per (current, default) language pair.
//! Applications normally use the process-wide registry through
//! [`LangRegistry::global`] and the free functions at the bottom of this
//! module; tests construct their own registry.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock};

use tracing::info;

use crate::error::{LangError, Result};
use crate::i18n::language::Language;
use crate::i18n::loader::LangFileFormat;
use crate::i18n::lookup::Lookup;

/// Directories and file format shared between a registry and its instances.
#[derive(Debug, Default)]
pub(crate) struct SearchPaths {
    pub(crate) dirs: Vec<PathBuf>,
    pub(crate) format: LangFileFormat,
}

type InstanceKey = (Option<Language>, Option<Language>);

/// Registry of lang files directories and lookup instances.
#[derive(Debug, Default)]
pub struct LangRegistry {
    search: Arc<RwLock<SearchPaths>>,
    /// Creation order is kept: `translate` uses the first instance.
    instances: Mutex<Vec<(InstanceKey, Arc<Lookup>)>>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LangRegistry> = OnceLock::new();

impl LangRegistry {
    /// Create an empty registry reading JSON lang files.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry reading lang files in `format`.
    pub fn with_format(format: LangFileFormat) -> Self {
        let registry = Self::new();
        registry.set_format(format);
        registry
    }

    /// Get the process-wide registry.
    pub fn global() -> &'static LangRegistry {
        REGISTRY.get_or_init(LangRegistry::new)
    }

    /// Change the lang file format. Already loaded segments are kept.
    pub fn set_format(&self, format: LangFileFormat) {
        self.search
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .format = format;
    }

    /// Get the lang file format used for new segment loads.
    pub fn format(&self) -> LangFileFormat {
        self.search
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .format
    }

    /// Register a lang files directory.
    ///
    /// The path is canonicalized; adding the same directory twice is a no-op.
    ///
    /// # Errors
    /// `Resolution` if the path cannot be canonicalized (e.g. it does not exist).
    pub fn add_lang_files_dir(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        let canonical = fs::canonicalize(dir).map_err(|source| LangError::Resolution {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut search = self.search.write().unwrap_or_else(PoisonError::into_inner);
        if !search.dirs.contains(&canonical) {
            info!(dir = %canonical.display(), "Added lang files directory");
            search.dirs.push(canonical);
        }
        Ok(())
    }

    /// Unregister a lang files directory. Unknown directories are ignored.
    pub fn exclude_lang_files_dir(&self, dir: impl AsRef<Path>) {
        let dir = dir.as_ref();
        let canonical = fs::canonicalize(dir).unwrap_or_else(|_| dir.components().collect());

        let mut search = self.search.write().unwrap_or_else(PoisonError::into_inner);
        let before = search.dirs.len();
        search.dirs.retain(|d| d != &canonical);
        if search.dirs.len() != before {
            info!(dir = %canonical.display(), "Excluded lang files directory");
        }
    }

    /// Registered directories in search order.
    pub fn directories(&self) -> Vec<PathBuf> {
        self.search
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .dirs
            .clone()
    }

    /// Get the lookup instance for a (current, default) language pair.
    ///
    /// Equal arguments always return the same instance (`Arc::ptr_eq`), so the
    /// loaded texts are shared between call sites. Different arguments never
    /// share a cache.
    ///
    /// # Errors
    /// `InvalidLanguage` if either code cannot be used as a directory name.
    pub fn get_instance(
        &self,
        current_lang: Option<&str>,
        default_lang: Option<&str>,
    ) -> Result<Arc<Lookup>> {
        let key = (
            Language::from_optional(current_lang)?,
            Language::from_optional(default_lang)?,
        );

        let mut instances = self.instances.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((_, lookup)) = instances.iter().find(|(k, _)| *k == key) {
            return Ok(Arc::clone(lookup));
        }

        info!(current = ?current_lang, default = ?default_lang, "Created lookup instance");
        let lookup = Arc::new(Lookup::new(
            Arc::clone(&self.search),
            key.0.clone(),
            key.1.clone(),
        ));
        instances.push((key, Arc::clone(&lookup)));
        Ok(lookup)
    }

    /// Look up `selector` on the first instance ever created.
    ///
    /// # Errors
    /// `NoInstance` before any `get_instance` call, otherwise as [`Lookup::get`].
    pub fn translate(&self, selector: &str, default: Option<&str>) -> Result<String> {
        let first = {
            let instances = self.instances.lock().unwrap_or_else(PoisonError::into_inner);
            instances
                .first()
                .map(|(_, lookup)| Arc::clone(lookup))
                .ok_or(LangError::NoInstance)?
        };
        first.get(selector, default)
    }

    /// Get the number of lookup instances created so far.
    pub fn instance_count(&self) -> usize {
        self.instances
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Register a directory on the global registry.
pub fn add_lang_files_dir(dir: impl AsRef<Path>) -> Result<()> {
    LangRegistry::global().add_lang_files_dir(dir)
}

/// Unregister a directory from the global registry.
pub fn exclude_lang_files_dir(dir: impl AsRef<Path>) {
    LangRegistry::global().exclude_lang_files_dir(dir)
}

/// Get a lookup instance from the global registry.
pub fn get_instance(current_lang: Option<&str>, default_lang: Option<&str>) -> Result<Arc<Lookup>> {
    LangRegistry::global().get_instance(current_lang, default_lang)
}

/// Translate through the first instance created on the global registry.
pub fn t(selector: &str, default: Option<&str>) -> Result<String> {
    LangRegistry::global().translate(selector, default)
}
