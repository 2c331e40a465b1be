//! Language-scoped lookup instance.
//!
//! A `Lookup` resolves selectors for one (current, default) language pair and
//! caches every segment it loads until the cache is reset.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, warn};

use crate::error::{LangError, Result};
use crate::i18n::language::Language;
use crate::i18n::loader::{LoadRequest, Texts};
use crate::i18n::metrics::LookupMetrics;
use crate::i18n::registry::SearchPaths;
use crate::i18n::selector::Selector;

#[derive(Debug, Default)]
struct LookupState {
    current: Option<Language>,
    default: Option<Language>,
    loaded: HashMap<String, Texts>,
    /// Bumped on every reset; a load started under an older generation is discarded.
    generation: u64,
}

impl LookupState {
    fn reset(&mut self) {
        self.loaded.clear();
        self.generation += 1;
    }
}

/// Text lookup for one (current, default) language pair.
///
/// Obtain instances through [`LangRegistry::get_instance`](crate::i18n::LangRegistry::get_instance);
/// the directory set is read from the registry on every load, so directories
/// added later are picked up by segments that are not cached yet.
#[derive(Debug)]
pub struct Lookup {
    search: Arc<RwLock<SearchPaths>>,
    state: RwLock<LookupState>,
    metrics: LookupMetrics,
}

impl Lookup {
    pub(crate) fn new(
        search: Arc<RwLock<SearchPaths>>,
        current: Option<Language>,
        default: Option<Language>,
    ) -> Self {
        Self {
            search,
            state: RwLock::new(LookupState {
                current,
                default,
                ..LookupState::default()
            }),
            metrics: LookupMetrics::new(),
        }
    }

    /// Get the text for `selector` (`"<segment>.<key>"`).
    ///
    /// Loads the segment on first use. A key missing from the segment yields
    /// `default` when given, otherwise the selector itself.
    ///
    /// If the cache is reset or a language changes while the segment is being
    /// loaded, the load is repeated once under the new languages. A second
    /// concurrent change during that reload returns the reloaded texts
    /// without caching them.
    ///
    /// # Errors
    /// * `NoDirectories` if the registry has no directories
    /// * `InvalidSelector` if the selector is malformed or its segment is not
    ///   a relative path inside the lang files directories
    /// * `LangFileNotFound` / `InvalidLangFile` / `Io` from the segment load
    pub fn get(&self, selector: &str, default: Option<&str>) -> Result<String> {
        let (dirs, format) = {
            let search = self.search.read().unwrap_or_else(PoisonError::into_inner);
            if search.dirs.is_empty() {
                return Err(LangError::NoDirectories);
            }
            (search.dirs.clone(), search.format)
        };

        let selector = Selector::parse(selector)?;

        {
            let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(texts) = state.loaded.get(selector.segment()) {
                self.metrics.record_cache_hit();
                return Ok(self.resolve(texts, &selector, default));
            }
        }

        let mut stale = None;
        for _ in 0..2 {
            let (current, default_lang, generation) = {
                let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
                (state.current.clone(), state.default.clone(), state.generation)
            };

            let texts = LoadRequest {
                dirs: &dirs,
                current: current.as_ref(),
                default: default_lang.as_ref(),
                segment: selector.segment(),
                format,
            }
            .load(&self.metrics)?;

            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            if state.generation == generation {
                let texts = state
                    .loaded
                    .entry(selector.segment().to_string())
                    .or_insert(texts);
                return Ok(self.resolve(texts, &selector, default));
            }
            // Languages changed or the cache was reset while loading.
            debug!(segment = selector.segment(), "Discarding stale segment load");
            stale = Some(texts);
        }

        let texts = stale.unwrap_or_default();
        Ok(self.resolve(&texts, &selector, default))
    }

    /// Shorthand for `get(selector, Some(default))`.
    pub fn get_or(&self, selector: &str, default: &str) -> Result<String> {
        self.get(selector, Some(default))
    }

    fn resolve(&self, texts: &Texts, selector: &Selector<'_>, default: Option<&str>) -> String {
        if let Some(text) = texts.get(selector.key()) {
            return text.clone();
        }
        self.metrics.record_missing_key();
        warn!(
            selector = %selector,
            has_default = default.is_some(),
            "Missing translation"
        );
        match default {
            Some(default) => default.to_string(),
            None => selector.to_string(),
        }
    }

    /// Drop every loaded segment.
    pub fn reset_loaded_texts(&self) -> &Self {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .reset();
        self
    }

    /// Set the current (overlay) language. `None` disables the overlay pass.
    ///
    /// Loaded texts are dropped when the language actually changes.
    pub fn set_current_language(&self, lang: Option<&str>) -> Result<&Self> {
        let lang = Language::from_optional(lang)?;
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.current != lang {
            debug!(from = ?state.current, to = ?lang, "Current language changed");
            state.current = lang;
            state.reset();
        }
        Ok(self)
    }

    /// Set the default (base) language. `None` reads base files from the
    /// directory roots.
    ///
    /// Loaded texts are dropped when the language actually changes.
    pub fn set_default_language(&self, lang: Option<&str>) -> Result<&Self> {
        let lang = Language::from_optional(lang)?;
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.default != lang {
            debug!(from = ?state.default, to = ?lang, "Default language changed");
            state.default = lang;
            state.reset();
        }
        Ok(self)
    }

    /// Get the current (overlay) language.
    pub fn current_language(&self) -> Option<Language> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .current
            .clone()
    }

    /// Get the default (base) language.
    pub fn default_language(&self) -> Option<Language> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .default
            .clone()
    }

    /// Names of the cached segments, sorted.
    pub fn loaded_segments(&self) -> Vec<String> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        let mut segments: Vec<String> = state.loaded.keys().cloned().collect();
        segments.sort();
        segments
    }

    /// Get this instance's lookup counters.
    pub fn metrics(&self) -> &LookupMetrics {
        &self.metrics
    }
}
