//! Localization text lookup.
//!
//! Texts live in flat lang files, one per directory, language and segment:
//! `{dir}/{lang}/{segment}.json` (or `{dir}/{segment}.json` for the base
//! texts of an instance without a default language).
//!
//! # Architecture
//!
//! - `registry`: lang files directories and the memoizing instance factory
//! - `lookup`: language-scoped instance with a per-segment text cache
//! - `loader`: two-pass (default base, current overlay) segment loading
//! - `selector`: `segment.key` parsing
//! - `language`: validated language codes
//! - `metrics`: per-instance load and cache counters
//!
//! # Example
//!
//! ```rust,ignore
//! use langtext::i18n::LangRegistry;
//!
//! let registry = LangRegistry::new();
//! registry.add_lang_files_dir("lang")?;
//!
//! let spanish = registry.get_instance(Some("es"), Some("en"))?;
//! let text = spanish.get("example.good-morning", None)?;
//! ```

mod language;
mod loader;
mod lookup;
mod metrics;
mod registry;
mod selector;

pub use language::Language;
pub use loader::{LangFileFormat, Texts};
pub use lookup::Lookup;
pub use metrics::{LookupMetrics, MetricsReport};
pub use registry::{add_lang_files_dir, exclude_lang_files_dir, get_instance, t, LangRegistry};
pub use selector::Selector;
