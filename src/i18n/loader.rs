//! Lang file loading.
//!
//! A segment is loaded in two independent passes over the registered
//! directories, each stopping at its first match:
//!
//! 1. default-language base: `{dir}[/{default}]/{segment}.{ext}`
//! 2. current-language overlay: `{dir}/{current}/{segment}.{ext}`
//!
//! The overlay is merged on top of the base, overlay keys winning.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{LangError, Result};
use crate::i18n::language::Language;
use crate::i18n::metrics::LookupMetrics;
use crate::i18n::selector::is_contained_segment;

/// Flat key -> text mapping of one segment.
pub type Texts = HashMap<String, String>;

/// On-disk encoding of lang files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LangFileFormat {
    /// `{segment}.json`, a single object of string values
    #[default]
    Json,
    /// `{segment}.toml`, a flat table of string values
    Toml,
}

impl LangFileFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            LangFileFormat::Json => "json",
            LangFileFormat::Toml => "toml",
        }
    }

    /// Parse a format name as used in configuration (`json`, `toml`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "json" => Some(LangFileFormat::Json),
            "toml" => Some(LangFileFormat::Toml),
            _ => None,
        }
    }

    /// Parse file content into a flat mapping.
    pub fn parse(&self, content: &str, path: &Path) -> Result<Texts> {
        let invalid = |reason: String| LangError::InvalidLangFile {
            path: path.to_path_buf(),
            reason,
        };
        match self {
            LangFileFormat::Json => serde_json::from_str(content).map_err(|e| invalid(e.to_string())),
            LangFileFormat::Toml => toml::from_str(content).map_err(|e| invalid(e.to_string())),
        }
    }
}

/// Inputs of one segment load.
pub(crate) struct LoadRequest<'a> {
    pub dirs: &'a [PathBuf],
    pub current: Option<&'a Language>,
    pub default: Option<&'a Language>,
    pub segment: &'a str,
    pub format: LangFileFormat,
}

impl LoadRequest<'_> {
    fn file_name(&self) -> String {
        format!("{}.{}", self.segment, self.format.extension())
    }

    /// Scan directories in order and read the first existing candidate.
    fn first_match(
        &self,
        lang: Option<&Language>,
        last_probed: &mut Option<PathBuf>,
        metrics: &LookupMetrics,
    ) -> Result<Option<Texts>> {
        let file_name = self.file_name();
        for dir in self.dirs {
            let path = match lang {
                Some(lang) => dir.join(lang.code()).join(&file_name),
                None => dir.join(&file_name),
            };
            let exists = path.is_file();
            debug!(path = %path.display(), exists, "Probing lang file");
            if exists {
                let texts = read_lang_file(&path, self.format)?;
                metrics.record_file_read();
                return Ok(Some(texts));
            }
            *last_probed = Some(path);
        }
        Ok(None)
    }

    /// Run both passes and merge.
    pub(crate) fn load(&self, metrics: &LookupMetrics) -> Result<Texts> {
        if !is_contained_segment(self.segment) {
            return Err(LangError::InvalidSelector(self.segment.to_string()));
        }
        let mut last_probed = None;

        let base = self.first_match(self.default, &mut last_probed, metrics)?;

        let overlay = match self.current {
            Some(current) => self.first_match(Some(current), &mut last_probed, metrics)?,
            None => None,
        };

        let texts = match (base, overlay) {
            (Some(mut base), Some(overlay)) => {
                base.extend(overlay);
                base
            }
            (Some(base), None) => base,
            (None, Some(overlay)) => overlay,
            (None, None) => {
                return Err(LangError::LangFileNotFound {
                    segment: self.segment.to_string(),
                    path: last_probed.unwrap_or_else(|| PathBuf::from(self.file_name())),
                })
            }
        };

        metrics.record_segment_load();
        debug!(segment = self.segment, keys = texts.len(), "Loaded segment");
        Ok(texts)
    }
}

fn read_lang_file(path: &Path, format: LangFileFormat) -> Result<Texts> {
    let content = fs::read_to_string(path).map_err(|source| LangError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    format.parse(&content, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // ==================== Helper Functions ====================

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn lang(code: &str) -> Language {
        Language::from_code(code).unwrap()
    }

    fn load(
        dirs: &[PathBuf],
        current: Option<&Language>,
        default: Option<&Language>,
        segment: &str,
    ) -> Result<Texts> {
        LoadRequest {
            dirs,
            current,
            default,
            segment,
            format: LangFileFormat::Json,
        }
        .load(&LookupMetrics::new())
    }

    // ==================== Format Tests ====================

    #[test]
    fn test_format_extension() {
        assert_eq!(LangFileFormat::Json.extension(), "json");
        assert_eq!(LangFileFormat::Toml.extension(), "toml");
        assert_eq!(LangFileFormat::default(), LangFileFormat::Json);
    }

    #[test]
    fn test_format_from_name() {
        assert_eq!(LangFileFormat::from_name("JSON"), Some(LangFileFormat::Json));
        assert_eq!(LangFileFormat::from_name(" toml "), Some(LangFileFormat::Toml));
        assert_eq!(LangFileFormat::from_name("php"), None);
    }

    #[test]
    fn test_parse_json_flat_object() {
        let texts = LangFileFormat::Json
            .parse(r#"{"a": "1", "b": "2"}"#, Path::new("x.json"))
            .unwrap();
        assert_eq!(texts.len(), 2);
        assert_eq!(texts["a"], "1");
    }

    #[test]
    fn test_parse_json_rejects_non_mapping() {
        for content in [r#"["a"]"#, r#"{"a": 1}"#, r#"{"a": {"b": "c"}}"#, "not json"] {
            let result = LangFileFormat::Json.parse(content, Path::new("x.json"));
            assert!(
                matches!(result, Err(LangError::InvalidLangFile { .. })),
                "{content} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_toml_flat_table() {
        let texts = LangFileFormat::Toml
            .parse("good-morning = \"Buenos días\"\n", Path::new("x.toml"))
            .unwrap();
        assert_eq!(texts["good-morning"], "Buenos días");
    }

    #[test]
    fn test_parse_toml_rejects_nested_table() {
        let result = LangFileFormat::Toml.parse("[section]\nkey = \"v\"\n", Path::new("x.toml"));
        assert!(matches!(result, Err(LangError::InvalidLangFile { .. })));
    }

    // ==================== Load Tests ====================

    #[test]
    fn test_overlay_merges_on_base() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "en/file.json", r#"{"a": "1", "b": "2"}"#);
        write(temp.path(), "es/file.json", r#"{"b": "20", "c": "30"}"#);
        let dirs = vec![temp.path().to_path_buf()];

        let texts = load(&dirs, Some(&lang("es")), Some(&lang("en")), "file").unwrap();

        assert_eq!(texts.len(), 3);
        assert_eq!(texts["a"], "1");
        assert_eq!(texts["b"], "20");
        assert_eq!(texts["c"], "30");
    }

    #[test]
    fn test_base_from_directory_root_without_default() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "file.json", r#"{"a": "root"}"#);
        let dirs = vec![temp.path().to_path_buf()];

        let texts = load(&dirs, None, None, "file").unwrap();
        assert_eq!(texts["a"], "root");
    }

    #[test]
    fn test_overlay_alone_without_base() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "es/file.json", r#"{"a": "uno"}"#);
        let dirs = vec![temp.path().to_path_buf()];

        let texts = load(&dirs, Some(&lang("es")), Some(&lang("en")), "file").unwrap();
        assert_eq!(texts["a"], "uno");
    }

    #[test]
    fn test_first_directory_wins_per_pass() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        write(first.path(), "en/file.json", r#"{"a": "first"}"#);
        write(second.path(), "en/file.json", r#"{"a": "second", "b": "only second"}"#);
        write(second.path(), "es/file.json", r#"{"c": "tres"}"#);
        let dirs = vec![first.path().to_path_buf(), second.path().to_path_buf()];

        let texts = load(&dirs, Some(&lang("es")), Some(&lang("en")), "file").unwrap();

        assert_eq!(texts["a"], "first");
        assert!(!texts.contains_key("b"), "second base must not be merged");
        assert_eq!(texts["c"], "tres");
    }

    #[test]
    fn test_not_found_names_last_probed_path() {
        let temp = TempDir::new().unwrap();
        let dirs = vec![temp.path().to_path_buf()];

        let err = load(&dirs, Some(&lang("es")), Some(&lang("en")), "file").unwrap_err();

        match err {
            LangError::LangFileNotFound { segment, path } => {
                assert_eq!(segment, "file");
                assert_eq!(path, temp.path().join("es").join("file.json"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_file_is_fatal() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "en/file.json", r#"["not", "a", "map"]"#);
        let dirs = vec![temp.path().to_path_buf()];

        let err = load(&dirs, None, Some(&lang("en")), "file").unwrap_err();
        assert!(matches!(err, LangError::InvalidLangFile { .. }));
    }

    #[test]
    fn test_directory_named_like_file_is_skipped() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("en").join("file.json")).unwrap();
        let dirs = vec![temp.path().to_path_buf()];

        let err = load(&dirs, None, Some(&lang("en")), "file").unwrap_err();
        assert!(matches!(err, LangError::LangFileNotFound { .. }));
    }

    #[test]
    fn test_segment_outside_directories_is_rejected() {
        let outside = TempDir::new().unwrap();
        write(outside.path(), "secret.json", r#"{"k": "leaked"}"#);
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("en")).unwrap();
        let dirs = vec![temp.path().to_path_buf()];

        let absolute = outside.path().join("secret");
        let absolute = absolute.to_str().unwrap();
        for segment in [absolute, "../secret", "en/../../secret"] {
            let result = load(&dirs, None, Some(&lang("en")), segment);
            assert!(
                matches!(result, Err(LangError::InvalidSelector(_))),
                "'{segment}' should be rejected"
            );
        }
    }

    #[test]
    fn test_load_counts_files_read() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "en/file.json", r#"{"a": "1"}"#);
        write(temp.path(), "es/file.json", r#"{"a": "2"}"#);
        let dirs = vec![temp.path().to_path_buf()];
        let (en, es) = (lang("en"), lang("es"));
        let metrics = LookupMetrics::new();

        LoadRequest {
            dirs: &dirs,
            current: Some(&es),
            default: Some(&en),
            segment: "file",
            format: LangFileFormat::Json,
        }
        .load(&metrics)
        .unwrap();

        assert_eq!(metrics.files_read(), 2);
        assert_eq!(metrics.segment_loads(), 1);
    }
}
