//! Selector parsing: `"<segment>.<key>"`, split on the first dot.

use std::fmt;
use std::path::{Component, Path};

use crate::error::{LangError, Result};

/// A parsed selector. The key may itself contain dots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selector<'a> {
    segment: &'a str,
    key: &'a str,
}

impl<'a> Selector<'a> {
    /// Split `raw` on the first `.`.
    ///
    /// Fails with `InvalidSelector` when there is no `.`, the key part is empty,
    /// or the segment is not a relative path made of plain names (absolute
    /// paths and root or prefix components are rejected; a segment never
    /// contains a dot, so `.` and `..` cannot occur). An empty segment (`".key"`) is
    /// accepted; it simply names the lang file `.{ext}`, which is unlikely to
    /// exist.
    pub fn parse(raw: &'a str) -> Result<Self> {
        match raw.split_once('.') {
            Some((segment, key)) if !key.is_empty() && is_contained_segment(segment) => {
                Ok(Self { segment, key })
            }
            _ => Err(LangError::InvalidSelector(raw.to_string())),
        }
    }

    /// The lang file name (without extension).
    pub fn segment(&self) -> &'a str {
        self.segment
    }

    /// The text key inside the lang file.
    pub fn key(&self) -> &'a str {
        self.key
    }
}

impl fmt::Display for Selector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.segment, self.key)
    }
}

/// True when `segment` joined onto a directory stays inside it.
pub(crate) fn is_contained_segment(segment: &str) -> bool {
    Path::new(segment)
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
}
