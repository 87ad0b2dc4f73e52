//! Core data types shared across the extraction pipeline.

use crate::{FacetgenError, Result};
use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// The aggregate key/value result for one file.
///
/// Keys are whatever facet keys were configured; there is no fixed schema.
/// Insertion order follows declaration order of the facet definitions, and
/// a later definition writing an existing key overwrites the earlier value
/// in place (last-declared-wins).
pub type ItemRecord = IndexMap<String, Value>;

/// Ephemeral per-file state for one extraction run.
///
/// Carries the file path and a lazily-loaded UTF-8 view of the file
/// content. Created at the start of processing one file, owned exclusively
/// by the orchestrator for that file, and discarded when the record is
/// handed off. Never shared across files.
pub struct ExtractionContext {
    path: PathBuf,
    content: OnceCell<Option<String>>,
}

impl ExtractionContext {
    /// Create a context for one file. No I/O happens until content is requested.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            content: OnceCell::new(),
        }
    }

    /// Path to the file under extraction.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The path rendered as a string, for pattern-based processing.
    pub fn path_str(&self) -> Cow<'_, str> {
        self.path.to_string_lossy()
    }

    /// The file content as UTF-8 text, read at most once.
    ///
    /// Returns `Ok(None)` for binary (non-UTF-8) files so that text-pattern
    /// methods can yield "no value" instead of failing. I/O errors bubble up.
    pub fn text_content(&self) -> Result<Option<&str>> {
        let content = self.content.get_or_try_init(|| -> Result<Option<String>> {
            let bytes = std::fs::read(&self.path)?;
            Ok(String::from_utf8(bytes).ok())
        })?;
        Ok(content.as_deref())
    }
}

/// Classification of a facet-level failure, mirroring [`FacetgenError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetErrorKind {
    UnknownProcessor,
    MissingField,
    MalformedTimestamp,
    ChainMismatch,
    Extraction,
    Validation,
    Serialization,
    Io,
    Other,
}

impl From<&FacetgenError> for FacetErrorKind {
    fn from(err: &FacetgenError) -> Self {
        match err {
            FacetgenError::Io(_) => FacetErrorKind::Io,
            FacetgenError::UnknownProcessor { .. } => FacetErrorKind::UnknownProcessor,
            FacetgenError::MissingField { .. } => FacetErrorKind::MissingField,
            FacetgenError::MalformedTimestamp { .. } => FacetErrorKind::MalformedTimestamp,
            FacetgenError::ChainMismatch { .. } => FacetErrorKind::ChainMismatch,
            FacetgenError::Extraction { .. } => FacetErrorKind::Extraction,
            FacetgenError::Validation { .. } => FacetErrorKind::Validation,
            FacetgenError::Serialization { .. } => FacetErrorKind::Serialization,
            FacetgenError::LockPoisoned(_) | FacetgenError::Other(_) => FacetErrorKind::Other,
        }
    }
}

/// One facet-level failure recorded under the best-effort error policy.
#[derive(Debug, Clone, Serialize)]
pub struct FacetError {
    /// The facet key whose chain failed.
    pub facet_key: String,
    /// Error classification.
    pub kind: FacetErrorKind,
    /// Human-readable error message.
    pub message: String,
}

impl FacetError {
    pub(crate) fn new(facet_key: &str, err: &FacetgenError) -> Self {
        Self {
            facet_key: facet_key.to_string(),
            kind: FacetErrorKind::from(err),
            message: err.to_string(),
        }
    }
}

/// The result of processing one file.
///
/// Under the fail-fast policy `errors` is always empty (the first facet
/// failure aborts the file instead). Under best-effort, `record` holds the
/// facets that succeeded and `errors` the ones that did not.
#[derive(Debug, Clone, Serialize, Default)]
pub struct ExtractionOutcome {
    /// The merged item record.
    pub record: ItemRecord,
    /// Per-facet errors collected in best-effort mode.
    pub errors: Vec<FacetError>,
}

impl ExtractionOutcome {
    /// True when every configured facet either produced a value or was
    /// legitimately absent (no errors were recorded).
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}
