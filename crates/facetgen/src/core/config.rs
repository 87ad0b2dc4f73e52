//! Facet definitions and extractor configuration.
//!
//! This module defines the declarative configuration the engine consumes:
//! an ordered list of facet definitions, each naming an extraction method
//! and ordered pre-/post-processor chains. Configuration can be loaded
//! from TOML, YAML, or JSON files, or built programmatically.

use crate::{FacetgenError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// How facet-level failures are handled during one file's run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Record each facet failure and continue with the remaining facet
    /// definitions, returning the partial record plus the error list.
    ///
    /// This is the default: facets are optional by default and one bad
    /// facet should not cost the rest of the record.
    #[default]
    BestEffort,

    /// Abort the whole file's record on the first facet failure.
    FailFast,
}

/// A named processor plus its option mapping.
///
/// The named processor must be registered in the corresponding registry at
/// resolution time; an unknown name fails resolution with
/// `UnknownProcessor` before any file is processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorSpec {
    /// Registered processor name.
    pub name: String,

    /// Free-form option mapping handed to the processor. Omitted means
    /// "all defaults".
    #[serde(default)]
    pub config: Value,
}

impl ProcessorSpec {
    /// Spec with no options.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: Value::Null,
        }
    }

    /// Spec with an option mapping.
    pub fn with_config(name: impl Into<String>, config: Value) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }
}

/// Extraction method selector plus its option mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodSpec {
    /// Registered extraction method name.
    pub name: String,

    /// Free-form option mapping handed to the method.
    #[serde(default)]
    pub config: Value,
}

impl MethodSpec {
    /// Spec with an option mapping.
    pub fn with_config(name: impl Into<String>, config: Value) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }
}

/// Declares one facet to extract from a file.
///
/// Immutable once loaded; many facet definitions compose one extraction
/// job and run in declared order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacetDefinition {
    /// Output field name in the item record.
    pub facet_key: String,

    /// The extraction method and its configuration.
    pub method: MethodSpec,

    /// Pre-processors applied, in order, to the extraction input.
    #[serde(default)]
    pub pre_processors: Vec<ProcessorSpec>,

    /// Post-processors applied, in order, to each extracted value.
    #[serde(default)]
    pub post_processors: Vec<ProcessorSpec>,

    /// When true, a run in which the method yields no value fails this
    /// facet with `MissingField`. Facets are optional by default.
    #[serde(default)]
    pub required: bool,
}

/// Complete configuration for a facet extraction job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Facet definitions, in extraction order.
    #[serde(default)]
    pub facets: Vec<FacetDefinition>,

    /// Facet-failure handling policy.
    #[serde(default)]
    pub error_policy: ErrorPolicy,

    /// Maximum concurrent files in batch operations (None = num_cpus * 2).
    #[serde(default)]
    pub max_concurrent_files: Option<usize>,
}

impl ExtractorConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        toml::from_str(&content)
            .map_err(|e| FacetgenError::validation_with_source(format!("invalid TOML config: {}", e), e))
    }

    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        serde_yaml_ng::from_str(&content)
            .map_err(|e| FacetgenError::validation_with_source(format!("invalid YAML config: {}", e), e))
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        serde_json::from_str(&content)
            .map_err(|e| FacetgenError::validation_with_source(format!("invalid JSON config: {}", e), e))
    }
}
