//! Extraction method plugin trait.

use crate::plugins::Plugin;
use crate::types::ExtractionContext;
use crate::Result;
use serde_json::Value;

/// Trait for extraction method plugins.
///
/// An extraction method inspects a file, either by the input string handed
/// to it (the pre-processor chain's output, normally the file path) or by
/// the file's content through the [`ExtractionContext`], and produces zero
/// or more raw facet values.
///
/// # Contract
///
/// - An empty result vector means "no value"; the facet is skipped for this
///   file. This is not an error: facets are optional by default, and the
///   orchestrator raises `MissingField` only for facets marked required.
/// - Empty files, non-matching patterns, and binary files handed to a
///   text-pattern method all yield an empty vector, never a failure.
/// - Genuine failures (unreadable file, I/O errors) are returned as errors
///   and handled per the configured error policy.
pub trait ExtractionMethod: Plugin {
    /// Validate the method's option mapping.
    ///
    /// Called at resolution time, before any file is processed.
    fn validate_config(&self, config: &Value) -> Result<()> {
        let _ = config;
        Ok(())
    }

    /// Extract raw facet values from the file.
    ///
    /// # Arguments
    ///
    /// * `input` - The pre-processor chain's output (the file path when the
    ///   chain is empty)
    /// * `ctx` - Per-file context giving access to the file content
    /// * `config` - The method's option mapping from the facet definition
    fn extract(&self, input: &str, ctx: &ExtractionContext, config: &Value) -> Result<Vec<Value>>;
}
