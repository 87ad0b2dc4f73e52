//! Built-in pre-processors.
//!
//! Pre-processors operate on the input arguments for an extraction method.
//! They can be used to reshape the input handed to a method so the method
//! itself does not need to know path structure.

use crate::plugins::{Plugin, PreProcessor};
use crate::Result;
use serde_json::Value;
use std::path::Path;

/// Filename reducer.
///
/// Processor name: `filename_reducer`.
///
/// Takes a file path and returns just the final path component, so a
/// filename-pattern extraction method does not need to know directory
/// structure.
pub struct FilenameReducer;

impl Plugin for FilenameReducer {
    fn name(&self) -> &str {
        "filename_reducer"
    }

    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    fn description(&self) -> &str {
        "Reduces a file path to its final component"
    }
}

impl PreProcessor for FilenameReducer {
    fn apply(&self, input: &str, _config: &Value) -> Result<String> {
        let reduced = Path::new(input)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| input.to_string());
        Ok(reduced)
    }
}

/// Extension stripper.
///
/// Processor name: `strip_extension`.
///
/// Drops the final extension from the last path component. Composes with
/// `filename_reducer` so filename patterns need not account for suffixes.
pub struct StripExtension;

impl Plugin for StripExtension {
    fn name(&self) -> &str {
        "strip_extension"
    }

    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    fn description(&self) -> &str {
        "Drops the final extension from the last path component"
    }
}

impl PreProcessor for StripExtension {
    fn apply(&self, input: &str, _config: &Value) -> Result<String> {
        let path = Path::new(input);
        match (path.file_stem(), path.parent()) {
            (Some(stem), Some(parent)) if !parent.as_os_str().is_empty() => {
                Ok(parent.join(stem).to_string_lossy().into_owned())
            }
            (Some(stem), _) => Ok(stem.to_string_lossy().into_owned()),
            (None, _) => Ok(input.to_string()),
        }
    }
}
