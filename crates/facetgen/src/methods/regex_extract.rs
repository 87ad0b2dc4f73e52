//! Pattern-based extraction method.

use crate::plugins::{parse_config, ExtractionMethod, Plugin};
use crate::types::ExtractionContext;
use crate::{FacetgenError, Result};
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Where the pattern is applied.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RegexTarget {
    /// The pre-processor chain's output (the file path when the chain is
    /// empty).
    #[default]
    Input,
    /// The file's text content.
    Content,
}

/// Options for the `regex` method.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegexOptions {
    /// The regular expression, with named capture groups.
    pub pattern: String,

    /// What the pattern is matched against.
    #[serde(default)]
    pub target: RegexTarget,
}

/// Pattern-based extraction method.
///
/// Method name: `regex`.
///
/// Applies a regular expression with search-anywhere semantics (not
/// anchored) to either the extraction input or the file's text content.
/// One named capture group yields a string; several yield a mapping of
/// group name to captured string; a pattern without named groups yields
/// the whole match. An absent pattern yields no value, not an error.
///
/// To match against just the basename rather than the full path, compose
/// the `filename_reducer` pre-processor ahead of this method instead of
/// encoding path structure in the pattern.
pub struct RegexExtract;

impl RegexExtract {
    fn compile(options: &RegexOptions) -> Result<Regex> {
        Regex::new(&options.pattern).map_err(|e| {
            FacetgenError::validation_with_source(format!("invalid regex pattern '{}'", options.pattern), e)
        })
    }
}

impl Plugin for RegexExtract {
    fn name(&self) -> &str {
        "regex"
    }

    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    fn description(&self) -> &str {
        "Extracts facet values with named regex capture groups"
    }
}

impl ExtractionMethod for RegexExtract {
    fn validate_config(&self, config: &Value) -> Result<()> {
        let options: RegexOptions = parse_config(config)?;
        if options.pattern.is_empty() {
            return Err(FacetgenError::validation("regex method requires a 'pattern' option"));
        }
        Self::compile(&options)?;
        Ok(())
    }

    fn extract(&self, input: &str, ctx: &ExtractionContext, config: &Value) -> Result<Vec<Value>> {
        let options: RegexOptions = parse_config(config)?;
        let regex = Self::compile(&options)?;

        let content;
        let target = match options.target {
            RegexTarget::Input => input,
            RegexTarget::Content => match ctx.text_content()? {
                Some(text) => {
                    content = text;
                    content
                }
                // binary file: no text to match, not an error
                None => return Ok(vec![]),
            },
        };

        let Some(captures) = regex.captures(target) else {
            return Ok(vec![]);
        };

        let group_names: Vec<&str> = regex.capture_names().flatten().collect();

        let value = match group_names.len() {
            0 => Value::String(captures[0].to_string()),
            1 => match captures.name(group_names[0]) {
                Some(m) => Value::String(m.as_str().to_string()),
                None => return Ok(vec![]),
            },
            _ => {
                let mut map = Map::new();
                for name in group_names {
                    if let Some(m) = captures.name(name) {
                        map.insert(name.to_string(), Value::String(m.as_str().to_string()));
                    }
                }
                if map.is_empty() {
                    return Ok(vec![]);
                }
                Value::Object(map)
            }
        };

        Ok(vec![value])
    }
}
