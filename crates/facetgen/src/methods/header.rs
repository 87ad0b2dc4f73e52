//! Header-field extraction method.

use crate::plugins::{parse_config, ExtractionMethod, Plugin};
use crate::types::ExtractionContext;
use crate::{FacetgenError, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};

fn default_max_lines() -> usize {
    100
}

/// Options for the `header` method.
///
/// Exactly one of the two modes must be configured:
/// - `attribute`: named field in a `key: value` / `key = value` header
///   block at the top of the file
/// - `offset` + `length`: fixed byte range decoded as UTF-8
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeaderOptions {
    /// Name of the header attribute to read.
    #[serde(default)]
    pub attribute: Option<String>,

    /// Byte offset of a fixed-position field.
    #[serde(default)]
    pub offset: Option<u64>,

    /// Byte length of a fixed-position field.
    #[serde(default)]
    pub length: Option<usize>,

    /// How many leading lines are scanned in attribute mode.
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,
}

impl HeaderOptions {
    fn validate(&self) -> Result<()> {
        match (&self.attribute, self.offset, self.length) {
            (Some(attr), None, None) => {
                if attr.is_empty() {
                    return Err(FacetgenError::validation("header 'attribute' cannot be empty"));
                }
                Ok(())
            }
            (None, Some(_), Some(length)) => {
                if length == 0 {
                    return Err(FacetgenError::validation("header field 'length' cannot be zero"));
                }
                Ok(())
            }
            (None, None, None) => Err(FacetgenError::validation(
                "header method requires either 'attribute' or 'offset' and 'length'",
            )),
            _ => Err(FacetgenError::validation(
                "header method takes either 'attribute' or 'offset'+'length', not both",
            )),
        }
    }
}

/// Header-field extraction method.
///
/// Method name: `header`.
///
/// Reads a structured field from a file's embedded header block. An absent
/// field yields no value; the orchestrator escalates that to
/// `MissingField` only when the facet is marked required.
pub struct HeaderExtract;

impl HeaderExtract {
    /// Scan a `key: value` / `key = value` header block for an attribute.
    ///
    /// Scanning stops at the first blank line or after `max_lines` lines,
    /// whichever comes first.
    fn scan_attribute(content: &str, attribute: &str, max_lines: usize) -> Option<String> {
        for line in content.lines().take(max_lines) {
            let line = line.trim();
            if line.is_empty() {
                break;
            }

            let Some((key, value)) = line.split_once(':').or_else(|| line.split_once('=')) else {
                continue;
            };

            if key.trim() == attribute {
                return Some(value.trim().to_string());
            }
        }
        None
    }

    /// Read a fixed byte range, decoded as UTF-8 and trimmed of NULs,
    /// padding, and surrounding whitespace.
    fn read_field_at(ctx: &ExtractionContext, offset: u64, length: usize) -> Result<Option<String>> {
        let mut file = File::open(ctx.path())?;
        let file_len = file.metadata()?.len();
        if offset >= file_len {
            return Ok(None);
        }

        file.seek(SeekFrom::Start(offset))?;
        // a single read may come back short; read_to_end stops only at EOF
        let mut buf = Vec::with_capacity(length);
        file.take(length as u64).read_to_end(&mut buf)?;

        let Ok(text) = String::from_utf8(buf) else {
            return Ok(None);
        };
        let trimmed = text.trim_matches(|c: char| c == '\0' || c.is_whitespace());
        if trimmed.is_empty() {
            return Ok(None);
        }
        Ok(Some(trimmed.to_string()))
    }
}

impl Plugin for HeaderExtract {
    fn name(&self) -> &str {
        "header"
    }

    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    fn description(&self) -> &str {
        "Reads named attributes or fixed-offset fields from a file header block"
    }
}

impl ExtractionMethod for HeaderExtract {
    fn validate_config(&self, config: &Value) -> Result<()> {
        let options: HeaderOptions = parse_config(config)?;
        options.validate()
    }

    fn extract(&self, _input: &str, ctx: &ExtractionContext, config: &Value) -> Result<Vec<Value>> {
        let options: HeaderOptions = parse_config(config)?;
        options.validate()?;

        let field = if let Some(ref attribute) = options.attribute {
            match ctx.text_content()? {
                Some(content) => Self::scan_attribute(content, attribute, options.max_lines),
                None => None,
            }
        } else {
            // validate() guarantees both are present in this mode
            let offset = options.offset.unwrap_or_default();
            let length = options.length.unwrap_or_default();
            Self::read_field_at(ctx, offset, length)?
        };

        Ok(field.into_iter().map(Value::String).collect())
    }
}
