//! Built-in post-processors.
//!
//! Post-processors transform an already-extracted facet value before it is
//! merged into the item record. They run in the order declared in the
//! facet definition, each consuming the previous one's output.

use crate::plugins::{parse_config, value_type_name, Plugin, PostProcessor, ValueShape};
use crate::{FacetgenError, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

/// Options for the `facet_map` processor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FacetMapOptions {
    /// Raw term to canonical term.
    #[serde(default)]
    pub term_map: IndexMap<String, String>,

    /// When true, a term absent from the map fails the facet instead of
    /// passing through unchanged.
    #[serde(default)]
    pub strict: bool,
}

/// Facet term mapping.
///
/// Processor name: `facet_map`.
///
/// Looks up the raw value in a configured mapping table of raw term to
/// canonical term. A term absent from the table passes through unchanged
/// by default; set `strict: true` to fail the facet instead, when silently
/// keeping raw vocabulary is worse than losing the facet.
pub struct FacetMapProcessor;

impl Plugin for FacetMapProcessor {
    fn name(&self) -> &str {
        "facet_map"
    }

    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    fn description(&self) -> &str {
        "Remaps raw facet terms to canonical vocabulary"
    }
}

impl PostProcessor for FacetMapProcessor {
    fn validate_config(&self, config: &Value) -> Result<()> {
        let _: FacetMapOptions = parse_config(config)?;
        Ok(())
    }

    fn input_shape(&self) -> ValueShape {
        ValueShape::Text
    }

    fn output_shape(&self) -> ValueShape {
        ValueShape::Text
    }

    fn apply(&self, value: Value, config: &Value) -> Result<Value> {
        let options: FacetMapOptions = parse_config(config)?;

        let Value::String(raw) = value else {
            return Err(FacetgenError::validation(format!(
                "facet_map expects a string value, got {}",
                value_type_name(&value)
            )));
        };

        match options.term_map.get(&raw) {
            Some(canonical) => Ok(Value::String(canonical.clone())),
            None if options.strict => Err(FacetgenError::validation(format!(
                "term '{}' not present in term map",
                raw
            ))),
            None => Ok(Value::String(raw)),
        }
    }
}

/// Options for the `iso_date` processor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IsoDateOptions {
    /// When true, hour, minute, and second must all be present. The
    /// default lenient mode substitutes `00` for each missing time
    /// component; year, month, and day are always required.
    #[serde(default)]
    pub strict: bool,
}

static DIGIT_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("digit-run pattern is valid"));

/// Timestamp normalization.
///
/// Processor name: `iso_date`.
///
/// Renders a raw timestamp as `YYYY-MM-DDTHH:MM:SS`. Accepts either a
/// string, whose digit runs are taken in order as year, month, day, hour,
/// minute, second (runs past the sixth, such as fractional seconds, are
/// ignored), or a mapping with `year`/`month`/`day`/`hour`/`minute`/
/// `second` entries holding integers or digit strings.
///
/// Idempotent over its own output: normalizing an already-normalized
/// timestamp yields the identical string.
pub struct IsoDateProcessor;

impl IsoDateProcessor {
    fn coerce(name: &str, raw: &Value) -> Result<u32> {
        let parsed = match raw {
            Value::String(s) => s.trim().parse::<u32>().ok(),
            Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
            _ => None,
        };
        parsed.ok_or_else(|| {
            FacetgenError::malformed_timestamp(format!("component '{}' is not coercible to an integer: {}", name, raw))
        })
    }

    /// Pull `[year, month, day]` and any time components out of the value.
    fn components(value: &Value, strict: bool) -> Result<([u32; 3], [Option<u32>; 3])> {
        match value {
            Value::String(text) => {
                let runs: Vec<u32> = DIGIT_RUNS
                    .find_iter(text)
                    .map(|m| {
                        m.as_str().parse::<u32>().map_err(|e| {
                            FacetgenError::malformed_timestamp(format!(
                                "component '{}' is not coercible to an integer: {}",
                                m.as_str(),
                                e
                            ))
                        })
                    })
                    .collect::<Result<_>>()?;

                if runs.len() < 3 {
                    return Err(FacetgenError::malformed_timestamp(format!(
                        "'{}' does not carry year, month, and day components",
                        text
                    )));
                }
                if strict && runs.len() < 6 {
                    return Err(FacetgenError::malformed_timestamp(format!(
                        "'{}' is missing time components required in strict mode",
                        text
                    )));
                }

                let date = [runs[0], runs[1], runs[2]];
                let time = [runs.get(3).copied(), runs.get(4).copied(), runs.get(5).copied()];
                Ok((date, time))
            }
            Value::Object(map) => {
                let mut date = [0u32; 3];
                for (slot, name) in date.iter_mut().zip(["year", "month", "day"]) {
                    let raw = map.get(name).ok_or_else(|| {
                        FacetgenError::malformed_timestamp(format!("required component '{}' is missing", name))
                    })?;
                    *slot = Self::coerce(name, raw)?;
                }

                let mut time = [None; 3];
                for (slot, name) in time.iter_mut().zip(["hour", "minute", "second"]) {
                    match map.get(name) {
                        Some(raw) => *slot = Some(Self::coerce(name, raw)?),
                        None if strict => {
                            return Err(FacetgenError::malformed_timestamp(format!(
                                "component '{}' is required in strict mode",
                                name
                            )));
                        }
                        None => {}
                    }
                }
                Ok((date, time))
            }
            other => Err(FacetgenError::malformed_timestamp(format!(
                "expected a timestamp string or component mapping, got {}",
                value_type_name(other)
            ))),
        }
    }
}

impl Plugin for IsoDateProcessor {
    fn name(&self) -> &str {
        "iso_date"
    }

    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    fn description(&self) -> &str {
        "Normalizes timestamps to YYYY-MM-DDTHH:MM:SS"
    }
}

impl PostProcessor for IsoDateProcessor {
    fn validate_config(&self, config: &Value) -> Result<()> {
        let _: IsoDateOptions = parse_config(config)?;
        Ok(())
    }

    fn output_shape(&self) -> ValueShape {
        ValueShape::Text
    }

    fn apply(&self, value: Value, config: &Value) -> Result<Value> {
        let options: IsoDateOptions = parse_config(config)?;

        let ([year, month, day], [hour, minute, second]) = Self::components(&value, options.strict)?;

        let year = i32::try_from(year)
            .map_err(|_| FacetgenError::malformed_timestamp(format!("year '{}' out of range", year)))?;
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            FacetgenError::malformed_timestamp(format!("{:04}-{:02}-{:02} is not a calendar date", year, month, day))
        })?;

        let (hour, minute, second) = (
            hour.unwrap_or_default(),
            minute.unwrap_or_default(),
            second.unwrap_or_default(),
        );
        let time = NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(|| {
            FacetgenError::malformed_timestamp(format!("{:02}:{:02}:{:02} is not a time of day", hour, minute, second))
        })?;

        let rendered = NaiveDateTime::new(date, time).format("%Y-%m-%dT%H:%M:%S").to_string();
        Ok(Value::String(rendered))
    }
}

fn default_bbox_keys() -> Vec<String> {
    ["west", "south", "east", "north"].map(String::from).to_vec()
}

/// Options for the `bbox` processor.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BboxOptions {
    /// Coordinate keys, in output order.
    #[serde(default = "default_bbox_keys")]
    pub key_list: Vec<String>,
}

impl Default for BboxOptions {
    fn default() -> Self {
        Self {
            key_list: default_bbox_keys(),
        }
    }
}

/// Bounding-box assembly.
///
/// Processor name: `bbox`.
///
/// Collects the coordinates named by `key_list` (default
/// `west, south, east, north`) from a component mapping into an ordered
/// array of numbers.
pub struct BboxProcessor;

impl Plugin for BboxProcessor {
    fn name(&self) -> &str {
        "bbox"
    }

    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    fn description(&self) -> &str {
        "Assembles an ordered bounding box from coordinate components"
    }
}

impl PostProcessor for BboxProcessor {
    fn validate_config(&self, config: &Value) -> Result<()> {
        let options: BboxOptions = parse_config(config)?;
        if options.key_list.is_empty() {
            return Err(FacetgenError::validation("bbox 'key_list' cannot be empty"));
        }
        Ok(())
    }

    fn input_shape(&self) -> ValueShape {
        ValueShape::Mapping
    }

    fn output_shape(&self) -> ValueShape {
        ValueShape::List
    }

    fn apply(&self, value: Value, config: &Value) -> Result<Value> {
        let options: BboxOptions = parse_config(config)?;

        let Value::Object(map) = value else {
            return Err(FacetgenError::validation(format!(
                "bbox expects a coordinate mapping, got {}",
                value_type_name(&value)
            )));
        };

        let mut coords = Vec::with_capacity(options.key_list.len());
        for key in &options.key_list {
            let raw = map
                .get(key)
                .ok_or_else(|| FacetgenError::MissingField { field: key.clone() })?;

            let parsed = match raw {
                Value::String(s) => s.trim().parse::<f64>().ok(),
                Value::Number(n) => n.as_f64(),
                _ => None,
            };
            let number = parsed
                .and_then(serde_json::Number::from_f64)
                .ok_or_else(|| FacetgenError::validation(format!("coordinate '{}' is not numeric: {}", key, raw)))?;
            coords.push(Value::Number(number));
        }

        Ok(Value::Array(coords))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_facet_map_hit() {
        let config = json!({"term_map": {"raw_sensor_1": "Sensor A"}});
        let output = FacetMapProcessor.apply(json!("raw_sensor_1"), &config).unwrap();
        assert_eq!(output, json!("Sensor A"));
    }

    #[test]
    fn test_facet_map_miss_passes_through() {
        let config = json!({"term_map": {"raw_sensor_1": "Sensor A"}});
        let output = FacetMapProcessor.apply(json!("raw_sensor_9"), &config).unwrap();
        assert_eq!(output, json!("raw_sensor_9"));
    }

    #[test]
    fn test_facet_map_miss_strict_fails() {
        let config = json!({"term_map": {"raw_sensor_1": "Sensor A"}, "strict": true});
        let result = FacetMapProcessor.apply(json!("raw_sensor_9"), &config);
        assert!(matches!(result, Err(FacetgenError::Validation { .. })));
    }

    #[test]
    fn test_facet_map_rejects_non_string() {
        let result = FacetMapProcessor.apply(json!({"a": 1}), &Value::Null);
        assert!(matches!(result, Err(FacetgenError::Validation { .. })));
    }

    #[test]
    fn test_facet_map_error_names_json_type() {
        let err = FacetMapProcessor.apply(json!(42), &Value::Null).unwrap_err();
        assert!(err.to_string().contains("got number"));

        let err = IsoDateProcessor.apply(json!(true), &Value::Null).unwrap_err();
        assert!(err.to_string().contains("got boolean"));

        let err = BboxProcessor.apply(json!(3.5), &Value::Null).unwrap_err();
        assert!(err.to_string().contains("got number"));
    }

    #[test]
    fn test_iso_date_from_string() {
        let output = IsoDateProcessor.apply(json!("2005-01-15T10-30-00"), &Value::Null).unwrap();
        assert_eq!(output, json!("2005-01-15T10:30:00"));
    }

    #[test]
    fn test_iso_date_idempotent() {
        let normalized = json!("2005-01-15T10:30:00");
        let output = IsoDateProcessor.apply(normalized.clone(), &Value::Null).unwrap();
        assert_eq!(output, normalized);
    }

    #[test]
    fn test_iso_date_lenient_defaults_time() {
        let output = IsoDateProcessor.apply(json!("2021-05-02"), &Value::Null).unwrap();
        assert_eq!(output, json!("2021-05-02T00:00:00"));
    }

    #[test]
    fn test_iso_date_ignores_fractional_seconds() {
        let output = IsoDateProcessor
            .apply(json!("2021-05-02 12:00:30.125"), &Value::Null)
            .unwrap();
        assert_eq!(output, json!("2021-05-02T12:00:30"));
    }

    #[test]
    fn test_iso_date_strict_requires_time() {
        let config = json!({"strict": true});
        let result = IsoDateProcessor.apply(json!("2021-05-02"), &config);
        assert!(matches!(result, Err(FacetgenError::MalformedTimestamp { .. })));

        let output = IsoDateProcessor.apply(json!("2021-05-02 12:00:30"), &config).unwrap();
        assert_eq!(output, json!("2021-05-02T12:00:30"));
    }

    #[test]
    fn test_iso_date_from_component_mapping() {
        let value = json!({"year": "2005", "month": 1, "day": 15, "hour": 10, "minute": "30"});
        let output = IsoDateProcessor.apply(value, &Value::Null).unwrap();
        assert_eq!(output, json!("2005-01-15T10:30:00"));
    }

    #[test]
    fn test_iso_date_mapping_missing_day_fails() {
        let value = json!({"year": 2005, "month": 1});
        let result = IsoDateProcessor.apply(value, &Value::Null);
        assert!(matches!(result, Err(FacetgenError::MalformedTimestamp { .. })));
    }

    #[test]
    fn test_iso_date_uncoercible_component_fails() {
        let value = json!({"year": "two thousand", "month": 1, "day": 15});
        let result = IsoDateProcessor.apply(value, &Value::Null);
        assert!(matches!(result, Err(FacetgenError::MalformedTimestamp { .. })));
    }

    #[test]
    fn test_iso_date_invalid_calendar_date_fails() {
        let result = IsoDateProcessor.apply(json!("2021-13-40"), &Value::Null);
        assert!(matches!(result, Err(FacetgenError::MalformedTimestamp { .. })));
    }

    #[test]
    fn test_iso_date_too_few_components_fails() {
        let result = IsoDateProcessor.apply(json!("2021-05"), &Value::Null);
        assert!(matches!(result, Err(FacetgenError::MalformedTimestamp { .. })));
    }

    #[test]
    fn test_bbox_default_order() {
        let value = json!({"north": "42.0", "south": "38.0", "east": "-28.0", "west": "-37.0"});
        let output = BboxProcessor.apply(value, &Value::Null).unwrap();
        assert_eq!(output, json!([-37.0, 38.0, -28.0, 42.0]));
    }

    #[test]
    fn test_bbox_custom_key_list() {
        let config = json!({"key_list": ["lon_min", "lat_min"]});
        let value = json!({"lon_min": -37.0, "lat_min": 38.0});
        let output = BboxProcessor.apply(value, &config).unwrap();
        assert_eq!(output, json!([-37.0, 38.0]));
    }

    #[test]
    fn test_bbox_missing_key_fails() {
        let value = json!({"north": 42.0});
        let result = BboxProcessor.apply(value, &Value::Null);
        assert!(matches!(result, Err(FacetgenError::MissingField { .. })));
    }

    #[test]
    fn test_bbox_non_numeric_coordinate_fails() {
        let value = json!({"west": "far away", "south": 38.0, "east": -28.0, "north": 42.0});
        let result = BboxProcessor.apply(value, &Value::Null);
        assert!(matches!(result, Err(FacetgenError::Validation { .. })));
    }

    #[test]
    fn test_bbox_rejects_non_mapping() {
        let result = BboxProcessor.apply(json!("not a mapping"), &Value::Null);
        assert!(matches!(result, Err(FacetgenError::Validation { .. })));
    }

    #[test]
    fn test_bbox_validate_config_rejects_empty_key_list() {
        let result = BboxProcessor.validate_config(&json!({"key_list": []}));
        assert!(matches!(result, Err(FacetgenError::Validation { .. })));
    }
}
