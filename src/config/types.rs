use std::time::Duration;

use serde::Deserialize;

use crate::args::{OutputFormat, parse_duration_value};
use crate::error::ValidationError;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub components: Option<Vec<ComponentConfig>>,
    #[serde(alias = "satisfied_threshold_ns")]
    pub threshold_ns: Option<u64>,
    #[serde(alias = "report_interval")]
    pub interval: Option<DurationValue>,
    pub bucket_window: Option<DurationValue>,
    pub duration: Option<DurationValue>,
    pub workers: Option<usize>,
    pub packets_per_tick: Option<usize>,
    pub tick_interval: Option<DurationValue>,
    pub history_max: Option<usize>,
    pub output: Option<String>,
    pub output_format: Option<OutputFormat>,
    pub verbose: Option<bool>,
    pub no_color: Option<bool>,
}

/// A component entry: either a bare name or a table with a cost range.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ComponentConfig {
    Name(String),
    Detailed {
        name: String,
        min_ns: Option<u64>,
        max_ns: Option<u64>,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(0) => Err(ValidationError::DurationZero),
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => parse_duration_value(text),
        }
    }
}
