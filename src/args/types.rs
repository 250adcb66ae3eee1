use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::num::{NonZeroU64, NonZeroUsize};

use crate::error::ValidationError;

use super::defaults::{DEFAULT_COMPONENT_MAX_NS, DEFAULT_COMPONENT_MIN_NS};

#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

/// A registered pipeline stage and the range its simulated cost is drawn
/// from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSpec {
    pub name: String,
    pub min_ns: u64,
    pub max_ns: u64,
}

impl ComponentSpec {
    /// Builds a component with an explicit cost range.
    ///
    /// # Errors
    ///
    /// Returns an error when the name is empty or `min_ns > max_ns`.
    pub fn new(name: &str, min_ns: u64, max_ns: u64) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::ComponentNameEmpty);
        }
        if min_ns > max_ns {
            return Err(ValidationError::InvalidCostRange {
                name: name.to_owned(),
                min_ns,
                max_ns,
            });
        }
        Ok(Self {
            name: name.to_owned(),
            min_ns,
            max_ns,
        })
    }

    /// Builds a component with the default cost range.
    ///
    /// # Errors
    ///
    /// Returns an error when the name is empty.
    pub fn with_default_cost(name: &str) -> Result<Self, ValidationError> {
        Self::new(name, DEFAULT_COMPONENT_MIN_NS, DEFAULT_COMPONENT_MAX_NS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositiveU64(NonZeroU64);

impl PositiveU64 {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl TryFrom<u64> for PositiveU64 {
    type Error = ValidationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        NonZeroU64::new(value)
            .map(PositiveU64)
            .ok_or(ValidationError::ValueTooSmall { min: 1 })
    }
}

impl std::str::FromStr for PositiveU64 {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u64 = s
            .trim()
            .parse()
            .map_err(|err| ValidationError::InvalidNumber { source: err })?;
        PositiveU64::try_from(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositiveUsize(NonZeroUsize);

impl PositiveUsize {
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl TryFrom<usize> for PositiveUsize {
    type Error = ValidationError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        NonZeroUsize::new(value)
            .map(PositiveUsize)
            .ok_or(ValidationError::ValueTooSmall { min: 1 })
    }
}

impl std::str::FromStr for PositiveUsize {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: usize = s
            .trim()
            .parse()
            .map_err(|err| ValidationError::InvalidNumber { source: err })?;
        PositiveUsize::try_from(value)
    }
}
