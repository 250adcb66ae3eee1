//! CLI argument types and parsing helpers.
mod cli;
pub(crate) mod defaults;
pub(crate) mod parsers;
mod types;

#[cfg(test)]
mod tests;

pub use cli::PerfmonArgs;
pub use types::{ComponentSpec, OutputFormat, PositiveU64, PositiveUsize};

pub(crate) use parsers::{parse_component, parse_duration_value};
