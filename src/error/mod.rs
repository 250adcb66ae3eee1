mod app;
mod bucket;
mod config;
mod sink;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use bucket::BucketError;
pub use config::ConfigError;
pub use sink::SinkError;
pub use validation::ValidationError;
