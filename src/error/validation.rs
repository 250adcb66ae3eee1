use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Duration must be > 0.")]
    DurationZero,
    #[error("Value must be >= {min}.")]
    ValueTooSmall { min: u64 },
    #[error("Invalid value: {source}")]
    InvalidNumber {
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Invalid boolean '{value}'. Expected true/false, yes/no, on/off, or 1/0.")]
    InvalidBoolean { value: String },
    #[error("Component name must not be empty.")]
    ComponentNameEmpty,
    #[error("Invalid component '{value}'. Expected 'name' or 'name=min_ns-max_ns'.")]
    InvalidComponentFormat { value: String },
    #[error("Invalid cost in component '{value}': {source}")]
    InvalidComponentCost {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Invalid cost range for component '{name}': min {min_ns} ns exceeds max {max_ns} ns.")]
    InvalidCostRange {
        name: String,
        min_ns: u64,
        max_ns: u64,
    },
    #[error("At least one component is required (set --component or provide in config).")]
    MissingComponents,
    #[error("Run finished with runtime errors.")]
    RuntimeErrors,
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
