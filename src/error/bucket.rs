use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BucketError {
    #[error("Component '{id}' is registered more than once.")]
    DuplicateComponent { id: String },
    #[error("Unknown component '{id}'.")]
    UnknownComponent { id: String },
}
