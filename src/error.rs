//! Error types shared by the store and the connector.

use serde_json::Value;
use thiserror::Error;

/// Boxed error produced by user code (fallible selectors).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by stores, selectors and connected components.
///
/// Every error is synchronous and returned straight to the caller; nothing
/// in this crate retries or recovers.
#[derive(Debug, Error)]
pub enum Error {
    /// The initial state handed to a store or provider was not an object.
    #[error("initial state must be an object, got {found}")]
    MissingInitialState { found: &'static str },

    /// `update` was given a payload that is neither an object nor a function.
    #[error("update payload must be an object or a function, got {found}")]
    InvalidUpdatePayload { found: &'static str },

    /// A connected component was evaluated with no store in its context.
    #[error("`{component}` was rendered outside of any provider")]
    MissingProvider { component: String },

    /// A fallible selector returned an error.
    #[error("selector failed: {0}")]
    Selector(#[source] BoxError),

    /// A typed initial state could not be turned into a JSON value.
    #[error("failed to serialize initial state: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Name of the JSON kind of `value`, for error messages.
pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
