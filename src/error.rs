//! Error types shared across the crate.
//!
//! Errors are `anyhow::Error` throughout. Command handlers tag the errors they return with an
//! `ErrorType` so the binary can report what kind of failure ended the program.

use serde::{Deserialize, Serialize};

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// The broad category of a failure that is reported to the user.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The budget home or its config file is missing or invalid.
    Config,
    /// Reading or writing durable storage failed.
    Storage,
    /// The PIN did not match or no family is registered.
    Auth,
    /// The user supplied a value that cannot be accepted.
    Input,
    /// A backup file could not be imported.
    Import,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

/// Attaches an `ErrorType` to the error of a `Result` as its outermost context.
pub(crate) trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T> IntoResult<T> for Result<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| e.context(error_type))
    }
}

/// Returns the `ErrorType` that was attached to `e` by `pub_result`, if any.
pub fn error_type(e: &Error) -> Option<ErrorType> {
    e.downcast_ref::<ErrorType>().copied()
}
