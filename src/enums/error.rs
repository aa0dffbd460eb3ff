//! # Error Module - Custom *nestarrow* Error Type
//!
//! Defines the unified, recoverable error type for the crate.
//!
//! ## Two tiers
//! - Failures that depend on runtime data (a dictionary index out of range, a
//!   buffer that is too short for its declared length, ...) are returned as
//!   [`ArrayError`] values and never leave a partially built array behind.
//! - Programmer misuse (duplicate struct field names, releasing a buffer that is
//!   already freed, reading past the end of an array) panics immediately with a
//!   descriptive message.

use thiserror::Error;

use crate::enums::datatype::TypeId;

/// Crate-wide result alias.
pub type ArrayResult<T> = Result<T, ArrayError>;

/// Catch all error type for `nestarrow`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArrayError {
    /// The physical type of an index array differs from the index type declared
    /// by the dictionary type it is paired with.
    #[error("Type mismatch: dictionary declares index type '{expected}', indices are '{found}'.")]
    TypeMismatch { expected: TypeId, found: TypeId },

    /// Dictionary indices must be one of the signed 8/16/32/64-bit integer arrays.
    #[error("Unsupported dictionary index type '{found}': expected int8, int16, int32 or int64.")]
    UnsupportedIndexType { found: String },

    /// A non-null dictionary index falls outside `[0, len)`.
    #[error("Dictionary index out of bounds at position {position}: {value} is not in [0, {len}).")]
    IndexOutOfBounds { position: usize, value: i64, len: usize },

    /// Caller supplied buffers or children that break the layout contract.
    #[error("Invalid array data: {message}")]
    InvalidData { message: String },

    /// A schema could not be constructed, e.g. due to duplicate field names.
    #[error("Invalid schema: {message}")]
    InvalidSchema { message: String },

    /// An operation was called with arguments that are inconsistent with the
    /// current state of the receiver.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl ArrayError {
    #[inline]
    pub(crate) fn invalid_data(message: impl Into<String>) -> Self {
        ArrayError::InvalidData {
            message: message.into(),
        }
    }
}
