//! Shared error types for the equity allocation system

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Invalid UUID: {input}")]
    InvalidUuid { input: String },

    #[error("Invalid identifier: {input:?}")]
    InvalidIdentifier { input: String },
}

pub type SharedResult<T> = Result<T, SharedError>;
