//! The module contains the errors the engine can return.
//!
//! Domain errors are detected before anything is written:
//!
//! - [`InvalidTransactionType`] the transaction type is not `income`/`outcome`.
//! - [`InsufficientBalance`] an outcome would exceed the current net balance.
//! - [`FileRead`] an import source cannot be opened or streamed.
//!
//! Storage failures are carried unchanged in [`Database`].
//!
//!  [`InvalidTransactionType`]: EngineError::InvalidTransactionType
//!  [`InsufficientBalance`]: EngineError::InsufficientBalance
//!  [`FileRead`]: EngineError::FileRead
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid transaction type: {0}")]
    InvalidTransactionType(String),
    #[error("Insufficient balance: {0}")]
    InsufficientBalance(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Cannot read file: {0}")]
    FileRead(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidTransactionType(a), Self::InvalidTransactionType(b)) => a == b,
            (Self::InsufficientBalance(a), Self::InsufficientBalance(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidName(a), Self::InvalidName(b)) => a == b,
            (Self::FileRead(a), Self::FileRead(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
