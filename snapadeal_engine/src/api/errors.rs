use thiserror::Error;

use crate::{
    helpers::{PasswordHashError, SessionTokenError},
    traits::StorageError,
};

#[derive(Debug, Clone, Error)]
pub enum AuthApiError {
    #[error("A user with this email or phone already exists")]
    UserAlreadyExists,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Unknown identifier and wrong password collapse into this one variant so that login failures never reveal
    /// whether an account exists.
    #[error("Invalid email/phone or password")]
    InvalidCredentials,
    /// Wrong, expired and missing one-time credentials are indistinguishable to the caller.
    #[error("The code or token is invalid or has expired")]
    InvalidOrExpired,
    #[error("The account has not been verified yet")]
    NotVerified,
    #[error("The account is not active")]
    NotActive,
    #[error("The account is already verified")]
    AlreadyVerified,
    #[error("User not found")]
    UserNotFound,
    #[error("{0}")]
    Password(#[from] PasswordHashError),
    #[error("{0}")]
    Token(#[from] SessionTokenError),
    #[error("Storage error: {0}")]
    Database(String),
}

impl From<StorageError> for AuthApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::DuplicateUser => Self::UserAlreadyExists,
            StorageError::UserNotFound => Self::UserNotFound,
            e => Self::Database(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum DealApiError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Category {0} does not exist")]
    CategoryNotFound(i64),
    /// Covers both a missing deal and a deal owned by another merchant. Ownership scoping happens in the store
    /// query, so callers cannot probe for other merchants' deal ids.
    #[error("Deal not found")]
    DealNotFound,
    #[error("You are not allowed to perform this action")]
    Forbidden,
    #[error("User not found")]
    UserNotFound,
    #[error("Storage error: {0}")]
    Database(String),
}

impl From<StorageError> for DealApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::DealNotFound(_) => Self::DealNotFound,
            StorageError::UserNotFound => Self::UserNotFound,
            StorageError::CategoryNotFound(id) => Self::CategoryNotFound(id),
            e => Self::Database(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum PurchaseApiError {
    #[error("Deal not found")]
    DealNotFound,
    #[error("This deal is not available for purchase")]
    DealNotAvailable,
    #[error("This deal has expired")]
    DealExpired,
    #[error("Only {remaining} units are left")]
    InsufficientInventory { remaining: i64 },
    #[error("Quantity must be at least 1")]
    InvalidQuantity,
    #[error("Transaction {0} not found")]
    TransactionNotFound(i64),
    #[error("User not found")]
    UserNotFound,
    #[error("Storage error: {0}")]
    Database(String),
}

impl From<StorageError> for PurchaseApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::DealNotFound(_) => Self::DealNotFound,
            StorageError::TransactionNotFound(id) => Self::TransactionNotFound(id),
            StorageError::UserNotFound => Self::UserNotFound,
            e => Self::Database(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum NotificationApiError {
    #[error("Notification not found")]
    NotificationNotFound,
    #[error("Storage error: {0}")]
    Database(String),
}

impl From<StorageError> for NotificationApiError {
    fn from(e: StorageError) -> Self {
        Self::Database(e.to_string())
    }
}
