//! Traits that storage backends must implement to drive the Snapadeal engine.
//!
//! The APIs in [`crate::api`] are generic over these traits, so the concrete store (SQLite in this repo) is always
//! injected rather than reached through a global handle. Tests substitute fakes the same way.

mod data_objects;
mod deal_management;
mod marketplace_database;
mod notification_management;
mod payment_gateway;
mod transaction_management;
mod user_management;

use thiserror::Error;

pub use data_objects::{BroadcastAudience, SettlementOutcome, UpdateProfileRequest};
pub use deal_management::DealManagement;
pub use marketplace_database::MarketplaceDatabase;
pub use notification_management::NotificationManagement;
pub use payment_gateway::{
    CustomerInfo,
    GatewayError,
    PaymentGateway,
    PaymentMeta,
    PaymentSessionRequest,
    UnconfiguredGateway,
};
pub use transaction_management::TransactionManagement;
pub use user_management::UserManagement;

/// Errors raised at the storage boundary. Domain-level APIs translate these into their own error vocabulary.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Internal database error: {0}")]
    DatabaseError(String),
    #[error("A user with this email or phone already exists")]
    DuplicateUser,
    #[error("The requested user does not exist")]
    UserNotFound,
    #[error("The requested deal {0} does not exist")]
    DealNotFound(i64),
    #[error("The requested transaction {0} does not exist")]
    TransactionNotFound(i64),
    #[error("The requested category {0} does not exist")]
    CategoryNotFound(i64),
}

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref de) = e {
            if de.code().as_deref() == Some("2067") || de.code().as_deref() == Some("1555") {
                // SQLITE_CONSTRAINT_UNIQUE / SQLITE_CONSTRAINT_PRIMARYKEY
                return StorageError::DuplicateUser;
            }
        }
        StorageError::DatabaseError(e.to_string())
    }
}
