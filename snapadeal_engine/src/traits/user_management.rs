use chrono::{DateTime, Utc};

use crate::{
    db_types::{NewUser, Role, User, UserStatus},
    traits::{StorageError, UpdateProfileRequest},
};

/// Storage operations backing the identity and credential manager.
///
/// The one-time credential operations (`consume_otp`, `consume_reset_token`) are verify-and-clear in a single guarded
/// update, so two concurrent verification attempts can never both succeed on the same code.
#[allow(async_fn_in_trait)]
pub trait UserManagement {
    /// Insert a new user in `Pending`/unverified state. The password hash must already be computed; raw passwords
    /// never reach the store. Fails with [`StorageError::DuplicateUser`] when the email or phone is taken.
    async fn insert_user(&self, user: &NewUser, password_hash: &str) -> Result<User, StorageError>;

    async fn fetch_user_by_id(&self, id: i64) -> Result<Option<User>, StorageError>;

    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError>;

    async fn fetch_user_by_phone(&self, phone: &str) -> Result<Option<User>, StorageError>;

    /// Store a fresh OTP for the user, overwriting any prior unconsumed code.
    async fn set_otp(&self, user_id: i64, code: &str, expires_at: DateTime<Utc>) -> Result<(), StorageError>;

    /// Atomically verify and clear the user's OTP. On success the user becomes `Active` and verified, and the
    /// updated record is returned. Returns `None` when no code is set, the code does not match, or it has expired;
    /// callers cannot (and must not) distinguish these cases.
    async fn consume_otp(&self, user_id: i64, code: &str, now: DateTime<Utc>) -> Result<Option<User>, StorageError>;

    /// Store a fresh password-reset token for the user, overwriting any prior token.
    async fn set_reset_token(&self, user_id: i64, token: &str, expires_at: DateTime<Utc>)
        -> Result<(), StorageError>;

    /// Atomically verify and clear a reset token, installing the new password hash in the same update. Returns
    /// `None` for an unknown, consumed or expired token.
    async fn consume_reset_token(
        &self,
        token: &str,
        new_password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, StorageError>;

    async fn update_last_login(&self, user_id: i64, at: DateTime<Utc>) -> Result<(), StorageError>;

    async fn update_profile(&self, user_id: i64, update: &UpdateProfileRequest) -> Result<User, StorageError>;

    async fn update_user_status(&self, user_id: i64, status: UserStatus) -> Result<User, StorageError>;

    /// All user ids, optionally restricted to one role. Used for broadcast fan-out.
    async fn fetch_user_ids(&self, role: Option<Role>) -> Result<Vec<i64>, StorageError>;
}
