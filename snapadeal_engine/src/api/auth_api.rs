use std::fmt::Debug;

use chrono::Utc;
use log::*;
use snap_common::Secret;

use crate::{
    api::errors::AuthApiError,
    db_types::{NewUser, User, UserStatus},
    helpers::{
        create_password_hash,
        generate_otp,
        generate_reset_token,
        issue_session_token,
        normalize_phone,
        otp_validity,
        reset_token_validity,
        validate_session_token,
        verify_password,
        SessionClaims,
    },
    traits::{UpdateProfileRequest, UserManagement},
};

const MIN_PASSWORD_LENGTH: usize = 6;

/// `AuthApi` handles registration, verification, login and credential recovery.
///
/// It never stores or logs raw secrets: passwords are hashed with Argon2 before they reach the store, and one-time
/// codes are returned to the caller so that an external notifier can deliver them.
pub struct AuthApi<B> {
    db: B,
    jwt_secret: Secret<String>,
}

impl<B> Debug for AuthApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthApi")
    }
}

impl<B> AuthApi<B> {
    pub fn new(db: B, jwt_secret: Secret<String>) -> Self {
        Self { db, jwt_secret }
    }
}

impl<B> AuthApi<B>
where B: UserManagement
{
    /// Register a new user. The account starts out `Pending` and unverified, with a fresh OTP issued. The code is
    /// returned alongside the user record so the caller can deliver it; it is never logged.
    pub async fn register(&self, mut user: NewUser) -> Result<(User, String), AuthApiError> {
        validate_registration(&user)?;
        user.phone = normalize_phone(&user.phone);
        let hash = create_password_hash(&user.password)?;
        let user = self.db.insert_user(&user, &hash).await?;
        let code = generate_otp();
        self.db.set_otp(user.id, &code, Utc::now() + otp_validity()).await?;
        debug!("🔑️ New {} account #{} registered ({})", user.role, user.id, user.email);
        Ok((user, code))
    }

    /// Issue a fresh verification code for an unverified account, replacing any earlier code.
    pub async fn issue_otp(&self, email: &str) -> Result<String, AuthApiError> {
        let user = self.db.fetch_user_by_email(email).await?.ok_or(AuthApiError::UserNotFound)?;
        if user.is_verified {
            return Err(AuthApiError::AlreadyVerified);
        }
        let code = generate_otp();
        self.db.set_otp(user.id, &code, Utc::now() + otp_validity()).await?;
        debug!("🔑️ Verification code re-issued for account #{}", user.id);
        Ok(code)
    }

    /// Verify an account with its one-time code. The consume is a single guarded update, so a code can never be
    /// used twice. On success the account becomes active and a session token is returned.
    pub async fn verify_otp(&self, email: &str, code: &str) -> Result<(User, String), AuthApiError> {
        let user = self.db.fetch_user_by_email(email).await?.ok_or(AuthApiError::UserNotFound)?;
        let user = self.db.consume_otp(user.id, code, Utc::now()).await?.ok_or(AuthApiError::InvalidOrExpired)?;
        let token = issue_session_token(user.id, user.role, self.jwt_secret.reveal())?;
        info!("🔑️ Account #{} verified", user.id);
        Ok((user, token))
    }

    /// Start a password reset. Returns the reset token for delivery, or `None` when the email is unknown. The
    /// `None` case is deliberately not an error, so responses do not reveal which emails have accounts.
    pub async fn request_password_reset(&self, email: &str) -> Result<Option<String>, AuthApiError> {
        let Some(user) = self.db.fetch_user_by_email(email).await? else {
            debug!("🔑️ Password reset requested for an unknown email");
            return Ok(None);
        };
        let token = generate_reset_token();
        self.db.set_reset_token(user.id, &token, Utc::now() + reset_token_validity()).await?;
        debug!("🔑️ Password reset token issued for account #{}", user.id);
        Ok(Some(token))
    }

    /// Complete a password reset. The token is consumed and the new hash installed in one guarded update, so a
    /// token can never be redeemed twice.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<User, AuthApiError> {
        if new_password.len() < MIN_PASSWORD_LENGTH {
            return Err(AuthApiError::InvalidInput(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }
        let hash = create_password_hash(new_password)?;
        let user = self
            .db
            .consume_reset_token(token, &hash, Utc::now())
            .await?
            .ok_or(AuthApiError::InvalidOrExpired)?;
        info!("🔑️ Password reset completed for account #{}", user.id);
        Ok(user)
    }

    /// Log a user in with their email or phone number. An identifier containing `@` is treated as an email,
    /// anything else as a phone number.
    pub async fn authenticate(&self, identifier: &str, password: &str) -> Result<(User, String), AuthApiError> {
        let user = if identifier.contains('@') {
            self.db.fetch_user_by_email(identifier).await?
        } else {
            self.db.fetch_user_by_phone(&normalize_phone(identifier)).await?
        };
        let mut user = user.ok_or(AuthApiError::InvalidCredentials)?;
        if !verify_password(password, &user.password_hash)? {
            debug!("🔑️ Failed login attempt for account #{}", user.id);
            return Err(AuthApiError::InvalidCredentials);
        }
        if !user.is_verified {
            return Err(AuthApiError::NotVerified);
        }
        if user.status != UserStatus::Active {
            return Err(AuthApiError::NotActive);
        }
        let now = Utc::now();
        self.db.update_last_login(user.id, now).await?;
        user.last_login_at = Some(now);
        let token = issue_session_token(user.id, user.role, self.jwt_secret.reveal())?;
        debug!("🔑️ Account #{} logged in", user.id);
        Ok((user, token))
    }

    /// Validate a session token and return its claims.
    pub fn validate_token(&self, token: &str) -> Result<SessionClaims, AuthApiError> {
        Ok(validate_session_token(token, self.jwt_secret.reveal())?)
    }

    pub async fn profile(&self, user_id: i64) -> Result<User, AuthApiError> {
        self.db.fetch_user_by_id(user_id).await?.ok_or(AuthApiError::UserNotFound)
    }

    pub async fn update_profile(&self, user_id: i64, mut update: UpdateProfileRequest) -> Result<User, AuthApiError> {
        if update.is_empty() {
            return Err(AuthApiError::InvalidInput("Nothing to update".to_string()));
        }
        if let Some(phone) = update.phone.take() {
            let phone = normalize_phone(&phone);
            if phone.is_empty() {
                return Err(AuthApiError::InvalidInput("Phone number cannot be empty".to_string()));
            }
            update.phone = Some(phone);
        }
        let user = self.db.update_profile(user_id, &update).await?;
        debug!("🔑️ Profile updated for account #{}", user.id);
        Ok(user)
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

fn validate_registration(user: &NewUser) -> Result<(), AuthApiError> {
    if user.first_name.trim().is_empty() || user.last_name.trim().is_empty() {
        return Err(AuthApiError::InvalidInput("First and last name are required".to_string()));
    }
    if !user.email.contains('@') {
        return Err(AuthApiError::InvalidInput("A valid email address is required".to_string()));
    }
    if normalize_phone(&user.phone).is_empty() {
        return Err(AuthApiError::InvalidInput("A phone number is required".to_string()));
    }
    if user.password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthApiError::InvalidInput(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use crate::db_types::Role;

    use super::*;

    fn new_user(email: &str, phone: &str, password: &str) -> NewUser {
        NewUser {
            first_name: "Asha".to_string(),
            last_name: "Nab".to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            password: password.to_string(),
            role: Role::Customer,
        }
    }

    #[test]
    fn registration_validation() {
        assert!(validate_registration(&new_user("a@b.c", "+256700000001", "secret1")).is_ok());
        assert!(validate_registration(&new_user("not-an-email", "+256700000001", "secret1")).is_err());
        assert!(validate_registration(&new_user("a@b.c", "  ", "secret1")).is_err());
        assert!(validate_registration(&new_user("a@b.c", "+256700000001", "short")).is_err());
    }
}
