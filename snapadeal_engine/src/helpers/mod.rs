//! Small, self-contained building blocks used across the engine: password hashing, one-time codes and session
//! tokens.

mod codes;
mod passwords;
mod session_tokens;

pub use codes::{generate_otp, generate_reset_token, normalize_phone, otp_validity, reset_token_validity};
pub use passwords::{create_password_hash, verify_password, PasswordHashError};
pub use session_tokens::{issue_session_token, validate_session_token, SessionClaims, SessionTokenError, SESSION_VALIDITY_DAYS};
