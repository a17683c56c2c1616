use chrono::Duration;
use rand::{Rng, RngCore};

/// How long a one-time verification code stays valid.
pub fn otp_validity() -> Duration {
    Duration::minutes(10)
}

/// How long a password-reset token stays valid.
pub fn reset_token_validity() -> Duration {
    Duration::hours(1)
}

/// A 6-digit one-time code. Always exactly six digits, so leading zeros are impossible by construction.
pub fn generate_otp() -> String {
    rand::thread_rng().gen_range(100_000..1_000_000).to_string()
}

/// A 64-character hex token (32 random bytes) for password-reset links.
pub fn generate_reset_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Strip formatting characters from a phone number so that lookups and uniqueness checks see one canonical form.
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit() || *c == '+').collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn otp_is_six_digits() {
        for _ in 0..100 {
            let otp = generate_otp();
            assert_eq!(otp.len(), 6);
            assert!(otp.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn reset_tokens_are_hex_and_unique() {
        let a = generate_reset_token();
        let b = generate_reset_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn phone_normalization() {
        assert_eq!(normalize_phone("+256 700-000 001"), "+256700000001");
        assert_eq!(normalize_phone("(0700) 123 456"), "0700123456");
    }
}
