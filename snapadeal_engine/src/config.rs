use std::env;

use log::*;
use rand::RngCore;
use snap_common::Secret;

const DEFAULT_REDIRECT_BASE: &str = "http://localhost:3000";
const DEFAULT_DATABASE_URL: &str = "sqlite://data/snapadeal.db";

/// Configuration for the engine's public APIs, read from the environment. The server layer builds one of these at
/// startup and hands the pieces to the API constructors.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub database_url: String,
    /// Signing secret for session tokens.
    pub jwt_secret: Secret<String>,
    /// Base URL the payment gateway redirects customers back to.
    pub payment_redirect_base: String,
}

impl EngineConfig {
    pub fn from_env_or_default() -> Self {
        let database_url = env::var("SNAP_DATABASE_URL").unwrap_or_else(|_| {
            info!("🪛️ SNAP_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let jwt_secret = match env::var("SNAP_JWT_SECRET") {
            Ok(s) if !s.is_empty() => Secret::new(s),
            _ => {
                let secret = random_secret();
                warn!(
                    "🪛️ SNAP_JWT_SECRET is not set. A random signing secret has been generated for this run; all \
                     session tokens will be invalidated on restart."
                );
                Secret::new(secret)
            },
        };
        let payment_redirect_base = env::var("SNAP_PAYMENT_REDIRECT_URL").unwrap_or_else(|_| {
            info!("🪛️ SNAP_PAYMENT_REDIRECT_URL is not set. Using the default, {DEFAULT_REDIRECT_BASE}.");
            DEFAULT_REDIRECT_BASE.to_string()
        });
        Self { database_url, jwt_secret, payment_redirect_base }
    }
}

fn random_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
