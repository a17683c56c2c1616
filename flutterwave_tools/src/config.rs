use log::*;
use snap_common::Secret;

pub const DEFAULT_API_URL: &str = "https://api.flutterwave.com/v3";

#[derive(Debug, Clone, Default)]
pub struct FlutterwaveConfig {
    pub api_url: String,
    /// Publishable key, handed to clients that embed the checkout. Not used for server-side calls.
    pub public_key: String,
    pub secret_key: Secret<String>,
}

impl FlutterwaveConfig {
    pub fn new_from_env_or_default() -> Self {
        let api_url = std::env::var("FLUTTERWAVE_API_URL").unwrap_or_else(|_| {
            debug!("FLUTTERWAVE_API_URL not set, using {DEFAULT_API_URL}");
            DEFAULT_API_URL.to_string()
        });
        let public_key = std::env::var("FLUTTERWAVE_PUBLIC_KEY").unwrap_or_default();
        let secret_key = Secret::new(std::env::var("FLUTTERWAVE_SECRET_KEY").unwrap_or_else(|_| {
            warn!("FLUTTERWAVE_SECRET_KEY not set. Payment sessions will not be available.");
            String::new()
        }));
        Self { api_url, public_key, secret_key }
    }

    /// Whether a secret key is present. Without one, every call fails and the engine falls back to simulation.
    pub fn is_configured(&self) -> bool {
        !self.secret_key.reveal().is_empty()
    }
}
