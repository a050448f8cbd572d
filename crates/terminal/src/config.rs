//! Terminal configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `POS_BACKEND_URL` - Backend base URL (default: `http://localhost:8000`)
//! - `POS_REQUEST_TIMEOUT_SECS` - Per-request timeout in seconds (default: 30)
//! - `POS_BACKEND_TOKEN` - Bearer token sent with every backend request
//! - `POS_PAYMENT_METHOD` - Default payment method for checkout hand-off (default: Cash)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use store_counter_core::PaymentMethod;
use thiserror::Error;
use url::Url;

const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: &str = "30";
const MIN_TOKEN_LENGTH: usize = 16;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "your_",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Terminal configuration.
///
/// Implements `Debug` manually to redact the backend token.
#[derive(Clone)]
pub struct TerminalConfig {
    /// Backend base URL, always ending in `/`
    pub backend_url: Url,
    /// Timeout applied to each backend request
    pub request_timeout: Duration,
    /// Optional bearer token for the backend
    pub backend_token: Option<SecretString>,
    /// Payment method used when building the checkout hand-off
    pub payment_method: PaymentMethod,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl std::fmt::Debug for TerminalConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalConfig")
            .field("backend_url", &self.backend_url.as_str())
            .field("request_timeout", &self.request_timeout)
            .field(
                "backend_token",
                &self.backend_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("payment_method", &self.payment_method)
            .field("sentry_dsn", &self.sentry_dsn)
            .field("sentry_environment", &self.sentry_environment)
            .finish()
    }
}

impl TerminalConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid, or if the
    /// backend token fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`TerminalConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let backend_url = parse_base_url(&get_or("POS_BACKEND_URL", DEFAULT_BACKEND_URL))?;

        let timeout_secs = get_or("POS_REQUEST_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("POS_REQUEST_TIMEOUT_SECS".to_string(), e.to_string())
            })?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "POS_REQUEST_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let backend_token = match lookup("POS_BACKEND_TOKEN") {
            Some(token) => {
                let token = SecretString::from(token);
                validate_token(&token, "POS_BACKEND_TOKEN")?;
                Some(token)
            }
            None => None,
        };

        let payment_method = get_or("POS_PAYMENT_METHOD", "Cash")
            .parse::<PaymentMethod>()
            .map_err(|e| ConfigError::InvalidEnvVar("POS_PAYMENT_METHOD".to_string(), e))?;

        Ok(Self {
            backend_url,
            request_timeout: Duration::from_secs(timeout_secs),
            backend_token,
            payment_method,
            sentry_dsn: lookup("SENTRY_DSN"),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }

    /// Configuration pointing at a specific backend, everything else default.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `url` is not an http(s) URL.
    pub fn for_backend(url: &str) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| (key == "POS_BACKEND_URL").then(|| url.to_string()))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse the backend URL and make sure endpoint paths join under it.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |msg: String| ConfigError::InvalidEnvVar("POS_BACKEND_URL".to_string(), msg);

    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a token is long enough, not a placeholder, and has sufficient entropy.
fn validate_token(token: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = token.expose_secret();
    if value.len() < MIN_TOKEN_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {MIN_TOKEN_LENGTH} characters (got {})",
                value.len()
            ),
        ));
    }

    let lower = value.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(value);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}
