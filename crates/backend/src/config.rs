//! Backend configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FIREBASE_DATABASE_URL` - Realtime Database base URL (e.g. `https://x.firebaseio.com`)
//! - `SESSION_SECRET` - Session cookie signing secret (min 32 chars, high entropy)
//! - `SUPER_ADMIN_USERNAME` - Reserved super-admin username
//! - `SUPER_ADMIN_PASSWORD` - Reserved super-admin password (min 6 chars)
//!
//! ## Optional
//! - `FIREBASE_AUTH_TOKEN` - Database secret appended as the `auth` query parameter
//! - `CARELINE_HOST` - Bind address (default: 127.0.0.1)
//! - `CARELINE_PORT` - Listen port (default: 8000)
//! - `CARELINE_BASE_URL` - Public URL; an `https://` prefix enables Secure cookies
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (0.0 to 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Sentry traces sample rate (0.0 to 1.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

use careline_core::Username;

const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Minimum length for any admin password, including the configured
/// super-admin password.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Backend application configuration.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Document store connection details
    pub firebase: FirebaseConfig,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the backend
    pub base_url: String,
    /// Session cookie signing secret
    pub session_secret: SecretString,
    /// Reserved super-admin credentials
    pub super_admin: SuperAdminConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Firebase Realtime Database configuration.
///
/// Implements `Debug` manually to redact the auth token.
#[derive(Clone)]
pub struct FirebaseConfig {
    /// Database base URL (e.g. `https://x-default-rtdb.firebaseio.com`)
    pub database_url: Url,
    /// Database secret or access token, sent as the `auth` query parameter
    pub auth_token: Option<SecretString>,
}

impl std::fmt::Debug for FirebaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseConfig")
            .field("database_url", &self.database_url.as_str())
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Reserved super-admin credentials.
///
/// The username/password pair lives outside the document store; the matching
/// store record is materialized lazily at startup. Implements `Debug`
/// manually to redact the password.
#[derive(Clone)]
pub struct SuperAdminConfig {
    /// Reserved username; no other account may be created with it
    pub username: Username,
    /// Configured password, compared in constant time at login
    pub password: SecretString,
}

impl std::fmt::Debug for SuperAdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuperAdminConfig")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl BackendConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let firebase = FirebaseConfig::from_env()?;
        let host = get_env_or_default("CARELINE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("CARELINE_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("CARELINE_PORT", "8000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("CARELINE_PORT".to_string(), e.to_string()))?;
        let base_url =
            get_optional_env("CARELINE_BASE_URL").unwrap_or_else(|| format!("http://{host}:{port}"));

        let session_secret = get_validated_secret("SESSION_SECRET")?;
        validate_session_secret(&session_secret, "SESSION_SECRET")?;

        let super_admin = SuperAdminConfig::from_env()?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            firebase,
            host,
            port,
            base_url,
            session_secret,
            super_admin,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the backend is served over HTTPS (controls the Secure cookie
    /// attribute).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl FirebaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw = get_required_env("FIREBASE_DATABASE_URL")?;
        let database_url = Url::parse(&raw).map_err(|e| {
            ConfigError::InvalidEnvVar("FIREBASE_DATABASE_URL".to_string(), e.to_string())
        })?;

        let auth_token = match get_optional_env("FIREBASE_AUTH_TOKEN") {
            Some(token) => {
                // Warn rather than fail; a local emulator token may be short
                if let Err(e) = validate_secret_strength(&token, "FIREBASE_AUTH_TOKEN") {
                    tracing::warn!("FIREBASE_AUTH_TOKEN validation warning: {e}");
                }
                Some(SecretString::from(token))
            }
            None => None,
        };

        Ok(Self {
            database_url,
            auth_token,
        })
    }
}

impl SuperAdminConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw_username = get_required_env("SUPER_ADMIN_USERNAME")?;
        let username = Username::parse(&raw_username).map_err(|e| {
            ConfigError::InvalidEnvVar("SUPER_ADMIN_USERNAME".to_string(), e.to_string())
        })?;

        let password = get_required_env("SUPER_ADMIN_PASSWORD")?;
        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(ConfigError::InsecureSecret(
                "SUPER_ADMIN_PASSWORD".to_string(),
                format!("must be at least {MIN_PASSWORD_LENGTH} characters"),
            ));
        }
        // Passwords are human-chosen; low entropy is a warning, not an error
        if shannon_entropy(&password) < MIN_ENTROPY_BITS_PER_CHAR {
            tracing::warn!("SUPER_ADMIN_PASSWORD has low entropy; consider a longer passphrase");
        }

        Ok(Self {
            username,
            password: SecretString::from(password),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
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
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real secrets like signing keys have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> BackendConfig {
        BackendConfig {
            firebase: FirebaseConfig {
                database_url: Url::parse("https://careline-test.firebaseio.com").unwrap(),
                auth_token: None,
            },
            host: "127.0.0.1".parse().unwrap(),
            port: 8000,
            base_url: "http://127.0.0.1:8000".to_string(),
            session_secret: SecretString::from("x".repeat(32)),
            super_admin: SuperAdminConfig {
                username: Username::parse("root").unwrap(),
                password: SecretString::from("Openforme"),
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        }
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        // All same character = 0 entropy
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        // "ab" has entropy of 1 bit per char (50% a, 50% b)
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_shannon_entropy_high() {
        let entropy = shannon_entropy("aB3$xY9!mK2@nL5#");
        assert!(entropy > 3.3);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-signing-key-here", "TEST_VAR");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_changeme() {
        let result = validate_secret_strength("changeme123", "TEST_VAR");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        // High-entropy random string
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_session_secret_too_short() {
        let secret = SecretString::from("short");
        let result = validate_session_secret(&secret, "TEST_SESSION");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_session_secret_valid_length() {
        let secret = SecretString::from("a".repeat(32));
        let result = validate_session_secret(&secret, "TEST_SESSION");
        assert!(result.is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = test_config();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 8000);
    }

    #[test]
    fn test_is_secure() {
        let mut config = test_config();
        assert!(!config.is_secure());

        config.base_url = "https://careline.example.com".to_string();
        assert!(config.is_secure());
    }

    #[test]
    fn test_firebase_config_debug_redacts_token() {
        let config = FirebaseConfig {
            database_url: Url::parse("https://careline-test.firebaseio.com").unwrap(),
            auth_token: Some(SecretString::from("rtdb-database-secret-value")),
        };

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("careline-test.firebaseio.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("rtdb-database-secret-value"));
    }

    #[test]
    fn test_super_admin_config_debug_redacts_password() {
        let config = SuperAdminConfig {
            username: Username::parse("root").unwrap(),
            password: SecretString::from("super-secret-password"),
        };

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("root"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super-secret-password"));
    }
}
