use std::env;

use crate::session::SessionMode;

/// AppConfig
///
/// Holds the crate's entire configuration state. Immutable once loaded, so
/// every layer — store, identity client, session, guard — sees the same
/// values for the lifetime of the process.
#[derive(Clone)]
pub struct AppConfig {
    /// Runtime environment marker. Controls logging format and which
    /// variables are mandatory.
    pub env: Env,
    /// Base URL of the backend API; the identity endpoint is `{base}/me`.
    pub api_base_url: String,
    /// Name of the storage slot holding the credential string.
    pub credential_key: String,
    /// Which session-refresh variant the guard runs: local expiry check or
    /// network probe.
    pub session_mode: SessionMode,
    /// Timeout applied to the identity lookup and probe, in seconds.
    pub lookup_timeout_secs: u64,
}

/// Env
///
/// Defines the runtime context, used to switch between development
/// conveniences (pretty logs, defaulted API URL) and production settings
/// (JSON logs, mandatory configuration).
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// default
    ///
    /// Provides a safe, non-panicking AppConfig instance primarily used for
    /// test setup, without requiring any environment variables.
    fn default() -> Self {
        Self {
            env: Env::Local,
            api_base_url: "http://localhost:8000".to_string(),
            credential_key: "authToken".to_string(),
            session_mode: SessionMode::Local,
            lookup_timeout_secs: 5,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// The canonical function for initializing configuration at startup.
    /// Reads all parameters from environment variables and implements the
    /// fail-fast principle.
    ///
    /// # Panics
    /// Panics if a variable required for the current runtime environment
    /// (especially Production) is missing or unparseable. The process must
    /// not start with an incomplete configuration.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        // API base URL resolution. Production must name its backend
        // explicitly; local falls back to the dockerized dev backend.
        let api_base_url = match env {
            Env::Production => {
                env::var("API_BASE_URL").expect("FATAL: API_BASE_URL must be set in production.")
            }
            _ => {
                env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_string())
            }
        };

        let credential_key =
            env::var("CREDENTIAL_KEY").unwrap_or_else(|_| "authToken".to_string());

        // Session variant: `probe` delegates the decision to the identity
        // endpoint; anything else stays with the local expiry check.
        let session_mode = match env::var("SESSION_MODE").as_deref() {
            Ok("probe") => SessionMode::Probe,
            _ => SessionMode::Local,
        };

        let lookup_timeout_secs = match env::var("LOOKUP_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse()
                .expect("FATAL: LOOKUP_TIMEOUT_SECS must be an integer number of seconds."),
            Err(_) => 5,
        };

        Self {
            env,
            api_base_url,
            credential_key,
            session_mode,
            lookup_timeout_secs,
        }
    }
}
