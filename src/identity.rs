use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use thiserror::Error;

use crate::models::{ApiUser, UserEnvelope};

/// IdentityError
///
/// Failures surfaced by the identity endpoint. Every variant degrades to
/// "not authenticated" at the session and guard layers; nothing here is
/// allowed to escalate into a panic or an unhandled rejection.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Network-level failure: DNS, connect, request timeout, or a body that
    /// could not be read or decoded.
    #[error("identity request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The endpoint answered with a non-success status (auth rejection,
    /// server error).
    #[error("identity endpoint rejected the request: {0}")]
    Rejected(String),
}

// 1. IdentityClient Contract
/// IdentityClient
///
/// Defines the abstract contract for the identity-confirmation endpoint
/// (`GET /me`). This trait lets the guard and session layers run against the
/// real HTTP client in the deployed client and against the scripted mock in
/// tests, without either layer knowing which is behind the `Arc`.
#[async_trait]
pub trait IdentityClient: Send + Sync {
    /// Asks the backend who the current credential belongs to.
    ///
    /// When a locally stored credential is available it is sent as a bearer
    /// token; otherwise the request rides on ambient transport credentials
    /// (session cookies managed outside this crate).
    async fn whoami(&self, credential: Option<&str>) -> Result<ApiUser, IdentityError>;
}

/// IdentityState
///
/// The concrete type used to share the identity client across the session
/// and guard layers.
pub type IdentityState = Arc<dyn IdentityClient>;

// 2. The Real Implementation (HTTP)
/// HttpIdentityClient
///
/// The concrete implementation backed by `reqwest`, targeting the backend's
/// `/me` endpoint. The per-request timeout is set on the underlying client so
/// a stalled probe can never leave a navigation pending indefinitely.
pub struct HttpIdentityClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpIdentityClient {
    /// Constructs the client against the configured API base URL.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, IdentityError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl IdentityClient for HttpIdentityClient {
    async fn whoami(&self, credential: Option<&str>) -> Result<ApiUser, IdentityError> {
        let url = format!("{}/me", self.base_url);

        let mut request = self.client.get(&url);
        if let Some(token) = credential {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(IdentityError::Rejected(response.status().to_string()));
        }

        let envelope: UserEnvelope = response.json().await?;
        Ok(envelope.data)
    }
}

// 3. The Mock Implementation (For Tests)
/// MockIdentityClient
///
/// A scripted implementation used by unit and integration tests. It can
/// answer with a fixed username, fail every call, and optionally sleep before
/// answering to exercise the guard's timeout and supersession paths. The call
/// counter lets tests assert that public navigations never touch the
/// identity endpoint.
pub struct MockIdentityClient {
    username: Option<String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockIdentityClient {
    /// A mock that resolves every lookup to the given username.
    pub fn returning(username: &str) -> Self {
        Self {
            username: Some(username.to_string()),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// A mock that rejects every lookup.
    pub fn failing() -> Self {
        Self {
            username: None,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Delays every answer, simulating a slow network.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `whoami` calls observed so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityClient for MockIdentityClient {
    async fn whoami(&self, _credential: Option<&str>) -> Result<ApiUser, IdentityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.username {
            Some(username) => Ok(ApiUser {
                id: 1,
                username: username.clone(),
            }),
            None => Err(IdentityError::Rejected(
                "401 Unauthorized (mock)".to_string(),
            )),
        }
    }
}
