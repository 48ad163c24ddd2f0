use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::identity::{IdentityClient, IdentityState};
use crate::store::{CredentialStore, StoreState};
use crate::token;

/// SessionMode
///
/// Selects how `refresh` decides whether the holder is authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Local-only: decode the stored credential and check its expiry. An
    /// absent or expired credential means "not authenticated" and expired
    /// credentials are deleted from the slot as a cleanup side effect.
    Local,
    /// Network-probe: ask the identity endpoint. Any failure — network error
    /// or a non-success status — means "not authenticated". No local expiry
    /// check is performed; the server's answer is authoritative.
    Probe,
}

/// Session
///
/// The explicit session-state object: a single owner of the "is the holder
/// currently considered authenticated" flag and of the refresh contract that
/// mutates it. The flag starts false at process start and is only ever
/// changed by `refresh` (and by `invalidate`, the logout path). Consumers
/// read the flag through `is_authenticated` without triggering a refresh.
pub struct Session {
    authenticated: AtomicBool,
    mode: SessionMode,
    store: StoreState,
    identity: IdentityState,
}

/// SessionState
///
/// The concrete type used to share the session across the guard and any
/// other consumer of the authenticated flag.
pub type SessionState = Arc<Session>;

impl Session {
    pub fn new(mode: SessionMode, store: StoreState, identity: IdentityState) -> Self {
        Self {
            authenticated: AtomicBool::new(false),
            mode,
            store,
            identity,
        }
    }

    /// Current value of the flag. Never suspends and never re-derives: this
    /// is whatever the last `refresh` concluded.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    /// Forces the flag to false. Used by the logout route after clearing the
    /// credential slot.
    pub fn invalidate(&self) {
        self.authenticated.store(false, Ordering::SeqCst);
    }

    /// refresh
    ///
    /// Re-derives the authenticated flag from the credential slot (Local) or
    /// the identity endpoint (Probe). Idempotent under unchanged storage and
    /// network conditions; the Local variant's cleanup of an expired
    /// credential is itself idempotent after the first call.
    pub async fn refresh(&self) {
        let authenticated = match self.mode {
            SessionMode::Local => self.refresh_local().await,
            SessionMode::Probe => self.refresh_probe().await,
        };

        self.authenticated.store(authenticated, Ordering::SeqCst);
    }

    async fn refresh_local(&self) -> bool {
        let Some(credential) = self.store.get().await else {
            return false;
        };

        if token::is_expired(&credential) {
            self.store.delete().await;
            tracing::debug!("expired credential removed during session refresh");
            return false;
        }

        true
    }

    async fn refresh_probe(&self) -> bool {
        let credential = self.store.get().await;

        match self.identity.whoami(credential.as_deref()).await {
            Ok(user) => {
                tracing::debug!(user_id = user.id, "identity probe confirmed session");
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, "identity probe failed");
                false
            }
        }
    }
}
