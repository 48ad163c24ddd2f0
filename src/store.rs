use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

// 1. CredentialStore Contract
/// CredentialStore
///
/// Defines the abstract contract for the single client-side storage slot that
/// holds the credential string. The schema is deliberately minimal: one value,
/// "string or absent". The slot is written by the login flow (outside this
/// crate), read by the session layer, and cleared by the logout route and by
/// expiry cleanup.
///
/// The trait allows the concrete backend — browser local storage in the real
/// client, an in-memory slot here and in tests — to be swapped without
/// affecting the session or guard layers.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Reads the stored credential, if any.
    async fn get(&self) -> Option<String>;

    /// Writes the credential, replacing any previous value.
    async fn set(&self, credential: &str);

    /// Removes the credential. A no-op when the slot is already empty.
    async fn delete(&self);
}

/// StoreState
///
/// The concrete type used to share the credential slot across the session,
/// guard, and logout paths.
pub type StoreState = Arc<dyn CredentialStore>;

// 2. The In-Memory Implementation
/// MemoryCredentialStore
///
/// An in-process slot keyed by a fixed name. In the deployed client this role
/// is played by persistent key-value storage; for the tab lifetime modeled
/// here an in-memory slot has identical semantics. The key is carried only
/// for diagnostics so log lines name the slot being touched.
pub struct MemoryCredentialStore {
    key: String,
    slot: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            slot: RwLock::new(None),
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self) -> Option<String> {
        self.slot.read().await.clone()
    }

    async fn set(&self, credential: &str) {
        *self.slot.write().await = Some(credential.to_string());
    }

    async fn delete(&self) {
        let mut slot = self.slot.write().await;
        if slot.take().is_some() {
            tracing::debug!(key = %self.key, "credential slot cleared");
        }
    }
}

// 3. The Counting Wrapper (For Tests)
/// CountingStore
///
/// Wraps another store and counts read accesses. Used by the navigation tests
/// to assert that unflagged routes never consult authentication state: a
/// navigation to a public route must leave the read counter untouched.
pub struct CountingStore {
    inner: StoreState,
    reads: AtomicUsize,
}

impl CountingStore {
    pub fn wrap(inner: StoreState) -> Self {
        Self {
            inner,
            reads: AtomicUsize::new(0),
        }
    }

    /// Number of `get` calls observed so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialStore for CountingStore {
    async fn get(&self) -> Option<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get().await
    }

    async fn set(&self, credential: &str) {
        self.inner.set(credential).await;
    }

    async fn delete(&self) {
        self.inner.delete().await;
    }
}
