use std::sync::Arc;
use std::time::Duration;

// --- Module Structure ---

// Core routing and session components.
pub mod config;
pub mod guard;
pub mod identity;
pub mod models;
pub mod session;
pub mod store;
pub mod table;
pub mod token;

// Module for the declarative application routing table (auth, feed, profile).
pub mod routes;

// --- Public Re-exports ---

// Makes the core types easily accessible to the binary entry point and tests.
pub use config::{AppConfig, Env};
pub use guard::{NavigationGuard, NavigationOutcome, RedirectReason};
pub use identity::{HttpIdentityClient, IdentityClient, IdentityState, MockIdentityClient};
pub use session::{Session, SessionMode, SessionState};
pub use store::{CredentialStore, MemoryCredentialStore, StoreState};
pub use table::{RouteDef, RouteError, RouteTable};

/// AppState
///
/// Implements the unified-state pattern: a single container holding the
/// shared services the navigation layer runs on. Every component is behind
/// an `Arc`, so the state clones cheaply into whatever owns the guard.
#[derive(Clone)]
pub struct AppState {
    /// The credential slot, shared by the session, the guard, and the
    /// logout path.
    pub store: StoreState,
    /// The identity endpoint client (real or mock).
    pub identity: IdentityState,
    /// The session-state object owning the authenticated flag.
    pub session: SessionState,
    /// The loaded, immutable configuration.
    pub config: AppConfig,
}

impl AppState {
    /// Assembles the state from a configuration and the two injectable
    /// seams (store and identity client). The session is constructed here so
    /// there is exactly one owner of the authenticated flag.
    pub fn new(config: AppConfig, store: StoreState, identity: IdentityState) -> Self {
        let session = Arc::new(Session::new(
            config.session_mode,
            store.clone(),
            identity.clone(),
        ));

        Self {
            store,
            identity,
            session,
            config,
        }
    }
}

/// create_route_table
///
/// Assembles the application's entire routing table from the segregated
/// route modules, plus the catch-all entry redirecting any unmatched path to
/// the root. Building validates every name reference; a misconfigured
/// redirect fails here, at startup, never mid-navigation.
pub fn create_route_table() -> Result<RouteTable, RouteError> {
    RouteTable::build(vec![
        routes::auth::auth_routes(),
        routes::feed::feed_routes(),
        routes::profile::profile_shortcut(),
        routes::profile::user_profile(),
        RouteDef::catch_all("/"),
    ])
}

/// create_guard
///
/// Wires the navigation guard against the shared state and the built table.
/// The login route name is fixed by the auth route module.
pub fn create_guard(
    state: &AppState,
    table: Arc<RouteTable>,
) -> Result<NavigationGuard, RouteError> {
    NavigationGuard::new(
        table,
        state.session.clone(),
        state.store.clone(),
        state.identity.clone(),
        "Login",
        Duration::from_secs(state.config.lookup_timeout_secs),
    )
}
