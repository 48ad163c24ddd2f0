use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use feedgate::guard::{NavigationGuard, NavigationOutcome, RedirectReason};
use feedgate::identity::{IdentityState, MockIdentityClient};
use feedgate::session::{Session, SessionMode};
use feedgate::store::{CountingStore, CredentialStore, MemoryCredentialStore, StoreState};
use feedgate::table::{RouteDef, RouteTable};
use feedgate::token::Claims;
use feedgate::{AppConfig, AppState, create_guard, create_route_table};
use jsonwebtoken::{EncodingKey, Header, encode};

// --- Helper Functions ---

const TEST_JWT_SECRET: &str = "test-secret-value-1234567890";

fn mint_token(exp_offset: i64) -> String {
    let claims = Claims {
        user_id: 7,
        exp: (Utc::now().timestamp() + exp_offset) as usize,
    };

    let key = EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes());
    encode(&Header::default(), &claims, &key).unwrap()
}

fn memory_store() -> StoreState {
    Arc::new(MemoryCredentialStore::new("authToken")) as StoreState
}

/// Wires a guard over the full application table with the default (Local)
/// session variant.
fn build_guard(store: StoreState, identity: IdentityState) -> (AppState, NavigationGuard) {
    let state = AppState::new(AppConfig::default(), store, identity);
    let table = Arc::new(create_route_table().unwrap());
    let guard = create_guard(&state, table).unwrap();
    (state, guard)
}

fn assert_redirected(outcome: NavigationOutcome, location: &str, reason: RedirectReason) {
    match outcome {
        NavigationOutcome::Redirected {
            location: actual,
            reason: actual_reason,
        } => {
            assert_eq!(actual, location);
            assert_eq!(actual_reason, reason);
        }
        other => panic!("expected redirect to {location}, got {other:?}"),
    }
}

// --- Core Scenarios ---

#[tokio::test]
async fn test_profile_without_credential_bounces_to_login() {
    let store = memory_store();
    let identity = Arc::new(MockIdentityClient::returning("alice")) as IdentityState;
    let (_state, guard) = build_guard(store, identity);

    // No credential: the guard must land on login, never on the
    // parameterized profile route.
    let outcome = guard.evaluate("/profile").await;
    assert_redirected(outcome, "/auth/login", RedirectReason::AuthRequired);
}

#[tokio::test]
async fn test_profile_with_valid_credential_rewrites_to_username() {
    let store = memory_store();
    store.set(&mint_token(3600)).await;

    let identity = Arc::new(MockIdentityClient::returning("alice")) as IdentityState;
    let (_state, guard) = build_guard(store, identity);

    let outcome = guard.evaluate("/profile").await;
    assert_redirected(outcome, "/profile/alice", RedirectReason::IdentityResolved);
}

#[tokio::test]
async fn test_parameterized_profile_with_valid_credential_is_allowed() {
    let store = memory_store();
    store.set(&mint_token(3600)).await;

    let identity = Arc::new(MockIdentityClient::failing()) as IdentityState;
    let (_state, guard) = build_guard(store, identity);

    let outcome = guard.evaluate("/profile/bob").await;
    match outcome {
        NavigationOutcome::Allowed {
            component, params, ..
        } => {
            assert_eq!(component, "ProfileView");
            assert_eq!(params.get("username").map(String::as_str), Some("bob"));
        }
        other => panic!("expected allowed navigation, got {other:?}"),
    }
}

#[tokio::test]
async fn test_logout_clears_credential_and_lands_on_login() {
    let store = memory_store();
    store.set(&mint_token(3600)).await;

    let identity = Arc::new(MockIdentityClient::failing()) as IdentityState;
    let (state, guard) = build_guard(store.clone(), identity);

    let outcome = guard.evaluate("/auth/logout").await;
    assert_redirected(outcome, "/auth/login", RedirectReason::RouteRedirect);

    assert_eq!(store.get().await, None);
    assert!(!state.session.is_authenticated());
}

#[tokio::test]
async fn test_unmatched_path_redirects_to_root() {
    let store = memory_store();
    let identity = Arc::new(MockIdentityClient::failing()) as IdentityState;
    let (_state, guard) = build_guard(store, identity);

    let outcome = guard.evaluate("/nonexistent/path").await;
    assert_redirected(outcome, "/", RedirectReason::CatchAll);
}

#[tokio::test]
async fn test_unflagged_route_never_consults_auth_state() {
    let counting = Arc::new(CountingStore::wrap(memory_store()));
    let identity = Arc::new(MockIdentityClient::returning("alice"));

    let (_state, guard) = build_guard(
        counting.clone() as StoreState,
        identity.clone() as IdentityState,
    );

    let outcome = guard.evaluate("/").await;
    match outcome {
        NavigationOutcome::Allowed { component, .. } => assert_eq!(component, "FeedView"),
        other => panic!("expected allowed navigation, got {other:?}"),
    }

    // The decision for an unflagged route must not read the credential slot
    // or touch the identity endpoint.
    assert_eq!(counting.reads(), 0);
    assert_eq!(identity.calls(), 0);
}

#[tokio::test]
async fn test_flag_on_deep_ancestor_still_bounces() {
    // A custom table where only the grandparent carries the flag; the leaf
    // inherits it through the chain.
    let table = Arc::new(
        RouteTable::build(vec![
            RouteDef::view("/auth/login", "LoginView").name("Login"),
            RouteDef::group("/admin")
                .requires_auth()
                .child(RouteDef::group("reports").child(RouteDef::view("daily", "DailyReport"))),
        ])
        .unwrap(),
    );

    let store = memory_store();
    let identity = Arc::new(MockIdentityClient::failing()) as IdentityState;
    let session = Arc::new(Session::new(
        SessionMode::Local,
        store.clone(),
        identity.clone(),
    ));

    let guard = NavigationGuard::new(
        table,
        session,
        store,
        identity,
        "Login",
        Duration::from_secs(5),
    )
    .unwrap();

    let outcome = guard.evaluate("/admin/reports/daily").await;
    assert_redirected(outcome, "/auth/login", RedirectReason::AuthRequired);
}

// --- Identity Lookup Failure Modes ---

#[tokio::test]
async fn test_profile_lookup_failure_falls_back_to_login() {
    let store = memory_store();
    store.set(&mint_token(3600)).await;

    let identity = Arc::new(MockIdentityClient::failing()) as IdentityState;
    let (_state, guard) = build_guard(store, identity);

    let outcome = guard.evaluate("/profile").await;
    assert_redirected(outcome, "/auth/login", RedirectReason::IdentityLookupFailed);
}

#[tokio::test]
async fn test_profile_lookup_timeout_falls_back_to_login() {
    let store = memory_store();
    store.set(&mint_token(3600)).await;

    let identity = Arc::new(
        MockIdentityClient::returning("alice").with_delay(Duration::from_millis(300)),
    ) as IdentityState;
    let session = Arc::new(Session::new(
        SessionMode::Local,
        store.clone(),
        identity.clone(),
    ));

    let table = Arc::new(create_route_table().unwrap());
    let guard = NavigationGuard::new(
        table,
        session,
        store,
        identity,
        "Login",
        // Tighter than the mock's delay: the lookup must time out.
        Duration::from_millis(50),
    )
    .unwrap();

    let outcome = guard.evaluate("/profile").await;
    assert_redirected(outcome, "/auth/login", RedirectReason::IdentityLookupFailed);
}

// --- Supersession ---

#[tokio::test]
async fn test_newer_navigation_supersedes_suspended_one() {
    let store = memory_store();
    store.set(&mint_token(3600)).await;

    let identity = Arc::new(
        MockIdentityClient::returning("alice").with_delay(Duration::from_millis(200)),
    ) as IdentityState;
    let (_state, guard) = build_guard(store, identity);
    let guard = Arc::new(guard);

    // First navigation suspends inside the identity lookup.
    let first = {
        let guard = guard.clone();
        tokio::spawn(async move { guard.evaluate("/profile").await })
    };

    // Give the first navigation time to reach its suspension point, then
    // overtake it.
    tokio::time::sleep(Duration::from_millis(50)).await;
    let second = guard.evaluate("/").await;
    assert!(matches!(second, NavigationOutcome::Allowed { .. }));

    // The older navigation must discard its resolution rather than apply a
    // stale redirect.
    let first = first.await.unwrap();
    assert_eq!(first, NavigationOutcome::Superseded);
}
