use std::sync::Arc;
use std::time::Duration;

use feedgate::{
    AppConfig, AppState, CredentialStore, Env, HttpIdentityClient, MemoryCredentialStore,
    create_guard, create_route_table,
    identity::IdentityState,
    store::StoreState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Development harness for the navigation core: initializes configuration,
/// logging, the credential slot, and the identity client, then evaluates the
/// navigation path given on the command line and reports the guard's
/// decision. The deployed client embeds the same assembly sequence.
#[tokio::main]
async fn main() {
    // 1. Configuration & Environment Loading (Fail-Fast)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging Filter Setup
    // Prioritizes RUST_LOG, falling back to sensible defaults for local use.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "feedgate=debug".into());

    // 3. Initialize Logging based on Environment
    match config.env {
        Env::Local => {
            // LOCAL: pretty output for human readability.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            // PROD: JSON output for log aggregators.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Navigation harness starting in {:?} mode", config.env);

    // 4. Credential Slot Initialization
    // The harness seeds the slot from AUTH_TOKEN when present, standing in
    // for the login flow that writes it in the deployed client.
    let store =
        Arc::new(MemoryCredentialStore::new(&config.credential_key)) as StoreState;
    if let Ok(token) = std::env::var("AUTH_TOKEN") {
        store.set(&token).await;
        tracing::info!("credential slot seeded from AUTH_TOKEN");
    }

    // 5. Identity Client Initialization
    let identity = Arc::new(
        HttpIdentityClient::new(
            &config.api_base_url,
            Duration::from_secs(config.lookup_timeout_secs),
        )
        .expect("FATAL: failed to construct the identity client."),
    ) as IdentityState;

    // 6. Unified State Assembly & Route Table
    let state = AppState::new(config, store, identity);

    let table =
        Arc::new(create_route_table().expect("FATAL: route table failed validation."));
    let guard = create_guard(&state, table).expect("FATAL: navigation guard failed to wire.");

    // 7. Evaluate the Requested Navigation
    let target = std::env::args().nth(1).unwrap_or_else(|| "/".to_string());

    let outcome = guard.evaluate(&target).await;
    tracing::info!(to = %target, outcome = ?outcome, "navigation evaluated");
}
