use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::identity::{IdentityClient, IdentityState};
use crate::session::SessionState;
use crate::store::{CredentialStore, StoreState};
use crate::table::{
    EnterEffect, RedirectTarget, RouteAction, RouteError, RouteId, RouteMatch, RouteTable,
};

/// RedirectReason
///
/// Why a navigation was redirected instead of committed. Carried on the
/// outcome so callers (and log lines) can distinguish an auth bounce from a
/// routine route-level redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    /// The target chain requires authentication and the session is not
    /// authenticated.
    AuthRequired,
    /// The route itself declares a redirect (logout lands here after its
    /// entry effect runs).
    RouteRedirect,
    /// The path matched nothing and fell through to the catch-all.
    CatchAll,
    /// The bare profile shortcut resolved the current identity and rewrote
    /// the navigation to the parameterized route.
    IdentityResolved,
    /// The identity lookup for the bare profile shortcut failed or timed
    /// out; the navigation falls back to the login route rather than pending
    /// forever.
    IdentityLookupFailed,
}

/// NavigationOutcome
///
/// Terminal state of one guard evaluation. An evaluation is Pending from
/// entry until it produces one of these; suspension happens only at the
/// session refresh and the identity lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Proceed to the target route and render its component.
    Allowed {
        route: RouteId,
        component: String,
        params: HashMap<String, String>,
    },
    /// Navigate to `location` instead of the requested target.
    Redirected {
        location: String,
        reason: RedirectReason,
    },
    /// A newer navigation started while this one was suspended; this
    /// resolution is discarded and must not be applied.
    Superseded,
}

/// NavigationGuard
///
/// The gate evaluated before committing to any route transition. Each
/// evaluation captures the matched target up front, so a resolution computed
/// after a suspension point can never be applied against a different route
/// than the one the navigation started with; the generation counter retires
/// evaluations that a newer navigation has overtaken.
pub struct NavigationGuard {
    table: Arc<RouteTable>,
    session: SessionState,
    store: StoreState,
    identity: IdentityState,
    login_path: String,
    lookup_timeout: Duration,
    generation: AtomicU64,
}

impl NavigationGuard {
    /// Constructs the guard. The login route is resolved through the table's
    /// name registry immediately: a missing login route is a configuration
    /// error surfaced at startup, not at the first bounce.
    pub fn new(
        table: Arc<RouteTable>,
        session: SessionState,
        store: StoreState,
        identity: IdentityState,
        login_route: &str,
        lookup_timeout: Duration,
    ) -> Result<Self, RouteError> {
        let login_path = table.url_for(login_route, &[])?;

        Ok(Self {
            table,
            session,
            store,
            identity,
            login_path,
            lookup_timeout,
            generation: AtomicU64::new(0),
        })
    }

    /// evaluate
    ///
    /// Runs the full pipeline for one navigation attempt:
    ///
    /// 1. Resolve the target path (unmatched paths redirect via catch-all).
    /// 2. Run the logout entry effect, if present.
    /// 3. If any segment of the matched chain requires auth, refresh the
    ///    session and bounce unauthenticated attempts to the login route.
    /// 4. Run the identity-resolving entry effect (bare profile shortcut)
    ///    under a timeout.
    /// 5. Commit: follow the route's declared redirect, or allow the render.
    ///
    /// The original destination is discarded on an auth bounce; there is no
    /// return-to-after-login behavior.
    pub async fn evaluate(&self, target: &str) -> NavigationOutcome {
        // Ticket for this navigation. Any later evaluation invalidates it.
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        tracing::debug!(to = %target, ticket, "navigation pending");

        // 1. Resolution. The match is captured here and used for every later
        // decision; ambient "current route" state is never consulted again.
        let Some(matched) = self.table.match_path(target) else {
            tracing::info!("no route matched and no catch-all registered");
            return self.redirect("/", RedirectReason::CatchAll);
        };

        if matched.catch_all {
            let location = self.redirect_location(&matched);
            return self.redirect(&location, RedirectReason::CatchAll);
        }

        let node = self.table.node(matched.leaf);

        // 2. Logout entry effect: clear the slot, drop the session, then let
        // the route's declared redirect decide where to land.
        if matches!(node.on_enter, Some(EnterEffect::ClearCredential)) {
            self.store.delete().await;
            self.session.invalidate();
            tracing::info!(route = %node.path, "credential cleared on route entry");
        }

        // 3. Auth gate. The propagated flag already accounts for flagged
        // ancestors anywhere along the chain. Unflagged routes skip the
        // refresh entirely: their decision never consults auth state.
        if node.auth_required {
            self.session.refresh().await;

            if self.superseded(ticket) {
                return NavigationOutcome::Superseded;
            }

            if !self.session.is_authenticated() {
                tracing::info!(route = %node.path, "unauthenticated navigation bounced to login");
                return self.redirect(&self.login_path, RedirectReason::AuthRequired);
            }
        }

        // 4. Identity-resolving entry effect.
        if let Some(EnterEffect::ResolveIdentity { target, param }) = &node.on_enter {
            return self
                .resolve_identity(ticket, &matched, target, param)
                .await;
        }

        // 5. Commit.
        match &node.action {
            Some(RouteAction::View(component)) => {
                tracing::debug!(route = %node.path, component = %component, "navigation allowed");
                NavigationOutcome::Allowed {
                    route: matched.leaf,
                    component: component.clone(),
                    params: matched.params,
                }
            }
            Some(RouteAction::Redirect(_)) => {
                let location = self.redirect_location(&matched);
                self.redirect(&location, RedirectReason::RouteRedirect)
            }
            None => {
                // Unreachable for a validated table: leaves carry an action
                // or were handled by their entry effect above.
                tracing::error!(route = %node.path, "leaf route has neither action nor effect");
                self.redirect("/", RedirectReason::CatchAll)
            }
        }
    }

    /// Resolves the current identity and rewrites the navigation to the
    /// parameterized target route. Runs under the configured timeout; any
    /// failure — rejection, transport error, or timeout — resolves
    /// deterministically to the login route. This evaluation never stays
    /// pending.
    async fn resolve_identity(
        &self,
        ticket: u64,
        matched: &RouteMatch,
        target: &str,
        param: &str,
    ) -> NavigationOutcome {
        let credential = self.store.get().await;

        let lookup = tokio::time::timeout(
            self.lookup_timeout,
            self.identity.whoami(credential.as_deref()),
        )
        .await;

        if self.superseded(ticket) {
            return NavigationOutcome::Superseded;
        }

        let route = &self.table.node(matched.leaf).path;

        match lookup {
            Ok(Ok(user)) => match self.table.url_for(target, &[(param, &user.username)]) {
                Ok(location) => {
                    tracing::info!(route = %route, username = %user.username, "identity resolved, navigation rewritten");
                    self.redirect(&location, RedirectReason::IdentityResolved)
                }
                Err(e) => {
                    tracing::error!(route = %route, error = %e, "identity rewrite target failed to resolve");
                    self.redirect(&self.login_path, RedirectReason::IdentityLookupFailed)
                }
            },
            Ok(Err(e)) => {
                tracing::warn!(route = %route, error = %e, "identity lookup failed");
                self.redirect(&self.login_path, RedirectReason::IdentityLookupFailed)
            }
            Err(_) => {
                tracing::warn!(route = %route, timeout = ?self.lookup_timeout, "identity lookup timed out");
                self.redirect(&self.login_path, RedirectReason::IdentityLookupFailed)
            }
        }
    }

    /// True when a newer navigation has started since `ticket` was issued.
    fn superseded(&self, ticket: u64) -> bool {
        let current = self.generation.load(Ordering::SeqCst);
        if current != ticket {
            tracing::debug!(ticket, current, "navigation superseded, resolution discarded");
            return true;
        }
        false
    }

    /// Resolves a route's declared redirect to a concrete location. Name
    /// targets were validated when the table was built, so resolution cannot
    /// dangle; the fallback to root exists only to keep this path total.
    fn redirect_location(&self, matched: &RouteMatch) -> String {
        let node = self.table.node(matched.leaf);
        match &node.action {
            Some(RouteAction::Redirect(RedirectTarget::Path(path))) => path.clone(),
            Some(RouteAction::Redirect(RedirectTarget::Name(name))) => {
                match self.table.url_for(name, &[]) {
                    Ok(location) => location,
                    Err(e) => {
                        tracing::error!(route = %node.path, error = %e, "redirect target failed to resolve");
                        "/".to_string()
                    }
                }
            }
            _ => "/".to_string(),
        }
    }

    fn redirect(&self, location: &str, reason: RedirectReason) -> NavigationOutcome {
        tracing::debug!(location = %location, reason = ?reason, "navigation redirected");
        NavigationOutcome::Redirected {
            location: location.to_string(),
            reason,
        }
    }
}
