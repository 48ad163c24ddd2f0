use crate::table::{EnterEffect, RouteDef};

/// Auth Route Module
///
/// Defines the `/auth` subtree: the login view and the logout pseudo-route.
/// Neither requires authentication — login must stay reachable for
/// unauthenticated holders, and logout must work even when the session has
/// already lapsed.
pub fn auth_routes() -> RouteDef {
    RouteDef::group("/auth")
        // /auth/login
        // The login view. Every auth bounce in the guard lands here, and the
        // login flow (outside this crate) writes the credential slot before
        // navigating away.
        .child(RouteDef::view("login", "LoginView").name("Login"))
        // /auth/logout
        // A pseudo-route: entering it deletes the stored credential, drops
        // the session flag, and redirects to the login view. It renders
        // nothing itself.
        .child(
            RouteDef::redirect_to_name("logout", "Login")
                .name("Logout")
                .on_enter(EnterEffect::ClearCredential),
        )
}
