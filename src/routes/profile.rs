use crate::table::{EnterEffect, RouteDef};

/// Profile Route Module
///
/// Defines the profile views. Both entries carry `requires_auth`: profile
/// pages are only reachable with a live session, and the guard bounces
/// everything else to login.

/// /profile/:username
/// The canonical profile view, parameterized by the username to display.
/// The parameter is used verbatim; validation belongs to the view and the
/// backend.
pub fn user_profile() -> RouteDef {
    RouteDef::view("/profile/:username", "ProfileView")
        .name("UserProfile")
        .requires_auth()
}

/// /profile
/// The legacy shortcut: no username in the path. Entering it resolves the
/// current identity over the network and rewrites the navigation to
/// `/profile/:username` with the resolved name. On lookup failure or timeout
/// the guard falls back to login rather than leaving the navigation pending.
pub fn profile_shortcut() -> RouteDef {
    RouteDef::effect(
        "/profile",
        EnterEffect::ResolveIdentity {
            target: "UserProfile".to_string(),
            param: "username".to_string(),
        },
    )
    .name("Profile")
    .requires_auth()
}
