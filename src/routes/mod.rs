/// Route Module Index
///
/// Organizes the application's declarative routing table into
/// feature-segregated modules. Each module contributes its own `RouteDef`
/// subtree; `create_route_table` in the crate root merges them and the table
/// builder validates every cross-reference before a single navigation runs.
///
/// Access control is carried as route metadata (`requires_auth`), enforced by
/// the navigation guard for the whole matched chain — flagging a parent
/// protects every descendant.

/// The authentication surface: the login view and the logout pseudo-route.
pub mod auth;

/// The application shell and the feed it wraps at the root path.
pub mod feed;

/// The profile views, including the legacy bare `/profile` shortcut.
pub mod profile;
