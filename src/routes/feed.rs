use crate::table::RouteDef;

/// Feed Route Module
///
/// Defines the root subtree: the application shell wrapping the feed view at
/// the same path. The shell is a layout component; the feed child's empty
/// path places it directly at `/`, so matching `/` resolves the chain
/// shell → feed.
///
/// The feed is deliberately unflagged — anonymous holders can read it, and
/// the guard never consults authentication state for it.
pub fn feed_routes() -> RouteDef {
    RouteDef::view("/", "AppShell")
        .name("Shell")
        .child(RouteDef::view("", "FeedView").name("Feed"))
}
