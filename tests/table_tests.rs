use feedgate::create_route_table;
use feedgate::table::{EnterEffect, RouteAction, RouteDef, RouteError, RouteTable};

// --- Application Table ---

#[test]
fn test_root_resolves_shell_and_feed_chain() {
    let table = create_route_table().unwrap();

    let matched = table.match_path("/").expect("root must match");
    assert!(!matched.catch_all);
    // The chain is shell -> feed: the nested child sits at the parent's path.
    assert_eq!(matched.chain.len(), 2);

    let leaf = table.node(matched.leaf);
    assert_eq!(leaf.name.as_deref(), Some("Feed"));
    assert_eq!(
        leaf.action,
        Some(RouteAction::View("FeedView".to_string()))
    );
    assert!(!leaf.auth_required);
}

#[test]
fn test_parameterized_profile_match_captures_username() {
    let table = create_route_table().unwrap();

    let matched = table.match_path("/profile/alice").unwrap();
    let leaf = table.node(matched.leaf);

    assert_eq!(leaf.name.as_deref(), Some("UserProfile"));
    assert!(leaf.auth_required);
    assert_eq!(matched.params.get("username").map(String::as_str), Some("alice"));
}

#[test]
fn test_login_is_unflagged_and_trailing_slash_is_ignored() {
    let table = create_route_table().unwrap();

    let matched = table.match_path("/auth/login/").unwrap();
    let leaf = table.node(matched.leaf);

    assert_eq!(leaf.name.as_deref(), Some("Login"));
    assert!(!leaf.auth_required);
}

#[test]
fn test_unmatched_path_falls_through_to_catch_all() {
    let table = create_route_table().unwrap();

    let matched = table.match_path("/nonexistent/path").unwrap();
    assert!(matched.catch_all);
}

#[test]
fn test_url_for_substitutes_parameters() {
    let table = create_route_table().unwrap();

    let url = table.url_for("UserProfile", &[("username", "alice")]).unwrap();
    assert_eq!(url, "/profile/alice");

    let url = table.url_for("Login", &[]).unwrap();
    assert_eq!(url, "/auth/login");
}

#[test]
fn test_url_for_rejects_missing_parameters_and_unknown_names() {
    let table = create_route_table().unwrap();

    assert!(matches!(
        table.url_for("UserProfile", &[]),
        Err(RouteError::MissingParam { .. })
    ));
    assert!(matches!(
        table.url_for("NoSuchRoute", &[]),
        Err(RouteError::UnknownName(_))
    ));
}

// --- Builder Validation ---

#[test]
fn test_build_rejects_duplicate_names() {
    let result = RouteTable::build(vec![
        RouteDef::view("/a", "A").name("Page"),
        RouteDef::view("/b", "B").name("Page"),
    ]);

    assert_eq!(result.err(), Some(RouteError::DuplicateName("Page".to_string())));
}

#[test]
fn test_build_rejects_unknown_redirect_target() {
    // A redirect into nowhere must fail at build time, not at navigation
    // time.
    let result = RouteTable::build(vec![RouteDef::redirect_to_name("/old", "NewHome")]);

    assert!(matches!(
        result.err(),
        Some(RouteError::UnknownTarget { target, .. }) if target == "NewHome"
    ));
}

#[test]
fn test_build_rejects_static_redirect_to_parameterized_route() {
    let result = RouteTable::build(vec![
        RouteDef::view("/users/:id", "UserView").name("User"),
        RouteDef::redirect_to_name("/me", "User"),
    ]);

    assert!(matches!(
        result.err(),
        Some(RouteError::TargetNeedsParams { .. })
    ));
}

#[test]
fn test_build_rejects_identity_effect_without_matching_param() {
    let result = RouteTable::build(vec![
        RouteDef::view("/users/:id", "UserView").name("User"),
        RouteDef::effect(
            "/me",
            EnterEffect::ResolveIdentity {
                target: "User".to_string(),
                param: "username".to_string(),
            },
        ),
    ]);

    assert!(matches!(
        result.err(),
        Some(RouteError::TargetMissingParam { param, .. }) if param == "username"
    ));
}

#[test]
fn test_build_rejects_second_catch_all() {
    let result = RouteTable::build(vec![
        RouteDef::catch_all("/"),
        RouteDef::catch_all("/home"),
    ]);

    assert_eq!(result.err(), Some(RouteError::DuplicateCatchAll));
}

#[test]
fn test_requires_auth_propagates_from_ancestors() {
    let table = RouteTable::build(vec![
        RouteDef::group("/admin")
            .requires_auth()
            .child(RouteDef::group("reports").child(RouteDef::view("daily", "DailyReport"))),
    ])
    .unwrap();

    let matched = table.match_path("/admin/reports/daily").unwrap();
    let leaf = table.node(matched.leaf);

    // The leaf never declared the flag itself; the grandparent did.
    assert!(!leaf.requires_auth);
    assert!(leaf.auth_required);
}
