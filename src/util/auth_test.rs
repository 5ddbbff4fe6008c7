use super::*;
use crate::net::types::{Role, User};

fn make_user(user_id: &str, role: Role) -> User {
    User {
        user_id: user_id.to_owned(),
        email: format!("{user_id}@example.com"),
        display_name: user_id.to_owned(),
        role,
        created_at: "2025-01-01T00:00:00".to_owned(),
    }
}

fn make_comment(author: &str) -> Comment {
    Comment {
        comment_id: "c1".to_owned(),
        post_id: "p1".to_owned(),
        user_id: author.to_owned(),
        user_email: format!("{author}@example.com"),
        display_name: author.to_owned(),
        content: "hi".to_owned(),
        created_at: "t0".to_owned(),
    }
}

// =============================================================
// should_redirect_unauth
// =============================================================

#[test]
fn should_redirect_unauth_when_anonymous() {
    assert!(should_redirect_unauth(&SessionState::Anonymous));
}

#[test]
fn should_not_redirect_while_unknown() {
    assert!(!should_redirect_unauth(&SessionState::Unknown));
}

#[test]
fn should_not_redirect_when_user_exists() {
    assert!(!should_redirect_unauth(&SessionState::Authenticated(make_user("u1", Role::User))));
}

// =============================================================
// guard_route
// =============================================================

#[test]
fn protected_route_waits_while_unknown() {
    assert_eq!(guard_route(&Route::BlogNew, &SessionState::Unknown), GuardDecision::Pending);
}

#[test]
fn protected_route_redirects_anonymous_to_login() {
    assert_eq!(guard_route(&Route::BlogNew, &SessionState::Anonymous), GuardDecision::Redirect(Route::Login));
}

#[test]
fn protected_route_renders_for_user() {
    let state = SessionState::Authenticated(make_user("u1", Role::User));
    assert_eq!(guard_route(&Route::BlogNew, &state), GuardDecision::Render);
}

#[test]
fn login_redirects_authenticated_user_to_blog() {
    let state = SessionState::Authenticated(make_user("u1", Role::User));
    assert_eq!(guard_route(&Route::Login, &state), GuardDecision::Redirect(Route::Blog));
    assert_eq!(guard_route(&Route::Login, &SessionState::Anonymous), GuardDecision::Render);
}

#[test]
fn public_routes_always_render() {
    for state in [SessionState::Unknown, SessionState::Anonymous] {
        assert_eq!(guard_route(&Route::Home, &state), GuardDecision::Render);
        assert_eq!(guard_route(&Route::BlogPost("p".to_owned()), &state), GuardDecision::Render);
    }
}

// =============================================================
// Action checks
// =============================================================

#[test]
fn require_admin_distinguishes_reasons() {
    assert_eq!(require_admin(&SessionState::Anonymous), Err(AccessDenied::NotAuthenticated));
    assert_eq!(
        require_admin(&SessionState::Authenticated(make_user("u1", Role::User))),
        Err(AccessDenied::NotAdmin)
    );
    assert_eq!(require_admin(&SessionState::Authenticated(make_user("root", Role::Admin))), Ok(()));
}

#[test]
fn author_can_delete_own_comment() {
    let state = SessionState::Authenticated(make_user("u1", Role::User));
    assert!(can_delete_comment(&state, &make_comment("u1")));
    assert!(!can_delete_comment(&state, &make_comment("u2")));
}

#[test]
fn admin_can_delete_any_comment() {
    let state = SessionState::Authenticated(make_user("root", Role::Admin));
    assert!(can_delete_comment(&state, &make_comment("u2")));
}

#[test]
fn anonymous_cannot_delete_comments() {
    assert!(!can_delete_comment(&SessionState::Anonymous, &make_comment("u1")));
    assert_eq!(
        require_comment_delete(&SessionState::Anonymous, &make_comment("u1")),
        Err(AccessDenied::NotAuthenticated)
    );
}
