use super::*;
use serde_json::json;

// =============================================================
// Role
// =============================================================

#[test]
fn role_admin_parses_as_elevated() {
    let role: Role = serde_json::from_value(json!("admin")).unwrap();
    assert_eq!(role, Role::Admin);
}

#[test]
fn role_unknown_value_is_ordinary() {
    let role: Role = serde_json::from_value(json!("moderator")).unwrap();
    assert_eq!(role, Role::User);
}

#[test]
fn role_serializes_lowercase() {
    assert_eq!(serde_json::to_value(Role::Admin).unwrap(), json!("admin"));
    assert_eq!(serde_json::to_value(Role::User).unwrap(), json!("user"));
}

// =============================================================
// User / AuthResponse
// =============================================================

#[test]
fn auth_response_ignores_access_token() {
    let body = json!({
        "access_token": "jwt",
        "token_type": "bearer",
        "user": {
            "user_id": "u1",
            "email": "a@b.com",
            "display_name": "A",
            "role": "user",
            "created_at": "2025-01-01T00:00:00"
        }
    });
    let parsed: AuthResponse = serde_json::from_value(body).unwrap();
    assert_eq!(parsed.user.user_id, "u1");
    assert!(!parsed.user.is_admin());
}

#[test]
fn user_shadow_form_matches_wire_form() {
    let user = User {
        user_id: "u9".to_owned(),
        email: "admin@example.com".to_owned(),
        display_name: "Admin".to_owned(),
        role: Role::Admin,
        created_at: "2025-02-02T10:00:00".to_owned(),
    };
    let raw = serde_json::to_value(&user).unwrap();
    assert_eq!(raw["role"], json!("admin"));
    let back: User = serde_json::from_value(raw).unwrap();
    assert_eq!(back, user);
}

// =============================================================
// Content payloads
// =============================================================

#[test]
fn blog_post_defaults_optional_fields() {
    let body = json!({
        "post_id": "p1",
        "title": "Hello",
        "summary": "s",
        "content": "c",
        "author_name": "Admin",
        "created_at": "t0",
        "updated_at": "t1"
    });
    let post: BlogPost = serde_json::from_value(body).unwrap();
    assert!(post.tags.is_empty());
    assert!(post.is_published);
    assert_eq!(post.cover_image_url, None);
}

#[test]
fn blog_post_update_skips_absent_fields() {
    let update = BlogPostUpdate { title: Some("New".to_owned()), ..BlogPostUpdate::default() };
    assert_eq!(serde_json::to_value(&update).unwrap(), json!({ "title": "New" }));
}

#[test]
fn experience_update_empty_serializes_to_empty_object() {
    assert_eq!(serde_json::to_value(ExperienceUpdate::default()).unwrap(), json!({}));
}

#[test]
fn comment_list_parses_envelope() {
    let body = json!({
        "comments": [{
            "comment_id": "c1",
            "post_id": "p1",
            "user_id": "u1",
            "user_email": "a@b.com",
            "display_name": "A",
            "content": "hi",
            "created_at": "t0"
        }],
        "count": 1
    });
    let list: CommentList = serde_json::from_value(body).unwrap();
    assert_eq!(list.count, 1);
    assert_eq!(list.comments[0].content, "hi");
}
