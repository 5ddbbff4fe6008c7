use super::*;
use crate::net::testing::{FakeTransport, user_json};
use crate::net::transport::Method;
use crate::state::session::SessionCell;
use crate::util::shadow::MemoryShadow;
use serde_json::{Value, json};
use std::sync::Arc;

fn make_store() -> (SessionStore, Arc<FakeTransport>) {
    let transport = Arc::new(FakeTransport::new());
    let session = Arc::new(SessionCell::new(Arc::new(MemoryShadow::new())));
    let api = Arc::new(ApiClient::new(transport.clone(), session));
    (SessionStore::new(api), transport)
}

fn experience_json(experience_id: &str, order: i64) -> Value {
    json!({
        "experience_id": experience_id, "company": "Acme", "role": "Engineer", "location": "Remote",
        "start_date": "Jan. 2024", "end_date": "Present", "bullets": ["built things"], "order": order
    })
}

fn project_json(project_id: &str, order: i64) -> Value {
    json!({
        "project_id": project_id, "title": "Site", "tech_stack": "Rust", "date_range": "2025",
        "bullets": ["shipped"], "order": order
    })
}

fn new_project() -> NewProject {
    NewProject {
        title: "Site".to_owned(),
        tech_stack: "Rust".to_owned(),
        date_range: "2025".to_owned(),
        bullets: vec!["shipped".to_owned()],
        github_url: None,
        live_url: None,
        cover_image_url: None,
        order: 0,
    }
}

#[tokio::test]
async fn experiences_are_sorted_by_order() {
    let (store, transport) = make_store();
    transport.reply(
        Method::Get,
        "/api/experiences",
        200,
        json!({ "experiences": [experience_json("b", 2), experience_json("a", 1)], "count": 2 }),
    );
    let items = load_experiences(store.api()).await.unwrap();
    let ids: Vec<&str> = items.iter().map(|e| e.experience_id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[tokio::test]
async fn projects_failure_uses_fixed_message() {
    let (store, transport) = make_store();
    transport.fail(Method::Get, "/api/projects", "timeout");
    assert_eq!(
        load_projects(store.api()).await.unwrap_err(),
        PageError::Message(LOAD_PROJECTS_FAILED.to_owned())
    );
}

#[tokio::test]
async fn projects_are_sorted_by_order() {
    let (store, transport) = make_store();
    transport.reply(
        Method::Get,
        "/api/projects",
        200,
        json!({ "projects": [project_json("z", 5), project_json("y", 0)], "count": 2 }),
    );
    let items = load_projects(store.api()).await.unwrap();
    assert_eq!(items[0].project_id, "y");
}

#[tokio::test]
async fn anonymous_project_create_redirects() {
    let (store, transport) = make_store();
    assert_eq!(
        create_project(&store, &new_project()).await.unwrap_err(),
        PageError::Redirect(crate::routes::Route::Login)
    );
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn admin_project_create_reaches_backend() {
    let (store, transport) = make_store();
    transport.reply(Method::Post, "/api/auth/login", 200, json!({ "user": user_json("root", "admin") }));
    transport.reply(Method::Post, "/api/projects", 200, project_json("p9", 0));
    store.login("root@example.com", "pw").await.unwrap();

    let created = create_project(&store, &new_project()).await.unwrap();
    assert_eq!(created.project_id, "p9");
}

#[tokio::test]
async fn admin_delete_experience_surfaces_server_detail() {
    let (store, transport) = make_store();
    transport.reply(Method::Post, "/api/auth/login", 200, json!({ "user": user_json("root", "admin") }));
    transport.reply(Method::Delete, "/api/experiences/e1", 404, json!({ "detail": "Experience not found." }));
    store.login("root@example.com", "pw").await.unwrap();

    assert_eq!(
        delete_experience(&store, "e1").await.unwrap_err(),
        PageError::Message("Experience not found.".to_owned())
    );
}
