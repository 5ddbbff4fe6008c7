//! Experience and project listings, plus their admin edits.

#[cfg(test)]
#[path = "content_test.rs"]
mod content_test;

use super::{PageError, api_failure, load_failure};
use crate::net::api::ApiClient;
use crate::net::types::{Experience, ExperienceUpdate, NewExperience, NewProject, Project, ProjectUpdate};
use crate::state::store::SessionStore;
use crate::util::auth::require_admin;

pub const LOAD_EXPERIENCE_FAILED: &str = "Failed to load experience.";
pub const LOAD_PROJECTS_FAILED: &str = "Failed to load projects.";
pub const SAVE_FAILED: &str = "Failed to save changes.";
pub const DELETE_FAILED: &str = "Failed to delete item.";

/// Experiences in display order (lower `order` first).
///
/// # Errors
///
/// Returns a fixed inline message when the list cannot be fetched.
pub async fn load_experiences(api: &ApiClient) -> Result<Vec<Experience>, PageError> {
    let mut items = api.list_experiences().await.map_err(|e| load_failure(&e, LOAD_EXPERIENCE_FAILED))?;
    items.sort_by_key(|item| item.order);
    Ok(items)
}

/// Projects in display order (lower `order` first).
///
/// # Errors
///
/// Returns a fixed inline message when the list cannot be fetched.
pub async fn load_projects(api: &ApiClient) -> Result<Vec<Project>, PageError> {
    let mut items = api.list_projects().await.map_err(|e| load_failure(&e, LOAD_PROJECTS_FAILED))?;
    items.sort_by_key(|item| item.order);
    Ok(items)
}

// =============================================================================
// ADMIN EDITS
// =============================================================================

/// # Errors
///
/// Refuses non-admins; API failures are inline with the server's detail.
pub async fn create_experience(store: &SessionStore, data: &NewExperience) -> Result<Experience, PageError> {
    require_admin(&store.state())?;
    store.api().create_experience(data).await.map_err(|e| api_failure(&e, SAVE_FAILED))
}

/// # Errors
///
/// Refuses non-admins; API failures are inline with the server's detail.
pub async fn update_experience(
    store: &SessionStore,
    experience_id: &str,
    data: &ExperienceUpdate,
) -> Result<Experience, PageError> {
    require_admin(&store.state())?;
    store.api().update_experience(experience_id, data).await.map_err(|e| api_failure(&e, SAVE_FAILED))
}

/// # Errors
///
/// Refuses non-admins; API failures are inline.
pub async fn delete_experience(store: &SessionStore, experience_id: &str) -> Result<(), PageError> {
    require_admin(&store.state())?;
    store.api().delete_experience(experience_id).await.map_err(|e| api_failure(&e, DELETE_FAILED))
}

/// # Errors
///
/// Refuses non-admins; API failures are inline with the server's detail.
pub async fn create_project(store: &SessionStore, data: &NewProject) -> Result<Project, PageError> {
    require_admin(&store.state())?;
    store.api().create_project(data).await.map_err(|e| api_failure(&e, SAVE_FAILED))
}

/// # Errors
///
/// Refuses non-admins; API failures are inline with the server's detail.
pub async fn update_project(store: &SessionStore, project_id: &str, data: &ProjectUpdate) -> Result<Project, PageError> {
    require_admin(&store.state())?;
    store.api().update_project(project_id, data).await.map_err(|e| api_failure(&e, SAVE_FAILED))
}

/// # Errors
///
/// Refuses non-admins; API failures are inline.
pub async fn delete_project(store: &SessionStore, project_id: &str) -> Result<(), PageError> {
    require_admin(&store.state())?;
    store.api().delete_project(project_id).await.map_err(|e| api_failure(&e, DELETE_FAILED))
}
