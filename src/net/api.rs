//! REST API client for the portfolio backend.
//!
//! One method per endpoint. Every call goes through [`ApiClient::execute`],
//! which is the only place that interprets HTTP status codes.
//!
//! ERROR HANDLING
//! ==============
//! A 401 from any endpoint drops the local session (shadow + in-memory user)
//! and emits `SessionEvent::Invalidated`, then still fails the call with
//! `ApiError::Unauthorized` so the caller can stop what it was doing. Other
//! failures pass through untouched. No retries.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::broadcast;

use super::error::ApiError;
use super::transport::{HttpRequest, HttpResponse, Transport};
use super::types::{
    AuthResponse, BlogPost, BlogPostList, BlogPostUpdate, Comment, CommentList, Experience, ExperienceList,
    ExperienceUpdate, HealthStatus, LoginRequest, NewBlogPost, NewComment, NewExperience, NewProject, Project,
    ProjectList, ProjectUpdate, RegisterRequest, User,
};
use crate::state::session::{SessionCell, SessionEvent};

fn experience_endpoint(experience_id: &str) -> String {
    format!("/api/experiences/{experience_id}")
}

fn project_endpoint(project_id: &str) -> String {
    format!("/api/projects/{project_id}")
}

fn post_endpoint(post_id: &str) -> String {
    format!("/api/blog/{post_id}")
}

fn comments_endpoint(post_id: &str) -> String {
    format!("/api/blog/{post_id}/comments")
}

fn comment_endpoint(post_id: &str, comment_id: &str) -> String {
    format!("/api/blog/{post_id}/comments/{comment_id}")
}

pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: Arc<SessionCell>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, session: Arc<SessionCell>) -> Self {
        Self { transport, session }
    }

    /// Session slot this client invalidates on 401.
    ///
    /// ```compile_fail
    /// fn drop_session(api: &portal::net::api::ApiClient) {
    ///     let _ = api.session();
    /// }
    /// ```
    #[must_use]
    pub(crate) fn session(&self) -> &Arc<SessionCell> {
        &self.session
    }

    /// Receive a [`SessionEvent::Invalidated`] for every server-side rejection.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.session.events()
    }

    // =========================================================================
    // CORE
    // =========================================================================

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let epoch = self.session.epoch();
        let path = request.path.clone();
        let response = self.transport.send(request).await?;
        match response.status {
            200..=299 => Ok(response),
            401 => {
                if self.session.invalidate(epoch) {
                    tracing::warn!(%path, "request rejected; session cleared");
                }
                Err(ApiError::Unauthorized { body: response.body })
            }
            status => Err(ApiError::Status { status, body: response.body }),
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T, ApiError> {
        let response = self.execute(request).await?;
        serde_json::from_value(response.body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn discard(&self, request: HttpRequest) -> Result<(), ApiError> {
        self.execute(request).await.map(|_| ())
    }

    // =========================================================================
    // AUTH
    // =========================================================================

    /// `POST /api/auth/login`.
    ///
    /// # Errors
    ///
    /// Bad credentials come back as `ApiError::Unauthorized`.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let body = to_body(&LoginRequest { email, password })?;
        let auth: AuthResponse = self.fetch(HttpRequest::post("/api/auth/login", Some(body))).await?;
        Ok(auth.user)
    }

    /// `POST /api/auth/register`.
    ///
    /// # Errors
    ///
    /// Validation failures come back as `ApiError::Status` with a list `detail`.
    pub async fn register(&self, email: &str, password: &str, display_name: &str) -> Result<User, ApiError> {
        let body = to_body(&RegisterRequest { email, password, display_name })?;
        let auth: AuthResponse = self.fetch(HttpRequest::post("/api/auth/register", Some(body))).await?;
        Ok(auth.user)
    }

    /// `POST /api/auth/logout`. Idempotent on the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; callers may ignore it.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.discard(HttpRequest::post("/api/auth/logout", None)).await
    }

    /// `GET /api/auth/me`: validate the session credential.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` when the session is gone.
    pub async fn me(&self) -> Result<User, ApiError> {
        self.fetch(HttpRequest::get("/api/auth/me")).await
    }

    /// `GET /api/health`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or unhealthy.
    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.fetch(HttpRequest::get("/api/health")).await
    }

    // =========================================================================
    // EXPERIENCES
    // =========================================================================

    /// # Errors
    ///
    /// Returns an error if the request or decoding fails.
    pub async fn list_experiences(&self) -> Result<Vec<Experience>, ApiError> {
        let list: ExperienceList = self.fetch(HttpRequest::get("/api/experiences")).await?;
        Ok(list.experiences)
    }

    /// # Errors
    ///
    /// Returns an error if the request or decoding fails.
    pub async fn create_experience(&self, data: &NewExperience) -> Result<Experience, ApiError> {
        self.fetch(HttpRequest::post("/api/experiences", Some(to_body(data)?))).await
    }

    /// # Errors
    ///
    /// Returns an error if the request or decoding fails.
    pub async fn update_experience(&self, experience_id: &str, data: &ExperienceUpdate) -> Result<Experience, ApiError> {
        self.fetch(HttpRequest::put(experience_endpoint(experience_id), to_body(data)?)).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_experience(&self, experience_id: &str) -> Result<(), ApiError> {
        self.discard(HttpRequest::delete(experience_endpoint(experience_id))).await
    }

    // =========================================================================
    // PROJECTS
    // =========================================================================

    /// # Errors
    ///
    /// Returns an error if the request or decoding fails.
    pub async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        let list: ProjectList = self.fetch(HttpRequest::get("/api/projects")).await?;
        Ok(list.projects)
    }

    /// # Errors
    ///
    /// Returns an error if the request or decoding fails.
    pub async fn create_project(&self, data: &NewProject) -> Result<Project, ApiError> {
        self.fetch(HttpRequest::post("/api/projects", Some(to_body(data)?))).await
    }

    /// # Errors
    ///
    /// Returns an error if the request or decoding fails.
    pub async fn update_project(&self, project_id: &str, data: &ProjectUpdate) -> Result<Project, ApiError> {
        self.fetch(HttpRequest::put(project_endpoint(project_id), to_body(data)?)).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_project(&self, project_id: &str) -> Result<(), ApiError> {
        self.discard(HttpRequest::delete(project_endpoint(project_id))).await
    }

    // =========================================================================
    // BLOG
    // =========================================================================

    /// # Errors
    ///
    /// Returns an error if the request or decoding fails.
    pub async fn list_posts(&self) -> Result<Vec<BlogPost>, ApiError> {
        let list: BlogPostList = self.fetch(HttpRequest::get("/api/blog")).await?;
        Ok(list.posts)
    }

    /// # Errors
    ///
    /// Returns an error if the request or decoding fails.
    pub async fn get_post(&self, post_id: &str) -> Result<BlogPost, ApiError> {
        self.fetch(HttpRequest::get(post_endpoint(post_id))).await
    }

    /// # Errors
    ///
    /// Returns an error if the request or decoding fails.
    pub async fn create_post(&self, data: &NewBlogPost) -> Result<BlogPost, ApiError> {
        self.fetch(HttpRequest::post("/api/blog", Some(to_body(data)?))).await
    }

    /// # Errors
    ///
    /// Returns an error if the request or decoding fails.
    pub async fn update_post(&self, post_id: &str, data: &BlogPostUpdate) -> Result<BlogPost, ApiError> {
        self.fetch(HttpRequest::put(post_endpoint(post_id), to_body(data)?)).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_post(&self, post_id: &str) -> Result<(), ApiError> {
        self.discard(HttpRequest::delete(post_endpoint(post_id))).await
    }

    // =========================================================================
    // COMMENTS
    // =========================================================================

    /// # Errors
    ///
    /// Returns an error if the request or decoding fails.
    pub async fn list_comments(&self, post_id: &str) -> Result<Vec<Comment>, ApiError> {
        let list: CommentList = self.fetch(HttpRequest::get(comments_endpoint(post_id))).await?;
        Ok(list.comments)
    }

    /// # Errors
    ///
    /// Returns an error if the request or decoding fails.
    pub async fn create_comment(&self, post_id: &str, content: &str) -> Result<Comment, ApiError> {
        let body = to_body(&NewComment { content })?;
        self.fetch(HttpRequest::post(comments_endpoint(post_id), Some(body))).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_comment(&self, post_id: &str, comment_id: &str) -> Result<(), ApiError> {
        self.discard(HttpRequest::delete(comment_endpoint(post_id, comment_id))).await
    }
}

fn to_body<T: Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}
