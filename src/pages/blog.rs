//! Blog pages: post list, post detail with comments, and the post editor.
//!
//! SYSTEM CONTEXT
//! ==============
//! Reading is public. Commenting needs a session, deleting a comment needs
//! authorship or the admin role, and deleting or editing a post needs the
//! admin role. Each check reads the store at the moment of the action.

#[cfg(test)]
#[path = "blog_test.rs"]
mod blog_test;

use super::{PageError, api_failure, load_failure};
use crate::net::api::ApiClient;
use crate::net::types::{BlogPost, BlogPostUpdate, Comment, NewBlogPost};
use crate::routes::Route;
use crate::state::store::SessionStore;
use crate::util::auth::{can_delete_comment, require_admin, require_comment_delete, require_user};

pub const LOAD_POSTS_FAILED: &str = "Failed to load blog posts.";
pub const LOAD_POST_FAILED: &str = "Failed to load blog post.";
pub const DELETE_POST_FAILED: &str = "Failed to delete post.";
pub const POST_COMMENT_FAILED: &str = "Failed to post comment.";
pub const DELETE_COMMENT_FAILED: &str = "Failed to delete comment.";
pub const CREATE_POST_FAILED: &str = "Failed to create post.";
pub const UPDATE_POST_FAILED: &str = "Failed to update post.";

// =============================================================================
// LIST
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct BlogListPage {
    pub posts: Vec<BlogPost>,
    /// Whether to offer "new post"; the server still enforces the role.
    pub can_create: bool,
}

impl BlogListPage {
    /// # Errors
    ///
    /// Returns a fixed inline message when the posts cannot be fetched.
    pub async fn load(store: &SessionStore) -> Result<Self, PageError> {
        let posts = store.api().list_posts().await.map_err(|e| load_failure(&e, LOAD_POSTS_FAILED))?;
        Ok(Self { posts, can_create: store.is_admin() })
    }
}

// =============================================================================
// DETAIL
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct BlogDetailPage {
    pub post: BlogPost,
    pub comments: Vec<Comment>,
}

impl BlogDetailPage {
    /// Fetch the post and its comments together.
    ///
    /// # Errors
    ///
    /// Returns a fixed inline message if either request fails.
    pub async fn load(api: &ApiClient, post_id: &str) -> Result<Self, PageError> {
        let (post, comments) = futures::try_join!(api.get_post(post_id), api.list_comments(post_id))
            .map_err(|e| load_failure(&e, LOAD_POST_FAILED))?;
        Ok(Self { post, comments })
    }

    /// Whether to show a delete control for `comment`.
    #[must_use]
    pub fn can_delete(&self, store: &SessionStore, comment: &Comment) -> bool {
        can_delete_comment(&store.state(), comment)
    }

    /// Post a comment and append it to the page.
    ///
    /// # Errors
    ///
    /// Redirects anonymous visitors to login; other failures are inline.
    pub async fn submit_comment(&mut self, store: &SessionStore, text: &str) -> Result<&Comment, PageError> {
        require_user(&store.state())?;
        let text = text.trim();
        if text.is_empty() {
            return Err(PageError::Message("Write a comment first.".to_owned()));
        }
        let comment = store
            .api()
            .create_comment(&self.post.post_id, text)
            .await
            .map_err(|e| load_failure(&e, POST_COMMENT_FAILED))?;
        self.comments.push(comment);
        self.comments.last().ok_or_else(|| PageError::Message(POST_COMMENT_FAILED.to_owned()))
    }

    /// Delete one comment, re-checking permission against live state.
    ///
    /// # Errors
    ///
    /// Refuses when the session may not delete it; API failures are inline.
    pub async fn delete_comment(&mut self, store: &SessionStore, comment_id: &str) -> Result<(), PageError> {
        let Some(comment) = self.comments.iter().find(|c| c.comment_id == comment_id) else {
            return Err(PageError::Message("Comment not found.".to_owned()));
        };
        require_comment_delete(&store.state(), comment)?;
        store
            .api()
            .delete_comment(&self.post.post_id, comment_id)
            .await
            .map_err(|e| load_failure(&e, DELETE_COMMENT_FAILED))?;
        self.comments.retain(|c| c.comment_id != comment_id);
        Ok(())
    }

    /// Delete the post (admin only) and return where to go next.
    ///
    /// # Errors
    ///
    /// Refuses non-admins; API failures are inline.
    pub async fn delete_post(&self, store: &SessionStore) -> Result<Route, PageError> {
        require_admin(&store.state())?;
        store.api().delete_post(&self.post.post_id).await.map_err(|e| load_failure(&e, DELETE_POST_FAILED))?;
        Ok(Route::Blog)
    }
}

// =============================================================================
// EDITOR
// =============================================================================

/// Draft state for the "new post" page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlogDraft {
    pub title: String,
    pub summary: String,
    pub content: String,
    pub tags: Vec<String>,
    pub cover_image_url: Option<String>,
}

impl BlogDraft {
    /// Add a trimmed, non-empty tag once.
    pub fn add_tag(&mut self, raw: &str) -> bool {
        let tag = raw.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_owned());
        true
    }

    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.retain(|t| t != tag);
    }

    /// Publish the draft.
    ///
    /// # Errors
    ///
    /// Redirects anonymous visitors to login; API failures are inline with
    /// the server's detail when present.
    pub async fn submit(&self, store: &SessionStore) -> Result<Route, PageError> {
        require_user(&store.state())?;
        let post = NewBlogPost {
            title: self.title.clone(),
            summary: self.summary.clone(),
            content: self.content.clone(),
            tags: self.tags.clone(),
            cover_image_url: self.cover_image_url.clone(),
        };
        store.api().create_post(&post).await.map_err(|e| api_failure(&e, CREATE_POST_FAILED))?;
        Ok(Route::Blog)
    }
}

/// Apply a partial edit to a post (admin only).
///
/// # Errors
///
/// Refuses non-admins; API failures are inline with the server's detail.
pub async fn update_post(store: &SessionStore, post_id: &str, update: &BlogPostUpdate) -> Result<BlogPost, PageError> {
    require_admin(&store.state())?;
    store.api().update_post(post_id, update).await.map_err(|e| api_failure(&e, UPDATE_POST_FAILED))
}
