//! In-memory transport for unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::Barrier;

use super::error::ApiError;
use super::transport::{HttpRequest, HttpResponse, Method, Transport};

type Reply = Result<HttpResponse, ApiError>;

/// Scripted transport: each `(method, path)` answers with a fixed reply.
/// Unscripted routes answer 404.
#[derive(Default)]
pub(crate) struct FakeTransport {
    replies: Mutex<HashMap<(Method, String), Reply>>,
    requests: Mutex<Vec<HttpRequest>>,
    gate: Option<Arc<Barrier>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Hold every request until `n` requests are in flight together.
    pub(crate) fn gated(n: usize) -> Self {
        Self { gate: Some(Arc::new(Barrier::new(n))), ..Self::default() }
    }

    pub(crate) fn reply(&self, method: Method, path: &str, status: u16, body: Value) {
        self.lock_replies().insert((method, path.to_owned()), Ok(HttpResponse { status, body }));
    }

    pub(crate) fn fail(&self, method: Method, path: &str, message: &str) {
        self.lock_replies().insert((method, path.to_owned()), Err(ApiError::Transport(message.to_owned())));
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub(crate) fn count(&self, method: Method, path: &str) -> usize {
        self.requests().iter().filter(|r| r.method == method && r.path == path).count()
    }

    fn lock_replies(&self) -> std::sync::MutexGuard<'_, HashMap<(Method, String), Reply>> {
        self.replies.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let key = (request.method, request.path.clone());
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).push(request);
        if let Some(gate) = &self.gate {
            gate.wait().await;
        }
        self.lock_replies()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Ok(HttpResponse { status: 404, body: json!({ "detail": "Not Found" }) }))
    }
}

/// Wire form of a user record for scripted replies.
pub(crate) fn user_json(user_id: &str, role: &str) -> Value {
    json!({
        "user_id": user_id,
        "email": format!("{user_id}@example.com"),
        "display_name": format!("User {user_id}"),
        "role": role,
        "created_at": "2025-01-01T00:00:00"
    })
}

pub(crate) fn unauthorized_body() -> Value {
    json!({ "detail": "Not authenticated." })
}
