//! Testing utilities.
//!
//! This module provides tools for exercising the client without the network:
//! - `MockTransport` with scripted responses and a call log
//! - JSON fixture builders for the payload shapes the client decodes
//! - Assertion helpers for canonical-instance checks

use async_trait::async_trait;
use parking_lot::Mutex;
use roblox_http::{Error as HttpError, Method, Request, Response, Transport};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

use crate::client::Client;

enum Route {
    Respond(Response),
    Fail(HttpError),
}

/// A transport that answers from a table of scripted routes.
///
/// Routes are keyed by method and exact URL. Unknown routes answer 404.
/// Every call yields to the scheduler once before answering, so operations
/// joined on one task interleave the way they would against a real server.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<(Method, String), Route>>,
    calls: Mutex<Vec<Request>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a response for `method url`.
    pub fn on(self, method: Method, url: impl Into<String>, status: u16, body: Value) -> Self {
        self.respond(method, url, status, body);
        self
    }

    pub fn on_get(self, url: impl Into<String>, status: u16, body: Value) -> Self {
        self.on(Method::Get, url, status, body)
    }

    pub fn on_post(self, url: impl Into<String>, status: u16, body: Value) -> Self {
        self.on(Method::Post, url, status, body)
    }

    /// Script a transport-level failure for `GET url`.
    pub fn fail_get(self, url: impl Into<String>, error: HttpError) -> Self {
        self.routes
            .lock()
            .insert((Method::Get, url.into()), Route::Fail(error));
        self
    }

    /// Replace or add a route on a mock that is already shared.
    pub fn respond(&self, method: Method, url: impl Into<String>, status: u16, body: Value) {
        self.routes
            .lock()
            .insert((method, url.into()), Route::Respond(Response::new(status, body)));
    }

    /// Every request received so far, in order.
    pub fn calls(&self) -> Vec<Request> {
        self.calls.lock().clone()
    }

    /// How many requests hit `url`, any method.
    pub fn call_count(&self, url: &str) -> usize {
        self.calls.lock().iter().filter(|r| r.url == url).count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: Request) -> Result<Response, HttpError> {
        let key = (request.method, request.url.clone());
        self.calls.lock().push(request);
        tokio::task::yield_now().await;

        match self.routes.lock().get(&key) {
            Some(Route::Respond(response)) => Ok(response.clone()),
            Some(Route::Fail(error)) => Err(error.clone()),
            None => Ok(Response::new(
                404,
                json!({ "errors": [{ "code": 0, "message": "NotFound" }] }),
            )),
        }
    }
}

/// A client backed by `mock`, plus a handle to inspect the mock afterwards.
pub fn mock_client(mock: MockTransport) -> (Client, Arc<MockTransport>) {
    let mock = Arc::new(mock);
    (Client::new(mock.clone()), mock)
}

// ============================================================================
// Fixtures
// ============================================================================

/// `users/v1/users/{id}` body.
pub fn user_json(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "displayName": name,
        "description": format!("{name}'s profile"),
        "created": "2006-02-27T21:06:40.3Z",
        "isBanned": false,
    })
}

pub fn role_json(id: i64, name: &str, rank: u8) -> Value {
    json!({ "id": id, "name": name, "rank": rank })
}

/// One entry of `users/{id}/groups/roles`.
pub fn membership_json(group_id: i64, group_name: &str, role: Value) -> Value {
    json!({
        "group": {
            "id": group_id,
            "name": group_name,
            "description": format!("{group_name} description"),
            "memberCount": 10,
        },
        "role": role,
    })
}

/// The `{ user, role }` pair used by wall posts and audit-log entries.
pub fn poster_json(user_id: i64, username: &str, role: Value) -> Value {
    json!({
        "user": { "userId": user_id, "username": username, "displayName": username },
        "role": role,
    })
}

pub fn wall_post_json(id: i64, poster: Value, body: &str) -> Value {
    json!({
        "id": id,
        "poster": poster,
        "body": body,
        "created": "2021-01-01T00:00:00Z",
        "updated": "2021-01-01T00:00:00Z",
    })
}

pub fn message_json(id: i64, sender: (i64, &str), recipient: (i64, &str), subject: &str) -> Value {
    json!({
        "id": id,
        "sender": { "id": sender.0, "name": sender.1, "displayName": sender.1 },
        "recipient": { "id": recipient.0, "name": recipient.1, "displayName": recipient.1 },
        "subject": subject,
        "body": "Hello",
        "created": "2021-01-01T00:00:00Z",
        "updated": "2021-01-01T00:00:00Z",
        "isRead": false,
        "isSystemMessage": false,
        "isReportAbuseDisplayed": false,
    })
}

/// A single-page cursor envelope.
pub fn page_json(data: Vec<Value>) -> Value {
    json!({ "previousPageCursor": null, "nextPageCursor": null, "data": data })
}

// ============================================================================
// Assertion helpers
// ============================================================================

/// Assert that two handles point at the same entity.
#[track_caller]
pub fn assert_same_instance<T>(a: &Arc<T>, b: &Arc<T>) {
    assert!(
        Arc::ptr_eq(a, b),
        "expected the same instance, got two distinct allocations"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_route() {
        let mock = MockTransport::new().on_get("https://x.test/a", 200, json!({ "ok": true }));
        let response = mock.send(Request::get("https://x.test/a")).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body["ok"], true);
        assert_eq!(mock.call_count("https://x.test/a"), 1);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let mock = MockTransport::new();
        let response = mock.send(Request::post("https://x.test/missing")).await.unwrap();
        assert_eq!(response.status, 404);
        assert_eq!(mock.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_method_is_part_of_the_key() {
        let mock = MockTransport::new().on_post("https://x.test/a", 200, Value::Null);
        let response = mock.send(Request::get("https://x.test/a")).await.unwrap();
        assert_eq!(response.status, 404);
    }
}
