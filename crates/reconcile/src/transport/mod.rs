//! HTTP transport abstraction.
//!
//! The engine talks to the API through the [`Transport`] trait, so the HTTP
//! client is injected rather than looked up globally. [`http::UreqTransport`]
//! is the real implementation; [`MockTransport`] replays scripted responses
//! and records every request for tests.
//!
//! # Testing
//!
//! ```
//! use reconcile::transport::{Method, MockTransport, Request, Response, Transport};
//!
//! let mock = MockTransport::new();
//! mock.push(Response::new(200, "[]"));
//!
//! let response = mock
//!     .send(&Request::new(Method::Get, "http://localhost/api/projects", "token"))
//!     .unwrap();
//! assert_eq!(response.status, 200);
//! assert_eq!(mock.requests().len(), 1);
//! ```

pub mod http;

use std::borrow::Cow;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// HTTP methods used by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single API request
#[derive(Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    /// Bearer token sent in the `Authorization` header
    pub token: String,
    /// Serialized JSON body
    pub body: Option<String>,
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            token: token.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Parse the body back into JSON
    pub fn json(&self) -> Option<serde_json::Value> {
        self.body.as_deref().and_then(|b| serde_json::from_str(b).ok())
    }
}

// The token stays out of debug output.
impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("token", &"<redacted>")
            .field("body", &self.body)
            .finish()
    }
}

/// Status and raw body of an API response
///
/// The body is kept as bytes; servers are not trusted to send UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// A response with an empty body, e.g. `204 No Content`
    pub fn empty(status: u16) -> Self {
        Self::new(status, Vec::new())
    }

    /// Body as text, with invalid UTF-8 replaced
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// A response carrying a JSON document
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self::new(status, body.to_string())
    }
}

/// The request could not be completed (connection, DNS, TLS, timeout)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Sends requests to the API.
///
/// Implementations must return every response the server produced,
/// whatever its status; only failures to obtain a response are errors.
pub trait Transport: Send + Sync {
    fn send(&self, request: &Request) -> Result<Response, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: &Request) -> Result<Response, TransportError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: &Request) -> Result<Response, TransportError> {
        (**self).send(request)
    }
}

/// Scripted transport for testing without network access.
///
/// Responses are returned in the order they were pushed. Clones share the
/// same script and request log.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<VecDeque<Result<Response, TransportError>>>>,
    requests: Arc<Mutex<Vec<Request>>>,
}

impl MockTransport {
    /// Create a mock with an empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response
    pub fn push(&self, response: Response) {
        lock(&self.responses).push_back(Ok(response));
    }

    /// Queue a transport failure
    pub fn push_error(&self, message: impl Into<String>) {
        lock(&self.responses).push_back(Err(TransportError(message.into())));
    }

    /// Every request sent so far, in order
    pub fn requests(&self) -> Vec<Request> {
        lock(&self.requests).clone()
    }

    /// Number of scripted responses not yet consumed
    pub fn remaining(&self) -> usize {
        lock(&self.responses).len()
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &Request) -> Result<Response, TransportError> {
        lock(&self.requests).push(request.clone());
        lock(&self.responses).pop_front().unwrap_or_else(|| {
            Err(TransportError(format!(
                "no scripted response for {} {}",
                request.method, request.url
            )))
        })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
