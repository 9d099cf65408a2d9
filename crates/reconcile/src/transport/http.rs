//! Blocking HTTP transport backed by `ureq`.

use crate::transport::{Method, Request, Response, Transport, TransportError};

/// Transport that performs real HTTP requests.
///
/// Non-2xx statuses are returned as responses, not errors, so the engine can
/// report the status code together with the body the server sent. Bodies are
/// read as bytes whatever their encoding or size. No timeout
/// is configured beyond ureq's defaults.
///
/// # Example
///
/// ```no_run
/// use reconcile::transport::http::UreqTransport;
/// use reconcile::transport::{Method, Request, Transport};
///
/// let transport = UreqTransport::new();
/// let response = transport
///     .send(&Request::new(Method::Get, "http://localhost:3000/api/projects", "token"))
///     .unwrap();
/// println!("{} {}", response.status, response.text());
/// ```
pub struct UreqTransport {
    /// HTTP agent for requests.
    agent: ureq::Agent,
}

impl UreqTransport {
    /// Create a transport with a fresh agent.
    #[must_use]
    pub fn new() -> Self {
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &Request) -> Result<Response, TransportError> {
        let url = request.url.as_str();
        let auth = format!("Bearer {}", request.token);
        let body = request.body.as_deref().unwrap_or_default();

        let result = match request.method {
            Method::Get => self
                .agent
                .get(url)
                .header("Authorization", auth.as_str())
                .header("Accept", "application/json")
                .call(),
            Method::Delete => self
                .agent
                .delete(url)
                .header("Authorization", auth.as_str())
                .header("Accept", "application/json")
                .call(),
            Method::Post => self
                .agent
                .post(url)
                .header("Authorization", auth.as_str())
                .header("Accept", "application/json")
                .header("Content-Type", "application/json")
                .send(body),
            Method::Put => self
                .agent
                .put(url)
                .header("Authorization", auth.as_str())
                .header("Accept", "application/json")
                .header("Content-Type", "application/json")
                .send(body),
        };

        let mut response = result.map_err(|e| TransportError(e.to_string()))?;
        let status = response.status().as_u16();
        // Raw bytes, without ureq's default size cap. Decoding is up to the engine.
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(|e| TransportError(e.to_string()))?;

        Ok(Response { status, body })
    }
}
