//! # Reconcile
//!
//! Declarative reconciliation of Semaphore components over its REST API.
//!
//! Given a desired attribute set and a target state (present/absent), the
//! engine looks the resource up by name and issues the minimal create,
//! update or delete request to converge the server to it.
//!
//! ## Core Concepts
//!
//! - **Descriptor**: shapes caller parameters into a collection path and a
//!   request body for one resource kind (see [`descriptor`], [`kinds`])
//! - **Endpoint**: base URL, collection path and bearer token
//! - **Reconciler**: the engine, performing list/create/update/delete calls
//! - **Transport**: the injected HTTP client (see [`transport`])
//! - **Outcome**: created, updated, deleted or noop
//!
//! ## Example
//!
//! ```no_run
//! use reconcile::{converge, kinds, AttributeSet, Report, TargetState};
//! use reconcile::transport::http::UreqTransport;
//!
//! let params = AttributeSet::new()
//!     .with("name", "Test inventory")
//!     .with("project_id", 1)
//!     .with("type", "file")
//!     .with("inventory", "/tmp/inventory.yml");
//!
//! let outcome = converge(
//!     &kinds::inventory(),
//!     &params,
//!     "http://localhost:3000/api",
//!     "token",
//!     TargetState::Present,
//!     UreqTransport::new(),
//! )?;
//!
//! println!("{}", serde_json::to_string_pretty(&Report::from(outcome)).unwrap());
//! # Ok::<(), reconcile::Error>(())
//! ```
//!
//! ## Concurrency
//!
//! Everything is blocking and sequential. Reconciling the same resource name
//! from several places at once must be serialized by the caller.

pub mod descriptor;
pub mod endpoint;
pub mod engine;
pub mod error;
pub mod kinds;
pub mod transport;
pub mod types;

// Re-export main types at crate root
pub use descriptor::{Collection, Descriptor, Nested, PathParam, Shape};
pub use endpoint::Endpoint;
pub use engine::Reconciler;
pub use error::{Error, ErrorCategory, Phase, Result};
pub use transport::{MockTransport, Transport};
pub use types::{
    AttributeSet, AttributeValue, Failure, Outcome, RecordId, RemoteRecord, Report, TargetState,
};

/// Shape `params` with `descriptor` and converge the remote resource to `state`
///
/// Configuration errors (missing name, missing path parameter, invalid url
/// or token) are reported before any request is sent.
pub fn converge<D, T>(
    descriptor: &D,
    params: &AttributeSet,
    url: &str,
    token: &str,
    state: TargetState,
    transport: T,
) -> Result<Outcome>
where
    D: Descriptor + ?Sized,
    T: Transport,
{
    let shape = descriptor.shape(params)?;
    let endpoint = Endpoint::new(url, &shape.path, token)?;
    Reconciler::new(endpoint, transport)
        .with_kind(descriptor.kind())
        .reconcile(&shape.attributes, state)
}
