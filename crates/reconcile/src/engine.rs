//! Reconciliation engine - converges one remote resource to its desired state
//!
//! Every invocation runs `Lookup → {Create | Update | Delete | Noop}` once,
//! issuing requests strictly in sequence. Nothing is retried: the first
//! failed request ends the reconciliation. A failure after a successful
//! mutation (a failed re-read after an update) leaves the server changed;
//! such failures carry [`Phase::Refresh`].

use crate::endpoint::Endpoint;
use crate::error::{Error, Phase, Result};
use crate::transport::{Method, Request, Response, Transport};
use crate::types::{AttributeSet, ID, Outcome, RecordId, RemoteRecord, TargetState};

const STATUS_OK: u16 = 200;
const STATUS_CREATED: u16 = 201;
const STATUS_NO_CONTENT: u16 = 204;

/// Engine bound to one collection endpoint
///
/// # Example
///
/// ```no_run
/// use reconcile::{AttributeSet, Endpoint, Reconciler, TargetState};
/// use reconcile::transport::http::UreqTransport;
///
/// let endpoint = Endpoint::new("http://localhost:3000/api", "/project/1/inventory", "token")?;
/// let engine = Reconciler::new(endpoint, UreqTransport::new());
///
/// let desired = AttributeSet::new()
///     .with("name", "Test inventory")
///     .with("type", "file")
///     .with("inventory", "/tmp/inventory.yml");
/// let outcome = engine.reconcile(&desired, TargetState::Present)?;
/// println!("{}", outcome.label());
/// # Ok::<(), reconcile::Error>(())
/// ```
#[derive(Debug)]
pub struct Reconciler<T> {
    endpoint: Endpoint,
    transport: T,
    kind: String,
}

impl<T: Transport> Reconciler<T> {
    /// Create an engine for the given endpoint and transport
    pub fn new(endpoint: Endpoint, transport: T) -> Self {
        Self {
            endpoint,
            transport,
            kind: "component".to_string(),
        }
    }

    /// Set the resource kind used in log messages
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// List every record in the collection
    pub fn list_resources(&self) -> Result<Vec<RemoteRecord>> {
        self.list(Phase::List)
    }

    /// Find the first record with the given name, in listing order
    pub fn find_by_name(&self, name: &str) -> Result<Option<RemoteRecord>> {
        self.find(name, Phase::List)
    }

    /// Converge to `state`
    pub fn reconcile(&self, desired: &AttributeSet, state: TargetState) -> Result<Outcome> {
        match state {
            TargetState::Present => self.reconcile_present(desired),
            TargetState::Absent => {
                let name = required_name(desired)?;
                self.reconcile_absent(name)
            }
        }
    }

    /// Create the resource, or update it if a record with its name exists
    ///
    /// The update branch is two-step: `PUT` then a fresh lookup. The returned
    /// record is the one the server lists after the update.
    pub fn reconcile_present(&self, desired: &AttributeSet) -> Result<Outcome> {
        let name = required_name(desired)?;

        let outcome = match self.find(name, Phase::List)? {
            None => {
                let request = Request::new(
                    Method::Post,
                    self.endpoint.collection_url(),
                    self.endpoint.token(),
                )
                .with_body(encode(desired)?);
                let response = self.send(Phase::Create, &request, STATUS_CREATED)?;
                let record = decode::<RemoteRecord>(Phase::Create, &response.body)?;
                Outcome::Created(record)
            }
            Some(existing) => {
                let id = record_id(&existing, Phase::List)?;
                let body = desired.clone().with(ID, id.clone());
                let request = Request::new(
                    Method::Put,
                    self.endpoint.item_url(&id),
                    self.endpoint.token(),
                )
                .with_body(encode(&body)?);
                self.send(Phase::Update, &request, STATUS_NO_CONTENT)?;

                match self.find(name, Phase::Refresh)? {
                    Some(record) => Outcome::Updated(record),
                    None => {
                        return Err(Error::Vanished {
                            name: name.to_string(),
                        });
                    }
                }
            }
        };

        log::info!("{} {:?} {}", self.kind, name, outcome.label());
        Ok(outcome)
    }

    /// Delete the record with the given name, if any
    pub fn reconcile_absent(&self, name: &str) -> Result<Outcome> {
        let outcome = match self.find(name, Phase::List)? {
            None => Outcome::Noop,
            Some(existing) => {
                let id = record_id(&existing, Phase::List)?;
                let request = Request::new(
                    Method::Delete,
                    self.endpoint.item_url(&id),
                    self.endpoint.token(),
                );
                self.send(Phase::Delete, &request, STATUS_NO_CONTENT)?;
                Outcome::Deleted
            }
        };

        log::info!("{} {:?} {}", self.kind, name, outcome.label());
        Ok(outcome)
    }

    fn list(&self, phase: Phase) -> Result<Vec<RemoteRecord>> {
        let request = Request::new(
            Method::Get,
            self.endpoint.collection_url(),
            self.endpoint.token(),
        );
        let response = self.send(phase, &request, STATUS_OK)?;
        decode(phase, &response.body)
    }

    fn find(&self, name: &str, phase: Phase) -> Result<Option<RemoteRecord>> {
        let mut matches = self
            .list(phase)?
            .into_iter()
            .filter(|r| r.name() == Some(name));

        let first = matches.next();
        let others = matches.count();
        if others > 0 {
            log::warn!(
                "{} {} {:?} records listed, using the first one",
                1 + others,
                self.kind,
                name
            );
        }
        Ok(first)
    }

    fn send(&self, phase: Phase, request: &Request, expected: u16) -> Result<Response> {
        log::debug!("{} {}", request.method, request.url);

        let response = self
            .transport
            .send(request)
            .map_err(|e| Error::Transport {
                phase,
                message: e.to_string(),
            })?;

        log::debug!(
            "{} {} -> {}",
            request.method,
            request.url,
            response.status
        );

        if response.status != expected {
            return Err(Error::Remote {
                phase,
                status: response.status,
                body: response.text().into_owned(),
            });
        }
        Ok(response)
    }
}

fn required_name(desired: &AttributeSet) -> Result<&str> {
    match desired.name() {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(Error::config("desired attributes require a string \"name\"")),
    }
}

fn record_id(record: &RemoteRecord, phase: Phase) -> Result<RecordId> {
    record.id().ok_or_else(|| Error::Decode {
        phase,
        message: format!("record {:?} has no usable \"id\"", record.name().unwrap_or_default()),
    })
}

fn encode(attributes: &AttributeSet) -> Result<String> {
    serde_json::to_string(attributes)
        .map_err(|e| Error::config(format!("cannot encode attributes: {e}")))
}

fn decode<D: serde::de::DeserializeOwned>(phase: Phase, body: &[u8]) -> Result<D> {
    serde_json::from_slice(body).map_err(|e| Error::Decode {
        phase,
        message: e.to_string(),
    })
}
