//! Shared test helpers: an in-memory fake of one Semaphore collection.

#![allow(dead_code)]

use reconcile::transport::{Method, Request, Response, Transport, TransportError};
use serde_json::{json, Map, Value};
use std::sync::{Arc, Mutex};

pub const BASE: &str = "http://semaphore.test/api";
pub const TOKEN: &str = "test-token";

#[derive(Debug, Default)]
struct State {
    records: Vec<Map<String, Value>>,
    next_id: i64,
    failures: Vec<(Method, u16, String)>,
    log: Vec<(Method, String)>,
}

/// Stateful fake serving a single collection under `BASE`.
///
/// Assigns integer ids and bumps a server-managed `revision` field on every
/// write. Clones share state.
#[derive(Debug, Clone)]
pub struct FakeServer {
    collection: String,
    token: String,
    state: Arc<Mutex<State>>,
}

impl FakeServer {
    pub fn new(path: &str) -> Self {
        Self {
            collection: format!("{BASE}{path}"),
            token: TOKEN.to_string(),
            state: Arc::new(Mutex::new(State {
                next_id: 1,
                ..State::default()
            })),
        }
    }

    /// Seed a record as if it had been created earlier.
    pub fn seed(&self, record: Value) {
        let mut state = self.state.lock().unwrap();
        let record = record.as_object().cloned().expect("seed must be an object");
        if let Some(id) = record.get("id").and_then(Value::as_i64) {
            state.next_id = state.next_id.max(id + 1);
        }
        state.records.push(record);
    }

    /// Answer the next request with `method` with the given status and body.
    pub fn fail_next(&self, method: Method, status: u16, body: &str) {
        self.state
            .lock()
            .unwrap()
            .failures
            .push((method, status, body.to_string()));
    }

    pub fn records(&self) -> Vec<Map<String, Value>> {
        self.state.lock().unwrap().records.clone()
    }

    /// Requests received so far as `"METHOD /path"` strings relative to `BASE`.
    pub fn calls(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .log
            .iter()
            .map(|(m, url)| format!("{m} {}", url.trim_start_matches(BASE)))
            .collect()
    }

    fn handle(&self, request: &Request) -> Response {
        let mut state = self.state.lock().unwrap();
        state.log.push((request.method, request.url.clone()));

        if request.token != self.token {
            return Response::new(401, "invalid token");
        }
        if let Some(pos) = state.failures.iter().position(|(m, _, _)| *m == request.method) {
            let (_, status, body) = state.failures.remove(pos);
            return Response::new(status, body);
        }

        let item = request
            .url
            .strip_prefix(&self.collection)
            .and_then(|rest| rest.strip_prefix('/'))
            .and_then(|id| id.parse::<i64>().ok());
        let is_collection = request.url == self.collection;

        match (request.method, is_collection, item) {
            (Method::Get, true, _) => Response::json(200, &Value::from(
                state.records.iter().cloned().map(Value::Object).collect::<Vec<_>>(),
            )),
            (Method::Post, true, _) => {
                let mut record = match request.json() {
                    Some(Value::Object(map)) => map,
                    _ => return Response::new(400, "invalid body"),
                };
                let id = state.next_id;
                state.next_id += 1;
                record.insert("id".to_string(), json!(id));
                record.insert("revision".to_string(), json!(1));
                state.records.push(record.clone());
                Response::json(201, &Value::Object(record))
            }
            (Method::Put, false, Some(id)) => {
                let body = match request.json() {
                    Some(Value::Object(map)) => map,
                    _ => return Response::new(400, "invalid body"),
                };
                if body.get("id").and_then(Value::as_i64) != Some(id) {
                    return Response::new(400, "id mismatch");
                }
                match state
                    .records
                    .iter_mut()
                    .find(|r| r.get("id").and_then(Value::as_i64) == Some(id))
                {
                    Some(record) => {
                        let revision = record.get("revision").and_then(Value::as_i64).unwrap_or(0);
                        record.extend(body);
                        record.insert("revision".to_string(), json!(revision + 1));
                        Response::empty(204)
                    }
                    None => Response::new(404, "not found"),
                }
            }
            (Method::Delete, false, Some(id)) => {
                let before = state.records.len();
                state
                    .records
                    .retain(|r| r.get("id").and_then(Value::as_i64) != Some(id));
                if state.records.len() < before {
                    Response::empty(204)
                } else {
                    Response::new(404, "not found")
                }
            }
            _ => Response::new(405, "method not allowed"),
        }
    }
}

impl Transport for FakeServer {
    fn send(&self, request: &Request) -> Result<Response, TransportError> {
        Ok(self.handle(request))
    }
}
