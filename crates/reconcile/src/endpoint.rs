//! Endpoint context: API base URL, collection path and bearer token.

use crate::error::{Error, Result};
use crate::types::RecordId;
use std::fmt;

/// Where a resource collection lives and how to authenticate against it.
///
/// Validated once at construction and immutable afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct Endpoint {
    base_url: String,
    path: String,
    token: String,
}

impl Endpoint {
    /// Bind a base URL, a collection path and a token.
    ///
    /// The base URL must be an `http://` or `https://` URL and the token must
    /// not be empty. Trailing slashes on the base URL are dropped and the
    /// path is made absolute.
    pub fn new(
        base_url: impl AsRef<str>,
        path: impl AsRef<str>,
        token: impl Into<String>,
    ) -> Result<Self> {
        let base_url = base_url.as_ref().trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(Error::config("missing API url"));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(Error::config(format!(
                "API url {base_url:?} must start with http:// or https://"
            )));
        }

        let token = token.into();
        if token.trim().is_empty() {
            return Err(Error::config("missing API token"));
        }

        let path = path.as_ref().trim_matches('/');
        Ok(Self {
            base_url: base_url.to_string(),
            path: format!("/{path}"),
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// URL of the collection, e.g. `http://host/api/project/1/inventory`.
    pub fn collection_url(&self) -> String {
        format!("{}{}", self.base_url, self.path)
    }

    /// URL of one record in the collection.
    ///
    /// Text ids are percent-encoded as a single path segment.
    pub fn item_url(&self, id: &RecordId) -> String {
        let segment = match id {
            RecordId::Integer(i) => i.to_string(),
            RecordId::Text(s) => urlencoding::encode(s).into_owned(),
        };
        format!("{}{}/{segment}", self.base_url, self.path)
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("base_url", &self.base_url)
            .field("path", &self.path)
            .field("token", &"<redacted>")
            .finish()
    }
}
