//! Resource descriptors
//!
//! A descriptor turns caller parameters into the collection path and the
//! request body for one resource kind. Descriptors never perform I/O.
//!
//! Scoping under a parent resource is done by composition: [`Nested`] wraps
//! any descriptor and a [`PathParam`], pulls the parent id out of the
//! parameters and prefixes the inner path with it.
//!
//! ```
//! use reconcile::{AttributeSet, Collection, Descriptor, Nested, PathParam};
//!
//! let kind = Nested::new(
//!     Collection::new("component", "/component-kind"),
//!     PathParam::project(),
//! );
//! let params = AttributeSet::new().with("name", "web").with("project_id", 7);
//! let shape = kind.shape(&params).unwrap();
//!
//! assert_eq!(shape.path, "/project/7/component-kind");
//! assert!(!shape.attributes.contains("project_id"));
//! ```

use crate::error::{Error, Result};
use crate::types::{AttributeSet, AttributeValue, NAME};
use std::fmt;

/// Collection path and request body derived from caller parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    /// Collection path relative to the API base, always starting with `/`
    pub path: String,
    /// Attributes sent in request bodies
    pub attributes: AttributeSet,
}

/// Shaping rules for one resource kind
pub trait Descriptor: Send + Sync + fmt::Debug {
    /// Resource kind, used in log messages (e.g. "inventory")
    fn kind(&self) -> &str;

    /// Derive the collection path and the body attributes from parameters
    ///
    /// Fails with a configuration error when a required parameter is missing.
    fn shape(&self, params: &AttributeSet) -> Result<Shape>;
}

impl<D: Descriptor + ?Sized> Descriptor for Box<D> {
    fn kind(&self) -> &str {
        (**self).kind()
    }

    fn shape(&self, params: &AttributeSet) -> Result<Shape> {
        (**self).shape(params)
    }
}

/// A flat collection, e.g. `/inventory`
///
/// Only declared attributes end up in the body, in declaration order.
/// `name` is always declared first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    kind: String,
    suffix: String,
    attributes: Vec<String>,
}

impl Collection {
    /// Create a collection with the given kind and path suffix
    pub fn new(kind: impl Into<String>, suffix: impl AsRef<str>) -> Self {
        let suffix = suffix.as_ref().trim_matches('/');
        Self {
            kind: kind.into(),
            suffix: format!("/{suffix}"),
            attributes: vec![NAME.to_string()],
        }
    }

    /// Declare an additional body attribute
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.attributes.contains(&name) {
            self.attributes.push(name);
        }
        self
    }

    /// Declare several body attributes at once
    pub fn attributes<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().fold(self, |c, name| c.attribute(name))
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }
}

impl Descriptor for Collection {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn shape(&self, params: &AttributeSet) -> Result<Shape> {
        match params.name() {
            Some(name) if !name.is_empty() => {}
            _ => {
                return Err(Error::config(format!(
                    "{} requires a non-empty string \"{NAME}\"",
                    self.kind
                )));
            }
        }

        let attributes = self
            .attributes
            .iter()
            .filter_map(|key| params.get(key).map(|v| (key.clone(), v.clone())))
            .collect();

        Ok(Shape {
            path: self.suffix.clone(),
            attributes,
        })
    }
}

/// A path-scoping parameter, e.g. `project_id` rendered as `/project/{id}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathParam {
    attribute: String,
    segment: String,
}

impl PathParam {
    /// Scope by `attribute`, rendered after the path `segment`
    pub fn new(attribute: impl Into<String>, segment: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            segment: segment.into(),
        }
    }

    /// Scope by `project_id` under `/project/{project_id}`
    pub fn project() -> Self {
        Self::new("project_id", "project")
    }

    /// Read the scoping value and render it as a path prefix
    fn prefix(&self, params: &AttributeSet) -> Result<String> {
        let value = match params.get(&self.attribute) {
            Some(AttributeValue::Integer(i)) => i.to_string(),
            Some(AttributeValue::String(s)) if !s.is_empty() && !s.contains('/') => s.clone(),
            Some(other) => {
                return Err(Error::config(format!(
                    "invalid value {other:?} for \"{}\"",
                    self.attribute
                )));
            }
            None => {
                return Err(Error::config(format!(
                    "missing required parameter \"{}\"",
                    self.attribute
                )));
            }
        };
        Ok(format!("/{}/{value}", self.segment))
    }
}

/// A descriptor scoped under a parent resource
///
/// Delegates shaping to the inner descriptor, then moves the scoping
/// attribute from the body into the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nested<D> {
    inner: D,
    param: PathParam,
}

impl<D: Descriptor> Nested<D> {
    pub fn new(inner: D, param: PathParam) -> Self {
        Self { inner, param }
    }
}

impl<D: Descriptor> Descriptor for Nested<D> {
    fn kind(&self) -> &str {
        self.inner.kind()
    }

    fn shape(&self, params: &AttributeSet) -> Result<Shape> {
        let prefix = self.param.prefix(params)?;
        let mut shape = self.inner.shape(params)?;
        shape.attributes.remove(&self.param.attribute);
        shape.path = format!("{prefix}{}", shape.path);
        Ok(shape)
    }
}
