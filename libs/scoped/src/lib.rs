//! # scoped
//!
//! Scope-aware projection of structured records into JSON.
//!
//! A record type declares, per field, an output key, an omit-if-empty flag and
//! the set of scopes allowed to see it. Given a record (or a collection of
//! records) and the caller's scope, the projector keeps only the visible
//! fields and the responder encodes the result as a JSON document.
//!
//! ```ignore
//! use scoped::{Scoped, ScopedJson};
//!
//! #[derive(serde::Serialize, Scoped)]
//! struct Account {
//!     id: i64,
//!     #[scoped(scopes("admin"))]
//!     internal_note: String,
//!     #[scoped(omit_empty, scopes("user", "admin"))]
//!     email: String,
//!     #[scoped(skip)]
//!     password_hash: String,
//! }
//!
//! let out = ScopedJson::new("user", &account)?;
//! assert_eq!(out.as_json(), br#"{"email":"a@b.c","id":1}"#);
//! ```
//!
//! With the `axum` feature, [`axum_ext::handler`] and [`axum_ext::scoped_handler`]
//! wrap request handlers so their return values are projected before being
//! written to the response.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

// Lets the derive output refer to `::scoped` from inside this crate too.
extern crate self as scoped;

#[cfg(feature = "axum")]
pub mod axum_ext;
pub mod config;
pub mod encode;
pub mod error;
pub mod field;
pub mod problem;
pub mod project;
pub mod record;
pub mod scope;

pub use config::{ConfigError, ScopedConfig};
pub use encode::{ScopedJson, encode};
pub use error::ScopeError;
pub use field::{FieldSpec, HIDDEN_KEY};
pub use problem::Problem;
pub use project::{ProjectedView, Projection, is_empty_value, project, project_many};
pub use record::{AsRecord, Projectable, ScopedRecord};
pub use scope::Scope;

#[cfg(feature = "macros")]
pub use scoped_macros::Scoped;

/// Items used by `#[derive(Scoped)]` expansions. Not part of the public API.
#[doc(hidden)]
pub mod __private {
    pub use serde::Serialize;
    pub use serde_json::Value;
    pub use serde_json::value::Serializer as ValueSerializer;

    use crate::ScopeError;

    /// Serialize one field value for projection.
    ///
    /// # Errors
    /// Returns [`ScopeError::Encoding`] if serde cannot represent the value as JSON.
    #[inline]
    pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value, ScopeError> {
        serde_json::to_value(value).map_err(ScopeError::from)
    }
}
