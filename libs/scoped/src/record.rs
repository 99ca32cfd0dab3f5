//! Capability traits the projector depends on.
//!
//! `#[derive(Scoped)]` implements all three for a struct. The blanket impls
//! below let pointers, `Option`s and sequences of records be projected
//! without extra code.

use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;

use serde_json::Value;

use crate::error::ScopeError;
use crate::field::FieldSpec;
use crate::project::{Projection, project, project_many};

/// A record with a fixed, statically known set of fields.
pub trait ScopedRecord {
    /// Field descriptors in declaration order.
    fn field_specs() -> &'static [FieldSpec];

    /// JSON value of the field at `index` in [`field_specs`](Self::field_specs).
    ///
    /// # Errors
    /// [`ScopeError::InvalidRecord`] when `index` has no serializable field
    /// (hidden or out of range), [`ScopeError::Encoding`] when serde rejects the value.
    fn field_value(&self, index: usize) -> Result<Value, ScopeError>;
}

/// Something that dereferences to a record, possibly an absent one.
pub trait AsRecord {
    type Record: ScopedRecord;

    /// The underlying record, or `None` when it is absent.
    fn as_record(&self) -> Option<&Self::Record>;
}

/// Top-level input accepted by the projector: one record or a sequence of them.
pub trait Projectable {
    /// Project under `scope`.
    ///
    /// # Errors
    /// Fails with [`ScopeError::InvalidRecord`] for absent records and with
    /// [`ScopeError::Encoding`] for field values serde cannot encode.
    fn project_scoped(&self, scope: &str) -> Result<Projection, ScopeError>;
}

macro_rules! deref_impls {
    ($($ptr:ty),* $(,)?) => {$(
        impl<T: AsRecord + ?Sized> AsRecord for $ptr {
            type Record = T::Record;

            fn as_record(&self) -> Option<&Self::Record> {
                (**self).as_record()
            }
        }

        impl<T: Projectable + ?Sized> Projectable for $ptr {
            fn project_scoped(&self, scope: &str) -> Result<Projection, ScopeError> {
                (**self).project_scoped(scope)
            }
        }
    )*};
}

deref_impls!(&T, &mut T, Box<T>, Rc<T>, Arc<T>);

impl<T: AsRecord> AsRecord for Option<T> {
    type Record = T::Record;

    fn as_record(&self) -> Option<&Self::Record> {
        self.as_ref().and_then(AsRecord::as_record)
    }
}

impl<T: Projectable> Projectable for Option<T> {
    fn project_scoped(&self, scope: &str) -> Result<Projection, ScopeError> {
        match self {
            Some(inner) => inner.project_scoped(scope),
            None => Err(ScopeError::absent::<T>()),
        }
    }
}

impl<T: AsRecord> Projectable for [T] {
    fn project_scoped(&self, scope: &str) -> Result<Projection, ScopeError> {
        project_many(self, scope).map(Projection::Many)
    }
}

impl<T: AsRecord, const N: usize> Projectable for [T; N] {
    fn project_scoped(&self, scope: &str) -> Result<Projection, ScopeError> {
        project_many(self, scope).map(Projection::Many)
    }
}

impl<T: AsRecord> Projectable for Vec<T> {
    fn project_scoped(&self, scope: &str) -> Result<Projection, ScopeError> {
        project_many(self, scope).map(Projection::Many)
    }
}

impl<T: AsRecord> Projectable for VecDeque<T> {
    fn project_scoped(&self, scope: &str) -> Result<Projection, ScopeError> {
        project_many(self, scope).map(Projection::Many)
    }
}

/// Projects a single record; used by derived [`Projectable`] impls.
///
/// # Errors
/// See [`project`].
pub fn project_record<R: AsRecord + ?Sized>(
    record: &R,
    scope: &str,
) -> Result<Projection, ScopeError> {
    project(record, scope).map(Projection::One)
}
