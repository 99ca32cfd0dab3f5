//! JSON encoding of projections and the [`ScopedJson`] responder.

use std::io;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::ScopeError;
use crate::project::Projection;
use crate::record::Projectable;
use crate::scope::Scope;

/// Encode a projection as a JSON document.
///
/// The output is deterministic: encoding the same projection twice yields
/// identical bytes.
///
/// # Errors
/// Returns [`ScopeError::Encoding`] if serde fails to write the document.
pub fn encode(projection: &Projection) -> Result<Bytes, ScopeError> {
    encode_buf(projection).map(BytesMut::freeze)
}

fn encode_buf(projection: &Projection) -> Result<BytesMut, ScopeError> {
    let mut writer = BytesMut::new().writer();
    serde_json::to_writer(&mut writer, projection)?;
    Ok(writer.into_inner())
}

/// An encoded, scope-filtered JSON document.
///
/// Reading from it drains the buffer; writing to it appends.
#[derive(Debug, Clone)]
pub struct ScopedJson {
    scope: Scope,
    buffer: BytesMut,
}

impl ScopedJson {
    /// Project `data` under `scope` and encode the result.
    ///
    /// # Errors
    /// Propagates projection and encoding failures.
    pub fn new<P>(scope: impl Into<Scope>, data: &P) -> Result<Self, ScopeError>
    where
        P: Projectable + ?Sized,
    {
        let scope = scope.into();
        let projection = data.project_scoped(scope.as_str())?;
        let buffer = encode_buf(&projection)?;
        tracing::debug!(
            scope = %scope,
            records = projection.len(),
            bytes = buffer.len(),
            "encoded scoped document"
        );
        Ok(Self { scope, buffer })
    }

    /// Like [`ScopedJson::new`], taking the scope from `extensions`.
    ///
    /// Returns `Ok(None)` when no [`Scope`] is present.
    ///
    /// # Errors
    /// Propagates projection and encoding failures.
    pub fn from_extensions<P>(
        extensions: &http::Extensions,
        data: &P,
    ) -> Result<Option<Self>, ScopeError>
    where
        P: Projectable + ?Sized,
    {
        extensions
            .get::<Scope>()
            .map(|scope| Self::new(scope, data))
            .transpose()
    }

    #[must_use]
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// The unread encoded bytes.
    #[must_use]
    pub fn as_json(&self) -> &[u8] {
        &self.buffer
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        self.buffer.freeze()
    }

    /// Write the whole unread document into `sink`.
    ///
    /// # Errors
    /// Propagates I/O errors from `sink`.
    pub fn write_to<W: io::Write>(&self, mut sink: W) -> io::Result<()> {
        sink.write_all(&self.buffer)?;
        sink.flush()
    }
}

impl io::Read for ScopedJson {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.buffer.len());
        buf[..n].copy_from_slice(&self.buffer.split_to(n));
        Ok(n)
    }
}

impl io::Write for ScopedJson {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
