//! Axum integration: scope extractors, header middleware and handler adapters.
//!
//! The scope travels in the request extensions as a [`Scope`]. The
//! [`scope_from_header`] middleware puts it there; [`handler`] reads it back
//! after the wrapped handler has produced its data. [`scoped_handler`] skips
//! the lookup and always projects under a fixed scope.

use std::convert::Infallible;
use std::future::Future;

use axum::extract::{FromRequestParts, OptionalFromRequestParts, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::request::Parts;
use axum::http::{HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use futures::FutureExt;
use futures::future::BoxFuture;
use serde::Serialize;

use crate::config::{ConfigError, ScopedConfig};
use crate::encode::ScopedJson;
use crate::error::ScopeError;
use crate::record::Projectable;
use crate::scope::Scope;

/// Content type of scoped responses.
pub const APPLICATION_JSON: &str = "application/json";

/// Required scope: rejects the request with [`ScopeError::MissingScope`] when absent.
impl<S> FromRequestParts<S> for Scope
where
    S: Send + Sync,
{
    type Rejection = ScopeError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Scope>()
            .cloned()
            .ok_or(ScopeError::MissingScope)
    }
}

/// Optional scope: `Option<Scope>` as a handler argument never rejects.
impl<S> OptionalFromRequestParts<S> for Scope
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<Scope>().cloned())
    }
}

impl ScopedJson {
    /// Build the HTTP response: `Content-Type: application/json` and the document as body.
    #[must_use]
    pub fn respond(self) -> Response {
        (
            [(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON))],
            self.into_bytes(),
        )
            .into_response()
    }
}

impl IntoResponse for ScopedJson {
    fn into_response(self) -> Response {
        self.respond()
    }
}

/// State of the [`scope_from_header`] middleware.
#[derive(Debug, Clone)]
pub struct ScopeHeaderState {
    header: HeaderName,
    default_scope: Option<Scope>,
}

impl ScopeHeaderState {
    #[must_use]
    pub fn new(header: HeaderName) -> Self {
        Self {
            header,
            default_scope: None,
        }
    }

    #[must_use]
    pub fn with_default_scope(mut self, scope: impl Into<Scope>) -> Self {
        self.default_scope = Some(scope.into());
        self
    }

    fn scope_of(&self, req: &Request) -> Option<Scope> {
        req.headers()
            .get(&self.header)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(Scope::from)
            .or_else(|| self.default_scope.clone())
    }
}

impl TryFrom<&ScopedConfig> for ScopeHeaderState {
    type Error = ConfigError;

    fn try_from(config: &ScopedConfig) -> Result<Self, Self::Error> {
        config.validate()?;
        let state = Self::new(config.header_name()?);
        Ok(match &config.default_scope {
            Some(scope) => state.with_default_scope(scope.as_str()),
            None => state,
        })
    }
}

/// Middleware copying the scope header into the request extensions.
///
/// A scope already present in the extensions (set by an earlier layer) is kept.
///
/// ```ignore
/// let state = ScopeHeaderState::try_from(&config)?;
/// let app = Router::new()
///     .route("/users", get(handler(list_users)))
///     .layer(axum::middleware::from_fn_with_state(state, scope_from_header));
/// ```
pub async fn scope_from_header(
    State(state): State<ScopeHeaderState>,
    mut req: Request,
    next: Next,
) -> Response {
    if req.extensions().get::<Scope>().is_none() {
        match state.scope_of(&req) {
            Some(scope) => {
                tracing::trace!(scope = %scope, "attaching request scope");
                req.extensions_mut().insert(scope);
            }
            None => tracing::trace!(header = %state.header, "request carries no scope"),
        }
    }
    next.run(req).await
}

/// Context-seeking adapter.
///
/// Runs `f` and projects its output under the request's [`Scope`]. When the
/// request carries no scope, the output is returned as plain JSON without
/// any projection.
#[must_use]
pub fn handler<F, Fut, T>(
    f: F,
) -> impl Fn(Request) -> BoxFuture<'static, Response> + Clone + Send + Sync + 'static
where
    F: Fn(Request) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = T> + Send + 'static,
    T: Projectable + Serialize + Send + 'static,
{
    move |req: Request| {
        let scope = req.extensions().get::<Scope>().cloned();
        let data = f(req);
        async move { respond_with(scope, &data.await) }.boxed()
    }
}

/// Respond with `data` the way [`handler`] does, taking the scope from
/// `extensions`. For handlers that need their own extractors.
#[must_use]
pub fn respond_in_context<T>(extensions: &http::Extensions, data: &T) -> Response
where
    T: Projectable + Serialize + ?Sized,
{
    respond_with(extensions.get::<Scope>().cloned(), data)
}

/// Explicit-scope adapter: always projects the output of `f` under `scope`.
#[must_use]
pub fn scoped_handler<F, Fut, T>(
    scope: impl Into<Scope>,
    f: F,
) -> impl Fn(Request) -> BoxFuture<'static, Response> + Clone + Send + Sync + 'static
where
    F: Fn(Request) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = T> + Send + 'static,
    T: Projectable + Send + 'static,
{
    let scope = scope.into();
    move |req: Request| {
        let scope = scope.clone();
        let data = f(req);
        async move { respond_scoped(scope, &data.await) }.boxed()
    }
}

fn respond_with<T>(scope: Option<Scope>, data: &T) -> Response
where
    T: Projectable + Serialize + ?Sized,
{
    match scope {
        Some(scope) => respond_scoped(scope, data),
        None => {
            tracing::debug!("no scope on request, responding unprojected");
            axum::Json(data).into_response()
        }
    }
}

fn respond_scoped<T: Projectable + ?Sized>(scope: Scope, data: &T) -> Response {
    match ScopedJson::new(scope, data) {
        Ok(out) => out.respond(),
        Err(err) => err.into_response(),
    }
}
