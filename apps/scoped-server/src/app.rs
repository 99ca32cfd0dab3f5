use std::sync::Arc;

use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use scoped::axum_ext::{
    ScopeHeaderState, handler, respond_in_context, scope_from_header, scoped_handler,
};
use scoped::{Problem, Scoped, ScopedConfig};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, Scoped)]
pub struct User {
    pub id: u64,
    pub name: String,
    #[scoped(omit_empty, scopes("user", "admin"))]
    pub email: String,
    #[scoped(scopes("admin"))]
    pub role: String,
    #[scoped(omit_empty, scopes("admin"))]
    pub last_login: Option<String>,
    #[serde(skip)]
    pub password_hash: String,
}

/// In-memory user directory served by the demo routes.
#[derive(Debug, Clone)]
pub struct UserStore {
    users: Arc<Vec<User>>,
}

impl UserStore {
    #[must_use]
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(users),
        }
    }

    #[must_use]
    pub fn seeded() -> Self {
        Self::new(vec![
            User {
                id: 1,
                name: "Ada".to_owned(),
                email: "ada@example.com".to_owned(),
                role: "owner".to_owned(),
                last_login: Some("2026-10-01T08:00:00Z".to_owned()),
                password_hash: "$argon2id$ada".to_owned(),
            },
            User {
                id: 2,
                name: "Linus".to_owned(),
                email: String::new(),
                role: "member".to_owned(),
                last_login: None,
                password_hash: "$argon2id$linus".to_owned(),
            },
        ])
    }

    #[must_use]
    pub fn list(&self) -> Vec<User> {
        self.users.as_ref().clone()
    }

    #[must_use]
    pub fn find(&self, id: u64) -> Option<User> {
        self.users.iter().find(|u| u.id == id).cloned()
    }
}

/// Demo routes behind the scope header middleware.
///
/// # Errors
/// Fails when the configured scope header is not a valid header name.
pub fn router(store: UserStore, config: &ScopedConfig) -> anyhow::Result<Router> {
    let scope_state = ScopeHeaderState::try_from(config)?;

    let list_users = {
        let store = store.clone();
        move |_req: Request| {
            let users = store.list();
            async move { users }
        }
    };

    Ok(Router::new()
        .route("/users", get(handler(list_users.clone())))
        .route("/users/{id}", get(get_user))
        .route("/admin/users", get(scoped_handler("admin", list_users)))
        .with_state(store)
        .layer(axum::middleware::from_fn_with_state(
            scope_state,
            scope_from_header,
        )))
}

async fn get_user(State(store): State<UserStore>, Path(id): Path<u64>, req: Request) -> Response {
    let Some(user) = store.find(id) else {
        tracing::debug!(id, "user not found");
        return Problem::new(StatusCode::NOT_FOUND, "Not Found", format!("user {id} not found"))
            .with_code("USER_NOT_FOUND")
            .into_response();
    };

    respond_in_context(req.extensions(), &user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app() -> Router {
        router(UserStore::seeded(), &ScopedConfig::default()).unwrap()
    }

    async fn call(uri: &str, scope: Option<&str>) -> (StatusCode, Value) {
        let mut req = axum::http::Request::builder().uri(uri);
        if let Some(scope) = scope {
            req = req.header("x-scope", scope);
        }
        let resp = app()
            .oneshot(req.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn user_scope_hides_admin_fields() {
        let (status, body) = call("/users/1", Some("user")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"id": 1, "name": "Ada", "email": "ada@example.com"})
        );
    }

    #[tokio::test]
    async fn admin_scope_sees_everything_but_hidden() {
        let (_, body) = call("/users/1", Some("admin")).await;
        assert_eq!(
            body,
            json!({
                "id": 1,
                "name": "Ada",
                "email": "ada@example.com",
                "role": "owner",
                "last_login": "2026-10-01T08:00:00Z"
            })
        );
    }

    #[tokio::test]
    async fn no_scope_returns_serde_form() {
        let (_, body) = call("/users/2", None).await;
        assert_eq!(
            body,
            json!({"id": 2, "name": "Linus", "email": "", "role": "member", "last_login": null})
        );
    }

    #[tokio::test]
    async fn list_is_projected_per_user() {
        let (status, body) = call("/users", Some("user")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([
                {"id": 1, "name": "Ada", "email": "ada@example.com"},
                {"id": 2, "name": "Linus"}
            ])
        );
    }

    #[tokio::test]
    async fn admin_route_always_uses_admin_scope() {
        let (_, body) = call("/admin/users", Some("user")).await;
        assert_eq!(body[1], json!({"id": 2, "name": "Linus", "role": "member"}));
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let (status, body) = call("/users/99", Some("user")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "USER_NOT_FOUND");
    }
}
