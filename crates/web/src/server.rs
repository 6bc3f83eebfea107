//! Web server implementation

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use sandbox_common::i18n::Msg;
use sandbox_common::{Database, Error, Locale, NewUser, UserPatch};
use sandbox_surface::form::{validate, FieldError, FieldKind};
use sandbox_surface::{CredentialProvider, MemoryUserStore, SqliteUserStore, StaticCredentials, UserStore};

use crate::pages;

/// Web server configuration
#[derive(Debug, Clone, Default)]
pub struct WebServerConfig {
    /// SQLite path; `None` runs on an in-memory database.
    pub db_path: Option<PathBuf>,
    /// Override for the simulated login delay (test mode shortens it).
    pub login_delay_ms: Option<u64>,
    /// Use the in-memory mock store instead of SQLite.
    pub mock_store: bool,
}

impl WebServerConfig {
    pub fn from_env() -> Self {
        let db_path = std::env::var("QA_SANDBOX_DB_PATH")
            .ok()
            .and_then(|v| {
                let v = v.trim();
                if v.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(v))
                }
            });

        // E2E test mode shortens the simulated login delay, never the
        // state transitions.
        let login_delay_ms = if std::env::var("QA_SANDBOX_E2E_TEST_MODE").as_deref() == Ok("1") {
            Some(200)
        } else {
            None
        };

        let mock_store = std::env::var("QA_SANDBOX_MOCK_STORE").as_deref() == Ok("1");

        Self {
            db_path,
            login_delay_ms,
            mock_store,
        }
    }
}

/// Shared server state
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub credentials: Arc<StaticCredentials>,
    pub login_delay: Duration,
}

pub type SharedState = Arc<AppState>;

/// Build the application state from config.
pub fn build_state(cfg: &WebServerConfig) -> anyhow::Result<SharedState> {
    let store: Arc<dyn UserStore> = if cfg.mock_store {
        info!("Using in-memory mock user store");
        Arc::new(MemoryUserStore::new())
    } else {
        let db = match &cfg.db_path {
            Some(path) => Database::open(path)?,
            None => Database::open_memory()?,
        };
        Arc::new(SqliteUserStore::new(db))
    };

    Ok(Arc::new(AppState {
        store,
        credentials: Arc::new(StaticCredentials::from_env()),
        login_delay: Duration::from_millis(
            cfg.login_delay_ms
                .unwrap_or(sandbox_surface::login::LOGIN_DELAY_MS),
        ),
    }))
}

/// Build the router.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/", get(index_page))
        .route("/testing/login", get(login_page))
        .route("/testing/async", get(async_page))
        .route("/testing/ui", get(ui_page))
        .route("/testing/forms/basic", get(forms_basic_page))
        .route("/testing/forms/dynamic", get(forms_dynamic_page))
        .route("/testing/calendar", get(calendar_page))
        .route("/testing/tables", get(tables_page))
        .route("/testing/users", get(users_page))
        .route("/api/auth/login", post(api_login))
        .route("/api/users", get(api_list_users).post(api_create_user))
        .route("/api/users/:id", put(api_update_user).delete(api_delete_user))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve forever.
pub async fn serve(addr: SocketAddr, cfg: WebServerConfig) -> anyhow::Result<()> {
    let state = build_state(&cfg)?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

// ============================================================================
// Health
// ============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: sandbox_common::VERSION,
    })
}

// ============================================================================
// Pages
// ============================================================================

fn locale_of(params: &HashMap<String, String>) -> Locale {
    params
        .get("lang")
        .map(|v| Locale::from_code(v))
        .unwrap_or_default()
}

async fn index_page(Query(params): Query<HashMap<String, String>>) -> Html<String> {
    Html(pages::index(locale_of(&params)))
}

async fn login_page(
    State(state): State<SharedState>,
    Query(params): Query<HashMap<String, String>>,
) -> Html<String> {
    Html(pages::login(
        locale_of(&params),
        state.credentials.hint_username(),
        state.credentials.hint_password(),
    ))
}

async fn async_page(Query(params): Query<HashMap<String, String>>) -> Html<String> {
    Html(pages::async_interactions(locale_of(&params)))
}

async fn ui_page(Query(params): Query<HashMap<String, String>>) -> Html<String> {
    Html(pages::ui_components(locale_of(&params)))
}

async fn forms_basic_page(Query(params): Query<HashMap<String, String>>) -> Html<String> {
    Html(pages::forms_basic(locale_of(&params)))
}

async fn forms_dynamic_page(Query(params): Query<HashMap<String, String>>) -> Html<String> {
    Html(pages::forms_dynamic(locale_of(&params)))
}

async fn calendar_page(Query(params): Query<HashMap<String, String>>) -> Html<String> {
    Html(pages::calendar(locale_of(&params)))
}

async fn tables_page(Query(params): Query<HashMap<String, String>>) -> Html<String> {
    Html(pages::tables(locale_of(&params), &params))
}

async fn users_page(
    State(state): State<SharedState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    match state.store.list().await {
        Ok(users) => Html(pages::users(locale_of(&params), &users, None)).into_response(),
        Err(err) => {
            // Store failures render the page with an error banner, never
            // a crash.
            warn!("users page list failed: {}", err);
            Html(pages::users(locale_of(&params), &[], Some(&err.to_string()))).into_response()
        }
    }
}

// ============================================================================
// Auth API
// ============================================================================

#[derive(Debug, Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

async fn api_login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Response {
    // Simulated network delay: the page shows its pending state for the
    // full window.
    tokio::time::sleep(state.login_delay).await;

    match state.credentials.authenticate(&req.username, &req.password) {
        sandbox_surface::AuthOutcome::Authenticated { display_name } => (
            StatusCode::OK,
            Json(LoginResponse {
                authenticated: true,
                display_name: Some(display_name),
                reason: None,
            }),
        )
            .into_response(),
        sandbox_surface::AuthOutcome::Denied { reason } => (
            StatusCode::UNAUTHORIZED,
            Json(LoginResponse {
                authenticated: false,
                display_name: None,
                reason,
            }),
        )
            .into_response(),
    }
}

// ============================================================================
// Users API
// ============================================================================

#[derive(Debug, Serialize)]
struct ApiError {
    error: String,
}

fn store_error_response(err: Error) -> Response {
    let status = if err.is_validation() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (
        status,
        Json(ApiError {
            error: err.to_string(),
        }),
    )
        .into_response()
}

/// Structured field errors become the locale-table messages the pages
/// show, never Debug text.
fn field_error(field: &str, err: FieldError, locale: Locale) -> Error {
    let msg = match err {
        FieldError::Required => Msg::FormsErrorRequired,
        FieldError::InvalidEmail => Msg::FormsErrorEmail,
    };
    Error::Validation {
        field: field.to_string(),
        message: msg.text(locale).to_string(),
    }
}

fn validate_new_user(new: &NewUser, locale: Locale) -> Result<(), Error> {
    if let Some(field_err) = validate(FieldKind::Email, &new.email) {
        return Err(field_error("email", field_err, locale));
    }
    Ok(())
}

async fn api_list_users(State(state): State<SharedState>) -> Response {
    match state.store.list().await {
        Ok(users) => Json(users).into_response(),
        Err(err) => store_error_response(err),
    }
}

async fn api_create_user(
    State(state): State<SharedState>,
    Query(params): Query<HashMap<String, String>>,
    Json(new): Json<NewUser>,
) -> Response {
    if let Err(err) = validate_new_user(&new, locale_of(&params)) {
        return store_error_response(err);
    }
    match state.store.create(new).await {
        Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
        Err(err) => store_error_response(err),
    }
}

async fn api_update_user(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
    Json(patch): Json<UserPatch>,
) -> Response {
    if let Some(email) = &patch.email {
        if let Some(field_err) = validate(FieldKind::Email, email) {
            return store_error_response(field_error("email", field_err, locale_of(&params)));
        }
    }
    match state.store.update(id, patch).await {
        Ok(user) => Json(user).into_response(),
        Err(err) => store_error_response(err),
    }
}

async fn api_delete_user(State(state): State<SharedState>, Path(id): Path<i64>) -> Response {
    match state.store.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => store_error_response(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use sandbox_common::UserRecord;
    use tower::util::ServiceExt;

    fn test_state() -> SharedState {
        Arc::new(AppState {
            store: Arc::new(MemoryUserStore::new()),
            credentials: Arc::new(StaticCredentials::new("qa_tester", "password123")),
            login_delay: Duration::from_millis(0),
        })
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = router(test_state());
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn login_accepts_the_configured_pair_only() {
        let app = router(test_state());

        let ok = app
            .clone()
            .oneshot(
                Request::post("/api/auth/login")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"username":"qa_tester","password":"password123"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(ok.status(), StatusCode::OK);

        let denied = app
            .oneshot(
                Request::post("/api/auth/login")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"username":"wrong_user","password":"wrong_password"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = body_json(denied).await;
        assert_eq!(body["authenticated"], false);
    }

    #[tokio::test]
    async fn users_api_crud_round_trip() {
        let app = router(test_state());

        let created = app
            .clone()
            .oneshot(
                Request::post("/api/users")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"email":"crud@qa-sandbox.com","name":"Crud","role":"editor"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);
        let user: UserRecord = body_json(created).await;

        let listed = app
            .clone()
            .oneshot(Request::get("/api/users").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let users: Vec<UserRecord> = body_json(listed).await;
        assert!(users.iter().any(|u| u.id == user.id));

        let deleted = app
            .oneshot(
                Request::delete(&format!("/api/users/{}", user.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn invalid_email_is_rejected_with_validation_error() {
        let app = router(test_state());
        let response = app
            .oneshot(
                Request::post("/api/users")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"email":"not-an-email","name":"X"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn validation_errors_carry_the_locale_table_message() {
        let app = router(test_state());

        let en = app
            .clone()
            .oneshot(
                Request::post("/api/users")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"email":"not-an-email","name":"X"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(en.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: serde_json::Value = body_json(en).await;
        let message = body["error"].as_str().unwrap();
        assert!(message.contains(Msg::FormsErrorEmail.text(Locale::En)));
        assert!(!message.contains("InvalidEmail"));

        let es = app
            .oneshot(
                Request::post("/api/users?lang=es")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"email":"not-an-email","name":"X"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        let body: serde_json::Value = body_json(es).await;
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains(Msg::FormsErrorEmail.text(Locale::Es)));
    }

    #[tokio::test]
    async fn tables_page_filters_server_side() {
        let app = router(test_state());
        let response = app
            .oneshot(
                Request::get("/testing/tables?q=tester25&sort=id&dir=asc&page=1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("data-testid=\"data-table\""));
        assert!(html.contains("tester25@qa-sandbox.com"));
        assert!(!html.contains("tester24@qa-sandbox.com"));
    }

    #[tokio::test]
    async fn locale_switch_changes_text_not_testids() {
        let app = router(test_state());
        let en = app
            .clone()
            .oneshot(Request::get("/testing/login").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let es = app
            .oneshot(
                Request::get("/testing/login?lang=es")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let en_html = body_string(en).await;
        let es_html = body_string(es).await;
        for testid in [
            "login-form",
            "login-username-input",
            "login-password-input",
            "login-submit-btn",
        ] {
            assert!(en_html.contains(&format!("data-testid=\"{}\"", testid)));
            assert!(es_html.contains(&format!("data-testid=\"{}\"", testid)));
        }
        assert!(en_html.contains("QA Access"));
        assert!(es_html.contains("Acceso QA"));
    }
}
