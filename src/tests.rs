//! Integration tests against a mock logbook backend.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Path, Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::app::App;
use crate::auth::{
    refresh_auth_settings, stored_auth_settings, RefreshSchedule, SessionState, SettingsRefresher,
};
use crate::config::{Config, LogFormat};
use crate::errors::{HttpErrorKind, SubmitError};
use crate::models::{AttachmentCreate, ListQuery, LogDraft, LogSubtype};
use crate::operations::*;
use crate::routes::LayoutKind;
use crate::selectors::*;
use crate::storage::{ClientStorage, FileStorage, MemoryStorage, AUTH_URL_KEY, USE_CERN_SSO_KEY};
use crate::views::{create_log, LayoutModel, ViewModel};
use crate::AppContext;

/// A request as the backend saw it.
#[derive(Debug, Clone)]
struct Recorded {
    method: String,
    path: String,
    query: Option<String>,
    authorization: Option<String>,
    body: Value,
}

#[derive(Clone, Default)]
struct Backend {
    requests: Arc<Mutex<Vec<Recorded>>>,
    fail_with: Arc<Mutex<Option<StatusCode>>>,
    failing_paths: Arc<Mutex<Vec<(String, StatusCode)>>>,
}

/// Test fixture: a mock backend on a random port.
struct TestFixture {
    backend: Backend,
    base_url: String,
}

impl TestFixture {
    async fn new() -> Self {
        let backend = Backend::default();
        let app = mock_router(backend.clone());

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        TestFixture {
            backend,
            base_url: format!("http://{}/", addr),
        }
    }

    fn context(&self, storage: Arc<dyn ClientStorage>) -> AppContext {
        AppContext::new(&self.base_url, Duration::from_secs(5), storage).unwrap()
    }

    /// Context for a signed-in user.
    fn signed_in(&self) -> AppContext {
        self.context(Arc::new(MemoryStorage::with_token("test-token")))
    }

    fn config(&self, storage_path: std::path::PathBuf) -> Config {
        Config {
            api_url: self.base_url.clone(),
            storage_path,
            log_level: "warn".to_string(),
            log_format: LogFormat::Text,
            request_timeout: Duration::from_secs(5),
            settings_refresh: RefreshSchedule::Every(Duration::from_secs(3600)),
            session_token: None,
        }
    }

    fn fail_with(&self, status: StatusCode) {
        *self.backend.fail_with.lock().unwrap() = Some(status);
    }

    /// Fail only requests to `path`.
    fn fail_path(&self, path: &str, status: StatusCode) {
        self.backend
            .failing_paths
            .lock()
            .unwrap()
            .push((path.to_string(), status));
    }

    fn recover(&self) {
        *self.backend.fail_with.lock().unwrap() = None;
    }

    fn requests(&self) -> Vec<Recorded> {
        self.backend.requests.lock().unwrap().clone()
    }

    fn requests_to(&self, method: &str, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }
}

fn mock_router(backend: Backend) -> Router {
    Router::new()
        .route("/setting", get(get_setting))
        .route("/runs", get(list_runs))
        .route("/runs/{id}", get(get_run).patch(link_log))
        .route("/logs", get(list_logs).post(create_log_handler))
        .route("/logs/{id}", get(get_log))
        .route("/logs/{id}/runs", patch(link_run))
        .route("/logs/{id}/attachments", get(list_attachments))
        .route("/attachments", post(create_attachment))
        .route("/overview", get(get_overview))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}/logs", get(list_user_logs))
        .route("/users/{id}/tokens", get(list_tokens).post(create_token_handler))
        .route("/user/profile", get(get_profile))
        .layer(middleware::from_fn_with_state(backend.clone(), record))
        .with_state(backend)
}

async fn record(State(backend): State<Backend>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();

    backend.requests.lock().unwrap().push(Recorded {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        authorization: parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&bytes).unwrap_or(Value::Null),
    });

    let path = parts.uri.path().to_string();
    let forced = *backend.fail_with.lock().unwrap();
    let forced = forced.or_else(|| {
        let failing = backend.failing_paths.lock().unwrap();
        failing.iter().find(|(p, _)| *p == path).map(|(_, status)| *status)
    });
    if let Some(status) = forced {
        let body = json!({ "statusCode": status.as_u16(), "message": "Backend unavailable" });
        return (status, Json(body)).into_response();
    }
    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn log_json(log_id: u64, parent: Option<u64>, root: Option<u64>, minute: u32) -> Value {
    json!({
        "logId": log_id,
        "subtype": if parent.is_some() { "comment" } else { "run" },
        "origin": "human",
        "creationTime": format!("2018-10-01T12:{:02}:00Z", minute),
        "title": format!("Log {}", log_id),
        "body": "text",
        "userId": 3,
        "commentFkParentLogId": parent,
        "commentFkRootLogId": root,
    })
}

async fn get_setting() -> Json<Value> {
    Json(json!({ "data": { "USE_CERN_SSO": true, "AUTH_URL": "https://sso.example/authorize" } }))
}

async fn list_runs() -> Json<Value> {
    Json(json!({
        "data": [
            { "runNumber": 1, "runType": "PHYSICS", "nDetectors": 12 },
            { "runNumber": 2, "runType": "COSMICS" },
        ],
        "count": 40,
    }))
}

async fn get_run(Path(id): Path<u64>) -> Response {
    if id == 404 {
        return (StatusCode::NOT_FOUND, Json(json!({ "message": "Run with this id not found" })))
            .into_response();
    }
    Json(json!({ "id": id, "status": "closed" })).into_response()
}

async fn link_log(Path(id): Path<u64>, Json(body): Json<Value>) -> Json<Value> {
    let log_id = body["logId"].as_u64().unwrap_or_default();
    Json(json!({ "runNumber": id, "logs": [log_json(log_id, None, None, 0)] }))
}

/// A thread rooted at log 1: comment 6 answers comment 5, which answers 1.
async fn list_logs() -> Json<Value> {
    Json(json!({
        "data": [
            log_json(1, None, None, 0),
            log_json(6, Some(5), Some(1), 30),
            log_json(5, Some(1), Some(1), 10),
        ],
        "count": 3,
    }))
}

async fn get_log(Path(id): Path<u64>) -> Response {
    match id {
        1 => Json(log_json(1, None, None, 0)).into_response(),
        5 => Json(log_json(5, Some(1), Some(1), 10)).into_response(),
        _ => (StatusCode::NOT_FOUND, Json(json!({ "message": "Log not found" }))).into_response(),
    }
}

async fn create_log_handler(Json(body): Json<Value>) -> Response {
    if body["title"].as_str() == Some("reject") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": ["title must not be reject", "text is empty"] })),
        )
            .into_response();
    }
    let runs = match body["run"].as_u64() {
        Some(run) => json!([{ "runNumber": run }]),
        None => json!([]),
    };
    Json(json!({
        "logId": 100,
        "subtype": body["subtype"],
        "origin": body["origin"],
        "creationTime": "2018-10-01T13:00:00Z",
        "title": body["title"],
        "text": body["body"],
        "userId": body["user"],
        "commentFkParentLogId": body["parentId"],
        "commentFkRootLogId": body["rootId"],
        "runs": runs,
    }))
    .into_response()
}

async fn link_run(Path(id): Path<u64>, Json(body): Json<Value>) -> Json<Value> {
    let mut log = log_json(id, None, None, 0);
    log["runs"] = json!([{ "runNumber": body["runNumber"] }]);
    Json(log)
}

async fn list_attachments(Path(id): Path<u64>) -> Json<Value> {
    Json(json!([
        {
            "fileId": 8,
            "logId": id,
            "fileName": "plot.png",
            "fileMime": "image/png",
            "fileSize": 4,
        },
    ]))
}

async fn create_attachment(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "attachmentId": 9,
        "logId": body["logId"],
        "fileName": body["fileName"],
        "fileMime": body["fileMime"],
        "fileSize": body["fileSize"],
    }))
}

async fn get_overview() -> Json<Value> {
    Json(json!([
        { "subsystemName": "TPC", "subsystemId": 1, "logCount": 12 },
        { "subsystemName": "ITS", "subsystemId": 2, "logCount": 0 },
    ]))
}

async fn get_user(Path(id): Path<u64>) -> Json<Value> {
    Json(json!({ "userId": id, "name": "Test User", "externalUserId": 1200 }))
}

async fn list_user_logs(Path(id): Path<u64>) -> Json<Value> {
    let mut log = log_json(1, None, None, 0);
    log["userId"] = json!(id);
    Json(json!({ "data": [log], "count": 1 }))
}

async fn list_tokens() -> Json<Value> {
    Json(json!([{ "tokenId": 1, "description": "ci" }]))
}

async fn create_token_handler(Path(id): Path<u64>, Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "tokenId": 2,
        "userId": id,
        "description": body["description"],
        "token": "secret-value",
    }))
}

async fn get_profile() -> Json<Value> {
    Json(json!({
        "userData": { "userId": 3, "name": "Test User" },
        "profileData": { "name": "Test User", "email": "user@example.org" },
    }))
}

// ------------------------------------------------------------------
// Runs
// ------------------------------------------------------------------

#[tokio::test]
async fn test_fetch_run_sets_current() {
    let fixture = TestFixture::new().await;
    let ctx = fixture.signed_in();

    fetch_run(&ctx, 42).await.unwrap();

    let state = ctx.store.snapshot();
    let run = select_current_run(&state).unwrap();
    assert_eq!(run.run_number, 42);
    assert_eq!(run.status.as_deref(), Some("closed"));
    assert!(!select_is_fetching_run(&state));
    assert!(!select_has_errors(&state));
}

#[tokio::test]
async fn test_fetch_runs_replaces_list() {
    let fixture = TestFixture::new().await;
    let ctx = fixture.signed_in();

    fetch_runs(&ctx, &ListQuery::page(1, 2)).await.unwrap();

    let state = ctx.store.snapshot();
    assert_eq!(select_runs(&state).len(), 2);
    assert_eq!(select_run_count(&state), 40);
    assert_eq!(select_runs(&state)[0].n_detectors, Some(12));

    let sent = fixture.requests_to("GET", "/runs");
    assert_eq!(sent[0].query.as_deref(), Some("pageNumber=1&pageSize=2"));
}

#[tokio::test]
async fn test_failed_fetch_keeps_list_and_logs_error() {
    let fixture = TestFixture::new().await;
    let ctx = fixture.signed_in();
    fetch_runs(&ctx, &ListQuery::default()).await.unwrap();

    fixture.fail_with(StatusCode::INTERNAL_SERVER_ERROR);
    let err = fetch_runs(&ctx, &ListQuery::default()).await.unwrap_err();
    assert_eq!(err.kind, HttpErrorKind::Status);
    assert_eq!(err.status, 500);
    assert_eq!(err.message, "Backend unavailable");

    let state = ctx.store.snapshot();
    assert_eq!(select_runs(&state).len(), 2);
    assert!(!select_is_fetching_runs(&state));
    assert_eq!(select_errors(&state).len(), 1);
    assert_eq!(state.runs.error.as_ref().map(|e| e.status), Some(500));
}

#[tokio::test]
async fn test_missing_run_reports_server_message() {
    let fixture = TestFixture::new().await;
    let ctx = fixture.signed_in();

    let err = fetch_run(&ctx, 404).await.unwrap_err();
    assert!(err.to_string().contains("Run with this id not found"));
    assert!(ctx.store.select(|s| select_current_run(s).is_none()));
}

#[tokio::test]
async fn test_link_log_to_run_updates_current() {
    let fixture = TestFixture::new().await;
    let ctx = fixture.signed_in();

    fetch_run(&ctx, 42).await.unwrap();
    link_log_to_run(&ctx, 1, 42).await.unwrap();

    let run = ctx.store.select(|s| select_current_run(s).cloned()).unwrap();
    assert_eq!(run.logs.len(), 1);
    assert_eq!(fixture.requests_to("PATCH", "/runs/42")[0].body, json!({ "logId": 1 }));
}

// ------------------------------------------------------------------
// Logs and the draft
// ------------------------------------------------------------------

#[tokio::test]
async fn test_submit_run_log() {
    let fixture = TestFixture::new().await;
    let ctx = fixture.signed_in();

    create_log::init(&ctx, create_log::CreateLogTarget::Run(Some(7)))
        .await
        .unwrap();
    create_log::set_title(&ctx, "t");
    create_log::set_text(&ctx, "b");
    create_log::submit(&ctx).await.unwrap();

    let posted = fixture.requests_to("POST", "/logs");
    assert_eq!(posted.len(), 1);
    let body = &posted[0].body;
    assert_eq!(body["title"], "t");
    assert_eq!(body["body"], "b");
    assert!(body.get("text").is_none());
    assert_eq!(body["run"], 7);
    assert_eq!(body["subtype"], "run");
    assert_eq!(body["user"], 3);
    assert!(body.get("parentId").is_none());

    let state = ctx.store.snapshot();
    assert!(select_log_draft(&state).is_none());
    assert_eq!(select_route(&state), "/logs");
    assert_eq!(select_current_log(&state).map(|l| l.log_id), Some(100));
}

#[tokio::test]
async fn test_comment_joins_parent_thread() {
    let fixture = TestFixture::new().await;
    let ctx = fixture.signed_in();

    // Log 5 is itself a comment; its root is log 1
    create_log::init(&ctx, create_log::CreateLogTarget::Comment { parent_id: 5 })
        .await
        .unwrap();
    let draft = ctx.store.select(|s| select_log_draft(s).cloned()).unwrap();
    assert_eq!(draft.subtype(), LogSubtype::Comment);
    assert_eq!(draft.title(), "Re: Log 5");

    create_log::set_text(&ctx, "agreed");
    create_log::set_run_number(&ctx, Some(9));
    create_log::submit(&ctx).await.unwrap();

    let body = &fixture.requests_to("POST", "/logs")[0].body;
    assert_eq!(body["subtype"], "comment");
    assert_eq!(body["parentId"], 5);
    assert_eq!(body["rootId"], 1);
    assert!(body.get("run").is_none());
}

#[tokio::test]
async fn test_failed_submit_keeps_draft() {
    let fixture = TestFixture::new().await;
    let ctx = fixture.signed_in();

    create_log::init(&ctx, create_log::CreateLogTarget::Run(Some(7)))
        .await
        .unwrap();
    create_log::set_title(&ctx, "reject");

    let err = create_log::submit(&ctx).await.unwrap_err();
    match err {
        SubmitError::Http(e) => {
            assert_eq!(e.status, 400);
            assert_eq!(e.message, "title must not be reject; text is empty");
        }
        other => panic!("unexpected error: {:?}", other),
    }

    let state = ctx.store.snapshot();
    assert_eq!(select_log_draft(&state).map(LogDraft::title), Some("reject"));
    assert_eq!(select_route(&state), "/");
    assert!(select_has_errors(&state));
}

#[tokio::test]
async fn test_submit_validates_before_posting() {
    let fixture = TestFixture::new().await;
    let ctx = fixture.signed_in();

    assert!(matches!(create_log::submit(&ctx).await, Err(SubmitError::NoDraft)));

    create_log::init(&ctx, create_log::CreateLogTarget::Run(None))
        .await
        .unwrap();
    create_log::set_title(&ctx, "t");
    assert!(matches!(
        create_log::submit(&ctx).await,
        Err(SubmitError::MissingRunNumber)
    ));
    assert!(fixture.requests_to("POST", "/logs").is_empty());
}

#[tokio::test]
async fn test_submit_with_attachment() {
    let fixture = TestFixture::new().await;
    let ctx = fixture.signed_in();
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("notes.txt");
    std::fs::write(&file, b"beam dump at 12:03").unwrap();

    create_log::init(&ctx, create_log::CreateLogTarget::Run(Some(7)))
        .await
        .unwrap();
    create_log::set_title(&ctx, "t");
    create_log::attach_file(&ctx, &file).await.unwrap();
    create_log::submit(&ctx).await.unwrap();

    let body = &fixture.requests_to("POST", "/logs")[0].body;
    assert_eq!(body["attachments"][0]["fileName"], "notes.txt");
    assert_eq!(body["attachments"][0]["fileMime"], "text/plain");
    assert_eq!(body["attachments"][0]["fileSize"], 18);
}

#[tokio::test]
async fn test_link_run_to_log() {
    let fixture = TestFixture::new().await;
    let ctx = fixture.signed_in();

    fetch_log(&ctx, 1).await.unwrap();
    link_run_to_log(&ctx, 1, 7).await.unwrap();

    let log = ctx.store.select(|s| select_current_log(s).cloned()).unwrap();
    assert_eq!(log.runs[0].run_number, 7);
    assert_eq!(fixture.requests_to("PATCH", "/logs/1/runs")[0].body, json!({ "runNumber": 7 }));
}

// ------------------------------------------------------------------
// Credentials
// ------------------------------------------------------------------

#[tokio::test]
async fn test_bearer_token_attached() {
    let fixture = TestFixture::new().await;
    let ctx = fixture.signed_in();

    fetch_logs(&ctx, &ListQuery::default()).await.unwrap();
    fetch_subsystem_overviews(&ctx).await.unwrap();

    let logs = fixture.requests_to("GET", "/logs");
    assert_eq!(logs[0].authorization.as_deref(), Some("Bearer test-token"));
    let overview = fixture.requests_to("GET", "/overview");
    assert_eq!(overview[0].authorization, None);

    let state = ctx.store.snapshot();
    assert_eq!(select_subsystem_overviews(&state).len(), 2);
}

#[tokio::test]
async fn test_no_token_no_header() {
    let fixture = TestFixture::new().await;
    let ctx = fixture.context(Arc::new(MemoryStorage::new()));

    fetch_runs(&ctx, &ListQuery::default()).await.unwrap();
    assert_eq!(fixture.requests_to("GET", "/runs")[0].authorization, None);
}

// ------------------------------------------------------------------
// Users, tokens, attachments
// ------------------------------------------------------------------

#[tokio::test]
async fn test_fetch_user_and_logs() {
    let fixture = TestFixture::new().await;
    let ctx = fixture.signed_in();

    let query = ListQuery::default();
    let (user, logs) = tokio::join!(fetch_user(&ctx, 3), fetch_user_logs(&ctx, 3, &query));
    user.unwrap();
    logs.unwrap();

    let state = ctx.store.snapshot();
    assert_eq!(select_current_user(&state).and_then(|u| u.name.as_deref()), Some("Test User"));
    assert_eq!(select_user_logs(&state)[0].author_id(), Some(3));
    assert_eq!(select_user_log_count(&state), 1);
    assert!(!select_is_fetching_user(&state));
}

#[tokio::test]
async fn test_create_token_exposes_secret_once() {
    let fixture = TestFixture::new().await;
    let ctx = fixture.signed_in();

    fetch_tokens(&ctx, 3).await.unwrap();
    assert!(ctx.store.select(|s| select_created_token(s).is_none()));

    create_token(&ctx, 3, "nightly").await.unwrap();
    let state = ctx.store.snapshot();
    assert_eq!(select_tokens(&state).len(), 2);
    assert_eq!(
        select_created_token(&state).and_then(|t| t.token.as_deref()),
        Some("secret-value")
    );
    assert_eq!(
        fixture.requests_to("POST", "/users/3/tokens")[0].body,
        json!({ "description": "nightly" })
    );
}

#[tokio::test]
async fn test_attachments() {
    let fixture = TestFixture::new().await;
    let ctx = fixture.signed_in();

    fetch_attachments(&ctx, 1).await.unwrap();
    upload_attachment(&ctx, 1, AttachmentCreate::from_bytes("run.csv", b"a,b\n1,2\n"))
        .await
        .unwrap();

    let state = ctx.store.snapshot();
    let names: Vec<&str> = select_attachments(&state)
        .iter()
        .map(|a| a.file_name.as_str())
        .collect();
    assert_eq!(names, vec!["plot.png", "run.csv"]);

    let body = &fixture.requests_to("POST", "/attachments")[0].body;
    assert_eq!(body["logId"], 1);
    assert_eq!(body["fileMime"], "text/csv");
    assert_eq!(body["fileData"], "YSxiCjEsMgo=");
}

// ------------------------------------------------------------------
// Auth settings
// ------------------------------------------------------------------

#[tokio::test]
async fn test_refresh_persists_settings() {
    let fixture = TestFixture::new().await;
    let storage = MemoryStorage::new();
    let ctx = fixture.signed_in();

    let settings = refresh_auth_settings(&ctx.client, &storage).await.unwrap();
    assert!(settings.use_cern_sso);
    assert_eq!(storage.get(USE_CERN_SSO_KEY).as_deref(), Some("true"));
    assert_eq!(
        storage.get(AUTH_URL_KEY).as_deref(),
        Some("https://sso.example/authorize")
    );
    assert_eq!(fixture.requests_to("GET", "/setting")[0].authorization, None);
}

#[tokio::test]
async fn test_refresh_failure_keeps_stale_settings() {
    let fixture = TestFixture::new().await;
    let storage = MemoryStorage::new();
    storage.set(USE_CERN_SSO_KEY, "false").unwrap();
    storage.set(AUTH_URL_KEY, "https://old.example").unwrap();
    let ctx = fixture.signed_in();

    fixture.fail_with(StatusCode::BAD_GATEWAY);
    assert!(refresh_auth_settings(&ctx.client, &storage).await.is_none());
    assert_eq!(storage.get(AUTH_URL_KEY).as_deref(), Some("https://old.example"));
}

#[tokio::test]
async fn test_refresher_runs_until_stopped() {
    let fixture = TestFixture::new().await;
    let storage: Arc<dyn ClientStorage> = Arc::new(MemoryStorage::new());
    let ctx = fixture.context(storage.clone());

    let refresher = SettingsRefresher::start(
        ctx.client.clone(),
        storage.clone(),
        RefreshSchedule::Every(Duration::from_millis(20)),
    );

    let mut waited = Duration::ZERO;
    while fixture.requests_to("GET", "/setting").len() < 3 && waited < Duration::from_secs(5) {
        tokio::time::sleep(Duration::from_millis(10)).await;
        waited += Duration::from_millis(10);
    }
    assert!(refresher.is_running());
    refresher.stop().await;

    assert!(stored_auth_settings(storage.as_ref()).is_some());
    let seen = fixture.requests_to("GET", "/setting").len();
    assert!(seen >= 3);
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(fixture.requests_to("GET", "/setting").len(), seen);
}

// ------------------------------------------------------------------
// App shell
// ------------------------------------------------------------------

#[tokio::test]
async fn test_locked_out_app_shows_login() {
    let fixture = TestFixture::new().await;
    let dir = TempDir::new().unwrap();
    let config = fixture.config(dir.path().join("session.json"));
    let storage: Arc<dyn ClientStorage> =
        Arc::new(FileStorage::open(&config.storage_path).unwrap());
    let app = App::new(&config, storage).unwrap();
    assert_eq!(app.session(), SessionState::LockedOut);
    assert_eq!(app.routes().layout(), LayoutKind::Unauthorized);

    refresh_auth_settings(&app.context().client, app.context().storage.as_ref()).await;

    for path in ["/", "/callback", "/runs/42"] {
        let screen = app.navigate(path).await;
        assert!(matches!(screen.layout, LayoutModel::Unauthorized { .. }));
        assert_eq!(
            screen.body,
            ViewModel::Login {
                use_cern_sso: true,
                auth_url: Some("https://sso.example/authorize".to_string()),
            }
        );
    }
    // Nothing but the settings was fetched
    assert!(fixture.requests().iter().all(|r| r.path == "/setting"));
}

#[tokio::test]
async fn test_app_navigates_run_page() {
    let fixture = TestFixture::new().await;
    let dir = TempDir::new().unwrap();
    let config = fixture.config(dir.path().join("session.json"));
    let storage = Arc::new(FileStorage::open(&config.storage_path).unwrap());
    storage.set("token", "persisted-token").unwrap();

    // Reopening sees the persisted token
    let storage: Arc<dyn ClientStorage> =
        Arc::new(FileStorage::open(&config.storage_path).unwrap());
    let mut app = App::new(&config, storage).unwrap();
    assert_eq!(app.session(), SessionState::Authenticated);
    app.start();
    assert!(app.is_refreshing());

    let screen = app.navigate("/runs/42").await;
    assert_eq!(screen.route, "/runs/42");
    match &screen.body {
        ViewModel::Run { run_number, run, is_fetching } => {
            assert_eq!(*run_number, 42);
            assert_eq!(run.as_ref().map(|r| r.run_number), Some(42));
            assert!(!is_fetching);
        }
        other => panic!("unexpected view: {:?}", other),
    }
    let LayoutModel::Main { nav, .. } = &screen.layout else {
        panic!("expected main layout");
    };
    assert!(nav.iter().all(|n| !n.active));

    assert_eq!(
        fixture.requests_to("GET", "/runs/42")[0].authorization.as_deref(),
        Some("Bearer persisted-token")
    );
    app.shutdown().await;
}

#[tokio::test]
async fn test_app_log_page_loads_thread() {
    let fixture = TestFixture::new().await;
    let dir = TempDir::new().unwrap();
    let config = fixture.config(dir.path().join("session.json"));
    let app = App::new(&config, Arc::new(MemoryStorage::with_token("t"))).unwrap();

    let screen = app.navigate("/logs/1").await;
    assert!(matches!(screen.layout, LayoutModel::Main { .. }));
    let ViewModel::Log { log, comments, attachments, comment_draft, .. } = screen.body else {
        panic!("expected log view");
    };
    assert_eq!(log.map(|l| l.log_id), Some(1));
    let ids: Vec<u64> = comments.iter().map(|c| c.log_id).collect();
    assert_eq!(ids, vec![5, 6]);
    assert_eq!(attachments.len(), 1);
    assert_eq!(comment_draft.map(|d| d.subtype()), Some(LogSubtype::Comment));

    let thread = fixture.requests_to("GET", "/logs");
    assert_eq!(thread[0].query.as_deref(), Some("rootId=1"));
}

#[tokio::test]
async fn test_log_page_loads_thread_without_profile() {
    let fixture = TestFixture::new().await;
    let dir = TempDir::new().unwrap();
    let config = fixture.config(dir.path().join("session.json"));
    let app = App::new(&config, Arc::new(MemoryStorage::with_token("t"))).unwrap();

    fixture.fail_path("/user/profile", StatusCode::INTERNAL_SERVER_ERROR);
    let screen = app.navigate("/logs/1").await;

    let LayoutModel::Main { errors, .. } = &screen.layout else {
        panic!("expected main layout");
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].error.status, 500);

    let ViewModel::Log { log, comments, attachments, .. } = screen.body else {
        panic!("expected log view");
    };
    assert_eq!(log.map(|l| l.log_id), Some(1));
    assert_eq!(comments.len(), 2);
    assert_eq!(attachments.len(), 1);
}

#[tokio::test]
async fn test_log_page_stops_when_parent_is_missing() {
    let fixture = TestFixture::new().await;
    let dir = TempDir::new().unwrap();
    let config = fixture.config(dir.path().join("session.json"));
    let app = App::new(&config, Arc::new(MemoryStorage::with_token("t"))).unwrap();

    let screen = app.navigate("/logs/77").await;
    assert!(matches!(screen.body, ViewModel::Log { log: None, .. }));
    assert!(fixture.requests_to("GET", "/logs").is_empty());
    assert!(fixture.requests_to("GET", "/logs/77/attachments").is_empty());
}

#[tokio::test]
async fn test_submit_loads_log_list() {
    let fixture = TestFixture::new().await;
    let dir = TempDir::new().unwrap();
    let config = fixture.config(dir.path().join("session.json"));
    let app = App::new(&config, Arc::new(MemoryStorage::with_token("t"))).unwrap();

    app.navigate("/logs/create/runs/7").await;
    create_log::set_title(app.context(), "t");
    create_log::set_text(app.context(), "b");
    let screen = app.submit_log().await.unwrap();

    assert_eq!(screen.route, "/logs");
    assert_eq!(app.current_path(), "/logs");
    assert!(matches!(screen.body, ViewModel::Logs { count: 3, ref logs, .. } if logs.len() == 3));

    let paths: Vec<String> = fixture
        .requests()
        .into_iter()
        .map(|r| format!("{} {}", r.method, r.path))
        .collect();
    assert_eq!(paths, vec!["GET /user/profile", "POST /logs", "GET /logs"]);
}

#[tokio::test]
async fn test_app_unknown_path_falls_back_to_logs() {
    let fixture = TestFixture::new().await;
    let dir = TempDir::new().unwrap();
    let config = fixture.config(dir.path().join("session.json"));
    let app = App::new(&config, Arc::new(MemoryStorage::with_token("t"))).unwrap();

    let screen = app.navigate("/no/such/page").await;
    assert_eq!(screen.route, "/");
    assert_eq!(app.current_path(), "/");
    assert!(matches!(screen.body, ViewModel::Logs { count: 3, .. }));
    assert_eq!(app.render(), screen);
}

#[tokio::test]
async fn test_app_page_errors_go_to_banner() {
    let fixture = TestFixture::new().await;
    let dir = TempDir::new().unwrap();
    let config = fixture.config(dir.path().join("session.json"));
    let app = App::new(&config, Arc::new(MemoryStorage::with_token("t"))).unwrap();

    fixture.fail_with(StatusCode::SERVICE_UNAVAILABLE);
    let screen = app.navigate("/subsystems").await;
    let LayoutModel::Main { errors, .. } = &screen.layout else {
        panic!("expected main layout");
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].error.status, 503);

    fixture.recover();
    dismiss_error(app.context(), errors[0].id);
    let screen = app.navigate("/subsystems").await;
    assert!(matches!(
        screen.body,
        ViewModel::Subsystems { ref overviews, .. } if overviews.len() == 2
    ));
    assert!(matches!(screen.layout, LayoutModel::Main { ref errors, .. } if errors.is_empty()));
}

#[tokio::test]
async fn test_app_tokens_page_loads_profile_first() {
    let fixture = TestFixture::new().await;
    let dir = TempDir::new().unwrap();
    let config = fixture.config(dir.path().join("session.json"));
    let app = App::new(&config, Arc::new(MemoryStorage::with_token("t"))).unwrap();

    let screen = app.navigate("/tokens").await;
    assert!(matches!(screen.body, ViewModel::Tokens { ref tokens, .. } if tokens.len() == 1));
    let LayoutModel::Main { profile_name, .. } = &screen.layout else {
        panic!("expected main layout");
    };
    assert_eq!(profile_name.as_deref(), Some("Test User"));

    let paths: Vec<String> = fixture.requests().into_iter().map(|r| r.path).collect();
    assert_eq!(paths, vec!["/user/profile", "/users/3/tokens"]);
}

