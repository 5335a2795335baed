use crate::adapters::storage::LocalStorage;
use crate::app::serve_file;
use axum::extract::{Path, State};
use axum::http::Uri;
use axum::response::{Html, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::Level;

pub const HELLO_FRAGMENT: &str = r#"<div class="alert alert-success">
    <svg xmlns="http://www.w3.org/2000/svg" class="stroke-current shrink-0 h-6 w-6" fill="none" viewBox="0 0 24 24">
        <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M9 12l2 2 4-4m6 2a9 9 0 11-18 0 9 9 0 0118 0z" />
    </svg>
    <span>Hello from the API via HTMX!</span>
</div>"#;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct HelloRequest {
    pub name: Option<String>,
}

#[derive(Clone)]
struct BackendState {
    static_files: LocalStorage,
}

/// `/api` 底下的路由
pub fn api_router() -> Router {
    Router::new()
        .route("/hello", get(hello).post(hello_post))
        .route("/hello-htmx", get(hello_htmx))
}

/// 後端完整路由：API 加上正式版建置輸出
pub fn router(static_files: LocalStorage) -> Router {
    let state = BackendState { static_files };

    Router::new()
        .nest("/api", api_router())
        .merge(
            Router::new()
                .route("/", get(index))
                .route("/assets/*path", get(asset))
                .fallback(root_file)
                .with_state(state),
        )
        .layer(TraceLayer::new_for_http().on_response(DefaultOnResponse::new().level(Level::INFO)))
}

async fn hello() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Hello from the API!".to_string(),
    })
}

async fn hello_post(body: Option<Json<HelloRequest>>) -> Json<MessageResponse> {
    let name = body
        .and_then(|Json(req)| req.name)
        .unwrap_or_else(|| "World".to_string());
    Json(MessageResponse {
        message: format!("Hello, {}!", name),
    })
}

async fn hello_htmx() -> Html<&'static str> {
    Html(HELLO_FRAGMENT)
}

async fn index(State(state): State<BackendState>) -> Response {
    serve_file(&state.static_files, "index.html").await
}

async fn asset(State(state): State<BackendState>, Path(path): Path<String>) -> Response {
    serve_file(&state.static_files, &format!("assets/{}", path)).await
}

/// 建置輸出根目錄的其他檔案，例如 `/vite.svg`
async fn root_file(State(state): State<BackendState>, uri: Uri) -> Response {
    serve_file(&state.static_files, uri.path()).await
}
