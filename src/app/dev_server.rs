use crate::adapters::storage::LocalStorage;
use crate::app::serve_file;
use crate::core::page::MountPoint;
use crate::core::proxy::DevProxy;
use axum::body::to_bytes;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::Level;

/// 代理請求本體的上限
const MAX_PROXY_BODY_BYTES: usize = 16 * 1024 * 1024;

#[derive(Clone)]
struct DevServerState {
    page: Arc<String>,
    proxy: Arc<DevProxy>,
    assets: Option<LocalStorage>,
}

/// 開發伺服器：提供已掛載的頁面，並轉送符合規則的請求
pub fn router(mount: &MountPoint, proxy: DevProxy, assets: Option<LocalStorage>) -> Router {
    let state = DevServerState {
        page: Arc::new(mount.render_document()),
        proxy: Arc::new(proxy),
        assets,
    };

    Router::new()
        .route("/", get(index))
        .route("/index.html", get(index))
        .fallback(fallback)
        .with_state(state)
        .layer(TraceLayer::new_for_http().on_response(DefaultOnResponse::new().level(Level::INFO)))
}

async fn index(State(state): State<DevServerState>) -> Html<String> {
    Html(state.page.as_str().to_string())
}

async fn fallback(State(state): State<DevServerState>, request: Request) -> Response {
    let path = request.uri().path().to_string();

    // 代理規則優先於靜態檔案
    if let Some(rule) = state.proxy.route(&path) {
        let (parts, body) = request.into_parts();
        let body = match to_bytes(body, MAX_PROXY_BODY_BYTES).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Rejected proxy body for {}: {}", path, e);
                return StatusCode::PAYLOAD_TOO_LARGE.into_response();
            }
        };

        return match state
            .proxy
            .forward(rule, parts.method, &parts.uri, parts.headers, body)
            .await
        {
            Ok(response) => response.into_response(),
            Err(e) => {
                tracing::error!("❌ Proxy {} -> {} failed: {}", path, rule.target, e);
                (StatusCode::BAD_GATEWAY, e.user_friendly_message()).into_response()
            }
        };
    }

    match &state.assets {
        Some(assets) => serve_file(assets, &path).await,
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
