//! HTTP servers
//!
//! - **dev_server**: landing page + dev proxy (development only)
//! - **backend**: API routes + production static files

pub mod backend;
pub mod dev_server;

use crate::domain::ports::Storage;
use crate::utils::error::{AppError, Result};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

/// axum 伺服器包裝，支援 Ctrl-C 優雅關閉
pub struct HttpServer {
    name: &'static str,
    bind_addr: SocketAddr,
    router: Router,
}

impl HttpServer {
    pub fn new(name: &'static str, bind_addr: SocketAddr) -> Self {
        Self {
            name,
            bind_addr,
            router: Router::new(),
        }
    }

    pub fn with_router(mut self, router: Router) -> Self {
        self.router = router;
        self
    }

    pub async fn serve(self) -> Result<()> {
        let listener = TcpListener::bind(self.bind_addr)
            .await
            .map_err(|e| AppError::server(format!("Failed to bind {}: {}", self.bind_addr, e)))?;
        self.serve_with_listener(listener).await
    }

    pub async fn serve_with_listener(self, listener: TcpListener) -> Result<()> {
        let addr = listener.local_addr()?;
        info!("🚀 {} listening on http://{}", self.name, addr);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| AppError::server(format!("{} error: {}", self.name, e)))?;

        info!("👋 {} stopped", self.name);
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

fn content_type_for(path: &str) -> String {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    if mime.type_() == mime_guess::mime::TEXT {
        format!("{}; charset=utf-8", mime)
    } else {
        mime.to_string()
    }
}

/// 從 Storage 讀取靜態檔案；拒絕跳出根目錄的路徑
pub(crate) async fn serve_file<S: Storage>(storage: &S, path: &str) -> Response {
    let path = path.trim_start_matches('/');
    if path.is_empty() || path.split('/').any(|segment| segment == ".." || segment.is_empty()) {
        return StatusCode::NOT_FOUND.into_response();
    }

    match storage.read_file(path).await {
        Ok(data) => ([(header::CONTENT_TYPE, content_type_for(path))], data).into_response(),
        Err(e) => {
            tracing::debug!("Static file '{}' not served: {}", path, e);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}
