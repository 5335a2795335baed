use crate::utils::error::{AppError, Result};
use crate::utils::validation::{validate_path_prefix, validate_url, Validate};
use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

fn default_true() -> bool {
    true
}

/// 開發模式的轉送規則：路徑前綴符合時轉送到 `target`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyRule {
    pub path_prefix: String,
    pub target: String,
    #[serde(default = "default_true")]
    pub change_origin: bool,
}

impl ProxyRule {
    pub fn new(path_prefix: &str, target: &str) -> Self {
        Self {
            path_prefix: path_prefix.to_string(),
            target: target.to_string(),
            change_origin: true,
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.path_prefix)
    }

    /// 保留原始路徑與查詢字串，只替換來源
    pub fn target_url(&self, uri: &Uri) -> Result<Url> {
        let mut url = Url::parse(&self.target)?;
        let base = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{}{}", base, uri.path()));
        url.set_query(uri.query());
        Ok(url)
    }
}

impl Default for ProxyRule {
    fn default() -> Self {
        Self::new("/api", "http://localhost:43280")
    }
}

impl Validate for ProxyRule {
    fn validate(&self) -> Result<()> {
        validate_path_prefix("proxy.path_prefix", &self.path_prefix)?;
        validate_url("proxy.target", &self.target)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyTable {
    rules: Vec<ProxyRule>,
}

impl ProxyTable {
    pub fn new(rules: Vec<ProxyRule>) -> Self {
        Self { rules }
    }

    /// 依宣告順序取第一條符合的規則
    pub fn match_path(&self, path: &str) -> Option<&ProxyRule> {
        self.rules.iter().find(|rule| rule.matches(path))
    }

    pub fn rules(&self) -> &[ProxyRule] {
        &self.rules
    }
}

impl Validate for ProxyTable {
    fn validate(&self) -> Result<()> {
        self.rules.iter().try_for_each(Validate::validate)
    }
}

const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP {
        headers.remove(*name);
    }
    headers.remove(header::CONTENT_LENGTH);
}

#[derive(Debug)]
pub struct ProxiedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl IntoResponse for ProxiedResponse {
    fn into_response(self) -> Response {
        (self.status, self.headers, self.body).into_response()
    }
}

#[derive(Debug, Clone)]
pub struct DevProxy {
    table: ProxyTable,
    client: Client,
}

impl DevProxy {
    /// 轉送用的 client 不跟隨重新導向，3xx 原樣交回瀏覽器
    pub fn new(table: ProxyTable) -> Result<Self> {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { table, client })
    }

    pub fn table(&self) -> &ProxyTable {
        &self.table
    }

    pub fn route(&self, path: &str) -> Option<&ProxyRule> {
        self.table.match_path(path)
    }

    pub async fn forward(
        &self,
        rule: &ProxyRule,
        method: Method,
        uri: &Uri,
        mut headers: HeaderMap,
        body: Bytes,
    ) -> Result<ProxiedResponse> {
        let url = rule.target_url(uri)?;
        let original_host = headers.remove(header::HOST);
        strip_hop_by_hop(&mut headers);

        if rule.change_origin {
            // Host 由 reqwest 依目標網址填入；Origin 改寫為目標來源
            let origin = url.origin().ascii_serialization();
            if headers.contains_key(header::ORIGIN) {
                let value = HeaderValue::from_str(&origin)
                    .map_err(|e| AppError::proxy(format!("Invalid origin '{}': {}", origin, e)))?;
                headers.insert(header::ORIGIN, value);
            }
        } else if let Some(host) = original_host {
            headers.insert(header::HOST, host);
        }

        tracing::debug!("🔀 {} {} -> {}", method, uri, url);

        let response = self
            .client
            .request(method, url.clone())
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|e| AppError::proxy(format!("Forwarding to {} failed: {}", url, e)))?;

        let status = response.status();
        let mut response_headers = response.headers().clone();
        strip_hop_by_hop(&mut response_headers);
        let body = response.bytes().await?;

        tracing::debug!("🔀 {} <- {} ({} bytes)", uri, status, body.len());

        Ok(ProxiedResponse {
            status,
            headers: response_headers,
            body,
        })
    }
}
