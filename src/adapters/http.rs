use crate::domain::model::{FetchResponse, HttpMethod};
use crate::domain::ports::FragmentFetcher;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// 以 reqwest 對指定來源送出觸發器請求
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    base_url: Url,
    client: Client,
}

impl HttpFetcher {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: Url::parse(base_url)?,
            client,
        })
    }
}

#[async_trait]
impl FragmentFetcher for HttpFetcher {
    async fn fetch(&self, method: HttpMethod, path: &str) -> Result<FetchResponse> {
        let url = self.base_url.join(path)?;
        tracing::debug!("Making {} request to: {}", method, url);

        let response = self
            .client
            .request(method.as_reqwest(), url)
            // 與 htmx 送出的請求標頭一致，讓後端可以分辨片段請求
            .header("HX-Request", "true")
            .send()
            .await?;

        let status = response.status().as_u16();
        tracing::debug!("Response status: {}", status);

        // 本體一律當作原始文字，不解析
        let body = response.text().await?;
        Ok(FetchResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_fetch_returns_raw_body_and_status() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/hello-htmx")
                .header("HX-Request", "true");
            then.status(200)
                .header("Content-Type", "text/html")
                .body("<span>hi</span>");
        });

        let fetcher = HttpFetcher::new(&server.base_url()).unwrap();
        let response = fetcher
            .fetch(HttpMethod::Get, "/api/hello-htmx")
            .await
            .unwrap();

        mock.assert();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, "<span>hi</span>");
    }

    #[tokio::test]
    async fn test_fetch_non_success_is_not_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/hello-htmx");
            then.status(500).body("boom");
        });

        let fetcher = HttpFetcher::new(&server.base_url()).unwrap();
        let response = fetcher
            .fetch(HttpMethod::Get, "/api/hello-htmx")
            .await
            .unwrap();

        assert_eq!(response.status, 500);
        assert!(!response.is_success());
    }
}
