use crate::domain::model::{FetchResponse, HttpMethod};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 觸發器送出請求的通道。非 2xx 狀態仍回傳 `Ok`，只有網路層錯誤才是 `Err`。
#[async_trait]
pub trait FragmentFetcher: Send + Sync {
    async fn fetch(&self, method: HttpMethod, path: &str) -> Result<FetchResponse>;
}
