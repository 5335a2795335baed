use crate::core::page::{Bootstrapper, ShellDocument};
use crate::domain::ports::Storage;
use crate::utils::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub files: Vec<String>,
    pub total_bytes: usize,
}

/// 產生正式版靜態檔案；輸出中不含任何代理設定
pub struct SiteBuilder<S: Storage> {
    storage: S,
    bootstrapper: Bootstrapper,
    title: String,
}

impl<S: Storage> SiteBuilder<S> {
    pub fn new(storage: S, title: &str) -> Self {
        Self {
            storage,
            bootstrapper: Bootstrapper::default(),
            title: title.to_string(),
        }
    }

    pub async fn build(&self) -> Result<BuildReport> {
        tracing::info!("📦 Rendering landing page");
        let mount = self.bootstrapper.mount(ShellDocument::new(&self.title))?;
        let html = mount.render_document();

        self.storage.write_file("index.html", html.as_bytes()).await?;
        tracing::debug!("Wrote index.html ({} bytes)", html.len());

        Ok(BuildReport {
            files: vec!["index.html".to_string()],
            total_bytes: html.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::AppError;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                AppError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_build_writes_bootstrapped_index() {
        let storage = MockStorage::new();
        let builder = SiteBuilder::new(storage.clone(), "Demo");

        let report = builder.build().await.unwrap();

        assert_eq!(report.files, vec!["index.html"]);
        let html = String::from_utf8(storage.get_file("index.html").await.unwrap()).unwrap();
        assert_eq!(html.len(), report.total_bytes);
        assert!(html.starts_with("<!doctype html>"));
        assert!(html.contains("<title>Demo</title>"));
        assert!(html.contains("id=\"response\""));
        assert!(!html.contains("43280"));
    }
}
