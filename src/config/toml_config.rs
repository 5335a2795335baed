use crate::core::binder::{BinderOptions, DEFAULT_FAILURE_MESSAGE};
use crate::core::proxy::{ProxyRule, ProxyTable};
use crate::domain::model::{FailurePolicy, SwapOrdering};
use crate::utils::error::{AppError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_port, Validate,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

pub const DEV_SERVER_PORT: u16 = 43210;
pub const BACKEND_PORT: u16 = 43280;
pub const BUILD_OUT_DIR: &str = "dist";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSection,
    pub dev_server: DevServerConfig,
    pub proxy: Vec<ProxyRule>,
    pub backend: BackendConfig,
    pub build: BuildConfig,
    pub binder: BinderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSection {
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DevServerConfig {
    pub host: String,
    pub port: u16,
    /// 開發時額外提供的靜態檔案目錄
    pub assets_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub host: String,
    pub port: u16,
    /// 正式版靜態檔案來源，通常就是 build 的輸出目錄
    pub static_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub out_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BinderConfig {
    pub ordering: SwapOrdering,
    pub on_failure: FailurePolicy,
    pub failure_message: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: AppSection::default(),
            dev_server: DevServerConfig::default(),
            proxy: vec![ProxyRule::default()],
            backend: BackendConfig::default(),
            build: BuildConfig::default(),
            binder: BinderConfig::default(),
        }
    }
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            title: crate::core::page::BRAND_LABEL.to_string(),
        }
    }
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEV_SERVER_PORT,
            assets_dir: None,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: BACKEND_PORT,
            static_dir: BUILD_OUT_DIR.to_string(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            out_dir: BUILD_OUT_DIR.to_string(),
        }
    }
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            ordering: SwapOrdering::Completion,
            on_failure: FailurePolicy::Silent,
            failure_message: None,
            timeout_seconds: 30,
        }
    }
}

fn socket_addr(field: &str, host: &str, port: u16) -> Result<SocketAddr> {
    let host = if host == "localhost" { "127.0.0.1" } else { host };
    format!("{}:{}", host, port)
        .parse()
        .map_err(|e| AppError::InvalidConfigValueError {
            field: field.to_string(),
            value: format!("{}:{}", host, port),
            reason: format!("Invalid listen address: {}", e),
        })
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AppError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${BACKEND_URL})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AppError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn dev_addr(&self) -> Result<SocketAddr> {
        socket_addr("dev_server", &self.dev_server.host, self.dev_server.port)
    }

    pub fn backend_addr(&self) -> Result<SocketAddr> {
        socket_addr("backend", &self.backend.host, self.backend.port)
    }

    pub fn proxy_table(&self) -> ProxyTable {
        ProxyTable::new(self.proxy.clone())
    }

    pub fn binder_options(&self) -> BinderOptions {
        BinderOptions {
            ordering: self.binder.ordering,
            on_failure: self.binder.on_failure,
            failure_message: self
                .binder
                .failure_message
                .clone()
                .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string()),
        }
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("app.title", &self.app.title)?;

        validate_port("dev_server.port", self.dev_server.port)?;
        self.dev_addr()?;
        if let Some(dir) = &self.dev_server.assets_dir {
            validate_path("dev_server.assets_dir", dir)?;
        }

        self.proxy_table().validate()?;

        validate_port("backend.port", self.backend.port)?;
        self.backend_addr()?;
        validate_path("backend.static_dir", &self.backend.static_dir)?;

        validate_path("build.out_dir", &self.build.out_dir)?;

        // 未設定時使用預設錯誤片段
        if let Some(message) = &self.binder.failure_message {
            validate_non_empty_string("binder.failure_message", message)?;
        }

        Ok(())
    }
}
