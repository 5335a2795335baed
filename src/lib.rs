pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::{http::HttpFetcher, storage::LocalStorage};
pub use crate::config::{toml_config::AppConfig, CliConfig, Command};
pub use crate::core::{
    binder::FetchBinder,
    build::SiteBuilder,
    page::{Bootstrapper, MountPoint, ShellDocument},
    proxy::{DevProxy, ProxyRule, ProxyTable},
};
pub use crate::utils::error::{AppError, Result};
