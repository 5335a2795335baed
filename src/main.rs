use boilerplate_web::app::{backend, dev_server, HttpServer};
use boilerplate_web::utils::{logger, validation::Validate};
use boilerplate_web::{
    AppConfig, AppError, Bootstrapper, CliConfig, Command, DevProxy, FetchBinder, HttpFetcher,
    LocalStorage, ShellDocument, SiteBuilder,
};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::debug!("CLI config: {:?}", cli);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => fail(e),
    };

    if let Err(e) = run(cli.command, config).await {
        fail(e);
    }

    Ok(())
}

fn load_config(cli: &CliConfig) -> boilerplate_web::Result<AppConfig> {
    let config = if cli.config.exists() {
        tracing::info!("📁 Loading configuration from: {}", cli.config.display());
        AppConfig::from_file(&cli.config)?
    } else {
        tracing::debug!("No config file at {}, using defaults", cli.config.display());
        AppConfig::default()
    };

    config.validate()?;
    Ok(config)
}

async fn run(command: Command, mut config: AppConfig) -> boilerplate_web::Result<()> {
    match command {
        Command::Dev { port } => {
            if let Some(port) = port {
                config.dev_server.port = port;
            }
            let mount = Bootstrapper::default().mount(ShellDocument::new(&config.app.title))?;
            let proxy = DevProxy::new(config.proxy_table())?;
            for rule in proxy.table().rules() {
                tracing::info!(
                    "🔀 Proxy {} -> {} (change_origin: {})",
                    rule.path_prefix,
                    rule.target,
                    rule.change_origin
                );
            }
            let assets = config.dev_server.assets_dir.clone().map(LocalStorage::new);

            HttpServer::new("Dev server", config.dev_addr()?)
                .with_router(dev_server::router(&mount, proxy, assets))
                .serve()
                .await
        }
        Command::Build { out_dir } => {
            let out_dir = out_dir.unwrap_or_else(|| config.build.out_dir.clone());
            let builder = SiteBuilder::new(LocalStorage::new(&out_dir), &config.app.title);
            let report = builder.build().await?;

            tracing::info!(
                "✅ Build completed: {} file(s), {} bytes",
                report.files.len(),
                report.total_bytes
            );
            println!("✅ Build written to {}", out_dir);
            Ok(())
        }
        Command::Serve { port } => {
            if let Some(port) = port {
                config.backend.port = port;
            }
            let static_files = LocalStorage::new(&config.backend.static_dir);

            HttpServer::new("Backend", config.backend_addr()?)
                .with_router(backend::router(static_files))
                .serve()
                .await
        }
        Command::Trigger { element, base_url } => {
            let base_url = match base_url {
                Some(url) => url,
                None => format!("http://{}", config.dev_addr()?),
            };
            let fetcher = HttpFetcher::with_timeout(
                &base_url,
                Duration::from_secs(config.binder.timeout_seconds),
            )?;
            let bootstrapper = Bootstrapper::default();
            let document = ShellDocument::new(&config.app.title);
            let binder = FetchBinder::bootstrap(&bootstrapper, document, Arc::new(fetcher))?
                .with_options(config.binder_options());

            let target = binder
                .descriptor(&element)
                .map(|d| d.target.clone())
                .ok_or_else(|| AppError::UnknownTrigger {
                    element_id: element.clone(),
                })?;

            let outcome = binder.click(&element).await?;
            tracing::info!("Swap outcome: {:?}", outcome);
            println!("{}", binder.inner_html(&target).await.unwrap_or_default());
            Ok(())
        }
    }
}

fn fail(e: AppError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    std::process::exit(e.exit_code())
}
