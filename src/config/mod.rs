pub mod toml_config;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "boilerplate-web")]
#[command(about = "Landing page dev server, backend API and static build for the web boilerplate")]
pub struct CliConfig {
    /// Path to TOML configuration file (defaults are used when it does not exist)
    #[arg(short, long, global = true, default_value = "boilerplate.toml")]
    pub config: PathBuf,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit JSON formatted logs")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Serve the landing page and forward proxied prefixes to the backend
    Dev {
        #[arg(long, help = "Override dev server port")]
        port: Option<u16>,
    },
    /// Render the production landing page into the output directory
    Build {
        #[arg(long, help = "Override output directory")]
        out_dir: Option<String>,
    },
    /// Run the backend API and serve the production build
    Serve {
        #[arg(long, help = "Override backend port")]
        port: Option<u16>,
    },
    /// Click a registered trigger headlessly and print the swapped content
    Trigger {
        #[arg(long, default_value = crate::core::page::DEMO_TRIGGER_ID)]
        element: String,

        #[arg(long, help = "Origin the request is sent to (defaults to the dev server)")]
        base_url: Option<String>,
    },
}
