use admin_panel::api::AdminClient;
use admin_panel::app::{self, App, AppContext};
use admin_panel::config::{Config, DEFAULT_CONFIG_FILE};
use admin_panel::logging;
use anyhow::Context;
use bubbletea_rs::Program;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "admin-panel")]
#[command(about = "Terminal admin console for the booking backend", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./admin-panel.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL
    #[arg(long)]
    api_url: Option<String>,

    /// Rows per page on the list screens
    #[arg(long)]
    page_size: Option<usize>,

    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Remember-me file path
    #[arg(long)]
    session_file: Option<PathBuf>,
}

impl Cli {
    fn apply(self, config: &mut Config) {
        if let Some(url) = self.api_url {
            config.api_base_url = url;
        }
        if let Some(size) = self.page_size {
            config.page_size = size;
        }
        if let Some(path) = self.log_file {
            config.log_file = path;
        }
        if let Some(path) = self.session_file {
            config.session_file = path;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut cli = Cli::parse();

    let config_path = cli.config.take().or_else(|| {
        let default = PathBuf::from(DEFAULT_CONFIG_FILE);
        default.exists().then_some(default)
    });
    let mut config = Config::load(config_path.as_deref())?;
    cli.apply(&mut config);
    config.validate()?;

    logging::init(&config.log_file)
        .with_context(|| format!("cannot open log file {}", config.log_file.display()))?;
    tracing::info!(api = %config.api_base_url, page_size = config.page_size, "Starting admin console");

    let client = AdminClient::from_config(&config)?;
    if app::install(AppContext::new(config, Arc::new(client))).is_err() {
        anyhow::bail!("application context already installed");
    }

    let program = Program::<App>::builder().alt_screen(true).build()?;
    program.run().await?;

    tracing::info!("Admin console closed");
    Ok(())
}
