use anyhow::{Context, Result};
use chattest_core::{
    config::{ChatConfig, Config, get_config},
    credential::{ApiKey, load_env_file},
    session::Session,
};
use clap::Parser;
use std::{net::SocketAddr, path::PathBuf};

use crate::log::setup_logging;
use crate::ux;
use crate::web::{self, AppState};

/// Chattest - try out an OpenAI compatible chat model from the browser.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file to use instead of the default location.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Model to chat with, must be defined in the config.
    #[arg(short, long)]
    model: Option<String>,

    /// Interface to bind the web server to.
    #[arg(long)]
    host: Option<String>,

    /// Port to bind the web server to.
    #[arg(short, long)]
    port: Option<u16>,

    /// Write debug logs to the data directory.
    #[arg(short, long)]
    verbose: bool,
}

/// Chat settings after applying the `--model` override.
fn resolve_chat_config(config: &Config, model: Option<&str>) -> Result<ChatConfig> {
    let mut chat = config.chat.clone();
    if let Some(model_name) = model {
        chat.model = config
            .models
            .get(model_name)
            .cloned()
            .context(format!("Model '{model_name}' not found in config."))?;
    }
    Ok(chat)
}

/// Listen address from the flags or the `server` section. Host names are
/// resolved, so `localhost` works as well as an IP.
async fn resolve_addr(
    config: &Config,
    host: Option<&str>,
    port: Option<u16>,
) -> Result<SocketAddr> {
    let host = host.unwrap_or(&config.server.host);
    let port = port.unwrap_or(config.server.port);
    tokio::net::lookup_host((host, port))
        .await
        .context(format!("Failed to resolve listen address '{host}:{port}'"))?
        .next()
        .context(format!("No address found for '{host}:{port}'"))
}

pub async fn run_app() -> Result<()> {
    let cli = Cli::parse();

    let config = get_config(cli.config.clone()).context("Failed to load configuration")?;
    if cli.verbose {
        let log_path = setup_logging(&config.log).context("Failed to set up logging")?;
        ux::present_log_path(&log_path);
    }

    // Keys kept in a project .env win over the shell environment
    if let Ok(cwd) = std::env::current_dir() {
        load_env_file(&cwd);
    }

    let chat_config = resolve_chat_config(&config, cli.model.as_deref())?;
    let addr = resolve_addr(&config, cli.host.as_deref(), cli.port).await?;

    let api_key = ApiKey::for_model(&chat_config.model);
    ux::present_key_status(&api_key);

    let session = Session::new(&chat_config).context("Failed to create chat session")?;
    let state = AppState::new(session, api_key.notice()).context("Failed to prepare web page")?;

    ux::present_listening(addr, state.model_name());
    web::serve(addr, state).await
}
