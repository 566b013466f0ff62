//! c3-bot binary
//!
//! Reads inbound events as JSON lines on stdin and writes outbound actions as
//! JSON lines on stdout. Logs go to stderr.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use c3_bot::{event_loop, logging, BotConfig, Dispatcher, HttpFetcher, JsonLinesTransport};
use c3_catalog::{Catalog, FsStore, Proposals};
use clap::Parser;
use tokio::io::BufReader;

/// Bot command line arguments
#[derive(Parser, Debug)]
#[command(name = "c3-bot", version)]
#[command(about = "Cocktail catalog chat bot with a moderation workflow")]
struct Args {
    /// TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory backing the object store
    #[arg(long, value_name = "DIR")]
    store_root: Option<PathBuf>,

    /// Prefix under which catalog entries live
    #[arg(long, value_name = "PREFIX")]
    catalog_root: Option<String>,

    /// User allowed to moderate
    #[arg(long, value_name = "ID")]
    privileged_user: Option<String>,

    /// Message prefix that triggers a picture upload
    #[arg(long, value_name = "PREFIX")]
    upload_prefix: Option<String>,

    /// The bot's own user id
    #[arg(long, value_name = "ID")]
    bot_user_id: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

impl Args {
    fn into_config(self) -> anyhow::Result<(BotConfig, bool)> {
        let mut config = match &self.config {
            Some(path) => BotConfig::load(path)?,
            None => BotConfig::default(),
        };
        if let Some(root) = self.store_root {
            config = config.with_store_root(root);
        }
        if let Some(root) = self.catalog_root {
            config = config.with_catalog_root(root);
        }
        if let Some(user) = self.privileged_user {
            config = config.with_privileged_user(user);
        }
        if let Some(id) = self.bot_user_id {
            config = config.with_bot_user_id(id);
        }
        if let Some(prefix) = self.upload_prefix {
            config = config.with_upload_prefix(prefix);
        }
        if self.json_logs {
            config = config.with_json_logs(true);
        }
        Ok((config, self.verbose))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, verbose) = Args::parse().into_config()?;
    logging::init_subscriber(&config.log, verbose).context("failed to install log subscriber")?;

    let store = Arc::new(FsStore::new(config.store.root.clone()));
    tracing::info!(
        version = c3_bot::VERSION,
        store = %store.root().display(),
        catalog_root = %config.catalog_root,
        "starting c3-bot"
    );

    let client = reqwest::Client::builder()
        .user_agent(concat!("c3-bot/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to build HTTP client")?;
    let catalog = Catalog::new(store, &config.catalog_root);
    let dispatcher = Arc::new(Dispatcher::new(
        catalog,
        Arc::new(Proposals::new()),
        Arc::new(JsonLinesTransport::stdout()),
        Arc::new(HttpFetcher::with_client(client)),
        &config,
    ));

    let input = BufReader::new(tokio::io::stdin());
    tokio::select! {
        result = event_loop::run(input, dispatcher) => {
            let dispatched = result.context("failed reading events")?;
            tracing::info!(dispatched, "shutting down");
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for shutdown signal")?;
            tracing::info!("interrupted, shutting down");
        }
    }

    Ok(())
}
