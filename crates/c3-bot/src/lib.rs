//! C3 Bot - chat commands over the cocktail catalog
//!
//! Provides:
//! - [`Command`]: typed slash commands parsed from inbound events
//! - [`Dispatcher`]: browsing, proposal and moderation handlers
//! - [`Transport`]: the outbound seam, with a JSON-lines implementation
//! - [`BotConfig`]: TOML configuration with CLI overrides
//!
//! # Example
//!
//! ```rust,ignore
//! use c3_bot::{event_loop, BotConfig, Dispatcher, HttpFetcher, JsonLinesTransport};
//! use c3_catalog::{Catalog, FsStore, Proposals};
//! use std::sync::Arc;
//!
//! let config = BotConfig::default();
//! let catalog = Catalog::new(Arc::new(FsStore::new(&config.store.root)), &config.catalog_root);
//! let dispatcher = Dispatcher::new(
//!     catalog,
//!     Arc::new(Proposals::new()),
//!     Arc::new(JsonLinesTransport::stdout()),
//!     Arc::new(HttpFetcher::new()),
//!     &config,
//! );
//! event_loop::run(tokio::io::BufReader::new(tokio::io::stdin()), Arc::new(dispatcher)).await?;
//! ```

#![warn(unreachable_pub)]

pub mod command;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod event_loop;
pub mod jsonl;
pub mod logging;
pub mod replies;
pub mod transport;
pub mod upload;

// Re-exports
pub use command::{Actor, Attachment, Command, InboundEvent, Interaction, Message};
pub use config::{BotConfig, ConfigError, LogConfig, StoreConfig};
pub use dispatcher::Dispatcher;
pub use error::CommandError;
pub use jsonl::{AttachmentInfo, JsonLinesTransport, Outbound};
pub use transport::{Reply, Transport, TransportError};
pub use upload::{AttachmentFetcher, FetchError, HttpFetcher};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
