//! C3 Catalog - cocktail records and the moderation workflow core
//!
//! Provides:
//! - [`Record`]: the cocktail spec and its text/JSON encodings
//! - [`normalize`]: display name → storage key
//! - [`Registry`] / [`Proposals`]: pending proposals awaiting approval
//! - [`ObjectStore`]: the blob storage seam, with in-memory and filesystem backends
//! - [`Catalog`]: record and picture access over an object store
//! - [`search`]: name and ingredient matching
//!
//! # Example
//!
//! ```rust,ignore
//! use c3_catalog::{Catalog, MemoryStore, Record, WriteMode, normalize};
//! use std::sync::Arc;
//!
//! let catalog = Catalog::new(Arc::new(MemoryStore::new()), "");
//! let record = Record::new("Mojito", vec!["rum".into(), "mint".into()], vec!["muddle".into()], None);
//! catalog.commit_record(&normalize(&record.name), record.to_json()?, WriteMode::Create).await?;
//! ```

#![warn(unreachable_pub)]

pub mod catalog;
pub mod error;
pub mod normalize;
pub mod record;
pub mod registry;
pub mod search;
pub mod store;

// Re-exports
pub use catalog::{Catalog, Entry, Picture, WriteMode};
pub use error::{CatalogError, StoreError};
pub use normalize::normalize;
pub use record::{Record, Variation, DEFAULT_GARNISH};
pub use registry::{Proposals, Registry};
pub use search::{IngredientMatches, MatchKind, NameMatch};
pub use store::{FsStore, MemoryStore, ObjectMeta, ObjectReader, ObjectStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
