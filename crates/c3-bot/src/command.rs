//! Inbound events and command parsing
//!
//! The transport delivers an [`InboundEvent`]: either a slash-command
//! [`Interaction`] (group + subcommand + string options) or a free-text
//! [`Message`]. Interactions are parsed into a typed [`Command`] before any
//! handler runs.

use crate::error::CommandError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Command group for catalog browsing
pub const CATALOG_GROUP: &str = "cocktail";

/// Command group for the moderation workflow
pub const PROPOSALS_GROUP: &str = "proposals";

/// The user behind an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Stable user identifier
    pub id: String,
    /// Display name
    #[serde(default)]
    pub username: String,
}

impl Actor {
    /// Create actor
    #[must_use]
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
        }
    }
}

/// A slash-command invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    /// Interaction identifier, echoed back on every response
    pub id: String,
    /// Invoking user
    pub actor: Actor,
    /// Guild name; `None` for direct messages
    #[serde(default)]
    pub guild: Option<String>,
    /// Command group (`cocktail` or `proposals`)
    pub command: String,
    /// Subcommand name
    pub subcommand: String,
    /// Subcommand options by name
    #[serde(default)]
    pub options: BTreeMap<String, String>,
}

/// File attached to a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Original file name
    pub filename: String,
    /// Download location
    pub url: String,
    /// MIME type, when the transport knows it
    #[serde(default)]
    pub content_type: Option<String>,
}

/// A free-text channel message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message identifier
    pub id: String,
    /// Channel the message was posted in
    pub channel_id: String,
    /// Author
    pub author: Actor,
    /// Text content
    #[serde(default)]
    pub content: String,
    /// Attached files
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// Anything the transport can deliver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    /// Slash command
    Interaction(Interaction),
    /// Channel message
    Message(Message),
}

/// A parsed, validated command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show a random cocktail
    Random,
    /// Look a cocktail up by name
    Search { name: String },
    /// Find cocktails containing ingredients (comma-separated)
    SearchIngredients { ingredients: String },
    /// List every catalog key
    List,
    /// Propose a new cocktail
    Create {
        name: String,
        ingredients: Vec<String>,
        instructions: Vec<String>,
        garnish: Option<String>,
    },
    /// Propose a variation of an existing cocktail
    CreateVariation {
        name: String,
        ingredients: Vec<String>,
    },
    /// Approve a pending cocktail
    Approve { name: String },
    /// Approve a pending variation
    ApproveVariation { name: String },
    /// Deny a pending cocktail
    Deny { name: String },
    /// Deny a pending variation
    DenyVariation { name: String },
    /// List pending cocktails
    ListProposals,
    /// List pending variations
    ListVariations,
}

impl Command {
    /// Parse an interaction's group, subcommand and options
    ///
    /// # Errors
    /// - `CommandError::Validation` for unknown commands or missing/empty
    ///   required options
    pub fn parse(interaction: &Interaction) -> Result<Self, CommandError> {
        let options = &interaction.options;
        let command = match (interaction.command.as_str(), interaction.subcommand.as_str()) {
            (CATALOG_GROUP, "random") => Self::Random,
            (CATALOG_GROUP, "search") => Self::Search {
                name: required(options, "name")?,
            },
            (CATALOG_GROUP, "search-ingredients") => Self::SearchIngredients {
                ingredients: required(options, "ingredients")?,
            },
            (CATALOG_GROUP, "list") => Self::List,
            (PROPOSALS_GROUP, "create") => Self::Create {
                name: required(options, "name")?,
                ingredients: required_list(options, "ingredients")?,
                instructions: required_list(options, "instructions")?,
                garnish: optional(options, "garnish"),
            },
            (PROPOSALS_GROUP, "create-variation") => Self::CreateVariation {
                name: required(options, "name")?,
                ingredients: required_list(options, "ingredients")?,
            },
            (PROPOSALS_GROUP, "approve") => Self::Approve {
                name: required(options, "name")?,
            },
            (PROPOSALS_GROUP, "approve-variation") => Self::ApproveVariation {
                name: required(options, "name")?,
            },
            (PROPOSALS_GROUP, "deny") => Self::Deny {
                name: required(options, "name")?,
            },
            (PROPOSALS_GROUP, "deny-variation") => Self::DenyVariation {
                name: required(options, "name")?,
            },
            (PROPOSALS_GROUP, "list") => Self::ListProposals,
            (PROPOSALS_GROUP, "list-variations") => Self::ListVariations,
            (group, sub) => {
                return Err(CommandError::validation(format!(
                    "Unknown command: {group} {sub}"
                )))
            }
        };
        Ok(command)
    }

    /// Subcommand name, for logs
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Search { .. } => "search",
            Self::SearchIngredients { .. } => "search-ingredients",
            Self::List => "list",
            Self::Create { .. } => "create",
            Self::CreateVariation { .. } => "create-variation",
            Self::Approve { .. } => "approve",
            Self::ApproveVariation { .. } => "approve-variation",
            Self::Deny { .. } => "deny",
            Self::DenyVariation { .. } => "deny-variation",
            Self::ListProposals => "list-proposals",
            Self::ListVariations => "list-variations",
        }
    }

    /// Check if only the privileged user may run this command
    #[must_use]
    pub fn is_privileged(&self) -> bool {
        matches!(
            self,
            Self::Approve { .. }
                | Self::ApproveVariation { .. }
                | Self::Deny { .. }
                | Self::DenyVariation { .. }
        )
    }
}

fn optional(options: &BTreeMap<String, String>, key: &str) -> Option<String> {
    options
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn required(options: &BTreeMap<String, String>, key: &str) -> Result<String, CommandError> {
    optional(options, key).ok_or_else(|| CommandError::validation(format!("Must provide {key}.")))
}

fn required_list(
    options: &BTreeMap<String, String>,
    key: &str,
) -> Result<Vec<String>, CommandError> {
    let items = split_list(&required(options, key)?);
    if items.is_empty() {
        return Err(CommandError::validation(format!("Must provide {key}.")));
    }
    Ok(items)
}

/// Split a comma-separated option, trimming items and dropping empty ones
#[must_use]
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
