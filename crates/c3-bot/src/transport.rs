//! Messaging transport seam
//!
//! Handlers talk to the chat platform only through [`Transport`]. Each call
//! is attempted once; failures surface as [`TransportError`].

use crate::command::Interaction;
use async_trait::async_trait;
use c3_catalog::{Picture, StoreError};

/// Errors delivering a response
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Underlying writer or socket failed
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Outbound event could not be serialized
    #[error("failed to encode outbound event: {0}")]
    Encode(#[from] serde_json::Error),

    /// Attached picture could not be read
    #[error("failed to read attachment: {0}")]
    Attachment(#[from] StoreError),

    /// Transport shut down
    #[error("transport closed")]
    Closed,
}

/// A reply to an interaction
#[derive(Debug)]
pub struct Reply {
    /// Text content
    pub content: String,
    /// Picture to attach; its stream is owned by the reply
    pub picture: Option<Picture>,
    /// Visible only to the invoking user
    pub ephemeral: bool,
}

impl Reply {
    /// Reply visible to the whole channel
    #[must_use]
    pub fn public(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            picture: None,
            ephemeral: false,
        }
    }

    /// Reply visible only to the invoking user
    #[must_use]
    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            picture: None,
            ephemeral: true,
        }
    }

    /// Attach a picture
    #[must_use]
    pub fn with_picture(mut self, picture: Option<Picture>) -> Self {
        self.picture = picture;
        self
    }
}

/// Outbound side of the chat platform
#[async_trait]
pub trait Transport: Send + Sync {
    /// Initial response to an interaction
    async fn respond(&self, interaction: &Interaction, reply: Reply) -> Result<(), TransportError>;

    /// Acknowledge an interaction; the final text follows via
    /// [`edit_response`](Self::edit_response)
    async fn defer(&self, interaction: &Interaction, ephemeral: bool) -> Result<(), TransportError>;

    /// Replace the deferred response
    async fn edit_response(
        &self,
        interaction: &Interaction,
        content: String,
    ) -> Result<(), TransportError>;

    /// Additional message after the initial response
    async fn follow_up(
        &self,
        interaction: &Interaction,
        content: String,
        ephemeral: bool,
    ) -> Result<(), TransportError>;

    /// Post to a channel
    async fn send_message(&self, channel_id: &str, content: String) -> Result<(), TransportError>;

    /// Send a direct message to a user
    async fn direct_message(&self, user_id: &str, content: String) -> Result<(), TransportError>;
}
