//! JSON-lines transport
//!
//! Writes one JSON object per outbound action, newline-terminated and
//! flushed, so a gateway process can relay them to the chat platform.

use crate::command::Interaction;
use crate::transport::{Reply, Transport, TransportError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

/// Metadata for a picture sent with a response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentInfo {
    /// Base file name
    pub file_name: String,
    /// MIME type, when known
    pub content_type: Option<String>,
    /// Bytes read from the stream
    pub size: u64,
}

/// One outbound action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outbound {
    /// Initial interaction response
    Respond {
        interaction_id: String,
        content: String,
        ephemeral: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attachment: Option<AttachmentInfo>,
    },
    /// Deferred acknowledgement
    Defer {
        interaction_id: String,
        ephemeral: bool,
    },
    /// Edit of the deferred response
    Edit {
        interaction_id: String,
        content: String,
    },
    /// Follow-up message
    FollowUp {
        interaction_id: String,
        content: String,
        ephemeral: bool,
    },
    /// Channel post
    ChannelMessage { channel_id: String, content: String },
    /// Direct message
    DirectMessage { user_id: String, content: String },
}

/// [`Transport`] writing [`Outbound`] events as JSON lines
pub struct JsonLinesTransport<W> {
    writer: Mutex<W>,
}

impl JsonLinesTransport<tokio::io::Stdout> {
    /// Transport over the process's standard output
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

impl<W> JsonLinesTransport<W>
where
    W: AsyncWrite + Send + Unpin,
{
    /// Create transport over `writer`
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Recover the writer
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    /// Write one event
    ///
    /// # Errors
    /// - `TransportError::Encode` if serialization fails
    /// - `TransportError::Io` if the write or flush fails
    pub async fn emit(&self, event: &Outbound) -> Result<(), TransportError> {
        let mut line = serde_json::to_vec(event)?;
        line.push(b'\n');

        let mut writer = self.writer.lock().await;
        writer.write_all(&line).await?;
        writer.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl<W> Transport for JsonLinesTransport<W>
where
    W: AsyncWrite + Send + Unpin,
{
    async fn respond(&self, interaction: &Interaction, reply: Reply) -> Result<(), TransportError> {
        let attachment = match reply.picture {
            Some(picture) => {
                let file_name = picture.file_name.clone();
                let content_type = picture.content_type.clone();
                let data = picture.read_all().await?;
                Some(AttachmentInfo {
                    file_name,
                    content_type,
                    size: data.len() as u64,
                })
            }
            None => None,
        };

        self.emit(&Outbound::Respond {
            interaction_id: interaction.id.clone(),
            content: reply.content,
            ephemeral: reply.ephemeral,
            attachment,
        })
        .await
    }

    async fn defer(&self, interaction: &Interaction, ephemeral: bool) -> Result<(), TransportError> {
        self.emit(&Outbound::Defer {
            interaction_id: interaction.id.clone(),
            ephemeral,
        })
        .await
    }

    async fn edit_response(
        &self,
        interaction: &Interaction,
        content: String,
    ) -> Result<(), TransportError> {
        self.emit(&Outbound::Edit {
            interaction_id: interaction.id.clone(),
            content,
        })
        .await
    }

    async fn follow_up(
        &self,
        interaction: &Interaction,
        content: String,
        ephemeral: bool,
    ) -> Result<(), TransportError> {
        self.emit(&Outbound::FollowUp {
            interaction_id: interaction.id.clone(),
            content,
            ephemeral,
        })
        .await
    }

    async fn send_message(&self, channel_id: &str, content: String) -> Result<(), TransportError> {
        self.emit(&Outbound::ChannelMessage {
            channel_id: channel_id.to_string(),
            content,
        })
        .await
    }

    async fn direct_message(&self, user_id: &str, content: String) -> Result<(), TransportError> {
        self.emit(&Outbound::DirectMessage {
            user_id: user_id.to_string(),
            content,
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Actor;
    use c3_catalog::{Catalog, MemoryStore};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn interaction() -> Interaction {
        Interaction {
            id: "int-1".to_string(),
            actor: Actor::new("42", "alice"),
            guild: Some("Bar".to_string()),
            command: "cocktail".to_string(),
            subcommand: "random".to_string(),
            options: BTreeMap::new(),
        }
    }

    fn lines(transport: JsonLinesTransport<Vec<u8>>) -> Vec<serde_json::Value> {
        String::from_utf8(transport.into_inner())
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn respond_without_picture() {
        let transport = JsonLinesTransport::new(Vec::new());
        transport
            .respond(&interaction(), Reply::ephemeral("hi"))
            .await
            .unwrap();

        let out = lines(transport);
        assert_eq!(
            out,
            vec![serde_json::json!({
                "type": "respond",
                "interaction_id": "int-1",
                "content": "hi",
                "ephemeral": true,
            })]
        );
    }

    #[tokio::test]
    async fn respond_reads_picture_into_metadata() {
        let store = Arc::new(MemoryStore::new());
        store.insert("mojito/pictures/glass.png", vec![0; 5]);
        let catalog = Catalog::new(store, "");
        let picture = catalog.fetch_random_picture("mojito").await.unwrap();

        let transport = JsonLinesTransport::new(Vec::new());
        transport
            .respond(&interaction(), Reply::public("Name: Mojito").with_picture(picture))
            .await
            .unwrap();

        let out = lines(transport);
        assert_eq!(out[0]["attachment"]["file_name"], "glass.png");
        assert_eq!(out[0]["attachment"]["content_type"], "image/png");
        assert_eq!(out[0]["attachment"]["size"], 5);
    }

    #[tokio::test]
    async fn deferred_flow_and_messages() {
        let transport = JsonLinesTransport::new(Vec::new());
        let i = interaction();
        transport.defer(&i, true).await.unwrap();
        transport.edit_response(&i, "done".to_string()).await.unwrap();
        transport
            .follow_up(&i, "Something went wrong".to_string(), true)
            .await
            .unwrap();
        transport.send_message("chan", "hello".to_string()).await.unwrap();
        transport.direct_message("boss", "new spec".to_string()).await.unwrap();

        let types: Vec<String> = lines(transport)
            .iter()
            .map(|v| v["type"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(
            types,
            vec!["defer", "edit", "follow_up", "channel_message", "direct_message"]
        );
    }

    #[test]
    fn outbound_decodes() {
        let event: Outbound =
            serde_json::from_str(r#"{"type":"direct_message","user_id":"1","content":"x"}"#).unwrap();
        assert_eq!(
            event,
            Outbound::DirectMessage {
                user_id: "1".to_string(),
                content: "x".to_string()
            }
        );
    }
}
