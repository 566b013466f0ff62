//! Shared doubles for dispatcher integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use c3_bot::{
    Actor, Attachment, AttachmentFetcher, BotConfig, Dispatcher, FetchError, Interaction, Message,
    Reply, Transport, TransportError,
};
use c3_catalog::{Catalog, MemoryStore, ObjectMeta, ObjectReader, ObjectStore, Proposals, Record, StoreError};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

pub const BOSS: &str = "boss";
pub const BOT: &str = "c3";

/// One outbound action as seen by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Respond {
        content: String,
        ephemeral: bool,
        picture: Option<String>,
    },
    Defer {
        ephemeral: bool,
    },
    Edit(String),
    FollowUp(String),
    Channel {
        channel_id: String,
        content: String,
    },
    Direct {
        user_id: String,
        content: String,
    },
}

#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<Sent>>,
}

impl RecordingTransport {
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().clone()
    }

    fn push(&self, sent: Sent) {
        self.sent.lock().push(sent);
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn respond(&self, _: &Interaction, reply: Reply) -> Result<(), TransportError> {
        let picture = match reply.picture {
            Some(picture) => {
                let name = picture.file_name.clone();
                picture.read_all().await?;
                Some(name)
            }
            None => None,
        };
        self.push(Sent::Respond {
            content: reply.content,
            ephemeral: reply.ephemeral,
            picture,
        });
        Ok(())
    }

    async fn defer(&self, _: &Interaction, ephemeral: bool) -> Result<(), TransportError> {
        self.push(Sent::Defer { ephemeral });
        Ok(())
    }

    async fn edit_response(&self, _: &Interaction, content: String) -> Result<(), TransportError> {
        self.push(Sent::Edit(content));
        Ok(())
    }

    async fn follow_up(
        &self,
        _: &Interaction,
        content: String,
        _: bool,
    ) -> Result<(), TransportError> {
        self.push(Sent::FollowUp(content));
        Ok(())
    }

    async fn send_message(&self, channel_id: &str, content: String) -> Result<(), TransportError> {
        self.push(Sent::Channel {
            channel_id: channel_id.to_string(),
            content,
        });
        Ok(())
    }

    async fn direct_message(&self, user_id: &str, content: String) -> Result<(), TransportError> {
        self.push(Sent::Direct {
            user_id: user_id.to_string(),
            content,
        });
        Ok(())
    }
}

/// Serves fixed bodies by URL; anything else is a 404
#[derive(Default)]
pub struct StaticFetcher {
    bodies: HashMap<String, Vec<u8>>,
}

impl StaticFetcher {
    pub fn with(mut self, url: &str, body: &[u8]) -> Self {
        self.bodies.insert(url.to_string(), body.to_vec());
        self
    }
}

#[async_trait]
impl AttachmentFetcher for StaticFetcher {
    async fn fetch(&self, attachment: &Attachment) -> Result<Vec<u8>, FetchError> {
        self.bodies
            .get(&attachment.url)
            .cloned()
            .ok_or_else(|| FetchError::status(attachment.url.clone(), 404))
    }
}

/// Store whose every call fails
pub struct FailingStore;

#[async_trait]
impl ObjectStore for FailingStore {
    async fn list_prefixes(&self, _: &str) -> Result<Vec<String>, StoreError> {
        Err(StoreError::backend("store offline"))
    }
    async fn list_objects(&self, _: &str) -> Result<Vec<ObjectMeta>, StoreError> {
        Err(StoreError::backend("store offline"))
    }
    async fn read(&self, _: &str) -> Result<Vec<u8>, StoreError> {
        Err(StoreError::backend("store offline"))
    }
    async fn open(&self, _: &str) -> Result<ObjectReader, StoreError> {
        Err(StoreError::backend("store offline"))
    }
    async fn write(&self, _: &str, _: Vec<u8>, _: Option<String>) -> Result<(), StoreError> {
        Err(StoreError::backend("store offline"))
    }
}

/// In-memory store that re-submits a pending proposal during its first write
pub struct ResubmittingStore {
    pub inner: Arc<MemoryStore>,
    proposals: Arc<Proposals>,
    resubmit: Mutex<Option<(String, Record, bool)>>,
}

impl ResubmittingStore {
    /// On the first write, put `record` at `key` in the record registry,
    /// or in the variation registry when `variation` is set
    pub fn new(
        inner: Arc<MemoryStore>,
        proposals: Arc<Proposals>,
        key: &str,
        record: Record,
        variation: bool,
    ) -> Self {
        Self {
            inner,
            proposals,
            resubmit: Mutex::new(Some((key.to_string(), record, variation))),
        }
    }
}

#[async_trait]
impl ObjectStore for ResubmittingStore {
    async fn list_prefixes(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        self.inner.list_prefixes(prefix).await
    }
    async fn list_objects(&self, prefix: &str) -> Result<Vec<ObjectMeta>, StoreError> {
        self.inner.list_objects(prefix).await
    }
    async fn read(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        self.inner.read(name).await
    }
    async fn open(&self, name: &str) -> Result<ObjectReader, StoreError> {
        self.inner.open(name).await
    }
    async fn write(
        &self,
        name: &str,
        data: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<(), StoreError> {
        if let Some((key, record, variation)) = self.resubmit.lock().take() {
            if variation {
                self.proposals.variations.add(key, record);
            } else {
                self.proposals.records.add(key, record);
            }
        }
        self.inner.write(name, data, content_type).await
    }
}

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub transport: Arc<RecordingTransport>,
    pub dispatcher: Dispatcher,
}

impl Harness {
    pub fn new(records: &[Record]) -> Self {
        Self::with_fetcher(records, StaticFetcher::default())
    }

    pub fn with_fetcher(records: &[Record], fetcher: StaticFetcher) -> Self {
        let (store, catalog) = c3_test_utils::seeded_catalog(records);
        let transport = Arc::new(RecordingTransport::default());
        let dispatcher = build(catalog, transport.clone(), fetcher);
        Self {
            store,
            transport,
            dispatcher,
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.transport.sent()
    }

    pub async fn run(&self, interaction: Interaction) -> Vec<Sent> {
        self.dispatcher.handle_interaction(interaction).await;
        self.sent()
    }
}

pub fn build(
    catalog: Catalog,
    transport: Arc<RecordingTransport>,
    fetcher: StaticFetcher,
) -> Dispatcher {
    build_with_proposals(catalog, Arc::new(Proposals::new()), transport, fetcher)
}

pub fn build_with_proposals(
    catalog: Catalog,
    proposals: Arc<Proposals>,
    transport: Arc<RecordingTransport>,
    fetcher: StaticFetcher,
) -> Dispatcher {
    let config = BotConfig::default()
        .with_privileged_user(BOSS)
        .with_bot_user_id(BOT);
    Dispatcher::new(catalog, proposals, transport, Arc::new(fetcher), &config)
}

pub fn interaction(user: &str, command: &str, sub: &str, options: &[(&str, &str)]) -> Interaction {
    Interaction {
        id: "int".to_string(),
        actor: Actor::new(user, format!("{user}-name")),
        guild: Some("Tiki Bar".to_string()),
        command: command.to_string(),
        subcommand: sub.to_string(),
        options: options
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect::<BTreeMap<_, _>>(),
    }
}

pub fn message(author: &str, content: &str, attachments: &[(&str, &str)]) -> Message {
    Message {
        id: "msg".to_string(),
        channel_id: "pictures".to_string(),
        author: Actor::new(author, author),
        content: content.to_string(),
        attachments: attachments
            .iter()
            .map(|(filename, url)| Attachment {
                filename: (*filename).to_string(),
                url: (*url).to_string(),
                content_type: None,
            })
            .collect(),
    }
}

pub fn ephemeral(content: impl Into<String>) -> Sent {
    Sent::Respond {
        content: content.into(),
        ephemeral: true,
        picture: None,
    }
}
