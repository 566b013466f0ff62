//! Command dispatcher
//!
//! Routes each [`InboundEvent`] to its handler. Handlers share the catalog,
//! the proposal registries, the transport and the attachment fetcher; all of
//! them are safe to use from many events at once.
//!
//! Every handler returns `Result<(), CommandError>`. User-facing errors are
//! sent back as short ephemeral replies. Anything else is logged and the
//! user gets a generic follow-up.

use crate::command::{Actor, Command, InboundEvent, Interaction, Message};
use crate::config::BotConfig;
use crate::error::CommandError;
use crate::replies;
use crate::transport::{Reply, Transport};
use crate::upload::AttachmentFetcher;
use c3_catalog::search::{self, match_name, NameMatch};
use c3_catalog::{normalize, Catalog, CatalogError, Proposals, Record, WriteMode};
use std::sync::Arc;
use tracing::Instrument;

/// Routes inbound events to command handlers
pub struct Dispatcher {
    catalog: Catalog,
    proposals: Arc<Proposals>,
    transport: Arc<dyn Transport>,
    fetcher: Arc<dyn AttachmentFetcher>,
    privileged_user: String,
    bot_user_id: Option<String>,
    upload_prefix: String,
}

impl Dispatcher {
    /// Create dispatcher
    #[must_use]
    pub fn new(
        catalog: Catalog,
        proposals: Arc<Proposals>,
        transport: Arc<dyn Transport>,
        fetcher: Arc<dyn AttachmentFetcher>,
        config: &BotConfig,
    ) -> Self {
        Self {
            catalog,
            proposals,
            transport,
            fetcher,
            privileged_user: config.privileged_user.clone(),
            bot_user_id: config.bot_user_id.clone(),
            upload_prefix: config.upload_prefix.clone(),
        }
    }

    /// Shared proposal registries
    #[inline]
    #[must_use]
    pub fn proposals(&self) -> &Arc<Proposals> {
        &self.proposals
    }

    /// Handle one inbound event to completion
    pub async fn handle(&self, event: InboundEvent) {
        match event {
            InboundEvent::Interaction(interaction) => self.handle_interaction(interaction).await,
            InboundEvent::Message(message) => self.handle_message(message).await,
        }
    }

    /// Parse and run a slash command, reporting any failure
    pub async fn handle_interaction(&self, interaction: Interaction) {
        let span = tracing::info_span!(
            "interaction",
            id = %interaction.id,
            user = %interaction.actor.id,
            command = %interaction.command,
            subcommand = %interaction.subcommand,
        );

        async {
            let result = match Command::parse(&interaction) {
                Ok(command) => self.run(&interaction, command).await,
                Err(err) => Err(err),
            };
            if let Err(err) = result {
                self.report(&interaction, err).await;
            }
        }
        .instrument(span)
        .await;
    }

    async fn run(&self, interaction: &Interaction, command: Command) -> Result<(), CommandError> {
        tracing::debug!(command = command.name(), "running command");
        if command.is_privileged() {
            self.authorize(&interaction.actor)?;
        }

        match command {
            Command::Random => self.random(interaction).await,
            Command::Search { name } => self.search(interaction, &name).await,
            Command::SearchIngredients { ingredients } => {
                self.search_ingredients(interaction, &ingredients).await
            }
            Command::List => self.list(interaction).await,
            Command::Create {
                name,
                ingredients,
                instructions,
                garnish,
            } => {
                let record = Record::new(name, ingredients, instructions, garnish);
                self.create(interaction, record).await
            }
            Command::CreateVariation { name, ingredients } => {
                self.create_variation(interaction, &name, ingredients).await
            }
            Command::Approve { name } => self.approve(interaction, &name).await,
            Command::ApproveVariation { name } => self.approve_variation(interaction, &name).await,
            Command::Deny { name } => self.deny(interaction, &name, false).await,
            Command::DenyVariation { name } => self.deny(interaction, &name, true).await,
            Command::ListProposals => self.list_pending(interaction, false).await,
            Command::ListVariations => self.list_pending(interaction, true).await,
        }
    }

    fn authorize(&self, actor: &Actor) -> Result<(), CommandError> {
        if actor.id == self.privileged_user {
            Ok(())
        } else {
            tracing::info!(user = %actor.id, "rejected privileged command");
            Err(CommandError::Unauthorized)
        }
    }

    async fn report(&self, interaction: &Interaction, err: CommandError) {
        if err.is_user_facing() {
            tracing::debug!(error = %err, "user-facing failure");
            if let Err(send) = self
                .transport
                .respond(interaction, Reply::ephemeral(err.to_string()))
                .await
            {
                tracing::warn!(error = %send, "failed to deliver error reply");
            }
            return;
        }

        tracing::error!(error = %err, "command failed");
        if let Err(send) = self
            .transport
            .follow_up(interaction, replies::SOMETHING_WENT_WRONG.to_string(), true)
            .await
        {
            tracing::warn!(error = %send, "failed to deliver failure notice");
        }
    }

    async fn notify_moderator(&self, content: String) {
        if let Err(err) = self
            .transport
            .direct_message(&self.privileged_user, content)
            .await
        {
            tracing::warn!(error = %err, "failed to notify moderator");
        }
    }

    async fn random(&self, interaction: &Interaction) -> Result<(), CommandError> {
        let (key, record) = match self.catalog.fetch_random_entry().await {
            Ok(found) => found,
            Err(CatalogError::Empty) => {
                self.transport
                    .respond(interaction, Reply::ephemeral(replies::EMPTY_CATALOG))
                    .await?;
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        let picture = self.catalog.fetch_random_picture(&key).await?;
        self.transport
            .respond(interaction, Reply::public(record.to_string()).with_picture(picture))
            .await?;
        Ok(())
    }

    async fn search(&self, interaction: &Interaction, name: &str) -> Result<(), CommandError> {
        let keys = self.catalog.list_keys().await?;

        let reply = match match_name(&keys, name) {
            NameMatch::Exact(key) | NameMatch::Prefix(key) => {
                let entry = self.catalog.fetch_entry(&key).await?;
                Reply::public(entry.record.to_string()).with_picture(entry.picture)
            }
            NameMatch::Ambiguous(candidates) => {
                Reply::ephemeral(replies::multiple_matches(&candidates))
            }
            NameMatch::NotFound => Reply::ephemeral(replies::no_matches(name)),
        };

        self.transport.respond(interaction, reply).await?;
        Ok(())
    }

    async fn search_ingredients(
        &self,
        interaction: &Interaction,
        query: &str,
    ) -> Result<(), CommandError> {
        self.transport.defer(interaction, true).await?;
        let matches = search::search_ingredients(&self.catalog, query).await?;
        self.transport
            .edit_response(interaction, replies::ingredient_results(&matches))
            .await?;
        Ok(())
    }

    async fn list(&self, interaction: &Interaction) -> Result<(), CommandError> {
        let keys = self.catalog.list_keys().await?;
        self.transport
            .respond(interaction, Reply::ephemeral(replies::catalog_listing(&keys)))
            .await?;
        Ok(())
    }

    async fn create(&self, interaction: &Interaction, record: Record) -> Result<(), CommandError> {
        if let Some(existing) = self.catalog.find_key(&record.name).await? {
            self.transport
                .respond(interaction, Reply::ephemeral(replies::already_exists(&existing)))
                .await?;
            return Ok(());
        }

        self.transport
            .respond(interaction, Reply::ephemeral(replies::proposal_waiting(&record)))
            .await?;

        let key = normalize(&record.name);
        tracing::info!(%key, "proposal registered");
        let notice = replies::proposal_submitted(
            &interaction.actor.username,
            interaction.guild.as_deref(),
            &record,
        );
        self.proposals.records.add(key, record);
        self.notify_moderator(notice).await;
        Ok(())
    }

    async fn create_variation(
        &self,
        interaction: &Interaction,
        name: &str,
        ingredients: Vec<String>,
    ) -> Result<(), CommandError> {
        let Some(target) = self.catalog.find_key(name).await? else {
            self.transport
                .respond(
                    interaction,
                    Reply::ephemeral(replies::variation_target_missing(name)),
                )
                .await?;
            return Ok(());
        };

        let current = self.catalog.fetch_record(&target).await?;
        let record = Record::variation(current.name, ingredients);
        self.transport
            .respond(interaction, Reply::ephemeral(replies::variation_waiting(&record)))
            .await?;

        let key = normalize(name);
        tracing::info!(%key, %target, "variation registered");
        let notice = replies::variation_submitted(
            &interaction.actor.username,
            interaction.guild.as_deref(),
            &record,
        );
        self.proposals.variations.add(key, record);
        self.notify_moderator(notice).await;
        Ok(())
    }

    async fn approve(&self, interaction: &Interaction, name: &str) -> Result<(), CommandError> {
        let key = normalize(name);
        let pending = self
            .proposals
            .records
            .get(&key)
            .ok_or_else(|| CommandError::NotFound(name.to_string()))?;

        self.transport.defer(interaction, true).await?;
        let payload = pending.to_json()?;
        match self.catalog.commit_record(&key, payload, WriteMode::Create).await {
            Ok(()) => {}
            Err(CatalogError::Conflict { existing, .. }) => {
                tracing::info!(%key, %existing, "approval conflicts with existing entry");
                self.transport
                    .edit_response(interaction, replies::approve_conflict(name))
                    .await?;
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        }

        if !self.proposals.records.remove_if_unchanged(&key, &pending) {
            tracing::info!(%key, "proposal edited during approval, keeping the new version");
        }
        self.transport
            .edit_response(interaction, replies::approved_uploaded(name))
            .await?;
        Ok(())
    }

    async fn approve_variation(
        &self,
        interaction: &Interaction,
        name: &str,
    ) -> Result<(), CommandError> {
        let key = normalize(name);
        let pending = self
            .proposals
            .variations
            .get(&key)
            .ok_or_else(|| CommandError::NotFound(name.to_string()))?;
        let target = self
            .catalog
            .find_key(&pending.name)
            .await?
            .ok_or_else(|| CommandError::NotFound(pending.name.clone()))?;

        self.transport.defer(interaction, true).await?;
        let current = self.catalog.fetch_record(&target).await?;
        let merged = current.merge_variations(pending.ingredients.clone());
        let payload = merged.to_json()?;
        self.catalog
            .commit_record(&target, payload, WriteMode::Replace)
            .await?;

        if !self.proposals.variations.remove_if_unchanged(&key, &pending) {
            tracing::info!(%key, "variation edited during approval, keeping the new version");
        }
        self.transport
            .edit_response(interaction, replies::approved_updated(&merged.name))
            .await?;
        Ok(())
    }

    async fn deny(
        &self,
        interaction: &Interaction,
        name: &str,
        variation: bool,
    ) -> Result<(), CommandError> {
        let registry = if variation {
            &self.proposals.variations
        } else {
            &self.proposals.records
        };
        if registry.remove(&normalize(name)).is_none() {
            return Err(CommandError::NotFound(name.to_string()));
        }

        tracing::info!(%name, variation, "proposal denied");
        self.transport
            .respond(interaction, Reply::ephemeral(replies::denied(name)))
            .await?;
        Ok(())
    }

    async fn list_pending(
        &self,
        interaction: &Interaction,
        variations: bool,
    ) -> Result<(), CommandError> {
        let (noun, registry) = if variations {
            ("variations", &self.proposals.variations)
        } else {
            ("proposals", &self.proposals.records)
        };
        let mut pending = registry.list();
        pending.sort_by(|a, b| a.name.cmp(&b.name));

        self.transport
            .respond(
                interaction,
                Reply::ephemeral(replies::pending_listing(noun, &pending)),
            )
            .await?;
        Ok(())
    }

    /// Handle a channel message; only picture uploads are acted on
    pub async fn handle_message(&self, message: Message) {
        if self.bot_user_id.as_deref() == Some(message.author.id.as_str()) {
            return;
        }
        let Some(rest) = upload_target(&message.content, &self.upload_prefix) else {
            return;
        };

        let span = tracing::info_span!(
            "upload",
            id = %message.id,
            user = %message.author.id,
            channel = %message.channel_id,
        );
        async {
            if let Err(err) = self.upload_pictures(&message, rest.trim()).await {
                tracing::error!(error = %err, "picture upload failed");
            }
        }
        .instrument(span)
        .await;
    }

    async fn upload_pictures(&self, message: &Message, name: &str) -> Result<(), CommandError> {
        let channel = message.channel_id.as_str();
        if self.authorize(&message.author).is_err() {
            self.transport
                .send_message(channel, CommandError::Unauthorized.to_string())
                .await?;
            return Ok(());
        }

        let Some(key) = self.catalog.find_key(name).await? else {
            self.transport
                .send_message(channel, replies::upload_target_missing(name))
                .await?;
            return Ok(());
        };

        let mut uploaded = 0usize;
        for attachment in &message.attachments {
            let data = match self.fetcher.fetch(attachment).await {
                Ok(data) => data,
                Err(err) => {
                    tracing::warn!(file = %attachment.filename, error = %err, "skipping attachment");
                    continue;
                }
            };
            match self
                .catalog
                .upload_picture(&key, &attachment.filename, data, attachment.content_type.clone())
                .await
            {
                Ok(_) => uploaded += 1,
                Err(err) => {
                    tracing::warn!(file = %attachment.filename, error = %err, "failed to store attachment");
                }
            }
        }

        tracing::info!(%key, uploaded, total = message.attachments.len(), "attachments processed");
        self.transport
            .send_message(channel, replies::attachments_uploaded(&key))
            .await?;
        Ok(())
    }
}

/// Text after `prefix` when the message is exactly the upload command
fn upload_target<'a>(content: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = content.strip_prefix(prefix)?;
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_whitespace() => Some(rest),
        Some(_) => None,
    }
}
