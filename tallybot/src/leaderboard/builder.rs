use std::sync::Arc;

use eyre::{Result, WrapErr};
use twilight_model::{
    channel::message::component::ActionRow,
    id::{marker::UserMarker, Id},
};

use super::{
    discord::{DiscordOutput, LeaderboardOrigin},
    driver::{self, LeaderboardOutput},
    render,
    registry::Leaderboards,
    session::LeaderboardSession,
    PageMetadata, DEFAULT_PER_PAGE,
};
use crate::core::Context;

/// Entry point for showing a paginated list.
pub struct Leaderboard;

impl Leaderboard {
    pub fn builder(title: impl Into<String>, items: Vec<String>) -> LeaderboardBuilder {
        LeaderboardBuilder {
            title: title.into(),
            items,
            per_page: DEFAULT_PER_PAGE,
            ephemeral: false,
            metadata: Vec::new(),
            extras: Vec::new(),
        }
    }
}

pub struct LeaderboardBuilder {
    title: String,
    items: Vec<String>,
    per_page: usize,
    ephemeral: bool,
    metadata: Vec<PageMetadata>,
    extras: Vec<Option<ActionRow>>,
}

impl LeaderboardBuilder {
    pub fn per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page;

        self
    }

    /// Only has an effect on interaction origins.
    pub fn ephemeral(mut self, ephemeral: bool) -> Self {
        self.ephemeral = ephemeral;

        self
    }

    /// Embed overrides, one entry per page.
    pub fn metadata(mut self, metadata: Vec<PageMetadata>) -> Self {
        self.metadata = metadata;

        self
    }

    /// Additional component row, one entry per page.
    pub fn extras(mut self, extras: Vec<Option<ActionRow>>) -> Self {
        self.extras = extras;

        self
    }

    /// Show the first page and keep handling the controls in the
    /// background.
    pub async fn begin(self, ctx: Arc<Context>, origin: LeaderboardOrigin) -> Result<()> {
        let owner = origin.owner();
        let registry = ctx.leaderboards.clone();
        let output = DiscordOutput::new(ctx, origin);

        self.begin_with(&registry, owner, output).await
    }

    pub(super) async fn begin_with<O: LeaderboardOutput>(
        self,
        registry: &Leaderboards,
        owner: Id<UserMarker>,
        output: O,
    ) -> Result<()> {
        let Self {
            title,
            items,
            per_page,
            ephemeral,
            metadata,
            extras,
        } = self;

        if items.is_empty() {
            return output
                .respond(render::no_data(&title), ephemeral)
                .await
                .wrap_err("Failed to respond with empty leaderboard");
        }

        let (id, inbox) = registry.register();

        let Some(session) =
            LeaderboardSession::new(id.clone(), title, items, per_page, owner, metadata, extras)
        else {
            registry.remove(&id);

            bail!("Leaderboard without items");
        };

        if let Err(err) = output.respond(session.page(), ephemeral).await {
            registry.remove(&id);

            return Err(err.wrap_err("Failed to show first leaderboard page"));
        }

        tokio::spawn(driver::run(session, output, inbox, registry.clone()));

        Ok(())
    }
}
