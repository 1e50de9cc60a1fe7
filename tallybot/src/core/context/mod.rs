use std::{
    collections::hash_map::RandomState,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use dashmap::DashMap;
use eyre::{Result, WrapErr};
use tallybot_psql::{model::configs::GuildConfig, Database};
use twilight_cache_inmemory::{InMemoryCache, ResourceType};
use twilight_gateway::{stream, Config, Intents, Shard};
use twilight_http::{client::InteractionClient, Client};
use twilight_model::id::{
    marker::{ApplicationMarker, GuildMarker},
    Id,
};

use super::{buckets::Buckets, cooldowns::Cooldowns, BotConfig};
use crate::leaderboard::Leaderboards;

pub use self::error_report::ERROR_REPORT_READ;

mod error_report;
mod guild_config;
mod http;
mod shutdown;

type GuildConfigs = DashMap<Id<GuildMarker>, GuildConfig>;

pub struct Context {
    pub buckets: Buckets,
    pub cache: InMemoryCache,
    pub cooldowns: Arc<Cooldowns>,
    pub http: Arc<Client>,
    pub leaderboards: Leaderboards,
    pub psql: Database,
    guild_configs: GuildConfigs,
    application_id: Id<ApplicationMarker>,
    ready: AtomicBool,
}

impl Context {
    pub fn interaction(&self) -> InteractionClient<'_> {
        self.http.interaction(self.application_id)
    }

    pub async fn new() -> Result<(Self, Vec<Shard>)> {
        let config = BotConfig::get();
        let discord_token = config.discord_token.to_string();

        let http = Client::builder()
            .token(discord_token.clone())
            .remember_invalid_token(false)
            .build();

        let http = Arc::new(http);

        let current_user = http
            .current_user()
            .await
            .wrap_err("Failed to get current user")?
            .model()
            .await
            .wrap_err("Failed to deserialize current user")?;

        let application_id = current_user.id.cast();

        info!(
            "Connecting to Discord as {}#{}...",
            current_user.name, current_user.discriminator
        );

        let psql =
            Database::new(&config.database_url).wrap_err("Failed to create database client")?;

        psql.migrate().await?;

        let guild_configs = psql
            .select_guild_configs::<RandomState>()
            .await
            .wrap_err("Failed to get guild configs")?
            .into_iter()
            .collect();

        let resource_types = ResourceType::CHANNEL
            | ResourceType::GUILD
            | ResourceType::MEMBER
            | ResourceType::ROLE
            | ResourceType::USER_CURRENT;

        let cache = InMemoryCache::builder()
            .resource_types(resource_types)
            .build();

        let intents = Intents::GUILDS
            | Intents::GUILD_MEMBERS
            | Intents::GUILD_MESSAGES
            | Intents::MESSAGE_CONTENT;

        let shard_config = Config::new(discord_token, intents);

        let shards = stream::create_recommended(&http, shard_config, |_, builder| builder.build())
            .await
            .wrap_err("Failed to create shards")?
            .collect();

        let ctx = Self {
            buckets: Buckets::new(),
            cache,
            cooldowns: Arc::new(Cooldowns::new()),
            http,
            leaderboards: Leaderboards::new(),
            psql,
            guild_configs,
            application_id,
            ready: AtomicBool::new(false),
        };

        Ok((ctx, shards))
    }

    /// Returns `true` only for the first call.
    pub fn mark_ready(&self) -> bool {
        !self.ready.swap(true, Ordering::SeqCst)
    }
}
