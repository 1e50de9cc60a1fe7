use eyre::{Result, WrapErr};
use tallybot_psql::model::configs::GuildConfig;
use twilight_model::id::{marker::GuildMarker, Id};

use crate::core::Context;

impl Context {
    pub fn guild_config<F, O>(&self, guild_id: Id<GuildMarker>, f: F) -> O
    where
        F: FnOnce(&GuildConfig) -> O,
    {
        match self.guild_configs.get(&guild_id) {
            Some(config) => f(config.value()),
            None => f(&GuildConfig::default()),
        }
    }

    /// Persist the currency first, the cache is only updated on success.
    pub async fn update_guild_currency(
        &self,
        guild_id: Id<GuildMarker>,
        currency: &str,
    ) -> Result<()> {
        self.psql
            .upsert_guild_currency(guild_id, currency)
            .await
            .wrap_err("Failed to upsert guild currency")?;

        self.guild_configs.entry(guild_id).or_default().currency = currency.to_owned();

        Ok(())
    }

    /// Forget about a guild the bot was removed from.
    pub async fn remove_guild_config(&self, guild_id: Id<GuildMarker>) -> Result<()> {
        if self.guild_configs.remove(&guild_id).is_none() {
            return Ok(());
        }

        self.psql
            .delete_guild_config(guild_id)
            .await
            .wrap_err("Failed to delete guild config")
    }
}
