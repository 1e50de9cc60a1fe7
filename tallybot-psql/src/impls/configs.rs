use std::{collections::HashMap, hash::BuildHasher};

use eyre::{Result, WrapErr};
use futures::StreamExt;
use twilight_model::id::{marker::GuildMarker, Id};

use crate::{
    model::configs::{DbGuildConfig, GuildConfig},
    Database,
};

/// Longest currency that is accepted.
pub const CURRENCY_MAX_LEN: usize = 32;

impl Database {
    pub async fn select_guild_configs<S>(&self) -> Result<HashMap<Id<GuildMarker>, GuildConfig, S>>
    where
        S: Default + BuildHasher,
    {
        info!("Fetching guild configs...");

        let query = sqlx::query_as::<_, DbGuildConfig>(
            r#"
SELECT
  guild_id,
  currency
FROM
  guild_configs"#,
        );

        let mut rows = query.fetch(self.pool());
        let mut configs = HashMap::default();

        while let Some(row_res) = rows.next().await {
            let row = row_res.wrap_err("failed to get next")?;
            let guild_id = Id::new(row.guild_id as u64);
            configs.insert(guild_id, row.into());
        }

        Ok(configs)
    }

    pub async fn select_guild_config(
        &self,
        guild_id: Id<GuildMarker>,
    ) -> Result<Option<GuildConfig>> {
        let query = sqlx::query_as::<_, DbGuildConfig>(
            r#"
SELECT
  guild_id,
  currency
FROM
  guild_configs
WHERE
  guild_id = $1"#,
        )
        .bind(guild_id.get() as i64);

        let row = query
            .fetch_optional(self.pool())
            .await
            .wrap_err("failed to fetch optional")?;

        Ok(row.map(GuildConfig::from))
    }

    pub async fn upsert_guild_currency(
        &self,
        guild_id: Id<GuildMarker>,
        currency: &str,
    ) -> Result<()> {
        if currency.chars().count() > CURRENCY_MAX_LEN {
            bail!("currency must not be longer than {CURRENCY_MAX_LEN} characters");
        }

        let query = sqlx::query(
            r#"
INSERT INTO guild_configs (guild_id, currency)
VALUES
  ($1, $2) ON CONFLICT (guild_id) DO
UPDATE
SET
  currency = $2"#,
        )
        .bind(guild_id.get() as i64)
        .bind(currency);

        query
            .execute(self.pool())
            .await
            .wrap_err("failed to execute query")?;

        debug!(guild_id = guild_id.get(), currency, "Upserted guild currency");

        Ok(())
    }

    pub async fn delete_guild_config(&self, guild_id: Id<GuildMarker>) -> Result<()> {
        let query = sqlx::query(
            r#"
DELETE FROM
  guild_configs
WHERE
  guild_id = $1"#,
        )
        .bind(guild_id.get() as i64);

        query
            .execute(self.pool())
            .await
            .wrap_err("failed to execute query")?;

        debug!(guild_id = guild_id.get(), "Deleted guild config");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::RandomState;

    use eyre::Result;

    use crate::tests::{database, discord_id};

    #[tokio::test]
    #[ignore = "requires a postgres instance behind DATABASE_URL"]
    async fn upsert_select_delete() -> Result<()> {
        let psql = database()?;
        psql.migrate().await?;

        let guild_id = discord_id();

        psql.upsert_guild_currency(guild_id, "coins").await?;
        let config = psql.select_guild_config(guild_id).await?;
        assert_eq!(config.map(|config| config.currency).as_deref(), Some("coins"));

        psql.upsert_guild_currency(guild_id, "$").await?;
        let configs = psql.select_guild_configs::<RandomState>().await?;
        assert_eq!(configs.get(&guild_id).map(|c| c.currency.as_str()), Some("$"));

        psql.delete_guild_config(guild_id).await?;
        assert!(psql.select_guild_config(guild_id).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn currency_too_long() -> Result<()> {
        let psql = crate::Database::new("postgres://localhost/unused")?;
        let currency = "x".repeat(super::CURRENCY_MAX_LEN + 1);

        assert!(psql.upsert_guild_currency(discord_id(), &currency).await.is_err());

        Ok(())
    }
}
