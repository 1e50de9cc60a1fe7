use sqlx::FromRow;

#[derive(FromRow)]
pub struct DbGuildConfig {
    pub guild_id: i64,
    pub currency: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GuildConfig {
    /// Symbol or name shown next to amounts; empty when unset.
    pub currency: String,
}

impl From<DbGuildConfig> for GuildConfig {
    #[inline]
    fn from(config: DbGuildConfig) -> Self {
        let DbGuildConfig {
            guild_id: _,
            currency,
        } = config;

        Self { currency }
    }
}
