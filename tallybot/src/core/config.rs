use std::env;

use eyre::Result;
use once_cell::sync::OnceCell;
use twilight_model::id::{
    marker::{ChannelMarker, GuildMarker, RoleMarker, UserMarker},
    Id,
};

static CONFIG: OnceCell<BotConfig> = OnceCell::new();

#[derive(Debug)]
pub struct BotConfig {
    pub database_url: Box<str>,
    pub discord_token: Box<str>,
    pub owner: Id<UserMarker>,
    /// Channel that receives error reports
    pub error_channel: Option<Id<ChannelMarker>>,
    /// Slash commands are registered only in this guild if specified
    pub dev_guild: Option<Id<GuildMarker>>,
    pub staff_roles: Box<[Id<RoleMarker>]>,
}

impl BotConfig {
    pub fn get() -> &'static Self {
        CONFIG
            .get()
            .expect("`BotConfig::init` must be called first")
    }

    pub fn init() -> Result<()> {
        let config = BotConfig {
            database_url: env_var("DATABASE_URL")?,
            discord_token: env_var("DISCORD_TOKEN")?,
            owner: env_var("OWNER_USER_ID")?,
            error_channel: optional_env_var("ERROR_CHANNEL_ID")?,
            dev_guild: optional_env_var("DEV_GUILD_ID")?,
            staff_roles: optional_env_var("STAFF_ROLE_IDS")?.unwrap_or_default(),
        };

        if CONFIG.set(config).is_err() {
            warn!("CONFIG was already set");
        }

        Ok(())
    }
}

trait EnvKind: Sized {
    const EXPECTED: &'static str;

    fn from_str(s: String) -> Result<Self, String>;
}

macro_rules! env_kind {
    ($($ty:ty: |$arg:ident| $impl:block,)*) => {
        $(
            impl EnvKind for $ty {
                const EXPECTED: &'static str = stringify!($ty);

                fn from_str($arg: String) -> Result<Self, String> {
                    $impl
                }
            }
        )*
    };
}

env_kind! {
    Box<str>: |s| { Ok(s.into_boxed_str()) },
    Id<UserMarker>: |s| { parse_id(&s).ok_or(s) },
    Id<GuildMarker>: |s| { parse_id(&s).ok_or(s) },
    Id<ChannelMarker>: |s| { parse_id(&s).ok_or(s) },
}

impl EnvKind for Box<[Id<RoleMarker>]> {
    const EXPECTED: &'static str = "a comma separated list of role ids";

    fn from_str(s: String) -> Result<Self, String> {
        s.split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(parse_id)
            .collect::<Option<_>>()
            .ok_or(s)
    }
}

fn parse_id<T>(s: &str) -> Option<Id<T>> {
    s.trim().parse().ok().and_then(Id::new_checked)
}

fn env_var<T: EnvKind>(name: &str) -> Result<T> {
    let value = env::var(name).map_err(|_| eyre!("missing env variable `{name}`"))?;

    parse_env(name, value)
}

fn optional_env_var<T: EnvKind>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => parse_env(name, value).map(Some),
        Ok(_) | Err(_) => Ok(None),
    }
}

fn parse_env<T: EnvKind>(name: &str, value: String) -> Result<T> {
    T::from_str(value).map_err(|value| {
        eyre!(
            "failed to parse env variable `{name}={value}`; expected {expected}",
            expected = T::EXPECTED
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_role_list() {
        let roles = <Box<[Id<RoleMarker>]> as EnvKind>::from_str("1, 2,,3".to_owned()).unwrap();

        assert_eq!(roles.to_vec(), vec![Id::new(1), Id::new(2), Id::new(3)]);
    }

    #[test]
    fn rejects_invalid_ids() {
        assert!(<Id<UserMarker> as EnvKind>::from_str("abc".to_owned()).is_err());
        assert!(<Id<UserMarker> as EnvKind>::from_str("0".to_owned()).is_err());
        assert!(<Box<[Id<RoleMarker>]> as EnvKind>::from_str("1,x".to_owned()).is_err());
    }

    #[test]
    fn error_names_variable() {
        let err = parse_env::<Id<GuildMarker>>("DEV_GUILD_ID", "guild".to_owned()).unwrap_err();

        assert!(err
            .to_string()
            .starts_with("failed to parse env variable `DEV_GUILD_ID=guild`; expected"));
    }
}
