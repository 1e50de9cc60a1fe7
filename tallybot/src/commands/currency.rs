use std::{sync::Arc, time::Duration};

use eyre::{ContextCompat, Result};
use tallybot_psql::CURRENCY_MAX_LEN;
use tallybot_util::{
    constants::{BLUE, GREEN},
    EmbedBuilder, MessageBuilder, StrExt,
};
use twilight_model::{channel::Message, guild::Permissions};

use crate::{
    core::{
        commands::{
            flags::CommandFlags,
            prefix::{Args, CommandResult, PrefixCommand, PrefixCommandGroup},
        },
        Context,
    },
    util::MessageExt,
};

pub static CURRENCY_PREFIX: PrefixCommand = PrefixCommand {
    names: &["currency"],
    desc: "Show the currency of this server",
    usage: None,
    enabled: true,
    cooldown: Duration::from_secs(3),
    permissions: None,
    flags: CommandFlags::SKIP_DEFER,
    group: PrefixCommandGroup::Economy,
    exec: prefix_currency,
};

pub static CURRENCY_SET_PREFIX: PrefixCommand = PrefixCommand {
    names: &["currency set"],
    desc: "Set the currency of this server",
    usage: Some("<currency>"),
    enabled: true,
    cooldown: Duration::from_secs(10),
    permissions: Some(Permissions::MANAGE_GUILD),
    flags: CommandFlags::empty(),
    group: PrefixCommandGroup::Economy,
    exec: prefix_currency_set,
};

fn prefix_currency<'f>(ctx: Arc<Context>, msg: &'f Message, _: Args<'f>) -> CommandResult<'f> {
    Box::pin(currency(ctx, msg))
}

fn prefix_currency_set<'f>(
    ctx: Arc<Context>,
    msg: &'f Message,
    args: Args<'f>,
) -> CommandResult<'f> {
    Box::pin(currency_set(ctx, msg, args.rest()))
}

async fn currency(ctx: Arc<Context>, msg: &Message) -> Result<()> {
    let guild = msg.guild_id.wrap_err("Missing guild id")?;
    let currency = ctx.guild_config(guild, |config| config.currency.clone());

    let description = if currency.is_empty() {
        "No currency set for this server yet".to_owned()
    } else {
        format!("This server's currency is **{currency}**")
    };

    let embed = EmbedBuilder::new().description(description).color(BLUE);
    msg.reply(&ctx, MessageBuilder::new().embed(embed)).await?;

    Ok(())
}

async fn currency_set(ctx: Arc<Context>, msg: &Message, input: &str) -> Result<()> {
    let guild = msg.guild_id.wrap_err("Missing guild id")?;

    let currency = match validate_currency(input) {
        Ok(currency) => currency,
        Err(content) => {
            msg.error(&ctx, content).await?;

            return Ok(());
        }
    };

    ctx.update_guild_currency(guild, currency).await?;

    let embed = EmbedBuilder::new()
        .description(format!("Currency set to **{currency}**"))
        .color(GREEN);

    msg.reply(&ctx, MessageBuilder::new().embed(embed)).await?;

    Ok(())
}

/// Returns the error message for invalid input.
fn validate_currency(input: &str) -> Result<&str, String> {
    let currency = input.trim();

    if currency.is_empty() {
        Err("You must specify a currency, e.g. `.currency set $`".to_owned())
    } else if currency.char_len() > CURRENCY_MAX_LEN {
        Err(format!(
            "The currency must not be longer than {CURRENCY_MAX_LEN} characters"
        ))
    } else {
        Ok(currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_input() {
        assert_eq!(validate_currency("  €  "), Ok("€"));
        assert_eq!(validate_currency("gold coins"), Ok("gold coins"));
        assert!(validate_currency("   ").is_err());
        assert!(validate_currency(&"€".repeat(CURRENCY_MAX_LEN)).is_ok());
        assert!(validate_currency(&"€".repeat(CURRENCY_MAX_LEN + 1)).is_err());
    }
}
