use std::{collections::HashMap, sync::Arc, time::Duration};

use eyre::Result;
use tallybot_util::{
    constants::GREEN,
    datetime::{format_seconds, DurationFormat, SecondsFormat},
    EmbedBuilder, MessageBuilder,
};
use twilight_model::channel::Message;

use crate::{
    core::{
        commands::{
            flags::CommandFlags,
            prefix::{parse_user, Args, CommandResult, PrefixCommand, PrefixCommandGroup},
        },
        Context,
    },
    leaderboard::{Leaderboard, LeaderboardOrigin},
    util::MessageExt,
};

pub static COOLDOWNS_PREFIX: PrefixCommand = PrefixCommand {
    names: &["cooldowns", "cd"],
    desc: "List your active command cooldowns",
    usage: None,
    enabled: true,
    cooldown: Duration::from_secs(3),
    permissions: None,
    flags: CommandFlags::SKIP_DEFER,
    group: PrefixCommandGroup::Utility,
    exec: prefix_cooldowns,
};

pub static COOLDOWNS_RESET_PREFIX: PrefixCommand = PrefixCommand {
    names: &["cooldowns reset", "cd reset"],
    desc: "Reset all cooldowns of a user",
    usage: Some("<user>"),
    enabled: true,
    cooldown: Duration::ZERO,
    permissions: None,
    flags: CommandFlags::STAFF.union(CommandFlags::SKIP_DEFER),
    group: PrefixCommandGroup::Staff,
    exec: prefix_cooldowns_reset,
};

fn prefix_cooldowns<'f>(ctx: Arc<Context>, msg: &'f Message, _: Args<'f>) -> CommandResult<'f> {
    Box::pin(cooldowns(ctx, msg))
}

fn prefix_cooldowns_reset<'f>(
    ctx: Arc<Context>,
    msg: &'f Message,
    mut args: Args<'f>,
) -> CommandResult<'f> {
    let user = args.next();

    Box::pin(cooldowns_reset(ctx, msg, user))
}

async fn cooldowns(ctx: Arc<Context>, msg: &Message) -> Result<()> {
    let active = ctx
        .cooldowns
        .list()
        .remove(&msg.author.id)
        .unwrap_or_default();

    let items = cooldown_entries(active);

    Leaderboard::builder("Your cooldowns", items)
        .begin(ctx, LeaderboardOrigin::from(msg))
        .await
}

async fn cooldowns_reset(ctx: Arc<Context>, msg: &Message, user: Option<&str>) -> Result<()> {
    let Some(user) = user.and_then(parse_user) else {
        let content = "You must specify a user, e.g. `.cooldowns reset @user`";
        msg.error(&ctx, content).await?;

        return Ok(());
    };

    let cleared = ctx.cooldowns.clear(user);
    info!(user = user.get(), cleared, "Reset cooldowns");

    let plural = if cleared == 1 { "" } else { "s" };
    let description = format!("Cleared {cleared} cooldown{plural} of <@{user}>");
    let embed = EmbedBuilder::new().description(description).color(GREEN);
    msg.reply(&ctx, MessageBuilder::new().embed(embed)).await?;

    Ok(())
}

/// Active cooldowns sorted by remaining time, expired ones are skipped.
fn cooldown_entries(cooldowns: HashMap<Box<str>, Duration>) -> Vec<String> {
    let mut cooldowns: Vec<_> = cooldowns
        .into_iter()
        .filter(|(_, remaining)| !remaining.is_zero())
        .collect();

    cooldowns.sort_unstable_by(|(a_cmd, a), (b_cmd, b)| a.cmp(b).then_with(|| a_cmd.cmp(b_cmd)));

    let options = SecondsFormat {
        format: DurationFormat::Short,
        ..Default::default()
    };

    cooldowns
        .into_iter()
        .map(|(cmd, remaining)| {
            // Round up so that nothing active shows as zero
            let secs = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);

            format!("`{cmd}`: {}", format_seconds(secs, &options))
        })
        .collect()
}
