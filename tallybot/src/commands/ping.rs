use std::{sync::Arc, time::Duration};

use eyre::Result;
use tallybot_util::MessageBuilder;
use tokio::time::Instant;
use twilight_model::channel::Message;

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

pub static PING_PREFIX: PrefixCommand = PrefixCommand {
    names: &["ping", "p"],
    desc: "Check if the bot is online",
    usage: None,
    enabled: true,
    cooldown: Duration::from_secs(5),
    permissions: None,
    flags: CommandFlags::SKIP_DEFER,
    group: PrefixCommandGroup::Utility,
    exec: prefix_ping,
};

fn prefix_ping<'f>(ctx: Arc<Context>, msg: &'f Message, _: Args<'f>) -> CommandResult<'f> {
    Box::pin(ping(ctx, msg))
}

/// The latency is the time until discord acknowledged the first reply.
async fn ping(ctx: Arc<Context>, msg: &Message) -> Result<()> {
    let builder = MessageBuilder::new().content("Pong");
    let start = Instant::now();
    let response = msg.reply(&ctx, builder).await?;
    let elapsed = start.elapsed().as_millis();

    let content = format!(":ping_pong: Pong! ({elapsed}ms)");
    let builder = MessageBuilder::new().content(content);
    response.update(&ctx, builder).await?;

    Ok(())
}
