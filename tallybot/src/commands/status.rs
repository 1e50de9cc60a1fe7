use std::{sync::Arc, time::Duration};

use twilight_model::channel::Message;

use crate::core::{
    commands::{
        flags::CommandFlags,
        prefix::{Args, CommandResult, PrefixCommand, PrefixCommandGroup},
    },
    Context,
};

/// Placeholder until there is a status to show; disabled commands only
/// answer with the status boxes.
pub static STATUS_PREFIX: PrefixCommand = PrefixCommand {
    names: &["status"],
    desc: "Show the bot status",
    usage: None,
    enabled: false,
    cooldown: Duration::ZERO,
    permissions: None,
    flags: CommandFlags::SKIP_DEFER,
    group: PrefixCommandGroup::Utility,
    exec: prefix_status,
};

fn prefix_status<'f>(_: Arc<Context>, _: &'f Message, _: Args<'f>) -> CommandResult<'f> {
    Box::pin(async { Ok(()) })
}
