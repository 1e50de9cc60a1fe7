use std::{sync::Arc, time::Duration};

use twilight_model::{channel::Message, guild::Permissions};

use super::{Args, CommandResult, PrefixCommandGroup};
use crate::core::{commands::flags::CommandFlags, Context};

pub struct PrefixCommand {
    /// Command paths, the first one being the main one
    pub names: &'static [&'static str],
    pub desc: &'static str,
    pub usage: Option<&'static str>,
    /// Disabled commands only answer with the status overview
    pub enabled: bool,
    pub cooldown: Duration,
    /// Permissions the author needs in the channel
    pub permissions: Option<Permissions>,
    pub flags: CommandFlags,
    pub group: PrefixCommandGroup,
    pub exec: for<'f> fn(Arc<Context>, &'f Message, Args<'f>) -> CommandResult<'f>,
}

impl PrefixCommand {
    pub fn name(&self) -> &'static str {
        self.names[0]
    }
}
