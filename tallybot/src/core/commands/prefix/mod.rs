use std::{future::Future, pin::Pin};

use eyre::Result;
use once_cell::sync::OnceCell;
use radix_trie::{Trie, TrieCommon};

use crate::commands::{
    cooldowns::{COOLDOWNS_PREFIX, COOLDOWNS_RESET_PREFIX},
    currency::{CURRENCY_PREFIX, CURRENCY_SET_PREFIX},
    help::HELP_PREFIX,
    ping::PING_PREFIX,
    status::STATUS_PREFIX,
};

pub use self::{
    args::{parse_user, Args},
    command::PrefixCommand,
};

mod args;
mod command;

static PREFIX_COMMANDS: OnceCell<PrefixCommands> = OnceCell::new();

pub type CommandResult<'fut> = Pin<Box<dyn Future<Output = Result<()>> + 'fut + Send>>;

type PrefixTrie = Trie<&'static str, &'static PrefixCommand>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum PrefixCommandGroup {
    Utility,
    Economy,
    Staff,
}

impl PrefixCommandGroup {
    pub fn emote(self) -> &'static str {
        match self {
            PrefixCommandGroup::Utility => ":tools:",
            PrefixCommandGroup::Economy => ":coin:",
            PrefixCommandGroup::Staff => ":shield:",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PrefixCommandGroup::Utility => "utility",
            PrefixCommandGroup::Economy => "economy",
            PrefixCommandGroup::Staff => "staff",
        }
    }
}

/// All prefix commands, keyed by their space separated path.
pub struct PrefixCommands {
    trie: PrefixTrie,
    /// Word count of the longest path
    max_depth: usize,
}

impl PrefixCommands {
    pub fn get() -> &'static Self {
        PREFIX_COMMANDS.get_or_init(|| {
            let commands = [
                &COOLDOWNS_PREFIX,
                &COOLDOWNS_RESET_PREFIX,
                &CURRENCY_PREFIX,
                &CURRENCY_SET_PREFIX,
                &HELP_PREFIX,
                &PING_PREFIX,
                &STATUS_PREFIX,
            ];

            match Self::new(&commands) {
                Ok(commands) => commands,
                Err(name) => panic!("duplicate prefix command `{name}`"),
            }
        })
    }

    /// Returns the first duplicate path as error.
    fn new(commands: &[&'static PrefixCommand]) -> Result<Self, &'static str> {
        let mut trie = Trie::new();
        let mut max_depth = 0;

        for &cmd in commands {
            for &name in cmd.names {
                if trie.insert(name, cmd).is_some() {
                    return Err(name);
                }

                max_depth = max_depth.max(name.split(' ').count());
            }
        }

        Ok(Self { trie, max_depth })
    }

    /// Exact lookup of a lowercase path.
    pub fn command(&self, path: &str) -> Option<&'static PrefixCommand> {
        self.trie.get(path).copied()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Every command once, aliases are skipped.
    pub fn iter(&self) -> impl Iterator<Item = &'static PrefixCommand> + '_ {
        self.trie
            .iter()
            .filter(|(name, cmd)| **name == cmd.name())
            .map(|(_, cmd)| *cmd)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::core::commands::flags::CommandFlags;

    fn noop<'f>(
        _: std::sync::Arc<crate::core::Context>,
        _: &'f twilight_model::channel::Message,
        _: Args<'f>,
    ) -> CommandResult<'f> {
        Box::pin(async { Ok(()) })
    }

    static FOO: PrefixCommand = PrefixCommand {
        names: &["foo", "f"],
        desc: "",
        usage: None,
        enabled: true,
        cooldown: Duration::ZERO,
        permissions: None,
        flags: CommandFlags::empty(),
        group: PrefixCommandGroup::Utility,
        exec: noop,
    };

    static FOO_BAR: PrefixCommand = PrefixCommand {
        names: &["foo bar baz", "f"],
        desc: "",
        usage: None,
        enabled: true,
        cooldown: Duration::ZERO,
        permissions: None,
        flags: CommandFlags::empty(),
        group: PrefixCommandGroup::Utility,
        exec: noop,
    };

    #[test]
    fn duplicate_paths_are_rejected() {
        assert_eq!(PrefixCommands::new(&[&FOO, &FOO_BAR]).err(), Some("f"));
    }

    #[test]
    fn registered_commands_are_unique() {
        let commands = PrefixCommands::get();

        assert_eq!(commands.max_depth(), 2);
        assert_eq!(commands.command("currency set").map(PrefixCommand::name), Some("currency set"));
        assert!(commands.command("currency sett").is_none());
        assert_eq!(commands.iter().count(), 7);
    }
}
