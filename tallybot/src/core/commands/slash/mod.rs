use std::{future::Future, pin::Pin, sync::Arc};

use eyre::Result;
use once_cell::sync::OnceCell;
use radix_trie::{Trie, TrieCommon};
use twilight_interactions::command::ApplicationCommandData;
use twilight_model::application::command::Command;

use crate::{
    commands::help::{Help, HELP_SLASH},
    core::Context,
    util::interaction::InteractionCommand,
};

macro_rules! slash_trie {
    ( $( $cmd:ident => $fun:ident ,)* ) => {{
        use twilight_interactions::command::CreateCommand;

        let mut trie = Trie::new();

        $(
            trie.insert($cmd::NAME, &$fun);
        )*

        SlashCommands(trie)
    }}
}

static SLASH_COMMANDS: OnceCell<SlashCommands> = OnceCell::new();

pub type CommandResult = Pin<Box<dyn Future<Output = Result<()>> + 'static + Send>>;

pub struct SlashCommand {
    pub create: fn() -> ApplicationCommandData,
    pub exec: fn(Arc<Context>, InteractionCommand) -> CommandResult,
}

pub struct SlashCommands(Trie<&'static str, &'static SlashCommand>);

impl SlashCommands {
    pub fn get() -> &'static Self {
        SLASH_COMMANDS.get_or_init(|| {
            slash_trie! {
                Help => HELP_SLASH,
            }
        })
    }

    pub fn command(&self, command: &str) -> Option<&'static SlashCommand> {
        self.0.get(command).copied()
    }

    pub fn collect(&self) -> Vec<Command> {
        self.0.values().map(|c| (c.create)().into()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_is_registered() {
        let commands = SlashCommands::get();

        assert!(commands.command("help").is_some());
        assert_eq!(commands.collect().len(), 1);
        assert_eq!(commands.collect()[0].name, "help");
    }
}
