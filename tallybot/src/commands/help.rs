use std::{collections::BTreeSet, sync::Arc, time::Duration};

use eyre::Result;
use tallybot_util::{
    constants::{BLURPLE, PREFIX},
    FooterBuilder,
};
use twilight_interactions::command::{CommandModel, CreateCommand};
use twilight_model::channel::Message;

use crate::{
    core::{
        commands::{
            flags::CommandFlags,
            prefix::{Args, CommandResult, PrefixCommand, PrefixCommandGroup, PrefixCommands},
            slash::{CommandResult as SlashCommandResult, SlashCommand},
        },
        Context,
    },
    leaderboard::{Leaderboard, LeaderboardOrigin, PageMetadata, DEFAULT_PER_PAGE},
    util::interaction::InteractionCommand,
};

pub static HELP_PREFIX: PrefixCommand = PrefixCommand {
    names: &["help", "h", "commands"],
    desc: "List all commands",
    usage: None,
    enabled: true,
    cooldown: Duration::from_secs(3),
    permissions: None,
    flags: CommandFlags::SKIP_DEFER,
    group: PrefixCommandGroup::Utility,
    exec: prefix_help,
};

pub static HELP_SLASH: SlashCommand = SlashCommand {
    create: Help::create_command,
    exec: slash_help,
};

#[derive(CommandModel, CreateCommand)]
#[command(name = "help", desc = "List all commands")]
pub struct Help {
    /// Only show the list to you
    ephemeral: Option<bool>,
}

fn prefix_help<'f>(ctx: Arc<Context>, msg: &'f Message, _: Args<'f>) -> CommandResult<'f> {
    Box::pin(help(ctx, LeaderboardOrigin::from(msg), false))
}

fn slash_help(ctx: Arc<Context>, command: InteractionCommand) -> SlashCommandResult {
    Box::pin(async move {
        let args = Help::from_interaction((*command.data).clone().into())?;
        let origin = LeaderboardOrigin::try_from(&command)?;

        help(ctx, origin, args.ephemeral.unwrap_or(false)).await
    })
}

async fn help(ctx: Arc<Context>, origin: LeaderboardOrigin, ephemeral: bool) -> Result<()> {
    let mut commands: Vec<_> = PrefixCommands::get().iter().collect();
    commands.sort_unstable_by_key(|cmd| (cmd.group, cmd.name()));

    let items = commands.iter().map(|cmd| command_entry(cmd)).collect();
    let metadata = page_metadata(&commands, DEFAULT_PER_PAGE);

    Leaderboard::builder("Commands", items)
        .per_page(DEFAULT_PER_PAGE)
        .ephemeral(ephemeral)
        .metadata(metadata)
        .begin(ctx, origin)
        .await
}

fn command_entry(cmd: &PrefixCommand) -> String {
    let mut entry = format!("{} `{PREFIX}{}", cmd.group.emote(), cmd.name());

    if let Some(usage) = cmd.usage {
        entry.push(' ');
        entry.push_str(usage);
    }

    entry.push_str("` ");
    entry.push_str(cmd.desc);

    if !cmd.enabled {
        entry.push_str(" *(disabled)*");
    }

    entry
}

/// The footer of each page names the categories of its commands.
fn page_metadata(commands: &[&PrefixCommand], per_page: usize) -> Vec<PageMetadata> {
    commands
        .chunks(per_page)
        .map(|page| {
            let groups: BTreeSet<_> = page.iter().map(|cmd| cmd.group).collect();
            let names: Vec<_> = groups.into_iter().map(PrefixCommandGroup::name).collect();
            let footer = FooterBuilder::new(format!("Categories: {}", names.join(", ")));

            PageMetadata {
                color: Some(BLURPLE),
                footer: Some(footer),
                ..Default::default()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_show_usage_and_state() {
        let set = PrefixCommands::get().command("currency set").unwrap();
        let entry = command_entry(set);

        assert!(entry.contains("`.currency set <currency>`"));

        let status = PrefixCommands::get().command("status").unwrap();
        assert!(command_entry(status).ends_with("*(disabled)*"));
    }

    #[test]
    fn footer_per_page() {
        let mut commands: Vec<_> = PrefixCommands::get().iter().collect();
        commands.sort_unstable_by_key(|cmd| (cmd.group, cmd.name()));

        let metadata = page_metadata(&commands, 5);
        assert_eq!(metadata.len(), 2);

        let footers: Vec<_> = metadata
            .iter()
            .map(|meta| meta.footer.as_ref().unwrap().text.as_str())
            .collect();

        assert_eq!(footers, ["Categories: utility, economy", "Categories: economy, staff"]);
    }
}
