use std::{mem, sync::Arc};

use crate::{
    core::{
        commands::slash::SlashCommands,
        events::EventKind,
        Context,
    },
    util::{interaction::InteractionCommand, InteractionCommandExt},
};

pub async fn handle_command(ctx: Arc<Context>, mut command: InteractionCommand) {
    let name = mem::take(&mut command.data.name);
    EventKind::SlashCommand.log(&ctx, &command, &name);

    let Some(slash) = SlashCommands::get().command(&name) else {
        error!("Unknown slash command `{name}`");

        if let Err(err) = command.error_callback(&ctx, "Unknown command").await {
            warn!(?err, "Failed to respond to unknown command");
        }

        return;
    };

    match (slash.exec)(Arc::clone(&ctx), command).await {
        Ok(_) => info!("Processed slash command `{name}`"),
        Err(err) => {
            let err = err.wrap_err(format!("Failed to process slash command `{name}`"));
            ctx.report_error(&err, None).await;
        }
    }
}
