use std::sync::Arc;

use eyre::{Result, WrapErr};
use tallybot_util::{
    constants::{GENERAL_ISSUE, PREFIX},
    datetime::{format_seconds, SecondsFormat},
    status_embeds,
};
use twilight_model::{
    channel::{
        message::{MessageFlags, MessageType},
        Message,
    },
    guild::Permissions,
};

use self::parse::Invoke;
use super::{EventKind, ProcessResult};
use crate::{
    core::{
        commands::checks::{check_permissions, check_roles, CheckMode},
        BotConfig, Context,
    },
    util::{channel_bucket, MessageExt},
};

mod parse;

pub async fn handle_message(ctx: Arc<Context>, msg: Message) {
    if !is_candidate(&msg) {
        return;
    }

    let Some(content) = msg.content.strip_prefix(PREFIX) else {
        return;
    };

    let Some(invoke) = Invoke::parse(content) else {
        return;
    };

    let name = invoke.cmd.name();
    EventKind::PrefixCommand.log(&ctx, &msg, name);

    match process_command(Arc::clone(&ctx), invoke, &msg).await {
        Ok(ProcessResult::Success) => info!("Processed command `{name}`"),
        Ok(result) => info!("Command `{name}` was not processed: {result:?}"),
        Err(err) => {
            let _ = msg.error(&ctx, GENERAL_ISSUE).await;

            let err = err.wrap_err(format!("Failed to process prefix command `{name}`"));
            ctx.report_error(&err, None).await;
        }
    }
}

/// Only regular messages and replies by users inside guilds.
fn is_candidate(msg: &Message) -> bool {
    msg.guild_id.is_some()
        && !msg.content.is_empty()
        && !msg.author.bot
        && msg.webhook_id.is_none()
        && matches!(msg.kind, MessageType::Regular | MessageType::Reply)
}

async fn process_command<'m>(
    ctx: Arc<Context>,
    invoke: Invoke<'m>,
    msg: &'m Message,
) -> Result<ProcessResult> {
    let Invoke { cmd, args } = invoke;

    if !cmd.enabled {
        let embeds = status_embeds();

        let req = ctx
            .http
            .create_message(msg.channel_id)
            .reply(msg.id)
            .embeds(&embeds)?
            .flags(MessageFlags::SUPPRESS_NOTIFICATIONS);

        ctx.send(&channel_bucket(msg.channel_id), req)
            .await
            .wrap_err("Failed to reply with status")?;

        return Ok(ProcessResult::Disabled);
    }

    let author = msg.author.id;

    if let Some(remaining) = ctx.cooldowns.has(author, cmd.name()) {
        let remaining = format_seconds(remaining.as_secs().max(1), &SecondsFormat::default());
        let content = format!("You are on cooldown, try again in {remaining}");
        msg.error(&ctx, content).await?;

        return Ok(ProcessResult::Cooldown);
    }

    if let Some(required) = cmd.permissions {
        let permissions = ctx
            .cache
            .permissions()
            .in_channel(author, msg.channel_id)
            .unwrap_or_else(|err| {
                warn!(?err, "Failed to calculate author permissions");

                Permissions::empty()
            });

        if let Err(err) = check_permissions(permissions, required, CheckMode::All) {
            msg.error(&ctx, format!("You are {err}")).await?;

            return Ok(ProcessResult::NoPermission);
        }
    }

    if cmd.flags.staff() {
        let config = BotConfig::get();

        if author != config.owner {
            let roles = msg.member.as_ref().map_or(&[][..], |member| member.roles.as_slice());

            if let Err(err) = check_roles(roles, &config.staff_roles, CheckMode::Some) {
                msg.error(&ctx, format!("This command {err}")).await?;

                return Ok(ProcessResult::NoStaff);
            }
        }
    }

    ctx.cooldowns.set(author, cmd.name(), cmd.cooldown);

    if cmd.flags.defer() {
        let req = ctx.http.create_typing_trigger(msg.channel_id);

        if let Err(err) = ctx.send(&channel_bucket(msg.channel_id), req).await {
            debug!(?err, "Failed to trigger typing");
        }
    }

    (cmd.exec)(ctx, msg, args).await?;

    Ok(ProcessResult::Success)
}
