use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    sync::Arc,
};

use eyre::{Report, Result};
use futures::StreamExt;
use twilight_gateway::{stream::ShardEventStream, Event, Shard};

use self::{interaction::handle_interaction, message::handle_message};
use super::Context;
use crate::util::Authored;

mod interaction;
mod message;

#[derive(Debug)]
enum ProcessResult {
    Success,
    Disabled,
    Cooldown,
    NoPermission,
    NoStaff,
}

enum EventKind {
    Component,
    Modal,
    PrefixCommand,
    SlashCommand,
}

impl EventKind {
    fn log<A: Authored>(self, ctx: &Context, orig: &A, name: &str) {
        let location = EventLocation::new(ctx, orig);
        let user = orig.user();
        let username = user.map_or("<unknown user>", |u| u.name.as_str());

        info!("[{location}] {username} {self} `{name}`");
    }
}

impl Display for EventKind {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Component => f.write_str("used component"),
            Self::Modal => f.write_str("used modal"),
            Self::PrefixCommand => f.write_str("used prefix command"),
            Self::SlashCommand => f.write_str("used slash command"),
        }
    }
}

enum EventLocation {
    Private,
    UncachedGuild,
    UncachedChannel { guild: String },
    Cached { guild: String, channel: String },
}

impl EventLocation {
    fn new<A: Authored>(ctx: &Context, orig: &A) -> Self {
        let Some(guild_id) = orig.guild_id() else {
            return Self::Private;
        };

        let Some(guild) = ctx.cache.guild(guild_id).map(|guild| guild.name().to_owned()) else {
            return Self::UncachedGuild;
        };

        let channel = ctx
            .cache
            .channel(orig.channel_id())
            .and_then(|channel| channel.name.clone());

        match channel {
            Some(channel) => Self::Cached { guild, channel },
            None => Self::UncachedChannel { guild },
        }
    }
}

impl Display for EventLocation {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Private => f.write_str("Private"),
            Self::UncachedGuild => f.write_str("<uncached guild>"),
            Self::UncachedChannel { guild } => write!(f, "{guild}:<uncached channel>"),
            Self::Cached { guild, channel } => write!(f, "{guild}:{channel}"),
        }
    }
}

pub async fn event_loop(ctx: Arc<Context>, shards: &mut Vec<Shard>) {
    let mut stream = ShardEventStream::new(shards.iter_mut());

    loop {
        let err = match stream.next().await {
            Some((shard, Ok(event))) => {
                ctx.cache.update(&event);
                let ctx = Arc::clone(&ctx);
                let shard_id = shard.id().number();

                tokio::spawn(async move {
                    if let Err(err) = handle_event(ctx, event, shard_id).await {
                        error!("{:?}", err.wrap_err("Failed to handle event"));
                    }
                });

                continue;
            }
            Some((_, Err(err))) => err,
            None => return,
        };

        // cannot be handled inside the previous `match` due to NLL
        let is_fatal = err.is_fatal();
        error!("{:?}", Report::new(err).wrap_err("Event error"));

        if is_fatal {
            return;
        }
    }
}

async fn handle_event(ctx: Arc<Context>, event: Event, shard_id: u64) -> Result<()> {
    match event {
        Event::GatewayClose(Some(frame)) => {
            warn!(
                "Received closing frame for shard {shard_id}: reason={} (code {})",
                frame.reason, frame.code,
            )
        }
        Event::GatewayClose(None) => warn!("Received closing frame for shard {shard_id}"),
        Event::GatewayInvalidateSession(true) => {
            warn!("Gateway has invalidated session for shard {shard_id}, but its reconnectable")
        }
        Event::GatewayInvalidateSession(false) => {
            warn!("Gateway has invalidated session for shard {shard_id}")
        }
        Event::GatewayReconnect => info!("Gateway requested shard {shard_id} to reconnect"),
        Event::GuildDelete(e) if !e.unavailable => {
            ctx.remove_guild_config(e.id)
                .await
                .map_err(|err| err.wrap_err("Failed to remove config of left guild"))?;
        }
        Event::InteractionCreate(e) => handle_interaction(ctx, e.0).await,
        Event::MessageCreate(msg) => handle_message(ctx, msg.0).await,
        Event::Ready(ready) => {
            if ctx.mark_ready() {
                info!(
                    guilds = ready.guilds.len(),
                    "Logged in as {}#{}", ready.user.name, ready.user.discriminator
                );
            }

            info!("Shard {shard_id} is ready");
        }
        Event::Resumed => info!("Shard {shard_id} is resumed"),
        _ => {}
    }

    Ok(())
}
