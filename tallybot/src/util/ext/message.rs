use eyre::{Result, WrapErr};
use futures::future::BoxFuture;
use tallybot_util::{constants::RED, EmbedBuilder, MessageBuilder};
use twilight_model::{
    channel::Message,
    id::{
        marker::{ChannelMarker, MessageMarker},
        Id,
    },
};

use crate::core::Context;

pub trait MessageExt {
    /// Reply to the message.
    fn reply<'a>(
        &'a self,
        ctx: &'a Context,
        builder: MessageBuilder<'a>,
    ) -> BoxFuture<'a, Result<Message>>;

    /// Edit the message, which must have been sent by the bot.
    fn update<'a>(
        &'a self,
        ctx: &'a Context,
        builder: MessageBuilder<'a>,
    ) -> BoxFuture<'a, Result<Message>>;

    /// Reply with a red embed.
    fn error<'a>(
        &'a self,
        ctx: &'a Context,
        content: impl Into<String>,
    ) -> BoxFuture<'a, Result<Message>>;
}

impl MessageExt for (Id<MessageMarker>, Id<ChannelMarker>) {
    fn reply<'a>(
        &'a self,
        ctx: &'a Context,
        builder: MessageBuilder<'a>,
    ) -> BoxFuture<'a, Result<Message>> {
        Box::pin(async move {
            let (msg, channel) = *self;

            let mut req = ctx
                .http
                .create_message(channel)
                .reply(msg)
                .embeds(&builder.embeds)?;

            if let Some(ref content) = builder.content {
                req = req.content(content)?;
            }

            if let Some(ref components) = builder.components {
                req = req.components(components)?;
            }

            ctx.send(&channel_bucket(channel), req)
                .await
                .wrap_err("Failed to create message")?
                .model()
                .await
                .wrap_err("Failed to deserialize message")
        })
    }

    fn update<'a>(
        &'a self,
        ctx: &'a Context,
        builder: MessageBuilder<'a>,
    ) -> BoxFuture<'a, Result<Message>> {
        Box::pin(async move {
            let (msg, channel) = *self;

            let req = ctx
                .http
                .update_message(channel, msg)
                .content(builder.content.as_deref())?
                .embeds(Some(builder.embeds.as_slice()))?
                .components(builder.components.as_deref())?;

            ctx.send(&channel_bucket(channel), req)
                .await
                .wrap_err("Failed to update message")?
                .model()
                .await
                .wrap_err("Failed to deserialize message")
        })
    }

    fn error<'a>(
        &'a self,
        ctx: &'a Context,
        content: impl Into<String>,
    ) -> BoxFuture<'a, Result<Message>> {
        let embed = EmbedBuilder::new().description(content).color(RED);

        self.reply(ctx, MessageBuilder::new().embed(embed))
    }
}

impl MessageExt for Message {
    fn reply<'a>(
        &'a self,
        ctx: &'a Context,
        builder: MessageBuilder<'a>,
    ) -> BoxFuture<'a, Result<Message>> {
        let ids = (self.id, self.channel_id);

        Box::pin(async move { ids.reply(ctx, builder).await })
    }

    fn update<'a>(
        &'a self,
        ctx: &'a Context,
        builder: MessageBuilder<'a>,
    ) -> BoxFuture<'a, Result<Message>> {
        let ids = (self.id, self.channel_id);

        Box::pin(async move { ids.update(ctx, builder).await })
    }

    fn error<'a>(
        &'a self,
        ctx: &'a Context,
        content: impl Into<String>,
    ) -> BoxFuture<'a, Result<Message>> {
        let ids = (self.id, self.channel_id);
        let content = content.into();

        Box::pin(async move { ids.error(ctx, content).await })
    }
}

/// All messages of a channel share a ratelimit.
pub fn channel_bucket(channel: Id<ChannelMarker>) -> String {
    format!("messages {channel}")
}
