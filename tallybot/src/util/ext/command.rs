use eyre::{Result, WrapErr};
use futures::future::BoxFuture;
use tallybot_util::{constants::RED, EmbedBuilder, MessageBuilder};
use twilight_model::{
    channel::message::MessageFlags,
    http::interaction::{InteractionResponse, InteractionResponseData, InteractionResponseType},
};

use crate::{
    core::Context,
    util::interaction::{interaction_bucket, InteractionCommand},
};

pub trait InteractionCommandExt {
    /// Respond to the command with a new message.
    fn callback<'a>(
        &'a self,
        ctx: &'a Context,
        builder: MessageBuilder<'a>,
        ephemeral: bool,
    ) -> BoxFuture<'a, Result<()>>;

    /// Respond with a red embed that only the author can see.
    fn error_callback<'a>(
        &'a self,
        ctx: &'a Context,
        content: impl Into<String>,
    ) -> BoxFuture<'a, Result<()>>;
}

impl InteractionCommandExt for InteractionCommand {
    fn callback<'a>(
        &'a self,
        ctx: &'a Context,
        builder: MessageBuilder<'a>,
        ephemeral: bool,
    ) -> BoxFuture<'a, Result<()>> {
        let data = InteractionResponseData {
            components: builder.components,
            embeds: Some(builder.embeds),
            content: builder.content.map(String::from),
            flags: ephemeral.then_some(MessageFlags::EPHEMERAL),
            ..Default::default()
        };

        let response = InteractionResponse {
            kind: InteractionResponseType::ChannelMessageWithSource,
            data: Some(data),
        };

        Box::pin(async move {
            let client = ctx.interaction();
            let req = client.create_response(self.id, &self.token, &response);

            ctx.send(&interaction_bucket(self.id), req)
                .await
                .wrap_err("Failed to respond to command")?;

            Ok(())
        })
    }

    fn error_callback<'a>(
        &'a self,
        ctx: &'a Context,
        content: impl Into<String>,
    ) -> BoxFuture<'a, Result<()>> {
        let embed = EmbedBuilder::new().description(content).color(RED);

        self.callback(ctx, MessageBuilder::new().embed(embed), true)
    }
}
