use eyre::{Result, WrapErr};
use futures::future::BoxFuture;
use tallybot_util::MessageBuilder;
use twilight_model::http::interaction::{
    InteractionResponse, InteractionResponseData, InteractionResponseType,
};

use crate::{
    core::Context,
    util::interaction::{interaction_bucket, InteractionComponent},
};

pub trait ComponentExt {
    /// Acknowledge the component and respond immediately by updating the message.
    fn callback<'a>(
        &'a self,
        ctx: &'a Context,
        builder: MessageBuilder<'a>,
    ) -> BoxFuture<'a, Result<()>>;
}

impl ComponentExt for InteractionComponent {
    fn callback<'a>(
        &'a self,
        ctx: &'a Context,
        builder: MessageBuilder<'a>,
    ) -> BoxFuture<'a, Result<()>> {
        let data = InteractionResponseData {
            components: builder.components,
            embeds: (!builder.embeds.is_empty()).then_some(builder.embeds),
            content: builder.content.map(String::from),
            ..Default::default()
        };

        let response = InteractionResponse {
            kind: InteractionResponseType::UpdateMessage,
            data: Some(data),
        };

        Box::pin(async move {
            let client = ctx.interaction();
            let req = client.create_response(self.id, &self.token, &response);

            ctx.send(&interaction_bucket(self.id), req)
                .await
                .wrap_err("Failed to update message through component")?;

            Ok(())
        })
    }
}
