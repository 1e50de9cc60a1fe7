use std::sync::Arc;

use eyre::{ContextCompat, Result, WrapErr};
use futures::future::BoxFuture;
use parking_lot::Mutex;
use tallybot_util::{MessageBuilder, ModalBuilder};
use twilight_model::{
    channel::{message::MessageFlags, Message},
    http::interaction::{InteractionResponse, InteractionResponseData, InteractionResponseType},
    id::{
        marker::{ChannelMarker, InteractionMarker, MessageMarker, UserMarker},
        Id,
    },
};

use super::driver::{ActivationResponder, LeaderboardOutput};
use crate::{
    core::Context,
    util::{
        interaction::{interaction_bucket, InteractionCommand},
        Authored, MessageExt,
    },
};

/// What the leaderboard responds to.
pub enum LeaderboardOrigin {
    Message {
        channel: Id<ChannelMarker>,
        msg: Id<MessageMarker>,
        author: Id<UserMarker>,
    },
    Interaction {
        id: Id<InteractionMarker>,
        token: String,
        author: Id<UserMarker>,
    },
}

impl LeaderboardOrigin {
    /// The user that may press the controls.
    pub fn owner(&self) -> Id<UserMarker> {
        match self {
            Self::Message { author, .. } | Self::Interaction { author, .. } => *author,
        }
    }
}

impl From<&Message> for LeaderboardOrigin {
    fn from(msg: &Message) -> Self {
        Self::Message {
            channel: msg.channel_id,
            msg: msg.id,
            author: msg.author.id,
        }
    }
}

impl TryFrom<&InteractionCommand> for LeaderboardOrigin {
    type Error = eyre::Report;

    fn try_from(command: &InteractionCommand) -> Result<Self> {
        Ok(Self::Interaction {
            id: command.id,
            token: command.token.clone(),
            author: command.user_id()?,
        })
    }
}

pub(super) struct DiscordOutput {
    ctx: Arc<Context>,
    origin: LeaderboardOrigin,
    /// Set once the reply to a message origin was sent
    reply: Mutex<Option<Id<MessageMarker>>>,
}

impl DiscordOutput {
    pub(super) fn new(ctx: Arc<Context>, origin: LeaderboardOrigin) -> Self {
        Self {
            ctx,
            origin,
            reply: Mutex::new(None),
        }
    }
}

impl LeaderboardOutput for DiscordOutput {
    fn respond(&self, page: MessageBuilder<'static>, ephemeral: bool) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            match self.origin {
                LeaderboardOrigin::Message { channel, msg, .. } => {
                    let reply = (msg, channel).reply(&self.ctx, page).await?;
                    *self.reply.lock() = Some(reply.id);
                }
                LeaderboardOrigin::Interaction { id, ref token, .. } => {
                    let data = InteractionResponseData {
                        content: page.content.map(String::from),
                        embeds: Some(page.embeds),
                        components: page.components,
                        flags: ephemeral.then_some(MessageFlags::EPHEMERAL),
                        ..Default::default()
                    };

                    let response = InteractionResponse {
                        kind: InteractionResponseType::ChannelMessageWithSource,
                        data: Some(data),
                    };

                    respond(&self.ctx, id, token, response).await?;
                }
            }

            Ok(())
        })
    }

    fn edit(&self, page: MessageBuilder<'static>) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            match self.origin {
                LeaderboardOrigin::Message { channel, .. } => {
                    let reply = *self.reply.lock();
                    let reply = reply.wrap_err("Missing leaderboard reply")?;
                    (reply, channel).update(&self.ctx, page).await?;
                }
                LeaderboardOrigin::Interaction { id, ref token, .. } => {
                    let client = self.ctx.interaction();

                    let req = client
                        .update_response(token)
                        .embeds(Some(page.embeds.as_slice()))?
                        .components(page.components.as_deref())?;

                    self.ctx
                        .send(&interaction_bucket(id), req)
                        .await
                        .wrap_err("Failed to update interaction response")?;
                }
            }

            Ok(())
        })
    }
}

/// Responds to a single component or modal interaction.
pub struct InteractionResponder {
    ctx: Arc<Context>,
    id: Id<InteractionMarker>,
    token: String,
}

impl InteractionResponder {
    pub fn new(ctx: Arc<Context>, id: Id<InteractionMarker>, token: String) -> Self {
        Self { ctx, id, token }
    }

    async fn ephemeral_response(&self, content: String) -> Result<()> {
        let data = InteractionResponseData {
            content: Some(content),
            flags: Some(MessageFlags::EPHEMERAL),
            ..Default::default()
        };

        let response = InteractionResponse {
            kind: InteractionResponseType::ChannelMessageWithSource,
            data: Some(data),
        };

        respond(&self.ctx, self.id, &self.token, response).await
    }
}

impl ActivationResponder for InteractionResponder {
    fn defer_update(&self) -> BoxFuture<'_, Result<()>> {
        let response = InteractionResponse {
            kind: InteractionResponseType::DeferredUpdateMessage,
            data: None,
        };

        Box::pin(respond(&self.ctx, self.id, &self.token, response))
    }

    fn ephemeral(&self, content: String) -> BoxFuture<'_, Result<()>> {
        Box::pin(self.ephemeral_response(content))
    }

    fn modal(&self, modal: ModalBuilder) -> BoxFuture<'_, Result<()>> {
        let response = InteractionResponse {
            kind: InteractionResponseType::Modal,
            data: Some(modal.build()),
        };

        Box::pin(respond(&self.ctx, self.id, &self.token, response))
    }

    fn follow_up(&self, content: String) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            let client = self.ctx.interaction();

            let req = client
                .create_followup(&self.token)
                .content(&content)?
                .flags(MessageFlags::EPHEMERAL);

            self.ctx
                .send(&interaction_bucket(self.id), req)
                .await
                .wrap_err("Failed to create follow-up")?;

            Ok(())
        })
    }
}

async fn respond(
    ctx: &Context,
    id: Id<InteractionMarker>,
    token: &str,
    response: InteractionResponse,
) -> Result<()> {
    let client = ctx.interaction();
    let req = client.create_response(id, token, &response);

    ctx.send(&interaction_bucket(id), req)
        .await
        .wrap_err("Failed to create interaction response")?;

    Ok(())
}
