use eyre::{Report, Result, WrapErr};
use tallybot_util::{
    constants::{DESCRIPTION_SIZE, RED},
    AuthorBuilder, EmbedBuilder, StrExt,
};
use twilight_model::{
    channel::message::{
        component::{ActionRow, Button, ButtonStyle},
        embed::Embed,
        Component,
    },
    id::{marker::ChannelMarker, Id},
};

use crate::{
    core::{BotConfig, Context},
    util::channel_bucket,
};

/// Custom id of the button that marks an error report as handled.
pub const ERROR_REPORT_READ: &str = "errorhandler_read";

const TITLE_SIZE: usize = 256;

impl Context {
    /// Log the error and forward it to the error channel if one is configured.
    pub async fn report_error(&self, err: &Report, reason: Option<&str>) {
        error!(?err, reason, "Reporting error");

        let Some(channel) = BotConfig::get().error_channel else {
            return;
        };

        if let Err(err) = self.send_error_report(channel, err, reason).await {
            warn!(?err, "Failed to send error report");
        }
    }

    async fn send_error_report(
        &self,
        channel: Id<ChannelMarker>,
        err: &Report,
        reason: Option<&str>,
    ) -> Result<()> {
        let content = format!("<@{}>", BotConfig::get().owner);
        let embeds = [error_embed(err, reason)];
        let components = [mark_as_done()];

        let req = self
            .http
            .create_message(channel)
            .content(&content)?
            .embeds(&embeds)?
            .components(&components)?;

        self.send(&channel_bucket(channel), req)
            .await
            .wrap_err("Failed to create message")?;

        Ok(())
    }
}

fn error_embed(err: &Report, reason: Option<&str>) -> Embed {
    let title = match reason {
        Some(reason) => reason.ellipsis(TITLE_SIZE),
        None => err.to_string().ellipsis(TITLE_SIZE),
    };

    // Leave room for the code block
    let chain = format!("{err:?}").ellipsis(DESCRIPTION_SIZE - 8);

    EmbedBuilder::new()
        .author(AuthorBuilder::new("An error occurred"))
        .title(title)
        .description(format!("```\n{chain}\n```"))
        .color(RED)
        .build()
}

fn mark_as_done() -> Component {
    let button = Button {
        custom_id: Some(ERROR_REPORT_READ.to_owned()),
        disabled: false,
        emoji: None,
        label: Some("Mark as done".to_owned()),
        style: ButtonStyle::Secondary,
        url: None,
    };

    Component::ActionRow(ActionRow {
        components: vec![Component::Button(button)],
    })
}
