use std::borrow::Cow;

use twilight_model::channel::message::{embed::Embed, Component};

use super::EmbedBuilder;

#[derive(Clone, Debug, Default)]
pub struct MessageBuilder<'c> {
    pub content: Option<Cow<'c, str>>,
    pub embeds: Vec<Embed>,
    pub components: Option<Vec<Component>>,
}

impl<'c> MessageBuilder<'c> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(mut self, content: impl Into<Cow<'c, str>>) -> Self {
        self.content = Some(content.into());

        self
    }

    /// Replaces all previous embeds with the given one.
    pub fn embed(mut self, embed: impl IntoEmbed) -> Self {
        self.embeds = vec![embed.into_embed()];

        self
    }

    pub fn embeds(mut self, embeds: Vec<Embed>) -> Self {
        self.embeds = embeds;

        self
    }

    pub fn components(mut self, components: Vec<Component>) -> Self {
        self.components = Some(components);

        self
    }

    pub fn into_owned(self) -> MessageBuilder<'static> {
        MessageBuilder {
            content: self.content.map(|content| Cow::Owned(content.into_owned())),
            embeds: self.embeds,
            components: self.components,
        }
    }
}

impl From<Embed> for MessageBuilder<'_> {
    #[inline]
    fn from(embed: Embed) -> Self {
        Self {
            embeds: vec![embed],
            ..Default::default()
        }
    }
}

pub trait IntoEmbed {
    fn into_embed(self) -> Embed;
}

impl IntoEmbed for Embed {
    #[inline]
    fn into_embed(self) -> Embed {
        self
    }
}

impl IntoEmbed for EmbedBuilder {
    #[inline]
    fn into_embed(self) -> Embed {
        self.build()
    }
}

impl IntoEmbed for String {
    #[inline]
    fn into_embed(self) -> Embed {
        EmbedBuilder::new().description(self).build()
    }
}

impl IntoEmbed for &str {
    #[inline]
    fn into_embed(self) -> Embed {
        EmbedBuilder::new().description(self).build()
    }
}
