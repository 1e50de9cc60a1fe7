use twilight_model::channel::message::embed::EmbedFooter;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FooterBuilder {
    pub icon_url: Option<String>,
    pub text: String,
}

impl FooterBuilder {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            icon_url: None,
        }
    }

    pub fn icon_url(mut self, icon_url: impl Into<String>) -> Self {
        self.icon_url = Some(icon_url.into());

        self
    }

    pub fn build(self) -> EmbedFooter {
        EmbedFooter {
            icon_url: self.icon_url,
            proxy_icon_url: None,
            text: self.text,
        }
    }
}

impl From<FooterBuilder> for EmbedFooter {
    #[inline]
    fn from(footer: FooterBuilder) -> Self {
        footer.build()
    }
}

impl From<&str> for FooterBuilder {
    #[inline]
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for FooterBuilder {
    #[inline]
    fn from(text: String) -> Self {
        Self::new(text)
    }
}
