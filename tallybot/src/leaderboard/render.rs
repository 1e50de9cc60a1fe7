use tallybot_util::{
    constants::{DARK_BUT_NOT_BLACK, DESCRIPTION_SIZE, NO_DATA},
    EmbedBuilder, MessageBuilder, ModalBuilder, StrExt,
};
use twilight_model::channel::message::{
    component::{ActionRow, Button, ButtonStyle},
    embed::Embed,
    Component,
};

use super::session::{Control, LeaderboardSession, SessionState};

pub fn no_data(title: &str) -> MessageBuilder<'static> {
    let embed = EmbedBuilder::new()
        .title(title)
        .description(NO_DATA)
        .color(DARK_BUT_NOT_BLACK);

    MessageBuilder::new().embed(embed)
}

impl LeaderboardSession {
    /// The current page, or the expired view if the session has ended.
    pub fn page(&self) -> MessageBuilder<'static> {
        let components = if self.state() == SessionState::Expired {
            self.expired_components()
        } else {
            self.components()
        };

        MessageBuilder::new()
            .embed(self.page_embed())
            .components(components)
    }

    pub fn page_embed(&self) -> Embed {
        let listing = self.page_items().join("\n").ellipsis(DESCRIPTION_SIZE);

        let mut embed = EmbedBuilder::new()
            .title(self.title.as_str())
            .color(DARK_BUT_NOT_BLACK);

        let Some(data) = self.page_metadata() else {
            return embed.description(listing).build();
        };

        if let Some(ref thumbnail) = data.thumbnail {
            embed = embed.thumbnail(thumbnail.as_str());
        }

        if let Some(ref title) = data.title {
            embed = embed.title(title.as_str());
        }

        if let Some(color) = data.color {
            embed = embed.color(color);
        }

        let space = DESCRIPTION_SIZE.saturating_sub(listing.char_len() + 1);

        let description = match data.description {
            // No room left below a full listing
            Some(ref extra) if space > 0 => format!("{listing}\n{}", extra.ellipsis(space)),
            Some(_) | None => listing,
        };

        embed = embed.description(description);

        if let Some(author) = data.author.as_ref().filter(|author| !author.name.is_empty()) {
            embed = embed.author(author.clone());
        }

        if let Some(timestamp) = data.timestamp {
            embed = embed.timestamp(timestamp);
        }

        if !data.fields.is_empty() {
            embed = embed.fields(data.fields.clone());
        }

        if let Some(footer) = data.footer.as_ref().filter(|footer| !footer.text.is_empty()) {
            embed = embed.footer(footer.clone());
        }

        embed.build()
    }

    pub fn components(&self) -> Vec<Component> {
        let indicator = format!("{}/{}", self.current_page(), self.total_pages());

        let row = ActionRow {
            components: vec![
                self.button(Control::Back, "Prev", !self.has_prev()),
                self.button(Control::PageInfo, indicator, self.total_pages() == 1),
                self.button(Control::Forward, "Next", !self.has_next()),
            ],
        };

        let mut components = vec![Component::ActionRow(row)];

        if let Some(extras) = self.page_extras() {
            components.push(Component::ActionRow(extras.clone()));
        }

        components
    }

    pub fn expired_components(&self) -> Vec<Component> {
        let row = ActionRow {
            components: vec![self.button(Control::Expired, "Expired", true)],
        };

        vec![Component::ActionRow(row)]
    }

    pub fn jump_prompt(&self) -> ModalBuilder {
        ModalBuilder::new(self.custom_id(Control::PageModal), "Page Indexer")
            .input(self.input_id(), "Enter page number")
            .placeholder(format!("1 - {}", self.total_pages()))
            .min_len(1)
            .max_len(6)
    }

    fn button(&self, control: Control, label: impl Into<String>, disabled: bool) -> Component {
        Component::Button(Button {
            custom_id: Some(self.custom_id(control)),
            disabled,
            emoji: None,
            label: Some(label.into()),
            style: ButtonStyle::Secondary,
            url: None,
        })
    }
}
