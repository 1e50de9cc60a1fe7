use twilight_model::channel::message::embed::Embed;

use crate::constants::{
    BLUE, EMOJI_ERROR, EMOJI_INFO, EMOJI_SUCCESS, EMOJI_WARNING, GREEN, RED, YELLOW,
};

use super::EmbedBuilder;

/// One box per severity, shown for commands that are currently disabled.
pub fn status_embeds() -> Vec<Embed> {
    [
        (RED, EMOJI_ERROR, "This is an error"),
        (YELLOW, EMOJI_WARNING, "This is a warning"),
        (GREEN, EMOJI_SUCCESS, "This is a success"),
        (BLUE, EMOJI_INFO, "This is an info"),
    ]
    .into_iter()
    .map(|(color, emoji, text)| {
        EmbedBuilder::new()
            .color(color)
            .description(format!("{emoji} {text}"))
            .build()
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_boxes_in_order() {
        let embeds = status_embeds();

        let colors: Vec<_> = embeds.iter().filter_map(|embed| embed.color).collect();
        assert_eq!(colors, [RED, YELLOW, GREEN, BLUE]);

        assert_eq!(
            embeds[0].description.as_deref(),
            Some(":x: This is an error")
        );
    }
}
