pub use self::{
    author::AuthorBuilder, embed::EmbedBuilder, footer::FooterBuilder, message::MessageBuilder,
    status::status_embeds,
};

mod author;
mod embed;
mod footer;
mod message;
mod status;

pub mod modal;
