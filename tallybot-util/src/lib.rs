mod builder;
mod ext;

pub mod constants;
pub mod datetime;
pub mod numbers;

pub use self::{
    builder::{
        modal::ModalBuilder, status_embeds, AuthorBuilder, EmbedBuilder, FooterBuilder,
        MessageBuilder,
    },
    ext::StrExt,
};
