pub use self::{
    authored::Authored, command::InteractionCommandExt, component::ComponentExt,
    message::{channel_bucket, MessageExt},
};

mod authored;
mod command;
mod component;
mod message;
