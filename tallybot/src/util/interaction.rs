use twilight_model::{
    application::interaction::{
        application_command::CommandData, message_component::MessageComponentInteractionData,
        modal::ModalInteractionData,
    },
    channel::Message,
    guild::{PartialMember, Permissions},
    id::{
        marker::{ChannelMarker, GuildMarker, InteractionMarker},
        Id,
    },
    user::User,
};

#[derive(Debug)]
pub struct InteractionCommand {
    pub permissions: Option<Permissions>,
    pub channel_id: Id<ChannelMarker>,
    pub data: Box<CommandData>,
    pub guild_id: Option<Id<GuildMarker>>,
    pub id: Id<InteractionMarker>,
    pub member: Option<PartialMember>,
    pub token: String,
    pub user: Option<User>,
}

#[derive(Debug)]
pub struct InteractionComponent {
    pub permissions: Option<Permissions>,
    pub channel_id: Id<ChannelMarker>,
    pub data: MessageComponentInteractionData,
    pub guild_id: Option<Id<GuildMarker>>,
    pub id: Id<InteractionMarker>,
    pub member: Option<PartialMember>,
    pub message: Message,
    pub token: String,
    pub user: Option<User>,
}

#[derive(Debug)]
pub struct InteractionModal {
    pub permissions: Option<Permissions>,
    pub channel_id: Id<ChannelMarker>,
    pub data: ModalInteractionData,
    pub guild_id: Option<Id<GuildMarker>>,
    pub id: Id<InteractionMarker>,
    pub member: Option<PartialMember>,
    pub token: String,
    pub user: Option<User>,
}

impl InteractionModal {
    /// Value of the first text input that has one.
    pub fn input_value(&self) -> Option<&str> {
        self.data
            .components
            .iter()
            .flat_map(|row| row.components.iter())
            .find_map(|component| component.value.as_deref())
    }
}

/// Responses to the same interaction share a ratelimit.
pub fn interaction_bucket(id: Id<InteractionMarker>) -> String {
    format!("interaction {id}")
}
