pub use self::{
    config::BotConfig,
    context::{Context, ERROR_REPORT_READ},
    events::event_loop,
};

mod config;
mod context;
mod events;

pub mod buckets;
pub mod commands;
pub mod cooldowns;
pub mod logging;
