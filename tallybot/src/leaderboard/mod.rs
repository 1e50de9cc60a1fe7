//! Paginated lists with prev / page-jump / next controls.
//!
//! Every rendered list gets its own session which is owned by a
//! spawned driver task. Component and modal interactions reach that task
//! through the [`Leaderboards`] registry, keyed by the session id that is part
//! of every control's custom id.

use std::time::Duration;

use tallybot_util::{AuthorBuilder, FooterBuilder};
use time::OffsetDateTime;
use twilight_model::channel::message::embed::EmbedField;

pub use self::{
    builder::Leaderboard,
    discord::{InteractionResponder, LeaderboardOrigin},
    driver::{Activation, ActivationResponder},
    registry::Leaderboards,
};

mod builder;
mod discord;
mod driver;
mod registry;
mod render;
mod session;

pub const DEFAULT_PER_PAGE: usize = 5;

/// Inactivity after which a session expires.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// How long the page-jump prompt waits for a submission.
pub const JUMP_TIMEOUT: Duration = Duration::from_secs(15);

/// Optional per-page overrides of the rendered embed.
#[derive(Clone, Debug, Default)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub color: Option<u32>,
    /// Only used if it's an absolute http(s) url
    pub thumbnail: Option<String>,
    /// Appended below the listing, truncated to fit
    pub description: Option<String>,
    pub author: Option<AuthorBuilder>,
    pub timestamp: Option<OffsetDateTime>,
    pub fields: Vec<EmbedField>,
    pub footer: Option<FooterBuilder>,
}
