use tokio::time::Instant;
use twilight_model::{
    channel::message::component::ActionRow,
    id::{marker::UserMarker, Id},
};

use tallybot_util::numbers::{page_number, total_pages};

use super::{PageMetadata, JUMP_TIMEOUT};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    Active,
    PageJumpPending { deadline: Instant },
    Expired,
}

/// Outcome of feeding an event into a [`LeaderboardSession`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Not meant for this session or the session already expired
    Ignored,
    /// Someone other than the owner pressed a control
    NotOwner,
    PageChanged,
    OpenJumpPrompt,
    JumpPromptExpired,
    InvalidPage { total_pages: usize },
    /// Page number submitted while no prompt was open
    StalePrompt,
    Expired,
}

impl Transition {
    /// Whether the transition counts as activity for the idle timeout.
    pub fn refreshes_idle(self) -> bool {
        !matches!(self, Self::Ignored | Self::Expired)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Control {
    Back,
    PageInfo,
    Forward,
    PageModal,
    Expired,
}

impl Control {
    fn suffix(self) -> &'static str {
        match self {
            Self::Back => "back_button",
            Self::PageInfo => "page_info",
            Self::Forward => "forward_button",
            Self::PageModal => "page_modal",
            Self::Expired => "expired",
        }
    }

    fn parse(session_id: &str, custom_id: &str) -> Option<Self> {
        let suffix = custom_id
            .strip_prefix('_')?
            .strip_prefix(session_id)?
            .strip_prefix('_')?;

        match suffix {
            "back_button" => Some(Self::Back),
            "page_info" => Some(Self::PageInfo),
            "forward_button" => Some(Self::Forward),
            "page_modal" => Some(Self::PageModal),
            _ => None,
        }
    }
}

/// Extracts the session id out of a control's custom id.
pub fn session_id_of(custom_id: &str) -> Option<&str> {
    let (id, _) = custom_id.strip_prefix('_')?.split_once('_')?;

    (!id.is_empty()).then_some(id)
}

/// State of a single paginated list.
///
/// The session itself does no IO; the driver task feeds it activations and
/// timeouts and performs the effects described by the returned
/// [`Transition`].
pub struct LeaderboardSession {
    id: Box<str>,
    pub(super) title: String,
    items: Box<[String]>,
    per_page: usize,
    total_pages: usize,
    offset: usize,
    owner: Id<UserMarker>,
    metadata: Vec<PageMetadata>,
    extras: Vec<Option<ActionRow>>,
    state: SessionState,
}

impl LeaderboardSession {
    /// Returns `None` if there are no items to show.
    pub fn new(
        id: Box<str>,
        title: String,
        items: Vec<String>,
        per_page: usize,
        owner: Id<UserMarker>,
        metadata: Vec<PageMetadata>,
        extras: Vec<Option<ActionRow>>,
    ) -> Option<Self> {
        if items.is_empty() {
            return None;
        }

        let per_page = per_page.max(1);

        Some(Self {
            id,
            title,
            total_pages: total_pages(items.len(), per_page),
            items: items.into_boxed_slice(),
            per_page,
            offset: 0,
            owner,
            metadata,
            extras,
            state: SessionState::Active,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// One-based
    pub fn current_page(&self) -> usize {
        page_number(self.offset, self.per_page)
    }

    pub fn custom_id(&self, control: Control) -> String {
        format!("_{}_{}", self.id, control.suffix())
    }

    pub fn input_id(&self) -> String {
        format!("{}_page_number", self.id)
    }

    pub fn page_items(&self) -> &[String] {
        let end = (self.offset + self.per_page).min(self.items.len());

        &self.items[self.offset..end]
    }

    pub fn page_metadata(&self) -> Option<&PageMetadata> {
        self.metadata.get(self.current_page() - 1)
    }

    pub fn page_extras(&self) -> Option<&ActionRow> {
        self.extras.get(self.current_page() - 1)?.as_ref()
    }

    pub fn has_prev(&self) -> bool {
        self.offset > 0
    }

    pub fn has_next(&self) -> bool {
        self.offset + self.per_page < self.items.len()
    }

    pub fn jump_deadline(&self) -> Option<Instant> {
        match self.state {
            SessionState::PageJumpPending { deadline } => Some(deadline),
            SessionState::Active | SessionState::Expired => None,
        }
    }

    /// Process a button press or modal submission.
    ///
    /// `input` is the submitted text of the page-jump prompt.
    pub fn submit(
        &mut self,
        custom_id: &str,
        user: Id<UserMarker>,
        input: Option<&str>,
        now: Instant,
    ) -> Transition {
        if self.state == SessionState::Expired {
            return Transition::Ignored;
        }

        let Some(control) = Control::parse(&self.id, custom_id) else {
            return Transition::Ignored;
        };

        if user != self.owner {
            return Transition::NotOwner;
        }

        match control {
            Control::Back => {
                self.offset = self.offset.saturating_sub(self.per_page);

                Transition::PageChanged
            }
            Control::Forward => {
                // Clamps to the last item rather than the last page's start
                self.offset = (self.offset + self.per_page).min(self.items.len() - 1);

                Transition::PageChanged
            }
            Control::PageInfo => {
                self.state = SessionState::PageJumpPending {
                    deadline: now + JUMP_TIMEOUT,
                };

                Transition::OpenJumpPrompt
            }
            Control::PageModal => {
                if self.jump_deadline().is_none() {
                    return Transition::StalePrompt;
                }

                self.state = SessionState::Active;

                match input.map(str::trim).and_then(|input| input.parse::<usize>().ok()) {
                    Some(page) if (1..=self.total_pages).contains(&page) => {
                        self.offset = (page - 1) * self.per_page;

                        Transition::PageChanged
                    }
                    _ => Transition::InvalidPage {
                        total_pages: self.total_pages,
                    },
                }
            }
            Control::Expired => Transition::Ignored,
        }
    }

    pub fn on_jump_timeout(&mut self, now: Instant) -> Transition {
        match self.state {
            SessionState::PageJumpPending { deadline } if deadline <= now => {
                self.state = SessionState::Active;

                Transition::JumpPromptExpired
            }
            _ => Transition::Ignored,
        }
    }

    pub fn on_idle_timeout(&mut self) -> Transition {
        if self.state == SessionState::Expired {
            return Transition::Ignored;
        }

        self.state = SessionState::Expired;

        Transition::Expired
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    const OWNER: Id<UserMarker> = Id::new(1);
    const STRANGER: Id<UserMarker> = Id::new(2);

    fn session(len: usize) -> LeaderboardSession {
        let items = (1..=len).map(|i| format!("item {i}")).collect();

        LeaderboardSession::new(
            Box::from("abc123"),
            "Title".to_owned(),
            items,
            5,
            OWNER,
            Vec::new(),
            Vec::new(),
        )
        .unwrap()
    }

    fn press(session: &mut LeaderboardSession, control: Control) -> Transition {
        let custom_id = session.custom_id(control);

        session.submit(&custom_id, OWNER, None, Instant::now())
    }

    fn submit_page(session: &mut LeaderboardSession, input: &str) -> Transition {
        let custom_id = session.custom_id(Control::PageModal);

        session.submit(&custom_id, OWNER, Some(input), Instant::now())
    }

    #[test]
    fn empty_items_create_no_session() {
        let session = LeaderboardSession::new(
            Box::from("abc123"),
            String::new(),
            Vec::new(),
            5,
            OWNER,
            Vec::new(),
            Vec::new(),
        );

        assert!(session.is_none());
    }

    #[test]
    fn initial_page() {
        let session = session(12);

        assert_eq!(session.total_pages(), 3);
        assert_eq!(session.current_page(), 1);
        assert_eq!(session.page_items().len(), 5);
        assert!(!session.has_prev());
        assert!(session.has_next());
    }

    #[test]
    fn single_page_has_no_navigation() {
        let session = session(3);

        assert_eq!(session.total_pages(), 1);
        assert!(!session.has_prev());
        assert!(!session.has_next());
    }

    #[test]
    fn navigating_through_pages() {
        let mut session = session(12);

        assert_eq!(press(&mut session, Control::Forward), Transition::PageChanged);
        assert_eq!(session.offset(), 5);
        assert_eq!(session.page_items()[0], "item 6");

        assert_eq!(press(&mut session, Control::Forward), Transition::PageChanged);
        assert_eq!(session.offset(), 10);
        assert_eq!(session.page_items(), ["item 11", "item 12"]);
        assert!(!session.has_next());

        assert_eq!(press(&mut session, Control::Back), Transition::PageChanged);
        assert_eq!(session.offset(), 5);

        press(&mut session, Control::Back);
        press(&mut session, Control::Back);
        assert_eq!(session.offset(), 0);
    }

    #[test]
    fn forward_past_end_clamps_to_last_item() {
        let mut session = session(12);
        session.offset = 10;

        assert_eq!(press(&mut session, Control::Forward), Transition::PageChanged);
        assert_eq!(session.offset(), 11);
        assert_eq!(session.current_page(), 3);
        assert_eq!(session.page_items(), ["item 12"]);
    }

    #[test]
    fn forward_walk_ends_on_last_item() {
        let mut session = session(23);
        let mut offsets = Vec::new();

        for _ in 0..5 {
            assert_eq!(press(&mut session, Control::Forward), Transition::PageChanged);
            offsets.push(session.offset());
        }

        assert_eq!(offsets, [5, 10, 15, 20, 22]);
        assert!(!session.has_next());
        assert_eq!(session.current_page(), 5);
        assert_eq!(session.page_items(), ["item 23"]);
    }

    #[test]
    fn stranger_is_rejected() {
        let mut session = session(12);
        let custom_id = session.custom_id(Control::Forward);

        let transition = session.submit(&custom_id, STRANGER, None, Instant::now());

        assert_eq!(transition, Transition::NotOwner);
        assert!(transition.refreshes_idle());
        assert_eq!(session.offset(), 0);
    }

    #[test]
    fn foreign_ids_are_ignored() {
        let mut session = session(12);

        for custom_id in ["_zzz999_forward_button", "abc123_forward_button", "_abc123_nope"] {
            let transition = session.submit(custom_id, OWNER, None, Instant::now());

            assert_eq!(transition, Transition::Ignored);
            assert!(!transition.refreshes_idle());
        }

        assert_eq!(session.offset(), 0);
    }

    #[test]
    fn jump_to_page() {
        let mut session = session(12);

        assert_eq!(press(&mut session, Control::PageInfo), Transition::OpenJumpPrompt);
        assert!(session.jump_deadline().is_some());

        assert_eq!(submit_page(&mut session, " 3 "), Transition::PageChanged);
        assert_eq!(session.offset(), 10);
        assert_eq!(session.state(), SessionState::Active);
    }

    #[test]
    fn jump_rejects_invalid_pages() {
        let mut session = session(12);

        for input in ["0", "4", "abc", "", "-1"] {
            press(&mut session, Control::PageInfo);

            assert_eq!(
                submit_page(&mut session, input),
                Transition::InvalidPage { total_pages: 3 }
            );
            assert_eq!(session.offset(), 0);
            assert_eq!(session.state(), SessionState::Active);
        }
    }

    #[test]
    fn submission_without_prompt_is_stale() {
        let mut session = session(12);

        assert_eq!(submit_page(&mut session, "2"), Transition::StalePrompt);
        assert_eq!(session.offset(), 0);
    }

    #[test]
    fn jump_prompt_times_out() {
        let mut session = session(12);
        let start = Instant::now();
        let custom_id = session.custom_id(Control::PageInfo);
        session.submit(&custom_id, OWNER, None, start);

        let early = start + JUMP_TIMEOUT - Duration::from_millis(1);
        assert_eq!(session.on_jump_timeout(early), Transition::Ignored);

        assert_eq!(
            session.on_jump_timeout(start + JUMP_TIMEOUT),
            Transition::JumpPromptExpired
        );
        assert_eq!(session.state(), SessionState::Active);
        assert_eq!(submit_page(&mut session, "2"), Transition::StalePrompt);
    }

    #[test]
    fn navigation_while_prompt_is_open() {
        let mut session = session(12);
        press(&mut session, Control::PageInfo);

        assert_eq!(press(&mut session, Control::Forward), Transition::PageChanged);
        assert_eq!(session.offset(), 5);
        assert!(session.jump_deadline().is_some());

        assert_eq!(submit_page(&mut session, "1"), Transition::PageChanged);
        assert_eq!(session.offset(), 0);
    }

    #[test]
    fn expired_session_ignores_everything() {
        let mut session = session(12);

        assert_eq!(session.on_idle_timeout(), Transition::Expired);
        assert_eq!(session.on_idle_timeout(), Transition::Ignored);
        assert_eq!(press(&mut session, Control::Forward), Transition::Ignored);
        assert_eq!(session.offset(), 0);
    }

    #[test]
    fn session_id_extraction() {
        assert_eq!(session_id_of("_abc123_back_button"), Some("abc123"));
        assert_eq!(session_id_of("_abc123_page_modal"), Some("abc123"));
        assert_eq!(session_id_of("errorhandler_read"), None);
        assert_eq!(session_id_of("__back"), None);
    }

    #[test]
    fn metadata_and_extras_follow_pages() {
        let metadata = vec![
            PageMetadata {
                title: Some("first".to_owned()),
                ..Default::default()
            },
            PageMetadata {
                title: Some("second".to_owned()),
                ..Default::default()
            },
        ];

        let extras = vec![None, Some(ActionRow { components: Vec::new() })];
        let items = (1..=12).map(|i| i.to_string()).collect();

        let mut session = LeaderboardSession::new(
            Box::from("abc123"),
            String::new(),
            items,
            5,
            OWNER,
            metadata,
            extras,
        )
        .unwrap();

        assert_eq!(session.page_metadata().and_then(|m| m.title.as_deref()), Some("first"));
        assert!(session.page_extras().is_none());

        press(&mut session, Control::Forward);
        assert_eq!(session.page_metadata().and_then(|m| m.title.as_deref()), Some("second"));
        assert!(session.page_extras().is_some());

        press(&mut session, Control::Forward);
        assert!(session.page_metadata().is_none());
        assert!(session.page_extras().is_none());
    }
}
