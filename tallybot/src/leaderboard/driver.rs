use eyre::Result;
use futures::future::BoxFuture;
use tallybot_util::{
    constants::{JUMP_PROMPT_EXPIRED, JUMP_PROMPT_STALE, NOT_OWNER},
    MessageBuilder, ModalBuilder,
};
use tokio::{
    sync::mpsc::UnboundedReceiver,
    time::{sleep, sleep_until, Instant},
};
use twilight_model::id::{marker::UserMarker, Id};

use super::{
    registry::Leaderboards,
    session::{LeaderboardSession, Transition},
    IDLE_TIMEOUT,
};

/// Where the list is shown.
pub trait LeaderboardOutput: Send + Sync + 'static {
    /// First response to the invoking command.
    fn respond(&self, page: MessageBuilder<'static>, ephemeral: bool) -> BoxFuture<'_, Result<()>>;

    /// Update the previous response in place.
    fn edit(&self, page: MessageBuilder<'static>) -> BoxFuture<'_, Result<()>>;
}

/// Responses to a single component press or modal submission.
pub trait ActivationResponder: Send + Sync + 'static {
    /// Acknowledge without changing anything yet.
    fn defer_update(&self) -> BoxFuture<'_, Result<()>>;

    /// Reply that only the acting user can see.
    fn ephemeral(&self, content: String) -> BoxFuture<'_, Result<()>>;

    fn modal(&self, modal: ModalBuilder) -> BoxFuture<'_, Result<()>>;

    /// Ephemeral message after the activation was already acknowledged.
    fn follow_up(&self, content: String) -> BoxFuture<'_, Result<()>>;
}

pub struct Activation {
    pub custom_id: String,
    pub user: Id<UserMarker>,
    /// Submitted text in case of a modal
    pub input: Option<String>,
    pub responder: Box<dyn ActivationResponder>,
}

/// Owns the session until it expires.
pub(super) async fn run<O: LeaderboardOutput>(
    mut session: LeaderboardSession,
    output: O,
    mut inbox: UnboundedReceiver<Activation>,
    registry: Leaderboards,
) {
    let idle = sleep(IDLE_TIMEOUT);
    tokio::pin!(idle);

    // Responder of the press that opened the page-jump prompt
    let mut prompt: Option<Box<dyn ActivationResponder>> = None;

    loop {
        let jump_deadline = session.jump_deadline();

        tokio::select! {
            activation = inbox.recv() => {
                let Some(activation) = activation else { break };

                let Activation { custom_id, user, input, responder } = activation;
                let transition = session.submit(&custom_id, user, input.as_deref(), Instant::now());

                if transition.refreshes_idle() {
                    idle.as_mut().reset(Instant::now() + IDLE_TIMEOUT);
                }

                handle(&session, &output, transition, responder, &mut prompt).await;
            }
            _ = sleep_until(jump_deadline.unwrap_or_else(Instant::now)), if jump_deadline.is_some() => {
                if session.on_jump_timeout(Instant::now()) == Transition::JumpPromptExpired {
                    idle.as_mut().reset(Instant::now() + IDLE_TIMEOUT);

                    if let Some(responder) = prompt.take() {
                        if let Err(err) = responder.follow_up(JUMP_PROMPT_EXPIRED.to_owned()).await {
                            warn!(?err, "Failed to notify about expired page prompt");
                        }
                    }
                }
            }
            _ = &mut idle => break,
        }
    }

    registry.remove(session.id());
    session.on_idle_timeout();
    acknowledge_pending(&mut inbox).await;

    // The message might be gone already
    if let Err(err) = output.edit(session.page()).await {
        debug!(?err, id = session.id(), "Failed to show expired leaderboard");
    }
}

/// Close the inbox and acknowledge whatever was still queued.
async fn acknowledge_pending(inbox: &mut UnboundedReceiver<Activation>) {
    inbox.close();

    while let Ok(activation) = inbox.try_recv() {
        if let Err(err) = activation.responder.defer_update().await {
            debug!(?err, "Failed to acknowledge activation of expired leaderboard");
        }
    }
}

async fn handle<O: LeaderboardOutput>(
    session: &LeaderboardSession,
    output: &O,
    transition: Transition,
    responder: Box<dyn ActivationResponder>,
    prompt: &mut Option<Box<dyn ActivationResponder>>,
) {
    let res = match transition {
        Transition::Ignored | Transition::Expired => responder.defer_update().await,
        Transition::JumpPromptExpired => Ok(()),
        Transition::NotOwner => responder.ephemeral(NOT_OWNER.to_owned()).await,
        Transition::PageChanged => {
            if let Err(err) = responder.defer_update().await {
                debug!(?err, "Failed to defer leaderboard activation");
            }

            // Modal submitted so the prompt is done
            if session.jump_deadline().is_none() {
                *prompt = None;
            }

            output.edit(session.page()).await
        }
        Transition::OpenJumpPrompt => match responder.modal(session.jump_prompt()).await {
            Ok(_) => {
                *prompt = Some(responder);

                Ok(())
            }
            Err(err) => Err(err),
        },
        Transition::InvalidPage { total_pages } => {
            *prompt = None;

            let content =
                format!("Invalid page number! Please choose a number between 1 and {total_pages}.");

            responder.ephemeral(content).await
        }
        Transition::StalePrompt => responder.ephemeral(JUMP_PROMPT_STALE.to_owned()).await,
    };

    if let Err(err) = res {
        warn!(?err, id = session.id(), ?transition, "Failed to handle leaderboard activation");
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use parking_lot::Mutex;
    use tokio::{task::JoinHandle, time::sleep};
    use twilight_model::channel::message::Component;

    use super::*;
    use crate::leaderboard::JUMP_TIMEOUT;

    const OWNER: Id<UserMarker> = Id::new(1);
    const STRANGER: Id<UserMarker> = Id::new(2);

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<String>>>);

    impl Recorder {
        fn push(&self, entry: String) -> BoxFuture<'static, Result<()>> {
            self.0.lock().push(entry);

            Box::pin(async { Ok(()) })
        }

        fn take(&self) -> Vec<String> {
            std::mem::take(&mut *self.0.lock())
        }
    }

    /// Button labels of the first row
    fn describe(page: &MessageBuilder<'_>) -> String {
        let Some(Component::ActionRow(row)) = page.components.as_ref().and_then(|c| c.first())
        else {
            return "no components".to_owned();
        };

        let labels: Vec<_> = row
            .components
            .iter()
            .filter_map(|component| match component {
                Component::Button(button) => button.label.as_deref(),
                _ => None,
            })
            .collect();

        labels.join(",")
    }

    struct MockOutput(Recorder);

    impl LeaderboardOutput for MockOutput {
        fn respond(&self, page: MessageBuilder<'static>, _: bool) -> BoxFuture<'_, Result<()>> {
            self.0.push(format!("respond {}", describe(&page)))
        }

        fn edit(&self, page: MessageBuilder<'static>) -> BoxFuture<'_, Result<()>> {
            self.0.push(format!("edit {}", describe(&page)))
        }
    }

    struct MockResponder(Recorder);

    impl ActivationResponder for MockResponder {
        fn defer_update(&self) -> BoxFuture<'_, Result<()>> {
            self.0.push("defer".to_owned())
        }

        fn ephemeral(&self, content: String) -> BoxFuture<'_, Result<()>> {
            self.0.push(format!("ephemeral {content}"))
        }

        fn modal(&self, modal: ModalBuilder) -> BoxFuture<'_, Result<()>> {
            self.0.push(format!("modal {}", modal.custom_id()))
        }

        fn follow_up(&self, content: String) -> BoxFuture<'_, Result<()>> {
            self.0.push(format!("follow_up {content}"))
        }
    }

    struct Harness {
        registry: Leaderboards,
        recorder: Recorder,
        id: Box<str>,
        handle: JoinHandle<()>,
    }

    impl Harness {
        fn new(len: usize) -> Self {
            let registry = Leaderboards::new();
            let (id, inbox) = registry.register();
            let items = (1..=len).map(|i| format!("{i}. entry")).collect();

            let session = LeaderboardSession::new(
                id.clone(),
                "Title".to_owned(),
                items,
                5,
                OWNER,
                Vec::new(),
                Vec::new(),
            )
            .unwrap();

            let recorder = Recorder::default();
            let output = MockOutput(recorder.clone());
            let handle = tokio::spawn(run(session, output, inbox, registry.clone()));

            Self {
                registry,
                recorder,
                id,
                handle,
            }
        }

        fn press(&self, suffix: &str, user: Id<UserMarker>, input: Option<&str>) {
            let activation = Activation {
                custom_id: format!("_{}_{suffix}", self.id),
                user,
                input: input.map(str::to_owned),
                responder: Box::new(MockResponder(self.recorder.clone())),
            };

            assert!(self.registry.dispatch(activation).is_ok());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn expires_after_inactivity() {
        let harness = Harness::new(12);

        harness.handle.await.unwrap();

        assert_eq!(harness.recorder.take(), ["edit Expired"]);
        assert_eq!(harness.registry.len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn navigation_and_foreign_presses() {
        let harness = Harness::new(12);

        harness.press("forward_button", OWNER, None);
        sleep(Duration::from_secs(50)).await;
        assert_eq!(harness.recorder.take(), ["defer", "edit Prev,2/3,Next"]);

        harness.press("forward_button", STRANGER, None);
        sleep(Duration::from_secs(30)).await;

        // Foreign presses count as activity
        assert_eq!(harness.registry.len(), 1);
        assert_eq!(
            harness.recorder.take(),
            [format!("ephemeral {NOT_OWNER}")]
        );

        harness.handle.await.unwrap();
        assert_eq!(harness.recorder.take(), ["edit Expired"]);
    }

    #[tokio::test(start_paused = true)]
    async fn jump_to_page() {
        let harness = Harness::new(12);
        let modal_id = format!("_{}_page_modal", harness.id);

        harness.press("page_info", OWNER, None);
        sleep(Duration::from_secs(1)).await;
        harness.press("page_modal", OWNER, Some("3"));
        sleep(JUMP_TIMEOUT * 2).await;

        assert_eq!(
            harness.recorder.take(),
            [format!("modal {modal_id}"), "defer".to_owned(), "edit Prev,3/3,Next".to_owned()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn jump_prompt_expires() {
        let harness = Harness::new(12);

        harness.press("page_info", OWNER, None);
        sleep(JUMP_TIMEOUT + Duration::from_secs(1)).await;
        harness.press("page_modal", OWNER, Some("2"));
        sleep(Duration::from_secs(1)).await;

        let log = harness.recorder.take();

        assert_eq!(log.len(), 3);
        assert_eq!(log[1], format!("follow_up {JUMP_PROMPT_EXPIRED}"));
        assert_eq!(log[2], format!("ephemeral {JUMP_PROMPT_STALE}"));
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_page_number() {
        let harness = Harness::new(12);

        harness.press("page_info", OWNER, None);
        harness.press("page_modal", OWNER, Some("7"));
        sleep(Duration::from_secs(1)).await;

        let log = harness.recorder.take();

        assert_eq!(
            log[1],
            "ephemeral Invalid page number! Please choose a number between 1 and 3."
        );
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_registry_expires_session() {
        let harness = Harness::new(3);

        assert_eq!(harness.registry.clear(), 1);
        harness.handle.await.unwrap();

        assert_eq!(harness.recorder.take(), ["edit Expired"]);
    }

    #[tokio::test(start_paused = true)]
    async fn ignored_presses_are_acknowledged() {
        let harness = Harness::new(12);

        harness.press("expired", OWNER, None);
        sleep(Duration::from_secs(1)).await;

        assert_eq!(harness.recorder.take(), ["defer"]);
    }

    #[tokio::test]
    async fn pending_activations_are_acknowledged() {
        let recorder = Recorder::default();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        for _ in 0..2 {
            let activation = Activation {
                custom_id: "_abc123_forward_button".to_owned(),
                user: OWNER,
                input: None,
                responder: Box::new(MockResponder(recorder.clone())),
            };

            assert!(tx.send(activation).is_ok());
        }

        acknowledge_pending(&mut rx).await;

        assert_eq!(recorder.take(), ["defer", "defer"]);

        let late = Activation {
            custom_id: "_abc123_forward_button".to_owned(),
            user: OWNER,
            input: None,
            responder: Box::new(MockResponder(recorder.clone())),
        };

        assert!(tx.send(late).is_err());
    }
}
