use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;
use rand::{distributions::Alphanumeric, Rng};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::{driver::Activation, session::session_id_of};

const ID_LEN: usize = 6;

/// Inboxes of all running leaderboard sessions.
#[derive(Clone, Default)]
pub struct Leaderboards {
    inner: Arc<Mutex<HashMap<Box<str>, UnboundedSender<Activation>>>>,
}

impl Leaderboards {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a fresh session id along with the session's inbox.
    pub(super) fn register(&self) -> (Box<str>, UnboundedReceiver<Activation>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock();
        let mut rng = rand::thread_rng();

        let id = loop {
            let id: String = (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(ID_LEN)
                .map(char::from)
                .collect();

            if !inner.contains_key(id.as_str()) {
                break id.into_boxed_str();
            }
        };

        inner.insert(id.clone(), tx);

        (id, rx)
    }

    pub(super) fn remove(&self, id: &str) {
        self.inner.lock().remove(id);
    }

    /// Whether the custom id belongs to a leaderboard control.
    pub fn is_control(custom_id: &str) -> bool {
        session_id_of(custom_id).map_or(false, |id| id.len() == ID_LEN)
    }

    /// Forward the activation to its session.
    ///
    /// Hands the activation back if no such session is running.
    pub fn dispatch(&self, activation: Activation) -> Result<(), Activation> {
        let Some(id) = session_id_of(&activation.custom_id) else {
            return Err(activation);
        };

        let tx = self.inner.lock().get(id).cloned();

        match tx {
            Some(tx) => tx.send(activation).map_err(|err| err.0),
            None => Err(activation),
        }
    }

    /// Close all inboxes which makes every session expire.
    pub fn clear(&self) -> usize {
        let mut inner = self.inner.lock();
        let len = inner.len();
        inner.clear();

        len
    }

    #[cfg(test)]
    pub(super) fn len(&self) -> usize {
        self.inner.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_alphanumeric() {
        let leaderboards = Leaderboards::new();

        let ids: Vec<_> = (0..50).map(|_| leaderboards.register().0).collect();

        assert_eq!(leaderboards.len(), 50);
        assert!(ids
            .iter()
            .all(|id| id.len() == ID_LEN && id.chars().all(|c| c.is_ascii_alphanumeric())));

        leaderboards.remove(&ids[0]);
        assert_eq!(leaderboards.len(), 49);
        assert_eq!(leaderboards.clear(), 49);
    }

    #[test]
    fn recognizes_controls() {
        assert!(Leaderboards::is_control("_aB3dE9_forward_button"));
        assert!(!Leaderboards::is_control("errorhandler_read"));
        assert!(!Leaderboards::is_control("_toolong1_page_info"));
    }
}
