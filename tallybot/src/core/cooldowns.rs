use std::{collections::HashMap, sync::Arc, time::Duration};

use parking_lot::Mutex;
use tokio::time::{interval, Instant, MissedTickBehavior};
use twilight_model::id::{marker::UserMarker, Id};

const CLEAN_INTERVAL: Duration = Duration::from_secs(60);

type UserCooldowns = HashMap<Box<str>, Instant>;

/// Per-user command cooldowns.
#[derive(Default)]
pub struct Cooldowns {
    inner: Mutex<HashMap<Id<UserMarker>, UserCooldowns>>,
}

impl Cooldowns {
    pub fn new() -> Self {
        Self::default()
    }

    /// A zero `ttl` does nothing.
    pub fn set(&self, user: Id<UserMarker>, cmd: &str, ttl: Duration) {
        if ttl.is_zero() {
            return;
        }

        let expiry = Instant::now() + ttl;

        self.inner
            .lock()
            .entry(user)
            .or_default()
            .insert(Box::from(cmd), expiry);
    }

    /// Returns the remaining cooldown, stale entries are removed on the way.
    pub fn has(&self, user: Id<UserMarker>, cmd: &str) -> Option<Duration> {
        let mut inner = self.inner.lock();
        let expiry = *inner.get(&user)?.get(cmd)?;
        let now = Instant::now();

        if expiry > now {
            return Some(expiry - now);
        }

        Self::remove(&mut inner, user, cmd);

        None
    }

    pub fn del(&self, user: Id<UserMarker>, cmd: &str) {
        Self::remove(&mut self.inner.lock(), user, cmd);
    }

    /// Removes all cooldowns of the user and returns how many there were.
    pub fn clear(&self, user: Id<UserMarker>) -> usize {
        self.inner.lock().remove(&user).map_or(0, |cmds| cmds.len())
    }

    /// Remaining durations of all cooldowns, expired ones included as zero.
    pub fn list(&self) -> HashMap<Id<UserMarker>, HashMap<Box<str>, Duration>> {
        let now = Instant::now();

        self.inner
            .lock()
            .iter()
            .map(|(user, cmds)| {
                let cmds = cmds
                    .iter()
                    .map(|(cmd, expiry)| (cmd.clone(), expiry.saturating_duration_since(now)))
                    .collect();

                (*user, cmds)
            })
            .collect()
    }

    /// Drops expired entries and users without any remaining entry.
    pub fn clean(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;

        self.inner.lock().retain(|_, cmds| {
            let len = cmds.len();
            cmds.retain(|_, expiry| *expiry > now);
            removed += len - cmds.len();

            !cmds.is_empty()
        });

        removed
    }

    pub async fn clean_loop(self: Arc<Self>) {
        let mut interval = interval(CLEAN_INTERVAL);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval.tick().await;

        loop {
            interval.tick().await;
            let removed = self.clean();

            if removed > 0 {
                trace!(removed, "Cleaned up cooldowns");
            }
        }
    }

    fn remove(inner: &mut HashMap<Id<UserMarker>, UserCooldowns>, user: Id<UserMarker>, cmd: &str) {
        let Some(cmds) = inner.get_mut(&user) else {
            return;
        };

        cmds.remove(cmd);

        if cmds.is_empty() {
            inner.remove(&user);
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::advance;

    use super::*;

    fn user(id: u64) -> Id<UserMarker> {
        Id::new(id)
    }

    #[tokio::test(start_paused = true)]
    async fn zero_ttl_is_ignored() {
        let cooldowns = Cooldowns::new();
        cooldowns.set(user(1), "ping", Duration::ZERO);

        assert!(cooldowns.has(user(1), "ping").is_none());
        assert!(cooldowns.list().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn remaining_shrinks_then_expires() {
        let cooldowns = Cooldowns::new();
        cooldowns.set(user(1), "ping", Duration::from_secs(10));

        assert_eq!(cooldowns.has(user(1), "ping"), Some(Duration::from_secs(10)));

        advance(Duration::from_secs(4)).await;
        assert_eq!(cooldowns.has(user(1), "ping"), Some(Duration::from_secs(6)));

        advance(Duration::from_secs(6)).await;
        assert_eq!(cooldowns.has(user(1), "ping"), None);

        // stale entry was removed along with the then empty user
        assert!(cooldowns.list().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn del_removes_empty_user() {
        let cooldowns = Cooldowns::new();
        cooldowns.set(user(1), "ping", Duration::from_secs(10));
        cooldowns.set(user(1), "help", Duration::from_secs(10));

        cooldowns.del(user(1), "ping");
        assert_eq!(cooldowns.list()[&user(1)].len(), 1);

        cooldowns.del(user(1), "help");
        assert!(cooldowns.list().is_empty());

        // unknown entries are fine
        cooldowns.del(user(2), "help");
    }

    #[tokio::test(start_paused = true)]
    async fn clean_drops_expired_only() {
        let cooldowns = Cooldowns::new();
        cooldowns.set(user(1), "ping", Duration::from_secs(1));
        cooldowns.set(user(1), "help", Duration::from_secs(60));
        cooldowns.set(user(2), "ping", Duration::from_secs(1));

        advance(Duration::from_secs(2)).await;

        assert_eq!(cooldowns.clean(), 2);

        let list = cooldowns.list();
        assert_eq!(list.len(), 1);
        assert_eq!(list[&user(1)]["help"], Duration::from_secs(58));
    }

    #[tokio::test(start_paused = true)]
    async fn clear_user() {
        let cooldowns = Cooldowns::new();
        cooldowns.set(user(1), "ping", Duration::from_secs(5));
        cooldowns.set(user(1), "help", Duration::from_secs(5));

        assert_eq!(cooldowns.clear(user(1)), 2);
        assert_eq!(cooldowns.clear(user(1)), 0);
    }
}
