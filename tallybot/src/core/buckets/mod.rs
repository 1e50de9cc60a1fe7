use std::{collections::HashMap, future::Future, sync::Arc, time::Duration};

use parking_lot::Mutex;
use tokio::{
    sync::{
        broadcast::{
            self,
            error::{RecvError, TryRecvError},
            Receiver, Sender,
        },
        Mutex as TokioMutex,
    },
    time::{sleep, Instant},
};

mod discord;

/// Lower bound for every wait on a recorded delay.
const MIN_WAIT: Duration = Duration::from_millis(50);
const SIGNAL_CAPACITY: usize = 64;

/// Serializes tasks per bucket and delays them while the bucket is ratelimited.
///
/// Tasks sharing a bucket run one at a time in the order in which
/// [`Buckets::execute`] was called. Tasks of different buckets never wait on
/// each other.
pub struct Buckets {
    queues: Mutex<HashMap<Box<str>, Queue>>,
    delays: Mutex<Delays>,
    signals: Sender<RatelimitSignal>,
}

struct Queue {
    lock: Arc<TokioMutex<()>>,
    /// Invocations that either run or wait for their turn
    pending: usize,
}

#[derive(Default)]
struct Delays {
    records: HashMap<Box<str>, Delay>,
    seq: u64,
}

impl Delays {
    /// Drop every record whose delay is over, regardless of its key.
    fn evict_elapsed(&mut self, now: Instant) {
        self.records.retain(|_, delay| !delay.has_elapsed(now));
    }
}

#[derive(Copy, Clone, Debug)]
struct Delay {
    retry_after: Duration,
    recorded_at: Instant,
    seq: u64,
}

impl Delay {
    fn has_elapsed(&self, now: Instant) -> bool {
        self.recorded_at + self.retry_after <= now
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RatelimitSignal {
    pub bucket: Box<str>,
    pub retry_after: Duration,
}

/// Publishes ratelimit signals to all invocations currently inside
/// [`Buckets::execute`].
#[derive(Clone)]
pub struct RatelimitNotifier {
    tx: Sender<RatelimitSignal>,
}

impl RatelimitNotifier {
    pub fn notify(&self, bucket: &str, retry_after: Duration) {
        let signal = RatelimitSignal {
            bucket: normalize(bucket),
            retry_after,
        };

        trace!(bucket = %signal.bucket, ?retry_after, "Ratelimit signal");

        // Nobody listening is fine, there is nothing to delay then
        let _ = self.tx.send(signal);
    }
}

impl Default for Buckets {
    fn default() -> Self {
        let (signals, _) = broadcast::channel(SIGNAL_CAPACITY);

        Self {
            queues: Mutex::new(HashMap::new()),
            delays: Mutex::new(Delays::default()),
            signals,
        }
    }
}

impl Buckets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifier(&self) -> RatelimitNotifier {
        RatelimitNotifier {
            tx: self.signals.clone(),
        }
    }

    /// Run `task` once it's the bucket's turn and no ratelimit is known for it.
    ///
    /// The task's output, including any error, is returned unchanged.
    pub async fn execute<F, Fut>(&self, bucket: &str, task: F) -> Fut::Output
    where
        F: FnOnce() -> Fut,
        Fut: Future,
    {
        let key = normalize(bucket);

        // Registering and first polling the lock happen within the same poll
        // so the lock's FIFO order matches the order of `execute` calls.
        let slot = self.enqueue(&key);
        let _turn = Arc::clone(&slot.lock).lock_owned().await;

        let mut signals = self.signals.subscribe();

        while let Some(delay) = self.recorded_delay(&key) {
            let wait = delay.retry_after.max(MIN_WAIT);
            debug!(bucket = %key, ?wait, "Waiting on ratelimit");

            self.listen(&key, &mut signals, sleep(wait)).await;
            self.clear_delay(&key, delay.seq);
        }

        self.listen(&key, &mut signals, task()).await
    }

    fn enqueue<'k>(&self, key: &'k str) -> QueueSlot<'_, 'k> {
        let mut queues = self.queues.lock();

        let queue = queues.entry(Box::from(key)).or_insert_with(|| Queue {
            lock: Arc::new(TokioMutex::new(())),
            pending: 0,
        });

        queue.pending += 1;

        QueueSlot {
            buckets: self,
            key,
            lock: Arc::clone(&queue.lock),
        }
    }

    fn dequeue(&self, key: &str) {
        let mut queues = self.queues.lock();

        let Some(queue) = queues.get_mut(key) else {
            return;
        };

        queue.pending -= 1;

        if queue.pending > 0 {
            return;
        }

        queues.remove(key);
        drop(queues);

        self.delays.lock().evict_elapsed(Instant::now());
    }

    /// Drive `fut` to completion while recording signals for `key`.
    async fn listen<Fut: Future>(
        &self,
        key: &str,
        signals: &mut Receiver<RatelimitSignal>,
        fut: Fut,
    ) -> Fut::Output {
        tokio::pin!(fut);
        let mut open = true;

        loop {
            tokio::select! {
                biased;
                output = &mut fut => {
                    // Signals sent by the future itself right before finishing
                    self.drain(key, signals);

                    return output;
                }
                res = signals.recv(), if open => match res {
                    Ok(signal) => self.record(key, &signal),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(bucket = key, skipped, "Missed ratelimit signals");
                    }
                    Err(RecvError::Closed) => open = false,
                },
            }
        }
    }

    fn drain(&self, key: &str, signals: &mut Receiver<RatelimitSignal>) {
        loop {
            match signals.try_recv() {
                Ok(signal) => self.record(key, &signal),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(bucket = key, skipped, "Missed ratelimit signals");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return,
            }
        }
    }

    fn record(&self, key: &str, signal: &RatelimitSignal) {
        if &*signal.bucket != key || signal.retry_after.is_zero() {
            return;
        }

        let now = Instant::now();
        let mut delays = self.delays.lock();
        delays.evict_elapsed(now);
        delays.seq += 1;

        let delay = Delay {
            retry_after: signal.retry_after,
            recorded_at: now,
            seq: delays.seq,
        };

        delays.records.insert(Box::from(key), delay);
    }

    fn recorded_delay(&self, key: &str) -> Option<Delay> {
        self.delays.lock().records.get(key).copied()
    }

    /// Remove the delay unless a newer one was recorded in the meantime.
    fn clear_delay(&self, key: &str, seq: u64) {
        let mut delays = self.delays.lock();

        if delays.records.get(key).map_or(false, |delay| delay.seq == seq) {
            delays.records.remove(key);
        }
    }

    #[cfg(test)]
    fn delay_count(&self) -> usize {
        self.delays.lock().records.len()
    }

    #[cfg(test)]
    fn is_tracked(&self, bucket: &str) -> bool {
        self.queues.lock().contains_key(normalize(bucket).as_ref())
    }
}

struct QueueSlot<'b, 'k> {
    buckets: &'b Buckets,
    key: &'k str,
    lock: Arc<TokioMutex<()>>,
}

impl Drop for QueueSlot<'_, '_> {
    fn drop(&mut self) {
        self.buckets.dequeue(self.key);
    }
}

/// Case-folded and without whitespace so that `"Message Edit"` and
/// `"messageedit"` share a bucket.
pub fn normalize(bucket: &str) -> Box<str> {
    bucket
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect::<String>()
        .into_boxed_str()
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
        time::Duration,
    };

    use futures::future::join_all;
    use parking_lot::Mutex;
    use tokio::time::{sleep, Instant};

    use super::*;

    #[test]
    fn normalizes_keys() {
        assert_eq!(&*normalize("Message Edit"), "messageedit");
        assert_eq!(&*normalize(" channel\t42 "), "channel42");
    }

    #[tokio::test(start_paused = true)]
    async fn same_key_runs_in_call_order_without_overlap() {
        let buckets = Buckets::new();
        let log = Mutex::new(Vec::new());
        let running = AtomicUsize::new(0);

        let tasks = (0..5).map(|i| {
            let log = &log;
            let running = &running;

            buckets.execute("edit", move || async move {
                assert_eq!(running.fetch_add(1, Ordering::SeqCst), 0);
                log.lock().push(i);
                sleep(Duration::from_millis(10 * (5 - i))).await;
                running.fetch_sub(1, Ordering::SeqCst);
            })
        });

        join_all(tasks).await;

        assert_eq!(*log.lock(), [0, 1, 2, 3, 4]);
        assert!(!buckets.is_tracked("edit"));
    }

    #[tokio::test(start_paused = true)]
    async fn different_keys_run_concurrently() {
        let buckets = Buckets::new();
        let start = Instant::now();

        let slow = buckets.execute("a", || sleep(Duration::from_secs(1)));
        let fast = buckets.execute("b", || async { Instant::now() });

        let (_, fast_done) = tokio::join!(slow, fast);

        assert!(fast_done - start < Duration::from_millis(10));
    }

    #[tokio::test(start_paused = true)]
    async fn delay_signal_postpones_next_task() {
        let buckets = Buckets::new();
        let notifier = buckets.notifier();
        let signalled_at = Arc::new(Mutex::new(None));

        let first = {
            let signalled_at = Arc::clone(&signalled_at);

            buckets.execute("K", move || async move {
                notifier.notify("k", Duration::from_millis(1000));
                *signalled_at.lock() = Some(Instant::now());
            })
        };

        let second = buckets.execute("k", || async { Instant::now() });

        let (_, started) = tokio::join!(first, second);
        let signalled_at = signalled_at.lock().unwrap();

        assert!(started - signalled_at >= Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn tiny_delay_waits_at_least_minimum() {
        let buckets = Buckets::new();
        let notifier = buckets.notifier();

        buckets
            .execute("k", || async move {
                notifier.notify("k", Duration::from_millis(1));
            })
            .await;

        // The delay outlives the queue entry as long as it hasn't elapsed
        let start = Instant::now();
        let started = buckets.execute("k", || async { Instant::now() }).await;

        assert!(started - start >= MIN_WAIT);
    }

    #[tokio::test(start_paused = true)]
    async fn signal_for_other_key_is_ignored() {
        let buckets = Buckets::new();
        let notifier = buckets.notifier();

        let first = buckets.execute("a", move || async move {
            notifier.notify("b", Duration::from_secs(5));
        });

        let start = Instant::now();
        let second = buckets.execute("a", || async { Instant::now() });
        let (_, started) = tokio::join!(first, second);

        assert!(started - start < MIN_WAIT);
    }

    #[tokio::test(start_paused = true)]
    async fn error_is_propagated_and_next_task_runs() {
        let buckets = Buckets::new();

        let failing = buckets.execute("k", || async { Err::<(), _>("boom") });
        let next = buckets.execute("k", || async { Ok::<_, &str>(42) });

        let (failed, succeeded) = tokio::join!(failing, next);

        assert_eq!(failed, Err("boom"));
        assert_eq!(succeeded, Ok(42));
        assert!(!buckets.is_tracked("k"));
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_waiter_releases_its_slot() {
        let buckets = Buckets::new();

        {
            let running = buckets.execute("k", || sleep(Duration::from_secs(1)));
            let waiting = buckets.execute("k", || async {});

            tokio::select! {
                biased;
                _ = running => {}
                _ = waiting => unreachable!("second task must wait for the first"),
            }
        }

        assert!(!buckets.is_tracked("k"));
        assert_eq!(buckets.execute("k", || async { 1 }).await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_delays_of_unused_keys_are_evicted() {
        let buckets = Buckets::new();

        for i in 0..100 {
            let notifier = buckets.notifier();
            let key = format!("interaction {i}");
            let signalled = key.clone();

            buckets
                .execute(&key, move || async move {
                    notifier.notify(&signalled, Duration::from_millis(500));
                })
                .await;
        }

        assert_eq!(buckets.delay_count(), 100);

        tokio::time::advance(Duration::from_secs(3600)).await;
        buckets.execute("other", || async {}).await;

        assert_eq!(buckets.delay_count(), 0);
        assert!(!buckets.is_tracked("interaction 0"));
    }
}
