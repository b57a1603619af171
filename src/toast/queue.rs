//! In-memory toast queue with timed self-removal.
//!
//! Toasts are kept in arrival order. Each push schedules a removal task on
//! the tokio runtime; an explicit `remove` aborts that task. Removal is
//! check-before-act, so whichever of the two runs second is a no-op and
//! observers are only notified for removals that actually happened.
//!
//! Every mutation queues its snapshot while the state lock is held. One
//! thread at a time drains that queue and calls the observers, so they see
//! snapshots in mutation order, even when several threads mutate at once.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use rand::RngCore;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;

use super::kind::ToastKind;

/// How long a toast stays visible unless told otherwise.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(3000);

/// A single visible notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    /// Unique identifier (32 hex chars).
    pub id: String,
    pub message: String,
    pub kind: ToastKind,
    pub created_at: Instant,
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Observer = Arc<dyn Fn(&[Toast]) + Send + Sync>;

struct Entry {
    toast: Toast,
    expiry: Option<AbortHandle>,
}

#[derive(Default)]
struct State {
    entries: Vec<Entry>,
    observers: BTreeMap<u64, Observer>,
    next_subscription: u64,
    /// Snapshots not yet handed to observers, oldest first.
    pending: VecDeque<Vec<Toast>>,
    /// Set while some thread is delivering `pending`.
    delivering: bool,
}

impl State {
    fn queue_notification(&mut self) {
        let snapshot = self.entries.iter().map(|e| e.toast.clone()).collect();
        self.pending.push_back(snapshot);
    }
}

/// Ordered collection of visible toasts.
///
/// Cloning is cheap and every clone shares the same sequence and observers.
#[derive(Clone, Default)]
pub struct ToastQueue {
    state: Arc<Mutex<State>>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a toast and schedule its removal after `duration`.
    ///
    /// Outside a tokio runtime the toast is still shown but has no timer,
    /// so it stays until removed explicitly. Returns the new id.
    pub fn push(&self, message: impl Into<String>, kind: ToastKind, duration: Duration) -> String {
        let runtime = Handle::try_current().ok();
        if runtime.is_none() {
            log::warn!("No tokio runtime, toast will not expire on its own");
        }

        let id = generate_id();
        let toast = Toast {
            id: id.clone(),
            message: message.into(),
            kind,
            created_at: Instant::now(),
        };

        {
            let mut state = self.lock();
            // The timer task blocks on this lock, so it cannot run before
            // the entry exists.
            let expiry = runtime.map(|runtime| {
                let queue = self.clone();
                let expiry_id = id.clone();
                runtime
                    .spawn(async move {
                        tokio::time::sleep(duration).await;
                        if queue.remove_entry(&expiry_id) {
                            log::debug!("Toast expired: {}", expiry_id);
                        }
                    })
                    .abort_handle()
            });
            state.entries.push(Entry { toast, expiry });
            state.queue_notification();
        }
        self.deliver();

        id
    }

    /// Push an informational toast with the default duration.
    pub fn info(&self, message: impl Into<String>) -> String {
        self.push(message, ToastKind::Info, DEFAULT_DURATION)
    }

    /// Push a success toast with the default duration.
    pub fn success(&self, message: impl Into<String>) -> String {
        self.push(message, ToastKind::Success, DEFAULT_DURATION)
    }

    /// Push an error toast with the default duration.
    pub fn error(&self, message: impl Into<String>) -> String {
        self.push(message, ToastKind::Error, DEFAULT_DURATION)
    }

    /// Remove a toast and cancel its pending expiry.
    ///
    /// Unknown ids are ignored. Returns whether anything was removed.
    pub fn remove(&self, id: &str) -> bool {
        self.remove_entry(id)
    }

    /// Current visible toasts in display order.
    pub fn snapshot(&self) -> Vec<Toast> {
        self.lock().entries.iter().map(|e| e.toast.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Register an observer called with the full sequence after every change.
    pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&[Toast]) + Send + Sync + 'static,
    {
        let mut state = self.lock();
        let id = state.next_subscription;
        state.next_subscription += 1;
        state.observers.insert(id, Arc::new(observer));
        SubscriptionId(id)
    }

    /// Drop an observer. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.lock().observers.remove(&id.0).is_some()
    }

    fn remove_entry(&self, id: &str) -> bool {
        {
            let mut state = self.lock();
            let Some(pos) = state.entries.iter().position(|e| e.toast.id == id) else {
                return false;
            };
            let entry = state.entries.remove(pos);
            if let Some(expiry) = entry.expiry {
                expiry.abort();
            }
            state.queue_notification();
        }
        self.deliver();
        true
    }

    /// Hand queued snapshots to observers, oldest first.
    ///
    /// If another thread is already delivering, it picks up our snapshot
    /// and we return at once. This includes an observer that mutates the
    /// queue from inside its callback.
    fn deliver(&self) {
        {
            let mut state = self.lock();
            if state.delivering {
                return;
            }
            state.delivering = true;
        }
        let mut guard = DeliveryGuard {
            queue: self,
            finished: false,
        };

        loop {
            let (snapshot, observers) = {
                let mut state = self.lock();
                let Some(snapshot) = state.pending.pop_front() else {
                    // Cleared under the same lock that saw the queue empty,
                    // so a concurrent mutation either lands in `pending`
                    // before this or starts its own delivery after.
                    state.delivering = false;
                    guard.finished = true;
                    return;
                };
                let observers: Vec<Observer> = state.observers.values().cloned().collect();
                (snapshot, observers)
            };
            for observer in &observers {
                observer(&snapshot);
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // Observers never run under the lock.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Clears the delivering flag if an observer panics mid-delivery.
struct DeliveryGuard<'a> {
    queue: &'a ToastQueue,
    finished: bool,
}

impl Drop for DeliveryGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.queue.lock().delivering = false;
        }
    }
}

fn generate_id() -> String {
    let mut bytes = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
