//! Synchronous change notification.
//!
//! Subscribers run in registration order with an immutable snapshot of the
//! just-committed record. Delivery happens after persistence, and each
//! callback is isolated: a panicking subscriber is logged and the rest
//! still run.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use progress_core::GameProgress;

type Callback = std::sync::Arc<dyn Fn(&GameProgress) + Send + Sync>;

/// Handle for removing a subscriber.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// Ordered list of subscriber callbacks.
pub struct ChangeNotifier {
    subscribers: Mutex<Vec<(SubscriberId, Callback)>>,
    next_id: AtomicU64,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Registers `callback`; it will be invoked after every mutation.
    pub fn subscribe(
        &self,
        callback: impl Fn(&GameProgress) + Send + Sync + 'static,
    ) -> SubscriberId {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::SeqCst));
        match self.subscribers.lock() {
            Ok(mut subs) => subs.push((id, std::sync::Arc::new(callback))),
            Err(_) => {
                tracing::error!(target: "engine::notifier", "subscriber list lock poisoned");
            }
        }
        id
    }

    /// Removes a subscriber; returns false if the id was already gone.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        match self.subscribers.lock() {
            Ok(mut subs) => {
                let before = subs.len();
                subs.retain(|(sub_id, _)| *sub_id != id);
                subs.len() != before
            }
            Err(_) => {
                tracing::error!(target: "engine::notifier", "subscriber list lock poisoned");
                false
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().map(|subs| subs.len()).unwrap_or(0)
    }

    /// Invokes every current subscriber, in registration order.
    ///
    /// The list is copied out before iterating so callbacks are free to
    /// subscribe/unsubscribe without deadlocking. A panic in one callback
    /// cannot starve the rest nor touch the already-committed state.
    pub fn notify(&self, snapshot: &GameProgress) {
        let subscribers: Vec<(SubscriberId, Callback)> = match self.subscribers.lock() {
            Ok(subs) => subs.clone(),
            Err(_) => {
                tracing::error!(target: "engine::notifier", "subscriber list lock poisoned");
                return;
            }
        };

        for (id, callback) in subscribers {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| callback(snapshot)));
            if outcome.is_err() {
                tracing::warn!(
                    target: "engine::notifier",
                    subscriber = id.0,
                    "subscriber panicked during notification"
                );
            }
        }
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use progress_core::GameProgress;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn subscribers_run_in_registration_order() {
        let notifier = ChangeNotifier::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for label in ["first", "second", "third"] {
            let order = order.clone();
            notifier.subscribe(move |_| order.lock().unwrap().push(label));
        }

        notifier.notify(&GameProgress::new("Ana"));
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn unsubscribed_callback_stops_firing() {
        let notifier = ChangeNotifier::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let counted = calls.clone();
        let id = notifier.subscribe(move |_| {
            counted.fetch_add(1, Ordering::SeqCst);
        });

        let progress = GameProgress::new("Ana");
        notifier.notify(&progress);
        assert!(notifier.unsubscribe(id));
        notifier.notify(&progress);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!notifier.unsubscribe(id));
    }

    #[test]
    fn panicking_subscriber_does_not_block_the_rest() {
        let notifier = ChangeNotifier::new();
        let calls = Arc::new(AtomicUsize::new(0));

        notifier.subscribe(|_| panic!("subscriber bug"));
        let counted = calls.clone();
        notifier.subscribe(move |_| {
            counted.fetch_add(1, Ordering::SeqCst);
        });

        notifier.notify(&GameProgress::new("Ana"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn snapshot_is_a_copy() {
        let notifier = ChangeNotifier::new();
        let seen_coins = Arc::new(AtomicUsize::new(0));

        let seen = seen_coins.clone();
        notifier.subscribe(move |progress| {
            seen.store(progress.coins as usize, Ordering::SeqCst);
        });

        let mut progress = GameProgress::new("Ana");
        progress.coins = 42;
        notifier.notify(&progress);

        assert_eq!(seen_coins.load(Ordering::SeqCst), 42);
    }
}
