// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! State-change subscriptions.

use crate::session::state::SessionState;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

type Callback = Arc<dyn Fn(&SessionState) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: AtomicU64,
    callbacks: Mutex<BTreeMap<u64, Callback>>,
}

impl Registry {
    fn remove(&self, id: u64) {
        self.callbacks.lock().remove(&id);
    }
}

/// Fans state snapshots out to subscribers in subscription order.
#[derive(Default)]
pub(crate) struct Notifier {
    registry: Arc<Registry>,
}

impl Notifier {
    pub(crate) fn register(&self, callback: Callback) -> u64 {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry.callbacks.lock().insert(id, callback);
        id
    }

    pub(crate) fn subscription(&self, id: u64, initial: SessionState) -> Subscription {
        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
            initial,
        }
    }

    /// Invokes every callback. Callbacks run outside the registry lock, so
    /// they may subscribe or unsubscribe.
    pub(crate) fn notify(&self, state: &SessionState) {
        let callbacks: Vec<Callback> = self.registry.callbacks.lock().values().cloned().collect();
        for callback in callbacks {
            callback(state);
        }
    }

    pub(crate) fn clear(&self) {
        self.registry.callbacks.lock().clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.registry.callbacks.lock().len()
    }
}

/// Live subscription. Dropping it unsubscribes.
///
/// The callback is registered before the initial snapshot is taken, so a
/// transition racing the subscribe call is seen either in the snapshot or
/// as a callback (possibly both), never missed.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    registry: Weak<Registry>,
    initial: SessionState,
}

impl Subscription {
    /// State at the moment of subscribing.
    pub fn initial_state(&self) -> &SessionState {
        &self.initial
    }

    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::state::SessionMode;
    use std::sync::atomic::AtomicUsize;

    fn counting(notifier: &Notifier) -> (Arc<AtomicUsize>, Subscription) {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let id = notifier.register(Arc::new(move |_: &SessionState| {
            seen.fetch_add(1, Ordering::SeqCst);
        }));
        (count, notifier.subscription(id, SessionState::default()))
    }

    #[test]
    fn test_notify_reaches_every_subscriber() {
        let notifier = Notifier::default();
        let (a, _sub_a) = counting(&notifier);
        let (b, _sub_b) = counting(&notifier);

        notifier.notify(&SessionState::default());
        assert_eq!(a.load(Ordering::SeqCst), 1);
        assert_eq!(b.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let notifier = Notifier::default();
        let (count, subscription) = counting(&notifier);

        subscription.unsubscribe();
        notifier.notify(&SessionState::default());
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(notifier.len(), 0);
    }

    #[test]
    fn test_callback_may_subscribe_during_notify() {
        let notifier = Arc::new(Notifier::default());
        let inner = Arc::clone(&notifier);
        let _id = notifier.register(Arc::new(move |state: &SessionState| {
            if state.mode == SessionMode::ReadOnly {
                inner.register(Arc::new(|_: &SessionState| {}));
            }
        }));

        notifier.notify(&SessionState {
            mode: SessionMode::ReadOnly,
            ..SessionState::default()
        });
        assert_eq!(notifier.len(), 2);
    }

    #[test]
    fn test_subscription_outliving_notifier_is_harmless() {
        let notifier = Notifier::default();
        let (_count, subscription) = counting(&notifier);
        drop(notifier);
        drop(subscription);
    }
}
