//! Notification bridge between the locale state and every mounted section.
//!
//! Delivery is split in two phases. [`NotificationBridge::emit`] runs the
//! *notify* phase: it calls every handler registered at that moment,
//! synchronously, before returning. Handlers must not block or fetch; the
//! section handlers only enqueue a command for their driver task, which runs
//! the *react* phase (dispatching the fetch) asynchronously.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::i18n::Locale;

/// Callback invoked with the new locale.
pub type LocaleHandler = Arc<dyn Fn(Locale) + Send + Sync>;

/// Events carried by the bridge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BridgeEvent {
    /// The active locale changed; handlers receive the new value.
    LocaleChanged,
}

/// Errors returned by [`NotificationBridge::emit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BridgeError {
    /// The bridge was closed; subscribers cannot be reached.
    Unavailable,
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => f.write_str("notification bridge unavailable"),
        }
    }
}

impl std::error::Error for BridgeError {}

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: Vec<(u64, LocaleHandler)>,
    closed: bool,
}

/// Publish/subscribe hub for locale changes.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct NotificationBridge {
    registry: Arc<Mutex<Registry>>,
}

impl fmt::Debug for NotificationBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reg = lock(&self.registry);
        f.debug_struct("NotificationBridge")
            .field("subscribers", &reg.handlers.len())
            .field("closed", &reg.closed)
            .finish()
    }
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

impl NotificationBridge {
    /// Empty, open bridge.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// What: Register a handler for `event`.
    ///
    /// Inputs:
    /// - `event`: Event kind (only `LocaleChanged` exists)
    /// - `handler`: Called with the new locale during the notify phase
    ///
    /// Output:
    /// - `Subscription` guard; dropping it or calling `unsubscribe` removes the handler
    ///
    /// Details:
    /// - Handlers registered on a closed bridge are kept but never invoked
    pub fn subscribe<F>(&self, event: BridgeEvent, handler: F) -> Subscription
    where
        F: Fn(Locale) + Send + Sync + 'static,
    {
        let BridgeEvent::LocaleChanged = event;
        let mut reg = lock(&self.registry);
        reg.next_id += 1;
        let id = reg.next_id;
        reg.handlers.push((id, Arc::new(handler)));
        tracing::trace!(id, subscribers = reg.handlers.len(), "bridge subscribe");
        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
            active: AtomicBool::new(true),
        }
    }

    /// What: Notify every current subscriber of a locale change.
    ///
    /// Output:
    /// - Number of handlers invoked
    ///
    /// # Errors
    /// - `BridgeError::Unavailable` after [`close`](Self::close)
    ///
    /// Details:
    /// - Handlers are snapshotted under the lock and invoked outside it, so a
    ///   handler may subscribe or unsubscribe without deadlocking
    /// - A handler removed during this emission may still see this one event
    pub fn emit(&self, locale: Locale) -> Result<usize, BridgeError> {
        let snapshot: Vec<LocaleHandler> = {
            let reg = lock(&self.registry);
            if reg.closed {
                return Err(BridgeError::Unavailable);
            }
            reg.handlers.iter().map(|(_, h)| Arc::clone(h)).collect()
        };
        for handler in &snapshot {
            handler(locale);
        }
        tracing::debug!(locale = %locale, delivered = snapshot.len(), "locale change delivered");
        Ok(snapshot.len())
    }

    /// Mark the bridge unavailable; later emissions fail.
    pub fn close(&self) {
        lock(&self.registry).closed = true;
        tracing::warn!("notification bridge closed");
    }

    /// Re-open a closed bridge (after a full reload rebuilt the subscribers).
    pub fn reopen(&self) {
        lock(&self.registry).closed = false;
    }

    /// Whether emissions currently reach subscribers.
    #[must_use]
    pub fn is_available(&self) -> bool {
        !lock(&self.registry).closed
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        lock(&self.registry).handlers.len()
    }
}

/// Registration guard returned by [`NotificationBridge::subscribe`].
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
    active: AtomicBool,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

impl Subscription {
    /// What: Remove the handler from the bridge.
    ///
    /// Details:
    /// - Idempotent: only the first call touches the registry
    /// - Safe after the bridge itself has been dropped
    pub fn unsubscribe(&self) {
        if !self.active.swap(false, Ordering::AcqRel) {
            return;
        }
        if let Some(registry) = self.registry.upgrade() {
            let mut reg = lock(&registry);
            reg.handlers.retain(|(id, _)| *id != self.id);
            tracing::trace!(id = self.id, subscribers = reg.handlers.len(), "bridge unsubscribe");
        }
    }

    /// Whether the handler is still registered through this guard.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter() -> (Arc<AtomicUsize>, impl Fn(Locale) + Send + Sync + 'static) {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        (hits, move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    /// What: Every subscriber is called synchronously before `emit` returns.
    fn emit_reaches_all_subscribers_synchronously() {
        let bridge = NotificationBridge::new();
        let (a, ha) = counter();
        let (b, hb) = counter();
        let _sa = bridge.subscribe(BridgeEvent::LocaleChanged, ha);
        let _sb = bridge.subscribe(BridgeEvent::LocaleChanged, hb);
        assert_eq!(bridge.emit(Locale::En), Ok(2));
        assert_eq!(a.load(Ordering::SeqCst), 1);
        assert_eq!(b.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribe_is_idempotent_and_drop_unsubscribes() {
        let bridge = NotificationBridge::new();
        let (hits, h) = counter();
        let sub = bridge.subscribe(BridgeEvent::LocaleChanged, h);
        sub.unsubscribe();
        sub.unsubscribe();
        assert!(!sub.is_active());
        assert_eq!(bridge.emit(Locale::Ar), Ok(0));
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        let (_, h2) = counter();
        {
            let _scoped = bridge.subscribe(BridgeEvent::LocaleChanged, h2);
            assert_eq!(bridge.subscriber_count(), 1);
        }
        assert_eq!(bridge.subscriber_count(), 0);
    }

    #[test]
    fn closed_bridge_reports_unavailable() {
        let bridge = NotificationBridge::new();
        let (hits, h) = counter();
        let _sub = bridge.subscribe(BridgeEvent::LocaleChanged, h);
        bridge.close();
        assert!(!bridge.is_available());
        assert_eq!(bridge.emit(Locale::En), Err(BridgeError::Unavailable));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        bridge.reopen();
        assert_eq!(bridge.emit(Locale::En), Ok(1));
    }

    #[test]
    /// What: A handler may unsubscribe another handler while being notified.
    fn reentrant_unsubscribe_does_not_deadlock() {
        let bridge = NotificationBridge::new();
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let slot_in = Arc::clone(&slot);
        let _first = bridge.subscribe(BridgeEvent::LocaleChanged, move |_| {
            if let Some(sub) = slot_in.lock().expect("slot").take() {
                sub.unsubscribe();
            }
        });
        let (_, h) = counter();
        *slot.lock().expect("slot") = Some(bridge.subscribe(BridgeEvent::LocaleChanged, h));
        assert_eq!(bridge.emit(Locale::En), Ok(2));
        assert_eq!(bridge.subscriber_count(), 1);
    }

    #[test]
    fn subscription_outliving_bridge_is_harmless() {
        let bridge = NotificationBridge::new();
        let (_, h) = counter();
        let sub = bridge.subscribe(BridgeEvent::LocaleChanged, h);
        drop(bridge);
        sub.unsubscribe();
        assert!(!sub.is_active());
    }
}
