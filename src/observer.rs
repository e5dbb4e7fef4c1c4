//! Push-based change notification for language switches.
//!
//! Observers are registered with an [`ObserverRegistry`] and receive a [`LanguageChanged`]
//! token after every successful switch. The token carries no payload; observers re-read
//! whatever they need from the manager.

use std::{
    panic::{AssertUnwindSafe, catch_unwind},
    sync::{Arc, Mutex, MutexGuard, Weak},
};

use tracing::error;

/// Stateless "the active language changed" token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LanguageChanged;

static LANGUAGE_CHANGED: LanguageChanged = LanguageChanged;

/// Receives language change notifications.
pub trait LanguageObserver: Send + Sync {
    fn on_language_changed(&self, event: &LanguageChanged);
}

impl<F> LanguageObserver for F
where
    F: Fn(&LanguageChanged) + Send + Sync,
{
    fn on_language_changed(&self, event: &LanguageChanged) {
        self(event)
    }
}

type Slot = (u64, Arc<dyn LanguageObserver>);

#[derive(Default)]
struct Observers {
    next_id: u64,
    slots: Vec<Slot>,
}

/// A set of observers with handle-based unsubscription.
#[derive(Default)]
pub struct ObserverRegistry {
    inner: Arc<Mutex<Observers>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `observer` and immediately delivers one catch-up notification to it.
    ///
    /// Subscribing the same `Arc` twice is a no-op: no second notification is sent and the
    /// returned handle is inert, so dropping it leaves the first registration in place.
    pub fn subscribe(&self, observer: Arc<dyn LanguageObserver>) -> Subscription {
        let (id, added) = {
            let mut observers = lock(&self.inner);
            match observers
                .slots
                .iter()
                .find(|(_, existing)| same_observer(existing, &observer))
            {
                Some((id, _)) => (*id, false),
                None => {
                    let id = observers.next_id;
                    observers.next_id += 1;
                    observers.slots.push((id, Arc::clone(&observer)));
                    (id, true)
                }
            }
        };

        if !added {
            return Subscription {
                id,
                registry: Weak::new(),
            };
        }

        deliver(id, observer.as_ref());
        Subscription {
            id,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Delivers the change token to every registered observer.
    ///
    /// Observers run on the calling thread without the registry lock held, so they may
    /// subscribe, unsubscribe, or query the manager. A panicking observer is logged and
    /// skipped. Returns how many observers completed normally.
    pub fn notify_all(&self) -> usize {
        let snapshot: Vec<Slot> = lock(&self.inner).slots.clone();
        snapshot
            .iter()
            .filter(|(id, observer)| deliver(*id, observer.as_ref()))
            .count()
    }

    pub fn len(&self) -> usize {
        lock(&self.inner).slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.len())
            .finish()
    }
}

/// Handle returned by [`ObserverRegistry::subscribe`].
///
/// Dropping the handle unsubscribes; call [`Subscription::detach`] to keep the observer
/// registered for as long as the registry lives.
#[must_use = "dropping a Subscription unsubscribes the observer"]
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Observers>>,
}

impl Subscription {
    /// Removes the observer. Calling this more than once has no further effect.
    pub fn unsubscribe(&mut self) {
        if let Some(inner) = self.registry.upgrade() {
            lock(&inner).slots.retain(|(id, _)| *id != self.id);
        }
        self.registry = Weak::new();
    }

    pub fn is_active(&self) -> bool {
        let Some(inner) = self.registry.upgrade() else {
            return false;
        };
        let active = lock(&inner).slots.iter().any(|(id, _)| *id == self.id);
        active
    }

    /// Gives up the handle without unsubscribing.
    pub fn detach(mut self) {
        self.registry = Weak::new();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

fn same_observer(a: &Arc<dyn LanguageObserver>, b: &Arc<dyn LanguageObserver>) -> bool {
    // Compare data pointers only; vtable pointers may differ across codegen units.
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

fn deliver(id: u64, observer: &dyn LanguageObserver) -> bool {
    let result = catch_unwind(AssertUnwindSafe(|| {
        observer.on_language_changed(&LANGUAGE_CHANGED)
    }));
    if result.is_err() {
        error!(observer = id, "language observer panicked during notification");
    }
    result.is_ok()
}

// A panicking observer never runs while the lock is held, so poisoning only means another
// thread panicked mid-update of plain data; the data is still consistent.
fn lock(inner: &Mutex<Observers>) -> MutexGuard<'_, Observers> {
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
