//! Change notifications.
//!
//! Every stateful piece of the blog owns a [`ListenerRegistry`]. Mutations
//! publish a [`StateEvent`] after their lock is released, and the registry
//! calls each listener synchronously, in subscription order, before
//! `publish` returns.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use tracing::debug;

use super::lock::mutex_lock;

const SOURCE: &str = "application::events";

/// Monotonic per-registry sequence number.
pub type Epoch = u64;

/// What changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    /// A post was prepended to the active list.
    PostAdded { title: String },
    /// The active list was emptied.
    PostsCleared { removed: usize },
    /// The search box now holds `query`.
    SearchQueryChanged { query: String },
    /// The colour theme flipped.
    ThemeToggled { dark: bool },
    /// The archive panel was opened or closed.
    ArchiveToggled { visible: bool },
    /// A field of the add-post form was edited or reset.
    FormEdited,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateEvent {
    pub epoch: Epoch,
    pub change: StateChange,
}

pub type Listener = Arc<dyn Fn(&StateEvent) + Send + Sync>;

/// Anything a render surface can watch.
pub trait Observable {
    fn subscribe_listener(&self, listener: Listener) -> Subscription;
}

#[derive(Default)]
struct Listeners {
    entries: Vec<(u64, Listener)>,
    next_id: u64,
}

impl Listeners {
    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Ordered list of listeners with RAII unsubscription.
pub struct ListenerRegistry {
    listeners: Arc<Mutex<Listeners>>,
    epoch_counter: AtomicU64,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(Mutex::new(Listeners::default())),
            epoch_counter: AtomicU64::new(0),
        }
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&StateEvent) + Send + Sync + 'static,
    {
        self.subscribe_listener(Arc::new(listener))
    }

    pub fn subscribe_listener(&self, listener: Listener) -> Subscription {
        let id = {
            let mut listeners = mutex_lock(&self.listeners, SOURCE, "subscribe");
            let id = listeners.next_id();
            listeners.entries.push((id, listener));
            id
        };

        Subscription {
            listeners: Arc::downgrade(&self.listeners),
            id,
        }
    }

    /// Stamp `change` with the next epoch and deliver it to every listener.
    ///
    /// Listeners subscribed while delivery is in progress see the next event,
    /// not this one.
    pub fn publish(&self, change: StateChange) -> StateEvent {
        let event = StateEvent {
            epoch: self.epoch_counter.fetch_add(1, Ordering::SeqCst),
            change,
        };

        let snapshot: Vec<Listener> = mutex_lock(&self.listeners, SOURCE, "publish")
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        debug!(
            epoch = event.epoch,
            change = ?event.change,
            listeners = snapshot.len(),
            "State change published"
        );

        for listener in snapshot {
            listener(&event);
        }

        event
    }

    pub fn listener_count(&self) -> usize {
        mutex_lock(&self.listeners, SOURCE, "listener_count")
            .entries
            .len()
    }
}

impl Observable for ListenerRegistry {
    fn subscribe_listener(&self, listener: Listener) -> Subscription {
        ListenerRegistry::subscribe_listener(self, listener)
    }
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle returned by `subscribe`; dropping it removes the listener.
#[must_use = "dropping a Subscription unsubscribes its listener immediately"]
pub struct Subscription {
    listeners: Weak<Mutex<Listeners>>,
    id: u64,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            mutex_lock(&listeners, SOURCE, "unsubscribe")
                .entries
                .retain(|(id, _)| *id != self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
