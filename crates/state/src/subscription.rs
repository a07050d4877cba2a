//! Explicit subscriber registry
//!
//! The presentation layer registers listeners and receives the full state
//! snapshot after every change. No ambient subscription: a listener exists
//! exactly between `subscribe` and `unsubscribe`.

use parking_lot::Mutex;

/// Handle returned by `subscribe`; pass back to `unsubscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<S> = Box<dyn Fn(&S) + Send + Sync>;

struct Registry<S> {
    next_id: u64,
    listeners: Vec<(u64, Listener<S>)>,
}

/// Listener registry for one store's state type.
///
/// Listeners run on the thread that performed the mutation, with the
/// registry lock held; they must not subscribe or unsubscribe from inside
/// the callback.
pub struct Subscribers<S> {
    registry: Mutex<Registry<S>>,
}

impl<S> Subscribers<S> {
    pub fn new() -> Self {
        Subscribers {
            registry: Mutex::new(Registry {
                next_id: 0,
                listeners: Vec::new(),
            }),
        }
    }

    /// Register `listener`; it fires on every subsequent state change.
    pub fn subscribe(&self, listener: impl Fn(&S) + Send + Sync + 'static) -> SubscriptionId {
        let mut registry = self.registry.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, Box::new(listener)));
        SubscriptionId(id)
    }

    /// Remove a listener. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.registry
            .lock()
            .listeners
            .retain(|(listener_id, _)| *listener_id != id.0);
    }

    /// Deliver `state` to every registered listener.
    pub fn notify(&self, state: &S) {
        for (_, listener) in self.registry.lock().listeners.iter() {
            listener(state);
        }
    }

    pub fn len(&self) -> usize {
        self.registry.lock().listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S> Default for Subscribers<S> {
    fn default() -> Self {
        Self::new()
    }
}
