//! UI state store
//!
//! Pure presentation state; nothing here touches the local store.

use parking_lot::Mutex;

use crate::subscription::{Subscribers, SubscriptionId};

#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub sidebar_collapsed: bool,
}

/// Observable holder of presentation-only flags.
pub struct UiStore {
    state: Mutex<UiState>,
    subscribers: Subscribers<UiState>,
}

impl UiStore {
    pub fn new() -> Self {
        UiStore {
            state: Mutex::new(UiState::default()),
            subscribers: Subscribers::new(),
        }
    }

    pub fn snapshot(&self) -> UiState {
        self.state.lock().clone()
    }

    pub fn subscribe(
        &self,
        listener: impl Fn(&UiState) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.subscribers.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.unsubscribe(id);
    }

    pub fn toggle_sidebar(&self) {
        let mut state = self.state.lock();
        state.sidebar_collapsed = !state.sidebar_collapsed;
        let snapshot = state.clone();
        drop(state);
        self.subscribers.notify(&snapshot);
    }

    pub fn set_sidebar_collapsed(&self, collapsed: bool) {
        let mut state = self.state.lock();
        state.sidebar_collapsed = collapsed;
        let snapshot = state.clone();
        drop(state);
        self.subscribers.notify(&snapshot);
    }
}

impl Default for UiStore {
    fn default() -> Self {
        Self::new()
    }
}
