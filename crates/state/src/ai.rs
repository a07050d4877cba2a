//! AI-call entity store
//!
//! Tracks one in-flight generation at a time: a `generating` flag and the
//! last error. The generated text goes back to the caller, not into any
//! cache; the editor decides where it lands.

use std::sync::Arc;

use parking_lot::Mutex;
use quill_core::Result;
use quill_gateway::{GatewayClient, QuickAction};

use crate::subscription::{Subscribers, SubscriptionId};

#[derive(Debug, Clone, Default)]
pub struct AiState {
    pub generating: bool,
    pub error: Option<String>,
}

/// Observable wrapper around the gateway client.
pub struct AiStore {
    client: Arc<GatewayClient>,
    state: Mutex<AiState>,
    subscribers: Subscribers<AiState>,
}

impl AiStore {
    pub fn new(client: Arc<GatewayClient>) -> Self {
        AiStore {
            client,
            state: Mutex::new(AiState::default()),
            subscribers: Subscribers::new(),
        }
    }

    pub fn snapshot(&self) -> AiState {
        self.state.lock().clone()
    }

    pub fn subscribe(
        &self,
        listener: impl Fn(&AiState) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.subscribers.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.unsubscribe(id);
    }

    /// Custom-prompt generation with the default system instruction.
    pub fn generate(&self, prompt: &str) -> Result<String> {
        self.run(|client| client.generate(prompt, None))
    }

    /// One of the editor's quick actions over `text`.
    pub fn quick_action(&self, action: QuickAction, text: &str) -> Result<String> {
        self.run(|client| client.quick_action(action, text))
    }

    fn run(&self, call: impl FnOnce(&GatewayClient) -> Result<String>) -> Result<String> {
        {
            let mut state = self.state.lock();
            state.generating = true;
            state.error = None;
            let snapshot = state.clone();
            drop(state);
            self.subscribers.notify(&snapshot);
        }

        let result = call(&self.client);

        let mut state = self.state.lock();
        state.generating = false;
        if let Err(e) = &result {
            state.error = Some(e.to_string());
        }
        let snapshot = state.clone();
        drop(state);
        self.subscribers.notify(&snapshot);

        result
    }
}
