//! Workspace entity store

use std::sync::Arc;

use parking_lot::Mutex;
use quill_core::{Result, Workspace, WorkspaceDraft};
use quill_store::Database;

use crate::subscription::{Subscribers, SubscriptionId};

/// Presentation-facing state mirrored from the local store.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceState {
    pub workspaces: Vec<Workspace>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Observable cache of the workspaces collection.
///
/// The durable store remains the source of truth; this cache is refreshed
/// on every fetch and merged in place after each mutation.
pub struct WorkspaceStore {
    db: Arc<Database>,
    state: Mutex<WorkspaceState>,
    subscribers: Subscribers<WorkspaceState>,
}

impl WorkspaceStore {
    pub fn new(db: Arc<Database>) -> Self {
        WorkspaceStore {
            db,
            state: Mutex::new(WorkspaceState::default()),
            subscribers: Subscribers::new(),
        }
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> WorkspaceState {
        self.state.lock().clone()
    }

    pub fn subscribe(
        &self,
        listener: impl Fn(&WorkspaceState) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.subscribers.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.unsubscribe(id);
    }

    /// Re-read every workspace from the local store into the cache.
    pub fn fetch_all(&self) -> Result<()> {
        self.begin();
        match self.db.list_workspaces() {
            Ok(workspaces) => {
                self.settle(|state| state.workspaces = workspaces);
                Ok(())
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    /// Read one workspace straight from the local store.
    ///
    /// Does not touch the cache or the loading flag; a failure is still
    /// recorded as the store error.
    pub fn get_one(&self, id: &str) -> Result<Option<Workspace>> {
        match self.db.get_workspace(id) {
            Ok(found) => Ok(found),
            Err(e) => {
                let mut state = self.state.lock();
                state.error = Some(e.to_string());
                let snapshot = state.clone();
                drop(state);
                self.subscribers.notify(&snapshot);
                Err(e)
            }
        }
    }

    /// Create a workspace and append it to the cache.
    pub fn create(&self, draft: WorkspaceDraft) -> Result<Workspace> {
        self.begin();
        match self.db.create_workspace(draft) {
            Ok(created) => {
                let returned = created.clone();
                self.settle(|state| state.workspaces.push(created));
                Ok(returned)
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    /// Update a workspace, replacing the cached record by id.
    pub fn update(&self, record: Workspace) -> Result<Workspace> {
        self.begin();
        match self.db.update_workspace(record) {
            Ok(updated) => {
                let returned = updated.clone();
                self.settle(|state| {
                    if let Some(slot) = state
                        .workspaces
                        .iter_mut()
                        .find(|ws| ws.id == updated.id)
                    {
                        *slot = updated;
                    }
                });
                Ok(returned)
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    /// Delete a workspace and remove it from the cache by id.
    ///
    /// The consequent post reassignment is atomic inside the local store;
    /// the post cache sees it only on its next fetch.
    pub fn delete(&self, id: &str) -> Result<()> {
        self.begin();
        match self.db.delete_workspace(id) {
            Ok(()) => {
                self.settle(|state| state.workspaces.retain(|ws| ws.id != id));
                Ok(())
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    fn begin(&self) {
        let mut state = self.state.lock();
        state.loading = true;
        state.error = None;
        let snapshot = state.clone();
        drop(state);
        self.subscribers.notify(&snapshot);
    }

    fn settle(&self, merge: impl FnOnce(&mut WorkspaceState)) {
        let mut state = self.state.lock();
        merge(&mut state);
        state.loading = false;
        let snapshot = state.clone();
        drop(state);
        self.subscribers.notify(&snapshot);
    }

    fn fail(&self, error: &quill_core::Error) {
        let mut state = self.state.lock();
        state.error = Some(error.to_string());
        state.loading = false;
        let snapshot = state.clone();
        drop(state);
        self.subscribers.notify(&snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::DEFAULT_WORKSPACE_ID;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn store() -> WorkspaceStore {
        WorkspaceStore::new(Arc::new(Database::in_memory().unwrap()))
    }

    #[test]
    fn test_fetch_all_fills_cache() {
        let store = store();
        assert!(store.snapshot().workspaces.is_empty());

        store.fetch_all().unwrap();
        let state = store.snapshot();
        assert_eq!(state.workspaces.len(), 1);
        assert_eq!(state.workspaces[0].id, DEFAULT_WORKSPACE_ID);
        assert!(!state.loading);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_create_appends_to_cache() {
        let store = store();
        store.fetch_all().unwrap();

        let created = store
            .create(WorkspaceDraft {
                name: "Research".to_string(),
                description: None,
            })
            .unwrap();

        let state = store.snapshot();
        assert_eq!(state.workspaces.len(), 2);
        assert!(state.workspaces.iter().any(|ws| ws.id == created.id));
    }

    #[test]
    fn test_update_replaces_by_id() {
        let store = store();
        store.fetch_all().unwrap();
        let created = store
            .create(WorkspaceDraft {
                name: "Before".to_string(),
                description: None,
            })
            .unwrap();

        store
            .update(Workspace {
                name: "After".to_string(),
                ..created.clone()
            })
            .unwrap();

        let state = store.snapshot();
        let cached = state
            .workspaces
            .iter()
            .find(|ws| ws.id == created.id)
            .unwrap();
        assert_eq!(cached.name, "After");
        assert_eq!(state.workspaces.len(), 2);
    }

    #[test]
    fn test_delete_removes_by_id() {
        let store = store();
        store.fetch_all().unwrap();
        let created = store
            .create(WorkspaceDraft {
                name: "Doomed".to_string(),
                description: None,
            })
            .unwrap();

        store.delete(&created.id).unwrap();
        let state = store.snapshot();
        assert_eq!(state.workspaces.len(), 1);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_failure_sets_error_and_reraises() {
        let store = store();
        store.fetch_all().unwrap();

        let err = store.delete(DEFAULT_WORKSPACE_ID).unwrap_err();
        let state = store.snapshot();
        assert_eq!(state.error.as_deref(), Some(err.to_string().as_str()));
        assert!(!state.loading);
        // Cache untouched by the failed delete
        assert_eq!(state.workspaces.len(), 1);
    }

    #[test]
    fn test_error_clears_on_next_operation() {
        let store = store();
        store.fetch_all().unwrap();
        let _ = store.delete(DEFAULT_WORKSPACE_ID);
        assert!(store.snapshot().error.is_some());

        store.fetch_all().unwrap();
        assert!(store.snapshot().error.is_none());
    }

    #[test]
    fn test_subscribers_observe_changes() {
        let store = store();
        let notifications = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&notifications);
        let id = store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        // begin + settle
        store.fetch_all().unwrap();
        assert_eq!(notifications.load(Ordering::SeqCst), 2);

        store.unsubscribe(id);
        store.fetch_all().unwrap();
        assert_eq!(notifications.load(Ordering::SeqCst), 2);
    }
}
