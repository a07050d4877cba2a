//! Post entity store

use std::sync::Arc;

use parking_lot::Mutex;
use quill_core::{Post, PostDraft, Result};
use quill_store::Database;

use crate::subscription::{Subscribers, SubscriptionId};

/// Presentation-facing state mirrored from the local store.
///
/// `posts` holds either the full collection (`fetch_all`) or one
/// workspace's slice (`fetch_by_workspace`), whichever was fetched last.
#[derive(Debug, Clone, Default)]
pub struct PostState {
    pub posts: Vec<Post>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Observable cache of the posts collection.
pub struct PostStore {
    db: Arc<Database>,
    state: Mutex<PostState>,
    subscribers: Subscribers<PostState>,
}

impl PostStore {
    pub fn new(db: Arc<Database>) -> Self {
        PostStore {
            db,
            state: Mutex::new(PostState::default()),
            subscribers: Subscribers::new(),
        }
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> PostState {
        self.state.lock().clone()
    }

    pub fn subscribe(
        &self,
        listener: impl Fn(&PostState) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.subscribers.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.unsubscribe(id);
    }

    /// Re-read every post from the local store into the cache.
    pub fn fetch_all(&self) -> Result<()> {
        self.begin();
        match self.db.list_posts() {
            Ok(posts) => {
                self.settle(|state| state.posts = posts);
                Ok(())
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    /// Re-read one workspace's posts (secondary index) into the cache.
    pub fn fetch_by_workspace(&self, workspace_id: &str) -> Result<()> {
        self.begin();
        match self.db.posts_by_workspace(workspace_id) {
            Ok(posts) => {
                self.settle(|state| state.posts = posts);
                Ok(())
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    /// Read one post straight from the local store; cache untouched.
    pub fn get_one(&self, id: &str) -> Result<Option<Post>> {
        match self.db.get_post(id) {
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

    /// Create a post and append it to the cache.
    pub fn create(&self, draft: PostDraft) -> Result<Post> {
        self.begin();
        match self.db.create_post(draft) {
            Ok(created) => {
                let returned = created.clone();
                self.settle(|state| state.posts.push(created));
                Ok(returned)
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    /// Update a post, replacing the cached record by id.
    pub fn update(&self, record: Post) -> Result<Post> {
        self.begin();
        match self.db.update_post(record) {
            Ok(updated) => {
                let returned = updated.clone();
                self.settle(|state| {
                    if let Some(slot) =
                        state.posts.iter_mut().find(|post| post.id == updated.id)
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

    /// Delete a post and remove it from the cache by id.
    pub fn delete(&self, id: &str) -> Result<()> {
        self.begin();
        match self.db.delete_post(id) {
            Ok(()) => {
                self.settle(|state| state.posts.retain(|post| post.id != id));
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

    fn settle(&self, merge: impl FnOnce(&mut PostState)) {
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
