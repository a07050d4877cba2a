//! Embedded document store
//!
//! Two collections (`workspaces`, `posts`) with a `by-workspace` secondary
//! index over posts. All writes go through `commit`, which stages the whole
//! batch on a copy of the tables, persists it, and only then publishes it.
//! A storage failure aborts the entire batch with no partial state visible.
//!
//! # Thread Safety
//!
//! `Database` is `Send + Sync` and is shared as `Arc<Database>`. Racing
//! writers are serialized by the table lock; between two independent user
//! actions on the same record, last write wins.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use parking_lot::{Mutex, RwLock};
use quill_core::{
    new_record_id, now, Error, Post, PostDraft, Result, Workspace, WorkspaceDraft,
    DEFAULT_WORKSPACE_ID,
};
use tracing::{debug, warn};

use crate::seed::SeedSource;
use crate::snapshot::{self, Snapshot};

/// Number of posts synthesized on first-ever initialization.
const SEED_POST_COUNT: usize = 2;

/// In-memory tables plus the derived secondary index.
#[derive(Debug, Clone, Default)]
struct Tables {
    workspaces: HashMap<String, Workspace>,
    posts: HashMap<String, Post>,
    /// workspace id -> post ids. Derived lookup, not containment: rebuilt
    /// from the posts collection on load, maintained on every post write.
    by_workspace: HashMap<String, BTreeSet<String>>,
}

impl Tables {
    fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut tables = Tables::default();
        for ws in snapshot.workspaces {
            tables.workspaces.insert(ws.id.clone(), ws);
        }
        for post in snapshot.posts {
            tables.insert_post(post);
        }
        tables
    }

    fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            workspaces: self.workspaces.values().cloned().collect(),
            posts: self.posts.values().cloned().collect(),
        }
    }

    /// Insert or replace a post, keeping the index in step.
    fn insert_post(&mut self, post: Post) {
        let previous_workspace = self
            .posts
            .get(&post.id)
            .map(|existing| existing.workspace_id.clone());
        if let Some(previous_workspace) = previous_workspace {
            if previous_workspace != post.workspace_id {
                self.unindex(&previous_workspace, &post.id);
            }
        }
        self.by_workspace
            .entry(post.workspace_id.clone())
            .or_default()
            .insert(post.id.clone());
        self.posts.insert(post.id.clone(), post);
    }

    fn remove_post(&mut self, id: &str) -> Option<Post> {
        let post = self.posts.remove(id)?;
        self.unindex(&post.workspace_id, id);
        Some(post)
    }

    fn unindex(&mut self, workspace_id: &str, post_id: &str) {
        if let Some(ids) = self.by_workspace.get_mut(workspace_id) {
            ids.remove(post_id);
            if ids.is_empty() {
                self.by_workspace.remove(workspace_id);
            }
        }
    }
}

/// The Local Store: durable, versioned storage of workspaces and posts.
///
/// Construct with [`Database::open`] (durable) or [`Database::in_memory`]
/// (tests, no file). The durable state on disk is the source of truth; the
/// in-memory tables are its loaded image.
pub struct Database {
    /// Snapshot path; `None` for in-memory stores.
    path: Option<PathBuf>,
    tables: RwLock<Tables>,
    /// Once-per-process-lifetime seeding guard. Held for the duration of
    /// seeding so concurrent initializers converge on a single attempt.
    seeded: Mutex<bool>,
}

impl Database {
    /// Open (or create) the store at `path`.
    ///
    /// Loads the snapshot if present, applies schema upgrades, and ensures
    /// the default workspace exists. Idempotent: reopening an existing store
    /// changes nothing. Does not seed posts; see [`Database::initialize`].
    pub fn open(path: impl AsRef<Path>) -> Result<Database> {
        let path = path.as_ref().to_path_buf();
        let snapshot = snapshot::load(&path)?.unwrap_or_default();
        let tables = Tables::from_snapshot(snapshot);

        debug!(
            path = %path.display(),
            workspaces = tables.workspaces.len(),
            posts = tables.posts.len(),
            "opened store"
        );

        let db = Database {
            path: Some(path),
            tables: RwLock::new(tables),
            seeded: Mutex::new(false),
        };
        db.ensure_default_workspace()?;
        Ok(db)
    }

    /// Open a store with no backing file. Data lives only in memory.
    pub fn in_memory() -> Result<Database> {
        let db = Database {
            path: None,
            tables: RwLock::new(Tables::default()),
            seeded: Mutex::new(false),
        };
        db.ensure_default_workspace()?;
        Ok(db)
    }

    fn ensure_default_workspace(&self) -> Result<()> {
        let present = self
            .tables
            .read()
            .workspaces
            .contains_key(DEFAULT_WORKSPACE_ID);
        if present {
            return Ok(());
        }
        self.commit(|tables| {
            // Re-check under the write lock; another opener may have won.
            if !tables.workspaces.contains_key(DEFAULT_WORKSPACE_ID) {
                let ws = Workspace::default_workspace();
                tables.workspaces.insert(ws.id.clone(), ws);
            }
            Ok(())
        })
    }

    /// One-time seeding of generated posts.
    ///
    /// Idempotent per process lifetime. When the posts collection is empty,
    /// synthesizes [`SEED_POST_COUNT`] posts from `seed` and inserts them in
    /// one atomic batch. Seeding is best-effort: a generation or storage
    /// failure is logged and leaves the store usable with no posts.
    pub fn initialize(&self, seed: &dyn SeedSource) -> Result<()> {
        let mut seeded = self.seeded.lock();
        if *seeded {
            return Ok(());
        }
        *seeded = true;

        if !self.tables.read().posts.is_empty() {
            return Ok(());
        }

        let mut generated = Vec::with_capacity(SEED_POST_COUNT);
        for _ in 0..SEED_POST_COUNT {
            match seed.generate_seed_post() {
                Ok(pair) => generated.push(pair),
                Err(e) => {
                    warn!(error = %e, "seed generation failed; skipping initial posts");
                    return Ok(());
                }
            }
        }

        let result = self.commit(|tables| {
            for (title, content) in generated.drain(..) {
                let ts = now();
                let post = Post {
                    id: new_record_id(),
                    title,
                    content,
                    workspace_id: DEFAULT_WORKSPACE_ID.to_string(),
                    created_at: ts,
                    updated_at: ts,
                    tags: None,
                };
                tables.insert_post(post);
            }
            Ok(())
        });

        if let Err(e) = result {
            warn!(error = %e, "failed to store seed posts");
        }
        Ok(())
    }

    /// Flush the current tables to disk. No-op for in-memory stores.
    pub fn flush(&self) -> Result<()> {
        let tables = self.tables.read();
        self.persist(&tables)
    }

    // ========================================================================
    // Workspace operations
    // ========================================================================

    /// All workspaces. Ordering is unspecified; sort at the caller.
    pub fn list_workspaces(&self) -> Result<Vec<Workspace>> {
        Ok(self.tables.read().workspaces.values().cloned().collect())
    }

    /// Workspace by id, `Ok(None)` when absent.
    pub fn get_workspace(&self, id: &str) -> Result<Option<Workspace>> {
        Ok(self.tables.read().workspaces.get(id).cloned())
    }

    /// Create a workspace from a draft. Generates the id, stamps both
    /// timestamps, returns the stored record.
    pub fn create_workspace(&self, draft: WorkspaceDraft) -> Result<Workspace> {
        let ts = now();
        let ws = Workspace {
            id: new_record_id(),
            name: draft.name,
            description: draft.description,
            created_at: ts,
            updated_at: ts,
        };
        let stored = ws.clone();
        self.commit(move |tables| {
            tables.workspaces.insert(ws.id.clone(), ws);
            Ok(())
        })?;
        Ok(stored)
    }

    /// Full upsert of an existing workspace keyed by `record.id`.
    ///
    /// Overwrites every field and refreshes `updated_at`. Updating an id
    /// that does not exist is an input error, not an insert.
    pub fn update_workspace(&self, mut record: Workspace) -> Result<Workspace> {
        record.updated_at = now();
        let stored = record.clone();
        self.commit(move |tables| {
            if !tables.workspaces.contains_key(&record.id) {
                return Err(Error::NotFound {
                    entity: "workspace",
                    id: record.id.clone(),
                });
            }
            tables.workspaces.insert(record.id.clone(), record);
            Ok(())
        })?;
        Ok(stored)
    }

    /// Delete a workspace and reassign its posts to the default workspace.
    ///
    /// The removal and every reassignment (each with a refreshed
    /// `updated_at`) form one atomic batch: either all of it lands or none
    /// of it does. The posts themselves are never deleted. Deleting the
    /// default workspace is rejected.
    pub fn delete_workspace(&self, id: &str) -> Result<()> {
        if id == DEFAULT_WORKSPACE_ID {
            return Err(Error::DefaultWorkspaceImmutable);
        }
        let id = id.to_string();
        self.commit(move |tables| {
            if tables.workspaces.remove(&id).is_none() {
                return Err(Error::NotFound {
                    entity: "workspace",
                    id: id.clone(),
                });
            }

            let orphaned: Vec<String> = tables
                .by_workspace
                .get(&id)
                .map(|ids| ids.iter().cloned().collect())
                .unwrap_or_default();
            for post_id in orphaned {
                if let Some(mut post) = tables.remove_post(&post_id) {
                    post.workspace_id = DEFAULT_WORKSPACE_ID.to_string();
                    post.updated_at = now();
                    tables.insert_post(post);
                }
            }
            Ok(())
        })
    }

    // ========================================================================
    // Post operations
    // ========================================================================

    /// All posts. Ordering is unspecified; sort at the caller.
    pub fn list_posts(&self) -> Result<Vec<Post>> {
        Ok(self.tables.read().posts.values().cloned().collect())
    }

    /// Posts belonging to `workspace_id`, via the secondary index.
    ///
    /// An unknown workspace id yields an empty vec, never an error.
    pub fn posts_by_workspace(&self, workspace_id: &str) -> Result<Vec<Post>> {
        let tables = self.tables.read();
        let ids = match tables.by_workspace.get(workspace_id) {
            Some(ids) => ids,
            None => return Ok(Vec::new()),
        };
        Ok(ids
            .iter()
            .filter_map(|id| tables.posts.get(id).cloned())
            .collect())
    }

    /// Post by id, `Ok(None)` when absent.
    pub fn get_post(&self, id: &str) -> Result<Option<Post>> {
        Ok(self.tables.read().posts.get(id).cloned())
    }

    /// Create a post from a draft. An empty `workspace_id` assigns the
    /// default workspace; a non-empty one must resolve.
    pub fn create_post(&self, draft: PostDraft) -> Result<Post> {
        let workspace_id = if draft.workspace_id.is_empty() {
            DEFAULT_WORKSPACE_ID.to_string()
        } else {
            draft.workspace_id
        };
        let ts = now();
        let post = Post {
            id: new_record_id(),
            title: draft.title,
            content: draft.content,
            workspace_id,
            created_at: ts,
            updated_at: ts,
            tags: draft.tags,
        };
        let stored = post.clone();
        self.commit(move |tables| {
            if !tables.workspaces.contains_key(&post.workspace_id) {
                return Err(Error::WorkspaceNotFound {
                    id: post.workspace_id.clone(),
                });
            }
            tables.insert_post(post);
            Ok(())
        })?;
        Ok(stored)
    }

    /// Full upsert of an existing post keyed by `record.id`.
    ///
    /// No partial-patch semantics: every field is overwritten with the
    /// caller's record, and `updated_at` is refreshed. The referenced
    /// workspace must resolve.
    pub fn update_post(&self, mut record: Post) -> Result<Post> {
        record.updated_at = now();
        let stored = record.clone();
        self.commit(move |tables| {
            if !tables.posts.contains_key(&record.id) {
                return Err(Error::NotFound {
                    entity: "post",
                    id: record.id.clone(),
                });
            }
            if !tables.workspaces.contains_key(&record.workspace_id) {
                return Err(Error::WorkspaceNotFound {
                    id: record.workspace_id.clone(),
                });
            }
            tables.insert_post(record);
            Ok(())
        })?;
        Ok(stored)
    }

    /// Delete a post record. Nothing cascades.
    pub fn delete_post(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.commit(move |tables| {
            if tables.remove_post(&id).is_none() {
                return Err(Error::NotFound {
                    entity: "post",
                    id: id.clone(),
                });
            }
            Ok(())
        })
    }

    // ========================================================================
    // Write path
    // ========================================================================

    /// Stage a batch on a copy of the tables, persist it, then publish it.
    ///
    /// If `f` fails (input validation) or persistence fails (storage error),
    /// the live tables are untouched and the whole batch aborts.
    fn commit<T>(&self, f: impl FnOnce(&mut Tables) -> Result<T>) -> Result<T> {
        let mut guard = self.tables.write();
        let mut staged = guard.clone();
        let out = f(&mut staged)?;
        self.persist(&staged)?;
        *guard = staged;
        Ok(out)
    }

    fn persist(&self, tables: &Tables) -> Result<()> {
        match &self.path {
            Some(path) => snapshot::save(path, &tables.to_snapshot()),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tables = self.tables.read();
        f.debug_struct("Database")
            .field("path", &self.path)
            .field("workspaces", &tables.workspaces.len())
            .field("posts", &tables.posts.len())
            .finish()
    }
}
