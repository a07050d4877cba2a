//! Debounced edit writer
//!
//! Rapid edit events for a post coalesce into a single durable write: each
//! `submit` replaces the pending record for that post id, and a worker
//! thread flushes whatever is pending once no edit has arrived for the
//! quiet period. Dropping the flusher flushes synchronously, so a teardown
//! mid-quiet-period never loses the pending write.

use std::collections::HashMap;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use quill_core::Post;
use quill_store::Database;
use tracing::{debug, warn};

/// Quiet period before a pending edit is written out.
pub const QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Coalesces rapid post edits into single durable writes.
pub struct EditFlusher {
    tx: Option<Sender<Post>>,
    worker: Option<JoinHandle<()>>,
}

impl EditFlusher {
    pub fn new(db: Arc<Database>) -> Self {
        Self::with_quiet_period(db, QUIET_PERIOD)
    }

    /// Explicit quiet period, mainly for tests.
    pub fn with_quiet_period(db: Arc<Database>, quiet_period: Duration) -> Self {
        let (tx, rx) = mpsc::channel::<Post>();

        let worker = thread::spawn(move || {
            let mut pending: HashMap<String, Post> = HashMap::new();
            loop {
                // Block indefinitely while idle; tick on the quiet period
                // only when something is pending.
                let received = if pending.is_empty() {
                    rx.recv().map_err(|_| RecvTimeoutError::Disconnected)
                } else {
                    rx.recv_timeout(quiet_period)
                };

                match received {
                    Ok(post) => {
                        pending.insert(post.id.clone(), post);
                    }
                    Err(RecvTimeoutError::Timeout) => {
                        flush(&db, &mut pending);
                    }
                    Err(RecvTimeoutError::Disconnected) => {
                        flush(&db, &mut pending);
                        break;
                    }
                }
            }
        });

        EditFlusher {
            tx: Some(tx),
            worker: Some(worker),
        }
    }

    /// Queue the latest version of an edited post. Replaces any pending
    /// version with the same id; the write happens after the quiet period.
    pub fn submit(&self, post: Post) {
        if let Some(tx) = &self.tx {
            if tx.send(post).is_err() {
                warn!("edit flusher worker is gone; edit dropped");
            }
        }
    }
}

impl Drop for EditFlusher {
    fn drop(&mut self) {
        // Closing the channel wakes the worker, which flushes and exits.
        drop(self.tx.take());
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("edit flusher worker panicked during shutdown");
            }
        }
    }
}

fn flush(db: &Database, pending: &mut HashMap<String, Post>) {
    for (id, post) in pending.drain() {
        match db.update_post(post) {
            Ok(_) => debug!(post_id = %id, "flushed pending edit"),
            // The post may have been deleted while the edit sat in the
            // quiet period; nothing left to write.
            Err(quill_core::Error::NotFound { .. }) => {
                debug!(post_id = %id, "pending edit targets a deleted post")
            }
            Err(e) => warn!(post_id = %id, error = %e, "failed to flush pending edit"),
        }
    }
}
