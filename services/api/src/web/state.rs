//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the per-session edit state.

use crate::config::Config;
use chrono::{DateTime, Utc};
use page_builder_core::ports::{ImageUploader, PageRepository};
use page_builder_core::store::DocumentStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

//=========================================================================================
// AppState (Shared Across All Connections)
//=========================================================================================

/// The shared application state, created once at startup and passed to all
/// handlers.
#[derive(Clone)]
pub struct AppState {
    pub pages: Arc<dyn PageRepository>,
    pub images: Arc<dyn ImageUploader>,
    pub config: Arc<Config>,
    pub sessions: SessionRegistry,
}

//=========================================================================================
// EditSession (Specific to One Editing Session)
//=========================================================================================

/// The state for a single active edit session: one document store, owned by
/// one editor.
///
/// `epoch` tags in-flight saves with the document identity they were issued
/// for; it is bumped on every load/reset so a save result that lands after
/// the session moved on is recognizably stale and discarded. The
/// cancellation token aborts in-flight work when the session is closed.
pub struct EditSession {
    pub id: Uuid,
    pub store: DocumentStore,
    pub epoch: u64,
    pub cancel: CancellationToken,
    pub opened_at: DateTime<Utc>,
    pub last_touched: DateTime<Utc>,
}

impl EditSession {
    pub fn new(pages: Arc<dyn PageRepository>) -> Self {
        Self {
            id: Uuid::new_v4(),
            store: DocumentStore::new(pages),
            epoch: 0,
            cancel: CancellationToken::new(),
            opened_at: Utc::now(),
            last_touched: Utc::now(),
        }
    }

    /// Marks the start of a new document identity. Any save issued under the
    /// previous epoch will be discarded when it settles.
    pub fn bump_epoch(&mut self) {
        self.epoch += 1;
    }

    pub fn touch(&mut self) {
        self.last_touched = Utc::now();
    }
}

//=========================================================================================
// SessionRegistry
//=========================================================================================

/// All live edit sessions, keyed by session id.
///
/// Each session sits behind its own mutex, which makes the session the
/// single writer of its document store; the registry lock is only held long
/// enough to clone the session handle out.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<Mutex<HashMap<Uuid, Arc<Mutex<EditSession>>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, session: EditSession) -> (Uuid, Arc<Mutex<EditSession>>) {
        let id = session.id;
        let handle = Arc::new(Mutex::new(session));
        self.inner.lock().await.insert(id, handle.clone());
        (id, handle)
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<Mutex<EditSession>>> {
        self.inner.lock().await.get(&id).cloned()
    }

    pub async fn remove(&self, id: Uuid) -> Option<Arc<Mutex<EditSession>>> {
        self.inner.lock().await.remove(&id)
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }
}
