use std::sync::Arc;

use crate::loader::{ByteSource, DirSource, LoadHandle, Loader};
use crate::state::{LoadState, StateStore, Subscription};

// ---------------------------------------------------------------------------
// Session: one store plus the loader that feeds it
// ---------------------------------------------------------------------------

/// Owns the state store for one session. Presentation code only talks to
/// [`state`](Self::state) or [`subscribe`](Self::subscribe).
pub struct GroupListApp {
    store: StateStore,
    loader: Loader,
}

impl GroupListApp {
    /// Build a session without starting a load.
    pub fn new(source: Arc<dyn ByteSource>, name: impl Into<String>) -> Self {
        let store = StateStore::new();
        let loader = Loader::new(source, store.clone(), name);
        Self { store, loader }
    }

    /// Build a session over an asset directory and start the first load.
    pub fn launch(asset_dir: impl Into<std::path::PathBuf>, name: &str) -> (Self, LoadHandle) {
        let app = Self::new(Arc::new(DirSource::new(asset_dir)), name);
        let handle = app.reload();
        (app, handle)
    }

    pub fn state(&self) -> LoadState {
        self.store.current()
    }

    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&LoadState) + Send + Sync + 'static,
    {
        self.store.subscribe(observer)
    }

    /// Run the pipeline again, replacing the published result.
    pub fn reload(&self) -> LoadHandle {
        self.loader.load()
    }
}
