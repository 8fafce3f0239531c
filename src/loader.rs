use std::collections::HashMap;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::data::model::PipelineResult;
use crate::data::parser::{RecordFormat, parse_as};
use crate::data::pipeline::transform;
use crate::error::LoadError;
use crate::state::{LoadState, StateStore};

// ---------------------------------------------------------------------------
// Byte sources
// ---------------------------------------------------------------------------

/// Where raw record bytes come from.
pub trait ByteSource: Send + Sync {
    /// Read the whole named source. Missing or unreadable sources are an
    /// `io::Error`.
    fn fetch(&self, name: &str) -> io::Result<Vec<u8>>;
}

/// Reads `<root>/<name>` from the filesystem.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirSource { root: root.into() }
    }
}

impl ByteSource for DirSource {
    fn fetch(&self, name: &str) -> io::Result<Vec<u8>> {
        std::fs::read(self.root.join(name))
    }
}

/// Named byte blobs held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    entries: HashMap<String, Vec<u8>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.entries.insert(name.into(), bytes.into());
        self
    }
}

impl ByteSource for StaticSource {
    fn fetch(&self, name: &str) -> io::Result<Vec<u8>> {
        self.entries.get(name).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no entry named '{name}'"))
        })
    }
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// Runs fetch → parse → transform and publishes the outcome to a store.
///
/// Every load sets `Loading` first and then exactly one of `Ready` or
/// `Failed`. Errors never escape: they become `Failed(message)`.
#[derive(Clone)]
pub struct Loader {
    source: Arc<dyn ByteSource>,
    store: StateStore,
    name: String,
}

impl Loader {
    pub fn new(source: Arc<dyn ByteSource>, store: StateStore, name: impl Into<String>) -> Self {
        Loader {
            source,
            store,
            name: name.into(),
        }
    }

    /// Start a load on a background thread.
    ///
    /// `Loading` is published before this returns. Overlapping loads are not
    /// cancelled; whichever finishes last wins. Callers needing strict
    /// ordering wait on the returned handle before loading again.
    pub fn load(&self) -> LoadHandle {
        self.store.set(LoadState::Loading);

        let source = Arc::clone(&self.source);
        let store = self.store.clone();
        let name = self.name.clone();
        let spawned = thread::Builder::new()
            .name("grouplist-loader".into())
            .spawn(move || store.set(run(source.as_ref(), &name)));

        match spawned {
            Ok(handle) => LoadHandle(Some(handle)),
            Err(e) => {
                log::error!("could not start loader thread: {e}");
                self.store
                    .set(LoadState::Failed(format!("Failed to load items: {e}")));
                LoadHandle(None)
            }
        }
    }

    /// Load on the calling thread and return the terminal state.
    pub fn load_blocking(&self) -> LoadState {
        self.store.set(LoadState::Loading);
        let outcome = run(self.source.as_ref(), &self.name);
        self.store.set(outcome.clone());
        outcome
    }
}

/// Handle on an in-flight background load.
#[derive(Debug)]
pub struct LoadHandle(Option<JoinHandle<()>>);

impl LoadHandle {
    /// Block until the load has published its terminal state.
    pub fn wait(self) {
        if let Some(handle) = self.0 {
            if handle.join().is_err() {
                log::error!("loader thread panicked");
            }
        }
    }
}

fn run(source: &dyn ByteSource, name: &str) -> LoadState {
    log::info!("loading records from '{name}'");
    let built = panic::catch_unwind(AssertUnwindSafe(|| fetch_and_build(source, name)))
        .unwrap_or_else(|payload| Err(LoadError::Panicked(panic_message(payload.as_ref()))));
    match built {
        Ok(result) => {
            log::info!(
                "loaded {} records in {} groups from '{name}'",
                result.record_count(),
                result.len()
            );
            LoadState::ready(result)
        }
        Err(e) => {
            log::error!("failed to load '{name}': {e}");
            LoadState::Failed(e.failure_message())
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

fn fetch_and_build(source: &dyn ByteSource, name: &str) -> Result<PipelineResult, LoadError> {
    let raw = source
        .fetch(name)
        .map_err(|source| LoadError::SourceUnavailable {
            name: name.to_string(),
            source,
        })?;
    let format = RecordFormat::from_name(name)?;
    let records = parse_as(format, &raw)?;
    log::debug!("decoded {} records ({} bytes)", records.len(), raw.len());
    Ok(transform(records))
}
