use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::thread::{self, ThreadId};

use crate::data::model::PipelineResult;

// ---------------------------------------------------------------------------
// LoadState – the published value
// ---------------------------------------------------------------------------

/// Phase of the current load. Exactly one variant is current at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    /// Shared so every observer sees the same immutable result.
    Ready(Arc<PipelineResult>),
    Failed(String),
}

impl LoadState {
    pub fn ready(result: PipelineResult) -> Self {
        LoadState::Ready(Arc::new(result))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn result(&self) -> Option<&PipelineResult> {
        match self {
            LoadState::Ready(result) => Some(result),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Same variant and same payload. `Ready` payloads compare by identity.
    fn same_as(&self, other: &LoadState) -> bool {
        match (self, other) {
            (LoadState::Loading, LoadState::Loading) => true,
            (LoadState::Ready(a), LoadState::Ready(b)) => Arc::ptr_eq(a, b),
            (LoadState::Failed(a), LoadState::Failed(b)) => a == b,
            _ => false,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            LoadState::Loading => "Loading",
            LoadState::Ready(_) => "Ready",
            LoadState::Failed(_) => "Failed",
        }
    }
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

type Callback = dyn Fn(&LoadState) + Send + Sync;

struct Observer {
    id: u64,
    /// Transitions at or below this version happened before registration.
    since: u64,
    active: AtomicBool,
    callback: Box<Callback>,
}

struct Registry {
    current: LoadState,
    version: u64,
    observers: Vec<Arc<Observer>>,
    /// Transitions not yet delivered, oldest first.
    backlog: VecDeque<(u64, LoadState)>,
    next_id: u64,
    /// Thread currently running a notification pass.
    notifying: Option<ThreadId>,
}

struct Shared {
    registry: Mutex<Registry>,
    /// Held for the whole of a notification pass.
    pass: Mutex<()>,
}

impl Shared {
    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn pass(&self) -> MutexGuard<'_, ()> {
        self.pass.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_notifying_thread(&self) -> bool {
        self.registry().notifying == Some(thread::current().id())
    }

    /// Deliver every queued transition. Caller holds the pass lock.
    fn drain(&self) {
        let _marker = NotifyingMarker::enter(self);
        loop {
            let (version, state, observers) = {
                let mut reg = self.registry();
                match reg.backlog.pop_front() {
                    Some((version, state)) => (version, state, reg.observers.clone()),
                    None => return,
                }
            };
            for observer in observers {
                if observer.since < version && observer.active.load(Ordering::Acquire) {
                    (observer.callback)(&state);
                }
            }
        }
    }
}

/// Marks the current thread as notifying; cleared on drop, including unwinds
/// out of an observer.
struct NotifyingMarker<'a> {
    shared: &'a Shared,
}

impl<'a> NotifyingMarker<'a> {
    fn enter(shared: &'a Shared) -> Self {
        shared.registry().notifying = Some(thread::current().id());
        NotifyingMarker { shared }
    }
}

impl Drop for NotifyingMarker<'_> {
    fn drop(&mut self) {
        self.shared.registry().notifying = None;
    }
}

// ---------------------------------------------------------------------------
// StateStore
// ---------------------------------------------------------------------------

/// Holds the current [`LoadState`] and notifies subscribers on change.
///
/// Cloning gives another handle to the same store.
///
/// Notification passes never interleave: a pass for one transition finishes
/// before the next begins. Observers run on the thread that called
/// [`set`](Self::set). An observer may itself call `set` or `subscribe`;
/// nested transitions are delivered once the running pass completes.
#[derive(Clone)]
pub struct StateStore {
    shared: Arc<Shared>,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore {
    /// A fresh store, starting in [`LoadState::Loading`].
    pub fn new() -> Self {
        StateStore {
            shared: Arc::new(Shared {
                registry: Mutex::new(Registry {
                    current: LoadState::Loading,
                    version: 0,
                    observers: Vec::new(),
                    backlog: VecDeque::new(),
                    next_id: 0,
                    notifying: None,
                }),
                pass: Mutex::new(()),
            }),
        }
    }

    pub fn current(&self) -> LoadState {
        self.shared.registry().current.clone()
    }

    /// Number of live observers.
    pub fn observer_count(&self) -> usize {
        self.shared.registry().observers.len()
    }

    /// Replace the current state.
    ///
    /// Observers are notified in registration order unless `state` equals the
    /// current one. Returns once the transition has been delivered, or
    /// immediately when called from inside an observer.
    pub fn set(&self, state: LoadState) {
        let nested = {
            let mut reg = self.shared.registry();
            if reg.current.same_as(&state) {
                log::debug!("state unchanged ({})", state.name());
                return;
            }
            log::debug!("state {} -> {}", reg.current.name(), state.name());
            reg.version += 1;
            let version = reg.version;
            reg.current = state.clone();
            reg.backlog.push_back((version, state));
            reg.notifying == Some(thread::current().id())
        };
        if nested {
            return;
        }

        let _pass = self.shared.pass();
        self.shared.drain();
    }

    /// Register `observer`, calling it once right away with the current state
    /// and again on every later transition until the returned handle is
    /// dropped.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&LoadState) + Send + Sync + 'static,
    {
        let pass = if self.shared.is_notifying_thread() {
            None
        } else {
            Some(self.shared.pass())
        };
        // Lets the first callback call `set` without blocking on `pass`.
        let marker = pass.as_ref().map(|_| NotifyingMarker::enter(&self.shared));

        let (observer, current) = {
            let mut reg = self.shared.registry();
            reg.next_id += 1;
            let observer = Arc::new(Observer {
                id: reg.next_id,
                since: reg.version,
                active: AtomicBool::new(true),
                callback: Box::new(observer),
            });
            reg.observers.push(Arc::clone(&observer));
            (observer, reg.current.clone())
        };
        log::debug!("observer {} subscribed", observer.id);

        // Built first so a panicking callback deregisters on unwind.
        let subscription = Subscription {
            shared: Arc::downgrade(&self.shared),
            observer,
        };
        (subscription.observer.callback)(&current);

        drop(marker);
        if pass.is_some() {
            // Deliver transitions queued by other threads or by the callback.
            self.shared.drain();
        }

        subscription
    }
}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// Keeps an observer registered. Dropping it deregisters the observer.
///
/// Once the drop returns the observer is not called again. When dropped on
/// another thread than a running notification pass, the drop waits for that
/// pass to finish.
#[must_use = "dropping a Subscription immediately deregisters the observer"]
pub struct Subscription {
    shared: Weak<Shared>,
    observer: Arc<Observer>,
}

impl Subscription {
    /// Deregister now. Same as dropping the handle.
    pub fn dispose(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.observer.active.store(false, Ordering::Release);
        let Some(shared) = self.shared.upgrade() else {
            return;
        };
        let id = self.observer.id;
        let nested = {
            let mut reg = shared.registry();
            reg.observers.retain(|o| o.id != id);
            reg.notifying == Some(thread::current().id())
        };
        if !nested {
            // Wait out any pass that took its snapshot before the removal.
            drop(shared.pass());
        }
        log::debug!("observer {id} disposed");
    }
}
