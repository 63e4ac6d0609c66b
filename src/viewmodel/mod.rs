//! Presentation state holders for the list and detail views.
//!
//! Each view-model owns one observable state slot (a `tokio::sync::watch`
//! channel) and at most one outstanding fetch task, tracked by [`FetchSlot`].

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::runtime::Handle;

pub mod detail;
pub mod list;

pub use detail::{DetailUiState, DetailViewModel};
pub use list::{ListUiState, ListViewModel};

/// Cooperative cancellation flag shared between a view-model and one task.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Single slot holding the token of the latest fetch task.
///
/// Starting a task cancels the previous token first. Cancelled tasks keep
/// running to completion; they must check their token before touching state.
#[derive(Debug)]
pub struct FetchSlot {
    runtime: Handle,
    current: Mutex<Option<CancelToken>>,
}

impl FetchSlot {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            current: Mutex::new(None),
        }
    }

    /// Cancel the previous task, run `prepare` while the slot is held, then
    /// spawn the future produced by `task` on the runtime.
    pub fn replace<P, T, F>(&self, prepare: P, task: T)
    where
        P: FnOnce(),
        T: FnOnce(CancelToken) -> F,
        F: Future<Output = ()> + Send + 'static,
    {
        let mut current = self.current.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(previous) = current.take() {
            previous.cancel();
        }
        prepare();
        let token = CancelToken::default();
        *current = Some(token.clone());
        self.runtime.spawn(task(token));
    }

    /// Cancel the outstanding task, if any, without starting a new one.
    pub fn cancel(&self) {
        let mut current = self.current.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(previous) = current.take() {
            previous.cancel();
        }
    }
}

impl Drop for FetchSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}
