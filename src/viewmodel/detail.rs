use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::error_messages;
use crate::model::OompaLoompaDetails;
use crate::repository::OompaLoompasRepository;
use crate::viewmodel::FetchSlot;

pub const INVALID_ID_MESSAGE: &str = "can't fetch details without a valid id";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailUiState {
    pub is_loading: bool,
    pub error_messages: Vec<String>,
    pub details: Option<OompaLoompaDetails>,
}

pub struct DetailViewModel {
    repository: Arc<dyn OompaLoompasRepository>,
    state: Arc<watch::Sender<DetailUiState>>,
    fetch: FetchSlot,
}

impl DetailViewModel {
    pub fn new(repository: Arc<dyn OompaLoompasRepository>, runtime: Handle) -> Self {
        let (state, _) = watch::channel(DetailUiState::default());
        Self {
            repository,
            state: Arc::new(state),
            fetch: FetchSlot::new(runtime),
        }
    }

    pub fn state(&self) -> DetailUiState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailUiState> {
        self.state.subscribe()
    }

    /// Load the details of `id`. `None` and `0` are rejected without a
    /// repository call.
    pub fn fetch_details(&self, id: Option<u32>) {
        let id = match id.filter(|id| *id > 0) {
            Some(id) => id,
            None => {
                warn!(?id, "refusing to fetch details");
                // A stale task must not replace the error below.
                self.fetch.cancel();
                self.state.send_modify(|s| {
                    s.is_loading = false;
                    s.error_messages = vec![INVALID_ID_MESSAGE.to_string()];
                    s.details = None;
                });
                return;
            }
        };

        info!(id, "fetching oompa loompa details");
        let repository = self.repository.clone();
        let state = self.state.clone();
        self.fetch.replace(
            || {
                self.state.send_modify(|s| {
                    s.is_loading = true;
                    s.error_messages.clear();
                    s.details = None;
                })
            },
            move |token| async move {
                let result = repository.fetch_details(id).await;
                state.send_if_modified(|s| {
                    if token.is_cancelled() {
                        debug!(id, "discarding superseded details fetch");
                        return false;
                    }
                    s.is_loading = false;
                    match result {
                        Ok(details) => {
                            s.error_messages.clear();
                            s.details = Some(details);
                        }
                        Err(err) => {
                            let messages = error_messages(&err);
                            warn!(id, ?messages, "failed to fetch details");
                            s.error_messages = messages;
                            s.details = None;
                        }
                    }
                    true
                });
            },
        );
    }
}
