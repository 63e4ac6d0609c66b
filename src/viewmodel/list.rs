use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::error_messages;
use crate::model::OompaLoompa;
use crate::repository::OompaLoompasRepository;
use crate::viewmodel::FetchSlot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListUiState {
    pub current_page: u32,
    pub total_pages: u32,
    pub is_loading: bool,
    pub oompa_loompas: Vec<OompaLoompa>,
    pub error_messages: Vec<String>,
}

impl Default for ListUiState {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            is_loading: false,
            oompa_loompas: Vec::new(),
            error_messages: Vec::new(),
        }
    }
}

impl ListUiState {
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }
}

pub struct ListViewModel {
    repository: Arc<dyn OompaLoompasRepository>,
    state: Arc<watch::Sender<ListUiState>>,
    fetch: FetchSlot,
}

impl ListViewModel {
    /// `runtime` is where fetch tasks are spawned.
    pub fn new(repository: Arc<dyn OompaLoompasRepository>, runtime: Handle) -> Self {
        let (state, _) = watch::channel(ListUiState::default());
        Self {
            repository,
            state: Arc::new(state),
            fetch: FetchSlot::new(runtime),
        }
    }

    pub fn state(&self) -> ListUiState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListUiState> {
        self.state.subscribe()
    }

    /// Load `page`, bypassing the repository cache only when `page` differs
    /// from the page currently shown.
    pub fn fetch(&self, page: u32) {
        let refresh = page != self.state.borrow().current_page;
        info!(page, refresh, "fetching oompa loompas");
        self.start(page, refresh);
    }

    /// Re-fetch the current page from the network.
    pub fn reload(&self) {
        let page = self.state.borrow().current_page;
        info!(page, "reloading oompa loompas");
        self.start(page, true);
    }

    fn start(&self, page: u32, refresh: bool) {
        let repository = self.repository.clone();
        let state = self.state.clone();
        self.fetch.replace(
            || {
                self.state.send_modify(|s| {
                    s.is_loading = true;
                    s.error_messages.clear();
                    s.oompa_loompas.clear();
                })
            },
            move |token| async move {
                let result = repository.fetch_page(page, refresh).await;
                state.send_if_modified(|s| {
                    if token.is_cancelled() {
                        debug!(page, "discarding superseded fetch");
                        return false;
                    }
                    match result {
                        Ok(result) => {
                            debug!(
                                page = result.current_page,
                                count = result.oompa_loompas.len(),
                                "retrieved oompa loompas"
                            );
                            s.current_page = result.current_page;
                            s.total_pages = result.total_pages;
                            s.is_loading = false;
                            s.error_messages.clear();
                            s.oompa_loompas = result.oompa_loompas.clone();
                        }
                        Err(err) => {
                            let messages = error_messages(&err);
                            warn!(?messages, "failed to fetch oompa loompas");
                            s.is_loading = false;
                            s.error_messages = messages;
                            s.oompa_loompas.clear();
                        }
                    }
                    true
                });
            },
        );
    }
}
