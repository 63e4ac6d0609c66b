use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::{Mutex, Notify};
use tokio::time::Duration;

use oompa_loompas::error::TransportError;
use oompa_loompas::handlers::settled_list;
use oompa_loompas::model::{OompaLoompa, OompaLoompaDetails, PageResult};
use oompa_loompas::remote::model::{DetailsResponse, PageResponse, ResultResponse};
use oompa_loompas::remote::OompaLoompasDataSource;
use oompa_loompas::repository::{DefaultOompaLoompasRepository, OompaLoompasRepository};
use oompa_loompas::viewmodel::ListViewModel;

fn oompa(id: u32) -> OompaLoompa {
    OompaLoompa {
        id,
        first_name: "firstName".into(),
        last_name: "lastName".into(),
        image: "image".into(),
        profession: "profession".into(),
        age: 21,
        gender: "gender".into(),
    }
}

/// Page 1 has one record out of 20 pages, page 2 always fails, other pages
/// echo their number. Page 1 can be held back until `release` is called.
#[derive(Default)]
struct FakeRepository {
    calls: Mutex<Vec<(u32, bool)>>,
    gate_page_one: bool,
    gate: Notify,
    finished: AtomicUsize,
}

impl FakeRepository {
    fn gated() -> Self {
        Self {
            gate_page_one: true,
            ..Default::default()
        }
    }

    fn release(&self) {
        self.gate.notify_one();
    }

    async fn calls(&self) -> Vec<(u32, bool)> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl OompaLoompasRepository for FakeRepository {
    async fn fetch_page(&self, page: u32, refresh: bool) -> Result<Arc<PageResult>, TransportError> {
        self.calls.lock().await.push((page, refresh));
        if page == 1 && self.gate_page_one {
            self.gate.notified().await;
        }
        self.finished.fetch_add(1, Ordering::SeqCst);
        match page {
            1 => Ok(Arc::new(PageResult {
                current_page: 1,
                total_pages: 20,
                oompa_loompas: vec![oompa(1)],
            })),
            2 => Err(TransportError::io("Error fetching oompa loompas")),
            n => Ok(Arc::new(PageResult {
                current_page: n,
                total_pages: 20,
                oompa_loompas: vec![oompa(n * 10)],
            })),
        }
    }

    async fn fetch_details(&self, _id: u32) -> Result<OompaLoompaDetails, TransportError> {
        Err(TransportError::io("not used"))
    }

    async fn cached_page(&self) -> Option<Arc<PageResult>> {
        None
    }
}

fn view_model(repo: &Arc<FakeRepository>) -> ListViewModel {
    ListViewModel::new(repo.clone(), Handle::current())
}

#[tokio::test]
async fn initial_state() {
    let repo = Arc::new(FakeRepository::default());
    let vm = view_model(&repo);
    let state = vm.state();
    assert!(!state.is_loading);
    assert_eq!(state.current_page, 1);
    assert_eq!(state.total_pages, 1);
    assert!(state.oompa_loompas.is_empty());
    assert!(state.error_messages.is_empty());
    assert!(repo.calls().await.is_empty());
}

#[tokio::test]
async fn fetch_sets_loading_before_returning() {
    let repo = Arc::new(FakeRepository::default());
    let vm = view_model(&repo);

    vm.fetch(1);
    let state = vm.state();
    assert!(state.is_loading);
    assert!(state.oompa_loompas.is_empty());
    assert!(state.error_messages.is_empty());
}

#[tokio::test]
async fn fetch_page_success() {
    let repo = Arc::new(FakeRepository::default());
    let vm = view_model(&repo);

    vm.fetch(1);
    let state = settled_list(vm.subscribe()).await;

    assert!(!state.is_loading);
    assert_eq!(state.current_page, 1);
    assert_eq!(state.total_pages, 20);
    assert_eq!(state.oompa_loompas.len(), 1);
    assert!(state.error_messages.is_empty());
    assert_eq!(state.oompa_loompas[0].id, 1);
}

#[tokio::test]
async fn fetch_page_error_is_flattened() {
    let repo = Arc::new(FakeRepository::default());
    let vm = view_model(&repo);

    vm.fetch(2);
    let state = settled_list(vm.subscribe()).await;

    assert!(!state.is_loading);
    assert!(state.oompa_loompas.is_empty());
    assert_eq!(state.error_messages, vec!["Error fetching oompa loompas"]);
}

#[tokio::test]
async fn error_keeps_pagination_and_success_clears_messages() {
    let repo = Arc::new(FakeRepository::default());
    let vm = view_model(&repo);

    vm.fetch(1);
    settled_list(vm.subscribe()).await;
    vm.fetch(2);
    let failed = settled_list(vm.subscribe()).await;
    assert_eq!(failed.current_page, 1);
    assert_eq!(failed.total_pages, 20);
    assert_eq!(failed.error_messages.len(), 1);

    vm.fetch(4);
    let recovered = settled_list(vm.subscribe()).await;
    assert_eq!(recovered.current_page, 4);
    assert!(recovered.error_messages.is_empty());
    assert_eq!(recovered.oompa_loompas[0].id, 40);
}

#[tokio::test]
async fn refresh_only_when_page_changes() {
    let repo = Arc::new(FakeRepository::default());
    let vm = view_model(&repo);

    vm.fetch(1);
    settled_list(vm.subscribe()).await;
    vm.fetch(3);
    settled_list(vm.subscribe()).await;
    vm.fetch(3);
    settled_list(vm.subscribe()).await;
    vm.reload();
    settled_list(vm.subscribe()).await;

    assert_eq!(
        repo.calls().await,
        vec![(1, false), (3, true), (3, false), (3, true)]
    );
}

#[tokio::test]
async fn newer_fetch_supersedes_older_one() {
    let repo = Arc::new(FakeRepository::gated());
    let vm = view_model(&repo);

    vm.fetch(1);
    vm.fetch(3);
    let state = settled_list(vm.subscribe()).await;
    assert_eq!(state.current_page, 3);
    assert_eq!(state.oompa_loompas[0].id, 30);

    // Let the stale page-1 request finish; its result must be dropped.
    repo.release();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(repo.finished.load(Ordering::SeqCst), 2);

    let state = vm.state();
    assert!(!state.is_loading);
    assert_eq!(state.current_page, 3);
    assert_eq!(state.oompa_loompas.len(), 1);
    assert_eq!(state.oompa_loompas[0].id, 30);
}

#[tokio::test]
async fn pagination_helpers() {
    let repo = Arc::new(FakeRepository::default());
    let vm = view_model(&repo);
    let initial = vm.state();
    assert!(!initial.has_next());
    assert!(!initial.has_previous());

    vm.fetch(5);
    let state = settled_list(vm.subscribe()).await;
    assert!(state.has_next());
    assert!(state.has_previous());
}

/// Network side for the view-model wired to the real repository. Page 1
/// returns id 1, page 2 fails, other pages return id `n * 10`. Page 3 waits
/// for `release`.
#[derive(Default)]
struct RecordingDataSource {
    page_calls: Mutex<Vec<u32>>,
    gate: Notify,
}

impl RecordingDataSource {
    fn release(&self) {
        self.gate.notify_one();
    }

    async fn page_calls(&self) -> Vec<u32> {
        self.page_calls.lock().await.clone()
    }
}

#[async_trait]
impl OompaLoompasDataSource for RecordingDataSource {
    async fn fetch_page(&self, page: u32) -> Result<PageResponse, TransportError> {
        self.page_calls.lock().await.push(page);
        if page == 3 {
            self.gate.notified().await;
        }
        let id = match page {
            1 => 1,
            2 => return Err(TransportError::io("Error fetching oompa loompas")),
            n => n * 10,
        };
        Ok(PageResponse {
            current: page,
            total: 20,
            results: vec![ResultResponse {
                id,
                first_name: "John".into(),
                last_name: "Doe".into(),
                gender: "F".into(),
                image: "image".into(),
                profession: "Developer".into(),
                age: 20,
            }],
        })
    }

    async fn fetch_details(&self, _id: u32) -> Result<DetailsResponse, TransportError> {
        Err(TransportError::io("not used"))
    }
}

#[tokio::test]
async fn view_model_over_caching_repository() {
    let source = Arc::new(RecordingDataSource::default());
    let repo = Arc::new(DefaultOompaLoompasRepository::new(source.clone()));
    let vm = ListViewModel::new(repo.clone(), Handle::current());

    vm.fetch(1);
    let state = settled_list(vm.subscribe()).await;
    assert_eq!(state.oompa_loompas[0].id, 1);
    assert_eq!(state.oompa_loompas[0].first_name, "John");

    vm.fetch(2);
    let state = settled_list(vm.subscribe()).await;
    assert_eq!(state.error_messages, vec!["Error fetching oompa loompas"]);
    assert!(state.oompa_loompas.is_empty());

    vm.fetch(3);
    vm.fetch(4);
    let state = settled_list(vm.subscribe()).await;
    assert_eq!(state.current_page, 4);
    assert_eq!(state.oompa_loompas[0].id, 40);

    // Same page again: served from the cache.
    vm.fetch(4);
    let state = settled_list(vm.subscribe()).await;
    assert_eq!(state.current_page, 4);
    assert_eq!(source.page_calls().await, vec![1, 2, 3, 4]);

    // The superseded page-3 request still lands in the cache, but not on screen.
    source.release();
    tokio::time::timeout(Duration::from_secs(1), async {
        while repo.cached_page().await.map(|p| p.current_page) != Some(3) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();
    let state = vm.state();
    assert!(!state.is_loading);
    assert_eq!(state.current_page, 4);
    assert_eq!(state.oompa_loompas[0].id, 40);

    // A page change bypasses whatever the cache holds.
    vm.fetch(5);
    let state = settled_list(vm.subscribe()).await;
    assert_eq!(state.current_page, 5);
    assert_eq!(state.oompa_loompas[0].id, 50);
    assert_eq!(source.page_calls().await, vec![1, 2, 3, 4, 5]);
}
