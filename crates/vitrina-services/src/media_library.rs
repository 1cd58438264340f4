//! Multimedia library orchestration.
//!
//! [`MediaLibrary`] owns the state a library view renders: the current page of
//! files, the filter set, per-upload progress, and the multi-select set. User
//! actions go through its methods, which call the transport and merge the
//! result back into state.
//!
//! Ordering rules:
//! - Listing is last-request-wins. Each `load_files` cancels the previous
//!   in-flight one and results from a superseded request are discarded.
//! - Uploads run one at a time; the first failure stops the queue.
//! - Update and delete patch the local list instead of re-fetching.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use uuid::Uuid;
use validator::Validate;
use vitrina_api_client::{MultimediaApi, ProgressFn};
use vitrina_core::models::{
    MultimediaCategory, MultimediaFile, MultimediaFilters, MultimediaSortField, MultimediaStats,
    SortOrder, UpdateMultimediaRequest, UploadFileRequest,
};
use vitrina_core::validation::validate_upload;
use vitrina_core::{AppError, AppResult, ClientConfig, PageInfo};

use crate::actions::{report_failure, UserAction};
use crate::debounce::Debouncer;
use crate::loading::ContentLoadingBus;
use crate::upload::UploadRecord;

pub const MULTIMEDIA_LOADING_KEY: &str = "multimedia";

const COMPLETED_UPLOAD_LINGER: Duration = Duration::from_secs(2);
const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
pub struct MediaLibraryOptions {
    pub page_size: u32,
    pub search_debounce: Duration,
    /// How long a completed upload stays in the upload list.
    pub completed_linger: Duration,
    pub loading_bus: Option<Arc<ContentLoadingBus>>,
}

impl Default for MediaLibraryOptions {
    fn default() -> Self {
        Self {
            page_size: vitrina_core::models::DEFAULT_PAGE_SIZE,
            search_debounce: SEARCH_DEBOUNCE,
            completed_linger: COMPLETED_UPLOAD_LINGER,
            loading_bus: None,
        }
    }
}

impl MediaLibraryOptions {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            page_size: config.page_size,
            search_debounce: Duration::from_millis(config.search_debounce_ms),
            ..Default::default()
        }
    }
}

/// Everything a library view renders.
#[derive(Debug, Clone)]
pub struct LibraryState {
    pub files: Vec<MultimediaFile>,
    pub page_info: PageInfo,
    pub filters: MultimediaFilters,
    pub uploads: Vec<UploadRecord>,
    pub selected: BTreeSet<String>,
    pub tags: Vec<String>,
    pub stats: Option<MultimediaStats>,
    pub loading: bool,
    pub error: Option<String>,
}

impl LibraryState {
    fn new(page_size: u32) -> Self {
        let filters = MultimediaFilters {
            limit: page_size,
            ..Default::default()
        };
        Self {
            files: Vec::new(),
            page_info: PageInfo::new(0, filters.page, filters.limit),
            filters,
            uploads: Vec::new(),
            selected: BTreeSet::new(),
            tags: Vec::new(),
            stats: None,
            loading: false,
            error: None,
        }
    }
}

struct Inner {
    api: Arc<dyn MultimediaApi>,
    state: RwLock<LibraryState>,
    load_generation: AtomicU64,
    in_flight: Mutex<Option<CancellationToken>>,
    search: Debouncer,
    completed_linger: Duration,
    default_page_size: u32,
    loading_bus: Option<Arc<ContentLoadingBus>>,
}

#[derive(Clone)]
pub struct MediaLibrary {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for MediaLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaLibrary").finish_non_exhaustive()
    }
}

impl MediaLibrary {
    pub fn new(api: Arc<dyn MultimediaApi>, options: MediaLibraryOptions) -> Self {
        let page_size = options.page_size.max(1);
        Self {
            inner: Arc::new(Inner {
                api,
                state: RwLock::new(LibraryState::new(page_size)),
                load_generation: AtomicU64::new(0),
                in_flight: Mutex::new(None),
                search: Debouncer::new(options.search_debounce),
                completed_linger: options.completed_linger,
                default_page_size: page_size,
                loading_bus: options.loading_bus,
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, LibraryState> {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, LibraryState> {
        self.inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current state for rendering.
    pub fn snapshot(&self) -> LibraryState {
        self.read().clone()
    }

    pub fn files(&self) -> Vec<MultimediaFile> {
        self.read().files.clone()
    }

    pub fn filters(&self) -> MultimediaFilters {
        self.read().filters.clone()
    }

    pub fn page_info(&self) -> PageInfo {
        self.read().page_info
    }

    pub fn uploads(&self) -> Vec<UploadRecord> {
        self.read().uploads.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    pub fn clear_error(&self) {
        self.write().error = None;
    }

    fn fail(&self, action: UserAction, err: &AppError) {
        let message = report_failure(action, err);
        self.write().error = Some(message);
    }

    // ---- listing ----

    /// Fetch the page described by the current filters. A newer call cancels
    /// this one; a cancelled or superseded call returns `Ok(())` and leaves
    /// state alone.
    pub async fn load_files(&self) -> AppResult<()> {
        let generation = self.inner.load_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let token = CancellationToken::new();
        if let Some(previous) = self
            .inner
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(token.clone())
        {
            previous.cancel();
        }

        let filters = {
            let mut state = self.write();
            state.loading = true;
            state.error = None;
            state.filters.clone()
        };
        let _loading = self
            .inner
            .loading_bus
            .as_ref()
            .map(|bus| bus.track(MULTIMEDIA_LOADING_KEY));

        let result = tokio::select! {
            _ = token.cancelled() => Err(AppError::Cancelled),
            result = self.inner.api.get_multimedia_files(&filters) => result,
        };

        if self.inner.load_generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(generation, "Discarding superseded multimedia listing");
            return Ok(());
        }

        match result {
            Ok(page) => {
                let mut state = self.write();
                state.page_info = page.info();
                state.files = page.data;
                state.loading = false;
                Ok(())
            }
            Err(err) if err.is_cancelled() => {
                self.write().loading = false;
                Ok(())
            }
            Err(err) => {
                self.write().loading = false;
                self.fail(UserAction::LoadFiles, &err);
                Err(err)
            }
        }
    }

    /// Cancel the in-flight listing, if any.
    pub fn cancel_load(&self) {
        self.inner.load_generation.fetch_add(1, Ordering::SeqCst);
        if let Some(token) = self
            .inner
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            token.cancel();
        }
        self.write().loading = false;
    }

    /// Replace the whole filter set as given (page included) and reload.
    pub async fn replace_filters(&self, filters: MultimediaFilters) -> AppResult<()> {
        self.inner.search.cancel();
        self.write().filters = filters;
        self.load_files().await
    }

    /// Apply a facet change immediately: back to page 1, then reload.
    pub async fn update_filters<F>(&self, update: F) -> AppResult<()>
    where
        F: FnOnce(&mut MultimediaFilters),
    {
        {
            let mut state = self.write();
            update(&mut state.filters);
            state.filters.page = 1;
        }
        self.load_files().await
    }

    pub async fn set_category(&self, category: Option<MultimediaCategory>) -> AppResult<()> {
        self.update_filters(|f| f.category = category).await
    }

    pub async fn set_tags(&self, tags: Vec<String>) -> AppResult<()> {
        self.update_filters(|f| f.tags = tags).await
    }

    pub async fn set_sort(&self, field: MultimediaSortField, order: SortOrder) -> AppResult<()> {
        self.update_filters(|f| {
            f.sort_field = field;
            f.sort_order = order;
        })
        .await
    }

    /// Debounced search: only the last call of a burst reloads.
    pub async fn search(&self, text: &str) -> AppResult<()> {
        if !self.inner.search.settle().await {
            return Ok(());
        }
        let text = text.to_string();
        self.update_filters(|f| f.search = text).await
    }

    /// Move to another page without touching the filters.
    pub async fn set_page(&self, page: u32) -> AppResult<()> {
        self.write().filters.page = page.max(1);
        self.load_files().await
    }

    pub async fn reset_filters(&self) -> AppResult<()> {
        self.inner.search.cancel();
        let page_size = self.inner.default_page_size;
        self.update_filters(|f| {
            *f = MultimediaFilters {
                limit: page_size,
                ..Default::default()
            }
        })
        .await
    }

    // ---- uploads ----

    fn update_upload<F>(&self, upload_id: &str, update: F)
    where
        F: FnOnce(&mut UploadRecord),
    {
        let mut state = self.write();
        if let Some(record) = state.uploads.iter_mut().find(|r| r.id == upload_id) {
            update(record);
        }
    }

    fn remove_upload(&self, upload_id: &str) {
        self.write().uploads.retain(|r| r.id != upload_id);
    }

    /// Drop finished records (completed or failed) from the upload list.
    pub fn clear_finished_uploads(&self) {
        self.write().uploads.retain(|r| !r.is_finished());
    }

    fn schedule_upload_removal(&self, upload_id: String) {
        let library = self.clone();
        let linger = self.inner.completed_linger;
        tokio::spawn(async move {
            tokio::time::sleep(linger).await;
            library.remove_upload(&upload_id);
        });
    }

    async fn upload_one(&self, request: UploadFileRequest) -> AppResult<MultimediaFile> {
        let upload_id = Uuid::new_v4().to_string();
        self.write()
            .uploads
            .push(UploadRecord::new(upload_id.clone(), request.file_name.clone()));

        if let Err(error) = validate_upload(&request.mime_type, request.size(), request.category) {
            self.update_upload(&upload_id, |r| r.fail(error.to_string()));
            let err = AppError::from(error);
            self.fail(UserAction::UploadFile, &err);
            return Err(err);
        }

        let on_progress: ProgressFn = {
            let library = self.clone();
            let upload_id = upload_id.clone();
            Arc::new(move |percent| library.update_upload(&upload_id, |r| r.set_progress(percent)))
        };

        match self.inner.api.upload_file(request, on_progress).await {
            Ok(file) => {
                {
                    let mut state = self.write();
                    if let Some(record) = state.uploads.iter_mut().find(|r| r.id == upload_id) {
                        record.complete();
                    }
                    // Only listings that would show the file get it, at the top of page 1.
                    if state.filters.matches(&file) {
                        let total = state.page_info.total + 1;
                        state.page_info = state.page_info.with_total(total);
                        if state.filters.page == 1 {
                            let limit = state.filters.limit as usize;
                            state.files.insert(0, file.clone());
                            state.files.truncate(limit);
                        }
                    }
                }
                self.schedule_upload_removal(upload_id);
                Ok(file)
            }
            Err(err) => {
                self.update_upload(&upload_id, |r| r.fail(err.to_string()));
                self.fail(UserAction::UploadFile, &err);
                Err(err)
            }
        }
    }

    /// Upload files strictly one after another. The first failure (local
    /// validation or server) stops the queue: files already uploaded stay,
    /// the rest are never attempted.
    pub async fn upload_files(
        &self,
        requests: Vec<UploadFileRequest>,
    ) -> AppResult<Vec<MultimediaFile>> {
        let total = requests.len();
        let mut uploaded = Vec::with_capacity(total);
        for request in requests {
            match self.upload_one(request).await {
                Ok(file) => uploaded.push(file),
                Err(err) => {
                    tracing::warn!(
                        uploaded = uploaded.len(),
                        skipped = total - uploaded.len() - 1,
                        "Upload queue stopped"
                    );
                    return Err(err);
                }
            }
        }
        Ok(uploaded)
    }

    // ---- mutations ----

    /// Update metadata and patch the file in place.
    pub async fn update_file(
        &self,
        id: &str,
        patch: UpdateMultimediaRequest,
    ) -> AppResult<MultimediaFile> {
        if let Err(err) = patch.validate() {
            let err = AppError::from(err);
            self.fail(UserAction::UpdateFile, &err);
            return Err(err);
        }

        match self.inner.api.update_multimedia_file(id, &patch).await {
            Ok(updated) => {
                let mut state = self.write();
                if let Some(slot) = state.files.iter_mut().find(|f| f.id == id) {
                    *slot = updated.clone();
                }
                Ok(updated)
            }
            Err(err) => {
                self.fail(UserAction::UpdateFile, &err);
                Err(err)
            }
        }
    }

    fn remove_local(&self, ids: &[String]) {
        let mut state = self.write();
        let before = state.files.len();
        state.files.retain(|f| !ids.contains(&f.id));
        let removed = before - state.files.len();
        for id in ids {
            state.selected.remove(id);
        }
        let total = state.page_info.total.saturating_sub(removed as u64);
        state.page_info = state.page_info.with_total(total);
    }

    pub async fn delete_file(&self, id: &str) -> AppResult<()> {
        match self.inner.api.delete_multimedia_file(id).await {
            Ok(()) => {
                self.remove_local(&[id.to_string()]);
                tracing::info!(file_id = %id, "Deleted multimedia file");
                Ok(())
            }
            Err(err) => {
                self.fail(UserAction::DeleteFile, &err);
                Err(err)
            }
        }
    }

    pub async fn delete_files(&self, ids: &[String]) -> AppResult<()> {
        if ids.is_empty() {
            return Ok(());
        }
        match self.inner.api.delete_multiple_files(ids).await {
            Ok(()) => {
                self.remove_local(ids);
                tracing::info!(count = ids.len(), "Deleted multimedia files");
                Ok(())
            }
            Err(err) => {
                self.fail(UserAction::DeleteFiles, &err);
                Err(err)
            }
        }
    }

    // ---- selection ----

    pub fn toggle_selection(&self, id: &str) -> bool {
        let mut state = self.write();
        if state.selected.remove(id) {
            false
        } else {
            state.selected.insert(id.to_string());
            true
        }
    }

    pub fn select_all(&self) {
        let mut state = self.write();
        let ids: Vec<String> = state.files.iter().map(|f| f.id.clone()).collect();
        state.selected.extend(ids);
    }

    pub fn clear_selection(&self) {
        self.write().selected.clear();
    }

    pub fn selected_ids(&self) -> Vec<String> {
        self.read().selected.iter().cloned().collect()
    }

    pub async fn delete_selected(&self) -> AppResult<()> {
        let ids = self.selected_ids();
        self.delete_files(&ids).await
    }

    // ---- facets ----

    pub async fn load_tags(&self) -> AppResult<Vec<String>> {
        match self.inner.api.get_tags().await {
            Ok(tags) => {
                self.write().tags = tags.clone();
                Ok(tags)
            }
            Err(err) => {
                self.fail(UserAction::LoadTags, &err);
                Err(err)
            }
        }
    }

    pub async fn load_stats(&self) -> AppResult<MultimediaStats> {
        match self.inner.api.get_stats().await {
            Ok(stats) => {
                self.write().stats = Some(stats.clone());
                Ok(stats)
            }
            Err(err) => {
                self.fail(UserAction::LoadStats, &err);
                Err(err)
            }
        }
    }
}
