//! Transport seams used by the orchestration layer.
//!
//! [`ApiClient`](crate::ApiClient) implements both traits against the REST
//! backend; services take `Arc<dyn MultimediaApi>` / `Arc<dyn BlogApi>` so
//! they can be driven by in-memory doubles in tests.

use std::sync::Arc;

use async_trait::async_trait;
use vitrina_core::models::{
    BlogPost, BlogPostInput, MultimediaFile, MultimediaFilters, MultimediaStats,
    UpdateMultimediaRequest, UploadFileRequest,
};
use vitrina_core::{AppResult, Page};

use crate::progress::{FileProgressFn, ProgressFn};

#[async_trait]
pub trait MultimediaApi: Send + Sync {
    /// One page of files plus the total matching the same filters.
    async fn get_multimedia_files(
        &self,
        filters: &MultimediaFilters,
    ) -> AppResult<Page<MultimediaFile>>;

    async fn upload_file(
        &self,
        request: UploadFileRequest,
        on_progress: ProgressFn,
    ) -> AppResult<MultimediaFile>;

    /// Upload one file at a time; the first failure stops the rest.
    async fn upload_multiple_files(
        &self,
        requests: Vec<UploadFileRequest>,
        on_progress: FileProgressFn,
    ) -> AppResult<Vec<MultimediaFile>> {
        let mut uploaded = Vec::with_capacity(requests.len());
        for (index, request) in requests.into_iter().enumerate() {
            let report = on_progress.clone();
            let per_file: ProgressFn = Arc::new(move |percent| report(index, percent));
            uploaded.push(self.upload_file(request, per_file).await?);
        }
        Ok(uploaded)
    }

    async fn update_multimedia_file(
        &self,
        id: &str,
        patch: &UpdateMultimediaRequest,
    ) -> AppResult<MultimediaFile>;

    async fn delete_multimedia_file(&self, id: &str) -> AppResult<()>;

    async fn delete_multiple_files(&self, ids: &[String]) -> AppResult<()>;

    async fn get_tags(&self) -> AppResult<Vec<String>>;

    async fn get_stats(&self) -> AppResult<MultimediaStats>;
}

#[async_trait]
pub trait BlogApi: Send + Sync {
    /// Every post; the backend does not paginate.
    async fn list_posts(&self) -> AppResult<Vec<BlogPost>>;

    async fn get_post(&self, id: &str) -> AppResult<BlogPost>;

    async fn create_post(&self, input: &BlogPostInput) -> AppResult<BlogPost>;

    async fn update_post(&self, id: &str, input: &BlogPostInput) -> AppResult<BlogPost>;

    async fn delete_post(&self, id: &str) -> AppResult<()>;
}
