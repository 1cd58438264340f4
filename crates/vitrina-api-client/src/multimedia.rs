//! Multimedia library endpoints (`/multimedia`).

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use serde_json::json;
use vitrina_core::models::{
    MultimediaFile, MultimediaFilters, MultimediaStats, TotalCount, UpdateMultimediaRequest,
    UploadFileRequest,
};
use vitrina_core::validation::validate_upload;
use vitrina_core::{AppError, AppResult, Page};

use crate::progress::{progress_stream, ProgressFn};
use crate::traits::MultimediaApi;
use crate::{item_path, ApiClient};

const MULTIMEDIA_PATH: &str = "/multimedia";

impl ApiClient {
    /// Multipart body for `POST /multimedia/upload`. Validates first so an
    /// unsupported or oversized file, or a category that disagrees with the
    /// MIME type, never reaches the network.
    fn upload_form(&self, request: UploadFileRequest, on_progress: ProgressFn) -> AppResult<Form> {
        let category = validate_upload(&request.mime_type, request.size(), request.category)?;

        let length = request.size();
        let body = Body::wrap_stream(progress_stream(request.data, on_progress));
        let file_part = Part::stream_with_length(body, length)
            .file_name(request.file_name)
            .mime_str(&request.mime_type)
            .map_err(|e| AppError::InvalidInput(format!("Invalid MIME type: {}", e)))?;

        let mut form = Form::new()
            .part("file", file_part)
            .text("category", category.to_string())
            .text("tags", serde_json::to_string(&request.tags)?);
        if let Some(description) = request.description {
            form = form.text("description", description);
        }
        if let Some(alt) = request.alt {
            form = form.text("alt", alt);
        }
        Ok(form)
    }
}

#[async_trait]
impl MultimediaApi for ApiClient {
    async fn get_multimedia_files(
        &self,
        filters: &MultimediaFilters,
    ) -> AppResult<Page<MultimediaFile>> {
        let list_query = filters.to_query();
        let count_query = filters.filter_query();
        let count_path = format!("{}/count", MULTIMEDIA_PATH);

        let (files, count) = tokio::try_join!(
            self.get::<Vec<MultimediaFile>>(MULTIMEDIA_PATH, &list_query),
            self.get::<TotalCount>(&count_path, &count_query),
        )?;

        tracing::debug!(
            returned = files.len(),
            total = count.total,
            page = filters.page,
            "Fetched multimedia page"
        );
        Ok(Page::new(files, count.total, filters.page, filters.limit))
    }

    async fn upload_file(
        &self,
        request: UploadFileRequest,
        on_progress: ProgressFn,
    ) -> AppResult<MultimediaFile> {
        let file_name = request.file_name.clone();
        let form = self.upload_form(request, on_progress.clone())?;

        let file: MultimediaFile = self
            .post_multipart(&format!("{}/upload", MULTIMEDIA_PATH), form)
            .await?;
        on_progress(100);

        tracing::info!(file_id = %file.id, filename = %file_name, "Uploaded multimedia file");
        Ok(file)
    }

    async fn update_multimedia_file(
        &self,
        id: &str,
        patch: &UpdateMultimediaRequest,
    ) -> AppResult<MultimediaFile> {
        self.put_json(&item_path(MULTIMEDIA_PATH, id), patch).await
    }

    async fn delete_multimedia_file(&self, id: &str) -> AppResult<()> {
        self.delete::<()>(&item_path(MULTIMEDIA_PATH, id), None)
            .await
    }

    async fn delete_multiple_files(&self, ids: &[String]) -> AppResult<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let body = json!({ "ids": ids });
        self.delete(&format!("{}/bulk-delete", MULTIMEDIA_PATH), Some(&body))
            .await
    }

    async fn get_tags(&self) -> AppResult<Vec<String>> {
        self.get(&format!("{}/tags", MULTIMEDIA_PATH), &[]).await
    }

    async fn get_stats(&self) -> AppResult<MultimediaStats> {
        self.get(&format!("{}/stats", MULTIMEDIA_PATH), &[]).await
    }
}
