//! Mock transport implementations for testing
//!
//! State lives behind `Arc<Mutex<..>>` so tests can script failures and
//! inspect the calls a service made after the fact.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use vitrina_api_client::{BlogApi, MultimediaApi, ProgressFn};
use vitrina_core::models::{
    BlogPost, BlogPostInput, CategoryStats, MultimediaCategory, MultimediaFile, MultimediaFilters,
    MultimediaStats, UpdateMultimediaRequest, UploadFileRequest,
};
use vitrina_core::{AppError, AppResult, Page};

use super::fixtures::{base_time, file};

fn http_error(status: u16) -> AppError {
    AppError::Http {
        status,
        message: String::new(),
    }
}

#[derive(Default)]
struct MultimediaState {
    files: Vec<MultimediaFile>,
    scripted_lists: VecDeque<(Duration, Vec<MultimediaFile>)>,
    list_failure: Option<u16>,
    list_calls: usize,
    last_filters: Option<MultimediaFilters>,
    upload_failures: HashMap<String, u16>,
    progress_steps: Vec<u8>,
    uploaded_names: Vec<String>,
    update_calls: usize,
    delete_failure: Option<u16>,
    bulk_deleted: Vec<Vec<String>>,
}

/// In-memory multimedia backend.
#[derive(Clone, Default)]
pub struct MockMultimediaApi {
    state: Arc<Mutex<MultimediaState>>,
}

impl MockMultimediaApi {
    pub fn with_files(files: Vec<MultimediaFile>) -> Self {
        let mock = Self::default();
        mock.state.lock().unwrap().files = files;
        mock
    }

    /// Queue a listing answer returned after `delay`, ahead of the stored files.
    pub fn script_list(&self, delay: Duration, files: Vec<MultimediaFile>) {
        self.state
            .lock()
            .unwrap()
            .scripted_lists
            .push_back((delay, files));
    }

    pub fn fail_list_with(&self, status: u16) {
        self.state.lock().unwrap().list_failure = Some(status);
    }

    pub fn fail_upload_of(&self, file_name: &str, status: u16) {
        self.state
            .lock()
            .unwrap()
            .upload_failures
            .insert(file_name.to_string(), status);
    }

    /// Progress values reported on every upload before it resolves.
    pub fn report_progress(&self, steps: &[u8]) {
        self.state.lock().unwrap().progress_steps = steps.to_vec();
    }

    pub fn fail_deletes_with(&self, status: u16) {
        self.state.lock().unwrap().delete_failure = Some(status);
    }

    pub fn list_calls(&self) -> usize {
        self.state.lock().unwrap().list_calls
    }

    pub fn last_filters(&self) -> Option<MultimediaFilters> {
        self.state.lock().unwrap().last_filters.clone()
    }

    pub fn uploaded_names(&self) -> Vec<String> {
        self.state.lock().unwrap().uploaded_names.clone()
    }

    pub fn update_calls(&self) -> usize {
        self.state.lock().unwrap().update_calls
    }

    pub fn bulk_deleted(&self) -> Vec<Vec<String>> {
        self.state.lock().unwrap().bulk_deleted.clone()
    }
}

#[async_trait]
impl MultimediaApi for MockMultimediaApi {
    async fn get_multimedia_files(
        &self,
        filters: &MultimediaFilters,
    ) -> AppResult<Page<MultimediaFile>> {
        let (scripted, failure, files) = {
            let mut state = self.state.lock().unwrap();
            state.list_calls += 1;
            state.last_filters = Some(filters.clone());
            (
                state.scripted_lists.pop_front(),
                state.list_failure,
                state.files.clone(),
            )
        };

        if let Some((delay, data)) = scripted {
            tokio::time::sleep(delay).await;
            let total = data.len() as u64;
            return Ok(Page::new(data, total, filters.page, filters.limit));
        }
        if let Some(status) = failure {
            return Err(http_error(status));
        }

        let total = files.len() as u64;
        let data = files
            .into_iter()
            .skip(filters.skip() as usize)
            .take(filters.limit as usize)
            .collect();
        Ok(Page::new(data, total, filters.page, filters.limit))
    }

    async fn upload_file(
        &self,
        request: UploadFileRequest,
        on_progress: ProgressFn,
    ) -> AppResult<MultimediaFile> {
        let (steps, failure, index) = {
            let mut state = self.state.lock().unwrap();
            state.uploaded_names.push(request.file_name.clone());
            (
                state.progress_steps.clone(),
                state.upload_failures.get(&request.file_name).copied(),
                state.uploaded_names.len(),
            )
        };

        for step in steps {
            on_progress(step);
        }
        if let Some(status) = failure {
            return Err(http_error(status));
        }
        on_progress(100);

        let mut uploaded = file(&format!("up-{}", index));
        uploaded.original_name = request.file_name.clone();
        uploaded.mime_type = request.mime_type.clone();
        uploaded.size = request.size();
        uploaded.tags = request.tags.clone();
        self.state.lock().unwrap().files.insert(0, uploaded.clone());
        Ok(uploaded)
    }

    async fn update_multimedia_file(
        &self,
        id: &str,
        patch: &UpdateMultimediaRequest,
    ) -> AppResult<MultimediaFile> {
        let mut state = self.state.lock().unwrap();
        state.update_calls += 1;
        let Some(existing) = state.files.iter_mut().find(|f| f.id == id) else {
            return Err(http_error(404));
        };
        if let Some(filename) = &patch.filename {
            existing.filename = filename.clone();
        }
        if let Some(category) = patch.category {
            existing.category = category;
        }
        if let Some(tags) = &patch.tags {
            existing.tags = tags.clone();
        }
        if let Some(description) = &patch.description {
            existing.description = Some(description.clone());
        }
        if let Some(alt) = &patch.alt {
            existing.alt = Some(alt.clone());
        }
        existing.updated_at = Some(base_time());
        Ok(existing.clone())
    }

    async fn delete_multimedia_file(&self, id: &str) -> AppResult<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(status) = state.delete_failure {
            return Err(http_error(status));
        }
        state.files.retain(|f| f.id != id);
        Ok(())
    }

    async fn delete_multiple_files(&self, ids: &[String]) -> AppResult<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(status) = state.delete_failure {
            return Err(http_error(status));
        }
        state.bulk_deleted.push(ids.to_vec());
        state.files.retain(|f| !ids.contains(&f.id));
        Ok(())
    }

    async fn get_tags(&self) -> AppResult<Vec<String>> {
        let state = self.state.lock().unwrap();
        let tags: BTreeSet<String> = state
            .files
            .iter()
            .flat_map(|f| f.tags.iter().cloned())
            .collect();
        Ok(tags.into_iter().collect())
    }

    async fn get_stats(&self) -> AppResult<MultimediaStats> {
        let state = self.state.lock().unwrap();
        let by_category = MultimediaCategory::ALL
            .iter()
            .map(|category| {
                let matching = state.files.iter().filter(|f| f.category == *category);
                CategoryStats {
                    category: *category,
                    count: matching.clone().count() as u64,
                    size: matching.map(|f| f.size).sum(),
                }
            })
            .collect();
        Ok(MultimediaStats {
            total_files: state.files.len() as u64,
            total_size: state.files.iter().map(|f| f.size).sum(),
            by_category,
        })
    }
}

#[derive(Default)]
struct BlogState {
    posts: Vec<BlogPost>,
    next_id: usize,
    list_calls: usize,
    list_failure: Option<u16>,
    save_failure: Option<u16>,
    created: Vec<BlogPostInput>,
    updated: Vec<(String, BlogPostInput)>,
    deleted: Vec<String>,
}

/// In-memory `/noticias` backend.
#[derive(Clone, Default)]
pub struct MockBlogApi {
    state: Arc<Mutex<BlogState>>,
}

impl MockBlogApi {
    pub fn with_posts(posts: Vec<BlogPost>) -> Self {
        let mock = Self::default();
        mock.state.lock().unwrap().posts = posts;
        mock
    }

    pub fn fail_list_with(&self, status: u16) {
        self.state.lock().unwrap().list_failure = Some(status);
    }

    pub fn fail_saves_with(&self, status: u16) {
        self.state.lock().unwrap().save_failure = Some(status);
    }

    pub fn list_calls(&self) -> usize {
        self.state.lock().unwrap().list_calls
    }

    pub fn created(&self) -> Vec<BlogPostInput> {
        self.state.lock().unwrap().created.clone()
    }

    pub fn updated(&self) -> Vec<(String, BlogPostInput)> {
        self.state.lock().unwrap().updated.clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.state.lock().unwrap().deleted.clone()
    }
}

fn apply_input(post: &mut BlogPost, input: &BlogPostInput) {
    post.title = input.title.clone();
    post.slug = input.slug.clone();
    post.excerpt = input.excerpt.clone();
    post.content = input.content.clone();
    post.featured_image = input.featured_image.clone();
    post.author = input.author.clone();
    post.category = input.category.clone();
    post.tags = input.tags.clone();
    post.is_published = input.is_published;
    post.published_at = input.published_at;
}

#[async_trait]
impl BlogApi for MockBlogApi {
    async fn list_posts(&self) -> AppResult<Vec<BlogPost>> {
        let mut state = self.state.lock().unwrap();
        state.list_calls += 1;
        if let Some(status) = state.list_failure {
            return Err(http_error(status));
        }
        Ok(state.posts.clone())
    }

    async fn get_post(&self, id: &str) -> AppResult<BlogPost> {
        let state = self.state.lock().unwrap();
        state
            .posts
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| http_error(404))
    }

    async fn create_post(&self, input: &BlogPostInput) -> AppResult<BlogPost> {
        let mut state = self.state.lock().unwrap();
        if let Some(status) = state.save_failure {
            return Err(http_error(status));
        }
        state.next_id += 1;
        let mut post = BlogPost {
            id: format!("new-{}", state.next_id),
            title: String::new(),
            slug: String::new(),
            excerpt: String::new(),
            content: String::new(),
            featured_image: None,
            author: None,
            category: String::new(),
            tags: Vec::new(),
            is_published: false,
            published_at: None,
            created_at: base_time(),
            updated_at: base_time(),
        };
        apply_input(&mut post, input);
        state.created.push(input.clone());
        state.posts.push(post.clone());
        Ok(post)
    }

    async fn update_post(&self, id: &str, input: &BlogPostInput) -> AppResult<BlogPost> {
        let mut state = self.state.lock().unwrap();
        if let Some(status) = state.save_failure {
            return Err(http_error(status));
        }
        state.updated.push((id.to_string(), input.clone()));
        let Some(post) = state.posts.iter_mut().find(|p| p.id == id) else {
            return Err(http_error(404));
        };
        apply_input(post, input);
        Ok(post.clone())
    }

    async fn delete_post(&self, id: &str) -> AppResult<()> {
        let mut state = self.state.lock().unwrap();
        state.deleted.push(id.to_string());
        state.posts.retain(|p| p.id != id);
        Ok(())
    }
}
