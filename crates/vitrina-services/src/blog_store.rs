//! Blog/news orchestration.
//!
//! The backend returns every post in one call, so filtering, sorting,
//! pagination, and category derivation all run client-side over the loaded
//! collection. Every mutation is followed by a full reload.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use validator::Validate;
use vitrina_api_client::BlogApi;
use vitrina_core::blog::{derive_categories, find_by_slug, is_slug_available, published_posts, query_posts};
use vitrina_core::models::{BlogCategory, BlogFilters, BlogPost, BlogPostInput};
use vitrina_core::slug::is_well_formed;
use vitrina_core::{paginate, AppError, AppResult, Page, BLOG_POSTS_PER_PAGE};

use crate::actions::{report_failure, UserAction};
use crate::loading::ContentLoadingBus;

pub const BLOG_LOADING_KEY: &str = "noticias";

#[derive(Debug, Clone, Default)]
pub struct BlogState {
    pub posts: Vec<BlogPost>,
    pub categories: Vec<BlogCategory>,
    pub filters: BlogFilters,
    pub loading: bool,
    pub error: Option<String>,
}

struct Inner {
    api: Arc<dyn BlogApi>,
    state: RwLock<BlogState>,
    loading_bus: Option<Arc<ContentLoadingBus>>,
}

#[derive(Clone)]
pub struct BlogStore {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for BlogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlogStore").finish_non_exhaustive()
    }
}

impl BlogStore {
    pub fn new(api: Arc<dyn BlogApi>) -> Self {
        Self::with_loading_bus(api, None)
    }

    pub fn with_loading_bus(
        api: Arc<dyn BlogApi>,
        loading_bus: Option<Arc<ContentLoadingBus>>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                state: RwLock::new(BlogState::default()),
                loading_bus,
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, BlogState> {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BlogState> {
        self.inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn fail(&self, action: UserAction, err: &AppError) {
        let message = report_failure(action, err);
        self.write().error = Some(message);
    }

    pub fn snapshot(&self) -> BlogState {
        self.read().clone()
    }

    pub fn posts(&self) -> Vec<BlogPost> {
        self.read().posts.clone()
    }

    pub fn categories(&self) -> Vec<BlogCategory> {
        self.read().categories.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    /// Fetch every post and re-derive categories.
    pub async fn load_posts(&self) -> AppResult<()> {
        {
            let mut state = self.write();
            state.loading = true;
            state.error = None;
        }
        let _loading = self
            .inner
            .loading_bus
            .as_ref()
            .map(|bus| bus.track(BLOG_LOADING_KEY));

        match self.inner.api.list_posts().await {
            Ok(posts) => {
                let categories = derive_categories(&posts);
                tracing::debug!(
                    posts = posts.len(),
                    categories = categories.len(),
                    "Loaded blog posts"
                );
                let mut state = self.write();
                state.posts = posts;
                state.categories = categories;
                state.loading = false;
                Ok(())
            }
            Err(err) => {
                self.write().loading = false;
                self.fail(UserAction::LoadPosts, &err);
                Err(err)
            }
        }
    }

    // ---- views ----

    pub fn filters(&self) -> BlogFilters {
        self.read().filters.clone()
    }

    pub fn set_filters(&self, filters: BlogFilters) {
        self.write().filters = filters;
    }

    /// Posts matching the current filters, in the current order.
    pub fn filtered_posts(&self) -> Vec<BlogPost> {
        let state = self.read();
        query_posts(&state.posts, &state.filters)
    }

    /// One page of the filtered view.
    pub fn page(&self, page: usize) -> Page<BlogPost> {
        paginate(&self.filtered_posts(), page, BLOG_POSTS_PER_PAGE)
    }

    /// One page of the public listing: published posts, newest first.
    pub fn public_page(&self, page: usize) -> Page<BlogPost> {
        let published = published_posts(&self.read().posts);
        paginate(&published, page, BLOG_POSTS_PER_PAGE)
    }

    pub fn find_by_slug(&self, slug: &str) -> Option<BlogPost> {
        find_by_slug(&self.read().posts, slug).cloned()
    }

    /// Published-only lookup, as the public detail page resolves it.
    pub fn find_published(&self, slug: &str) -> Option<BlogPost> {
        self.find_by_slug(slug).filter(|post| post.is_published)
    }

    pub fn is_slug_available(&self, slug: &str, exclude_id: Option<&str>) -> bool {
        is_slug_available(&self.read().posts, slug, exclude_id)
    }

    // ---- mutations ----

    fn check_input(&self, id: Option<&str>, input: &BlogPostInput) -> AppResult<()> {
        input.validate()?;
        if !is_well_formed(&input.slug) {
            return Err(AppError::InvalidInput(format!(
                "Slug '{}' may only contain lowercase letters, digits, and hyphens",
                input.slug
            )));
        }
        if !self.is_slug_available(&input.slug, id) {
            return Err(AppError::SlugTaken(input.slug.clone()));
        }
        Ok(())
    }

    /// Create (`id == None`) or update a post, then reload everything.
    /// A failed reload does not undo the save: it only sets the banner.
    pub async fn save_post(&self, id: Option<&str>, mut input: BlogPostInput) -> AppResult<BlogPost> {
        if let Err(err) = self.check_input(id, &input) {
            self.fail(UserAction::SavePost, &err);
            return Err(err);
        }
        input.apply_publish_state(Utc::now());

        let saved = match id {
            Some(id) => self.inner.api.update_post(id, &input).await,
            None => self.inner.api.create_post(&input).await,
        };
        let post = match saved {
            Ok(post) => post,
            Err(err) => {
                self.fail(UserAction::SavePost, &err);
                return Err(err);
            }
        };
        tracing::info!(post_id = %post.id, slug = %post.slug, published = post.is_published, "Saved blog post");

        if let Err(err) = self.load_posts().await {
            tracing::warn!(post_id = %post.id, error = %err, "Saved blog post but reload failed");
        }
        Ok(post)
    }

    /// Flip the published flag of a loaded post.
    pub async fn set_published(&self, id: &str, published: bool) -> AppResult<BlogPost> {
        let current = self.read().posts.iter().find(|p| p.id == id).cloned();
        let Some(current) = current else {
            let err = AppError::NotFound(format!("Blog post {}", id));
            self.fail(UserAction::SavePost, &err);
            return Err(err);
        };
        let mut input = current.to_input();
        input.is_published = published;
        self.save_post(Some(id), input).await
    }

    pub async fn delete_post(&self, id: &str) -> AppResult<()> {
        if let Err(err) = self.inner.api.delete_post(id).await {
            self.fail(UserAction::DeletePost, &err);
            return Err(err);
        }
        if let Err(err) = self.load_posts().await {
            tracing::warn!(post_id = %id, error = %err, "Deleted blog post but reload failed");
        }
        Ok(())
    }
}
