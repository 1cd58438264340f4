//! Blog/news endpoints (`/noticias`). Plain JSON, no multipart.

use async_trait::async_trait;
use vitrina_core::models::{BlogPost, BlogPostInput};
use vitrina_core::AppResult;

use crate::traits::BlogApi;
use crate::{item_path, ApiClient};

const NOTICIAS_PATH: &str = "/noticias";

#[async_trait]
impl BlogApi for ApiClient {
    async fn list_posts(&self) -> AppResult<Vec<BlogPost>> {
        self.get(NOTICIAS_PATH, &[]).await
    }

    async fn get_post(&self, id: &str) -> AppResult<BlogPost> {
        self.get(&item_path(NOTICIAS_PATH, id), &[]).await
    }

    async fn create_post(&self, input: &BlogPostInput) -> AppResult<BlogPost> {
        let post: BlogPost = self.post_json(NOTICIAS_PATH, input).await?;
        tracing::info!(post_id = %post.id, slug = %post.slug, "Created blog post");
        Ok(post)
    }

    async fn update_post(&self, id: &str, input: &BlogPostInput) -> AppResult<BlogPost> {
        self.put_json(&item_path(NOTICIAS_PATH, id), input).await
    }

    async fn delete_post(&self, id: &str) -> AppResult<()> {
        self.delete::<()>(&item_path(NOTICIAS_PATH, id), None)
            .await?;
        tracing::info!(post_id = %id, "Deleted blog post");
        Ok(())
    }
}
