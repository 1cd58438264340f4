use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::SortOrder;

/// A blog/news post as served by `/noticias`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlogPost {
    /// Timestamp used for date ordering: publication date, else creation date.
    pub fn sort_date(&self) -> DateTime<Utc> {
        self.published_at.unwrap_or(self.created_at)
    }

    pub fn status(&self) -> PublishStatus {
        if self.is_published {
            PublishStatus::Published
        } else {
            PublishStatus::Draft
        }
    }

    /// Editable fields of this post, for round-tripping through an update.
    pub fn to_input(&self) -> BlogPostInput {
        BlogPostInput {
            title: self.title.clone(),
            slug: self.slug.clone(),
            excerpt: self.excerpt.clone(),
            content: self.content.clone(),
            featured_image: self.featured_image.clone(),
            author: self.author.clone(),
            category: self.category.clone(),
            tags: self.tags.clone(),
            is_published: self.is_published,
            published_at: self.published_at,
        }
    }
}

/// Create/update payload for a blog post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostInput {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Title must be between 1 and 200 characters"
    ))]
    pub title: String,
    #[validate(length(
        min = 1,
        max = 200,
        message = "Slug must be between 1 and 200 characters"
    ))]
    pub slug: String,
    #[validate(length(max = 500, message = "Excerpt must be at most 500 characters"))]
    pub excerpt: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
}

impl BlogPostInput {
    /// Stamp `published_at` the first time a post goes live. Never overwrites
    /// an existing stamp, and unpublishing keeps it.
    pub fn apply_publish_state(&mut self, now: DateTime<Utc>) {
        if self.is_published && self.published_at.is_none() {
            self.published_at = Some(now);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishStatus {
    Published,
    Draft,
}

impl FromStr for PublishStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "published" | "publicado" => Ok(PublishStatus::Published),
            "draft" | "borrador" => Ok(PublishStatus::Draft),
            other => Err(format!(
                "Invalid status '{}'. Must be: published or draft",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlogSortField {
    #[default]
    Date,
    Title,
    Author,
}

impl FromStr for BlogSortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "date" => Ok(BlogSortField::Date),
            "title" => Ok(BlogSortField::Title),
            "author" => Ok(BlogSortField::Author),
            other => Err(format!(
                "Invalid sort field '{}'. Must be: date, title, or author",
                other
            )),
        }
    }
}

/// Client-side filters over the loaded post collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlogFilters {
    pub search: String,
    pub status: Option<PublishStatus>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub sort_by: BlogSortField,
    pub sort_order: SortOrder,
}

/// Category derived from the posts that carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogCategory {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub color: String,
    pub post_count: usize,
}
