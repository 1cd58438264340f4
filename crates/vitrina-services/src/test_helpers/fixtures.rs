//! Test fixtures and helper functions for creating test data

use chrono::{DateTime, Duration, TimeZone, Utc};
use vitrina_core::models::{BlogPost, MultimediaCategory, MultimediaFile};

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
}

/// An image file with a single `planta` tag.
pub fn file(id: &str) -> MultimediaFile {
    MultimediaFile {
        id: id.to_string(),
        filename: format!("{}.jpg", id),
        original_name: format!("{}.jpg", id),
        file_path: format!("uploads/images/{}.jpg", id),
        url: format!("https://cdn.example.com/uploads/images/{}.jpg", id),
        category: MultimediaCategory::Image,
        mime_type: "image/jpeg".to_string(),
        size: 2048,
        width: Some(800),
        height: Some(600),
        duration: None,
        tags: vec!["planta".to_string()],
        description: None,
        alt: None,
        created_at: base_time(),
        updated_at: None,
    }
}

/// A draft post created `day` days after [`base_time`].
pub fn post(id: &str, title: &str, category: &str, day: i64) -> BlogPost {
    let created = base_time() + Duration::days(day);
    BlogPost {
        id: id.to_string(),
        title: title.to_string(),
        slug: vitrina_core::slug::generate_slug(title),
        excerpt: String::new(),
        content: format!("Contenido de {}", title),
        featured_image: None,
        author: None,
        category: category.to_string(),
        tags: Vec::new(),
        is_published: false,
        published_at: None,
        created_at: created,
        updated_at: created,
    }
}

pub fn published(mut post: BlogPost) -> BlogPost {
    post.is_published = true;
    post.published_at = Some(post.created_at);
    post
}
