//! Blog categories are not stored; they are derived from the posts.

use crate::models::{BlogCategory, BlogPost};
use crate::slug::generate_slug;

pub const CATEGORY_PALETTE: [&str; 10] = [
    "#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#EC4899", "#14B8A6", "#F97316",
    "#6366F1", "#84CC16",
];

/// Deterministic palette pick: 31-multiplier rolling hash over UTF-16 units.
pub fn category_color(name: &str) -> &'static str {
    let hash = name.encode_utf16().fold(0i32, |hash, unit| {
        i32::from(unit).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash))
    });
    CATEGORY_PALETTE[hash.unsigned_abs() as usize % CATEGORY_PALETTE.len()]
}

/// Distinct non-blank categories in first-seen order, with post counts.
pub fn derive_categories(posts: &[BlogPost]) -> Vec<BlogCategory> {
    let mut categories: Vec<BlogCategory> = Vec::new();

    for post in posts {
        let name = post.category.trim();
        if name.is_empty() {
            continue;
        }
        match categories.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.post_count += 1,
            None => {
                let slug = generate_slug(name);
                categories.push(BlogCategory {
                    id: slug.clone(),
                    name: name.to_string(),
                    slug,
                    color: category_color(name).to_string(),
                    post_count: 1,
                });
            }
        }
    }

    categories
}
