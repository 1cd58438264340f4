//! Blog content logic: pure functions over the loaded post collection.

pub mod categories;
pub mod query;

pub use categories::{category_color, derive_categories, CATEGORY_PALETTE};
pub use query::{
    filter_posts, find_by_slug, is_slug_available, matches_filters, published_posts, query_posts,
    sort_posts,
};
