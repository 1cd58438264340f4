//! Filtering, ordering, and slug checks over the loaded post collection.

use std::cmp::Ordering;

use crate::models::{BlogFilters, BlogPost, BlogSortField, PublishStatus, SortOrder};

/// Case-insensitive substring match against title, content, and excerpt.
pub fn matches_search(post: &BlogPost, search: &str) -> bool {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    [&post.title, &post.content, &post.excerpt]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Every active filter must match (logical AND). Selected tags must all be
/// present on the post.
pub fn matches_filters(post: &BlogPost, filters: &BlogFilters) -> bool {
    if !matches_search(post, &filters.search) {
        return false;
    }
    if let Some(status) = filters.status {
        if post.status() != status {
            return false;
        }
    }
    if let Some(category) = filters.category.as_deref() {
        if post.category != category {
            return false;
        }
    }
    filters.tags.iter().all(|wanted| {
        post.tags
            .iter()
            .any(|tag| tag.to_lowercase() == wanted.to_lowercase())
    })
}

pub fn filter_posts<'a>(posts: &'a [BlogPost], filters: &BlogFilters) -> Vec<&'a BlogPost> {
    posts
        .iter()
        .filter(|post| matches_filters(post, filters))
        .collect()
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

pub fn compare_posts(a: &BlogPost, b: &BlogPost, sort_by: BlogSortField) -> Ordering {
    match sort_by {
        BlogSortField::Date => {
            let diff = a.sort_date().timestamp_millis() - b.sort_date().timestamp_millis();
            diff.cmp(&0)
        }
        BlogSortField::Title => compare_text(&a.title, &b.title),
        BlogSortField::Author => compare_text(
            a.author.as_deref().unwrap_or_default(),
            b.author.as_deref().unwrap_or_default(),
        ),
    }
}

/// Stable sort; descending flips the comparator rather than reversing, so
/// ties keep their original order either way.
pub fn sort_posts(posts: &mut [&BlogPost], sort_by: BlogSortField, order: SortOrder) {
    posts.sort_by(|a, b| {
        let ordering = compare_posts(a, b, sort_by);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

/// Filter then sort, returning owned posts ready for slicing.
pub fn query_posts(posts: &[BlogPost], filters: &BlogFilters) -> Vec<BlogPost> {
    let mut matched = filter_posts(posts, filters);
    sort_posts(&mut matched, filters.sort_by, filters.sort_order);
    matched.into_iter().cloned().collect()
}

/// Published posts, newest first, as the public blog lists them.
pub fn published_posts(posts: &[BlogPost]) -> Vec<BlogPost> {
    query_posts(
        posts,
        &BlogFilters {
            status: Some(PublishStatus::Published),
            ..Default::default()
        },
    )
}

/// Linear scan for another post using `slug`. `exclude_id` is the post being
/// edited. Advisory only: concurrent editors can still collide.
pub fn is_slug_available(posts: &[BlogPost], slug: &str, exclude_id: Option<&str>) -> bool {
    !posts
        .iter()
        .any(|post| post.slug == slug && Some(post.id.as_str()) != exclude_id)
}

pub fn find_by_slug<'a>(posts: &'a [BlogPost], slug: &str) -> Option<&'a BlogPost> {
    posts.iter().find(|post| post.slug == slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn post(id: &str, title: &str, category: &str, tags: &[&str], day: u32) -> BlogPost {
        let created = Utc.with_ymd_and_hms(2024, 3, day, 9, 0, 0).unwrap();
        BlogPost {
            id: id.to_string(),
            title: title.to_string(),
            slug: crate::slug::generate_slug(title),
            excerpt: String::new(),
            content: String::new(),
            featured_image: None,
            author: None,
            category: category.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            is_published: true,
            published_at: Some(created),
            created_at: created,
            updated_at: created,
        }
    }

    fn sample() -> Vec<BlogPost> {
        let mut with_content = post("2", "Monitoreo remoto", "Tecnología", &["iot"], 2);
        with_content.content = "Integración con la plataforma WiSensor".to_string();

        let mut with_excerpt = post("3", "Caso de éxito", "Clientes", &["iot", "minería"], 3);
        with_excerpt.excerpt = "Cómo WISENSOR redujo costos".to_string();

        let mut draft = post("4", "Borrador interno", "Tecnología", &[], 4);
        draft.is_published = false;
        draft.published_at = None;

        vec![
            post("1", "Lanzamiento Wisensor 2.0", "Productos", &["lanzamiento"], 1),
            with_content,
            with_excerpt,
            draft,
        ]
    }

    fn ids(posts: &[&BlogPost]) -> Vec<String> {
        posts.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn test_search_spans_title_content_excerpt() {
        let posts = sample();
        let filters = BlogFilters {
            search: "wisensor".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(&filter_posts(&posts, &filters)), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_filters_combine_with_and() {
        let posts = sample();
        let filters = BlogFilters {
            search: "wisensor".to_string(),
            category: Some("Clientes".to_string()),
            tags: vec!["IoT".to_string()],
            ..Default::default()
        };
        assert_eq!(ids(&filter_posts(&posts, &filters)), vec!["3"]);

        let filters = BlogFilters {
            search: "wisensor".to_string(),
            category: Some("Productos".to_string()),
            tags: vec!["iot".to_string()],
            ..Default::default()
        };
        assert!(filter_posts(&posts, &filters).is_empty());
    }

    #[test]
    fn test_status_filter() {
        let posts = sample();
        let drafts = BlogFilters {
            status: Some(PublishStatus::Draft),
            ..Default::default()
        };
        assert_eq!(ids(&filter_posts(&posts, &drafts)), vec!["4"]);
    }

    #[test]
    fn test_category_filter_is_exact() {
        let posts = sample();
        let filters = BlogFilters {
            category: Some("tecnología".to_string()),
            ..Default::default()
        };
        assert!(filter_posts(&posts, &filters).is_empty());
    }

    #[test]
    fn test_date_sort_uses_publish_then_creation_date() {
        let posts = sample();
        let newest_first = query_posts(&posts, &BlogFilters::default());
        let order: Vec<_> = newest_first.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order, vec!["4", "3", "2", "1"]);

        let oldest_first = query_posts(
            &posts,
            &BlogFilters {
                sort_order: SortOrder::Asc,
                ..Default::default()
            },
        );
        assert_eq!(oldest_first[0].id, "1");
    }

    #[test]
    fn test_title_sort_ignores_case() {
        let mut posts = sample();
        posts[0].title = "alfa".to_string();
        posts[1].title = "Beta".to_string();
        posts[2].title = "gamma".to_string();
        posts[3].title = "Delta".to_string();

        let sorted = query_posts(
            &posts,
            &BlogFilters {
                sort_by: BlogSortField::Title,
                sort_order: SortOrder::Asc,
                ..Default::default()
            },
        );
        let titles: Vec<_> = sorted.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["alfa", "Beta", "Delta", "gamma"]);
    }

    #[test]
    fn test_author_sort_puts_missing_first_ascending() {
        let mut posts = sample();
        posts[0].author = Some("Valentina".to_string());
        posts[1].author = Some("andrés".to_string());

        let sorted = query_posts(
            &posts,
            &BlogFilters {
                sort_by: BlogSortField::Author,
                sort_order: SortOrder::Asc,
                ..Default::default()
            },
        );
        let last_two: Vec<_> = sorted[2..].iter().map(|p| p.id.as_str()).collect();
        assert_eq!(last_two, vec!["2", "1"]);
    }

    #[test]
    fn test_published_posts_excludes_drafts() {
        let posts = sample();
        let public = published_posts(&posts);
        assert_eq!(public.len(), 3);
        assert!(public.iter().all(|p| p.is_published));
    }

    #[test]
    fn test_slug_availability_excludes_self() {
        let posts = sample();
        let taken = posts[0].slug.clone();

        assert!(!is_slug_available(&posts, &taken, None));
        assert!(!is_slug_available(&posts, &taken, Some("2")));
        assert!(is_slug_available(&posts, &taken, Some("1")));
        assert!(is_slug_available(&posts, "nuevo-articulo", None));
        assert_eq!(find_by_slug(&posts, &taken).map(|p| p.id.as_str()), Some("1"));
    }
}
