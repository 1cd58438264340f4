use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::SortOrder;

pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Multimedia category, derived from the file's MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MultimediaCategory {
    Image,
    Video,
    Svg,
    Document,
}

impl MultimediaCategory {
    pub const ALL: [MultimediaCategory; 4] = [
        MultimediaCategory::Image,
        MultimediaCategory::Video,
        MultimediaCategory::Svg,
        MultimediaCategory::Document,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MultimediaCategory::Image => "image",
            MultimediaCategory::Video => "video",
            MultimediaCategory::Svg => "svg",
            MultimediaCategory::Document => "document",
        }
    }
}

impl fmt::Display for MultimediaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MultimediaCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image" | "images" => Ok(MultimediaCategory::Image),
            "video" | "videos" => Ok(MultimediaCategory::Video),
            "svg" => Ok(MultimediaCategory::Svg),
            "document" | "documents" => Ok(MultimediaCategory::Document),
            other => Err(format!(
                "Invalid category '{}'. Must be: image, video, svg, or document",
                other
            )),
        }
    }
}

/// A file stored in the multimedia library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultimediaFile {
    pub id: String,
    pub filename: String,
    pub original_name: String,
    pub file_path: String,
    pub url: String,
    pub category: MultimediaCategory,
    pub mime_type: String,
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A file to upload. `category`, when set, must match the MIME-derived one.
#[derive(Debug, Clone)]
pub struct UploadFileRequest {
    pub file_name: String,
    pub mime_type: String,
    pub data: Bytes,
    pub category: Option<MultimediaCategory>,
    pub tags: Vec<String>,
    pub description: Option<String>,
    pub alt: Option<String>,
}

impl UploadFileRequest {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            data: data.into(),
            category: None,
            tags: Vec::new(),
            description: None,
            alt: None,
        }
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Metadata patch for `PUT /multimedia/:id`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct UpdateMultimediaRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(
        min = 1,
        max = 255,
        message = "Filename must be between 1 and 255 characters"
    ))]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<MultimediaCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 255, message = "Alt text must be at most 255 characters"))]
    pub alt: Option<String>,
}

impl UpdateMultimediaRequest {
    pub fn is_empty(&self) -> bool {
        self.filename.is_none()
            && self.category.is_none()
            && self.tags.is_none()
            && self.description.is_none()
            && self.alt.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultimediaSortField {
    #[default]
    CreatedAt,
    Filename,
    Size,
    Category,
}

impl MultimediaSortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            MultimediaSortField::CreatedAt => "created_at",
            MultimediaSortField::Filename => "filename",
            MultimediaSortField::Size => "size",
            MultimediaSortField::Category => "category",
        }
    }
}

impl FromStr for MultimediaSortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" | "date" => Ok(MultimediaSortField::CreatedAt),
            "filename" | "name" => Ok(MultimediaSortField::Filename),
            "size" => Ok(MultimediaSortField::Size),
            "category" => Ok(MultimediaSortField::Category),
            other => Err(format!("Invalid sort field '{}'", other)),
        }
    }
}

/// Listing filters for the multimedia library.
#[derive(Debug, Clone, PartialEq)]
pub struct MultimediaFilters {
    pub search: String,
    pub category: Option<MultimediaCategory>,
    pub tags: Vec<String>,
    pub sort_field: MultimediaSortField,
    pub sort_order: SortOrder,
    /// 1-based.
    pub page: u32,
    pub limit: u32,
}

impl Default for MultimediaFilters {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: None,
            tags: Vec::new(),
            sort_field: MultimediaSortField::CreatedAt,
            sort_order: SortOrder::Desc,
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl MultimediaFilters {
    pub fn skip(&self) -> u64 {
        u64::from(self.page.max(1) - 1) * u64::from(self.limit)
    }

    /// Search/category/tag parameters shared by the list and count endpoints.
    pub fn filter_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        let search = self.search.trim();
        if !search.is_empty() {
            query.push(("search", search.to_string()));
        }
        if let Some(category) = self.category {
            query.push(("category", category.to_string()));
        }
        if !self.tags.is_empty() {
            query.push(("tags", self.tags.join(",")));
        }
        query
    }

    /// Whether `file` belongs in a listing with these filters. Search is a
    /// case-insensitive substring match over names, description, and alt
    /// text; every selected tag must be present.
    pub fn matches(&self, file: &MultimediaFile) -> bool {
        if self.category.is_some_and(|category| category != file.category) {
            return false;
        }
        if !self
            .tags
            .iter()
            .all(|tag| file.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)))
        {
            return false;
        }
        let search = self.search.trim().to_lowercase();
        if search.is_empty() {
            return true;
        }
        [
            Some(file.filename.as_str()),
            Some(file.original_name.as_str()),
            file.description.as_deref(),
            file.alt.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|text| text.to_lowercase().contains(&search))
    }

    /// Full query for the list endpoint: paging and sort plus the filters.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("skip", self.skip().to_string()),
            ("limit", self.limit.to_string()),
            ("sortField", self.sort_field.as_str().to_string()),
            ("sortOrder", self.sort_order.as_str().to_string()),
        ];
        query.extend(self.filter_query());
        query
    }
}

/// Response of `GET /multimedia/count`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TotalCount {
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub category: MultimediaCategory,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub size: u64,
}

/// Response of `GET /multimedia/stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultimediaStats {
    #[serde(default)]
    pub total_files: u64,
    #[serde(default)]
    pub total_size: u64,
    #[serde(default)]
    pub by_category: Vec<CategoryStats>,
}

impl MultimediaStats {
    pub fn count_for(&self, category: MultimediaCategory) -> u64 {
        self.by_category
            .iter()
            .find(|s| s.category == category)
            .map(|s| s.count)
            .unwrap_or(0)
    }
}
