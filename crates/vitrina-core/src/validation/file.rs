//! Client-side file checks run before an upload is attempted.

use crate::models::MultimediaCategory;

const MB: u64 = 1024 * 1024;

pub const IMAGE_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

pub const VIDEO_MIME_TYPES: &[&str] = &[
    "video/mp4",
    "video/webm",
    "video/ogg",
    "video/quicktime",
    "video/x-msvideo",
];

pub const SVG_MIME_TYPES: &[&str] = &["image/svg+xml"];

pub const DOCUMENT_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "text/plain",
];

/// Lookup order matters: the first table containing the MIME type wins.
const CATEGORY_TABLES: [(MultimediaCategory, &[&str]); 4] = [
    (MultimediaCategory::Image, IMAGE_MIME_TYPES),
    (MultimediaCategory::Video, VIDEO_MIME_TYPES),
    (MultimediaCategory::Svg, SVG_MIME_TYPES),
    (MultimediaCategory::Document, DOCUMENT_MIME_TYPES),
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FileValidationError {
    #[error("Tipo de archivo no permitido: {0}")]
    UnsupportedType(String),

    #[error("El archivo excede el tamaño máximo permitido de {max_mb}MB")]
    TooLarge {
        category: MultimediaCategory,
        max_mb: u64,
        size: u64,
    },

    #[error("La categoría {requested} no corresponde al tipo de archivo ({detected})")]
    CategoryMismatch {
        requested: MultimediaCategory,
        detected: MultimediaCategory,
    },
}

/// Outcome of [`validate_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileValidation {
    Valid { category: MultimediaCategory },
    Invalid { error: FileValidationError },
}

impl FileValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, FileValidation::Valid { .. })
    }

    pub fn category(&self) -> Option<MultimediaCategory> {
        match self {
            FileValidation::Valid { category } => Some(*category),
            FileValidation::Invalid { .. } => None,
        }
    }

    pub fn into_result(self) -> Result<MultimediaCategory, FileValidationError> {
        match self {
            FileValidation::Valid { category } => Ok(category),
            FileValidation::Invalid { error } => Err(error),
        }
    }
}

/// Strip parameters and lowercase ("Image/PNG; charset=binary" -> "image/png").
fn normalize_mime_type(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or(mime_type)
        .trim()
        .to_lowercase()
}

pub fn category_for_mime(mime_type: &str) -> Option<MultimediaCategory> {
    let normalized = normalize_mime_type(mime_type);
    CATEGORY_TABLES
        .iter()
        .find(|(_, table)| table.contains(&normalized.as_str()))
        .map(|(category, _)| *category)
}

/// Size ceiling in bytes for a category.
pub fn max_size_for(category: MultimediaCategory) -> u64 {
    match category {
        MultimediaCategory::Image => 10 * MB,
        MultimediaCategory::Video => 100 * MB,
        MultimediaCategory::Svg => MB,
        MultimediaCategory::Document => 20 * MB,
    }
}

/// Every MIME type the uploader accepts, in lookup order.
pub fn accepted_mime_types() -> Vec<&'static str> {
    CATEGORY_TABLES
        .iter()
        .flat_map(|(_, table)| table.iter().copied())
        .collect()
}

pub fn validate_file(mime_type: &str, size: u64) -> FileValidation {
    let Some(category) = category_for_mime(mime_type) else {
        return FileValidation::Invalid {
            error: FileValidationError::UnsupportedType(mime_type.to_string()),
        };
    };

    let max_size = max_size_for(category);
    if size > max_size {
        return FileValidation::Invalid {
            error: FileValidationError::TooLarge {
                category,
                max_mb: max_size / MB,
                size,
            },
        };
    }

    FileValidation::Valid { category }
}

/// [`validate_file`] plus the caller's category override, which must agree
/// with the category derived from the MIME type.
pub fn validate_upload(
    mime_type: &str,
    size: u64,
    requested: Option<MultimediaCategory>,
) -> Result<MultimediaCategory, FileValidationError> {
    let detected = validate_file(mime_type, size).into_result()?;
    match requested {
        Some(requested) if requested != detected => {
            Err(FileValidationError::CategoryMismatch {
                requested,
                detected,
            })
        }
        _ => Ok(detected),
    }
}

/// Human-readable size ("0 Bytes", "512 Bytes", "1.5 KB", "10 MB").
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{} {}", rounded as u64, UNITS[unit])
    } else {
        let text = format!("{:.2}", rounded);
        format!("{} {}", text.trim_end_matches('0'), UNITS[unit])
    }
}
