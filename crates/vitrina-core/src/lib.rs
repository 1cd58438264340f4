//! Vitrina Core Library
//!
//! Domain models, error types, configuration, and the pure client-side logic
//! (file validation, slugs, blog queries, pagination) shared by the API
//! client, the orchestration services, and the CLI.

pub mod blog;
pub mod config;
pub mod error;
pub mod models;
pub mod pagination;
pub mod slug;
pub mod validation;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::{AppError, AppResult, LogLevel};
pub use pagination::{paginate, Page, PageInfo, BLOG_POSTS_PER_PAGE};
pub use validation::{validate_file, validate_upload, FileValidation, FileValidationError};
