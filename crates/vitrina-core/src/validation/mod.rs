//! Validation modules

pub mod file;

pub use file::{
    accepted_mime_types, category_for_mime, format_file_size, max_size_for, validate_file,
    validate_upload, FileValidation, FileValidationError,
};
