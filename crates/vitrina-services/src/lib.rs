//! Vitrina Services
//!
//! State and orchestration for the multimedia library and the blog. Services
//! sit between a front end and the transport: they hold what the UI renders,
//! turn user actions into API calls, and merge results back.

pub mod actions;
pub mod blog_store;
pub mod debounce;
pub mod loading;
pub mod media_library;
pub mod upload;

#[cfg(test)]
mod test_helpers;

pub use actions::{report_failure, UserAction};
pub use blog_store::{BlogState, BlogStore, BLOG_LOADING_KEY};
pub use debounce::Debouncer;
pub use loading::{ContentLoadingBus, LoadingEvent, LoadingGuard, LoadingSubscription};
pub use media_library::{LibraryState, MediaLibrary, MediaLibraryOptions, MULTIMEDIA_LOADING_KEY};
pub use upload::{UploadRecord, UploadStatus};
