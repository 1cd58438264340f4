//! Test helpers for service unit tests
//!
//! In-memory doubles for the transport traits plus fixture builders, so the
//! orchestration layer can be exercised without an HTTP server.

pub mod fixtures;
pub mod mock_api;

pub use fixtures::*;
pub use mock_api::{MockBlogApi, MockMultimediaApi};
