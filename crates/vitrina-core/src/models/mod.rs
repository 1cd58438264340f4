//! Data models for the CMS client
//!
//! Wire-compatible shapes for the multimedia library and the blog, plus the
//! ephemeral filter sets the orchestration layer keeps.

mod blog;
mod multimedia;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use blog::*;
pub use multimedia::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("Invalid sort order '{}'. Must be: asc or desc", other)),
        }
    }
}
