//! HTTP API handlers

pub mod health;
pub mod search;

pub use health::{health_check, health_routes, root_status};
pub use search::{jamendo_search, youtube_search, SearchError, SearchParams};
