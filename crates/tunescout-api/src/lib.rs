// HTTP clients: the two upstream music catalogs plus our own search API
pub mod backend;
pub mod jamendo;
pub mod youtube;

// Re-export common types
pub use backend::{ApiSearchResponse, BackendClient, BackendError, DEFAULT_API_BASE};
pub use jamendo::{JamendoClient, JamendoError, JamendoTrack};
pub use youtube::{YouTubeClient, YouTubeError, YouTubeVideo};
