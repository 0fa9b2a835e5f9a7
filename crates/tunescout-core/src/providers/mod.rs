// Provider implementations for the two catalogs
pub mod jamendo;
pub mod youtube;

pub use jamendo::JamendoProvider;
pub use youtube::YouTubeProvider;
