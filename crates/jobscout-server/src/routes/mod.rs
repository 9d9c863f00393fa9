pub mod health;
pub mod search;

pub use health::health_handler;
pub use search::{SearchQuery, search_handler};
