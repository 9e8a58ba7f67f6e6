mod error;
pub mod generation;
pub mod map_search;

pub use error::{GenerationError, ProviderError};
pub use generation::GenerationClient;
pub use map_search::{search_keywords, MapSearchClient};
