pub mod enricher;
pub mod errors;
pub mod fixtures;
pub mod maps_client;
pub mod openai_client;
pub mod web_search;

pub use enricher::*;
pub use errors::*;
pub use maps_client::*;
pub use openai_client::*;
pub use web_search::*;
