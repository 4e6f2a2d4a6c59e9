/// Stage-level errors abort the whole search request; `EnrichmentError` is
/// recorded on the individual lead and never aborts the batch.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("no location found for \"{0}\"")]
    NoMatch(String),
    #[error("geocoding service returned status {0}")]
    UpstreamStatus(String),
    #[error("request to geocoding service failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Covers both the places search and the owner web search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("search service returned status {0}")]
    UpstreamStatus(String),
    #[error("request to search service failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum EnrichmentError {
    #[error("web search failed: {0}")]
    Search(#[from] SearchError),
    #[error("ai service failed: {0}")]
    Model(String),
    #[error("could not parse ai response: {0}")]
    MalformedResponse(String),
}
