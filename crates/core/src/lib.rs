use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of one search-and-classify run over a user's cast history.
///
/// `matches` is in page-fetch order (most-recent-first, the upstream
/// API's default ordering). `deletable_matches` counts the subset of
/// `matches` strictly older than the cutoff the caller supplied, so it
/// is always <= `total_matches`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub total_matches: usize,
    pub deletable_matches: usize,
    pub matches: Vec<CastMatch>,
}

/// Reduced projection of a matched cast: just enough for the browser
/// to display it and for the delete endpoint to act on it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastMatch {
    pub hash: String,
    pub timestamp: DateTime<Utc>,
}
