//! Building the search-engine URL for a serialized query.

/// Default search endpoint
pub const DEFAULT_ENGINE_URL: &str = "https://www.google.com/search";

/// URL that runs `query` on `engine_url`, or `None` for an empty query.
///
/// The query is percent-encoded as the single `q` parameter.
pub fn search_url(engine_url: &str, query: &str) -> Option<String> {
    if query.is_empty() {
        return None;
    }

    let separator = if engine_url.contains('?') { '&' } else { '?' };
    Some(format!(
        "{}{}q={}",
        engine_url,
        separator,
        urlencoding::encode(query)
    ))
}
