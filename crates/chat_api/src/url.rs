use url::Url;

use crate::error::ChatApiError;

/// Default backend address used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Join a base URL and endpoint path segments.
///
/// Normalization rules:
/// 1) blank input falls back to [`DEFAULT_BASE_URL`]
/// 2) trailing slashes on the base are dropped
/// 3) each segment is percent-encoded as a single path segment
pub fn endpoint(base: &str, segments: &[&str]) -> Result<Url, ChatApiError> {
    let base = if base.trim().is_empty() {
        DEFAULT_BASE_URL
    } else {
        base.trim()
    };

    let mut url = Url::parse(base.trim_end_matches('/'))
        .map_err(|error| ChatApiError::InvalidBaseUrl(format!("{base}: {error}")))?;

    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| ChatApiError::InvalidBaseUrl(format!("{base}: cannot be a base")))?;
        path.pop_if_empty();
        path.extend(segments);
    }

    Ok(url)
}
