// Base URL normalization.
//
// Server URLs come from user input, so stray whitespace and a missing
// trailing slash are common. A normalized base URL always ends in `/`,
// which makes relative request paths join underneath it instead of
// replacing its last segment.

use tracing::warn;
use url::Url;

/// Normalize a user-supplied server URL.
///
/// Returns `None` for empty input and for anything that is not an
/// absolute `http`/`https` URL with a host. An unusable URL is treated
/// the same as an unconfigured one.
pub fn normalize_url(raw: &str) -> Option<Url> {
    let cleaned: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return None;
    }

    let mut url = match Url::parse(&cleaned) {
        Ok(url) => url,
        Err(e) => {
            warn!(error = %e, "ignoring invalid server URL");
            return None;
        }
    };

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        warn!(scheme = url.scheme(), "ignoring server URL without http(s) host");
        return None;
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Some(url)
}

/// Resolve a request target against a base URL.
///
/// Absolute `http(s)` URLs pass through untouched. Anything else is a
/// path below the base: a leading `/` does not escape a base path prefix
/// such as `https://host/openhab/`.
pub fn resolve_url(base: &Url, target: &str) -> Result<Url, url::ParseError> {
    if let Ok(absolute) = Url::parse(target) {
        if matches!(absolute.scheme(), "http" | "https") {
            return Ok(absolute);
        }
    }
    base.join(target.trim_start_matches('/'))
}
