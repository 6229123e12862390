//! Video-platform URL classification.
//!
//! Every function here is total: a URL that does not parse is simply not a
//! video link and carries no video id.
use url::Url;

const CANONICAL_HOSTS: &[&str] = &["youtube.com", "www.youtube.com"];
const SHORT_LINK_HOST: &str = "youtu.be";
const SHORT_FORM_SEGMENT: &str = "/shorts/";
const WATCH_PATH: &str = "/watch";
const VIDEO_ID_PARAM: &str = "v";

/// True when the host is one of the known video-hosting domains.
pub fn is_video_platform(url: &str) -> bool {
    match host_of(url) {
        Some(host) => CANONICAL_HOSTS.contains(&host.as_str()) || host == SHORT_LINK_HOST,
        None => false,
    }
}

/// True when the path contains the short-form segment (`/shorts/`).
pub fn is_short_form(url: &str) -> bool {
    Url::parse(url)
        .map(|parsed| parsed.path().contains(SHORT_FORM_SEGMENT))
        .unwrap_or(false)
}

/// Extract the video id from a canonical watch URL or a short link.
///
/// - `https://www.youtube.com/watch?v=abc123` -> `abc123` (first non-empty `v` wins)
/// - `https://youtu.be/abc123` -> `abc123`
/// - anything else, including `/shorts/...` -> `None`
pub fn extract_video_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();

    if CANONICAL_HOSTS.contains(&host.as_str()) {
        if parsed.path() != WATCH_PATH {
            return None;
        }
        return parsed
            .query_pairs()
            .filter(|(key, _)| key == VIDEO_ID_PARAM)
            .map(|(_, value)| value.into_owned())
            .find(|value| !value.is_empty());
    }

    if host == SHORT_LINK_HOST {
        let remainder = parsed.path().trim_start_matches('/');
        if remainder.is_empty() {
            return None;
        }
        return Some(remainder.to_string());
    }

    None
}

fn host_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed.host_str().map(|host| host.to_ascii_lowercase())
}
