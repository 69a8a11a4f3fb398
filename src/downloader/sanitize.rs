// URL sanitization and whitelist validation
//
// Two layers: hostname whitelisting is the real gate (stops open-redirect
// style abuse through the URL field); the path-shape regexes are only a
// fast reject before we spend a metadata fetch.

use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

use super::errors::VideoError;

/// Hostnames accepted for analysis. Exact match only.
const ALLOWED_HOSTS: [&str; 4] = [
    "youtube.com",
    "www.youtube.com",
    "youtu.be",
    "m.youtube.com",
];

lazy_static! {
    static ref HTML_TAG: Regex = Regex::new(r"<[^>]*>").unwrap();
    static ref SCRIPT_SCHEME: Regex = Regex::new(r"(?i)javascript:").unwrap();
    static ref EVENT_HANDLER: Regex = Regex::new(r"(?i)on\w+\s*=").unwrap();
    static ref WATCH_PATH: Regex =
        Regex::new(r"^https?://(www\.|m\.)?youtube\.com/watch\?([^#]*&)?v=[\w-]+").unwrap();
    static ref EMBED_PATH: Regex =
        Regex::new(r"^https?://(www\.|m\.)?youtube\.com/embed/[\w-]+").unwrap();
    static ref LEGACY_V_PATH: Regex =
        Regex::new(r"^https?://(www\.|m\.)?youtube\.com/v/[\w-]+").unwrap();
    static ref SHORTS_PATH: Regex =
        Regex::new(r"^https?://(www\.|m\.)?youtube\.com/shorts/[\w-]+").unwrap();
    static ref SHORT_LINK: Regex = Regex::new(r"^https?://youtu\.be/[\w-]+").unwrap();
}

/// Remove HTML-tag-like substrings, script schemes and inline event
/// handler fragments, then trim.
pub fn strip_markup(input: &str) -> String {
    let stripped = HTML_TAG.replace_all(input, "");
    let stripped = SCRIPT_SCHEME.replace_all(&stripped, "");
    let stripped = EVENT_HANDLER.replace_all(&stripped, "");
    stripped.trim().to_string()
}

/// Check the hostname against the whitelist. Unparseable URLs fail.
pub fn is_allowed_host(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => parsed
            .host_str()
            .map_or(false, |host| ALLOWED_HOSTS.contains(&host)),
        Err(_) => false,
    }
}

/// Strip unsafe input and enforce the host whitelist.
pub fn sanitize_url(raw: &str) -> Result<String, VideoError> {
    let sanitized = strip_markup(raw);
    if sanitized.is_empty() || !is_allowed_host(&sanitized) {
        return Err(VideoError::InvalidUrl);
    }
    Ok(sanitized)
}

/// Secondary acceptance check: does the URL look like a video page?
/// Accepts watch, embed, legacy /v/, shorts and youtu.be short-link forms.
pub fn is_video_url(url: &str) -> bool {
    WATCH_PATH.is_match(url)
        || EMBED_PATH.is_match(url)
        || LEGACY_V_PATH.is_match(url)
        || SHORTS_PATH.is_match(url)
        || SHORT_LINK.is_match(url)
}

/// Pull the video id out of any accepted URL form.
pub fn extract_video_id(url: &str) -> Result<String, VideoError> {
    let parsed = Url::parse(url).map_err(|_| VideoError::InvalidUrl)?;

    if parsed.host_str() == Some("youtu.be") {
        if let Some(id) = parsed.path_segments().and_then(|mut segments| segments.next()) {
            if !id.is_empty() {
                return Ok(id.to_string());
            }
        }
        return Err(VideoError::InvalidUrl);
    }

    let path = parsed.path();
    if path == "/watch" {
        if let Some((_, id)) = parsed.query_pairs().find(|(key, _)| key == "v") {
            if !id.is_empty() {
                return Ok(id.into_owned());
            }
        }
    } else {
        for prefix in ["/embed/", "/v/", "/shorts/"] {
            if let Some(rest) = path.strip_prefix(prefix) {
                let id = rest.split('/').next().unwrap_or_default();
                if !id.is_empty() {
                    return Ok(id.to_string());
                }
            }
        }
    }

    Err(VideoError::InvalidUrl)
}
