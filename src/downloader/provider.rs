// Video info provider seam
//
// Raw extraction is an external collaborator. Implementations classify
// their own failures into `ProviderError` so callers never have to parse
// free-text error messages.

use std::fmt;

use async_trait::async_trait;

/// Fixed user agent sent upstream with every metadata request
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Thumbnail entry as reported upstream, ordered worst-to-best resolution
#[derive(Debug, Clone)]
pub struct RawThumbnail {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// One stream variant exactly as the provider reported it
#[derive(Debug, Clone)]
pub struct RawFormat {
    pub itag: String,
    /// Resolution label when the provider knows one, e.g. "720p"
    pub quality_label: Option<String>,
    /// Coarser quality hint used when no label exists
    pub quality: Option<String>,
    pub container: Option<String>,
    pub has_video: bool,
    pub has_audio: bool,
    pub content_length: Option<String>,
    pub url: String,
}

/// Unfiltered extraction result
#[derive(Debug, Clone)]
pub struct RawVideoInfo {
    pub title: String,
    pub uploader: String,
    pub duration_seconds: u64,
    pub description: Option<String>,
    pub thumbnails: Vec<RawThumbnail>,
    pub formats: Vec<RawFormat>,
}

/// Structured provider failures, classified at the provider boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Video unavailable, private, deleted or gated
    NotFound,
    /// Upstream throttled the extraction
    RateLimited,
    /// DNS, timeout or connectivity failure
    Network(String),
    /// Extraction tool missing or failed to launch
    Tool(String),
    /// Provider output could not be parsed
    Parse(String),
    /// Anything the provider could not classify
    Other(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "video not found"),
            Self::RateLimited => write!(f, "rate limited by upstream"),
            Self::Network(msg) => write!(f, "network failure: {}", msg),
            Self::Tool(msg) => write!(f, "extraction tool error: {}", msg),
            Self::Parse(msg) => write!(f, "parse error: {}", msg),
            Self::Other(msg) => write!(f, "provider error: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Trait for metadata extraction collaborators
#[async_trait]
pub trait VideoInfoProvider: Send + Sync {
    /// Name of the provider (for logging)
    fn name(&self) -> &'static str;

    /// Extract raw metadata for a validated video URL
    async fn fetch_info(&self, url: &str) -> Result<RawVideoInfo, ProviderError>;
}
