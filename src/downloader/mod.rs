// Downloader core - sanitization, metadata normalization, format
// selection and the streaming fetch

pub mod errors;
pub mod format_selector;
pub mod metadata;
pub mod models;
pub mod provider;
pub mod sanitize;
pub mod save;
pub mod stream;
pub mod ytdlp;

pub use errors::{RateLimitScope, UserFacingError, VideoError};
pub use metadata::MetadataService;
pub use models::{DownloadKind, DownloadedMedia, VideoEncoding, VideoMetadata};
pub use provider::{ProviderError, RawVideoInfo, VideoInfoProvider};
pub use stream::StreamingDownloader;
pub use ytdlp::YtDlpProvider;
