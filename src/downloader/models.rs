// Common data models for the analyze and download flows

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Requested output kind for a download
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadKind {
    Mp4,
    Mp3,
}

impl DownloadKind {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Mp3 => "mp3",
        }
    }

    /// MIME type of the assembled payload.
    ///
    /// Chosen by the requested kind, not by the encoding's actual container.
    /// If the selector ever returned a non-MP4 container for the video kind
    /// the payload would be mislabeled; the selector currently filters to
    /// MP4, so this only matters if that filter changes.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp4 => "video/mp4",
            Self::Mp3 => "audio/mpeg",
        }
    }
}

/// One concrete stream variant offered by YouTube
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoEncoding {
    /// Provider-assigned opaque tag
    pub itag: String,
    /// Quality label, e.g. "720p"
    pub quality: String,
    /// Container format, e.g. "mp4", "webm"
    pub container: String,
    pub has_video: bool,
    pub has_audio: bool,
    /// Byte count as reported upstream, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_length: Option<String>,
    /// Direct fetch URL with provider-set, time-limited validity
    pub url: String,
}

/// Normalized metadata for one analyzed video.
///
/// Built once per successful analyze call and immutable afterwards. Every
/// entry in `formats` has an audio track; video-only encodings are dropped
/// during normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    pub video_id: String,
    pub title: String,
    pub author: String,
    /// Duration in seconds
    pub duration: u64,
    /// Representative thumbnail URL, may be empty
    pub thumbnail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Provider order preserved, at most 10 entries
    pub formats: Vec<VideoEncoding>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Assembled download result, ready for the save primitive or an HTTP body
#[derive(Debug, Clone)]
pub struct DownloadedMedia {
    pub bytes: Bytes,
    pub mime_type: &'static str,
    pub filename: String,
}
