// Deterministic format selection
//
// Video picks the most-preferred MP4 encoding with both tracks; audio
// takes the first audio-bearing entry since resolution is irrelevant for
// extraction and the metadata list is already filtered to audio-bearing
// streams.

use super::models::{DownloadKind, VideoEncoding};

/// Fixed quality preference, most preferred first. Unknown labels rank
/// after all known ones, keeping their relative order.
pub const QUALITY_PREFERENCE: [&str; 6] = ["1080p", "720p", "480p", "360p", "240p", "144p"];

fn preference_rank(quality: &str) -> usize {
    QUALITY_PREFERENCE
        .iter()
        .position(|q| *q == quality)
        .unwrap_or(QUALITY_PREFERENCE.len())
}

/// Pick one encoding for the requested kind, or `None` when no candidate
/// exists (callers surface a "no suitable format" error).
pub fn select(formats: &[VideoEncoding], kind: DownloadKind) -> Option<&VideoEncoding> {
    match kind {
        DownloadKind::Mp4 => formats
            .iter()
            .filter(|f| f.container == "mp4" && f.has_video && f.has_audio)
            // min_by_key returns the first among ties, so unknowns stay stable
            .min_by_key(|f| preference_rank(&f.quality)),
        DownloadKind::Mp3 => formats.iter().find(|f| f.has_audio),
    }
}
