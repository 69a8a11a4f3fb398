// Streaming downloader with chunked progress
//
// One streaming GET per download, no authentication, no retry. Progress
// is reported as whole percents only when the response declares a total
// length; nothing is estimated otherwise.

use bytes::BytesMut;
use futures_util::StreamExt;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::errors::VideoError;
use super::models::{DownloadKind, DownloadedMedia, VideoEncoding};

/// Titles are truncated to this many characters before the extension.
const MAX_FILENAME_CHARS: usize = 100;

/// Byte counters for one in-flight download
struct ProgressCounter {
    loaded: u64,
    total: Option<u64>,
}

impl ProgressCounter {
    fn new(total: Option<u64>) -> Self {
        Self { loaded: 0, total }
    }

    /// Record a chunk; yields the whole-number percent when the total is
    /// known and non-zero, `None` otherwise.
    fn record(&mut self, len: usize) -> Option<u8> {
        self.loaded += len as u64;
        self.total
            .filter(|total| *total > 0)
            .map(|total| ((self.loaded as f64 / total as f64) * 100.0).round() as u8)
    }
}

pub struct StreamingDownloader {
    client: reqwest::Client,
}

impl StreamingDownloader {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Fetch the encoding's bytes, invoking `on_progress` with 0..=100
    /// after each chunk when the server declares a content length.
    ///
    /// The payload's MIME type follows the requested kind, not the
    /// encoding's container (see `DownloadKind::mime_type`).
    pub async fn download<F>(
        &self,
        encoding: &VideoEncoding,
        title: &str,
        kind: DownloadKind,
        mut on_progress: F,
    ) -> Result<DownloadedMedia, VideoError>
    where
        F: FnMut(u8),
    {
        let response = self
            .client
            .get(&encoding.url)
            .send()
            .await
            .map_err(|e| VideoError::Download(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(VideoError::Download(format!(
                "unexpected status {}",
                response.status()
            )));
        }

        let mut counter = ProgressCounter::new(response.content_length());
        let mut payload = BytesMut::new();
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| VideoError::Download(format!("stream error: {}", e)))?;
            payload.extend_from_slice(&chunk);
            if let Some(percent) = counter.record(chunk.len()) {
                on_progress(percent);
            }
        }

        debug!(itag = %encoding.itag, bytes = payload.len(), "download complete");

        Ok(DownloadedMedia {
            bytes: payload.freeze(),
            mime_type: kind.mime_type(),
            filename: build_filename(title, kind),
        })
    }
}

impl Default for StreamingDownloader {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive a safe filename from the video title: strip reserved characters,
/// collapse whitespace runs to single underscores, truncate, append the
/// kind's extension.
pub fn build_filename(title: &str, kind: DownloadKind) -> String {
    lazy_static! {
        static ref RESERVED: Regex = Regex::new(r#"[<>:"/\\|?*]"#).unwrap();
        static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    }

    let safe = RESERVED.replace_all(title, "");
    let safe = WHITESPACE.replace_all(&safe, "_");
    let safe: String = safe.chars().take(MAX_FILENAME_CHARS).collect();

    format!("{}.{}", safe, kind.extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_hits_40_then_100_for_two_chunks_of_1000() {
        let mut counter = ProgressCounter::new(Some(1000));
        let mut reported = Vec::new();

        for len in [400usize, 600] {
            if let Some(percent) = counter.record(len) {
                reported.push(percent);
            }
        }

        assert_eq!(reported, vec![40, 100]);
    }

    #[test]
    fn progress_skipped_without_content_length() {
        let mut counter = ProgressCounter::new(None);
        assert_eq!(counter.record(400), None);
        assert_eq!(counter.record(600), None);
    }

    #[test]
    fn progress_skipped_for_zero_total() {
        let mut counter = ProgressCounter::new(Some(0));
        assert_eq!(counter.record(400), None);
    }

    #[test]
    fn progress_rounds_to_whole_percent() {
        let mut counter = ProgressCounter::new(Some(3));
        assert_eq!(counter.record(1), Some(33));
        assert_eq!(counter.record(1), Some(67));
        assert_eq!(counter.record(1), Some(100));
    }

    #[test]
    fn filename_strips_reserved_and_collapses_whitespace() {
        assert_eq!(
            build_filename("My: Video/Title?", DownloadKind::Mp4),
            "My_VideoTitle.mp4"
        );
        assert_eq!(
            build_filename("a <b> c | d", DownloadKind::Mp3),
            "a_b_c_d.mp3"
        );
    }

    #[test]
    fn filename_truncates_long_titles() {
        let title = "x".repeat(300);
        let filename = build_filename(&title, DownloadKind::Mp4);
        assert_eq!(filename, format!("{}.mp4", "x".repeat(100)));
    }
}
