// Metadata service - validates, delegates extraction, normalizes the result

use std::sync::Arc;

use time::OffsetDateTime;
use tracing::debug;

use super::errors::{RateLimitScope, VideoError};
use super::models::{VideoEncoding, VideoMetadata};
use super::provider::{ProviderError, RawFormat, VideoInfoProvider};
use super::sanitize;

/// Formats kept after filtering, provider order preserved.
pub const MAX_FORMATS: usize = 10;

/// Stateless adapter over the external extraction collaborator
pub struct MetadataService {
    provider: Arc<dyn VideoInfoProvider>,
}

impl MetadataService {
    pub fn new(provider: Arc<dyn VideoInfoProvider>) -> Self {
        Self { provider }
    }

    /// Fetch and normalize metadata for one video URL.
    ///
    /// Re-validates the URL even when the caller already did, keeps only
    /// encodings with both tracks, truncates to the first `MAX_FORMATS`,
    /// and picks the last (highest-resolution) thumbnail. No retries here;
    /// retrying is the caller's affordance.
    pub async fn get_video_info(&self, url: &str) -> Result<VideoMetadata, VideoError> {
        let url = sanitize::sanitize_url(url)?;
        if !sanitize::is_video_url(&url) {
            return Err(VideoError::InvalidUrl);
        }
        let video_id = sanitize::extract_video_id(&url)?;

        let raw = self.provider.fetch_info(&url).await.map_err(|e| {
            debug!(provider = self.provider.name(), error = %e, "extraction failed");
            match e {
                ProviderError::NotFound => VideoError::VideoNotFound,
                ProviderError::RateLimited => VideoError::RateLimited(RateLimitScope::Upstream),
                ProviderError::Network(msg) => VideoError::Network(msg),
                ProviderError::Tool(msg) | ProviderError::Parse(msg) | ProviderError::Other(msg) => {
                    VideoError::Unknown(msg)
                }
            }
        })?;

        let formats: Vec<VideoEncoding> = raw
            .formats
            .into_iter()
            .filter(|f| f.has_video && f.has_audio)
            .map(normalize_format)
            .take(MAX_FORMATS)
            .collect();

        let thumbnail = raw
            .thumbnails
            .last()
            .map(|t| t.url.clone())
            .unwrap_or_default();

        Ok(VideoMetadata {
            video_id,
            title: raw.title,
            author: raw.uploader,
            duration: raw.duration_seconds,
            thumbnail,
            description: raw.description,
            formats,
            created_at: OffsetDateTime::now_utc(),
        })
    }
}

fn normalize_format(raw: RawFormat) -> VideoEncoding {
    VideoEncoding {
        itag: raw.itag,
        quality: raw
            .quality_label
            .or(raw.quality)
            .unwrap_or_else(|| "unknown".to_string()),
        container: raw.container.unwrap_or_else(|| "mp4".to_string()),
        has_video: raw.has_video,
        has_audio: raw.has_audio,
        content_length: raw.content_length,
        url: raw.url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::provider::{RawThumbnail, RawVideoInfo};
    use async_trait::async_trait;

    struct StubProvider {
        result: Result<RawVideoInfo, ProviderError>,
    }

    #[async_trait]
    impl VideoInfoProvider for StubProvider {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn fetch_info(&self, _url: &str) -> Result<RawVideoInfo, ProviderError> {
            self.result.clone()
        }
    }

    fn make_format(itag: &str, has_video: bool, has_audio: bool) -> RawFormat {
        RawFormat {
            itag: itag.to_string(),
            quality_label: Some("720p".to_string()),
            quality: None,
            container: Some("mp4".to_string()),
            has_video,
            has_audio,
            content_length: None,
            url: format!("https://cdn.example.com/{}", itag),
        }
    }

    fn make_info(formats: Vec<RawFormat>) -> RawVideoInfo {
        RawVideoInfo {
            title: "Test".to_string(),
            uploader: "Uploader".to_string(),
            duration_seconds: 120,
            description: None,
            thumbnails: vec![
                RawThumbnail {
                    url: "https://i.ytimg.com/lo.jpg".to_string(),
                    width: Some(120),
                    height: Some(90),
                },
                RawThumbnail {
                    url: "https://i.ytimg.com/hi.jpg".to_string(),
                    width: Some(1280),
                    height: Some(720),
                },
            ],
            formats,
        }
    }

    fn service(result: Result<RawVideoInfo, ProviderError>) -> MetadataService {
        MetadataService::new(Arc::new(StubProvider { result }))
    }

    #[tokio::test]
    async fn drops_single_track_formats() {
        let svc = service(Ok(make_info(vec![
            make_format("18", true, true),
            make_format("137", true, false),
            make_format("140", false, true),
        ])));

        let metadata = svc
            .get_video_info("https://youtu.be/abc123")
            .await
            .expect("metadata");
        assert_eq!(metadata.formats.len(), 1);
        assert_eq!(metadata.formats[0].itag, "18");
        assert!(metadata.formats.iter().all(|f| f.has_audio));
    }

    #[tokio::test]
    async fn truncates_to_ten_formats_in_provider_order() {
        let formats = (0..15).map(|i| make_format(&i.to_string(), true, true)).collect();
        let svc = service(Ok(make_info(formats)));

        let metadata = svc
            .get_video_info("https://youtu.be/abc123")
            .await
            .expect("metadata");
        assert_eq!(metadata.formats.len(), MAX_FORMATS);
        assert_eq!(metadata.formats[0].itag, "0");
        assert_eq!(metadata.formats[9].itag, "9");
    }

    #[tokio::test]
    async fn picks_last_thumbnail_and_url_derived_id() {
        let svc = service(Ok(make_info(vec![make_format("18", true, true)])));

        let metadata = svc
            .get_video_info("https://www.youtube.com/watch?v=abc123")
            .await
            .expect("metadata");
        assert_eq!(metadata.video_id, "abc123");
        assert_eq!(metadata.thumbnail, "https://i.ytimg.com/hi.jpg");
        assert_eq!(metadata.title, "Test");
        assert_eq!(metadata.author, "Uploader");
    }

    #[tokio::test]
    async fn rejects_non_whitelisted_url_before_delegating() {
        let svc = service(Ok(make_info(vec![])));
        assert_eq!(
            svc.get_video_info("https://evil.com/watch?v=abc123")
                .await
                .unwrap_err(),
            VideoError::InvalidUrl
        );
    }

    #[tokio::test]
    async fn maps_provider_errors_onto_taxonomy() {
        let url = "https://youtu.be/abc123";

        assert_eq!(
            service(Err(ProviderError::NotFound))
                .get_video_info(url)
                .await
                .unwrap_err(),
            VideoError::VideoNotFound
        );
        assert_eq!(
            service(Err(ProviderError::RateLimited))
                .get_video_info(url)
                .await
                .unwrap_err(),
            VideoError::RateLimited(RateLimitScope::Upstream)
        );
        assert!(matches!(
            service(Err(ProviderError::Network("dns".into()))).get_video_info(url).await,
            Err(VideoError::Network(_))
        ));
        assert!(matches!(
            service(Err(ProviderError::Other("weird".into()))).get_video_info(url).await,
            Err(VideoError::Unknown(_))
        ));
    }

    #[tokio::test]
    async fn unknown_quality_and_container_get_fallbacks() {
        let mut format = make_format("18", true, true);
        format.quality_label = None;
        format.container = None;
        let svc = service(Ok(make_info(vec![format])));

        let metadata = svc
            .get_video_info("https://youtu.be/abc123")
            .await
            .expect("metadata");
        assert_eq!(metadata.formats[0].quality, "unknown");
        assert_eq!(metadata.formats[0].container, "mp4");
    }
}
