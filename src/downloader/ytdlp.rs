// yt-dlp backed VideoInfoProvider
//
// Shells out to the `yt-dlp` binary with --dump-json and maps its output
// onto the raw provider types. Stderr classification happens here, once,
// so the rest of the crate only ever sees structured ProviderError values.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::debug;

use super::provider::{
    ProviderError, RawFormat, RawThumbnail, RawVideoInfo, VideoInfoProvider, USER_AGENT,
};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub struct YtDlpProvider {
    binary_path: String,
    timeout_secs: u64,
}

impl YtDlpProvider {
    pub fn new() -> Self {
        Self {
            binary_path: Self::find_ytdlp(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Use an explicit binary path instead of probing common locations.
    pub fn with_binary(path: impl Into<String>) -> Self {
        Self {
            binary_path: path.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_secs = seconds;
        self
    }

    /// Find the yt-dlp binary
    fn find_ytdlp() -> String {
        let common_paths = [
            "/opt/homebrew/bin/yt-dlp",
            "/usr/local/bin/yt-dlp",
            "/usr/bin/yt-dlp",
        ];

        for path in common_paths {
            if std::path::Path::new(path).exists() {
                return path.to_string();
            }
        }

        "yt-dlp".to_string()
    }

    fn build_args(&self, url: &str) -> Vec<String> {
        vec![
            "--dump-json".to_string(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            "--socket-timeout".to_string(),
            self.timeout_secs.to_string(),
            "--user-agent".to_string(),
            USER_AGENT.to_string(),
            url.to_string(),
        ]
    }

    /// Run the binary, killing it if the timeout elapses.
    async fn run(&self, args: Vec<String>) -> Result<std::process::Output, ProviderError> {
        let child = Command::new(&self.binary_path)
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ProviderError::Tool(format!("failed to start yt-dlp: {}", e)))?;

        match timeout(Duration::from_secs(self.timeout_secs + 5), child.wait_with_output()).await {
            Ok(result) => {
                result.map_err(|e| ProviderError::Tool(format!("yt-dlp did not finish: {}", e)))
            }
            Err(_) => Err(ProviderError::Network(format!(
                "yt-dlp timed out after {}s",
                self.timeout_secs
            ))),
        }
    }

    /// Classify yt-dlp stderr into the structured taxonomy.
    fn classify_stderr(stderr: &str) -> ProviderError {
        let lower = stderr.to_lowercase();

        if lower.contains("video unavailable")
            || lower.contains("private video")
            || lower.contains("has been removed")
            || lower.contains("sign in to confirm")
            || lower.contains("age-restricted")
        {
            return ProviderError::NotFound;
        }
        if lower.contains("429") || lower.contains("rate limit") || lower.contains("rate-limit") {
            return ProviderError::RateLimited;
        }
        if lower.contains("timed out")
            || lower.contains("timeout")
            || lower.contains("getaddrinfo")
            || lower.contains("name resolution")
            || lower.contains("unable to connect")
        {
            return ProviderError::Network(stderr.trim().to_string());
        }

        ProviderError::Other(stderr.trim().to_string())
    }

    fn parse_json(stdout: &[u8]) -> Result<RawVideoInfo, ProviderError> {
        let json: serde_json::Value = serde_json::from_slice(stdout)
            .map_err(|e| ProviderError::Parse(format!("invalid JSON from yt-dlp: {}", e)))?;

        Ok(RawVideoInfo {
            title: json["title"].as_str().unwrap_or("Unknown").to_string(),
            uploader: json["uploader"].as_str().unwrap_or("Unknown").to_string(),
            duration_seconds: json["duration"].as_f64().unwrap_or(0.0) as u64,
            description: json["description"].as_str().map(|s| s.to_string()),
            thumbnails: Self::parse_thumbnails(&json),
            formats: Self::parse_formats(&json)?,
        })
    }

    fn parse_thumbnails(json: &serde_json::Value) -> Vec<RawThumbnail> {
        // yt-dlp sorts thumbnails worst-to-best; keep that order so the
        // last entry stays the highest-resolution one
        let Some(entries) = json["thumbnails"].as_array() else {
            return Vec::new();
        };

        entries
            .iter()
            .filter_map(|t| {
                t["url"].as_str().map(|url| RawThumbnail {
                    url: url.to_string(),
                    width: t["width"].as_u64().map(|w| w as u32),
                    height: t["height"].as_u64().map(|h| h as u32),
                })
            })
            .collect()
    }

    fn parse_formats(json: &serde_json::Value) -> Result<Vec<RawFormat>, ProviderError> {
        let entries = json["formats"]
            .as_array()
            .ok_or_else(|| ProviderError::Parse("no formats array in JSON".to_string()))?;

        let mut formats = Vec::new();
        for f in entries {
            let Some(url) = f["url"].as_str() else {
                continue;
            };

            let has_video = f["vcodec"].as_str().map_or(false, |v| v != "none");
            let has_audio = f["acodec"].as_str().map_or(false, |a| a != "none");

            formats.push(RawFormat {
                itag: f["format_id"].as_str().unwrap_or("").to_string(),
                quality_label: f["format_note"].as_str().map(|s| s.to_string()),
                quality: f["height"].as_u64().map(|h| format!("{}p", h)),
                container: f["ext"].as_str().map(|s| s.to_string()),
                has_video,
                has_audio,
                content_length: f["filesize"].as_u64().map(|s| s.to_string()),
                url: url.to_string(),
            });
        }

        Ok(formats)
    }
}

impl Default for YtDlpProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VideoInfoProvider for YtDlpProvider {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn fetch_info(&self, url: &str) -> Result<RawVideoInfo, ProviderError> {
        let args = self.build_args(url);
        debug!(binary = %self.binary_path, %url, "invoking yt-dlp");

        let output = self.run(args).await?;
        if output.status.success() {
            Self::parse_json(&output.stdout)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!(%stderr, "yt-dlp failed");
            Err(Self::classify_stderr(&stderr))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_unavailable_as_not_found() {
        for stderr in [
            "ERROR: Video unavailable",
            "ERROR: Private video. Sign in if you've been granted access",
            "ERROR: Sign in to confirm your age",
        ] {
            assert_eq!(
                YtDlpProvider::classify_stderr(stderr),
                ProviderError::NotFound,
                "{}",
                stderr
            );
        }
    }

    #[test]
    fn classifies_throttling_as_rate_limited() {
        assert_eq!(
            YtDlpProvider::classify_stderr("HTTP Error 429: Too Many Requests"),
            ProviderError::RateLimited
        );
    }

    #[test]
    fn classifies_connectivity_as_network() {
        assert!(matches!(
            YtDlpProvider::classify_stderr("ERROR: Connection timed out"),
            ProviderError::Network(_)
        ));
        assert!(matches!(
            YtDlpProvider::classify_stderr("getaddrinfo failed"),
            ProviderError::Network(_)
        ));
    }

    #[test]
    fn unclassified_stderr_becomes_other() {
        assert!(matches!(
            YtDlpProvider::classify_stderr("ERROR: something odd"),
            ProviderError::Other(_)
        ));
    }

    #[test]
    fn parses_dump_json_output() {
        let json = serde_json::json!({
            "id": "abc123",
            "title": "Test Video",
            "uploader": "Tester",
            "duration": 212.0,
            "description": "desc",
            "thumbnails": [
                {"url": "https://i.ytimg.com/lo.jpg", "width": 120, "height": 90},
                {"url": "https://i.ytimg.com/hi.jpg", "width": 1280, "height": 720}
            ],
            "formats": [
                {
                    "format_id": "18",
                    "ext": "mp4",
                    "format_note": "360p",
                    "height": 360,
                    "vcodec": "avc1.42001E",
                    "acodec": "mp4a.40.2",
                    "filesize": 1000,
                    "url": "https://example.com/18"
                },
                {
                    "format_id": "137",
                    "ext": "mp4",
                    "format_note": "1080p",
                    "height": 1080,
                    "vcodec": "avc1.640028",
                    "acodec": "none",
                    "url": "https://example.com/137"
                }
            ]
        });

        let info = YtDlpProvider::parse_json(serde_json::to_vec(&json).unwrap().as_slice())
            .expect("parse");
        assert_eq!(info.title, "Test Video");
        assert_eq!(info.uploader, "Tester");
        assert_eq!(info.duration_seconds, 212);
        assert_eq!(info.thumbnails.last().map(|t| t.url.as_str()),
            Some("https://i.ytimg.com/hi.jpg"));
        assert_eq!(info.formats.len(), 2);
        assert!(info.formats[0].has_audio && info.formats[0].has_video);
        assert!(!info.formats[1].has_audio);
        assert_eq!(info.formats[0].content_length.as_deref(), Some("1000"));
        assert_eq!(info.formats[1].quality_label.as_deref(), Some("1080p"));
    }

    #[test]
    fn missing_formats_array_is_a_parse_error() {
        let json = serde_json::json!({"id": "abc", "title": "t"});
        assert!(matches!(
            YtDlpProvider::parse_json(serde_json::to_vec(&json).unwrap().as_slice()),
            Err(ProviderError::Parse(_))
        ));
    }
}
