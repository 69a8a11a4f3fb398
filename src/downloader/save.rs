// Platform save primitive
//
// Writes an assembled payload to disk under its generated filename. The
// HTTP surface hands bytes back to the client instead; this is for
// library consumers that want the file on the local machine.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::info;

use super::errors::VideoError;
use super::models::DownloadedMedia;

/// Platform download directory, falling back to the working directory.
pub fn default_save_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Write the payload into `dir` and return the full path.
pub async fn save_to_dir(media: &DownloadedMedia, dir: &Path) -> Result<PathBuf, VideoError> {
    let path = dir.join(&media.filename);
    fs::write(&path, &media.bytes)
        .await
        .map_err(|e| VideoError::Download(format!("save failed: {}", e)))?;

    info!(path = %path.display(), bytes = media.bytes.len(), "saved");
    Ok(path)
}
