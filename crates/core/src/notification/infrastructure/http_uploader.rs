use std::fs;
use std::path::Path;

use crate::notification::domain::uploader::{UploadError, Uploader};

/// Posts the snapshot bytes to `url?name=<tagged name>`.
pub struct HttpUploader {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpUploader {
    pub fn new(client: reqwest::blocking::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

impl Uploader for HttpUploader {
    fn upload(&self, image_path: &Path, tagged_name: &str) -> Result<(), UploadError> {
        let bytes = fs::read(image_path).map_err(|e| UploadError::Read {
            path: image_path.to_path_buf(),
            source: e,
        })?;
        let transport = |reason: String| UploadError::Transport {
            path: image_path.to_path_buf(),
            reason,
        };

        let size = bytes.len();
        self.client
            .post(&self.url)
            .query(&[("name", tagged_name)])
            .header(reqwest::header::CONTENT_TYPE, content_type(image_path))
            .body(bytes)
            .send()
            .map_err(|e| transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| transport(e.to_string()))?;
        log::debug!("Uploaded {} ({size} bytes) as {tagged_name}", image_path.display());
        Ok(())
    }
}

fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("bmp") => "image/bmp",
        Some("webp") => "image/webp",
        Some("tif") | Some("tiff") => "image/tiff",
        _ => "application/octet-stream",
    }
}
