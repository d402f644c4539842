use std::path::Path;

use crate::notification::domain::notifier::{NotifyError, Notifier};
use crate::notification::domain::uploader::{UploadError, Uploader};

/// Notifier used when no mirror endpoint is configured: log only.
pub struct LoggingNotifier;

impl Notifier for LoggingNotifier {
    fn notify(&self, person: &str) -> Result<(), NotifyError> {
        log::info!("Recognized {person} (no mirror endpoint configured)");
        Ok(())
    }
}

/// Uploader used when no upload endpoint is configured: the snapshot stays
/// on local disk only.
pub struct LoggingUploader;

impl Uploader for LoggingUploader {
    fn upload(&self, image_path: &Path, tagged_name: &str) -> Result<(), UploadError> {
        log::debug!(
            "Snapshot {} kept locally, tagged {tagged_name}",
            image_path.display()
        );
        Ok(())
    }
}
