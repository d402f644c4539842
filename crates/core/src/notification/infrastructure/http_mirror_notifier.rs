use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::notification::domain::notifier::{NotifyError, Notifier};

#[derive(Serialize, Debug)]
struct PersonNotification<'a> {
    person: &'a str,
    timestamp: u64,
}

/// Posts `{"person": ..., "timestamp": ...}` as JSON to the mirror.
///
/// Pointed at MagicMirror's remote-control notification endpoint this
/// broadcasts the payload to every module; any 2xx counts as delivered.
pub struct HttpMirrorNotifier {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpMirrorNotifier {
    pub fn new(client: reqwest::blocking::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

impl Notifier for HttpMirrorNotifier {
    fn notify(&self, person: &str) -> Result<(), NotifyError> {
        let payload = PersonNotification {
            person,
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        };
        let fail = |reason: String| NotifyError {
            person: person.to_string(),
            reason,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .map_err(|e| fail(e.to_string()))?;
        response.error_for_status().map_err(|e| fail(e.to_string()))?;
        log::debug!("Notified mirror at {} about {person}", self.url);
        Ok(())
    }
}
