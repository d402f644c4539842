use thiserror::Error;

#[derive(Error, Debug)]
#[error("notification for {person} failed: {reason}")]
pub struct NotifyError {
    pub person: String,
    pub reason: String,
}

/// Tells the display who is standing in front of it.
pub trait Notifier {
    fn notify(&self, person: &str) -> Result<(), NotifyError>;
}
