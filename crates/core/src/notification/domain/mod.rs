pub mod notifier;
pub mod uploader;
