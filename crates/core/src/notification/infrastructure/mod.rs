pub mod http_mirror_notifier;
pub mod http_uploader;
pub mod logging_sinks;
