pub mod camera_frame_source;
pub mod domain;
pub mod infrastructure;
