pub mod image_snapshot_writer;
