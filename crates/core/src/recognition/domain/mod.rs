pub mod label_table;
pub mod recognition_outcome;
