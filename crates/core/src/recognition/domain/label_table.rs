use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read label file {path}: {source}")]
    LabelFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Maps model class indices to person names.
///
/// One entry per line of the label file; the line number is the class index.
/// Lines are trimmed but otherwise kept verbatim, so blank or duplicate lines
/// still occupy their index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LabelTable {
    names: Vec<String>,
}

impl LabelTable {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::LabelFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self::from_lines(content.lines()))
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: lines
                .into_iter()
                .map(|line| line.as_ref().trim().to_string())
                .collect(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.names.iter().map(String::as_str).enumerate()
    }
}
