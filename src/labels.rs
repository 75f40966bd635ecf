//! Ordered class label lists.
//!
//! Label files are plain UTF-8 text with one label per line. Line `i` names
//! class `i` of the model output, so lines are never reordered, trimmed away
//! or deduplicated. Only the final newline terminator is ignored.

use std::fs;
use std::ops::Index;
use std::path::Path;

use serde::Serialize;

use crate::error::QuantclassError;

/// Class labels, index-aligned with the model's output tensor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LabelList {
    labels: Vec<String>,
}

impl LabelList {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    /// Parses label file contents.
    ///
    /// Accepts `\n` and `\r\n` line endings. A trailing newline does not add
    /// an extra empty label; blank lines elsewhere are kept as (empty)
    /// labels so indices stay aligned.
    pub fn parse(text: &str) -> Self {
        let body = text
            .strip_suffix('\n')
            .map(|rest| rest.strip_suffix('\r').unwrap_or(rest))
            .unwrap_or(text);

        if body.is_empty() {
            return Self::default();
        }

        let labels = body
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();

        Self { labels }
    }

    /// Reads and parses a label file.
    pub fn read(path: &Path) -> Result<Self, QuantclassError> {
        let text = fs::read_to_string(path).map_err(|source| QuantclassError::LabelFileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

impl Index<usize> for LabelList {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        &self.labels[index]
    }
}

impl<S: Into<String>> FromIterator<S> for LabelList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            labels: iter.into_iter().map(Into::into).collect(),
        }
    }
}
