//! Ranked label types and their text, JSON and CSV renderings.

use serde::Serialize;
use std::fmt;
use std::io::Write;

use crate::error::QuantclassError;

/// A single label with its dequantized confidence.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LabelEntry {
    /// Class index in the model output.
    pub index: usize,
    /// Human-readable class name.
    pub label: String,
    /// Raw quantized score (0-255).
    pub score: u8,
    /// Confidence in `0.0..=1.0` (`score / 255`).
    pub probability: f32,
}

impl fmt::Display for LabelEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.label, self.probability)
    }
}

/// Labels sorted by descending confidence, truncated to the requested top-K.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RankedLabels {
    pub entries: Vec<LabelEntry>,
}

impl RankedLabels {
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The highest-confidence entry, if any.
    pub fn best(&self) -> Option<&LabelEntry> {
        self.entries.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LabelEntry> {
        self.entries.iter()
    }

    /// `(label, probability)` pairs in ranked order.
    pub fn pairs(&self) -> Vec<(&str, f32)> {
        self.entries
            .iter()
            .map(|e| (e.label.as_str(), e.probability))
            .collect()
    }

    /// Writes `rank,label,probability,score` rows (rank starts at 1).
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), QuantclassError> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(["rank", "label", "probability", "score"])?;

        for (position, entry) in self.entries.iter().enumerate() {
            wtr.write_record([
                (position + 1).to_string(),
                entry.label.clone(),
                entry.probability.to_string(),
                entry.score.to_string(),
            ])?;
        }

        wtr.flush()?;
        Ok(())
    }

    /// Renders the CSV form into a string.
    pub fn to_csv_string(&self) -> Result<String, QuantclassError> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        String::from_utf8(buf).map_err(|e| {
            QuantclassError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }
}

impl<'a> IntoIterator for &'a RankedLabels {
    type Item = &'a LabelEntry;
    type IntoIter = std::slice::Iter<'a, LabelEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Display for RankedLabels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}
