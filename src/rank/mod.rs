//! Quantized output ranking.
//!
//! Pairs every byte of a classifier's output tensor with its label,
//! dequantizes it to a probability and returns the top-K entries in
//! descending order of confidence.

mod report;

pub use report::{LabelEntry, RankedLabels};

use crate::error::QuantclassError;
use crate::labels::LabelList;
use crate::tensor::{ElementType, OutputTensorBytes};

/// Ranks `scores` against `labels` and keeps the best `top_k` entries.
///
/// Equal scores keep their original label order. A `top_k` larger than the
/// number of labels returns every label; `top_k == 0` returns nothing.
///
/// # Errors
/// Returns [`QuantclassError::LabelCountMismatch`] if `scores` and `labels`
/// have different lengths. Nothing is truncated to make them fit.
pub fn rank(
    scores: &OutputTensorBytes,
    labels: &LabelList,
    top_k: usize,
) -> Result<RankedLabels, QuantclassError> {
    if scores.len() != labels.len() {
        return Err(QuantclassError::LabelCountMismatch {
            scores: scores.len(),
            labels: labels.len(),
        });
    }

    let mut order: Vec<(usize, u8)> = scores.as_bytes().iter().copied().enumerate().collect();
    // Stable sort on the raw byte: ties stay in index order.
    order.sort_by(|a, b| b.1.cmp(&a.1));

    let entries = order
        .into_iter()
        .take(top_k)
        .map(|(index, score)| LabelEntry {
            index,
            label: labels[index].to_string(),
            score,
            probability: ElementType::Uint8.dequantize(score),
        })
        .collect();

    Ok(RankedLabels { entries })
}

/// Entry point for fuzzing the ranker with arbitrary scores and labels.
#[cfg(feature = "fuzzing")]
pub fn fuzz_rank(scores: &[u8], label_text: &str, top_k: usize) {
    let labels = LabelList::parse(label_text);
    let scores = OutputTensorBytes::from(scores);
    if let Ok(ranked) = rank(&scores, &labels, top_k) {
        assert!(ranked.len() <= top_k.min(labels.len()));
        assert!(ranked
            .entries
            .windows(2)
            .all(|w| w[0].score >= w[1].score));
    }
}
