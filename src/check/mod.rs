//! Model configuration checks.
//!
//! Verifies that a model descriptor and its label list agree before any
//! request is served:
//! - the output declares at least one class
//! - the label count equals the output class count
//! - labels are non-empty and distinct
//! - the default top-K is meaningful for the class count

mod report;

pub use report::{CheckIssue, CheckReport, IssueCode, IssueContext, Severity};

use std::collections::HashMap;

use crate::labels::LabelList;
use crate::model::ModelDescriptor;

/// Options for check behavior.
#[derive(Clone, Debug, Default)]
pub struct CheckOptions {
    /// If true, treat warnings as errors.
    pub strict: bool,
}

/// Checks `descriptor` against `labels` and returns every issue found.
pub fn check_configuration(
    descriptor: &ModelDescriptor,
    labels: Option<&LabelList>,
    opts: &CheckOptions,
) -> CheckReport {
    let mut report = CheckReport::for_model(descriptor, labels, opts.strict);
    let classes = descriptor.output.classes;

    if classes == 0 {
        report.push(CheckIssue::error(
            IssueCode::ZeroClassCount,
            "Output declares zero classes",
            IssueContext::Output,
        ));
    } else if descriptor.top_k > classes {
        report.push(CheckIssue::warning(
            IssueCode::TopKExceedsClasses,
            format!(
                "Default top_k {} exceeds {} class(es); all classes will be shown",
                descriptor.top_k, classes
            ),
            IssueContext::Output,
        ));
    }

    match labels {
        Some(labels) => check_labels(labels, classes, &mut report),
        None => report.push(CheckIssue::warning(
            IssueCode::MissingLabels,
            "No label file given; label alignment was not checked",
            IssueContext::Labels,
        )),
    }

    report
}

fn check_labels(labels: &LabelList, classes: usize, report: &mut CheckReport) {
    if labels.len() != classes {
        report.push(CheckIssue::error(
            IssueCode::LabelCountMismatch,
            format!(
                "{} label(s) for {} output class(es)",
                labels.len(),
                classes
            ),
            IssueContext::Labels,
        ));
    }

    let mut seen: HashMap<&str, usize> = HashMap::new();

    for (index, label) in labels.iter().enumerate() {
        if label.trim().is_empty() {
            report.push(CheckIssue::warning(
                IssueCode::EmptyLabel,
                "Empty label",
                IssueContext::Label { index },
            ));
            continue;
        }

        if let Some(first) = seen.get(label) {
            report.push(CheckIssue::warning(
                IssueCode::DuplicateLabel,
                format!("Duplicate label '{}' (first seen at index {})", label, first),
                IssueContext::Label { index },
            ));
        } else {
            seen.insert(label, index);
        }
    }
}
