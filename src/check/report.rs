//! Check report types for structured configuration diagnostics.
//!
//! A report can be displayed to users, serialized as JSON, or processed
//! programmatically.

use serde::Serialize;
use std::fmt;

use crate::labels::LabelList;
use crate::model::ModelDescriptor;

/// Findings for one model descriptor and its label list.
///
/// Severity tallies are kept as issues are pushed so the serialized form
/// carries them alongside the issue list.
#[derive(Clone, Debug, Serialize)]
pub struct CheckReport {
    model: String,
    classes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    labels: Option<usize>,
    strict: bool,
    error_count: usize,
    warning_count: usize,
    issues: Vec<CheckIssue>,
}

impl CheckReport {
    /// Starts an empty report for `descriptor`.
    pub(crate) fn for_model(
        descriptor: &ModelDescriptor,
        labels: Option<&LabelList>,
        strict: bool,
    ) -> Self {
        Self {
            model: descriptor.name.clone(),
            classes: descriptor.output.classes,
            labels: labels.map(LabelList::len),
            strict,
            error_count: 0,
            warning_count: 0,
            issues: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, issue: CheckIssue) {
        match issue.severity {
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warning_count += 1,
        }
        self.issues.push(issue);
    }

    /// Name of the checked model.
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn issues(&self) -> &[CheckIssue] {
        &self.issues
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    /// Whether the configuration may be served. In strict mode any warning
    /// fails the check.
    pub fn passed(&self) -> bool {
        self.error_count == 0 && !(self.strict && self.warning_count > 0)
    }

    /// Returns true if any issue has the given code.
    pub fn has(&self, code: IssueCode) -> bool {
        self.issues.iter().any(|i| i.code == code)
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Model '{}': {} output class(es), ", self.model, self.classes)?;
        match self.labels {
            Some(count) => writeln!(f, "{} label(s)", count)?,
            None => writeln!(f, "no label file")?,
        }

        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }

        if !self.passed() {
            let mode = if self.strict { " (strict)" } else { "" };
            writeln!(
                f,
                "Check failed{}: {} error(s), {} warning(s)",
                mode, self.error_count, self.warning_count
            )
        } else if self.warning_count > 0 {
            writeln!(f, "Check passed with {} warning(s)", self.warning_count)
        } else {
            writeln!(f, "Check passed")
        }
    }
}

/// A single check issue (error or warning).
#[derive(Clone, Debug, Serialize)]
pub struct CheckIssue {
    pub severity: Severity,
    pub code: IssueCode,
    pub message: String,
    pub context: IssueContext,
}

impl CheckIssue {
    pub fn new(
        severity: Severity,
        code: IssueCode,
        message: impl Into<String>,
        context: IssueContext,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            context,
        }
    }

    pub fn error(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self::new(Severity::Error, code, message, context)
    }

    pub fn warning(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self::new(Severity::Warning, code, message, context)
    }
}

impl fmt::Display for CheckIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN ",
        };
        write!(
            f,
            "[{}] {:?} in {}: {}",
            severity, self.code, self.context, self.message
        )
    }
}

/// The severity of a check issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Suspicious but usable configuration.
    Warning,
    /// Configuration that cannot produce correct results.
    Error,
}

/// A stable code identifying the type of check issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum IssueCode {
    // Tensor contract issues
    /// The output declares no classes.
    ZeroClassCount,

    // Label issues
    /// No label file was given or referenced by the descriptor.
    MissingLabels,
    /// Label count differs from the output class count.
    LabelCountMismatch,
    /// A label line is empty.
    EmptyLabel,
    /// Two classes share a label (results become ambiguous).
    DuplicateLabel,

    // Ranking issues
    /// Default top-K exceeds the class count (all classes are shown).
    TopKExceedsClasses,
}

/// Where a check issue was found.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum IssueContext {
    /// The model output tensor.
    Output,
    /// A label at a given index.
    Label { index: usize },
    /// The label list as a whole.
    Labels,
}

impl fmt::Display for IssueContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueContext::Output => write!(f, "output"),
            IssueContext::Label { index } => write!(f, "label {}", index),
            IssueContext::Labels => write!(f, "labels"),
        }
    }
}
