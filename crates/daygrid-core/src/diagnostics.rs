//! Diagnostics reported while building a timeline
//!
//! Non-fatal problems (a task whose bar cannot be drawn, a row collision)
//! are collected as [`Diagnostic`] values instead of aborting the run. The
//! CLI decides how to print them and what exit code they imply.

use serde::Serialize;

/// Diagnostic severity
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Hint,
    Info,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Hint => "hint",
            Severity::Info => "info",
        }
    }
}

/// Stable diagnostic codes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    /// A start or end date does not match `YYYY-MM-DD`
    W001UnparsableDate,
    /// A date lies outside the generated month span
    W002DateOutOfSpan,
    /// The start date resolves after the end date
    W003InvertedRange,
    /// Two tasks claim the same row
    W004RowCollision,
    /// Summary of placed bars
    I001TimelineSummary,
}

impl DiagnosticCode {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticCode::W001UnparsableDate => "W001",
            DiagnosticCode::W002DateOutOfSpan => "W002",
            DiagnosticCode::W003InvertedRange => "W003",
            DiagnosticCode::W004RowCollision => "W004",
            DiagnosticCode::I001TimelineSummary => "I001",
        }
    }

    /// Default severity for the code
    pub fn severity(self) -> Severity {
        match self {
            DiagnosticCode::I001TimelineSummary => Severity::Info,
            _ => Severity::Warning,
        }
    }
}

/// A single reported condition
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    pub message: String,
    /// Name of the task the diagnostic is about
    pub task: Option<String>,
    pub notes: Vec<String>,
    pub hints: Vec<String>,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: code.severity(),
            message: message.into(),
            task: None,
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn with_task(mut self, task: impl Into<String>) -> Self {
        self.task = Some(task.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

/// Sink for diagnostics
pub trait DiagnosticEmitter {
    fn emit(&mut self, diagnostic: Diagnostic);
}

/// Emitter that keeps everything in memory
#[derive(Debug, Default)]
pub struct CollectingEmitter {
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticEmitter for CollectingEmitter {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}
