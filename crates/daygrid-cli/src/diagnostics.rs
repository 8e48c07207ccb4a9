//! Printing diagnostics and choosing the exit status
//!
//! `--strict` turns warnings into errors; `--quiet` hides everything that is
//! not an error after that escalation but never changes the exit status.

use std::io::Write;
use std::process;

use daygrid_core::{Diagnostic, DiagnosticEmitter, RenderError, Severity};
use serde::Serialize;

/// Process exit status of a `daygrid` run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    /// Bad config, errors after policy, or a failed write
    Failure = 1,
    /// The output file is open in another program
    OutputLocked = 2,
}

impl ExitCode {
    pub fn from_error_count(count: usize) -> Self {
        if count > 0 {
            ExitCode::Failure
        } else {
            ExitCode::Success
        }
    }

    /// Status for a run that ended in `err`
    pub fn for_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<RenderError>() {
            Some(render) if render.is_locked() => ExitCode::OutputLocked,
            _ => ExitCode::Failure,
        }
    }

    pub fn is_success(self) -> bool {
        self == ExitCode::Success
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

impl From<ExitCode> for process::ExitCode {
    fn from(code: ExitCode) -> Self {
        process::ExitCode::from(code.code())
    }
}

/// Output policy from `--strict` / `--quiet`
#[derive(Debug, Clone, Copy, Default)]
pub struct DiagnosticConfig {
    pub strict: bool,
    pub quiet: bool,
}

impl DiagnosticConfig {
    pub fn effective_severity(&self, severity: Severity) -> Severity {
        match severity {
            Severity::Warning if self.strict => Severity::Error,
            Severity::Hint if self.strict => Severity::Warning,
            s => s,
        }
    }

    fn shows(&self, effective: Severity) -> bool {
        !self.quiet || effective == Severity::Error
    }
}

/// Writes diagnostics in the compiler's layout:
///
/// ```text
/// warning[W002]: task 'Kickoff': start date 2025-04-03 is outside ...
///   --> task 'Kickoff'
///    = hint: widen the span with start_month/num_months or fix the date
/// ```
pub struct TerminalEmitter<W: Write> {
    writer: W,
    config: DiagnosticConfig,
    errors: usize,
}

impl<W: Write> TerminalEmitter<W> {
    pub fn new(writer: W, config: DiagnosticConfig) -> Self {
        Self {
            writer,
            config,
            errors: 0,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from_error_count(self.errors)
    }

    fn write(&mut self, diagnostic: &Diagnostic, severity: Severity) -> std::io::Result<()> {
        let w = &mut self.writer;
        writeln!(
            w,
            "{}[{}]: {}",
            severity.as_str(),
            diagnostic.code.as_str(),
            diagnostic.message
        )?;
        if let Some(task) = &diagnostic.task {
            writeln!(w, "  --> task '{}'", task)?;
        }
        if !diagnostic.notes.is_empty() {
            writeln!(w, "   |")?;
        }
        for note in &diagnostic.notes {
            writeln!(w, "   = {}", note)?;
        }
        for hint in &diagnostic.hints {
            writeln!(w, "   = hint: {}", hint)?;
        }
        writeln!(w)
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<W> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        let severity = self.config.effective_severity(diagnostic.severity);
        if severity == Severity::Error {
            self.errors += 1;
        }
        if self.config.shows(severity) {
            // stderr may already be closed
            let _ = self.write(&diagnostic, severity);
        }
    }
}

/// One diagnostic in the `--format json` report
#[derive(Debug, Serialize)]
pub struct JsonDiagnostic {
    pub code: &'static str,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<String>,
}

/// Collects diagnostics for the JSON report
pub struct JsonEmitter {
    config: DiagnosticConfig,
    collected: Vec<JsonDiagnostic>,
    errors: usize,
}

impl JsonEmitter {
    pub fn new(config: DiagnosticConfig) -> Self {
        Self {
            config,
            collected: Vec::new(),
            errors: 0,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from_error_count(self.errors)
    }

    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::to_value(&self.collected).unwrap_or(serde_json::Value::Null)
    }
}

impl DiagnosticEmitter for JsonEmitter {
    fn emit(&mut self, diagnostic: Diagnostic) {
        let severity = self.config.effective_severity(diagnostic.severity);
        if severity == Severity::Error {
            self.errors += 1;
        }
        if !self.config.shows(severity) {
            return;
        }
        self.collected.push(JsonDiagnostic {
            code: diagnostic.code.as_str(),
            severity,
            message: diagnostic.message,
            task: diagnostic.task,
            notes: diagnostic.notes,
            hints: diagnostic.hints,
        });
    }
}
