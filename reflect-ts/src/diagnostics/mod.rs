//! Diagnostics produced by the transformation and collected from front ends.
//!
//! Front ends report their own parse and type errors through the same model,
//! so the driver can batch and render everything uniformly.

pub mod render;

use std::fmt::Display;
use std::fmt::Formatter;

/// Index of a compilation unit within one parse of the program.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Default)]
pub struct FileId(pub u32);

/// A byte range in a file.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct TextRange {
  pub start: u32,
  pub end: u32,
}

impl TextRange {
  pub const fn new(start: u32, end: u32) -> Self {
    Self { start, end }
  }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Span {
  pub file: FileId,
  pub range: TextRange,
}

impl Span {
  pub const fn new(file: FileId, range: TextRange) -> Self {
    Self { file, range }
  }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Severity {
  Error,
  Warning,
}

impl Severity {
  pub const fn as_str(&self) -> &'static str {
    match self {
      Severity::Error => "error",
      Severity::Warning => "warning",
    }
  }
}

impl Display for Severity {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
  pub code: &'static str,
  pub severity: Severity,
  pub message: String,
  pub primary: Span,
  pub notes: Vec<String>,
}

impl Diagnostic {
  pub fn new(severity: Severity, code: &'static str, message: impl Into<String>, primary: Span) -> Self {
    Self {
      code,
      severity,
      message: message.into(),
      primary,
      notes: Vec::new(),
    }
  }

  pub fn error(code: &'static str, message: impl Into<String>, primary: Span) -> Self {
    Self::new(Severity::Error, code, message, primary)
  }

  pub fn with_note(mut self, note: impl Into<String>) -> Self {
    self.notes.push(note.into());
    self
  }

  pub fn is_error(&self) -> bool {
    self.severity == Severity::Error
  }
}

pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
  diagnostics.iter().any(Diagnostic::is_error)
}
