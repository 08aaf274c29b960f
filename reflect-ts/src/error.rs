use crate::diagnostics::Diagnostic;
use crate::diagnostics::FileId;
use crate::loc::Loc;
use std::io;
use std::path::PathBuf;

/// Errors that abort a transformation.
///
/// Diagnostic codes (prefix `RTS`) are stable:
/// - `RTS0001`: [`TransformError::Unsupported`]
/// - `RTS0002`: [`TransformError::InferenceMiss`]
/// - `RTS0003`: [`TransformError::Io`]
/// - `RTS0004`: [`TransformError::FrontEnd`]
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
  /// A type expression kind that has no run-time reflection.
  #[error("No reflection for syntax kind '{kind}' found.")]
  Unsupported { kind: &'static str, loc: Loc },
  #[error(transparent)]
  InferenceMiss(#[from] InferenceMiss),
  #[error("{}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
  /// The front end failed to produce a tree for an intermediate or final unit.
  #[error("front end reported {} diagnostic(s)", .0.len())]
  FrontEnd(Vec<Diagnostic>),
}

pub type TransformResult<T> = Result<T, TransformError>;

impl TransformError {
  pub fn unsupported(kind: &'static str, loc: Loc) -> TransformError {
    TransformError::Unsupported { kind, loc }
  }

  pub fn io(path: impl Into<PathBuf>, source: io::Error) -> TransformError {
    TransformError::Io {
      path: path.into(),
      source,
    }
  }

  pub fn code(&self) -> &'static str {
    match self {
      TransformError::Unsupported { .. } => "RTS0001",
      TransformError::InferenceMiss(_) => "RTS0002",
      TransformError::Io { .. } => "RTS0003",
      TransformError::FrontEnd(_) => "RTS0004",
    }
  }

  /// Converts into diagnostics attributed to `file`. Front-end failures keep
  /// their own diagnostics.
  pub fn to_diagnostics(&self, file: FileId) -> Vec<Diagnostic> {
    match self {
      TransformError::Unsupported { loc, .. } => {
        vec![Diagnostic::error(self.code(), self.to_string(), loc.to_span(file))]
      }
      TransformError::InferenceMiss(miss) => vec![miss.to_diagnostic(file)],
      TransformError::Io { path, .. } => vec![Diagnostic::error(
        self.code(),
        self.to_string(),
        Loc::default().to_span(file),
      )
      .with_note(format!("path: {}", path.display()))],
      TransformError::FrontEnd(diagnostics) => diagnostics.clone(),
    }
  }
}

/// The front end had no inferable type for a position that needs one.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("no inferable type")]
pub struct InferenceMiss {
  pub loc: Loc,
  /// Name of the binding whose type was requested, if it has one.
  pub binding: Option<String>,
}

impl InferenceMiss {
  pub fn to_diagnostic(&self, file: FileId) -> Diagnostic {
    let diagnostic = Diagnostic::error("RTS0002", self.to_string(), self.loc.to_span(file));
    match &self.binding {
      Some(name) => diagnostic.with_note(format!("while inferring the type of `{name}`")),
      None => diagnostic,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::InferenceMiss;
  use super::TransformError;
  use crate::diagnostics::FileId;
  use crate::loc::Loc;
  use std::error::Error;
  use std::io;

  #[test]
  fn unsupported_names_the_kind() {
    let err = TransformError::unsupported("MappedType", Loc(3, 9));
    assert_eq!(err.to_string(), "No reflection for syntax kind 'MappedType' found.");
    let diagnostics = err.to_diagnostics(FileId(2));
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, "RTS0001");
    assert_eq!(diagnostics[0].primary.file, FileId(2));
    assert_eq!(diagnostics[0].primary.range.start, 3);
  }

  #[test]
  fn inference_miss_mentions_binding() {
    let err: TransformError = InferenceMiss {
      loc: Loc(0, 1),
      binding: Some("value".into()),
    }
    .into();
    let diagnostic = &err.to_diagnostics(FileId(0))[0];
    assert_eq!(diagnostic.code, "RTS0002");
    assert_eq!(diagnostic.message, "no inferable type");
    assert_eq!(diagnostic.notes, vec!["while inferring the type of `value`".to_string()]);
  }

  #[test]
  fn io_errors_keep_their_source() {
    let err = TransformError::io("/p/.reflect-ts/a.ts", io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
    assert_eq!(err.to_string(), "/p/.reflect-ts/a.ts: denied");
    assert_eq!(err.code(), "RTS0003");
    assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("denied"));
    assert_eq!(err.to_diagnostics(FileId(0))[0].notes, vec!["path: /p/.reflect-ts/a.ts".to_string()]);
  }
}
