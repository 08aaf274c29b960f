use super::Diagnostic;
use super::FileId;
use super::Span;
use std::fmt::Write;

/// Provides access to source text for rendering diagnostics.
pub trait SourceProvider {
  fn file_name(&self, file: FileId) -> Option<&str>;
  fn file_text(&self, file: FileId) -> Option<&str>;
}

/// Renders `error[CODE]: message` followed by the primary span's source lines
/// with a caret underline, then any notes.
pub fn render_diagnostic(provider: &dyn SourceProvider, diagnostic: &Diagnostic) -> String {
  let mut output = String::new();
  let _ = writeln!(
    output,
    "{}[{}]: {}",
    diagnostic.severity, diagnostic.code, diagnostic.message
  );
  render_span(provider, &mut output, diagnostic.primary, &diagnostic.message);
  for note in &diagnostic.notes {
    let _ = writeln!(output, "= note: {note}");
  }
  output
}

pub fn render_diagnostics(provider: &dyn SourceProvider, diagnostics: &[Diagnostic]) -> Vec<String> {
  diagnostics
    .iter()
    .map(|d| render_diagnostic(provider, d))
    .collect()
}

fn render_span(provider: &dyn SourceProvider, output: &mut String, span: Span, message: &str) {
  let name = provider.file_name(span.file).unwrap_or("<unknown file>");
  let Some(text) = provider.file_text(span.file) else {
    let _ = writeln!(output, " --> {name}:?:?");
    let _ = writeln!(output, "  | (source unavailable)");
    return;
  };
  let lines = LineIndex::new(text);
  let start = clamp_to_boundary(text, span.range.start as usize);
  let end = clamp_to_boundary(text, (span.range.end as usize).max(start));
  let first_line = lines.line_at(start);
  let last_line = lines.line_at(if end > start { end - 1 } else { end }).max(first_line);
  let (first_start, _) = lines.bounds(first_line);
  let _ = writeln!(
    output,
    " --> {name}:{}:{}",
    first_line + 1,
    text[first_start..start].chars().count() + 1
  );

  let gutter = (last_line + 1).to_string().len();
  let _ = writeln!(output, "{:>gutter$} |", "");
  for line in first_line..=last_line {
    let (line_start, line_end) = lines.bounds(line);
    let source_line = &text[line_start..line_end];
    let _ = writeln!(output, "{:>gutter$} | {source_line}", line + 1);
    let from = start.clamp(line_start, line_end);
    let to = end.clamp(from, line_end);
    let pad = text[line_start..from].chars().count();
    let width = text[from..to].chars().count().max(1);
    let _ = write!(
      output,
      "{:>gutter$} | {}{}",
      "",
      " ".repeat(pad),
      "^".repeat(width)
    );
    if line == first_line && !message.is_empty() {
      let _ = write!(output, " {message}");
    }
    output.push('\n');
  }
}

fn clamp_to_boundary(text: &str, offset: usize) -> usize {
  let mut offset = offset.min(text.len());
  while offset > 0 && !text.is_char_boundary(offset) {
    offset -= 1;
  }
  offset
}

struct LineIndex<'a> {
  text: &'a str,
  starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
  fn new(text: &'a str) -> Self {
    let mut starts = vec![0];
    starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
    Self { text, starts }
  }

  fn line_at(&self, offset: usize) -> usize {
    match self.starts.binary_search(&offset) {
      Ok(idx) => idx,
      Err(idx) => idx.saturating_sub(1),
    }
  }

  fn bounds(&self, line: usize) -> (usize, usize) {
    let start = self.starts.get(line).copied().unwrap_or(self.text.len());
    let end = match self.starts.get(line + 1) {
      Some(next) => next.saturating_sub(1),
      None => self.text.len(),
    };
    (start, end.max(start))
  }
}
