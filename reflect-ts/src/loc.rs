use crate::diagnostics::FileId;
use crate::diagnostics::Span;
use crate::diagnostics::TextRange;
use serde::Deserialize;
use serde::Serialize;

/// A location within a source file expressed as UTF-8 byte offsets.
///
/// Synthesized nodes inherit the location of the node they were derived from,
/// or `Loc(0, 0)` when there is nothing sensible to point at.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Loc(pub usize, pub usize);

impl Loc {
  /// Converts into a diagnostics range, clamping offsets that do not fit `u32`.
  pub fn as_range(&self) -> TextRange {
    TextRange::new(clamp_to_u32(self.0), clamp_to_u32(self.1))
  }

  pub fn to_span(&self, file: FileId) -> Span {
    Span {
      file,
      range: self.as_range(),
    }
  }
}

fn clamp_to_u32(value: usize) -> u32 {
  u32::try_from(value).unwrap_or(u32::MAX)
}
