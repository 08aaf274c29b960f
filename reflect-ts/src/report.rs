//! Progress events of a transformation and the batched reporting of
//! diagnostics. What a reporter does with events (status lines, spinners,
//! logs) is up to the host.

use crate::options::TransformOptions;
use std::path::PathBuf;
use tracing::error;
use tracing::info;
use tracing::warn;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
  Start { entry: PathBuf },
  /// Units found by the initial parse, declaration units included.
  Scan { files: usize },
  /// Units about to be rewritten.
  Transform { files: usize },
  Emit { out_dir: PathBuf },
  Cleanup { temp_dir: PathBuf },
  End { success: bool },
  /// Rendered diagnostics, at most one batch's worth.
  Diagnostics { batch: Vec<String>, total: usize },
  Warning { message: String },
}

pub trait Reporter {
  fn report(&mut self, event: Event);
}

/// Records events, for hosts that inspect them afterwards.
impl Reporter for Vec<Event> {
  fn report(&mut self, event: Event) {
    self.push(event);
  }
}

/// Logs every event through `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
  fn report(&mut self, event: Event) {
    match event {
      Event::Start { entry } => info!(entry = %entry.display(), "transformation started"),
      Event::Scan { files } => info!(files, "scanned"),
      Event::Transform { files } => info!(files, "transforming"),
      Event::Emit { out_dir } => info!(out_dir = %out_dir.display(), "emitting"),
      Event::Cleanup { temp_dir } => info!(temp_dir = %temp_dir.display(), "cleaning up"),
      Event::End { success } => info!(success, "transformation finished"),
      Event::Diagnostics { batch, total } => {
        for diagnostic in batch {
          error!(total, "{diagnostic}");
        }
      }
      Event::Warning { message } => warn!("{message}"),
    }
  }
}

/// Reports `rendered` in batches of the configured size, stopping at the
/// configured maximum. Hidden diagnostics are counted in a warning.
pub fn report_batches(reporter: &mut dyn Reporter, rendered: &[String], options: &TransformOptions) {
  let total = rendered.len();
  let shown = options.max_diagnostics.map_or(total, |max| max.min(total));
  for batch in rendered[..shown].chunks(options.batch_size()) {
    reporter.report(Event::Diagnostics {
      batch: batch.to_vec(),
      total,
    });
  }
  if shown < total {
    reporter.report(Event::Warning {
      message: format!("Showing first {shown} diagnostics, {} were hidden.", total - shown),
    });
  }
}
