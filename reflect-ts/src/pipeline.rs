//! The driver: parses the program, runs both passes with a print and re-parse
//! between them, emits, and cleans up the staging directory.

use crate::context::Context;
use crate::diagnostics::has_errors;
use crate::diagnostics::render::render_diagnostics;
use crate::diagnostics::Diagnostic;
use crate::diagnostics::FileId;
use crate::error::TransformError;
use crate::frontend::FrontEnd;
use crate::frontend::NoInference;
use crate::frontend::SyntaxTree;
use crate::frontend::TreeSources;
use crate::loc::Loc;
use crate::options::TransformOptions;
use crate::pass::implicit;
use crate::pass::mutation;
use crate::report::report_batches;
use crate::report::Event;
use crate::report::Reporter;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;
use tracing::debug;
use tracing::debug_span;
use tracing::field;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
  Init,
  ParseOriginal,
  DiagnoseOriginal,
  Pass1Rewrite,
  WriteTemp,
  ParseTemp,
  Pass2Rewrite,
  WriteTemp2,
  ParseFinal,
  DiagnoseFinal,
  Emit,
  Cleanup,
}

impl Stage {
  pub fn name(self) -> &'static str {
    match self {
      Stage::Init => "init",
      Stage::ParseOriginal => "parse_original",
      Stage::DiagnoseOriginal => "diagnose_original",
      Stage::Pass1Rewrite => "pass1",
      Stage::WriteTemp => "write_temp",
      Stage::ParseTemp => "parse_temp",
      Stage::Pass2Rewrite => "pass2",
      Stage::WriteTemp2 => "write_temp2",
      Stage::ParseFinal => "parse_final",
      Stage::DiagnoseFinal => "diagnose_final",
      Stage::Emit => "emit",
      Stage::Cleanup => "cleanup",
    }
  }
}

#[derive(Debug)]
pub struct TransformOutcome {
  /// Staged units of the final program, in parse order.
  pub files: Vec<PathBuf>,
  /// Diagnostics that did not fail the run.
  pub diagnostics: Vec<Diagnostic>,
  /// Stages entered, in order.
  pub stages: Vec<Stage>,
  pub temp_dir: PathBuf,
  /// Nodes handed to a mutator in pass 2, over all units.
  pub mutations: usize,
}

/// Where a unit is staged: its path relative to `base`, under `temp_dir`.
/// Units outside `base` keep only their file name; staged units stay put.
pub fn staging_path(base: &Path, temp_dir: &Path, path: &Path) -> PathBuf {
  if path.starts_with(temp_dir) {
    return path.to_path_buf();
  }
  match path.strip_prefix(base) {
    Ok(relative) => temp_dir.join(relative),
    Err(_) => temp_dir.join(path.file_name().unwrap_or(path.as_os_str())),
  }
}

/// Transforms the program reachable from `entry` and emits it next to `entry`.
///
/// Front-end diagnostics do not stop the run; they are collected and the run
/// fails at the end if any is an error. Inference misses, unsupported
/// constructs and I/O failures stop it at the stage they occur in. The
/// staging directory is removed in either case unless
/// [`TransformOptions::keep_temp_files`] is set.
pub fn transform<F: FrontEnd>(
  fe: &mut F,
  entry: &Path,
  options: &TransformOptions,
  reporter: &mut dyn Reporter,
) -> Result<TransformOutcome, Vec<Diagnostic>> {
  reporter.report(Event::Start {
    entry: entry.to_path_buf(),
  });
  let base = entry.parent().map(Path::to_path_buf).unwrap_or_default();
  let temp_dir = base.join(&options.temp_folder_name);
  let mut run = Run {
    fe,
    options,
    base,
    temp_dir,
    stages: Vec::new(),
    diagnostics: Vec::new(),
    rendered: Vec::new(),
    files: Vec::new(),
    mutations: 0,
  };
  let completed = run.execute(entry, reporter).is_ok();

  if !options.keep_temp_files {
    reporter.report(Event::Cleanup {
      temp_dir: run.temp_dir.clone(),
    });
    let _ = run.stage(Stage::Cleanup, |run| {
      if let Err(err) = run.remove_temp_dir() {
        reporter.report(Event::Warning {
          message: format!("could not remove staging directory: {err}"),
        });
      }
      Ok(())
    });
  }

  report_batches(reporter, &run.rendered, options);
  let success = completed && !has_errors(&run.diagnostics);
  reporter.report(Event::End { success });
  if !success {
    return Err(run.diagnostics);
  }
  Ok(TransformOutcome {
    files: run.files,
    diagnostics: run.diagnostics,
    stages: run.stages,
    temp_dir: run.temp_dir,
    mutations: run.mutations,
  })
}

// The run stopped; its diagnostics have been collected.
struct Aborted;

struct Run<'r, F> {
  fe: &'r mut F,
  options: &'r TransformOptions,
  base: PathBuf,
  temp_dir: PathBuf,
  stages: Vec<Stage>,
  diagnostics: Vec<Diagnostic>,
  rendered: Vec<String>,
  files: Vec<PathBuf>,
  mutations: usize,
}

impl<'r, F: FrontEnd> Run<'r, F> {
  fn stage<T>(&mut self, stage: Stage, f: impl FnOnce(&mut Self) -> Result<T, Aborted>) -> Result<T, Aborted> {
    let span = debug_span!(
      "reflect_ts.stage",
      stage = stage.name(),
      duration_ms = field::Empty,
      failed = field::Empty,
    );
    let _guard = span.enter();
    let start = Instant::now();
    debug!("stage started");
    self.stages.push(stage);
    let result = f(self);
    span.record("duration_ms", start.elapsed().as_secs_f64() * 1000.0);
    span.record("failed", result.is_err());
    result
  }

  // Renders now, while the trees the diagnostics point into are at hand.
  fn collect(&mut self, trees: &[SyntaxTree], diagnostics: Vec<Diagnostic>) {
    let sources = TreeSources::new(trees);
    self.rendered.extend(render_diagnostics(&sources, &diagnostics));
    self.diagnostics.extend(diagnostics);
  }

  fn fatal(&mut self, trees: &[SyntaxTree], diagnostics: Vec<Diagnostic>) -> Aborted {
    self.collect(trees, diagnostics);
    Aborted
  }

  fn remove_temp_dir(&self) -> Result<(), TransformError> {
    match fs::remove_dir_all(&self.temp_dir) {
      Err(err) if err.kind() != io::ErrorKind::NotFound => Err(TransformError::io(&self.temp_dir, err)),
      _ => Ok(()),
    }
  }

  fn execute(&mut self, entry: &Path, reporter: &mut dyn Reporter) -> Result<(), Aborted> {
    self.stage(Stage::Init, |run| {
      run
        .remove_temp_dir()
        .map_err(|err| run.fatal(&[], err.to_diagnostics(FileId(0))))
    })?;

    let mut trees = self.stage(Stage::ParseOriginal, |run| {
      run
        .fe
        .parse(&[entry.to_path_buf()])
        .map_err(|diagnostics| run.fatal(&[], diagnostics))
    })?;
    reporter.report(Event::Scan { files: trees.len() });

    self.stage(Stage::DiagnoseOriginal, |run| {
      run.diagnose(&trees);
      Ok(())
    })?;

    reporter.report(Event::Transform {
      files: trees.iter().filter(|t| !t.is_declaration).count(),
    });
    self.stage(Stage::Pass1Rewrite, |run| {
      let mut misses = Vec::new();
      for tree in trees.iter_mut().filter(|t| !t.is_declaration) {
        let mut ctx = Context::new(run.options, tree.file, &*run.fe, &tree.top);
        if let Err(found) = implicit::run(&mut ctx, &mut tree.top) {
          debug!(file = %tree.path.display(), misses = found.len(), "inference failed");
          misses.extend(found.iter().map(|miss| miss.to_diagnostic(tree.file)));
        }
      }
      if misses.is_empty() {
        Ok(())
      } else {
        Err(run.fatal(&trees, misses))
      }
    })?;

    self.stage(Stage::WriteTemp, |run| run.write_staged(&trees))?;
    let staged_entry = staging_path(&self.base, &self.temp_dir, entry);
    let mut trees = self.stage(Stage::ParseTemp, |run| run.reparse(&staged_entry))?;

    self.stage(Stage::Pass2Rewrite, |run| {
      let mut failures = Vec::new();
      for tree in trees.iter_mut().filter(|t| !t.is_declaration) {
        let mut ctx = Context::new(run.options, tree.file, &NoInference, &tree.top);
        match mutation::run(&mut ctx, &mut tree.top) {
          Ok(()) => run.mutations += ctx.mutations().len(),
          Err(errors) => failures.extend(errors.iter().flat_map(|err| err.to_diagnostics(tree.file))),
        }
      }
      if failures.is_empty() {
        Ok(())
      } else {
        Err(run.fatal(&trees, failures))
      }
    })?;

    self.stage(Stage::WriteTemp2, |run| run.write_staged(&trees))?;
    let trees = self.stage(Stage::ParseFinal, |run| run.reparse(&staged_entry))?;

    if self.options.final_diagnostics {
      self.stage(Stage::DiagnoseFinal, |run| {
        run.diagnose(&trees);
        Ok(())
      })?;
    }

    reporter.report(Event::Emit {
      out_dir: self.base.clone(),
    });
    self.stage(Stage::Emit, |run| {
      let found = run.fe.emit(&trees, &run.temp_dir, &run.base);
      run.collect(&trees, found);
      Ok(())
    })
  }

  fn diagnose(&mut self, trees: &[SyntaxTree]) {
    let mut found = Vec::new();
    for tree in trees.iter().filter(|t| !t.is_declaration) {
      found.extend(self.fe.diagnostics(tree));
    }
    debug!(count = found.len(), "collected diagnostics");
    self.collect(trees, found);
  }

  fn write_staged(&mut self, trees: &[SyntaxTree]) -> Result<(), Aborted> {
    self.files.clear();
    for tree in trees.iter().filter(|t| !t.is_declaration) {
      let path = staging_path(&self.base, &self.temp_dir, &tree.path);
      let text = self.fe.print(tree);
      let written = path
        .parent()
        .map_or(Ok(()), fs::create_dir_all)
        .and_then(|()| fs::write(&path, text));
      if let Err(err) = written {
        let diagnostics = TransformError::io(&path, err).to_diagnostics(tree.file);
        return Err(self.fatal(trees, diagnostics));
      }
      debug!(path = %path.display(), "staged");
      self.files.push(path);
    }
    Ok(())
  }

  fn reparse(&mut self, entry: &Path) -> Result<Vec<SyntaxTree>, Aborted> {
    self.fe.parse(&[entry.to_path_buf()]).map_err(|found| {
      let err = TransformError::FrontEnd(found);
      let mut diagnostics = vec![Diagnostic::error(err.code(), err.to_string(), Loc::default().to_span(FileId(0)))
        .with_note(format!("while parsing staged unit {}", entry.display()))];
      diagnostics.extend(err.to_diagnostics(FileId(0)));
      self.fatal(&[], diagnostics)
    })
  }
}
