//! The contract between the transformation and the compiler front end that
//! parses units, answers inference queries, prints and emits.

use crate::ast::node::Node;
use crate::ast::node::NodeId;
use crate::ast::stx::TopLevel;
use crate::ast::type_expr::TypeExpr;
use crate::diagnostics::render::SourceProvider;
use crate::diagnostics::Diagnostic;
use crate::diagnostics::FileId;
use std::path::Path;
use std::path::PathBuf;

/// One parsed compilation unit.
///
/// Node ids are unique within the tree and assigned from 1; they are only
/// meaningful for queries against the front end that produced the tree.
#[derive(Clone, Debug)]
pub struct SyntaxTree {
  pub file: FileId,
  pub path: PathBuf,
  /// Ambient declaration units (`.d.ts`) are never transformed.
  pub is_declaration: bool,
  pub text: String,
  pub top: Node<TopLevel>,
}

pub trait TypeInference {
  /// The type the checker infers for the declaration `node` of `file`, or
  /// `None` when it has no inferable type.
  fn infer_type(&self, file: FileId, node: NodeId) -> Option<Node<TypeExpr>>;
}

/// Inference for contexts that must not query the checker.
pub struct NoInference;

impl TypeInference for NoInference {
  fn infer_type(&self, _file: FileId, _node: NodeId) -> Option<Node<TypeExpr>> {
    None
  }
}

pub trait FrontEnd: TypeInference {
  /// Parses `roots` and every unit they reach. Errors are reserved for
  /// failures that leave no program at all; syntax errors are diagnostics.
  fn parse(&mut self, roots: &[PathBuf]) -> Result<Vec<SyntaxTree>, Vec<Diagnostic>>;

  /// Syntactic and semantic diagnostics of one unit.
  fn diagnostics(&self, tree: &SyntaxTree) -> Vec<Diagnostic>;

  /// Source text of a tree, which `parse` must accept again.
  fn print(&self, tree: &SyntaxTree) -> String;

  /// Writes the compiled program for `trees`, whose sources live under `root`,
  /// into `out_dir`.
  fn emit(&mut self, trees: &[SyntaxTree], root: &Path, out_dir: &Path) -> Vec<Diagnostic>;
}

/// Source access for rendering diagnostics of a set of trees.
pub struct TreeSources<'a> {
  trees: &'a [SyntaxTree],
  names: Vec<String>,
}

impl<'a> TreeSources<'a> {
  pub fn new(trees: &'a [SyntaxTree]) -> TreeSources<'a> {
    let names = trees.iter().map(|t| t.path.display().to_string()).collect();
    TreeSources { trees, names }
  }

  fn position(&self, file: FileId) -> Option<usize> {
    self.trees.iter().position(|t| t.file == file)
  }
}

impl SourceProvider for TreeSources<'_> {
  fn file_name(&self, file: FileId) -> Option<&str> {
    self.position(file).map(|i| self.names[i].as_str())
  }

  fn file_text(&self, file: FileId) -> Option<&str> {
    self.position(file).map(|i| self.trees[i].text.as_str())
  }
}
