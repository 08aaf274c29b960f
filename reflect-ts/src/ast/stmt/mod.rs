pub mod decl;

use super::expr::Expr;
use super::node::Node;
use super::pat::Pat;
use super::ts_stmt::EnumDecl;
use super::ts_stmt::InterfaceDecl;
use super::ts_stmt::TypeAliasDecl;
use super::type_expr::TypeExpr;
use decl::ClassDecl;
use decl::FuncDecl;
use decl::PatDecl;
use decl::VarDecl;
use decl::VarDeclMode;
use derive_more::derive::From;
use derive_more::derive::TryInto;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Deserialize;
use serde::Serialize;

// Each variant wraps a Node<T> so visitors can target Node<T> instead of just T.
#[derive(Clone, Debug, PartialEq, Drive, DriveMut, From, TryInto, Serialize, Deserialize)]
#[serde(tag = "$t")]
pub enum Stmt {
  Block(Node<BlockStmt>),
  Break(Node<BreakStmt>),
  Continue(Node<ContinueStmt>),
  DoWhile(Node<DoWhileStmt>),
  Empty(Node<EmptyStmt>),
  Expr(Node<ExprStmt>),
  ForIn(Node<ForInStmt>),
  ForOf(Node<ForOfStmt>),
  ForTriple(Node<ForTripleStmt>),
  If(Node<IfStmt>),
  Import(Node<ImportStmt>),
  Label(Node<LabelStmt>),
  Return(Node<ReturnStmt>),
  Switch(Node<SwitchStmt>),
  Throw(Node<ThrowStmt>),
  Try(Node<TryStmt>),
  While(Node<WhileStmt>),

  ClassDecl(Node<ClassDecl>),
  FunctionDecl(Node<FuncDecl>),
  VarDecl(Node<VarDecl>),

  // TypeScript statements.
  InterfaceDecl(Node<InterfaceDecl>),
  TypeAliasDecl(Node<TypeAliasDecl>),
  EnumDecl(Node<EnumDecl>),
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct CatchBlock {
  pub parameter: Option<Node<PatDecl>>,
  pub type_annotation: Option<Node<TypeExpr>>,
  // Not a BlockStmt: the scope starts at the parameter, not the braces.
  pub body: Vec<Node<Stmt>>,
}

// The scope of a `for` starts before the braces, so this is not a BlockStmt either.
#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct ForBody {
  pub body: Vec<Node<Stmt>>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct SwitchBranch {
  // None for `default`.
  pub case: Option<Node<Expr>>,
  pub body: Vec<Node<Stmt>>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct BlockStmt {
  pub body: Vec<Node<Stmt>>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct BreakStmt {
  #[drive(skip)]
  pub label: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct ContinueStmt {
  #[drive(skip)]
  pub label: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct DoWhileStmt {
  pub condition: Node<Expr>,
  pub body: Node<Stmt>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct EmptyStmt {}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct ExprStmt {
  pub expr: Node<Expr>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
#[serde(tag = "$t")]
pub enum ForTripleStmtInit {
  None,
  Expr { expr: Node<Expr> },
  Decl { decl: Node<VarDecl> },
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct ForTripleStmt {
  pub init: ForTripleStmtInit,
  pub cond: Option<Node<Expr>>,
  pub post: Option<Node<Expr>>,
  pub body: Node<ForBody>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
#[serde(tag = "$t")]
pub enum ForInOfLhs {
  // Assignment target.
  Assign { pat: Node<Pat> },
  // Scoped variable declaration.
  Decl { mode: VarDeclMode, pattern: Node<PatDecl> },
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct ForInStmt {
  pub lhs: ForInOfLhs,
  pub rhs: Node<Expr>,
  pub body: Node<ForBody>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct ForOfStmt {
  #[drive(skip)]
  pub await_: bool,
  pub lhs: ForInOfLhs,
  pub rhs: Node<Expr>,
  pub body: Node<ForBody>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct IfStmt {
  pub test: Node<Expr>,
  pub consequent: Node<Stmt>,
  pub alternate: Option<Node<Stmt>>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct ImportName {
  #[drive(skip)]
  pub importable: String,
  // Always set, even without an explicit alias. Always an IdPat.
  pub alias: Node<PatDecl>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
#[serde(tag = "$t", content = "v")]
pub enum ImportNames {
  // `import * as name`
  All(Node<PatDecl>),
  // `import {a as b, c}`
  Specific(Vec<Node<ImportName>>),
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct ImportStmt {
  #[drive(skip)]
  pub type_only: bool,
  // Always an IdPat.
  pub default: Option<Node<PatDecl>>,
  pub names: Option<ImportNames>,
  #[drive(skip)]
  pub module: String,
}

impl ImportStmt {
  /// Local names bound by this import.
  pub fn bindings(&self) -> Vec<String> {
    let mut names = Vec::new();
    if let Some(default) = &self.default {
      names.extend(default.stx.pat.stx.as_ident().map(str::to_string));
    }
    match &self.names {
      Some(ImportNames::All(alias)) => names.extend(alias.stx.pat.stx.as_ident().map(str::to_string)),
      Some(ImportNames::Specific(specific)) => {
        for name in specific {
          names.extend(name.stx.alias.stx.pat.stx.as_ident().map(str::to_string));
        }
      }
      None => {}
    }
    names
  }
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct LabelStmt {
  #[drive(skip)]
  pub name: String,
  pub statement: Node<Stmt>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct ReturnStmt {
  pub value: Option<Node<Expr>>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct SwitchStmt {
  pub test: Node<Expr>,
  pub branches: Vec<Node<SwitchBranch>>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct ThrowStmt {
  pub value: Node<Expr>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TryStmt {
  pub wrapped: Node<BlockStmt>,
  // One of these must be present.
  pub catch: Option<Node<CatchBlock>>,
  pub finally: Option<Node<BlockStmt>>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct WhileStmt {
  pub condition: Node<Expr>,
  pub body: Node<Stmt>,
}
