use super::expr::Expr;
use super::node::Node;
use super::stmt::decl::ParamDecl;
use super::stmt::Stmt;
use super::type_expr::TypeExpr;
use super::type_expr::TypeParameter;
use derive_more::derive::From;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Deserialize;
use serde::Serialize;

// One shared type for arrows, function expressions, function declarations and class/object methods.
#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct Func {
  #[drive(skip)]
  pub arrow: bool,
  #[drive(skip)]
  pub async_: bool,
  #[drive(skip)]
  pub generator: bool,
  pub type_parameters: Option<Vec<Node<TypeParameter>>>,
  pub parameters: Vec<Node<ParamDecl>>,
  pub return_type: Option<Node<TypeExpr>>,
  // None for overload signatures and ambient declarations.
  pub body: Option<FuncBody>,
}

impl Func {
  pub fn type_parameter_names(&self) -> Vec<String> {
    self
      .type_parameters
      .iter()
      .flatten()
      .map(|p| p.stx.name.clone())
      .collect()
  }
}

// A function body has its own scope, unlike a block statement.
#[derive(Clone, Debug, PartialEq, Drive, DriveMut, From, Serialize, Deserialize)]
#[serde(tag = "$t", content = "v")]
pub enum FuncBody {
  Block(Vec<Node<Stmt>>),
  // Arrow functions only.
  Expression(Node<Expr>),
}
