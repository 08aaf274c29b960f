use super::expr::Expr;
use super::node::Node;
use super::type_expr::TypeExpr;
use super::type_expr::TypeMember;
use super::type_expr::TypeParameter;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Deserialize;
use serde::Serialize;

/// Interface declaration: interface Foo<T> extends Bar { }
#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct InterfaceDecl {
  #[drive(skip)]
  pub export: bool,
  #[drive(skip)]
  pub declare: bool,
  #[drive(skip)]
  pub name: String,
  pub type_parameters: Option<Vec<Node<TypeParameter>>>,
  pub extends: Vec<Node<TypeExpr>>,
  pub members: Vec<Node<TypeMember>>,
}

/// Type alias declaration: type Foo<T> = Bar<T>
#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypeAliasDecl {
  #[drive(skip)]
  pub export: bool,
  #[drive(skip)]
  pub declare: bool,
  #[drive(skip)]
  pub name: String,
  pub type_parameters: Option<Vec<Node<TypeParameter>>>,
  pub type_expr: Node<TypeExpr>,
}

/// Enum declaration: enum Color { Red, Green, Blue }
#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct EnumDecl {
  #[drive(skip)]
  pub export: bool,
  #[drive(skip)]
  pub declare: bool,
  #[drive(skip)]
  pub const_: bool,
  #[drive(skip)]
  pub name: String,
  pub members: Vec<Node<EnumMember>>,
}

/// Enum member: Red = 1, Green = "green"
#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct EnumMember {
  #[drive(skip)]
  pub name: String,
  pub initializer: Option<Node<Expr>>,
}
