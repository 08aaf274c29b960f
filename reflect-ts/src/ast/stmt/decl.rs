use crate::ast::class::ClassMember;
use crate::ast::expr::Decorator;
use crate::ast::expr::Expr;
use crate::ast::func::Func;
use crate::ast::node::Node;
use crate::ast::pat::ClassOrFuncName;
use crate::ast::pat::Pat;
use crate::ast::type_expr::TypeExpr;
use crate::ast::type_expr::TypeParameter;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Deserialize;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct ClassDecl {
  pub decorators: Vec<Node<Decorator>>,
  #[drive(skip)]
  pub export: bool,
  #[drive(skip)]
  pub export_default: bool,
  #[drive(skip)]
  pub declare: bool,
  #[drive(skip)]
  pub abstract_: bool,
  pub name: Option<Node<ClassOrFuncName>>, // Only omitted in a default export.
  pub type_parameters: Option<Vec<Node<TypeParameter>>>,
  pub extends: Option<Node<Expr>>,
  // `class A extends B<T>` keeps `T` here, as the heritage clause is a value expression.
  pub extends_type_arguments: Option<Vec<Node<TypeExpr>>>,
  pub implements: Vec<Node<TypeExpr>>,
  pub members: Vec<Node<ClassMember>>,
}

impl ClassDecl {
  pub fn name_str(&self) -> Option<&str> {
    self.name.as_ref().map(|n| n.stx.name.as_str())
  }
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct FuncDecl {
  #[drive(skip)]
  pub export: bool,
  #[drive(skip)]
  pub export_default: bool,
  pub name: Option<Node<ClassOrFuncName>>, // Only omitted in a default export.
  pub function: Node<Func>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct ParamDecl {
  pub decorators: Vec<Node<Decorator>>,
  #[drive(skip)]
  pub rest: bool,
  #[drive(skip)]
  pub optional: bool,
  pub accessibility: Option<Accessibility>,
  #[drive(skip)]
  pub readonly: bool,
  pub pattern: Node<PatDecl>,
  pub type_annotation: Option<Node<TypeExpr>>,
  pub default_value: Option<Node<Expr>>,
}

impl ParamDecl {
  pub fn name(&self) -> Option<&str> {
    self.pattern.stx.pat.stx.as_ident()
  }

  /// TypeScript's `this` parameter, which only exists in the type system.
  pub fn is_this(&self) -> bool {
    self.name() == Some("this")
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Drive, DriveMut, Serialize, Deserialize)]
pub enum Accessibility {
  Public,
  Private,
  Protected,
}

// Declarations only (imports, params, var/let/const, catch bindings). Holds no expressions, so it cannot itself contain patterns in expression position.
#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct PatDecl {
  pub pat: Node<Pat>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct VarDecl {
  #[drive(skip)]
  pub export: bool,
  pub mode: VarDeclMode,
  pub declarators: Vec<Node<VarDeclarator>>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct VarDeclarator {
  pub pattern: Node<PatDecl>,
  pub type_annotation: Option<Node<TypeExpr>>,
  pub initializer: Option<Node<Expr>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Drive, DriveMut, Serialize, Deserialize)]
pub enum VarDeclMode {
  Const,
  Let,
  Var,
}

impl VarDeclMode {
  pub fn keyword(self) -> &'static str {
    match self {
      VarDeclMode::Const => "const",
      VarDeclMode::Let => "let",
      VarDeclMode::Var => "var",
    }
  }
}
