use super::expr::Decorator;
use super::expr::Expr;
use super::func::Func;
use super::node::Node;
use super::stmt::decl::Accessibility;
use super::type_expr::TypeExpr;
use derive_more::derive::From;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Deserialize;
use serde::Serialize;

/// Index signature in class: [key: string]: Type
#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct ClassIndexSignature {
  #[drive(skip)]
  pub parameter_name: String,
  pub parameter_type: Node<TypeExpr>,
  pub type_annotation: Node<TypeExpr>,
}

// Identifier, keyword, string, or number, decoded.
#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct ClassOrObjMemberDirectKey {
  #[drive(skip)]
  pub key: String,
}

// Direct keys are not variable usages, so they are not IdExprs.
#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
#[serde(tag = "$t", content = "v")]
pub enum ClassOrObjKey {
  Direct(Node<ClassOrObjMemberDirectKey>),
  Computed(Node<Expr>),
}

impl ClassOrObjKey {
  pub fn direct_name(&self) -> Option<&str> {
    match self {
      ClassOrObjKey::Direct(key) => Some(&key.stx.key),
      ClassOrObjKey::Computed(_) => None,
    }
  }
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct ClassOrObjGetter {
  pub func: Node<Func>, // `parameters` is empty.
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct ClassOrObjMethod {
  pub func: Node<Func>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct ClassOrObjSetter {
  pub func: Node<Func>, // `parameters` contains exactly one ParamDecl.
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, From, Serialize, Deserialize)]
#[serde(tag = "$t", content = "v")]
pub enum ClassOrObjVal {
  Getter(Node<ClassOrObjGetter>),
  Setter(Node<ClassOrObjSetter>),
  Method(Node<ClassOrObjMethod>),
  // Always Some inside object literals; shorthands are ObjMemberType::Shorthand.
  Prop(Option<Node<Expr>>),
  IndexSignature(Node<ClassIndexSignature>),
}

impl ClassOrObjVal {
  pub fn func(&self) -> Option<&Node<Func>> {
    match self {
      ClassOrObjVal::Getter(g) => Some(&g.stx.func),
      ClassOrObjVal::Setter(s) => Some(&s.stx.func),
      ClassOrObjVal::Method(m) => Some(&m.stx.func),
      ClassOrObjVal::Prop(_) | ClassOrObjVal::IndexSignature(_) => None,
    }
  }

  pub fn func_mut(&mut self) -> Option<&mut Node<Func>> {
    match self {
      ClassOrObjVal::Getter(g) => Some(&mut g.stx.func),
      ClassOrObjVal::Setter(s) => Some(&mut s.stx.func),
      ClassOrObjVal::Method(m) => Some(&mut m.stx.func),
      ClassOrObjVal::Prop(_) | ClassOrObjVal::IndexSignature(_) => None,
    }
  }
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct ClassMember {
  pub decorators: Vec<Node<Decorator>>,
  pub key: ClassOrObjKey,
  #[drive(skip)]
  pub static_: bool,
  #[drive(skip)]
  pub readonly: bool,
  #[drive(skip)]
  pub optional: bool,
  pub accessibility: Option<Accessibility>,
  pub type_annotation: Option<Node<TypeExpr>>, // Properties only.
  pub val: ClassOrObjVal,
}

impl ClassMember {
  pub fn is_constructor(&self) -> bool {
    !self.static_
      && self.key.direct_name() == Some("constructor")
      && matches!(self.val, ClassOrObjVal::Method(_))
  }
}
