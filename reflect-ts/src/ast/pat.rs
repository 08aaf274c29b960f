use super::class::ClassOrObjKey;
use super::expr::Expr;
use super::node::Node;
use derive_more::derive::From;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Deserialize;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, From, Serialize, Deserialize)]
#[serde(tag = "$t")]
pub enum Pat {
  Arr(Node<ArrPat>),
  Id(Node<IdPat>),
  Obj(Node<ObjPat>),
}

impl Pat {
  /// The bound name if this is a plain identifier pattern.
  pub fn as_ident(&self) -> Option<&str> {
    match self {
      Pat::Id(id) => Some(&id.stx.name),
      _ => None,
    }
  }
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct ArrPatElem {
  pub target: Node<Pat>,
  pub default_value: Option<Node<Expr>>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct ArrPat {
  // Unnamed elements can exist.
  pub elements: Vec<Option<ArrPatElem>>,
  pub rest: Option<Node<Pat>>,
}

// Names of classes and functions are not patterns, but bind like one.
#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct ClassOrFuncName {
  #[drive(skip)]
  pub name: String,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct IdPat {
  #[drive(skip)]
  pub name: String,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct ObjPat {
  pub properties: Vec<Node<ObjPatProp>>,
  pub rest: Option<Node<IdPat>>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct ObjPatProp {
  pub key: ClassOrObjKey,
  // When `shorthand`, `key` is Direct and `target` is an IdPat of the same name.
  pub target: Node<Pat>,
  #[drive(skip)]
  pub shorthand: bool,
  pub default_value: Option<Node<Expr>>,
}
