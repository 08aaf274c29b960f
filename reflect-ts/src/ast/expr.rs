use super::class::ClassMember;
use super::class::ClassOrObjKey;
use super::class::ClassOrObjVal;
use super::func::Func;
use super::node::Node;
use super::operator::OperatorName;
use super::pat::ClassOrFuncName;
use derive_more::derive::From;
use derive_more::derive::TryInto;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Deserialize;
use serde::Serialize;

// Each variant wraps a Node<T> so visitors can target Node<T> instead of just T.
#[derive(Clone, Debug, PartialEq, Drive, DriveMut, From, TryInto, Serialize, Deserialize)]
#[serde(tag = "$t")]
pub enum Expr {
  ArrowFunc(Node<ArrowFuncExpr>),
  Binary(Node<BinaryExpr>),
  Call(Node<CallExpr>),
  Class(Node<ClassExpr>),
  ComputedMember(Node<ComputedMemberExpr>),
  Cond(Node<CondExpr>),
  Func(Node<FuncExpr>),
  Id(Node<IdExpr>),
  Member(Node<MemberExpr>),
  New(Node<NewExpr>),
  Super(Node<SuperExpr>),
  This(Node<ThisExpr>),
  Unary(Node<UnaryExpr>),

  // Literals.
  LitArr(Node<LitArrExpr>),
  LitBool(Node<LitBoolExpr>),
  LitNull(Node<LitNullExpr>),
  LitNum(Node<LitNumExpr>),
  LitObj(Node<LitObjExpr>),
  LitStr(Node<LitStrExpr>),
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct CallArg {
  #[drive(skip)]
  pub spread: bool,
  pub value: Node<Expr>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct ArrowFuncExpr {
  pub func: Node<Func>, // Always arrow.
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct BinaryExpr {
  #[drive(skip)]
  pub operator: OperatorName,
  pub left: Node<Expr>,
  pub right: Node<Expr>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct CallExpr {
  #[drive(skip)]
  pub optional_chaining: bool,
  pub callee: Node<Expr>,
  pub arguments: Vec<Node<CallArg>>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct ClassExpr {
  pub decorators: Vec<Node<Decorator>>,
  pub name: Option<Node<ClassOrFuncName>>,
  pub extends: Option<Node<Expr>>,
  pub members: Vec<Node<ClassMember>>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct ComputedMemberExpr {
  #[drive(skip)]
  pub optional_chaining: bool,
  pub object: Node<Expr>,
  pub member: Node<Expr>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct CondExpr {
  pub test: Node<Expr>,
  pub consequent: Node<Expr>,
  pub alternate: Node<Expr>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct Decorator {
  pub expression: Node<Expr>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct FuncExpr {
  pub name: Option<Node<ClassOrFuncName>>,
  pub func: Node<Func>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct IdExpr {
  #[drive(skip)]
  pub name: String,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct MemberExpr {
  #[drive(skip)]
  pub optional_chaining: bool,
  pub left: Node<Expr>,
  #[drive(skip)]
  pub right: String,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct NewExpr {
  pub callee: Node<Expr>,
  pub arguments: Vec<Node<CallArg>>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct SuperExpr {}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct ThisExpr {}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct UnaryExpr {
  #[drive(skip)]
  pub operator: OperatorName,
  pub argument: Node<Expr>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
#[serde(tag = "$t", content = "v")]
pub enum LitArrElem {
  Single(Node<Expr>),
  Rest(Node<Expr>),
  Empty,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct LitArrExpr {
  pub elements: Vec<LitArrElem>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct LitBoolExpr {
  #[drive(skip)]
  pub value: bool,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct LitNullExpr {}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct LitNumExpr {
  #[drive(skip)]
  pub value: f64,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct LitObjExpr {
  pub members: Vec<Node<ObjMember>>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct LitStrExpr {
  #[drive(skip)]
  pub value: String,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
#[serde(tag = "$t")]
pub enum ObjMemberType {
  Valued { key: ClassOrObjKey, val: ClassOrObjVal },
  Shorthand { id: Node<IdExpr> },
  Rest { val: Node<Expr> },
}

// A node rather than a bare enum so a member can be replaced in place.
#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct ObjMember {
  pub typ: ObjMemberType,
}
