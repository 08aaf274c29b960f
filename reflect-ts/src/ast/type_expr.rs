use super::expr::Expr;
use super::node::Node;
use derive_more::derive::From;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Deserialize;
use serde::Serialize;

/// Type annotation grammar.
///
/// The first group of variants can be reflected into run-time checks; the
/// second group (type operators, mapped and conditional types, etc.) cannot,
/// and reflecting them is an error.
#[derive(Clone, Debug, PartialEq, Drive, DriveMut, From, Serialize, Deserialize)]
#[serde(tag = "$t")]
pub enum TypeExpr {
  // Primitive types.
  Any(Node<TypeAny>),
  Void(Node<TypeVoid>),
  String(Node<TypeString>),
  Number(Node<TypeNumber>),
  Boolean(Node<TypeBoolean>),
  Symbol(Node<TypeSymbol>),
  Object(Node<TypeObject>),
  Null(Node<TypeNull>),
  Undefined(Node<TypeUndefined>),
  ThisType(Node<TypeThis>),

  // Reference and composite types.
  TypeReference(Node<TypeReference>),
  LiteralType(Node<TypeLiteral>),
  ArrayType(Node<TypeArray>),
  TupleType(Node<TypeTuple>),
  UnionType(Node<TypeUnion>),
  IntersectionType(Node<TypeIntersection>),
  FunctionType(Node<TypeFunction>),
  ConstructorType(Node<TypeConstructor>),
  ObjectType(Node<TypeObjectLiteral>),
  ParenthesizedType(Node<TypeParenthesized>),
  TypeQuery(Node<TypeQuery>),

  // No run-time representation.
  TypeOperator(Node<TypeOperatorExpr>),
  IndexedAccessType(Node<TypeIndexedAccess>),
  ConditionalType(Node<TypeConditional>),
  InferType(Node<TypeInfer>),
  MappedType(Node<TypeMapped>),
  TypePredicate(Node<TypePredicate>),
}

impl TypeExpr {
  /// Syntax kind name, used in diagnostics.
  pub fn kind_name(&self) -> &'static str {
    match self {
      TypeExpr::Any(_) => "AnyKeyword",
      TypeExpr::Void(_) => "VoidKeyword",
      TypeExpr::String(_) => "StringKeyword",
      TypeExpr::Number(_) => "NumberKeyword",
      TypeExpr::Boolean(_) => "BooleanKeyword",
      TypeExpr::Symbol(_) => "SymbolKeyword",
      TypeExpr::Object(_) => "ObjectKeyword",
      TypeExpr::Null(_) => "NullKeyword",
      TypeExpr::Undefined(_) => "UndefinedKeyword",
      TypeExpr::ThisType(_) => "ThisType",
      TypeExpr::TypeReference(_) => "TypeReference",
      TypeExpr::LiteralType(_) => "LiteralType",
      TypeExpr::ArrayType(_) => "ArrayType",
      TypeExpr::TupleType(_) => "TupleType",
      TypeExpr::UnionType(_) => "UnionType",
      TypeExpr::IntersectionType(_) => "IntersectionType",
      TypeExpr::FunctionType(_) => "FunctionType",
      TypeExpr::ConstructorType(_) => "ConstructorType",
      TypeExpr::ObjectType(_) => "TypeLiteral",
      TypeExpr::ParenthesizedType(_) => "ParenthesizedType",
      TypeExpr::TypeQuery(_) => "TypeQuery",
      TypeExpr::TypeOperator(_) => "TypeOperator",
      TypeExpr::IndexedAccessType(_) => "IndexedAccessType",
      TypeExpr::ConditionalType(_) => "ConditionalType",
      TypeExpr::InferType(_) => "TypeParameter",
      TypeExpr::MappedType(_) => "MappedType",
      TypeExpr::TypePredicate(_) => "TypePredicate",
    }
  }

  pub fn is_any(&self) -> bool {
    matches!(self, TypeExpr::Any(_))
  }
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypeAny {}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypeVoid {}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypeString {}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypeNumber {}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypeBoolean {}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypeSymbol {}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypeObject {}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypeNull {}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypeUndefined {}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypeThis {}

/// Type reference: Foo, Foo<T>, A.B.C<T, U>
#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypeReference {
  pub name: TypeEntityName,
  pub type_arguments: Option<Vec<Node<TypeExpr>>>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
#[serde(tag = "$t")]
pub enum TypeEntityName {
  Identifier {
    #[drive(skip)]
    name: String,
  },
  Qualified {
    left: Box<TypeEntityName>,
    #[drive(skip)]
    right: String,
  },
}

impl TypeEntityName {
  pub fn ident(name: impl Into<String>) -> TypeEntityName {
    TypeEntityName::Identifier { name: name.into() }
  }

  /// The identifier the whole name is rooted at, e.g. `A` for `A.B.C`.
  pub fn leftmost(&self) -> &str {
    match self {
      TypeEntityName::Identifier { name } => name,
      TypeEntityName::Qualified { left, .. } => left.leftmost(),
    }
  }

  pub fn as_ident(&self) -> Option<&str> {
    match self {
      TypeEntityName::Identifier { name } => Some(name),
      TypeEntityName::Qualified { .. } => None,
    }
  }
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
#[serde(tag = "$t", content = "v")]
pub enum TypeLiteral {
  Boolean(#[drive(skip)] bool),
  // Kept as source text so rendering stays faithful.
  Number(#[drive(skip)] String),
  String(#[drive(skip)] String),
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypeArray {
  #[drive(skip)]
  pub readonly: bool,
  pub element_type: Node<TypeExpr>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypeTuple {
  #[drive(skip)]
  pub readonly: bool,
  pub elements: Vec<Node<TypeExpr>>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypeUnion {
  pub types: Vec<Node<TypeExpr>>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypeIntersection {
  pub types: Vec<Node<TypeExpr>>,
}

/// Function type: (a: string, b?: number) => void
#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypeFunction {
  pub type_parameters: Option<Vec<Node<TypeParameter>>>,
  pub parameters: Vec<Node<TypeFunctionParameter>>,
  pub return_type: Node<TypeExpr>,
}

/// Constructor type: new (a: string) => Foo
#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypeConstructor {
  #[drive(skip)]
  pub abstract_: bool,
  pub type_parameters: Option<Vec<Node<TypeParameter>>>,
  pub parameters: Vec<Node<TypeFunctionParameter>>,
  pub return_type: Node<TypeExpr>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypeFunctionParameter {
  #[drive(skip)]
  pub name: String,
  #[drive(skip)]
  pub optional: bool,
  #[drive(skip)]
  pub rest: bool,
  pub type_expr: Option<Node<TypeExpr>>,
}

/// Object type literal: { a: string; b(): void }
#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypeObjectLiteral {
  pub members: Vec<Node<TypeMember>>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypeParenthesized {
  pub type_expr: Node<TypeExpr>,
}

/// Type query: typeof x, typeof a.b
#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypeQuery {
  pub expr_name: TypeEntityName,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Drive, DriveMut, Serialize, Deserialize)]
pub enum TypeOperator {
  KeyOf,
  Unique,
  Readonly,
}

/// keyof T, unique symbol, readonly T[]
#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypeOperatorExpr {
  pub operator: TypeOperator,
  pub type_expr: Node<TypeExpr>,
}

/// T[K]
#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypeIndexedAccess {
  pub object_type: Node<TypeExpr>,
  pub index_type: Node<TypeExpr>,
}

/// T extends U ? X : Y
#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypeConditional {
  pub check_type: Node<TypeExpr>,
  pub extends_type: Node<TypeExpr>,
  pub true_type: Node<TypeExpr>,
  pub false_type: Node<TypeExpr>,
}

/// infer R
#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypeInfer {
  #[drive(skip)]
  pub type_parameter: String,
  pub constraint: Option<Node<TypeExpr>>,
}

/// { [K in keyof T]: T[K] }
#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypeMapped {
  #[drive(skip)]
  pub type_parameter: String,
  pub constraint: Node<TypeExpr>,
  pub type_expr: Option<Node<TypeExpr>>,
}

/// x is string, asserts x is T
#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypePredicate {
  #[drive(skip)]
  pub asserts: bool,
  #[drive(skip)]
  pub parameter_name: String,
  pub type_annotation: Option<Node<TypeExpr>>,
}

/// Member of an object type or interface body.
#[derive(Clone, Debug, PartialEq, Drive, DriveMut, From, Serialize, Deserialize)]
#[serde(tag = "$t")]
pub enum TypeMember {
  Property(Node<TypePropertySignature>),
  Method(Node<TypeMethodSignature>),
  Constructor(Node<TypeConstructSignature>),
  CallSignature(Node<TypeCallSignature>),
  IndexSignature(Node<TypeIndexSignature>),
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
#[serde(tag = "$t", content = "v")]
pub enum TypePropertyKey {
  Identifier(#[drive(skip)] String),
  String(#[drive(skip)] String),
  Number(#[drive(skip)] String),
  Computed(Node<Expr>),
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypePropertySignature {
  #[drive(skip)]
  pub readonly: bool,
  #[drive(skip)]
  pub optional: bool,
  pub key: TypePropertyKey,
  pub type_annotation: Option<Node<TypeExpr>>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypeMethodSignature {
  #[drive(skip)]
  pub optional: bool,
  pub key: TypePropertyKey,
  pub type_parameters: Option<Vec<Node<TypeParameter>>>,
  pub parameters: Vec<Node<TypeFunctionParameter>>,
  pub return_type: Option<Node<TypeExpr>>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypeConstructSignature {
  pub type_parameters: Option<Vec<Node<TypeParameter>>>,
  pub parameters: Vec<Node<TypeFunctionParameter>>,
  pub return_type: Option<Node<TypeExpr>>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypeCallSignature {
  pub type_parameters: Option<Vec<Node<TypeParameter>>>,
  pub parameters: Vec<Node<TypeFunctionParameter>>,
  pub return_type: Option<Node<TypeExpr>>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypeIndexSignature {
  #[drive(skip)]
  pub readonly: bool,
  #[drive(skip)]
  pub parameter_name: String,
  pub parameter_type: Node<TypeExpr>,
  pub type_annotation: Node<TypeExpr>,
}

/// Type parameter: T, T extends U, T = Default
#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypeParameter {
  #[drive(skip)]
  pub name: String,
  pub constraint: Option<Node<TypeExpr>>,
  pub default: Option<Node<TypeExpr>>,
}
