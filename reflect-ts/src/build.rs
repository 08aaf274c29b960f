//! Constructors for synthesized syntax.
//!
//! Every node built here carries [`NodeId::SYNTHETIC`](crate::ast::node::NodeId::SYNTHETIC)
//! and the location of whatever it was derived from.

use crate::ast::class::ClassMember;
use crate::ast::class::ClassOrObjKey;
use crate::ast::class::ClassOrObjMemberDirectKey;
use crate::ast::class::ClassOrObjMethod;
use crate::ast::class::ClassOrObjVal;
use crate::ast::expr::ArrowFuncExpr;
use crate::ast::expr::BinaryExpr;
use crate::ast::expr::CallArg;
use crate::ast::expr::CallExpr;
use crate::ast::expr::ComputedMemberExpr;
use crate::ast::expr::Decorator;
use crate::ast::expr::Expr;
use crate::ast::expr::FuncExpr;
use crate::ast::expr::IdExpr;
use crate::ast::expr::LitArrElem;
use crate::ast::expr::LitArrExpr;
use crate::ast::expr::LitBoolExpr;
use crate::ast::expr::LitNullExpr;
use crate::ast::expr::LitNumExpr;
use crate::ast::expr::LitObjExpr;
use crate::ast::expr::LitStrExpr;
use crate::ast::expr::MemberExpr;
use crate::ast::expr::ObjMember;
use crate::ast::expr::ObjMemberType;
use crate::ast::expr::SuperExpr;
use crate::ast::expr::ThisExpr;
use crate::ast::func::Func;
use crate::ast::func::FuncBody;
use crate::ast::node::Node;
use crate::ast::operator::OperatorName;
use crate::ast::pat::IdPat;
use crate::ast::pat::Pat;
use crate::ast::stmt::decl::ParamDecl;
use crate::ast::stmt::decl::PatDecl;
use crate::ast::stmt::decl::VarDecl;
use crate::ast::stmt::decl::VarDeclMode;
use crate::ast::stmt::decl::VarDeclarator;
use crate::ast::stmt::ExprStmt;
use crate::ast::stmt::ImportStmt;
use crate::ast::stmt::ReturnStmt;
use crate::ast::stmt::Stmt;
use crate::ast::type_expr::TypeAny;
use crate::ast::type_expr::TypeArray;
use crate::ast::type_expr::TypeExpr;
use crate::loc::Loc;

pub fn id(loc: Loc, name: impl Into<String>) -> Node<Expr> {
  Node::new(loc, Expr::Id(Node::new(loc, IdExpr { name: name.into() })))
}

pub fn string(loc: Loc, value: impl Into<String>) -> Node<Expr> {
  Node::new(
    loc,
    Expr::LitStr(Node::new(
      loc,
      LitStrExpr {
        value: value.into(),
      },
    )),
  )
}

pub fn number(loc: Loc, value: f64) -> Node<Expr> {
  Node::new(loc, Expr::LitNum(Node::new(loc, LitNumExpr { value })))
}

pub fn boolean(loc: Loc, value: bool) -> Node<Expr> {
  Node::new(loc, Expr::LitBool(Node::new(loc, LitBoolExpr { value })))
}

pub fn null(loc: Loc) -> Node<Expr> {
  Node::new(loc, Expr::LitNull(Node::new(loc, LitNullExpr {})))
}

pub fn this(loc: Loc) -> Node<Expr> {
  Node::new(loc, Expr::This(Node::new(loc, ThisExpr {})))
}

pub fn super_(loc: Loc) -> Node<Expr> {
  Node::new(loc, Expr::Super(Node::new(loc, SuperExpr {})))
}

/// `left.right`
pub fn member(loc: Loc, left: Node<Expr>, right: impl Into<String>) -> Node<Expr> {
  Node::new(
    loc,
    Expr::Member(Node::new(
      loc,
      MemberExpr {
        optional_chaining: false,
        left,
        right: right.into(),
      },
    )),
  )
}

/// `object[member]`
pub fn computed_member(loc: Loc, object: Node<Expr>, member: Node<Expr>) -> Node<Expr> {
  Node::new(
    loc,
    Expr::ComputedMember(Node::new(
      loc,
      ComputedMemberExpr {
        optional_chaining: false,
        object,
        member,
      },
    )),
  )
}

pub fn arg(value: Node<Expr>) -> Node<CallArg> {
  Node::new(
    value.loc,
    CallArg {
      spread: false,
      value,
    },
  )
}

pub fn spread_arg(value: Node<Expr>) -> Node<CallArg> {
  Node::new(value.loc, CallArg { spread: true, value })
}

pub fn call_with(loc: Loc, callee: Node<Expr>, arguments: Vec<Node<CallArg>>) -> Node<Expr> {
  Node::new(
    loc,
    Expr::Call(Node::new(
      loc,
      CallExpr {
        optional_chaining: false,
        callee,
        arguments,
      },
    )),
  )
}

pub fn call(loc: Loc, callee: Node<Expr>, arguments: Vec<Node<Expr>>) -> Node<Expr> {
  call_with(loc, callee, arguments.into_iter().map(arg).collect())
}

/// `object.name(arguments...)`
pub fn method_call(
  loc: Loc,
  object: Node<Expr>,
  name: impl Into<String>,
  arguments: Vec<Node<Expr>>,
) -> Node<Expr> {
  call(loc, member(loc, object, name), arguments)
}

pub fn binary(loc: Loc, operator: OperatorName, left: Node<Expr>, right: Node<Expr>) -> Node<Expr> {
  Node::new(
    loc,
    Expr::Binary(Node::new(
      loc,
      BinaryExpr {
        operator,
        left,
        right,
      },
    )),
  )
}

pub fn assign(loc: Loc, left: Node<Expr>, right: Node<Expr>) -> Node<Expr> {
  binary(loc, OperatorName::Assignment, left, right)
}

pub fn array(loc: Loc, elements: Vec<Node<Expr>>) -> Node<Expr> {
  Node::new(
    loc,
    Expr::LitArr(Node::new(
      loc,
      LitArrExpr {
        elements: elements.into_iter().map(LitArrElem::Single).collect(),
      },
    )),
  )
}

/// Object literal with identifier keys, in order.
pub fn object(loc: Loc, entries: Vec<(String, Node<Expr>)>) -> Node<Expr> {
  let members = entries
    .into_iter()
    .map(|(key, val)| {
      Node::new(
        loc,
        ObjMember {
          typ: ObjMemberType::Valued {
            key: direct_key(loc, key),
            val: ClassOrObjVal::Prop(Some(val)),
          },
        },
      )
    })
    .collect();
  Node::new(loc, Expr::LitObj(Node::new(loc, LitObjExpr { members })))
}

pub fn direct_key(loc: Loc, key: impl Into<String>) -> ClassOrObjKey {
  ClassOrObjKey::Direct(Node::new(
    loc,
    ClassOrObjMemberDirectKey { key: key.into() },
  ))
}

pub fn param(loc: Loc, name: impl Into<String>) -> Node<ParamDecl> {
  Node::new(
    loc,
    ParamDecl {
      decorators: vec![],
      rest: false,
      optional: false,
      accessibility: None,
      readonly: false,
      pattern: pat_decl(loc, name),
      type_annotation: None,
      default_value: None,
    },
  )
}

/// `...name: any[]`
pub fn rest_any_param(loc: Loc, name: impl Into<String>) -> Node<ParamDecl> {
  let mut p = param(loc, name);
  p.stx.rest = true;
  p.stx.type_annotation = Some(Node::new(
    loc,
    TypeExpr::ArrayType(Node::new(
      loc,
      TypeArray {
        readonly: false,
        element_type: any_type(loc),
      },
    )),
  ));
  p
}

pub fn any_type(loc: Loc) -> Node<TypeExpr> {
  Node::new(loc, TypeExpr::Any(Node::new(loc, TypeAny {})))
}

pub fn pat_decl(loc: Loc, name: impl Into<String>) -> Node<PatDecl> {
  let pat = Node::new(loc, Pat::Id(Node::new(loc, IdPat { name: name.into() })));
  Node::new(loc, PatDecl { pat })
}

fn func(parameters: Vec<Node<ParamDecl>>, arrow: bool, body: FuncBody) -> Func {
  Func {
    arrow,
    async_: false,
    generator: false,
    type_parameters: None,
    parameters,
    return_type: None,
    body: Some(body),
  }
}

/// `(params) => body`
pub fn arrow(loc: Loc, params: &[&str], body: FuncBody) -> Node<Expr> {
  let parameters = params.iter().map(|p| param(loc, *p)).collect();
  let func = Node::new(loc, func(parameters, true, body));
  Node::new(loc, Expr::ArrowFunc(Node::new(loc, ArrowFuncExpr { func })))
}

/// `() => expr`
pub fn thunk(loc: Loc, expr: Node<Expr>) -> Node<Expr> {
  arrow(loc, &[], FuncBody::Expression(expr))
}

/// `function () { body }`
pub fn function_expr(loc: Loc, body: Vec<Node<Stmt>>) -> Node<Expr> {
  let func = Node::new(loc, func(vec![], false, FuncBody::Block(body)));
  Node::new(loc, Expr::Func(Node::new(loc, FuncExpr { name: None, func })))
}

pub fn decorator(loc: Loc, expression: Node<Expr>) -> Node<Decorator> {
  Node::new(loc, Decorator { expression })
}

pub fn expr_stmt(loc: Loc, expr: Node<Expr>) -> Node<Stmt> {
  Node::new(loc, Stmt::Expr(Node::new(loc, ExprStmt { expr })))
}

pub fn return_stmt(loc: Loc, value: Option<Node<Expr>>) -> Node<Stmt> {
  Node::new(loc, Stmt::Return(Node::new(loc, ReturnStmt { value })))
}

pub fn var_decl_stmt(loc: Loc, mode: VarDeclMode, name: impl Into<String>, init: Node<Expr>) -> Node<Stmt> {
  let declarator = Node::new(
    loc,
    VarDeclarator {
      pattern: pat_decl(loc, name),
      type_annotation: None,
      initializer: Some(init),
    },
  );
  let decl = VarDecl {
    export: false,
    mode,
    declarators: vec![declarator],
  };
  Node::new(loc, Stmt::VarDecl(Node::new(loc, decl)))
}

pub fn const_stmt(loc: Loc, name: impl Into<String>, init: Node<Expr>) -> Node<Stmt> {
  var_decl_stmt(loc, VarDeclMode::Const, name, init)
}

/// `import name from "module";`, or `import "module";` without a name.
pub fn import_stmt(loc: Loc, default: Option<&str>, module: impl Into<String>) -> Node<Stmt> {
  Node::new(
    loc,
    Stmt::Import(Node::new(
      loc,
      ImportStmt {
        type_only: false,
        default: default.map(|name| pat_decl(loc, name)),
        names: None,
        module: module.into(),
      },
    )),
  )
}

/// A `constructor(params) { body }` class member.
pub fn constructor_member(loc: Loc, parameters: Vec<Node<ParamDecl>>, body: Vec<Node<Stmt>>) -> Node<ClassMember> {
  let func = Node::new(loc, func(parameters, false, FuncBody::Block(body)));
  Node::new(
    loc,
    ClassMember {
      decorators: vec![],
      key: direct_key(loc, "constructor"),
      static_: false,
      readonly: false,
      optional: false,
      accessibility: None,
      type_annotation: None,
      val: ClassOrObjVal::Method(Node::new(loc, ClassOrObjMethod { func })),
    },
  )
}

/// `static [key] = value;`
pub fn static_computed_prop(loc: Loc, key: Node<Expr>, value: Node<Expr>) -> Node<ClassMember> {
  Node::new(
    loc,
    ClassMember {
      decorators: vec![],
      key: ClassOrObjKey::Computed(key),
      static_: true,
      readonly: false,
      optional: false,
      accessibility: None,
      type_annotation: None,
      val: ClassOrObjVal::Prop(Some(value)),
    },
  )
}
