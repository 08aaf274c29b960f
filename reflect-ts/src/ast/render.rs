//! Compact single-line source rendering of syntax trees.
//!
//! Type text is the identity used when merging overloads, so two spellings of
//! the same type render differently on purpose. Expressions and statements are
//! rendered for logs and tests; this is not a code generator and makes no
//! attempt at formatting.

use super::class::ClassMember;
use super::class::ClassOrObjKey;
use super::class::ClassOrObjVal;
use super::expr::CallArg;
use super::expr::Decorator;
use super::expr::Expr;
use super::expr::LitArrElem;
use super::expr::ObjMemberType;
use super::func::Func;
use super::func::FuncBody;
use super::node::Node;
use super::operator::OperatorName;
use super::pat::Pat;
use super::stmt::decl::ClassDecl;
use super::stmt::decl::ParamDecl;
use super::stmt::decl::VarDecl;
use super::stmt::ForInOfLhs;
use super::stmt::ForTripleStmtInit;
use super::stmt::ImportNames;
use super::stmt::Stmt;
use super::stx::TopLevel;
use super::type_expr::TypeEntityName;
use super::type_expr::TypeExpr;
use super::type_expr::TypeFunctionParameter;
use super::type_expr::TypeLiteral;
use super::type_expr::TypeMember;
use super::type_expr::TypeOperator;
use super::type_expr::TypeParameter;
use super::type_expr::TypePropertyKey;
use itertools::Itertools;

pub fn type_text(ty: &Node<TypeExpr>) -> String {
  let mut out = String::new();
  write_type(&mut out, ty);
  out
}

pub fn expr_text(expr: &Node<Expr>) -> String {
  let mut out = String::new();
  write_expr(&mut out, expr);
  out
}

pub fn stmt_text(stmt: &Node<Stmt>) -> String {
  let mut out = String::new();
  write_stmt(&mut out, stmt);
  out
}

pub fn stmts_text(stmts: &[Node<Stmt>]) -> String {
  stmts.iter().map(stmt_text).join("\n")
}

pub fn top_level_text(top: &Node<TopLevel>) -> String {
  stmts_text(&top.stx.body)
}

fn string_literal(value: &str) -> String {
  serde_json::to_string(value).unwrap_or_else(|_| format!("\"{value}\""))
}

fn number_text(value: f64) -> String {
  if value.fract() == 0.0 && value.abs() < 1e15 {
    format!("{}", value as i64)
  } else {
    format!("{value}")
  }
}

fn entity_name_text(name: &TypeEntityName) -> String {
  match name {
    TypeEntityName::Identifier { name } => name.clone(),
    TypeEntityName::Qualified { left, right } => format!("{}.{right}", entity_name_text(left)),
  }
}

fn write_type_parameters(out: &mut String, params: &Option<Vec<Node<TypeParameter>>>) {
  let Some(params) = params.as_ref().filter(|p| !p.is_empty()) else {
    return;
  };
  out.push('<');
  for (i, p) in params.iter().enumerate() {
    if i > 0 {
      out.push_str(", ");
    }
    out.push_str(&p.stx.name);
    if let Some(c) = &p.stx.constraint {
      out.push_str(" extends ");
      write_type(out, c);
    }
    if let Some(d) = &p.stx.default {
      out.push_str(" = ");
      write_type(out, d);
    }
  }
  out.push('>');
}

fn write_type_fn_params(out: &mut String, params: &[Node<TypeFunctionParameter>]) {
  out.push('(');
  for (i, p) in params.iter().enumerate() {
    if i > 0 {
      out.push_str(", ");
    }
    if p.stx.rest {
      out.push_str("...");
    }
    out.push_str(&p.stx.name);
    if p.stx.optional {
      out.push('?');
    }
    if let Some(t) = &p.stx.type_expr {
      out.push_str(": ");
      write_type(out, t);
    }
  }
  out.push(')');
}

fn write_type_key(out: &mut String, key: &TypePropertyKey) {
  match key {
    TypePropertyKey::Identifier(name) | TypePropertyKey::Number(name) => out.push_str(name),
    TypePropertyKey::String(value) => out.push_str(&string_literal(value)),
    TypePropertyKey::Computed(expr) => {
      out.push('[');
      write_expr(out, expr);
      out.push(']');
    }
  }
}

fn write_opt_type_annotation(out: &mut String, ty: &Option<Node<TypeExpr>>) {
  if let Some(ty) = ty {
    out.push_str(": ");
    write_type(out, ty);
  }
}

fn write_type_member(out: &mut String, member: &Node<TypeMember>) {
  match member.stx.as_ref() {
    TypeMember::Property(p) => {
      if p.stx.readonly {
        out.push_str("readonly ");
      }
      write_type_key(out, &p.stx.key);
      if p.stx.optional {
        out.push('?');
      }
      write_opt_type_annotation(out, &p.stx.type_annotation);
    }
    TypeMember::Method(m) => {
      write_type_key(out, &m.stx.key);
      if m.stx.optional {
        out.push('?');
      }
      write_type_parameters(out, &m.stx.type_parameters);
      write_type_fn_params(out, &m.stx.parameters);
      write_opt_type_annotation(out, &m.stx.return_type);
    }
    TypeMember::Constructor(c) => {
      out.push_str("new ");
      write_type_parameters(out, &c.stx.type_parameters);
      write_type_fn_params(out, &c.stx.parameters);
      write_opt_type_annotation(out, &c.stx.return_type);
    }
    TypeMember::CallSignature(c) => {
      write_type_parameters(out, &c.stx.type_parameters);
      write_type_fn_params(out, &c.stx.parameters);
      write_opt_type_annotation(out, &c.stx.return_type);
    }
    TypeMember::IndexSignature(i) => {
      if i.stx.readonly {
        out.push_str("readonly ");
      }
      out.push('[');
      out.push_str(&i.stx.parameter_name);
      out.push_str(": ");
      write_type(out, &i.stx.parameter_type);
      out.push_str("]: ");
      write_type(out, &i.stx.type_annotation);
    }
  }
}

// Function, union and intersection types need parentheses inside array, union and intersection types.
fn write_type_operand(out: &mut String, ty: &Node<TypeExpr>) {
  let needs_parens = matches!(
    ty.stx.as_ref(),
    TypeExpr::FunctionType(_)
      | TypeExpr::ConstructorType(_)
      | TypeExpr::UnionType(_)
      | TypeExpr::IntersectionType(_)
      | TypeExpr::ConditionalType(_)
  );
  if needs_parens {
    out.push('(');
  }
  write_type(out, ty);
  if needs_parens {
    out.push(')');
  }
}

fn write_type(out: &mut String, ty: &Node<TypeExpr>) {
  match ty.stx.as_ref() {
    TypeExpr::Any(_) => out.push_str("any"),
    TypeExpr::Void(_) => out.push_str("void"),
    TypeExpr::String(_) => out.push_str("string"),
    TypeExpr::Number(_) => out.push_str("number"),
    TypeExpr::Boolean(_) => out.push_str("boolean"),
    TypeExpr::Symbol(_) => out.push_str("symbol"),
    TypeExpr::Object(_) => out.push_str("object"),
    TypeExpr::Null(_) => out.push_str("null"),
    TypeExpr::Undefined(_) => out.push_str("undefined"),
    TypeExpr::ThisType(_) => out.push_str("this"),
    TypeExpr::TypeReference(r) => {
      out.push_str(&entity_name_text(&r.stx.name));
      if let Some(args) = &r.stx.type_arguments {
        out.push('<');
        for (i, a) in args.iter().enumerate() {
          if i > 0 {
            out.push_str(", ");
          }
          write_type(out, a);
        }
        out.push('>');
      }
    }
    TypeExpr::LiteralType(l) => match l.stx.as_ref() {
      TypeLiteral::Boolean(v) => out.push_str(if *v { "true" } else { "false" }),
      TypeLiteral::Number(v) => out.push_str(v),
      TypeLiteral::String(v) => out.push_str(&string_literal(v)),
    },
    TypeExpr::ArrayType(a) => {
      if a.stx.readonly {
        out.push_str("readonly ");
      }
      write_type_operand(out, &a.stx.element_type);
      out.push_str("[]");
    }
    TypeExpr::TupleType(t) => {
      if t.stx.readonly {
        out.push_str("readonly ");
      }
      out.push('[');
      for (i, e) in t.stx.elements.iter().enumerate() {
        if i > 0 {
          out.push_str(", ");
        }
        write_type(out, e);
      }
      out.push(']');
    }
    TypeExpr::UnionType(u) => {
      for (i, t) in u.stx.types.iter().enumerate() {
        if i > 0 {
          out.push_str(" | ");
        }
        write_type_operand(out, t);
      }
    }
    TypeExpr::IntersectionType(u) => {
      for (i, t) in u.stx.types.iter().enumerate() {
        if i > 0 {
          out.push_str(" & ");
        }
        write_type_operand(out, t);
      }
    }
    TypeExpr::FunctionType(f) => {
      write_type_parameters(out, &f.stx.type_parameters);
      write_type_fn_params(out, &f.stx.parameters);
      out.push_str(" => ");
      write_type(out, &f.stx.return_type);
    }
    TypeExpr::ConstructorType(c) => {
      if c.stx.abstract_ {
        out.push_str("abstract ");
      }
      out.push_str("new ");
      write_type_parameters(out, &c.stx.type_parameters);
      write_type_fn_params(out, &c.stx.parameters);
      out.push_str(" => ");
      write_type(out, &c.stx.return_type);
    }
    TypeExpr::ObjectType(o) => {
      if o.stx.members.is_empty() {
        out.push_str("{}");
        return;
      }
      out.push_str("{ ");
      for (i, m) in o.stx.members.iter().enumerate() {
        if i > 0 {
          out.push_str("; ");
        }
        write_type_member(out, m);
      }
      out.push_str(" }");
    }
    TypeExpr::ParenthesizedType(p) => {
      out.push('(');
      write_type(out, &p.stx.type_expr);
      out.push(')');
    }
    TypeExpr::TypeQuery(q) => {
      out.push_str("typeof ");
      out.push_str(&entity_name_text(&q.stx.expr_name));
    }
    TypeExpr::TypeOperator(o) => {
      out.push_str(match o.stx.operator {
        TypeOperator::KeyOf => "keyof ",
        TypeOperator::Unique => "unique ",
        TypeOperator::Readonly => "readonly ",
      });
      write_type_operand(out, &o.stx.type_expr);
    }
    TypeExpr::IndexedAccessType(i) => {
      write_type_operand(out, &i.stx.object_type);
      out.push('[');
      write_type(out, &i.stx.index_type);
      out.push(']');
    }
    TypeExpr::ConditionalType(c) => {
      write_type_operand(out, &c.stx.check_type);
      out.push_str(" extends ");
      write_type_operand(out, &c.stx.extends_type);
      out.push_str(" ? ");
      write_type(out, &c.stx.true_type);
      out.push_str(" : ");
      write_type(out, &c.stx.false_type);
    }
    TypeExpr::InferType(i) => {
      out.push_str("infer ");
      out.push_str(&i.stx.type_parameter);
      if let Some(c) = &i.stx.constraint {
        out.push_str(" extends ");
        write_type(out, c);
      }
    }
    TypeExpr::MappedType(m) => {
      out.push_str("{ [");
      out.push_str(&m.stx.type_parameter);
      out.push_str(" in ");
      write_type(out, &m.stx.constraint);
      out.push(']');
      write_opt_type_annotation(out, &m.stx.type_expr);
      out.push_str(" }");
    }
    TypeExpr::TypePredicate(p) => {
      if p.stx.asserts {
        out.push_str("asserts ");
      }
      out.push_str(&p.stx.parameter_name);
      if let Some(t) = &p.stx.type_annotation {
        out.push_str(" is ");
        write_type(out, t);
      }
    }
  }
}

fn binary_precedence(op: OperatorName) -> u8 {
  match op {
    OperatorName::Comma => 1,
    OperatorName::Assignment | OperatorName::AssignmentAddition => 2,
    OperatorName::NullishCoalescing | OperatorName::LogicalOr => 4,
    OperatorName::LogicalAnd => 5,
    OperatorName::BitwiseOr => 6,
    OperatorName::BitwiseAnd => 8,
    OperatorName::Equality
    | OperatorName::Inequality
    | OperatorName::StrictEquality
    | OperatorName::StrictInequality => 9,
    OperatorName::LessThan
    | OperatorName::LessThanOrEqual
    | OperatorName::GreaterThan
    | OperatorName::GreaterThanOrEqual
    | OperatorName::In
    | OperatorName::Instanceof => 10,
    OperatorName::Addition | OperatorName::Subtraction => 12,
    OperatorName::Multiplication | OperatorName::Division | OperatorName::Remainder => 13,
    _ => 15,
  }
}

fn expr_precedence(expr: &Expr) -> u8 {
  match expr {
    Expr::ArrowFunc(_) => 2,
    Expr::Cond(_) => 3,
    Expr::Binary(b) => binary_precedence(b.stx.operator),
    Expr::Unary(_) => 15,
    _ => 20,
  }
}

// Operand of member access, call or `new`.
fn write_callee(out: &mut String, expr: &Node<Expr>) {
  let needs_parens = match expr.stx.as_ref() {
    Expr::Id(_)
    | Expr::This(_)
    | Expr::Super(_)
    | Expr::Call(_)
    | Expr::Member(_)
    | Expr::ComputedMember(_)
    | Expr::LitStr(_)
    | Expr::LitArr(_)
    | Expr::LitBool(_)
    | Expr::LitNull(_) => false,
    _ => true,
  };
  if needs_parens {
    out.push('(');
  }
  write_expr(out, expr);
  if needs_parens {
    out.push(')');
  }
}

fn write_operand(out: &mut String, expr: &Node<Expr>, min_precedence: u8) {
  let needs_parens = expr_precedence(&expr.stx) < min_precedence;
  if needs_parens {
    out.push('(');
  }
  write_expr(out, expr);
  if needs_parens {
    out.push(')');
  }
}

fn write_args(out: &mut String, args: &[Node<CallArg>]) {
  out.push('(');
  for (i, a) in args.iter().enumerate() {
    if i > 0 {
      out.push_str(", ");
    }
    if a.stx.spread {
      out.push_str("...");
    }
    write_operand(out, &a.stx.value, 2);
  }
  out.push(')');
}

fn write_decorators(out: &mut String, decorators: &[Node<Decorator>]) {
  for d in decorators {
    out.push('@');
    write_callee(out, &d.stx.expression);
    out.push(' ');
  }
}

fn write_pat(out: &mut String, pat: &Node<Pat>) {
  match pat.stx.as_ref() {
    Pat::Id(id) => out.push_str(&id.stx.name),
    Pat::Arr(arr) => {
      out.push('[');
      for (i, e) in arr.stx.elements.iter().enumerate() {
        if i > 0 {
          out.push_str(", ");
        }
        if let Some(e) = e {
          write_pat(out, &e.target);
          if let Some(d) = &e.default_value {
            out.push_str(" = ");
            write_expr(out, d);
          }
        }
      }
      if let Some(rest) = &arr.stx.rest {
        if !arr.stx.elements.is_empty() {
          out.push_str(", ");
        }
        out.push_str("...");
        write_pat(out, rest);
      }
      out.push(']');
    }
    Pat::Obj(obj) => {
      out.push_str("{ ");
      for (i, p) in obj.stx.properties.iter().enumerate() {
        if i > 0 {
          out.push_str(", ");
        }
        if p.stx.shorthand {
          write_pat(out, &p.stx.target);
        } else {
          write_key(out, &p.stx.key);
          out.push_str(": ");
          write_pat(out, &p.stx.target);
        }
        if let Some(d) = &p.stx.default_value {
          out.push_str(" = ");
          write_expr(out, d);
        }
      }
      if let Some(rest) = &obj.stx.rest {
        if !obj.stx.properties.is_empty() {
          out.push_str(", ");
        }
        out.push_str("...");
        out.push_str(&rest.stx.name);
      }
      out.push_str(" }");
    }
  }
}

fn write_key(out: &mut String, key: &ClassOrObjKey) {
  match key {
    ClassOrObjKey::Direct(k) => out.push_str(&k.stx.key),
    ClassOrObjKey::Computed(e) => {
      out.push('[');
      write_expr(out, e);
      out.push(']');
    }
  }
}

fn write_params(out: &mut String, params: &[Node<ParamDecl>]) {
  out.push('(');
  for (i, p) in params.iter().enumerate() {
    if i > 0 {
      out.push_str(", ");
    }
    write_decorators(out, &p.stx.decorators);
    if p.stx.rest {
      out.push_str("...");
    }
    write_pat(out, &p.stx.pattern.stx.pat);
    if p.stx.optional {
      out.push('?');
    }
    write_opt_type_annotation(out, &p.stx.type_annotation);
    if let Some(d) = &p.stx.default_value {
      out.push_str(" = ");
      write_operand(out, d, 2);
    }
  }
  out.push(')');
}

fn write_block(out: &mut String, body: &[Node<Stmt>]) {
  if body.is_empty() {
    out.push_str("{}");
    return;
  }
  out.push_str("{ ");
  for (i, s) in body.iter().enumerate() {
    if i > 0 {
      out.push(' ');
    }
    write_stmt(out, s);
  }
  out.push_str(" }");
}

// Signature and body, without any leading keyword or name.
fn write_func_tail(out: &mut String, func: &Func) {
  write_type_parameters(out, &func.type_parameters);
  write_params(out, &func.parameters);
  write_opt_type_annotation(out, &func.return_type);
  match &func.body {
    None => out.push(';'),
    Some(FuncBody::Block(body)) => {
      out.push(' ');
      write_block(out, body);
    }
    Some(FuncBody::Expression(expr)) => {
      out.push_str(" => ");
      match expr.stx.as_ref() {
        Expr::LitObj(_) => {
          out.push('(');
          write_expr(out, expr);
          out.push(')');
        }
        _ => write_operand(out, expr, 2),
      }
    }
  }
}

fn write_arrow(out: &mut String, func: &Func) {
  if func.async_ {
    out.push_str("async ");
  }
  write_type_parameters(out, &func.type_parameters);
  write_params(out, &func.parameters);
  write_opt_type_annotation(out, &func.return_type);
  match &func.body {
    Some(FuncBody::Block(body)) => {
      out.push_str(" => ");
      write_block(out, body);
    }
    Some(FuncBody::Expression(expr)) => {
      out.push_str(" => ");
      match expr.stx.as_ref() {
        Expr::LitObj(_) => {
          out.push('(');
          write_expr(out, expr);
          out.push(')');
        }
        _ => write_operand(out, expr, 2),
      }
    }
    None => out.push_str(" => {}"),
  }
}

fn write_class_member(out: &mut String, member: &Node<ClassMember>) {
  let m = member.stx.as_ref();
  write_decorators(out, &m.decorators);
  if m.static_ {
    out.push_str("static ");
  }
  if m.readonly {
    out.push_str("readonly ");
  }
  match &m.val {
    ClassOrObjVal::Getter(g) => {
      out.push_str("get ");
      write_key(out, &m.key);
      write_func_tail(out, &g.stx.func.stx);
    }
    ClassOrObjVal::Setter(s) => {
      out.push_str("set ");
      write_key(out, &m.key);
      write_func_tail(out, &s.stx.func.stx);
    }
    ClassOrObjVal::Method(f) => {
      if f.stx.func.stx.async_ {
        out.push_str("async ");
      }
      if f.stx.func.stx.generator {
        out.push('*');
      }
      write_key(out, &m.key);
      if m.optional {
        out.push('?');
      }
      write_func_tail(out, &f.stx.func.stx);
    }
    ClassOrObjVal::Prop(init) => {
      write_key(out, &m.key);
      if m.optional {
        out.push('?');
      }
      write_opt_type_annotation(out, &m.type_annotation);
      if let Some(init) = init {
        out.push_str(" = ");
        write_operand(out, init, 2);
      }
      out.push(';');
    }
    ClassOrObjVal::IndexSignature(i) => {
      out.push('[');
      out.push_str(&i.stx.parameter_name);
      out.push_str(": ");
      write_type(out, &i.stx.parameter_type);
      out.push_str("]: ");
      write_type(out, &i.stx.type_annotation);
      out.push(';');
    }
  }
}

fn write_class_body(
  out: &mut String,
  name: Option<&str>,
  type_parameters: &Option<Vec<Node<TypeParameter>>>,
  extends: Option<(&Node<Expr>, &Option<Vec<Node<TypeExpr>>>)>,
  implements: &[Node<TypeExpr>],
  members: &[Node<ClassMember>],
) {
  out.push_str("class");
  if let Some(name) = name {
    out.push(' ');
    out.push_str(name);
  }
  write_type_parameters(out, type_parameters);
  if let Some((base, args)) = extends {
    out.push_str(" extends ");
    write_callee(out, base);
    if let Some(args) = args {
      out.push('<');
      out.push_str(&args.iter().map(type_text).join(", "));
      out.push('>');
    }
  }
  if !implements.is_empty() {
    out.push_str(" implements ");
    out.push_str(&implements.iter().map(type_text).join(", "));
  }
  if members.is_empty() {
    out.push_str(" {}");
    return;
  }
  out.push_str(" { ");
  for (i, m) in members.iter().enumerate() {
    if i > 0 {
      out.push(' ');
    }
    write_class_member(out, m);
  }
  out.push_str(" }");
}

fn write_expr(out: &mut String, expr: &Node<Expr>) {
  match expr.stx.as_ref() {
    Expr::ArrowFunc(a) => write_arrow(out, &a.stx.func.stx),
    Expr::Binary(b) => {
      let prec = binary_precedence(b.stx.operator);
      let right_assoc = matches!(
        b.stx.operator,
        OperatorName::Assignment | OperatorName::AssignmentAddition
      );
      write_operand(out, &b.stx.left, if right_assoc { prec + 1 } else { prec });
      if b.stx.operator == OperatorName::Comma {
        out.push_str(", ");
      } else {
        out.push(' ');
        out.push_str(b.stx.operator.text());
        out.push(' ');
      }
      write_operand(out, &b.stx.right, if right_assoc { prec } else { prec + 1 });
    }
    Expr::Call(c) => {
      write_callee(out, &c.stx.callee);
      if c.stx.optional_chaining {
        out.push_str("?.");
      }
      write_args(out, &c.stx.arguments);
    }
    Expr::Class(c) => write_class_body(
      out,
      c.stx.name.as_ref().map(|n| n.stx.name.as_str()),
      &None,
      c.stx.extends.as_ref().map(|e| (e, &None)),
      &[],
      &c.stx.members,
    ),
    Expr::ComputedMember(m) => {
      write_callee(out, &m.stx.object);
      out.push_str(if m.stx.optional_chaining { "?.[" } else { "[" });
      write_expr(out, &m.stx.member);
      out.push(']');
    }
    Expr::Cond(c) => {
      write_operand(out, &c.stx.test, 4);
      out.push_str(" ? ");
      write_operand(out, &c.stx.consequent, 2);
      out.push_str(" : ");
      write_operand(out, &c.stx.alternate, 2);
    }
    Expr::Func(f) => {
      let func = f.stx.func.stx.as_ref();
      if func.async_ {
        out.push_str("async ");
      }
      out.push_str("function");
      if func.generator {
        out.push('*');
      }
      if let Some(name) = &f.stx.name {
        out.push(' ');
        out.push_str(&name.stx.name);
      } else {
        out.push(' ');
      }
      write_func_tail(out, func);
    }
    Expr::Id(id) => out.push_str(&id.stx.name),
    Expr::Member(m) => {
      write_callee(out, &m.stx.left);
      out.push_str(if m.stx.optional_chaining { "?." } else { "." });
      out.push_str(&m.stx.right);
    }
    Expr::New(n) => {
      out.push_str("new ");
      write_callee(out, &n.stx.callee);
      write_args(out, &n.stx.arguments);
    }
    Expr::Super(_) => out.push_str("super"),
    Expr::This(_) => out.push_str("this"),
    Expr::Unary(u) => {
      out.push_str(u.stx.operator.text());
      if u.stx.operator.is_keyword() {
        out.push(' ');
      }
      write_operand(out, &u.stx.argument, 15);
    }
    Expr::LitArr(a) => {
      out.push('[');
      for (i, e) in a.stx.elements.iter().enumerate() {
        if i > 0 {
          out.push_str(", ");
        }
        match e {
          LitArrElem::Single(e) => write_operand(out, e, 2),
          LitArrElem::Rest(e) => {
            out.push_str("...");
            write_operand(out, e, 2);
          }
          LitArrElem::Empty => {}
        }
      }
      out.push(']');
    }
    Expr::LitBool(b) => out.push_str(if b.stx.value { "true" } else { "false" }),
    Expr::LitNull(_) => out.push_str("null"),
    Expr::LitNum(n) => out.push_str(&number_text(n.stx.value)),
    Expr::LitObj(o) => {
      if o.stx.members.is_empty() {
        out.push_str("{}");
        return;
      }
      out.push_str("{ ");
      for (i, m) in o.stx.members.iter().enumerate() {
        if i > 0 {
          out.push_str(", ");
        }
        match &m.stx.typ {
          ObjMemberType::Valued { key, val } => match val {
            ClassOrObjVal::Prop(Some(value)) => {
              write_key(out, key);
              out.push_str(": ");
              write_operand(out, value, 2);
            }
            ClassOrObjVal::Getter(g) => {
              out.push_str("get ");
              write_key(out, key);
              write_func_tail(out, &g.stx.func.stx);
            }
            ClassOrObjVal::Setter(s) => {
              out.push_str("set ");
              write_key(out, key);
              write_func_tail(out, &s.stx.func.stx);
            }
            ClassOrObjVal::Method(f) => {
              write_key(out, key);
              write_func_tail(out, &f.stx.func.stx);
            }
            ClassOrObjVal::Prop(None) | ClassOrObjVal::IndexSignature(_) => write_key(out, key),
          },
          ObjMemberType::Shorthand { id } => out.push_str(&id.stx.name),
          ObjMemberType::Rest { val } => {
            out.push_str("...");
            write_operand(out, val, 2);
          }
        }
      }
      out.push_str(" }");
    }
    Expr::LitStr(s) => out.push_str(&string_literal(&s.stx.value)),
  }
}

fn write_var_decl(out: &mut String, decl: &VarDecl) {
  if decl.export {
    out.push_str("export ");
  }
  out.push_str(decl.mode.keyword());
  out.push(' ');
  for (i, d) in decl.declarators.iter().enumerate() {
    if i > 0 {
      out.push_str(", ");
    }
    write_pat(out, &d.stx.pattern.stx.pat);
    write_opt_type_annotation(out, &d.stx.type_annotation);
    if let Some(init) = &d.stx.initializer {
      out.push_str(" = ");
      write_operand(out, init, 2);
    }
  }
}

fn write_for_lhs(out: &mut String, lhs: &ForInOfLhs) {
  match lhs {
    ForInOfLhs::Assign { pat } => write_pat(out, pat),
    ForInOfLhs::Decl { mode, pattern } => {
      out.push_str(mode.keyword());
      out.push(' ');
      write_pat(out, &pattern.stx.pat);
    }
  }
}

fn write_class_decl(out: &mut String, decl: &ClassDecl) {
  write_decorators(out, &decl.decorators);
  if decl.export {
    out.push_str("export ");
  }
  if decl.export_default {
    out.push_str("default ");
  }
  if decl.declare {
    out.push_str("declare ");
  }
  if decl.abstract_ {
    out.push_str("abstract ");
  }
  write_class_body(
    out,
    decl.name_str(),
    &decl.type_parameters,
    decl.extends.as_ref().map(|e| (e, &decl.extends_type_arguments)),
    &decl.implements,
    &decl.members,
  );
}

fn write_stmt(out: &mut String, stmt: &Node<Stmt>) {
  match stmt.stx.as_ref() {
    Stmt::Block(b) => write_block(out, &b.stx.body),
    Stmt::Break(b) => match &b.stx.label {
      Some(label) => out.push_str(&format!("break {label};")),
      None => out.push_str("break;"),
    },
    Stmt::Continue(c) => match &c.stx.label {
      Some(label) => out.push_str(&format!("continue {label};")),
      None => out.push_str("continue;"),
    },
    Stmt::DoWhile(d) => {
      out.push_str("do ");
      write_stmt(out, &d.stx.body);
      out.push_str(" while (");
      write_expr(out, &d.stx.condition);
      out.push_str(");");
    }
    Stmt::Empty(_) => out.push(';'),
    Stmt::Expr(e) => {
      let needs_parens = matches!(
        e.stx.expr.stx.as_ref(),
        Expr::Func(_) | Expr::Class(_) | Expr::LitObj(_)
      );
      if needs_parens {
        out.push('(');
      }
      write_expr(out, &e.stx.expr);
      if needs_parens {
        out.push(')');
      }
      out.push(';');
    }
    Stmt::ForIn(f) => {
      out.push_str("for (");
      write_for_lhs(out, &f.stx.lhs);
      out.push_str(" in ");
      write_expr(out, &f.stx.rhs);
      out.push_str(") ");
      write_block(out, &f.stx.body.stx.body);
    }
    Stmt::ForOf(f) => {
      out.push_str(if f.stx.await_ { "for await (" } else { "for (" });
      write_for_lhs(out, &f.stx.lhs);
      out.push_str(" of ");
      write_expr(out, &f.stx.rhs);
      out.push_str(") ");
      write_block(out, &f.stx.body.stx.body);
    }
    Stmt::ForTriple(f) => {
      out.push_str("for (");
      match &f.stx.init {
        ForTripleStmtInit::None => {}
        ForTripleStmtInit::Expr { expr } => write_expr(out, expr),
        ForTripleStmtInit::Decl { decl } => write_var_decl(out, &decl.stx),
      }
      out.push_str("; ");
      if let Some(cond) = &f.stx.cond {
        write_expr(out, cond);
      }
      out.push_str("; ");
      if let Some(post) = &f.stx.post {
        write_expr(out, post);
      }
      out.push_str(") ");
      write_block(out, &f.stx.body.stx.body);
    }
    Stmt::If(i) => {
      out.push_str("if (");
      write_expr(out, &i.stx.test);
      out.push_str(") ");
      write_stmt(out, &i.stx.consequent);
      if let Some(alt) = &i.stx.alternate {
        out.push_str(" else ");
        write_stmt(out, alt);
      }
    }
    Stmt::Import(i) => {
      out.push_str("import ");
      if i.stx.type_only {
        out.push_str("type ");
      }
      let mut clauses = Vec::new();
      if let Some(default) = &i.stx.default {
        let mut c = String::new();
        write_pat(&mut c, &default.stx.pat);
        clauses.push(c);
      }
      match &i.stx.names {
        Some(ImportNames::All(alias)) => {
          let mut c = String::from("* as ");
          write_pat(&mut c, &alias.stx.pat);
          clauses.push(c);
        }
        Some(ImportNames::Specific(names)) => {
          let inner = names
            .iter()
            .map(|n| {
              let mut alias = String::new();
              write_pat(&mut alias, &n.stx.alias.stx.pat);
              if alias == n.stx.importable {
                alias
              } else {
                format!("{} as {alias}", n.stx.importable)
              }
            })
            .join(", ");
          clauses.push(format!("{{ {inner} }}"));
        }
        None => {}
      }
      if !clauses.is_empty() {
        out.push_str(&clauses.join(", "));
        out.push_str(" from ");
      }
      out.push_str(&string_literal(&i.stx.module));
      out.push(';');
    }
    Stmt::Label(l) => {
      out.push_str(&l.stx.name);
      out.push_str(": ");
      write_stmt(out, &l.stx.statement);
    }
    Stmt::Return(r) => match &r.stx.value {
      Some(value) => {
        out.push_str("return ");
        write_expr(out, value);
        out.push(';');
      }
      None => out.push_str("return;"),
    },
    Stmt::Switch(s) => {
      out.push_str("switch (");
      write_expr(out, &s.stx.test);
      out.push_str(") { ");
      for b in &s.stx.branches {
        match &b.stx.case {
          Some(case) => {
            out.push_str("case ");
            write_expr(out, case);
            out.push_str(": ");
          }
          None => out.push_str("default: "),
        }
        for s in &b.stx.body {
          write_stmt(out, s);
          out.push(' ');
        }
      }
      out.push('}');
    }
    Stmt::Throw(t) => {
      out.push_str("throw ");
      write_expr(out, &t.stx.value);
      out.push(';');
    }
    Stmt::Try(t) => {
      out.push_str("try ");
      write_block(out, &t.stx.wrapped.stx.body);
      if let Some(catch) = &t.stx.catch {
        out.push_str(" catch ");
        if let Some(param) = &catch.stx.parameter {
          out.push('(');
          write_pat(out, &param.stx.pat);
          write_opt_type_annotation(out, &catch.stx.type_annotation);
          out.push_str(") ");
        }
        write_block(out, &catch.stx.body);
      }
      if let Some(finally) = &t.stx.finally {
        out.push_str(" finally ");
        write_block(out, &finally.stx.body);
      }
    }
    Stmt::While(w) => {
      out.push_str("while (");
      write_expr(out, &w.stx.condition);
      out.push_str(") ");
      write_stmt(out, &w.stx.body);
    }
    Stmt::ClassDecl(c) => write_class_decl(out, &c.stx),
    Stmt::FunctionDecl(f) => {
      let func = f.stx.function.stx.as_ref();
      if f.stx.export {
        out.push_str("export ");
      }
      if f.stx.export_default {
        out.push_str("default ");
      }
      if func.async_ {
        out.push_str("async ");
      }
      out.push_str("function");
      if func.generator {
        out.push('*');
      }
      if let Some(name) = &f.stx.name {
        out.push(' ');
        out.push_str(&name.stx.name);
      }
      write_func_tail(out, func);
    }
    Stmt::VarDecl(v) => {
      write_var_decl(out, &v.stx);
      out.push(';');
    }
    Stmt::InterfaceDecl(i) => {
      if i.stx.export {
        out.push_str("export ");
      }
      out.push_str("interface ");
      out.push_str(&i.stx.name);
      write_type_parameters(out, &i.stx.type_parameters);
      if !i.stx.extends.is_empty() {
        out.push_str(" extends ");
        out.push_str(&i.stx.extends.iter().map(type_text).join(", "));
      }
      if i.stx.members.is_empty() {
        out.push_str(" {}");
      } else {
        out.push_str(" { ");
        for m in &i.stx.members {
          write_type_member(out, m);
          out.push_str("; ");
        }
        out.push('}');
      }
    }
    Stmt::TypeAliasDecl(t) => {
      if t.stx.export {
        out.push_str("export ");
      }
      out.push_str("type ");
      out.push_str(&t.stx.name);
      write_type_parameters(out, &t.stx.type_parameters);
      out.push_str(" = ");
      write_type(out, &t.stx.type_expr);
      out.push(';');
    }
    Stmt::EnumDecl(e) => {
      if e.stx.export {
        out.push_str("export ");
      }
      if e.stx.const_ {
        out.push_str("const ");
      }
      out.push_str("enum ");
      out.push_str(&e.stx.name);
      out.push_str(" { ");
      out.push_str(
        &e.stx
          .members
          .iter()
          .map(|m| match &m.stx.initializer {
            Some(init) => format!("{} = {}", m.stx.name, expr_text(init)),
            None => m.stx.name.clone(),
          })
          .join(", "),
      );
      out.push_str(" }");
    }
  }
}
