//! Turns type expressions into expressions that build run-time reflections
//! with the runtime library, e.g. `string[]` into `_t.array(_t.string())`.

use crate::ast::class::ClassMember;
use crate::ast::class::ClassOrObjKey;
use crate::ast::class::ClassOrObjVal;
use crate::ast::expr::Expr;
use crate::ast::expr::ThisExpr;
use crate::ast::func::Func;
use crate::ast::node::Node;
use crate::ast::render;
use crate::ast::stmt::decl::ClassDecl;
use crate::ast::stmt::decl::ParamDecl;
use crate::ast::stmt::Stmt;
use crate::ast::type_expr::TypeAny;
use crate::ast::type_expr::TypeEntityName;
use crate::ast::type_expr::TypeExpr;
use crate::ast::type_expr::TypeFunctionParameter;
use crate::ast::type_expr::TypeIndexSignature;
use crate::ast::type_expr::TypeLiteral;
use crate::ast::type_expr::TypeMember;
use crate::ast::type_expr::TypeMethodSignature;
use crate::ast::type_expr::TypeParameter;
use crate::ast::type_expr::TypePropertyKey;
use crate::ast::type_expr::TypePropertySignature;
use crate::ast::type_expr::TypeReference;
use crate::ast::type_expr::TypeUnion;
use crate::build;
use crate::context::Context;
use crate::context::TypeParamAccess;
use crate::error::TransformError;
use crate::error::TransformResult;
use crate::ast::func::FuncBody;
use crate::ids;
use crate::loc::Loc;
use ahash::AHashMap;
use ahash::AHashSet;
use derive_visitor::Drive;
use derive_visitor::Visitor;

/// Reflects `ty` against the state of `ctx` at the current point of the walk.
pub fn reflect(ctx: &Context, ty: &Node<TypeExpr>) -> TransformResult<Node<Expr>> {
  Reflector::new(ctx).reflect(ty)
}

/// `lib.name(args...)`
pub fn library_call(ctx: &Context, loc: Loc, name: &str, args: Vec<Node<Expr>>) -> Node<Expr> {
  build::method_call(loc, build::id(loc, ctx.lib()), name, args)
}

/// `reflection.assert(args...)`
pub fn assertion(loc: Loc, reflection: Node<Expr>, args: Vec<Node<Expr>>) -> Node<Expr> {
  build::method_call(loc, reflection, "assert", args)
}

type ThisExprNode = Node<ThisExpr>;

#[derive(Default, Visitor)]
#[visitor(ThisExprNode(enter))]
struct FindThis {
  found: bool,
}

impl FindThis {
  fn enter_this_expr_node(&mut self, _node: &ThisExprNode) {
    self.found = true;
  }
}

/// Whether evaluating `expr` reads `this`.
pub fn references_this(expr: &Node<Expr>) -> bool {
  let mut find = FindThis::default();
  expr.drive(&mut find);
  find.found
}

/// A member of a structural type, as reflected into `property`, `indexer` or
/// `callProperty` calls.
#[derive(Clone, Debug)]
pub struct MemberEntry {
  pub static_: bool,
  pub member: Node<TypeMember>,
}

impl MemberEntry {
  pub fn instance(member: Node<TypeMember>) -> MemberEntry {
    MemberEntry {
      static_: false,
      member,
    }
  }
}

pub struct Reflector<'c, 'a> {
  ctx: &'c Context<'a>,
  // Type parameters bound by enclosing self-reference factories.
  locals: Vec<Vec<String>>,
}

impl<'c, 'a> Reflector<'c, 'a> {
  pub fn new(ctx: &'c Context<'a>) -> Reflector<'c, 'a> {
    Reflector {
      ctx,
      locals: Vec::new(),
    }
  }

  fn lib_call(&self, loc: Loc, name: &str, args: Vec<Node<Expr>>) -> Node<Expr> {
    library_call(self.ctx, loc, name, args)
  }

  fn nullable(&self, loc: Loc, reflection: Node<Expr>) -> Node<Expr> {
    if self.ctx.options.wraps_nullable() {
      self.lib_call(loc, "n", vec![reflection])
    } else {
      reflection
    }
  }

  fn is_local(&self, name: &str) -> bool {
    self.locals.iter().any(|names| names.iter().any(|n| n == name))
  }

  pub fn reflect(&mut self, ty: &Node<TypeExpr>) -> TransformResult<Node<Expr>> {
    let loc = ty.loc;
    let reflection = match ty.stx.as_ref() {
      TypeExpr::ParenthesizedType(p) => return self.reflect(&p.stx.type_expr),
      TypeExpr::Any(_) => self.lib_call(loc, "any", vec![]),
      TypeExpr::Null(_) => self.lib_call(loc, "null", vec![]),
      TypeExpr::Void(_) => {
        let null = self.lib_call(loc, "null", vec![]);
        let void = self.lib_call(loc, "void", vec![]);
        self.lib_call(loc, "union", vec![null, void])
      }
      TypeExpr::Number(_) => self.primitive(loc, "number", vec![]),
      TypeExpr::Boolean(_) => self.primitive(loc, "boolean", vec![]),
      TypeExpr::String(_) => self.primitive(loc, "string", vec![]),
      TypeExpr::Symbol(_) => self.primitive(loc, "symbol", vec![]),
      TypeExpr::Object(_) => self.primitive(loc, "object", vec![]),
      TypeExpr::Undefined(_) => self.primitive(loc, "void", vec![]),
      TypeExpr::ThisType(_) => self.primitive(loc, "this", vec![build::this(loc)]),
      TypeExpr::LiteralType(l) => match l.stx.as_ref() {
        TypeLiteral::Boolean(v) => self.primitive(loc, "boolean", vec![build::boolean(loc, *v)]),
        TypeLiteral::Number(v) => self.primitive(loc, "number", vec![number_literal(loc, v)]),
        TypeLiteral::String(v) => self.primitive(loc, "string", vec![build::string(loc, v.as_str())]),
      },
      TypeExpr::ArrayType(a) => {
        let element = self.reflect(&a.stx.element_type)?;
        self.primitive(loc, "array", vec![element])
      }
      TypeExpr::TupleType(t) => {
        let elements = self.reflect_all(&t.stx.elements)?;
        self.primitive(loc, "tuple", elements)
      }
      TypeExpr::UnionType(u) => {
        let types = self.reflect_all(&u.stx.types)?;
        self.primitive(loc, "union", types)
      }
      TypeExpr::IntersectionType(i) => {
        let types = self.reflect_all(&i.stx.types)?;
        self.primitive(loc, "intersection", types)
      }
      TypeExpr::TypeReference(r) => self.reference(loc, &r.stx)?,
      TypeExpr::FunctionType(f) => {
        let function = self.function(
          loc,
          &f.stx.type_parameters,
          &f.stx.parameters,
          Some(&f.stx.return_type),
        )?;
        self.nullable(loc, function)
      }
      TypeExpr::ConstructorType(c) => {
        let function = self.function(
          loc,
          &c.stx.type_parameters,
          &c.stx.parameters,
          Some(&c.stx.return_type),
        )?;
        self.nullable(loc, function)
      }
      TypeExpr::ObjectType(o) => {
        let entries: Vec<MemberEntry> = o
          .stx
          .members
          .iter()
          .cloned()
          .map(MemberEntry::instance)
          .collect();
        let members = self.members(&entries)?;
        self.primitive(loc, "object", members)
      }
      TypeExpr::TypeQuery(q) => {
        let target = entity_expr(loc, &q.stx.expr_name);
        self.primitive(loc, "typeOf", vec![target])
      }
      TypeExpr::TypeOperator(_)
      | TypeExpr::IndexedAccessType(_)
      | TypeExpr::ConditionalType(_)
      | TypeExpr::InferType(_)
      | TypeExpr::MappedType(_)
      | TypeExpr::TypePredicate(_) => {
        return Err(TransformError::unsupported(ty.stx.kind_name(), loc));
      }
    };
    Ok(reflection)
  }

  /// Reflects an optional type slot; a missing type reflects as `any`.
  pub fn reflect_opt(&mut self, ty: Option<&Node<TypeExpr>>, loc: Loc) -> TransformResult<Node<Expr>> {
    match ty {
      Some(ty) => self.reflect(ty),
      None => Ok(self.lib_call(loc, "any", vec![])),
    }
  }

  fn reflect_all(&mut self, types: &[Node<TypeExpr>]) -> TransformResult<Vec<Node<Expr>>> {
    types.iter().map(|t| self.reflect(t)).collect()
  }

  fn primitive(&self, loc: Loc, name: &str, args: Vec<Node<Expr>>) -> Node<Expr> {
    let call = self.lib_call(loc, name, args);
    self.nullable(loc, call)
  }

  fn type_param_expr(&self, loc: Loc, name: &str) -> Option<Node<Expr>> {
    if self.is_local(name) {
      return Some(build::id(loc, name));
    }
    let expr = match self.ctx.type_param_access(name)? {
      TypeParamAccess::Local => build::id(loc, name),
      TypeParamAccess::Instance { class } => {
        let symbol = build::member(loc, build::id(loc, self.ctx.lib()), "TypeParametersSymbol");
        let key = build::computed_member(loc, build::id(loc, class.as_str()), symbol);
        let params = build::computed_member(loc, build::this(loc), key);
        build::member(loc, params, name)
      }
      TypeParamAccess::Constructor => {
        build::member(loc, build::id(loc, self.ctx.local("typeParameters")), name)
      }
      TypeParamAccess::Erased => self.lib_call(loc, "any", vec![]),
    };
    Some(expr)
  }

  fn reference(&mut self, loc: Loc, reference: &TypeReference) -> TransformResult<Node<Expr>> {
    if let Some(name) = reference.name.as_ident() {
      if let Some(expr) = self.type_param_expr(loc, name) {
        return Ok(expr);
      }
    }
    let mut args = match &reference.type_arguments {
      Some(args) => self.reflect_all(args)?,
      None => Vec::new(),
    };
    let is_array = reference
      .name
      .as_ident()
      .is_some_and(|name| name.eq_ignore_ascii_case("array"));
    if is_array {
      return Ok(self.primitive(loc, "array", args));
    }
    let mut target = entity_expr(loc, &reference.name);
    if !self.ctx.was_declared(reference.name.leftmost()) {
      target = self.lib_call(loc, "tdz", vec![build::thunk(loc, target)]);
    }
    args.insert(0, target);
    Ok(self.primitive(loc, "ref", args))
  }

  // `param.typeParameter("T", bound?)` declarations, each visible to the next.
  fn type_parameter_stmts(&mut self, factory: &str, params: &[Node<TypeParameter>]) -> TransformResult<Vec<Node<Stmt>>> {
    let mut stmts = Vec::new();
    for param in params {
      let loc = param.loc;
      let mut args = vec![build::string(loc, param.stx.name.as_str())];
      if let Some(bound) = &param.stx.constraint {
        args.push(self.reflect(bound)?);
      }
      let init = build::method_call(loc, build::id(loc, factory), "typeParameter", args);
      stmts.push(build::const_stmt(loc, param.stx.name.as_str(), init));
      if let Some(names) = self.locals.last_mut() {
        names.push(param.stx.name.clone());
      }
    }
    Ok(stmts)
  }

  /// `(param) => { const T = param.typeParameter("T"); return body; }`, with
  /// the type parameters bound while `body` is reflected.
  pub fn factory<F>(
    &mut self,
    loc: Loc,
    param: &str,
    type_parameters: &[Node<TypeParameter>],
    body: F,
  ) -> TransformResult<Node<Expr>>
  where
    F: FnOnce(&mut Self) -> TransformResult<Node<Expr>>,
  {
    self.locals.push(Vec::new());
    let result = self
      .type_parameter_stmts(param, type_parameters)
      .and_then(|mut stmts| {
        let value = body(self)?;
        stmts.push(build::return_stmt(loc, Some(value)));
        Ok(stmts)
      });
    self.locals.pop();
    Ok(build::arrow(loc, &[param], FuncBody::Block(result?)))
  }

  /// `function(param(...)..., return(R))`, without nullable wrapping.
  pub fn function(
    &mut self,
    loc: Loc,
    type_parameters: &Option<Vec<Node<TypeParameter>>>,
    parameters: &[Node<TypeFunctionParameter>],
    return_type: Option<&Node<TypeExpr>>,
  ) -> TransformResult<Node<Expr>> {
    match type_parameters.as_ref().filter(|p| !p.is_empty()) {
      Some(type_parameters) => {
        let factory = self.ctx.local("fn");
        let body = self.factory(loc, &factory, type_parameters, |r| {
          let args = r.signature(loc, parameters, return_type)?;
          Ok(build::array(loc, args))
        })?;
        Ok(self.lib_call(loc, "function", vec![body]))
      }
      None => {
        let args = self.signature(loc, parameters, return_type)?;
        Ok(self.lib_call(loc, "function", args))
      }
    }
  }

  fn signature(
    &mut self,
    loc: Loc,
    parameters: &[Node<TypeFunctionParameter>],
    return_type: Option<&Node<TypeExpr>>,
  ) -> TransformResult<Vec<Node<Expr>>> {
    let mut args = Vec::with_capacity(parameters.len() + 1);
    for param in parameters {
      let p = param.stx.as_ref();
      let reflection = self.reflect_opt(p.type_expr.as_ref(), param.loc)?;
      args.push(self.param(param.loc, &p.name, reflection, p.rest, p.optional));
    }
    let ret = self.reflect_opt(return_type, loc)?;
    args.push(self.lib_call(loc, "return", vec![ret]));
    Ok(args)
  }

  /// `param("x", T, true?)`, or `rest("xs", T)` for rest parameters.
  pub fn param(&self, loc: Loc, name: &str, reflection: Node<Expr>, rest: bool, optional: bool) -> Node<Expr> {
    let mut args = vec![build::string(loc, name), reflection];
    if rest {
      return self.lib_call(loc, "rest", args);
    }
    if optional {
      args.push(build::boolean(loc, true));
    }
    self.lib_call(loc, "param", args)
  }

  /// Reflections of a member list, with same-named method signatures merged.
  pub fn members(&mut self, entries: &[MemberEntry]) -> TransformResult<Vec<Node<Expr>>> {
    let mut out = Vec::new();
    for slot in merge_overloads(entries) {
      out.push(self.member(&slot)?);
    }
    Ok(out)
  }

  fn member(&mut self, entry: &MemberEntry) -> TransformResult<Node<Expr>> {
    let loc = entry.member.loc;
    let kind = |name: &str| -> String {
      if entry.static_ {
        let mut chars = name.chars();
        let head: String = chars.next().map(|c| c.to_ascii_uppercase()).into_iter().collect();
        format!("static{head}{}", chars.as_str())
      } else {
        name.to_string()
      }
    };
    let reflection = match entry.member.stx.as_ref() {
      TypeMember::Property(p) => {
        let mut args = vec![key_expr(loc, &p.stx.key)];
        args.push(self.reflect_opt(p.stx.type_annotation.as_ref(), loc)?);
        if p.stx.optional {
          args.push(build::boolean(loc, true));
        }
        self.lib_call(loc, &kind("property"), args)
      }
      TypeMember::Method(m) => {
        let mut args = vec![key_expr(loc, &m.stx.key)];
        let function = self.function(
          loc,
          &m.stx.type_parameters,
          &m.stx.parameters,
          m.stx.return_type.as_ref(),
        )?;
        args.push(self.nullable(loc, function));
        if m.stx.optional {
          args.push(build::boolean(loc, true));
        }
        self.lib_call(loc, &kind("property"), args)
      }
      TypeMember::CallSignature(c) => {
        let function = self.function(
          loc,
          &c.stx.type_parameters,
          &c.stx.parameters,
          c.stx.return_type.as_ref(),
        )?;
        self.lib_call(loc, &kind("callProperty"), vec![function])
      }
      TypeMember::Constructor(c) => {
        let function = self.function(
          loc,
          &c.stx.type_parameters,
          &c.stx.parameters,
          c.stx.return_type.as_ref(),
        )?;
        self.lib_call(loc, &kind("callProperty"), vec![function])
      }
      TypeMember::IndexSignature(i) => {
        let key = self.reflect(&i.stx.parameter_type)?;
        let value = self.reflect(&i.stx.type_annotation)?;
        self.lib_call(
          loc,
          &kind("indexer"),
          vec![build::string(loc, i.stx.parameter_name.as_str()), key, value],
        )
      }
    };
    Ok(reflection)
  }

  /// `type("A", reflection)`, through a factory when `A` is generic.
  pub fn named_type<F>(
    &mut self,
    loc: Loc,
    name: &str,
    type_parameters: &Option<Vec<Node<TypeParameter>>>,
    body: F,
  ) -> TransformResult<Node<Expr>>
  where
    F: FnOnce(&mut Self) -> TransformResult<Node<Expr>>,
  {
    let reflection = match type_parameters.as_ref().filter(|p| !p.is_empty()) {
      Some(type_parameters) => {
        let factory = self.ctx.local(name);
        self.factory(loc, &factory, type_parameters, body)?
      }
      None => body(self)?,
    };
    Ok(self.lib_call(loc, "type", vec![build::string(loc, name), reflection]))
  }

  /// Body of an interface reflection: `intersect(refs..., object(members...))`,
  /// or just the object without heritage.
  pub fn interface_body(
    &mut self,
    loc: Loc,
    extends: &[Node<TypeExpr>],
    members: &[Node<TypeMember>],
  ) -> TransformResult<Node<Expr>> {
    let entries: Vec<MemberEntry> = members.iter().cloned().map(MemberEntry::instance).collect();
    let object = self.members(&entries)?;
    let object = self.lib_call(loc, "object", object);
    if extends.is_empty() {
      return Ok(object);
    }
    let mut parts = self.reflect_all(extends)?;
    parts.push(object);
    Ok(self.lib_call(loc, "intersect", parts))
  }

  /// `class("C", extends(Base, args...)?, members...)`; `merged` holds the
  /// members of same-named interfaces.
  pub fn class(&mut self, loc: Loc, decl: &ClassDecl, merged: &[Node<TypeMember>]) -> TransformResult<Node<Expr>> {
    let name = decl.name_str().unwrap_or("default");
    let mut entries = class_member_entries(&decl.members);
    entries.extend(merged.iter().cloned().map(MemberEntry::instance));
    let build_args = |r: &mut Self| -> TransformResult<Vec<Node<Expr>>> {
      let mut args = Vec::new();
      if let Some(base) = &decl.extends {
        let mut base = base.clone();
        ids::detach(&mut base);
        let mut extends = vec![base];
        if let Some(type_args) = &decl.extends_type_arguments {
          extends.extend(r.reflect_all(type_args)?);
        }
        args.push(r.lib_call(loc, "extends", extends));
      }
      args.extend(r.members(&entries)?);
      Ok(args)
    };
    let mut args = vec![build::string(loc, name)];
    match decl.type_parameters.as_ref().filter(|p| !p.is_empty()) {
      Some(type_parameters) => {
        let factory = self.ctx.local(name);
        args.push(self.factory(loc, &factory, type_parameters, |r| {
          Ok(build::array(loc, build_args(r)?))
        })?);
      }
      None => args.extend(build_args(self)?),
    }
    Ok(self.lib_call(loc, "class", args))
  }
}

/// Name a parameter is reflected under; destructuring patterns have none.
pub fn param_name(param: &ParamDecl, index: usize) -> String {
  match param.name() {
    Some(name) => name.to_string(),
    None => format!("_arg{index}"),
  }
}

fn number_literal(loc: Loc, text: &str) -> Node<Expr> {
  let lower = text.to_ascii_lowercase();
  let (negative, digits) = match lower.strip_prefix('-') {
    Some(rest) => (true, rest),
    None => (false, lower.as_str()),
  };
  let radix = [("0x", 16), ("0o", 8), ("0b", 2)]
    .into_iter()
    .find_map(|(prefix, radix)| digits.strip_prefix(prefix).map(|d| (d, radix)));
  let value = match radix {
    Some((d, radix)) => i64::from_str_radix(&d.replace('_', ""), radix).ok().map(|v| v as f64),
    None => digits.replace('_', "").parse::<f64>().ok(),
  };
  match value {
    Some(v) => build::number(loc, if negative { -v } else { v }),
    None => build::string(loc, text),
  }
}

/// `A.B.C` as a member chain.
fn entity_expr(loc: Loc, name: &TypeEntityName) -> Node<Expr> {
  match name {
    TypeEntityName::Identifier { name } => build::id(loc, name.as_str()),
    TypeEntityName::Qualified { left, right } => build::member(loc, entity_expr(loc, left), right.as_str()),
  }
}

fn key_expr(loc: Loc, key: &TypePropertyKey) -> Node<Expr> {
  match key {
    TypePropertyKey::Identifier(name) | TypePropertyKey::String(name) => build::string(loc, name.as_str()),
    TypePropertyKey::Number(text) => number_literal(loc, text),
    TypePropertyKey::Computed(expr) => {
      let mut expr = expr.clone();
      ids::detach(&mut expr);
      expr
    }
  }
}

fn key_text(key: &TypePropertyKey) -> String {
  match key {
    TypePropertyKey::Identifier(name) | TypePropertyKey::String(name) | TypePropertyKey::Number(name) => name.clone(),
    TypePropertyKey::Computed(expr) => format!("[{}]", render::expr_text(expr)),
  }
}

fn class_key(key: &ClassOrObjKey) -> TypePropertyKey {
  match key {
    ClassOrObjKey::Direct(k) => TypePropertyKey::Identifier(k.stx.key.clone()),
    ClassOrObjKey::Computed(e) => TypePropertyKey::Computed(e.clone()),
  }
}

fn func_params(func: &Func) -> Vec<Node<TypeFunctionParameter>> {
  func
    .parameters
    .iter()
    .enumerate()
    .filter(|(_, p)| !p.stx.is_this())
    .map(|(i, p)| {
      Node::new(
        p.loc,
        TypeFunctionParameter {
          name: param_name(&p.stx, i),
          optional: p.stx.optional,
          rest: p.stx.rest,
          type_expr: p.stx.type_annotation.clone(),
        },
      )
    })
    .collect()
}

/// Structural members of a class. Constructors are not reflected; overload
/// signatures of a method hide its implementation; getter and setter pairs
/// reflect once.
fn class_member_entries(members: &[Node<ClassMember>]) -> Vec<MemberEntry> {
  let overloaded: AHashSet<(bool, String)> = members
    .iter()
    .filter_map(|m| match &m.stx.val {
      ClassOrObjVal::Method(method) if method.stx.func.stx.body.is_none() => {
        Some((m.stx.static_, key_text(&class_key(&m.stx.key))))
      }
      _ => None,
    })
    .collect();
  let mut accessors = AHashSet::new();
  let mut entries = Vec::new();
  for m in members {
    if m.stx.is_constructor() {
      continue;
    }
    let member = m.stx.as_ref();
    let loc = m.loc;
    let key = class_key(&member.key);
    let ident = (member.static_, key_text(&key));
    let property = |type_annotation: Option<Node<TypeExpr>>| {
      TypeMember::Property(Node::new(
        loc,
        TypePropertySignature {
          readonly: member.readonly,
          optional: member.optional,
          key: key.clone(),
          type_annotation,
        },
      ))
    };
    let ty = match &member.val {
      ClassOrObjVal::Prop(_) => property(member.type_annotation.clone()),
      ClassOrObjVal::Getter(g) => {
        if !accessors.insert(ident) {
          continue;
        }
        property(g.stx.func.stx.return_type.clone())
      }
      ClassOrObjVal::Setter(s) => {
        if !accessors.insert(ident) {
          continue;
        }
        let param = s.stx.func.stx.parameters.iter().find(|p| !p.stx.is_this());
        property(param.and_then(|p| p.stx.type_annotation.clone()))
      }
      ClassOrObjVal::Method(method) => {
        let func = method.stx.func.stx.as_ref();
        if func.body.is_some() && overloaded.contains(&ident) {
          continue;
        }
        TypeMember::Method(Node::new(
          loc,
          TypeMethodSignature {
            optional: member.optional,
            key: key.clone(),
            type_parameters: func.type_parameters.clone(),
            parameters: func_params(func),
            return_type: func.return_type.clone(),
          },
        ))
      }
      ClassOrObjVal::IndexSignature(i) => TypeMember::IndexSignature(Node::new(
        loc,
        TypeIndexSignature {
          readonly: member.readonly,
          parameter_name: i.stx.parameter_name.clone(),
          parameter_type: i.stx.parameter_type.clone(),
          type_annotation: i.stx.type_annotation.clone(),
        },
      )),
    };
    let mut member = Node::new(loc, ty);
    ids::detach(&mut member);
    entries.push(MemberEntry {
      static_: m.stx.static_,
      member,
    });
  }
  entries
}

fn type_or_any_text(ty: &Option<Node<TypeExpr>>) -> String {
  match ty {
    Some(ty) => render::type_text(ty),
    None => "any".to_string(),
  }
}

// Distinct types in first-seen order, compared by rendered text.
#[derive(Default)]
struct DistinctTypes {
  seen: Vec<String>,
  types: Vec<Option<Node<TypeExpr>>>,
}

impl DistinctTypes {
  fn add(&mut self, ty: &Option<Node<TypeExpr>>) {
    let text = type_or_any_text(ty);
    if !self.seen.contains(&text) {
      self.seen.push(text);
      self.types.push(ty.clone());
    }
  }

  fn into_type(self, loc: Loc) -> Option<Node<TypeExpr>> {
    if self.types.len() <= 1 {
      return self.types.into_iter().next().flatten();
    }
    let types = self
      .types
      .into_iter()
      .map(|t| t.unwrap_or_else(|| Node::new(loc, TypeExpr::Any(Node::new(loc, TypeAny {})))))
      .collect();
    Some(Node::new(loc, TypeExpr::UnionType(Node::new(loc, TypeUnion { types }))))
  }
}

/// Collapses method signatures sharing a name into one signature whose
/// parameter and return types are unions of the distinct types seen per
/// position. Each group takes the place of its first signature.
pub fn merge_overloads(entries: &[MemberEntry]) -> Vec<MemberEntry> {
  enum Slot<'e> {
    Single(&'e MemberEntry),
    Methods(Vec<(&'e MemberEntry, &'e Node<TypeMethodSignature>)>),
  }
  let mut slots: Vec<Slot> = Vec::new();
  let mut groups: AHashMap<(bool, String), usize> = AHashMap::new();
  for entry in entries {
    match entry.member.stx.as_ref() {
      TypeMember::Method(method) => {
        let key = (entry.static_, key_text(&method.stx.key));
        match groups.get(&key) {
          Some(&i) => {
            if let Slot::Methods(group) = &mut slots[i] {
              group.push((entry, method));
            }
          }
          None => {
            groups.insert(key, slots.len());
            slots.push(Slot::Methods(vec![(entry, method)]));
          }
        }
      }
      _ => slots.push(Slot::Single(entry)),
    }
  }

  slots
    .into_iter()
    .map(|slot| match slot {
      Slot::Single(entry) => entry.clone(),
      Slot::Methods(group) if group.len() == 1 => group[0].0.clone(),
      Slot::Methods(group) => {
        let (first_entry, first) = group[0];
        let loc = first_entry.member.loc;
        let mut returns = DistinctTypes::default();
        let mut positions: Vec<(Node<TypeFunctionParameter>, DistinctTypes)> = Vec::new();
        for (_, method) in &group {
          returns.add(&method.stx.return_type);
          for (i, param) in method.stx.parameters.iter().enumerate() {
            if positions.len() <= i {
              positions.push((param.clone(), DistinctTypes::default()));
            }
            positions[i].1.add(&param.stx.type_expr);
          }
        }
        let parameters = positions
          .into_iter()
          .map(|(mut param, types)| {
            param.stx.type_expr = types.into_type(param.loc);
            param
          })
          .collect();
        let merged = TypeMethodSignature {
          optional: first.stx.optional,
          key: first.stx.key.clone(),
          type_parameters: first.stx.type_parameters.clone(),
          parameters,
          return_type: returns.into_type(loc),
        };
        MemberEntry {
          static_: first_entry.static_,
          member: Node::new(loc, TypeMember::Method(Node::new(loc, merged))),
        }
      }
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::diagnostics::FileId;
  use crate::frontend::NoInference;
  use crate::options::TransformOptions;
  use crate::ast::render::expr_text;
  use crate::ast::stx::TopLevel;
  use crate::ast::type_expr::*;

  fn loc() -> Loc {
    Loc::default()
  }

  fn prim(ty: TypeExpr) -> Node<TypeExpr> {
    Node::new(loc(), ty)
  }

  fn number() -> Node<TypeExpr> {
    prim(TypeExpr::Number(Node::new(loc(), TypeNumber {})))
  }

  fn string() -> Node<TypeExpr> {
    prim(TypeExpr::String(Node::new(loc(), TypeString {})))
  }

  fn boolean() -> Node<TypeExpr> {
    prim(TypeExpr::Boolean(Node::new(loc(), TypeBoolean {})))
  }

  fn reference(name: &str) -> Node<TypeExpr> {
    prim(TypeExpr::TypeReference(Node::new(
      loc(),
      TypeReference {
        name: TypeEntityName::ident(name),
        type_arguments: None,
      },
    )))
  }

  fn method(name: &str, params: Vec<Node<TypeExpr>>, ret: Node<TypeExpr>) -> MemberEntry {
    let parameters = params
      .into_iter()
      .enumerate()
      .map(|(i, t)| {
        Node::new(
          loc(),
          TypeFunctionParameter {
            name: format!("p{i}"),
            optional: false,
            rest: false,
            type_expr: Some(t),
          },
        )
      })
      .collect();
    MemberEntry::instance(Node::new(
      loc(),
      TypeMember::Method(Node::new(
        loc(),
        TypeMethodSignature {
          optional: false,
          key: TypePropertyKey::Identifier(name.into()),
          type_parameters: None,
          parameters,
          return_type: Some(ret),
        },
      )),
    ))
  }

  fn type_param(name: &str) -> Node<TypeParameter> {
    Node::new(
      loc(),
      TypeParameter {
        name: name.into(),
        constraint: None,
        default: None,
      },
    )
  }

  fn literal(value: TypeLiteral) -> Node<TypeExpr> {
    prim(TypeExpr::LiteralType(Node::new(loc(), value)))
  }

  fn qualified(left: &str, right: &str) -> TypeEntityName {
    TypeEntityName::Qualified {
      left: Box::new(TypeEntityName::ident(left)),
      right: right.into(),
    }
  }

  fn object(members: Vec<TypeMember>) -> Node<TypeExpr> {
    prim(TypeExpr::ObjectType(Node::new(
      loc(),
      TypeObjectLiteral {
        members: members.into_iter().map(|m| Node::new(loc(), m)).collect(),
      },
    )))
  }

  fn property(name: &str, ty: Node<TypeExpr>) -> TypeMember {
    TypeMember::Property(Node::new(
      loc(),
      TypePropertySignature {
        readonly: false,
        optional: false,
        key: TypePropertyKey::Identifier(name.into()),
        type_annotation: Some(ty),
      },
    ))
  }

  fn parameter(name: &str, ty: Node<TypeExpr>) -> Node<TypeFunctionParameter> {
    Node::new(
      loc(),
      TypeFunctionParameter {
        name: name.into(),
        optional: false,
        rest: false,
        type_expr: Some(ty),
      },
    )
  }

  fn with_ctx<R>(options: &TransformOptions, f: impl FnOnce(&mut Context) -> R) -> R {
    let top = Node::new(loc(), TopLevel { body: vec![] });
    let mut ctx = Context::new(options, FileId(0), &NoInference, &top);
    f(&mut ctx)
  }

  #[test]
  fn reflects_primitives_and_containers() {
    let options = TransformOptions::default();
    with_ctx(&options, |ctx| {
      let array = prim(TypeExpr::ArrayType(Node::new(
        loc(),
        TypeArray {
          readonly: false,
          element_type: string(),
        },
      )));
      assert_eq!(expr_text(&reflect(ctx, &array).unwrap()), "_t.array(_t.string())");
      let void = prim(TypeExpr::Void(Node::new(loc(), TypeVoid {})));
      assert_eq!(expr_text(&reflect(ctx, &void).unwrap()), "_t.union(_t.null(), _t.void())");
      let literal = prim(TypeExpr::LiteralType(Node::new(loc(), TypeLiteral::Number("0x10".into()))));
      assert_eq!(expr_text(&reflect(ctx, &literal).unwrap()), "_t.number(16)");
    });
  }

  #[test]
  fn nullable_wrapping_is_opt_in() {
    let options = TransformOptions {
      nullable_wrapping: true,
      ..TransformOptions::default()
    };
    with_ctx(&options, |ctx| {
      assert_eq!(expr_text(&reflect(ctx, &number()).unwrap()), "_t.n(_t.number())");
    });
  }

  #[test]
  fn forward_references_are_deferred() {
    let options = TransformOptions::default();
    with_ctx(&options, |ctx| {
      assert_eq!(
        expr_text(&reflect(ctx, &reference("B")).unwrap()),
        "_t.ref(_t.tdz(() => B))"
      );
      ctx.declare("B");
      assert_eq!(expr_text(&reflect(ctx, &reference("B")).unwrap()), "_t.ref(B)");
      assert_eq!(
        expr_text(&reflect(ctx, &reference("Array")).unwrap()),
        "_t.array()"
      );
    });
  }

  #[test]
  fn type_parameters_resolve_by_scope() {
    let options = TransformOptions::default();
    with_ctx(&options, |ctx| {
      ctx.push_generics(vec!["T".into()], TypeParamAccess::Instance { class: "C".into() });
      assert_eq!(
        expr_text(&reflect(ctx, &reference("T")).unwrap()),
        "this[C[_t.TypeParametersSymbol]].T"
      );
      ctx.push_generics(vec!["T".into()], TypeParamAccess::Constructor);
      assert_eq!(expr_text(&reflect(ctx, &reference("T")).unwrap()), "_typeParameters.T");
    });
  }

  #[test]
  fn unsupported_kinds_fail() {
    let options = TransformOptions::default();
    with_ctx(&options, |ctx| {
      let keyof = prim(TypeExpr::TypeOperator(Node::new(
        loc(),
        TypeOperatorExpr {
          operator: TypeOperator::KeyOf,
          type_expr: reference("A"),
        },
      )));
      let err = reflect(ctx, &keyof).unwrap_err();
      assert_eq!(err.to_string(), "No reflection for syntax kind 'TypeOperator' found.");
    });
  }

  #[test]
  fn reflects_every_type_kind() {
    let cases: Vec<(&str, Node<TypeExpr>, Result<&str, &str>)> = vec![
      ("any", prim(TypeExpr::Any(Node::new(loc(), TypeAny {}))), Ok("_t.any()")),
      ("symbol", prim(TypeExpr::Symbol(Node::new(loc(), TypeSymbol {}))), Ok("_t.symbol()")),
      ("object keyword", prim(TypeExpr::Object(Node::new(loc(), TypeObject {}))), Ok("_t.object()")),
      ("null", prim(TypeExpr::Null(Node::new(loc(), TypeNull {}))), Ok("_t.null()")),
      ("undefined", prim(TypeExpr::Undefined(Node::new(loc(), TypeUndefined {}))), Ok("_t.void()")),
      ("this", prim(TypeExpr::ThisType(Node::new(loc(), TypeThis {}))), Ok("_t.this(this)")),
      ("true", literal(TypeLiteral::Boolean(true)), Ok("_t.boolean(true)")),
      ("string literal", literal(TypeLiteral::String("a".into())), Ok("_t.string(\"a\")")),
      ("negative number literal", literal(TypeLiteral::Number("-1.5".into())), Ok("_t.number(-1.5)")),
      (
        "parenthesized",
        prim(TypeExpr::ParenthesizedType(Node::new(loc(), TypeParenthesized { type_expr: number() }))),
        Ok("_t.number()"),
      ),
      (
        "tuple",
        prim(TypeExpr::TupleType(Node::new(
          loc(),
          TypeTuple {
            readonly: false,
            elements: vec![number(), string()],
          },
        ))),
        Ok("_t.tuple(_t.number(), _t.string())"),
      ),
      (
        "intersection",
        prim(TypeExpr::IntersectionType(Node::new(
          loc(),
          TypeIntersection {
            types: vec![reference("A"), boolean()],
          },
        ))),
        Ok("_t.intersection(_t.ref(_t.tdz(() => A)), _t.boolean())"),
      ),
      (
        "typeof",
        prim(TypeExpr::TypeQuery(Node::new(
          loc(),
          TypeQuery {
            expr_name: qualified("a", "b"),
          },
        ))),
        Ok("_t.typeOf(a.b)"),
      ),
      (
        "qualified reference",
        prim(TypeExpr::TypeReference(Node::new(
          loc(),
          TypeReference {
            name: qualified("A", "B"),
            type_arguments: Some(vec![number()]),
          },
        ))),
        Ok("_t.ref(_t.tdz(() => A.B), _t.number())"),
      ),
      (
        "function",
        prim(TypeExpr::FunctionType(Node::new(
          loc(),
          TypeFunction {
            type_parameters: None,
            parameters: vec![parameter("x", number())],
            return_type: string(),
          },
        ))),
        Ok("_t.function(_t.param(\"x\", _t.number()), _t.return(_t.string()))"),
      ),
      (
        "constructor",
        prim(TypeExpr::ConstructorType(Node::new(
          loc(),
          TypeConstructor {
            abstract_: false,
            type_parameters: None,
            parameters: vec![],
            return_type: reference("A"),
          },
        ))),
        Ok("_t.function(_t.return(_t.ref(_t.tdz(() => A))))"),
      ),
      (
        "nested object",
        object(vec![property("a", object(vec![property("b", string())]))]),
        Ok("_t.object(_t.property(\"a\", _t.object(_t.property(\"b\", _t.string()))))"),
      ),
      (
        "index signature",
        object(vec![TypeMember::IndexSignature(Node::new(
          loc(),
          TypeIndexSignature {
            readonly: false,
            parameter_name: "k".into(),
            parameter_type: string(),
            type_annotation: number(),
          },
        ))]),
        Ok("_t.object(_t.indexer(\"k\", _t.string(), _t.number()))"),
      ),
      (
        "call signature",
        object(vec![TypeMember::CallSignature(Node::new(
          loc(),
          TypeCallSignature {
            type_parameters: None,
            parameters: vec![parameter("x", string())],
            return_type: Some(number()),
          },
        ))]),
        Ok("_t.object(_t.callProperty(_t.function(_t.param(\"x\", _t.string()), _t.return(_t.number()))))"),
      ),
      (
        "construct signature",
        object(vec![TypeMember::Constructor(Node::new(
          loc(),
          TypeConstructSignature {
            type_parameters: None,
            parameters: vec![],
            return_type: None,
          },
        ))]),
        Ok("_t.object(_t.callProperty(_t.function(_t.return(_t.any()))))"),
      ),
      (
        "indexed access",
        prim(TypeExpr::IndexedAccessType(Node::new(
          loc(),
          TypeIndexedAccess {
            object_type: reference("A"),
            index_type: literal(TypeLiteral::String("k".into())),
          },
        ))),
        Err("IndexedAccessType"),
      ),
      (
        "conditional",
        prim(TypeExpr::ConditionalType(Node::new(
          loc(),
          TypeConditional {
            check_type: reference("A"),
            extends_type: string(),
            true_type: number(),
            false_type: boolean(),
          },
        ))),
        Err("ConditionalType"),
      ),
      (
        "infer",
        prim(TypeExpr::InferType(Node::new(
          loc(),
          TypeInfer {
            type_parameter: "R".into(),
            constraint: None,
          },
        ))),
        Err("TypeParameter"),
      ),
      (
        "mapped",
        prim(TypeExpr::MappedType(Node::new(
          loc(),
          TypeMapped {
            type_parameter: "K".into(),
            constraint: reference("A"),
            type_expr: Some(number()),
          },
        ))),
        Err("MappedType"),
      ),
      (
        "predicate",
        prim(TypeExpr::TypePredicate(Node::new(
          loc(),
          TypePredicate {
            asserts: false,
            parameter_name: "x".into(),
            type_annotation: Some(string()),
          },
        ))),
        Err("TypePredicate"),
      ),
      (
        "unsupported member type",
        object(vec![property(
          "a",
          prim(TypeExpr::TypeOperator(Node::new(
            loc(),
            TypeOperatorExpr {
              operator: TypeOperator::Readonly,
              type_expr: number(),
            },
          ))),
        )]),
        Err("TypeOperator"),
      ),
    ];

    let options = TransformOptions::default();
    with_ctx(&options, |ctx| {
      for (name, ty, expected) in &cases {
        match (reflect(ctx, ty), expected) {
          (Ok(reflection), Ok(text)) => assert_eq!(expr_text(&reflection), *text, "{name}"),
          (Err(TransformError::Unsupported { kind, .. }), Err(expected_kind)) => {
            assert_eq!(kind, *expected_kind, "{name}")
          }
          (actual, _) => panic!("{name}: unexpected {:?}", actual.map(|r| expr_text(&r))),
        }
      }
    });
  }

  #[test]
  fn overloads_merge_per_position() {
    let mut entries = vec![
      method("f", vec![number()], string()),
      method("f", vec![string()], string()),
      method("f", vec![number()], boolean()),
    ];
    if let TypeMember::Method(first) = entries[0].member.stx.as_mut() {
      first.stx.optional = true;
      first.stx.type_parameters = Some(vec![type_param("T")]);
    }
    let merged = merge_overloads(&entries);
    assert_eq!(merged.len(), 1);
    let TypeMember::Method(m) = merged[0].member.stx.as_ref() else {
      panic!("expected a method");
    };
    assert_eq!(render::type_text(m.stx.parameters[0].stx.type_expr.as_ref().unwrap()), "number | string");
    assert_eq!(render::type_text(m.stx.return_type.as_ref().unwrap()), "string | boolean");
    assert!(m.stx.optional);
    let names: Vec<&str> = m
      .stx
      .type_parameters
      .iter()
      .flatten()
      .map(|p| p.stx.name.as_str())
      .collect();
    assert_eq!(names, vec!["T"]);
  }

  #[test]
  fn later_overloads_do_not_override_the_first() {
    let mut entries = vec![
      method("f", vec![number()], string()),
      method("f", vec![string()], string()),
    ];
    if let TypeMember::Method(second) = entries[1].member.stx.as_mut() {
      second.stx.optional = true;
      second.stx.type_parameters = Some(vec![type_param("U")]);
    }
    let merged = merge_overloads(&entries);
    let TypeMember::Method(m) = merged[0].member.stx.as_ref() else {
      panic!("expected a method");
    };
    assert!(!m.stx.optional);
    assert_eq!(m.stx.type_parameters, None);
  }

  #[test]
  fn merged_groups_keep_first_position() {
    let prop = MemberEntry::instance(Node::new(
      loc(),
      TypeMember::Property(Node::new(
        loc(),
        TypePropertySignature {
          readonly: false,
          optional: true,
          key: TypePropertyKey::Identifier("a".into()),
          type_annotation: Some(number()),
        },
      )),
    ));
    let entries = vec![
      method("g", vec![], number()),
      prop,
      method("g", vec![string()], number()),
    ];
    let options = TransformOptions::default();
    with_ctx(&options, |ctx| {
      let members = Reflector::new(ctx).members(&entries).unwrap();
      let texts: Vec<String> = members.iter().map(expr_text).collect();
      assert_eq!(
        texts,
        vec![
          "_t.property(\"g\", _t.function(_t.param(\"p0\", _t.string()), _t.return(_t.number())))",
          "_t.property(\"a\", _t.number(), true)",
        ]
      );
    });
  }

  #[test]
  fn generic_function_types_use_a_factory() {
    let options = TransformOptions::default();
    with_ctx(&options, |ctx| {
      let function = prim(TypeExpr::FunctionType(Node::new(
        loc(),
        TypeFunction {
          type_parameters: Some(vec![Node::new(
            loc(),
            TypeParameter {
              name: "U".into(),
              constraint: None,
              default: None,
            },
          )]),
          parameters: vec![Node::new(
            loc(),
            TypeFunctionParameter {
              name: "x".into(),
              optional: true,
              rest: false,
              type_expr: Some(reference("U")),
            },
          )],
          return_type: reference("U"),
        },
      )));
      assert_eq!(
        expr_text(&reflect(ctx, &function).unwrap()),
        "_t.function((_fn) => { const U = _fn.typeParameter(\"U\"); return [_t.param(\"x\", U, true), _t.return(U)]; })"
      );
    });
  }

  #[test]
  fn reflection_is_deterministic() {
    let options = TransformOptions::default();
    with_ctx(&options, |ctx| {
      let union = prim(TypeExpr::UnionType(Node::new(
        loc(),
        TypeUnion {
          types: vec![reference("A"), number()],
        },
      )));
      assert_eq!(reflect(ctx, &union).unwrap(), reflect(ctx, &union).unwrap());
    });
  }
}
