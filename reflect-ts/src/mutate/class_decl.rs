//! Class declarations: member assertions, property decorators, `implements`
//! checks, type parameter materialization and the class reflection itself.

use super::function::super_call_index;
use super::mutate_func_once;
use super::with_generics;
use super::FuncRole;
use crate::ast::class::ClassMember;
use crate::ast::class::ClassOrObjVal;
use crate::ast::func::FuncBody;
use crate::ast::node::Node;
use crate::ast::render;
use crate::ast::stmt::decl::ClassDecl;
use crate::ast::stmt::Stmt;
use crate::ast::type_expr::TypeExpr;
use crate::build;
use crate::context::Context;
use crate::context::TypeParamAccess;
use crate::error::TransformResult;
use crate::loc::Loc;
use crate::reflect;
use crate::reflect::library_call;
use crate::reflect::references_this;
use crate::reflect::Reflector;
use tracing::trace;

/// How the type parameters of class `class` are reached from one of its
/// members. Anonymous classes have no symbol to reach them through.
pub fn member_access(class: Option<&str>, static_: bool, constructor: bool) -> TypeParamAccess {
  match class {
    Some(_) if constructor => TypeParamAccess::Constructor,
    Some(class) if !static_ => TypeParamAccess::Instance {
      class: class.to_string(),
    },
    _ => TypeParamAccess::Erased,
  }
}

pub(crate) fn member_role(member: &ClassMember) -> Option<FuncRole> {
  match &member.val {
    ClassOrObjVal::Getter(_) => Some(FuncRole::Getter),
    ClassOrObjVal::Setter(_) => Some(FuncRole::Setter),
    ClassOrObjVal::Method(_) if member.is_constructor() => Some(FuncRole::Constructor),
    ClassOrObjVal::Method(_) => Some(FuncRole::Method),
    ClassOrObjVal::Prop(_) | ClassOrObjVal::IndexSignature(_) => None,
  }
}

pub(crate) fn type_parameter_names(decl: &ClassDecl) -> Vec<String> {
  decl
    .type_parameters
    .iter()
    .flatten()
    .map(|p| p.stx.name.clone())
    .collect()
}

pub fn mutate(ctx: &mut Context, decl: &mut Node<ClassDecl>) -> TransformResult<()> {
  let loc = decl.loc;
  let class = decl.stx.as_mut();
  let name = class.name_str().map(str::to_string);
  if class.declare {
    if let Some(name) = name {
      ctx.declare(name);
    }
    return Ok(());
  }
  let type_params = type_parameter_names(class);

  let merged = name
    .as_deref()
    .map(|n| ctx.interface_members(n).to_vec())
    .unwrap_or_default();
  let reflection = Reflector::new(ctx).class(loc, class, &merged)?;

  mutate_members(ctx, class, name.as_deref(), &type_params)?;

  let implements = implements_assertions(ctx, loc, class, name.as_deref(), &type_params)?;
  let materialized = match name.as_deref() {
    Some(name) if !type_params.is_empty() => Some(type_parameter_stmts(ctx, loc, class, name, &type_params)?),
    _ => None,
  };

  if !implements.is_empty() || materialized.is_some() {
    let index = ensure_constructor(class, loc);
    if let Some(body) = constructor_body(&mut class.members[index]) {
      if let Some(TypeParameterStmts { before_super, after_super }) = materialized {
        match super_call_index(body) {
          Some(i) => {
            body.insert(i, before_super);
            body.splice(i + 2..i + 2, after_super);
          }
          None => {
            body.insert(0, before_super);
            body.splice(1..1, after_super);
          }
        }
      }
      body.extend(implements);
      for stmt in body.iter() {
        trace!(stmt = %render::stmt_text(stmt), "constructor");
      }
    }
  }

  if let Some(name) = name.as_deref().filter(|_| !type_params.is_empty()) {
    let key = build::member(loc, build::id(loc, ctx.lib()), "TypeParametersSymbol");
    let symbol = build::call(
      loc,
      build::id(loc, "Symbol"),
      vec![build::string(loc, format!("{name}TypeParameters"))],
    );
    class.members.insert(0, build::static_computed_prop(loc, key, symbol));
  }

  let annotation = library_call(ctx, loc, "annotate", vec![reflection]);
  class.decorators.insert(0, build::decorator(loc, annotation));

  if let Some(name) = name {
    if ctx.has_interface(&name) {
      ctx.set_merged(name.clone());
    }
    ctx.declare(name);
  }
  Ok(())
}

fn mutate_members(
  ctx: &mut Context,
  class: &mut ClassDecl,
  name: Option<&str>,
  type_params: &[String],
) -> TransformResult<()> {
  for member in class.members.iter_mut() {
    let loc = member.loc;
    let m = member.stx.as_mut();
    let access = member_access(name, m.static_, m.is_constructor());
    if let Some(role) = member_role(m) {
      if let Some(func) = m.val.func_mut() {
        with_generics(ctx, type_params, access, |ctx| mutate_func_once(ctx, func, role))?;
      }
      continue;
    }
    if !matches!(m.val, ClassOrObjVal::Prop(_)) {
      continue;
    }
    let Some(ty) = m.type_annotation.as_ref().filter(|t| !t.stx.is_any()) else {
      continue;
    };
    let reflection = with_generics(ctx, type_params, access, |ctx| reflect::reflect(ctx, ty))?;
    // Reflections reading `this` are evaluated when the decorator runs.
    let value = if references_this(&reflection) {
      build::function_expr(loc, vec![build::return_stmt(loc, Some(reflection))])
    } else {
      reflection
    };
    let decorate = library_call(ctx, loc, "decorate", vec![value]);
    m.decorators.insert(0, build::decorator(loc, decorate));
  }
  Ok(())
}

fn implements_assertions(
  ctx: &mut Context,
  loc: Loc,
  class: &ClassDecl,
  name: Option<&str>,
  type_params: &[String],
) -> TransformResult<Vec<Node<Stmt>>> {
  let access = member_access(name, false, true);
  let mut stmts = Vec::new();
  for ty in &class.implements {
    if !matches!(ty.stx.as_ref(), TypeExpr::TypeReference(_)) {
      continue;
    }
    let reflection = with_generics(ctx, type_params, access.clone(), |ctx| reflect::reflect(ctx, ty))?;
    let check = reflect::assertion(loc, reflection, vec![build::this(loc)]);
    stmts.push(build::expr_stmt(loc, check));
  }
  Ok(stmts)
}

struct TypeParameterStmts {
  before_super: Node<Stmt>,
  after_super: Vec<Node<Stmt>>,
}

fn type_parameter_stmts(
  ctx: &mut Context,
  loc: Loc,
  class: &ClassDecl,
  name: &str,
  type_params: &[String],
) -> TransformResult<TypeParameterStmts> {
  let local = ctx.local("typeParameters");
  let mut entries = Vec::new();
  for param in class.type_parameters.iter().flatten() {
    let mut args = vec![build::string(loc, param.stx.name.as_str())];
    if let Some(bound) = &param.stx.constraint {
      args.push(with_generics(ctx, type_params, TypeParamAccess::Erased, |ctx| {
        reflect::reflect(ctx, bound)
      })?);
    }
    entries.push((param.stx.name.clone(), library_call(ctx, loc, "typeParameter", args)));
  }
  let before_super = build::const_stmt(loc, local.as_str(), build::object(loc, entries));

  let symbol = build::member(loc, build::id(loc, ctx.lib()), "TypeParametersSymbol");
  let key = build::computed_member(loc, build::id(loc, name), symbol);
  let target = build::computed_member(loc, build::this(loc), key);
  let mut after_super = vec![build::expr_stmt(
    loc,
    build::assign(loc, target, build::id(loc, local.as_str())),
  )];

  if let Some(args) = class.extends_type_arguments.as_ref().filter(|a| !a.is_empty()) {
    let mut bind = vec![build::this(loc)];
    for arg in args {
      bind.push(with_generics(ctx, type_params, TypeParamAccess::Constructor, |ctx| {
        reflect::reflect(ctx, arg)
      })?);
    }
    after_super.push(build::expr_stmt(loc, library_call(ctx, loc, "bindTypeParameters", bind)));
  }
  Ok(TypeParameterStmts {
    before_super,
    after_super,
  })
}

/// Index of the constructor implementation, synthesized when missing. A
/// synthesized constructor of a derived class forwards its arguments.
fn ensure_constructor(class: &mut ClassDecl, loc: Loc) -> usize {
  let existing = class.members.iter().position(|m| {
    m.stx.is_constructor() && m.stx.val.func().is_some_and(|f| f.stx.body.is_some())
  });
  if let Some(index) = existing {
    return index;
  }
  let (params, body) = if class.extends.is_some() {
    let forward = build::call_with(
      loc,
      build::super_(loc),
      vec![build::spread_arg(build::id(loc, "args"))],
    );
    (
      vec![build::rest_any_param(loc, "args")],
      vec![build::expr_stmt(loc, forward)],
    )
  } else {
    (Vec::new(), Vec::new())
  };
  class.members.insert(0, build::constructor_member(loc, params, body));
  0
}

fn constructor_body(member: &mut Node<ClassMember>) -> Option<&mut Vec<Node<Stmt>>> {
  let func = member.stx.val.func_mut()?;
  match func.stx.body.as_mut()? {
    FuncBody::Block(body) => Some(body),
    FuncBody::Expression(_) => None,
  }
}
