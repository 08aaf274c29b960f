//! Rewrite rules, one per syntax kind of interest.
//!
//! Statement mutators rewrite their node in place and return sibling
//! statements to insert right after it.

pub mod class_decl;
pub mod function;
pub mod interface_decl;
pub mod source_file;
pub mod type_alias;
pub mod var_decl;

use crate::ast::expr::Expr;
use crate::ast::func::Func;
use crate::ast::node::Node;
use crate::ast::pat::Pat;
use crate::ast::render;
use crate::ast::stmt::decl::VarDeclMode;
use crate::ast::stmt::Stmt;
use crate::build;
use crate::context::Context;
use crate::context::TypeParamAccess;
use crate::error::TransformResult;
use crate::loc::Loc;

/// What a function is to its surroundings; decides which assertions apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FuncRole {
  Function,
  Method,
  Getter,
  Setter,
  Constructor,
}

pub fn mutate_stmt(ctx: &mut Context, stmt: &mut Node<Stmt>) -> TransformResult<Vec<Node<Stmt>>> {
  match stmt.stx.as_mut() {
    Stmt::ClassDecl(decl) => {
      class_decl::mutate(ctx, decl)?;
      Ok(Vec::new())
    }
    Stmt::InterfaceDecl(decl) => interface_decl::mutate(ctx, decl),
    Stmt::TypeAliasDecl(decl) => type_alias::mutate(ctx, decl),
    Stmt::VarDecl(decl) => {
      var_decl::mutate(ctx, decl)?;
      Ok(Vec::new())
    }
    Stmt::FunctionDecl(decl) => {
      mutate_func_once(ctx, &mut decl.stx.function, FuncRole::Function)?;
      Ok(Vec::new())
    }
    Stmt::EnumDecl(decl) => {
      ctx.declare(decl.stx.name.clone());
      Ok(Vec::new())
    }
    _ => Ok(Vec::new()),
  }
}

/// Hands `func` to the function mutator unless this pass already did.
pub fn mutate_func_once(ctx: &mut Context, func: &mut Node<Func>, role: FuncRole) -> TransformResult<()> {
  if ctx.was_visited(func.id) {
    return Ok(());
  }
  ctx.record_mutation(func.id);
  function::mutate(ctx, func, role)?;
  ctx.mark_visited(func.id);
  Ok(())
}

/// Runs `f` with the type parameters `names` in scope, if there are any.
pub(crate) fn with_generics<'a, R>(
  ctx: &mut Context<'a>,
  names: &[String],
  access: TypeParamAccess,
  f: impl FnOnce(&mut Context<'a>) -> R,
) -> R {
  if names.is_empty() {
    return f(ctx);
  }
  ctx.push_generics(names.to_vec(), access);
  let result = f(ctx);
  ctx.pop_generics();
  result
}

/// `const name = init;`, exported along with the declaration it reflects.
pub(crate) fn reflection_const(loc: Loc, name: &str, init: Node<Expr>, export: bool) -> Node<Stmt> {
  let mut stmt = build::var_decl_stmt(loc, VarDeclMode::Const, name, init);
  if let Stmt::VarDecl(decl) = stmt.stx.as_mut() {
    decl.stx.export = export;
  }
  tracing::trace!(stmt = %render::stmt_text(&stmt), "synthesized");
  stmt
}

/// Names bound by a pattern, in source order.
pub(crate) fn bound_names(pat: &Node<Pat>, out: &mut Vec<String>) {
  match pat.stx.as_ref() {
    Pat::Id(id) => out.push(id.stx.name.clone()),
    Pat::Arr(arr) => {
      for elem in arr.stx.elements.iter().flatten() {
        bound_names(&elem.target, out);
      }
      if let Some(rest) = &arr.stx.rest {
        bound_names(rest, out);
      }
    }
    Pat::Obj(obj) => {
      for prop in &obj.stx.properties {
        bound_names(&prop.stx.target, out);
      }
      if let Some(rest) = &obj.stx.rest {
        out.push(rest.stx.name.clone());
      }
    }
  }
}
