use super::FuncRole;
use crate::ast::expr::Expr;
use crate::ast::func::Func;
use crate::ast::func::FuncBody;
use crate::ast::node::Node;
use crate::ast::render;
use crate::ast::stmt::Stmt;
use crate::build;
use crate::context::Context;
use crate::context::TypeParamAccess;
use crate::error::TransformResult;
use crate::loc::Loc;
use crate::reflect;
use crate::reflect::library_call;
use crate::reflect::Reflector;
use std::mem;
use tracing::debug;
use tracing::trace;

/// Injects parameter and return value assertions into a function with a body.
///
/// Type parameters become local reflections at the start of the body and stay
/// in scope as [`TypeParamAccess::Local`] while the function's own types are
/// reflected.
pub fn mutate(ctx: &mut Context, func: &mut Node<Func>, role: FuncRole) -> TransformResult<()> {
  if func.stx.body.is_none() {
    return Ok(());
  }
  let names = func.stx.type_parameter_names();
  let generic = !names.is_empty();
  if generic {
    ctx.push_generics(names, TypeParamAccess::Local);
  }
  let result = rewrite(ctx, func.loc, func.stx.as_mut(), role);
  if generic {
    ctx.pop_generics();
  }
  result
}

fn checks_return(func: &Func, role: FuncRole) -> bool {
  !func.async_
    && !func.generator
    && !matches!(role, FuncRole::Constructor | FuncRole::Setter)
    && func.return_type.as_ref().is_some_and(|t| !t.stx.is_any())
}

fn rewrite(ctx: &mut Context, loc: Loc, func: &mut Func, role: FuncRole) -> TransformResult<()> {
  let mut prologue = Vec::new();

  for param in func.type_parameters.iter().flatten() {
    let mut args = vec![build::string(param.loc, param.stx.name.as_str())];
    if let Some(bound) = &param.stx.constraint {
      args.push(reflect::reflect(ctx, bound)?);
    }
    let init = library_call(ctx, param.loc, "typeParameter", args);
    prologue.push(build::const_stmt(param.loc, param.stx.name.as_str(), init));
  }

  let return_type = match (&func.return_type, checks_return(func, role)) {
    (Some(ty), true) => Some(library_call(ctx, loc, "return", vec![reflect::reflect(ctx, ty)?])),
    _ => None,
  };
  let return_local = ctx.local("returnType");

  let mut asserts = Vec::new();
  for (i, param) in func.parameters.iter().enumerate() {
    let p = param.stx.as_ref();
    if p.is_this() {
      continue;
    }
    let Some(ty) = p.type_annotation.as_ref().filter(|t| !t.stx.is_any()) else {
      continue;
    };
    let Some(name) = p.name() else {
      debug!(index = i, "destructured parameter is not asserted");
      continue;
    };
    let reflection = reflect::reflect(ctx, ty)?;
    let param_reflection = Reflector::new(ctx).param(param.loc, name, reflection, p.rest, p.optional);
    let check = reflect::assertion(param.loc, param_reflection, vec![build::id(param.loc, name)]);
    asserts.push(build::expr_stmt(param.loc, check));
  }

  let Some(body) = func.body.as_mut() else {
    return Ok(());
  };
  match body {
    FuncBody::Block(stmts) => {
      if return_type.is_some() {
        assert_returns(stmts, &return_local);
      }
      if let Some(return_type) = return_type {
        prologue.push(build::const_stmt(loc, return_local.as_str(), return_type));
      }
      prologue.extend(asserts);
      let at = match role {
        FuncRole::Constructor => super_call_index(stmts).map_or(0, |i| i + 1),
        _ => 0,
      };
      log_prologue(&prologue);
      stmts.splice(at..at, prologue);
    }
    FuncBody::Expression(expr) => {
      if prologue.is_empty() && asserts.is_empty() {
        if let Some(return_type) = return_type {
          let value = take_expr(expr);
          *expr = reflect::assertion(loc, return_type, vec![value]);
        }
        return Ok(());
      }
      let mut value = take_expr(expr);
      if let Some(return_type) = return_type {
        prologue.push(build::const_stmt(loc, return_local.as_str(), return_type));
        value = reflect::assertion(loc, build::id(loc, return_local.as_str()), vec![value]);
      }
      prologue.extend(asserts);
      log_prologue(&prologue);
      prologue.push(build::return_stmt(loc, Some(value)));
      *body = FuncBody::Block(prologue);
    }
  }
  Ok(())
}

fn log_prologue(stmts: &[Node<Stmt>]) {
  for stmt in stmts {
    trace!(stmt = %render::stmt_text(stmt), "synthesized");
  }
}

fn take_expr(expr: &mut Node<Expr>) -> Node<Expr> {
  let loc = expr.loc;
  mem::replace(expr, build::null(loc))
}

/// Position of the `super(...)` call among the top-level statements of a
/// constructor body.
pub(crate) fn super_call_index(stmts: &[Node<Stmt>]) -> Option<usize> {
  stmts.iter().position(|stmt| {
    let Stmt::Expr(e) = stmt.stx.as_ref() else {
      return false;
    };
    let Expr::Call(call) = e.stx.expr.stx.as_ref() else {
      return false;
    };
    matches!(call.stx.callee.stx.as_ref(), Expr::Super(_))
  })
}

// `return e` becomes `return <ns>returnType.assert(e)` throughout the
// function's own statements. Nested functions and classes have their own.
fn assert_returns(stmts: &mut [Node<Stmt>], local: &str) {
  for stmt in stmts {
    assert_returns_in(stmt, local);
  }
}

fn assert_returns_in(stmt: &mut Node<Stmt>, local: &str) {
  match stmt.stx.as_mut() {
    Stmt::Return(ret) => {
      let loc = ret.loc;
      if let Some(value) = ret.stx.value.take() {
        ret.stx.value = Some(reflect::assertion(loc, build::id(loc, local), vec![value]));
      }
    }
    Stmt::Block(b) => assert_returns(&mut b.stx.body, local),
    Stmt::DoWhile(d) => assert_returns_in(&mut d.stx.body, local),
    Stmt::While(w) => assert_returns_in(&mut w.stx.body, local),
    Stmt::ForIn(f) => assert_returns(&mut f.stx.body.stx.body, local),
    Stmt::ForOf(f) => assert_returns(&mut f.stx.body.stx.body, local),
    Stmt::ForTriple(f) => assert_returns(&mut f.stx.body.stx.body, local),
    Stmt::If(i) => {
      assert_returns_in(&mut i.stx.consequent, local);
      if let Some(alt) = &mut i.stx.alternate {
        assert_returns_in(alt, local);
      }
    }
    Stmt::Label(l) => assert_returns_in(&mut l.stx.statement, local),
    Stmt::Switch(s) => {
      for branch in &mut s.stx.branches {
        assert_returns(&mut branch.stx.body, local);
      }
    }
    Stmt::Try(t) => {
      assert_returns(&mut t.stx.wrapped.stx.body, local);
      if let Some(catch) = &mut t.stx.catch {
        assert_returns(&mut catch.stx.body, local);
      }
      if let Some(finally) = &mut t.stx.finally {
        assert_returns(&mut finally.stx.body, local);
      }
    }
    _ => {}
  }
}

#[cfg(test)]
mod tests {
  use super::mutate;
  use crate::ast::func::Func;
  use crate::ast::func::FuncBody;
  use crate::ast::node::Node;
  use crate::ast::render::stmts_text;
  use crate::ast::render::expr_text;
  use crate::ast::stmt::IfStmt;
  use crate::ast::stmt::Stmt;
  use crate::ast::stx::TopLevel;
  use crate::ast::type_expr::TypeExpr;
  use crate::ast::type_expr::TypeNumber;
  use crate::ast::type_expr::TypeString;
  use crate::build;
  use crate::context::Context;
  use crate::diagnostics::FileId;
  use crate::frontend::NoInference;
  use crate::loc::Loc;
  use crate::mutate::FuncRole;
  use crate::options::TransformOptions;

  fn loc() -> Loc {
    Loc::default()
  }

  fn number() -> Node<TypeExpr> {
    Node::new(loc(), TypeExpr::Number(Node::new(loc(), TypeNumber {})))
  }

  fn string() -> Node<TypeExpr> {
    Node::new(loc(), TypeExpr::String(Node::new(loc(), TypeString {})))
  }

  fn func(body: FuncBody, ret: Option<Node<TypeExpr>>) -> Node<Func> {
    let mut x = build::param(loc(), "x");
    x.stx.type_annotation = Some(number());
    Node::new(
      loc(),
      Func {
        arrow: matches!(body, FuncBody::Expression(_)),
        async_: false,
        generator: false,
        type_parameters: None,
        parameters: vec![x],
        return_type: ret,
        body: Some(body),
      },
    )
  }

  fn run(f: &mut Node<Func>, role: FuncRole) {
    let options = TransformOptions::default();
    let top = Node::new(loc(), TopLevel { body: vec![] });
    let mut ctx = Context::new(&options, FileId(0), &NoInference, &top);
    mutate(&mut ctx, f, role).unwrap();
  }

  fn block(f: &Node<Func>) -> String {
    match &f.stx.body {
      Some(FuncBody::Block(stmts)) => stmts_text(stmts),
      _ => panic!("expected a block body"),
    }
  }

  #[test]
  fn asserts_parameters_and_returns() {
    let body = vec![
      Node::new(
        loc(),
        Stmt::If(Node::new(
          loc(),
          IfStmt {
            test: build::id(loc(), "x"),
            consequent: build::return_stmt(loc(), Some(build::string(loc(), "a"))),
            alternate: None,
          },
        )),
      ),
      build::return_stmt(loc(), Some(build::string(loc(), "b"))),
    ];
    let mut f = func(FuncBody::Block(body), Some(string()));
    run(&mut f, FuncRole::Function);
    assert_eq!(
      block(&f),
      [
        "const _returnType = _t.return(_t.string());",
        "_t.param(\"x\", _t.number()).assert(x);",
        "if (x) return _returnType.assert(\"a\");",
        "return _returnType.assert(\"b\");",
      ]
      .join("\n")
    );
  }

  #[test]
  fn expression_bodies_become_blocks_when_needed() {
    let mut f = func(FuncBody::Expression(build::id(loc(), "x")), Some(number()));
    run(&mut f, FuncRole::Function);
    assert_eq!(
      block(&f),
      [
        "const _returnType = _t.return(_t.number());",
        "_t.param(\"x\", _t.number()).assert(x);",
        "return _returnType.assert(x);",
      ]
      .join("\n")
    );

    let mut f = func(FuncBody::Expression(build::id(loc(), "x")), Some(number()));
    f.stx.parameters[0].stx.type_annotation = None;
    run(&mut f, FuncRole::Function);
    let Some(FuncBody::Expression(expr)) = &f.stx.body else {
      panic!("expected an expression body");
    };
    assert_eq!(expr_text(expr), "_t.return(_t.number()).assert(x)");
  }

  #[test]
  fn setters_and_async_functions_skip_return_checks() {
    let body = vec![build::return_stmt(loc(), Some(build::id(loc(), "x")))];
    let mut f = func(FuncBody::Block(body.clone()), Some(number()));
    run(&mut f, FuncRole::Setter);
    assert_eq!(block(&f), "_t.param(\"x\", _t.number()).assert(x);\nreturn x;");

    let mut f = func(FuncBody::Block(body), Some(number()));
    f.stx.async_ = true;
    run(&mut f, FuncRole::Function);
    assert_eq!(block(&f), "_t.param(\"x\", _t.number()).assert(x);\nreturn x;");
  }

  #[test]
  fn constructor_prologue_follows_super_call() {
    let super_call = build::expr_stmt(loc(), build::call(loc(), build::super_(loc()), vec![]));
    let body = vec![super_call, build::expr_stmt(loc(), build::id(loc(), "y"))];
    let mut f = func(FuncBody::Block(body), None);
    run(&mut f, FuncRole::Constructor);
    assert_eq!(
      block(&f),
      "super();\n_t.param(\"x\", _t.number()).assert(x);\ny;"
    );
  }
}
