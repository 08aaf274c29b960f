use super::bound_names;
use crate::ast::node::Node;
use crate::ast::render;
use crate::ast::stmt::decl::VarDecl;
use crate::context::Context;
use crate::error::TransformResult;
use crate::reflect;

/// Wraps each annotated initializer with an assertion of its annotation.
pub fn mutate(ctx: &mut Context, decl: &mut Node<VarDecl>) -> TransformResult<()> {
  let mut names = Vec::new();
  for declarator in &mut decl.stx.declarators {
    let d = declarator.stx.as_mut();
    bound_names(&d.pattern.stx.pat, &mut names);
    let Some(ty) = d.type_annotation.as_ref().filter(|t| !t.stx.is_any()) else {
      continue;
    };
    let Some(init) = d.initializer.take() else {
      continue;
    };
    let loc = init.loc;
    let reflection = reflect::reflect(ctx, ty)?;
    let checked = reflect::assertion(loc, reflection, vec![init]);
    tracing::trace!(init = %render::expr_text(&checked), "asserted initializer");
    d.initializer = Some(checked);
  }
  for name in names {
    ctx.declare(name);
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::mutate;
  use crate::ast::node::Node;
  use crate::ast::render::stmt_text;
  use crate::ast::stmt::decl::VarDeclMode;
  use crate::ast::stmt::Stmt;
  use crate::ast::stx::TopLevel;
  use crate::ast::type_expr::TypeEntityName;
  use crate::ast::type_expr::TypeExpr;
  use crate::ast::type_expr::TypeReference;
  use crate::build;
  use crate::context::Context;
  use crate::diagnostics::FileId;
  use crate::frontend::NoInference;
  use crate::loc::Loc;
  use crate::options::TransformOptions;

  #[test]
  fn asserts_annotated_initializers() {
    let loc = Loc::default();
    let mut stmt = build::var_decl_stmt(loc, VarDeclMode::Let, "x", build::number(loc, 1.0));
    let Stmt::VarDecl(decl) = stmt.stx.as_mut() else {
      unreachable!();
    };
    decl.stx.declarators[0].stx.type_annotation = Some(Node::new(
      loc,
      TypeExpr::TypeReference(Node::new(
        loc,
        TypeReference {
          name: TypeEntityName::ident("Foo"),
          type_arguments: None,
        },
      )),
    ));

    let options = TransformOptions::default();
    let top = Node::new(loc, TopLevel { body: vec![] });
    let mut ctx = Context::new(&options, FileId(0), &NoInference, &top);
    mutate(&mut ctx, decl).unwrap();
    assert!(ctx.was_declared("x"));
    assert_eq!(
      stmt_text(&stmt),
      "let x: Foo = _t.ref(_t.tdz(() => Foo)).assert(1);"
    );
  }
}
