use super::reflection_const;
use crate::ast::node::Node;
use crate::ast::stmt::Stmt;
use crate::ast::ts_stmt::TypeAliasDecl;
use crate::context::Context;
use crate::error::TransformResult;
use crate::reflect::Reflector;

/// `type A = X` gains `const A = lib.type("A", reflect(X));`.
pub fn mutate(ctx: &mut Context, decl: &mut Node<TypeAliasDecl>) -> TransformResult<Vec<Node<Stmt>>> {
  let alias = decl.stx.as_ref();
  if alias.declare {
    ctx.declare(alias.name.clone());
    return Ok(Vec::new());
  }
  let loc = decl.loc;
  let reflection = Reflector::new(ctx).named_type(loc, &alias.name, &alias.type_parameters, |r| {
    r.reflect(&alias.type_expr)
  })?;
  let stmt = reflection_const(loc, &alias.name, reflection, alias.export);
  ctx.declare(alias.name.clone());
  Ok(vec![stmt])
}
