use super::reflection_const;
use crate::ast::node::Node;
use crate::ast::stmt::Stmt;
use crate::ast::ts_stmt::InterfaceDecl;
use crate::context::Context;
use crate::error::TransformResult;
use crate::reflect::Reflector;
use tracing::debug;

/// Emits `const I = lib.type("I", ...)` after the last declaration of `I` in
/// the unit. Interfaces sharing a class's name are reflected with the class.
pub fn mutate(ctx: &mut Context, decl: &mut Node<InterfaceDecl>) -> TransformResult<Vec<Node<Stmt>>> {
  let interface = decl.stx.as_ref();
  let name = interface.name.as_str();
  if interface.declare {
    return Ok(Vec::new());
  }
  if ctx.has_class(name) {
    debug!(interface = name, "interface merged into class");
    ctx.set_merged(name);
    return Ok(Vec::new());
  }
  if ctx.is_merged(name) {
    return Ok(Vec::new());
  }
  let Some(pending) = ctx.accumulate_interface(interface) else {
    return Ok(Vec::new());
  };
  let loc = decl.loc;
  let reflection = Reflector::new(ctx).named_type(loc, name, &pending.type_parameters, |r| {
    r.interface_body(loc, &pending.extends, &pending.members)
  })?;
  let stmt = reflection_const(loc, name, reflection, pending.export);
  ctx.declare(name);
  Ok(vec![stmt])
}
