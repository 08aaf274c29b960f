use crate::ast::node::Node;
use crate::ast::stx::TopLevel;
use crate::build;
use crate::context::Context;

/// Prepends the runtime library import, preceded by the module-alias
/// bootstrap when enabled.
pub fn mutate(ctx: &Context, top: &mut Node<TopLevel>) {
  let loc = top.loc;
  let mut prologue = Vec::new();
  if ctx.options.module_aliasing {
    prologue.push(build::import_stmt(loc, None, "module-alias/register"));
  }
  prologue.push(build::import_stmt(
    loc,
    Some(ctx.lib()),
    ctx.options.library_module.as_str(),
  ));
  top.stx.body.splice(0..0, prologue);
}
