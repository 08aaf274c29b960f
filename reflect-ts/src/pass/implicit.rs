use crate::ast::class::ClassMember;
use crate::ast::class::ClassOrObjVal;
use crate::ast::expr::ObjMember;
use crate::ast::expr::ObjMemberType;
use crate::ast::func::Func;
use crate::ast::node::Node;
use crate::ast::node::NodeId;
use crate::ast::stmt::decl::ParamDecl;
use crate::ast::stmt::decl::VarDeclarator;
use crate::ast::stx::TopLevel;
use crate::ast::type_expr::TypeCallSignature;
use crate::ast::type_expr::TypeConstructSignature;
use crate::ast::type_expr::TypeExpr;
use crate::ast::type_expr::TypeMethodSignature;
use crate::ast::type_expr::TypePropertyKey;
use crate::ast::type_expr::TypePropertySignature;
use crate::context::Context;
use crate::error::InferenceMiss;
use crate::loc::Loc;
use derive_visitor::DriveMut;
use derive_visitor::VisitorMut;

type ParamDeclNode = Node<ParamDecl>;
type VarDeclaratorNode = Node<VarDeclarator>;
type ClassMemberNode = Node<ClassMember>;
type ObjMemberNode = Node<ObjMember>;
type TypePropertySignatureNode = Node<TypePropertySignature>;
type FuncNode = Node<Func>;
type TypeMethodSignatureNode = Node<TypeMethodSignature>;
type TypeCallSignatureNode = Node<TypeCallSignature>;
type TypeConstructSignatureNode = Node<TypeConstructSignature>;

/// Fills missing annotations with the types the front end infers.
///
/// Bindings (parameters, variables, properties) must have an inferable type;
/// every miss is collected. Return slots are filled when inference has an
/// answer and left empty otherwise.
pub fn run(ctx: &mut Context, top: &mut Node<TopLevel>) -> Result<(), Vec<InferenceMiss>> {
  let mut annotate = Annotate {
    ctx,
    misses: Vec::new(),
  };
  top.drive_mut(&mut annotate);
  let misses = annotate.misses;
  if misses.is_empty() {
    Ok(())
  } else {
    Err(misses)
  }
}

#[derive(VisitorMut)]
#[visitor(
  ParamDeclNode(enter),
  VarDeclaratorNode(enter),
  ClassMemberNode(enter),
  ObjMemberNode(enter),
  TypePropertySignatureNode(enter),
  FuncNode(enter),
  TypeMethodSignatureNode(enter),
  TypeCallSignatureNode(enter),
  TypeConstructSignatureNode(enter)
)]
struct Annotate<'c, 'a> {
  ctx: &'c mut Context<'a>,
  misses: Vec<InferenceMiss>,
}

impl<'c, 'a> Annotate<'c, 'a> {
  // Visits the host once; returns whether it still needs handling.
  fn claim(&mut self, id: NodeId) -> bool {
    if self.ctx.was_visited(id) {
      return false;
    }
    self.ctx.mark_visited(id);
    true
  }

  fn binding(&mut self, id: NodeId, loc: Loc, name: Option<&str>, slot: &mut Option<Node<TypeExpr>>) {
    if slot.is_some() {
      return;
    }
    match self.ctx.implicit_type(id, loc, name) {
      Ok(mut ty) => {
        self.ctx.adopt(&mut ty);
        *slot = Some(ty);
      }
      Err(miss) => self.misses.push(miss),
    }
  }

  fn return_slot(&mut self, id: NodeId, slot: &mut Option<Node<TypeExpr>>) {
    if slot.is_some() {
      return;
    }
    let Ok(ty) = self.ctx.implicit_type(id, Loc::default(), None) else {
      return;
    };
    let loc = ty.loc;
    let mut ty = match *ty.stx {
      TypeExpr::FunctionType(function) => function.stx.return_type,
      other => Node::new(loc, other),
    };
    self.ctx.adopt(&mut ty);
    *slot = Some(ty);
  }

  fn enter_param_decl_node(&mut self, node: &mut ParamDeclNode) {
    if !self.claim(node.id) || node.stx.is_this() {
      return;
    }
    let name = node.stx.name().map(str::to_string);
    self.binding(node.id, node.loc, name.as_deref(), &mut node.stx.type_annotation);
  }

  fn enter_var_declarator_node(&mut self, node: &mut VarDeclaratorNode) {
    if !self.claim(node.id) {
      return;
    }
    let name = node.stx.pattern.stx.pat.stx.as_ident().map(str::to_string);
    self.binding(node.id, node.loc, name.as_deref(), &mut node.stx.type_annotation);
  }

  fn enter_class_member_node(&mut self, node: &mut ClassMemberNode) {
    if !self.claim(node.id) {
      return;
    }
    let member = node.stx.as_mut();
    // Neither can carry a return annotation.
    if member.is_constructor() || matches!(member.val, ClassOrObjVal::Setter(_)) {
      if let Some(func) = member.val.func() {
        self.ctx.mark_visited(func.id);
      }
      return;
    }
    if let ClassOrObjVal::Prop(_) = member.val {
      let name = member.key.direct_name().map(str::to_string);
      self.binding(node.id, node.loc, name.as_deref(), &mut member.type_annotation);
    }
  }

  fn enter_obj_member_node(&mut self, node: &mut ObjMemberNode) {
    if let ObjMemberType::Valued {
      val: ClassOrObjVal::Setter(setter),
      ..
    } = &node.stx.typ
    {
      self.ctx.mark_visited(setter.stx.func.id);
    }
  }

  fn enter_type_property_signature_node(&mut self, node: &mut TypePropertySignatureNode) {
    if !self.claim(node.id) {
      return;
    }
    let name = match &node.stx.key {
      TypePropertyKey::Identifier(name) | TypePropertyKey::String(name) => Some(name.clone()),
      _ => None,
    };
    self.binding(node.id, node.loc, name.as_deref(), &mut node.stx.type_annotation);
  }

  fn enter_func_node(&mut self, node: &mut FuncNode) {
    if !self.claim(node.id) || node.stx.body.is_none() {
      return;
    }
    self.return_slot(node.id, &mut node.stx.return_type);
  }

  fn enter_type_method_signature_node(&mut self, node: &mut TypeMethodSignatureNode) {
    if self.claim(node.id) {
      self.return_slot(node.id, &mut node.stx.return_type);
    }
  }

  fn enter_type_call_signature_node(&mut self, node: &mut TypeCallSignatureNode) {
    if self.claim(node.id) {
      self.return_slot(node.id, &mut node.stx.return_type);
    }
  }

  fn enter_type_construct_signature_node(&mut self, node: &mut TypeConstructSignatureNode) {
    if self.claim(node.id) {
      self.return_slot(node.id, &mut node.stx.return_type);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::run;
  use crate::ast::node::Node;
  use crate::ast::node::NodeId;
  use crate::ast::render::top_level_text;
  use crate::ast::stmt::decl::VarDeclMode;
  use crate::ast::stx::TopLevel;
  use crate::ast::type_expr::TypeExpr;
  use crate::ast::type_expr::TypeNumber;
  use crate::build;
  use crate::context::Context;
  use crate::diagnostics::FileId;
  use crate::frontend::TypeInference;
  use crate::ids;
  use crate::ids::IdGen;
  use crate::loc::Loc;
  use crate::options::TransformOptions;

  // Infers `number` for the declarator of the first statement only.
  struct FirstOnly(NodeId);

  impl TypeInference for FirstOnly {
    fn infer_type(&self, _file: FileId, node: NodeId) -> Option<Node<TypeExpr>> {
      (node == self.0).then(|| {
        Node::new(
          Loc::default(),
          TypeExpr::Number(Node::new(Loc::default(), TypeNumber {})),
        )
      })
    }
  }

  fn declarator_id(top: &Node<TopLevel>, index: usize) -> NodeId {
    match top.stx.body[index].stx.as_ref() {
      crate::ast::stmt::Stmt::VarDecl(decl) => decl.stx.declarators[0].id,
      _ => unreachable!(),
    }
  }

  #[test]
  fn annotates_bindings_and_collects_misses() {
    let loc = Loc(0, 1);
    let mut top = Node::new(
      loc,
      TopLevel {
        body: vec![
          build::var_decl_stmt(loc, VarDeclMode::Let, "a", build::number(loc, 1.0)),
          build::var_decl_stmt(loc, VarDeclMode::Let, "b", build::id(loc, "a")),
        ],
      },
    );
    ids::assign_ids(&mut top, &mut IdGen::new());
    let inference = FirstOnly(declarator_id(&top, 0));
    let options = TransformOptions::default();
    let mut ctx = Context::new(&options, FileId(0), &inference, &top);

    let misses = run(&mut ctx, &mut top).unwrap_err();
    assert_eq!(misses.len(), 1);
    assert_eq!(misses[0].binding.as_deref(), Some("b"));
    assert_eq!(top_level_text(&top), "let a: number = 1;\nlet b = a;");

    // Hosts and adopted types are visited; a second run finds nothing to do.
    let visited = ctx.visited_count();
    assert!(run(&mut ctx, &mut top).is_ok());
    assert_eq!(ctx.visited_count(), visited);
  }
}
