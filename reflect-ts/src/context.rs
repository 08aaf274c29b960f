use crate::ast::node::Node;
use crate::ast::node::NodeId;
use crate::ast::stmt::Stmt;
use crate::ast::stx::TopLevel;
use crate::ast::ts_stmt::InterfaceDecl;
use crate::ast::type_expr::TypeExpr;
use crate::ast::type_expr::TypeMember;
use crate::ast::type_expr::TypeParameter;
use crate::diagnostics::FileId;
use crate::error::InferenceMiss;
use crate::frontend::TypeInference;
use crate::ids;
use crate::ids::IdGen;
use crate::loc::Loc;
use crate::options::TransformOptions;
use ahash::AHashMap;
use ahash::AHashSet;
use derive_visitor::Drive;
use derive_visitor::DriveMut;

/// How a type parameter in scope is reached from generated code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeParamAccess {
  /// A local `const T` declared at the start of the enclosing body.
  Local,
  /// `this[C[lib.TypeParametersSymbol]].T` inside instance members of class `C`.
  Instance { class: String },
  /// `<ns>typeParameters.T` inside the constructor.
  Constructor,
  /// Not reachable at run time; reflects as `any`.
  Erased,
}

#[derive(Clone, Debug)]
struct GenericScope {
  names: Vec<String>,
  access: TypeParamAccess,
}

/// Members of every declaration of one interface, accumulated until the last
/// declaration in the unit has been seen.
#[derive(Clone, Debug, Default)]
pub struct PendingInterface {
  remaining: usize,
  pub export: bool,
  pub type_parameters: Option<Vec<Node<TypeParameter>>>,
  pub extends: Vec<Node<TypeExpr>>,
  pub members: Vec<Node<TypeMember>>,
}

// Class and interface declarations of one statement list, gathered before the
// list is walked so that order of appearance does not matter. Declarations in
// nested lists belong to their own frame; ambient declarations are left out.
#[derive(Default)]
struct DeclarationFrame {
  classes: AHashSet<String>,
  interfaces: AHashMap<String, usize>,
  interface_members: AHashMap<String, Vec<Node<TypeMember>>>,
  pending: AHashMap<String, PendingInterface>,
  merged: AHashSet<String>,
}

impl DeclarationFrame {
  fn of(stmts: &[Node<Stmt>]) -> DeclarationFrame {
    let mut frame = DeclarationFrame::default();
    for stmt in stmts {
      match stmt.stx.as_ref() {
        Stmt::ClassDecl(decl) if !decl.stx.declare => {
          if let Some(name) = decl.stx.name_str() {
            frame.classes.insert(name.to_string());
          }
        }
        Stmt::InterfaceDecl(decl) if !decl.stx.declare => frame.add_interface(&decl.stx),
        _ => {}
      }
    }
    frame
  }

  fn add_interface(&mut self, decl: &InterfaceDecl) {
    *self.interfaces.entry(decl.name.clone()).or_default() += 1;
    let members = self.interface_members.entry(decl.name.clone()).or_default();
    for member in &decl.members {
      let mut member = member.clone();
      ids::detach(&mut member);
      members.push(member);
    }
  }
}

/// State of the walk over one compilation unit in one pass.
///
/// Node ids do not survive a print and re-parse, so every pass builds a new
/// context.
pub struct Context<'a> {
  pub options: &'a TransformOptions,
  pub file: FileId,
  inference: &'a dyn TypeInference,
  lib: String,
  visited: AHashSet<NodeId>,
  declared: Vec<AHashSet<String>>,
  implicit: AHashMap<NodeId, Option<Node<TypeExpr>>>,
  frames: Vec<DeclarationFrame>,
  generics: Vec<GenericScope>,
  ids: IdGen,
  mutations: Vec<NodeId>,
}

impl<'a> Context<'a> {
  pub fn new(
    options: &'a TransformOptions,
    file: FileId,
    inference: &'a dyn TypeInference,
    top: &Node<TopLevel>,
  ) -> Context<'a> {
    Context {
      options,
      file,
      inference,
      lib: options.lib_ident(),
      visited: AHashSet::new(),
      declared: vec![AHashSet::new()],
      implicit: AHashMap::new(),
      frames: vec![DeclarationFrame::of(&top.stx.body)],
      generics: Vec::new(),
      ids: IdGen::after(top),
      mutations: Vec::new(),
    }
  }

  /// Identifier the runtime library is bound to.
  pub fn lib(&self) -> &str {
    &self.lib
  }

  pub fn local(&self, name: &str) -> String {
    self.options.local(name)
  }

  pub fn mark_visited(&mut self, id: NodeId) {
    if !id.is_synthetic() {
      self.visited.insert(id);
    }
  }

  /// Synthesized nodes count as visited: they are output, not input.
  pub fn was_visited(&self, id: NodeId) -> bool {
    id.is_synthetic() || self.visited.contains(&id)
  }

  pub fn visited_count(&self) -> usize {
    self.visited.len()
  }

  /// Records that `id` is being handed to a mutator.
  pub fn record_mutation(&mut self, id: NodeId) {
    self.mutations.push(id);
  }

  /// Every node handed to a mutator so far, in order.
  pub fn mutations(&self) -> &[NodeId] {
    &self.mutations
  }

  pub fn push_scope(&mut self) {
    self.declared.push(AHashSet::new());
  }

  pub fn pop_scope(&mut self) {
    if self.declared.len() > 1 {
      self.declared.pop();
    }
  }

  pub fn declare(&mut self, name: impl Into<String>) {
    if let Some(scope) = self.declared.last_mut() {
      scope.insert(name.into());
    }
  }

  /// Whether `name` has been declared before the current point of the walk.
  pub fn was_declared(&self, name: &str) -> bool {
    self.declared.iter().any(|scope| scope.contains(name))
  }

  /// The inferred type of the declaration `node`, asking the front end on first
  /// access.
  pub fn implicit_type(
    &mut self,
    node: NodeId,
    loc: Loc,
    binding: Option<&str>,
  ) -> Result<Node<TypeExpr>, InferenceMiss> {
    let inference = self.inference;
    let file = self.file;
    let cached = self
      .implicit
      .entry(node)
      .or_insert_with(|| inference.infer_type(file, node));
    cached.clone().ok_or_else(|| InferenceMiss {
      loc,
      binding: binding.map(str::to_string),
    })
  }

  /// Numbers a type attached to the tree by the walk and marks it visited.
  pub fn adopt<T: Drive + DriveMut>(&mut self, tree: &mut T) {
    ids::assign_ids(tree, &mut self.ids);
    self.visited.extend(ids::collect_ids(&*tree));
  }

  /// Opens the declaration frame of a nested statement list. The unit's top
  /// level has its frame from the start.
  pub fn push_declarations(&mut self, stmts: &[Node<Stmt>]) {
    self.frames.push(DeclarationFrame::of(stmts));
  }

  pub fn pop_declarations(&mut self) {
    if self.frames.len() > 1 {
      self.frames.pop();
    }
  }

  fn frame(&self) -> &DeclarationFrame {
    &self.frames[self.frames.len() - 1]
  }

  fn frame_mut(&mut self) -> &mut DeclarationFrame {
    let last = self.frames.len() - 1;
    &mut self.frames[last]
  }

  pub fn set_merged(&mut self, symbol: impl Into<String>) {
    self.frame_mut().merged.insert(symbol.into());
  }

  pub fn is_merged(&self, symbol: &str) -> bool {
    self.frame().merged.contains(symbol)
  }

  /// Whether the current statement list declares a class `name`.
  pub fn has_class(&self, name: &str) -> bool {
    self.frame().classes.contains(name)
  }

  pub fn has_interface(&self, name: &str) -> bool {
    self.frame().interfaces.contains_key(name)
  }

  /// Members of the current statement list's interfaces named `name`, in
  /// declaration order.
  pub fn interface_members(&self, name: &str) -> &[Node<TypeMember>] {
    self
      .frame()
      .interface_members
      .get(name)
      .map(Vec::as_slice)
      .unwrap_or(&[])
  }

  /// Adds one interface declaration and returns the accumulated declarations
  /// once the last one of the current statement list has been added.
  pub fn accumulate_interface(&mut self, decl: &InterfaceDecl) -> Option<PendingInterface> {
    let frame = self.frame_mut();
    let total = frame.interfaces.get(&decl.name).copied().unwrap_or(1);
    let pending = frame
      .pending
      .entry(decl.name.clone())
      .or_insert_with(|| PendingInterface {
        remaining: total,
        ..PendingInterface::default()
      });
    pending.export |= decl.export;
    if pending.type_parameters.is_none() {
      pending.type_parameters = decl.type_parameters.clone();
    }
    for ty in &decl.extends {
      let mut ty = ty.clone();
      ids::detach(&mut ty);
      pending.extends.push(ty);
    }
    for member in &decl.members {
      let mut member = member.clone();
      ids::detach(&mut member);
      pending.members.push(member);
    }
    pending.remaining = pending.remaining.saturating_sub(1);
    if pending.remaining == 0 {
      frame.pending.remove(&decl.name)
    } else {
      None
    }
  }

  pub fn push_generics(&mut self, names: Vec<String>, access: TypeParamAccess) {
    self.generics.push(GenericScope { names, access });
  }

  pub fn pop_generics(&mut self) {
    self.generics.pop();
  }

  /// How the innermost type parameter called `name` is reached, if any.
  pub fn type_param_access(&self, name: &str) -> Option<&TypeParamAccess> {
    self
      .generics
      .iter()
      .rev()
      .find(|scope| scope.names.iter().any(|n| n == name))
      .map(|scope| &scope.access)
  }
}

#[cfg(test)]
mod tests {
  use super::Context;
  use super::TypeParamAccess;
  use crate::ast::node::Node;
  use crate::ast::node::NodeId;
  use crate::ast::stx::TopLevel;
  use crate::ast::type_expr::TypeExpr;
  use crate::ast::type_expr::TypeNumber;
  use crate::diagnostics::FileId;
  use crate::frontend::TypeInference;
  use crate::loc::Loc;
  use crate::options::TransformOptions;
  use std::cell::Cell;

  struct Counting {
    calls: Cell<usize>,
  }

  impl TypeInference for Counting {
    fn infer_type(&self, _file: FileId, node: NodeId) -> Option<Node<TypeExpr>> {
      self.calls.set(self.calls.get() + 1);
      (node == NodeId(1)).then(|| {
        Node::new(
          Loc::default(),
          TypeExpr::Number(Node::new(Loc::default(), TypeNumber {})),
        )
      })
    }
  }

  fn empty_top() -> Node<TopLevel> {
    Node::new(Loc::default(), TopLevel { body: vec![] })
  }

  #[test]
  fn implicit_types_are_cached() {
    let options = TransformOptions::default();
    let inference = Counting { calls: Cell::new(0) };
    let top = empty_top();
    let mut ctx = Context::new(&options, FileId(0), &inference, &top);
    assert!(ctx.implicit_type(NodeId(1), Loc(0, 1), Some("a")).is_ok());
    assert!(ctx.implicit_type(NodeId(1), Loc(0, 1), Some("a")).is_ok());
    let miss = ctx.implicit_type(NodeId(2), Loc(4, 5), Some("b")).unwrap_err();
    assert!(ctx.implicit_type(NodeId(2), Loc(4, 5), Some("b")).is_err());
    assert_eq!(miss.binding.as_deref(), Some("b"));
    assert_eq!(inference.calls.get(), 2);
  }

  #[test]
  fn declarations_follow_scopes() {
    let options = TransformOptions::default();
    let top = empty_top();
    let mut ctx = Context::new(&options, FileId(0), &crate::frontend::NoInference, &top);
    ctx.declare("A");
    ctx.push_scope();
    ctx.declare("B");
    assert!(ctx.was_declared("A"));
    assert!(ctx.was_declared("B"));
    ctx.pop_scope();
    assert!(!ctx.was_declared("B"));
    ctx.pop_scope();
    assert!(ctx.was_declared("A"));
  }

  #[test]
  fn synthetic_nodes_count_as_visited() {
    let options = TransformOptions::default();
    let top = empty_top();
    let mut ctx = Context::new(&options, FileId(0), &crate::frontend::NoInference, &top);
    assert!(ctx.was_visited(NodeId::SYNTHETIC));
    assert!(!ctx.was_visited(NodeId(4)));
    ctx.mark_visited(NodeId(4));
    ctx.mark_visited(NodeId::SYNTHETIC);
    assert!(ctx.was_visited(NodeId(4)));
    assert_eq!(ctx.visited_count(), 1);
  }

  #[test]
  fn innermost_type_parameter_wins() {
    let options = TransformOptions::default();
    let top = empty_top();
    let mut ctx = Context::new(&options, FileId(0), &crate::frontend::NoInference, &top);
    ctx.push_generics(vec!["T".into()], TypeParamAccess::Instance { class: "C".into() });
    ctx.push_generics(vec!["T".into()], TypeParamAccess::Local);
    assert_eq!(ctx.type_param_access("T"), Some(&TypeParamAccess::Local));
    ctx.pop_generics();
    assert_eq!(
      ctx.type_param_access("T"),
      Some(&TypeParamAccess::Instance { class: "C".into() })
    );
    assert_eq!(ctx.type_param_access("U"), None);
  }
}
