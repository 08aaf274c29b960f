use crate::ast::node::NodeId;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use derive_visitor::Visitor;
use derive_visitor::VisitorMut;

/// Hands out node ids in increasing order.
#[derive(Clone, Debug)]
pub struct IdGen {
  next: u32,
}

impl IdGen {
  /// Starts at 1, as 0 is [`NodeId::SYNTHETIC`].
  pub fn new() -> IdGen {
    IdGen { next: 1 }
  }

  /// Starts after the largest id already used by `tree`.
  pub fn after<T: Drive>(tree: &T) -> IdGen {
    IdGen {
      next: max_id(tree).0 + 1,
    }
  }

  pub fn fresh(&mut self) -> NodeId {
    let id = NodeId(self.next);
    self.next += 1;
    id
  }
}

impl Default for IdGen {
  fn default() -> Self {
    IdGen::new()
  }
}

#[derive(VisitorMut)]
#[visitor(NodeId(enter))]
struct Assign<'a> {
  gen: &'a mut IdGen,
}

impl Assign<'_> {
  fn enter_node_id(&mut self, id: &mut NodeId) {
    *id = self.gen.fresh();
  }
}

/// Gives every node in `tree` a fresh id.
pub fn assign_ids<T: DriveMut>(tree: &mut T, gen: &mut IdGen) {
  tree.drive_mut(&mut Assign { gen });
}

#[derive(VisitorMut)]
#[visitor(NodeId(enter))]
struct Detach;

impl Detach {
  fn enter_node_id(&mut self, id: &mut NodeId) {
    *id = NodeId::SYNTHETIC;
  }
}

/// Marks every node in `tree` as synthesized, e.g. after cloning syntax into a
/// reflection so the clone is not mistaken for the original.
pub fn detach<T: DriveMut>(tree: &mut T) {
  tree.drive_mut(&mut Detach);
}

#[derive(Default, Visitor)]
#[visitor(NodeId(enter))]
struct Collect {
  ids: Vec<NodeId>,
  synthetic: usize,
}

impl Collect {
  fn enter_node_id(&mut self, id: &NodeId) {
    if id.is_synthetic() {
      self.synthetic += 1;
    } else {
      self.ids.push(*id);
    }
  }
}

/// Ids of all non-synthetic nodes in `tree`, in traversal order.
pub fn collect_ids<T: Drive>(tree: &T) -> Vec<NodeId> {
  let mut collect = Collect::default();
  tree.drive(&mut collect);
  collect.ids
}

/// Number of nodes in `tree`, synthetic ones included.
pub fn count_nodes<T: Drive>(tree: &T) -> usize {
  let mut collect = Collect::default();
  tree.drive(&mut collect);
  collect.ids.len() + collect.synthetic
}

pub fn max_id<T: Drive>(tree: &T) -> NodeId {
  collect_ids(tree)
    .into_iter()
    .max_by_key(|id| id.0)
    .unwrap_or(NodeId::SYNTHETIC)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ast::expr::Expr;
  use crate::ast::node::Node;
  use crate::build;
  use crate::loc::Loc;

  fn sample() -> Node<Expr> {
    let loc = Loc(0, 0);
    build::method_call(loc, build::id(loc, "_t"), "number", vec![build::number(loc, 1.0)])
  }

  #[test]
  fn assigns_and_detaches() {
    let mut expr = sample();
    let total = count_nodes(&expr);
    assert!(collect_ids(&expr).is_empty());

    let mut gen = IdGen::new();
    assign_ids(&mut expr, &mut gen);
    let ids = collect_ids(&expr);
    assert_eq!(ids.len(), total);
    assert_eq!(max_id(&expr), NodeId(total as u32));
    assert_eq!(IdGen::after(&expr).fresh(), NodeId(total as u32 + 1));

    detach(&mut expr);
    assert!(collect_ids(&expr).is_empty());
    assert_eq!(count_nodes(&expr), total);
  }
}
