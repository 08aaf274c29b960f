use crate::loc::Loc;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use std::fmt;
use std::fmt::Debug;
use std::fmt::Formatter;

/// Identity of a node within one parse of a compilation unit.
///
/// Front ends number every node they produce starting from 1. Nodes created by
/// the transformation carry [`NodeId::SYNTHETIC`] and are never registered as
/// visited; ids are not preserved across a print and re-parse.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug, Drive, DriveMut)]
pub struct NodeId(#[drive(skip)] pub u32);

impl NodeId {
  pub const SYNTHETIC: NodeId = NodeId(0);

  pub fn is_synthetic(self) -> bool {
    self == NodeId::SYNTHETIC
  }
}

#[derive(Clone, Drive, DriveMut)]
pub struct Node<S: Drive + DriveMut> {
  // Synthesized nodes borrow the location of what they were derived from.
  #[drive(skip)]
  pub loc: Loc,
  pub id: NodeId,
  pub stx: Box<S>,
}

impl<S: Drive + DriveMut> Node<S> {
  pub fn new(loc: Loc, stx: S) -> Node<S> {
    Node {
      loc,
      id: NodeId::SYNTHETIC,
      stx: Box::new(stx),
    }
  }

  /// Maps the syntax, keeping the location and identity.
  pub fn map_stx<T: Drive + DriveMut, F: FnOnce(S) -> T>(self, f: F) -> Node<T> {
    Node {
      loc: self.loc,
      id: self.id,
      stx: Box::new(f(*self.stx)),
    }
  }
}

// Structural equality: locations and identities are ignored.
impl<S: PartialEq + Drive + DriveMut> PartialEq for Node<S> {
  fn eq(&self, other: &Self) -> bool {
    self.stx == other.stx
  }
}

impl<S: Debug + Drive + DriveMut> Debug for Node<S> {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    self.stx.fmt(f)
  }
}

impl<S: Serialize + Drive + DriveMut> Serialize for Node<S> {
  fn serialize<Se: Serializer>(&self, serializer: Se) -> Result<Se::Ok, Se::Error> {
    self.stx.serialize(serializer)
  }
}

impl<'de, S: Deserialize<'de> + Drive + DriveMut> Deserialize<'de> for Node<S> {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    S::deserialize(deserializer).map(|stx| Node::new(Loc::default(), stx))
  }
}
