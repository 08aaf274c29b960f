use super::node::Node;
use super::stmt::Stmt;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Deserialize;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TopLevel {
  pub body: Vec<Node<Stmt>>,
}
