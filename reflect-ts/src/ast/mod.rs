pub mod class;
pub mod expr;
pub mod func;
pub mod node;
pub mod operator;
pub mod pat;
pub mod render;
pub mod stmt;
pub mod stx;
pub mod ts_stmt;
pub mod type_expr;
