//! The two rewrites of a compilation unit. Pass 1 writes inferred types into
//! the tree so that pass 2, run on the re-parsed output, only has to mutate.

pub mod implicit;
pub mod mutation;
