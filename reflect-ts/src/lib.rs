//! Rewrites typed TypeScript syntax trees so that the types they declare are
//! checked at run time.
//!
//! Each declared type gets a reflection, an expression built from calls into a
//! run-time library. Functions assert their parameters and return values
//! against those reflections. The compiler front end that parses, infers,
//! prints and emits is supplied by the host through [`frontend::FrontEnd`].

pub mod ast;
pub mod build;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod frontend;
pub mod ids;
pub mod loc;
pub mod mutate;
pub mod options;
pub mod pass;
pub mod pipeline;
pub mod reflect;
pub mod report;

pub use error::TransformError;
pub use options::TransformOptions;
pub use pipeline::transform;
pub use pipeline::TransformOutcome;
