//! Declaration AST

mod decl;

pub use decl::*;
