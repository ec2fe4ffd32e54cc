//! Syntax layer: lexing, declaration AST, and parsing
//!
//! The parser covers the declaration subset the checkers inspect: package
//! header, imports, annotations, class-like declarations (classes,
//! interfaces, objects, companion objects, enum classes with entries),
//! properties with accessors and delegates, constructor `val`/`var`
//! parameters, and functions. Expression and function bodies are consumed
//! as opaque, balanced stubs; checking never looks inside them.

pub mod ast;
pub mod lexer;
pub mod parser;

pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;
