//! knc - declaration diagnostics checker for Kotlin/Native sources
//!
//! This library parses the declaration structure of Kotlin source files,
//! resolves declarations into a symbol graph, and runs declaration-level
//! semantic checks over it, reporting misuse of singleton/enum semantics
//! and the `@ThreadLocal` thread-confinement annotation.
//!
//! ## Architecture
//!
//! The pipeline is organized into:
//! - **Syntax** (`syntax/`): lexing and declaration parsing
//! - **Resolve** (`resolve/`): descriptor construction and name interning
//! - **Check** (`check/`): checker framework, diagnostic sink, and the
//!   built-in checkers
//! - **Driver** (`driver/`): pipeline orchestration
//! - **Common** (`common/`): shared infrastructure (errors, spans)

pub mod check;
pub mod common;
pub mod driver;
pub mod resolve;
pub mod syntax;
pub mod testdata;

// Re-exports for convenience
pub use check::{
    CheckerRegistry, DeclarationChecker, Diagnostic, DiagnosticCode, DiagnosticSink,
    SingletonAnnotationChecker,
};
pub use common::{CompileError, CompileResult, DiagnosticReporter, Span};
pub use driver::{AnalysisConfig, AnalysisResult, Pipeline};
