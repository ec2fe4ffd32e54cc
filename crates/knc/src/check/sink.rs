//! Diagnostic codes and the append-only sink

use crate::common::Span;
use codespan_reporting::diagnostic::{Diagnostic as RenderedDiagnostic, Label, Severity};

/// Diagnostic codes reported by the declaration checkers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticCode {
    /// `@ThreadLocal` on an enum class has no effect
    EnumThreadLocalInapplicable,
    /// Mutable property declared in an enum class
    VariableInEnum,
    /// Mutable stored property in a singleton without `@ThreadLocal`
    VariableInTopLevelSingletonWithoutThreadLocal,
}

impl DiagnosticCode {
    pub fn name(self) -> &'static str {
        match self {
            Self::EnumThreadLocalInapplicable => "ENUM_THREAD_LOCAL_INAPPLICABLE",
            Self::VariableInEnum => "VARIABLE_IN_ENUM",
            Self::VariableInTopLevelSingletonWithoutThreadLocal => {
                "VARIABLE_IN_TOP_LEVEL_SINGLETON_WITHOUT_THREAD_LOCAL"
            }
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::EnumThreadLocalInapplicable => {
                "@ThreadLocal annotation is not applicable to enum classes"
            }
            Self::VariableInEnum => "variable in enum class is not supported",
            Self::VariableInTopLevelSingletonWithoutThreadLocal => {
                "variable in singleton without @ThreadLocal can't be changed after initialization"
            }
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            Self::EnumThreadLocalInapplicable
            | Self::VariableInEnum
            | Self::VariableInTopLevelSingletonWithoutThreadLocal => Severity::Error,
        }
    }
}

/// One reported diagnostic, anchored to a source span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub span: Span,
}

impl Diagnostic {
    /// Render for terminal output
    pub fn render(&self, file_id: usize) -> RenderedDiagnostic<usize> {
        RenderedDiagnostic::new(self.code.severity())
            .with_code(self.code.name())
            .with_message(self.code.message())
            .with_labels(vec![Label::primary(file_id, self.span.start..self.span.end)])
    }
}

/// Append-only diagnostic collector shared across all declaration checks of
/// a traversal. Order reflects traversal order; no deduplication.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, code: DiagnosticCode, span: Span) {
        self.diagnostics.push(Diagnostic { code, span });
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
