//! Declaration checking framework
//!
//! Checkers run once per declaration during a pre-order walk over a
//! compilation unit, after resolution. They read the resolved graph, never
//! mutate it, and append diagnostics to a shared sink.

mod singleton;
mod sink;

pub use singleton::{SingletonAnnotationChecker, THREAD_LOCAL_FQ_NAME};
pub use sink::{Diagnostic, DiagnosticCode, DiagnosticSink};

use crate::resolve::{Descriptor, ResolvedUnit};
use crate::syntax::ast::{Declaration, SourceFile};

/// Context handed to checkers for one declaration
pub struct CheckContext<'a> {
    pub unit: &'a ResolvedUnit,
    pub sink: &'a mut DiagnosticSink,
}

/// A single declaration-level semantic check
///
/// `check` is a pure inspection with diagnostic emission as its only side
/// effect; absence of a matching condition is a silent no-op, and a checker
/// cannot fail.
pub trait DeclarationChecker {
    /// Stable name for logging and registry listings
    fn name(&self) -> &'static str;

    fn check(&self, declaration: &Declaration, descriptor: Descriptor, ctx: &mut CheckContext<'_>);
}

/// Registry of declaration checkers, applied in registration order
pub struct CheckerRegistry {
    checkers: Vec<Box<dyn DeclarationChecker>>,
}

impl CheckerRegistry {
    pub fn new() -> Self {
        Self {
            checkers: Vec::new(),
        }
    }

    /// Registry with the built-in checkers installed
    pub fn with_default_checkers() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(SingletonAnnotationChecker));
        registry
    }

    pub fn register(&mut self, checker: Box<dyn DeclarationChecker>) {
        self.checkers.push(checker);
    }

    pub fn list(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.checkers.iter().map(|checker| checker.name())
    }

    /// Walk all declarations pre-order and run every checker on each
    pub fn run(&self, file: &SourceFile, unit: &ResolvedUnit, sink: &mut DiagnosticSink) {
        for declaration in &file.declarations {
            self.visit(declaration, unit, sink);
        }
    }

    fn visit(&self, declaration: &Declaration, unit: &ResolvedUnit, sink: &mut DiagnosticSink) {
        if let Some(descriptor) = unit.descriptor_for(declaration.id) {
            let mut ctx = CheckContext {
                unit,
                sink: &mut *sink,
            };
            for checker in &self.checkers {
                checker.check(declaration, descriptor, &mut ctx);
            }
        }
        for member in declaration.members() {
            self.visit(member, unit, sink);
        }
    }
}

impl Default for CheckerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
