//! Checks enum and singleton declarations for thread-confinement misuse

use super::sink::DiagnosticCode;
use super::{CheckContext, DeclarationChecker};
use crate::resolve::Descriptor;
use crate::syntax::ast::{DeclKind, Declaration};

/// Fully-qualified name of the thread-confinement annotation
pub const THREAD_LOCAL_FQ_NAME: &str = "kotlin.native.concurrent.ThreadLocal";

/// Reports `@ThreadLocal` on enum classes (where it has no effect) and
/// mutable state inside singleton declarations.
pub struct SingletonAnnotationChecker;

impl DeclarationChecker for SingletonAnnotationChecker {
    fn name(&self) -> &'static str {
        "singleton-annotation"
    }

    fn check(&self, declaration: &Declaration, descriptor: Descriptor, ctx: &mut CheckContext<'_>) {
        // @ThreadLocal on enum has no effect.
        if let Descriptor::Class(id) = descriptor {
            let class = ctx.unit.class(id);
            if class.kind.is_enum_class() {
                if let Some(annotation) =
                    class.annotations.find_named(&ctx.unit.names, THREAD_LOCAL_FQ_NAME)
                {
                    let location = annotation.span.unwrap_or(declaration.span);
                    ctx.sink
                        .report(DiagnosticCode::EnumThreadLocalInapplicable, location);
                }
            }
        }

        // Check variables inside singletons.
        let Descriptor::Property(id) = descriptor else {
            return;
        };
        let property = ctx.unit.property(id);
        let Some(parent) = property.containing.map(|parent| ctx.unit.class(parent)) else {
            return;
        };

        if property.is_var && parent.kind.is_enum_class() {
            ctx.sink
                .report(DiagnosticCode::VariableInEnum, declaration.span);
        } else if parent.kind.is_singleton()
            && parent
                .annotations
                .find_named(&ctx.unit.names, THREAD_LOCAL_FQ_NAME)
                .is_none()
        {
            // A plain stored property: declared as a property (not a
            // constructor parameter) and not delegate-backed
            let plain_stored = matches!(
                &declaration.kind,
                DeclKind::Property(property) if property.delegate.is_none()
            );
            if property.is_var
                && plain_stored
                && property.has_backing_field
                && property.setter.is_some_and(|setter| setter.is_default)
            {
                ctx.sink.report(
                    DiagnosticCode::VariableInTopLevelSingletonWithoutThreadLocal,
                    declaration.span,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{CheckerRegistry, Diagnostic, DiagnosticSink};
    use crate::resolve::Resolver;
    use crate::syntax::Parser;

    const PREAMBLE: &str = "import kotlin.native.concurrent.ThreadLocal\n";

    fn check(body: &str) -> (String, Vec<Diagnostic>) {
        let source = format!("{}{}", PREAMBLE, body);
        let mut parser = Parser::new(&source);
        let file = parser.parse_file().unwrap();
        let unit = Resolver::resolve(&file);
        let mut sink = DiagnosticSink::new();
        CheckerRegistry::with_default_checkers().run(&file, &unit, &mut sink);
        (source, sink.into_diagnostics())
    }

    fn codes(diagnostics: &[Diagnostic]) -> Vec<DiagnosticCode> {
        diagnostics.iter().map(|diagnostic| diagnostic.code).collect()
    }

    #[test]
    fn test_thread_local_on_enum_reported_at_annotation() {
        let (source, diagnostics) = check("@ThreadLocal enum class E2 { A }");

        assert_eq!(
            codes(&diagnostics),
            vec![DiagnosticCode::EnumThreadLocalInapplicable]
        );
        let span = diagnostics[0].span;
        assert_eq!(&source[span.start..span.end], "@ThreadLocal");
    }

    #[test]
    fn test_plain_enum_is_silent() {
        let (_, diagnostics) = check("enum class E { A }");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_thread_local_on_object_is_not_rule_a() {
        let (_, diagnostics) = check("@ThreadLocal object O");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_var_in_enum_class() {
        let (source, diagnostics) = check("enum class E { A; var counter = 0 }");

        assert_eq!(codes(&diagnostics), vec![DiagnosticCode::VariableInEnum]);
        let span = diagnostics[0].span;
        assert_eq!(&source[span.start..span.end], "var counter = 0");
    }

    #[test]
    fn test_val_in_enum_class_is_silent() {
        let (_, diagnostics) = check("enum class E { A; val tag = 0 }");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_enum_var_never_also_reports_singleton_rule() {
        // Mutual exclusivity: the enum-var arm wins and the singleton arm is
        // not evaluated for the same property
        let (_, diagnostics) = check("enum class E { A; var counter = 0 }");

        assert_eq!(diagnostics.len(), 1);
        assert!(!codes(&diagnostics)
            .contains(&DiagnosticCode::VariableInTopLevelSingletonWithoutThreadLocal));
    }

    #[test]
    fn test_var_in_object() {
        let (source, diagnostics) = check("object O { var x = 1 }");

        assert_eq!(
            codes(&diagnostics),
            vec![DiagnosticCode::VariableInTopLevelSingletonWithoutThreadLocal]
        );
        let span = diagnostics[0].span;
        assert_eq!(&source[span.start..span.end], "var x = 1");
    }

    #[test]
    fn test_var_in_thread_local_object_is_silent() {
        let (_, diagnostics) = check("@ThreadLocal object O { var x = 1 }");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_val_in_object_is_silent() {
        let (_, diagnostics) = check("object O { val x = 1 }");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_delegated_var_in_object_is_silent() {
        let (_, diagnostics) = check("object O { var x by Delegate() }");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_custom_setter_var_in_object_is_silent() {
        let (_, diagnostics) =
            check("object O { var x = 1\n        set(value) { field = value } }");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_bare_private_set_is_not_default() {
        // `private set` is user-declared even without a body
        let (_, diagnostics) = check("object O { var x = 1\n        private set }");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_computed_var_in_object_is_silent() {
        let (_, diagnostics) = check(
            "object O { var x get() = backing.x\n        set(value) { backing.x = value } }",
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_var_in_companion_object() {
        let (_, diagnostics) = check("class Holder { companion object { var count = 0 } }");

        assert_eq!(
            codes(&diagnostics),
            vec![DiagnosticCode::VariableInTopLevelSingletonWithoutThreadLocal]
        );
    }

    #[test]
    fn test_var_in_enum_entry_body() {
        // Enum entries are singleton kinds; a var inside an entry body hits
        // the singleton rule, not the enum-var rule
        let (_, diagnostics) = check("enum class E { A { var state = 0 } }");

        assert_eq!(
            codes(&diagnostics),
            vec![DiagnosticCode::VariableInTopLevelSingletonWithoutThreadLocal]
        );
    }

    #[test]
    fn test_var_in_plain_class_is_silent() {
        let (_, diagnostics) = check("class C { var x = 1 }");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_top_level_var_is_silent() {
        // No containing class-like declaration, so rule B does not apply
        let (_, diagnostics) = check("var global = 1");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_constructor_var_parameter_in_enum() {
        // A var constructor parameter is a property, so the enum-var arm
        // fires; the singleton arm never can, since the parameter is not a
        // plain stored property declaration
        let (_, diagnostics) = check("enum class E(var weight: Int) { A(1) }");

        assert_eq!(codes(&diagnostics), vec![DiagnosticCode::VariableInEnum]);
    }

    #[test]
    fn test_function_declarations_are_ignored() {
        let (_, diagnostics) = check("object O { fun touch() { counter = counter + 1 } }");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_multiple_vars_report_in_order() {
        let (_, diagnostics) = check("object O { var a = 1\n    var b = 2 }");

        assert_eq!(
            codes(&diagnostics),
            vec![
                DiagnosticCode::VariableInTopLevelSingletonWithoutThreadLocal,
                DiagnosticCode::VariableInTopLevelSingletonWithoutThreadLocal,
            ]
        );
    }

    #[test]
    fn test_checker_is_stateless_and_deterministic() {
        let source = format!("{}object O {{ var x = 1 }}", PREAMBLE);
        let mut parser = Parser::new(&source);
        let file = parser.parse_file().unwrap();
        let unit = Resolver::resolve(&file);
        let registry = CheckerRegistry::with_default_checkers();

        let mut sink = DiagnosticSink::new();
        registry.run(&file, &unit, &mut sink);
        registry.run(&file, &unit, &mut sink);

        let diagnostics = sink.into_diagnostics();
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0], diagnostics[1]);
    }

    #[test]
    fn test_unimported_thread_local_does_not_suppress() {
        // Without the import the simple name does not resolve to the
        // fully-qualified annotation, so the singleton rule still fires
        let source = "@ThreadLocal object O { var x = 1 }";
        let mut parser = Parser::new(source);
        let file = parser.parse_file().unwrap();
        let unit = Resolver::resolve(&file);
        let mut sink = DiagnosticSink::new();
        CheckerRegistry::with_default_checkers().run(&file, &unit, &mut sink);

        assert_eq!(
            codes(sink.diagnostics()),
            vec![DiagnosticCode::VariableInTopLevelSingletonWithoutThreadLocal]
        );
    }
}
