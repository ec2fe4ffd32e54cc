//! Analysis pipeline orchestration

use crate::check::{CheckerRegistry, Diagnostic, DiagnosticSink};
use crate::common::CompileResult;
use crate::resolve::{ResolvedUnit, Resolver};
use crate::syntax::ast::SourceFile;
use crate::syntax::{Lexer, Parser};

/// Options passed through the pipeline
#[derive(Debug, Clone, Default)]
pub struct AnalysisConfig {
    pub dump_tokens: bool,
    pub dump_ast: bool,
    pub dump_descriptors: bool,
    pub verbose: bool,
}

/// Everything one analysis run produced
pub struct AnalysisResult {
    pub file: SourceFile,
    pub unit: ResolvedUnit,
    pub diagnostics: Vec<Diagnostic>,
}

/// Pipeline coordinating lexing, parsing, resolution, and checking
pub struct Pipeline {
    registry: CheckerRegistry,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            registry: CheckerRegistry::with_default_checkers(),
        }
    }

    pub fn with_registry(registry: CheckerRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &CheckerRegistry {
        &self.registry
    }

    /// Analyze one source text: parse, resolve, run all checkers
    pub fn analyze(&self, source: &str, config: &AnalysisConfig) -> CompileResult<AnalysisResult> {
        if config.dump_tokens {
            let tokens = Lexer::new(source).tokenize_all()?;
            eprintln!("=== Tokens ===");
            for token in &tokens {
                eprintln!("{:?}", token);
            }
            eprintln!("=== End Tokens ===\n");
        }

        if config.verbose {
            eprintln!("Parsing...");
        }
        let mut parser = Parser::new(source);
        let file = parser.parse_file()?;

        if config.dump_ast {
            eprintln!("=== AST ===");
            eprintln!("{:#?}", file);
            eprintln!("=== End AST ===\n");
        }

        if config.verbose {
            eprintln!("Resolving declarations...");
        }
        let unit = Resolver::resolve(&file);

        if config.dump_descriptors {
            eprintln!("=== Descriptors ===");
            eprintln!("{:#?}", unit);
            eprintln!("=== End Descriptors ===\n");
        }

        if config.verbose {
            eprintln!("Checking declarations...");
        }
        let mut sink = DiagnosticSink::new();
        self.registry.run(&file, &unit, &mut sink);

        Ok(AnalysisResult {
            file,
            unit,
            diagnostics: sink.into_diagnostics(),
        })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdata::parse_expectations;
    use pretty_assertions::assert_eq;

    /// Run the pipeline over marked-up source and compare emitted
    /// diagnostics against the embedded expectations
    fn assert_diagnostics(marked: &str) {
        let (clean, expected) = parse_expectations(marked);
        let result = Pipeline::new()
            .analyze(&clean, &AnalysisConfig::default())
            .unwrap();

        let expected: Vec<(String, (usize, usize))> = expected
            .iter()
            .map(|expectation| {
                (
                    expectation.code.clone(),
                    (expectation.span.start, expectation.span.end),
                )
            })
            .collect();
        let actual: Vec<(String, (usize, usize))> = result
            .diagnostics
            .iter()
            .map(|diagnostic| {
                (
                    diagnostic.code.name().to_string(),
                    (diagnostic.span.start, diagnostic.span.end),
                )
            })
            .collect();
        assert_eq!(expected, actual);
    }

    #[test]
    fn test_enum_thread_local_scenario() {
        assert_diagnostics(
            "import kotlin.native.concurrent.ThreadLocal\n\
             enum class E { A }\n\
             <!ENUM_THREAD_LOCAL_INAPPLICABLE!>@ThreadLocal<!> enum class E2 { A }\n",
        );
    }

    #[test]
    fn test_object_var_scenario() {
        assert_diagnostics(
            "object O { <!VARIABLE_IN_TOP_LEVEL_SINGLETON_WITHOUT_THREAD_LOCAL!>var x = 1<!> }\n",
        );
    }

    #[test]
    fn test_thread_local_object_scenario() {
        assert_diagnostics(
            "import kotlin.native.concurrent.ThreadLocal\n\
             @ThreadLocal object O { var x = 1 }\n",
        );
    }

    #[test]
    fn test_delegated_property_scenario() {
        assert_diagnostics("object O { var x by Delegate() }\n");
    }

    #[test]
    fn test_enum_var_scenario() {
        assert_diagnostics(
            "enum class Mode { FAST, SLOW; <!VARIABLE_IN_ENUM!>var selected = false<!> }\n",
        );
    }

    #[test]
    fn test_mixed_file_reports_in_traversal_order() {
        assert_diagnostics(
            "import kotlin.native.concurrent.ThreadLocal\n\
             <!ENUM_THREAD_LOCAL_INAPPLICABLE!>@ThreadLocal<!> enum class E { A }\n\
             object First { <!VARIABLE_IN_TOP_LEVEL_SINGLETON_WITHOUT_THREAD_LOCAL!>var a = 1<!> }\n\
             @ThreadLocal object Second { var b = 2 }\n\
             class Plain { var c = 3 }\n",
        );
    }

    #[test]
    fn test_parse_error_propagates() {
        let result = Pipeline::new().analyze("object { = }", &AnalysisConfig::default());
        assert!(result.is_err());
    }
}
