//! knc - declaration diagnostics checker for Kotlin/Native sources
//!
//! Usage: knc [OPTIONS] <input>...

use anyhow::Context;
use clap::Parser as ClapParser;
use kn_checker::common::DiagnosticReporter;
use kn_checker::driver::{AnalysisConfig, Pipeline};
use std::fs;
use std::path::PathBuf;
use std::process;

#[derive(ClapParser, Debug)]
#[command(name = "knc")]
#[command(author = "KNC Team")]
#[command(version = "0.1.0")]
#[command(about = "Declaration diagnostics checker for Kotlin/Native sources", long_about = None)]
struct Args {
    /// Input source files (.kt)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Dump tokens (for debugging)
    #[arg(long)]
    dump_tokens: bool,

    /// Dump AST (for debugging)
    #[arg(long)]
    dump_ast: bool,

    /// Dump resolved descriptors (for debugging)
    #[arg(long)]
    dump_descriptors: bool,
}

fn main() {
    let args = Args::parse();

    match run(&args) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("error: {:#}", e);
            process::exit(1);
        }
    }
}

/// Check every input; returns whether all files came back clean
fn run(args: &Args) -> anyhow::Result<bool> {
    let pipeline = Pipeline::new();
    let config = AnalysisConfig {
        dump_tokens: args.dump_tokens,
        dump_ast: args.dump_ast,
        dump_descriptors: args.dump_descriptors,
        verbose: args.verbose,
    };

    let mut clean = true;
    for input in &args.inputs {
        let source = fs::read_to_string(input)
            .with_context(|| format!("cannot read {}", input.display()))?;
        let filename = input.display().to_string();

        let mut reporter = DiagnosticReporter::new();
        let file_id = reporter.add_file(&filename, &source);

        if args.verbose {
            eprintln!("Checking {}", filename);
        }

        match pipeline.analyze(&source, &config) {
            Ok(result) => {
                for diagnostic in &result.diagnostics {
                    reporter.emit(&diagnostic.render(file_id));
                }
                if args.verbose {
                    eprintln!("{}: {} diagnostic(s)", filename, result.diagnostics.len());
                }
                if !result.diagnostics.is_empty() {
                    clean = false;
                }
            }
            Err(error) => {
                reporter.report_error(file_id, &error);
                clean = false;
            }
        }
    }

    Ok(clean)
}
