//! # minipy
//!
//! minipy is a tree-walking interpreter for a small, indentation-based
//! Python-like language. Source text flows through a fixed pipeline: an
//! indentation normalizer rewrites indented blocks as braced blocks, a
//! PEG-generated parser builds a syntax tree from the result, and a
//! recursive evaluator walks the tree, producing output through `print`.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use std::io::Write;

/// Defines the structure of parsed code.
///
/// This module declares the generic `Node` tree that represents the
/// syntactic structure of source code. Nodes are tagged with the grammar
/// rule that produced them; the evaluator dispatches on that tag alone.
///
/// # Responsibilities
/// - Defines the node type shared by the parser and the evaluator.
/// - Folds pass-through nodes after parsing.
/// - Renders trees for trace output.
pub mod ast;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised while normalizing,
/// parsing, or evaluating code. It standardizes error reporting and
/// carries source positions for debugging and user feedback.
///
/// # Responsibilities
/// - Defines error enums for all failure modes.
/// - Attaches line numbers and detailed messages for context.
/// - Supports integration with standard error handling traits.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together the indentation normalizer, the parser, the
/// value model, the environment chain, and the evaluator to provide a
/// complete runtime for source code execution.
///
/// # Responsibilities
/// - Coordinates all core components of the pipeline.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;

use crate::interpreter::{evaluator::core::Evaluator, indent, parser};

/// Runs a program, writing its output to `out`.
///
/// The source is normalized, parsed and evaluated in order; the first
/// stage to fail ends the run. `out` receives only program output (what
/// `print` produces); diagnostics are the caller's concern.
///
/// # Errors
/// Returns the indentation, parse, or runtime error that stopped
/// execution.
///
/// # Examples
/// ```
/// let mut out = Vec::new();
/// minipy::run("x = 1\ny = 2\nprint(x + y)", &mut out).unwrap();
/// assert_eq!(out, b"3\n");
///
/// // An unbound name is a runtime error.
/// let mut out = Vec::new();
/// assert!(minipy::run("print(y)", &mut out).is_err());
/// ```
pub fn run(source: &str, out: &mut dyn Write) -> Result<(), Box<dyn std::error::Error>> {
    let normalized = indent::normalize(source)?;
    tracing::trace!(normalized = %normalized, "normalized source");
    let program = parser::parse(&normalized)?;
    let mut evaluator = Evaluator::new(out);
    evaluator.run(&program)?;
    Ok(())
}
