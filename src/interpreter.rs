/// Lexically nested name-to-value bindings.
///
/// An environment maps identifiers to values and optionally points at the
/// enclosing environment. Lookup walks the chain outwards; assignment
/// always binds in the innermost scope.
///
/// # Responsibilities
/// - Stores variable and function bindings per scope.
/// - Resolves reads through the chain of enclosing scopes.
/// - Records binding reads and writes as trace events.
pub mod environment;
/// The evaluator executes syntax tree nodes and computes results.
///
/// The evaluator walks the tree produced by the parser, dispatching on the
/// grammar rule of each node. It implements expressions, statements,
/// control flow, function declaration and call, list operations, and the
/// built-in functions.
///
/// # Responsibilities
/// - Evaluates tree nodes, performing all supported operations.
/// - Manages the environment chain and closure capture.
/// - Reports runtime errors such as unknown names or division by zero.
pub mod evaluator;
/// The indentation normalizer rewrites indented blocks as braced blocks.
///
/// Indentation-significant source cannot be described context-freely, so
/// this first stage replaces every indented block with a `{`/`}` pair that
/// the grammar recognizes. It is a single left-to-right pass that never
/// changes anything within a logical line.
///
/// # Responsibilities
/// - Tracks a stack of open indentation widths.
/// - Emits braces at indentation increases and decreases.
/// - Rejects indentation that no enclosing block opened.
pub mod indent;
/// The parser builds the syntax tree from normalized source.
///
/// A PEG grammar (`src/grammar.pest`) describes the brace-delimited
/// language; the generated parser recognizes it and this module lowers the
/// resulting pairs into [`crate::ast::Node`] values, then folds
/// pass-through nodes.
///
/// # Responsibilities
/// - Runs the generated PEG parser over the normalized source.
/// - Builds the generic tree the evaluator dispatches on.
/// - Reports grammar mismatches with line, column and rule.
pub mod parser;
/// The value module defines the runtime data types for evaluation.
///
/// This module declares the `Value` enum with its six variants, the
/// callable representation shared by built-ins and user functions, and
/// methods for typed extraction, equality and display.
///
/// # Responsibilities
/// - Defines the `Value` enum and all supported variants.
/// - Implements typed extraction with precise type errors.
/// - Provides the canonical display form of every variant.
pub mod value;
