/// Parsing errors.
///
/// Defines all error types that can occur while normalizing indentation or
/// parsing the source text. Parse errors include inconsistent indentation,
/// grammar mismatches, and integer literals outside the 64-bit range.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation. Runtime
/// errors include unknown names, type mismatches, out-of-range list
/// indices, division by zero, and invalid comparators.
pub mod runtime_error;

pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;
