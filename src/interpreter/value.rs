use std::fmt;
use std::rc::Rc;

use crate::{
    ast::Node,
    error::RuntimeError,
    interpreter::{environment::EnvRef, evaluator::core::EvalResult},
};

/// Represents a runtime value in the interpreter.
///
/// A value is exactly one of six variants; reading it as another variant
/// fails with a type error. Values are immutable from the outside: an
/// assignment replaces a binding, and list mutation copies, modifies and
/// writes back, so no two names observably alias the same list interior.
#[derive(Debug, Clone)]
pub enum Value {
    /// The absent value, displayed as `nil`. Also used as the capacity
    /// placeholder a fresh empty list is seeded with.
    None,
    /// A boolean value.
    Bool(bool),
    /// A 64-bit signed integer.
    Int(i64),
    /// An immutable string.
    Str(String),
    /// A callable: a built-in or a declared function with its captured
    /// environment.
    Function(Callable),
    /// An ordered sequence of values.
    List(Rc<Vec<Self>>),
}

/// A callable value.
#[derive(Clone)]
pub enum Callable {
    /// A function installed by the interpreter at startup.
    Builtin(Builtin),
    /// A function declared in the program.
    Declared(Rc<Closure>),
}

/// The built-in functions of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// `print(v1, ..., vn)`: writes display forms to standard output.
    Print,
    /// `len(list)`: the number of positions, placeholders included.
    Len,
}

/// A declared function: its parameter names, its body, and the
/// environment captured at the declaration site.
///
/// The body is shared with the parsed tree rather than copied; the
/// environment link is what keeps a call frame alive past its call when a
/// function declared inside it escapes.
pub struct Closure {
    /// The name the function was declared under.
    pub name: String,
    /// Formal parameter names, in order.
    pub params: Vec<String>,
    /// The block node evaluated on every call.
    pub body: Rc<Node>,
    /// The environment enclosing the declaration.
    pub env: EnvRef,
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(builtin) => write!(f, "<builtin {builtin:?}>"),
            Self::Declared(closure) => write!(f, "<function {}>", closure.name),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            // Function identity is not observable; functions never
            // compare equal, and mixed variants never compare equal.
            _ => false,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::List(Rc::new(v))
    }
}

impl Value {
    /// The name of the variant, as used in type error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Str(_) => "string",
            Self::Function(_) => "function",
            Self::List(_) => "list",
        }
    }

    /// Extracts the integer payload, or fails with a type error.
    ///
    /// # Parameters
    /// - `line`: Source code line number for error reporting.
    pub const fn as_int(&self, line: usize) -> EvalResult<i64> {
        match self {
            Self::Int(n) => Ok(*n),
            _ => Err(RuntimeError::TypeMismatch {
                expected: "int",
                found: self.type_name(),
                line,
            }),
        }
    }

    /// Extracts the string payload, or fails with a type error.
    pub fn as_str(&self, line: usize) -> EvalResult<&str> {
        match self {
            Self::Str(s) => Ok(s),
            _ => Err(RuntimeError::TypeMismatch {
                expected: "string",
                found: self.type_name(),
                line,
            }),
        }
    }

    /// Extracts the list elements, or fails with a type error.
    pub fn as_list(&self, line: usize) -> EvalResult<&Vec<Self>> {
        match self {
            Self::List(items) => Ok(items),
            _ => Err(RuntimeError::TypeMismatch {
                expected: "list",
                found: self.type_name(),
                line,
            }),
        }
    }

    /// Extracts the callable, or fails with a type error.
    pub fn as_callable(&self, line: usize) -> EvalResult<Callable> {
        match self {
            Self::Function(callable) => Ok(callable.clone()),
            _ => Err(RuntimeError::TypeMismatch {
                expected: "function",
                found: self.type_name(),
                line,
            }),
        }
    }

    /// Returns `true` if the value is [`None`](Self::None).
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// The canonical display forms: `nil`, `true`/`false`, decimal integers,
/// raw string characters, `Function`, and bracketed comma-separated lists
/// with placeholder elements suppressed.
///
/// # Example
/// ```
/// use minipy::interpreter::value::Value;
///
/// let list = Value::from(vec![Value::Int(1), Value::None, Value::Int(2)]);
/// assert_eq!(list.to_string(), "[1, 2]");
/// ```
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "nil"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s}"),
            Self::Function(_) => write!(f, "Function"),
            Self::List(items) => {
                write!(f, "[")?;
                let mut first = true;
                for item in items.iter().filter(|item| !item.is_none()) {
                    if !first {
                        write!(f, ", ")?;
                    }
                    first = false;
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}
