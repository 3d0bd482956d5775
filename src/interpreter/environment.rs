use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::trace;

use crate::interpreter::value::Value;

/// A shared, mutable reference to an environment.
///
/// Environments are owned jointly: a call frame is dropped when its call
/// returns, unless a function value captured it, in which case it lives as
/// long as that function.
pub type EnvRef = Rc<RefCell<Environment>>;

/// A single scope: name-to-value bindings plus an optional parent link.
///
/// One environment is created as the global scope at startup, and one per
/// function call with the parent set to the environment captured at the
/// function's declaration.
pub struct Environment {
    parent: Option<EnvRef>,
    bindings: HashMap<String, Value>,
}

#[allow(clippy::new_without_default)]
impl Environment {
    /// Creates a top-level scope with no parent.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: None,
            bindings: HashMap::new(),
        }
    }

    /// Creates a scope nested inside `parent`.
    #[must_use]
    pub fn with_parent(parent: EnvRef) -> Self {
        Self {
            parent: Some(parent),
            bindings: HashMap::new(),
        }
    }

    /// Returns the binding of the innermost scope that contains `name`,
    /// searching enclosing scopes in order.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.get(name) {
            trace!(name, value = %value, "read binding");
            return Some(value.clone());
        }
        self.parent
            .as_ref()
            .and_then(|outer| outer.borrow().lookup(name))
    }

    /// Binds `name` in this scope, replacing any prior binding here.
    ///
    /// Enclosing scopes are not searched: an assignment in an inner scope
    /// always shadows an outer binding of the same name.
    pub fn assign(&mut self, name: &str, value: Value) {
        trace!(name, value = %value, "write binding");
        self.bindings.insert(name.to_string(), value);
    }
}
