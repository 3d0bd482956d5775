use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::{
    ast::Node,
    error::RuntimeError,
    interpreter::{
        environment::{EnvRef, Environment},
        evaluator::core::{EvalResult, Evaluator},
        value::{Builtin, Callable, Closure, Value},
    },
};

/// Binds the built-in functions in the global scope.
pub(crate) fn install_builtins(global: &mut Environment) {
    global.assign("print", Value::Function(Callable::Builtin(Builtin::Print)));
    global.assign("len", Value::Function(Callable::Builtin(Builtin::Len)));
}

impl Evaluator<'_> {
    /// Declares a function: the children between the name and the body
    /// block are the formal parameter names, and the enclosing environment
    /// is captured so the body resolves free names lexically.
    pub(crate) fn declare_function(&mut self, node: &Rc<Node>, env: &EnvRef) -> EvalResult<Value> {
        let children = &node.children;
        let name = children[0].token().to_string();
        let params: Vec<String> = children[1..children.len() - 1]
            .iter()
            .map(|param| param.token().to_string())
            .collect();
        let body = Rc::clone(&children[children.len() - 1]);
        debug!(name = %name, params = params.len(), "declaring function");

        let closure = Closure {
            name: name.clone(),
            params,
            body,
            env: Rc::clone(env),
        };
        env.borrow_mut()
            .assign(&name, Value::Function(Callable::Declared(Rc::new(closure))));
        Ok(Value::None)
    }

    /// Calls the function bound to the callee name. Arguments are
    /// evaluated in the caller's environment, left to right.
    pub(crate) fn eval_call(&mut self, node: &Rc<Node>, env: &EnvRef) -> EvalResult<Value> {
        let callee = &node.children[0];
        let function = self.lookup(callee, env)?.as_callable(callee.line)?;

        let mut args = Vec::with_capacity(node.children.len() - 1);
        for arg in &node.children[1..] {
            args.push(self.eval(arg, env)?);
        }

        match function {
            Callable::Builtin(Builtin::Print) => self.print(&args),
            Callable::Builtin(Builtin::Len) => len(&args, node.line),
            Callable::Declared(closure) => self.call_closure(&closure, args, node.line),
        }
    }

    /// Runs a declared function: a fresh scope is created under the
    /// captured environment, the arguments are bound positionally, and the
    /// body block's value becomes the call's value.
    fn call_closure(&mut self, closure: &Closure, args: Vec<Value>, line: usize) -> EvalResult<Value> {
        if args.len() != closure.params.len() {
            return Err(RuntimeError::ArgumentCountMismatch { line });
        }
        trace!(name = %closure.name, "calling function");

        let mut frame = Environment::with_parent(Rc::clone(&closure.env));
        for (param, value) in closure.params.iter().zip(args) {
            frame.assign(param, value);
        }
        let frame = Rc::new(RefCell::new(frame));

        let result = self.eval(&closure.body, &frame)?;
        trace!(name = %closure.name, result = %result, "function returned");
        Ok(result)
    }

    /// `print`: display forms separated by single spaces, then a newline.
    fn print(&mut self, args: &[Value]) -> EvalResult<Value> {
        for (index, value) in args.iter().enumerate() {
            if index > 0 {
                write!(self.out, " ")?;
            }
            write!(self.out, "{value}")?;
        }
        writeln!(self.out)?;
        Ok(Value::None)
    }
}

/// `len`: the length of its single list argument, counting every
/// position including placeholders.
fn len(args: &[Value], line: usize) -> EvalResult<Value> {
    if args.len() != 1 {
        return Err(RuntimeError::ArgumentCountMismatch { line });
    }
    let items = args[0].as_list(line)?;
    Ok(Value::Int(items.len() as i64))
}
