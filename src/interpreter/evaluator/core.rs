use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::{
    ast::Node,
    error::RuntimeError,
    interpreter::{
        environment::{EnvRef, Environment},
        parser::Rule,
        value::Value,
    },
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Executes a parsed program against an output sink.
///
/// The evaluator owns the global scope (with the built-ins installed) and
/// borrows the standard-output sink for its lifetime. Execution is
/// strictly synchronous: every `eval` call runs to completion before its
/// caller resumes, and errors unwind to the caller of [`Evaluator::run`]
/// without any recovery.
pub struct Evaluator<'a> {
    pub(crate) out: &'a mut dyn Write,
    global: EnvRef,
}

impl<'a> Evaluator<'a> {
    /// Creates an evaluator with a fresh global scope. `print` and `len`
    /// are bound in it before any user code runs.
    pub fn new(out: &'a mut dyn Write) -> Self {
        let mut global = Environment::new();
        super::function::install_builtins(&mut global);
        Self {
            out,
            global: Rc::new(RefCell::new(global)),
        }
    }

    /// Evaluates a whole program in the global scope.
    ///
    /// # Errors
    /// Returns the first runtime error raised by any evaluation step.
    pub fn run(&mut self, program: &Rc<Node>) -> EvalResult<Value> {
        let global = Rc::clone(&self.global);
        self.eval(program, &global)
    }

    /// Evaluates one node. Dispatch is by grammar rule; rules without a
    /// case here are transparent and evaluate to their first child, or to
    /// nil when they have none.
    pub(crate) fn eval(&mut self, node: &Rc<Node>, env: &EnvRef) -> EvalResult<Value> {
        trace!(rule = ?node.rule, line = node.line, "eval");
        match node.rule {
            Rule::program | Rule::block => self.eval_block(node, env),
            Rule::expression => self.eval_expression(node, env),
            Rule::term => self.eval_term(node, env),
            Rule::NAME => self.lookup(node, env),
            Rule::STRING => Ok(Value::Str(node.token().to_string())),
            Rule::NUMBER => Ok(Value::Int(node.number.unwrap_or_default())),
            Rule::function => self.declare_function(node, env),
            Rule::call => self.eval_call(node, env),
            Rule::assignment => self.eval_assignment(node, env),
            Rule::list_create => self.declare_list(node, env),
            Rule::list_value => self.access_list(node, env),
            Rule::list_assign => self.assign_list(node, env),
            Rule::if_stmt => self.eval_if(node, env),
            Rule::while_stmt => self.eval_while(node, env),
            _ => match node.children.first() {
                Some(child) => self.eval(child, env),
                None => Ok(Value::None),
            },
        }
    }

    /// Resolves a `NAME` leaf through the environment chain.
    pub(crate) fn lookup(&self, node: &Node, env: &EnvRef) -> EvalResult<Value> {
        env.borrow()
            .lookup(node.token())
            .ok_or_else(|| RuntimeError::UnknownName {
                name: node.token().to_string(),
                line: node.line,
            })
    }

    /// Evaluates children in order. A `return` child ends the block with
    /// its value; a conditional child that produced a value does the same,
    /// which is what carries a `return` out of nested branches. Everything
    /// else is evaluated and discarded.
    fn eval_block(&mut self, node: &Rc<Node>, env: &EnvRef) -> EvalResult<Value> {
        for child in &node.children {
            match child.rule {
                Rule::return_stmt => {
                    let value = self.eval(child, env)?;
                    trace!(value = %value, "block returns");
                    return Ok(value);
                }
                Rule::if_stmt => {
                    let value = self.eval(child, env)?;
                    if !value.is_none() {
                        return Ok(value);
                    }
                }
                _ => {
                    self.eval(child, env)?;
                }
            }
        }
        Ok(Value::None)
    }

    fn eval_assignment(&mut self, node: &Rc<Node>, env: &EnvRef) -> EvalResult<Value> {
        let value = self.eval(&node.children[1], env)?;
        env.borrow_mut().assign(node.children[0].token(), value);
        Ok(Value::None)
    }

    /// Evaluates a signed sum of terms.
    ///
    /// The operator `+` is overloaded on the shape and type of the first
    /// operand: a single call, list access or string literal passes its
    /// value through; a list literal or a name bound to a list makes `+`
    /// concatenation; a name bound to a string makes `+` string
    /// concatenation; everything else is 64-bit integer arithmetic.
    fn eval_expression(&mut self, node: &Rc<Node>, env: &EnvRef) -> EvalResult<Value> {
        let nodes = &node.children;
        let first = &nodes[1];

        if nodes.len() == 2 {
            match first.rule {
                Rule::call | Rule::list_value => return self.eval(first, env),
                Rule::STRING => return Ok(Value::Str(first.token().to_string())),
                _ => {}
            }
        }

        if first.rule == Rule::raw_list {
            let mut items = self.eval_list_items(first, env)?;
            self.concat_onto(&mut items, nodes, env)?;
            return Ok(items.into());
        }

        if first.rule == Rule::NAME {
            match self.lookup(first, env)? {
                Value::List(list) => {
                    if nodes.len() == 2 {
                        return Ok(Value::List(list));
                    }
                    let mut items: Vec<Value> =
                        list.iter().filter(|item| !item.is_none()).cloned().collect();
                    self.concat_onto(&mut items, nodes, env)?;
                    return Ok(items.into());
                }
                Value::Str(s) => return self.concat_strings(s, nodes, env),
                _ => {}
            }
        }

        let mut value = self.eval(first, env)?.as_int(first.line)?;
        if nodes[0].token() == "-" {
            value = value
                .checked_neg()
                .ok_or(RuntimeError::Overflow { line: node.line })?;
        }
        for pair in nodes[2..].chunks(2) {
            let rhs = self.eval(&pair[1], env)?.as_int(pair[1].line)?;
            value = if pair[0].token() == "+" {
                value.checked_add(rhs)
            } else {
                value.checked_sub(rhs)
            }
            .ok_or(RuntimeError::Overflow { line: node.line })?;
        }
        Ok(Value::Int(value))
    }

    /// Appends the `+`-joined right operands of a list expression onto
    /// `items`. List literals contribute their evaluated elements; other
    /// operands must evaluate to lists and contribute their elements with
    /// placeholders filtered out.
    fn concat_onto(
        &mut self,
        items: &mut Vec<Value>,
        nodes: &[Rc<Node>],
        env: &EnvRef,
    ) -> EvalResult<()> {
        for pair in nodes[2..].chunks(2) {
            let (op, operand) = (&pair[0], &pair[1]);
            if op.token() != "+" {
                return Err(RuntimeError::UnsupportedOperator {
                    op: op.token().to_string(),
                    type_name: "list",
                    line: op.line,
                });
            }
            if operand.rule == Rule::raw_list {
                items.extend(self.eval_list_items(operand, env)?);
            } else {
                let value = self.eval(operand, env)?;
                let list = value.as_list(operand.line)?;
                items.extend(list.iter().filter(|item| !item.is_none()).cloned());
            }
        }
        Ok(())
    }

    fn concat_strings(
        &mut self,
        mut result: String,
        nodes: &[Rc<Node>],
        env: &EnvRef,
    ) -> EvalResult<Value> {
        for pair in nodes[2..].chunks(2) {
            let (op, operand) = (&pair[0], &pair[1]);
            if op.token() != "+" {
                return Err(RuntimeError::UnsupportedOperator {
                    op: op.token().to_string(),
                    type_name: "string",
                    line: op.line,
                });
            }
            let value = self.eval(operand, env)?;
            result.push_str(value.as_str(operand.line)?);
        }
        Ok(Value::Str(result))
    }

    /// Folds `*` and `/` over the factors, left to right.
    fn eval_term(&mut self, node: &Rc<Node>, env: &EnvRef) -> EvalResult<Value> {
        let nodes = &node.children;
        let mut value = self.eval(&nodes[0], env)?.as_int(nodes[0].line)?;
        for pair in nodes[1..].chunks(2) {
            let rhs = self.eval(&pair[1], env)?.as_int(pair[1].line)?;
            value = if pair[0].token() == "*" {
                value
                    .checked_mul(rhs)
                    .ok_or(RuntimeError::Overflow { line: node.line })?
            } else {
                if rhs == 0 {
                    return Err(RuntimeError::DivisionByZero { line: pair[1].line });
                }
                value
                    .checked_div(rhs)
                    .ok_or(RuntimeError::Overflow { line: node.line })?
            };
        }
        Ok(Value::Int(value))
    }

    fn eval_if(&mut self, node: &Rc<Node>, env: &EnvRef) -> EvalResult<Value> {
        if self.compare_true(&node.children[0], env)? {
            self.eval(&node.children[1], env)
        } else if let Some(alternative) = node.children.get(2) {
            self.eval(alternative, env)
        } else {
            Ok(Value::None)
        }
    }

    /// Re-evaluates the condition before every iteration. Values produced
    /// by the body, including returns, are not propagated out of the loop.
    fn eval_while(&mut self, node: &Rc<Node>, env: &EnvRef) -> EvalResult<Value> {
        debug!(line = node.line, "entering while loop");
        let mut iterations = 0_u64;
        while self.compare_true(&node.children[0], env)? {
            self.eval(&node.children[1], env)?;
            iterations += 1;
        }
        debug!(iterations, "leaving while loop");
        Ok(Value::None)
    }

    /// The comparator predicate shared by `if` and `while`.
    ///
    /// Both operands must evaluate to integers. The grammar also accepts
    /// `not`, `and` and `or` in conditions, but those have no evaluation
    /// and are rejected here.
    fn compare_true(&mut self, node: &Rc<Node>, env: &EnvRef) -> EvalResult<bool> {
        let nodes = &node.children;
        if nodes.len() != 3 {
            let op = nodes
                .first()
                .map_or_else(String::new, |n| n.token().to_string());
            return Err(RuntimeError::InvalidComparator {
                op,
                line: node.line,
            });
        }
        let lhs = self.eval(&nodes[0], env)?.as_int(nodes[0].line)?;
        let rhs = self.eval(&nodes[2], env)?.as_int(nodes[2].line)?;
        match nodes[1].token() {
            "==" => Ok(lhs == rhs),
            "!=" => Ok(lhs != rhs),
            "<" => Ok(lhs < rhs),
            "<=" => Ok(lhs <= rhs),
            ">" => Ok(lhs > rhs),
            ">=" => Ok(lhs >= rhs),
            op => Err(RuntimeError::InvalidComparator {
                op: op.to_string(),
                line: nodes[1].line,
            }),
        }
    }
}
