use std::rc::Rc;

use crate::{
    ast::Node,
    error::RuntimeError,
    interpreter::{
        environment::EnvRef,
        evaluator::core::{EvalResult, Evaluator},
        parser::Rule,
        value::Value,
    },
};

impl Evaluator<'_> {
    /// Binds a list literal to a name. A literal without initializers is
    /// seeded with a single nil placeholder, which is what lets index
    /// assignment tell an empty list apart from an out-of-range write.
    pub(crate) fn declare_list(&mut self, node: &Rc<Node>, env: &EnvRef) -> EvalResult<Value> {
        let items = if node.children.len() > 1 {
            self.eval_items(&node.children[1..], env)?
        } else {
            vec![Value::None]
        };
        env.borrow_mut().assign(node.children[0].token(), items.into());
        Ok(Value::None)
    }

    /// Evaluates the elements of a `raw_list` literal, in order.
    pub(crate) fn eval_list_items(&mut self, raw: &Rc<Node>, env: &EnvRef) -> EvalResult<Vec<Value>> {
        self.eval_items(&raw.children, env)
    }

    fn eval_items(&mut self, nodes: &[Rc<Node>], env: &EnvRef) -> EvalResult<Vec<Value>> {
        nodes.iter().map(|node| self.eval(node, env)).collect()
    }

    /// Reads an element or a sub-range of a list.
    ///
    /// A splice selector yields a new list over `[l, r)` with absent
    /// endpoints defaulting to the ends; out-of-range endpoints clamp. An
    /// integer selector must address an existing position.
    pub(crate) fn access_list(&mut self, node: &Rc<Node>, env: &EnvRef) -> EvalResult<Value> {
        let name = &node.children[0];
        let value = self.lookup(name, env)?;
        let items = value.as_list(name.line)?;
        let selector = &node.children[1];

        if selector.rule == Rule::list_splice {
            let (start, end) = self.splice_bounds(selector, items.len(), env)?;
            return Ok(items[start..end].to_vec().into());
        }

        let index = self.eval(selector, env)?.as_int(selector.line)?;
        usize::try_from(index)
            .ok()
            .and_then(|offset| items.get(offset).cloned())
            .ok_or(RuntimeError::IndexOutOfRange {
                index,
                len: items.len(),
                line: selector.line,
            })
    }

    /// Writes an element or a sub-range of a list, then rebinds the name
    /// to the modified copy.
    ///
    /// The splice form copies the right-hand list into `[l, r)` in order;
    /// when it is shorter than the span, the remaining positions keep
    /// their prior value. The index form addresses only the occupied
    /// prefix: the nil placeholder of a fresh empty list is not a
    /// writable slot.
    pub(crate) fn assign_list(&mut self, node: &Rc<Node>, env: &EnvRef) -> EvalResult<Value> {
        let name = &node.children[0];
        let selector = &node.children[1];
        let mut items: Vec<Value> = self.lookup(name, env)?.as_list(name.line)?.clone();

        if selector.rule == Rule::list_splice {
            let (start, end) = self.splice_bounds(selector, items.len(), env)?;
            let value = self.eval(&node.children[2], env)?;
            let source = value.as_list(node.children[2].line)?;
            for (slot, replacement) in items[start..end].iter_mut().zip(source.iter()) {
                *slot = replacement.clone();
            }
        } else {
            let occupied = items.iter().filter(|item| !item.is_none()).count();
            let index = self.eval(selector, env)?.as_int(selector.line)?;
            let offset = usize::try_from(index).ok().filter(|offset| *offset < occupied);
            let Some(offset) = offset else {
                return Err(RuntimeError::IndexOutOfRange {
                    index,
                    len: occupied,
                    line: selector.line,
                });
            };
            items[offset] = self.eval(&node.children[2], env)?;
        }

        env.borrow_mut().assign(name.token(), items.into());
        Ok(Value::None)
    }

    /// Resolves the optional endpoints of a splice against a list length.
    fn splice_bounds(
        &mut self,
        splice: &Rc<Node>,
        len: usize,
        env: &EnvRef,
    ) -> EvalResult<(usize, usize)> {
        let mut start = 0_i64;
        let mut end = len as i64;
        for part in &splice.children {
            match part.rule {
                Rule::left_sp => start = self.eval(&part.children[0], env)?.as_int(part.line)?,
                Rule::right_sp => end = self.eval(&part.children[0], env)?.as_int(part.line)?,
                _ => {}
            }
        }
        let max = len as i64;
        let start = start.clamp(0, max) as usize;
        let end = end.clamp(0, max) as usize;
        Ok((start, end.max(start)))
    }
}
