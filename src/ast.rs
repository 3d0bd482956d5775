use std::fmt;
use std::rc::Rc;

use crate::interpreter::parser::Rule;

/// A node of the syntax tree produced by the parser.
///
/// Every node carries the grammar rule it was built from, the source
/// position where the match started, an optional token (the matched text,
/// present on leaf nodes only), an optional pre-parsed integer (present on
/// `NUMBER` leaves), and the ordered child nodes. The evaluator dispatches
/// purely on [`Node::rule`]; nodes it has no case for are transparent and
/// evaluate to their first child.
///
/// Nodes are shared via [`Rc`]: the tree is immutable after parsing, and
/// function values keep their body node alive past the parse.
#[derive(Debug)]
pub struct Node {
    /// The grammar rule this node was produced by.
    pub rule: Rule,
    /// Source line of the start of the match (1-based).
    pub line: usize,
    /// Source column of the start of the match (1-based).
    pub col: usize,
    /// Pre-parsed integer payload of a `NUMBER` leaf.
    pub number: Option<i64>,
    /// Child nodes, in source order.
    pub children: Vec<Rc<Node>>,
    token: Option<String>,
}

impl Node {
    /// Creates a node. `token` should be `Some` exactly for leaf nodes.
    #[must_use]
    pub fn new(
        rule: Rule,
        line: usize,
        col: usize,
        token: Option<String>,
        number: Option<i64>,
        children: Vec<Rc<Self>>,
    ) -> Self {
        Self {
            rule,
            line,
            col,
            number,
            children,
            token,
        }
    }

    /// Returns the matched token text, or `""` for interior nodes.
    #[must_use]
    pub fn token(&self) -> &str {
        self.token.as_deref().unwrap_or("")
    }

    fn write_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        for _ in 0..depth {
            write!(f, "  ")?;
        }
        if self.children.is_empty() {
            writeln!(f, "- {:?} \"{}\"", self.rule, self.token())
        } else {
            writeln!(f, "+ {:?}", self.rule)?;
            for child in &self.children {
                child.write_tree(f, depth + 1)?;
            }
            Ok(())
        }
    }
}

/// Renders the tree in an indented form, one node per line. Interior nodes
/// print as `+ rule`, leaves as `- rule "token"`.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, 0)
    }
}

/// Folds single-child pass-through nodes out of the tree.
///
/// The grammar produces one node per rule, so a literal like `42` arrives
/// wrapped in `term`, `factor` and `VALUE` shells; folding them keeps the
/// evaluator's dispatch flat. Rules whose child count encodes meaning (an
/// empty `call`, a one-element `raw_list`, the optional endpoints of a
/// `list_splice`) keep their shape.
#[must_use]
pub fn optimize(node: &Rc<Node>) -> Rc<Node> {
    if node.children.len() == 1 && !keeps_shape(node.rule) {
        return optimize(&node.children[0]);
    }
    Rc::new(Node {
        rule: node.rule,
        line: node.line,
        col: node.col,
        number: node.number,
        children: node.children.iter().map(optimize).collect(),
        token: node.token.clone(),
    })
}

const fn keeps_shape(rule: Rule) -> bool {
    matches!(
        rule,
        Rule::block
            | Rule::call
            | Rule::list_create
            | Rule::raw_list
            | Rule::list_splice
            | Rule::left_sp
            | Rule::right_sp
            | Rule::return_stmt
    )
}
