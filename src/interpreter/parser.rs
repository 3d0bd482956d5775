use std::rc::Rc;

use pest::iterators::Pair;
use pest::Parser;
use tracing::debug;

use crate::{
    ast::{self, Node},
    error::ParseError,
};

/// The generated PEG parser for the brace-delimited language.
///
/// `Rule` (the tag type the whole crate dispatches on) is generated from
/// `src/grammar.pest` alongside this struct.
#[derive(pest_derive::Parser)]
#[grammar = "grammar.pest"]
pub struct SourceParser;

/// Parses normalized (brace-delimited) source into a syntax tree.
///
/// On success the tree has already been through the pass-through folding
/// of [`ast::optimize`] and is ready for evaluation; the full tree is
/// emitted as a `debug!` event for tracing.
///
/// # Errors
/// Returns [`ParseError::Syntax`] when the grammar does not match, and
/// [`ParseError::NumberLiteral`] for integer literals outside `i64`.
pub fn parse(source: &str) -> Result<Rc<Node>, ParseError> {
    let mut pairs =
        SourceParser::parse(Rule::program, source).map_err(|error| ParseError::from_pest(&error))?;
    let Some(root) = pairs.next() else {
        return Err(ParseError::Syntax {
            line: 1,
            col: 1,
            message: "empty parse result".to_string(),
            rule: "program".to_string(),
        });
    };
    let tree = ast::optimize(&build(root)?);
    debug!(tree = %tree, "parsed program");
    Ok(tree)
}

fn build(pair: Pair<'_, Rule>) -> Result<Rc<Node>, ParseError> {
    let rule = pair.as_rule();
    let (line, col) = pair.as_span().start_pos().line_col();
    let text = pair.as_str();
    let children = pair
        .into_inner()
        .filter(|inner| inner.as_rule() != Rule::EOI)
        .map(build)
        .collect::<Result<Vec<_>, _>>()?;

    let mut token = None;
    let mut number = None;
    if children.is_empty() {
        match rule {
            // The stored token is the string body, without the quotes.
            Rule::STRING => token = Some(text[1..text.len() - 1].to_string()),
            Rule::NUMBER => {
                number = Some(
                    text.parse::<i64>()
                        .map_err(|_| ParseError::NumberLiteral { line })?,
                );
                token = Some(text.to_string());
            }
            _ => token = Some(text.to_string()),
        }
    }
    Ok(Rc::new(Node::new(rule, line, col, token, number, children)))
}
