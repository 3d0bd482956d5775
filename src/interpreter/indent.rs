use crate::error::ParseError;

/// Rewrites indentation-delimited blocks as brace-delimited blocks.
///
/// Every non-newline character is copied verbatim. After each newline the
/// run of leading spaces on the next line is measured and consumed: a
/// wider run than the current level opens a block (`{`), a narrower run
/// closes blocks (`}`) until the matching level is found. Any block still
/// open at the end of input is closed.
///
/// Only ASCII spaces count as indentation; tabs do not. A blank line (one
/// whose first character is another newline) never changes the level.
///
/// # Errors
/// Returns [`ParseError::InvalidIndentation`] when a dedent lands on a
/// level that no enclosing block opened.
///
/// # Example
/// ```
/// use minipy::interpreter::indent::normalize;
///
/// let out = normalize("while(i < 3):\n    i = i + 1\n").unwrap();
/// assert_eq!(out, "while(i < 3):\n{\ni = i + 1\n\n}");
/// ```
pub fn normalize(source: &str) -> Result<String, ParseError> {
    let mut levels = vec![0_usize];
    let mut output = String::with_capacity(source.len());
    let mut line = 1_usize;

    let mut chars = source.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\n' {
            output.push(c);
            continue;
        }
        output.push('\n');
        line += 1;
        if matches!(chars.peek(), None | Some('\n')) {
            continue;
        }
        let mut width = 0_usize;
        while chars.peek() == Some(&' ') {
            chars.next();
            width += 1;
        }
        let top = *levels.last().unwrap_or(&0);
        if width > top {
            output.push_str("{\n");
            levels.push(width);
        } else {
            while width < *levels.last().unwrap_or(&0) {
                output.push_str("\n}");
                levels.pop();
                if *levels.last().unwrap_or(&0) < width {
                    return Err(ParseError::InvalidIndentation { line });
                }
            }
        }
    }
    while *levels.last().unwrap_or(&0) != 0 {
        output.push_str("\n}");
        levels.pop();
    }
    Ok(output)
}
