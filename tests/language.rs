use minipy::error::{ParseError, RuntimeError};
use minipy::interpreter::indent::normalize;
use minipy::run;

fn run_program(source: &str) -> Result<String, Box<dyn std::error::Error>> {
    let mut out = Vec::new();
    run(source, &mut out)?;
    Ok(String::from_utf8(out)?)
}

fn assert_output(source: &str, expected: &str) {
    match run_program(source) {
        Ok(output) => assert_eq!(output, expected, "for program:\n{source}"),
        Err(e) => panic!("Script failed: {e}\nProgram:\n{source}"),
    }
}

fn assert_failure(source: &str) {
    if run_program(source).is_ok() {
        panic!("Script succeeded but was expected to fail:\n{source}")
    }
}

fn runtime_error(source: &str) -> RuntimeError {
    let mut out = Vec::new();
    let error = run(source, &mut out).expect_err("script was expected to fail");
    *error
        .downcast::<RuntimeError>()
        .expect("expected a runtime error")
}

fn parse_error(source: &str) -> ParseError {
    let mut out = Vec::new();
    let error = run(source, &mut out).expect_err("script was expected to fail");
    *error
        .downcast::<ParseError>()
        .expect("expected a parse error")
}

#[test]
fn assignment_and_basic_arithmetic() {
    assert_output("x = 1\ny = 2\nprint(x + y)", "3\n");
    assert_output("print(2 * 3 + 4)", "10\n");
    assert_output("print(2 + 3 * 4)", "14\n");
    assert_output("print(10 / 2 - 1)", "4\n");
    assert_output("print(-5 + 8)", "3\n");
    assert_output("print((2 + 3) * 4)", "20\n");
}

#[test]
fn assignment_roundtrip() {
    assert_output("x = 41\nx = x + 1\nprint(x)", "42\n");
    assert_output("v = [1, \"two\", 3]\nw = v\nprint(w)", "[1, two, 3]\n");
}

#[test]
fn lists_and_indexing() {
    assert_output("a = [1,2,3]\nprint(a[0], a[2], len(a))", "1 3 3\n");
    assert_output("a = [1,2,3]\na[1] = 9\nprint(a[1])\nprint(a)", "9\n[1, 9, 3]\n");
    assert_output("a = [[1,2],[3]]\nprint(a)", "[[1, 2], [3]]\n");
}

#[test]
fn list_slicing() {
    assert_output("a = [10,20,30]\nprint(a[:])", "[10, 20, 30]\n");
    assert_output("a = [10,20,30]\nprint(a[1:])", "[20, 30]\n");
    assert_output("a = [10,20,30]\nprint(a[:2])", "[10, 20]\n");
    assert_output("a = [10,20,30]\nprint(a[1:2])", "[20]\n");
    // Out-of-range endpoints clamp instead of failing.
    assert_output("a = [10,20,30]\nprint(a[1:99])", "[20, 30]\n");
}

#[test]
fn splice_assignment() {
    assert_output("a = [1,2,3,4]\na[1:3] = [9,8]\nprint(a)", "[1, 9, 8, 4]\n");
    // A shorter right-hand side leaves the rest of the span alone.
    assert_output("a = [1,2,3,4]\na[0:3] = [7]\nprint(a)", "[7, 2, 3, 4]\n");
}

#[test]
fn list_concatenation() {
    assert_output("a = [1,2,3]\nb = a + [4,5]\nprint(b[3], b[4], len(b))", "4 5 5\n");
    assert_output("a = [1]\nb = [2]\nc = a + b\nprint(c)", "[1, 2]\n");
    assert_output("b = [1] + [2,3]\nprint(b, len(b))", "[1, 2, 3] 3\n");
}

#[test]
fn empty_list_placeholder() {
    assert_output("a = []\nprint(len(a))", "1\n");
    assert_output("a = []\nprint(a)", "[]\n");
    // Concatenation filters the placeholder out.
    assert_output("a = []\nb = a + [1]\nprint(b, len(b))", "[1] 1\n");
    // The placeholder is not a writable slot.
    assert!(matches!(
        runtime_error("a = []\na[0] = 1"),
        RuntimeError::IndexOutOfRange { .. }
    ));
}

#[test]
fn string_concatenation() {
    assert_output("s = \"he\"\ns = s + \"llo\"\nprint(s)", "hello\n");
    assert_output("print(\"a\", \"b\")\nprint(\"\")", "a b\n\n");
}

#[test]
fn while_loops() {
    assert_output("i = 0\nwhile(i < 3):\n    print(i)\n    i = i + 1", "0\n1\n2\n");
    assert_output(
        "a = [1,2,3]\ni = 0\ntotal = 0\nwhile(i < len(a)):\n    total = total + a[i]\n    i = i + 1\nprint(total)",
        "6\n",
    );
}

#[test]
fn if_and_else() {
    assert_output("x = 2\nif x == 1:\n    print(10)\nelse:\n    print(20)", "20\n");
    assert_output("x = 1\nif x == 1:\n    print(10)\nprint(11)", "10\n11\n");
    assert_output("x = 1\nif x != 2:\n    print(1)", "1\n");
}

#[test]
fn recursive_function() {
    assert_output(
        "def f(n):\n    if n <= 1:\n        return n\n    return f(n-1) + f(n-2)\nprint(f(10))",
        "55\n",
    );
}

#[test]
fn function_declarations_and_calls() {
    assert_output("def add(a, b):\n    return a + b\nprint(add(2, 3))", "5\n");
    // A parameter shadows an outer binding without touching it.
    assert_output("x = 10\ndef f(x):\n    return x * 2\nprint(f(3), x)", "6 10\n");
}

#[test]
fn closures_capture_their_scope() {
    // Free names resolve through the declaration environment at call
    // time, not at declaration time.
    assert_output("x = 1\ndef f():\n    return x\nx = 2\nprint(f())", "2\n");
}

#[test]
fn return_propagates_through_nested_branches() {
    assert_output(
        "def f(n):\n    if n > 0:\n        if n > 1:\n            return 2\n        return 1\n    return 0\nprint(f(5), f(1), f(0))",
        "2 1 0\n",
    );
}

#[test]
fn while_discards_body_returns() {
    // A return inside a loop body ends the iteration, not the function.
    assert_output(
        "def f():\n    i = 0\n    while(i < 3):\n        i = i + 1\n        return 9\n    return i\nprint(f())",
        "3\n",
    );
}

#[test]
fn comments_and_semicolons() {
    assert_output("# header\nx = 1;\nprint(x) # trailing", "1\n");
    assert_output("x = 1\n\n\ny = 2\nprint(x + y)", "3\n");
}

#[test]
fn print_with_no_arguments() {
    assert_output("print()", "\n");
}

#[test]
fn bare_function_reference_is_error() {
    // A name expression is routed through arithmetic unless it holds a
    // list or a string, so a bare function reference fails.
    assert!(matches!(
        runtime_error("def f():\n    return 1\nprint(f)"),
        RuntimeError::TypeMismatch { .. }
    ));
}

#[test]
fn unknown_name_is_error() {
    assert!(matches!(
        runtime_error("print(y)"),
        RuntimeError::UnknownName { .. }
    ));
}

#[test]
fn indexing_a_non_list_is_error() {
    assert!(matches!(
        runtime_error("a = 1\nprint(a[0])"),
        RuntimeError::TypeMismatch { .. }
    ));
}

#[test]
fn out_of_range_index_is_error() {
    assert!(matches!(
        runtime_error("a = [1]\nprint(a[5])"),
        RuntimeError::IndexOutOfRange { .. }
    ));
    assert!(matches!(
        runtime_error("a = [1]\ni = 0 - 1\nprint(a[i])"),
        RuntimeError::IndexOutOfRange { .. }
    ));
}

#[test]
fn division_by_zero_is_error() {
    assert!(matches!(
        runtime_error("print(1/0)"),
        RuntimeError::DivisionByZero { .. }
    ));
}

#[test]
fn overflow_is_error() {
    assert!(matches!(
        runtime_error("x = 9223372036854775807\nprint(x + 1)"),
        RuntimeError::Overflow { .. }
    ));
}

#[test]
fn len_contract() {
    assert!(matches!(
        runtime_error("print(len(1))"),
        RuntimeError::TypeMismatch { .. }
    ));
    assert!(matches!(
        runtime_error("a = [1]\nprint(len(a, a))"),
        RuntimeError::ArgumentCountMismatch { .. }
    ));
}

#[test]
fn wrong_function_arity_is_error() {
    assert!(matches!(
        runtime_error("def f(a, b):\n    return a\nprint(f(1))"),
        RuntimeError::ArgumentCountMismatch { .. }
    ));
}

#[test]
fn boolean_connectives_are_rejected() {
    // The grammar accepts them in conditions; the evaluator does not.
    assert!(matches!(
        runtime_error("x = 1\nif not x:\n    print(1)"),
        RuntimeError::InvalidComparator { .. }
    ));
    assert!(matches!(
        runtime_error("x = 1\ny = 2\nif x and y:\n    print(1)"),
        RuntimeError::InvalidComparator { .. }
    ));
}

#[test]
fn operators_undefined_for_strings_and_lists() {
    assert!(matches!(
        runtime_error("s = \"a\"\nprint(s - \"b\")"),
        RuntimeError::UnsupportedOperator { .. }
    ));
    assert!(matches!(
        runtime_error("a = [1]\nprint(a - [2])"),
        RuntimeError::UnsupportedOperator { .. }
    ));
}

#[test]
fn syntax_errors() {
    assert_failure("");
    assert_failure("x = = 1");
    let error = parse_error("x = = 1");
    assert!(error.to_string().contains("| rule:"));
}

#[test]
fn oversized_integer_literal_is_error() {
    assert!(matches!(
        parse_error("x = 99999999999999999999"),
        ParseError::NumberLiteral { .. }
    ));
}

#[test]
fn inconsistent_indentation_is_error() {
    assert!(matches!(
        parse_error("x = 1\nif x == 1:\n        y = 1\n    z = 2"),
        ParseError::InvalidIndentation { .. }
    ));
}

#[test]
fn normalizer_emits_balanced_braces() {
    let source =
        "def f(n):\n    if n <= 1:\n        return n\n    return f(n-1) + f(n-2)\nprint(f(10))";
    let normalized = normalize(source).unwrap();
    assert_eq!(
        normalized.matches('{').count(),
        normalized.matches('}').count()
    );
    // One pair per indentation level reached.
    assert_eq!(normalized.matches('{').count(), 2);
}

#[test]
fn blank_lines_do_not_change_indentation() {
    let normalized = normalize("x = 1\n\n\ny = 2\n").unwrap();
    assert_eq!(normalized.matches('{').count(), 0);
}
