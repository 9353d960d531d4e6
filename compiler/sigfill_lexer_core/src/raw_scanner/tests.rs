use super::*;
use crate::source::SourceLines;
use pretty_assertions::assert_eq;

fn tags_and_text(text: &str) -> Vec<(RawTag, String)> {
    tokenize(text)
        .into_iter()
        .map(|token| (token.tag, token.text))
        .collect()
}

fn t(tag: RawTag, text: &str) -> (RawTag, String) {
    (tag, text.to_string())
}

#[test]
fn simple_header() {
    assert_eq!(
        tags_and_text("def f(x):\n"),
        vec![
            t(RawTag::Name, "def"),
            t(RawTag::Name, "f"),
            t(RawTag::Op, "("),
            t(RawTag::Name, "x"),
            t(RawTag::Op, ")"),
            t(RawTag::Op, ":"),
            t(RawTag::Newline, "\n"),
            t(RawTag::EndMarker, ""),
        ]
    );
}

#[test]
fn line_breaks_inside_brackets_are_nl() {
    let tags: Vec<RawTag> = tokenize("f(\n    a,\n)\n").into_iter().map(|t| t.tag).collect();
    assert_eq!(
        tags,
        vec![
            RawTag::Name,
            RawTag::Op,
            RawTag::Nl,
            RawTag::Name,
            RawTag::Op,
            RawTag::Nl,
            RawTag::Op,
            RawTag::Newline,
            RawTag::EndMarker,
        ]
    );
}

#[test]
fn indented_first_line_produces_indent_and_dedent() {
    assert_eq!(
        tags_and_text("    def f(self): pass\n"),
        vec![
            t(RawTag::Indent, "    "),
            t(RawTag::Name, "def"),
            t(RawTag::Name, "f"),
            t(RawTag::Op, "("),
            t(RawTag::Name, "self"),
            t(RawTag::Op, ")"),
            t(RawTag::Op, ":"),
            t(RawTag::Name, "pass"),
            t(RawTag::Newline, "\n"),
            t(RawTag::Dedent, ""),
            t(RawTag::EndMarker, ""),
        ]
    );
}

#[test]
fn comment_only_line_is_nl() {
    assert_eq!(
        tags_and_text("# hello\nx\n"),
        vec![
            t(RawTag::Comment, "# hello"),
            t(RawTag::Nl, "\n"),
            t(RawTag::Name, "x"),
            t(RawTag::Newline, "\n"),
            t(RawTag::EndMarker, ""),
        ]
    );
}

#[test]
fn missing_final_terminator_gives_empty_newline() {
    assert_eq!(
        tags_and_text("x"),
        vec![
            t(RawTag::Name, "x"),
            t(RawTag::Newline, ""),
            t(RawTag::EndMarker, ""),
        ]
    );
}

#[test]
fn crlf_terminator() {
    assert_eq!(
        tags_and_text("x\r\n"),
        vec![
            t(RawTag::Name, "x"),
            t(RawTag::Newline, "\r\n"),
            t(RawTag::EndMarker, ""),
        ]
    );
}

#[test]
fn operators_use_longest_match() {
    let ops: Vec<String> = tokenize("a ** b // c -> ... != <<= :=")
        .into_iter()
        .filter(|t| t.tag == RawTag::Op)
        .map(|t| t.text)
        .collect();
    assert_eq!(ops, vec!["**", "//", "->", "...", "!=", "<<=", ":="]);
}

#[test]
fn numbers() {
    let numbers: Vec<String> = tokenize("0x1F 1_000 3.14 .5 1e-3 2E5 10j 0b1010")
        .into_iter()
        .filter(|t| t.tag == RawTag::Number)
        .map(|t| t.text)
        .collect();
    assert_eq!(
        numbers,
        vec!["0x1F", "1_000", "3.14", ".5", "1e-3", "2E5", "10j", "0b1010"]
    );
}

#[test]
fn prefixed_strings() {
    let strings: Vec<String> = tokenize(r#"b'x' rb"y" u'z' 'a\'b'"#)
        .into_iter()
        .filter(|t| t.tag == RawTag::String)
        .map(|t| t.text)
        .collect();
    assert_eq!(strings, vec!["b'x'", "rb\"y\"", "u'z'", r"'a\'b'"]);
}

#[test]
fn triple_quoted_string_spans_lines() {
    let tokens = tokenize("x = '''a\nb''' + 1\n");
    let string = tokens
        .iter()
        .find(|t| t.tag == RawTag::String)
        .cloned();
    let string = string.unwrap_or_else(|| panic!("no string token in {tokens:?}"));
    assert_eq!(string.text, "'''a\nb'''");
    assert_eq!(string.start, Pos::new(0, 4));
    assert_eq!(string.end, Pos::new(1, 4));
    assert!(tokens.iter().any(|t| t.is_op("+")));
}

#[test]
fn unterminated_single_line_string_is_error() {
    let tokens = tokenize("'abc\n");
    assert_eq!(tokens[0].tag, RawTag::ErrorToken);
    assert_eq!(tokens[0].text, "'abc");
}

#[test]
fn backslash_continuation_joins_lines() {
    assert_eq!(
        tags_and_text("a = 1 + \\\n    2\n"),
        vec![
            t(RawTag::Name, "a"),
            t(RawTag::Op, "="),
            t(RawTag::Number, "1"),
            t(RawTag::Op, "+"),
            t(RawTag::Number, "2"),
            t(RawTag::Newline, "\n"),
            t(RawTag::EndMarker, ""),
        ]
    );
}

#[test]
fn fstring_with_nested_format_spec() {
    assert_eq!(
        tags_and_text("f\"a{x:>{w}}b\"\n"),
        vec![
            t(RawTag::FStringStart, "f\""),
            t(RawTag::FStringMiddle, "a"),
            t(RawTag::Op, "{"),
            t(RawTag::Name, "x"),
            t(RawTag::Op, ":"),
            t(RawTag::FStringMiddle, ">"),
            t(RawTag::Op, "{"),
            t(RawTag::Name, "w"),
            t(RawTag::Op, "}"),
            t(RawTag::Op, "}"),
            t(RawTag::FStringMiddle, "b"),
            t(RawTag::FStringEnd, "\""),
            t(RawTag::Newline, "\n"),
            t(RawTag::EndMarker, ""),
        ]
    );
}

#[test]
fn fstring_escaped_braces_stay_in_middle() {
    assert_eq!(
        tags_and_text("f'{{x}}'"),
        vec![
            t(RawTag::FStringStart, "f'"),
            t(RawTag::FStringMiddle, "{{x}}"),
            t(RawTag::FStringEnd, "'"),
            t(RawTag::Newline, ""),
            t(RawTag::EndMarker, ""),
        ]
    );
}

#[test]
fn fstring_field_brackets_do_not_close_field() {
    let texts: Vec<String> = tokenize("f'{d[\"k\"]:{n}}'")
        .into_iter()
        .map(|t| t.text)
        .collect();
    assert_eq!(
        texts,
        vec!["f'", "{", "d", "[", "\"k\"", "]", ":", "{", "n", "}", "}", "'", "", ""]
    );
}

#[test]
fn nested_fstrings() {
    let tags: Vec<RawTag> = tokenize("f\"{f'{x}'}\"")
        .into_iter()
        .map(|t| t.tag)
        .collect();
    assert_eq!(
        tags,
        vec![
            RawTag::FStringStart,
            RawTag::Op,
            RawTag::FStringStart,
            RawTag::Op,
            RawTag::Name,
            RawTag::Op,
            RawTag::FStringEnd,
            RawTag::Op,
            RawTag::FStringEnd,
            RawTag::Newline,
            RawTag::EndMarker,
        ]
    );
}

#[test]
fn end_of_input_inside_brackets_is_end_marker() {
    let tokens = tokenize("def f(\n    x,\n");
    assert_eq!(tokens.last().map(|t| t.tag), Some(RawTag::EndMarker));
    assert!(tokens.iter().all(|t| t.tag != RawTag::Newline));
}

#[test]
fn end_marker_repeats() {
    let mut source = SourceLines::new("x\n");
    let mut scanner = RawScanner::new(&mut source, 0);
    while scanner.next_token().tag != RawTag::EndMarker {}
    assert_eq!(scanner.next_token().tag, RawTag::EndMarker);
    assert_eq!(scanner.next_token().tag, RawTag::EndMarker);
}

#[test]
fn lines_are_pulled_lazily() {
    let lines = ["def f(\n", "    x):\n", "    return x\n"];
    let mut requested = Vec::new();
    let mut source = |index: usize| {
        requested.push(index);
        lines.get(index).map(|line| (*line).to_string())
    };
    let mut scanner = RawScanner::new(&mut source, 0);
    while !scanner.next_token().is_op(":") {}
    assert_eq!(scanner.lines_read(), 2);
    drop(scanner);
    assert_eq!(requested, vec![0, 1]);
}

#[test]
fn scanning_starts_at_requested_line() {
    let mut source = SourceLines::new("a = 1\ndef g():\n");
    let mut scanner = RawScanner::new(&mut source, 1);
    let first = scanner.next_token();
    assert_eq!(first.text, "def");
    assert_eq!(first.start, Pos::new(0, 0));
    assert_eq!(scanner.line(0), Some("def g():\n"));
}

#[test]
fn slice_spans_rows() {
    let mut source = SourceLines::new("ab\ncd\nef\n");
    let mut scanner = RawScanner::new(&mut source, 0);
    for _ in scanner.by_ref() {}
    assert_eq!(scanner.slice(Pos::new(0, 1), Pos::new(2, 1)), "b\ncd\ne");
    assert_eq!(scanner.slice(Pos::new(1, 0), Pos::new(1, 2)), "cd");
    assert_eq!(scanner.slice(Pos::new(1, 2), Pos::new(1, 0)), "");
}

#[test]
fn unknown_byte_is_error_token() {
    let tokens = tokenize("a $ b");
    assert_eq!(tokens[1].tag, RawTag::ErrorToken);
    assert_eq!(tokens[1].text, "$");
    assert_eq!(tokens[2].text, "b");
}

#[test]
fn inconsistent_dedent_is_error() {
    let tags: Vec<RawTag> = tokenize("if x:\n        a\n    b\n")
        .into_iter()
        .map(|t| t.tag)
        .collect();
    assert!(tags.contains(&RawTag::ErrorToken));
}
