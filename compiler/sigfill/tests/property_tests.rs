//! Property-based tests for header annotation.
//!
//! A header annotated once must come back unchanged when annotated again with
//! the same suggestion, whatever its layout, and no input may make annotation
//! panic.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use proptest::prelude::*;
use sigfill::{annotate, Signature, SourceLines, Suggestion};

/// Type strings the way the collector spells them.
fn type_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("int".to_string()),
        Just("str".to_string()),
        Just("bool".to_string()),
        Just("None".to_string()),
        Just("Optional[int]".to_string()),
        Just("List[str]".to_string()),
        Just("typing.Dict[str, int]".to_string()),
        Just("Union[int, str]".to_string()),
    ]
}

fn default_strategy() -> impl Strategy<Value = Option<&'static str>> {
    prop_oneof![
        3 => Just(None),
        1 => Just(Some("None")),
        1 => Just(Some("True")),
        1 => Just(Some("...")),
    ]
}

/// How the argument list is laid out over physical lines.
#[derive(Clone, Copy, Debug)]
enum Layout {
    Inline,
    OnePerLine,
    Commented,
    BackslashJoined,
}

fn layout_strategy() -> impl Strategy<Value = Layout> {
    prop_oneof![
        Just(Layout::Inline),
        Just(Layout::OnePerLine),
        Just(Layout::Commented),
        Just(Layout::BackslashJoined),
    ]
}

/// A header, the types for its arguments and its return type.
fn header_strategy() -> impl Strategy<Value = (String, Vec<String>, String)> {
    (
        prop::collection::vec((type_strategy(), default_strategy()), 0..5),
        type_strategy(),
        any::<bool>(),
        any::<bool>(),
        layout_strategy(),
    )
        .prop_map(|(args, return_type, is_async, indented, layout)| {
            let indent = if indented { "    " } else { "" };
            let inner = format!("{indent}    ");
            let names: Vec<String> = args
                .iter()
                .enumerate()
                .map(|(i, (_, default))| match default {
                    Some(default) => format!("arg{i} = {default}"),
                    None => format!("arg{i}"),
                })
                .collect();
            let (arguments, tail) = match layout {
                _ if names.is_empty() => (String::new(), ""),
                Layout::Inline => (names.join(", "), ""),
                Layout::OnePerLine => (
                    format!("\n{inner}{}\n{indent}", names.join(&format!(",\n{inner}"))),
                    "",
                ),
                Layout::Commented => {
                    let lines: String = names
                        .iter()
                        .map(|name| format!("\n{inner}{name},  # note"))
                        .collect();
                    (format!("{lines}\n{indent}"), "  # done")
                }
                Layout::BackslashJoined => (names.join(&format!(", \\\n{inner}")), ""),
            };
            let keyword = if is_async { "async def" } else { "def" };
            let header =
                format!("{indent}{keyword} func({arguments}):{tail}\n{indent}    pass\n");
            let types = args.into_iter().map(|(ty, _)| ty).collect();
            (header, types, return_type)
        })
}

fn suggestion(arg_types: Vec<String>, return_type: String) -> Suggestion {
    Suggestion::new(
        0,
        Signature {
            arg_types,
            return_type,
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn annotating_twice_changes_nothing((header, arg_types, return_type) in header_strategy()) {
        let suggestion = suggestion(arg_types, return_type);

        let mut source = SourceLines::new(&header);
        let first = annotate(&suggestion, &mut source)
            .unwrap_or_else(|err| panic!("failed on {header:?}: {err}"));
        prop_assert_eq!(first.line_count, header.lines().count() - 1);

        let again = format!("{}\n", first.text);
        let mut source = SourceLines::new(&again);
        let second = annotate(&suggestion, &mut source)
            .unwrap_or_else(|err| panic!("second pass failed on {again:?}: {err}"));
        prop_assert_eq!(&second.text, &first.text);
        prop_assert_eq!(second.line_count, first.line_count);
    }

    #[test]
    fn arbitrary_input_never_panics(
        text in "[ -~\n]{0,80}",
        arg_types in prop::collection::vec("[ -~]{0,12}", 0..4),
        return_type in "[ -~]{0,12}",
    ) {
        let mut source = SourceLines::new(&text);
        let _ = annotate(&suggestion(arg_types, return_type), &mut source);
    }

    #[test]
    fn inserted_return_type_comes_last(
        (header, arg_types, return_type) in header_strategy(),
    ) {
        let suggestion = suggestion(arg_types, return_type);
        let mut source = SourceLines::new(&header);
        let annotated = annotate(&suggestion, &mut source).unwrap();
        prop_assert!(annotated.text.ends_with(':') || annotated.text.ends_with("# done"));
        prop_assert!(annotated.text.contains(") -> "));
    }
}
