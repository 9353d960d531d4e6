use super::*;
use pretty_assertions::assert_eq;

#[test]
fn argument_default_is_a_dotted_name() {
    assert!(TokenKind::ArgumentDefault.is_a(TokenKind::DottedName));
    assert!(TokenKind::ArgumentDefault.is_a(TokenKind::Name));
    assert!(!TokenKind::DottedName.is_a(TokenKind::ArgumentDefault));
}

#[test]
fn colon_family_is_separator() {
    for kind in [TokenKind::TypeDef, TokenKind::EndDefinition] {
        assert!(kind.is_a(TokenKind::Colon));
        assert!(kind.is_a(TokenKind::Separator));
        assert!(kind.is_a(TokenKind::Operator));
    }
    assert!(!TokenKind::DefaultDef.is_a(TokenKind::Colon));
}

#[test]
fn definition_is_keyword() {
    assert!(TokenKind::Definition.is_a(TokenKind::Keyword));
    assert!(!TokenKind::Keyword.is_a(TokenKind::Definition));
}

#[test]
fn roots_have_no_parent() {
    for kind in [
        TokenKind::Name,
        TokenKind::FunctionName,
        TokenKind::Operator,
        TokenKind::LambdaBody,
        TokenKind::End,
    ] {
        assert_eq!(kind.parent(), None);
        assert!(kind.is_a(kind));
    }
}

#[test]
fn debug_shows_kind_and_text() {
    assert_eq!(
        format!("{:?}", Token::new(TokenKind::DottedName, "int")),
        "DottedName(\"int\")"
    );
    assert_eq!(format!("{:?}", Token::end()), "End");
    assert_eq!(Token::end().text(), "");
}

#[test]
fn bracket_and_layout_classification() {
    let open = Token::new(TokenKind::EndSeparator, "(");
    let close = Token::new(TokenKind::EndSeparator, "]");
    let newline = Token::new(TokenKind::EndSeparator, "\n");
    let comment = Token::new(TokenKind::EndSeparator, "  # note");
    let star = Token::new(TokenKind::EndSeparator, "*");
    let comma = Token::new(TokenKind::Separator, ",");

    assert!(open.is_opener() && !open.is_closer());
    assert!(close.is_closer() && !close.is_opener());
    assert!(newline.is_layout());
    assert!(comment.is_layout());
    assert!(!star.is_layout());
    assert!(!comma.is_layout());
}
