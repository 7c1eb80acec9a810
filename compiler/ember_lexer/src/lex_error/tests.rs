use super::*;

#[test]
fn messages_name_the_problem() {
    let err = LexError::new(LexErrorKind::UnexpectedChar('$'), Span::new(4, 5));
    assert_eq!(err.message(), "unexpected character '$'");
    assert_eq!(err.to_string(), "unexpected character '$' at 4..5");

    let err = LexError::new(LexErrorKind::InvalidEscape('q'), Span::new(0, 4));
    assert_eq!(err.message(), "unknown escape sequence `\\q`");
}
