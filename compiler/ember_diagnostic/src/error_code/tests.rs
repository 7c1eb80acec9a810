use super::*;

#[test]
fn test_phase_ranges() {
    assert!(ErrorCode::E0002.is_lexer_error());
    assert!(ErrorCode::E1004.is_parser_error());
    assert!(ErrorCode::E2001.is_semantic_error());
    assert!(!ErrorCode::E5001.is_semantic_error());
    assert!(!ErrorCode::E2001.is_lexer_error());
}

#[test]
fn test_display_matches_as_str() {
    assert_eq!(ErrorCode::E2011.to_string(), "E2011");
    assert_eq!(ErrorCode::E9001.as_str(), "E9001");
    assert_eq!(ErrorCode::E2001.description(), "type mismatch");
}

#[test]
fn test_driver_codes() {
    assert_eq!(ErrorCode::E9003.as_str(), "E9003");
    assert_eq!(ErrorCode::E9003.description(), "code generation unavailable");
    assert!(!ErrorCode::E9003.is_parser_error());
}
