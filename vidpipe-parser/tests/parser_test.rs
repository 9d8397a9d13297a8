use vidpipe_lexer::lex;
use vidpipe_parser::{parse, Connection, Expr, ParseError};

fn parse_str(input: &str) -> Result<Expr, ParseError> {
    parse(lex(input))
}

#[test]
fn simple_pipeline_is_right_associative() {
    let tree = parse_str("a -> b -> c").unwrap();
    assert_eq!(
        tree,
        Expr::Pipeline(
            Box::new(Expr::function("a")),
            Box::new(Expr::Pipeline(
                Box::new(Expr::function("b")),
                Box::new(Expr::function("c")),
                Connection::Sync,
                0,
            )),
            Connection::Sync,
            0,
        )
    );
}

#[test]
fn parallel_branches_accumulate_left_to_right() {
    let tree = parse_str("a &> b &> c").unwrap();
    assert_eq!(
        tree,
        Expr::Parallel(vec![
            Expr::function("a"),
            Expr::function("b"),
            Expr::function("c"),
        ])
    );
}

#[test]
fn choice_branches_accumulate_left_to_right() {
    let tree = parse_str("a | b | c").unwrap();
    assert_eq!(
        tree,
        Expr::Choice(vec![
            Expr::function("a"),
            Expr::function("b"),
            Expr::function("c"),
        ])
    );
}

#[test]
fn bracketed_capacity_is_buffered() {
    let tree = parse_str("a [5]-> b").unwrap();
    assert_eq!(
        tree,
        Expr::Pipeline(
            Box::new(Expr::function("a")),
            Box::new(Expr::function("b")),
            Connection::Buffered,
            5,
        )
    );
}

#[test]
fn bare_brackets_default_to_capacity_ten() {
    let tree = parse_str("a []-> b").unwrap();
    assert_eq!(
        tree,
        Expr::Pipeline(
            Box::new(Expr::function("a")),
            Box::new(Expr::function("b")),
            Connection::Buffered,
            10,
        )
    );
}

#[test]
fn bracket_without_trailing_arrow_falls_back_to_sync_but_keeps_capacity() {
    let tree = parse_str("a [3] b").unwrap();
    assert_eq!(
        tree,
        Expr::Pipeline(
            Box::new(Expr::function("a")),
            Box::new(Expr::function("b")),
            Connection::Sync,
            3,
        )
    );
}

#[test]
fn bracket_followed_by_sync_arrow_decodes_to_sync() {
    let tree = parse_str("a [3]=> b").unwrap();
    assert_eq!(
        tree,
        Expr::Pipeline(
            Box::new(Expr::function("a")),
            Box::new(Expr::function("b")),
            Connection::Sync,
            3,
        )
    );
}

#[test]
fn bracket_followed_by_async_arrow_decodes_to_async() {
    let tree = parse_str("a [3]~> b").unwrap();
    assert_eq!(
        tree,
        Expr::Pipeline(
            Box::new(Expr::function("a")),
            Box::new(Expr::function("b")),
            Connection::Async,
            3,
        )
    );
}

#[test]
fn async_arrow_decodes_to_async_connection() {
    let tree = parse_str("a ~> b").unwrap();
    assert_eq!(
        tree,
        Expr::Pipeline(
            Box::new(Expr::function("a")),
            Box::new(Expr::function("b")),
            Connection::Async,
            0,
        )
    );
}

#[test]
fn merge_binds_looser_than_pipeline_connectors() {
    let tree = parse_str("a -> b +> c -> d").unwrap();
    assert_eq!(
        tree,
        Expr::Pipeline(
            Box::new(Expr::function("a")),
            Box::new(Expr::Merge(
                Box::new(Expr::function("b")),
                Box::new(Expr::Pipeline(
                    Box::new(Expr::function("c")),
                    Box::new(Expr::function("d")),
                    Connection::Sync,
                    0,
                )),
            )),
            Connection::Sync,
            0,
        )
    );
}

#[test]
fn parenthesized_group_overrides_precedence() {
    let tree = parse_str("(a -> b) &> c").unwrap();
    match tree {
        Expr::Parallel(branches) => {
            assert_eq!(branches.len(), 2);
        }
        other => panic!("expected a parallel expression, got {other:?}"),
    }
}

#[test]
fn loop_wraps_its_body() {
    let tree = parse_str("{ src -> id }").unwrap();
    assert_eq!(
        tree,
        Expr::Loop(Box::new(Expr::Pipeline(
            Box::new(Expr::function("src")),
            Box::new(Expr::function("id")),
            Connection::Sync,
            0,
        )))
    );
}

#[test]
fn missing_closing_paren_is_a_parse_error() {
    let err = parse_str("(a -> b").unwrap_err();
    assert!(matches!(err, ParseError::MissingClosing { .. }));
}

#[test]
fn missing_closing_brace_is_a_parse_error() {
    let err = parse_str("{ a -> b").unwrap_err();
    assert!(matches!(err, ParseError::MissingClosing { .. }));
}

#[test]
fn double_connector_is_an_unexpected_token_error() {
    let err = parse_str("a -> -> b").unwrap_err();
    match err {
        ParseError::UnexpectedToken { position, .. } => {
            assert_eq!(position.column, 6);
        }
        other => panic!("expected an unexpected-token error, got {other:?}"),
    }
}

#[test]
fn trailing_tokens_after_a_complete_expression_are_rejected() {
    let err = parse_str("a -> b c").unwrap_err();
    assert!(matches!(err, ParseError::TrailingTokens { .. }));
}

#[test]
fn empty_input_is_unexpected_eof() {
    let err = parse_str("").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedEof { .. }));
}

proptest::proptest! {
    #[test]
    fn parse_never_panics_on_arbitrary_token_streams(input in ".{0,64}") {
        let _ = parse_str(&input);
    }
}
