//! Integration tests for the CSS tokenizer.

use stylefix_css::tokenizer::{CSSToken, CSSTokenizer, HashType, NumericType, tokenize};

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
}

/// The single token `input` produces, EOF excluded.
fn only_token(input: &str) -> CSSToken {
    let mut tokens = tokenize(input);
    assert_eq!(tokens.pop(), Some(CSSToken::EOF), "{input}");
    assert_eq!(tokens.len(), 1, "{input}: {tokens:?}");
    tokens.remove(0)
}

#[test]
fn test_whitespace_run_is_one_token() {
    assert_eq!(only_token("   \t\n  "), CSSToken::Whitespace);
}

#[test]
fn test_idents() {
    for name in ["color", "background-color", "_private", "é-accent"] {
        assert_eq!(only_token(name), CSSToken::ident(name));
    }
}

#[test]
fn test_function() {
    assert_eq!(only_token("rgb("), CSSToken::function("rgb"));
}

#[test]
fn test_at_keyword() {
    assert_eq!(only_token("@media"), CSSToken::AtKeyword("media".to_string()));
}

#[test]
fn test_hash_types() {
    // A hash is an "id" hash when its value would start an identifier.
    let cases = [
        ("#header", "header", HashType::Id),
        ("#ff0000", "ff0000", HashType::Id),
        ("#123", "123", HashType::Unrestricted),
        ("#-1", "-1", HashType::Unrestricted),
    ];
    for (input, value, hash_type) in cases {
        assert_eq!(
            only_token(input),
            CSSToken::Hash {
                value: value.to_string(),
                hash_type,
            },
            "{input}"
        );
    }
}

#[test]
fn test_lone_hash_is_delim() {
    assert_eq!(only_token("#"), CSSToken::Delim('#'));
}

#[test]
fn test_strings_remember_their_quote() {
    assert_eq!(only_token("\"hello world\""), CSSToken::quoted("hello world", '"'));
    assert_eq!(only_token("'hello world'"), CSSToken::quoted("hello world", '\''));
    assert_eq!(only_token("'it\"s'"), CSSToken::quoted("it\"s", '\''));
}

#[test]
fn test_string_escapes_are_decoded() {
    assert_eq!(only_token(r#""a\"b\41 c""#), CSSToken::string("a\"bAc"));
}

#[test]
fn test_string_escaped_newline_continues() {
    assert_eq!(only_token("\"ab\\\ncd\""), CSSToken::string("abcd"));
}

#[test]
fn test_string_with_newline_is_bad() {
    let tokens = tokenize("\"abc\ndef");
    assert_eq!(tokens[0], CSSToken::BadString);
    assert_eq!(tokens[1], CSSToken::Whitespace);
    assert_eq!(tokens[2], CSSToken::ident("def"));
}

#[test]
fn test_unterminated_string_ends_at_eof() {
    assert_eq!(only_token("'abc"), CSSToken::quoted("abc", '\''));
}

#[test]
fn test_integers() {
    for (input, value) in [("42", 42.0), ("-10", -10.0), ("+7", 7.0)] {
        let CSSToken::Number(number) = only_token(input) else {
            panic!("Expected Number token for {input}");
        };
        assert_close(number.value, value);
        assert_eq!(number.repr, input);
        assert_eq!(number.numeric_type, NumericType::Integer);
    }
}

#[test]
fn test_non_integers() {
    for (input, value) in [("3.25", 3.25), ("1e10", 1e10), ("2E-2", 0.02), (".5", 0.5)] {
        let CSSToken::Number(number) = only_token(input) else {
            panic!("Expected Number token for {input}");
        };
        assert_close(number.value, value);
        assert_eq!(number.numeric_type, NumericType::Number);
    }
}

#[test]
fn test_percentage() {
    let CSSToken::Percentage(number) = only_token("50%") else {
        panic!("Expected Percentage token");
    };
    assert_close(number.value, 50.0);
}

#[test]
fn test_dimensions() {
    let cases = [("16px", 16.0, "px"), ("1.5em", 1.5, "em"), ("2e3ms", 2000.0, "ms")];
    for (input, value, expected_unit) in cases {
        let CSSToken::Dimension { number, unit } = only_token(input) else {
            panic!("Expected Dimension token for {input}");
        };
        assert_close(number.value, value);
        assert_eq!(unit, expected_unit);
    }
}

#[test]
fn test_exponent_needs_a_digit() {
    // "1e" is the number 1 with the unit "e".
    let CSSToken::Dimension { number, unit } = only_token("1e") else {
        panic!("Expected Dimension token");
    };
    assert_eq!(number.repr, "1");
    assert_eq!(unit, "e");
}

#[test]
fn test_punctuation() {
    let tokens = tokenize(":;,{}[]()");
    assert_eq!(
        tokens,
        vec![
            CSSToken::Colon,
            CSSToken::Semicolon,
            CSSToken::Comma,
            CSSToken::LeftBrace,
            CSSToken::RightBrace,
            CSSToken::LeftBracket,
            CSSToken::RightBracket,
            CSSToken::LeftParen,
            CSSToken::RightParen,
            CSSToken::EOF,
        ]
    );
}

#[test]
fn test_comment_is_skipped() {
    let tokens = tokenize("/* comment */ color");
    assert_eq!(
        tokens,
        vec![CSSToken::Whitespace, CSSToken::ident("color"), CSSToken::EOF]
    );
}

#[test]
fn test_cdo_cdc() {
    let tokens = tokenize("<!-- -->");
    assert_eq!(
        tokens,
        vec![CSSToken::CDO, CSSToken::Whitespace, CSSToken::CDC, CSSToken::EOF]
    );
}

#[test]
fn test_url_unquoted() {
    assert_eq!(only_token("url(image.png)"), CSSToken::url("image.png"));
}

#[test]
fn test_declaration_tokens() {
    assert_eq!(
        tokenize("color: red;"),
        vec![
            CSSToken::ident("color"),
            CSSToken::Colon,
            CSSToken::Whitespace,
            CSSToken::ident("red"),
            CSSToken::Semicolon,
            CSSToken::EOF,
        ]
    );
}

#[test]
fn test_class_selector() {
    assert_eq!(
        tokenize(".container"),
        vec![CSSToken::Delim('.'), CSSToken::ident("container"), CSSToken::EOF]
    );
}

#[test]
fn test_escaped_character() {
    // \41 is 'A'; the space after the hex digits belongs to the escape.
    assert_eq!(only_token("\\41 "), CSSToken::ident("A"));
}

#[test]
fn test_escape_out_of_range_is_replacement() {
    assert_eq!(only_token("\\110000"), CSSToken::ident("\u{FFFD}"));
}

#[test]
fn test_tokenizer_keeps_tokens() {
    let mut tokenizer = CSSTokenizer::new("a b");
    tokenizer.run();
    assert_eq!(tokenizer.tokens().len(), 4);
    assert_eq!(tokenizer.into_tokens(), tokenize("a b"));
}

#[test]
fn test_number_keeps_source_representation() {
    let tokens = tokenize("+.50 1E3 -0");
    assert_eq!(tokens[0], CSSToken::number("+.50"));
    assert_eq!(tokens[2], CSSToken::number("1E3"));
    assert_eq!(tokens[4], CSSToken::number("-0"));
}

#[test]
fn test_url_uppercase_function_name() {
    let tokens = tokenize("URL(a.png)");
    assert_eq!(tokens[0], CSSToken::url("a.png"));
}

#[test]
fn test_url_surrounding_whitespace_is_dropped() {
    let tokens = tokenize("url(   a.png   )");
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0], CSSToken::url("a.png"));
}

#[test]
fn test_url_escapes_are_decoded() {
    let tokens = tokenize(r"url(a\ b\).png)");
    assert_eq!(tokens[0], CSSToken::url("a b).png"));
}

#[test]
fn test_url_quoted_is_a_function() {
    // A quoted argument makes `url(` an ordinary function token followed by
    // a string token.
    let tokens = tokenize("url( \"a.png\")");
    assert_eq!(tokens[0], CSSToken::function("url"));
    assert_eq!(tokens[1], CSSToken::Whitespace);
    assert_eq!(tokens[2], CSSToken::string("a.png"));
    assert_eq!(tokens[3], CSSToken::RightParen);
}

#[test]
fn test_url_with_inner_whitespace_is_bad() {
    let tokens = tokenize("url(a b) x");
    assert_eq!(tokens[0], CSSToken::BadUrl);
    assert_eq!(tokens[1], CSSToken::Whitespace);
    assert_eq!(tokens[2], CSSToken::ident("x"));
}

#[test]
fn test_url_with_quote_inside_is_bad() {
    let tokens = tokenize("url(a\"b)");
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0], CSSToken::BadUrl);
}

#[test]
fn test_url_unterminated_at_eof() {
    let tokens = tokenize("url(a.png");
    assert_eq!(tokens, vec![CSSToken::url("a.png"), CSSToken::EOF]);
}

#[test]
fn test_preprocessing_normalizes_newlines() {
    let tokens = tokenize("a\r\nb\x0Cc");
    assert_eq!(
        tokens,
        vec![
            CSSToken::ident("a"),
            CSSToken::Whitespace,
            CSSToken::ident("b"),
            CSSToken::Whitespace,
            CSSToken::ident("c"),
            CSSToken::EOF,
        ]
    );
}

#[test]
fn test_unterminated_comment_reaches_eof() {
    let tokens = tokenize("a /* never closed");
    assert_eq!(
        tokens,
        vec![CSSToken::ident("a"), CSSToken::Whitespace, CSSToken::EOF]
    );
}

#[test]
fn test_at_sign_without_name_is_delim() {
    let tokens = tokenize("@ 1");
    assert_eq!(tokens[0], CSSToken::Delim('@'));
}

#[test]
fn test_custom_property_name() {
    let tokens = tokenize("--main-color");
    assert_eq!(tokens[0], CSSToken::ident("--main-color"));
}

#[test]
fn test_token_display() {
    let rendered: Vec<String> = tokenize("a{b:url(c)}")
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        rendered,
        [
            "<ident:a>",
            "<{>",
            "<ident:b>",
            "<colon>",
            "<url:c>",
            "<}>",
            "<EOF>"
        ]
    );
}
