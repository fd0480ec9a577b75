use super::token::{CSSToken, HashType, Numeric};

/// [§ 4.3 Tokenizer Algorithms](https://www.w3.org/TR/css-syntax-3/#tokenizer-algorithms)
///
/// CSS tokenizer following CSS Syntax Module Level 3.
///
/// [§ 3.3 Preprocessing the input stream](https://www.w3.org/TR/css-syntax-3/#input-preprocessing)
/// is applied up front: CR, FF, and CR LF become LF, and U+0000 becomes U+FFFD.
pub struct CSSTokenizer {
    /// The preprocessed input
    input: Vec<char>,
    /// Index of the next input code point
    position: usize,
    /// Collected tokens
    tokens: Vec<CSSToken>,
}

impl CSSTokenizer {
    /// Create a new CSS tokenizer with the given input.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self {
            input: preprocess(input),
            position: 0,
            tokens: Vec::new(),
        }
    }

    /// Tokenize the whole input. The last collected token is always EOF.
    pub fn run(&mut self) {
        loop {
            let token = self.consume_token();
            let done = token.is_eof();
            self.tokens.push(token);
            if done {
                break;
            }
        }
    }

    /// Return the collected tokens.
    #[must_use]
    pub fn into_tokens(self) -> Vec<CSSToken> {
        self.tokens
    }

    /// Return a reference to the collected tokens.
    #[must_use]
    pub fn tokens(&self) -> &[CSSToken] {
        &self.tokens
    }

    /// [§ 4.3.1 Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    fn consume_token(&mut self) -> CSSToken {
        // "Consume comments."
        self.consume_comments();

        let Some(c) = self.consume() else {
            return CSSToken::EOF;
        };

        match c {
            c if is_whitespace(c) => {
                self.consume_whitespace();
                CSSToken::Whitespace
            }

            '"' | '\'' => self.consume_string_token(c),

            '#' => {
                // "If the next input code point is an ident code point or the next
                // two input code points are a valid escape..."
                if self.peek().is_some_and(is_ident_code_point)
                    || is_valid_escape(self.peek(), self.peek_at(1))
                {
                    let hash_type = if self.starts_ident_sequence(0) {
                        HashType::Id
                    } else {
                        HashType::Unrestricted
                    };
                    CSSToken::Hash {
                        value: self.consume_ident_sequence(),
                        hash_type,
                    }
                } else {
                    CSSToken::Delim('#')
                }
            }

            '(' => CSSToken::LeftParen,
            ')' => CSSToken::RightParen,
            ',' => CSSToken::Comma,
            ':' => CSSToken::Colon,
            ';' => CSSToken::Semicolon,
            '[' => CSSToken::LeftBracket,
            ']' => CSSToken::RightBracket,
            '{' => CSSToken::LeftBrace,
            '}' => CSSToken::RightBrace,

            '+' | '.' if self.starts_number(-1) => {
                self.reconsume();
                self.consume_numeric_token()
            }

            '-' => {
                if self.starts_number(-1) {
                    self.reconsume();
                    self.consume_numeric_token()
                } else if self.peek() == Some('-') && self.peek_at(1) == Some('>') {
                    // "-->"
                    self.position += 2;
                    CSSToken::CDC
                } else if self.starts_ident_sequence(-1) {
                    self.reconsume();
                    self.consume_ident_like_token()
                } else {
                    CSSToken::Delim('-')
                }
            }

            '<' if self.lookahead_is("!--") => {
                self.position += 3;
                CSSToken::CDO
            }

            '@' if self.starts_ident_sequence(0) => {
                CSSToken::AtKeyword(self.consume_ident_sequence())
            }

            '\\' if is_valid_escape(Some('\\'), self.peek()) => {
                self.reconsume();
                self.consume_ident_like_token()
            }

            c if c.is_ascii_digit() => {
                self.reconsume();
                self.consume_numeric_token()
            }

            c if is_ident_start_code_point(c) => {
                self.reconsume();
                self.consume_ident_like_token()
            }

            // "anything else"
            c => CSSToken::Delim(c),
        }
    }

    /// [§ 4.3.2 Consume comments](https://www.w3.org/TR/css-syntax-3/#consume-comment)
    fn consume_comments(&mut self) {
        while self.lookahead_is("/*") {
            self.position += 2;
            loop {
                if self.lookahead_is("*/") {
                    self.position += 2;
                    break;
                }
                // EOF inside a comment just ends it.
                if self.consume().is_none() {
                    break;
                }
            }
        }
    }

    fn consume_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            self.position += 1;
        }
    }

    /// [§ 4.3.5 Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    fn consume_string_token(&mut self, quote: char) -> CSSToken {
        let mut value = String::new();

        loop {
            match self.consume() {
                // "ending code point" / "EOF"
                Some(c) if c == quote => break,
                None => break,

                // "newline"
                // "This is a parse error. Reconsume the current input code point,
                // create a <bad-string-token>, and return it."
                Some('\n') => {
                    self.reconsume();
                    return CSSToken::BadString;
                }

                Some('\\') => match self.peek() {
                    None => {}
                    // Escaped newline is a line continuation.
                    Some('\n') => self.position += 1,
                    Some(_) => value.push(self.consume_escaped_code_point()),
                },

                Some(c) => value.push(c),
            }
        }

        CSSToken::String { value, quote }
    }

    /// [§ 4.3.3 Consume a numeric token](https://www.w3.org/TR/css-syntax-3/#consume-numeric-token)
    fn consume_numeric_token(&mut self) -> CSSToken {
        let number = Numeric::from_repr(self.consume_number());

        if self.starts_ident_sequence(0) {
            let unit = self.consume_ident_sequence();
            CSSToken::Dimension { number, unit }
        } else if self.peek() == Some('%') {
            self.position += 1;
            CSSToken::Percentage(number)
        } else {
            CSSToken::Number(number)
        }
    }

    /// [§ 4.3.4 Consume an ident-like token](https://www.w3.org/TR/css-syntax-3/#consume-ident-like-token)
    fn consume_ident_like_token(&mut self) -> CSSToken {
        let string = self.consume_ident_sequence();

        if self.peek() != Some('(') {
            return CSSToken::Ident(string);
        }
        self.position += 1;

        if !string.eq_ignore_ascii_case("url") {
            return CSSToken::Function(string);
        }

        // "While the next two input code points are whitespace, consume the next
        // input code point."
        while self.peek().is_some_and(is_whitespace) && self.peek_at(1).is_some_and(is_whitespace)
        {
            self.position += 1;
        }

        // "If the next one or two input code points are U+0022 QUOTATION MARK ("),
        // U+0027 APOSTROPHE ('), or whitespace followed by U+0022 QUOTATION MARK (")
        // or U+0027 APOSTROPHE ('), then create a <function-token> with its value
        // set to string and return it."
        let next_is_quote = |c: Option<char>| matches!(c, Some('"' | '\''));
        if next_is_quote(self.peek())
            || (self.peek().is_some_and(is_whitespace) && next_is_quote(self.peek_at(1)))
        {
            CSSToken::Function(string)
        } else {
            self.consume_url_token()
        }
    }

    /// [§ 4.3.6 Consume a url token](https://www.w3.org/TR/css-syntax-3/#consume-url-token)
    fn consume_url_token(&mut self) -> CSSToken {
        let mut value = String::new();
        self.consume_whitespace();

        loop {
            match self.consume() {
                // ")" or EOF ends the url.
                Some(')') | None => return CSSToken::Url(value),

                Some(c) if is_whitespace(c) => {
                    self.consume_whitespace();
                    return match self.peek() {
                        Some(')') => {
                            self.position += 1;
                            CSSToken::Url(value)
                        }
                        None => CSSToken::Url(value),
                        Some(_) => self.consume_bad_url_remnants(),
                    };
                }

                Some('"' | '\'' | '(') => return self.consume_bad_url_remnants(),
                Some(c) if is_non_printable(c) => return self.consume_bad_url_remnants(),

                Some('\\') => {
                    if is_valid_escape(Some('\\'), self.peek()) {
                        value.push(self.consume_escaped_code_point());
                    } else {
                        return self.consume_bad_url_remnants();
                    }
                }

                Some(c) => value.push(c),
            }
        }
    }

    /// [§ 4.3.14 Consume the remnants of a bad url](https://www.w3.org/TR/css-syntax-3/#consume-remnants-of-bad-url)
    fn consume_bad_url_remnants(&mut self) -> CSSToken {
        loop {
            match self.consume() {
                Some(')') | None => return CSSToken::BadUrl,
                Some('\\') if is_valid_escape(Some('\\'), self.peek()) => {
                    let _ = self.consume_escaped_code_point();
                }
                Some(_) => {}
            }
        }
    }

    /// [§ 4.3.11 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    fn consume_ident_sequence(&mut self) -> String {
        let mut result = String::new();

        while let Some(c) = self.peek() {
            if is_ident_code_point(c) {
                self.position += 1;
                result.push(c);
            } else if is_valid_escape(Some(c), self.peek_at(1)) {
                self.position += 1;
                result.push(self.consume_escaped_code_point());
            } else {
                break;
            }
        }

        result
    }

    /// [§ 4.3.12 Consume a number](https://www.w3.org/TR/css-syntax-3/#consume-number)
    ///
    /// Returns the representation only; [`Numeric::from_repr`] derives the
    /// value and type flag from it.
    fn consume_number(&mut self) -> String {
        let mut repr = String::new();

        if let Some(sign @ ('+' | '-')) = self.peek() {
            self.position += 1;
            repr.push(sign);
        }
        self.consume_digits(&mut repr);

        // Fraction: "." followed by a digit.
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            self.position += 1;
            repr.push('.');
            self.consume_digits(&mut repr);
        }

        // Exponent: "e" or "E", an optional sign, then a digit.
        if let Some(e @ ('e' | 'E')) = self.peek() {
            let sign = self.peek_at(1).filter(|&c| matches!(c, '+' | '-'));
            let digit_at = if sign.is_some() { 2 } else { 1 };
            if self.peek_at(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                self.position += digit_at;
                repr.push(e);
                repr.extend(sign);
                self.consume_digits(&mut repr);
            }
        }

        repr
    }

    fn consume_digits(&mut self, repr: &mut String) {
        while let Some(c) = self.peek().filter(char::is_ascii_digit) {
            self.position += 1;
            repr.push(c);
        }
    }

    /// [§ 4.3.7 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point)
    ///
    /// Assumes the U+005C REVERSE SOLIDUS has already been consumed.
    fn consume_escaped_code_point(&mut self) -> char {
        let Some(c) = self.consume() else {
            // "EOF: This is a parse error. Return U+FFFD REPLACEMENT CHARACTER."
            return char::REPLACEMENT_CHARACTER;
        };

        let Some(first) = c.to_digit(16) else {
            return c;
        };

        // "Consume as many hex digits as possible, but no more than 5."
        let mut code_point = first;
        for _ in 0..5 {
            match self.peek().and_then(|c| c.to_digit(16)) {
                Some(digit) => {
                    self.position += 1;
                    code_point = code_point * 16 + digit;
                }
                None => break,
            }
        }

        // "If the next input code point is whitespace, consume it as well."
        if self.peek().is_some_and(is_whitespace) {
            self.position += 1;
        }

        // Zero, surrogates, and values past U+10FFFF all map to U+FFFD.
        if code_point == 0 {
            char::REPLACEMENT_CHARACTER
        } else {
            char::from_u32(code_point).unwrap_or(char::REPLACEMENT_CHARACTER)
        }
    }

    /// [§ 4.3.9 Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
    ///
    /// `offset` is relative to the next input code point; `-1` means "starting
    /// with the current input code point".
    fn starts_ident_sequence(&self, offset: isize) -> bool {
        let first = self.peek_rel(offset);
        let second = self.peek_rel(offset + 1);
        match first {
            Some('-') => {
                second.is_some_and(|c| is_ident_start_code_point(c) || c == '-')
                    || is_valid_escape(second, self.peek_rel(offset + 2))
            }
            Some('\\') => is_valid_escape(first, second),
            Some(c) => is_ident_start_code_point(c),
            None => false,
        }
    }

    /// [§ 4.3.10 Check if three code points would start a number](https://www.w3.org/TR/css-syntax-3/#starts-with-a-number)
    fn starts_number(&self, offset: isize) -> bool {
        let digit_at = |o: isize| self.peek_rel(o).is_some_and(|c| c.is_ascii_digit());
        match self.peek_rel(offset) {
            Some('+' | '-') => {
                digit_at(offset + 1)
                    || (self.peek_rel(offset + 1) == Some('.') && digit_at(offset + 2))
            }
            Some('.') => digit_at(offset + 1),
            Some(c) => c.is_ascii_digit(),
            None => false,
        }
    }

    fn lookahead_is(&self, expected: &str) -> bool {
        expected
            .chars()
            .enumerate()
            .all(|(i, c)| self.peek_at(i) == Some(c))
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += 1;
        Some(c)
    }

    const fn reconsume(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn peek_rel(&self, offset: isize) -> Option<char> {
        let index = self.position.checked_add_signed(offset)?;
        self.input.get(index).copied()
    }
}

/// Tokenize `input` in one go.
#[must_use]
pub fn tokenize(input: &str) -> Vec<CSSToken> {
    let mut tokenizer = CSSTokenizer::new(input);
    tokenizer.run();
    tokenizer.into_tokens()
}

/// [§ 3.3 Preprocessing the input stream](https://www.w3.org/TR/css-syntax-3/#input-preprocessing)
fn preprocess(input: &str) -> Vec<char> {
    let mut out = Vec::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                let _ = chars.next_if_eq(&'\n');
                out.push('\n');
            }
            '\x0C' => out.push('\n'),
            '\0' => out.push(char::REPLACEMENT_CHARACTER),
            c => out.push(c),
        }
    }
    out
}

/// [§ 4.3.8 Check if two code points are a valid escape](https://www.w3.org/TR/css-syntax-3/#starts-with-a-valid-escape)
fn is_valid_escape(first: Option<char>, second: Option<char>) -> bool {
    first == Some('\\') && second != Some('\n')
}

/// [§ 4.2 Definitions - whitespace](https://www.w3.org/TR/css-syntax-3/#whitespace)
///
/// "A newline, U+0009 CHARACTER TABULATION, or U+0020 SPACE."
pub(crate) const fn is_whitespace(c: char) -> bool {
    matches!(c, '\n' | '\t' | ' ')
}

/// [§ 4.2 Definitions - non-printable code point](https://www.w3.org/TR/css-syntax-3/#non-printable-code-point)
pub(crate) const fn is_non_printable(c: char) -> bool {
    matches!(c, '\0'..='\x08' | '\x0B' | '\x0E'..='\x1F' | '\x7F')
}

/// [§ 4.2 Definitions - ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
///
/// "A letter, a non-ASCII code point, or U+005F LOW LINE (_)."
pub(crate) const fn is_ident_start_code_point(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// [§ 4.2 Definitions - ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
///
/// "An ident-start code point, a digit, or U+002D HYPHEN-MINUS (-)."
pub(crate) const fn is_ident_code_point(c: char) -> bool {
    is_ident_start_code_point(c) || c.is_ascii_digit() || c == '-'
}
