//! Stylesheet printer.
//!
//! [CSSOM § 2.1 Common Serializing Idioms](https://drafts.csswg.org/cssom/#common-serializing-idioms)
//!
//! Output is compact: no comments, whitespace runs collapsed to one space,
//! rules written back to back (`a{color:red}b{margin:0}`). Identifiers and
//! strings are re-escaped so the printed sheet tokenizes back to the same tree.

use core::fmt::Write as _;

use crate::parser::{AtRule, AtRuleBlock, ComponentValue, Declaration, Rule, Stylesheet, UrlValue};
use crate::tokenizer::CSSToken;
use crate::tokenizer::tokenizer::{is_ident_code_point, is_non_printable, is_whitespace};

/// Print a stylesheet back to CSS text.
#[must_use]
pub fn translate(stylesheet: &Stylesheet) -> String {
    let mut out = String::new();
    write_rules(&mut out, &stylesheet.rules);
    out
}

/// Print a single declaration (`name:value` plus `!important`).
#[must_use]
pub fn translate_declaration(declaration: &Declaration) -> String {
    let mut out = String::new();
    write_declaration(&mut out, declaration);
    out
}

fn write_rules(out: &mut String, rules: &[Rule]) {
    for rule in rules {
        match rule {
            Rule::Style(style) => {
                write_values(out, &style.prelude);
                write_declaration_block(out, &style.declarations);
            }
            Rule::At(at_rule) => write_at_rule(out, at_rule),
        }
    }
}

fn write_at_rule(out: &mut String, at_rule: &AtRule) {
    out.push('@');
    write_identifier(out, &at_rule.name);

    // The prelude keeps one separating space when the source had one, but a
    // prelude that starts with `(` or a string does not need it.
    let starts_with_space = at_rule.prelude.first().is_some_and(is_whitespace_value);
    let mut prelude = String::new();
    write_values(&mut prelude, &at_rule.prelude);
    if starts_with_space && !prelude.is_empty() {
        out.push(' ');
    }
    out.push_str(&prelude);

    match &at_rule.block {
        None => out.push(';'),
        Some(AtRuleBlock::Rules(rules)) => {
            out.push('{');
            write_rules(out, rules);
            out.push('}');
        }
        Some(AtRuleBlock::Declarations(declarations)) => {
            write_declaration_block(out, declarations);
        }
    }
}

fn write_declaration_block(out: &mut String, declarations: &[Declaration]) {
    out.push('{');
    for (i, declaration) in declarations.iter().enumerate() {
        if i > 0 {
            out.push(';');
        }
        write_declaration(out, declaration);
    }
    out.push('}');
}

fn write_declaration(out: &mut String, declaration: &Declaration) {
    write_identifier(out, &declaration.name);
    out.push(':');
    write_values(out, &declaration.value);
    if declaration.important {
        out.push_str("!important");
    }
}

/// Write component values with leading and trailing whitespace dropped and
/// inner whitespace runs collapsed.
fn write_values(out: &mut String, values: &[ComponentValue]) {
    let start = values.iter().position(|v| !is_whitespace_value(v));
    let end = values.iter().rposition(|v| !is_whitespace_value(v));
    let (Some(start), Some(end)) = (start, end) else {
        return;
    };

    let mut previous_was_space = false;
    for value in &values[start..=end] {
        let is_space = is_whitespace_value(value);
        if !(is_space && previous_was_space) {
            write_value(out, value);
        }
        previous_was_space = is_space;
    }
}

fn write_value(out: &mut String, value: &ComponentValue) {
    match value {
        ComponentValue::Token(token) => write_token(out, token),
        ComponentValue::Function { name, value } => {
            write_identifier(out, name);
            out.push('(');
            write_values(out, value);
            out.push(')');
        }
        ComponentValue::Block { token, value } => {
            let closing = match token {
                '{' => '}',
                '[' => ']',
                _ => ')',
            };
            out.push(*token);
            write_values(out, value);
            out.push(closing);
        }
        ComponentValue::Url(url) => write_url(out, url),
    }
}

fn write_url(out: &mut String, url: &UrlValue) {
    out.push_str("url(");
    match url {
        UrlValue::Raw(text) => out.push_str(text),
        UrlValue::Quoted { quote, text } => {
            out.push(*quote);
            out.push_str(text);
            out.push(*quote);
        }
    }
    out.push(')');
}

fn write_token(out: &mut String, token: &CSSToken) {
    match token {
        CSSToken::Ident(name) => write_identifier(out, name),
        CSSToken::Function(name) => {
            write_identifier(out, name);
            out.push('(');
        }
        CSSToken::AtKeyword(name) => {
            out.push('@');
            write_identifier(out, name);
        }
        CSSToken::Hash { value, .. } => {
            out.push('#');
            write_name(out, value);
        }
        CSSToken::String { value, quote } => {
            out.push(*quote);
            out.push_str(&escape_string_body(value, *quote));
            out.push(*quote);
        }
        // The bad string's code points are already gone, and its newline
        // follows as whitespace.
        CSSToken::BadString | CSSToken::EOF => {}
        CSSToken::Url(url) => {
            out.push_str("url(");
            out.push_str(&escape_url_body(url));
            out.push(')');
        }
        CSSToken::BadUrl => out.push_str("url()"),
        CSSToken::Delim(c) => out.push(*c),
        CSSToken::Number(n) => out.push_str(&n.repr),
        CSSToken::Percentage(n) => {
            out.push_str(&n.repr);
            out.push('%');
        }
        CSSToken::Dimension { number, unit } => {
            out.push_str(&number.repr);
            write_identifier(out, unit);
        }
        CSSToken::Whitespace => out.push(' '),
        CSSToken::CDO => out.push_str("<!--"),
        CSSToken::CDC => out.push_str("-->"),
        CSSToken::Colon => out.push(':'),
        CSSToken::Semicolon => out.push(';'),
        CSSToken::Comma => out.push(','),
        CSSToken::LeftBracket => out.push('['),
        CSSToken::RightBracket => out.push(']'),
        CSSToken::LeftParen => out.push('('),
        CSSToken::RightParen => out.push(')'),
        CSSToken::LeftBrace => out.push('{'),
        CSSToken::RightBrace => out.push('}'),
    }
}

fn is_whitespace_value(value: &ComponentValue) -> bool {
    matches!(value, ComponentValue::Token(CSSToken::Whitespace))
}

/// [CSSOM § 2.1 serialize an identifier](https://drafts.csswg.org/cssom/#serialize-an-identifier)
fn write_identifier(out: &mut String, ident: &str) {
    // "If the character is the first character and is a "-" (U+002D), and
    // there is no second character, then the escaped character."
    if ident == "-" {
        out.push_str("\\-");
        return;
    }

    let leading_hyphen = ident.starts_with('-');
    for (index, c) in ident.chars().enumerate() {
        match c {
            '\0' => out.push(char::REPLACEMENT_CHARACTER),
            c if is_non_printable(c) => write_escaped_code_point(out, c),
            // A digit may not start an identifier, nor follow a leading "-".
            c if c.is_ascii_digit() && (index == 0 || (index == 1 && leading_hyphen)) => {
                write_escaped_code_point(out, c);
            }
            c if is_ident_code_point(c) => out.push(c),
            c => {
                out.push('\\');
                out.push(c);
            }
        }
    }
}

/// Like [`write_identifier`] but without the start-of-identifier rules, for
/// hash values and units.
fn write_name(out: &mut String, name: &str) {
    for c in name.chars() {
        if is_ident_code_point(c) {
            out.push(c);
        } else if is_non_printable(c) {
            write_escaped_code_point(out, c);
        } else {
            out.push('\\');
            out.push(c);
        }
    }
}

/// "escaped as code point": `\` + lowercase hex + a space.
fn write_escaped_code_point(out: &mut String, c: char) {
    let _ = write!(out, "\\{:x} ", u32::from(c));
}

/// [CSSOM § 2.1 serialize a string](https://drafts.csswg.org/cssom/#serialize-a-string)
///
/// Returns the code points to place between `quote` characters.
#[must_use]
pub fn escape_string_body(value: &str, quote: char) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\0' => out.push(char::REPLACEMENT_CHARACTER),
            '\n' => out.push_str("\\a "),
            c if is_non_printable(c) => write_escaped_code_point(&mut out, c),
            c if c == quote || c == '\\' => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}

/// Source form of an unquoted `url(...)` argument.
///
/// Code points that would end or break a `<url-token>` are escaped.
#[must_use]
pub fn escape_url_body(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            c if is_whitespace(c) || is_non_printable(c) => write_escaped_code_point(&mut out, c),
            '"' | '\'' | '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}
