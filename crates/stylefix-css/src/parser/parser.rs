//! CSS Parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
//!
//! "The input to the parsing stage is a stream of tokens from the tokenization stage."
//!
//! The tree keeps enough of the source to be printed back out: rule preludes
//! stay as component values, and `url(...)` references are lifted into their
//! own [`ComponentValue::Url`] nodes so they can be found and edited in place.

use stylefix_common::warning::warn_once;

use crate::serializer::{escape_string_body, escape_url_body};
use crate::tokenizer::CSSToken;

/// [§ 5.4.4 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-a-declaration)
///
/// A CSS declaration (e.g., `color: red`).
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// The property name.
    pub name: String,
    /// The property value as component values.
    pub value: Vec<ComponentValue>,
    /// Whether the declaration has `!important`.
    pub important: bool,
}

/// The argument of a `url(...)` reference, in source form.
///
/// `text` holds the code points as they would be written in the stylesheet,
/// escapes included, so it can be handed to the url rewriter unchanged and
/// printed back verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlValue {
    /// `url(images/a.png)` - the text between the parentheses.
    Raw(String),
    /// `url("images/a.png")` - the text between the quotes.
    Quoted {
        /// The quote the string was written with.
        quote: char,
        /// The code points between the quotes.
        text: String,
    },
}

impl UrlValue {
    /// The source text, without surrounding quotes for the quoted form.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Raw(text) | Self::Quoted { text, .. } => text,
        }
    }
}

/// [§ 5.4.9 Consume a component value](https://www.w3.org/TR/css-syntax-3/#consume-component-value)
///
/// A component value in a declaration or prelude.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentValue {
    /// A preserved token.
    Token(CSSToken),
    /// A function with its contents.
    Function {
        /// The function name.
        name: String,
        /// The function arguments.
        value: Vec<ComponentValue>,
    },
    /// A simple block.
    Block {
        /// The opening token character.
        token: char,
        /// The block contents.
        value: Vec<ComponentValue>,
    },
    /// A `url(...)` reference, from a `<url-token>` or a `url(` function
    /// whose only argument is a string.
    Url(UrlValue),
}

/// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
///
/// A CSS style rule (selector prelude + declarations).
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    /// The selector list (or keyframe selector) as component values.
    pub prelude: Vec<ComponentValue>,
    /// The declarations in this rule block.
    pub declarations: Vec<Declaration>,
}

/// The block of an at-rule, parsed according to what the at-rule holds.
#[derive(Debug, Clone, PartialEq)]
pub enum AtRuleBlock {
    /// Conditional group and keyframes rules (`@media`, `@supports`, `@keyframes`, ...).
    Rules(Vec<Rule>),
    /// Descriptor blocks (`@font-face`, `@page`, `@counter-style`, ...).
    Declarations(Vec<Declaration>),
}

/// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-an-at-rule)
///
/// A CSS at-rule.
#[derive(Debug, Clone, PartialEq)]
pub struct AtRule {
    /// The at-keyword name (without the `@`).
    pub name: String,
    /// The prelude component values.
    pub prelude: Vec<ComponentValue>,
    /// The optional block contents.
    pub block: Option<AtRuleBlock>,
}

/// [§ 5.4.1 Consume a list of rules](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules)
///
/// A CSS rule (either a style rule or an at-rule).
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// A style rule (qualified rule).
    Style(StyleRule),
    /// An at-rule.
    At(AtRule),
}

/// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
///
/// A parsed CSS stylesheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stylesheet {
    /// The list of rules in the stylesheet.
    pub rules: Vec<Rule>,
}

impl Stylesheet {
    /// Tokenize and parse `css`.
    #[must_use]
    pub fn parse(css: &str) -> Self {
        CSSParser::new(crate::tokenizer::tokenize(css)).parse_stylesheet()
    }
}

/// At-rules whose block contains rules rather than declarations.
///
/// Vendor prefixes are ignored, so `-webkit-keyframes` matches `keyframes`.
const RULE_LIST_AT_RULES: &[&str] = &[
    "media",
    "supports",
    "document",
    "layer",
    "container",
    "scope",
    "starting-style",
    "keyframes",
];

fn block_holds_rules(at_rule_name: &str) -> bool {
    let name = at_rule_name.to_ascii_lowercase();
    let unprefixed = name
        .strip_prefix('-')
        .and_then(|rest| rest.split_once('-'))
        .map_or(name.as_str(), |(_, rest)| rest);
    RULE_LIST_AT_RULES.contains(&unprefixed)
}

/// CSS parser
pub struct CSSParser {
    tokens: Vec<CSSToken>,
    position: usize,
}

impl CSSParser {
    /// Create a new parser from a list of tokens.
    #[must_use]
    pub const fn new(tokens: Vec<CSSToken>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
    pub fn parse_stylesheet(&mut self) -> Stylesheet {
        // "Consume a list of rules from input, with the top-level flag set."
        let rules = self.consume_list_of_rules(true);
        Stylesheet { rules }
    }

    /// [§ 5.3.6 Parse a list of declarations](https://www.w3.org/TR/css-syntax-3/#parse-list-of-declarations)
    ///
    /// Parse declarations from a style attribute or similar.
    pub fn parse_declaration_list(&mut self) -> Vec<Declaration> {
        self.consume_list_of_declarations()
    }

    /// [§ 5.4.1 Consume a list of rules](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules)
    ///
    /// When not at the top level, a `}` ends the list and is left for the caller.
    fn consume_list_of_rules(&mut self, top_level: bool) -> Vec<Rule> {
        let mut rules = Vec::new();

        loop {
            match self.peek() {
                Some(CSSToken::Whitespace) => self.advance(),

                None | Some(CSSToken::EOF) => return rules,

                Some(CSSToken::RightBrace) if !top_level => return rules,

                // "<CDO-token>" or "<CDC-token>": "If the top-level flag is set, do nothing."
                Some(CSSToken::CDO | CSSToken::CDC) if top_level => self.advance(),

                Some(CSSToken::AtKeyword(_)) => {
                    if let Some(at_rule) = self.consume_at_rule() {
                        rules.push(Rule::At(at_rule));
                    }
                }

                Some(_) => {
                    if let Some(rule) = self.consume_qualified_rule(top_level) {
                        rules.push(Rule::Style(rule));
                    }
                }
            }
        }
    }

    /// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
    fn consume_at_rule(&mut self) -> Option<AtRule> {
        let name = match self.consume() {
            Some(CSSToken::AtKeyword(name)) => name.clone(),
            _ => return None,
        };

        let mut prelude = Vec::new();

        loop {
            match self.peek() {
                // "<semicolon-token>": "Return the at-rule."
                Some(CSSToken::Semicolon) => {
                    self.advance();
                    return Some(AtRule {
                        name,
                        prelude,
                        block: None,
                    });
                }

                // A `}` closing an enclosing block also ends a block-less at-rule.
                None | Some(CSSToken::EOF | CSSToken::RightBrace) => {
                    return Some(AtRule {
                        name,
                        prelude,
                        block: None,
                    });
                }

                Some(CSSToken::LeftBrace) => {
                    self.advance();
                    let block = if block_holds_rules(&name) {
                        AtRuleBlock::Rules(self.consume_list_of_rules(false))
                    } else {
                        AtRuleBlock::Declarations(self.consume_list_of_declarations())
                    };
                    self.consume_closing_brace();
                    return Some(AtRule {
                        name,
                        prelude,
                        block: Some(block),
                    });
                }

                Some(_) => {
                    if let Some(value) = self.consume_component_value() {
                        prelude.push(value);
                    }
                }
            }
        }
    }

    /// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
    fn consume_qualified_rule(&mut self, top_level: bool) -> Option<StyleRule> {
        let mut prelude = Vec::new();

        loop {
            match self.peek() {
                // "<EOF-token>": "This is a parse error. Return nothing."
                None | Some(CSSToken::EOF) => {
                    warn_once("CSS", "dropped a rule prelude that ran into the end of input");
                    return None;
                }

                // Inside a block, a stray `}` ends the rule without a body.
                Some(CSSToken::RightBrace) if !top_level => {
                    warn_once("CSS", "dropped a rule prelude without a block");
                    return None;
                }

                Some(CSSToken::LeftBrace) => {
                    self.advance();
                    let declarations = self.consume_list_of_declarations();
                    self.consume_closing_brace();
                    return Some(StyleRule {
                        prelude,
                        declarations,
                    });
                }

                Some(_) => {
                    if let Some(value) = self.consume_component_value() {
                        prelude.push(value);
                    }
                }
            }
        }
    }

    /// [§ 5.4.7 Consume a simple block](https://www.w3.org/TR/css-syntax-3/#consume-simple-block)
    fn consume_simple_block(&mut self) -> Option<ComponentValue> {
        let (token, ending) = match self.consume() {
            Some(CSSToken::LeftBrace) => ('{', CSSToken::RightBrace),
            Some(CSSToken::LeftBracket) => ('[', CSSToken::RightBracket),
            Some(CSSToken::LeftParen) => ('(', CSSToken::RightParen),
            _ => return None,
        };

        let value = self.consume_values_until(&ending);
        Some(ComponentValue::Block { token, value })
    }

    /// Consume component values up to and including `ending` (or EOF).
    fn consume_values_until(&mut self, ending: &CSSToken) -> Vec<ComponentValue> {
        let mut value = Vec::new();
        loop {
            match self.peek() {
                Some(token) if token == ending => {
                    self.advance();
                    return value;
                }
                None | Some(CSSToken::EOF) => return value,
                Some(_) => {
                    if let Some(v) = self.consume_component_value() {
                        value.push(v);
                    }
                }
            }
        }
    }

    /// [§ 5.4.5 Consume a list of declarations](https://www.w3.org/TR/css-syntax-3/#consume-list-of-declarations)
    fn consume_list_of_declarations(&mut self) -> Vec<Declaration> {
        let mut declarations = Vec::new();

        loop {
            match self.peek() {
                Some(CSSToken::Whitespace | CSSToken::Semicolon) => self.advance(),

                None | Some(CSSToken::EOF | CSSToken::RightBrace) => return declarations,

                Some(CSSToken::AtKeyword(_)) => {
                    let _ = self.consume_at_rule();
                    warn_once("CSS", "dropped an at-rule inside a declaration block");
                }

                Some(CSSToken::Ident(_)) => {
                    if let Some(decl) = self.consume_declaration() {
                        declarations.push(decl);
                    }
                }

                // "anything else": "This is a parse error. ... consume a component
                // value and throw away the returned value" until `;`.
                Some(_) => {
                    warn_once("CSS", "dropped an invalid declaration");
                    self.skip_to_declaration_end();
                }
            }
        }
    }

    fn skip_to_declaration_end(&mut self) {
        while !matches!(
            self.peek(),
            None | Some(CSSToken::Semicolon | CSSToken::RightBrace | CSSToken::EOF)
        ) {
            let _ = self.consume_component_value();
        }
    }

    /// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
    fn consume_declaration(&mut self) -> Option<Declaration> {
        let name = match self.consume() {
            Some(CSSToken::Ident(name)) => name.clone(),
            _ => return None,
        };

        self.skip_whitespace();

        // "If the next input token is anything other than a <colon-token>, this is a parse error.
        // Return nothing."
        if self.peek() != Some(&CSSToken::Colon) {
            warn_once("CSS", &format!("dropped declaration '{name}' without a colon"));
            self.skip_to_declaration_end();
            return None;
        }
        self.advance();
        self.skip_whitespace();

        let mut value = Vec::new();
        while !matches!(
            self.peek(),
            None | Some(CSSToken::EOF | CSSToken::Semicolon | CSSToken::RightBrace)
        ) {
            if let Some(v) = self.consume_component_value() {
                value.push(v);
            }
        }

        let important = check_important(&value);
        let value = trim_important(value);

        Some(Declaration {
            name,
            value,
            important,
        })
    }

    /// [§ 5.4.9 Consume a component value](https://www.w3.org/TR/css-syntax-3/#consume-component-value)
    fn consume_component_value(&mut self) -> Option<ComponentValue> {
        match self.peek()? {
            CSSToken::LeftBrace | CSSToken::LeftBracket | CSSToken::LeftParen => {
                self.consume_simple_block()
            }

            CSSToken::Function(_) => {
                let name = match self.consume() {
                    Some(CSSToken::Function(name)) => name.clone(),
                    _ => return None,
                };
                let value = self.consume_values_until(&CSSToken::RightParen);
                Some(function_or_url(name, value))
            }

            CSSToken::Url(_) => match self.consume() {
                Some(CSSToken::Url(url)) => {
                    Some(ComponentValue::Url(UrlValue::Raw(escape_url_body(url))))
                }
                _ => None,
            },

            CSSToken::BadUrl => {
                self.advance();
                warn_once("CSS", "found a malformed url(), it is written back as url()");
                Some(ComponentValue::Token(CSSToken::BadUrl))
            }

            _ => self.consume().cloned().map(ComponentValue::Token),
        }
    }

    /// Consume the `}` that closes a block, if present.
    fn consume_closing_brace(&mut self) {
        if self.peek() == Some(&CSSToken::RightBrace) {
            self.advance();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek() == Some(&CSSToken::Whitespace) {
            self.advance();
        }
    }

    fn consume(&mut self) -> Option<&CSSToken> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }

    const fn advance(&mut self) {
        self.position += 1;
    }

    fn peek(&self) -> Option<&CSSToken> {
        self.tokens.get(self.position)
    }
}

/// A `url(` function token whose only non-whitespace argument is a string
/// becomes a quoted [`UrlValue`]; everything else stays a function.
fn function_or_url(name: String, value: Vec<ComponentValue>) -> ComponentValue {
    if name.eq_ignore_ascii_case("url") {
        let mut args = value
            .iter()
            .filter(|v| !matches!(v, ComponentValue::Token(CSSToken::Whitespace)));
        if let (Some(ComponentValue::Token(CSSToken::String { value: url, quote })), None) =
            (args.next(), args.next())
        {
            return ComponentValue::Url(UrlValue::Quoted {
                quote: *quote,
                text: escape_string_body(url, *quote),
            });
        }
    }
    ComponentValue::Function { name, value }
}

/// Check if the value ends with !important.
///
/// [§ 6.4.2 Important declarations](https://www.w3.org/TR/css-cascade-4/#importance)
///
/// "A declaration is important if it has a !important annotation, i.e.
/// if the last two (non-whitespace, non-comment) tokens in its value are
/// a <delim-token> with the value "!" followed by an <ident-token> with
/// a value that is an ASCII case-insensitive match for "important"."
fn check_important(value: &[ComponentValue]) -> bool {
    let mut significant = value
        .iter()
        .rev()
        .filter(|v| !matches!(v, ComponentValue::Token(CSSToken::Whitespace)));

    matches!(
        (significant.next(), significant.next()),
        (
            Some(ComponentValue::Token(CSSToken::Ident(ident))),
            Some(ComponentValue::Token(CSSToken::Delim('!'))),
        ) if ident.eq_ignore_ascii_case("important")
    )
}

/// Remove trailing whitespace and the !important annotation from a declaration value.
fn trim_important(mut value: Vec<ComponentValue>) -> Vec<ComponentValue> {
    let pop_whitespace = |value: &mut Vec<ComponentValue>| {
        while matches!(value.last(), Some(ComponentValue::Token(CSSToken::Whitespace))) {
            let _ = value.pop();
        }
    };

    pop_whitespace(&mut value);
    if check_important(&value) {
        // "important", any whitespace, then "!"
        let _ = value.pop();
        pop_whitespace(&mut value);
        let _ = value.pop();
        pop_whitespace(&mut value);
    }

    value
}
