//! Mutable traversal of a parsed stylesheet.
//!
//! The visitor sees every component value exactly once, parents before
//! children, in document order. Alongside each value it gets a [`WalkContext`]
//! saying where the value sits, which is how callers tell a `url()` in a
//! declaration apart from one in an `@import` prelude.

use crate::parser::{AtRuleBlock, ComponentValue, Declaration, Rule, Stylesheet, UrlValue};

/// Where a visited value sits in the stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkContext<'a> {
    /// Name of the enclosing declaration, if any.
    pub declaration: Option<&'a str>,
    /// Name of the innermost enclosing at-rule, if any.
    pub at_rule: Option<&'a str>,
}

impl WalkContext<'_> {
    /// Whether the value is part of a declaration's value.
    #[must_use]
    pub const fn in_declaration(&self) -> bool {
        self.declaration.is_some()
    }
}

/// Visit every component value in `stylesheet`.
///
/// Values the visitor replaces are descended into after replacement.
pub fn walk_mut<F>(stylesheet: &mut Stylesheet, visitor: &mut F)
where
    F: FnMut(&mut ComponentValue, &WalkContext<'_>),
{
    let context = WalkContext {
        declaration: None,
        at_rule: None,
    };
    walk_rules(&mut stylesheet.rules, context, visitor);
}

/// Visit every `url()` node that is part of a declaration value.
///
/// Returns how many nodes were visited.
pub fn walk_declaration_urls_mut<F>(stylesheet: &mut Stylesheet, mut visitor: F) -> usize
where
    F: FnMut(&mut UrlValue, &WalkContext<'_>),
{
    let mut visited = 0;
    walk_mut(
        stylesheet,
        &mut |value: &mut ComponentValue, context: &WalkContext<'_>| {
            if !context.in_declaration() {
                return;
            }
            if let ComponentValue::Url(url) = value {
                visited += 1;
                visitor(url, context);
            }
        },
    );
    visited
}

fn walk_rules<F>(rules: &mut [Rule], context: WalkContext<'_>, visitor: &mut F)
where
    F: FnMut(&mut ComponentValue, &WalkContext<'_>),
{
    for rule in rules {
        match rule {
            Rule::Style(style) => {
                walk_values(&mut style.prelude, &context, visitor);
                walk_declarations(&mut style.declarations, context, visitor);
            }
            Rule::At(at_rule) => {
                let inner = WalkContext {
                    declaration: None,
                    at_rule: Some(&at_rule.name),
                };
                walk_values(&mut at_rule.prelude, &inner, visitor);
                match &mut at_rule.block {
                    Some(AtRuleBlock::Rules(rules)) => walk_rules(rules, inner, visitor),
                    Some(AtRuleBlock::Declarations(declarations)) => {
                        walk_declarations(declarations, inner, visitor);
                    }
                    None => {}
                }
            }
        }
    }
}

fn walk_declarations<F>(declarations: &mut [Declaration], context: WalkContext<'_>, visitor: &mut F)
where
    F: FnMut(&mut ComponentValue, &WalkContext<'_>),
{
    for Declaration { name, value, .. } in declarations {
        let inner = WalkContext {
            declaration: Some(name.as_str()),
            ..context
        };
        walk_values(value, &inner, visitor);
    }
}

fn walk_values<F>(values: &mut [ComponentValue], context: &WalkContext<'_>, visitor: &mut F)
where
    F: FnMut(&mut ComponentValue, &WalkContext<'_>),
{
    for value in values {
        visitor(value, context);
        match value {
            ComponentValue::Function { value, .. } | ComponentValue::Block { value, .. } => {
                walk_values(value, context, visitor);
            }
            ComponentValue::Token(_) | ComponentValue::Url(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_urls_carry_their_context() {
        let mut stylesheet =
            Stylesheet::parse("@import url(a.css);@media print{a{background:url(b.png)}}");
        let mut seen = Vec::new();
        let visited = walk_declaration_urls_mut(&mut stylesheet, |url, context| {
            seen.push((
                url.text().to_string(),
                context.declaration.map(str::to_string),
                context.at_rule.map(str::to_string),
            ));
        });
        assert_eq!(visited, 1);
        assert_eq!(
            seen,
            [(
                "b.png".to_string(),
                Some("background".to_string()),
                Some("media".to_string())
            )]
        );
    }

    #[test]
    fn test_walk_mut_visits_parents_before_children() {
        let mut stylesheet = Stylesheet::parse("a{b:f(g(1))}");
        let mut names = Vec::new();
        walk_mut(&mut stylesheet, &mut |value: &mut ComponentValue, _: &WalkContext<'_>| {
            if let ComponentValue::Function { name, .. } = value {
                names.push(name.clone());
            }
        });
        assert_eq!(names, ["f", "g"]);
    }
}
