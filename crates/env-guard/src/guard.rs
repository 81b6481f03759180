//! Guard expressions.
//!
//! A guard expression decides whether a test applies to the deployment under
//! test, e.g. `is_mk and not (is_fuel or has_ceph)`. The grammar is closed:
//!
//! ```text
//! or_expr  := and_expr ("or" and_expr)*
//! and_expr := not_expr ("and" not_expr)*
//! not_expr := "not" not_expr | primary
//! primary  := IDENT | "(" or_expr ")"
//! ```
//!
//! Expressions are tokenized on whitespace and parenthesis boundaries only, so
//! an identifier is always compared as a whole token (`is_mk` never matches
//! inside `is_mk2`). Identifiers are resolved against a [`PredicateSource`] at
//! evaluation time; nothing else is ever executed.

use crate::environment::EnvironmentDescription;
use crate::error::GuardError;
use crate::predicates::{is_valid_guard_name, PredicateSource};
use std::collections::HashMap;
use std::fmt;

/// Parentheses and `not` chains nested deeper than this are rejected.
pub const MAX_NESTING_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    LParen,
    RParen,
    And,
    Or,
    Not,
    Ident(String),
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::And => "operator 'and'".to_string(),
            Token::Or => "operator 'or'".to_string(),
            Token::Not => "operator 'not'".to_string(),
            Token::Ident(name) => format!("guard '{name}'"),
        }
    }
}

fn tokenize(text: &str) -> Vec<Token> {
    fn flush(word: &mut String, tokens: &mut Vec<Token>) {
        if word.is_empty() {
            return;
        }
        let token = match word.as_str() {
            "and" => Token::And,
            "or" => Token::Or,
            "not" => Token::Not,
            _ => Token::Ident(word.clone()),
        };
        tokens.push(token);
        word.clear();
    }

    let mut tokens = Vec::new();
    let mut word = String::new();

    for ch in text.chars() {
        match ch {
            '(' | ')' => {
                flush(&mut word, &mut tokens);
                tokens.push(if ch == '(' {
                    Token::LParen
                } else {
                    Token::RParen
                });
            }
            c if c.is_whitespace() => flush(&mut word, &mut tokens),
            c => word.push(c),
        }
    }
    flush(&mut word, &mut tokens);

    tokens
}

// `and`/`or` chains are flat operand lists, so tree depth grows only with
// parentheses and `not`, both of which are capped by `MAX_NESTING_DEPTH`.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Guard(String),
    Not(Box<Node>),
    And(Vec<Node>),
    Or(Vec<Node>),
}

impl Node {
    fn eval(&self, values: &HashMap<&str, bool>) -> Option<bool> {
        Some(match self {
            Node::Guard(name) => *values.get(name.as_str())?,
            Node::Not(inner) => !inner.eval(values)?,
            Node::And(operands) => operands
                .iter()
                .try_fold(true, |acc, operand| Some(operand.eval(values)? && acc))?,
            Node::Or(operands) => operands
                .iter()
                .try_fold(false, |acc, operand| Some(operand.eval(values)? || acc))?,
        })
    }
}

struct Parser<'a> {
    text: &'a str,
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str, tokens: &'a [Token]) -> Self {
        Self {
            text,
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn parse(mut self) -> Result<Node, GuardError> {
        if self.tokens.is_empty() {
            return Err(GuardError::malformed(self.text, "empty expression"));
        }

        let root = self.parse_or()?;

        match self.peek() {
            None => Ok(root),
            Some(Token::RParen) => Err(self.error("unbalanced parentheses: unexpected ')'")),
            Some(token) => {
                let reason = format!("unexpected {} after complete expression", token.describe());
                Err(self.error(reason))
            }
        }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn error(&self, reason: impl Into<String>) -> GuardError {
        GuardError::malformed(self.text, reason)
    }

    fn descend(&mut self) -> Result<(), GuardError> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(self.error(format!(
                "nesting deeper than {MAX_NESTING_DEPTH} levels"
            )));
        }
        Ok(())
    }

    fn parse_or(&mut self) -> Result<Node, GuardError> {
        let mut operands = vec![self.parse_and()?];
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            operands.push(self.parse_and()?);
        }
        Ok(collapse(operands, Node::Or))
    }

    fn parse_and(&mut self) -> Result<Node, GuardError> {
        let mut operands = vec![self.parse_not()?];
        while self.peek() == Some(&Token::And) {
            self.pos += 1;
            operands.push(self.parse_not()?);
        }
        Ok(collapse(operands, Node::And))
    }

    fn parse_not(&mut self) -> Result<Node, GuardError> {
        if self.peek() != Some(&Token::Not) {
            return self.parse_primary();
        }

        self.pos += 1;
        self.descend()?;
        let inner = self.parse_not()?;
        self.depth -= 1;
        Ok(Node::Not(Box::new(inner)))
    }

    fn parse_primary(&mut self) -> Result<Node, GuardError> {
        match self.next() {
            Some(Token::Ident(name)) => Ok(Node::Guard(name.clone())),
            Some(Token::LParen) => {
                self.descend()?;
                let inner = self.parse_or()?;
                match self.next() {
                    Some(Token::RParen) => {
                        self.depth -= 1;
                        Ok(inner)
                    }
                    None => Err(self.error("unbalanced parentheses: missing ')'")),
                    Some(token) => Err(self.error(format!(
                        "expected ')' but found {}",
                        token.describe()
                    ))),
                }
            }
            Some(Token::RParen) => Err(self.error("unexpected ')' where a guard was expected")),
            Some(token) => Err(self.error(format!(
                "unexpected {} where a guard was expected",
                token.describe()
            ))),
            None => Err(self.error("unexpected end of expression")),
        }
    }
}

fn collapse(mut operands: Vec<Node>, chain: fn(Vec<Node>) -> Node) -> Node {
    if operands.len() == 1 {
        if let Some(only) = operands.pop() {
            return only;
        }
    }
    chain(operands)
}

/// Result of evaluating a guard expression, with the substituted rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardOutcome {
    /// Final decision.
    pub value: bool,
    /// The expression with every guard replaced by its value,
    /// e.g. `true and not false`.
    pub computed: String,
}

/// A parsed, immutable guard expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardExpression {
    source: String,
    tokens: Vec<Token>,
    root: Node,
}

impl GuardExpression {
    /// Parse a guard expression.
    ///
    /// # Errors
    ///
    /// Returns `GuardError::MalformedGuard` for an empty expression, unbalanced
    /// parentheses, a stray operator or operand, or excessive nesting.
    pub fn parse(text: &str) -> Result<Self, GuardError> {
        let tokens = tokenize(text);
        let root = Parser::new(text, &tokens).parse()?;

        Ok(Self {
            source: text.to_string(),
            tokens,
            root,
        })
    }

    /// Combine the arguments of a test's guard marker with `and`.
    ///
    /// Each argument must be a complete expression on its own; parentheses
    /// cannot pair up across arguments.
    ///
    /// # Errors
    ///
    /// Returns `GuardError::MalformedGuard` if there are no arguments or any
    /// argument fails to parse.
    pub fn from_markers<S: AsRef<str>>(markers: &[S]) -> Result<Self, GuardError> {
        let source = match markers {
            [single] => single.as_ref().to_string(),
            _ => markers
                .iter()
                .map(|marker| format!("({})", marker.as_ref()))
                .collect::<Vec<String>>()
                .join(" and "),
        };

        let mut parsed = markers
            .iter()
            .map(|marker| Self::parse(marker.as_ref()));

        let Some(first) = parsed.next() else {
            return Err(GuardError::malformed(&source, "no guard markers"));
        };
        let first = first?;

        let mut rest = parsed.peekable();
        if rest.peek().is_none() {
            return Ok(first);
        }

        let mut tokens = wrap(first.tokens);
        let mut operands = vec![first.root];
        for expression in rest {
            let expression = expression?;
            tokens.push(Token::And);
            tokens.extend(wrap(expression.tokens));
            operands.push(expression.root);
        }

        Ok(Self {
            source,
            tokens,
            root: Node::And(operands),
        })
    }

    /// The text this expression was parsed from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Distinct guard names in order of first appearance.
    #[must_use]
    pub fn guards(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for token in &self.tokens {
            if let Token::Ident(name) = token {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Evaluate against an environment.
    ///
    /// # Errors
    ///
    /// - `GuardError::UnknownGuard` - a guard is missing from `source`
    /// - `GuardError::MalformedGuard` - a guard violates the `is_`/`has_` naming rule
    pub fn evaluate<S>(&self, source: &S, env: &EnvironmentDescription) -> Result<bool, GuardError>
    where
        S: PredicateSource + ?Sized,
    {
        self.evaluate_detailed(source, env).map(|outcome| outcome.value)
    }

    /// Evaluate against an environment, also returning the computed rendering.
    ///
    /// Every guard is resolved and invoked, including guards in branches that
    /// do not affect the result, so a bad name is reported regardless of the
    /// environment.
    ///
    /// # Errors
    ///
    /// Same as [`GuardExpression::evaluate`].
    pub fn evaluate_detailed<S>(
        &self,
        source: &S,
        env: &EnvironmentDescription,
    ) -> Result<GuardOutcome, GuardError>
    where
        S: PredicateSource + ?Sized,
    {
        let mut values: HashMap<&str, bool> = HashMap::new();

        for name in self.guards() {
            let Some(predicate) = source.predicate(name) else {
                tracing::error!(
                    target: "env_guard.guard",
                    guard = %name,
                    expression = %self.source,
                    "Guard not found"
                );
                return Err(GuardError::UnknownGuard {
                    name: name.to_string(),
                    expression: self.source.clone(),
                });
            };

            if !is_valid_guard_name(name) {
                tracing::error!(
                    target: "env_guard.guard",
                    guard = %name,
                    expression = %self.source,
                    "Guard must start with \"is_\" or \"has_\""
                );
                return Err(GuardError::malformed(
                    &self.source,
                    format!("guard must start with \"is_\" or \"has_\", got {name} instead"),
                ));
            }

            values.insert(name, predicate(env));
        }

        let value = self
            .root
            .eval(&values)
            .ok_or_else(|| GuardError::malformed(&self.source, "unresolved guard"))?;
        let computed = render(&self.tokens, |name| {
            values.get(name).map_or("?", |v| if *v { "true" } else { "false" })
        });

        tracing::debug!(
            target: "env_guard.guard",
            expression = %self.source,
            computed = %computed,
            result = value,
            "Evaluated guard expression"
        );

        Ok(GuardOutcome { value, computed })
    }
}

impl fmt::Display for GuardExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(&self.tokens, |name| name))
    }
}

fn wrap(tokens: Vec<Token>) -> Vec<Token> {
    let mut wrapped = Vec::with_capacity(tokens.len() + 2);
    wrapped.push(Token::LParen);
    wrapped.extend(tokens);
    wrapped.push(Token::RParen);
    wrapped
}

/// Render tokens as canonical text, mapping each guard through `guard`.
fn render<'t, F>(tokens: &'t [Token], guard: F) -> String
where
    F: Fn(&'t str) -> &'t str,
{
    let mut out = String::new();
    let mut after_lparen = true;

    for token in tokens {
        let text = match token {
            Token::LParen => "(",
            Token::RParen => ")",
            Token::And => "and",
            Token::Or => "or",
            Token::Not => "not",
            Token::Ident(name) => guard(name),
        };
        if !after_lparen && *token != Token::RParen {
            out.push(' ');
        }
        out.push_str(text);
        after_lparen = *token == Token::LParen;
    }

    out
}

/// Parse and evaluate `text` in one step.
///
/// # Errors
///
/// Any error from [`GuardExpression::parse`] or [`GuardExpression::evaluate`].
pub fn evaluate<S>(text: &str, source: &S, env: &EnvironmentDescription) -> Result<bool, GuardError>
where
    S: PredicateSource + ?Sized,
{
    GuardExpression::parse(text)?.evaluate(source, env)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::predicates::{PredicateFn, PredicateRegistry};
    use serde_json::json;
    use std::collections::BTreeMap;

    fn mk_env() -> EnvironmentDescription {
        EnvironmentDescription::from_value(json!({"env": {"type": "mk"}}))
    }

    fn registry() -> PredicateRegistry {
        let mut registry = PredicateRegistry::with_builtin();
        registry.register("has_ceph", |_| false).unwrap();
        registry.register("has_swift", |_| true).unwrap();
        registry.register("is_mk2", |_| false).unwrap();
        registry
    }

    /// A source that does not enforce the naming rule.
    struct LooseSource(BTreeMap<&'static str, PredicateFn>);

    impl PredicateSource for LooseSource {
        fn predicate(&self, name: &str) -> Option<PredicateFn> {
            self.0.get(name).copied()
        }
    }

    fn malformed_reason(result: Result<impl fmt::Debug, GuardError>) -> String {
        match result {
            Err(GuardError::MalformedGuard { reason, .. }) => reason,
            other => panic!("expected MalformedGuard, got {other:?}"),
        }
    }

    #[test]
    fn test_tokenize_splits_on_parens_and_whitespace() {
        let tokens = tokenize("(is_mk)and\tnot  has_ceph");
        assert_eq!(
            tokens,
            vec![
                Token::LParen,
                Token::Ident("is_mk".to_string()),
                Token::RParen,
                Token::And,
                Token::Not,
                Token::Ident("has_ceph".to_string()),
            ]
        );
    }

    #[test]
    fn test_tokenize_keywords_are_whole_words() {
        // "android" and "order" are identifiers, not keywords
        let tokens = tokenize("android order NOT");
        assert_eq!(
            tokens,
            vec![
                Token::Ident("android".to_string()),
                Token::Ident("order".to_string()),
                Token::Ident("NOT".to_string()),
            ]
        );
    }

    #[test]
    fn test_single_guard() {
        assert_eq!(evaluate("is_mk", &registry(), &mk_env()), Ok(true));
        assert_eq!(evaluate("is_fuel", &registry(), &mk_env()), Ok(false));
    }

    #[test]
    fn test_and_with_false_guard() {
        assert_eq!(evaluate("is_mk and has_ceph", &registry(), &mk_env()), Ok(false));
    }

    #[test]
    fn test_precedence_not_over_and_over_or() {
        let registry = registry();
        let env = mk_env();
        // is_fuel or (is_mk and (not has_ceph))
        assert_eq!(evaluate("is_fuel or is_mk and not has_ceph", &registry, &env), Ok(true));
        // (not is_mk) or has_swift
        assert_eq!(evaluate("not is_mk or has_swift", &registry, &env), Ok(true));
        // (has_swift or is_fuel) and has_ceph
        assert_eq!(evaluate("(has_swift or is_fuel) and has_ceph", &registry, &env), Ok(false));
        // has_swift or (is_fuel and has_ceph)
        assert_eq!(evaluate("has_swift or is_fuel and has_ceph", &registry, &env), Ok(true));
        assert_eq!(evaluate("not not is_mk", &registry, &env), Ok(true));
        assert_eq!(evaluate("not (is_mk and has_swift)", &registry, &env), Ok(false));
    }

    #[test]
    fn test_substring_collision_is_safe() {
        // is_mk is true, is_mk2 is false: they must not be confused
        let registry = registry();
        assert_eq!(evaluate("is_mk2", &registry, &mk_env()), Ok(false));
        assert_eq!(evaluate("is_mk and not is_mk2", &registry, &mk_env()), Ok(true));
    }

    #[test]
    fn test_unknown_guard() {
        let result = evaluate("unknown_flag", &registry(), &mk_env());
        assert_eq!(
            result,
            Err(GuardError::UnknownGuard {
                name: "unknown_flag".to_string(),
                expression: "unknown_flag".to_string(),
            })
        );
    }

    #[test]
    fn test_unknown_guard_in_short_circuited_branch() {
        // is_mk is true, so "or" never needs is_missing, but it is still reported
        let result = evaluate("is_mk or has_missing", &registry(), &mk_env());
        assert!(matches!(result, Err(GuardError::UnknownGuard { name, .. }) if name == "has_missing"));
    }

    #[test]
    fn test_registered_guard_with_bad_name() {
        let source = LooseSource(BTreeMap::from([
            ("maybe_mk", crate::predicates::is_mk as PredicateFn),
        ]));
        let reason = malformed_reason(evaluate("maybe_mk", &source, &mk_env()));
        assert!(reason.contains("got maybe_mk instead"));
    }

    #[test]
    fn test_malformed_structure() {
        let registry = registry();
        let env = mk_env();
        let cases = [
            ("", "empty expression"),
            ("   ", "empty expression"),
            ("(is_mk", "missing ')'"),
            ("is_mk)", "unexpected ')'"),
            ("()", "unexpected ')'"),
            ("is_mk and", "unexpected end"),
            ("and is_mk", "operator 'and'"),
            ("is_mk or or is_fuel", "operator 'or'"),
            ("is_mk is_fuel", "after complete expression"),
            ("not", "unexpected end"),
            ("(is_mk is_fuel)", "expected ')'"),
        ];

        for (text, expected) in cases {
            let reason = malformed_reason(evaluate(text, &registry, &env));
            assert!(
                reason.contains(expected),
                "'{text}': reason '{reason}' should mention '{expected}'"
            );
        }
    }

    #[test]
    fn test_malformed_error_carries_expression() {
        let err = GuardExpression::parse("(is_mk").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Malformed guard expression '(is_mk': unbalanced parentheses: missing ')'"
        );
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}is_mk{}", "(".repeat(MAX_NESTING_DEPTH), ")".repeat(MAX_NESTING_DEPTH));
        assert!(GuardExpression::parse(&deep).is_ok());

        let too_deep = format!(
            "{}is_mk{}",
            "(".repeat(MAX_NESTING_DEPTH + 1),
            ")".repeat(MAX_NESTING_DEPTH + 1)
        );
        let reason = malformed_reason(GuardExpression::parse(&too_deep));
        assert!(reason.contains("nesting deeper"));

        let nots = format!("{}is_mk", "not ".repeat(MAX_NESTING_DEPTH + 1));
        assert!(GuardExpression::parse(&nots).is_err());
    }

    #[test]
    fn test_flat_chains_parse_as_operand_lists() {
        let expression = GuardExpression::parse("is_mk and has_ceph and is_fuel or has_swift").unwrap();
        let guard = |name: &str| Node::Guard(name.to_string());
        assert_eq!(
            expression.root,
            Node::Or(vec![
                Node::And(vec![guard("is_mk"), guard("has_ceph"), guard("is_fuel")]),
                guard("has_swift"),
            ])
        );
    }

    #[test]
    fn test_long_flat_chains_evaluate() {
        let registry = registry();
        let empty = EnvironmentDescription::empty();

        let or_chain = vec!["is_mk"; 20_000].join(" or ");
        assert_eq!(evaluate(&or_chain, &registry, &empty), Ok(false));
        assert_eq!(evaluate(&or_chain, &registry, &mk_env()), Ok(true));

        let and_chain = vec!["is_mk"; 200_000].join(" and ");
        let expression = GuardExpression::parse(&and_chain).unwrap();
        assert_eq!(expression.evaluate(&registry, &mk_env()), Ok(true));
        assert_eq!(expression.clone(), expression);

        let mixed = format!("{and_chain} and has_ceph");
        assert_eq!(evaluate(&mixed, &registry, &mk_env()), Ok(false));
    }

    #[test]
    fn test_truth_table_matches_boolean_algebra() {
        fn t(_: &EnvironmentDescription) -> bool {
            true
        }
        fn f(_: &EnvironmentDescription) -> bool {
            false
        }

        type Reference = fn(bool, bool, bool) -> bool;
        let expressions: [(&str, Reference); 6] = [
            ("is_a and is_b or is_c", |a, b, c| (a && b) || c),
            ("is_a or is_b and is_c", |a, b, c| a || (b && c)),
            ("not is_a and (is_b or not is_c)", |a, b, c| !a && (b || !c)),
            ("not (is_a or is_b) or is_c", |a, b, c| !(a || b) || c),
            ("is_a and not is_b and not not is_c", |a, b, c| a && !b && c),
            ("(is_a or is_b) and (is_b or is_c) and not (is_a and is_c)", |a, b, c| {
                (a || b) && (b || c) && !(a && c)
            }),
        ];

        let env = EnvironmentDescription::empty();
        for bits in 0..8u8 {
            let (a, b, c) = (bits & 1 != 0, bits & 2 != 0, bits & 4 != 0);
            let pick = |v: bool| if v { t as PredicateFn } else { f as PredicateFn };
            let mut registry = PredicateRegistry::new();
            registry.register("is_a", pick(a)).unwrap();
            registry.register("is_b", pick(b)).unwrap();
            registry.register("is_c", pick(c)).unwrap();

            for (text, reference) in &expressions {
                assert_eq!(
                    evaluate(text, &registry, &env),
                    Ok(reference(a, b, c)),
                    "'{text}' with a={a} b={b} c={c}"
                );
            }
        }
    }

    #[test]
    fn test_repeated_evaluation_is_stable() {
        let registry = registry();
        let expression = GuardExpression::parse("is_mk and (has_swift or has_ceph)").unwrap();
        let mk = mk_env();
        let fuel = EnvironmentDescription::from_value(json!({"env": {"type": "fuel"}}));

        for _ in 0..3 {
            assert_eq!(expression.evaluate(&registry, &mk), Ok(true));
            assert_eq!(expression.evaluate(&registry, &fuel), Ok(false));
        }
    }

    #[test]
    fn test_display_and_computed_rendering() {
        let expression = GuardExpression::parse("( is_mk or is_fuel )and not has_ceph").unwrap();
        assert_eq!(expression.to_string(), "(is_mk or is_fuel) and not has_ceph");

        let outcome = expression.evaluate_detailed(&registry(), &mk_env()).unwrap();
        assert!(outcome.value);
        assert_eq!(outcome.computed, "(true or false) and not false");
    }

    #[test]
    fn test_guards_in_order_of_appearance() {
        let expression = GuardExpression::parse("has_ceph or (is_mk and has_ceph) or is_fuel").unwrap();
        assert_eq!(expression.guards(), vec!["has_ceph", "is_mk", "is_fuel"]);
    }

    #[test]
    fn test_from_markers_single() {
        let expression = GuardExpression::from_markers(&["is_mk or is_fuel"]).unwrap();
        assert_eq!(expression.to_string(), "is_mk or is_fuel");
        assert_eq!(expression.source(), "is_mk or is_fuel");
    }

    #[test]
    fn test_from_markers_groups_each_argument() {
        // Without grouping this would read "has_swift or (is_fuel and has_ceph)"
        let expression = GuardExpression::from_markers(&["has_swift or is_fuel", "has_ceph"]).unwrap();
        assert_eq!(expression.to_string(), "(has_swift or is_fuel) and (has_ceph)");
        assert_eq!(expression.source(), "(has_swift or is_fuel) and (has_ceph)");
        assert_eq!(expression.evaluate(&registry(), &mk_env()), Ok(false));
    }

    #[test]
    fn test_from_markers_rejects_cross_argument_parens() {
        // Each half is unbalanced on its own even though the joined text is not
        let result = GuardExpression::from_markers(&["is_mk) or (is_fuel", "has_ceph"]);
        assert!(matches!(result, Err(GuardError::MalformedGuard { .. })));
    }

    #[test]
    fn test_from_markers_errors_report_grouped_source() {
        let expression = GuardExpression::from_markers(&["is_mk or is_fuel", "has_missing"]).unwrap();
        assert_eq!(
            expression.evaluate(&registry(), &mk_env()),
            Err(GuardError::UnknownGuard {
                name: "has_missing".to_string(),
                expression: "(is_mk or is_fuel) and (has_missing)".to_string(),
            })
        );
    }

    #[test]
    fn test_from_markers_empty() {
        let markers: [&str; 0] = [];
        let reason = malformed_reason(GuardExpression::from_markers(&markers));
        assert_eq!(reason, "no guard markers");
    }

    #[test]
    fn test_evaluate_through_trait_object() {
        let registry = registry();
        let source: &dyn PredicateSource = &registry;
        assert_eq!(evaluate("is_mk", source, &mk_env()), Ok(true));
    }
}
