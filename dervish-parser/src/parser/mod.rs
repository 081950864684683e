pub mod ast;
pub mod builder;
pub mod error;
pub mod token;
pub mod word;

use ast::{Literal, Node};
use builder::{Item, Template, TreeBuilder};
use error::{kind, Error};
use log::debug;
use std::collections::HashSet;
use super::tokenizer::{tokenize_complete, Token, TokenKind};
use token::op::{BinOpKind, UnaryOpKind};

/// A parser for a single math expression.
///
/// The set of declared variable names is required up front, since a run of letters such as
/// `xy` is split into variables differently depending on which names exist.
#[derive(Debug, Clone)]
pub struct Parser<'source, 'vars> {
    /// The tokens that this parser is currently parsing.
    tokens: Box<[Token<'source>]>,

    /// The index of the **next** token to be parsed.
    cursor: usize,

    /// The names that are recognized as variables.
    variables: &'vars HashSet<String>,
}

impl<'source, 'vars> Parser<'source, 'vars> {
    /// Create a new parser for the given source.
    pub fn new(source: &'source str, variables: &'vars HashSet<String>) -> Self {
        Self {
            tokens: tokenize_complete(source),
            cursor: 0,
            variables,
        }
    }

    /// Returns the next token to be parsed, advancing the cursor.
    fn next_token(&mut self) -> Option<Token<'source>> {
        let token = self.tokens.get(self.cursor).cloned();
        if token.is_some() {
            self.cursor += 1;
        }
        token
    }

    /// Returns the kind of the token `offset` places after the next one, without advancing the
    /// cursor.
    fn peek_kind(&self, offset: usize) -> Option<TokenKind> {
        self.tokens.get(self.cursor + offset).map(|token| token.kind)
    }

    /// Converts the tokens into a stream of items tagged with their bracket depth.
    ///
    /// Every unrecognized token and unbalanced bracket is reported, not just the first.
    pub fn items(&mut self) -> Result<Vec<Item>, Vec<Error>> {
        let mut items: Vec<Item> = Vec::new();
        let mut errors = Vec::new();

        // spans of the currently open brackets; the depth is the length of this stack
        let mut open = Vec::new();

        while let Some(token) = self.next_token() {
            let depth = open.len();
            let template = match token.kind {
                TokenKind::Whitespace => continue,
                TokenKind::OpenParen => {
                    open.push(token.span);
                    continue;
                },
                TokenKind::CloseParen => {
                    if open.pop().is_none() {
                        errors.push(Error::new(
                            vec![token.span],
                            kind::UnclosedParenthesis { opening: false },
                        ));
                    }
                    continue;
                },
                TokenKind::Add => Template::Binary(BinOpKind::Add),
                TokenKind::Mul => Template::Binary(BinOpKind::Mul),
                TokenKind::Div => Template::Binary(BinOpKind::Div),
                TokenKind::Exp => Template::Binary(BinOpKind::Exp),
                TokenKind::Sub => {
                    // binary only directly after an operand, unary everywhere else
                    let after_operand = items.last()
                        .map_or(false, |item| item.template.is_operand());
                    if after_operand {
                        Template::Binary(BinOpKind::Sub)
                    } else {
                        Template::Unary(UnaryOpKind::Neg)
                    }
                },
                TokenKind::Number => Template::Literal(Literal::Number(token.lexeme.to_string())),
                TokenKind::Word => {
                    match word::split_word(token.lexeme, token.span.start, self.variables) {
                        Ok(parts) => {
                            items.extend(parts.into_iter().map(|(template, span)| {
                                Item::new(template, depth, span)
                            }));
                            if let Some(last) = items.last_mut() {
                                if last.span.end == token.span.end
                                    && last.template == Template::Unary(UnaryOpKind::Log(10)) {
                                    self.log_base(last, &mut errors);
                                }
                            }
                        },
                        Err(word_errors) => errors.extend(word_errors),
                    }
                    continue;
                },
                TokenKind::Less | TokenKind::Greater | TokenKind::Symbol => {
                    errors.push(Error::new(
                        vec![token.span],
                        kind::UnrecognizedToken { token: token.lexeme.to_string() },
                    ));
                    continue;
                },
            };
            items.push(Item::new(template, depth, token.span));
        }

        errors.extend(open.into_iter().map(|span| {
            Error::new(vec![span], kind::UnclosedParenthesis { opening: true })
        }));

        if errors.is_empty() {
            debug!("tokenized {} items", items.len());
            Ok(items)
        } else {
            Err(errors)
        }
    }

    /// Parses the optional `<b>` base following a `log` keyword, updating the item in place.
    fn log_base(&mut self, log: &mut Item, errors: &mut Vec<Error>) {
        if self.peek_kind(0) != Some(TokenKind::Less) {
            return;
        }

        let less = self.next_token();
        let (Some(TokenKind::Number), Some(TokenKind::Greater)) = (self.peek_kind(0), self.peek_kind(1)) else {
            let end = less.map_or(log.span.end, |token| token.span.end);
            errors.push(Error::new(vec![log.span.start..end], kind::IncompleteLogBase));
            return;
        };
        let (Some(base), Some(greater)) = (self.next_token(), self.next_token()) else {
            return;
        };

        match base.lexeme.parse::<u32>() {
            Ok(value) if value >= 2 => {
                log.template = Template::Unary(UnaryOpKind::Log(value));
                log.span.end = greater.span.end;
            },
            _ => errors.push(Error::new(
                vec![base.span],
                kind::InvalidLogBase { base: base.lexeme.to_string() },
            )),
        }
    }

    /// Parses the source into a tree.
    pub fn parse(&mut self) -> Result<Node, Vec<Error>> {
        let items = self.items()?;
        let mut builder = TreeBuilder::new();
        for item in items {
            builder.push(item).map_err(|err| vec![err])?;
        }
        builder.build().map_err(|err| vec![err])
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use super::ast::{Constant, NodeKind};

    fn vars(names: &[&str]) -> HashSet<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    fn items(source: &str, names: &[&str]) -> Vec<(Template, usize)> {
        let variables = vars(names);
        Parser::new(source, &variables)
            .items()
            .unwrap()
            .into_iter()
            .map(|item| (item.template, item.depth))
            .collect()
    }

    fn parse(source: &str, names: &[&str]) -> Result<Node, Vec<Error>> {
        let variables = vars(names);
        Parser::new(source, &variables).parse()
    }

    fn num(n: &str) -> Template {
        Template::Literal(Literal::Number(n.to_string()))
    }

    #[test]
    fn bracket_depths() {
        assert_eq!(items("(2*(6-3))^2", &[]), vec![
            (num("2"), 1),
            (Template::Binary(BinOpKind::Mul), 1),
            (num("6"), 2),
            (Template::Binary(BinOpKind::Sub), 2),
            (num("3"), 2),
            (Template::Binary(BinOpKind::Exp), 0),
            (num("2"), 0),
        ]);
    }

    #[test]
    fn minus_sign() {
        assert_eq!(items("-x-2*-(pi)", &["x"]), vec![
            (Template::Unary(UnaryOpKind::Neg), 0),
            (Template::Literal(Literal::Variable("x".to_string())), 0),
            (Template::Binary(BinOpKind::Sub), 0),
            (num("2"), 0),
            (Template::Binary(BinOpKind::Mul), 0),
            (Template::Unary(UnaryOpKind::Neg), 0),
            (Template::Literal(Literal::Constant(Constant::Pi)), 1),
        ]);
    }

    #[test]
    fn minus_after_bracket() {
        // the last emitted item before `)` is an operand
        assert_eq!(items("(1)-2", &[]), vec![
            (num("1"), 1),
            (Template::Binary(BinOpKind::Sub), 0),
            (num("2"), 0),
        ]);
    }

    #[test]
    fn log_bases() {
        assert_eq!(items("log(8)+log<2>(8)", &[]), vec![
            (Template::Unary(UnaryOpKind::Log(10)), 0),
            (num("8"), 1),
            (Template::Binary(BinOpKind::Add), 0),
            (Template::Unary(UnaryOpKind::Log(2)), 0),
            (num("8"), 1),
        ]);
    }

    #[test]
    fn invalid_log_bases() {
        let errors = parse("log<1>(8)", &[]).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].downcast_ref::<kind::InvalidLogBase>(),
            Some(&kind::InvalidLogBase { base: "1".to_string() }),
        );
        assert_eq!(errors[0].spans, vec![4..5]);

        let errors = parse("log<x", &["x"]).unwrap_err();
        assert!(errors[0].is::<kind::IncompleteLogBase>());
    }

    #[test]
    fn parse_tree() {
        let node = parse("2 * -x", &["x"]).unwrap();
        assert_eq!(node, Node {
            kind: NodeKind::Binary(
                BinOpKind::Mul,
                Box::new(Node {
                    kind: NodeKind::Literal(Literal::Number("2".to_string())),
                    span: 0..1,
                }),
                Box::new(Node {
                    kind: NodeKind::Unary(UnaryOpKind::Neg, Box::new(Node {
                        kind: NodeKind::Literal(Literal::Variable("x".to_string())),
                        span: 5..6,
                    })),
                    span: 4..5,
                }),
            ),
            span: 2..3,
        });
        assert_eq!(node.full_span(), 0..6);
    }

    #[test]
    fn all_errors_reported() {
        let errors = parse(")2 % y + (3", &[]).unwrap_err();
        let spans = errors.iter().map(|err| err.spans.clone()).collect::<Vec<_>>();
        assert_eq!(spans, vec![vec![0..1], vec![3..4], vec![5..6], vec![9..10]]);
        assert_eq!(
            errors[0].downcast_ref::<kind::UnclosedParenthesis>(),
            Some(&kind::UnclosedParenthesis { opening: false }),
        );
        assert_eq!(
            errors[3].downcast_ref::<kind::UnclosedParenthesis>(),
            Some(&kind::UnclosedParenthesis { opening: true }),
        );
    }

    #[test]
    fn structural_errors() {
        assert!(parse("", &[]).unwrap_err()[0].is::<kind::EmptyExpression>());
        assert!(parse("()", &[]).unwrap_err()[0].is::<kind::EmptyExpression>());
        assert!(parse("2x", &["x"]).unwrap_err()[0].is::<kind::MissingOperator>());
        assert!(parse("3+", &[]).unwrap_err()[0].is::<kind::MissingOperand>());
        assert!(parse("*3", &[]).unwrap_err()[0].is::<kind::MissingOperand>());
        assert!(parse("x sin", &["x"]).unwrap_err()[0].is::<kind::MissingOperator>());
        assert!(parse("pi cos+1", &[]).unwrap_err()[0].is::<kind::MissingOperator>());
        assert!(parse("2 ln", &[]).unwrap_err()[0].is::<kind::MissingOperator>());
        assert!(parse("xsin", &["x"]).unwrap_err()[0].is::<kind::MissingOperator>());
    }
}
