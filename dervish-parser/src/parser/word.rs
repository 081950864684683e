//! Splitting runs of letters into function keywords, constants and variable names.
//!
//! The text `xsinx` is a single [`TokenKind::Word`](crate::tokenizer::TokenKind::Word), but
//! means `x`, `sin`, `x` when `x` is a declared variable. At each position the longest match
//! wins. When a keyword or constant and a variable match with the same length, the keyword or
//! constant wins.

use super::{
    ast::{Constant, Literal},
    builder::Template,
    error::{kind, Error},
    token::op::UnaryOpKind,
};
use std::{collections::HashSet, ops::Range};

/// Function keywords and constants that can appear in a word.
const KEYWORDS: [(&str, Template); 7] = [
    ("sin", Template::Unary(UnaryOpKind::Sin)),
    ("cos", Template::Unary(UnaryOpKind::Cos)),
    ("tan", Template::Unary(UnaryOpKind::Tan)),
    ("ln", Template::Unary(UnaryOpKind::Ln)),
    ("log", Template::Unary(UnaryOpKind::Log(10))),
    ("pi", Template::Literal(Literal::Constant(Constant::Pi))),
    ("e", Template::Literal(Literal::Constant(Constant::E))),
];

/// Splits the word starting at byte `offset` of the source into templates and their spans.
///
/// Every run of text that does not match anything is reported as one
/// [`kind::UnrecognizedToken`] error.
pub fn split_word(
    word: &str,
    offset: usize,
    variables: &HashSet<String>,
) -> Result<Vec<(Template, Range<usize>)>, Vec<Error>> {
    let mut parts = Vec::new();
    let mut errors = Vec::new();
    let mut unknown_start = None;
    let mut cursor = 0;

    let flush_unknown = |start: Option<usize>, end: usize, errors: &mut Vec<Error>| {
        if let Some(start) = start {
            errors.push(Error::new(
                vec![offset + start..offset + end],
                kind::UnrecognizedToken { token: word[start..end].to_string() },
            ));
        }
    };

    while cursor < word.len() {
        let rest = &word[cursor..];
        let keyword = KEYWORDS
            .iter()
            .filter(|(name, _)| rest.starts_with(*name))
            .max_by_key(|(name, _)| name.len());
        let variable = variables
            .iter()
            .filter(|name| !name.is_empty() && rest.starts_with(name.as_str()))
            .max_by_key(|name| name.len());

        let matched = match (keyword, variable) {
            (Some((name, _)), Some(variable)) if variable.len() > name.len() => {
                Some((Template::Literal(Literal::Variable(variable.clone())), variable.len()))
            },
            (Some((name, template)), _) => Some((template.clone(), name.len())),
            (None, Some(variable)) => {
                Some((Template::Literal(Literal::Variable(variable.clone())), variable.len()))
            },
            (None, None) => None,
        };

        match matched {
            Some((template, len)) => {
                flush_unknown(unknown_start.take(), cursor, &mut errors);
                parts.push((template, offset + cursor..offset + cursor + len));
                cursor += len;
            },
            None => {
                unknown_start.get_or_insert(cursor);
                cursor += rest.chars().next().map_or(1, char::len_utf8);
            },
        }
    }
    flush_unknown(unknown_start, word.len(), &mut errors);

    if errors.is_empty() {
        Ok(parts)
    } else {
        Err(errors)
    }
}
