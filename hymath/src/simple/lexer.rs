//! Tokenizer for the compact syntax.
//!
//! Token patterns are tried in a fixed order at the current position and the first
//! one that matches wins: symbol (`cd.name`), variable, float, integer, quoted string,
//! then the punctuation `,` `(` `)` `[` `]`. Whitespace is not a token.
use std::fmt;

use chumsky::prelude::*;
use log::trace;

use crate::error::{OmError, OmResult};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Token {
    Symbol { cd: String, name: String },
    Variable(String),
    Float(String),
    Integer(String),
    /// Body of a quoted string, escapes already resolved.
    String(String),
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Symbol { cd, name } => write!(f, "{cd}.{name}"),
            Token::Variable(text) | Token::Float(text) | Token::Integer(text) => {
                f.write_str(text)
            }
            Token::String(text) => write!(f, "'{}'", text.replace('\'', "\\'")),
            Token::Comma => f.write_str(","),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::LBracket => f.write_str("["),
            Token::RBracket => f.write_str("]"),
        }
    }
}

/// Drop the backslash in front of every escaped `quote`; other escapes are kept as written.
fn unescape(body: &str, quote: char) -> String {
    let mut result = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some(next) if next == quote => result.push(quote),
            Some(next) => {
                result.push('\\');
                result.push(next);
            }
            None => result.push('\\'),
        }
    }
    result
}

/// One token, paired with the byte length it consumed.
fn token<'src>() -> impl Parser<'src, &'src str, (Token, usize), extra::Err<Rich<'src, char>>> {
    let ident = any()
        .filter(|c: &char| c.is_ascii_alphabetic() || matches!(*c, '_' | ':'))
        .then(
            any()
                .filter(|c: &char| c.is_ascii_alphanumeric() || matches!(*c, '_' | ':' | '-'))
                .repeated(),
        )
        .to_slice();

    let symbol = ident
        .clone()
        .then_ignore(just('.'))
        .then(ident.clone())
        .map(|(cd, name): (&str, &str)| Token::Symbol {
            cd: cd.to_owned(),
            name: name.to_owned(),
        });

    let variable = ident.map(|name: &str| Token::Variable(name.to_owned()));

    let digit = any().filter(|c: &char| c.is_ascii_digit());
    let sign = one_of("+-").or_not();
    let float = sign
        .clone()
        .then(choice((
            digit
                .clone()
                .repeated()
                .at_least(1)
                .then(just('.'))
                .then(digit.clone().repeated())
                .ignored(),
            digit
                .clone()
                .repeated()
                .then(just('.'))
                .then(digit.clone().repeated().at_least(1))
                .ignored(),
        )))
        .to_slice()
        .map(|text: &str| Token::Float(text.to_owned()));

    let integer = sign
        .then(digit.repeated().at_least(1))
        .to_slice()
        .map(|text: &str| Token::Integer(text.to_owned()));

    let quoted = |quote: char| {
        just(quote)
            .ignore_then(
                choice((
                    just('\\').then(just(quote)).ignored(),
                    just('\\').then(just('\\')).ignored(),
                    none_of([quote, '\\']).ignored(),
                ))
                .repeated()
                .to_slice(),
            )
            .then_ignore(just(quote))
            .map(move |body: &str| Token::String(unescape(body, quote)))
    };
    let string = choice((quoted('"'), quoted('\'')));

    let punct = choice((
        just(',').to(Token::Comma),
        just('(').to(Token::LParen),
        just(')').to(Token::RParen),
        just('[').to(Token::LBracket),
        just(']').to(Token::RBracket),
    ));

    choice((symbol, variable, float, integer, string, punct)).map_with(|token, e| {
        let span: SimpleSpan = e.span();
        (token, span.end)
    })
}

/// Split `input` into tokens.
///
/// Fails with [`OmError::Syntax`] naming (up to) the next 11 characters of the input at
/// the first position where no token pattern matches.
pub(crate) fn tokenize(input: &str) -> OmResult<Vec<Token>> {
    let parser = token().lazy();
    let mut tokens = Vec::new();
    let mut offset = 0;
    while offset < input.len() {
        let rest = &input[offset..];
        match parser.parse(rest).into_result() {
            Ok((token, consumed)) if consumed > 0 => {
                trace!("token {token:?} at offset {offset}");
                tokens.push(token);
                offset += consumed;
            }
            _ => {
                let here: String = rest.chars().take(11).collect();
                return Err(OmError::Syntax(format!(
                    "Could not understand from here: {here}"
                )));
            }
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_order() {
        let tokens = tokenize("arith1.plus(x,-1.5,+2,'it\\'s')").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Symbol {
                    cd: "arith1".into(),
                    name: "plus".into()
                },
                Token::LParen,
                Token::Variable("x".into()),
                Token::Comma,
                Token::Float("-1.5".into()),
                Token::Comma,
                Token::Integer("+2".into()),
                Token::Comma,
                Token::String("it's".into()),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn only_matching_quote_is_unescaped() {
        let tokens = tokenize(r#""a\"b\\c""#).unwrap();
        assert_eq!(tokens, vec![Token::String(r#"a"b\\c"#.into())]);
        assert_eq!(unescape(r"x\'y\q", '\''), r"x'y\q");
    }

    #[test]
    fn unknown_character() {
        let err = tokenize("f(x) + g(y) + h(z)").unwrap_err();
        assert_eq!(err.reason(), "Could not understand from here:  + g(y) + h");
        assert!(tokenize("'open").is_err());
    }
}
