//! Annotation tokenizer built on logos.

use logos::Logos;

use super::ParseError;

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
enum RawToken {
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token("|")]
    Pipe,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,

    #[regex(r"-?[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Int(i64),

    #[regex(r#""([^"\\\n\r]|\\.)*""#)]
    #[regex(r"'([^'\\\n\r]|\\.)*'")]
    Str,

    #[regex(r#""([^"\\\n\r]|\\.)*"#)]
    #[regex(r"'([^'\\\n\r]|\\.)*")]
    UnterminatedStr,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
}

#[derive(Clone, Debug, PartialEq)]
pub(super) enum TokenKind {
    Ident(String),
    Str(String),
    Int(i64),
    LBracket,
    RBracket,
    LParen,
    RParen,
    Comma,
    Pipe,
    Dot,
    Ellipsis,
    Eof,
}

impl TokenKind {
    /// Short description for error messages.
    pub(super) fn describe(&self) -> String {
        match self {
            TokenKind::Ident(name) => format!("name `{name}`"),
            TokenKind::Str(text) => format!("string {text:?}"),
            TokenKind::Int(n) => format!("number `{n}`"),
            TokenKind::LBracket => "`[`".to_owned(),
            TokenKind::RBracket => "`]`".to_owned(),
            TokenKind::LParen => "`(`".to_owned(),
            TokenKind::RParen => "`)`".to_owned(),
            TokenKind::Comma => "`,`".to_owned(),
            TokenKind::Pipe => "`|`".to_owned(),
            TokenKind::Dot => "`.`".to_owned(),
            TokenKind::Ellipsis => "`...`".to_owned(),
            TokenKind::Eof => "end of input".to_owned(),
        }
    }
}

#[derive(Clone, Debug)]
pub(super) struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

/// Tokenize an annotation. The returned list does not include `Eof`.
pub(super) fn tokenize(src: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut lexer = RawToken::lexer(src);

    while let Some(result) = lexer.next() {
        let offset = lexer.span().start;
        let slice = lexer.slice();
        let kind = match result {
            Ok(RawToken::LBracket) => TokenKind::LBracket,
            Ok(RawToken::RBracket) => TokenKind::RBracket,
            Ok(RawToken::LParen) => TokenKind::LParen,
            Ok(RawToken::RParen) => TokenKind::RParen,
            Ok(RawToken::Comma) => TokenKind::Comma,
            Ok(RawToken::Pipe) => TokenKind::Pipe,
            Ok(RawToken::Dot) => TokenKind::Dot,
            Ok(RawToken::Ellipsis) => TokenKind::Ellipsis,
            Ok(RawToken::Int(n)) => TokenKind::Int(n),
            Ok(RawToken::Str) => TokenKind::Str(unescape(&slice[1..slice.len() - 1])),
            Ok(RawToken::Ident) => TokenKind::Ident(slice.to_owned()),
            Ok(RawToken::UnterminatedStr) => {
                return Err(ParseError::UnterminatedString { offset });
            }
            Err(()) => {
                return Err(ParseError::Unexpected {
                    found: format!("`{slice}`"),
                    offset,
                    src: src.to_owned(),
                });
            }
        };
        tokens.push(Token { kind, offset });
    }

    Ok(tokens)
}

fn unescape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('t') => result.push('\t'),
                Some('\\') | None => result.push('\\'),
                Some(quote @ ('"' | '\'')) => result.push(quote),
                Some(other) => {
                    result.push('\\');
                    result.push(other);
                }
            }
        } else {
            result.push(c);
        }
    }

    result
}
