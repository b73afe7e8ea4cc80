//! Annotation parsing.
//!
//! Turns typing-style annotations into [`Ty`] descriptors:
//!
//! ```text
//! int | None
//! Dict[str, List[Job]]
//! Optional[FrozenSet[str]]
//! Tuple[int, ...]
//! Literal['a', 1, True, Color.RED]
//! 'Node'                      (quoted forward reference)
//! ```
//!
//! Both capitalised (`List`) and builtin (`list`) spellings are accepted, and
//! a `typing.` or `collections.` prefix is ignored. A bare generic name means
//! its arguments are `Any`.
//!
//! Names that are neither builtin nor declared type variables become
//! [`Ty::Named`] references; whether they resolve is the registry's concern.

mod lexer;

use conform_stack::with_stack;
use conform_value::{Name, Value};

use crate::{ContainerKind, FieldTable, TypeRegistry, Ty};

use lexer::{Token, TokenKind};

/// Error parsing an annotation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected end of annotation `{src}`")]
    UnexpectedEnd { src: String },

    #[error("unexpected {found} at offset {offset} in `{src}`")]
    Unexpected {
        found: String,
        offset: usize,
        src: String,
    },

    #[error("`{name}` takes {expected} type argument(s), got {found}")]
    Arity {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("`{name}` does not take type arguments")]
    NotGeneric { name: String },

    #[error("`{text}` is not a valid literal value")]
    BadLiteral { text: String },

    #[error("unterminated string starting at offset {offset}")]
    UnterminatedString { offset: usize },
}

/// Parse an annotation without a registry.
///
/// Every unknown name becomes a [`Ty::Named`] reference and enum members in
/// `Literal[...]` carry no value.
pub fn parse_ty(src: &str) -> Result<Ty, ParseError> {
    TypeParser::new().parse(src)
}

/// Annotation parser, optionally backed by a registry.
///
/// With a registry, declared type variables parse to [`Ty::Var`] and
/// `Literal[Enum.MEMBER]` picks up the member's value.
#[derive(Clone, Copy, Debug, Default)]
pub struct TypeParser<'r> {
    registry: Option<&'r TypeRegistry>,
}

impl<'r> TypeParser<'r> {
    pub fn new() -> Self {
        TypeParser { registry: None }
    }

    pub fn with_registry(registry: &'r TypeRegistry) -> Self {
        TypeParser {
            registry: Some(registry),
        }
    }

    pub fn parse(&self, src: &str) -> Result<Ty, ParseError> {
        let tokens = lexer::tokenize(src)?;
        let mut parser = Parser {
            src,
            tokens,
            pos: 0,
            registry: self.registry,
        };
        let ty = parser.union()?;
        parser.expect_end()?;
        Ok(ty)
    }
}

struct Parser<'s, 'r> {
    src: &'s str,
    tokens: Vec<Token>,
    pos: usize,
    registry: Option<&'r TypeRegistry>,
}

impl Parser<'_, '_> {
    // Cursor

    fn peek(&self) -> &TokenKind {
        self.tokens
            .get(self.pos)
            .map_or(&TokenKind::Eof, |t| &t.kind)
    }

    fn next(&mut self) -> Token {
        let token = self.tokens.get(self.pos).cloned().unwrap_or(Token {
            kind: TokenKind::Eof,
            offset: self.src.len(),
        });
        self.pos += 1;
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek() == kind {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<(), ParseError> {
        let token = self.next();
        if token.kind == *kind {
            Ok(())
        } else {
            Err(self.unexpected(&token))
        }
    }

    fn expect_end(&mut self) -> Result<(), ParseError> {
        let token = self.next();
        match token.kind {
            TokenKind::Eof => Ok(()),
            _ => Err(self.unexpected(&token)),
        }
    }

    fn unexpected(&self, token: &Token) -> ParseError {
        match token.kind {
            TokenKind::Eof => ParseError::UnexpectedEnd {
                src: self.src.to_owned(),
            },
            _ => ParseError::Unexpected {
                found: token.kind.describe(),
                offset: token.offset,
                src: self.src.to_owned(),
            },
        }
    }

    // Grammar

    /// `union := primary ('|' primary)*`
    fn union(&mut self) -> Result<Ty, ParseError> {
        let first = self.primary()?;
        if *self.peek() != TokenKind::Pipe {
            return Ok(first);
        }
        let mut alternatives = vec![first];
        while self.eat(&TokenKind::Pipe) {
            alternatives.push(self.primary()?);
        }
        Ok(Ty::union(alternatives))
    }

    fn primary(&mut self) -> Result<Ty, ParseError> {
        with_stack(|| self.primary_inner())
    }

    fn primary_inner(&mut self) -> Result<Ty, ParseError> {
        let token = self.next();
        match token.kind {
            TokenKind::Str(text) => {
                // forward reference: the quoted text is an annotation itself
                TypeParser {
                    registry: self.registry,
                }
                .parse(&text)
            }
            TokenKind::Ident(first) => {
                let name = self.dotted(first)?;
                self.named(&name)
            }
            _ => Err(self.unexpected(&token)),
        }
    }

    /// Continue a dotted name, dropping a `typing.` or `collections.` prefix.
    fn dotted(&mut self, first: String) -> Result<String, ParseError> {
        let mut parts = vec![first];
        while self.eat(&TokenKind::Dot) {
            let token = self.next();
            match token.kind {
                TokenKind::Ident(part) => parts.push(part),
                _ => return Err(self.unexpected(&token)),
            }
        }
        if parts.len() > 1
            && matches!(
                parts[0].as_str(),
                "typing" | "typing_extensions" | "collections"
            )
        {
            parts.remove(0);
        }
        Ok(parts.join("."))
    }

    fn named(&mut self, name: &str) -> Result<Ty, ParseError> {
        let ty = match name {
            "None" | "NoneType" => self.plain(name, Ty::None)?,
            "int" => self.plain(name, Ty::int())?,
            "float" => self.plain(name, Ty::float())?,
            "bool" => self.plain(name, Ty::bool())?,
            "str" => self.plain(name, Ty::str())?,
            "bytes" => self.plain(name, Ty::bytes())?,
            "Any" | "object" => self.plain(name, Ty::Any)?,
            "List" | "list" => self.container(name, ContainerKind::List)?,
            "Set" | "set" => self.container(name, ContainerKind::Set)?,
            "FrozenSet" | "frozenset" => self.container(name, ContainerKind::FrozenSet)?,
            "Dict" | "dict" => self.mapping(name, Ty::dict)?,
            "OrderedDict" => self.mapping(name, Ty::ordered_dict)?,
            "Tuple" | "tuple" => self.tuple()?,
            "Union" => match self.type_args()? {
                Some(args) if !args.is_empty() => Ty::union(args),
                Some(args) => return Err(arity(name, 1, args.len())),
                None => return Err(arity(name, 1, 0)),
            },
            "Optional" => Ty::optional(self.single_arg(name)?),
            "Literal" => self.literal()?,
            "Callable" => {
                self.skip_args()?;
                Ty::Callable
            }
            "Type" | "type" => match self.type_args()? {
                Some(mut args) if args.len() == 1 => Ty::class(args.remove(0)),
                Some(args) => return Err(arity(name, 1, args.len())),
                None => Ty::class(Ty::Any),
            },
            _ if self.registry.is_some_and(|r| r.is_type_var(name)) => {
                self.plain(name, Ty::var(name))?
            }
            _ => self.plain(name, Ty::named(name))?,
        };
        Ok(ty)
    }

    /// A non-generic name: reject any `[...]` that follows.
    fn plain(&mut self, name: &str, ty: Ty) -> Result<Ty, ParseError> {
        if *self.peek() == TokenKind::LBracket {
            return Err(ParseError::NotGeneric {
                name: name.to_owned(),
            });
        }
        Ok(ty)
    }

    /// `'[' union (',' union)* ']'`, or `None` when no bracket follows.
    fn type_args(&mut self) -> Result<Option<Vec<Ty>>, ParseError> {
        if !self.eat(&TokenKind::LBracket) {
            return Ok(None);
        }
        let mut args = vec![self.union()?];
        while self.eat(&TokenKind::Comma) {
            args.push(self.union()?);
        }
        self.expect(&TokenKind::RBracket)?;
        Ok(Some(args))
    }

    fn single_arg(&mut self, name: &str) -> Result<Ty, ParseError> {
        match self.type_args()? {
            Some(mut args) if args.len() == 1 => Ok(args.remove(0)),
            Some(args) => Err(arity(name, 1, args.len())),
            None => Err(arity(name, 1, 0)),
        }
    }

    fn container(&mut self, name: &str, kind: ContainerKind) -> Result<Ty, ParseError> {
        let item = match self.type_args()? {
            Some(mut args) if args.len() == 1 => args.remove(0),
            Some(args) => return Err(arity(name, 1, args.len())),
            None => Ty::Any,
        };
        Ok(Ty::Container {
            kind,
            item: Box::new(item),
        })
    }

    fn mapping(&mut self, name: &str, build: fn(Ty, Ty) -> Ty) -> Result<Ty, ParseError> {
        match self.type_args()? {
            Some(args) if args.len() == 2 => {
                let mut args = args.into_iter();
                match (args.next(), args.next()) {
                    (Some(key), Some(value)) => Ok(build(key, value)),
                    _ => Err(arity(name, 2, 0)),
                }
            }
            Some(args) => Err(arity(name, 2, args.len())),
            None => Ok(build(Ty::Any, Ty::Any)),
        }
    }

    /// `Tuple[()]`, `Tuple[T, ...]` or `Tuple[A, B, ...]` positional.
    fn tuple(&mut self) -> Result<Ty, ParseError> {
        if !self.eat(&TokenKind::LBracket) {
            return Ok(Ty::var_tuple(Ty::Any));
        }
        if self.eat(&TokenKind::LParen) {
            self.expect(&TokenKind::RParen)?;
            self.expect(&TokenKind::RBracket)?;
            return Ok(Ty::tuple(Vec::new()));
        }

        let mut elements = vec![self.union()?];
        while self.eat(&TokenKind::Comma) {
            if elements.len() == 1 && self.eat(&TokenKind::Ellipsis) {
                self.expect(&TokenKind::RBracket)?;
                let item = elements.pop().unwrap_or(Ty::Any);
                return Ok(Ty::var_tuple(item));
            }
            elements.push(self.union()?);
        }
        self.expect(&TokenKind::RBracket)?;
        Ok(Ty::tuple(elements))
    }

    fn literal(&mut self) -> Result<Ty, ParseError> {
        self.expect(&TokenKind::LBracket)?;
        let mut allowed = vec![self.literal_value()?];
        while self.eat(&TokenKind::Comma) {
            allowed.push(self.literal_value()?);
        }
        self.expect(&TokenKind::RBracket)?;
        Ok(Ty::literal(allowed))
    }

    fn literal_value(&mut self) -> Result<Value, ParseError> {
        let token = self.next();
        match token.kind {
            TokenKind::Int(n) => Ok(Value::Int(n)),
            TokenKind::Str(s) => Ok(Value::string(s)),
            TokenKind::Ident(first) => {
                let text = self.dotted(first)?;
                match text.as_str() {
                    "True" => Ok(Value::Bool(true)),
                    "False" => Ok(Value::Bool(false)),
                    "None" => Ok(Value::None),
                    _ => self.enum_literal(&text),
                }
            }
            _ => Err(self.unexpected(&token)),
        }
    }

    /// `Enum.MEMBER` inside `Literal[...]`.
    fn enum_literal(&self, text: &str) -> Result<Value, ParseError> {
        let Some((type_name, member)) = text.rsplit_once('.') else {
            return Err(ParseError::BadLiteral {
                text: text.to_owned(),
            });
        };
        let declared = self.registry.and_then(|r| r.enumeration(type_name));
        let value = match declared {
            Some(def) => def.member(member).cloned().ok_or_else(|| ParseError::BadLiteral {
                text: text.to_owned(),
            })?,
            None => Value::None,
        };
        Ok(Value::enum_member(
            Name::new(type_name),
            Name::new(member),
            value,
        ))
    }

    /// Skip a balanced `[...]` group if one follows.
    fn skip_args(&mut self) -> Result<(), ParseError> {
        if !self.eat(&TokenKind::LBracket) {
            return Ok(());
        }
        let mut depth = 1usize;
        while depth > 0 {
            let token = self.next();
            match token.kind {
                TokenKind::LBracket => depth += 1,
                TokenKind::RBracket => depth -= 1,
                TokenKind::Eof => return Err(self.unexpected(&token)),
                _ => {}
            }
        }
        Ok(())
    }
}

fn arity(name: &str, expected: usize, found: usize) -> ParseError {
    ParseError::Arity {
        name: name.to_owned(),
        expected,
        found,
    }
}

#[cfg(test)]
mod tests;
