use crate::types::Int;
use bimap::BiMap;
use regex::Regex;
use std::fmt;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Punctuation {
    OpenBracket,
    CloseBracket,
    Quote,
    Dot,
}

lazy_static! {
    static ref PUNCTUATION: BiMap<char, Punctuation> = {
        let mut m = BiMap::new();
        m.insert('(', Punctuation::OpenBracket);
        m.insert(')', Punctuation::CloseBracket);
        m.insert('\'', Punctuation::Quote);
        m.insert('.', Punctuation::Dot);
        m
    };
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Token {
    Punctuation(Punctuation),
    Symbol(String),
    Constant(Int),
}

impl Token {
    pub(crate) fn is(&self, punctuation: Punctuation) -> bool {
        match self {
            Token::Punctuation(p) => *p == punctuation,
            _ => false,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Punctuation(p) => match PUNCTUATION.get_by_right(p) {
                Some(c) => write!(f, "'{}'", c),
                None => write!(f, "{:?}", p),
            },
            Token::Symbol(name) => write!(f, "symbol {}", name),
            Token::Constant(value) => write!(f, "constant {}", value),
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
pub enum TokenizerError {
    UnexpectedCharacter(char),
}

impl fmt::Display for TokenizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenizerError::UnexpectedCharacter(c) => write!(f, "unexpected character {:?}", c),
        }
    }
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

// No overflow checking: wide literals truncate to the machine integer.
fn parse_constant(digits: &str) -> Int {
    let (negative, digits) = match digits.as_bytes().first() {
        Some(b'-') => (true, &digits[1..]),
        Some(b'+') => (false, &digits[1..]),
        _ => (false, digits),
    };
    let magnitude = digits.bytes().fold(0 as Int, |acc, byte| {
        acc.wrapping_mul(10).wrapping_add(Int::from(byte - b'0'))
    });
    match negative {
        true => magnitude.wrapping_neg(),
        false => magnitude,
    }
}

fn create_token(captured: &str) -> Token {
    let mut chars = captured.chars();
    let first = chars.next();
    if let Some(&p) = first.and_then(|c| PUNCTUATION.get_by_left(&c)) {
        return Token::Punctuation(p);
    }
    match first {
        Some(c) if is_digit(c) => Token::Constant(parse_constant(captured)),
        Some('+') | Some('-') => match chars.next() {
            Some(c) if is_digit(c) => Token::Constant(parse_constant(captured)),
            _ => Token::Symbol(captured.to_owned()),
        },
        _ => Token::Symbol(captured.to_owned()),
    }
}

/// A lexer which produces one token at a time from its input.
///
/// The most recently produced token is held as the current token until the
/// next call to [`Lexer::advance`]. Once the input is exhausted the lexer
/// reports [`Lexer::at_end`] and has no current token.
pub struct Lexer<'a> {
    rest: &'a str,
    current: Option<Token>,
}

impl<'a> Lexer<'a> {
    /// Construct a lexer and read its first token.
    pub fn new(input: &'a str) -> Result<Self, TokenizerError> {
        let mut lexer = Self {
            rest: input,
            current: None,
        };
        lexer.advance()?;
        Ok(lexer)
    }

    pub fn peek(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    pub fn at_end(&self) -> bool {
        self.current.is_none()
    }

    /// Skip whitespace and read the next token, making it current.
    pub fn advance(&mut self) -> Result<Option<&Token>, TokenizerError> {
        lazy_static! {
            static ref TOKEN_RE: Regex = Regex::new(
                r#"(?x)                              # ignore whitespace in this pattern & allow comments
                    ^\s*                             # leading whitespace, ignored
                    (                                # token capture group
                        [()'.]                       # single punctuation characters
                        |[0-9]+                      # unsigned constant
                        |[+-][0-9]+                  # signed constant
                        |[A-Za-z<=>*/\#]             # symbol start...
                         [A-Za-z0-9<=>*/\#?!-]*      # ...followed by symbol inner characters
                        |[+-]                        # lone sign is a symbol
                    )?
                "#
            )
            .unwrap();
        }
        let rest = self.rest;
        self.current = match TOKEN_RE.captures(rest).and_then(|caps| caps.get(1)) {
            Some(token) => {
                self.rest = &rest[token.end()..];
                Some(create_token(token.as_str()))
            }
            None => {
                let remaining = rest.trim_start();
                if let Some(c) = remaining.chars().next() {
                    return Err(TokenizerError::UnexpectedCharacter(c));
                }
                self.rest = remaining;
                None
            }
        };
        Ok(self.current.as_ref())
    }
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, TokenizerError> {
    let mut lexer = Lexer::new(input)?;
    let mut tokens = Vec::new();
    while let Some(token) = lexer.peek() {
        tokens.push(token.clone());
        lexer.advance()?;
    }
    Ok(tokens)
}
