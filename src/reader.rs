use crate::evaluator::Result;
use crate::tokens::{Lexer, Punctuation, Token};
use crate::types::Object;
use std::fmt;

#[derive(Debug, Eq, PartialEq)]
pub enum ReadError {
    NoMoreTokens,
    UnclosedList,
    UnexpectedCloseBracket,
    UnexpectedDot,
    DanglingQuote,
    BadDottedPair,
    TrailingInput(Token),
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::NoMoreTokens => write!(f, "unexpected end of input"),
            ReadError::UnclosedList => write!(f, "unclosed list"),
            ReadError::UnexpectedCloseBracket => write!(f, "unexpected ')'"),
            ReadError::UnexpectedDot => write!(f, "unexpected '.'"),
            ReadError::DanglingQuote => write!(f, "quote with nothing to quote"),
            ReadError::BadDottedPair => {
                write!(f, "'.' must be followed by exactly one datum and ')'")
            }
            ReadError::TrailingInput(token) => write!(f, "unconsumed input from {}", token),
        }
    }
}

/// Read exactly one datum from `input`, which must contain nothing else.
pub fn read_str(input: &str) -> Result {
    let mut lexer = Lexer::new(input)?;
    let form = read(&mut lexer)?;
    match lexer.peek() {
        None => Ok(form),
        Some(token) => Err(ReadError::TrailingInput(token.clone()).into()),
    }
}

/// Read one datum from `lexer`, leaving the lexer on the token after it.
pub fn read(lexer: &mut Lexer) -> Result {
    let token = lexer.peek().cloned().ok_or(ReadError::NoMoreTokens)?;
    lexer.advance()?;
    match token {
        Token::Punctuation(Punctuation::OpenBracket) => read_list(lexer),
        Token::Punctuation(Punctuation::CloseBracket) => {
            Err(ReadError::UnexpectedCloseBracket.into())
        }
        Token::Punctuation(Punctuation::Dot) => Err(ReadError::UnexpectedDot.into()),
        Token::Punctuation(Punctuation::Quote) => read_quoted(lexer),
        Token::Symbol(name) => Ok(Object::new_symbol(&name)),
        Token::Constant(value) => Ok(Object::Integer(value)),
    }
}

// 'X desugars to (quote X)
fn read_quoted(lexer: &mut Lexer) -> Result {
    match lexer.peek() {
        None => Err(ReadError::DanglingQuote.into()),
        Some(token) if token.is(Punctuation::CloseBracket) => {
            Err(ReadError::DanglingQuote.into())
        }
        Some(_) => {
            let quoted = read(lexer)?;
            Ok(Object::wrap_list(vec![Object::new_symbol("quote"), quoted]))
        }
    }
}

// Called with the opening bracket already consumed.
fn read_list(lexer: &mut Lexer) -> Result {
    let mut elements = Vec::new();
    loop {
        match lexer.peek() {
            None => return Err(ReadError::UnclosedList.into()),
            Some(token) if token.is(Punctuation::CloseBracket) => {
                lexer.advance()?;
                return Ok(Object::wrap_list(elements));
            }
            Some(token) if token.is(Punctuation::Dot) => {
                if elements.is_empty() {
                    return Err(ReadError::UnexpectedDot.into());
                }
                lexer.advance()?;
                let tail = read(lexer)?;
                match lexer.peek() {
                    Some(token) if token.is(Punctuation::CloseBracket) => {
                        lexer.advance()?;
                        return Ok(Object::wrap_dotted(elements, tail));
                    }
                    _ => return Err(ReadError::BadDottedPair.into()),
                }
            }
            Some(_) => elements.push(read(lexer)?),
        }
    }
}
