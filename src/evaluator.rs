use crate::environment::{Environment, UnknownSymbol};
use crate::reader::ReadError;
use crate::special_forms::{DefineError, LambdaError, SetError};
use crate::tokens::TokenizerError;
use crate::types::{
    BadArgCount, Closure, ImproperList, Int, Object, PrimitiveBody, PrimitiveFn,
    TypeMismatch, FALSE, TRUE,
};
use derive_more::From;
use itertools::Itertools;
use std::fmt;
use std::rc::Rc;

pub type Result<T = Object> = std::result::Result<T, Error>;

/// A malformed token stream or a grammar violation, including special forms
/// written with the wrong shape.
#[derive(Debug)]
pub enum SyntaxError {
    Tokenizer(TokenizerError),
    Read(ReadError),
    ImproperArgumentList,
    BadArgCount(BadArgCount),
    Lambda(LambdaError),
}

/// A well-formed program attempted an ill-typed or ill-formed operation.
#[derive(Debug)]
pub enum RuntimeError {
    NotCallable(String),
    EmptyListNotEvaluable,
    ProcedureNotEvaluable(String),
    TypeMismatch(TypeMismatch),
    BadArgCount(BadArgCount),
    BadIndex(Int),
    DivideByZero,
    Define(DefineError),
    Set(SetError),
}

#[derive(Debug, From)]
pub enum Error {
    Syntax(SyntaxError),
    Runtime(RuntimeError),
    Name(UnknownSymbol),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ErrorKind {
    Syntax,
    Runtime,
    Name,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::Syntax => "SyntaxError",
            ErrorKind::Runtime => "RuntimeError",
            ErrorKind::Name => "NameError",
        })
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Syntax(_) => ErrorKind::Syntax,
            Error::Runtime(_) => ErrorKind::Runtime,
            Error::Name(_) => ErrorKind::Name,
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxError::Tokenizer(e) => write!(f, "tokenizer failed: {}", e),
            SyntaxError::Read(e) => write!(f, "read error: {}", e),
            SyntaxError::ImproperArgumentList => {
                write!(f, "argument list is not a proper list")
            }
            SyntaxError::BadArgCount(e) => write!(f, "{}", e),
            SyntaxError::Lambda(e) => write!(f, "lambda: {}", e),
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::NotCallable(s) => write!(f, "{} is not a procedure", s),
            RuntimeError::EmptyListNotEvaluable => write!(f, "the empty list is not evaluable"),
            RuntimeError::ProcedureNotEvaluable(s) => write!(f, "{} is not evaluable", s),
            RuntimeError::TypeMismatch(e) => write!(f, "type mismatch: {}", e),
            RuntimeError::BadArgCount(e) => write!(f, "{}", e),
            RuntimeError::BadIndex(i) => write!(f, "bad index: {}", i),
            RuntimeError::DivideByZero => write!(f, "cannot divide by zero!"),
            RuntimeError::Define(e) => write!(f, "define: {}", e),
            RuntimeError::Set(e) => write!(f, "set!: {}", e),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Syntax(e) => write!(f, "{}", e),
            Error::Runtime(e) => write!(f, "{}", e),
            Error::Name(UnknownSymbol(s)) => write!(f, "'{}' not found", s),
        }
    }
}

impl std::error::Error for Error {}

impl From<TypeMismatch> for Error {
    fn from(t: TypeMismatch) -> Self {
        Self::Runtime(RuntimeError::TypeMismatch(t))
    }
}

impl From<TokenizerError> for Error {
    fn from(e: TokenizerError) -> Self {
        Self::Syntax(SyntaxError::Tokenizer(e))
    }
}

impl From<ReadError> for Error {
    fn from(e: ReadError) -> Self {
        Self::Syntax(SyntaxError::Read(e))
    }
}

impl From<ImproperList> for Error {
    fn from(_: ImproperList) -> Self {
        Self::Syntax(SyntaxError::ImproperArgumentList)
    }
}

/// Evaluate `ast` against `env`.
///
/// Numbers and the two boolean literals evaluate to themselves and other
/// symbols are looked up in `env`. A pair is a call: its head is evaluated to
/// a procedure, which receives the unevaluated rest of the list.
#[allow(non_snake_case)]
pub fn EVAL(ast: &Object, env: &Rc<Environment>) -> Result {
    log::trace!("eval {}", ast);
    match ast {
        Object::Integer(_) => Ok(ast.clone()),
        Object::Symbol(s) if s.as_str() == TRUE || s.as_str() == FALSE => Ok(ast.clone()),
        Object::Symbol(s) => env.fetch(s).map_err(Error::Name),
        Object::Pair(pair) => {
            let head = EVAL(&pair.first(), env)?;
            apply(&head, &pair.second(), env)
        }
        Object::Nil => Err(RuntimeError::EmptyListNotEvaluable.into()),
        Object::Primitive(_) | Object::Closure(_) => {
            Err(RuntimeError::ProcedureNotEvaluable(ast.to_string()).into())
        }
    }
}

/// Apply `procedure` to the unevaluated argument list `args`, which is
/// interpreted in the caller's environment `env`.
pub fn apply(procedure: &Object, args: &Object, env: &Rc<Environment>) -> Result {
    match procedure {
        Object::Primitive(f) => call_primitive(f, &args.list_to_vec()?, env),
        Object::Closure(f) => call_closure(f, &args.list_to_vec()?, env),
        _ => Err(RuntimeError::NotCallable(procedure.to_string()).into()),
    }
}

pub fn evaluate_sequence_elementwise(
    seq: &[Object],
    env: &Rc<Environment>,
) -> std::result::Result<Vec<Object>, Error> {
    seq.iter().map(|obj| EVAL(obj, env)).collect()
}

/// Evaluate each of `body` in turn, keeping only the last result.
pub(crate) fn evaluate_body(body: &[Object], env: &Rc<Environment>) -> Result {
    let mut result = Object::Nil;
    for obj in body {
        result = EVAL(obj, env)?;
    }
    Ok(result)
}

pub(crate) fn pretty_print_args(args: &[Object]) -> String {
    match args.len() {
        0 => "no args".into(),
        1 => args[0].to_string(),
        _ => format!("\n\t{}", args.iter().join("\n\t")),
    }
}

pub fn call_primitive(func: &PrimitiveFn, args: &[Object], env: &Rc<Environment>) -> Result {
    let result = match func.body {
        PrimitiveBody::SpecialForm(fn_ptr) => {
            func.arity
                .validate_for(args.len(), func.name)
                .map_err(SyntaxError::BadArgCount)?;
            log::trace!("Apply {} to {}", func.name, pretty_print_args(args));
            fn_ptr(args, env)
        }
        PrimitiveBody::Procedure(fn_ptr) => {
            func.arity
                .validate_for(args.len(), func.name)
                .map_err(RuntimeError::BadArgCount)?;
            let args = evaluate_sequence_elementwise(args, env)?;
            log::trace!("Call {} with {}", func.name, pretty_print_args(&args));
            fn_ptr(&args)
        }
    };
    match &result {
        Ok(val) => log::trace!("Call to {} resulted in {}", func.name, val),
        Err(e) => log::trace!("Call to {} failed: {}", func.name, e),
    }
    result
}

fn call_closure(func: &Closure, args: &[Object], env: &Rc<Environment>) -> Result {
    func.arity()
        .validate_for(args.len(), "lambda")
        .map_err(RuntimeError::BadArgCount)?;
    let args = evaluate_sequence_elementwise(args, env)?;
    log::trace!("Call {:?} with {}", func, pretty_print_args(&args));

    let closure_env = Environment::spawn_from(&func.parent);
    for (key, value) in func.parameters.iter().zip(args) {
        closure_env.define(key.clone(), value);
    }
    log::trace!("closure scopes:\n{}", closure_env);
    evaluate_body(&func.body, &closure_env)
}
