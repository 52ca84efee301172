use crate::environment::Environment;
use crate::evaluator::{Error, Result, RuntimeError, SyntaxError, EVAL};
use crate::types::{truthy, Arity, Closure, Object, PrimitiveBody, PrimitiveFn, Symbol};
use std::fmt;
use std::rc::Rc;

#[derive(Debug)]
pub enum DefineError {
    NameNotASymbol,
    BadTarget,
}

impl fmt::Display for DefineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefineError::NameNotASymbol => write!(f, "name of lambda should be a symbol"),
            DefineError::BadTarget => write!(
                f,
                "first argument should be a symbol or a lambda declaration"
            ),
        }
    }
}

#[derive(Debug)]
pub enum SetError {
    NameNotASymbol,
}

impl fmt::Display for SetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetError::NameNotASymbol => write!(f, "name of variable should be a symbol"),
        }
    }
}

#[derive(Debug)]
pub enum LambdaError {
    ParametersNotGivenAsList,
    ParameterNotASymbol,
}

impl fmt::Display for LambdaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LambdaError::ParametersNotGivenAsList => {
                write!(f, "parameters should be given as a proper list")
            }
            LambdaError::ParameterNotASymbol => write!(f, "parameters should be symbols"),
        }
    }
}

pub static QUOTE: PrimitiveFn = PrimitiveFn {
    name: "quote",
    arity: Arity::exactly(1),
    body: PrimitiveBody::SpecialForm(apply_quote),
};

fn apply_quote(args: &[Object], _env: &Rc<Environment>) -> Result {
    Ok(args[0].clone())
}

pub static IF: PrimitiveFn = PrimitiveFn {
    name: "if",
    arity: Arity::Between(2..=3),
    body: PrimitiveBody::SpecialForm(apply_if),
};

fn apply_if(args: &[Object], env: &Rc<Environment>) -> Result {
    let condition = EVAL(&args[0], env)?;
    if truthy(&condition) {
        EVAL(&args[1], env)
    } else if args.len() == 3 {
        EVAL(&args[2], env)
    } else {
        Ok(Object::Nil)
    }
}

pub static DEFINE: PrimitiveFn = PrimitiveFn {
    name: "define",
    arity: Arity::at_least(2),
    body: PrimitiveBody::SpecialForm(apply_define),
};

fn apply_define(args: &[Object], env: &Rc<Environment>) -> Result {
    match &args[0] {
        Object::Symbol(name) => {
            Arity::exactly(2)
                .validate_for(args.len(), "define")
                .map_err(SyntaxError::BadArgCount)?;
            let value = EVAL(&args[1], env)?;
            log::debug!("define {} as {}", name, value);
            env.define(name.clone(), value);
        }
        declaration @ Object::Pair(_) if declaration.is_list() => {
            let declaration = declaration.list_to_vec()?;
            let name = match &declaration[0] {
                Object::Symbol(name) => name.clone(),
                _ => return Err(DefineError::NameNotASymbol.into()),
            };
            let closure = make_closure(&declaration[1..], &args[1..], env)?;
            log::debug!("define {} as {}", name, closure);
            env.define(name, closure);
        }
        _ => return Err(DefineError::BadTarget.into()),
    }
    Ok(Object::Nil)
}

pub static SET: PrimitiveFn = PrimitiveFn {
    name: "set!",
    arity: Arity::exactly(2),
    body: PrimitiveBody::SpecialForm(apply_set),
};

fn apply_set(args: &[Object], env: &Rc<Environment>) -> Result {
    let name = match &args[0] {
        Object::Symbol(name) => name,
        _ => return Err(RuntimeError::Set(SetError::NameNotASymbol).into()),
    };
    let value = EVAL(&args[1], env)?;
    env.set(name, value).map_err(Error::Name)?;
    Ok(Object::Nil)
}

pub static LAMBDA: PrimitiveFn = PrimitiveFn {
    name: "lambda",
    arity: Arity::at_least(2),
    body: PrimitiveBody::SpecialForm(apply_lambda),
};

fn apply_lambda(args: &[Object], env: &Rc<Environment>) -> Result {
    let parameters = args[0]
        .list_to_vec()
        .map_err(|_| LambdaError::ParametersNotGivenAsList)?;
    make_closure(&parameters, &args[1..], env)
}

// Captures `env`, the environment active where the lambda is written.
fn make_closure(parameters: &[Object], body: &[Object], env: &Rc<Environment>) -> Result {
    let extract_symbol = |obj: &Object| match obj {
        Object::Symbol(s) => Ok(s.clone()),
        _ => Err(LambdaError::ParameterNotASymbol),
    };
    let parameters = parameters
        .iter()
        .map(extract_symbol)
        .collect::<std::result::Result<Vec<Symbol>, _>>()?;
    let closure = Closure {
        parameters,
        body: body.to_vec(),
        parent: env.clone(),
    };
    Ok(Object::Closure(Rc::new(closure)))
}

/// `and` and `or` evaluate their arguments one at a time, stopping at the
/// first whose truth value decides the result and returning that argument's
/// value.
fn short_circuit(
    args: &[Object],
    env: &Rc<Environment>,
    identity: bool,
    stop_when: bool,
) -> Result {
    let mut last = Object::boolean(identity);
    for arg in args {
        last = EVAL(arg, env)?;
        if truthy(&last) == stop_when {
            break;
        }
    }
    Ok(last)
}

pub static AND: PrimitiveFn = PrimitiveFn {
    name: "and",
    arity: Arity::at_least(0),
    body: PrimitiveBody::SpecialForm(apply_and),
};

fn apply_and(args: &[Object], env: &Rc<Environment>) -> Result {
    short_circuit(args, env, true, false)
}

pub static OR: PrimitiveFn = PrimitiveFn {
    name: "or",
    arity: Arity::at_least(0),
    body: PrimitiveBody::SpecialForm(apply_or),
};

fn apply_or(args: &[Object], env: &Rc<Environment>) -> Result {
    short_circuit(args, env, false, true)
}

impl From<DefineError> for Error {
    fn from(e: DefineError) -> Self {
        Error::Runtime(RuntimeError::Define(e))
    }
}

impl From<LambdaError> for Error {
    fn from(e: LambdaError) -> Self {
        Error::Syntax(SyntaxError::Lambda(e))
    }
}
