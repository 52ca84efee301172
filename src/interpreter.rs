use crate::environment::Environment;
use crate::evaluator::{self, EVAL};
use crate::{printer, reader, Object};
use std::rc::Rc;

pub type Result<T = String> = evaluator::Result<T>;

/// One interpreter session. Definitions made by one call to [`Interpreter::run`]
/// remain visible to later calls.
pub struct Interpreter {
    global: Rc<Environment>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self {
            global: Environment::global(),
        }
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read, evaluate and print a single datum.
    pub fn run(&self, source: &str) -> Result {
        let result = self.eval_str(source)?;
        Ok(printer::pr_str(&result))
    }

    pub fn eval_str(&self, source: &str) -> Result<Object> {
        let ast = reader::read_str(source)?;
        log::debug!("read {}", ast);
        EVAL(&ast, &self.global)
    }
}
