pub mod cmdline;
pub mod core;
pub mod environment;
pub mod evaluator;
pub mod interpreter;
pub mod printer;
pub mod reader;
pub mod special_forms;
pub mod tokens;
pub mod types;

#[macro_use]
extern crate lazy_static;
extern crate derive_more;

pub use evaluator::{Error, ErrorKind};
pub use interpreter::Interpreter;
pub use types::Object;
