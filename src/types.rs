use crate::environment::Environment;
use crate::evaluator;
use derive_more::Deref;
use itertools::Itertools;
use std::cell::RefCell;
use std::fmt;
use std::fmt::Formatter;
use std::ops::{RangeFrom, RangeInclusive};
use std::rc::Rc;

pub type Int = i64;

pub const TRUE: &str = "#t";
pub const FALSE: &str = "#f";

#[derive(Deref, Debug, PartialEq, Eq, Hash, Clone)]
pub struct Symbol(pub String);

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol(name.to_owned())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub enum Arity {
    Between(RangeInclusive<usize>),
    AtLeast(RangeFrom<usize>),
}

#[derive(Debug)]
pub struct BadArgCount {
    name: String,
    expected: Arity,
    got: usize,
}

impl BadArgCount {
    pub(crate) fn new(name: &str, expected: Arity, got: usize) -> Self {
        Self {
            name: name.to_owned(),
            expected,
            got,
        }
    }
}

impl fmt::Display for BadArgCount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "When evaluating {} expected {} arguments, but received {} arguments",
            self.name, self.expected, self.got
        )
    }
}

impl Arity {
    pub(crate) const fn exactly(n: usize) -> Self {
        Self::Between(n..=n)
    }

    pub(crate) const fn at_least(n: usize) -> Self {
        Self::AtLeast(n..)
    }

    pub(crate) fn contains(&self, n: usize) -> bool {
        match self {
            Self::Between(range) => range.contains(&n),
            Self::AtLeast(range) => range.contains(&n),
        }
    }

    pub(crate) fn validate_for(&self, n: usize, name: &str) -> Result<(), BadArgCount> {
        match self.contains(n) {
            true => Ok(()),
            false => Err(BadArgCount::new(name, self.clone(), n)),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Between(r) => {
                if r.start() == r.end() {
                    write!(f, "exactly {}", r.start())
                } else {
                    write!(f, "from {} to {}", r.start(), r.end())
                }
            }
            Arity::AtLeast(r) => write!(f, "at least {}", r.start),
        }
    }
}

/// How a primitive receives its argument list.
pub enum PrimitiveBody {
    /// Arguments are evaluated in the caller's environment, left to right,
    /// before the primitive runs.
    Procedure(fn(&[Object]) -> evaluator::Result),
    /// Arguments arrive unevaluated together with the caller's environment.
    SpecialForm(fn(&[Object], &Rc<Environment>) -> evaluator::Result),
}

pub struct PrimitiveFn {
    pub name: &'static str,
    pub arity: Arity,
    pub body: PrimitiveBody,
}

impl fmt::Debug for PrimitiveFn {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "primitive function #<{}>", self.name)
    }
}

pub struct Closure {
    pub parameters: Vec<Symbol>,
    pub body: Vec<Object>,
    pub parent: Rc<Environment>,
}

impl Closure {
    pub fn arity(&self) -> Arity {
        Arity::exactly(self.parameters.len())
    }
}

impl fmt::Debug for Closure {
    // Not derived because we want to skip the parent: the parent may well contain this Closure!
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Closure{{parameters: ({}), body: {:?}}}",
            self.parameters.iter().join(" "),
            self.body
        )
    }
}

/// A cons cell. Both slots can be reassigned after construction, so pairs
/// may be shared between several lists and may form cycles.
#[derive(Debug)]
pub struct Pair {
    first: RefCell<Object>,
    second: RefCell<Object>,
}

impl Pair {
    pub fn first(&self) -> Object {
        self.first.borrow().clone()
    }

    pub fn second(&self) -> Object {
        self.second.borrow().clone()
    }

    pub fn set_first(&self, obj: Object) {
        self.first.replace(obj);
    }

    pub fn set_second(&self, obj: Object) {
        self.second.replace(obj);
    }
}

// Dropping a long list must not recurse once per cell.
impl Drop for Pair {
    fn drop(&mut self) {
        let mut next = self.second.replace(Object::Nil);
        while let Object::Pair(rc) = next {
            match Rc::try_unwrap(rc) {
                Ok(pair) => next = pair.second.replace(Object::Nil),
                Err(_) => break,
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum Object {
    /// The empty list: the absence of a cell.
    Nil,
    Integer(Int),
    Symbol(Symbol),
    Pair(Rc<Pair>),
    Primitive(&'static PrimitiveFn),
    Closure(Rc<Closure>),
}

pub(crate) fn is_false(obj: &Object) -> bool {
    match obj {
        Object::Symbol(s) => s.as_str() == FALSE,
        _ => false,
    }
}

pub(crate) fn truthy(obj: &Object) -> bool {
    !is_false(obj)
}

#[derive(Debug)]
pub enum TypeMismatch {
    NotAnInt,
    NotAPair,
    NotASymbol,
}

impl fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TypeMismatch::NotAnInt => "expected a number",
            TypeMismatch::NotAPair => "expected a pair",
            TypeMismatch::NotASymbol => "expected a symbol",
        })
    }
}

/// The tail of a chain of pairs did not end in the empty list.
#[derive(Debug)]
pub struct ImproperList;

impl Object {
    pub fn cons(first: Object, second: Object) -> Self {
        Object::Pair(Rc::new(Pair {
            first: RefCell::new(first),
            second: RefCell::new(second),
        }))
    }

    pub fn boolean(value: bool) -> Self {
        Self::new_symbol(if value { TRUE } else { FALSE })
    }

    pub fn new_symbol(name: &str) -> Self {
        Self::Symbol(Symbol::from(name))
    }

    /// Build a proper list from `elements`.
    pub fn wrap_list(elements: Vec<Object>) -> Self {
        Self::wrap_dotted(elements, Object::Nil)
    }

    /// Build a chain of pairs holding `elements` whose final cdr is `tail`.
    pub fn wrap_dotted(elements: Vec<Object>, tail: Object) -> Self {
        elements
            .into_iter()
            .rev()
            .fold(tail, |acc, obj| Object::cons(obj, acc))
    }

    pub(crate) fn as_int(&self) -> Result<Int, TypeMismatch> {
        match self {
            Object::Integer(x) => Ok(*x),
            _ => Err(TypeMismatch::NotAnInt),
        }
    }

    pub(crate) fn as_pair(&self) -> Result<&Rc<Pair>, TypeMismatch> {
        match self {
            Object::Pair(p) => Ok(p),
            _ => Err(TypeMismatch::NotAPair),
        }
    }

    pub(crate) fn as_symbol(&self) -> Result<&Symbol, TypeMismatch> {
        match self {
            Object::Symbol(s) => Ok(s),
            _ => Err(TypeMismatch::NotASymbol),
        }
    }

    pub fn is_nil(&self) -> bool {
        match self {
            Object::Nil => true,
            _ => false,
        }
    }

    pub fn is_pair(&self) -> bool {
        self.as_pair().is_ok()
    }

    pub fn is_number(&self) -> bool {
        self.as_int().is_ok()
    }

    pub fn is_symbol(&self) -> bool {
        self.as_symbol().is_ok()
    }

    pub fn is_boolean(&self) -> bool {
        match self {
            Object::Symbol(s) => s.as_str() == TRUE || s.as_str() == FALSE,
            _ => false,
        }
    }

    /// True for the empty list and for chains of pairs ending in it.
    /// A chain whose cdrs loop back on themselves is not a list.
    pub fn is_list(&self) -> bool {
        let mut slow = self.clone();
        let mut fast = self.clone();
        loop {
            for _ in 0..2 {
                fast = match fast {
                    Object::Nil => return true,
                    Object::Pair(pair) => pair.second(),
                    _ => return false,
                };
            }
            if let Object::Pair(pair) = &slow {
                slow = pair.second();
            }
            if let (Object::Pair(s), Object::Pair(f)) = (&slow, &fast) {
                if Rc::ptr_eq(s, f) {
                    return false;
                }
            }
        }
    }

    /// Collect the elements of a proper list.
    pub fn list_to_vec(&self) -> Result<Vec<Object>, ImproperList> {
        let mut elements = Vec::new();
        let mut obj = self.clone();
        loop {
            match obj {
                Object::Nil => return Ok(elements),
                Object::Pair(pair) => {
                    elements.push(pair.first());
                    obj = pair.second();
                }
                _ => return Err(ImproperList),
            }
        }
    }
}

// Structural equality. Not suitable for cyclic structures.
impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        use Object::*;
        match [self, other] {
            [Nil, Nil] => true,
            [Integer(x), Integer(y)] => x == y,
            [Symbol(x), Symbol(y)] => x == y,
            [Pair(x), Pair(y)] => {
                Rc::ptr_eq(x, y) || (x.first() == y.first() && x.second() == y.second())
            }
            [Primitive(x), Primitive(y)] => x.name == y.name,
            [Closure(x), Closure(y)] => Rc::ptr_eq(x, y),
            [_, _] => false,
        }
    }
}

impl Eq for Object {}
