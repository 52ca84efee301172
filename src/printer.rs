use crate::types::{Object, Pair};
use itertools::Itertools;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

pub fn pr_str(object: &Object) -> String {
    object.to_string()
}

/// Writes objects, tracking the pairs on the path from the outermost list to
/// the current position. Revisiting one of those means the structure is
/// cyclic, and the repeated part is written as `...`.
struct Printer<'a, 'b> {
    f: &'a mut fmt::Formatter<'b>,
    on_path: HashSet<*const Pair>,
}

impl Printer<'_, '_> {
    fn write(&mut self, object: &Object) -> fmt::Result {
        match object {
            Object::Nil => self.f.write_str("()"),
            Object::Integer(value) => write!(self.f, "{}", value),
            Object::Symbol(name) => self.f.write_str(name),
            Object::Pair(pair) => self.write_list(pair),
            Object::Primitive(func) => write!(self.f, "#<primitive {}>", func.name),
            Object::Closure(closure) => write!(
                self.f,
                "#<lambda ({})>",
                closure.parameters.iter().join(" ")
            ),
        }
    }

    fn write_list(&mut self, head: &Rc<Pair>) -> fmt::Result {
        let mut spine = Vec::new();
        let result = self.write_spine(head, &mut spine);
        for key in spine {
            self.on_path.remove(&key);
        }
        result
    }

    // Walks the spine iteratively so long lists print without deep recursion.
    fn write_spine(&mut self, head: &Rc<Pair>, spine: &mut Vec<*const Pair>) -> fmt::Result {
        let mut cell = head.clone();
        self.f.write_str("(")?;
        loop {
            let key = Rc::as_ptr(&cell);
            if !self.on_path.insert(key) {
                return self.f.write_str("...)");
            }
            spine.push(key);
            self.write(&cell.first())?;
            match cell.second() {
                Object::Nil => return self.f.write_str(")"),
                Object::Pair(next) => {
                    self.f.write_str(" ")?;
                    cell = next;
                }
                tail => {
                    self.f.write_str(" . ")?;
                    self.write(&tail)?;
                    return self.f.write_str(")");
                }
            }
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Printer {
            f,
            on_path: HashSet::new(),
        }
        .write(self)
    }
}
