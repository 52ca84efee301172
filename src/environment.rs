use crate::core;
use crate::types::{Object, Symbol};
use itertools::Itertools;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

#[derive(Debug)]
pub struct UnknownSymbol(pub Symbol);

/// One scope in a chain of lexical scopes.
///
/// Lookup and mutation search this scope first and then each ancestor in
/// turn. Definition only ever touches this scope.
#[derive(Default)]
pub struct Environment {
    bindings: RefCell<HashMap<Symbol, Object>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    /// The root scope, holding every primitive in the core table.
    pub fn global() -> Rc<Self> {
        let env = Self::default();
        for (&name, &func) in core::CORE.iter() {
            env.define(Symbol::from(name), Object::Primitive(func));
        }
        Rc::new(env)
    }

    pub fn spawn_from(parent: &Rc<Self>) -> Rc<Self> {
        Rc::new(Self {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(parent.clone()),
        })
    }

    /// Bind `key` in this scope, shadowing any binding further up the chain.
    pub fn define(&self, key: Symbol, value: Object) -> Option<Object> {
        self.bindings.borrow_mut().insert(key, value)
    }

    /// Rebind the nearest existing binding of `key`. Never creates a binding.
    pub fn set(&self, key: &Symbol, value: Object) -> Result<(), UnknownSymbol> {
        let mut env = self;
        loop {
            if let Some(slot) = env.bindings.borrow_mut().get_mut(key) {
                *slot = value;
                return Ok(());
            }
            match env.parent.as_deref() {
                Some(parent) => env = parent,
                None => return Err(UnknownSymbol(key.clone())),
            }
        }
    }

    pub fn get(&self, key: &Symbol) -> Option<Object> {
        let mut env = self;
        loop {
            if let Some(value) = env.bindings.borrow().get(key) {
                return Some(value.clone());
            }
            env = env.parent.as_deref()?;
        }
    }

    pub fn fetch(&self, key: &Symbol) -> Result<Object, UnknownSymbol> {
        self.get(key).ok_or_else(|| UnknownSymbol(key.clone()))
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut env = self;
        let mut depth = 0;
        loop {
            writeln!(
                f,
                "{}: {}",
                depth,
                env.bindings.borrow().keys().map(|s| s.as_str()).sorted().join(" ")
            )?;
            match env.parent.as_deref() {
                Some(parent) => env = parent,
                None => return Ok(()),
            }
            depth += 1;
        }
    }
}
