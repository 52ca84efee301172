use crate::evaluator::{self, RuntimeError};
use crate::special_forms::{AND, DEFINE, IF, LAMBDA, OR, QUOTE, SET};
use crate::types::{is_false, Arity, BadArgCount, Int, Object, Pair, PrimitiveBody, PrimitiveFn};
use itertools::Itertools;
use std::collections::HashMap;
use std::convert::TryFrom;
use std::rc::Rc;

fn grab_ints(args: &[Object]) -> evaluator::Result<Vec<Int>> {
    let type_check: Result<Vec<_>, _> = args.iter().map(|o| o.as_int()).collect();
    Ok(type_check?)
}

fn grab_pair(obj: &Object) -> evaluator::Result<&Rc<Pair>> {
    Ok(obj.as_pair()?)
}

macro_rules! predicate_primitive {
    ($SYMBOL:expr, $NAME:ident, $TEST:expr) => {
        paste::item! {
            pub static $NAME: PrimitiveFn = PrimitiveFn {
                name: $SYMBOL,
                arity: Arity::exactly(1),
                body: PrimitiveBody::Procedure([<apply_ $NAME:lower>]),
            };

            fn [<apply_ $NAME:lower>](args: &[Object]) -> evaluator::Result {
                let test: fn(&Object) -> bool = $TEST;
                Ok(Object::boolean(test(&args[0])))
            }
        }
    };
}

predicate_primitive!("pair?", PAIR_TEST, Object::is_pair);
predicate_primitive!("null?", NULL_TEST, Object::is_nil);
predicate_primitive!("list?", LIST_TEST, Object::is_list);
predicate_primitive!("number?", NUMBER_TEST, Object::is_number);
predicate_primitive!("symbol?", SYMBOL_TEST, Object::is_symbol);
predicate_primitive!("boolean?", BOOLEAN_TEST, Object::is_boolean);
predicate_primitive!("not", NOT, is_false);

pub static CONS: PrimitiveFn = PrimitiveFn {
    name: "cons",
    arity: Arity::exactly(2),
    body: PrimitiveBody::Procedure(cons_),
};

fn cons_(args: &[Object]) -> evaluator::Result {
    Ok(Object::cons(args[0].clone(), args[1].clone()))
}

pub static CAR: PrimitiveFn = PrimitiveFn {
    name: "car",
    arity: Arity::exactly(1),
    body: PrimitiveBody::Procedure(car_),
};

fn car_(args: &[Object]) -> evaluator::Result {
    Ok(grab_pair(&args[0])?.first())
}

pub static CDR: PrimitiveFn = PrimitiveFn {
    name: "cdr",
    arity: Arity::exactly(1),
    body: PrimitiveBody::Procedure(cdr_),
};

fn cdr_(args: &[Object]) -> evaluator::Result {
    Ok(grab_pair(&args[0])?.second())
}

pub static SET_CAR: PrimitiveFn = PrimitiveFn {
    name: "set-car!",
    arity: Arity::exactly(2),
    body: PrimitiveBody::Procedure(set_car_),
};

fn set_car_(args: &[Object]) -> evaluator::Result {
    grab_pair(&args[0])?.set_first(args[1].clone());
    Ok(Object::Nil)
}

pub static SET_CDR: PrimitiveFn = PrimitiveFn {
    name: "set-cdr!",
    arity: Arity::exactly(2),
    body: PrimitiveBody::Procedure(set_cdr_),
};

fn set_cdr_(args: &[Object]) -> evaluator::Result {
    grab_pair(&args[0])?.set_second(args[1].clone());
    Ok(Object::Nil)
}

pub static LIST: PrimitiveFn = PrimitiveFn {
    name: "list",
    arity: Arity::at_least(0),
    body: PrimitiveBody::Procedure(list_),
};

fn list_(args: &[Object]) -> evaluator::Result {
    Ok(Object::wrap_list(args.to_vec()))
}

// Follows `k` cdrs, failing if the chain runs out of pairs first.
fn list_tail_internal(list: &Object, orig_index: Int) -> evaluator::Result {
    let k = usize::try_from(orig_index).map_err(|_| RuntimeError::BadIndex(orig_index))?;
    let mut obj = list.clone();
    for _ in 0..k {
        obj = match obj {
            Object::Pair(pair) => pair.second(),
            _ => return Err(RuntimeError::BadIndex(orig_index).into()),
        };
    }
    Ok(obj)
}

pub static LIST_TAIL: PrimitiveFn = PrimitiveFn {
    name: "list-tail",
    arity: Arity::exactly(2),
    body: PrimitiveBody::Procedure(list_tail_),
};

fn list_tail_(args: &[Object]) -> evaluator::Result {
    let index = args[1].as_int()?;
    list_tail_internal(&args[0], index)
}

pub static LIST_REF: PrimitiveFn = PrimitiveFn {
    name: "list-ref",
    arity: Arity::exactly(2),
    body: PrimitiveBody::Procedure(list_ref_),
};

fn list_ref_(args: &[Object]) -> evaluator::Result {
    let index = args[1].as_int()?;
    match list_tail_internal(&args[0], index)? {
        Object::Pair(pair) => Ok(pair.first()),
        _ => Err(RuntimeError::BadIndex(index).into()),
    }
}

/// Left fold over at least one number, or over `seed` followed by the
/// arguments when a seed exists.
fn fold_ints(
    name: &str,
    args: &[Object],
    seed: Option<Int>,
    op: fn(Int, Int) -> evaluator::Result<Int>,
) -> evaluator::Result {
    let ints = grab_ints(args)?;
    let (first, rest) = match (seed, ints.split_first()) {
        (Some(seed), _) => (seed, ints.as_slice()),
        (None, Some((&first, rest))) => (first, rest),
        (None, None) => {
            let e = BadArgCount::new(name, Arity::at_least(1), 0);
            return Err(RuntimeError::BadArgCount(e).into());
        }
    };
    let value = rest.iter().try_fold(first, |acc, &x| op(acc, x))?;
    Ok(Object::Integer(value))
}

fn checked_div(x: Int, y: Int) -> evaluator::Result<Int> {
    match y {
        0 => Err(RuntimeError::DivideByZero.into()),
        _ => Ok(x.wrapping_div(y)),
    }
}

pub static SUM: PrimitiveFn = PrimitiveFn {
    name: "+",
    arity: Arity::at_least(0),
    body: PrimitiveBody::Procedure(sum_),
};

fn sum_(args: &[Object]) -> evaluator::Result {
    fold_ints("+", args, Some(0), |x, y| Ok(x.wrapping_add(y)))
}

pub static MUL: PrimitiveFn = PrimitiveFn {
    name: "*",
    arity: Arity::at_least(0),
    body: PrimitiveBody::Procedure(mul_),
};

fn mul_(args: &[Object]) -> evaluator::Result {
    fold_ints("*", args, Some(1), |x, y| Ok(x.wrapping_mul(y)))
}

pub static SUB: PrimitiveFn = PrimitiveFn {
    name: "-",
    arity: Arity::at_least(1),
    body: PrimitiveBody::Procedure(sub_),
};

fn sub_(args: &[Object]) -> evaluator::Result {
    match args {
        [x] => Ok(Object::Integer(x.as_int()?.wrapping_neg())),
        _ => fold_ints("-", args, None, |x, y| Ok(x.wrapping_sub(y))),
    }
}

pub static DIV: PrimitiveFn = PrimitiveFn {
    name: "/",
    arity: Arity::at_least(1),
    body: PrimitiveBody::Procedure(div_),
};

fn div_(args: &[Object]) -> evaluator::Result {
    match args {
        [x] => checked_div(1, x.as_int()?).map(Object::Integer),
        _ => fold_ints("/", args, None, checked_div),
    }
}

pub static MIN: PrimitiveFn = PrimitiveFn {
    name: "min",
    arity: Arity::at_least(1),
    body: PrimitiveBody::Procedure(min_),
};

fn min_(args: &[Object]) -> evaluator::Result {
    fold_ints("min", args, None, |x, y| Ok(x.min(y)))
}

pub static MAX: PrimitiveFn = PrimitiveFn {
    name: "max",
    arity: Arity::at_least(1),
    body: PrimitiveBody::Procedure(max_),
};

fn max_(args: &[Object]) -> evaluator::Result {
    fold_ints("max", args, None, |x, y| Ok(x.max(y)))
}

pub static ABS: PrimitiveFn = PrimitiveFn {
    name: "abs",
    arity: Arity::exactly(1),
    body: PrimitiveBody::Procedure(abs_),
};

fn abs_(args: &[Object]) -> evaluator::Result {
    Ok(Object::Integer(args[0].as_int()?.wrapping_abs()))
}

// Every adjacent pair of arguments must satisfy `comp`.
fn comparison_(args: &[Object], comp: fn(&Int, &Int) -> bool) -> evaluator::Result {
    let ints = grab_ints(args)?;
    let holds = ints.iter().tuple_windows().all(|(x, y)| comp(x, y));
    Ok(Object::boolean(holds))
}

macro_rules! comparison_primitive {
    ($SYMBOL:tt, $NAME:ident) => {
        paste::item! {
            pub static $NAME: PrimitiveFn = PrimitiveFn {
                name: stringify!($SYMBOL),
                arity: Arity::at_least(0),
                body: PrimitiveBody::Procedure([<apply_ $NAME:lower>]),
            };

            fn [<apply_ $NAME:lower>](args: &[Object]) -> evaluator::Result {
                comparison_(args, Int::[<$NAME:lower>])
            }
        }
    };
}

comparison_primitive!(<, LT);
comparison_primitive!(<=, LE);
comparison_primitive!(>, GT);
comparison_primitive!(>=, GE);
comparison_primitive!(=, EQ);

type Namespace = HashMap<&'static str, &'static PrimitiveFn>;
lazy_static! {
    pub static ref CORE: Namespace = {
        let mut map = Namespace::new();
        for &func in [
            // Special forms
            &QUOTE,
            &IF,
            &DEFINE,
            &SET,
            &LAMBDA,
            &AND,
            &OR,
            // Working with lists
            &CONS,
            &CAR,
            &CDR,
            &SET_CAR,
            &SET_CDR,
            &LIST,
            &LIST_TAIL,
            &LIST_REF,
            // Arithmetic
            &SUM,
            &SUB,
            &MUL,
            &DIV,
            &MIN,
            &MAX,
            &ABS,
            // Comparisons
            &LT,
            &LE,
            &GT,
            &GE,
            &EQ,
            // Casting and testing
            &PAIR_TEST,
            &NULL_TEST,
            &LIST_TEST,
            &NUMBER_TEST,
            &SYMBOL_TEST,
            &BOOLEAN_TEST,
            &NOT,
        ].iter() {
            map.insert(func.name, func);
        }
        map
    };
}
