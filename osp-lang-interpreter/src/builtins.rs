use gc::Gc;
use log::trace;

use crate::object::{Builtin, EvaluationError, Object};

fn unexpected_number_of_arguments_error(expected: usize, got: usize) -> EvaluationError {
    EvaluationError::Builtin(format!(
        "wrong number of arguments. got={}, want={}",
        got, expected
    ))
}

fn builtin_len(args: &[Gc<Object>]) -> Result<Gc<Object>, EvaluationError> {
    let [arg] = args else {
        return Err(unexpected_number_of_arguments_error(1, args.len()));
    };
    match &**arg {
        Object::String(s) => Ok(Object::integer(s.len() as i64)),
        Object::Hash(pairs) => Ok(Object::integer(pairs.len() as i64)),
        other => Err(EvaluationError::Builtin(format!(
            "argument to `len` not supported, got {}",
            other.object_type()
        ))),
    }
}

fn builtin_puts(args: &[Gc<Object>]) -> Result<Gc<Object>, EvaluationError> {
    for arg in args {
        println!("{}", arg);
    }
    Ok(Object::null())
}

const BUILTINS: &[Builtin] = &[
    Builtin {
        name: "len",
        func: builtin_len,
    },
    Builtin {
        name: "puts",
        func: builtin_puts,
    },
];

pub fn lookup(name: &str) -> Option<Builtin> {
    let builtin = BUILTINS.iter().find(|builtin| builtin.name == name).copied();
    if builtin.is_some() {
        trace!("resolved builtin `{}`", name);
    }
    builtin
}
