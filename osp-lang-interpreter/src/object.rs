use std::fmt::Display;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use gc::{Finalize, Gc, Trace};
use rustc_hash::{FxHashMap, FxHasher};
use thiserror::Error;

use crate::environment::Environment;
use osp_lang_core::ast;

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum ObjectType {
    Integer,
    Boolean,
    String,
    Null,
    Error,
    Function,
    Builtin,
    Hash,
}

impl Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ObjectType::Integer => "INTEGER",
            ObjectType::Boolean => "BOOLEAN",
            ObjectType::String => "STRING",
            ObjectType::Null => "NULL",
            ObjectType::Error => "ERROR",
            ObjectType::Function => "FUNCTION",
            ObjectType::Builtin => "BUILTIN",
            ObjectType::Hash => "HASH",
        };
        f.write_str(name)
    }
}

#[derive(Debug, PartialEq, Clone, Trace, Finalize)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    String(String),
    Null,
    Error(#[unsafe_ignore_trace] EvaluationError),
    Function(Function),
    Builtin(#[unsafe_ignore_trace] Builtin),
    Hash(HashPairs),
}

impl Object {
    pub fn null() -> Gc<Object> {
        Gc::new(Object::Null)
    }
    pub fn boolean(value: bool) -> Gc<Object> {
        Gc::new(Object::Boolean(value))
    }
    pub fn integer(value: i64) -> Gc<Object> {
        Gc::new(Object::Integer(value))
    }
    pub fn string(value: String) -> Gc<Object> {
        Gc::new(Object::String(value))
    }
    pub fn error(error: EvaluationError) -> Gc<Object> {
        Gc::new(Object::Error(error))
    }
    pub fn hash(pairs: HashPairs) -> Gc<Object> {
        Gc::new(Object::Hash(pairs))
    }
    pub fn function(
        parameters: Vec<ast::Identifier>,
        body: ast::BlockStatement,
        env: Environment,
    ) -> Gc<Object> {
        Gc::new(Object::Function(Function {
            parameters,
            body,
            env,
        }))
    }
    pub fn builtin(builtin: Builtin) -> Gc<Object> {
        Gc::new(Object::Builtin(builtin))
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            Object::Integer(_) => ObjectType::Integer,
            Object::Boolean(_) => ObjectType::Boolean,
            Object::String(_) => ObjectType::String,
            Object::Null => ObjectType::Null,
            Object::Error(_) => ObjectType::Error,
            Object::Function(_) => ObjectType::Function,
            Object::Builtin(_) => ObjectType::Builtin,
            Object::Hash(_) => ObjectType::Hash,
        }
    }

    pub fn is_truthy(&self) -> bool {
        !matches!(self, Object::Boolean(false) | Object::Null)
    }

    pub fn hash_key(&self) -> Result<HashKey, EvaluationError> {
        let value = match self {
            Object::Integer(value) => *value as u64,
            Object::Boolean(value) => u64::from(*value),
            Object::String(value) => {
                let mut hasher = FxHasher::default();
                value.as_str().hash(&mut hasher);
                hasher.finish()
            }
            _ => return Err(EvaluationError::UnusableAsHashKey(self.object_type())),
        };
        Ok(HashKey {
            object_type: self.object_type(),
            value,
        })
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Object::Integer(value) => write!(f, "{}", value),
            Object::Boolean(value) => write!(f, "{}", value),
            Object::String(value) => write!(f, "{}", value),
            Object::Null => write!(f, "null"),
            Object::Error(error) => write!(f, "ERROR: {}", error),
            Object::Function(function) => write!(f, "{}", function),
            Object::Builtin(_) => write!(f, "builtin function"),
            Object::Hash(pairs) => write!(f, "{}", pairs),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct HashKey {
    pub object_type: ObjectType,
    pub value: u64,
}

#[derive(Debug, PartialEq, Clone, Trace, Finalize)]
pub struct HashPair {
    pub key: Gc<Object>,
    pub value: Gc<Object>,
}

/// Hash contents, kept in first-insertion order.
#[derive(Debug, Clone, Default, Trace, Finalize)]
pub struct HashPairs {
    pairs: Vec<HashPair>,
    #[unsafe_ignore_trace]
    index: FxHashMap<HashKey, usize>,
}

impl HashPairs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a pair; an existing key keeps its position and gets the new value.
    pub fn insert(&mut self, key: Gc<Object>, value: Gc<Object>) -> Result<(), EvaluationError> {
        let hash_key = key.hash_key()?;
        match self.index.get(&hash_key) {
            Some(&position) => self.pairs[position].value = value,
            None => {
                self.index.insert(hash_key, self.pairs.len());
                self.pairs.push(HashPair { key, value });
            }
        }
        Ok(())
    }

    pub fn get(&self, key: &Object) -> Result<Option<&Gc<Object>>, EvaluationError> {
        let hash_key = key.hash_key()?;
        Ok(self
            .index
            .get(&hash_key)
            .map(|&position| &self.pairs[position].value))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HashPair> {
        self.pairs.iter()
    }
}

impl PartialEq for HashPairs {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.pairs.iter().all(|pair| {
                matches!(other.get(&pair.key), Ok(Some(value)) if *value == pair.value)
            })
    }
}

impl Display for HashPairs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, pair) in self.pairs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", pair.key, pair.value)?;
        }
        write!(f, "}}")
    }
}

#[derive(Clone, Trace, Finalize)]
pub struct Function {
    #[unsafe_ignore_trace]
    pub parameters: Vec<ast::Identifier>,
    #[unsafe_ignore_trace]
    pub body: ast::BlockStatement,
    pub env: Environment,
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.parameters == other.parameters
            && self.body == other.body
            && self.env.ptr_eq(&other.env)
    }
}

// The environment is left out, it may contain this very function.
impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("parameters", &self.parameters)
            .field("body", &self.body.to_string())
            .finish_non_exhaustive()
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parameters = self
            .parameters
            .iter()
            .map(|id| id.name.as_ref())
            .collect::<Vec<&str>>();
        write!(f, "fn({}) {}", parameters.join(", "), self.body)
    }
}

pub type BuiltinFn = fn(&[Gc<Object>]) -> Result<Gc<Object>, EvaluationError>;

#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl std::fmt::Debug for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builtin").field("name", &self.name).finish()
    }
}

#[derive(Debug, PartialEq, Clone, Error)]
pub enum EvaluationError {
    #[error("type mismatch: {left} {operator} {right}")]
    TypeMismatch {
        left: ObjectType,
        operator: ast::InfixOperationKind,
        right: ObjectType,
    },
    #[error("unknown operator: {left} {operator} {right}")]
    UnknownInfixOperator {
        left: ObjectType,
        operator: ast::InfixOperationKind,
        right: ObjectType,
    },
    #[error("unknown operator: {operator}{right}")]
    UnknownPrefixOperator {
        operator: ast::PrefixOperationKind,
        right: ObjectType,
    },
    #[error("identifier not found: {0}")]
    IdentifierNotFound(Rc<str>),
    #[error("not a function: {0}")]
    NotAFunction(ObjectType),
    #[error("wrong number of arguments: want={expected}, got={actual}")]
    WrongArgumentCount { expected: usize, actual: usize },
    #[error("unusable as hash key: {0}")]
    UnusableAsHashKey(ObjectType),
    #[error("index operator not supported: {0}")]
    IndexNotSupported(ObjectType),
    #[error("division by zero")]
    DivisionByZero,
    #[error("maximum call depth of {0} exceeded")]
    CallDepthExceeded(usize),
    #[error("{0}")]
    Builtin(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_hash_key() {
        let hello1 = Object::String("Hello World".to_owned());
        let hello2 = Object::String("Hello World".to_owned());
        let diff1 = Object::String("My name is johnny".to_owned());
        let diff2 = Object::String("My name is johnny".to_owned());

        assert_eq!(hello1.hash_key(), hello2.hash_key());
        assert_eq!(diff1.hash_key(), diff2.hash_key());
        assert_ne!(hello1.hash_key(), diff1.hash_key());
        assert_ne!(
            Object::String("a".to_owned()).hash_key(),
            Object::String("a\0".to_owned()).hash_key()
        );
    }

    #[test]
    fn test_scalar_hash_keys() {
        assert_eq!(
            Object::Integer(7).hash_key(),
            Ok(HashKey {
                object_type: ObjectType::Integer,
                value: 7
            })
        );
        assert_eq!(
            Object::Boolean(true).hash_key().map(|key| key.value),
            Ok(1)
        );
        assert_eq!(
            Object::Boolean(false).hash_key().map(|key| key.value),
            Ok(0)
        );
        // same digest, different type
        assert_ne!(Object::Integer(1).hash_key(), Object::Boolean(true).hash_key());
    }

    #[test]
    fn test_unhashable_objects() {
        let unhashable = vec![
            Object::Null,
            Object::Error(EvaluationError::DivisionByZero),
            Object::Hash(HashPairs::new()),
            Object::Function(Function {
                parameters: vec![],
                body: ast::BlockStatement::default(),
                env: Environment::new(),
            }),
        ];
        for object in unhashable {
            assert_eq!(
                object.hash_key(),
                Err(EvaluationError::UnusableAsHashKey(object.object_type()))
            );
        }
    }

    #[test]
    fn test_hash_pairs_last_write_wins() {
        let mut pairs = HashPairs::new();
        pairs
            .insert(Object::string("a".to_owned()), Object::integer(1))
            .unwrap();
        pairs
            .insert(Object::string("b".to_owned()), Object::integer(2))
            .unwrap();
        pairs
            .insert(Object::string("a".to_owned()), Object::integer(3))
            .unwrap();

        assert_eq!(pairs.len(), 2);
        assert_eq!(
            pairs.get(&Object::String("a".to_owned())),
            Ok(Some(&Object::integer(3)))
        );
        assert_eq!(pairs.get(&Object::String("c".to_owned())), Ok(None));
        assert_eq!(pairs.to_string(), "{a: 3, b: 2}");
    }

    #[test]
    fn test_inspect() {
        let tests = vec![
            (Object::Integer(-5), "-5"),
            (Object::Boolean(true), "true"),
            (Object::String("hi there".to_owned()), "hi there"),
            (Object::Null, "null"),
            (
                Object::Error(EvaluationError::IdentifierNotFound("foo".into())),
                "ERROR: identifier not found: foo",
            ),
        ];
        for (object, expected) in tests {
            assert_eq!(object.to_string(), expected);
        }
    }

    #[test]
    fn test_truthiness() {
        assert!(Object::Integer(0).is_truthy());
        assert!(Object::String(String::new()).is_truthy());
        assert!(Object::Boolean(true).is_truthy());
        assert!(!Object::Boolean(false).is_truthy());
        assert!(!Object::Null.is_truthy());
    }
}
