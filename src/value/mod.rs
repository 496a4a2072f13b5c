//! A closed variant for heterogeneous, dynamically-shaped keys and elements.
//!
//! `Value` is what the oracle matches on when a map must hold keys of mixed
//! kinds: scalars, ordered sequences, records compared by their fields,
//! objects compared by identity, and live resources that cannot be keys at
//! all. A `Value` owns its children, so a value can never contain itself and
//! structural hashing always terminates.
use std::{
    any::Any,
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use indexmap::IndexMap;
use ordered_float::OrderedFloat;

use crate::{
    error::{Error, Result},
    oracle::{HashKey, StructuralHash},
};

#[cfg(feature = "json")]
mod json;

#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(OrderedFloat<f64>),
    Str(Arc<str>),
    Seq(Vec<Value>),
    /// Fields compared structurally; field order is kept for display only.
    Record(IndexMap<String, Value>),
    /// A value that opted out of structural equality.
    Opaque(Opaque),
    /// A live handle. Not hashable.
    Resource(Resource),
}

impl Value {
    pub fn str(s: &str) -> Value {
        Value::Str(s.into())
    }

    pub fn float(f: f64) -> Value {
        Value::Float(OrderedFloat(f))
    }

    pub fn seq(items: impl IntoIterator<Item = Value>) -> Value {
        Value::Seq(items.into_iter().collect())
    }

    /// Build a record. A repeated name keeps its last value.
    pub fn record<S: Into<String>>(fields: impl IntoIterator<Item = (S, Value)>) -> Value {
        Value::Record(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Wrap `value` so that it is compared by identity instead of by contents.
    pub fn opaque(value: Value) -> Value {
        Value::Opaque(Opaque::new(value))
    }

    pub fn resource(name: &str, handle: impl Any + Send + Sync) -> Value {
        Value::Resource(Resource::new(name, handle))
    }

    /// A short name for the kind of this value.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Seq(_) => "sequence",
            Value::Record(_) => "record",
            Value::Opaque(_) => "opaque",
            Value::Resource(_) => "resource",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a record field. Opaque records expose their fields too.
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Record(fields) => fields.get(name),
            Value::Opaque(o) => o.inner().field(name),
            _ => None,
        }
    }
}

static NEXT_IDENTITY: AtomicU64 = AtomicU64::new(1);

/// A value with identity semantics. Clones share the identity.
#[derive(Clone)]
pub struct Opaque {
    id: u64,
    inner: Arc<Value>,
}

impl Opaque {
    pub fn new(value: Value) -> Opaque {
        Opaque {
            id: NEXT_IDENTITY.fetch_add(1, Ordering::Relaxed),
            inner: Arc::new(value),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn inner(&self) -> &Value {
        &self.inner
    }
}

/// A named live handle, such as an open file.
#[derive(Clone)]
pub struct Resource {
    name: Arc<str>,
    handle: Arc<dyn Any + Send + Sync>,
}

impl Resource {
    pub fn new(name: &str, handle: impl Any + Send + Sync) -> Resource {
        Resource {
            name: name.into(),
            handle: Arc::new(handle),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.handle.downcast_ref()
    }
}

impl StructuralHash for Value {
    fn hash_key(&self) -> Result<HashKey> {
        match self {
            Value::Null => Ok(HashKey::null()),
            Value::Bool(b) => Ok(HashKey::boolean(*b)),
            Value::Int(n) => Ok(HashKey::int(*n as i128)),
            Value::Float(f) => Ok(HashKey::float(f.0)),
            Value::Str(s) => Ok(HashKey::text(s)),
            Value::Seq(items) => HashKey::sequence(items.iter().map(Value::hash_key)),
            Value::Record(fields) => {
                HashKey::record(fields.iter().map(|(k, v)| (k.as_str(), v.hash_key())))
            }
            Value::Opaque(o) => Ok(HashKey::identity(o.id)),
            Value::Resource(_) => Err(Error::unsupported(self.kind())),
        }
    }

    fn structural_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(l), Value::Bool(r)) => l == r,
            (Value::Int(l), Value::Int(r)) => l == r,
            (Value::Float(l), Value::Float(r)) => l == r,
            (Value::Str(l), Value::Str(r)) => l == r,
            (Value::Seq(l), Value::Seq(r)) => l == r,
            // IndexMap equality ignores insertion order.
            (Value::Record(l), Value::Record(r)) => l == r,
            (Value::Opaque(l), Value::Opaque(r)) => l.id == r.id,
            (Value::Resource(l), Value::Resource(r)) => Arc::ptr_eq(&l.handle, &r.handle),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "{b:?}"),
            Value::Int(n) => write!(f, "{n:?}"),
            Value::Float(x) => write!(f, "{:?}", x.0),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Seq(items) => f.debug_list().entries(items).finish(),
            Value::Record(fields) => f.debug_map().entries(fields).finish(),
            Value::Opaque(o) => write!(f, "#{}{:?}", o.id, o.inner),
            Value::Resource(r) => write!(f, "#<resource {}>", r.name),
        }
    }
}

/// The textual form written by stream sinks.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{}", x.0),
            Value::Str(s) => write!(f, "{s}"),
            Value::Seq(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Record(fields) => {
                write!(f, "{{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                write!(f, "}}")
            }
            Value::Opaque(o) => write!(f, "{}", o.inner),
            Value::Resource(r) => write!(f, "#<resource {}>", r.name),
        }
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Value {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Value {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Value {
        Value::Int(n.into())
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Value {
        Value::float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::str(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::Str(s.into())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Value {
        Value::Seq(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Value {
        opt.map_or(Value::Null, Into::into)
    }
}
