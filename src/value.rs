// used to print out readable forms of a value
use std::fmt;
use std::sync::Arc;

use crate::frame::Frame;
use crate::ident::{self, AsFrameId, FrameId};

// ------------- Value -------------
/// A native client value, the decoded form of anything the engine sends and
/// the source form of anything we send back.
///
/// Symbols are kept apart from ordinary strings: an engine symbol `RXN-9000`
/// is `Value::Symbol("RXN-9000")` and prints as `|RXN-9000|`. A slot value
/// holding a symbol is a reference to another frame, which is only turned
/// into a [`Frame`] when explicitly asked (see [`Frame::references`]).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The absent-marker.
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    /// Conversions from text turn `|X|` into `Symbol("X")` instead, matching
    /// what decoding produces.
    String(String),
    Symbol(String),
    Keyword(String),
    Sequence(Vec<Value>),
    Mapping(Mapping),
    /// A fixed-arity pair sent as a dotted (improper) list.
    Pair(Box<Value>, Box<Value>),
}

impl Value {
    pub fn symbol(name: impl Into<String>) -> Self {
        Value::Symbol(name.into())
    }
    pub fn keyword(name: impl AsRef<str>) -> Self {
        let name = name.as_ref();
        Value::Keyword(name.strip_prefix(':').unwrap_or(name).replace('_', "-"))
    }
    pub fn pair(head: impl Into<Value>, tail: impl Into<Value>) -> Self {
        Value::Pair(Box::new(head.into()), Box::new(tail.into()))
    }
    /// A one-element pair; its head is the empty/false token.
    pub fn half_pair(tail: impl Into<Value>) -> Self {
        Value::Pair(Box::new(Value::Null), Box::new(tail.into()))
    }
    /// A sequence of frame ids, for operations taking a list of frames.
    pub fn frame_list<I, F>(frames: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: AsFrameId,
    {
        Value::Sequence(frames.into_iter().map(|f| Value::from(f.frame_id())).collect())
    }
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
    /// Engine truthiness: everything except the absent-marker, `false` and
    /// empty collections counts as true.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Null | Value::Bool(false) => false,
            Value::Sequence(items) => !items.is_empty(),
            Value::Mapping(mapping) => !mapping.is_empty(),
            _ => true,
        }
    }
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
    /// Text of a string, symbol or keyword.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Symbol(s) | Value::Keyword(s) => Some(s),
            _ => None,
        }
    }
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(mapping) => Some(mapping),
            _ => None,
        }
    }
    /// The frame id this value refers to, if it is a symbol or a
    /// delimiter-wrapped string.
    pub fn as_frame_id(&self) -> Option<FrameId> {
        match self {
            Value::Symbol(name) => Some(FrameId::from_symbol(name)),
            Value::String(s) if ident::is_symbol_literal(s) => Some(FrameId::new(s)),
            _ => None,
        }
    }
    /// All frame ids referenced by this value, looking one level into
    /// sequences.
    pub fn frame_ids(&self) -> Vec<FrameId> {
        match self {
            Value::Sequence(items) => items.iter().filter_map(Value::as_frame_id).collect(),
            other => other.as_frame_id().into_iter().collect(),
        }
    }
    /// Like [`Value::frame_ids`], for answers that can only hold frame ids:
    /// plain strings are taken as ids too.
    pub fn listed_frame_ids(&self) -> Vec<FrameId> {
        let id = |v: &Value| match v {
            Value::String(s) => Some(FrameId::from_symbol(s)),
            other => other.as_frame_id(),
        };
        match self {
            Value::Sequence(items) => items.iter().filter_map(id).collect(),
            other => id(other).into_iter().collect(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Symbol(name) => write!(f, "|{}|", name),
            Value::Keyword(name) => write!(f, ":{}", name),
            Value::Sequence(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Mapping(mapping) => write!(f, "{}", mapping),
            Value::Pair(head, tail) => write!(f, "({} . {})", head, tail),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self { Value::Bool(b) }
}
impl From<i64> for Value {
    fn from(i: i64) -> Self { Value::Integer(i) }
}
impl From<i32> for Value {
    fn from(i: i32) -> Self { Value::Integer(i64::from(i)) }
}
impl From<u32> for Value {
    fn from(i: u32) -> Self { Value::Integer(i64::from(i)) }
}
impl From<f64> for Value {
    fn from(x: f64) -> Self { Value::Float(x) }
}
impl From<&str> for Value {
    fn from(s: &str) -> Self {
        if ident::is_symbol_literal(s) {
            Value::Symbol(ident::strip_delimiters(s).to_owned())
        } else {
            Value::String(s.to_owned())
        }
    }
}
impl From<String> for Value {
    fn from(s: String) -> Self {
        if ident::is_symbol_literal(&s) { Value::from(s.as_str()) } else { Value::String(s) }
    }
}
impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self { Value::Sequence(items) }
}
impl From<Mapping> for Value {
    fn from(mapping: Mapping) -> Self { Value::Mapping(mapping) }
}
impl From<FrameId> for Value {
    fn from(id: FrameId) -> Self { Value::Symbol(id.name().to_owned()) }
}
impl From<&FrameId> for Value {
    fn from(id: &FrameId) -> Self { Value::Symbol(id.name().to_owned()) }
}
// frames travel as their ids
impl From<&Frame> for Value {
    fn from(frame: &Frame) -> Self { Value::from(frame.id()) }
}
impl From<&Arc<Frame>> for Value {
    fn from(frame: &Arc<Frame>) -> Self { Value::from(frame.id()) }
}
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(option: Option<T>) -> Self {
        option.map_or(Value::Null, Into::into)
    }
}

// ------------- Mapping -------------
/// Association from unique keys to sequences, kept in insertion order.
///
/// Symbol keys are spelled with their delimiters (`"|H|"`), plain string keys
/// without, so the two stay distinguishable on the way back to the engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mapping {
    entries: Vec<(String, Vec<Value>)>,
}

impl Mapping {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }
    /// Inserts or replaces; returns the previous values of the key.
    pub fn insert(&mut self, key: impl Into<String>, values: Vec<Value>) -> Option<Vec<Value>> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, values)),
            None => {
                self.entries.push((key, values));
                None
            }
        }
    }
    pub fn get(&self, key: &str) -> Option<&[Value]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<Value>)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, Vec<Value>)>>(iter: I) -> Self {
        let mut mapping = Mapping::new();
        for (key, values) in iter {
            mapping.insert(key, values);
        }
        mapping
    }
}

impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, values)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}: {}", key, Value::Sequence(values.clone()))?;
        }
        write!(f, "}}")
    }
}
