//! Conversion between [`WireValue`] and native [`Value`].
//!
//! Decoding is total for well-formed input except for one thing the wire
//! cannot tell us: whether the empty/false token means `false`, an empty
//! sequence or "absent". Each call site states which through a [`Shape`].
//!
//! Lists whose elements are all non-empty lists headed by a symbol or string
//! are association lists and decode to a [`Mapping`]:
//!
//! ```
//! use cycframe::codec::{decode, Shape};
//! use cycframe::value::Value;
//! use cycframe::wire::parse;
//!
//! let value = decode(&parse("((H 2) (O 1))").unwrap(), Shape::Any).unwrap();
//! let mapping = value.as_mapping().unwrap();
//! assert_eq!(mapping.get("|H|"), Some(&[Value::Integer(2)][..]));
//! assert_eq!(mapping.get("|O|"), Some(&[Value::Integer(1)][..]));
//! ```

use crate::error::{CycError, Result};
use crate::ident::{self, DELIMITER};
use crate::value::{Mapping, Value};
use crate::wire::{self, WireValue};

/// The result shape a call site declares for its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Empty/false decodes to `false`.
    Boolean,
    /// Empty/false decodes to `[]`; a lone scalar is wrapped.
    Sequence,
    /// Empty/false decodes to the absent-marker; a one-element sequence is unwrapped.
    Scalar,
    /// Empty/false decodes to an empty mapping.
    Mapping,
    /// A single frame id, or the absent-marker.
    FrameId,
    /// No coercion; empty/false decodes to the absent-marker.
    Any,
}

// ------------- Decode -------------
pub fn decode(wire: &WireValue, shape: Shape) -> Result<Value> {
    if wire.is_empty_token() {
        return Ok(match shape {
            Shape::Boolean => Value::Bool(false),
            Shape::Sequence => Value::Sequence(Vec::new()),
            Shape::Mapping => Value::Mapping(Mapping::new()),
            Shape::Scalar | Shape::FrameId | Shape::Any => Value::Null,
        });
    }
    let value = decode_datum(wire)?;
    coerce(value, shape)
}

/// Decodes a JSON response text.
pub fn decode_json(text: &str, shape: Shape) -> Result<Value> {
    decode(&WireValue::from_json(text)?, shape)
}

fn coerce(value: Value, shape: Shape) -> Result<Value> {
    match shape {
        Shape::Any | Shape::Boolean => Ok(value),
        Shape::Sequence => Ok(match value {
            Value::Sequence(_) | Value::Mapping(_) => value,
            scalar => Value::Sequence(vec![scalar]),
        }),
        Shape::Mapping => match value {
            Value::Mapping(_) => Ok(value),
            other => Err(CycError::decode(format!("expected a mapping, got {}", other))),
        },
        Shape::Scalar => match value {
            Value::Sequence(mut items) if items.len() == 1 => Ok(items.remove(0)),
            Value::Sequence(_) | Value::Mapping(_) => {
                Err(CycError::decode(format!("expected a single value, got {}", value)))
            }
            scalar => Ok(scalar),
        },
        Shape::FrameId => match value {
            Value::Symbol(_) => Ok(value),
            Value::String(s) => Ok(Value::Symbol(ident::strip_delimiters(&s).to_owned())),
            Value::Sequence(mut items) if items.len() == 1 => coerce(items.remove(0), Shape::FrameId),
            other => Err(CycError::decode(format!("expected a frame id, got {}", other))),
        },
    }
}

fn decode_datum(wire: &WireValue) -> Result<Value> {
    Ok(match wire {
        WireValue::Nil => Value::Null,
        WireValue::True => Value::Bool(true),
        WireValue::Integer(i) => Value::Integer(*i),
        WireValue::Float(x) => Value::Float(*x),
        WireValue::Ratio(_, 0) => return Err(CycError::decode("ratio with zero denominator")),
        WireValue::Ratio(n, d) => Value::Float(*n as f64 / *d as f64),
        WireValue::String(s) if ident::is_symbol_literal(s) => {
            Value::Symbol(ident::strip_delimiters(s).to_owned())
        }
        WireValue::String(s) => Value::String(s.clone()),
        WireValue::Symbol(name) => Value::Symbol(name.clone()),
        WireValue::Keyword(name) => Value::Keyword(name.clone()),
        WireValue::List(items) => match association(items)? {
            Some(mapping) => Value::Mapping(mapping),
            None => Value::Sequence(decode_all(items)?),
        },
        WireValue::Vector(items) => Value::Sequence(decode_all(items)?),
        WireValue::Dotted(items, tail) => {
            let mut value = decode_datum(tail)?;
            for item in items.iter().rev() {
                value = Value::Pair(Box::new(decode_datum(item)?), Box::new(value));
            }
            value
        }
        WireValue::Object(entries) => {
            let mut mapping = Mapping::new();
            for (key, value) in entries {
                mapping.insert(key.clone(), into_items(decode(value, Shape::Sequence)?));
            }
            Value::Mapping(mapping)
        }
    })
}

fn decode_all(items: &[WireValue]) -> Result<Vec<Value>> {
    items.iter().map(decode_datum).collect()
}

fn into_items(value: Value) -> Vec<Value> {
    match value {
        Value::Sequence(items) => items,
        other => vec![other],
    }
}

fn key_of(head: &WireValue) -> Option<String> {
    match head {
        WireValue::Symbol(name) => Some(format!("{}{}{}", DELIMITER, name, DELIMITER)),
        WireValue::String(s) => Some(s.clone()),
        _ => None,
    }
}

// Mapping only when every element is a non-empty list headed by a symbol or
// string and no key repeats.
fn association(items: &[WireValue]) -> Result<Option<Mapping>> {
    if items.is_empty() {
        return Ok(None);
    }
    let mut entries = Vec::with_capacity(items.len());
    for item in items {
        let WireValue::List(inner) = item else { return Ok(None) };
        let Some(key) = inner.first().and_then(key_of) else { return Ok(None) };
        entries.push((key, &inner[1..]));
    }
    let mut mapping = Mapping::new();
    for (key, rest) in entries {
        if mapping.contains_key(&key) {
            return Ok(None);
        }
        mapping.insert(key, decode_all(rest)?);
    }
    Ok(Some(mapping))
}

/// Decodes a whole-frame response into canonical slot names and their
/// values. Slot values are always sequences (or mappings).
pub fn decode_slots(wire: &WireValue) -> Result<Vec<(String, Value)>> {
    match wire {
        WireValue::Object(entries) => entries
            .iter()
            .map(|(slot, value)| Ok((ident::slot_key(slot), decode(value, Shape::Sequence)?)))
            .collect(),
        WireValue::List(items) => {
            let mut slots = Vec::with_capacity(items.len());
            for item in items {
                let WireValue::List(inner) = item else {
                    return Err(CycError::decode(format!("slot entry is not a list: {}", wire::render(item))));
                };
                let slot = match inner.first() {
                    Some(WireValue::Symbol(name)) | Some(WireValue::String(name)) => ident::slot_key(name),
                    _ => return Err(CycError::decode(format!("slot entry without a name: {}", wire::render(item)))),
                };
                slots.push((slot, Value::Sequence(decode_all(&inner[1..])?)));
            }
            Ok(slots)
        }
        other => Err(CycError::decode(format!("not a frame: {}", wire::render(other)))),
    }
}

// ------------- Encode -------------
pub fn encode(value: &Value) -> WireValue {
    match value {
        Value::Null | Value::Bool(false) => WireValue::Nil,
        Value::Bool(true) => WireValue::True,
        Value::Integer(i) => WireValue::Integer(*i),
        Value::Float(x) => WireValue::Float(*x),
        Value::String(s) if ident::is_symbol_literal(s) => {
            WireValue::Symbol(ident::strip_delimiters(s).to_owned())
        }
        Value::String(s) => WireValue::String(s.clone()),
        Value::Symbol(name) => WireValue::Symbol(name.clone()),
        Value::Keyword(name) => WireValue::Keyword(name.clone()),
        Value::Sequence(items) => WireValue::List(items.iter().map(encode).collect()),
        Value::Mapping(mapping) => WireValue::List(
            mapping
                .iter()
                .map(|(key, values)| {
                    let mut entry = Vec::with_capacity(values.len() + 1);
                    entry.push(encode(&Value::String(key.to_owned())));
                    entry.extend(values.iter().map(encode));
                    WireValue::List(entry)
                })
                .collect(),
        ),
        Value::Pair(head, tail) => WireValue::Dotted(vec![encode(head)], Box::new(encode(tail))),
    }
}

/// Engine syntax for a value.
pub fn encode_text(value: &Value) -> String {
    wire::render(&encode(value))
}

/// Reads engine syntax back into a native value.
pub fn decode_text(text: &str, shape: Shape) -> Result<Value> {
    decode(&wire::parse(text)?, shape)
}
