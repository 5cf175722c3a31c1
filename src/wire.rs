//! The engine's side of the conversation.
//!
//! [`WireValue`] models the data the engine speaks about: numbers, strings,
//! symbols, keywords, the empty/false token, the true token and (possibly
//! improper) lists. The engine answers in JSON, which [`WireValue::from_json`]
//! reads; we talk to it in its own expression syntax, which [`render`] writes
//! and [`parse`] reads back.

use lazy_static::lazy_static;
use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;
use regex::Regex;

use crate::error::{CycError, Result};

lazy_static! {
    // spellings the engine's reader keeps as they are
    static ref PLAIN_SYMBOL: Regex = Regex::new(r"^[A-Z0-9*+\-/<>=.!?%&$^_~@]+$").unwrap();
    static ref NUMERIC: Regex = Regex::new(r"^[+-]?[0-9]+(\.[0-9]*)?([eEdD][+-]?[0-9]+)?$|^[+-]?[0-9]+/[0-9]+$|^[+-]?\.[0-9]+$").unwrap();
    static ref DOTS: Regex = Regex::new(r"^\.+$").unwrap();
}

#[derive(Debug, Clone, PartialEq)]
pub enum WireValue {
    /// The empty/false token.
    Nil,
    True,
    Integer(i64),
    Float(f64),
    Ratio(i64, i64),
    String(String),
    Symbol(String),
    Keyword(String),
    List(Vec<WireValue>),
    Vector(Vec<WireValue>),
    /// Improper list: the items followed by a non-list tail.
    Dotted(Vec<WireValue>, Box<WireValue>),
    /// Only produced by JSON objects.
    Object(Vec<(String, WireValue)>),
}

impl WireValue {
    /// True for the values that all stand for "nothing" at the top of a
    /// response: the empty/false token and the empty list.
    pub fn is_empty_token(&self) -> bool {
        match self {
            WireValue::Nil => true,
            WireValue::List(items) => items.is_empty(),
            _ => false,
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let json: serde_json::Value = serde_json::from_str(text)?;
        Ok(Self::from(json))
    }
}

impl From<serde_json::Value> for WireValue {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match json {
            Json::Null | Json::Bool(false) => WireValue::Nil,
            Json::Bool(true) => WireValue::True,
            Json::Number(n) => match n.as_i64() {
                Some(i) => WireValue::Integer(i),
                None => WireValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => WireValue::String(s),
            Json::Array(items) => WireValue::List(items.into_iter().map(WireValue::from).collect()),
            Json::Object(map) => WireValue::Object(
                map.into_iter().map(|(k, v)| (k, WireValue::from(v))).collect(),
            ),
        }
    }
}

// ------------- Rendering -------------
/// Engine syntax for a datum.
pub fn render(value: &WireValue) -> String {
    let mut out = String::new();
    render_into(value, &mut out);
    out
}

/// Engine syntax for a top-level argument of a call: symbols and lists are
/// quoted so the engine does not evaluate them.
pub fn render_argument(value: &WireValue) -> String {
    match value {
        WireValue::Symbol(_)
        | WireValue::List(_)
        | WireValue::Vector(_)
        | WireValue::Dotted(..)
        | WireValue::Object(_) => format!("'{}", render(value)),
        _ => render(value),
    }
}

pub fn render_symbol(name: &str) -> String {
    if needs_delimiters(name) {
        let mut out = String::with_capacity(name.len() + 2);
        out.push('|');
        for c in name.chars() {
            if c == '|' || c == '\\' {
                out.push('\\');
            }
            out.push(c);
        }
        out.push('|');
        out
    } else {
        name.to_owned()
    }
}

fn needs_delimiters(name: &str) -> bool {
    !PLAIN_SYMBOL.is_match(name)
        || NUMERIC.is_match(name)
        || DOTS.is_match(name)
        || name == "NIL"
        || name == "T"
}

fn render_float(x: f64, out: &mut String) {
    let text = format!("{:?}", x);
    out.push_str(&text);
}

fn render_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
}

fn render_items(items: &[WireValue], out: &mut String) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        render_into(item, out);
    }
}

fn render_into(value: &WireValue, out: &mut String) {
    match value {
        WireValue::Nil => out.push_str("nil"),
        WireValue::True => out.push('t'),
        WireValue::Integer(i) => out.push_str(&i.to_string()),
        WireValue::Float(x) => render_float(*x, out),
        WireValue::Ratio(n, d) => out.push_str(&format!("{}/{}", n, d)),
        WireValue::String(s) => render_string(s, out),
        WireValue::Symbol(name) => out.push_str(&render_symbol(name)),
        WireValue::Keyword(name) => {
            out.push(':');
            out.push_str(name);
        }
        WireValue::List(items) => {
            out.push('(');
            render_items(items, out);
            out.push(')');
        }
        WireValue::Vector(items) => {
            out.push_str("#(");
            render_items(items, out);
            out.push(')');
        }
        WireValue::Dotted(items, tail) => {
            out.push('(');
            render_items(items, out);
            out.push_str(" . ");
            render_into(tail, out);
            out.push(')');
        }
        WireValue::Object(entries) => {
            out.push('(');
            for (i, (key, value)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                out.push('(');
                render_string(key, out);
                out.push(' ');
                render_into(value, out);
                out.push(')');
            }
            out.push(')');
        }
    }
}

// ------------- Parsing -------------
#[derive(Parser)]
#[grammar = "sexpr.pest"]
struct SexprParser;

/// Reads one datum in engine syntax. A leading quote is accepted and dropped.
pub fn parse(text: &str) -> Result<WireValue> {
    let mut pairs = SexprParser::parse(Rule::document, text)
        .map_err(|e| CycError::decode(format!("malformed expression: {}", e)))?;
    let document = pairs
        .next()
        .ok_or_else(|| CycError::decode("empty expression"))?;
    let datum = document
        .into_inner()
        .find(|p| p.as_rule() != Rule::EOI)
        .ok_or_else(|| CycError::decode("empty expression"))?;
    build(datum)
}

fn build(pair: Pair<Rule>) -> Result<WireValue> {
    let text = pair.as_str();
    match pair.as_rule() {
        Rule::quoted => {
            let inner = pair
                .into_inner()
                .next()
                .ok_or_else(|| CycError::decode("quote without datum"))?;
            build(inner)
        }
        Rule::list => {
            let mut items = Vec::new();
            let mut inner = pair.into_inner();
            while let Some(p) = inner.next() {
                if p.as_rule() == Rule::dot {
                    let tail = inner
                        .next()
                        .ok_or_else(|| CycError::decode("dotted list without tail"))?;
                    return Ok(WireValue::Dotted(items, Box::new(build(tail)?)));
                }
                items.push(build(p)?);
            }
            Ok(WireValue::List(items))
        }
        Rule::vector => Ok(WireValue::Vector(
            pair.into_inner().map(build).collect::<Result<Vec<_>>>()?,
        )),
        Rule::string => Ok(WireValue::String(unescape(&text[1..text.len() - 1]))),
        Rule::delimited => Ok(WireValue::Symbol(unescape(&text[1..text.len() - 1]))),
        Rule::keyword => Ok(WireValue::Keyword(text[1..].to_owned())),
        Rule::bare => Ok(match text.to_uppercase().as_str() {
            "NIL" => WireValue::Nil,
            "T" => WireValue::True,
            upper => WireValue::Symbol(upper.to_owned()),
        }),
        Rule::integer => text
            .trim_start_matches('+')
            .parse::<i64>()
            .map(WireValue::Integer)
            .or_else(|_| parse_float(text)),
        Rule::float => parse_float(text),
        Rule::ratio => {
            let (n, d) = text
                .split_once('/')
                .ok_or_else(|| CycError::decode(format!("bad ratio {}", text)))?;
            let n = n.trim_start_matches('+').parse::<i64>();
            let d = d.parse::<i64>();
            match (n, d) {
                (Ok(n), Ok(d)) => Ok(WireValue::Ratio(n, d)),
                _ => Err(CycError::decode(format!("ratio out of range {}", text))),
            }
        }
        other => Err(CycError::decode(format!("unexpected {:?} in expression", other))),
    }
}

fn parse_float(text: &str) -> Result<WireValue> {
    text.replace(['d', 'D'], "e")
        .parse::<f64>()
        .map(WireValue::Float)
        .map_err(|e| CycError::decode(format!("bad number {}: {}", text, e)))
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}
