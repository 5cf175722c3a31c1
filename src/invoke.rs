//! The Remote Invoker: named operation plus arguments in, decoded value out.

use std::sync::{Arc, Mutex};

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};

use crate::channel::Channel;
use crate::codec::{self, Shape};
use crate::error::{CycError, Result};
use crate::value::Value;
use crate::wire::{self, WireValue};

lazy_static! {
    static ref OPERATION: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9\-*+/<>=?!%]*$").unwrap();
}

const ENGINE_ERROR: &str = ":error";

// ------------- Call -------------
/// One remote operation with its positional and keyword arguments.
///
/// ```
/// use cycframe::invoke::Call;
/// use cycframe::value::Value;
///
/// let call = Call::new("all-pathways")
///     .arg(Value::keyword("all"))
///     .keyword_opt("include-super-pwys", Some(true))
///     .keyword_opt("org-id", None::<&str>);
/// assert_eq!(call.render().unwrap(), "(all-pathways :all :include-super-pwys t)");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    operation: String,
    args: Vec<Value>,
    keywords: Vec<(String, Value)>,
}

impl Call {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            args: Vec::new(),
            keywords: Vec::new(),
        }
    }
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }
    pub fn args<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.args.extend(values.into_iter().map(Into::into));
        self
    }
    pub fn keyword(mut self, name: &str, value: impl Into<Value>) -> Self {
        let name = name.trim_start_matches(':').replace('_', "-");
        self.keywords.push((name, value.into()));
        self
    }
    /// Absent keyword values are left out so the engine applies its default.
    pub fn keyword_opt<V: Into<Value>>(self, name: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.keyword(name, value),
            None => self,
        }
    }
    pub fn operation(&self) -> &str {
        &self.operation
    }
    pub fn arguments(&self) -> &[Value] {
        &self.args
    }

    /// The call as an engine expression, without organism scope.
    pub fn render(&self) -> Result<String> {
        if !OPERATION.is_match(&self.operation) {
            return Err(CycError::InvalidOperation(self.operation.clone()));
        }
        for value in self.args.iter().chain(self.keywords.iter().map(|(_, v)| v)) {
            check_finite(value)?;
        }
        let mut out = String::from("(");
        out.push_str(&self.operation);
        for arg in &self.args {
            out.push(' ');
            out.push_str(&wire::render_argument(&codec::encode(arg)));
        }
        for (name, value) in &self.keywords {
            out.push_str(" :");
            out.push_str(name);
            out.push(' ');
            out.push_str(&wire::render_argument(&codec::encode(value)));
        }
        out.push(')');
        Ok(out)
    }

    /// The call wrapped so the engine evaluates it against one organism.
    pub fn render_scoped(&self, org_id: &str) -> Result<String> {
        Ok(format!(
            "(with-organism (:org-id '{}) {})",
            wire::render_symbol(&org_id.to_uppercase()),
            self.render()?
        ))
    }
}

// The engine's reader has no spelling for NaN or infinities.
fn check_finite(value: &Value) -> Result<()> {
    match value {
        Value::Float(x) if !x.is_finite() => {
            Err(CycError::InvalidArgument(format!("{} cannot be sent to the engine", x)))
        }
        Value::Sequence(items) => items.iter().try_for_each(check_finite),
        Value::Mapping(mapping) => mapping
            .iter()
            .flat_map(|(_, values)| values.iter())
            .try_for_each(check_finite),
        Value::Pair(head, tail) => {
            check_finite(head)?;
            check_finite(tail)
        }
        _ => Ok(()),
    }
}

// ------------- Invoker -------------
/// Sends calls over a channel, one at a time, optionally scoped to an organism.
pub struct Invoker {
    channel: Arc<Mutex<Box<dyn Channel>>>,
    organism: Option<String>,
}

impl Invoker {
    pub fn new(channel: impl Channel + 'static) -> Self {
        Self {
            channel: Arc::new(Mutex::new(Box::new(channel))),
            organism: None,
        }
    }
    /// An invoker on the same channel whose calls run against `org_id`.
    pub fn with_organism(&self, org_id: &str) -> Self {
        Self {
            channel: Arc::clone(&self.channel),
            organism: Some(org_id.to_uppercase()),
        }
    }
    pub fn organism(&self) -> Option<&str> {
        self.organism.as_deref()
    }

    /// Issues the call and returns the undecoded response.
    pub fn request(&self, call: &Call) -> Result<WireValue> {
        let text = match &self.organism {
            Some(org_id) => call.render_scoped(org_id)?,
            None => call.render()?,
        };
        self.send(&text)
    }
    pub fn call(&self, call: &Call, shape: Shape) -> Result<Value> {
        codec::decode(&self.request(call)?, shape)
    }
    /// Issues the call without organism scope, even on a scoped invoker.
    pub fn call_unscoped(&self, call: &Call, shape: Shape) -> Result<Value> {
        codec::decode(&self.send(&call.render()?)?, shape)
    }

    /// Sends raw engine text. Responses are JSON; a string answer that starts
    /// with `:error` is the engine reporting a failure.
    pub fn send(&self, text: &str) -> Result<WireValue> {
        debug!(request = %text, "sending query");
        let response = {
            let mut channel = self
                .channel
                .lock()
                .map_err(|e| CycError::Lock(e.to_string()))?;
            channel.exchange(text)?
        };
        debug!(bytes = response.len(), "answer received");
        let wire = WireValue::from_json(&response)?;
        if let WireValue::String(message) = &wire {
            if message.starts_with(ENGINE_ERROR) {
                warn!(request = %text, error = %message, "engine reported an error");
                return Err(CycError::Engine(message.clone()));
            }
        }
        Ok(wire)
    }
}
