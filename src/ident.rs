//! Identifier normalization.
//!
//! The engine names frames and slots with symbols. A caller may spell the same
//! symbol three ways: bare (`RXN-9000`), accessor style (`rxn_9000`) or
//! delimited (`|RXN-9000|`). Every lookup path, whether accessor style or
//! indexed, goes through the functions here and ends up with one canonical key.
//!
//! Bare and accessor spellings are read the way the engine's reader reads an
//! unescaped symbol: upper-cased, with `_` standing in for `-`. Delimited
//! spellings are taken verbatim. Identity is case-insensitive either way.
//!
//! So an id whose engine name really contains `_` (or mixed case) has to be
//! given delimited: `|MY_ID|` reaches `MY_ID`, while `my_id` and `MY_ID`
//! both reach `MY-ID`.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::frame::Frame;

pub const DELIMITER: char = '|';

lazy_static! {
    static ref ACCESSOR: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
    static ref SYMBOL_LITERAL: Regex = Regex::new(r"^\|[^|\s]+\|$").unwrap();
}

/// True for a string that is a delimiter-wrapped engine symbol, e.g. `|TRP|`.
pub fn is_symbol_literal(s: &str) -> bool {
    SYMBOL_LITERAL.is_match(s)
}

pub fn strip_delimiters(s: &str) -> &str {
    if is_symbol_literal(s) { &s[1..s.len() - 1] } else { s }
}

pub fn is_accessor_name(s: &str) -> bool {
    ACCESSOR.is_match(s)
}

/// Accessor-safe form of a frame id or slot name, or `None` when the name
/// can only be reached through indexed lookup.
pub fn to_accessor_name(name: &str) -> Option<String> {
    let accessor = strip_delimiters(name.trim()).to_lowercase().replace('-', "_");
    if is_accessor_name(&accessor) { Some(accessor) } else { None }
}

/// Engine spelling of a name given in any of the accepted forms.
pub fn engine_name(name: &str) -> String {
    let name = name.trim();
    if is_symbol_literal(name) {
        strip_delimiters(name).to_owned()
    } else {
        name.to_uppercase().replace('_', "-")
    }
}

/// The identity-map key for a name given in any of the accepted forms.
pub fn canonical_key(name: &str) -> String {
    engine_name(name).to_uppercase()
}

/// The canonical identifier with its delimiters reattached.
pub fn to_canonical_id(name: &str) -> String {
    format!("{}{}{}", DELIMITER, canonical_key(name), DELIMITER)
}

/// Slot names are canonicalized like frame ids.
pub fn slot_key(name: &str) -> String {
    canonical_key(name)
}

// ------------- FrameId -------------
#[derive(Debug, Clone, Eq)]
pub struct FrameId {
    name: String, // engine spelling, sent on the wire
    key: String,  // identity
    verbatim: bool,
}

impl FrameId {
    pub fn new(spelling: &str) -> Self {
        let name = engine_name(spelling);
        let key = name.to_uppercase();
        let verbatim = is_symbol_literal(spelling.trim());
        Self { name, key, verbatim }
    }
    /// From a symbol the engine sent us, kept verbatim.
    pub fn from_symbol(name: &str) -> Self {
        let name = strip_delimiters(name).to_owned();
        let key = name.to_uppercase();
        Self { name, key, verbatim: true }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn key(&self) -> &str {
        &self.key
    }
    /// Whether the name is the engine's exact spelling rather than a reading
    /// of a bare or accessor-style one.
    pub fn is_verbatim(&self) -> bool {
        self.verbatim
    }
    pub fn accessor_name(&self) -> Option<String> {
        to_accessor_name(&self.name)
    }
}

impl PartialEq for FrameId {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}
impl Hash for FrameId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}
impl PartialEq<str> for FrameId {
    fn eq(&self, other: &str) -> bool {
        self.key == canonical_key(other)
    }
}
impl PartialEq<&str> for FrameId {
    fn eq(&self, other: &&str) -> bool {
        self.key == canonical_key(other)
    }
}
impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}{}", DELIMITER, self.name, DELIMITER)
    }
}

/// Anything that names a frame: a spelling, an id or the frame itself.
pub trait AsFrameId {
    fn frame_id(&self) -> FrameId;
}
impl AsFrameId for str {
    fn frame_id(&self) -> FrameId { FrameId::new(self) }
}
impl AsFrameId for String {
    fn frame_id(&self) -> FrameId { FrameId::new(self) }
}
impl AsFrameId for FrameId {
    fn frame_id(&self) -> FrameId { self.clone() }
}
impl AsFrameId for Frame {
    fn frame_id(&self) -> FrameId { self.id().clone() }
}
impl AsFrameId for Arc<Frame> {
    fn frame_id(&self) -> FrameId { self.id().clone() }
}
impl<T: AsFrameId + ?Sized> AsFrameId for &T {
    fn frame_id(&self) -> FrameId { (**self).frame_id() }
}
