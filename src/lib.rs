//! Cycframe – a client-side proxy to a remote symbolic knowledge-base engine.
//!
//! The engine keeps its knowledge as *frames*: named objects, either classes
//! or instances, whose *slots* hold numbers, strings, symbols naming other
//! frames, and lists of those. Cycframe exposes them as native values:
//! * A [`frame::Frame`] is a lazily populated proxy for one engine object.
//!   Slots are fetched on first access and cached; a whole-frame fetch loads
//!   everything at once.
//! * A [`database::Database`] is one selected organism. It owns the identity
//!   map that guarantees exactly one frame per canonical frame id, however
//!   the caller spells it (`RXN-9000`, `rxn_9000` or `|RXN-9000|`).
//! * An [`invoke::Call`] is one remote operation; every named convenience
//!   operation (see `operations`) is a call plus a declared result [`codec::Shape`].
//!
//! Frames are created, and deduplicated, by a keeper (see [`frame::FrameKeeper`])
//! which hands out `Arc`s to the one frame it keeps per id.
//!
//! ## Modules
//! * [`wire`] – The engine's data model, read from JSON, written and parsed as
//!   symbolic expressions (grammar in `sexpr.pest`).
//! * [`codec`] – Wire values to native [`value::Value`]s and back. The empty/false
//!   token means `false`, `[]` or "absent" depending on the declared [`codec::Shape`].
//! * [`ident`] – Identifier normalization between the engine's symbols and
//!   accessor-safe names.
//! * [`channel`] – The request/response transport and its response framing.
//! * [`settings`] – Host, port and timeout, layered from defaults, a file and the environment.
//!
//! ## Quick Start
//! ```
//! use cycframe::{Database, Result};
//!
//! // a stand-in for a running engine
//! let engine = |request: &str| -> Result<String> {
//!     Ok(if request.starts_with("(orgid-exist-p") {
//!         "true".into()
//!     } else {
//!         r#"["|Tryptophan|"]"#.into()
//!     })
//! };
//! let ecoli = Database::open("ecoli", engine).unwrap();
//! let trp = ecoli.resolve("trp").unwrap();
//! assert!(std::sync::Arc::ptr_eq(&trp, &ecoli.resolve("|TRP|").unwrap()));
//! let names = trp.slot("common-name").unwrap();
//! assert_eq!(names.to_string(), "[|Tryptophan|]");
//! ```

pub mod channel;
pub mod client;
pub mod codec;
pub mod database;
pub mod error;
pub mod frame;
pub mod ident;
pub mod invoke;
pub mod operations;
pub mod settings;
pub mod value;
pub mod wire;

pub use channel::{Channel, TcpChannel};
pub use client::Client;
pub use codec::Shape;
pub use database::Database;
pub use error::{CycError, Result};
pub use frame::Frame;
pub use ident::{AsFrameId, FrameId};
pub use invoke::Call;
pub use settings::Settings;
pub use value::{Mapping, Value};
