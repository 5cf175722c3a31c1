use thiserror::Error;

#[derive(Error, Debug)]
pub enum CycError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Engine error: {0}")]
    Engine(String),
    #[error("Decoding error: {message}")]
    Decode { message: String },
    #[error("Frame {frame} is read only, cannot assign slot {slot}; use put_slot_value or put_slot_values on the database")]
    ReadOnly { frame: String, slot: String },
    #[error("Not an accessor name: {0}")]
    InvalidAccessor(String),
    #[error("Not a valid operation name: {0}")]
    InvalidOperation(String),
    #[error("Unknown organism: {0}")]
    UnknownOrganism(String),
    #[error("Could not retrieve frame {0}")]
    MissingFrame(String),
    #[error("Frame {0} is not a class and has no instances")]
    NotAClass(String),
    #[error("Frame {0} was already loaded as an instance, cannot treat it as a class")]
    KindConflict(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Frame {0} has outlived its database")]
    Detached(String),
    #[error("Lock poisoned: {0}")]
    Lock(String),
}

impl CycError {
    pub(crate) fn decode(message: impl Into<String>) -> Self {
        Self::Decode { message: message.into() }
    }
}

pub type Result<T> = std::result::Result<T, CycError>;

// Helper conversions
impl From<std::io::Error> for CycError {
    fn from(e: std::io::Error) -> Self { Self::Transport(e.to_string()) }
}
impl From<serde_json::Error> for CycError {
    fn from(e: serde_json::Error) -> Self { Self::decode(e.to_string()) }
}
impl From<config::ConfigError> for CycError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
