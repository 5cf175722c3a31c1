use crate::channel::{Channel, TcpChannel};
use crate::codec::Shape;
use crate::database::Database;
use crate::error::Result;
use crate::invoke::{Call, Invoker};
use crate::settings::Settings;
use crate::value::Value;

/// Entry point to a running engine: lists organisms, selects one as a
/// [`Database`], and runs the queries that need no organism.
pub struct Client {
    invoker: Invoker,
}

impl Client {
    pub fn new(channel: impl Channel + 'static) -> Self {
        Self {
            invoker: Invoker::new(channel),
        }
    }
    pub fn connect(settings: &Settings) -> Result<Self> {
        Ok(Self::new(TcpChannel::from_settings(settings)?))
    }

    /// A database for the organism, after the engine confirmed it knows it.
    /// Databases selected from one client share its channel.
    pub fn select_organism(&self, org_id: &str) -> Result<Database> {
        Database::select(org_id, &self.invoker)
    }

    pub fn all_orgids(&self) -> Result<Vec<String>> {
        let listed = self
            .invoker
            .call_unscoped(&Call::new("all-orgids"), Shape::Sequence)?;
        Ok(listed
            .as_sequence()
            .unwrap_or_default()
            .iter()
            .filter_map(|v| v.as_str().map(str::to_owned))
            .collect())
    }

    /// Runs a BioVelo query.
    pub fn biovelo(&self, query: &str) -> Result<Value> {
        self.invoker
            .call_unscoped(&Call::new("biovelo").arg(query), Shape::Any)
    }

    /// Flux balance analysis; the input file names its own organism.
    pub fn run_fba(&self, file: &str) -> Result<Value> {
        self.invoker
            .call_unscoped(&Call::new("python-run-fba").arg(file), Shape::Any)
    }
}
