use std::env;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cycframe::codec::{self, Shape};
use cycframe::{Call, Client, Result, Settings, Value};

const USAGE: &str = "\
usage:
  cycframe orgids
  cycframe call <orgid> <operation> [argument ...]
  cycframe slot <orgid> <frame> <slot>

Arguments are written in the engine's expression syntax, e.g. TRP, \"text\", 42, (A B).
Connection settings come from cycframe.toml and CYCFRAME_HOST, CYCFRAME_PORT,
CYCFRAME_TIMEOUT_SECS, CYCFRAME_DEBUG.";

fn main() -> ExitCode {
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let fallback = if settings.debug() { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    let args: Vec<String> = env::args().skip(1).collect();
    match run(&settings, &args) {
        Ok(Some(output)) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("{}", USAGE);
            ExitCode::from(2)
        }
        Err(e) => {
            error!(error = %e, "command failed");
            ExitCode::FAILURE
        }
    }
}

fn run(settings: &Settings, args: &[String]) -> Result<Option<String>> {
    let Some((command, rest)) = args.split_first() else {
        return Ok(None);
    };
    info!(host = settings.host(), port = settings.port(), "using engine");
    let client = Client::connect(settings)?;
    match (command.as_str(), rest) {
        ("orgids", []) => Ok(Some(client.all_orgids()?.join("\n"))),
        ("call", [org_id, operation, arguments @ ..]) => {
            let database = client.select_organism(org_id)?;
            let arguments = arguments
                .iter()
                .map(|a| codec::decode_text(a, Shape::Any))
                .collect::<Result<Vec<Value>>>()?;
            let value = database.invoke(&Call::new(operation.as_str()).args(arguments), Shape::Any)?;
            Ok(Some(value.to_string()))
        }
        ("slot", [org_id, frame, slot]) => {
            let database = client.select_organism(org_id)?;
            let value = database.resolve(frame.as_str())?.slot(slot)?;
            Ok(Some(value.to_string()))
        }
        _ => Ok(None),
    }
}
