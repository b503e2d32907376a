//! # tzkit-cli: Command-Line Interface
//!
//! Provides the `tzkit` binary over the `tzkit-core` and `tzkit-crypto`
//! libraries.
//!
//! ## Subcommands
//!
//! - `tzkit inspect`: Identify and decode any base58check value.
//! - `tzkit address`: Binary encode/decode, blinding, and blind matching.
//! - `tzkit key`: Key generation, display, signing, verification, and
//!   passphrase encryption.
//! - `tzkit zarith`: Zarith integer encode/decode.
//!
//! ```bash
//! tzkit inspect tz1LggX2HUdvJ1tF4Fvv8fjsrzLeW4Jr9t2Q
//! tzkit address encode KT1EfTusMLoeCAAGd9MZJn5yKzFr6kJU5U91 --padded
//! tzkit key gen --curve secp256k1
//! tzkit --json zarith encode -- -64
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers; handlers delegate to
//!   the library crates and hold no encoding logic of their own.
//! - Handlers return an exit code: `0` success, `1` for a negative answer
//!   (signature or blind match rejected). Errors propagate as `anyhow`.

pub mod address;
pub mod config;
pub mod inspect;
pub mod key;
pub mod zarith;

use std::path::Path;

use anyhow::{Context as _, Result};
use serde::Serialize;
use serde_json::Value;

pub use config::Config;

/// State shared by every handler.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Loaded configuration.
    pub config: Config,
    /// Print reports as JSON instead of `field: value` lines.
    pub json: bool,
}

impl Context {
    pub fn new(config: Config, json: bool) -> Self {
        Self { config, json }
    }
}

/// Print a handler's report.
pub fn emit<T: Serialize>(ctx: &Context, report: &T) -> Result<()> {
    println!("{}", render(ctx, report)?);
    Ok(())
}

/// Render a report the way [`emit`] prints it.
pub fn render<T: Serialize>(ctx: &Context, report: &T) -> Result<String> {
    let value = serde_json::to_value(report).context("failed to serialize report")?;
    if ctx.json {
        return serde_json::to_string_pretty(&value).context("failed to serialize report");
    }
    let text = match value {
        Value::Object(fields) => fields
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| format!("{k}: {}", plain(v)))
            .collect::<Vec<_>>()
            .join("\n"),
        other => plain(&other),
    };
    Ok(text)
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Read an argument that may name a file with a leading `@`.
pub fn resolve_input(arg: &str) -> Result<String> {
    match arg.strip_prefix('@') {
        Some(path) => {
            let path = Path::new(path);
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Ok(text.trim().to_string())
        }
        None => Ok(arg.to_string()),
    }
}

/// Decode hex, tolerating an optional `0x` prefix and surrounding space.
pub fn decode_hex(text: &str) -> Result<Vec<u8>> {
    let text = text.trim();
    let text = text.strip_prefix("0x").unwrap_or(text);
    hex::decode(text).with_context(|| format!("invalid hex {text:?}"))
}
