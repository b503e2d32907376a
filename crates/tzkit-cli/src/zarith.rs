//! # Zarith Subcommand
//!
//! Encode decimal integers to the zarith wire form and back.

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use serde::Serialize;

use tzkit_core::{N, Z};

use crate::{decode_hex, emit, Context};

/// Arguments for `tzkit zarith`.
#[derive(Args, Debug)]
pub struct ZarithArgs {
    #[command(subcommand)]
    pub command: ZarithCommand,
}

/// Zarith subcommands.
#[derive(Subcommand, Debug)]
pub enum ZarithCommand {
    /// Encode a decimal integer.
    Encode {
        /// Decimal value; negative values need `--` before them.
        #[arg(allow_hyphen_values = true)]
        value: String,
        /// Use the unsigned (N) encoding.
        #[arg(long)]
        unsigned: bool,
    },

    /// Decode a hex byte stream.
    Decode {
        /// Hex-encoded bytes; decoding stops at the first complete value.
        hex: String,
        /// Use the unsigned (N) encoding.
        #[arg(long)]
        unsigned: bool,
    },
}

/// Encoded or decoded value.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ZarithReport {
    pub value: String,
    pub hex: String,
    pub consumed: usize,
    pub trailing: usize,
}

/// Execute `tzkit zarith`.
pub fn run_zarith(args: &ZarithArgs, ctx: &Context) -> Result<u8> {
    let report = match &args.command {
        ZarithCommand::Encode { value, unsigned } => encode(value, *unsigned)?,
        ZarithCommand::Decode { hex, unsigned } => decode(hex, *unsigned)?,
    };
    emit(ctx, &report)?;
    Ok(0)
}

/// Encode `value` as Z or N.
pub fn encode(value: &str, unsigned: bool) -> Result<ZarithReport> {
    let value = value.trim();
    let (text, bytes) = if unsigned {
        let n: N = value
            .parse()
            .with_context(|| format!("invalid natural {value:?}"))?;
        (n.to_string(), n.to_binary())
    } else {
        let z: Z = value
            .parse()
            .with_context(|| format!("invalid integer {value:?}"))?;
        (z.to_string(), z.to_binary())
    };
    Ok(ZarithReport {
        value: text,
        hex: hex::encode(&bytes),
        consumed: bytes.len(),
        trailing: 0,
    })
}

/// Decode the first Z or N value from hex bytes.
pub fn decode(hex: &str, unsigned: bool) -> Result<ZarithReport> {
    let bytes = decode_hex(hex)?;
    let (text, consumed) = if unsigned {
        let (n, used) = N::decode_buffer(&bytes).context("invalid zarith natural")?;
        (n.to_string(), used)
    } else {
        let (z, used) = Z::decode_buffer(&bytes).context("invalid zarith integer")?;
        (z.to_string(), used)
    };
    if consumed < bytes.len() {
        tracing::debug!(consumed, total = bytes.len(), "trailing bytes after zarith value");
    }
    Ok(ZarithReport {
        value: text,
        hex: hex::encode(&bytes[..consumed]),
        consumed,
        trailing: bytes.len() - consumed,
    })
}
