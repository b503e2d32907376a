//! # Address Subcommand
//!
//! Binary encoding and decoding of addresses, plus the blinded-address
//! commitment used for pre-allocated balances.

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use serde::Serialize;

use tzkit_core::Address;

use crate::{decode_hex, emit, Context};

/// Arguments for `tzkit address`.
#[derive(Args, Debug)]
pub struct AddressArgs {
    #[command(subcommand)]
    pub command: AddressCommand,
}

/// Address subcommands.
#[derive(Subcommand, Debug)]
pub enum AddressCommand {
    /// Print the binary form of an address as hex.
    Encode {
        /// Address text.
        address: String,
        /// Emit the fixed 22-byte layout.
        #[arg(long)]
        padded: bool,
    },

    /// Decode a binary address (21 or 22 bytes, trailing bytes ignored).
    Decode {
        /// Hex-encoded binary address.
        hex: String,
    },

    /// Blind an address under a secret.
    Blind {
        /// Address text.
        address: String,
        /// Hex-encoded blinding secret.
        #[arg(long)]
        secret: String,
    },

    /// Check a blinded address against a plain one.
    Match {
        /// Plain address text.
        address: String,
        /// Blinded address text (`btz1…`).
        blinded: String,
        /// Hex-encoded blinding secret.
        #[arg(long)]
        secret: String,
    },
}

#[derive(Debug, Serialize)]
struct AddressReport {
    address: String,
    kind: String,
    hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    binary: Option<String>,
}

impl AddressReport {
    fn new(address: &Address, binary: Option<Vec<u8>>) -> Self {
        Self {
            address: address.to_text(),
            kind: address.kind().to_string(),
            hash: hex::encode(address.hash()),
            binary: binary.map(hex::encode),
        }
    }
}

#[derive(Debug, Serialize)]
struct MatchReport {
    address: String,
    blinded: String,
    matches: bool,
}

/// Execute `tzkit address`.
pub fn run_address(args: &AddressArgs, ctx: &Context) -> Result<u8> {
    match &args.command {
        AddressCommand::Encode { address, padded } => {
            let address = parse_address(address)?;
            let binary = if *padded {
                address.encode_padded()
            } else {
                address.encode()
            };
            emit(ctx, &AddressReport::new(&address, Some(binary)))?;
            Ok(0)
        }
        AddressCommand::Decode { hex } => {
            let bytes = decode_hex(hex)?;
            let address = Address::decode(&bytes).context("invalid binary address")?;
            emit(ctx, &AddressReport::new(&address, None))?;
            Ok(0)
        }
        AddressCommand::Blind { address, secret } => {
            let address = parse_address(address)?;
            let secret = decode_hex(secret).context("invalid blinding secret")?;
            let blinded = address.blind(&secret).context("failed to blind address")?;
            emit(ctx, &AddressReport::new(&blinded, None))?;
            Ok(0)
        }
        AddressCommand::Match {
            address,
            blinded,
            secret,
        } => {
            let address = parse_address(address)?;
            let blinded = parse_address(blinded)?;
            let secret = decode_hex(secret).context("invalid blinding secret")?;
            let matches = address.match_blinded(&blinded, &secret);
            tracing::info!(%address, %blinded, matches, "checked blinded address");
            emit(
                ctx,
                &MatchReport {
                    address: address.to_text(),
                    blinded: blinded.to_text(),
                    matches,
                },
            )?;
            Ok(if matches { 0 } else { 1 })
        }
    }
}

fn parse_address(text: &str) -> Result<Address> {
    Address::parse_text(text.trim()).with_context(|| format!("invalid address {text:?}"))
}
