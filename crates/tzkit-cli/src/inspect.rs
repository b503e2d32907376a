//! # Inspect Subcommand
//!
//! Identifies any base58check value by length and prefix and prints what
//! it decodes to. Secret keys show their derived public key and address,
//! never the secret bytes.

use anyhow::{Context as _, Result};
use clap::Args;
use serde::Serialize;

use tzkit_core::{Address, AddressType, HashKind};
use tzkit_crypto::{Key, KeyType, PrivateKey, Signature, SignatureType};

use crate::{emit, Context};

/// Arguments for `tzkit inspect`.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Base58check text (or `@file`).
    #[arg(value_name = "TEXT")]
    pub text: String,
}

/// What `inspect` reports about a value.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct InspectReport {
    pub kind: String,
    pub prefix: &'static str,
    pub version: String,
    pub raw_len: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curve: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encrypted: Option<bool>,
}

/// Execute `tzkit inspect`.
pub fn run_inspect(args: &InspectArgs, ctx: &Context) -> Result<u8> {
    let text = crate::resolve_input(&args.text)?;
    let report = inspect(&text)?;
    emit(ctx, &report)?;
    Ok(0)
}

/// Decode `text` into an [`InspectReport`].
pub fn inspect(text: &str) -> Result<InspectReport> {
    let kind = HashKind::detect(text).with_context(|| format!("unrecognised value {text:?}"))?;
    let mut payload = vec![0u8; kind.raw_len()];
    kind.decode_text(text, &mut payload)
        .with_context(|| format!("failed to decode {kind} value"))?;

    let mut report = InspectReport {
        kind: kind.to_string(),
        prefix: kind.text_prefix(),
        version: hex::encode(kind.version()),
        raw_len: kind.raw_len(),
        payload: None,
        address_type: None,
        binary: None,
        curve: None,
        public_key: None,
        address: None,
        generic: None,
        encrypted: None,
    };

    if let Some(curve) = KeyType::from_encrypted_kind(kind) {
        report.curve = Some(curve.to_string());
        report.encrypted = Some(true);
        return Ok(report);
    }

    if KeyType::from_secret_kind(kind).is_some() {
        let private = PrivateKey::parse_text(text).context("invalid secret key")?;
        report.curve = Some(private.kind().to_string());
        report.public_key = Some(private.public().to_text());
        report.address = Some(private.address().to_text());
        report.encrypted = Some(false);
        return Ok(report);
    }

    report.payload = Some(hex::encode(&payload));

    if AddressType::from_hash_kind(kind).is_some() {
        let address = Address::parse_text(text).context("invalid address")?;
        report.address_type = Some(address.kind().to_string());
        report.binary = Some(hex::encode(address.encode()));
    } else if KeyType::from_public_kind(kind).is_some() {
        let key = Key::parse_text(text).context("invalid public key")?;
        report.curve = key.kind().map(|k| k.to_string());
        report.binary = Some(hex::encode(key.to_binary()));
        report.address = Some(key.address().to_text());
    } else if SignatureType::from_hash_kind(kind).is_some() {
        let sig = Signature::parse_text(text).context("invalid signature")?;
        report.curve = sig.kind().key_type().map(|k| k.to_string());
        report.binary = Some(hex::encode(sig.to_binary()));
        if !sig.is_generic() {
            report.generic = Some(sig.generic());
        }
    }
    Ok(report)
}
