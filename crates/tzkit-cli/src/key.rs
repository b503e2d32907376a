//! # Key Subcommand
//!
//! Key generation, display, signing, verification, and passphrase
//! encryption for all four curves.
//!
//! ## Security Invariant
//!
//! Secret keys are printed only by `key gen` (the operator asked for a new
//! key) and only in encrypted form when `--encrypt` is given. Passphrases
//! come from the environment variable named in the configuration, never
//! from the command line, and are never logged.

use anyhow::{bail, Context as _, Result};
use clap::{Args, Subcommand};
use serde::Serialize;

use tzkit_core::{blake2b_256, CryptoError};
use tzkit_crypto::{Key, KeyType, PassphraseFn, PrivateKey, Signature};

use crate::{decode_hex, emit, resolve_input, Context};

/// Arguments for `tzkit key`.
#[derive(Args, Debug)]
pub struct KeyArgs {
    #[command(subcommand)]
    pub command: KeyCommand,
}

/// Message input flags shared by `sign` and `verify`.
#[derive(Args, Debug, Clone, Default)]
pub struct MessageArgs {
    /// Treat the message as hex rather than UTF-8 text.
    #[arg(long)]
    pub hex: bool,
    /// Use the message as the 32-byte digest instead of hashing it.
    #[arg(long)]
    pub raw: bool,
}

/// Key subcommands.
#[derive(Subcommand, Debug)]
pub enum KeyCommand {
    /// Generate a new key pair.
    Gen {
        /// Curve (default from configuration).
        #[arg(long)]
        curve: Option<KeyType>,
        /// Print the secret key encrypted under the configured passphrase.
        #[arg(long)]
        encrypt: bool,
    },

    /// Show the public key and address of a secret key.
    Show {
        /// Secret key text, plain or encrypted (or `@file`).
        secret: String,
    },

    /// Sign a message.
    Sign {
        /// Secret key text, plain or encrypted (or `@file`).
        secret: String,
        /// Message to sign.
        message: String,
        #[command(flatten)]
        input: MessageArgs,
    },

    /// Verify a signature.
    Verify {
        /// Public key text (or `@file`).
        key: String,
        /// Signed message.
        message: String,
        /// Signature text.
        signature: String,
        #[command(flatten)]
        input: MessageArgs,
    },

    /// Encrypt a plain secret key under the configured passphrase.
    Encrypt {
        /// Plain secret key text (or `@file`).
        secret: String,
    },
}

#[derive(Debug, Serialize)]
struct KeyReport {
    curve: String,
    public_key: String,
    address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    secret_key: Option<String>,
}

impl KeyReport {
    fn new(key: &PrivateKey, secret_key: Option<String>) -> Self {
        Self {
            curve: key.kind().to_string(),
            public_key: key.public().to_text(),
            address: key.address().to_text(),
            secret_key,
        }
    }
}

#[derive(Debug, Serialize)]
struct SignReport {
    signature: String,
    generic: String,
    digest: String,
}

#[derive(Debug, Serialize)]
struct VerifyReport {
    valid: bool,
    key: String,
    digest: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

/// Execute `tzkit key`.
pub fn run_key(args: &KeyArgs, ctx: &Context) -> Result<u8> {
    match &args.command {
        KeyCommand::Gen { curve, encrypt } => {
            cmd_gen(ctx, curve.unwrap_or(ctx.config.default_curve), *encrypt)
        }
        KeyCommand::Show { secret } => {
            let key = load_private_key(ctx, secret)?;
            emit(ctx, &KeyReport::new(&key, None))?;
            Ok(0)
        }
        KeyCommand::Sign {
            secret,
            message,
            input,
        } => cmd_sign(ctx, secret, message, input),
        KeyCommand::Verify {
            key,
            message,
            signature,
            input,
        } => cmd_verify(ctx, key, message, signature, input),
        KeyCommand::Encrypt { secret } => {
            let key = load_private_key(ctx, secret)?;
            let passphrase = require_passphrase(ctx)?;
            let encrypted = key
                .encrypt_text(&passphrase)
                .context("failed to encrypt secret key")?;
            emit(ctx, &KeyReport::new(&key, Some(encrypted)))?;
            Ok(0)
        }
    }
}

fn cmd_gen(ctx: &Context, curve: KeyType, encrypt: bool) -> Result<u8> {
    let key = PrivateKey::generate(curve).context("key generation failed")?;
    let secret = if encrypt {
        let passphrase = require_passphrase(ctx)?;
        key.encrypt_text(&passphrase)
            .context("failed to encrypt secret key")?
    } else {
        key.to_text().to_string()
    };
    tracing::info!(%curve, address = %key.address(), "generated key");
    emit(ctx, &KeyReport::new(&key, Some(secret)))?;
    Ok(0)
}

fn cmd_sign(ctx: &Context, secret: &str, message: &str, input: &MessageArgs) -> Result<u8> {
    let key = load_private_key(ctx, secret)?;
    let digest = message_digest(ctx, message, input)?;
    let signature = key.sign(&digest).context("signing failed")?;
    emit(
        ctx,
        &SignReport {
            signature: signature.to_text(),
            generic: signature.generic(),
            digest: hex::encode(digest),
        },
    )?;
    Ok(0)
}

fn cmd_verify(
    ctx: &Context,
    key: &str,
    message: &str,
    signature: &str,
    input: &MessageArgs,
) -> Result<u8> {
    let key_text = resolve_input(key)?;
    let key = Key::parse_text(key_text.trim()).context("invalid public key")?;
    let signature = Signature::parse_text(signature.trim()).context("invalid signature")?;
    let digest = message_digest(ctx, message, input)?;

    let (valid, reason) = match key.verify(&digest, &signature) {
        Ok(()) => (true, None),
        Err(CryptoError::SignatureMismatch) => (false, Some("signature mismatch".to_string())),
        Err(e) => return Err(e).context("verification failed"),
    };
    emit(
        ctx,
        &VerifyReport {
            valid,
            key: key.to_text(),
            digest: hex::encode(&digest),
            reason,
        },
    )?;
    Ok(if valid { 0 } else { 1 })
}

/// Bytes that are actually signed for `message`.
pub fn message_digest(ctx: &Context, message: &str, input: &MessageArgs) -> Result<Vec<u8>> {
    let bytes = if input.hex {
        decode_hex(message)?
    } else {
        message.as_bytes().to_vec()
    };
    if ctx.config.hash_messages && !input.raw {
        return Ok(blake2b_256(&bytes).to_vec());
    }
    if bytes.len() != 32 {
        bail!(
            "unhashed message must be a 32-byte digest, got {} bytes",
            bytes.len()
        );
    }
    Ok(bytes)
}

fn load_private_key(ctx: &Context, arg: &str) -> Result<PrivateKey> {
    let text = resolve_input(arg)?;
    let text = text.trim();
    let var = ctx.config.passphrase_env.clone();
    let passphrase = move || std::env::var(&var).map_err(|_| CryptoError::PassphraseRequired);
    let callback: &PassphraseFn = &passphrase;
    PrivateKey::parse_text_with_passphrase(text, Some(callback)).map_err(|e| match e {
        CryptoError::PassphraseRequired => anyhow::anyhow!(
            "secret key is encrypted; set {} to its passphrase",
            ctx.config.passphrase_env
        ),
        other => anyhow::Error::new(other).context("invalid secret key"),
    })
}

fn require_passphrase(ctx: &Context) -> Result<String> {
    match ctx.config.passphrase() {
        Some(p) if !p.is_empty() => Ok(p),
        _ => bail!(
            "no passphrase: set the {} environment variable",
            ctx.config.passphrase_env
        ),
    }
}
