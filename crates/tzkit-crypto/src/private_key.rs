//! # Private Keys
//!
//! A [`PrivateKey`] holds a 32-byte secret (ed25519 seed or curve scalar)
//! together with the public key derived from it at construction.
//!
//! ## Text forms
//!
//! | Curve     | Plain                         | Encrypted |
//! |-----------|-------------------------------|-----------|
//! | ed25519   | `edsk…` (54), `edsk…` (98)    | `edesk…`  |
//! | secp256k1 | `spsk…`                       | `spesk…`  |
//! | P-256     | `p2sk…`                       | `p2esk…`  |
//! | BLS12-381 | `BLsk…`                       | `BLesk…`  |
//!
//! The 98-character ed25519 form is `seed ∥ public key`; it is accepted on
//! input only when the trailing public key matches the seed. Output always
//! uses the 54-character seed form.
//!
//! ## Security Invariant
//!
//! The secret lives in a [`Zeroizing`] buffer, compares in constant time,
//! and never reaches `Debug`, `Display` or serde.

use std::fmt;

use subtle::ConstantTimeEq;
use tzkit_core::{blake2b_256, Address, CryptoError, EncodingError, HashKind};
use zeroize::Zeroizing;

use crate::encryption;
use crate::key::{Key, KeyType};
use crate::signature::{Signature, SignatureType};
use crate::{bls, ecdsa, ed25519};

/// Secret length for every curve.
pub const SECRET_LEN: usize = 32;

/// Supplies a passphrase when an encrypted key is parsed.
pub type PassphraseFn = dyn Fn() -> Result<String, CryptoError>;

/// A private key and its derived public key.
#[derive(Clone)]
pub struct PrivateKey {
    kind: KeyType,
    secret: Zeroizing<[u8; SECRET_LEN]>,
    public: Key,
}

fn derive_public(kind: KeyType, secret: &[u8; SECRET_LEN]) -> Result<Key, CryptoError> {
    let key = match kind {
        KeyType::Ed25519 => Key::from_bytes(kind, &ed25519::public_key(secret))?,
        KeyType::Secp256k1 => Key::from_bytes(kind, &ecdsa::secp256k1::public_key(secret)?)?,
        KeyType::P256 => Key::from_bytes(kind, &ecdsa::nistp256::public_key(secret)?)?,
        KeyType::Bls12_381 => Key::from_bytes(kind, &bls::public_key(secret)?)?,
    };
    Ok(key)
}

impl PrivateKey {
    /// Build a key from its 32-byte secret.
    ///
    /// # Errors
    ///
    /// - `InvalidLength` if `raw` is not 32 bytes.
    /// - `InvalidKey` if the scalar is zero or not below the group order.
    pub fn from_bytes(kind: KeyType, raw: &[u8]) -> Result<Self, CryptoError> {
        let mut secret = Zeroizing::new([0u8; SECRET_LEN]);
        if raw.len() != SECRET_LEN {
            return Err(EncodingError::InvalidLength {
                expected: SECRET_LEN,
                actual: raw.len(),
            }
            .into());
        }
        secret.copy_from_slice(raw);
        let public = derive_public(kind, &secret)?;
        Ok(Self {
            kind,
            secret,
            public,
        })
    }

    /// Generate a fresh key from the operating system RNG.
    pub fn generate(kind: KeyType) -> Result<Self, CryptoError> {
        let secret = match kind {
            KeyType::Ed25519 => ed25519::generate(),
            KeyType::Secp256k1 => ecdsa::secp256k1::generate(),
            KeyType::P256 => ecdsa::nistp256::generate(),
            KeyType::Bls12_381 => bls::generate()?,
        };
        let key = Self::from_bytes(kind, &secret[..])?;
        tracing::debug!(curve = %kind, address = %key.address(), "generated private key");
        Ok(key)
    }

    /// Curve.
    pub fn kind(&self) -> KeyType {
        self.kind
    }

    /// Public key.
    pub fn public(&self) -> Key {
        self.public
    }

    /// Implicit address of the public key.
    pub fn address(&self) -> Address {
        self.public.address()
    }

    /// Sign a 32-byte digest.
    pub fn sign(&self, digest: &[u8]) -> Result<Signature, CryptoError> {
        let kind = SignatureType::from_key_type(self.kind);
        let sig = match self.kind {
            KeyType::Ed25519 => Signature::new(kind, &ed25519::sign(&self.secret, digest))?,
            KeyType::Secp256k1 => {
                Signature::new(kind, &ecdsa::secp256k1::sign(&self.secret, digest)?)?
            }
            KeyType::P256 => Signature::new(kind, &ecdsa::nistp256::sign(&self.secret, digest)?)?,
            KeyType::Bls12_381 => Signature::new(kind, &bls::sign(&self.secret, digest)?)?,
        };
        Ok(sig)
    }

    /// Sign `blake2b_256(message)`.
    pub fn sign_message(&self, message: &[u8]) -> Result<Signature, CryptoError> {
        self.sign(&blake2b_256(message))
    }

    /// Plain secret key text.
    pub fn to_text(&self) -> Zeroizing<String> {
        Zeroizing::new(
            self.kind
                .secret_key_kind()
                .encode_text(&self.secret[..])
                .unwrap_or_default(),
        )
    }

    /// Encrypted secret key text under `passphrase`.
    pub fn encrypt_text(&self, passphrase: &str) -> Result<String, CryptoError> {
        let sealed = encryption::encrypt(&self.secret[..], passphrase.as_bytes())?;
        Ok(self.kind.encrypted_kind().encode_text(&sealed)?)
    }

    /// True when `text` carries an encrypted secret key prefix.
    pub fn is_encrypted(text: &str) -> bool {
        HashKind::detect(text)
            .ok()
            .and_then(KeyType::from_encrypted_kind)
            .is_some()
    }

    /// Parse plain secret key text.
    ///
    /// # Errors
    ///
    /// `PassphraseRequired` for encrypted text.
    pub fn parse_text(text: &str) -> Result<Self, CryptoError> {
        Self::parse_text_with_passphrase(text, None)
    }

    /// Parse plain or encrypted secret key text. `passphrase` is called
    /// only for encrypted text.
    ///
    /// # Errors
    ///
    /// - `PassphraseRequired` for encrypted text without a callback.
    /// - `DecryptFailed` for a wrong passphrase.
    /// - `InvalidKey` for a 98-character ed25519 key whose public half
    ///   does not match its seed, or a scalar out of range.
    /// - `Encoding(UnknownKeyType)` for text that is not a secret key.
    pub fn parse_text_with_passphrase(
        text: &str,
        passphrase: Option<&PassphraseFn>,
    ) -> Result<Self, CryptoError> {
        let hash_kind = HashKind::detect(text)?;

        if let Some(kind) = KeyType::from_encrypted_kind(hash_kind) {
            let passphrase = passphrase.ok_or(CryptoError::PassphraseRequired)?;
            let mut sealed = [0u8; SECRET_LEN + encryption::SALT_LEN + encryption::TAG_LEN];
            hash_kind.decode_text(text, &mut sealed)?;
            let pass = Zeroizing::new(passphrase()?);
            let plain = encryption::decrypt(&sealed, pass.as_bytes())?;
            return Self::from_bytes(kind, &plain);
        }

        if hash_kind == HashKind::Ed25519SecretKey {
            let mut full = Zeroizing::new([0u8; 2 * SECRET_LEN]);
            hash_kind.decode_text(text, &mut full[..])?;
            let key = Self::from_bytes(KeyType::Ed25519, &full[..SECRET_LEN])?;
            if key.public.as_bytes() != &full[SECRET_LEN..] {
                return Err(CryptoError::InvalidKey(
                    "ed25519 secret key does not match its public key".into(),
                ));
            }
            return Ok(key);
        }

        let kind = KeyType::from_secret_kind(hash_kind).ok_or_else(|| {
            EncodingError::UnknownKeyType(format!("{hash_kind} is not a secret key"))
        })?;
        let mut secret = Zeroizing::new([0u8; SECRET_LEN]);
        hash_kind.decode_text(text, &mut secret[..])?;
        Self::from_bytes(kind, &secret[..])
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && bool::from(self.secret[..].ct_eq(&other.secret[..]))
    }
}

impl Eq for PrivateKey {}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey({}, <private>)", self.kind)
    }
}
