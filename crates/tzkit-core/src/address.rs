//! # Addresses
//!
//! A 20-byte hash plus an address type. Several address types share the
//! hash length and differ only in their base58 prefix and binary tag, so
//! the type travels alongside the bytes.
//!
//! ## Binary layouts
//!
//! ```text
//! implicit, 21 bytes:   tag ∥ hash20
//! implicit, padded:     0x00 ∥ tag ∥ hash20
//! contract:             0x01 ∥ hash20 ∥ 0x00
//! tx rollup:            0x02 ∥ hash20 ∥ 0x00
//! smart rollup:         0x03 ∥ hash20 ∥ 0x00
//! ```
//!
//! Implicit tags: ed25519 `0`, secp256k1 `1`, P-256 `2`, BLS12-381 `3`,
//! blinded `4`. Decoding reads only the leading 21 or 22 bytes, so
//! callers may pass buffers with an entrypoint suffix attached.
//!
//! ## Blinding
//!
//! [`Address::blind`] commits to an address with keyed BLAKE2b-160 of its
//! hash bytes under a secret. The key enters the hash state directly, so
//! the commitment cannot be extended without knowing the secret.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::digest::blake2b_160_keyed;
use crate::error::EncodingError;
use crate::registry::HashKind;

/// Address hash length in bytes.
pub const ADDRESS_HASH_LEN: usize = 20;

/// Length of the implicit-only binary form.
pub const ADDRESS_LEN: usize = 21;

/// Length of the padded and contract binary forms.
pub const PADDED_ADDRESS_LEN: usize = 22;

/// Semantic type of an [`Address`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum AddressType {
    /// No usable hash.
    #[default]
    Invalid,
    /// Implicit account, ed25519 key (`tz1`).
    Ed25519,
    /// Implicit account, secp256k1 key (`tz2`).
    Secp256k1,
    /// Implicit account, P-256 key (`tz3`).
    P256,
    /// Implicit account, BLS12-381 key (`tz4`).
    Bls12_381,
    /// Blinded commitment to an implicit account (`btz1`).
    Blinded,
    /// Originated contract (`KT1`).
    Contract,
    /// Transaction rollup (`txr1`).
    TxRollup,
    /// Smart rollup (`sr1`).
    SmartRollup,
}

impl AddressType {
    /// Implicit tag byte, or `None` for originated and rollup types.
    pub fn tag(self) -> Option<u8> {
        match self {
            Self::Ed25519 => Some(0),
            Self::Secp256k1 => Some(1),
            Self::P256 => Some(2),
            Self::Bls12_381 => Some(3),
            Self::Blinded => Some(4),
            Self::Invalid | Self::Contract | Self::TxRollup | Self::SmartRollup => None,
        }
    }

    /// Map an implicit tag byte to its address type.
    pub fn from_tag(tag: u8) -> Result<Self, EncodingError> {
        match tag {
            0 => Ok(Self::Ed25519),
            1 => Ok(Self::Secp256k1),
            2 => Ok(Self::P256),
            3 => Ok(Self::Bls12_381),
            4 => Ok(Self::Blinded),
            other => {
                tracing::debug!(tag = other, "unknown implicit address tag");
                Err(EncodingError::UnknownAddressType(format!("tag {other}")))
            }
        }
    }

    /// First byte of the 22-byte form.
    pub fn discriminator(self) -> Option<u8> {
        match self {
            Self::Invalid => None,
            Self::Contract => Some(1),
            Self::TxRollup => Some(2),
            Self::SmartRollup => Some(3),
            _ => Some(0),
        }
    }

    /// Registry kind for the text form.
    pub fn hash_kind(self) -> Option<HashKind> {
        match self {
            Self::Invalid => None,
            Self::Ed25519 => Some(HashKind::Ed25519PublicKeyHash),
            Self::Secp256k1 => Some(HashKind::Secp256k1PublicKeyHash),
            Self::P256 => Some(HashKind::P256PublicKeyHash),
            Self::Bls12_381 => Some(HashKind::Bls12_381PublicKeyHash),
            Self::Blinded => Some(HashKind::BlindedPublicKeyHash),
            Self::Contract => Some(HashKind::ContractHash),
            Self::TxRollup => Some(HashKind::TxRollupAddress),
            Self::SmartRollup => Some(HashKind::SmartRollupAddress),
        }
    }

    /// Inverse of [`hash_kind`](Self::hash_kind).
    pub fn from_hash_kind(kind: HashKind) -> Option<Self> {
        match kind {
            HashKind::Ed25519PublicKeyHash => Some(Self::Ed25519),
            HashKind::Secp256k1PublicKeyHash => Some(Self::Secp256k1),
            HashKind::P256PublicKeyHash => Some(Self::P256),
            HashKind::Bls12_381PublicKeyHash => Some(Self::Bls12_381),
            HashKind::BlindedPublicKeyHash => Some(Self::Blinded),
            HashKind::ContractHash => Some(Self::Contract),
            HashKind::TxRollupAddress => Some(Self::TxRollup),
            HashKind::SmartRollupAddress => Some(Self::SmartRollup),
            _ => None,
        }
    }

    /// Text prefix such as `tz1`; empty for `Invalid`.
    pub fn prefix(self) -> &'static str {
        self.hash_kind().map(HashKind::text_prefix).unwrap_or("")
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Invalid => "invalid",
            Self::Ed25519 => "ed25519",
            Self::Secp256k1 => "secp256k1",
            Self::P256 => "p256",
            Self::Bls12_381 => "bls12_381",
            Self::Blinded => "blinded",
            Self::Contract => "contract",
            Self::TxRollup => "tx_rollup",
            Self::SmartRollup => "smart_rollup",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// An account, contract, or rollup address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Address {
    kind: AddressType,
    hash: [u8; ADDRESS_HASH_LEN],
}

impl Address {
    /// The invalid sentinel.
    pub const fn invalid() -> Self {
        Self {
            kind: AddressType::Invalid,
            hash: [0u8; ADDRESS_HASH_LEN],
        }
    }

    /// Build an address from a hash slice.
    ///
    /// # Errors
    ///
    /// `InvalidLength` unless `hash` is exactly 20 bytes.
    pub fn new(kind: AddressType, hash: &[u8]) -> Result<Self, EncodingError> {
        let hash: [u8; ADDRESS_HASH_LEN] =
            hash.try_into().map_err(|_| EncodingError::InvalidLength {
                expected: ADDRESS_HASH_LEN,
                actual: hash.len(),
            })?;
        Ok(Self { kind, hash })
    }

    /// Build an address from a trusted 20-byte key hash.
    pub const fn from_key_hash(kind: AddressType, hash: [u8; ADDRESS_HASH_LEN]) -> Self {
        Self { kind, hash }
    }

    /// Address type.
    pub fn kind(&self) -> AddressType {
        self.kind
    }

    /// The 20 hash bytes.
    pub fn hash(&self) -> &[u8; ADDRESS_HASH_LEN] {
        &self.hash
    }

    /// True unless this is the invalid sentinel.
    pub fn is_valid(&self) -> bool {
        self.kind != AddressType::Invalid
    }

    /// True for `tz1`..`tz4` and blinded addresses.
    pub fn is_implicit(&self) -> bool {
        self.kind.tag().is_some()
    }

    /// True for originated contracts.
    pub fn is_contract(&self) -> bool {
        self.kind == AddressType::Contract
    }

    /// True for tx and smart rollups.
    pub fn is_rollup(&self) -> bool {
        matches!(self.kind, AddressType::TxRollup | AddressType::SmartRollup)
    }

    /// Binary form: 21 bytes for implicit types, 22 for contracts and
    /// rollups, empty for the invalid sentinel.
    pub fn encode(&self) -> Vec<u8> {
        match (self.kind.tag(), self.kind.discriminator()) {
            (Some(tag), _) => {
                let mut out = Vec::with_capacity(ADDRESS_LEN);
                out.push(tag);
                out.extend_from_slice(&self.hash);
                out
            }
            (None, Some(disc)) => {
                let mut out = Vec::with_capacity(PADDED_ADDRESS_LEN);
                out.push(disc);
                out.extend_from_slice(&self.hash);
                out.push(0);
                out
            }
            (None, None) => Vec::new(),
        }
    }

    /// Binary form with a fixed 22-byte width; empty for the invalid
    /// sentinel.
    pub fn encode_padded(&self) -> Vec<u8> {
        match self.kind.tag() {
            Some(tag) => {
                let mut out = Vec::with_capacity(PADDED_ADDRESS_LEN);
                out.push(0);
                out.push(tag);
                out.extend_from_slice(&self.hash);
                out
            }
            None => self.encode(),
        }
    }

    /// Decode either binary form, ignoring any trailing bytes.
    ///
    /// An empty buffer yields the invalid sentinel.
    ///
    /// # Errors
    ///
    /// - `InvalidLength` for 1 to 20 bytes.
    /// - `UnknownAddressType` for an unknown implicit tag.
    pub fn decode(buf: &[u8]) -> Result<Self, EncodingError> {
        if buf.is_empty() {
            return Ok(Self::invalid());
        }
        if buf.len() < ADDRESS_LEN {
            return Err(EncodingError::InvalidLength {
                expected: ADDRESS_LEN,
                actual: buf.len(),
            });
        }
        if buf.len() >= PADDED_ADDRESS_LEN {
            let kind = match buf[0] {
                0 => Some(AddressType::from_tag(buf[1])?),
                1 => Some(AddressType::Contract),
                2 => Some(AddressType::TxRollup),
                3 => Some(AddressType::SmartRollup),
                _ => None,
            };
            match kind {
                Some(kind) if buf[0] == 0 => return Self::new(kind, &buf[2..PADDED_ADDRESS_LEN]),
                Some(kind) => return Self::new(kind, &buf[1..ADDRESS_LEN]),
                None => {}
            }
        }
        let kind = AddressType::from_tag(buf[0])?;
        Self::new(kind, &buf[1..ADDRESS_LEN])
    }

    /// Alias for [`encode`](Self::encode).
    pub fn to_binary(&self) -> Vec<u8> {
        self.encode()
    }

    /// Alias for [`decode`](Self::decode).
    pub fn parse_binary(buf: &[u8]) -> Result<Self, EncodingError> {
        Self::decode(buf)
    }

    /// Parse `tz1…`, `KT1…`, `btz1…`, `txr1…` or `sr1…` text.
    ///
    /// Empty text yields the invalid sentinel.
    pub fn parse_text(text: &str) -> Result<Self, EncodingError> {
        if text.is_empty() {
            return Ok(Self::invalid());
        }
        let hash_kind = HashKind::detect(text)?;
        let kind = AddressType::from_hash_kind(hash_kind).ok_or_else(|| {
            tracing::debug!(%hash_kind, "text is not an address");
            EncodingError::UnknownAddressType(text.to_string())
        })?;
        let mut hash = [0u8; ADDRESS_HASH_LEN];
        hash_kind.decode_text(text, &mut hash)?;
        Ok(Self { kind, hash })
    }

    /// Base58check text, or an empty string for the invalid sentinel.
    pub fn to_text(&self) -> String {
        match self.kind.hash_kind() {
            Some(kind) => crate::base58::encode(&self.hash, kind.version()),
            None => String::new(),
        }
    }

    /// Parse a literal compiled into the binary.
    ///
    /// # Panics
    ///
    /// Panics if `text` is not a valid address.
    pub fn must_parse(text: &str) -> Self {
        match Self::parse_text(text) {
            Ok(a) => a,
            Err(e) => panic!("invalid address literal {text:?}: {e}"),
        }
    }

    /// Commit to this address under `secret`.
    ///
    /// # Errors
    ///
    /// `UnknownAddressType` for the invalid sentinel; `InvalidLength` for a
    /// secret longer than 64 bytes.
    pub fn blind(&self, secret: &[u8]) -> Result<Address, EncodingError> {
        if !self.is_valid() {
            return Err(EncodingError::UnknownAddressType("cannot blind invalid address".into()));
        }
        let hash = blake2b_160_keyed(secret, &self.hash)?;
        Ok(Self::from_key_hash(AddressType::Blinded, hash))
    }

    /// True if `blinded` is this address blinded under `secret`.
    pub fn match_blinded(&self, blinded: &Address, secret: &[u8]) -> bool {
        if blinded.kind != AddressType::Blinded {
            return false;
        }
        match self.blind(secret) {
            Ok(candidate) => candidate.hash == blinded.hash,
            Err(_) => false,
        }
    }

    // Padded-layout sort key: (discriminator, tag, hash).
    fn sort_key(&self) -> (Option<u8>, Option<u8>, &[u8; ADDRESS_HASH_LEN]) {
        (self.kind.discriminator(), self.kind.tag(), &self.hash)
    }
}

impl Ord for Address {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for Address {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Address {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_text(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "Address({})", self.to_text())
        } else {
            f.write_str("Address(invalid)")
        }
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_text())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse_text(&text).map_err(serde::de::Error::custom)
    }
}
