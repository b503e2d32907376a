//! # Typed Hashes
//!
//! Fixed-length byte arrays tagged by [`HashKind`]. Each typed hash is a
//! `Copy` newtype over `[u8; N]`, so the length is enforced by the type and
//! cannot drift from the registry row.
//!
//! ## Construction paths
//!
//! 1. `parse_text`: base58check text, prefix and length checked against the
//!    registry. Empty text yields the zero sentinel.
//! 2. `parse_binary`: raw bytes of exactly `raw_len`, or an empty buffer
//!    for the zero sentinel.
//! 3. `from_bytes`: trusted fixed-size array, no checks.
//!
//! `must_parse` exists for literals compiled into the binary and panics on
//! malformed input. It must never see runtime data.
//!
//! [`Hash`] is the runtime-kinded counterpart for call sites that learn the
//! kind from the text itself.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::digest::blake2b_256;
use crate::error::EncodingError;
use crate::registry::HashKind;

/// Largest payload a generic [`Hash`] can hold.
pub const MAX_HASH_LEN: usize = 32;

/// Abbreviate base58 text as first 8 chars, `…`, last 4 chars.
fn shorten(text: &str) -> String {
    if text.len() <= 12 {
        return text.to_string();
    }
    format!("{}…{}", &text[..8], &text[text.len() - 4..])
}

macro_rules! define_hash {
    ($(#[$meta:meta])* $name:ident, $kind:expr, $len:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name([u8; $len]);

        impl $name {
            /// Registry kind of this hash.
            pub const KIND: HashKind = $kind;
            /// Payload length in bytes.
            pub const LEN: usize = $len;

            /// Wrap a trusted fixed-size array.
            pub const fn from_bytes(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            /// The all-zero "unset" sentinel.
            pub const fn zero() -> Self {
                Self([0u8; $len])
            }

            /// True for the all-zero sentinel.
            pub fn is_zero(&self) -> bool {
                self.0.iter().all(|b| *b == 0)
            }

            /// Raw payload bytes.
            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            /// Parse base58check text; empty text is the zero sentinel.
            pub fn parse_text(text: &str) -> Result<Self, EncodingError> {
                let mut bytes = [0u8; $len];
                if !text.is_empty() {
                    Self::KIND.decode_text(text, &mut bytes)?;
                }
                Ok(Self(bytes))
            }

            /// Base58check text of this hash.
            pub fn to_text(&self) -> String {
                crate::base58::encode(&self.0, Self::KIND.version())
            }

            /// Parse raw bytes; an empty buffer is the zero sentinel.
            pub fn parse_binary(buf: &[u8]) -> Result<Self, EncodingError> {
                match buf.len() {
                    0 => Ok(Self::zero()),
                    $len => {
                        let mut bytes = [0u8; $len];
                        bytes.copy_from_slice(buf);
                        Ok(Self(bytes))
                    }
                    actual => Err(EncodingError::InvalidLength {
                        expected: $len,
                        actual,
                    }),
                }
            }

            /// Raw payload bytes as an owned vector.
            pub fn to_binary(&self) -> Vec<u8> {
                self.0.to_vec()
            }

            /// Abbreviated text for display, e.g. `BLockGen…byZe`.
            pub fn short(&self) -> String {
                shorten(&self.to_text())
            }

            /// Parse a literal compiled into the binary.
            ///
            /// # Panics
            ///
            /// Panics if `text` is not a valid hash of this kind.
            pub fn must_parse(text: &str) -> Self {
                match Self::parse_text(text) {
                    Ok(h) => h,
                    Err(e) => panic!("invalid {} literal {text:?}: {e}", stringify!($name)),
                }
            }
        }

        impl FromStr for $name {
            type Err = EncodingError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse_text(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_text())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_text())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_text())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = String::deserialize(deserializer)?;
                Self::parse_text(&text).map_err(serde::de::Error::custom)
            }
        }

        impl From<$name> for Hash {
            fn from(h: $name) -> Hash {
                let mut bytes = [0u8; MAX_HASH_LEN];
                bytes[..$len].copy_from_slice(&h.0);
                Hash {
                    kind: Some($kind),
                    bytes,
                }
            }
        }

        impl TryFrom<Hash> for $name {
            type Error = EncodingError;

            fn try_from(h: Hash) -> Result<Self, Self::Error> {
                match h.kind {
                    None => Ok(Self::zero()),
                    Some(kind) if kind == $kind => Self::parse_binary(h.as_bytes()),
                    Some(kind) => Err(EncodingError::invalid_prefix(
                        $kind.version(),
                        kind.version(),
                    )),
                }
            }
        }
    };
}

define_hash!(
    /// Chain identifier, `Net…`.
    ChainIdHash, HashKind::ChainId, 4
);
define_hash!(
    /// Block hash, `B…`.
    BlockHash, HashKind::Block, 32
);
define_hash!(
    /// Protocol hash, `P…`.
    ProtocolHash, HashKind::Protocol, 32
);
define_hash!(
    /// Operation hash, `o…`.
    OpHash, HashKind::Operation, 32
);
define_hash!(
    /// Hash of a block's operation list list, `LLo…`.
    OpListListHash, HashKind::OperationListList, 32
);
define_hash!(
    /// Block payload hash, `vh…`.
    PayloadHash, HashKind::BlockPayload, 32
);
define_hash!(
    /// Context hash, `Co…`.
    ContextHash, HashKind::Context, 32
);
define_hash!(
    /// Block metadata hash, `bm…`.
    BlockMetadataHash, HashKind::BlockMetadata, 32
);
define_hash!(
    /// Operation metadata hash, `r…`.
    OpMetadataHash, HashKind::OperationMetadata, 32
);
define_hash!(
    /// Script expression hash, `expr…`.
    ExprHash, HashKind::ScriptExpr, 32
);
define_hash!(
    /// Cycle nonce hash, `nce…`.
    NonceHash, HashKind::Nonce, 32
);
define_hash!(
    /// Smart rollup commitment hash, `src1…`.
    SmartRollupCommitHash, HashKind::SmartRollupCommitment, 32
);
define_hash!(
    /// Smart rollup state hash, `srs1…`.
    SmartRollupStateHash, HashKind::SmartRollupState, 32
);

/// Genesis protocol hash.
pub const PROTO_GENESIS: &str = "PrihK96nBAFSxVL1GLJTVhu9YnzkMFiBeuJRPA8NwuZVZCE1L6i";

/// Mainnet genesis block hash.
pub const MAINNET_GENESIS: &str = "BLockGenesisGenesisGenesisGenesisGenesisf79b5d1CoW2";

/// Mainnet chain id.
pub const MAINNET_CHAIN_ID: &str = "NetXdQprcVkpaWU";

impl ProtocolHash {
    /// The genesis protocol.
    pub fn genesis() -> Self {
        Self::must_parse(PROTO_GENESIS)
    }
}

impl ChainIdHash {
    /// Mainnet chain id.
    pub fn mainnet() -> Self {
        Self::must_parse(MAINNET_CHAIN_ID)
    }

    /// Derive a chain id from its genesis block hash: the first four bytes
    /// of BLAKE2b-256 over the block hash bytes.
    pub fn from_block_hash(genesis: &BlockHash) -> Self {
        let digest = blake2b_256(genesis.as_bytes());
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&digest[..4]);
        Self(bytes)
    }
}

// ---------------------------------------------------------------------------
// Generic hash
// ---------------------------------------------------------------------------

/// A hash whose kind is known only at runtime.
///
/// Holds any registry kind with a payload of at most 32 bytes. The invalid
/// sentinel has no kind and no bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Hash {
    kind: Option<HashKind>,
    bytes: [u8; MAX_HASH_LEN],
}

impl Hash {
    /// The invalid sentinel.
    pub const fn invalid() -> Self {
        Self {
            kind: None,
            bytes: [0u8; MAX_HASH_LEN],
        }
    }

    /// Build a hash of `kind` from raw bytes.
    ///
    /// # Errors
    ///
    /// `InvalidLength` unless `bytes.len() == kind.raw_len()`;
    /// `UnknownHashType` for kinds longer than 32 bytes.
    pub fn new(kind: HashKind, bytes: &[u8]) -> Result<Self, EncodingError> {
        if kind.raw_len() > MAX_HASH_LEN {
            return Err(EncodingError::UnknownHashType(kind.to_string()));
        }
        if bytes.len() != kind.raw_len() {
            return Err(EncodingError::InvalidLength {
                expected: kind.raw_len(),
                actual: bytes.len(),
            });
        }
        let mut buf = [0u8; MAX_HASH_LEN];
        buf[..bytes.len()].copy_from_slice(bytes);
        Ok(Self {
            kind: Some(kind),
            bytes: buf,
        })
    }

    /// Kind, or `None` for the invalid sentinel.
    pub fn kind(&self) -> Option<HashKind> {
        self.kind
    }

    /// True unless this is the invalid sentinel.
    pub fn is_valid(&self) -> bool {
        self.kind.is_some()
    }

    /// True for the invalid sentinel or an all-zero payload.
    pub fn is_zero(&self) -> bool {
        self.as_bytes().iter().all(|b| *b == 0)
    }

    /// Payload bytes, exactly `raw_len` of the kind.
    pub fn as_bytes(&self) -> &[u8] {
        let len = self.kind.map(HashKind::raw_len).unwrap_or(0);
        &self.bytes[..len]
    }

    /// Parse text, detecting the kind from its length and prefix.
    pub fn parse_text(text: &str) -> Result<Self, EncodingError> {
        if text.is_empty() {
            return Ok(Self::invalid());
        }
        let kind = HashKind::detect(text)?;
        if kind.raw_len() > MAX_HASH_LEN {
            return Err(EncodingError::UnknownHashType(text.to_string()));
        }
        let mut bytes = [0u8; MAX_HASH_LEN];
        kind.decode_text(text, &mut bytes[..kind.raw_len()])?;
        Ok(Self {
            kind: Some(kind),
            bytes,
        })
    }

    /// Base58check text, or an empty string for the invalid sentinel.
    pub fn to_text(&self) -> String {
        match self.kind {
            Some(kind) => crate::base58::encode(self.as_bytes(), kind.version()),
            None => String::new(),
        }
    }

    /// Parse raw bytes of a known kind; empty input is the invalid sentinel.
    pub fn parse_binary(kind: HashKind, buf: &[u8]) -> Result<Self, EncodingError> {
        if buf.is_empty() {
            return Ok(Self::invalid());
        }
        Self::new(kind, buf)
    }

    /// Raw payload bytes as an owned vector.
    pub fn to_binary(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    /// Abbreviated text for display.
    pub fn short(&self) -> String {
        shorten(&self.to_text())
    }
}

impl FromStr for Hash {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_text(s)
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            Some(kind) => write!(f, "Hash({kind}, {})", self.to_text()),
            None => f.write_str("Hash(invalid)"),
        }
    }
}

impl Serialize for Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_text())
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse_text(&text).map_err(serde::de::Error::custom)
    }
}
