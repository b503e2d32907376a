//! # Signatures
//!
//! A signature is its raw bytes plus the curve that produced them, or one
//! of two curve-erased forms: `Generic` (64 bytes, `sig…`) and
//! `GenericAggregate` (96 bytes, `asig…`).
//!
//! ## Binary form
//!
//! ```text
//! generic / generic aggregate:  raw
//! curve-tagged:                 tag ∥ raw    (65 or 97 bytes)
//! ```
//!
//! The tag is left out when the length alone identifies the form. Tags
//! follow the key tags: ed25519 `0`, secp256k1 `1`, P-256 `2`,
//! BLS12-381 `3`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tzkit_core::{EncodingError, HashKind};

use crate::key::KeyType;

/// Length of every non-BLS signature.
pub const SIGNATURE_LEN: usize = 64;

/// Length of a BLS12-381 signature.
pub const BLS_SIGNATURE_LEN: usize = 96;

/// Curve (or curve-erased form) of a [`Signature`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum SignatureType {
    /// No signature.
    #[default]
    Invalid,
    /// ed25519, `edsig…`.
    Ed25519,
    /// secp256k1, `spsig1…`.
    Secp256k1,
    /// P-256, `p2sig…`.
    P256,
    /// BLS12-381, `BLsig…`.
    Bls12_381,
    /// 64-byte signature of unstated curve, `sig…`.
    Generic,
    /// 96-byte signature of unstated curve, `asig…`.
    GenericAggregate,
}

impl SignatureType {
    /// Raw length in bytes; zero for `Invalid`.
    pub fn len(self) -> usize {
        match self {
            Self::Invalid => 0,
            Self::Bls12_381 | Self::GenericAggregate => BLS_SIGNATURE_LEN,
            _ => SIGNATURE_LEN,
        }
    }

    /// True for `Invalid`.
    pub fn is_empty(self) -> bool {
        self == Self::Invalid
    }

    /// Curve of a concrete signature type.
    pub fn key_type(self) -> Option<KeyType> {
        match self {
            Self::Ed25519 => Some(KeyType::Ed25519),
            Self::Secp256k1 => Some(KeyType::Secp256k1),
            Self::P256 => Some(KeyType::P256),
            Self::Bls12_381 => Some(KeyType::Bls12_381),
            Self::Invalid | Self::Generic | Self::GenericAggregate => None,
        }
    }

    /// Signature type produced by keys of `kind`.
    pub fn from_key_type(kind: KeyType) -> Self {
        match kind {
            KeyType::Ed25519 => Self::Ed25519,
            KeyType::Secp256k1 => Self::Secp256k1,
            KeyType::P256 => Self::P256,
            KeyType::Bls12_381 => Self::Bls12_381,
        }
    }

    /// Registry kind of the text form.
    pub fn hash_kind(self) -> Option<HashKind> {
        match self {
            Self::Invalid => None,
            Self::Ed25519 => Some(HashKind::Ed25519Signature),
            Self::Secp256k1 => Some(HashKind::Secp256k1Signature),
            Self::P256 => Some(HashKind::P256Signature),
            Self::Bls12_381 => Some(HashKind::Bls12_381Signature),
            Self::Generic => Some(HashKind::GenericSignature),
            Self::GenericAggregate => Some(HashKind::GenericAggregateSignature),
        }
    }

    /// Inverse of [`hash_kind`](Self::hash_kind).
    pub fn from_hash_kind(kind: HashKind) -> Option<Self> {
        match kind {
            HashKind::Ed25519Signature => Some(Self::Ed25519),
            HashKind::Secp256k1Signature => Some(Self::Secp256k1),
            HashKind::P256Signature => Some(Self::P256),
            HashKind::Bls12_381Signature => Some(Self::Bls12_381),
            HashKind::GenericSignature => Some(Self::Generic),
            HashKind::GenericAggregateSignature => Some(Self::GenericAggregate),
            _ => None,
        }
    }

    /// Curve-erased counterpart.
    pub fn generic(self) -> Self {
        match self {
            Self::Invalid => Self::Invalid,
            Self::Bls12_381 | Self::GenericAggregate => Self::GenericAggregate,
            _ => Self::Generic,
        }
    }
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

/// A signature value.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature {
    kind: SignatureType,
    bytes: [u8; BLS_SIGNATURE_LEN],
}

impl Default for Signature {
    fn default() -> Self {
        Self::invalid()
    }
}

impl Signature {
    /// The invalid sentinel.
    pub const fn invalid() -> Self {
        Self {
            kind: SignatureType::Invalid,
            bytes: [0u8; BLS_SIGNATURE_LEN],
        }
    }

    /// Build a signature of `kind` from raw bytes.
    ///
    /// # Errors
    ///
    /// `InvalidLength` unless `raw.len() == kind.len()`.
    pub fn new(kind: SignatureType, raw: &[u8]) -> Result<Self, EncodingError> {
        if raw.len() != kind.len() {
            return Err(EncodingError::InvalidLength {
                expected: kind.len(),
                actual: raw.len(),
            });
        }
        let mut bytes = [0u8; BLS_SIGNATURE_LEN];
        bytes[..raw.len()].copy_from_slice(raw);
        Ok(Self { kind, bytes })
    }

    /// Signature type.
    pub fn kind(&self) -> SignatureType {
        self.kind
    }

    /// Raw signature bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.kind.len()]
    }

    /// True unless this is the invalid sentinel.
    pub fn is_valid(&self) -> bool {
        self.kind != SignatureType::Invalid
    }

    /// True for the curve-erased forms.
    pub fn is_generic(&self) -> bool {
        matches!(
            self.kind,
            SignatureType::Generic | SignatureType::GenericAggregate
        )
    }

    /// Drop the curve, keeping the bytes.
    pub fn to_generic(&self) -> Signature {
        Self {
            kind: self.kind.generic(),
            bytes: self.bytes,
        }
    }

    /// Text of the curve-erased form, `sig…` or `asig…`.
    pub fn generic(&self) -> String {
        self.to_generic().to_text()
    }

    /// Attach `curve` to a generic signature.
    ///
    /// A concrete signature of the same curve is returned unchanged.
    ///
    /// # Errors
    ///
    /// `UnknownSignatureType` if the length does not fit the curve or the
    /// signature already names another curve.
    pub fn with_curve(&self, curve: KeyType) -> Result<Signature, EncodingError> {
        let target = SignatureType::from_key_type(curve);
        if self.kind == target {
            return Ok(*self);
        }
        if self.is_generic() && self.kind == target.generic() {
            return Ok(Self {
                kind: target,
                bytes: self.bytes,
            });
        }
        Err(EncodingError::UnknownSignatureType(format!(
            "{:?} signature cannot be read as {curve}",
            self.kind
        )))
    }

    /// Parse text of any signature prefix. Empty text is the invalid
    /// sentinel.
    pub fn parse_text(text: &str) -> Result<Self, EncodingError> {
        if text.is_empty() {
            return Ok(Self::invalid());
        }
        let hash_kind = HashKind::detect(text)?;
        let kind = SignatureType::from_hash_kind(hash_kind).ok_or_else(|| {
            tracing::debug!(%hash_kind, "text is not a signature");
            EncodingError::UnknownSignatureType(text.to_string())
        })?;
        let mut bytes = [0u8; BLS_SIGNATURE_LEN];
        hash_kind.decode_text(text, &mut bytes[..kind.len()])?;
        Ok(Self { kind, bytes })
    }

    /// Base58check text under the signature's own prefix.
    pub fn to_text(&self) -> String {
        match self.kind.hash_kind() {
            Some(kind) => kind
                .encode_text(self.as_bytes())
                .unwrap_or_default(),
            None => String::new(),
        }
    }

    /// Binary form, tag byte present only for curve-tagged signatures.
    pub fn to_binary(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.kind.len());
        if let Some(kind) = self.kind.key_type() {
            out.push(kind.tag());
        }
        out.extend_from_slice(self.as_bytes());
        out
    }

    /// Decode either binary form. An empty buffer is the invalid sentinel.
    ///
    /// # Errors
    ///
    /// `UnknownSignatureType` for an unexpected length or tag.
    pub fn parse_binary(buf: &[u8]) -> Result<Self, EncodingError> {
        match buf.len() {
            0 => Ok(Self::invalid()),
            SIGNATURE_LEN => Self::new(SignatureType::Generic, buf),
            BLS_SIGNATURE_LEN => Self::new(SignatureType::GenericAggregate, buf),
            len if len == SIGNATURE_LEN + 1 || len == BLS_SIGNATURE_LEN + 1 => {
                let kind = KeyType::from_tag(buf[0])
                    .map(SignatureType::from_key_type)
                    .map_err(|_| {
                        EncodingError::UnknownSignatureType(format!("tag {}", buf[0]))
                    })?;
                if kind.len() != len - 1 {
                    return Err(EncodingError::UnknownSignatureType(format!(
                        "tag {} with {} signature bytes",
                        buf[0],
                        len - 1
                    )));
                }
                Self::new(kind, &buf[1..])
            }
            len => Err(EncodingError::UnknownSignatureType(format!("{len} bytes"))),
        }
    }
}

impl FromStr for Signature {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_text(s)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "Signature({})", self.to_text())
        } else {
            f.write_str("Signature(invalid)")
        }
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_text())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse_text(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EDSIG: &str = "edsigtXomBKi5CTRf5cjATJWSyaRvhfYNHqSUGrn4SdbYRcGwQrUGjzEfQDTuqHhuA8b2d8NarZjz8TRf65WkpQmo423BtomS8Q";
    const SPSIG: &str = "spsig1PPUFZucuAQybs5wsqsNQ68QNgFaBnVKMFaoZZfi1BtNnuCAWnmL9wVy5HfHkR6AeodjVGxpBVVSYcJKyMURn6K1yknYLm";
    const P2SIG: &str = "p2sigRmXDp38VNVaEQH28LYukfLPn8QB5hPEberhvQrrUpRscDZJrrApbRh2u46PTVTwKXjxTLKNN9dyLhPQU6U6jWPGxe4d9v";
    const BLSIG: &str = "BLsigAmLKnuw12tethjMmotFPaQ6u4XCKrVk6c15dkRXKkjDDjHywbhS3nd4rBT31yrCvvQrS2HntWhDRu7sX8Vvek53zBUwQHqfcHRiVKVj1ehq8CBYs1Z7XW2rkL2XkVNHua4cnvxY7F";
    const GENERIC: &str = "sigNCaj9CnmD94eZH9C7aPPqBbVCJF72fYmCFAXqEbWfqE633WNFWYQJFnDUFgRUQXR8fQ5tKSfJeTe6UAi75eTzzQf7AEc1";
    const TEZOS_GENERIC: &str = "sigbQ5ZNvkjvGssJgoAnUAfY4Wvvg3QZqawBYB1j1VDBNTMBAALnCzRHWzer34bnfmzgHg3EvwdzQKdxgSghB897cono6gbQ";

    #[test]
    fn test_text_round_trip_all_prefixes() {
        for (text, kind) in [
            (EDSIG, SignatureType::Ed25519),
            (SPSIG, SignatureType::Secp256k1),
            (P2SIG, SignatureType::P256),
            (BLSIG, SignatureType::Bls12_381),
            (GENERIC, SignatureType::Generic),
        ] {
            let sig = Signature::parse_text(text).unwrap();
            assert_eq!(sig.kind(), kind, "{text}");
            assert_eq!(sig.as_bytes().len(), kind.len());
            assert_eq!(sig.to_text(), text);
        }
    }

    #[test]
    fn test_known_generic_payload() {
        let sig = Signature::parse_text(TEZOS_GENERIC).unwrap();
        assert_eq!(
            hex::encode(sig.as_bytes()),
            "66804fe735e06e97e26da8236b6341b91c625d5e82b3524ec0a88cc982365e70\
             f8a5b9bc65df2ea6d21ee244cc3a96fb33031c394c78b1179ff1b8a44237740c"
        );
    }

    #[test]
    fn test_generic_conversion_keeps_bytes() {
        let sig = Signature::parse_text(EDSIG).unwrap();
        let generic = sig.to_generic();
        assert_eq!(generic.kind(), SignatureType::Generic);
        assert_eq!(generic.as_bytes(), sig.as_bytes());
        assert!(sig.generic().starts_with("sig"));
        assert_eq!(generic.with_curve(KeyType::Ed25519).unwrap(), sig);

        let bls = Signature::parse_text(BLSIG).unwrap();
        assert_eq!(bls.to_generic().kind(), SignatureType::GenericAggregate);
        assert!(bls.generic().starts_with("asig"));
    }

    #[test]
    fn test_with_curve_rejects_other_curves() {
        let sig = Signature::parse_text(EDSIG).unwrap();
        assert!(sig.with_curve(KeyType::P256).is_err());
        let generic = sig.to_generic();
        assert!(generic.with_curve(KeyType::Bls12_381).is_err());
        assert_eq!(generic.with_curve(KeyType::P256).unwrap().kind(), SignatureType::P256);
    }

    #[test]
    fn test_binary_forms() {
        let sig = Signature::parse_text(P2SIG).unwrap();
        let bin = sig.to_binary();
        assert_eq!(bin.len(), 65);
        assert_eq!(bin[0], 2);
        assert_eq!(Signature::parse_binary(&bin).unwrap(), sig);

        let generic = sig.to_generic();
        assert_eq!(generic.to_binary().len(), 64);
        assert_eq!(Signature::parse_binary(&generic.to_binary()).unwrap(), generic);

        let bls = Signature::parse_text(BLSIG).unwrap();
        let bin = bls.to_binary();
        assert_eq!(bin.len(), 97);
        assert_eq!(bin[0], 3);
        assert_eq!(Signature::parse_binary(&bin).unwrap(), bls);
        assert_eq!(
            Signature::parse_binary(&bin[1..]).unwrap().kind(),
            SignatureType::GenericAggregate
        );
    }

    #[test]
    fn test_binary_rejects_bad_tags_and_lengths() {
        let mut buf = [0u8; 65];
        buf[0] = 3;
        assert!(matches!(
            Signature::parse_binary(&buf),
            Err(EncodingError::UnknownSignatureType(_))
        ));
        buf[0] = 9;
        assert!(Signature::parse_binary(&buf).is_err());
        assert!(Signature::parse_binary(&[0u8; 63]).is_err());
        assert!(!Signature::parse_binary(&[]).unwrap().is_valid());
    }

    #[test]
    fn test_non_signature_text_rejected() {
        let err = Signature::parse_text("tz1XdRrrqrMfsFKA8iuw53xHzug9ipr6MuHq").unwrap_err();
        assert!(matches!(err, EncodingError::UnknownSignatureType(_)));
        assert!(!Signature::parse_text("").unwrap().is_valid());
    }

    #[test]
    fn test_serde_round_trip() {
        let sig = Signature::parse_text(SPSIG).unwrap();
        let json = serde_json::to_string(&sig).unwrap();
        assert_eq!(serde_json::from_str::<Signature>(&json).unwrap(), sig);
    }
}
