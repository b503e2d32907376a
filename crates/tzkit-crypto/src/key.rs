//! # Public Keys
//!
//! [`KeyType`] names the four supported curves and maps each to its
//! registry kinds. [`Key`] is a public key of one of those curves.
//!
//! ## Binary form
//!
//! ```text
//! tag (1) ∥ public key (32 | 33 | 33 | 48)
//! ```
//!
//! Tags: ed25519 `0`, secp256k1 `1`, P-256 `2`, BLS12-381 `3`.
//!
//! ## Verification
//!
//! [`Key::verify`] checks a signature over a caller-supplied digest. A
//! generic signature is read as the key's curve. A key that does not
//! decode as a curve point fails with `InvalidKey`; every failure of the
//! signature itself is `SignatureMismatch`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tzkit_core::{
    blake2b_160, blake2b_256, Address, AddressType, CryptoError, EncodingError, HashKind,
};

use crate::signature::Signature;
use crate::{bls, ecdsa, ed25519};

/// Longest public key (BLS12-381).
pub const MAX_PUBLIC_KEY_LEN: usize = 48;

/// A supported curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyType {
    Ed25519,
    Secp256k1,
    P256,
    #[serde(rename = "bls12_381")]
    Bls12_381,
}

impl KeyType {
    /// Every curve in tag order.
    pub const ALL: [KeyType; 4] = [
        KeyType::Ed25519,
        KeyType::Secp256k1,
        KeyType::P256,
        KeyType::Bls12_381,
    ];

    /// Binary tag.
    pub fn tag(self) -> u8 {
        match self {
            Self::Ed25519 => 0,
            Self::Secp256k1 => 1,
            Self::P256 => 2,
            Self::Bls12_381 => 3,
        }
    }

    /// Curve for a binary tag.
    pub fn from_tag(tag: u8) -> Result<Self, EncodingError> {
        match tag {
            0 => Ok(Self::Ed25519),
            1 => Ok(Self::Secp256k1),
            2 => Ok(Self::P256),
            3 => Ok(Self::Bls12_381),
            _ => Err(EncodingError::UnknownKeyType(format!("tag {tag}"))),
        }
    }

    /// Public key length.
    pub fn public_key_len(self) -> usize {
        match self {
            Self::Ed25519 => ed25519::PUBLIC_KEY_LEN,
            Self::Secp256k1 | Self::P256 => ecdsa::PUBLIC_KEY_LEN,
            Self::Bls12_381 => bls::PUBLIC_KEY_LEN,
        }
    }

    /// Registry kind of public keys, `edpk…`, `sppk…`, `p2pk…`, `BLpk…`.
    pub fn public_key_kind(self) -> HashKind {
        match self {
            Self::Ed25519 => HashKind::Ed25519PublicKey,
            Self::Secp256k1 => HashKind::Secp256k1PublicKey,
            Self::P256 => HashKind::P256PublicKey,
            Self::Bls12_381 => HashKind::Bls12_381PublicKey,
        }
    }

    /// Registry kind of plain secret keys. Ed25519 uses the 32-byte seed
    /// form `edsk…` (54 characters).
    pub fn secret_key_kind(self) -> HashKind {
        match self {
            Self::Ed25519 => HashKind::Ed25519Seed,
            Self::Secp256k1 => HashKind::Secp256k1SecretKey,
            Self::P256 => HashKind::P256SecretKey,
            Self::Bls12_381 => HashKind::Bls12_381SecretKey,
        }
    }

    /// Registry kind of passphrase-encrypted secret keys.
    pub fn encrypted_kind(self) -> HashKind {
        match self {
            Self::Ed25519 => HashKind::Ed25519EncryptedSeed,
            Self::Secp256k1 => HashKind::Secp256k1EncryptedSecretKey,
            Self::P256 => HashKind::P256EncryptedSecretKey,
            Self::Bls12_381 => HashKind::Bls12_381EncryptedSecretKey,
        }
    }

    /// Registry kind of signatures made by this curve.
    pub fn signature_kind(self) -> HashKind {
        match self {
            Self::Ed25519 => HashKind::Ed25519Signature,
            Self::Secp256k1 => HashKind::Secp256k1Signature,
            Self::P256 => HashKind::P256Signature,
            Self::Bls12_381 => HashKind::Bls12_381Signature,
        }
    }

    /// Implicit address type of keys on this curve.
    pub fn address_type(self) -> AddressType {
        match self {
            Self::Ed25519 => AddressType::Ed25519,
            Self::Secp256k1 => AddressType::Secp256k1,
            Self::P256 => AddressType::P256,
            Self::Bls12_381 => AddressType::Bls12_381,
        }
    }

    /// Curve of a public key kind.
    pub fn from_public_kind(kind: HashKind) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.public_key_kind() == kind)
    }

    /// Curve of a plain secret key kind. The 64-byte `Ed25519SecretKey`
    /// form also maps to ed25519.
    pub fn from_secret_kind(kind: HashKind) -> Option<Self> {
        if kind == HashKind::Ed25519SecretKey {
            return Some(Self::Ed25519);
        }
        Self::ALL.into_iter().find(|k| k.secret_key_kind() == kind)
    }

    /// Curve of an encrypted secret key kind.
    pub fn from_encrypted_kind(kind: HashKind) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.encrypted_kind() == kind)
    }

    /// Lowercase name, matching the serde form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ed25519 => "ed25519",
            Self::Secp256k1 => "secp256k1",
            Self::P256 => "p256",
            Self::Bls12_381 => "bls12_381",
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyType {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ed25519" | "tz1" => Ok(Self::Ed25519),
            "secp256k1" | "tz2" => Ok(Self::Secp256k1),
            "p256" | "p-256" | "tz3" => Ok(Self::P256),
            "bls12_381" | "bls" | "tz4" => Ok(Self::Bls12_381),
            _ => Err(EncodingError::UnknownKeyType(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// A public key. `kind == None` is the invalid sentinel.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    kind: Option<KeyType>,
    bytes: [u8; MAX_PUBLIC_KEY_LEN],
}

impl Default for Key {
    fn default() -> Self {
        Self::invalid()
    }
}

impl Key {
    /// The invalid sentinel.
    pub const fn invalid() -> Self {
        Self {
            kind: None,
            bytes: [0u8; MAX_PUBLIC_KEY_LEN],
        }
    }

    /// Wrap raw public key bytes. Only the length is checked; point
    /// validity surfaces on [`verify`](Self::verify).
    pub fn from_bytes(kind: KeyType, raw: &[u8]) -> Result<Self, EncodingError> {
        if raw.len() != kind.public_key_len() {
            return Err(EncodingError::InvalidLength {
                expected: kind.public_key_len(),
                actual: raw.len(),
            });
        }
        let mut bytes = [0u8; MAX_PUBLIC_KEY_LEN];
        bytes[..raw.len()].copy_from_slice(raw);
        Ok(Self {
            kind: Some(kind),
            bytes,
        })
    }

    /// Curve, or `None` for the sentinel.
    pub fn kind(&self) -> Option<KeyType> {
        self.kind
    }

    /// True unless this is the sentinel.
    pub fn is_valid(&self) -> bool {
        self.kind.is_some()
    }

    /// Raw public key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        match self.kind {
            Some(kind) => &self.bytes[..kind.public_key_len()],
            None => &[],
        }
    }

    /// Parse `edpk…`, `sppk…`, `p2pk…` or `BLpk…` text.
    ///
    /// Empty text yields the invalid sentinel.
    ///
    /// # Errors
    ///
    /// `UnknownKeyType` for text of another kind, plus the registry's
    /// decoding errors.
    pub fn parse_text(text: &str) -> Result<Self, EncodingError> {
        if text.is_empty() {
            return Ok(Self::invalid());
        }
        let hash_kind = HashKind::detect(text)?;
        let kind = KeyType::from_public_kind(hash_kind)
            .ok_or_else(|| EncodingError::UnknownKeyType(text.to_string()))?;
        let mut bytes = [0u8; MAX_PUBLIC_KEY_LEN];
        hash_kind.decode_text(text, &mut bytes[..kind.public_key_len()])?;
        Ok(Self {
            kind: Some(kind),
            bytes,
        })
    }

    /// Base58check text; empty for the sentinel.
    pub fn to_text(&self) -> String {
        match self.kind {
            Some(kind) => kind
                .public_key_kind()
                .encode_text(self.as_bytes())
                .unwrap_or_default(),
            None => String::new(),
        }
    }

    /// `tag ∥ raw`; empty for the sentinel.
    pub fn to_binary(&self) -> Vec<u8> {
        match self.kind {
            Some(kind) => {
                let mut out = Vec::with_capacity(1 + kind.public_key_len());
                out.push(kind.tag());
                out.extend_from_slice(self.as_bytes());
                out
            }
            None => Vec::new(),
        }
    }

    /// Decode `tag ∥ raw`. The buffer must hold exactly one key.
    pub fn parse_binary(buf: &[u8]) -> Result<Self, EncodingError> {
        let (&tag, raw) = buf
            .split_first()
            .ok_or_else(|| EncodingError::UnknownKeyType("empty key buffer".into()))?;
        let kind = KeyType::from_tag(tag)?;
        Self::from_bytes(kind, raw)
    }

    /// Implicit account address: blake2b-160 of the raw key.
    pub fn address(&self) -> Address {
        match self.kind {
            Some(kind) => Address::from_key_hash(kind.address_type(), blake2b_160(self.as_bytes())),
            None => Address::invalid(),
        }
    }

    /// Verify `signature` over `digest`.
    ///
    /// # Errors
    ///
    /// - `InvalidKey` for the sentinel or a key that is not a curve point.
    /// - `InvalidSignature` when the signature names another curve or has
    ///   the wrong length for this one.
    /// - `SignatureMismatch` when the signature does not verify.
    pub fn verify(&self, digest: &[u8], signature: &Signature) -> Result<(), CryptoError> {
        let kind = self
            .kind
            .ok_or_else(|| CryptoError::InvalidKey("invalid key".into()))?;
        let signature = signature
            .with_curve(kind)
            .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
        let public = self.as_bytes();
        let sig = signature.as_bytes();
        let result = match kind {
            KeyType::Ed25519 => ed25519::verify(public, digest, sig),
            KeyType::Secp256k1 => ecdsa::secp256k1::verify(public, digest, sig),
            KeyType::P256 => ecdsa::nistp256::verify(public, digest, sig),
            KeyType::Bls12_381 => bls::verify(public, digest, sig),
        };
        if let Err(ref err) = result {
            tracing::debug!(curve = %kind, error = %err, "signature verification failed");
        }
        result
    }

    /// Verify `signature` over `blake2b_256(message)`.
    pub fn verify_message(&self, message: &[u8], signature: &Signature) -> Result<(), CryptoError> {
        self.verify(&blake2b_256(message), signature)
    }
}

impl FromStr for Key {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_text(s)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            Some(_) => write!(f, "Key({})", self.to_text()),
            None => f.write_str("Key(invalid)"),
        }
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_text())
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse_text(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EDPK: &str = "edpkuSLWfVU1Vq7Jg9FucPyKmma6otcMHac9zG4oU1KMHSTBpJuGQ2";
    const SPPK: &str = "sppk7a2WEfU54QzcQZ2EMjihtcxLeRtNTVxHw4FW2e8W5kEJ8ZargSb";
    const P2PK: &str = "p2pk65WTDbmZz5VVUfokrfM3SN7DpbmyujdFyFmWwiVB98bicDPEcG9";

    #[test]
    fn test_tag_round_trip() {
        for kind in KeyType::ALL {
            assert_eq!(KeyType::from_tag(kind.tag()).unwrap(), kind);
            assert_eq!(KeyType::from_public_kind(kind.public_key_kind()), Some(kind));
            assert_eq!(KeyType::from_secret_kind(kind.secret_key_kind()), Some(kind));
            assert_eq!(KeyType::from_encrypted_kind(kind.encrypted_kind()), Some(kind));
            assert_eq!(kind.as_str().parse::<KeyType>().unwrap(), kind);
        }
        assert!(matches!(KeyType::from_tag(4), Err(EncodingError::UnknownKeyType(_))));
        assert!(matches!(KeyType::from_tag(255), Err(EncodingError::UnknownKeyType(_))));
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&KeyType::Bls12_381).unwrap(), "\"bls12_381\"");
        assert_eq!(serde_json::to_string(&KeyType::P256).unwrap(), "\"p256\"");
    }

    #[test]
    fn test_text_and_address() {
        for (text, kind, addr) in [
            (EDPK, KeyType::Ed25519, "tz1TGu6TN5GSez2ndXXeDX6LgUDvLzPLqgYV"),
            (SPPK, KeyType::Secp256k1, "tz2DzfieD6mjjYYFqbGwotsW5ivfRogQE6c4"),
            (P2PK, KeyType::P256, "tz3Z1Jtn21AkvYoPdmGv9HLpHqatR5YvnoJx"),
        ] {
            let key = Key::parse_text(text).unwrap();
            assert_eq!(key.kind(), Some(kind));
            assert_eq!(key.to_text(), text);
            assert_eq!(key.address().to_text(), addr);
        }
    }

    #[test]
    fn test_binary_round_trip() {
        let key = Key::parse_text(SPPK).unwrap();
        let bin = key.to_binary();
        assert_eq!(bin.len(), 34);
        assert_eq!(bin[0], 1);
        assert_eq!(Key::parse_binary(&bin).unwrap(), key);
    }

    #[test]
    fn test_binary_rejects_bad_input() {
        assert!(Key::parse_binary(&[]).is_err());
        assert!(matches!(
            Key::parse_binary(&[7u8; 33]),
            Err(EncodingError::UnknownKeyType(_))
        ));
        let mut bin = Key::parse_text(EDPK).unwrap().to_binary();
        bin.push(0);
        assert!(matches!(
            Key::parse_binary(&bin),
            Err(EncodingError::InvalidLength { expected: 32, actual: 33 })
        ));
    }

    #[test]
    fn test_empty_text_is_invalid_sentinel() {
        let key = Key::parse_text("").unwrap();
        assert!(!key.is_valid());
        assert_eq!(key, Key::invalid());
        assert_eq!(key.to_text(), "");
    }

    #[test]
    fn test_serde_empty_string_is_invalid_sentinel() {
        let key: Key = serde_json::from_str("\"\"").unwrap();
        assert!(!key.is_valid());
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"\"");
    }

    #[test]
    fn test_non_key_text_rejected() {
        assert!(matches!(
            Key::parse_text("tz1TGu6TN5GSez2ndXXeDX6LgUDvLzPLqgYV"),
            Err(EncodingError::UnknownKeyType(_))
        ));
    }

    #[test]
    fn test_sentinel() {
        let key = Key::invalid();
        assert!(!key.is_valid());
        assert_eq!(key.to_text(), "");
        assert!(key.to_binary().is_empty());
        assert!(!key.address().is_valid());
        assert!(matches!(
            key.verify(&[0u8; 32], &Signature::invalid()),
            Err(CryptoError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_known_ed25519_vector() {
        let key = Key::parse_text("edpkuAwxKwdJK9r9Ersa185YqxPBNNZc6iFKCn8ifibHiPhztvf2NZ").unwrap();
        let sig = Signature::parse_text(
            "sigsZwFnCnHBdmBcD763TUFZL5wCLXBDmAwPMyGY5edWe1B8XQQBv4X83RHkkrScVkAEKmU3CYg3cLH8Gja24LfDRyR23raX",
        )
        .unwrap();
        let message = hex::decode(
            "b718d2420ad9498466bbfddf864f02f8a9a526a8585cf2e38ffac60e7a86f022\
             cb0242acd44d3628255bf4b90d0737911193bf2e98064b9b237017d9b0b5fb53\
             af478196f6bc99e43e7009e6",
        )
        .unwrap();
        key.verify_message(&message, &sig).unwrap();
    }

    #[test]
    fn test_known_p256_vector() {
        let key = Key::parse_text("p2pk65p7HKSGvkMdeK5yckM2nmi59oGNw4ksqdcvwxxF3AV3hopkfGS").unwrap();
        let sig = Signature::parse_text(
            "p2sigefoF8vJvSshWmLL6NyX6QnQUyUhq76r3F3ST6mTNqeCFzosDQyaRanoZpm14eeakZhAJ3LdGHFE4z9cPv9yTWFqWM4j9A",
        )
        .unwrap();
        key.verify_message(b"hello, message", &sig).unwrap();
        assert!(matches!(
            key.verify_message(b"hello, massage", &sig),
            Err(CryptoError::SignatureMismatch)
        ));
    }

    #[test]
    fn test_curve_mismatch_is_invalid_signature() {
        let key = Key::parse_text(EDPK).unwrap();
        let sig = Signature::parse_text(
            "p2sigefoF8vJvSshWmLL6NyX6QnQUyUhq76r3F3ST6mTNqeCFzosDQyaRanoZpm14eeakZhAJ3LdGHFE4z9cPv9yTWFqWM4j9A",
        )
        .unwrap();
        assert!(matches!(
            key.verify(&[0u8; 32], &sig),
            Err(CryptoError::InvalidSignature(_))
        ));
    }
}
