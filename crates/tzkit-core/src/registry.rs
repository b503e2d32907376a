//! # Hash-Kind Registry: Single Source of Truth
//!
//! Defines the `HashKind` enum and the constant table that maps every kind
//! to its base58check version bytes, raw payload length, and text length.
//! This is the ONE definition used by typed hashes, addresses, keys, and
//! signatures.
//!
//! ## Invariants
//!
//! - The table is a static array indexed by `HashKind as usize`; it is
//!   never mutated and needs no initialization barrier.
//! - `raw_len` and `text_len` are fixed per kind, never computed from data.
//! - No two kinds share a text length with one text prefix being a prefix
//!   of the other, so [`HashKind::detect`] is unambiguous.
//!
//! The version bytes reproduce the external chain's base58 prefixes
//! bit-for-bit; changing any row breaks interoperability.

use crate::base58::{self, DECODE_BUF_LEN};
use crate::error::EncodingError;

/// Every semantic kind of base58check-encoded value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HashKind {
    /// Chain id, `Net…` (4 bytes).
    ChainId,
    /// Block hash, `B…`.
    Block,
    /// Protocol hash, `P…`.
    Protocol,
    /// Operation hash, `o…`.
    Operation,
    /// Operation list hash, `Lo…`.
    OperationList,
    /// Operation list list hash, `LLo…`.
    OperationListList,
    /// Context hash, `Co…`.
    Context,
    /// Block metadata hash, `bm…`.
    BlockMetadata,
    /// Operation metadata hash, `r…`.
    OperationMetadata,
    /// Operation metadata list hash, `Lr…`.
    OperationMetadataList,
    /// Operation metadata list list hash, `LLr…`.
    OperationMetadataListList,
    /// Block payload hash, `vh…`.
    BlockPayload,
    /// Cycle nonce hash, `nce…`.
    Nonce,
    /// Script expression hash, `expr…`.
    ScriptExpr,
    /// Cryptobox public key hash, `id…` (16 bytes).
    CryptoboxPublicKeyHash,
    /// Smart rollup commitment hash, `src1…`.
    SmartRollupCommitment,
    /// Smart rollup state hash, `srs1…`.
    SmartRollupState,
    /// Tx rollup inbox hash, `txi…`.
    TxRollupInbox,
    /// Tx rollup message hash, `txm…`.
    TxRollupMessage,
    /// Tx rollup commitment hash, `txc…`.
    TxRollupCommitment,
    /// Tx rollup message result hash, `txmr…`.
    TxRollupMessageResult,
    /// Tx rollup message result list hash, `txM…`.
    TxRollupMessageResultList,
    /// Tx rollup withdraw list hash, `txw…`.
    TxRollupWithdrawList,
    /// Ed25519 public key hash, `tz1…`.
    Ed25519PublicKeyHash,
    /// Secp256k1 public key hash, `tz2…`.
    Secp256k1PublicKeyHash,
    /// P-256 public key hash, `tz3…`.
    P256PublicKeyHash,
    /// BLS12-381 public key hash, `tz4…`.
    Bls12_381PublicKeyHash,
    /// Originated contract hash, `KT1…`.
    ContractHash,
    /// Blinded public key hash, `btz1…`.
    BlindedPublicKeyHash,
    /// Tx rollup address, `txr1…`.
    TxRollupAddress,
    /// Smart rollup address, `sr1…`.
    SmartRollupAddress,
    /// Ed25519 public key, `edpk…`.
    Ed25519PublicKey,
    /// Secp256k1 compressed public key, `sppk…`.
    Secp256k1PublicKey,
    /// P-256 compressed public key, `p2pk…`.
    P256PublicKey,
    /// BLS12-381 compressed G1 public key, `BLpk…`.
    Bls12_381PublicKey,
    /// Ed25519 seed, `edsk…` (54 chars).
    Ed25519Seed,
    /// Ed25519 seed ∥ public key, `edsk…` (98 chars).
    Ed25519SecretKey,
    /// Secp256k1 secret scalar, `spsk…`.
    Secp256k1SecretKey,
    /// P-256 secret scalar, `p2sk…`.
    P256SecretKey,
    /// BLS12-381 secret scalar, `BLsk…`.
    Bls12_381SecretKey,
    /// Encrypted Ed25519 seed, `edesk…`.
    Ed25519EncryptedSeed,
    /// Encrypted secp256k1 scalar, `spesk…`.
    Secp256k1EncryptedSecretKey,
    /// Encrypted P-256 scalar, `p2esk…`.
    P256EncryptedSecretKey,
    /// Encrypted BLS12-381 scalar, `BLesk…`.
    Bls12_381EncryptedSecretKey,
    /// Ed25519 signature, `edsig…`.
    Ed25519Signature,
    /// Secp256k1 signature, `spsig1…`.
    Secp256k1Signature,
    /// P-256 signature, `p2sig…`.
    P256Signature,
    /// BLS12-381 signature, `BLsig…`.
    Bls12_381Signature,
    /// Curve-erased 64-byte signature, `sig…`.
    GenericSignature,
    /// Curve-erased 96-byte aggregate signature, `asig…`.
    GenericAggregateSignature,
}

/// One registry row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashKindInfo {
    /// The kind this row describes.
    pub kind: HashKind,
    /// Base58check version bytes.
    pub version: &'static [u8],
    /// Raw payload length in bytes.
    pub raw_len: usize,
    /// Length of the base58check text.
    pub text_len: usize,
    /// Human-readable text prefix.
    pub text_prefix: &'static str,
}

/// Total number of registry entries.
pub const HASH_KIND_COUNT: usize = 50;

const fn row(
    kind: HashKind,
    version: &'static [u8],
    raw_len: usize,
    text_len: usize,
    text_prefix: &'static str,
) -> HashKindInfo {
    HashKindInfo {
        kind,
        version,
        raw_len,
        text_len,
        text_prefix,
    }
}

/// The registry, indexed by `HashKind as usize`.
pub static REGISTRY: [HashKindInfo; HASH_KIND_COUNT] = {
    use HashKind::*;
    [
        row(ChainId, &[87, 82, 0], 4, 15, "Net"),
        row(Block, &[1, 52], 32, 51, "B"),
        row(Protocol, &[2, 170], 32, 51, "P"),
        row(Operation, &[5, 116], 32, 51, "o"),
        row(OperationList, &[133, 233], 32, 52, "Lo"),
        row(OperationListList, &[29, 159, 109], 32, 53, "LLo"),
        row(Context, &[79, 199], 32, 52, "Co"),
        row(BlockMetadata, &[234, 249], 32, 52, "bm"),
        row(OperationMetadata, &[5, 183], 32, 51, "r"),
        row(OperationMetadataList, &[134, 39], 32, 52, "Lr"),
        row(OperationMetadataListList, &[29, 159, 182], 32, 53, "LLr"),
        row(BlockPayload, &[1, 106, 242], 32, 52, "vh"),
        row(Nonce, &[69, 220, 169], 32, 53, "nce"),
        row(ScriptExpr, &[13, 44, 64, 27], 32, 54, "expr"),
        row(CryptoboxPublicKeyHash, &[153, 103], 16, 30, "id"),
        row(SmartRollupCommitment, &[17, 165, 134, 138], 32, 54, "src1"),
        row(SmartRollupState, &[17, 165, 235, 240], 32, 54, "srs1"),
        row(TxRollupInbox, &[79, 148, 196], 32, 53, "txi"),
        row(TxRollupMessage, &[79, 149, 30], 32, 53, "txm"),
        row(TxRollupCommitment, &[79, 148, 17], 32, 53, "txc"),
        row(TxRollupMessageResult, &[18, 7, 206, 87], 32, 54, "txmr"),
        row(TxRollupMessageResultList, &[79, 146, 82], 32, 53, "txM"),
        row(TxRollupWithdrawList, &[79, 150, 72], 32, 53, "txw"),
        row(Ed25519PublicKeyHash, &[6, 161, 159], 20, 36, "tz1"),
        row(Secp256k1PublicKeyHash, &[6, 161, 161], 20, 36, "tz2"),
        row(P256PublicKeyHash, &[6, 161, 164], 20, 36, "tz3"),
        row(Bls12_381PublicKeyHash, &[6, 161, 166], 20, 36, "tz4"),
        row(ContractHash, &[2, 90, 121], 20, 36, "KT1"),
        row(BlindedPublicKeyHash, &[1, 2, 49, 223], 20, 37, "btz1"),
        row(TxRollupAddress, &[1, 128, 120, 31], 20, 37, "txr1"),
        row(SmartRollupAddress, &[6, 124, 117], 20, 36, "sr1"),
        row(Ed25519PublicKey, &[13, 15, 37, 217], 32, 54, "edpk"),
        row(Secp256k1PublicKey, &[3, 254, 226, 86], 33, 55, "sppk"),
        row(P256PublicKey, &[3, 178, 139, 127], 33, 55, "p2pk"),
        row(Bls12_381PublicKey, &[6, 149, 135, 204], 48, 76, "BLpk"),
        row(Ed25519Seed, &[13, 15, 58, 7], 32, 54, "edsk"),
        row(Ed25519SecretKey, &[43, 246, 78, 7], 64, 98, "edsk"),
        row(Secp256k1SecretKey, &[17, 162, 224, 201], 32, 54, "spsk"),
        row(P256SecretKey, &[16, 81, 238, 189], 32, 54, "p2sk"),
        row(Bls12_381SecretKey, &[3, 150, 192, 40], 32, 54, "BLsk"),
        row(Ed25519EncryptedSeed, &[7, 90, 60, 179, 41], 56, 88, "edesk"),
        row(Secp256k1EncryptedSecretKey, &[9, 237, 241, 174, 150], 56, 88, "spesk"),
        row(P256EncryptedSecretKey, &[9, 48, 57, 115, 171], 56, 88, "p2esk"),
        row(Bls12_381EncryptedSecretKey, &[2, 5, 30, 53, 25], 56, 88, "BLesk"),
        row(Ed25519Signature, &[9, 245, 205, 134, 18], 64, 99, "edsig"),
        row(Secp256k1Signature, &[13, 115, 101, 19, 63], 64, 99, "spsig1"),
        row(P256Signature, &[54, 240, 44, 52], 64, 98, "p2sig"),
        row(Bls12_381Signature, &[40, 171, 64, 207], 96, 142, "BLsig"),
        row(GenericSignature, &[4, 130, 43], 64, 96, "sig"),
        row(GenericAggregateSignature, &[2, 75, 234, 101], 96, 141, "asig"),
    ]
};

impl HashKind {
    /// The registry row for this kind.
    #[inline]
    pub fn info(self) -> &'static HashKindInfo {
        &REGISTRY[self as usize]
    }

    /// Base58check version bytes.
    #[inline]
    pub fn version(self) -> &'static [u8] {
        self.info().version
    }

    /// Raw payload length in bytes.
    #[inline]
    pub fn raw_len(self) -> usize {
        self.info().raw_len
    }

    /// Base58check text length.
    #[inline]
    pub fn text_len(self) -> usize {
        self.info().text_len
    }

    /// Human-readable text prefix, e.g. `"tz1"`.
    #[inline]
    pub fn text_prefix(self) -> &'static str {
        self.info().text_prefix
    }

    /// All kinds in registry order.
    pub fn all() -> impl Iterator<Item = HashKind> {
        REGISTRY.iter().map(|info| info.kind)
    }

    /// Identify the kind of base58check `text` by exact length, then prefix.
    ///
    /// Only inspects the text; the checksum is verified on decode.
    pub fn detect(text: &str) -> Result<HashKind, EncodingError> {
        REGISTRY
            .iter()
            .find(|info| info.text_len == text.len() && text.starts_with(info.text_prefix))
            .map(|info| info.kind)
            .ok_or_else(|| {
                tracing::trace!(len = text.len(), "no registry entry matches text");
                EncodingError::UnknownHashType(text.to_string())
            })
    }

    /// Look up the kind whose text prefix equals `prefix` exactly.
    ///
    /// `edsk` resolves to the 32-byte seed form.
    pub fn from_prefix(prefix: &str) -> Option<HashKind> {
        REGISTRY
            .iter()
            .find(|info| info.text_prefix == prefix)
            .map(|info| info.kind)
    }

    /// Base58check-encode `bytes` under this kind's version.
    ///
    /// # Errors
    ///
    /// Returns `InvalidLength` unless `bytes.len() == self.raw_len()`.
    pub fn encode_text(self, bytes: &[u8]) -> Result<String, EncodingError> {
        if bytes.len() != self.raw_len() {
            return Err(EncodingError::InvalidLength {
                expected: self.raw_len(),
                actual: bytes.len(),
            });
        }
        Ok(base58::encode(bytes, self.version()))
    }

    /// Decode base58check `text` of this kind into `dest`.
    ///
    /// `dest` must be exactly `raw_len` bytes long. Decoding happens in a
    /// stack buffer; nothing is allocated on success.
    ///
    /// # Errors
    ///
    /// - `UnknownHashType` if no registry kind matches the text shape.
    /// - `ChecksumMismatch` / `InvalidBase58` from the base58 layer.
    /// - `InvalidPrefix` if the decoded version bytes differ from this kind's.
    /// - `InvalidLength` if the payload is not `raw_len` bytes.
    pub fn decode_text(self, text: &str, dest: &mut [u8]) -> Result<(), EncodingError> {
        if dest.len() != self.raw_len() {
            return Err(EncodingError::InvalidLength {
                expected: self.raw_len(),
                actual: dest.len(),
            });
        }
        HashKind::detect(text)?;
        let mut buf = [0u8; DECODE_BUF_LEN];
        let (version, payload) = base58::decode_into(text, self.version().len(), &mut buf)?;
        if version != self.version() {
            return Err(EncodingError::invalid_prefix(self.version(), version));
        }
        if payload.len() != self.raw_len() {
            return Err(EncodingError::InvalidLength {
                expected: self.raw_len(),
                actual: payload.len(),
            });
        }
        dest.copy_from_slice(payload);
        Ok(())
    }
}

impl std::fmt::Display for HashKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}
