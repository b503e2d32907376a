//! # tzkit-core: Identity and Wire-Encoding Primitives
//!
//! The leaf crate of the tzkit workspace. It defines how hashes and
//! addresses look in memory, in the compact tagged binary form, and in the
//! checksummed base58 text form, plus the zarith integer codec.
//!
//! ## Key Design Principles
//!
//! 1. **One registry.** Every base58 prefix, payload length, and text
//!    length lives in [`registry::REGISTRY`]. Typed hashes, addresses, keys
//!    and signatures all consult it; none carries its own constants.
//!
//! 2. **Fixed-size value types.** Hashes and addresses are `Copy` newtypes
//!    over byte arrays. The length is part of the type.
//!
//! 3. **Sentinels are not errors.** Empty text and empty binary input
//!    produce the zero/invalid sentinel so optional fields decode cleanly.
//!
//! 4. **Typed failures.** A bad checksum, an unknown prefix, and a wrong
//!    length are distinct [`EncodingError`] variants.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `tzkit-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests, except the `must_parse`
//!   constructors for literals compiled into the binary.

pub mod address;
pub mod base58;
pub mod digest;
pub mod error;
pub mod hash;
pub mod registry;
pub mod zarith;

// Re-export primary types for ergonomic imports.
pub use address::{Address, AddressType};
pub use digest::{blake2b_160, blake2b_160_keyed, blake2b_256};
pub use error::{CryptoError, EncodingError, TzError};
pub use hash::{
    BlockHash, BlockMetadataHash, ChainIdHash, ContextHash, ExprHash, Hash, NonceHash, OpHash,
    OpListListHash, OpMetadataHash, PayloadHash, ProtocolHash, SmartRollupCommitHash,
    SmartRollupStateHash,
};
pub use registry::HashKind;
pub use zarith::{N, Z};
