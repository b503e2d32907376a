//! # tzkit-crypto: Multi-Curve Keys and Signatures
//!
//! Typed public keys, private keys, and signatures for the four curves
//! tzkit supports:
//!
//! - **Ed25519** via `ed25519-dalek`.
//! - **secp256k1** and **P-256** ECDSA via `k256` / `p256`, with
//!   RFC 6979 deterministic nonces and low-S normalisation.
//! - **BLS12-381** (`min_pk`, proof-of-possession augmented) via `blst`.
//!
//! Secret keys can be stored encrypted under a passphrase
//! (PBKDF2-HMAC-SHA512 into an XSalsa20-Poly1305 secretbox).
//!
//! Every signing operation takes a 32-byte digest. `sign_message` and
//! `verify_message` hash the message with blake2b-256 first.
//!
//! ## Crate Policy
//!
//! - Depends only on `tzkit-core` internally.
//! - No mocking of cryptographic operations in tests; all tests run the
//!   real curve implementations against published key material.
//! - No `unsafe` code.
//! - Secret material is held in `zeroize` buffers and never logged.

mod bls;
mod ecdsa;
mod ed25519;
pub mod encryption;
pub mod key;
pub mod private_key;
pub mod signature;

pub use key::{Key, KeyType};
pub use private_key::{PassphraseFn, PrivateKey};
pub use signature::{Signature, SignatureType};
