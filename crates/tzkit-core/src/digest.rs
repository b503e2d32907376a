//! # Digest Helpers
//!
//! The hash functions the wire format is built on:
//!
//! - **BLAKE2b-160** for public key hashes (the 20-byte payload of `tz*`
//!   addresses).
//! - **Keyed BLAKE2b-160** for address blinding commitments.
//! - **BLAKE2b-256** for message digests before signing and for chain id
//!   derivation.

use blake2::digest::consts::{U20, U32};
use blake2::digest::Mac;
use blake2::{Blake2b, Blake2bMac, Digest};

use crate::error::EncodingError;

/// Largest key BLAKE2b accepts in keyed mode.
pub const BLAKE2B_MAX_KEY_LEN: usize = 64;

/// Unkeyed BLAKE2b with a 20-byte output.
pub fn blake2b_160(data: &[u8]) -> [u8; 20] {
    Blake2b::<U20>::digest(data).into()
}

/// Unkeyed BLAKE2b with a 32-byte output.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    Blake2b::<U32>::digest(data).into()
}

/// BLAKE2b-160 in keyed (MAC) mode.
///
/// The key is mixed into the initial state rather than concatenated with
/// the input, so the result is not extendable without the key.
///
/// # Errors
///
/// Returns `InvalidLength` if `key` is longer than 64 bytes.
pub fn blake2b_160_keyed(key: &[u8], data: &[u8]) -> Result<[u8; 20], EncodingError> {
    let mut mac =
        Blake2bMac::<U20>::new_from_slice(key).map_err(|_| EncodingError::InvalidLength {
            expected: BLAKE2B_MAX_KEY_LEN,
            actual: key.len(),
        })?;
    Mac::update(&mut mac, data);
    Ok(mac.finalize().into_bytes().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blake2b_256_empty_input() {
        assert_eq!(
            hex::encode(blake2b_256(b"")),
            "0e5751c026e543b2e8ab2eb06099daa1d1e5df47778f7787faab45cdf12fe3a8"
        );
    }

    #[test]
    fn blake2b_160_is_deterministic_and_sized() {
        let a = blake2b_160(b"tezos");
        let b = blake2b_160(b"tezos");
        assert_eq!(a, b);
        assert_ne!(a, blake2b_160(b"tezoz"));
    }

    #[test]
    fn keyed_differs_from_unkeyed_and_by_key() {
        let data = [7u8; 20];
        let k1 = blake2b_160_keyed(b"secret-one", &data).unwrap();
        let k2 = blake2b_160_keyed(b"secret-two", &data).unwrap();
        assert_ne!(k1, k2);
        assert_ne!(k1, blake2b_160(&data));
    }

    #[test]
    fn keyed_rejects_oversized_key() {
        let key = [1u8; 65];
        assert_eq!(
            blake2b_160_keyed(&key, b"x"),
            Err(EncodingError::InvalidLength {
                expected: 64,
                actual: 65
            })
        );
    }
}
