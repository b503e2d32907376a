//! # Ed25519 Backend
//!
//! Raw ed25519 operations over 32-byte seeds and 32-byte public keys.
//! The typed wrappers in [`crate::key`] and [`crate::private_key`] are the
//! public surface; this module only moves bytes through `ed25519-dalek`.
//!
//! ## Security Invariant
//!
//! `SigningKey` is rebuilt from the seed per call and zeroized on drop by
//! `ed25519-dalek`. Nothing here logs key material.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use tzkit_core::CryptoError;
use zeroize::Zeroizing;

/// Public key length.
pub const PUBLIC_KEY_LEN: usize = 32;

/// Signature length.
pub const SIGNATURE_LEN: usize = 64;

pub(crate) fn public_key(seed: &[u8; 32]) -> [u8; PUBLIC_KEY_LEN] {
    SigningKey::from_bytes(seed).verifying_key().to_bytes()
}

pub(crate) fn sign(seed: &[u8; 32], message: &[u8]) -> [u8; SIGNATURE_LEN] {
    SigningKey::from_bytes(seed).sign(message).to_bytes()
}

pub(crate) fn verify(public: &[u8], message: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
    let public: [u8; PUBLIC_KEY_LEN] = public
        .try_into()
        .map_err(|_| CryptoError::InvalidKey(format!("ed25519 key has {} bytes", public.len())))?;
    let vk = VerifyingKey::from_bytes(&public)
        .map_err(|e| CryptoError::InvalidKey(format!("ed25519 point: {e}")))?;
    let sig = Signature::from_slice(signature).map_err(|_| CryptoError::SignatureMismatch)?;
    vk.verify(message, &sig)
        .map_err(|_| CryptoError::SignatureMismatch)
}

pub(crate) fn generate() -> Zeroizing<[u8; 32]> {
    let mut csprng = rand::rngs::OsRng;
    Zeroizing::new(SigningKey::generate(&mut csprng).to_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = "2d7accf75296d2c94e1fbf812ae26b25560397304a7112241c26ed20b994d219";

    fn seed() -> [u8; 32] {
        hex::decode(SEED).unwrap().try_into().unwrap()
    }

    #[test]
    fn test_sign_and_verify() {
        let seed = seed();
        let sig = sign(&seed, b"digest");
        verify(&public_key(&seed), b"digest", &sig).unwrap();
    }

    #[test]
    fn test_verify_wrong_message_fails() {
        let seed = seed();
        let sig = sign(&seed, b"digest");
        assert!(matches!(
            verify(&public_key(&seed), b"digesT", &sig),
            Err(CryptoError::SignatureMismatch)
        ));
    }

    #[test]
    fn test_short_key_is_invalid_key() {
        assert!(matches!(
            verify(&[1u8; 31], b"m", &[0u8; 64]),
            Err(CryptoError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_generated_seeds_differ() {
        assert_ne!(*generate(), *generate());
    }
}
