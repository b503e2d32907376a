//! # BLS12-381 Backend
//!
//! `min_pk` variant: 48-byte compressed G1 public keys, 96-byte compressed
//! G2 signatures. Signing uses the message-augmentation scheme, where the
//! signer's compressed public key is prepended to the message before
//! hashing to the curve.
//!
//! Secret scalars are stored little-endian, which is the byte order of the
//! external `BLsk` text form; `blst` wants big-endian, so bytes are reversed
//! at this boundary and nowhere else.
//!
//! Aggregation is not provided.

use blst::min_pk::{PublicKey, SecretKey, Signature};
use blst::BLST_ERROR;
use rand::RngCore;
use tzkit_core::CryptoError;
use zeroize::Zeroizing;

/// Domain separation tag for the augmented signature scheme.
pub const DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_AUG_";

/// Compressed public key length.
pub const PUBLIC_KEY_LEN: usize = 48;

/// Compressed signature length.
pub const SIGNATURE_LEN: usize = 96;

fn secret_key(secret: &[u8; 32]) -> Result<SecretKey, CryptoError> {
    let mut be = Zeroizing::new(*secret);
    be.reverse();
    SecretKey::from_bytes(&be[..])
        .map_err(|e| CryptoError::InvalidKey(format!("BLS12-381 scalar: {e:?}")))
}

pub(crate) fn public_key(secret: &[u8; 32]) -> Result<[u8; PUBLIC_KEY_LEN], CryptoError> {
    Ok(secret_key(secret)?.sk_to_pk().compress())
}

pub(crate) fn sign(secret: &[u8; 32], message: &[u8]) -> Result<[u8; SIGNATURE_LEN], CryptoError> {
    let sk = secret_key(secret)?;
    let aug = sk.sk_to_pk().compress();
    Ok(sk.sign(message, DST, &aug).compress())
}

pub(crate) fn verify(public: &[u8], message: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
    let pk = PublicKey::key_validate(public)
        .map_err(|e| CryptoError::InvalidKey(format!("BLS12-381 point: {e:?}")))?;
    let sig = Signature::from_bytes(signature).map_err(|_| CryptoError::SignatureMismatch)?;
    match sig.verify(true, message, DST, public, &pk, false) {
        BLST_ERROR::BLST_SUCCESS => Ok(()),
        err => {
            tracing::debug!(?err, "BLS12-381 verification rejected");
            Err(CryptoError::SignatureMismatch)
        }
    }
}

pub(crate) fn generate() -> Result<Zeroizing<[u8; 32]>, CryptoError> {
    let mut ikm = Zeroizing::new([0u8; 32]);
    rand::rngs::OsRng.fill_bytes(&mut ikm[..]);
    let sk = SecretKey::key_gen(&ikm[..], &[])
        .map_err(|e| CryptoError::InvalidKey(format!("BLS12-381 key generation: {e:?}")))?;
    let mut le = Zeroizing::new(sk.to_bytes());
    le.reverse();
    Ok(le)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLSK: &str = "0141af2bc5ab49a6b62ac0181b0cea4c4c5e19c13467e3660e0d6c57451b0243";

    fn scalar() -> [u8; 32] {
        hex::decode(BLSK).unwrap().try_into().unwrap()
    }

    #[test]
    fn test_sign_and_verify() {
        let sk = scalar();
        let pk = public_key(&sk).unwrap();
        let sig = sign(&sk, b"message").unwrap();
        verify(&pk, b"message", &sig).unwrap();
    }

    #[test]
    fn test_wrong_message_is_mismatch() {
        let sk = scalar();
        let pk = public_key(&sk).unwrap();
        let sig = sign(&sk, b"message").unwrap();
        assert!(matches!(
            verify(&pk, b"massage", &sig),
            Err(CryptoError::SignatureMismatch)
        ));
    }

    #[test]
    fn test_byte_order_matters() {
        let sk = scalar();
        let mut reversed = sk;
        reversed.reverse();
        assert_ne!(public_key(&sk).unwrap(), public_key(&reversed).unwrap());
    }

    #[test]
    fn test_generated_key_round_trips() {
        let sk = generate().unwrap();
        let pk = public_key(&sk).unwrap();
        let sig = sign(&sk, b"x").unwrap();
        verify(&pk, b"x", &sig).unwrap();
    }

    #[test]
    fn test_zero_scalar_rejected() {
        assert!(public_key(&[0u8; 32]).is_err());
    }
}
