//! # ECDSA Backends (secp256k1, P-256)
//!
//! Both curves share one shape: 32-byte secret scalars, 33-byte compressed
//! SEC1 public keys, and 64-byte `r ∥ s` signatures over a caller-supplied
//! digest. The digest is signed as a prehash; no further hashing happens.
//!
//! ## Security Invariant
//!
//! Every signature leaving [`sign`](secp256k1::sign) has `s ≤ n/2`. The
//! high-S twin `(r, n - s)` of a valid signature is never emitted, so one
//! message under one key has exactly one serialized signature.
//!
//! Nonces are derived deterministically (RFC 6979) by the RustCrypto
//! signers.

/// Compressed public key length.
pub const PUBLIC_KEY_LEN: usize = 33;

/// Signature length, `r ∥ s`.
pub const SIGNATURE_LEN: usize = 64;

macro_rules! ecdsa_curve {
    ($module:ident, $krate:ident, $label:literal) => {
        pub(crate) mod $module {
            use ::$krate::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
            use ::$krate::ecdsa::{Signature, SigningKey, VerifyingKey};
            use tzkit_core::CryptoError;
            use zeroize::Zeroizing;

            use super::{PUBLIC_KEY_LEN, SIGNATURE_LEN};

            fn signing_key(secret: &[u8; 32]) -> Result<SigningKey, CryptoError> {
                SigningKey::from_slice(secret).map_err(|_| {
                    CryptoError::InvalidKey(concat!($label, " scalar out of range").into())
                })
            }

            pub(crate) fn public_key(
                secret: &[u8; 32],
            ) -> Result<[u8; PUBLIC_KEY_LEN], CryptoError> {
                let point = signing_key(secret)?.verifying_key().to_encoded_point(true);
                let mut out = [0u8; PUBLIC_KEY_LEN];
                out.copy_from_slice(point.as_bytes());
                Ok(out)
            }

            pub(crate) fn sign(
                secret: &[u8; 32],
                digest: &[u8],
            ) -> Result<[u8; SIGNATURE_LEN], CryptoError> {
                let sig: Signature = signing_key(secret)?
                    .sign_prehash(digest)
                    .map_err(|e| CryptoError::Signing(format!(concat!($label, ": {}"), e)))?;
                let sig = sig.normalize_s().unwrap_or(sig);
                let mut out = [0u8; SIGNATURE_LEN];
                out.copy_from_slice(&sig.to_bytes());
                Ok(out)
            }

            pub(crate) fn verify(
                public: &[u8],
                digest: &[u8],
                signature: &[u8],
            ) -> Result<(), CryptoError> {
                let vk = VerifyingKey::from_sec1_bytes(public).map_err(|_| {
                    CryptoError::InvalidKey(concat!($label, " point does not decompress").into())
                })?;
                let sig =
                    Signature::from_slice(signature).map_err(|_| CryptoError::SignatureMismatch)?;
                vk.verify_prehash(digest, &sig)
                    .map_err(|_| CryptoError::SignatureMismatch)
            }

            pub(crate) fn generate() -> Zeroizing<[u8; 32]> {
                let sk = SigningKey::random(&mut rand::rngs::OsRng);
                let mut out = Zeroizing::new([0u8; 32]);
                out.copy_from_slice(&sk.to_bytes());
                out
            }
        }
    };
}

ecdsa_curve!(secp256k1, k256, "secp256k1");
ecdsa_curve!(nistp256, p256, "P-256");

#[cfg(test)]
mod tests {
    use super::*;

    const SPSK: &str = "3b5925ca5b754a8d2e19763623690a32a549cb31fbeea3415d748106c706266b";
    const P2SK: &str = "3b8aba034de2904874a148e3db465223ae3af75f7226a835c15c63fe536ee6be";

    fn scalar(hex_str: &str) -> [u8; 32] {
        hex::decode(hex_str).unwrap().try_into().unwrap()
    }

    fn is_low_s_k256(sig: &[u8; 64]) -> bool {
        k256::ecdsa::Signature::from_slice(sig)
            .unwrap()
            .normalize_s()
            .is_none()
    }

    fn is_low_s_p256(sig: &[u8; 64]) -> bool {
        p256::ecdsa::Signature::from_slice(sig)
            .unwrap()
            .normalize_s()
            .is_none()
    }

    #[test]
    fn test_public_keys_are_compressed() {
        for pk in [
            secp256k1::public_key(&scalar(SPSK)).unwrap(),
            nistp256::public_key(&scalar(P2SK)).unwrap(),
        ] {
            assert!(pk[0] == 2 || pk[0] == 3);
        }
    }

    #[test]
    fn test_secp256k1_sign_verify_low_s() {
        let sk = scalar(SPSK);
        let pk = secp256k1::public_key(&sk).unwrap();
        for i in 0u8..32 {
            let digest = [i; 32];
            let sig = secp256k1::sign(&sk, &digest).unwrap();
            assert!(is_low_s_k256(&sig));
            secp256k1::verify(&pk, &digest, &sig).unwrap();
        }
    }

    #[test]
    fn test_p256_sign_verify_low_s() {
        let sk = scalar(P2SK);
        let pk = nistp256::public_key(&sk).unwrap();
        for i in 0u8..32 {
            let digest = [i; 32];
            let sig = nistp256::sign(&sk, &digest).unwrap();
            assert!(is_low_s_p256(&sig));
            nistp256::verify(&pk, &digest, &sig).unwrap();
        }
    }

    #[test]
    fn test_signing_is_deterministic() {
        let sk = scalar(P2SK);
        assert_eq!(
            nistp256::sign(&sk, &[7u8; 32]).unwrap(),
            nistp256::sign(&sk, &[7u8; 32]).unwrap()
        );
    }

    #[test]
    fn test_zero_scalar_rejected() {
        assert!(matches!(
            secp256k1::public_key(&[0u8; 32]),
            Err(tzkit_core::CryptoError::InvalidKey(_))
        ));
        assert!(nistp256::public_key(&[0xffu8; 32]).is_err());
    }

    #[test]
    fn test_bad_point_is_invalid_key() {
        let mut pk = [0u8; 33];
        pk[0] = 5;
        assert!(matches!(
            secp256k1::verify(&pk, &[0u8; 32], &[1u8; 64]),
            Err(tzkit_core::CryptoError::InvalidKey(_))
        ));
    }
}
