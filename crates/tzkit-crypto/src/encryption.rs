//! # Passphrase Encryption of Secret Keys
//!
//! Encrypted secret keys (`edesk…`, `spesk…`, `p2esk…`, `BLesk…`) carry
//! 56 bytes:
//!
//! ```text
//! salt (8) ∥ secretbox( seed-or-scalar (32) )   = 8 + 16 + 32
//! ```
//!
//! The box key is PBKDF2-HMAC-SHA512 over the passphrase and salt with
//! 32768 rounds. The nonce is all zeros; every encryption draws a fresh
//! salt so no key/nonce pair repeats.
//!
//! ## Security Invariant
//!
//! Derived keys and decrypted plaintext live in [`Zeroizing`] buffers and
//! are wiped on drop.

use crypto_secretbox::aead::generic_array::GenericArray;
use crypto_secretbox::aead::{AeadInPlace, KeyInit};
use crypto_secretbox::{Nonce, XSalsa20Poly1305};
use rand::rngs::OsRng;
use rand::RngCore;
use tzkit_core::CryptoError;
use zeroize::Zeroizing;

/// Salt length prepended to every ciphertext.
pub const SALT_LEN: usize = 8;

/// PBKDF2 iteration count.
pub const PBKDF2_ROUNDS: u32 = 32768;

/// Poly1305 tag length.
pub const TAG_LEN: usize = 16;

fn derive_key(passphrase: &[u8], salt: &[u8]) -> Zeroizing<[u8; 32]> {
    let mut key = Zeroizing::new([0u8; 32]);
    pbkdf2::pbkdf2_hmac::<sha2::Sha512>(passphrase, salt, PBKDF2_ROUNDS, &mut key[..]);
    key
}

/// Encrypt `raw` under `passphrase` with a random salt.
pub fn encrypt(raw: &[u8], passphrase: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    encrypt_with_salt(raw, passphrase, salt)
}

/// Encrypt `raw` under `passphrase` with a caller-chosen salt.
///
/// Output is `salt ∥ tag ∥ ciphertext`, the tag ahead of the body as in
/// NaCl's `secretbox`.
pub fn encrypt_with_salt(
    raw: &[u8],
    passphrase: &[u8],
    salt: [u8; SALT_LEN],
) -> Result<Vec<u8>, CryptoError> {
    let key = derive_key(passphrase, &salt);
    let cipher = XSalsa20Poly1305::new_from_slice(&key[..])
        .map_err(|_| CryptoError::Signing("secretbox key setup failed".into()))?;
    let mut body = Zeroizing::new(raw.to_vec());
    let tag = cipher
        .encrypt_in_place_detached(&Nonce::default(), b"", body.as_mut_slice())
        .map_err(|_| CryptoError::Signing("secretbox encryption failed".into()))?;
    let mut out = Vec::with_capacity(SALT_LEN + TAG_LEN + body.len());
    out.extend_from_slice(&salt);
    out.extend_from_slice(&tag);
    out.extend_from_slice(&body);
    Ok(out)
}

/// Decrypt `salt ∥ tag ∥ ciphertext` under `passphrase`.
///
/// # Errors
///
/// `DecryptFailed` for a wrong passphrase, a tampered buffer, or a buffer
/// too short to hold salt and tag.
pub fn decrypt(data: &[u8], passphrase: &[u8]) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    if data.len() < SALT_LEN + TAG_LEN {
        return Err(CryptoError::DecryptFailed);
    }
    let (salt, sealed) = data.split_at(SALT_LEN);
    let (tag, body) = sealed.split_at(TAG_LEN);
    let key = derive_key(passphrase, salt);
    let cipher =
        XSalsa20Poly1305::new_from_slice(&key[..]).map_err(|_| CryptoError::DecryptFailed)?;
    let mut plain = Zeroizing::new(body.to_vec());
    cipher
        .decrypt_in_place_detached(
            &Nonce::default(),
            b"",
            plain.as_mut_slice(),
            GenericArray::from_slice(tag),
        )
        .map_err(|_| CryptoError::DecryptFailed)?;
    Ok(plain)
}
