//! # Base58Check Codec
//!
//! Encodes `version ∥ payload` in base-58 (Bitcoin alphabet) followed by a
//! 4-byte checksum, the first four bytes of `SHA256(SHA256(version ∥ payload))`.
//! Leading zero bytes become leading `1` digits.
//!
//! The version length is not recoverable from the text, so decoding takes
//! it from the caller (usually from the [`HashKind`](crate::HashKind) being
//! targeted).
//!
//! ## Hot path
//!
//! [`decode_into`] writes into a caller-supplied buffer so that parsing a
//! hash, key, or signature from text performs no heap allocation. A stack
//! array of [`DECODE_BUF_LEN`] bytes fits every registry kind.

use crate::error::EncodingError;

/// Buffer size that fits the longest registry entry (version, payload and
/// checksum of a BLS signature).
pub const DECODE_BUF_LEN: usize = 128;

/// Length of the trailing checksum.
pub const CHECKSUM_LEN: usize = 4;

/// Encode `payload` under `version` as base58check text.
pub fn encode(payload: &[u8], version: &[u8]) -> String {
    let mut buf = Vec::with_capacity(version.len() + payload.len());
    buf.extend_from_slice(version);
    buf.extend_from_slice(payload);
    bs58::encode(buf).with_check().into_string()
}

/// Decode base58check `text` into `buf`, returning `(version, payload)`
/// slices borrowed from `buf`.
///
/// `buf` must have room for version, payload and the 4 checksum bytes.
///
/// # Errors
///
/// - `ChecksumMismatch` when the checksum does not match.
/// - `InvalidBase58` for characters outside the alphabet or when the
///   decoded value does not fit `buf`.
/// - `ShortBuffer` when the decoded value is shorter than `version_len`.
pub fn decode_into<'a>(
    text: &str,
    version_len: usize,
    buf: &'a mut [u8],
) -> Result<(&'a [u8], &'a [u8]), EncodingError> {
    let n = bs58::decode(text)
        .with_check(None)
        .onto(&mut *buf)
        .map_err(map_bs58_error)?;
    if n < version_len {
        return Err(EncodingError::ShortBuffer(format!(
            "base58check payload has {n} bytes, version alone needs {version_len}"
        )));
    }
    let (version, payload) = buf[..n].split_at(version_len);
    Ok((version, payload))
}

/// Decode base58check `text` into owned `(payload, version)` vectors.
///
/// Allocating convenience wrapper around [`decode_into`].
pub fn decode(text: &str, version_len: usize) -> Result<(Vec<u8>, Vec<u8>), EncodingError> {
    let mut buf = [0u8; DECODE_BUF_LEN];
    let (version, payload) = decode_into(text, version_len, &mut buf)?;
    Ok((payload.to_vec(), version.to_vec()))
}

fn map_bs58_error(err: bs58::decode::Error) -> EncodingError {
    match err {
        bs58::decode::Error::InvalidChecksum { .. } => {
            tracing::trace!("base58check checksum mismatch");
            EncodingError::ChecksumMismatch
        }
        bs58::decode::Error::NoChecksum => {
            EncodingError::ShortBuffer("base58check text too short for a checksum".into())
        }
        bs58::decode::Error::BufferTooSmall => {
            EncodingError::InvalidBase58("decoded value exceeds maximum length".into())
        }
        other => EncodingError::InvalidBase58(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TZ1_VERSION: [u8; 3] = [6, 161, 159];

    #[test]
    fn encode_known_address() {
        let hash = hex::decode("83846eddd5d3c5ed96e962506253958649c84a74").unwrap();
        assert_eq!(
            encode(&hash, &TZ1_VERSION),
            "tz1XdRrrqrMfsFKA8iuw53xHzug9ipr6MuHq"
        );
    }

    #[test]
    fn decode_known_address() {
        let (payload, version) = decode("tz1XdRrrqrMfsFKA8iuw53xHzug9ipr6MuHq", 3).unwrap();
        assert_eq!(version, TZ1_VERSION);
        assert_eq!(
            hex::encode(payload),
            "83846eddd5d3c5ed96e962506253958649c84a74"
        );
    }

    #[test]
    fn decode_into_borrows_caller_buffer() {
        let mut buf = [0u8; DECODE_BUF_LEN];
        let (version, payload) =
            decode_into("NetXgtSLGNJvNye", 3, &mut buf).unwrap();
        assert_eq!(version, &[87, 82, 0]);
        assert_eq!(payload, &[0x8e, 0xce, 0xda, 0x2f]);
    }

    #[test]
    fn corrupted_text_is_checksum_mismatch() {
        // last character altered
        let err = decode("tz1XdRrrqrMfsFKA8iuw53xHzug9ipr6MuHr", 3).unwrap_err();
        assert_eq!(err, EncodingError::ChecksumMismatch);
    }

    #[test]
    fn invalid_alphabet_rejected() {
        let err = decode("tz1XdRrrqrMfsFKA8iuw53xHzug9ipr6Mu0l", 3).unwrap_err();
        assert!(matches!(err, EncodingError::InvalidBase58(_)));
    }

    #[test]
    fn too_small_buffer_rejected() {
        let mut buf = [0u8; 8];
        let err = decode_into("tz1XdRrrqrMfsFKA8iuw53xHzug9ipr6MuHq", 3, &mut buf).unwrap_err();
        assert!(matches!(err, EncodingError::InvalidBase58(_)));
    }

    #[test]
    fn version_longer_than_payload_is_short_buffer() {
        let text = encode(&[], &[1, 2]);
        let err = decode(&text, 3).unwrap_err();
        assert!(matches!(err, EncodingError::ShortBuffer(_)));
    }

    #[test]
    fn leading_zero_bytes_become_ones() {
        let text = encode(&[0, 0, 1], &[]);
        assert!(text.starts_with("11"));
        let (payload, _) = decode(&text, 0).unwrap();
        assert_eq!(payload, vec![0, 0, 1]);
    }

    mod proptests {
        use super::super::*;
        use super::TZ1_VERSION;
        use proptest::prelude::*;

        proptest! {
            /// Any single-character substitution is caught.
            #[test]
            fn substitution_never_yields_a_value(
                payload in proptest::collection::vec(any::<u8>(), 20),
                pos in 3usize..36,
                replacement in 0usize..58,
            ) {
                const ALPHABET: &[u8] =
                    b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";
                let text = encode(&payload, &TZ1_VERSION);
                let mut bytes = text.clone().into_bytes();
                let pos = pos % bytes.len();
                prop_assume!(bytes[pos] != ALPHABET[replacement]);
                bytes[pos] = ALPHABET[replacement];
                let mutated = String::from_utf8(bytes).unwrap();
                match decode(&mutated, 3) {
                    Ok((decoded, version)) => {
                        // astronomically unlikely; must at least not equal the original
                        prop_assert!(decoded != payload || version != TZ1_VERSION.to_vec());
                    }
                    Err(e) => prop_assert!(matches!(
                        e,
                        EncodingError::ChecksumMismatch | EncodingError::InvalidBase58(_)
                    )),
                }
            }
        }
    }
}
