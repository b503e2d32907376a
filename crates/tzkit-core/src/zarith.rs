//! # Zarith Integers
//!
//! Arbitrary-precision signed (`Z`) and unsigned (`N`) integers with the
//! continuation-bit wire encoding.
//!
//! ## Layout
//!
//! Little-endian groups, high bit of every byte is the continuation flag.
//!
//! ```text
//! N:            byte 0..k   [c | 7 data bits]
//! Z:            byte 0      [c | sign | 6 data bits]
//!               byte 1..k   [c | 7 data bits]
//! ```
//!
//! The sign of `Z` lives in the first byte, so the encoder needs both the
//! sign and the magnitude before it writes anything. Values are backed by
//! `num` bignums and never overflow.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use num::bigint::{BigInt, BigUint, Sign};
use num::{Signed, ToPrimitive, Zero};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::EncodingError;

const CONTINUATION: u8 = 0x80;
const Z_SIGN: u8 = 0x40;
const Z_FIRST_MASK: u8 = 0x3f;
const DATA_MASK: u8 = 0x7f;

fn low_bits(n: &BigUint, mask: u8) -> u8 {
    (n.iter_u64_digits().next().unwrap_or(0) as u8) & mask
}

fn write_groups(mut mag: BigUint, out: &mut Vec<u8>) {
    while !mag.is_zero() {
        let mut byte = low_bits(&mag, DATA_MASK);
        mag >>= 7usize;
        if !mag.is_zero() {
            byte |= CONTINUATION;
        }
        out.push(byte);
    }
}

fn truncated(read: usize) -> EncodingError {
    tracing::trace!(read, "zarith stream ended inside a number");
    EncodingError::ShortBuffer(format!("zarith number unterminated after {read} bytes"))
}

fn reject_trailing(consumed: usize, len: usize) -> Result<(), EncodingError> {
    if consumed == len {
        Ok(())
    } else {
        Err(EncodingError::InvalidLength {
            expected: consumed,
            actual: len,
        })
    }
}

// ---------------------------------------------------------------------------
// Z
// ---------------------------------------------------------------------------

/// Signed arbitrary-precision integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Z(BigInt);

impl Z {
    /// Zero.
    pub fn zero() -> Self {
        Self(BigInt::zero())
    }

    /// Wrap a bignum.
    pub fn from_bigint(n: BigInt) -> Self {
        Self(n)
    }

    /// Borrow the bignum.
    pub fn as_bigint(&self) -> &BigInt {
        &self.0
    }

    /// True for zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// True for values below zero.
    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    /// Absolute value.
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Quotient truncated toward zero, `None` when `rhs` is zero.
    pub fn checked_div(&self, rhs: &Z) -> Option<Z> {
        if rhs.is_zero() {
            None
        } else {
            Some(Self(&self.0 / &rhs.0))
        }
    }

    /// Value as `i64` if it fits.
    pub fn to_i64(&self) -> Option<i64> {
        self.0.to_i64()
    }

    /// Value as `N` if non-negative.
    pub fn to_n(&self) -> Option<N> {
        self.0.to_biguint().map(N)
    }

    /// Append the wire encoding to `out`.
    pub fn encode_buffer(&self, out: &mut Vec<u8>) {
        let mag = self.0.magnitude().clone();
        let mut first = low_bits(&mag, Z_FIRST_MASK);
        if self.0.sign() == Sign::Minus {
            first |= Z_SIGN;
        }
        let rest = mag >> 6usize;
        if !rest.is_zero() {
            first |= CONTINUATION;
        }
        out.push(first);
        write_groups(rest, out);
    }

    /// Decode one number from the front of `buf`, returning it with the
    /// number of bytes consumed.
    ///
    /// # Errors
    ///
    /// `ShortBuffer` when `buf` ends before a byte without the continuation
    /// flag.
    pub fn decode_buffer(buf: &[u8]) -> Result<(Self, usize), EncodingError> {
        let mut mag = BigUint::zero();
        let mut negative = false;
        let mut shift = 0usize;
        for (i, &byte) in buf.iter().enumerate() {
            let bits = if i == 0 {
                negative = byte & Z_SIGN != 0;
                byte & Z_FIRST_MASK
            } else {
                byte & DATA_MASK
            };
            if bits != 0 {
                mag |= BigUint::from(bits) << shift;
            }
            shift += if i == 0 { 6 } else { 7 };
            if byte & CONTINUATION == 0 {
                let sign = if negative { Sign::Minus } else { Sign::Plus };
                return Ok((Self(BigInt::from_biguint(sign, mag)), i + 1));
            }
        }
        Err(truncated(buf.len()))
    }

    /// Wire encoding as an owned vector.
    pub fn to_binary(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode_buffer(&mut out);
        out
    }

    /// Decode a buffer holding exactly one number.
    pub fn parse_binary(buf: &[u8]) -> Result<Self, EncodingError> {
        let (z, consumed) = Self::decode_buffer(buf)?;
        reject_trailing(consumed, buf.len())?;
        Ok(z)
    }
}

impl From<i64> for Z {
    fn from(n: i64) -> Self {
        Self(BigInt::from(n))
    }
}

impl From<BigInt> for Z {
    fn from(n: BigInt) -> Self {
        Self(n)
    }
}

impl From<N> for Z {
    fn from(n: N) -> Self {
        n.to_z()
    }
}

impl Add for Z {
    type Output = Z;

    fn add(self, rhs: Z) -> Z {
        Z(self.0 + rhs.0)
    }
}

impl Sub for Z {
    type Output = Z;

    fn sub(self, rhs: Z) -> Z {
        Z(self.0 - rhs.0)
    }
}

impl Mul for Z {
    type Output = Z;

    fn mul(self, rhs: Z) -> Z {
        Z(self.0 * rhs.0)
    }
}

impl Neg for Z {
    type Output = Z;

    fn neg(self) -> Z {
        Z(-self.0)
    }
}

impl FromStr for Z {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<BigInt>()
            .map(Self)
            .map_err(|_| EncodingError::InvalidNumber(s.to_string()))
    }
}

impl fmt::Display for Z {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Serialize for Z {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Z {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DecimalVisitor).and_then(|text| {
            if text.is_empty() {
                return Ok(Z::zero());
            }
            text.parse().map_err(de::Error::custom)
        })
    }
}

// ---------------------------------------------------------------------------
// N
// ---------------------------------------------------------------------------

/// Unsigned arbitrary-precision integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct N(BigUint);

impl N {
    /// Zero.
    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    /// Wrap a bignum.
    pub fn from_biguint(n: BigUint) -> Self {
        Self(n)
    }

    /// Borrow the bignum.
    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// True for zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Difference, `None` if it would be negative.
    pub fn checked_sub(&self, rhs: &N) -> Option<N> {
        if rhs.0 > self.0 {
            None
        } else {
            Some(Self(&self.0 - &rhs.0))
        }
    }

    /// Quotient, `None` when `rhs` is zero.
    pub fn checked_div(&self, rhs: &N) -> Option<N> {
        if rhs.is_zero() {
            None
        } else {
            Some(Self(&self.0 / &rhs.0))
        }
    }

    /// Value as `u64` if it fits.
    pub fn to_u64(&self) -> Option<u64> {
        self.0.to_u64()
    }

    /// Value as a signed `Z`.
    pub fn to_z(&self) -> Z {
        Z(BigInt::from(self.0.clone()))
    }

    /// Append the wire encoding to `out`.
    pub fn encode_buffer(&self, out: &mut Vec<u8>) {
        if self.0.is_zero() {
            out.push(0);
            return;
        }
        write_groups(self.0.clone(), out);
    }

    /// Decode one number from the front of `buf`, returning it with the
    /// number of bytes consumed.
    ///
    /// # Errors
    ///
    /// `ShortBuffer` when `buf` ends before a byte without the continuation
    /// flag.
    pub fn decode_buffer(buf: &[u8]) -> Result<(Self, usize), EncodingError> {
        let mut value = BigUint::zero();
        for (i, &byte) in buf.iter().enumerate() {
            let bits = byte & DATA_MASK;
            if bits != 0 {
                value |= BigUint::from(bits) << (7 * i);
            }
            if byte & CONTINUATION == 0 {
                return Ok((Self(value), i + 1));
            }
        }
        Err(truncated(buf.len()))
    }

    /// Wire encoding as an owned vector.
    pub fn to_binary(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode_buffer(&mut out);
        out
    }

    /// Decode a buffer holding exactly one number.
    pub fn parse_binary(buf: &[u8]) -> Result<Self, EncodingError> {
        let (n, consumed) = Self::decode_buffer(buf)?;
        reject_trailing(consumed, buf.len())?;
        Ok(n)
    }
}

impl From<u64> for N {
    fn from(n: u64) -> Self {
        Self(BigUint::from(n))
    }
}

impl From<BigUint> for N {
    fn from(n: BigUint) -> Self {
        Self(n)
    }
}

impl TryFrom<Z> for N {
    type Error = EncodingError;

    fn try_from(z: Z) -> Result<Self, Self::Error> {
        z.to_n()
            .ok_or_else(|| EncodingError::InvalidNumber(format!("{z} is negative")))
    }
}

impl Add for N {
    type Output = N;

    fn add(self, rhs: N) -> N {
        N(self.0 + rhs.0)
    }
}

impl Mul for N {
    type Output = N;

    fn mul(self, rhs: N) -> N {
        N(self.0 * rhs.0)
    }
}

impl FromStr for N {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<BigUint>()
            .map(Self)
            .map_err(|_| EncodingError::InvalidNumber(s.to_string()))
    }
}

impl fmt::Display for N {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Serialize for N {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for N {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DecimalVisitor).and_then(|text| {
            if text.is_empty() {
                return Ok(N::zero());
            }
            text.parse().map_err(de::Error::custom)
        })
    }
}

/// Accepts a decimal string or a native integer and yields its decimal text.
struct DecimalVisitor;

impl<'de> Visitor<'de> for DecimalVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal string or integer")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
        Ok(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn z_hex(n: i64) -> String {
        hex::encode(Z::from(n).to_binary())
    }

    fn n_hex(n: u64) -> String {
        hex::encode(N::from(n).to_binary())
    }

    #[test]
    fn z_known_encodings() {
        assert_eq!(z_hex(0), "00");
        assert_eq!(z_hex(1), "01");
        assert_eq!(z_hex(-1), "41");
        assert_eq!(z_hex(63), "3f");
        assert_eq!(z_hex(-63), "7f");
        assert_eq!(z_hex(64), "8001");
        assert_eq!(z_hex(-64), "c001");
        assert_eq!(z_hex(1000), "a80f");
    }

    #[test]
    fn n_known_encodings() {
        assert_eq!(n_hex(0), "00");
        assert_eq!(n_hex(127), "7f");
        assert_eq!(n_hex(128), "8001");
        assert_eq!(n_hex(300), "ac02");
        assert_eq!(n_hex(u64::MAX), "ffffffffffffffffff01");
    }

    #[test]
    fn decode_reports_consumed_bytes() {
        let (z, used) = Z::decode_buffer(&[0xc0, 0x01, 0xff]).unwrap();
        assert_eq!(z, Z::from(-64));
        assert_eq!(used, 2);
        let (n, used) = N::decode_buffer(&[0xac, 0x02, 0x00]).unwrap();
        assert_eq!(n, N::from(300));
        assert_eq!(used, 2);
    }

    #[test]
    fn truncated_stream_is_short_buffer() {
        assert!(matches!(
            Z::decode_buffer(&[0x80]).unwrap_err(),
            EncodingError::ShortBuffer(_)
        ));
        assert!(matches!(
            N::decode_buffer(&[0xff, 0xff]).unwrap_err(),
            EncodingError::ShortBuffer(_)
        ));
        assert!(matches!(
            Z::decode_buffer(&[]).unwrap_err(),
            EncodingError::ShortBuffer(_)
        ));
    }

    #[test]
    fn parse_binary_rejects_trailing_bytes() {
        assert!(Z::parse_binary(&[0x01, 0x00]).is_err());
        assert_eq!(Z::parse_binary(&[0x41]).unwrap(), Z::from(-1));
    }

    #[test]
    fn arithmetic_and_conversions() {
        let a = Z::from(-7);
        let b = Z::from(3);
        assert_eq!(a.clone() + b.clone(), Z::from(-4));
        assert_eq!(a.clone() - b.clone(), Z::from(-10));
        assert_eq!(a.clone() * b.clone(), Z::from(-21));
        assert_eq!(a.checked_div(&b), Some(Z::from(-2)));
        assert_eq!(a.checked_div(&Z::zero()), None);
        assert_eq!(-a.clone(), Z::from(7));
        assert_eq!(a.abs(), Z::from(7));
        assert!(a < b);
        assert_eq!(a.to_n(), None);
        assert_eq!(b.to_n(), Some(N::from(3)));

        let x = N::from(10);
        let y = N::from(4);
        assert_eq!(x.checked_sub(&y), Some(N::from(6)));
        assert_eq!(y.checked_sub(&x), None);
        assert_eq!(x.clone() + y.clone(), N::from(14));
        assert_eq!(x.clone() * y.clone(), N::from(40));
        assert_eq!(x.checked_div(&y), Some(N::from(2)));
        assert_eq!(x.to_z(), Z::from(10));
        assert!(N::try_from(Z::from(-1)).is_err());
    }

    #[test]
    fn decimal_text() {
        let big = "-123456789012345678901234567890";
        assert_eq!(big.parse::<Z>().unwrap().to_string(), big);
        assert!(matches!(
            "12x".parse::<N>().unwrap_err(),
            EncodingError::InvalidNumber(_)
        ));
        assert!("-1".parse::<N>().is_err());
        assert_eq!(Z::from(i64::MIN).to_i64(), Some(i64::MIN));
        assert_eq!(N::from(u64::MAX).to_u64(), Some(u64::MAX));
    }

    #[test]
    fn serde_accepts_strings_and_integers() {
        assert_eq!(serde_json::to_string(&Z::from(-5)).unwrap(), "\"-5\"");
        assert_eq!(serde_json::from_str::<Z>("\"-5\"").unwrap(), Z::from(-5));
        assert_eq!(serde_json::from_str::<Z>("-5").unwrap(), Z::from(-5));
        assert_eq!(serde_json::from_str::<N>("42").unwrap(), N::from(42));
        assert_eq!(serde_json::from_str::<N>("\"\"").unwrap(), N::zero());
        assert!(serde_json::from_str::<N>("\"-1\"").is_err());
    }

    mod proptests {
        use super::super::*;
        use proptest::prelude::*;

        fn magnitude(bits: usize) -> impl Strategy<Value = BigUint> {
            proptest::collection::vec(any::<u8>(), bits.div_ceil(8)).prop_map(move |bytes| {
                let n = BigUint::from_bytes_le(&bytes);
                let top = BigUint::from(1u8) << bits;
                n % top
            })
        }

        fn sized_magnitude() -> impl Strategy<Value = BigUint> {
            prop_oneof![
                magnitude(6),
                magnitude(62),
                magnitude(125),
                magnitude(251),
                magnitude(510),
            ]
        }

        proptest! {
            #[test]
            fn z_round_trip(mag in sized_magnitude(), negative in any::<bool>()) {
                let sign = if negative { Sign::Minus } else { Sign::Plus };
                let z = Z::from_bigint(BigInt::from_biguint(sign, mag));
                let bytes = z.to_binary();
                prop_assert_eq!(Z::decode_buffer(&bytes).unwrap(), (z, bytes.len()));
            }

            #[test]
            fn n_round_trip(mag in sized_magnitude()) {
                let n = N::from_biguint(mag);
                let bytes = n.to_binary();
                prop_assert_eq!(N::decode_buffer(&bytes).unwrap(), (n, bytes.len()));
            }

            #[test]
            fn truncation_is_detected(mag in magnitude(510)) {
                let n = N::from_biguint(mag);
                let bytes = n.to_binary();
                prop_assume!(bytes.len() > 1);
                let err = N::decode_buffer(&bytes[..bytes.len() - 1]).unwrap_err();
                prop_assert!(matches!(err, EncodingError::ShortBuffer(_)), "unexpected error: {:?}", err);
            }
        }

        #[test]
        fn boundary_magnitudes() {
            for bits in [6usize, 7, 62, 63, 64, 125, 126, 251, 252, 510, 511] {
                let top = BigUint::from(1u8) << bits;
                for mag in [top.clone() - 1u8, top.clone(), top + 1u8] {
                    for sign in [Sign::Plus, Sign::Minus] {
                        let z = Z::from_bigint(BigInt::from_biguint(sign, mag.clone()));
                        assert_eq!(Z::parse_binary(&z.to_binary()).unwrap(), z);
                    }
                    let n = N::from_biguint(mag);
                    assert_eq!(N::parse_binary(&n.to_binary()).unwrap(), n);
                }
            }
        }
    }
}
