//! Field elements of the BN254 scalar field and their wire encoding.
//!
//! On the wire every field element is a canonical decimal string: ASCII
//! digits only, no sign, no leading zeros (except `"0"` itself), and strictly
//! less than the modulus. This is the encoding snarkjs emits for public
//! signals and curve coordinates, and parsing is deliberately strict so that
//! `"1"` is the only accepted spelling of one.

use std::fmt;
use std::str::FromStr;

use ark_bn254::Fr;
use ark_ff::{One, PrimeField, Zero};
use num_bigint::BigUint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Order of the BN254 scalar field.
pub const SCALAR_FIELD_MODULUS: &str =
    "21888242871839275222246405745257275088548364400416034343698204186575808495617";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldParseError {
    #[error("expected a decimal string, got {0:?}")]
    NotDecimal(String),

    #[error("non-canonical decimal {0:?} (leading zero)")]
    LeadingZero(String),

    #[error("value {0} is not below the field modulus")]
    OutOfRange(String),
}

fn modulus<F: PrimeField>() -> BigUint {
    // p - 1 is the largest canonical representative.
    let max: BigUint = (-F::one()).into();
    max + 1u32
}

/// Parses a canonical decimal string into a prime field element.
pub fn parse_decimal<F: PrimeField>(s: &str) -> Result<F, FieldParseError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FieldParseError::NotDecimal(s.to_string()));
    }
    if s.len() > 1 && s.starts_with('0') {
        return Err(FieldParseError::LeadingZero(s.to_string()));
    }

    // Anything with more digits than the modulus is out of range; reject it
    // before the (superlinear) big-integer parse.
    let modulus = modulus::<F>();
    if s.len() > modulus.to_str_radix(10).len() {
        return Err(FieldParseError::OutOfRange(format!("{}... ({} digits)", &s[..16], s.len())));
    }

    let value = BigUint::parse_bytes(s.as_bytes(), 10)
        .ok_or_else(|| FieldParseError::NotDecimal(s.to_string()))?;
    if value >= modulus {
        return Err(FieldParseError::OutOfRange(s.to_string()));
    }

    Ok(F::from(value))
}

/// Formats a prime field element as its canonical decimal string.
pub fn to_decimal<F: PrimeField>(value: &F) -> String {
    let value: BigUint = (*value).into();
    value.to_str_radix(10)
}

/// An element of the BN254 scalar field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FieldElement(Fr);

impl FieldElement {
    pub fn zero() -> Self {
        FieldElement(Fr::zero())
    }

    pub fn one() -> Self {
        FieldElement(Fr::one())
    }

    pub fn is_one(&self) -> bool {
        self.0.is_one()
    }

    pub fn inner(&self) -> Fr {
        self.0
    }
}

impl From<Fr> for FieldElement {
    fn from(value: Fr) -> Self {
        FieldElement(value)
    }
}

impl From<FieldElement> for Fr {
    fn from(value: FieldElement) -> Self {
        value.0
    }
}

impl From<u64> for FieldElement {
    fn from(value: u64) -> Self {
        FieldElement(Fr::from(value))
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_decimal(&self.0))
    }
}

impl FromStr for FieldElement {
    type Err = FieldParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_decimal::<Fr>(s).map(FieldElement)
    }
}

impl Serialize for FieldElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for FieldElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fq;

    #[test]
    fn test_modulus_constant_matches_field() {
        assert_eq!(modulus::<Fr>().to_str_radix(10), SCALAR_FIELD_MODULUS);
    }

    #[test]
    fn test_parse_and_format() {
        let one: FieldElement = "1".parse().unwrap();
        assert!(one.is_one());
        assert_eq!(one.to_string(), "1");
        assert_eq!(FieldElement::zero().to_string(), "0");

        let max = (modulus::<Fr>() - 1u32).to_str_radix(10);
        let parsed: FieldElement = max.parse().unwrap();
        assert_eq!(parsed.to_string(), max);
    }

    #[test]
    fn test_rejects_non_canonical() {
        for input in ["", "01", "0x1", " 1", "1 ", "-1", "+1", "1e3", "one"] {
            assert!(
                input.parse::<FieldElement>().is_err(),
                "{:?} should not parse",
                input
            );
        }
        assert!(matches!(
            SCALAR_FIELD_MODULUS.parse::<FieldElement>(),
            Err(FieldParseError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_rejects_oversized_input_without_parsing() {
        let digits = SCALAR_FIELD_MODULUS.len();
        assert!(matches!(
            "9".repeat(digits + 1).parse::<FieldElement>(),
            Err(FieldParseError::OutOfRange(_))
        ));

        // A signal list the size of a full request body fails fast.
        let huge = format!("[\"{}\"]", "9".repeat(1_000_000));
        let err = serde_json::from_str::<Vec<FieldElement>>(&huge).unwrap_err();
        assert!(err.to_string().contains("1000000 digits"));
    }

    #[test]
    fn test_base_field_is_larger_than_scalar_field() {
        // Coordinates use Fq; the scalar modulus is a valid Fq element.
        let q: Fq = parse_decimal(SCALAR_FIELD_MODULUS).unwrap();
        assert_eq!(to_decimal(&q), SCALAR_FIELD_MODULUS);
    }

    #[test]
    fn test_serde_is_decimal_string() {
        let value = FieldElement::from(29402514837566002u64);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, "\"29402514837566002\"");
        let back: FieldElement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
        assert!(serde_json::from_str::<FieldElement>("1").is_err());
    }
}
