//! Commitments binding a secret field element to a public value.
//!
//! The production scheme is Poseidon over BN254 with circomlib-compatible
//! parameters (x^5 S-box, width 2 for a single input), which is what the
//! password circuit evaluates in-constraint. A byte-reduction hash is kept
//! as a separately selected strategy for environments without Poseidon; it
//! is not preimage resistant and the circuit does not accept its outputs.

use std::fmt;
use std::str::FromStr;

use ark_bn254::Fr;
use light_poseidon::parameters::bn254_x5;
use light_poseidon::{Poseidon, PoseidonHasher, PoseidonParameters};

use crate::crypto::field::FieldElement;
use crate::error::AppError;

/// Number of field elements the commitment absorbs.
pub const COMMITMENT_INPUTS: usize = 1;

/// Poseidon state width: one capacity element plus the inputs.
pub const POSEIDON_WIDTH: usize = COMMITMENT_INPUTS + 1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CommitmentScheme {
    #[default]
    Poseidon,
    /// Reduction of raw bytes modulo the field order. Not a cryptographic hash.
    InsecureByteReduction,
}

impl CommitmentScheme {
    pub fn commit(&self, secret: &FieldElement) -> Result<FieldElement, AppError> {
        match self {
            CommitmentScheme::Poseidon => poseidon_commit(secret),
            CommitmentScheme::InsecureByteReduction => {
                tracing::warn!("⚠️ Using insecure byte-reduction commitment; output is not preimage resistant");
                Ok(insecure::byte_reduction(secret))
            }
        }
    }

    pub fn is_secure(&self) -> bool {
        matches!(self, CommitmentScheme::Poseidon)
    }
}

impl fmt::Display for CommitmentScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommitmentScheme::Poseidon => f.write_str("poseidon"),
            CommitmentScheme::InsecureByteReduction => f.write_str("insecure-byte-reduction"),
        }
    }
}

impl FromStr for CommitmentScheme {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "poseidon" => Ok(CommitmentScheme::Poseidon),
            "insecure-byte-reduction" => Ok(CommitmentScheme::InsecureByteReduction),
            other => Err(AppError::Config(format!(
                "Unknown commitment scheme '{}' (expected 'poseidon' or 'insecure-byte-reduction')",
                other
            ))),
        }
    }
}

/// Poseidon commitment of a secret field element.
pub fn commit(secret: &FieldElement) -> Result<FieldElement, AppError> {
    CommitmentScheme::Poseidon.commit(secret)
}

fn poseidon_commit(secret: &FieldElement) -> Result<FieldElement, AppError> {
    let mut hasher = Poseidon::<Fr>::new_circom(COMMITMENT_INPUTS)
        .map_err(|e| AppError::Crypto(format!("Failed to initialise Poseidon: {}", e)))?;

    let hash = hasher
        .hash(&[secret.inner()])
        .map_err(|e| AppError::Crypto(format!("Poseidon hash failed: {}", e)))?;

    Ok(FieldElement::from(hash))
}

/// Round constants and MDS matrix used by both the native hash and the
/// in-circuit gadget.
pub fn poseidon_parameters() -> Result<PoseidonParameters<Fr>, AppError> {
    bn254_x5::get_poseidon_parameters::<Fr>(POSEIDON_WIDTH as u8)
        .map_err(|e| AppError::Crypto(format!("Failed to load Poseidon parameters: {}", e)))
}

mod insecure {
    use ark_bn254::Fr;
    use ark_ff::PrimeField;

    use crate::crypto::field::FieldElement;

    /// UTF-8 bytes of the decimal form of `secret`, read big-endian, mod r.
    pub(super) fn byte_reduction(secret: &FieldElement) -> FieldElement {
        let decimal = secret.to_string();
        FieldElement::from(Fr::from_be_bytes_mod_order(decimal.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::encoding::encode;

    #[test]
    fn test_poseidon_reference_vector() {
        // circomlib poseidon([1])
        let hash = commit(&FieldElement::from(1u64)).unwrap();
        assert_eq!(
            hash.to_string(),
            "18586133768512220936620570745912940619677854269274689475585506675881198879027"
        );
    }

    #[test]
    fn test_commit_is_deterministic() {
        let secret = encode("hunter2");
        assert_eq!(commit(&secret).unwrap(), commit(&secret).unwrap());
    }

    #[test]
    fn test_commit_spot_check_no_collisions() {
        let passwords = ["", "a", "b", "hunter2", "hunter3", "password", "passwore"];
        let mut seen = std::collections::HashSet::new();
        for password in passwords {
            let hash = commit(&encode(password)).unwrap();
            assert!(seen.insert(hash), "collision for {:?}", password);
            assert_ne!(hash, encode(password));
        }
    }

    #[test]
    fn test_insecure_fallback_is_segregated() {
        let secret = FieldElement::from(97u64);
        let weak = CommitmentScheme::InsecureByteReduction.commit(&secret).unwrap();
        // "97" -> 0x3937
        assert_eq!(weak.to_string(), "14647");
        assert_ne!(weak, CommitmentScheme::Poseidon.commit(&secret).unwrap());
        assert!(!CommitmentScheme::InsecureByteReduction.is_secure());
        assert_eq!(CommitmentScheme::default(), CommitmentScheme::Poseidon);
    }

    #[test]
    fn test_scheme_from_str() {
        assert_eq!(
            "poseidon".parse::<CommitmentScheme>().unwrap(),
            CommitmentScheme::Poseidon
        );
        assert_eq!(
            "insecure-byte-reduction".parse::<CommitmentScheme>().unwrap(),
            CommitmentScheme::InsecureByteReduction
        );
        assert!("sha256".parse::<CommitmentScheme>().is_err());
    }

    #[test]
    fn test_parameters_match_width() {
        let params = poseidon_parameters().unwrap();
        assert_eq!(params.width, POSEIDON_WIDTH);
        assert_eq!(params.alpha, 5);
        assert_eq!(params.mds.len(), POSEIDON_WIDTH);
    }
}
