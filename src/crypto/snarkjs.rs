//! snarkjs JSON artifacts and their arkworks counterparts.
//!
//! snarkjs writes curve points in projective form with decimal coordinates:
//! G1 as `[x, y, z]`, G2 as `[[x.c0, x.c1], [y.c0, y.c1], [z.c0, z.c1]]`.
//! Only affine points (`z = 1`) and the point at infinity (`z = 0`) are
//! accepted, which is what snarkjs emits after normalisation.

use ark_bn254::{Bn254, Fq, Fq2, Fr, G1Affine, G2Affine};
use ark_ff::{One, Zero};
use ark_groth16::{Proof, VerifyingKey};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::crypto::field::{parse_decimal, to_decimal, FieldElement, FieldParseError};

pub const PROTOCOL: &str = "groth16";
pub const CURVE: &str = "bn128";

pub type G1Json = [String; 3];
pub type G2Json = [[String; 2]; 3];

#[derive(Debug, Error)]
pub enum SnarkjsError {
    #[error("{point}: invalid coordinate: {source}")]
    Coordinate {
        point: &'static str,
        #[source]
        source: FieldParseError,
    },

    #[error("{0}: point is not in affine form")]
    NotAffine(&'static str),

    #[error("{0}: point is not on the curve")]
    NotOnCurve(&'static str),

    #[error("{0}: point is not in the prime-order subgroup")]
    NotInSubgroup(&'static str),

    #[error("unsupported protocol '{0}' (expected 'groth16')")]
    Protocol(String),

    #[error("unsupported curve '{0}' (expected 'bn128')")]
    Curve(String),

    #[error("IC has {actual} points but nPublic is {n_public}")]
    IcLength { n_public: usize, actual: usize },
}

/// Groth16 proof as produced by `snarkjs groth16 prove`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnarkjsProof {
    pub pi_a: G1Json,
    pub pi_b: G2Json,
    pub pi_c: G1Json,
    #[serde(default = "default_protocol")]
    pub protocol: String,
    #[serde(default = "default_curve")]
    pub curve: String,
}

/// Verification key as produced by `snarkjs zkey export verificationkey`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnarkjsVerificationKey {
    pub protocol: String,
    pub curve: String,
    #[serde(rename = "nPublic")]
    pub n_public: usize,
    pub vk_alpha_1: G1Json,
    pub vk_beta_2: G2Json,
    pub vk_gamma_2: G2Json,
    pub vk_delta_2: G2Json,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vk_alphabeta_12: Option<serde_json::Value>,
    #[serde(rename = "IC")]
    pub ic: Vec<G1Json>,
}

/// Ordered public outputs of the circuit, as decimal strings on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicSignals(Vec<FieldElement>);

fn default_protocol() -> String {
    PROTOCOL.to_string()
}

fn default_curve() -> String {
    CURVE.to_string()
}

impl PublicSignals {
    pub fn new(signals: Vec<FieldElement>) -> Self {
        PublicSignals(signals)
    }

    pub fn get(&self, index: usize) -> Option<&FieldElement> {
        self.0.get(index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[FieldElement] {
        &self.0
    }

    pub fn to_scalars(&self) -> Vec<Fr> {
        self.0.iter().map(FieldElement::inner).collect()
    }

    pub fn replace(&mut self, index: usize, value: FieldElement) {
        if let Some(slot) = self.0.get_mut(index) {
            *slot = value;
        }
    }
}

impl SnarkjsProof {
    pub fn from_arkworks(proof: &Proof<Bn254>) -> Self {
        SnarkjsProof {
            pi_a: g1_to_json(&proof.a),
            pi_b: g2_to_json(&proof.b),
            pi_c: g1_to_json(&proof.c),
            protocol: default_protocol(),
            curve: default_curve(),
        }
    }

    pub fn to_arkworks(&self) -> Result<Proof<Bn254>, SnarkjsError> {
        check_metadata(&self.protocol, &self.curve)?;
        Ok(Proof {
            a: g1_from_json(&self.pi_a, "pi_a")?,
            b: g2_from_json(&self.pi_b, "pi_b")?,
            c: g1_from_json(&self.pi_c, "pi_c")?,
        })
    }
}

impl SnarkjsVerificationKey {
    pub fn from_arkworks(vk: &VerifyingKey<Bn254>) -> Self {
        SnarkjsVerificationKey {
            protocol: default_protocol(),
            curve: default_curve(),
            n_public: vk.gamma_abc_g1.len().saturating_sub(1),
            vk_alpha_1: g1_to_json(&vk.alpha_g1),
            vk_beta_2: g2_to_json(&vk.beta_g2),
            vk_gamma_2: g2_to_json(&vk.gamma_g2),
            vk_delta_2: g2_to_json(&vk.delta_g2),
            vk_alphabeta_12: None,
            ic: vk.gamma_abc_g1.iter().map(g1_to_json).collect(),
        }
    }

    pub fn to_arkworks(&self) -> Result<VerifyingKey<Bn254>, SnarkjsError> {
        check_metadata(&self.protocol, &self.curve)?;
        if self.ic.len() != self.n_public + 1 {
            return Err(SnarkjsError::IcLength {
                n_public: self.n_public,
                actual: self.ic.len(),
            });
        }

        Ok(VerifyingKey {
            alpha_g1: g1_from_json(&self.vk_alpha_1, "vk_alpha_1")?,
            beta_g2: g2_from_json(&self.vk_beta_2, "vk_beta_2")?,
            gamma_g2: g2_from_json(&self.vk_gamma_2, "vk_gamma_2")?,
            delta_g2: g2_from_json(&self.vk_delta_2, "vk_delta_2")?,
            gamma_abc_g1: self
                .ic
                .iter()
                .map(|point| g1_from_json(point, "IC"))
                .collect::<Result<_, _>>()?,
        })
    }
}

fn check_metadata(protocol: &str, curve: &str) -> Result<(), SnarkjsError> {
    if protocol != PROTOCOL {
        return Err(SnarkjsError::Protocol(protocol.to_string()));
    }
    if curve != CURVE {
        return Err(SnarkjsError::Curve(curve.to_string()));
    }
    Ok(())
}

fn fq(value: &str, point: &'static str) -> Result<Fq, SnarkjsError> {
    parse_decimal::<Fq>(value).map_err(|source| SnarkjsError::Coordinate { point, source })
}

fn fq2(value: &[String; 2], point: &'static str) -> Result<Fq2, SnarkjsError> {
    Ok(Fq2::new(fq(&value[0], point)?, fq(&value[1], point)?))
}

fn g1_from_json(json: &G1Json, point: &'static str) -> Result<G1Affine, SnarkjsError> {
    let z = fq(&json[2], point)?;
    if z.is_zero() {
        return Ok(G1Affine::identity());
    }
    if !z.is_one() {
        return Err(SnarkjsError::NotAffine(point));
    }

    let p = G1Affine::new_unchecked(fq(&json[0], point)?, fq(&json[1], point)?);
    if !p.is_on_curve() {
        return Err(SnarkjsError::NotOnCurve(point));
    }
    if !p.is_in_correct_subgroup_assuming_on_curve() {
        return Err(SnarkjsError::NotInSubgroup(point));
    }
    Ok(p)
}

fn g2_from_json(json: &G2Json, point: &'static str) -> Result<G2Affine, SnarkjsError> {
    let z = fq2(&json[2], point)?;
    if z.is_zero() {
        return Ok(G2Affine::identity());
    }
    if !z.is_one() {
        return Err(SnarkjsError::NotAffine(point));
    }

    let p = G2Affine::new_unchecked(fq2(&json[0], point)?, fq2(&json[1], point)?);
    if !p.is_on_curve() {
        return Err(SnarkjsError::NotOnCurve(point));
    }
    if !p.is_in_correct_subgroup_assuming_on_curve() {
        return Err(SnarkjsError::NotInSubgroup(point));
    }
    Ok(p)
}

fn g1_to_json(p: &G1Affine) -> G1Json {
    if p.infinity {
        return ["0".into(), "1".into(), "0".into()];
    }
    [to_decimal(&p.x), to_decimal(&p.y), "1".into()]
}

fn g2_to_json(p: &G2Affine) -> G2Json {
    if p.infinity {
        return [
            ["0".into(), "0".into()],
            ["1".into(), "0".into()],
            ["0".into(), "0".into()],
        ];
    }
    [
        [to_decimal(&p.x.c0), to_decimal(&p.x.c1)],
        [to_decimal(&p.y.c0), to_decimal(&p.y.c1)],
        ["1".into(), "0".into()],
    ]
}
