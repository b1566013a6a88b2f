use ark_bn254::Fr;
use ark_ff::{One, Zero};
use ark_r1cs_std::alloc::AllocVar;
use ark_r1cs_std::eq::EqGadget;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::fields::FieldVar;
use ark_r1cs_std::R1CSVar;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};
use light_poseidon::PoseidonParameters;

use crate::crypto::commitment::poseidon_parameters;
use crate::crypto::field::FieldElement;
use crate::error::AppError;

/// Public signal index of the equality bit.
pub const RESULT_SIGNAL: usize = 0;
/// Public signal index of the expected commitment.
pub const EXPECTED_HASH_SIGNAL: usize = 1;
/// Number of public signals the circuit exposes.
pub const PUBLIC_SIGNALS: usize = 2;

/// ZK circuit for password authentication.
///
/// Proves knowledge of `password` and exposes, in order, the public signals
/// `[isValid, expectedHash]` where `isValid = (Poseidon(password) == expectedHash)`.
/// The circuit is satisfiable for any password: a wrong password yields
/// `isValid = 0` with a perfectly valid proof, so verifiers must check the
/// result signal as well as the proof.
pub struct PasswordCircuit {
    /// Private input: encoded password (witness)
    pub password: Option<FieldElement>,
    /// Public input: published commitment
    pub expected_hash: Option<FieldElement>,
    params: PoseidonParameters<Fr>,
}

impl PasswordCircuit {
    pub fn new(
        password: Option<FieldElement>,
        expected_hash: Option<FieldElement>,
    ) -> Result<Self, AppError> {
        Ok(PasswordCircuit {
            password,
            expected_hash,
            params: poseidon_parameters()?,
        })
    }

    /// Circuit with no assignment, used for key generation.
    pub fn blank() -> Result<Self, AppError> {
        Self::new(None, None)
    }
}

impl ConstraintSynthesizer<Fr> for PasswordCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let password = FpVar::new_witness(cs.clone(), || {
            self.password
                .map(Fr::from)
                .ok_or(SynthesisError::AssignmentMissing)
        })?;

        let hash = poseidon_gadget(&self.params, &[password])?;

        // Public inputs are numbered in allocation order: the result bit
        // must be allocated first.
        let expected_value = self.expected_hash.map(Fr::from);
        let is_valid = FpVar::new_input(cs.clone(), || {
            let expected = expected_value.ok_or(SynthesisError::AssignmentMissing)?;
            Ok(if hash.value()? == expected {
                Fr::one()
            } else {
                Fr::zero()
            })
        })?;
        let expected = FpVar::new_input(cs, || {
            expected_value.ok_or(SynthesisError::AssignmentMissing)
        })?;

        let equal = hash.is_eq(&expected)?;
        is_valid.enforce_equal(&FpVar::from(equal))?;

        Ok(())
    }
}

/// In-circuit Poseidon permutation, round-for-round identical to the native
/// circom-compatible hash: state `[0, inputs..]`, full rounds split around
/// the partial rounds, output is `state[0]`.
pub fn poseidon_gadget(
    params: &PoseidonParameters<Fr>,
    inputs: &[FpVar<Fr>],
) -> Result<FpVar<Fr>, SynthesisError> {
    if inputs.len() + 1 != params.width || params.alpha != 5 {
        return Err(SynthesisError::Unsatisfiable);
    }

    let mut state: Vec<FpVar<Fr>> = Vec::with_capacity(params.width);
    state.push(FpVar::zero());
    state.extend(inputs.iter().cloned());

    let half_full = params.full_rounds / 2;
    let rounds = params.full_rounds + params.partial_rounds;

    for round in 0..rounds {
        for (i, element) in state.iter_mut().enumerate() {
            *element += params.ark[round * params.width + i];
        }

        if round < half_full || round >= half_full + params.partial_rounds {
            for element in state.iter_mut() {
                *element = sbox(element)?;
            }
        } else {
            state[0] = sbox(&state[0])?;
        }

        state = params
            .mds
            .iter()
            .map(|row| {
                row.iter()
                    .zip(state.iter())
                    .fold(FpVar::zero(), |acc, (m, element)| acc + element.clone() * *m)
            })
            .collect();
    }

    Ok(state.swap_remove(0))
}

fn sbox(x: &FpVar<Fr>) -> Result<FpVar<Fr>, SynthesisError> {
    let x2 = x.square()?;
    let x4 = x2.square()?;
    Ok(x4 * x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::commitment::commit;
    use crate::crypto::encoding::encode;
    use ark_relations::r1cs::ConstraintSystem;

    #[test]
    fn test_gadget_matches_native_poseidon() {
        let params = poseidon_parameters().unwrap();
        for password in ["", "hunter2", "a much longer password than 31 bytes"] {
            let secret = encode(password);
            let cs = ConstraintSystem::<Fr>::new_ref();
            let input = FpVar::new_witness(cs.clone(), || Ok(secret.inner())).unwrap();
            let hash = poseidon_gadget(&params, &[input]).unwrap();

            assert_eq!(
                FieldElement::from(hash.value().unwrap()),
                commit(&secret).unwrap()
            );
            assert!(cs.is_satisfied().unwrap());
        }
    }

    fn synthesize(password: &str, expected: FieldElement) -> ConstraintSystemRef<Fr> {
        let cs = ConstraintSystem::<Fr>::new_ref();
        PasswordCircuit::new(Some(encode(password)), Some(expected))
            .unwrap()
            .generate_constraints(cs.clone())
            .unwrap();
        cs
    }

    #[test]
    fn test_correct_password_sets_result_bit() {
        let expected = commit(&encode("hunter2")).unwrap();
        let cs = synthesize("hunter2", expected);

        assert!(cs.is_satisfied().unwrap());
        assert_eq!(cs.num_instance_variables(), PUBLIC_SIGNALS + 1);

        let cs = cs.borrow().unwrap();
        // instance_assignment[0] is the constant one.
        assert_eq!(cs.instance_assignment[1 + RESULT_SIGNAL], Fr::one());
        assert_eq!(
            cs.instance_assignment[1 + EXPECTED_HASH_SIGNAL],
            expected.inner()
        );
    }

    #[test]
    fn test_wrong_password_is_satisfiable_with_result_zero() {
        let expected = commit(&encode("hunter2")).unwrap();
        let cs = synthesize("hunter3", expected);

        assert!(cs.is_satisfied().unwrap());
        let cs = cs.borrow().unwrap();
        assert_eq!(cs.instance_assignment[1 + RESULT_SIGNAL], Fr::zero());
    }

    #[test]
    fn test_rejects_wrong_arity() {
        let params = poseidon_parameters().unwrap();
        let cs = ConstraintSystem::<Fr>::new_ref();
        let a = FpVar::new_witness(cs.clone(), || Ok(Fr::one())).unwrap();
        let b = FpVar::new_witness(cs, || Ok(Fr::one())).unwrap();
        assert!(poseidon_gadget(&params, &[a, b]).is_err());
    }
}
