use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, PreparedVerifyingKey, ProvingKey, VerifyingKey};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_snark::{CircuitSpecificSetupSNARK, SNARK};
use rand::{CryptoRng, RngCore};
use std::fs;
use std::path::Path;

use crate::crypto::circuit::PasswordCircuit;
use crate::crypto::commitment::commit;
use crate::crypto::field::FieldElement;
use crate::crypto::snarkjs::{PublicSignals, SnarkjsProof, SnarkjsVerificationKey};
use crate::error::AppError;

pub const PROVING_KEY_FILE: &str = "proving_key.bin";
pub const VERIFICATION_KEY_FILE: &str = "verification_key.json";

/// Proving and verification keys for the password circuit.
pub struct ProofSystem {
    pub proving_key: ProvingKey<Bn254>,
    pub verifying_key: VerifyingKey<Bn254>,
}

impl ProofSystem {
    /// Circuit-specific trusted setup. Development use only: whoever runs it
    /// knows the toxic waste and can forge proofs.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self, AppError> {
        let circuit = PasswordCircuit::blank()?;

        let (pk, vk) = Groth16::<Bn254>::setup(circuit, rng)
            .map_err(|e| AppError::Crypto(format!("Setup failed: {}", e)))?;

        Ok(ProofSystem {
            proving_key: pk,
            verifying_key: vk,
        })
    }

    /// Write `proving_key.bin` and `verification_key.json` into `out_dir`.
    pub fn save(&self, out_dir: &Path) -> Result<(), AppError> {
        fs::create_dir_all(out_dir)
            .map_err(|e| AppError::Crypto(format!("Failed to create {}: {}", out_dir.display(), e)))?;

        let mut pk_bytes = Vec::new();
        self.proving_key
            .serialize_compressed(&mut pk_bytes)
            .map_err(|e| AppError::Crypto(format!("Failed to serialize proving key: {}", e)))?;
        let pk_path = out_dir.join(PROVING_KEY_FILE);
        fs::write(&pk_path, pk_bytes)
            .map_err(|e| AppError::Crypto(format!("Failed to write {}: {}", pk_path.display(), e)))?;

        let vk_json = serde_json::to_string_pretty(&self.export_verification_key())?;
        let vk_path = out_dir.join(VERIFICATION_KEY_FILE);
        fs::write(&vk_path, vk_json)
            .map_err(|e| AppError::Crypto(format!("Failed to write {}: {}", vk_path.display(), e)))?;

        tracing::info!("ZK keys written to {}", out_dir.display());
        Ok(())
    }

    pub fn export_verification_key(&self) -> SnarkjsVerificationKey {
        SnarkjsVerificationKey::from_arkworks(&self.verifying_key)
    }
}

/// Load a compressed proving key written by [`ProofSystem::save`].
pub fn load_proving_key(path: &Path) -> Result<ProvingKey<Bn254>, AppError> {
    let bytes = fs::read(path).map_err(|e| {
        AppError::Config(format!("Failed to read proving key {}: {}", path.display(), e))
    })?;

    ProvingKey::<Bn254>::deserialize_compressed(&bytes[..])
        .map_err(|e| AppError::Config(format!("Failed to deserialize proving key: {}", e)))
}

/// Prove knowledge of `password` against the published `expected_hash`.
///
/// Returns the proof and the public signals `[isValid, expectedHash]`. A
/// wrong password still yields a valid proof, with `isValid = 0`.
pub fn generate_proof<R: RngCore + CryptoRng>(
    password: FieldElement,
    expected_hash: FieldElement,
    proving_key: &ProvingKey<Bn254>,
    rng: &mut R,
) -> Result<(SnarkjsProof, PublicSignals), AppError> {
    let circuit = PasswordCircuit::new(Some(password), Some(expected_hash))?;

    let proof = Groth16::<Bn254>::prove(proving_key, circuit, rng)
        .map_err(|e| AppError::Crypto(format!("Proof generation failed: {}", e)))?;

    let is_valid = if commit(&password)? == expected_hash {
        FieldElement::one()
    } else {
        FieldElement::zero()
    };

    Ok((
        SnarkjsProof::from_arkworks(&proof),
        PublicSignals::new(vec![is_valid, expected_hash]),
    ))
}

/// Cryptographic Groth16 check only. Does not look at the result signal.
///
/// `Ok(false)` is an honest rejection; `Err` means the inputs could not be
/// verified at all (malformed points, wrong signal count).
pub fn verify_proof(
    verifying_key: &PreparedVerifyingKey<Bn254>,
    public_signals: &PublicSignals,
    proof: &SnarkjsProof,
) -> Result<bool, AppError> {
    let proof = proof
        .to_arkworks()
        .map_err(|e| AppError::Verification(format!("Invalid proof: {}", e)))?;

    let expected = verifying_key.vk.gamma_abc_g1.len() - 1;
    if public_signals.len() != expected {
        return Err(AppError::Verification(format!(
            "Expected {} public signals, got {}",
            expected,
            public_signals.len()
        )));
    }

    let inputs: Vec<Fr> = public_signals.to_scalars();
    Groth16::<Bn254>::verify_with_processed_vk(verifying_key, &inputs, &proof)
        .map_err(|e| AppError::Verification(format!("Verification failed: {}", e)))
}

pub fn prepare_verifying_key(
    vk: &VerifyingKey<Bn254>,
) -> Result<PreparedVerifyingKey<Bn254>, AppError> {
    Groth16::<Bn254>::process_vk(vk)
        .map_err(|e| AppError::Config(format!("Failed to prepare verification key: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::encoding::encode;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_proof_generation_verification() {
        let mut rng = StdRng::seed_from_u64(7);
        let ps = ProofSystem::generate(&mut rng).unwrap();
        let pvk = prepare_verifying_key(&ps.verifying_key).unwrap();

        let password = encode("hunter2");
        let expected = commit(&password).unwrap();

        let (proof, signals) =
            generate_proof(password, expected, &ps.proving_key, &mut rng).unwrap();
        assert!(signals.get(0).unwrap().is_one());
        assert_eq!(signals.get(1), Some(&expected));
        assert!(verify_proof(&pvk, &signals, &proof).unwrap());

        // Wrong password: proof verifies, result bit is zero.
        let (proof, signals) =
            generate_proof(encode("hunter3"), expected, &ps.proving_key, &mut rng).unwrap();
        assert_eq!(signals.get(0), Some(&FieldElement::zero()));
        assert!(verify_proof(&pvk, &signals, &proof).unwrap());

        // Flipping the result bit breaks the proof.
        let mut forged = signals.clone();
        forged.replace(0, FieldElement::one());
        assert!(!verify_proof(&pvk, &forged, &proof).unwrap());

        // Signal count mismatch is a fault, not a rejection.
        let short = PublicSignals::new(vec![FieldElement::one()]);
        assert!(matches!(
            verify_proof(&pvk, &short, &proof),
            Err(AppError::Verification(_))
        ));
    }

    #[test]
    fn test_keys_round_trip_through_disk() {
        let mut rng = StdRng::seed_from_u64(11);
        let ps = ProofSystem::generate(&mut rng).unwrap();
        let dir = tempfile::tempdir().unwrap();
        ps.save(dir.path()).unwrap();

        let pk = load_proving_key(&dir.path().join(PROVING_KEY_FILE)).unwrap();
        assert_eq!(pk.vk, ps.verifying_key);

        let vk_json = fs::read_to_string(dir.path().join(VERIFICATION_KEY_FILE)).unwrap();
        let exported: SnarkjsVerificationKey = serde_json::from_str(&vk_json).unwrap();
        assert_eq!(exported.n_public, 2);
        assert_eq!(exported.to_arkworks().unwrap(), ps.verifying_key);
    }

    #[test]
    fn test_missing_proving_key_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_proving_key(&dir.path().join("nope.bin")),
            Err(AppError::Config(_))
        ));
    }
}
