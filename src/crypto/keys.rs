use std::fs;
use std::path::Path;

use ark_bn254::Bn254;
use ark_groth16::PreparedVerifyingKey;
use serde_json::Value;

use crate::crypto::proof::prepare_verifying_key;
use crate::crypto::snarkjs::SnarkjsVerificationKey;
use crate::error::AppError;

/// The verification key, loaded once at startup and shared read-only.
///
/// Holds the document exactly as it was read (served to clients) alongside
/// the prepared arkworks key used for pairing checks.
pub struct VerificationKeyStore {
    document: Value,
    key: SnarkjsVerificationKey,
    prepared: PreparedVerifyingKey<Bn254>,
}

impl VerificationKeyStore {
    /// Load and validate a snarkjs `verification_key.json`. Any failure is a
    /// configuration error and must stop the service from starting.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!(
                "Failed to read verification key {}: {}",
                path.display(),
                e
            ))
        })?;

        let document: Value = serde_json::from_str(&raw).map_err(|e| {
            AppError::Config(format!(
                "Verification key {} is not valid JSON: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_document(document)
    }

    pub fn from_document(document: Value) -> Result<Self, AppError> {
        let key: SnarkjsVerificationKey = serde_json::from_value(document.clone())
            .map_err(|e| AppError::Config(format!("Malformed verification key: {}", e)))?;

        let vk = key
            .to_arkworks()
            .map_err(|e| AppError::Config(format!("Invalid verification key: {}", e)))?;
        let prepared = prepare_verifying_key(&vk)?;

        Ok(VerificationKeyStore {
            document,
            key,
            prepared,
        })
    }

    /// The key exactly as loaded.
    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn prepared(&self) -> &PreparedVerifyingKey<Bn254> {
        &self.prepared
    }

    pub fn n_public(&self) -> usize {
        self.key.n_public
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::proof::{ProofSystem, VERIFICATION_KEY_FILE};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = VerificationKeyStore::load(dir.path().join("verification_key.json"));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_corrupt_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("verification_key.json");

        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            VerificationKeyStore::load(&path),
            Err(AppError::Config(_))
        ));

        fs::write(&path, r#"{"protocol": "groth16", "curve": "bn128"}"#).unwrap();
        assert!(matches!(
            VerificationKeyStore::load(&path),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_wrong_curve_is_config_error() {
        let mut rng = StdRng::seed_from_u64(3);
        let ps = ProofSystem::generate(&mut rng).unwrap();
        let mut document = serde_json::to_value(ps.export_verification_key()).unwrap();
        document["curve"] = "bls12381".into();

        assert!(matches!(
            VerificationKeyStore::from_document(document),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_load_keeps_document_verbatim() {
        let mut rng = StdRng::seed_from_u64(5);
        let ps = ProofSystem::generate(&mut rng).unwrap();
        let dir = tempfile::tempdir().unwrap();
        ps.save(dir.path()).unwrap();

        let path = dir.path().join(VERIFICATION_KEY_FILE);
        let mut document: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        // Fields the verifier ignores must still be served back.
        document["vk_alphabeta_12"] = serde_json::json!([["1", "2"]]);
        fs::write(&path, serde_json::to_string(&document).unwrap()).unwrap();

        let store = VerificationKeyStore::load(&path).unwrap();
        assert_eq!(store.document(), &document);
        assert_eq!(store.n_public(), 2);
        assert_eq!(store.prepared().vk, ps.verifying_key);
    }
}
