pub mod circuit;
pub mod commitment;
pub mod encoding;
pub mod field;
pub mod keys;
pub mod proof;
pub mod snarkjs;

pub use circuit::PasswordCircuit;
pub use commitment::{commit, CommitmentScheme};
pub use encoding::encode;
pub use field::FieldElement;
pub use keys::VerificationKeyStore;
pub use proof::{generate_proof, load_proving_key, verify_proof, ProofSystem};
pub use snarkjs::{PublicSignals, SnarkjsProof, SnarkjsVerificationKey};
