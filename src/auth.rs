//! Authentication decisions.
//!
//! A request moves `Validating -> Verifying -> {Accepted, Rejected, Errored}`.
//! Validation failures are client mistakes and end in `Rejected` with a
//! [`RejectReason::Malformed`]; the verifier failing on structurally bad input
//! ends in `Errored`. Only a proof that verifies *and* carries `"1"` in public
//! signal 0 is `Accepted`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::crypto::circuit::RESULT_SIGNAL;
use crate::crypto::keys::VerificationKeyStore;
use crate::crypto::proof::verify_proof;
use crate::crypto::snarkjs::{PublicSignals, SnarkjsProof};
use crate::error::AppError;

/// `POST /authenticate` body. Both fields are optional at the schema level so
/// that a missing field is reported as such rather than as a parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AuthenticateRequest {
    pub proof: Option<SnarkjsProof>,
    pub public_signals: Option<PublicSignals>,
}

/// A request that passed validation.
#[derive(Debug, Clone)]
pub struct Submission {
    pub proof: SnarkjsProof,
    pub public_signals: PublicSignals,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The request did not carry a usable proof and public signals.
    Malformed(String),
    /// The pairing check failed.
    InvalidProof,
    /// The proof verified but the circuit's equality check evaluated to false.
    ResultBitNotSet,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Accepted,
    Rejected(RejectReason),
    Errored(String),
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Accepted => "accepted",
            Outcome::Rejected(RejectReason::Malformed(_)) => "malformed",
            Outcome::Rejected(_) => "rejected",
            Outcome::Errored(_) => "errored",
        }
    }

    /// Whether the pairing check passed, independent of the result bit.
    pub fn proof_verified(&self) -> bool {
        matches!(
            self,
            Outcome::Accepted | Outcome::Rejected(RejectReason::ResultBitNotSet)
        )
    }

    /// Map a terminal state onto the error taxonomy used for responses.
    pub fn into_result(self) -> Result<(), AppError> {
        match self {
            Outcome::Accepted => Ok(()),
            Outcome::Rejected(RejectReason::Malformed(msg)) => Err(AppError::Validation(msg)),
            Outcome::Rejected(RejectReason::InvalidProof) => {
                Err(AppError::Rejected("proof did not verify".to_string()))
            }
            Outcome::Rejected(RejectReason::ResultBitNotSet) => Err(AppError::Rejected(
                "public signal 0 is not 1".to_string(),
            )),
            Outcome::Errored(msg) => Err(AppError::Verification(msg)),
        }
    }
}

/// Stateless verifier; the only shared state is the immutable key store.
#[derive(Clone)]
pub struct AuthenticationService {
    keys: Arc<VerificationKeyStore>,
}

impl AuthenticationService {
    pub fn new(keys: Arc<VerificationKeyStore>) -> Self {
        AuthenticationService { keys }
    }

    pub fn validate(request: AuthenticateRequest) -> Result<Submission, RejectReason> {
        let (proof, public_signals) = match (request.proof, request.public_signals) {
            (Some(proof), Some(public_signals)) => (proof, public_signals),
            _ => {
                return Err(RejectReason::Malformed(
                    "Proof and public signals are required".to_string(),
                ))
            }
        };

        if public_signals.is_empty() {
            return Err(RejectReason::Malformed(
                "Public signals must not be empty".to_string(),
            ));
        }

        Ok(Submission {
            proof,
            public_signals,
        })
    }

    /// Run the pairing check and the acceptance policy. CPU-bound.
    pub fn verify(&self, submission: &Submission) -> Outcome {
        let valid = match verify_proof(
            self.keys.prepared(),
            &submission.public_signals,
            &submission.proof,
        ) {
            Ok(valid) => valid,
            Err(e) => return Outcome::Errored(e.to_string()),
        };

        if !valid {
            return Outcome::Rejected(RejectReason::InvalidProof);
        }

        match submission.public_signals.get(RESULT_SIGNAL) {
            Some(bit) if bit.is_one() => Outcome::Accepted,
            _ => Outcome::Rejected(RejectReason::ResultBitNotSet),
        }
    }

    /// Validate, then verify on the blocking pool so slow pairings do not
    /// hold up the async workers.
    pub async fn authenticate(&self, request: AuthenticateRequest) -> Outcome {
        let submission = match Self::validate(request) {
            Ok(submission) => submission,
            Err(reason) => return Outcome::Rejected(reason),
        };

        tracing::debug!(
            signals = submission.public_signals.len(),
            "Verifying authentication proof"
        );

        let service = self.clone();
        let outcome =
            match tokio::task::spawn_blocking(move || service.verify(&submission)).await {
                Ok(outcome) => outcome,
                Err(e) => Outcome::Errored(format!("Verification task failed: {}", e)),
            };

        match &outcome {
            Outcome::Accepted => tracing::info!(outcome = outcome.label(), "Authentication succeeded"),
            Outcome::Rejected(reason) => {
                tracing::info!(outcome = outcome.label(), reason = ?reason, "Authentication rejected")
            }
            Outcome::Errored(err) => {
                tracing::error!(outcome = outcome.label(), error = %err, "Authentication errored")
            }
        }

        outcome
    }
}
