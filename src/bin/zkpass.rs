//! zkpass: client-side tooling for ZK password authentication.
//!
//! Computes commitments, generates proofs for `POST /authenticate`, checks
//! proofs locally, and runs the development trusted setup that produces the
//! key artifacts. The password never leaves this process.

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use rand::rngs::OsRng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zk_password_auth::{
    auth::{AuthenticateRequest, AuthenticationService, Outcome, RejectReason},
    crypto::{
        encode, generate_proof, load_proving_key,
        proof::{PROVING_KEY_FILE, VERIFICATION_KEY_FILE},
        CommitmentScheme, FieldElement, ProofSystem, VerificationKeyStore,
    },
    error::AppError,
};

/// Zero-knowledge password authentication client.
#[derive(Parser, Debug)]
#[command(name = "zkpass", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Generate proving and verification keys (development only).
    Setup {
        /// Directory for proving_key.bin and verification_key.json.
        #[arg(long, default_value = "build")]
        out_dir: PathBuf,
        /// Overwrite existing keys.
        #[arg(long)]
        force: bool,
    },
    /// Print the commitment (expected hash) for a password.
    Hash {
        /// Password; read from stdin when omitted.
        password: Option<String>,
        /// Commitment scheme. Only `poseidon` is accepted by the circuit.
        #[arg(long, default_value_t = CommitmentScheme::Poseidon)]
        scheme: CommitmentScheme,
    },
    /// Generate a proof and public signals for `POST /authenticate`.
    Prove {
        /// Password; read from stdin when omitted.
        #[arg(long)]
        password: Option<String>,
        /// Published commitment, as a decimal string.
        #[arg(long)]
        expected_hash: FieldElement,
        #[arg(long, default_value = "build/proving_key.bin")]
        proving_key: PathBuf,
    },
    /// Verify a `{proof, publicSignals}` document locally.
    Verify {
        #[arg(long, default_value = "build/verification_key.json")]
        verification_key: PathBuf,
        /// JSON file as printed by `zkpass prove`.
        #[arg(long)]
        input: PathBuf,
    },
}

fn main() -> Result<(), AppError> {
    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match Cli::parse().command {
        Commands::Setup { out_dir, force } => setup(&out_dir, force),
        Commands::Hash { password, scheme } => {
            let password = read_password(password)?;
            let hash = scheme.commit(&encode(&password))?;
            println!("{}", hash);
            Ok(())
        }
        Commands::Prove {
            password,
            expected_hash,
            proving_key,
        } => prove(read_password(password)?, expected_hash, &proving_key),
        Commands::Verify {
            verification_key,
            input,
        } => verify(&verification_key, &input),
    }
}

fn read_password(password: Option<String>) -> Result<String, AppError> {
    if let Some(password) = password {
        return Ok(password);
    }

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn setup(out_dir: &Path, force: bool) -> Result<(), AppError> {
    let existing = [PROVING_KEY_FILE, VERIFICATION_KEY_FILE]
        .iter()
        .any(|name| out_dir.join(name).exists());
    if existing && !force {
        return Err(AppError::Config(format!(
            "Keys already exist in {} (use --force to overwrite)",
            out_dir.display()
        )));
    }

    eprintln!("Generating keys (one-time trusted setup)...");
    let ps = ProofSystem::generate(&mut OsRng)?;
    ps.save(out_dir)?;
    eprintln!("Keys written to {}", out_dir.display());
    Ok(())
}

fn prove(password: String, expected_hash: FieldElement, proving_key: &Path) -> Result<(), AppError> {
    let pk = load_proving_key(proving_key)?;

    eprintln!("Generating proof (this may take a while)...");
    let (proof, public_signals) = generate_proof(encode(&password), expected_hash, &pk, &mut OsRng)?;

    if !public_signals.get(0).map(FieldElement::is_one).unwrap_or(false) {
        tracing::warn!("password does not match the expected hash; the server will reject this proof");
    }

    let request = AuthenticateRequest {
        proof: Some(proof),
        public_signals: Some(public_signals),
    };
    println!("{}", serde_json::to_string_pretty(&request)?);
    Ok(())
}

fn verify(verification_key: &Path, input: &Path) -> Result<(), AppError> {
    let store = VerificationKeyStore::load(verification_key)?;
    let request: AuthenticateRequest = serde_json::from_str(&std::fs::read_to_string(input)?)?;

    let submission = AuthenticationService::validate(request).map_err(|reason| match reason {
        RejectReason::Malformed(msg) => AppError::Validation(msg),
        other => AppError::Validation(format!("{:?}", other)),
    })?;

    let outcome = AuthenticationService::new(Arc::new(store)).verify(&submission);
    if let Outcome::Errored(msg) = &outcome {
        return Err(AppError::Verification(msg.clone()));
    }

    println!(
        "{}",
        serde_json::json!({
            "valid": outcome.proof_verified(),
            "authenticated": outcome == Outcome::Accepted,
            "outcome": outcome.label(),
        })
    );
    Ok(())
}
