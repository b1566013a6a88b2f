//! Password authentication by zero-knowledge proof.
//!
//! A client proves it knows a password whose Poseidon commitment equals a
//! published value; the server checks the Groth16 proof and the circuit's
//! result signal without ever seeing the password.

pub mod api;
pub mod auth;
pub mod config;
pub mod crypto;
pub mod error;
