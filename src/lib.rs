//! Deterministic test-vector generation and conformance checking for ML-KEM.
//!
//! Two pieces, consumed in sequence: [`VectorRng`], a Keccak-sponge byte
//! stream seeded from a fixed constant so every coin the KEM draws is
//! reproducible, and [`harness::run`], which drives
//! keypair/encapsulate/decapsulate trials against the KEM contract and
//! emits the classic hex transcript for capture as golden vectors.
//!
//! The KEM itself (RustCrypto `ml-kem`) and the Keccak permutation
//! (`keccak`) are external collaborators; nothing here reimplements them.

#![deny(unsafe_code)]

pub mod generator;
pub mod harness;

pub use generator::{KeccakF1600, Permutation, VectorRng, SHAKE128_RATE};
pub use harness::{run, HarnessError, Trial};
