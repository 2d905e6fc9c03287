//! Conformance trials against the KEM contract.
//!
//! Mirrors the classic `test_vectors` flow: generate a keypair, encapsulate,
//! decapsulate, require both sides to agree, then decapsulate a
//! pseudo-random ciphertext of the correct length and record the implicitly
//! rejected secret. Trials are strictly sequential; the shared generator
//! state advancing across them is what makes the whole transcript
//! reproducible, not just each trial in isolation.

use core::fmt;
use std::io::{self, Write};

use ml_kem::kem::{Decapsulate, Encapsulate};
use ml_kem::{Ciphertext, Encoded, EncodedSizeUser, KemCore, SharedKey};
use rand_core::CryptoRngCore;

/// First failure observed by [`run`].
#[derive(Debug)]
pub enum HarnessError {
    /// Decapsulation of an honest ciphertext disagreed with encapsulation.
    /// A hard correctness bug in the KEM; the run aborts immediately.
    SharedSecretMismatch {
        /// Zero-based index of the failing trial.
        trial: usize,
    },
    /// The report sink failed.
    Io(io::Error),
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SharedSecretMismatch { trial } => {
                write!(f, "shared secret mismatch in trial {trial}")
            }
            Self::Io(err) => write!(f, "report output failed: {err}"),
        }
    }
}

impl std::error::Error for HarnessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::SharedSecretMismatch { .. } => None,
        }
    }
}

impl From<io::Error> for HarnessError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// The KEM contract promises totality; `ml-kem`'s impls never return `Err`
/// (its `Error = ()` is an upstream placeholder for `Infallible`).
fn infallible<T>(result: Result<T, ()>) -> T {
    match result {
        Ok(value) => value,
        Err(()) => unreachable!("KEM operations are total"),
    }
}

/// Artifacts of one completed trial.
///
/// All buffers are fixed-length per the KEM's published constants and live
/// only for the trial; the generator cursor is the sole cross-trial state.
pub struct Trial<K: KemCore> {
    pub public_key: Encoded<K::EncapsulationKey>,
    pub secret_key: Encoded<K::DecapsulationKey>,
    pub ciphertext: Ciphertext<K>,
    /// Shared secret B, produced by encapsulation.
    pub key_from_encapsulator: SharedKey<K>,
    /// Shared secret A, recovered by decapsulation.
    pub key_from_decapsulator: SharedKey<K>,
    /// Decapsulation of a generator-random ciphertext. Recorded for the
    /// transcript, never compared against anything.
    pub pseudorandom_key: SharedKey<K>,
}

impl<K> Trial<K>
where
    K: KemCore,
    K::EncapsulationKey: Encapsulate<Ciphertext<K>, SharedKey<K>, Error = ()>,
    K::DecapsulationKey: Decapsulate<Ciphertext<K>, SharedKey<K>, Error = ()>,
{
    /// Run one full cycle, drawing every coin from `rng`.
    ///
    /// The corrupted-ciphertext bytes continue the same stream the KEM drew
    /// its coins from, so the trial consumes a fixed, reproducible span of
    /// generator output.
    pub fn execute(rng: &mut impl CryptoRngCore) -> Self {
        let (dk, ek) = K::generate(rng);
        let (ciphertext, key_from_encapsulator) = infallible(ek.encapsulate(rng));
        let key_from_decapsulator = infallible(dk.decapsulate(&ciphertext));

        let mut garbage = Ciphertext::<K>::default();
        rng.fill_bytes(&mut garbage[..]);
        let pseudorandom_key = infallible(dk.decapsulate(&garbage));

        Self {
            public_key: ek.as_bytes(),
            secret_key: dk.as_bytes(),
            ciphertext,
            key_from_encapsulator,
            key_from_decapsulator,
            pseudorandom_key,
        }
    }

    /// Honest encapsulation and decapsulation agreed byte for byte.
    #[must_use]
    pub fn secrets_agree(&self) -> bool {
        self.key_from_encapsulator[..] == self.key_from_decapsulator[..]
    }

    /// Write the six hex lines of the classic test-vector transcript.
    pub fn write_report(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "Public Key: {}", hex::encode(&self.public_key[..]))?;
        writeln!(out, "Secret Key: {}", hex::encode(&self.secret_key[..]))?;
        writeln!(out, "Ciphertext: {}", hex::encode(&self.ciphertext[..]))?;
        writeln!(
            out,
            "Shared Secret B: {}",
            hex::encode(&self.key_from_encapsulator[..])
        )?;
        writeln!(
            out,
            "Shared Secret A: {}",
            hex::encode(&self.key_from_decapsulator[..])
        )?;
        writeln!(
            out,
            "Pseudorandom shared Secret A: {}",
            hex::encode(&self.pseudorandom_key[..])
        )?;
        Ok(())
    }
}

/// Execute `trials` sequential trials, streaming each report to `out`.
///
/// Aborts on the first shared-secret mismatch with the failing trial index;
/// no retries. A random-ciphertext decapsulation that merely disagrees with
/// the honest secret is not a failure — the contract only requires it to
/// complete with a fixed-length result.
pub fn run<K, R, W>(trials: usize, rng: &mut R, out: &mut W) -> Result<(), HarnessError>
where
    K: KemCore,
    K::EncapsulationKey: Encapsulate<Ciphertext<K>, SharedKey<K>, Error = ()>,
    K::DecapsulationKey: Decapsulate<Ciphertext<K>, SharedKey<K>, Error = ()>,
    R: CryptoRngCore,
    W: Write,
{
    for trial in 0..trials {
        let record = Trial::<K>::execute(rng);
        record.write_report(out)?;
        if !record.secrets_agree() {
            return Err(HarnessError::SharedSecretMismatch { trial });
        }
    }
    Ok(())
}
