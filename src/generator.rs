//! Deterministic byte stream for test-vector generation.
//!
//! A Keccak-f[1600] sponge squeezed at the SHAKE-128 rate, seeded once from
//! a fixed padding pattern. Every instance emits the same byte sequence, so
//! transcripts built on top of it are bit-identical across runs and
//! implementations. This is the classic SUPERCOP `randombytes` for
//! deterministic test vectors, not a production RNG.

use core::marker::PhantomData;

use rand_core::{CryptoRng, RngCore};

/// SHAKE-128 byte rate: state bytes emitted per permutation call.
pub const SHAKE128_RATE: usize = 168;

const PLEN: usize = 25;

/// In-place transformation of the 1600-bit sponge state.
///
/// The sponge bookkeeping only needs a deterministic state-to-state map, so
/// tests can substitute a trivial permutation and observe the cursor logic
/// in isolation.
pub trait Permutation {
    fn permute(state: &mut [u64; PLEN]);
}

/// Keccak-f[1600], the real permutation.
pub struct KeccakF1600;

impl Permutation for KeccakF1600 {
    #[inline]
    fn permute(state: &mut [u64; PLEN]) {
        keccak::f1600(state);
    }
}

/// Seeded pseudo-random byte source backed by a sponge in squeeze mode.
///
/// `offset` is the byte cursor into the rate window of `state`, in
/// `[0, SHAKE128_RATE]`; `offset == SHAKE128_RATE` means the window is
/// exhausted and the next read permutes first. The cursor persists across
/// requests, so arbitrarily sized, non-rate-aligned reads see one
/// continuous stream.
pub struct VectorRng<P: Permutation = KeccakF1600> {
    state: [u64; PLEN],
    offset: usize,
    _permutation: PhantomData<P>,
}

impl<P: Permutation> VectorRng<P> {
    /// The fixed initial condition: SHAKE-128 padding absorbed over an
    /// empty message (`0x1F` at byte 0, `0x80` at byte `RATE - 1`), cursor
    /// pre-exhausted so the first read never emits the seed pattern itself.
    ///
    /// The resulting stream is the SHAKE-128 XOF of the empty string; any
    /// reimplementation must reproduce it byte for byte.
    #[must_use]
    pub fn seeded() -> Self {
        let mut state = [0u64; PLEN];
        state[0] = 0x1F;
        state[SHAKE128_RATE / 8 - 1] = 1 << 63;
        Self {
            state,
            offset: SHAKE128_RATE,
            _permutation: PhantomData,
        }
    }

    /// Fill `out` with the next bytes of the stream.
    ///
    /// Total over every request length, including zero. Bytes are read
    /// little-endian from the state words; no state offset is emitted twice
    /// without an intervening permutation.
    pub fn fill(&mut self, out: &mut [u8]) {
        let mut pos = 0;
        while pos < out.len() {
            while self.offset < SHAKE128_RATE && pos < out.len() {
                out[pos] = (self.state[self.offset / 8] >> (8 * (self.offset % 8))) as u8;
                self.offset += 1;
                pos += 1;
            }
            if self.offset == SHAKE128_RATE {
                P::permute(&mut self.state);
                self.offset = 0;
            }
        }
    }
}

impl<P: Permutation> Default for VectorRng<P> {
    fn default() -> Self {
        Self::seeded()
    }
}

impl<P: Permutation> RngCore for VectorRng<P> {
    fn next_u32(&mut self) -> u32 {
        rand_core::impls::next_u32_via_fill(self)
    }

    fn next_u64(&mut self) -> u64 {
        rand_core::impls::next_u64_via_fill(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.fill(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill(dest);
        Ok(())
    }
}

// Marker only so the KEM accepts this as its coin source. The stream is
// meant to be reproducible by everyone; do not use it for real key material.
impl<P: Permutation> CryptoRng for VectorRng<P> {}

#[cfg(test)]
mod tests {
    use super::*;

    /// Adds one to every word; enough to make permutation boundaries
    /// observable without real Keccak.
    struct Increment;

    impl Permutation for Increment {
        fn permute(state: &mut [u64; PLEN]) {
            for word in state.iter_mut() {
                *word = word.wrapping_add(1);
            }
        }
    }

    #[test]
    fn first_request_permutes_before_emitting() {
        let mut rng = VectorRng::<Increment>::seeded();
        let mut out = [0u8; 8];
        rng.fill(&mut out);
        // Word 0 held the 0x1F pad; one increment makes 0x20, read LE.
        assert_eq!(out, 0x20u64.to_le_bytes());
    }

    #[test]
    fn high_rate_bytes_read_little_endian() {
        let mut rng = VectorRng::<Increment>::seeded();
        let mut out = [0u8; SHAKE128_RATE];
        rng.fill(&mut out);
        // Last rate word held 1 << 63; one increment later its LE bytes
        // close the window.
        assert_eq!(out[160..], ((1u64 << 63) + 1).to_le_bytes()[..]);
    }

    #[test]
    fn second_block_reflects_second_permutation() {
        let mut rng = VectorRng::<Increment>::seeded();
        let mut block = [0u8; SHAKE128_RATE];
        rng.fill(&mut block);
        let mut next = [0u8; 8];
        rng.fill(&mut next);
        assert_eq!(next, 0x21u64.to_le_bytes());
    }

    #[test]
    fn zero_length_request_is_a_no_op() {
        let mut touched = VectorRng::<Increment>::seeded();
        let mut fresh = VectorRng::<Increment>::seeded();
        touched.fill(&mut []);

        let mut a = [0u8; 16];
        let mut b = [0u8; 16];
        touched.fill(&mut a);
        fresh.fill(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn chunked_reads_match_one_shot() {
        let mut chunked = VectorRng::<Increment>::seeded();
        let mut oneshot = VectorRng::<Increment>::seeded();

        let mut a = [0u8; SHAKE128_RATE + 1];
        let mut b = [0u8; SHAKE128_RATE + 1];
        chunked.fill(&mut a[..SHAKE128_RATE]);
        chunked.fill(&mut a[SHAKE128_RATE..]);
        oneshot.fill(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn rng_core_words_draw_from_the_stream() {
        let mut words = VectorRng::<Increment>::seeded();
        let mut bytes = VectorRng::<Increment>::seeded();

        let mut buf = [0u8; 4];
        bytes.fill(&mut buf);
        assert_eq!(words.next_u32(), u32::from_le_bytes(buf));

        let mut buf = [0u8; 8];
        bytes.fill(&mut buf);
        assert_eq!(words.next_u64(), u64::from_le_bytes(buf));
    }
}
