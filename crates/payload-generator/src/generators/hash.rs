//! Random BLAKE2b-256 digests.
//!
//! A 128-byte buffer is filled from the random source and hashed. When the
//! source fails to produce bytes the failure is logged and a zero-filled
//! buffer is hashed instead; the call itself never fails.

use bech32::{Bech32, Hrp};
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use rand::RngCore;
use tracing::warn;

/// Size of the entropy buffer fed into the hash.
pub const ENTROPY_BUFFER_LEN: usize = 128;

/// Human-readable part used for the bech32 form.
pub const BECH32_HRP: &str = "ed25519_pk";

type Blake2b256 = Blake2b<U32>;

/// Hash 128 random bytes with BLAKE2b-256.
pub fn blake2b256<R: RngCore + ?Sized>(rng: &mut R) -> [u8; 32] {
    let mut buf = [0u8; ENTROPY_BUFFER_LEN];
    if let Err(err) = rng.try_fill_bytes(&mut buf) {
        warn!(error = %err, "Error while generating random bytes, hashing zero-filled buffer");
        buf = [0u8; ENTROPY_BUFFER_LEN];
    }

    let digest = Blake2b256::digest(buf);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// Random digest as 64 lowercase hex characters.
pub fn blake2b256_hex<R: RngCore + ?Sized>(rng: &mut R) -> String {
    hex::encode(blake2b256(rng))
}

/// Random digest bech32-encoded under [`BECH32_HRP`].
pub fn blake2b256_bech32<R: RngCore + ?Sized>(rng: &mut R) -> String {
    let digest = blake2b256(rng);
    // 32 bytes under a 10-character prefix stays within the bech32 length limit.
    bech32::encode::<Bech32>(Hrp::parse_unchecked(BECH32_HRP), &digest).unwrap_or_else(|err| {
        warn!(error = %err, "Failed to bech32-encode digest");
        String::new()
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Generator whose fallible fill always fails.
    pub(crate) struct FailingRng;

    impl RngCore for FailingRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0xAB);
        }

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            Err(rand::Error::new("entropy source unavailable"))
        }
    }

    fn zero_digest() -> [u8; 32] {
        let digest = Blake2b256::digest([0u8; ENTROPY_BUFFER_LEN]);
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest);
        out
    }

    #[test]
    fn test_hex_digest_shape() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let s = blake2b256_hex(&mut rng);
            assert_eq!(s.len(), 64);
            assert!(s
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        }
    }

    #[test]
    fn test_digests_vary() {
        let mut rng = StdRng::seed_from_u64(42);
        assert_ne!(blake2b256(&mut rng), blake2b256(&mut rng));
    }

    #[test]
    fn test_entropy_failure_hashes_zero_buffer() {
        let mut rng = FailingRng;
        assert_eq!(blake2b256(&mut rng), zero_digest());
        assert_eq!(blake2b256_hex(&mut rng), hex::encode(zero_digest()));
    }

    #[test]
    fn test_bech32_prefix_and_roundtrip() {
        let mut rng = StdRng::seed_from_u64(42);
        let encoded = blake2b256_bech32(&mut rng);
        assert!(encoded.starts_with("ed25519_pk1"));

        let (hrp, data) = bech32::decode(&encoded).unwrap();
        assert_eq!(hrp.as_str(), BECH32_HRP);
        assert_eq!(data.len(), 32);
    }
}
