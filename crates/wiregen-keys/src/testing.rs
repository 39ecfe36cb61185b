//! Deterministic key service for tests.
//!
//! Enabled for downstream crates with the `test-util` feature.

use std::cell::Cell;

use crate::error::Result;
use crate::keys::{validate_key, KeyPair, PresharedKey, PrivateKey, KEY_SIZE};
use crate::service::KeyService;

/// Filler byte of generated private keys.
pub const PRIVATE_KEY_FILL: u8 = 0x5a;

/// Filler byte of generated pre-shared keys.
pub const PRESHARED_KEY_FILL: u8 = 0xa5;

fn seeded_bytes(n: u32, fill: u8) -> [u8; KEY_SIZE] {
    let mut bytes = [fill; KEY_SIZE];
    bytes[..4].copy_from_slice(&n.to_le_bytes());
    bytes
}

/// Key service that hands out predictable keys and counts its calls.
///
/// Keys carry their sequence number `n` (starting at 1) little-endian in the
/// first four bytes, with the rest filled by [`PRIVATE_KEY_FILL`] or
/// [`PRESHARED_KEY_FILL`], so no two keys of a run collide and none is all
/// zero. Public keys are derived with real Curve25519 arithmetic.
#[derive(Debug, Default)]
pub struct SeededKeyService {
    generated: Cell<u32>,
    derived: Cell<u32>,
    preshared: Cell<u32>,
}

impl SeededKeyService {
    /// Creates a fresh service with all counters at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `generate_key_pair` calls so far.
    #[must_use]
    pub fn generated_count(&self) -> u32 {
        self.generated.get()
    }

    /// Number of `derive_key_pair` calls so far.
    #[must_use]
    pub fn derived_count(&self) -> u32 {
        self.derived.get()
    }

    /// Number of `generate_preshared_key` calls so far.
    #[must_use]
    pub fn preshared_count(&self) -> u32 {
        self.preshared.get()
    }

    /// Total calls of any kind.
    #[must_use]
    pub fn total_calls(&self) -> u32 {
        self.generated_count() + self.derived_count() + self.preshared_count()
    }
}

impl KeyService for SeededKeyService {
    fn generate_key_pair(&self) -> Result<KeyPair> {
        let n = self.generated.get() + 1;
        self.generated.set(n);
        Ok(KeyPair::from_private_key(PrivateKey::from_bytes_array(
            seeded_bytes(n, PRIVATE_KEY_FILL),
        )))
    }

    fn derive_key_pair(&self, private_key: &str) -> Result<KeyPair> {
        self.derived.set(self.derived.get() + 1);
        validate_key(private_key)?;
        Ok(KeyPair::from_private_key(PrivateKey::from_base64(private_key)?))
    }

    fn generate_preshared_key(&self) -> Result<PresharedKey> {
        let n = self.preshared.get() + 1;
        self.preshared.set(n);
        Ok(PresharedKey::from_bytes_array(seeded_bytes(
            n,
            PRESHARED_KEY_FILL,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_reproducible() {
        let a = SeededKeyService::new();
        let b = SeededKeyService::new();
        for _ in 0..3 {
            assert_eq!(
                a.generate_key_pair().expect("a"),
                b.generate_key_pair().expect("b")
            );
        }
        assert_eq!(a.generated_count(), 3);
    }

    #[test]
    fn keys_stay_distinct_past_one_byte() {
        let service = SeededKeyService::new();
        let psks: Vec<_> = (0..300)
            .map(|_| service.generate_preshared_key().expect("psk").to_base64())
            .collect();
        let privates: Vec<_> = (0..300)
            .map(|_| {
                service
                    .generate_key_pair()
                    .expect("pair")
                    .private_key()
                    .to_base64()
            })
            .collect();
        let unique_psks: std::collections::HashSet<_> = psks.iter().collect();
        let unique_privates: std::collections::HashSet<_> = privates.iter().collect();
        assert_eq!(unique_psks.len(), 300);
        assert_eq!(unique_privates.len(), 300);
        assert!(privates.iter().all(|k| psks.iter().all(|p| p != k)));
        let zero = PrivateKey::from_bytes_array([0; KEY_SIZE]).to_base64();
        assert!(!privates.contains(&zero));
    }

    #[test]
    fn counts_each_kind_of_call() {
        let service = SeededKeyService::new();
        let pair = service.generate_key_pair().expect("generate");
        service
            .derive_key_pair(&pair.private_key().to_base64())
            .expect("derive");
        service.generate_preshared_key().expect("psk");
        assert_eq!(service.generated_count(), 1);
        assert_eq!(service.derived_count(), 1);
        assert_eq!(service.preshared_count(), 1);
        assert_eq!(service.total_calls(), 3);
    }
}
