//! Shared test utilities for domain testing
//!
//! - [`TestDatabase`]: PostgreSQL container with the schema migrated
//! - [`TestRedis`]: Redis container
//! - [`TestDataBuilder`]: deterministic test data generation
//!
//! Container-backed tests are gated behind `#[ignore]` in the domain crates
//! so the default test run stays hermetic; run them with
//! `cargo test -- --ignored` where Docker is available.

mod postgres;
mod redis;

pub use postgres::TestDatabase;
pub use redis::TestRedis;

use uuid::Uuid;

/// Builder for test data with deterministic randomization.
///
/// Seeded from the test name so reruns produce the same ids and names.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Derive a seed from the test name.
    pub fn from_test_name(name: &str) -> Self {
        let seed = name
            .bytes()
            .fold(0xcbf2_9ce4_8422_2325u64, |acc, b| {
                (acc ^ b as u64).wrapping_mul(0x1000_0000_01b3)
            });
        Self { seed }
    }

    /// A uuid derived from the seed and a counter-like tag.
    pub fn id(&self, tag: &str) -> Uuid {
        let mut bytes = [0u8; 16];
        let mixed = tag
            .bytes()
            .fold(self.seed, |acc, b| (acc ^ b as u64).wrapping_mul(0x100_0193));
        bytes[..8].copy_from_slice(&mixed.to_be_bytes());
        bytes[8..].copy_from_slice(&self.seed.to_be_bytes());
        Uuid::from_bytes(bytes)
    }

    /// A readable unique name like `prefix-suffix-1a2b3c`.
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("{}-{}-{:06x}", prefix, suffix, self.seed & 0xff_ffff)
    }

    /// A unique email address under example.com.
    pub fn email(&self, local: &str) -> String {
        format!("{}-{:06x}@example.com", local, self.seed & 0xff_ffff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_is_deterministic() {
        let a = TestDataBuilder::from_test_name("my_test");
        let b = TestDataBuilder::from_test_name("my_test");
        assert_eq!(a.id("user"), b.id("user"));
        assert_eq!(a.email("alice"), b.email("alice"));
    }

    #[test]
    fn test_builder_varies_by_name() {
        let a = TestDataBuilder::from_test_name("test_a");
        let b = TestDataBuilder::from_test_name("test_b");
        assert_ne!(a.id("user"), b.id("user"));
    }

    #[test]
    fn test_builder_varies_by_tag() {
        let a = TestDataBuilder::from_test_name("my_test");
        assert_ne!(a.id("user"), a.id("product"));
    }
}
