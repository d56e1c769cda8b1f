use std::collections::HashSet;
use std::sync::OnceLock;

use rand::Rng;
use regex::Regex;
use tracing::debug;

use crate::errors::GenerationError;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 32;

const REFERENCE_PATTERN: &str = r"^LR[0-9]{6}[A-Z]$";

/// Issues `LR123456X`-style references, unique within one session.
///
/// Uniqueness is tracked in memory only; each generation run owns its own
/// instance, and cross-session collisions are the store's concern.
#[derive(Debug)]
pub struct ReferenceGenerator {
    issued: HashSet<String>,
    max_attempts: u32,
}

impl ReferenceGenerator {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            issued: HashSet::new(),
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn next(&mut self, rng: &mut dyn rand::RngCore) -> Result<String, GenerationError> {
        for attempt in 1..=self.max_attempts {
            let digits = rng.random_range(100_000..=999_999_u32);
            let letter = char::from(b'A' + rng.random_range(0..26_u8));
            let reference = format!("LR{digits}{letter}");
            if self.issued.insert(reference.clone()) {
                return Ok(reference);
            }
            debug!(reference = %reference, attempt, "reference collision");
        }

        Err(GenerationError::ReferenceCollisionExhausted {
            attempts: self.max_attempts,
        })
    }

    pub fn issued(&self) -> usize {
        self.issued.len()
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.issued.contains(reference)
    }
}

impl Default for ReferenceGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

/// Whether `value` has the fixed reference format.
pub fn is_valid_reference(value: &str) -> bool {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(REFERENCE_PATTERN).ok())
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Always yields the same bits, so every reference collides.
    struct ConstantRng;

    impl rand::RngCore for ConstantRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }
    }

    #[test]
    fn references_match_format_and_are_unique() {
        let mut generator = ReferenceGenerator::default();
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..2000 {
            let reference = generator.next(&mut rng).expect("reference");
            assert!(is_valid_reference(&reference), "bad reference {reference}");
        }
        assert_eq!(generator.issued(), 2000);
    }

    #[test]
    fn exhausted_retries_are_reported() {
        let mut generator = ReferenceGenerator::new(4);
        let mut rng = ConstantRng;
        let first = generator.next(&mut rng).expect("first reference");
        assert!(generator.contains(&first));

        let err = generator.next(&mut rng).expect_err("collision");
        assert!(matches!(
            err,
            GenerationError::ReferenceCollisionExhausted { attempts: 4 }
        ));
    }

    #[test]
    fn validates_reference_shape() {
        assert!(is_valid_reference("LR123456X"));
        assert!(!is_valid_reference("LR12345X"));
        assert!(!is_valid_reference("LR123456x"));
        assert!(!is_valid_reference("XX123456X"));
        assert!(!is_valid_reference("LR1234567X"));
    }
}
