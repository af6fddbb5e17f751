//! ID generation utilities.

use rand::Rng;
use ulid::Ulid;

/// Generates row ids and handoff verification codes.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// A fresh row id.
    ///
    /// Lowercased ULID: ids sort by creation time, so `ORDER BY id` reads
    /// as chronological order and keyset pagination works on the id column
    /// alone.
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// A six-digit handoff verification code.
    ///
    /// The code is a social check read aloud at the in-person handoff; it
    /// carries no further system semantics.
    #[must_use]
    pub fn generate_verification_code(&self) -> String {
        let code: u32 = rand::thread_rng().gen_range(100_000..=999_999);
        code.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_lowercase_and_unique() {
        let id_gen = IdGenerator::new();
        let a = id_gen.generate();
        let b = id_gen.generate();

        assert_eq!(a.len(), 26);
        assert_ne!(a, b);
        assert_eq!(a, a.to_lowercase());
    }

    #[test]
    fn test_verification_code_is_six_digits() {
        let id_gen = IdGenerator::new();
        for _ in 0..100 {
            let code = id_gen.generate_verification_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            assert_ne!(code.as_bytes()[0], b'0');
        }
    }
}
