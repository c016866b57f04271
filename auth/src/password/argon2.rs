use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::Error as PasswordHashError;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;

/// One-way salted password hashing.
///
/// Produces PHC strings (`$argon2id$v=19$m=..,t=..,p=..$<salt>$<digest>`) so
/// the algorithm, cost and salt travel with the digest and verification needs
/// nothing else. Verification compares digests in constant time.
#[derive(Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Hasher with the Argon2id recommended cost.
    pub fn new() -> Self {
        Self {
            params: Params::default(),
        }
    }

    /// Hasher with an explicit cost.
    ///
    /// # Arguments
    /// * `memory_kib` - Memory cost in KiB
    /// * `iterations` - Number of passes
    /// * `parallelism` - Degree of parallelism
    ///
    /// # Errors
    /// * `InvalidCost` - Parameters are outside the Argon2 bounds
    pub fn with_cost(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, PasswordError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| PasswordError::InvalidCost(e.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// # Errors
    /// * `HashingFailed` - The underlying primitive rejected the input
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Check a plaintext password against a stored PHC hash.
    ///
    /// A wrong password is `Ok(false)`, not an error. Cost and salt are read
    /// from `hash`, so hashes produced with a different cost still verify.
    ///
    /// # Errors
    /// * `InvalidHash` - `hash` is not a parseable PHC string
    /// * `VerificationFailed` - The primitive failed for a reason other than a mismatch
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;

        match self.argon2().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerificationFailed(e.to_string())),
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher() -> PasswordHasher {
        PasswordHasher::with_cost(8 * 1024, 1, 1).expect("valid cost")
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash("secret1").expect("Failed to hash password");

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("secret1", &hash).unwrap());
        assert!(!hasher.verify("secret1x", &hash).unwrap());
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = fast_hasher();
        let first = hasher.hash("same password").unwrap();
        let second = hasher.hash("same password").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("same password", &first).unwrap());
        assert!(hasher.verify("same password", &second).unwrap());
    }

    #[test]
    fn test_verify_reads_cost_from_hash() {
        let hash = fast_hasher().hash("pass_word").unwrap();
        assert!(hash.contains("m=8192,t=1,p=1"));

        // A default-cost hasher still verifies a cheaper hash.
        assert!(PasswordHasher::new().verify("pass_word", &hash).unwrap());
    }

    #[test]
    fn test_empty_password_round_trips() {
        let hasher = fast_hasher();
        let hash = hasher.hash("").unwrap();
        assert!(hasher.verify("", &hash).unwrap());
        assert!(!hasher.verify(" ", &hash).unwrap());
    }

    #[test]
    fn test_verify_invalid_hash() {
        let result = fast_hasher().verify("password", "invalid_hash");
        assert!(matches!(result, Err(PasswordError::InvalidHash(_))));
    }

    #[test]
    fn test_invalid_cost() {
        let result = PasswordHasher::with_cost(1, 0, 1);
        assert!(matches!(result, Err(PasswordError::InvalidCost(_))));
    }
}
