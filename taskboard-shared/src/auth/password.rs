/// Credential storage
///
/// The persistence adapter never writes a raw password itself; it passes it
/// through a [`PasswordEncoder`]. Two encoders exist:
///
/// - [`PlaintextEncoder`]: stores the password unchanged. This is the default
///   and is NOT suitable for production.
/// - [`Argon2Encoder`]: Argon2id, 64 MB memory, 3 iterations, 4 lanes.
///
/// Switching encoders only changes how new users are stored; call sites stay
/// the same.
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::password::{Argon2Encoder, PasswordEncoder};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let encoder = Argon2Encoder;
/// let stored = encoder.encode("hunter2")?;
///
/// assert!(encoder.verify("hunter2", &stored)?);
/// assert!(!encoder.verify("hunter3", &stored)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};
use std::str::FromStr;
use std::sync::Arc;

use super::token::constant_time_compare;

/// Error type for credential encoding operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Turns raw passwords into stored credentials and checks them later
pub trait PasswordEncoder: Send + Sync {
    /// Produces the value written to `users.password`
    fn encode(&self, raw: &str) -> Result<String, PasswordError>;

    /// Checks a raw password against a stored value
    fn verify(&self, raw: &str, stored: &str) -> Result<bool, PasswordError>;
}

/// Stores passwords as given
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaintextEncoder;

impl PasswordEncoder for PlaintextEncoder {
    fn encode(&self, raw: &str) -> Result<String, PasswordError> {
        Ok(raw.to_string())
    }

    fn verify(&self, raw: &str, stored: &str) -> Result<bool, PasswordError> {
        Ok(constant_time_compare(raw, stored))
    }
}

/// Stores Argon2id hashes in PHC string format
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Encoder;

impl PasswordEncoder for Argon2Encoder {
    fn encode(&self, raw: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        let params = ParamsBuilder::new()
            .m_cost(65536) // 64 MB
            .t_cost(3)
            .p_cost(4)
            .output_len(32)
            .build()
            .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

        let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

        let hash = argon2
            .hash_password(raw.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

        Ok(hash.to_string())
    }

    fn verify(&self, raw: &str, stored: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(stored)
            .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

        // A PHC string may legally omit salt and output; neither can be verified.
        if parsed_hash.hash.is_none() || parsed_hash.salt.is_none() {
            return Err(PasswordError::InvalidHash(
                "Hash has no salt or output".to_string(),
            ));
        }

        // Parameters are embedded in the hash.
        match Argon2::default().verify_password(raw.as_bytes(), &parsed_hash) {
            Ok(_) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerifyError(format!("Verification failed: {}", e))),
        }
    }
}

/// Which encoder new credentials go through
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PasswordStorage {
    /// [`PlaintextEncoder`]
    #[default]
    Plain,

    /// [`Argon2Encoder`]
    Argon2,
}

impl PasswordStorage {
    /// Builds the encoder for this storage mode
    pub fn encoder(&self) -> Arc<dyn PasswordEncoder> {
        match self {
            PasswordStorage::Plain => Arc::new(PlaintextEncoder),
            PasswordStorage::Argon2 => Arc::new(Argon2Encoder),
        }
    }
}

impl FromStr for PasswordStorage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plain" | "plaintext" => Ok(PasswordStorage::Plain),
            "argon2" | "argon2id" => Ok(PasswordStorage::Argon2),
            other => Err(format!("unknown password storage: {}", other)),
        }
    }
}
