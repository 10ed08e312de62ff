use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Length of passwords produced by [`generate_password`]
pub const GENERATED_PASSWORD_LENGTH: usize = 16;

#[derive(Debug, thiserror::Error)]
#[error("Password hashing failed: {0}")]
pub struct HashError(pub String);

impl From<argon2::password_hash::Error> for HashError {
    fn from(err: argon2::password_hash::Error) -> Self {
        HashError(err.to_string())
    }
}

/// One-way password hashing
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, HashError>;

    fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, HashError>;
}

/// Argon2id with a random 16-byte salt, PHC string output
#[derive(Default)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<String, HashError> {
        let mut salt = [0u8; 16];
        rand::thread_rng().fill(&mut salt[..]);
        let salt = SaltString::encode_b64(&salt)?;
        let hash = self.argon2.hash_password(plaintext.as_bytes(), &salt)?;
        Ok(hash.to_string())
    }

    fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, HashError> {
        let parsed = PasswordHash::new(hash)?;
        match self.argon2.verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Alphabet for generated passwords.
///
/// `LegacyRange` is every code point from '0' to 'z', which also admits
/// `:;<=>?@[\]^_` and the backtick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordCharset {
    Alphanumeric,
    LegacyRange,
}

impl PasswordCharset {
    pub fn contains(&self, c: char) -> bool {
        match self {
            PasswordCharset::Alphanumeric => c.is_ascii_alphanumeric(),
            PasswordCharset::LegacyRange => ('0'..='z').contains(&c),
        }
    }

    fn sample(&self, rng: &mut impl Rng) -> char {
        match self {
            PasswordCharset::Alphanumeric => char::from(rng.sample(Alphanumeric)),
            PasswordCharset::LegacyRange => rng.gen_range('0'..='z'),
        }
    }
}

impl FromStr for PasswordCharset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "alphanumeric" => Ok(PasswordCharset::Alphanumeric),
            "legacy" | "legacy_range" => Ok(PasswordCharset::LegacyRange),
            other => Err(format!("unknown password charset: {}", other)),
        }
    }
}

pub fn generate_password(charset: PasswordCharset) -> String {
    let mut rng = rand::thread_rng();
    (0..GENERATED_PASSWORD_LENGTH)
        .map(|_| charset.sample(&mut rng))
        .collect()
}
