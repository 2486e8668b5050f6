//! Ed25519 keys and their NEAR string encodings.
//!
//! Public keys are written as `ed25519:<base58>`. Secret keys use the same
//! prefix over the 64-byte `secret ‖ public` concatenation, matching what the
//! wallet and the key store files expect.

use crate::errors::CoreError;
use ed25519_dalek::{Keypair as DalekKeypair, PublicKey as DalekPublicKey, SecretKey, Signer, Verifier};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const PUBLIC_KEY_LENGTH: usize = 32;
const SECRET_KEY_LENGTH: usize = 32;
const SIGNATURE_LENGTH: usize = 64;

/// Supported key algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    /// Ed25519, the only curve NEAR Shell generates keys for
    Ed25519,
}

impl KeyType {
    /// Tag used in the borsh encoding of keys and signatures.
    pub fn wire_tag(self) -> u8 {
        match self {
            KeyType::Ed25519 => 0,
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyType::Ed25519 => f.write_str("ed25519"),
        }
    }
}

impl FromStr for KeyType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ed25519" => Ok(KeyType::Ed25519),
            other => Err(CoreError::UnsupportedKeyType(other.to_string())),
        }
    }
}

/// Splits `type:data` into its parts; a bare string is an ed25519 key.
fn split_key_string(s: &str) -> Result<(KeyType, &str), CoreError> {
    match s.split_once(':') {
        Some((key_type, data)) => Ok((key_type.parse()?, data)),
        None => Ok((KeyType::Ed25519, s)),
    }
}

fn decode_base58(data: &str) -> Result<Vec<u8>, CoreError> {
    bs58::decode(data)
        .into_vec()
        .map_err(|e| CoreError::InvalidKey(format!("bad base58: {}", e)))
}

/// An ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey {
    key_type: KeyType,
    data: [u8; PUBLIC_KEY_LENGTH],
}

impl PublicKey {
    /// Builds a public key from raw bytes, checking they are a valid curve point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        let key = DalekPublicKey::from_bytes(bytes)
            .map_err(|e| CoreError::InvalidKey(format!("bad ed25519 public key: {}", e)))?;
        Ok(Self {
            key_type: KeyType::Ed25519,
            data: key.to_bytes(),
        })
    }

    /// Gets the key type.
    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    /// Gets the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.data
    }

    /// Checks a signature over `message` made by the matching secret key.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<(), CoreError> {
        let key = DalekPublicKey::from_bytes(&self.data)
            .map_err(|e| CoreError::InvalidKey(e.to_string()))?;
        let signature = ed25519_dalek::Signature::try_from(&signature.0[..])
            .map_err(|_| CoreError::SignatureVerificationFailed)?;
        key.verify(message, &signature)
            .map_err(|_| CoreError::SignatureVerificationFailed)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.key_type, bs58::encode(self.data).into_string())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self)
    }
}

impl FromStr for PublicKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (_, data) = split_key_string(s)?;
        let bytes = decode_base58(data)?;
        if bytes.len() != PUBLIC_KEY_LENGTH {
            return Err(CoreError::InvalidKey(format!(
                "public key is {} bytes, expected {}",
                bytes.len(),
                PUBLIC_KEY_LENGTH
            )));
        }
        Self::from_bytes(&bytes)
    }
}

impl Serialize for PublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// An ed25519 signature.
#[derive(Clone, PartialEq, Eq)]
pub struct Signature([u8; SIGNATURE_LENGTH]);

impl Signature {
    /// Gets the raw signature bytes.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", KeyType::Ed25519, bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self)
    }
}

/// An ed25519 key pair.
///
/// Only the 32-byte seed is kept; the dalek key pair is rebuilt when signing.
#[derive(Clone)]
pub struct KeyPair {
    secret: [u8; SECRET_KEY_LENGTH],
    public: PublicKey,
}

impl KeyPair {
    /// Generates a fresh key pair from the operating system's entropy source.
    pub fn from_random(key_type: KeyType) -> Self {
        match key_type {
            KeyType::Ed25519 => {
                let mut seed = [0u8; SECRET_KEY_LENGTH];
                OsRng.fill_bytes(&mut seed);
                let secret = SecretKey::from_bytes(&seed)
                    .unwrap_or_else(|_| unreachable!("seed is always 32 bytes"));
                let public = DalekPublicKey::from(&secret);
                Self {
                    secret: seed,
                    public: PublicKey {
                        key_type,
                        data: public.to_bytes(),
                    },
                }
            }
        }
    }

    /// Rebuilds a key pair from a 32-byte seed.
    pub fn from_seed(seed: &[u8]) -> Result<Self, CoreError> {
        let secret = SecretKey::from_bytes(seed)
            .map_err(|e| CoreError::InvalidKey(format!("bad ed25519 secret key: {}", e)))?;
        let public = DalekPublicKey::from(&secret);
        let mut bytes = [0u8; SECRET_KEY_LENGTH];
        bytes.copy_from_slice(seed);
        Ok(Self {
            secret: bytes,
            public: PublicKey {
                key_type: KeyType::Ed25519,
                data: public.to_bytes(),
            },
        })
    }

    /// Gets the public half.
    pub fn public_key(&self) -> PublicKey {
        self.public
    }

    /// Signs a message.
    pub fn sign(&self, message: &[u8]) -> Result<Signature, CoreError> {
        let secret = SecretKey::from_bytes(&self.secret)
            .map_err(|e| CoreError::InvalidKey(e.to_string()))?;
        let public = DalekPublicKey::from(&secret);
        let keypair = DalekKeypair { secret, public };
        Ok(Signature(keypair.sign(message).to_bytes()))
    }

    /// Verifies a signature made with this key pair.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<(), CoreError> {
        self.public.verify(message, signature)
    }

    /// Encodes the secret key as `ed25519:<base58 of secret ‖ public>`.
    pub fn secret_key_string(&self) -> String {
        let mut bytes = Vec::with_capacity(SECRET_KEY_LENGTH + PUBLIC_KEY_LENGTH);
        bytes.extend_from_slice(&self.secret);
        bytes.extend_from_slice(self.public.as_bytes());
        format!("{}:{}", KeyType::Ed25519, bs58::encode(bytes).into_string())
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public)
            .finish_non_exhaustive()
    }
}

impl FromStr for KeyPair {
    type Err = CoreError;

    /// Parses a secret key string. Both the 64-byte form written by the
    /// key store and a bare 32-byte seed are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (_, data) = split_key_string(s)?;
        let bytes = decode_base58(data)?;
        match bytes.len() {
            SECRET_KEY_LENGTH => Self::from_seed(&bytes),
            n if n == SECRET_KEY_LENGTH + PUBLIC_KEY_LENGTH => {
                let pair = Self::from_seed(&bytes[..SECRET_KEY_LENGTH])?;
                if pair.public.as_bytes()[..] != bytes[SECRET_KEY_LENGTH..] {
                    return Err(CoreError::InvalidKey(
                        "public half does not match secret key".to_string(),
                    ));
                }
                Ok(pair)
            }
            n => Err(CoreError::InvalidKey(format!("secret key is {} bytes", n))),
        }
    }
}
