//! Core primitives for NEAR Shell.
//!
//! This crate provides the small set of types every other crate in the
//! workspace needs: ed25519 key pairs with their NEAR string encodings,
//! account id validation, and conversion between NEAR and yoctoNEAR.

pub mod account;
pub mod amount;
pub mod errors;
pub mod key;

// Re-export commonly used types
pub use account::validate_account_id;
pub use amount::{format_near_amount, parse_near_amount, Balance, NEAR_NOMINATION_EXP};
pub use errors::CoreError;
pub use key::{KeyPair, KeyType, PublicKey, Signature};
