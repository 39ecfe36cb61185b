//! WireGuard key material for WireGen.
//!
//! This crate provides the Curve25519 key types used in generated tunnel
//! configs and the [`KeyService`] capability through which the rest of
//! WireGen obtains fresh key pairs, derives public keys and generates
//! pre-shared keys.
//!
//! Two backends are provided:
//! - [`LocalKeyService`] derives keys in-process with `x25519-dalek`.
//! - [`WgToolKeyService`] shells out to the `wg` command-line tool.

#![forbid(unsafe_code)]

pub mod error;
mod keys;
mod service;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use error::{KeyError, Result};
pub use keys::{validate_key, KeyPair, PresharedKey, PrivateKey, PublicKey, KEY_SIZE};
pub use service::{KeyService, LocalKeyService, WgToolKeyService};
