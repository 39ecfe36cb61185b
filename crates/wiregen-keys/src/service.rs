//! Key service backends.
//!
//! Everything outside this crate obtains key material through the
//! [`KeyService`] trait so that config generation can be driven by a
//! deterministic fake in tests.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{KeyError, Result};
use crate::keys::{validate_key, KeyPair, PresharedKey, PrivateKey, PublicKey};

/// Source of `WireGuard` key material.
pub trait KeyService {
    /// Generates a fresh key pair.
    fn generate_key_pair(&self) -> Result<KeyPair>;

    /// Derives the key pair belonging to a base64 private key.
    ///
    /// The key text is validated before anything else; a malformed key
    /// fails with [`KeyError::InvalidKeyFormat`].
    fn derive_key_pair(&self, private_key: &str) -> Result<KeyPair>;

    /// Generates a fresh pre-shared key.
    fn generate_preshared_key(&self) -> Result<PresharedKey>;
}

/// In-process key service backed by `x25519-dalek`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalKeyService;

impl LocalKeyService {
    /// Creates the service.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl KeyService for LocalKeyService {
    fn generate_key_pair(&self) -> Result<KeyPair> {
        Ok(KeyPair::generate())
    }

    fn derive_key_pair(&self, private_key: &str) -> Result<KeyPair> {
        validate_key(private_key)?;
        Ok(KeyPair::from_private_key(PrivateKey::from_base64(private_key)?))
    }

    fn generate_preshared_key(&self) -> Result<PresharedKey> {
        Ok(PresharedKey::generate())
    }
}

/// Key service that runs the `wg` command-line tool.
///
/// Every call blocks on a child process.
#[derive(Debug, Clone)]
pub struct WgToolKeyService {
    program: PathBuf,
}

impl Default for WgToolKeyService {
    fn default() -> Self {
        Self::new("wg")
    }
}

impl WgToolKeyService {
    /// Creates a service that runs `program` (normally `wg`).
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, subcommand: &str, input: Option<&str>) -> Result<String> {
        let command = format!("{} {subcommand}", self.program.display());
        let tool_err = |message: String| KeyError::Tool {
            command: command.clone(),
            message,
        };

        debug!(command = %command, "running key tool");

        let mut child = Command::new(&self.program)
            .arg(subcommand)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| tool_err(e.to_string()))?;

        if let (Some(input), Some(mut stdin)) = (input, child.stdin.take()) {
            stdin
                .write_all(input.as_bytes())
                .map_err(|e| tool_err(e.to_string()))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| tool_err(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(tool_err(format!("{}: {}", output.status, stderr.trim())));
        }

        String::from_utf8(output.stdout)
            .map(|s| s.trim().to_string())
            .map_err(|e| tool_err(e.to_string()))
    }

    fn public_key_for(&self, private_key: &str) -> Result<PublicKey> {
        PublicKey::from_base64(&self.run("pubkey", Some(private_key))?)
    }
}

impl KeyService for WgToolKeyService {
    fn generate_key_pair(&self) -> Result<KeyPair> {
        let private_text = self.run("genkey", None)?;
        let private = PrivateKey::from_base64(&private_text)?;
        let public = self.public_key_for(&private_text)?;
        Ok(KeyPair::from_parts(private, public))
    }

    fn derive_key_pair(&self, private_key: &str) -> Result<KeyPair> {
        validate_key(private_key)?;
        let private = PrivateKey::from_base64(private_key)?;
        let public = self.public_key_for(private_key)?;
        Ok(KeyPair::from_parts(private, public))
    }

    fn generate_preshared_key(&self) -> Result<PresharedKey> {
        PresharedKey::from_base64(&self.run("genpsk", None)?)
    }
}
