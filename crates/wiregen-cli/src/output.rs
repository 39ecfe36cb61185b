//! Writing generated artifacts to disk.
//!
//! Bulk runs produce:
//!
//! ```text
//! <root>/<server hostname>/server.conf
//! <root>/<server hostname>/mikrotik_server.txt   (with --mikrotik)
//! <root>/<server hostname>/clients/<client>.conf
//! ```
//!
//! Pair runs produce `<root>/<hostname>/wg.conf` and `mt.rsc` per side.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;
use wiregen::{render_native, ConfigFile, PairProvisioned, Provisioned};

use crate::error::CliError;

/// Directory name used for a host without a hostname.
pub const UNNAMED_SERVER_DIR: &str = "server";

/// Writes configs and scripts under a root directory.
#[derive(Debug, Clone)]
pub struct ArtifactSink {
    root: PathBuf,
}

impl ArtifactSink {
    /// Create a sink rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Writes a bulk provisioning result, returning the files written in
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::File`] if a directory or file can't be written.
    pub fn write_bulk(&self, provisioned: &Provisioned) -> Result<Vec<PathBuf>, CliError> {
        let server_dir = self.root.join(host_dir(&provisioned.server, UNNAMED_SERVER_DIR));
        let clients_dir = server_dir.join("clients");
        create_dir(&clients_dir)?;

        let mut written = Vec::with_capacity(provisioned.clients.len() + 2);
        written.push(write_file(
            &server_dir.join("server.conf"),
            &render_native(&provisioned.server),
        )?);

        if let Some(script) = &provisioned.router_script {
            written.push(write_file(
                &server_dir.join("mikrotik_server.txt"),
                &format!("{script}\n"),
            )?);
        }

        for client in &provisioned.clients {
            written.push(write_file(
                &clients_dir.join(format!("{}.conf", client.file_stem)),
                &render_native(&client.config),
            )?);
        }

        info!(
            dir = %server_dir.display(),
            clients = provisioned.clients.len(),
            "wrote server and client configs"
        );
        Ok(written)
    }

    /// Writes both sides of a site pair, returning the files written in
    /// order.
    ///
    /// Both router scripts are rendered first so each `wg.conf` carries the
    /// interface name its script assigned.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::SharedSiteDirectory`] if both sides map to the
    /// same directory, and [`CliError::File`] if a directory or file can't
    /// be written. Nothing is written in the first case.
    pub fn write_pair(&self, pair: &PairProvisioned) -> Result<Vec<PathBuf>, CliError> {
        let configs = pair.configs();
        let dirs = [
            self.root.join(host_dir(configs[0], "first")),
            self.root.join(host_dir(configs[1], "second")),
        ];
        if dirs[0] == dirs[1] {
            return Err(CliError::SharedSiteDirectory {
                dir: dirs[0].clone(),
            });
        }

        let scripts = configs.map(PairProvisioned::router_script);

        let mut written = Vec::with_capacity(4);
        for ((config, script), dir) in configs.into_iter().zip(scripts).zip(dirs) {
            create_dir(&dir)?;
            written.push(write_file(&dir.join("wg.conf"), &render_native(config))?);
            written.push(write_file(&dir.join("mt.rsc"), &script)?);
            info!(dir = %dir.display(), "wrote site config");
        }
        Ok(written)
    }
}

fn host_dir<'a>(config: &'a ConfigFile, fallback: &'a str) -> &'a str {
    config
        .interface()
        .hostname()
        .filter(|h| !h.is_empty())
        .unwrap_or(fallback)
}

fn create_dir(dir: &Path) -> Result<(), CliError> {
    fs::create_dir_all(dir).map_err(|e| CliError::file(dir, e))
}

fn write_file(path: &Path, contents: &str) -> Result<PathBuf, CliError> {
    fs::write(path, contents).map_err(|e| CliError::file(path, e))?;
    Ok(path.to_path_buf())
}
