//! Server configuration, loaded from a TOML file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub storage: StorageConfig,
    pub jwt: JwtConfig,
}

/// Storage section.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding all persistent data.
    pub data_dir: String,
}

/// JWT section.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Signing secret for access tokens.
    pub secret: String,

    /// Access token lifetime in seconds.
    #[serde(default = "default_expire_secs")]
    pub expire_secs: i64,
}

fn default_expire_secs() -> i64 {
    86400 // 24h
}

impl ServerConfig {
    /// Resolve a context name or path to a config file path.
    ///
    /// A bare name resolves to `/etc/openfeed/<name>.toml`; anything
    /// containing `/` or `.` is used as a path directly.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.contains('.') {
            PathBuf::from(name_or_path)
        } else {
            PathBuf::from(format!("/etc/openfeed/{}.toml", name_or_path))
        }
    }

    /// Load and parse a config file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e))?;
        let config: ServerConfig = toml::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("cannot parse {}: {}", path.display(), e))?;
        config.verify()?;
        Ok(config)
    }

    /// Verify the configuration is usable.
    pub fn verify(&self) -> anyhow::Result<()> {
        if self.jwt.secret.is_empty() {
            anyhow::bail!("jwt.secret must not be empty");
        }
        if self.storage.data_dir.is_empty() {
            anyhow::bail!("storage.data_dir must not be empty");
        }
        Ok(())
    }
}
