//! Validated settings shared by every command.
//!
//! Values arrive already merged from flags, environment and `.env`; this
//! module only decides which of them each command needs.

use port_migrator_client::{ClientCredentials, DEFAULT_BASE_URL};

use crate::error::ConfigError;

/// Which command the settings are resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Migrate,
    GetBlueprints,
    GetDiff,
}

impl CommandKind {
    fn needs_new_installation(self) -> bool {
        matches!(self, Self::Migrate | Self::GetDiff)
    }
}

/// Raw, possibly incomplete settings.
#[derive(Debug, Clone, Default)]
pub struct ConfigInput {
    pub port_url: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub old_installation_id: Option<String>,
    pub new_installation_id: Option<String>,
}

/// Settings with every value the command needs present.
#[derive(Debug, Clone)]
pub struct MigratorConfig {
    pub port_url: String,
    pub credentials: ClientCredentials,
    pub old_installation_id: String,
    pub new_installation_id: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ConfigInput {
    /// Check every required value at once so the operator sees the whole
    /// list of missing options in one go.
    pub fn resolve(self, command: CommandKind) -> Result<MigratorConfig, ConfigError> {
        let port_url = present(self.port_url).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !(port_url.starts_with("http://") || port_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(port_url));
        }

        let client_id = present(self.client_id);
        let client_secret = present(self.client_secret);
        let old_installation_id = present(self.old_installation_id);
        let new_installation_id = present(self.new_installation_id);

        let mut missing = Vec::new();
        if client_id.is_none() {
            missing.push("--client-id");
        }
        if client_secret.is_none() {
            missing.push("--client-secret");
        }
        if old_installation_id.is_none() {
            missing.push("--old-installation-id");
        }
        if command.needs_new_installation() && new_installation_id.is_none() {
            missing.push("--new-installation-id");
        }

        match (client_id, client_secret, old_installation_id) {
            (Some(client_id), Some(client_secret), Some(old_installation_id))
                if missing.is_empty() =>
            {
                Ok(MigratorConfig {
                    port_url: port_url.trim_end_matches('/').to_string(),
                    credentials: ClientCredentials {
                        client_id,
                        client_secret,
                    },
                    old_installation_id,
                    new_installation_id,
                })
            }
            _ => Err(ConfigError::Missing(missing)),
        }
    }
}

impl MigratorConfig {
    pub fn new_installation_id(&self) -> Result<&str, ConfigError> {
        self.new_installation_id
            .as_deref()
            .ok_or_else(|| ConfigError::Missing(vec!["--new-installation-id"]))
    }
}
