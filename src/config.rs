//! Resolved runtime settings
//!
//! Defaults live here; [`Settings::from_cli`] applies flag and environment overrides.

use std::time::Duration;

use crate::cli::Cli;
use crate::version::Version;

/// Where the latest version marker is published
pub const DEFAULT_VERSION_URL: &str =
    "https://github.com/bastion-connect/bastion-connect/releases/latest/download/VERSION";

/// Where release binaries are published
pub const DEFAULT_DOWNLOAD_URL: &str = "https://github.com/bastion-connect/bastion-connect/releases/download/v{version}/bastion-connect-{os}-{arch}{exe}";

/// Azure CLI extension that provides `az network bastion`
pub const BASTION_EXTENSION: &str = "bastion";

/// First extension release that supports `--enable-mfa`
pub const MIN_BASTION_EXTENSION: Version = Version::new(1, 3, 0);

/// Pause after launching the RDP session before exiting
pub const CONNECT_PAUSE: Duration = Duration::from_secs(3);

/// Azure CLI entry point for this platform
pub fn default_az_program() -> &'static str {
    if cfg!(windows) { "az.cmd" } else { "az" }
}

/// Minimum installed version of an Azure CLI extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionRequirement {
    pub name: String,
    pub minimum: Version,
}

impl ExtensionRequirement {
    pub fn bastion() -> Self {
        Self {
            name: BASTION_EXTENSION.to_string(),
            minimum: MIN_BASTION_EXTENSION,
        }
    }
}

/// Immutable settings for one run
#[derive(Debug, Clone)]
pub struct Settings {
    pub version_url: String,
    pub download_url: String,
    pub skip_update: bool,
    pub az_program: String,
    pub extension: ExtensionRequirement,
    pub start_grace: Duration,
    pub connect_pause: Duration,
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            version_url: cli
                .version_url
                .clone()
                .unwrap_or_else(|| DEFAULT_VERSION_URL.to_string()),
            download_url: cli
                .download_url
                .clone()
                .unwrap_or_else(|| DEFAULT_DOWNLOAD_URL.to_string()),
            skip_update: cli.skip_update,
            az_program: cli
                .az_program
                .clone()
                .unwrap_or_else(|| default_az_program().to_string()),
            extension: ExtensionRequirement::bastion(),
            start_grace: Duration::from_secs(cli.start_grace),
            connect_pause: CONNECT_PAUSE,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version_url: DEFAULT_VERSION_URL.to_string(),
            download_url: DEFAULT_DOWNLOAD_URL.to_string(),
            skip_update: false,
            az_program: default_az_program().to_string(),
            extension: ExtensionRequirement::bastion(),
            start_grace: Duration::from_secs(5),
            connect_pause: CONNECT_PAUSE,
        }
    }
}
