//! Azure CLI and extension dependency check

use crate::az::{AzureCli, ExtensionInfo};
use crate::config::ExtensionRequirement;
use crate::error::{BastionError, Result};
use crate::output;

/// Make sure the CLI is present and the extension meets its minimum version.
///
/// Installs or upgrades the extension at most once, then re-queries. Returns
/// the installed extension, or a fatal error asking for a manual update.
pub fn ensure_dependencies(
    cli: &dyn AzureCli,
    program: &str,
    requirement: &ExtensionRequirement,
) -> Result<ExtensionInfo> {
    if !cli.is_installed() {
        return Err(BastionError::CliNotInstalled {
            program: program.to_string(),
        });
    }

    let name = requirement.name.as_str();
    let mutation = match cli.extension(name)? {
        Some(info) if info.version >= requirement.minimum => {
            log::debug!("extension {name} {} satisfies {}", info.version, requirement.minimum);
            return Ok(info);
        }
        Some(info) => {
            output::info(format!(
                "Updating Azure CLI extension '{name}' from {} (requires {})...",
                info.version, requirement.minimum
            ));
            cli.update_extension(name)
        }
        None => {
            output::info(format!("Installing Azure CLI extension '{name}'..."));
            cli.add_extension(name)
        }
    };

    if let Err(e) = mutation {
        output::warn(format!("Could not install or update '{name}': {e}"));
    }

    match cli.extension(name)? {
        Some(info) if info.version >= requirement.minimum => {
            output::success(format!("Extension '{name}' {} is ready", info.version));
            Ok(info)
        }
        Some(info) => Err(BastionError::ExtensionBelowMinimum {
            name: name.to_string(),
            installed: format!("at version {}", info.version),
            required: requirement.minimum.to_string(),
        }),
        None => Err(BastionError::ExtensionBelowMinimum {
            name: name.to_string(),
            installed: "not installed".to_string(),
            required: requirement.minimum.to_string(),
        }),
    }
}
