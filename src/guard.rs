//! Environment guard
//!
//! `az network bastion rdp` hands off to the native Windows RDP client and every
//! later step may prompt, so both conditions are checked before anything else runs.

use std::io::IsTerminal;

use crate::error::{BastionError, Result};

/// Capabilities of the host the tool is running on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostInfo {
    /// `std::env::consts::OS` value, e.g. `windows`
    pub os: &'static str,
    /// Whether stdin and stdout are both attached to a terminal
    pub interactive: bool,
}

impl HostInfo {
    pub fn detect() -> Self {
        Self {
            os: std::env::consts::OS,
            interactive: console::Term::stdout().is_term() && std::io::stdin().is_terminal(),
        }
    }
}

/// Fail unless the host can run the RDP-over-Bastion flow
pub fn check(host: &HostInfo) -> Result<()> {
    if host.os != "windows" {
        return Err(BastionError::UnsupportedEnvironment {
            reason: format!(
                "RDP over Bastion needs the Windows RDP client, but this host runs {}",
                host.os
            ),
        });
    }

    if !host.interactive {
        return Err(BastionError::UnsupportedEnvironment {
            reason: "an interactive terminal is required".to_string(),
        });
    }

    Ok(())
}
