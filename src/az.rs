//! Azure CLI collaborator
//!
//! Every external `az` call goes through the [`AzureCli`] trait so the
//! workflow can be driven by a recording fake in tests.

use std::fmt;
use std::process::{Command, Stdio};

use serde::Deserialize;

use crate::error::{BastionError, Result};
use crate::version::Version;

/// Installed state of an Azure CLI extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionInfo {
    pub name: String,
    pub version: Version,
}

/// Arguments of one `az` call, displayable as the equivalent command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "az")?;
        for arg in &self.args {
            if arg.is_empty() || arg.chars().any(char::is_whitespace) {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Operations this tool needs from the Azure CLI
pub trait AzureCli {
    /// Whether the CLI itself can be executed
    fn is_installed(&self) -> bool;

    /// Installed extension by name, `None` when absent
    fn extension(&self, name: &str) -> Result<Option<ExtensionInfo>>;

    fn add_extension(&self, name: &str) -> Result<()>;

    fn update_extension(&self, name: &str) -> Result<()>;

    /// Run a Resource Graph query and return the raw JSON response
    fn graph_query(&self, query: &str) -> Result<String>;

    /// Power state of a VM, e.g. `VM running` or `VM deallocated`
    fn power_state(&self, vm_id: &str) -> Result<String>;

    fn start_vm(&self, vm_id: &str) -> Result<()>;

    /// Spawn an invocation attached to the console without waiting for it
    fn launch(&self, invocation: &Invocation) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct ExtensionEntry {
    name: String,
    version: String,
}

/// Find an extension in `az extension list` output
pub fn parse_extension_list(json: &str, name: &str) -> Result<Option<ExtensionInfo>> {
    let entries: Vec<ExtensionEntry> = serde_json::from_str(json)?;
    entries
        .into_iter()
        .find(|entry| entry.name.eq_ignore_ascii_case(name))
        .map(|entry| -> Result<ExtensionInfo> {
            Ok(ExtensionInfo {
                name: entry.name,
                version: Version::parse(&entry.version)?,
            })
        })
        .transpose()
}

/// [`AzureCli`] backed by the real `az` executable
pub struct AzCommand {
    program: String,
}

impl AzCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run an invocation with JSON output and return stdout
    fn run_json(&self, invocation: &Invocation) -> Result<String> {
        log::debug!("running: {invocation} --only-show-errors --output json");

        let output = Command::new(&self.program)
            .args(&invocation.args)
            .args(["--only-show-errors", "--output", "json"])
            .stdin(Stdio::null())
            .output()
            .map_err(|e| BastionError::CommandFailed {
                command: invocation.to_string(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BastionError::CommandFailed {
                command: invocation.to_string(),
                reason: stderr.trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl AzureCli for AzCommand {
    fn is_installed(&self) -> bool {
        log::debug!("probing {} version", self.program);
        Command::new(&self.program)
            .arg("version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|status| status.success())
    }

    fn extension(&self, name: &str) -> Result<Option<ExtensionInfo>> {
        let json = self.run_json(&Invocation::new(["extension", "list"]))?;
        parse_extension_list(&json, name)
    }

    fn add_extension(&self, name: &str) -> Result<()> {
        self.run_json(&Invocation::new(["extension", "add", "--name", name, "--yes"]))?;
        Ok(())
    }

    fn update_extension(&self, name: &str) -> Result<()> {
        self.run_json(&Invocation::new(["extension", "update", "--name", name]))?;
        Ok(())
    }

    fn graph_query(&self, query: &str) -> Result<String> {
        self.run_json(&Invocation::new([
            "graph", "query", "-q", query, "--first", "1000",
        ]))
    }

    fn power_state(&self, vm_id: &str) -> Result<String> {
        let json = self.run_json(&Invocation::new([
            "vm",
            "show",
            "-d",
            "--ids",
            vm_id,
            "--query",
            "powerState",
        ]))?;
        // A VM without instance view data yields `null`
        let state: Option<String> = serde_json::from_str(&json)?;
        Ok(state.unwrap_or_default())
    }

    fn start_vm(&self, vm_id: &str) -> Result<()> {
        self.run_json(&Invocation::new(["vm", "start", "--ids", vm_id, "--no-wait"]))?;
        Ok(())
    }

    fn launch(&self, invocation: &Invocation) -> Result<()> {
        log::debug!("launching: {invocation}");
        Command::new(&self.program)
            .args(&invocation.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| BastionError::CommandFailed {
                command: invocation.to_string(),
                reason: e.to_string(),
            })?;
        Ok(())
    }
}
