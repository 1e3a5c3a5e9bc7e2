//! Fakes for the workflow's collaborators.
//!
//! ```ignore
//! use crate::test_fixtures::{FakeAzureCli, ScriptedTerminal, target};
//!
//! let cli = FakeAzureCli::new()
//!     .with_extension(Version::new(1, 3, 0))
//!     .with_targets(&[target("Prod", "vm-a")])
//!     .with_power_state("VM deallocated");
//! let terminal = ScriptedTerminal::new().choosing(Some(0)).confirming(true);
//! ```
//!
//! Every fake records what it was asked so tests can assert on the exact
//! sequence of external calls, prompts and pauses.

use std::cell::{Cell, RefCell};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;

use crate::az::{AzureCli, ExtensionInfo, Invocation};
use crate::discovery::BastionTarget;
use crate::error::{BastionError, Result};
use crate::terminal::Terminal;
use crate::update::ReleaseSource;
use crate::version::Version;

/// Fresh directory standing in for the folder the executable lives in
pub fn create_temp_dir() -> TempDir {
    tempfile::Builder::new()
        .prefix("bastion-connect-test-")
        .tempdir()
        .expect("Failed to create temp directory")
}

/// Write a stand-in executable into `dir`
pub fn write_executable(dir: &Path, contents: &[u8]) -> PathBuf {
    let path = dir.join(if cfg!(windows) {
        "bastion-connect.exe"
    } else {
        "bastion-connect"
    });
    std::fs::write(&path, contents).expect("Failed to write executable");
    path
}

/// A discovery row for `vm_name` in `subscription`, with predictable ids
pub fn target(subscription: &str, vm_name: &str) -> BastionTarget {
    let slug = subscription.trim().to_lowercase().replace(' ', "-");
    let subscription_id = format!("sub-{slug}");
    BastionTarget {
        vm_name: vm_name.to_string(),
        vm_id: format!(
            "/subscriptions/{subscription_id}/resourceGroups/rg-app/providers/Microsoft.Compute/virtualMachines/{vm_name}"
        ),
        bastion_name: format!("bas-{slug}"),
        resource_group: format!("rg-{slug}"),
        subscription_name: subscription.to_string(),
        subscription_id,
    }
}

/// Resource Graph response body containing `targets`
pub fn graph_response(targets: &[BastionTarget]) -> String {
    let rows: Vec<serde_json::Value> = targets
        .iter()
        .map(|t| {
            serde_json::json!({
                "vmName": t.vm_name,
                "vmId": t.vm_id,
                "bastionName": t.bastion_name,
                "resourceGroup": t.resource_group,
                "subscriptionName": t.subscription_name,
                "subscriptionId": t.subscription_id,
            })
        })
        .collect();
    serde_json::json!({ "count": rows.len(), "data": rows }).to_string()
}

/// One recorded call on [`FakeAzureCli`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AzCall {
    Extension(String),
    AddExtension(String),
    UpdateExtension(String),
    GraphQuery(String),
    PowerState(String),
    StartVm(String),
    Launch(Invocation),
}

pub struct FakeAzureCli {
    installed: bool,
    extension: RefCell<Option<Version>>,
    after_mutation: Option<Version>,
    fail_mutations: bool,
    graph_json: String,
    power_state: String,
    calls: RefCell<Vec<AzCall>>,
}

impl FakeAzureCli {
    /// Installed CLI, extension absent, no discovery rows, VM running
    pub fn new() -> Self {
        Self {
            installed: true,
            extension: RefCell::new(None),
            after_mutation: None,
            fail_mutations: false,
            graph_json: graph_response(&[]),
            power_state: "VM running".to_string(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn without_cli(mut self) -> Self {
        self.installed = false;
        self
    }

    pub fn with_extension(self, version: Version) -> Self {
        self.extension.replace(Some(version));
        self
    }

    /// Version reported once an add or update call has been made
    pub fn with_extension_after_mutation(mut self, version: Version) -> Self {
        self.after_mutation = Some(version);
        self
    }

    pub fn failing_mutations(mut self) -> Self {
        self.fail_mutations = true;
        self
    }

    pub fn with_targets(mut self, targets: &[BastionTarget]) -> Self {
        self.graph_json = graph_response(targets);
        self
    }

    pub fn with_power_state(mut self, state: &str) -> Self {
        self.power_state = state.to_string();
        self
    }

    pub fn calls(&self) -> Vec<AzCall> {
        self.calls.borrow().clone()
    }

    pub fn last_query(&self) -> Option<String> {
        self.calls.borrow().iter().rev().find_map(|call| match call {
            AzCall::GraphQuery(query) => Some(query.clone()),
            _ => None,
        })
    }

    fn record(&self, call: AzCall) {
        self.calls.borrow_mut().push(call);
    }

    fn mutate(&self, command: &str) -> Result<()> {
        if self.fail_mutations {
            return Err(BastionError::CommandFailed {
                command: command.to_string(),
                reason: "simulated failure".to_string(),
            });
        }
        if let Some(version) = self.after_mutation {
            self.extension.replace(Some(version));
        }
        Ok(())
    }
}

impl AzureCli for FakeAzureCli {
    fn is_installed(&self) -> bool {
        self.installed
    }

    fn extension(&self, name: &str) -> Result<Option<ExtensionInfo>> {
        self.record(AzCall::Extension(name.to_string()));
        let installed = *self.extension.borrow();
        Ok(installed.map(|version| ExtensionInfo {
            name: name.to_string(),
            version,
        }))
    }

    fn add_extension(&self, name: &str) -> Result<()> {
        self.record(AzCall::AddExtension(name.to_string()));
        self.mutate("az extension add")
    }

    fn update_extension(&self, name: &str) -> Result<()> {
        self.record(AzCall::UpdateExtension(name.to_string()));
        self.mutate("az extension update")
    }

    fn graph_query(&self, query: &str) -> Result<String> {
        self.record(AzCall::GraphQuery(query.to_string()));
        Ok(self.graph_json.clone())
    }

    fn power_state(&self, vm_id: &str) -> Result<String> {
        self.record(AzCall::PowerState(vm_id.to_string()));
        Ok(self.power_state.clone())
    }

    fn start_vm(&self, vm_id: &str) -> Result<()> {
        self.record(AzCall::StartVm(vm_id.to_string()));
        Ok(())
    }

    fn launch(&self, invocation: &Invocation) -> Result<()> {
        self.record(AzCall::Launch(invocation.clone()));
        Ok(())
    }
}

/// [`Terminal`] with canned answers; pauses and warnings are recorded, not shown
pub struct ScriptedTerminal {
    choice: Option<usize>,
    confirm: bool,
    menus: RefCell<Vec<Vec<String>>>,
    confirm_defaults: RefCell<Vec<bool>>,
    pauses: RefCell<Vec<Duration>>,
    warnings: RefCell<Vec<String>>,
}

impl ScriptedTerminal {
    /// Cancels every menu and accepts every confirmation
    pub fn new() -> Self {
        Self {
            choice: None,
            confirm: true,
            menus: RefCell::new(Vec::new()),
            confirm_defaults: RefCell::new(Vec::new()),
            pauses: RefCell::new(Vec::new()),
            warnings: RefCell::new(Vec::new()),
        }
    }

    pub fn choosing(mut self, choice: Option<usize>) -> Self {
        self.choice = choice;
        self
    }

    pub fn confirming(mut self, answer: bool) -> Self {
        self.confirm = answer;
        self
    }

    pub fn prompts_shown(&self) -> usize {
        self.menus.borrow().len()
    }

    pub fn last_items(&self) -> Vec<String> {
        self.menus.borrow().last().cloned().unwrap_or_default()
    }

    pub fn confirms_asked(&self) -> usize {
        self.confirm_defaults.borrow().len()
    }

    pub fn confirm_defaults(&self) -> Vec<bool> {
        self.confirm_defaults.borrow().clone()
    }

    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.borrow().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.borrow().clone()
    }
}

impl Terminal for ScriptedTerminal {
    fn choose(&self, _prompt: &str, items: &[String]) -> Result<Option<usize>> {
        self.menus.borrow_mut().push(items.to_vec());
        Ok(self.choice.filter(|index| *index < items.len()))
    }

    fn confirm(&self, _prompt: &str, default: bool) -> Result<bool> {
        self.confirm_defaults.borrow_mut().push(default);
        Ok(self.confirm)
    }

    fn pause(&self, duration: Duration) {
        self.pauses.borrow_mut().push(duration);
    }

    fn warn(&self, message: &str) {
        self.warnings.borrow_mut().push(message.to_string());
    }
}

/// [`ReleaseSource`] serving a fixed marker and body
pub struct FakeReleases {
    marker: Option<String>,
    body: Vec<u8>,
    fail_after: Option<usize>,
    downloads: Cell<usize>,
}

impl FakeReleases {
    pub fn new(marker: &str, body: &[u8]) -> Self {
        Self {
            marker: Some(marker.to_string()),
            body: body.to_vec(),
            fail_after: None,
            downloads: Cell::new(0),
        }
    }

    /// Version marker request fails
    pub fn unreachable() -> Self {
        Self {
            marker: None,
            body: Vec::new(),
            fail_after: None,
            downloads: Cell::new(0),
        }
    }

    /// Download writes `bytes` bytes, then the connection drops
    pub fn failing_after(mut self, bytes: usize) -> Self {
        self.fail_after = Some(bytes);
        self
    }

    pub fn download_count(&self) -> usize {
        self.downloads.get()
    }
}

impl ReleaseSource for FakeReleases {
    fn version_marker(&self) -> Result<String> {
        self.marker.clone().ok_or_else(|| BastionError::Http {
            message: "connection refused".to_string(),
        })
    }

    fn download(&self, _version: &Version, sink: &mut dyn Write) -> Result<u64> {
        self.downloads.set(self.downloads.get() + 1);
        match self.fail_after {
            Some(bytes) => {
                sink.write_all(&self.body[..bytes.min(self.body.len())])?;
                Err(BastionError::Http {
                    message: "connection reset".to_string(),
                })
            }
            None => {
                sink.write_all(&self.body)?;
                Ok(self.body.len() as u64)
            }
        }
    }
}
