//! The connect workflow, start to finish
//!
//! Each step completes or ends the run before the next begins:
//! guard, self-update, dependencies, discovery, selection, power, connect.

use std::path::Path;

use crate::az::AzureCli;
use crate::config::Settings;
use crate::error::Result;
use crate::guard::{self, HostInfo};
use crate::progress::Spinner;
use crate::terminal::Terminal;
use crate::update::{self, ReleaseSource, UpdateOutcome};
use crate::version::Version;
use crate::{connect, deps, discovery, output, power, select};

/// How a run ended when it did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The RDP session was launched
    Connected,
    /// A newer build was installed and should be started in place of this one
    Relaunch(Version),
    /// Discovery found nothing to connect to
    NoTargets,
    /// The operator cancelled the selection
    Cancelled,
}

/// Collaborators and settings for one run
pub struct Workflow<'a> {
    pub settings: &'a Settings,
    pub host: HostInfo,
    pub current_version: Version,
    pub executable: &'a Path,
    pub cli: &'a dyn AzureCli,
    pub terminal: &'a dyn Terminal,
    pub releases: &'a dyn ReleaseSource,
}

impl Workflow<'_> {
    pub fn run(&self) -> Result<Outcome> {
        guard::check(&self.host)?;

        if self.settings.skip_update {
            log::debug!("update check skipped");
        } else if let UpdateOutcome::Replaced(version) =
            update::check_for_update(self.releases, self.current_version, self.executable)
        {
            return Ok(Outcome::Relaunch(version));
        }

        deps::ensure_dependencies(self.cli, &self.settings.az_program, &self.settings.extension)?;

        let spinner = Spinner::start("Searching for VMs behind Bastion hosts...");
        let targets = discovery::discover(self.cli);
        spinner.finish();
        let targets = targets?;

        if targets.is_empty() {
            self.terminal.warn("No VMs reachable through a Bastion host were found");
            return Ok(Outcome::NoTargets);
        }
        output::info(format!("Found {} VM(s) reachable through Bastion", targets.len()));

        let Some(target) = select::select_target(self.terminal, &targets)? else {
            log::debug!("selection cancelled");
            return Ok(Outcome::Cancelled);
        };

        power::ensure_running(
            self.cli,
            self.terminal,
            &target.vm_name,
            &target.vm_id,
            self.settings.start_grace,
        )?;

        connect::connect(self.cli, self.terminal, target, self.settings.connect_pause)?;
        Ok(Outcome::Connected)
    }
}
