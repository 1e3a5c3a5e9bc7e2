//! VM power management
//!
//! The grace delay after a start is a fixed pause, not a readiness poll: a slow
//! boot can still race the connection attempt.

use std::time::Duration;

use crate::az::AzureCli;
use crate::error::Result;
use crate::output;
use crate::terminal::Terminal;

/// Power state reported for a VM that is up
pub const RUNNING: &str = "VM running";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerOutcome {
    AlreadyRunning,
    Started,
    /// The operator declined to start the VM
    LeftStopped,
}

/// Start the VM if it is not running and the operator agrees
pub fn ensure_running(
    cli: &dyn AzureCli,
    terminal: &dyn Terminal,
    vm_name: &str,
    vm_id: &str,
    grace: Duration,
) -> Result<PowerOutcome> {
    let state = cli.power_state(vm_id)?;
    if state == RUNNING {
        log::debug!("{vm_name} is running");
        return Ok(PowerOutcome::AlreadyRunning);
    }

    let shown = if state.is_empty() { "unknown" } else { state.as_str() };
    output::info(format!("{vm_name} is not running (state: {shown})"));

    if !terminal.confirm(&format!("Start {vm_name} now?"), true)? {
        terminal.warn(&format!(
            "{vm_name} was not started; the connection is expected to fail"
        ));
        return Ok(PowerOutcome::LeftStopped);
    }

    output::info(format!("Starting {vm_name}..."));
    cli.start_vm(vm_id)?;
    output::info(format!(
        "Waiting {}s for {vm_name} to boot",
        grace.as_secs()
    ));
    terminal.pause(grace);

    Ok(PowerOutcome::Started)
}
