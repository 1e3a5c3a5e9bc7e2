//! RDP-over-Bastion connection

use std::time::Duration;

use crate::az::{AzureCli, Invocation};
use crate::discovery::BastionTarget;
use crate::error::Result;
use crate::output;
use crate::terminal::Terminal;

/// `az network bastion rdp` for a target, with Entra ID / MFA authentication
pub fn rdp_invocation(target: &BastionTarget) -> Invocation {
    Invocation::new([
        "network",
        "bastion",
        "rdp",
        "--subscription",
        target.subscription_id.as_str(),
        "--name",
        target.bastion_name.as_str(),
        "--resource-group",
        target.resource_group.as_str(),
        "--target-resource-id",
        target.vm_id.as_str(),
        "--enable-mfa",
    ])
}

/// Print and launch the RDP session, then give it a moment to come up
pub fn connect(
    cli: &dyn AzureCli,
    terminal: &dyn Terminal,
    target: &BastionTarget,
    pause: Duration,
) -> Result<()> {
    let invocation = rdp_invocation(target);

    output::info(format!(
        "Connecting to {} through {}",
        target.vm_name, target.bastion_name
    ));
    output::command(invocation.to_string());

    cli.launch(&invocation)?;
    terminal.pause(pause);
    Ok(())
}
