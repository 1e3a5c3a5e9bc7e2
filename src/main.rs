//! bastion-connect - RDP to Azure VMs through Bastion
//!
//! Finds every VM that shares a virtual network with an Azure Bastion host across
//! the subscriptions the signed-in Azure CLI can see, lets the operator pick one,
//! starts it when needed and opens an RDP session with Entra ID authentication.

use clap::Parser;

mod az;
mod cli;
mod config;
mod connect;
mod deps;
mod discovery;
mod error;
mod guard;
mod output;
mod power;
mod progress;
mod select;
mod terminal;
#[cfg(test)]
mod test_fixtures;
mod update;
mod version;
mod workflow;

use az::AzCommand;
use cli::Cli;
use config::Settings;
use guard::HostInfo;
use terminal::InquireTerminal;
use update::HttpReleaseSource;
use version::Version;
use workflow::{Outcome, Workflow};

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or("BASTION_CONNECT_LOG", default_level),
    )
    .format_timestamp(None)
    .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = Settings::from_cli(&cli);
    log::debug!("settings: {settings:?}");

    let executable = match std::env::current_exe() {
        Ok(path) => path,
        Err(e) => {
            output::fatal_error(&e.into());
            return;
        }
    };

    let releases = HttpReleaseSource::new(&settings.version_url, &settings.download_url);
    let az = AzCommand::new(&settings.az_program);

    let workflow = Workflow {
        settings: &settings,
        host: HostInfo::detect(),
        current_version: Version::current(),
        executable: &executable,
        cli: &az,
        terminal: &InquireTerminal,
        releases: &releases,
    };

    // Every early termination is a normal exit; only the relaunched build decides the code.
    match workflow.run() {
        Ok(Outcome::Relaunch(_)) => {
            let args = update::relaunch_args(std::env::args_os());
            match update::relaunch(&executable, &args) {
                Ok(code) => std::process::exit(code),
                Err(e) => output::fatal_error(&e),
            }
        }
        Ok(Outcome::Connected | Outcome::NoTargets | Outcome::Cancelled) => {}
        Err(e) => output::fatal_error(&e),
    }
}
