//! CLI definitions using clap derive API
//!
//! The tool is fully interactive; every flag is optional.

use clap::Parser;
use clap::builder::{Styles, styling::AnsiColor};

/// bastion-connect - RDP to Azure VMs through Bastion
///
/// Lists the VMs that share a virtual network with a Bastion host, lets you pick one,
/// starts it if needed and opens an RDP session with Entra ID authentication.
#[derive(Parser, Debug)]
#[command(
    name = "bastion-connect",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Discover VMs behind Azure Bastion hosts and open an RDP session",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  bastion-connect                    \x1b[90m# Pick a VM and connect\x1b[0m\n   \
                  bastion-connect --skip-update      \x1b[90m# Do not check for a newer release\x1b[0m\n   \
                  bastion-connect --start-grace 15   \x1b[90m# Wait longer after starting a VM\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Do not check for a newer release before connecting
    #[arg(long, env = "BASTION_CONNECT_SKIP_UPDATE")]
    pub skip_update: bool,

    /// Enable verbose output
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Seconds to wait after starting a stopped VM before connecting
    #[arg(long, value_name = "SECS", default_value_t = 5, env = "BASTION_CONNECT_START_GRACE")]
    pub start_grace: u64,

    /// URL of the remote version marker
    #[arg(long, hide = true, env = "BASTION_CONNECT_VERSION_URL")]
    pub version_url: Option<String>,

    /// Download URL template ({version}, {os}, {arch}, {exe})
    #[arg(long, hide = true, env = "BASTION_CONNECT_DOWNLOAD_URL")]
    pub download_url: Option<String>,

    /// Azure CLI executable to invoke
    #[arg(long, hide = true, env = "BASTION_CONNECT_AZ")]
    pub az_program: Option<String>,
}
