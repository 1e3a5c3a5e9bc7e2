//! Resource discovery through Azure Resource Graph
//!
//! A single query pairs every VM with the Bastion host deployed in the same
//! virtual network. The query text is only reflowed onto one line before it is
//! submitted; only the `data` rows of the response are interpreted.

use serde::Deserialize;

use crate::az::AzureCli;
use crate::error::Result;

/// Joins VMs to their primary NIC, NICs to Bastion hosts by VNet name, and adds the
/// subscription display name. `split(subnetId, '/')[8]` is the VNet segment of
/// `/subscriptions/<s>/resourceGroups/<rg>/providers/Microsoft.Network/virtualNetworks/<vnet>/subnets/<subnet>`.
pub const BASTION_TARGETS_QUERY: &str = "\
Resources
| where type =~ 'microsoft.compute/virtualmachines'
| project vmName = name, vmId = id, subscriptionId,
    nicId = tolower(tostring(properties.networkProfile.networkInterfaces[0].id))
| join kind=inner (
    Resources
    | where type =~ 'microsoft.network/networkinterfaces'
    | project nicId = tolower(id),
        vnetName = tostring(split(tostring(properties.ipConfigurations[0].properties.subnet.id), '/')[8])
) on nicId
| join kind=inner (
    Resources
    | where type =~ 'microsoft.network/bastionhosts'
    | project bastionName = name, resourceGroup,
        vnetName = tostring(split(tostring(properties.ipConfigurations[0].properties.subnet.id), '/')[8])
) on vnetName
| join kind=inner (
    ResourceContainers
    | where type =~ 'microsoft.resources/subscriptions'
    | project subscriptionId, subscriptionName = name
) on subscriptionId
| project vmName, vmId, bastionName, resourceGroup, subscriptionName, subscriptionId
| order by subscriptionName asc, vmName asc";

/// A VM reachable through a Bastion host
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BastionTarget {
    pub vm_name: String,
    pub vm_id: String,
    pub bastion_name: String,
    pub resource_group: String,
    pub subscription_name: String,
    pub subscription_id: String,
}

#[derive(Debug, Deserialize)]
struct GraphResponse {
    #[serde(default)]
    data: Vec<BastionTarget>,
}

/// Parse a Resource Graph response into targets ordered by subscription, then VM name
pub fn parse_targets(json: &str) -> Result<Vec<BastionTarget>> {
    let response: GraphResponse = serde_json::from_str(json)?;
    let mut targets = response.data;
    targets.sort_by(|a, b| {
        a.subscription_name
            .cmp(&b.subscription_name)
            .then_with(|| a.vm_name.cmp(&b.vm_name))
    });
    Ok(targets)
}

/// Collapse a multi-line query into one line.
///
/// On Windows `az` is a batch file and cmd.exe ends a command at the first
/// newline, so the query must reach it as a single line.
pub fn single_line(query: &str) -> String {
    query.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Run the discovery query. An empty result is not an error.
pub fn discover(cli: &dyn AzureCli) -> Result<Vec<BastionTarget>> {
    let json = cli.graph_query(&single_line(BASTION_TARGETS_QUERY))?;
    let targets = parse_targets(&json)?;
    log::debug!("discovered {} bastion target(s)", targets.len());
    Ok(targets)
}
