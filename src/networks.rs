// Group listed containers by the networks they are attached to.

use crate::models::ContainerIdentity;
use std::collections::BTreeMap;

/// Group name for containers attached to no network.
pub const NO_NETWORK: &str = "(none)";

/// Network name -> member containers, sorted by lower-cased name within each group.
/// A container attached to several networks appears in each of them.
pub fn group_by_network(containers: &[ContainerIdentity]) -> BTreeMap<String, Vec<ContainerIdentity>> {
    let mut groups: BTreeMap<String, Vec<ContainerIdentity>> = BTreeMap::new();
    for c in containers {
        if c.networks.is_empty() {
            groups.entry(NO_NETWORK.to_string()).or_default().push(c.clone());
            continue;
        }
        for net in &c.networks {
            groups.entry(net.clone()).or_default().push(c.clone());
        }
    }
    for members in groups.values_mut() {
        members.sort_by_key(|c| c.name.to_lowercase());
    }
    groups
}
