//! Label handling
//!
//! TMC adds bookkeeping labels to every object it manages. Those keys are
//! never part of the declared configuration, so they are dropped before two
//! label maps are compared.

use crate::tmc::meta::Labels;

/// Keys injected by the server
pub const INJECTED_LABEL_KEYS: &[&str] = &[
    "tmc.cloud.vmware.com/creator",
    "tmc.cloud.vmware.com/managed",
    "tmc.cloud.vmware.com/workspace",
];

pub fn is_injected(key: &str) -> bool {
    INJECTED_LABEL_KEYS.contains(&key)
}

/// `labels` without the server-injected keys
pub fn declared_labels(labels: &Labels) -> Labels {
    labels
        .iter()
        .filter(|(k, _)| !is_injected(k))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Whether two label maps differ in any key the user controls
pub fn labels_changed(prior: &Labels, proposed: &Labels) -> bool {
    declared_labels(prior) != declared_labels(proposed)
}

/// Keys whose values differ between the two maps, injected keys excluded
pub fn changed_keys(prior: &Labels, proposed: &Labels) -> Vec<String> {
    let mut keys: Vec<String> = prior
        .keys()
        .chain(proposed.keys())
        .filter(|k| !is_injected(k) && prior.get(*k) != proposed.get(*k))
        .cloned()
        .collect();
    keys.sort();
    keys.dedup();
    keys
}
