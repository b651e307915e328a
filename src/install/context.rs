// SPDX-License-Identifier: AGPL-3.0-or-later
//! Shared installation context and cluster-size derivation
//!
//! One [`InstallContext`] exists per run. It is owned by the orchestrator,
//! handed to each step by reference, and discarded when the process exits.

/// Data shared across provisioning steps.
#[derive(Debug, Clone)]
pub struct InstallContext {
    /// Addresses of the other cluster members, excluding this machine.
    /// Parsed once from the operator-supplied flag; immutable afterwards.
    /// Address syntax is not validated here; values pass through verbatim.
    pub peer_ips: Vec<String>,

    /// This machine's address. Empty until resolved, then fixed for the
    /// remainder of the run.
    pub self_ip: String,

    /// Total cluster members including this machine. Zero until the
    /// derivation step runs, then positive; never supplied directly.
    pub server_count: usize,
}

impl InstallContext {
    /// Build a context from the raw operator-supplied flag values.
    pub fn new(member_ips: &str, self_ip: &str) -> Self {
        Self {
            peer_ips: parse_peer_ips(member_ips),
            self_ip: self_ip.trim().to_string(),
            server_count: 0,
        }
    }
}

/// Split a comma-separated address list, trimming entries and discarding
/// empty ones. A blank or whitespace-only input yields an empty list.
pub fn parse_peer_ips(member_ips: &str) -> Vec<String> {
    member_ips
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(String::from)
        .collect()
}

/// Total server count for the cluster: 1 when this machine has no peers,
/// otherwise the peer count plus this machine.
pub fn derive_server_count(peer_ips: &[String]) -> usize {
    if peer_ips.is_empty() {
        1
    } else {
        peer_ips.len() + 1
    }
}
