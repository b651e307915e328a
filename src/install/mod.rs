// SPDX-License-Identifier: AGPL-3.0-or-later
//! Provisioning pipeline
//!
//! Everything needed to turn this machine into a server member of the
//! coordination-service cluster: the shared installation context, the fixed
//! script catalog, and the orchestrator that runs the steps in order.

mod context;
mod installer;
mod scripts;

pub use context::{derive_server_count, parse_peer_ips, InstallContext};
pub use installer::{InstallState, Installer};
pub use scripts::ScriptCatalog;
