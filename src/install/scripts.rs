// SPDX-License-Identifier: AGPL-3.0-or-later
//! Fixed locations of the provisioning scripts
//!
//! Every script path and URL is a compile-time constant; nothing here is
//! configurable per invocation. The bootstrap package is expected to create
//! [`SCRIPTS_DIR`] and place the remaining scripts inside it.

/// Remote location of the bootstrap package.
pub const BOOTSTRAP_URL: &str =
    "https://raw.githubusercontent.com/quorumup/quorumup/master/scripts/bootstrap.sh";

/// Local filename the bootstrap package is fetched to. Transient: always
/// removed after the bootstrap step, whatever its outcome.
pub const BOOTSTRAP_ARTIFACT: &str = "bootstrap.sh";

/// Directory the bootstrap package must create on success.
pub const SCRIPTS_DIR: &str = "/etc/quorumup.d/scripts";

/// Installer for the coordination service itself.
pub const INSTALL_SERVER_SCRIPT: &str = "/etc/quorumup.d/scripts/install_server.sh";

/// Prints the machine's private IP address on its first output line.
pub const GET_PRIVATE_IP_SCRIPT: &str = "/etc/quorumup.d/scripts/get_private_ip.sh";

/// Marks this node as a server member of the cluster.
pub const SET_SERVER_ROLE_SCRIPT: &str = "/etc/quorumup.d/scripts/set_server_role.sh";

/// Starts the coordination service under the host's service manager.
pub const START_SERVER_SCRIPT: &str = "/etc/quorumup.d/scripts/start_server.sh";

/// Resolved script locations for one provisioning run.
///
/// Defaults to the constants above. Tests substitute temporary paths; the
/// CLI never exposes these.
#[derive(Debug, Clone)]
pub struct ScriptCatalog {
    pub bootstrap_url: String,
    pub bootstrap_artifact: String,
    pub scripts_dir: String,
    pub install_server: String,
    pub get_private_ip: String,
    pub set_server_role: String,
    pub start_server: String,
}

impl Default for ScriptCatalog {
    fn default() -> Self {
        Self {
            bootstrap_url: BOOTSTRAP_URL.to_string(),
            bootstrap_artifact: BOOTSTRAP_ARTIFACT.to_string(),
            scripts_dir: SCRIPTS_DIR.to_string(),
            install_server: INSTALL_SERVER_SCRIPT.to_string(),
            get_private_ip: GET_PRIVATE_IP_SCRIPT.to_string(),
            set_server_role: SET_SERVER_ROLE_SCRIPT.to_string(),
            start_server: START_SERVER_SCRIPT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_uses_constants() {
        let catalog = ScriptCatalog::default();
        assert_eq!(catalog.bootstrap_url, BOOTSTRAP_URL);
        assert_eq!(catalog.bootstrap_artifact, BOOTSTRAP_ARTIFACT);
        assert_eq!(catalog.scripts_dir, SCRIPTS_DIR);
    }

    #[test]
    fn test_scripts_live_under_scripts_dir() {
        for script in [
            INSTALL_SERVER_SCRIPT,
            GET_PRIVATE_IP_SCRIPT,
            SET_SERVER_ROLE_SCRIPT,
            START_SERVER_SCRIPT,
        ] {
            assert!(script.starts_with(SCRIPTS_DIR));
        }
    }
}
