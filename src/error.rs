// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for Quorumup

use thiserror::Error;

/// Result type alias for Quorumup operations
pub type Result<T> = std::result::Result<T, InstallError>;

/// Errors that abort a provisioning run.
///
/// Every variant carries the exit code of the failing external process so
/// the run can propagate it verbatim as the process exit status.
#[derive(Error, Debug)]
pub enum InstallError {
    /// Bootstrap package could not be fetched
    #[error("Install failed: could not fetch bootstrap package {url} (exit code {code})")]
    BootstrapFetch { url: String, code: i32 },

    /// Bootstrap script ran but exited non-zero
    #[error("Install failed: error while bootstrapping (exit code {code})")]
    BootstrapRun { code: i32 },

    /// Expected post-bootstrap layout is missing
    #[error("Install failed: bootstrap failed: missing path: {path} (exit code {code})")]
    MissingLayout { path: String, code: i32 },

    /// Coordination-service installer exited non-zero
    #[error("Install failed: error installing the coordination service (exit code {code})")]
    ServiceInstall { code: i32 },

    /// Local IP discovery script exited non-zero
    #[error("Install failed: error fetching local IP address (exit code {code})")]
    IdentityResolution { code: i32 },

    /// Server-role configuration script exited non-zero
    #[error("Install failed: error setting the server role (exit code {code})")]
    RoleConfig { code: i32 },

    /// Service start script exited non-zero
    #[error("Install failed: error starting the coordination service (exit code {code})")]
    ServiceStart { code: i32 },
}

impl InstallError {
    /// Exit code of the external process behind this failure.
    ///
    /// Callers must not infer step identity from the code alone; the codes
    /// of different steps share one space.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::BootstrapFetch { code, .. }
            | Self::BootstrapRun { code }
            | Self::MissingLayout { code, .. }
            | Self::ServiceInstall { code }
            | Self::IdentityResolution { code }
            | Self::RoleConfig { code }
            | Self::ServiceStart { code } => *code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_passthrough() {
        let err = InstallError::RoleConfig { code: 3 };
        assert_eq!(err.exit_code(), 3);

        let err = InstallError::BootstrapFetch {
            url: "https://example.invalid/bootstrap.sh".to_string(),
            code: 7,
        };
        assert_eq!(err.exit_code(), 7);
    }

    #[test]
    fn test_messages_are_prefixed() {
        let err = InstallError::ServiceStart { code: 1 };
        assert!(err.to_string().starts_with("Install failed:"));

        let err = InstallError::MissingLayout {
            path: "/etc/quorumup.d/scripts".to_string(),
            code: 2,
        };
        assert!(err.to_string().contains("/etc/quorumup.d/scripts"));
    }
}
