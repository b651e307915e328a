// SPDX-License-Identifier: AGPL-3.0-or-later
//! Quorumup: single-node provisioning for a clustered coordination service
//!
//! Running `quorumup install` turns the local machine into a server member
//! of the coordination-service cluster. The work is a fixed, fail-fast
//! sequence of external provisioning steps (bootstrap, verify, install,
//! configure, start) driven by the [`install::Installer`].
//!
//! # Features
//!
//! * **Ordered provisioning pipeline:** one linear step sequence, stopping
//!   at the first failure and propagating its exit code
//! * **Derived cluster identity:** self IP and server count are resolved
//!   once per run and shared across steps
//! * **Pluggable process execution:** external scripts run through the
//!   [`exec::CommandRunner`] capability, so tests never touch the network

pub mod error;
pub mod exec;
pub mod install;

pub use error::{InstallError, Result};
pub use exec::{CommandRunner, ExecResult, ShellRunner};
pub use install::{InstallContext, InstallState, Installer};
