// SPDX-License-Identifier: AGPL-3.0-or-later
//! Provisioning orchestrator
//!
//! Owns the step sequence and the installation context. Steps run strictly
//! in order on the calling task, with no concurrency and no retries; the
//! first failure aborts the run and its exit code becomes the run's exit
//! code. Each step builds its own command locally so no command state leaks
//! between steps.

use tracing::{debug, info, warn};

use super::context::{derive_server_count, InstallContext};
use super::scripts::ScriptCatalog;
use crate::error::{InstallError, Result};
use crate::exec::CommandRunner;

/// Where the orchestrator is in its linear step sequence.
///
/// `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallState {
    Pending,
    Bootstrapping,
    VerifyingLayout,
    InstallingService,
    DerivingCount,
    ResolvingIdentity,
    ConfiguringRole,
    Starting,
    Completed,
    Failed,
}

/// One step of the provisioning pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Bootstrap,
    VerifyLayout,
    InstallService,
    DeriveServerCount,
    ResolveSelfIp,
    ConfigureRole,
    StartService,
}

/// The fixed execution order. The orchestrator never reorders, skips, or
/// retries entries; it only stops early on failure.
const STEP_ORDER: [Step; 7] = [
    Step::Bootstrap,
    Step::VerifyLayout,
    Step::InstallService,
    Step::DeriveServerCount,
    Step::ResolveSelfIp,
    Step::ConfigureRole,
    Step::StartService,
];

impl Step {
    /// State the orchestrator enters while this step runs.
    fn entered(self) -> InstallState {
        match self {
            Step::Bootstrap => InstallState::Bootstrapping,
            Step::VerifyLayout => InstallState::VerifyingLayout,
            Step::InstallService => InstallState::InstallingService,
            Step::DeriveServerCount => InstallState::DerivingCount,
            Step::ResolveSelfIp => InstallState::ResolvingIdentity,
            Step::ConfigureRole => InstallState::ConfiguringRole,
            Step::StartService => InstallState::Starting,
        }
    }
}

/// Orchestrator for one provisioning run.
pub struct Installer<R: CommandRunner> {
    runner: R,
    ctx: InstallContext,
    scripts: ScriptCatalog,
    state: InstallState,
}

impl<R: CommandRunner> Installer<R> {
    /// Create an orchestrator using the fixed production script locations.
    pub fn new(runner: R, ctx: InstallContext) -> Self {
        Self::with_scripts(runner, ctx, ScriptCatalog::default())
    }

    /// Create an orchestrator with explicit script locations.
    pub fn with_scripts(runner: R, ctx: InstallContext, scripts: ScriptCatalog) -> Self {
        Self {
            runner,
            ctx,
            scripts,
            state: InstallState::Pending,
        }
    }

    pub fn state(&self) -> InstallState {
        self.state
    }

    pub fn context(&self) -> &InstallContext {
        &self.ctx
    }

    /// Run every step in order, stopping at the first failure.
    ///
    /// Returns 0 only when every fallible step succeeded; otherwise the
    /// exit code of the first failing step, after printing its single
    /// descriptive failure line.
    pub async fn run(&mut self) -> i32 {
        match self.try_run().await {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("{}", e);
                e.exit_code()
            }
        }
    }

    async fn try_run(&mut self) -> Result<()> {
        for step in STEP_ORDER {
            self.state = step.entered();
            debug!(state = ?self.state, "starting step");

            if let Err(e) = self.run_step(step).await {
                self.state = InstallState::Failed;
                return Err(e);
            }
        }

        self.state = InstallState::Completed;
        info!(server_count = self.ctx.server_count, "install completed");
        Ok(())
    }

    async fn run_step(&mut self, step: Step) -> Result<()> {
        match step {
            Step::Bootstrap => self.bootstrap().await,
            Step::VerifyLayout => self.verify_layout().await,
            Step::InstallService => self.install_service().await,
            Step::DeriveServerCount => {
                self.derive_server_count();
                Ok(())
            }
            Step::ResolveSelfIp => self.resolve_self_ip().await,
            Step::ConfigureRole => self.configure_role().await,
            Step::StartService => self.start_service().await,
        }
    }

    /// Fetch the bootstrap package and execute it as a script. The fetched
    /// artifact is removed whatever the outcome; only fetch and execution
    /// failures are propagated.
    async fn bootstrap(&mut self) -> Result<()> {
        let fetch = self
            .runner
            .run(
                "curl",
                &[
                    "-sSL",
                    self.scripts.bootstrap_url.as_str(),
                    "-o",
                    self.scripts.bootstrap_artifact.as_str(),
                ],
            )
            .await;

        if !fetch.success() {
            self.remove_artifact().await;
            return Err(InstallError::BootstrapFetch {
                url: self.scripts.bootstrap_url.clone(),
                code: fetch.code,
            });
        }

        let exec = self
            .runner
            .run("sh", &[self.scripts.bootstrap_artifact.as_str()])
            .await;
        self.remove_artifact().await;

        if !exec.success() {
            return Err(InstallError::BootstrapRun { code: exec.code });
        }
        Ok(())
    }

    /// Best-effort removal of the downloaded bootstrap artifact. Cleanup
    /// failure is never escalated.
    async fn remove_artifact(&self) {
        if let Err(e) = tokio::fs::remove_file(&self.scripts.bootstrap_artifact).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(
                    artifact = %self.scripts.bootstrap_artifact,
                    error = %e,
                    "failed to remove bootstrap artifact"
                );
            }
        }
    }

    /// Confirm the bootstrap produced the expected script layout.
    async fn verify_layout(&mut self) -> Result<()> {
        let result = self
            .runner
            .run("ls", &[self.scripts.scripts_dir.as_str()])
            .await;

        if !result.success() {
            return Err(InstallError::MissingLayout {
                path: self.scripts.scripts_dir.clone(),
                code: result.code,
            });
        }
        Ok(())
    }

    async fn install_service(&mut self) -> Result<()> {
        let result = self
            .runner
            .run("sh", &[self.scripts.install_server.as_str()])
            .await;

        if !result.success() {
            return Err(InstallError::ServiceInstall { code: result.code });
        }
        Ok(())
    }

    /// Pure derivation; cannot fail. Role configuration later in the
    /// sequence depends on the quorum size holding its invariant here.
    fn derive_server_count(&mut self) {
        self.ctx.server_count = derive_server_count(&self.ctx.peer_ips);
        info!(
            peers = self.ctx.peer_ips.len(),
            server_count = self.ctx.server_count,
            "derived cluster size"
        );
    }

    /// Resolve this machine's address. When the operator supplied one, the
    /// discovery script is skipped entirely; either way the resolved value
    /// is reported exactly once.
    async fn resolve_self_ip(&mut self) -> Result<()> {
        if self.ctx.self_ip.trim().is_empty() {
            let result = self
                .runner
                .run("sh", &[self.scripts.get_private_ip.as_str()])
                .await;

            if !result.success() {
                return Err(InstallError::IdentityResolution { code: result.code });
            }
            self.ctx.self_ip = result.first_line.unwrap_or_default().trim().to_string();
        }

        println!("Self IP: {}", self.ctx.self_ip);
        info!(self_ip = %self.ctx.self_ip, "resolved self identity");
        Ok(())
    }

    async fn configure_role(&mut self) -> Result<()> {
        let result = self
            .runner
            .run("sh", &[self.scripts.set_server_role.as_str()])
            .await;

        if !result.success() {
            return Err(InstallError::RoleConfig { code: result.code });
        }
        Ok(())
    }

    async fn start_service(&mut self) -> Result<()> {
        let result = self
            .runner
            .run("sh", &[self.scripts.start_server.as_str()])
            .await;

        if !result.success() {
            return Err(InstallError::ServiceStart { code: result.code });
        }
        Ok(())
    }
}
