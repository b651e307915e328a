// SPDX-License-Identifier: AGPL-3.0-or-later
//! External process execution
//!
//! The provisioning steps are external scripts; everything that touches a
//! child process goes through the [`CommandRunner`] capability so the
//! orchestrator can be tested against scripted results instead of the real
//! network and filesystem.

use std::process::Stdio;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, error};

/// Exit code reported when the program could not be started at all.
pub const EXIT_NOT_STARTED: i32 = 127;

/// Outcome of running one external process to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    /// Process exit status: 0 on success, the process's own status on
    /// failure, [`EXIT_NOT_STARTED`] when it never started.
    pub code: i32,

    /// First line the process wrote to stdout, when any.
    pub first_line: Option<String>,
}

impl ExecResult {
    /// Successful result with no captured output.
    pub fn ok() -> Self {
        Self {
            code: 0,
            first_line: None,
        }
    }

    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Capability for running an external program to completion.
///
/// Implementations run synchronously from the caller's point of view: the
/// returned future resolves only once the process has exited. There is no
/// retry and no timeout; a hang in the child hangs the caller.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> ExecResult;
}

impl<T: CommandRunner> CommandRunner for Arc<T> {
    async fn run(&self, program: &str, args: &[&str]) -> ExecResult {
        (**self).run(program, args).await
    }
}

/// Production runner: spawns the program directly on the host.
///
/// Stdout is streamed line by line to the operator console as it is
/// produced (with the first line captured); stderr is inherited and reaches
/// the console on its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ShellRunner {
    async fn run(&self, program: &str, args: &[&str]) -> ExecResult {
        debug!(program, ?args, "spawning external process");

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                error!(program, error = %e, "failed to start program");
                return ExecResult {
                    code: EXIT_NOT_STARTED,
                    first_line: None,
                };
            }
        };

        let mut first_line = None;
        if let Some(stdout) = child.stdout.take() {
            let mut lines = BufReader::new(stdout).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        println!("{}", line);
                        if first_line.is_none() {
                            first_line = Some(line);
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        error!(program, error = %e, "failed reading process output");
                        break;
                    }
                }
            }
        }

        let code = match child.wait().await {
            // Signal termination has no code; report plain failure.
            Ok(status) => status.code().unwrap_or(1),
            Err(e) => {
                error!(program, error = %e, "failed waiting for process");
                1
            }
        };

        debug!(program, code, "external process finished");
        ExecResult { code, first_line }
    }
}
