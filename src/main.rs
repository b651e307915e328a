// SPDX-License-Identifier: AGPL-3.0-or-later
//! Quorumup: single-node provisioning for a clustered coordination service
//!
//! The machine where `quorumup install` runs becomes a server member of the
//! coordination-service cluster.

use anyhow::bail;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use quorumup::{InstallContext, Installer, ShellRunner};

/// Quorumup: provisioning for coordination-service server nodes
///
/// Installs the coordination service on this machine and joins it to the
/// cluster as a server member. All provisioning scripts run from fixed,
/// well-known locations.
#[derive(Parser, Debug)]
#[command(name = "quorumup")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Install the coordination service and make this machine a server member
    Install {
        /// Comma-separated IP addresses of all other server members in the
        /// cluster. Do not include the address of this machine.
        #[arg(long = "member-ips")]
        member_ips: Option<String>,

        /// IP address of this machine. Resolved automatically when omitted.
        #[arg(long = "self-ip")]
        self_ip: Option<String>,

        /// The install command takes no positional arguments.
        #[arg(hide = true)]
        extra: Vec<String>,
    },

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(cli.debug)
        .init();

    match cli.command {
        Commands::Version => {
            println!("quorumup v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }

        Commands::Install {
            member_ips,
            self_ip,
            extra,
        } => install_server(member_ips, self_ip, extra).await,
    }
}

/// Run the provisioning pipeline and exit with its code.
async fn install_server(
    member_ips: Option<String>,
    self_ip: Option<String>,
    extra: Vec<String>,
) -> anyhow::Result<()> {
    // Usage error before any external process runs; a returned error from
    // main exits with code 1.
    if !extra.is_empty() {
        bail!(
            "unexpected argument(s): {}. The install command takes no positional arguments; see --help",
            extra.join(" ")
        );
    }

    let ctx = InstallContext::new(
        member_ips.as_deref().unwrap_or(""),
        self_ip.as_deref().unwrap_or(""),
    );
    info!(peers = ctx.peer_ips.len(), "starting install");

    let mut installer = Installer::new(ShellRunner::new(), ctx);
    let code = installer.run().await;

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["quorumup", "version"]).unwrap();
        match cli.command {
            Commands::Version => {}
            _ => panic!("Expected Version command"),
        }
    }

    #[test]
    fn test_cli_install_flags() {
        let cli = Cli::try_parse_from([
            "quorumup",
            "install",
            "--member-ips=10.0.0.2,10.0.0.3",
            "--self-ip=10.0.0.1",
        ])
        .unwrap();
        match cli.command {
            Commands::Install {
                member_ips,
                self_ip,
                extra,
            } => {
                assert_eq!(member_ips.as_deref(), Some("10.0.0.2,10.0.0.3"));
                assert_eq!(self_ip.as_deref(), Some("10.0.0.1"));
                assert!(extra.is_empty());
            }
            _ => panic!("Expected Install command"),
        }
    }

    #[test]
    fn test_cli_install_flags_optional() {
        let cli = Cli::try_parse_from(["quorumup", "install"]).unwrap();
        match cli.command {
            Commands::Install {
                member_ips,
                self_ip,
                ..
            } => {
                assert!(member_ips.is_none());
                assert!(self_ip.is_none());
            }
            _ => panic!("Expected Install command"),
        }
    }

    #[test]
    fn test_cli_captures_positional_arguments() {
        let cli = Cli::try_parse_from(["quorumup", "install", "extra"]).unwrap();
        match cli.command {
            Commands::Install { extra, .. } => {
                assert_eq!(extra, vec!["extra".to_string()]);
            }
            _ => panic!("Expected Install command"),
        }
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::try_parse_from(["quorumup", "-v", "version"]).unwrap();
        assert!(cli.verbose);
    }
}
