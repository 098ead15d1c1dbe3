//! Diagnostic probe for the vault service socket.
//!
//! Connects to the service and runs every diagnostic scenario, printing
//! a per-scenario report.
//!
//! Usage:
//!   vault-ipc-probe [socket_path]
//!   vault-ipc-probe --debug [socket_path]
//!   vault-ipc-probe --help

// ============================================================================
// Imports
// ============================================================================

use std::path::PathBuf;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;
use vault_ipc::{Session, default_socket_path, diagnostics};

// ============================================================================
// Args
// ============================================================================

/// Command-line arguments.
#[derive(Debug, Clone)]
struct Args {
    help: bool,
    debug: bool,
    socket_path: Option<PathBuf>,
}

impl Args {
    /// Parse command-line arguments.
    fn parse() -> Self {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self {
            help: args.iter().any(|a| a == "--help" || a == "-h"),
            debug: args.iter().any(|a| a == "--debug"),
            socket_path: args
                .iter()
                .find(|a| !a.starts_with("--"))
                .map(PathBuf::from),
        }
    }
}

// ============================================================================
// Functions
// ============================================================================

/// Initialize tracing/logging.
fn init_logging(debug: bool) {
    let filter = if debug {
        "vault_ipc=debug"
    } else {
        "vault_ipc=warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();
}

fn print_help() {
    println!("Vault IPC Probe");
    println!("Usage: vault-ipc-probe [--debug] [socket_path]");
    println!();
    println!("Tests IPC communication with the PhantomVault service");
    println!("Default socket path: /tmp/phantom-vault-{{uid}}.sock");
    println!("Override with the VAULT_IPC_SOCKET environment variable");
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if args.help {
        print_help();
        return ExitCode::SUCCESS;
    }

    init_logging(args.debug);

    let socket_path = args.socket_path.unwrap_or_else(default_socket_path);
    println!("=== Vault IPC Probe ===\n");

    if !socket_path.exists() {
        println!("[ERROR] Socket file not found: {}", socket_path.display());
        println!("Make sure the PhantomVault service is running.");
        return ExitCode::FAILURE;
    }

    let mut session = match Session::builder().socket_path(&socket_path).connect().await {
        Ok(session) => session,
        Err(e) => {
            println!("[ERROR] {e}");
            return ExitCode::FAILURE;
        }
    };
    println!("Connected to {}\n", socket_path.display());

    let report = diagnostics::run(&mut session).await;
    println!("{report}");

    session.disconnect().await;
    println!("\nIPC communication test completed");

    ExitCode::SUCCESS
}
