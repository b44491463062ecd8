//! # regcheck CLI entry point
//!
//! Parses the (ambient-only) command line, sets up logging, checks the
//! repository-root precondition and runs the verification.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use regcheck_cli::run_verify;
use regcheck_core::RepoLayout;

/// Verify that every file under `data/` matches its schema in `schema/`,
/// is covered by CODEOWNERS, and that every `0x…` directory is an EIP-55
/// checksummed address.
///
/// Must be run from the repository root.
#[derive(Parser, Debug)]
#[command(name = "regcheck", version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbosity flag.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("regcheck v{} starting", env!("CARGO_PKG_VERSION"));

    let layout = match RepoLayout::from_current_dir() {
        Ok(layout) => layout,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(1);
        }
    };
    tracing::debug!(root = %layout.root().display(), "resolved repository root");

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    match run_verify(&layout, &mut stdout.lock(), stderr.lock()) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::debug!(error = ?e, "verification aborted");
            eprintln!("Error: {e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_no_arguments() {
        let cli = Cli::try_parse_from(["regcheck"]).unwrap();
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn cli_parse_repeated_verbose() {
        let cli = Cli::try_parse_from(["regcheck", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn cli_rejects_positional_arguments() {
        assert!(Cli::try_parse_from(["regcheck", "data/"]).is_err());
    }
}
