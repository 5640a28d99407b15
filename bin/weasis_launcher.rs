//! `weasis-launcher` is the primary CLI binary.

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;
use weasis_launcher::handlers::{self, UriOptions};
use weasis_launcher::{Cli, Command, LaunchError, LaunchResult};

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        print_error(&e);
        std::process::exit(1);
    }
}

/// Print an error with appropriate formatting based on error type.
fn print_error(e: &LaunchError) {
    eprintln!();
    match e {
        LaunchError::InvalidManifestReference(reference) => {
            eprintln!("  {} Invalid manifest reference", "error".bright_red().bold());
            eprintln!();
            eprintln!("    {}: {}", "Manifest".dimmed(), reference);
            eprintln!();
            eprintln!(
                "    {}: the manifest must be a URL such as {}",
                "hint".bright_blue().bold(),
                "http://host/manifest.xml".bright_white()
            );
        }
        LaunchError::MissingSetting(key) => {
            eprintln!("  {} Missing connector setting", "error".bright_red().bold());
            eprintln!();
            eprintln!(
                "    {}: add {} to the [properties] of the configuration",
                "hint".bright_blue().bold(),
                key.bright_white()
            );
        }
        _ => {
            let msg = e.to_string();
            match msg.split_once(": ") {
                Some((prefix, rest)) if prefix.ends_with("error") => {
                    eprintln!(
                        "  {} {}",
                        format!("error[{}]", prefix.to_lowercase().replace(" error", ""))
                            .bright_red()
                            .bold(),
                        rest.dimmed()
                    );
                }
                _ => eprintln!("  {} {}", "error".bright_red().bold(), msg),
            }
        }
    }
    eprintln!();
}

/// Initialize tracing. Only enables logging when RUST_LOG is set.
fn init_tracing() {
    let rust_log_set = std::env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.is_empty())
        .is_some();

    if !rust_log_set {
        return;
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();
}

async fn run() -> LaunchResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { host, port } => handlers::serve_launcher(cli.config, host, port).await,

        Command::Uri {
            manifest,
            config_url,
            codebase,
            ext_codebase,
            properties,
            arguments,
            authorization,
            json,
        } => handlers::print_launch_uri(
            cli.config,
            UriOptions {
                manifest,
                config_url,
                codebase,
                ext_codebase,
                properties,
                arguments,
                authorization,
            },
            json,
        ),
    }
}
