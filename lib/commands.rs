//! CLI command definitions.

use clap::builder::styling::{AnsiColor, Color, Style, Styles};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

const SERVE_EXAMPLES: &str = "\
Examples:
  weasis-launcher serve                          Serve on 127.0.0.1:8080
  weasis-launcher serve --host 0.0.0.0 -p 9000   Bind to all interfaces
  weasis-launcher -c connector.toml serve        Use a connector configuration";

const URI_EXAMPLES: &str = "\
Examples:
  weasis-launcher uri -m wado:http://host/manifest.xml
  weasis-launcher uri -m http://pacs/manifest?studyUID=1.2 -P \"weasis.theme dark\" -a -v
  weasis-launcher uri -m http://pacs/manifest --config-url http://pacs/config.json
  weasis-launcher uri -m http://pacs/manifest --authorization \"Bearer abc\" --json";

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Weasis launcher - redirect study requests to the Weasis viewer.
#[derive(Debug, Parser)]
#[command(name = "weasis-launcher", author, version, styles = styles())]
#[command(about = "Build weasis:// launch URIs and serve them as HTTP redirects")]
pub struct Cli {
    /// Connector configuration file (TOML).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve launch redirects over HTTP.
    #[command(after_help = SERVE_EXAMPLES)]
    Serve {
        /// Host/address to bind to (overrides the configuration).
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides the configuration).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the launch descriptor and URI for a manifest.
    #[command(after_help = URI_EXAMPLES)]
    Uri {
        /// Manifest URL.
        #[arg(short, long)]
        manifest: String,

        /// Remote configuration URL (replaces codebase, properties and arguments).
        #[arg(long)]
        config_url: Option<String>,

        /// Viewer codebase.
        #[arg(long)]
        codebase: Option<String>,

        /// Viewer extended codebase.
        #[arg(long)]
        ext_codebase: Option<String>,

        /// Viewer property as "<key> <value>" (repeatable).
        #[arg(short = 'P', long = "property")]
        properties: Vec<String>,

        /// Viewer argument (repeatable).
        #[arg(short = 'a', long = "argument", allow_hyphen_values = true)]
        arguments: Vec<String>,

        /// Authorization value passed to the viewer.
        #[arg(long)]
        authorization: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

fn styles() -> Styles {
    Styles::styled()
        .header(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Blue))),
        )
        .usage(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Blue))),
        )
        .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
        .placeholder(Style::new().dimmed())
        .error(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
