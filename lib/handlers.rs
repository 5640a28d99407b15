//! Command handlers.

use crate::config::ConnectorConfig;
use crate::constants::{
    PARAM_ARGUMENT, PARAM_CODEBASE, PARAM_CODEBASE_EXT, PARAM_CONFIG_URL, PARAM_PROPERTY,
    get_config_path,
};
use crate::descriptor::build_descriptor;
use crate::error::LaunchResult;
use crate::launch::Launcher;
use crate::request::{LaunchRequest, RequestParameters};
use crate::server::{ServeConfig, serve};
use crate::uri::assemble;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Inputs of the `uri` command.
#[derive(Debug, Clone, Default)]
pub struct UriOptions {
    pub manifest: String,
    pub config_url: Option<String>,
    pub codebase: Option<String>,
    pub ext_codebase: Option<String>,
    pub properties: Vec<String>,
    pub arguments: Vec<String>,
    pub authorization: Option<String>,
}

#[derive(Serialize)]
struct UriOutput<'a> {
    descriptor: &'a str,
    uri: &'a str,
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Load the connector configuration from the flag, the env var or the default location.
pub fn load_config(path: Option<PathBuf>) -> LaunchResult<ConnectorConfig> {
    ConnectorConfig::load_or_default(path.or_else(get_config_path).as_deref())
}

/// Run the HTTP redirect service.
pub async fn serve_launcher(
    config_path: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
) -> LaunchResult<()> {
    let config = load_config(config_path)?;
    let serve_config = ServeConfig {
        host: host.unwrap_or_else(|| config.server.host.clone()),
        port: port.unwrap_or(config.server.port),
    };

    eprintln!(
        "  {} Serving launch redirects on {}\n",
        "✓".bright_green(),
        format!("http://{}:{}", serve_config.host, serve_config.port).bright_white()
    );

    serve(Launcher::with_defaults(config), serve_config).await
}

/// Build and print a launch URI.
pub fn print_launch_uri(
    config_path: Option<PathBuf>,
    options: UriOptions,
    json: bool,
) -> LaunchResult<()> {
    let config = load_config(config_path)?;
    let request = uri_request(options.clone());
    let resolved = config.resolve(&request);

    let descriptor = build_descriptor(&options.manifest, &resolved, &request)?;
    let uri = assemble(&descriptor);

    if json {
        let output = UriOutput {
            descriptor: descriptor.as_str(),
            uri: uri.as_str(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!();
    println!("  {}", "Descriptor".dimmed());
    println!("    {}", descriptor.as_str().bright_white());
    println!();
    println!("  {}", "URI".dimmed());
    println!("    {}", uri.as_str().bright_cyan());
    println!();
    Ok(())
}

/// Turn CLI flags into the parameters an HTTP caller would send.
fn uri_request(options: UriOptions) -> LaunchRequest {
    let mut params = RequestParameters::new();

    let singles = [
        (PARAM_CONFIG_URL, options.config_url),
        (PARAM_CODEBASE, options.codebase),
        (PARAM_CODEBASE_EXT, options.ext_codebase),
    ];
    for (name, value) in singles {
        if let Some(value) = value {
            params.push(name, value);
        }
    }
    for property in options.properties {
        params.push(PARAM_PROPERTY, property);
    }
    for argument in options.arguments {
        params.push(PARAM_ARGUMENT, argument);
    }

    LaunchRequest {
        params,
        authorization: options.authorization,
        ..Default::default()
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_uri_request_maps_flags_to_parameters() {
        let request = uri_request(UriOptions {
            manifest: "wado:http://host/manifest.xml".to_string(),
            codebase: Some(String::new()),
            properties: vec!["host 123".to_string()],
            arguments: vec!["-v".to_string(), "-v".to_string()],
            authorization: Some("tok".to_string()),
            ..Default::default()
        });

        assert_eq!(request.params.first(PARAM_CODEBASE), Some(""));
        assert_eq!(request.params.first(PARAM_CONFIG_URL), None);
        assert_eq!(request.params.all(PARAM_PROPERTY), ["host 123"]);
        assert_eq!(request.params.all(PARAM_ARGUMENT), ["-v", "-v"]);
        assert_eq!(request.authorization.as_deref(), Some("tok"));
    }

    #[test]
    fn test_print_launch_uri_with_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[properties]\n\"weasis.config.url\" = \"http://cfg\"\n")
            .unwrap();

        let options = UriOptions {
            manifest: "wado:http://host/manifest.xml".to_string(),
            ..Default::default()
        };
        print_launch_uri(Some(file.path().to_path_buf()), options, true).unwrap();
    }

    #[test]
    fn test_print_launch_uri_rejects_bad_manifest() {
        let file = NamedTempFile::new().unwrap();
        let options = UriOptions {
            manifest: "manifest.xml".to_string(),
            ..Default::default()
        };
        assert!(print_launch_uri(Some(file.path().to_path_buf()), options, false).is_err());
    }
}
