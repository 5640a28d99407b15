//! Constants for weasis-launcher.
//!
//! Directive keys and request parameter names are part of the wire contract with
//! the Weasis custom-scheme handler and must not change.

use std::path::PathBuf;
use std::sync::LazyLock;

//--------------------------------------------------------------------------------------------------
// Constants: Launch URI
//--------------------------------------------------------------------------------------------------

/// Prefix of every launch URI.
pub const LAUNCH_SCHEME_PREFIX: &str = "weasis://";

/// Directive that makes the viewer download the manifest.
pub const DIRECTIVE_MANIFEST: &str = "$dicom:get -w";

/// Directive that opens the viewer configuration group.
pub const DIRECTIVE_CONFIG: &str = "$weasis:config";

//--------------------------------------------------------------------------------------------------
// Constants: Parameters
//--------------------------------------------------------------------------------------------------

/// Remote configuration URL. Used both as request parameter and directive key.
pub const PARAM_CONFIG_URL: &str = "config.url";

/// Codebase of the viewer.
pub const PARAM_CODEBASE: &str = "codebase";

/// Extended codebase of the viewer.
pub const PARAM_CODEBASE_EXT: &str = "ext-codebase";

/// Viewer property, raw form `"<key> <value>"`.
pub const PARAM_PROPERTY: &str = "property";

/// Free-form viewer argument.
pub const PARAM_ARGUMENT: &str = "argument";

/// Authorization value handed to the viewer.
pub const PARAM_AUTHORIZATION: &str = "authorization";

/// Parameters selecting the studies to put in the manifest, in forwarding order.
pub const MANIFEST_SELECTION_PARAMS: &[&str] = &[
    "patientID",
    "studyUID",
    "accessionNumber",
    "seriesUID",
    "objectUID",
];

//--------------------------------------------------------------------------------------------------
// Constants: Connector settings
//--------------------------------------------------------------------------------------------------

/// Remote configuration service URL.
pub const SERVICE_CONFIG: &str = "weasis.config.url";

/// Preferences service URL.
pub const SERVICE_PREFS: &str = "weasis.pref.url";

/// Default codebase.
pub const SETTING_CODEBASE: &str = "weasis.base.url";

/// Default extended codebase.
pub const SETTING_CODEBASE_EXT: &str = "weasis.ext.url";

/// Comma-separated hosts allowed to call the launcher.
pub const SETTING_HOSTS_ALLOW: &str = "hosts.allow";

/// Endpoint of the manifest builder.
pub const SETTING_MANIFEST_SERVICE: &str = "manifest.service.url";

/// Placeholder replaced with the base URL of the incoming request.
pub const SERVER_BASE_URL_PLACEHOLDER: &str = "server.base.url";

//--------------------------------------------------------------------------------------------------
// Constants: Server
//--------------------------------------------------------------------------------------------------

/// Route served by the launcher.
pub const LAUNCH_ROUTE: &str = "/weasis";

/// Default bind address.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default port.
pub const DEFAULT_PORT: u16 = 8080;

/// Largest form body accepted on POST.
pub const MAX_FORM_BODY_BYTES: usize = 1024 * 1024;

/// Environment variable for the configuration file path.
pub const CONFIG_PATH_ENV: &str = "WEASIS_LAUNCHER_CONFIG";

/// Default home directory for launcher configuration.
pub static DEFAULT_HOME_PATH: LazyLock<PathBuf> = LazyLock::new(|| {
    dirs::home_dir()
        .map(|h| h.join(".weasis-launcher"))
        .unwrap_or_else(|| PathBuf::from(".weasis-launcher"))
});

/// Default configuration file.
pub static DEFAULT_CONFIG_PATH: LazyLock<PathBuf> =
    LazyLock::new(|| DEFAULT_HOME_PATH.join("config.toml"));

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Get the configuration path, checking WEASIS_LAUNCHER_CONFIG first.
///
/// Returns `None` when neither the env var is set nor the default file exists.
pub fn get_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV)
        && !path.is_empty()
    {
        return Some(PathBuf::from(path));
    }

    DEFAULT_CONFIG_PATH
        .exists()
        .then(|| DEFAULT_CONFIG_PATH.clone())
}
