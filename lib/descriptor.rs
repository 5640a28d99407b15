//! Launch descriptor construction.
//!
//! A descriptor is the command line handed to the Weasis custom-scheme handler:
//!
//! ```text
//! $dicom:get -w "<manifest>" $weasis:config [config.url="<url>" | codebase[="<url>"]
//!     ext-codebase[="<url>"] property="<key> <value>"... argument="<arg>"...]
//!     [authorization="<value>"]
//! ```
//!
//! Values are wrapped in double quotes without escaping. The viewer's parser has
//! no escape sequence, so a value holding `"` cannot be represented and ends up
//! corrupting the descriptor.

use crate::config::ResolvedConfig;
use crate::constants::{
    DIRECTIVE_CONFIG, DIRECTIVE_MANIFEST, PARAM_ARGUMENT, PARAM_AUTHORIZATION, PARAM_CODEBASE,
    PARAM_CODEBASE_EXT, PARAM_CONFIG_URL, PARAM_PROPERTY, SERVICE_CONFIG, SERVICE_PREFS,
    SETTING_CODEBASE, SETTING_CODEBASE_EXT,
};
use crate::error::{LaunchError, LaunchResult};
use crate::request::LaunchRequest;
use crate::text::{has_text, split_property, strip_enclosing_quotes};
use indexmap::IndexMap;
use std::fmt;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// How a value is attached to its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueStyle {
    /// `key "value"`.
    Spaced,
    /// `key="value"`.
    Assigned,
}

/// When a directive is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// The key is always emitted, the value only when it has text.
    Always,
    /// Nothing is emitted unless the value has text.
    Valued,
}

/// One element of a launch descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    key: &'static str,
    value: Option<String>,
    style: ValueStyle,
    presence: Presence,
}

/// Ordered accumulator of directives.
#[derive(Debug, Clone, Default)]
pub struct DescriptorBuilder {
    directives: Vec<Directive>,
}

/// The serialized command string handed to the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchDescriptor(String);

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Directive {
    /// Directive carrying the manifest URL.
    ///
    /// Fails when the reference has no scheme separator.
    pub fn manifest(reference: &str) -> LaunchResult<Self> {
        match reference.find(':') {
            Some(index) if index > 0 => Ok(Self {
                key: DIRECTIVE_MANIFEST,
                value: Some(reference.to_string()),
                style: ValueStyle::Spaced,
                presence: Presence::Always,
            }),
            _ => Err(LaunchError::InvalidManifestReference(reference.to_string())),
        }
    }

    /// Bare key, always emitted.
    pub fn flag(key: &'static str) -> Self {
        Self {
            key,
            value: None,
            style: ValueStyle::Assigned,
            presence: Presence::Always,
        }
    }

    /// `key="value"`, dropped when the value is blank.
    pub fn assigned(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: Some(value.into()),
            style: ValueStyle::Assigned,
            presence: Presence::Valued,
        }
    }

    /// `key="value"`, degrading to a bare key when the value is blank.
    pub fn assigned_or_flag(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            presence: Presence::Always,
            ..Self::assigned(key, value)
        }
    }

    /// `property="<key> <value>"`.
    pub fn property(key: &str, value: &str) -> Self {
        Self::assigned(PARAM_PROPERTY, format!("{} {}", key, value))
    }

    /// Render the directive, or `None` when it must not be emitted.
    pub fn render(&self) -> Option<String> {
        let value = self.value.as_deref().filter(|v| has_text(v));
        match (value, self.presence) {
            (None, Presence::Valued) => None,
            (None, Presence::Always) => Some(self.key.to_string()),
            (Some(value), _) => {
                let separator = match self.style {
                    ValueStyle::Spaced => " ",
                    ValueStyle::Assigned => "=",
                };
                Some(format!("{}{}\"{}\"", self.key, separator, value))
            }
        }
    }
}

impl DescriptorBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a directive.
    pub fn push(&mut self, directive: Directive) -> &mut Self {
        self.directives.push(directive);
        self
    }

    /// Append several directives in order.
    pub fn extend(&mut self, directives: impl IntoIterator<Item = Directive>) -> &mut Self {
        self.directives.extend(directives);
        self
    }

    /// Serialize every emitted directive, separated by one space.
    pub fn build(&self) -> LaunchDescriptor {
        let rendered: Vec<String> = self.directives.iter().filter_map(Directive::render).collect();
        LaunchDescriptor(rendered.join(" "))
    }
}

impl LaunchDescriptor {
    /// The descriptor text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the descriptor and return its text.
    pub fn into_string(self) -> String {
        self.0
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl fmt::Display for LaunchDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LaunchDescriptor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Build the launch descriptor for a resolved manifest.
pub fn build_descriptor(
    manifest: &str,
    config: &ResolvedConfig,
    request: &LaunchRequest,
) -> LaunchResult<LaunchDescriptor> {
    let mut builder = DescriptorBuilder::new();

    builder.push(Directive::manifest(manifest)?);
    builder.push(Directive::flag(DIRECTIVE_CONFIG));

    match config_url(config, request) {
        Some(url) => {
            builder.push(Directive::assigned(PARAM_CONFIG_URL, url));
        }
        None => {
            builder.extend(inline_config(config, request));
        }
    }

    if let Some(authorization) = request.authorization.as_deref() {
        builder.push(Directive::assigned(PARAM_AUTHORIZATION, authorization));
    }

    let descriptor = builder.build();
    tracing::debug!("Launch descriptor: {}", descriptor);
    Ok(descriptor)
}

/// Remote configuration URL: request parameter first, then connector setting.
fn config_url<'a>(config: &'a ResolvedConfig, request: &'a LaunchRequest) -> Option<&'a str> {
    request
        .params
        .first(PARAM_CONFIG_URL)
        .filter(|url| has_text(url))
        .or_else(|| config.get(SERVICE_CONFIG))
}

/// Directives describing the configuration inline when no remote one is given.
fn inline_config(config: &ResolvedConfig, request: &LaunchRequest) -> Vec<Directive> {
    let mut directives = Vec::new();

    for (param, setting) in [
        (PARAM_CODEBASE, SETTING_CODEBASE),
        (PARAM_CODEBASE_EXT, SETTING_CODEBASE_EXT),
    ] {
        let codebase = request
            .params
            .first(param)
            .or_else(|| config.raw(setting));
        if let Some(codebase) = codebase {
            directives.push(Directive::assigned_or_flag(param, codebase));
        }
    }

    directives.extend(
        collect_properties(config, request)
            .iter()
            .map(|(key, value)| Directive::property(key, value)),
    );

    directives.extend(
        request
            .params
            .all(PARAM_ARGUMENT)
            .iter()
            .map(|arg| Directive::assigned(PARAM_ARGUMENT, strip_enclosing_quotes(arg))),
    );

    directives
}

/// Decode the `property` parameters.
///
/// Keys keep their first position, later duplicates overwrite the value. The
/// preferences service from the connector is appended when the request did not
/// set one.
fn collect_properties<'a>(
    config: &'a ResolvedConfig,
    request: &'a LaunchRequest,
) -> IndexMap<&'a str, &'a str> {
    let mut properties = IndexMap::new();

    for raw in request.params.all(PARAM_PROPERTY) {
        match split_property(raw) {
            Some((key, value)) => {
                properties.insert(key, value);
            }
            None => tracing::warn!("Cannot parse property: {}", raw),
        }
    }

    if !properties.contains_key(SERVICE_PREFS)
        && let Some(prefs) = config.get(SERVICE_PREFS)
    {
        properties.insert(SERVICE_PREFS, prefs);
    }

    properties
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
