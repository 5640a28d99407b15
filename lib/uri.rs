//! Launch URI assembly.

use crate::constants::LAUNCH_SCHEME_PREFIX;
use crate::descriptor::LaunchDescriptor;
use crate::error::{LaunchError, LaunchResult};
use std::fmt;
use url::form_urlencoded;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// `weasis://` followed by the form-encoded descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchUri(String);

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl LaunchUri {
    /// The URI text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the URI and return its text.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Decode the descriptor carried by this URI.
    pub fn descriptor(&self) -> LaunchResult<String> {
        decode(&self.0)
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl fmt::Display for LaunchUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Form-encode the descriptor and prefix it with the launch scheme.
///
/// Spaces become `+`; `*`, `-`, `.`, `_` and ASCII alphanumerics are kept;
/// every other byte is percent-encoded.
pub fn assemble(descriptor: &LaunchDescriptor) -> LaunchUri {
    let encoded: String = form_urlencoded::byte_serialize(descriptor.as_str().as_bytes()).collect();
    LaunchUri(format!("{}{}", LAUNCH_SCHEME_PREFIX, encoded))
}

/// Recover the descriptor text from a launch URI.
pub fn decode(uri: &str) -> LaunchResult<String> {
    let encoded = uri
        .strip_prefix(LAUNCH_SCHEME_PREFIX)
        .ok_or_else(|| LaunchError::InvalidLaunchUri(format!("missing {}", LAUNCH_SCHEME_PREFIX)))?;

    urlencoding::decode(&encoded.replace('+', " "))
        .map(|decoded| decoded.into_owned())
        .map_err(|e| LaunchError::InvalidLaunchUri(e.to_string()))
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolvedConfig;
    use crate::descriptor::{DescriptorBuilder, Directive, build_descriptor};
    use crate::request::{LaunchRequest, RequestParameters};

    fn descriptor_of(text: &'static str) -> LaunchDescriptor {
        let mut builder = DescriptorBuilder::new();
        builder.push(Directive::flag(text));
        builder.build()
    }

    #[test]
    fn test_reference_uri() {
        let params = RequestParameters::new()
            .with("property", "\"host 123\"")
            .with("argument", "\"-v\"");
        let request = LaunchRequest::new(params).with_authorization("tok");
        let descriptor = build_descriptor(
            "wado:http://host/manifest.xml",
            &ResolvedConfig::default(),
            &request,
        )
        .unwrap();

        let uri = assemble(&descriptor);
        assert_eq!(
            uri.as_str(),
            "weasis://%24dicom%3Aget+-w+%22wado%3Ahttp%3A%2F%2Fhost%2Fmanifest.xml%22+%24weasis%3Aconfig+property%3D%22host+123%22+argument%3D%22-v%22+authorization%3D%22tok%22"
        );
        assert_eq!(uri.descriptor().unwrap(), descriptor.as_str());
    }

    #[test]
    fn test_form_encoding_rules() {
        let uri = assemble(&descriptor_of("a b*c-d.e_f~g+h&i=j"));
        assert_eq!(uri.as_str(), "weasis://a+b*c-d.e_f%7Eg%2Bh%26i%3Dj");
    }

    #[test]
    fn test_round_trip_keeps_plus_and_non_ascii() {
        let descriptor = descriptor_of("argument=\"a+b é 100%\"");
        let uri = assemble(&descriptor);
        assert!(uri.as_str().starts_with(LAUNCH_SCHEME_PREFIX));
        assert!(!uri.as_str()[LAUNCH_SCHEME_PREFIX.len()..].contains(' '));
        assert_eq!(decode(uri.as_str()).unwrap(), descriptor.as_str());
    }

    #[test]
    fn test_decode_rejects_other_schemes() {
        assert!(matches!(
            decode("http://example.org"),
            Err(LaunchError::InvalidLaunchUri(_))
        ));
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        assert!(decode("weasis://%FF%FE").is_err());
    }
}
