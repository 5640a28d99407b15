//! Request-scoped inputs of a launch.
//!
//! A [`LaunchRequest`] carries everything the launcher reads from the transport:
//! the multi-valued parameters, the authorization header, the peer address and
//! the base URL used to resolve connector settings.

use indexmap::IndexMap;
use std::net::IpAddr;
use url::form_urlencoded;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Request parameters: name to values, values kept in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParameters {
    values: IndexMap<String, Vec<String>>,
}

/// A launch request as seen by the launcher core.
#[derive(Debug, Clone, Default)]
pub struct LaunchRequest {
    /// Query and form parameters.
    pub params: RequestParameters,

    /// Value of the `Authorization` header.
    pub authorization: Option<String>,

    /// Address of the calling peer.
    pub peer: Option<IpAddr>,

    /// Base URL of the request, `scheme://host[:port]`.
    pub base_url: Option<String>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl RequestParameters {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an `application/x-www-form-urlencoded` string (query or body).
    pub fn from_urlencoded(input: &str) -> Self {
        let mut params = Self::new();
        params.extend_urlencoded(input);
        params
    }

    /// Append the pairs of an urlencoded string after the existing values.
    pub fn extend_urlencoded(&mut self, input: &str) {
        for (name, value) in form_urlencoded::parse(input.as_bytes()) {
            self.push(name.into_owned(), value.into_owned());
        }
    }

    /// Append one value under `name`.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values
            .entry(name.into())
            .or_default()
            .push(value.into());
    }

    /// Builder-style variant of [`push`](Self::push).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    /// First value of `name`, if the parameter was sent.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values of `name`, empty when the parameter was not sent.
    pub fn all(&self, name: &str) -> &[String] {
        self.values.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate over `(name, values)` in first-arrival order of the names.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.values
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }
}

impl LaunchRequest {
    /// Create a request from its parameters alone.
    pub fn new(params: RequestParameters) -> Self {
        Self {
            params,
            ..Default::default()
        }
    }

    /// Set the authorization value.
    pub fn with_authorization(mut self, authorization: impl Into<String>) -> Self {
        self.authorization = Some(authorization.into());
        self
    }

    /// Set the peer address.
    pub fn with_peer(mut self, peer: IpAddr) -> Self {
        self.peer = Some(peer);
        self
    }

    /// Set the request base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_values_keep_arrival_order() {
        let params = RequestParameters::from_urlencoded("argument=-v&studyUID=1.2&argument=-x");
        assert_eq!(params.all("argument"), ["-v", "-x"]);
        assert_eq!(params.first("argument"), Some("-v"));
        assert_eq!(params.first("studyUID"), Some("1.2"));
    }

    #[test]
    fn test_decodes_form_encoding() {
        let params = RequestParameters::from_urlencoded("property=%22host+123%22");
        assert_eq!(params.first("property"), Some("\"host 123\""));
    }

    #[test]
    fn test_absent_and_empty() {
        let params = RequestParameters::from_urlencoded("codebase=");
        assert_eq!(params.first("codebase"), Some(""));
        assert!(params.all("argument").is_empty());
        assert_eq!(params.first("argument"), None);
    }

    #[test]
    fn test_extend_appends_after_existing() {
        let mut params = RequestParameters::from_urlencoded("argument=a");
        params.extend_urlencoded("argument=b&property=k+v");
        assert_eq!(params.all("argument"), ["a", "b"]);
        assert_eq!(params.first("property"), Some("k v"));
    }

    #[test]
    fn test_iter_names_in_first_arrival_order() {
        let params = RequestParameters::new()
            .with("b", "1")
            .with("a", "2")
            .with("b", "3");
        let names: Vec<&str> = params.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["b", "a"]);
    }
}
