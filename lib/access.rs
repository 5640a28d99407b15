//! Access gate evaluated before any launch work.

use crate::config::ResolvedConfig;
use crate::constants::SETTING_HOSTS_ALLOW;
use crate::request::LaunchRequest;
use std::net::{IpAddr, ToSocketAddrs};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Decision of an [`AccessPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny,
}

/// Decides whether a request may launch the viewer.
pub trait AccessPolicy: Send + Sync {
    /// Decide for one request.
    fn decide(&self, request: &LaunchRequest, config: &ResolvedConfig) -> Access;
}

/// Accepts every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

/// Accepts requests whose peer is listed in the `hosts.allow` setting.
///
/// An empty or missing setting accepts everybody.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostAllowList;

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl AccessPolicy for AllowAll {
    fn decide(&self, _request: &LaunchRequest, _config: &ResolvedConfig) -> Access {
        Access::Allow
    }
}

impl AccessPolicy for HostAllowList {
    fn decide(&self, request: &LaunchRequest, config: &ResolvedConfig) -> Access {
        let Some(allowed) = config.get(SETTING_HOSTS_ALLOW) else {
            return Access::Allow;
        };

        let Some(peer) = request.peer else {
            tracing::warn!("Request without peer address rejected by {}", SETTING_HOSTS_ALLOW);
            return Access::Deny;
        };

        if allowed
            .split(',')
            .map(str::trim)
            .filter(|host| !host.is_empty())
            .any(|host| host_matches(host, peer))
        {
            Access::Allow
        } else {
            tracing::warn!("The request from {} is not allowed", peer);
            Access::Deny
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Compare an allow-list entry with the peer address.
///
/// Entries that are not IP literals are resolved; a name matches when any of its
/// addresses is the peer. `localhost` matches every loopback peer.
fn host_matches(host: &str, peer: IpAddr) -> bool {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return ip == peer;
    }

    if host.eq_ignore_ascii_case("localhost") && peer.is_loopback() {
        return true;
    }

    match (host, 0).to_socket_addrs() {
        Ok(mut addrs) => addrs.any(|addr| addr.ip() == peer),
        Err(e) => {
            tracing::debug!("Cannot resolve allowed host {}: {}", host, e);
            false
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn config(hosts: &str) -> ResolvedConfig {
        [(SETTING_HOSTS_ALLOW, hosts)].into_iter().collect()
    }

    fn from(peer: &str) -> LaunchRequest {
        LaunchRequest::default().with_peer(peer.parse().unwrap())
    }

    #[test]
    fn test_no_setting_allows() {
        assert_eq!(
            HostAllowList.decide(&from("10.1.1.1"), &ResolvedConfig::default()),
            Access::Allow
        );
        assert_eq!(HostAllowList.decide(&from("10.1.1.1"), &config(" ")), Access::Allow);
    }

    #[test]
    fn test_listed_peer_allowed() {
        let config = config("192.168.0.4, 10.1.1.1");
        assert_eq!(HostAllowList.decide(&from("10.1.1.1"), &config), Access::Allow);
    }

    #[test]
    fn test_unlisted_peer_denied() {
        let config = config("192.168.0.4,10.1.1.1");
        assert_eq!(HostAllowList.decide(&from("10.1.1.2"), &config), Access::Deny);
    }

    #[test]
    fn test_unknown_peer_denied() {
        assert_eq!(
            HostAllowList.decide(&LaunchRequest::default(), &config("10.1.1.1")),
            Access::Deny
        );
    }

    #[test]
    fn test_localhost_entry() {
        let config = config("localhost");
        assert_eq!(HostAllowList.decide(&from("127.0.0.1"), &config), Access::Allow);
        assert_eq!(HostAllowList.decide(&from("::1"), &config), Access::Allow);
        assert_eq!(HostAllowList.decide(&from("10.0.0.1"), &config), Access::Deny);
    }

    #[test]
    fn test_host_name_among_other_entries() {
        let config = config("192.168.0.4, myhost.invalid, localhost");
        assert_eq!(HostAllowList.decide(&from("::1"), &config), Access::Allow);
        assert_eq!(HostAllowList.decide(&from("127.0.0.1"), &config), Access::Allow);
    }

    #[test]
    fn test_unresolvable_host_name_denied() {
        let config = config("myhost.invalid");
        assert_eq!(HostAllowList.decide(&from("127.0.0.1"), &config), Access::Deny);
    }

    #[test]
    fn test_allow_all() {
        assert_eq!(
            AllowAll.decide(&LaunchRequest::default(), &config("10.1.1.1")),
            Access::Allow
        );
    }
}
