/* src/resolver.rs */

use std::fmt;

use tracing::{debug, trace};

use crate::headers::HeaderLookup;
use crate::validate::{check_candidate, is_placeholder};

/// Returned when neither the headers nor the transport peer yield an address.
pub const DEFAULT_CLIENT_IP: &str = "127.0.0.1";

/// Forwarding headers checked for the client address, highest precedence first.
///
/// Covers the usual reverse proxy, load balancer and WAF conventions, including
/// the CGI-style `HTTP_*` names some gateways forward verbatim.
pub const DEFAULT_HEADERS: &[&str] = &[
    "X-Forwarded-For",
    "Proxy-Client-IP",
    "WL-Proxy-Client-IP",
    "HTTP_X_FORWARDED_FOR",
    "HTTP_X_FORWARDED",
    "HTTP_X_CLUSTER_CLIENT_IP",
    "HTTP_CLIENT_IP",
    "HTTP_FORWARDED_FOR",
    "HTTP_FORWARDED",
    "HTTP_VIA",
    "X-Real-IP",
];

/// Where a resolved address came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionSource {
    /// A hop taken from the named forwarding header.
    Header(String),
    /// The transport-layer peer address.
    Peer,
    /// Nothing usable was found; [`DEFAULT_CLIENT_IP`] was returned.
    Default,
}

impl fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionSource::Header(name) => write!(f, "header:{name}"),
            ResolutionSource::Peer => f.write_str("peer"),
            ResolutionSource::Default => f.write_str("default"),
        }
    }
}

/// A resolved client address together with its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub ip: String,
    pub source: ResolutionSource,
}

/// Resolves the originating client address of a request.
///
/// The validation policy is fixed; only the ordered header list is
/// configurable.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClientIpResolver {
    /// Headers to check for the client address, in order of preference.
    pub headers: Vec<String>,
}

impl Default for ClientIpResolver {
    fn default() -> Self {
        Self {
            headers: DEFAULT_HEADERS.iter().map(|h| h.to_string()).collect(),
        }
    }
}

impl ClientIpResolver {
    /// Create a resolver that checks [`DEFAULT_HEADERS`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the ordered header list.
    pub fn with_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers = headers.into_iter().map(Into::into).collect();
        self
    }

    /// Resolve the client address. Never empty.
    pub fn resolve<H>(&self, headers: &H, peer_addr: Option<&str>) -> String
    where
        H: HeaderLookup + ?Sized,
    {
        self.resolve_detailed(headers, peer_addr).ip
    }

    /// Resolve the client address and report which input it came from.
    pub fn resolve_detailed<H>(&self, headers: &H, peer_addr: Option<&str>) -> Resolution
    where
        H: HeaderLookup + ?Sized,
    {
        let resolution = self.scan_headers(headers).unwrap_or_else(|| fallback(peer_addr));
        debug!(
            ip = %resolution.ip,
            source = %resolution.source,
            "resolved client address"
        );
        resolution
    }

    fn scan_headers<H>(&self, headers: &H) -> Option<Resolution>
    where
        H: HeaderLookup + ?Sized,
    {
        self.headers.iter().find_map(|name| {
            let value = headers.header(name)?;
            first_valid_hop(name, value).map(|ip| Resolution {
                ip: ip.to_string(),
                source: ResolutionSource::Header(name.clone()),
            })
        })
    }
}

/// Scan a header value left to right and return the first acceptable hop.
fn first_valid_hop<'a>(name: &str, value: &'a str) -> Option<&'a str> {
    if is_placeholder(value) {
        trace!(header = name, "skipping empty or unknown header");
        return None;
    }

    // "client, proxy1, proxy2": the leftmost hop is closest to the client.
    value.split(',').map(str::trim).find(|hop| match check_candidate(hop) {
        Ok(_) => true,
        Err(reason) => {
            trace!(header = name, %reason, "rejected candidate");
            false
        }
    })
}

fn fallback(peer_addr: Option<&str>) -> Resolution {
    match peer_addr.map(str::trim).filter(|peer| !peer.is_empty()) {
        Some(peer) => Resolution {
            ip: peer.to_string(),
            source: ResolutionSource::Peer,
        },
        None => Resolution {
            ip: DEFAULT_CLIENT_IP.to_string(),
            source: ResolutionSource::Default,
        },
    }
}

/// Resolve the client address with the default header list.
///
/// Always returns an address: the first acceptable hop from the forwarding
/// headers, else the transport peer address, else [`DEFAULT_CLIENT_IP`].
///
/// # Examples
///
/// ```rust
/// use origin_ip::resolve_client_ip;
/// use std::collections::HashMap;
///
/// let mut headers = HashMap::new();
/// headers.insert("X-Forwarded-For".to_string(), "203.0.113.7, 10.0.0.5".to_string());
///
/// assert_eq!(resolve_client_ip(&headers, Some("192.0.2.1")), "203.0.113.7");
/// ```
pub fn resolve_client_ip<H>(headers: &H, peer_addr: Option<&str>) -> String
where
    H: HeaderLookup + ?Sized,
{
    ClientIpResolver::default().resolve(headers, peer_addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn headers(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_first_valid_hop_wins() {
        let h = headers(&[("X-Forwarded-For", "203.0.113.7, 10.0.0.5")]);
        assert_eq!(resolve_client_ip(&h, None), "203.0.113.7");
    }

    #[test]
    fn test_skips_leading_private_hops() {
        let h = headers(&[("x-forwarded-for", "10.0.0.5, unknown, garbage, 198.51.100.3")]);
        assert_eq!(resolve_client_ip(&h, None), "198.51.100.3");
    }

    #[test]
    fn test_private_only_header_falls_through() {
        let h = headers(&[
            ("X-Forwarded-For", "10.0.0.5"),
            ("X-Real-IP", "198.51.100.9"),
        ]);
        assert_eq!(resolve_client_ip(&h, None), "198.51.100.9");
    }

    #[test]
    fn test_peer_fallback() {
        let h: HashMap<String, String> = HashMap::new();
        assert_eq!(resolve_client_ip(&h, Some("192.0.2.1")), "192.0.2.1");
    }

    #[test]
    fn test_peer_fallback_is_not_validated() {
        let h = headers(&[("X-Forwarded-For", "192.168.1.1")]);
        assert_eq!(resolve_client_ip(&h, Some("10.1.2.3")), "10.1.2.3");
    }

    #[test]
    fn test_default_when_nothing_usable() {
        let h = headers(&[("X-Forwarded-For", "127.0.0.1, ::1"), ("X-Real-IP", "")]);
        assert_eq!(resolve_client_ip(&h, None), DEFAULT_CLIENT_IP);
        assert_eq!(resolve_client_ip(&h, Some("  ")), DEFAULT_CLIENT_IP);
    }

    #[test]
    fn test_unknown_header_treated_as_absent() {
        let h = headers(&[("X-Forwarded-For", "unknown"), ("Proxy-Client-IP", "Unknown")]);
        let resolution = ClientIpResolver::default().resolve_detailed(&h, Some("192.0.2.44"));
        assert_eq!(resolution.ip, "192.0.2.44");
        assert_eq!(resolution.source, ResolutionSource::Peer);
    }

    #[test]
    fn test_never_returns_loopback_or_link_local() {
        let h = headers(&[
            ("X-Forwarded-For", "127.0.0.1"),
            ("Proxy-Client-IP", "::1"),
            ("HTTP_CLIENT_IP", "169.254.1.1, fe80::1"),
            ("X-Real-IP", "0.0.0.0"),
        ]);
        let resolution = ClientIpResolver::default().resolve_detailed(&h, None);
        assert_eq!(resolution.source, ResolutionSource::Default);
        assert_eq!(resolution.ip, "127.0.0.1");
    }

    #[test]
    fn test_ipv4_compatible_private_hops_fall_through() {
        let h = headers(&[
            ("X-Forwarded-For", "::127.0.0.1, ::10.0.0.1"),
            ("Proxy-Client-IP", "::192.168.1.1"),
        ]);
        assert_eq!(resolve_client_ip(&h, Some("192.0.2.1")), "192.0.2.1");

        let h = headers(&[("X-Forwarded-For", "::10.0.0.1, 198.51.100.3")]);
        assert_eq!(resolve_client_ip(&h, None), "198.51.100.3");
    }

    #[test]
    fn test_header_precedence_follows_default_order() {
        let h = headers(&[
            ("X-Real-IP", "198.51.100.11"),
            ("HTTP_VIA", "198.51.100.10"),
            ("WL-Proxy-Client-IP", "198.51.100.3"),
        ]);
        let resolution = ClientIpResolver::default().resolve_detailed(&h, None);
        assert_eq!(resolution.ip, "198.51.100.3");
        assert_eq!(
            resolution.source,
            ResolutionSource::Header("WL-Proxy-Client-IP".to_string())
        );
    }

    #[test]
    fn test_each_default_header_is_consulted() {
        for name in DEFAULT_HEADERS {
            let h = headers(&[(*name, "203.0.113.99")]);
            let resolution = ClientIpResolver::default().resolve_detailed(&h, None);
            assert_eq!(resolution.ip, "203.0.113.99", "header {name}");
            assert_eq!(resolution.source, ResolutionSource::Header(name.to_string()));
        }
    }

    #[test]
    fn test_ipv6_hop_returned_verbatim() {
        let h = headers(&[("x-forwarded-for", " 2001:DB8::1 , 203.0.113.7")]);
        assert_eq!(resolve_client_ip(&h, None), "2001:DB8::1");
    }

    #[test]
    fn test_custom_header_list() {
        let h = headers(&[
            ("CF-Connecting-IP", "198.51.100.42"),
            ("X-Forwarded-For", "203.0.113.1"),
        ]);
        let resolver = ClientIpResolver::new().with_headers(["CF-Connecting-IP"]);
        assert_eq!(resolver.resolve(&h, None), "198.51.100.42");

        let resolver = ClientIpResolver::new().with_headers(Vec::<String>::new());
        assert_eq!(resolver.resolve(&h, Some("192.0.2.5")), "192.0.2.5");
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let h = headers(&[
            ("X-Forwarded-For", "10.0.0.1, 203.0.113.5"),
            ("X-Real-IP", "198.51.100.9"),
        ]);
        let first = resolve_client_ip(&h, Some("192.0.2.1"));
        for _ in 0..10 {
            assert_eq!(resolve_client_ip(&h, Some("192.0.2.1")), first);
        }
    }

    #[test]
    fn test_result_is_never_empty() {
        assert!(!resolve_client_ip(&headers(&[]), None).is_empty());
        assert!(!resolve_client_ip(&headers(&[]), Some("")).is_empty());
        assert!(!resolve_client_ip(&headers(&[("X-Forwarded-For", ",,,")]), None).is_empty());
        assert!(
            !resolve_client_ip(&headers(&[("X-Forwarded-For", " , unknown ,")]), Some(" "))
                .is_empty()
        );
        assert!(!resolve_client_ip(&headers(&[("Unrelated", "203.0.113.7")]), None).is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_resolver_from_config() {
        let resolver: ClientIpResolver =
            serde_json::from_str(r#"{"headers": ["True-Client-IP", "X-Real-IP"]}"#).unwrap();
        assert_eq!(resolver.headers, vec!["True-Client-IP", "X-Real-IP"]);

        let resolver: ClientIpResolver = serde_json::from_str("{}").unwrap();
        assert_eq!(resolver, ClientIpResolver::default());
    }
}
