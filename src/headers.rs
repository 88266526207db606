/* src/headers.rs */

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Read access to a request's header set.
///
/// Lookups are case-insensitive. For ordered inputs (pair slices, arrays,
/// vectors, `http::HeaderMap`) the first value wins when a header occurs more
/// than once. Map inputs hold one value per key; a `HashMap` whose keys differ
/// only in case returns the exact or lowercase match if present, otherwise an
/// unspecified one of them.
pub trait HeaderLookup {
    /// Raw value of `name`, or `None` when the header is absent.
    fn header(&self, name: &str) -> Option<&str>;
}

impl<T: HeaderLookup + ?Sized> HeaderLookup for &T {
    fn header(&self, name: &str) -> Option<&str> {
        (**self).header(name)
    }
}

impl<S: BuildHasher> HeaderLookup for HashMap<String, String, S> {
    fn header(&self, name: &str) -> Option<&str> {
        // Exact hit first, callers usually store lowercase names.
        if let Some(value) = self.get(name).or_else(|| self.get(&name.to_ascii_lowercase())) {
            return Some(value.as_str());
        }
        self.iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl HeaderLookup for BTreeMap<String, String> {
    fn header(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl<K: AsRef<str>, V: AsRef<str>> HeaderLookup for [(K, V)] {
    fn header(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(key, _)| key.as_ref().eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_ref())
    }
}

impl<K: AsRef<str>, V: AsRef<str>, const N: usize> HeaderLookup for [(K, V); N] {
    fn header(&self, name: &str) -> Option<&str> {
        self.as_slice().header(name)
    }
}

impl<K: AsRef<str>, V: AsRef<str>> HeaderLookup for Vec<(K, V)> {
    fn header(&self, name: &str) -> Option<&str> {
        self.as_slice().header(name)
    }
}

/// Values that are not visible ASCII are treated as absent.
#[cfg(feature = "axum")]
impl HeaderLookup for axum::http::HeaderMap {
    fn header(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|value| value.to_str().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_map_lookup_ignores_case() {
        let mut headers = HashMap::new();
        headers.insert("X-Forwarded-For".to_string(), "203.0.113.7".to_string());

        assert_eq!(headers.header("x-forwarded-for"), Some("203.0.113.7"));
        assert_eq!(headers.header("X-FORWARDED-FOR"), Some("203.0.113.7"));
        assert_eq!(headers.header("x-real-ip"), None);
    }

    #[test]
    fn test_hash_map_prefers_exact_then_lowercase_key() {
        let mut headers = HashMap::new();
        headers.insert("X-Real-IP".to_string(), "198.51.100.1".to_string());
        headers.insert("x-real-ip".to_string(), "198.51.100.2".to_string());

        assert_eq!(headers.header("X-Real-IP"), Some("198.51.100.1"));
        assert_eq!(headers.header("X-REAL-IP"), Some("198.51.100.2"));
    }

    #[test]
    fn test_btree_map_lookup_ignores_case() {
        let mut headers = BTreeMap::new();
        headers.insert("proxy-client-ip".to_string(), "198.51.100.9".to_string());

        assert_eq!(headers.header("Proxy-Client-IP"), Some("198.51.100.9"));
    }

    #[test]
    fn test_pair_slice_returns_first_occurrence() {
        let headers = [("X-Real-IP", "198.51.100.1"), ("x-real-ip", "198.51.100.2")];

        assert_eq!(headers.header("x-real-ip"), Some("198.51.100.1"));
        assert_eq!(headers.header("via"), None);
    }

    #[cfg(feature = "axum")]
    #[test]
    fn test_http_header_map_lookup() {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert("x-forwarded-for", "203.0.113.7".parse().unwrap());
        headers.insert("http_client_ip", "198.51.100.9".parse().unwrap());

        assert_eq!(headers.header("X-Forwarded-For"), Some("203.0.113.7"));
        assert_eq!(headers.header("HTTP_CLIENT_IP"), Some("198.51.100.9"));
    }
}
