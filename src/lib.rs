/* src/lib.rs */
//! # Origin IP
//!
//! Resolves the originating client IP address of an HTTP request that may have
//! passed through proxies, load balancers or WAFs. The result feeds the
//! `sourceIp` field of a security event.
//!
//! ## Features
//!
//! - Ordered scan of forwarding headers (`X-Forwarded-For`, `Proxy-Client-IP`,
//!   `WL-Proxy-Client-IP`, the CGI-style `HTTP_*` names, `X-Real-IP`)
//! - Takes the first publicly routable hop of a comma-separated chain
//! - Rejects private, loopback, link-local, unspecified and malformed values
//! - Falls back to the transport peer address, then to `127.0.0.1`
//! - Optional Axum layer and extractor via the `axum` feature
//! - Optional `serde` support for the resolver configuration
//!
//! ## Examples
//!
//! ```rust
//! use origin_ip::resolve_client_ip;
//! use std::collections::HashMap;
//!
//! let mut headers = HashMap::new();
//! headers.insert("x-forwarded-for".to_string(), "10.0.0.5".to_string());
//! headers.insert("x-real-ip".to_string(), "198.51.100.9".to_string());
//!
//! // The private hop is skipped and X-Real-IP is used instead.
//! assert_eq!(resolve_client_ip(&headers, None), "198.51.100.9");
//!
//! // Nothing usable: transport peer, then the fixed default.
//! let empty: HashMap<String, String> = HashMap::new();
//! assert_eq!(resolve_client_ip(&empty, Some("192.0.2.1")), "192.0.2.1");
//! assert_eq!(resolve_client_ip(&empty, None), "127.0.0.1");
//! ```

pub mod error;
pub mod headers;
pub mod resolver;
pub mod validate;

#[cfg(feature = "axum")]
pub mod middleware;

pub use error::{AddressClass, CandidateError, Result};
pub use headers::HeaderLookup;
pub use resolver::{
    ClientIpResolver, DEFAULT_CLIENT_IP, DEFAULT_HEADERS, Resolution, ResolutionSource,
    resolve_client_ip,
};
pub use validate::{check_candidate, is_valid_candidate};

#[cfg(feature = "axum")]
pub use middleware::{ClientIp, ClientIpLayer, ClientIpService};
