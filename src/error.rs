/* src/error.rs */

use std::fmt;
use std::net::IpAddr;

use thiserror::Error;

/// Result type alias for candidate validation.
pub type Result<T> = std::result::Result<T, CandidateError>;

/// Address classes that can never be attributed to a remote client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressClass {
    Loopback,
    Unspecified,
    LinkLocal,
    Private,
}

impl fmt::Display for AddressClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AddressClass::Loopback => "loopback",
            AddressClass::Unspecified => "unspecified",
            AddressClass::LinkLocal => "link-local",
            AddressClass::Private => "private",
        };
        f.write_str(name)
    }
}

/// Why a single candidate was rejected.
///
/// These never leave the resolver as failures; they are logged and the
/// candidate is skipped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CandidateError {
    /// Empty or whitespace-only token.
    #[error("blank candidate")]
    Blank,

    /// The literal `unknown` some proxies emit in place of an address.
    #[error("candidate is the literal 'unknown'")]
    Unknown,

    /// Not an IPv4 or IPv6 literal.
    #[error("invalid IP address format: {0}")]
    Malformed(String),

    /// Well-formed, but not a publicly attributable address.
    #[error("{ip} is a {class} address")]
    NotPublic { ip: IpAddr, class: AddressClass },
}
