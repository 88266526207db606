/* src/validate.rs */

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::error::{AddressClass, CandidateError, Result};

/// Placeholder some proxies write instead of an address.
pub(crate) const UNKNOWN: &str = "unknown";

/// Returns true when `value` is empty, whitespace-only or `unknown`.
pub(crate) fn is_placeholder(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case(UNKNOWN)
}

/// Validate a single candidate token.
///
/// Accepts only IPv4/IPv6 literals that name a publicly attributable host.
/// Surrounding whitespace only matters for the blank and `unknown` checks; an
/// untrimmed address literal is malformed.
pub fn check_candidate(candidate: &str) -> Result<IpAddr> {
    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        return Err(CandidateError::Blank);
    }
    if trimmed.eq_ignore_ascii_case(UNKNOWN) {
        return Err(CandidateError::Unknown);
    }

    let ip = candidate
        .parse::<IpAddr>()
        .map_err(|_| CandidateError::Malformed(candidate.to_string()))?;

    match classify(&ip) {
        Some(class) => Err(CandidateError::NotPublic { ip, class }),
        None => Ok(ip),
    }
}

/// Shorthand for `check_candidate(candidate).is_ok()`.
pub fn is_valid_candidate(candidate: &str) -> bool {
    check_candidate(candidate).is_ok()
}

/// Class of a non-attributable address, or `None` for a public one.
pub fn classify(ip: &IpAddr) -> Option<AddressClass> {
    match ip {
        IpAddr::V4(ipv4) => classify_v4(ipv4),
        // Mapped (::ffff:a.b.c.d) and compatible (::a.b.c.d) forms carry an
        // IPv4 address that must pass the same checks.
        IpAddr::V6(ipv6) => classify_v6(ipv6)
            .or_else(|| ipv6.to_ipv4().and_then(|embedded| classify_v4(&embedded))),
    }
}

fn classify_v4(ip: &Ipv4Addr) -> Option<AddressClass> {
    if ip.is_loopback() {
        Some(AddressClass::Loopback)
    } else if ip.is_unspecified() {
        Some(AddressClass::Unspecified)
    } else if ip.is_link_local() {
        Some(AddressClass::LinkLocal)
    } else if ip.is_private() {
        Some(AddressClass::Private)
    } else {
        None
    }
}

fn classify_v6(ip: &Ipv6Addr) -> Option<AddressClass> {
    let first = ip.segments()[0];
    if ip.is_loopback() {
        Some(AddressClass::Loopback)
    } else if ip.is_unspecified() {
        Some(AddressClass::Unspecified)
    } else if (first & 0xffc0) == 0xfe80 {
        Some(AddressClass::LinkLocal)
    } else if (first & 0xffc0) == 0xfec0 || (first & 0xfe00) == 0xfc00 {
        // Deprecated site-local and unique local.
        Some(AddressClass::Private)
    } else {
        None
    }
}
