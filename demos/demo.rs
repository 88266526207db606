/* demos/demo.rs */

use origin_ip::{ClientIpResolver, check_candidate, resolve_client_ip};
use std::collections::HashMap;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    println!("=== Client Address Resolution Examples ===\n");

    // Example 1: Forwarding chain with a trailing private hop
    example_1_forwarded_chain();

    // Example 2: Private-only header falls through to the next header
    example_2_fall_through();

    // Example 3: Fallback to the transport peer, then the default
    example_3_fallback();

    // Example 4: Custom header precedence
    example_4_custom_headers();

    // Example 5: Why a candidate was rejected
    example_5_rejection_reasons();

    println!("=== All examples completed! ===");
}

fn example_1_forwarded_chain() {
    println!("Example 1: X-Forwarded-For chain");

    let mut headers = HashMap::new();
    headers.insert(
        "X-Forwarded-For".to_string(),
        "203.0.113.7, 10.0.0.5".to_string(),
    );

    println!("Resolved: {}", resolve_client_ip(&headers, None));
    println!();
}

fn example_2_fall_through() {
    println!("Example 2: Private-only X-Forwarded-For, public X-Real-IP");

    let headers = [("X-Forwarded-For", "10.0.0.5"), ("X-Real-IP", "198.51.100.9")];

    let resolution = ClientIpResolver::default().resolve_detailed(&headers, None);
    println!("Resolved: {} (from {})", resolution.ip, resolution.source);
    println!();
}

fn example_3_fallback() {
    println!("Example 3: Fallback");

    let headers: HashMap<String, String> = HashMap::new();
    println!("With peer:    {}", resolve_client_ip(&headers, Some("192.0.2.1")));
    println!("Without peer: {}", resolve_client_ip(&headers, None));
    println!();
}

fn example_4_custom_headers() {
    println!("Example 4: Custom header precedence");

    let headers = [
        ("CF-Connecting-IP", "198.51.100.42"),
        ("X-Forwarded-For", "203.0.113.1"),
    ];

    let custom = ClientIpResolver::new().with_headers(["CF-Connecting-IP", "X-Forwarded-For"]);
    println!("Custom resolver:  {}", custom.resolve(&headers, None));
    println!("Default resolver: {}", resolve_client_ip(&headers, None));
    println!();
}

fn example_5_rejection_reasons() {
    println!("Example 5: Candidate validation");

    for candidate in ["203.0.113.7", "192.168.1.100", "::1", "fe80::1", "unknown", "not-an-ip"] {
        match check_candidate(candidate) {
            Ok(ip) => println!("  {candidate:<15} accepted ({ip})"),
            Err(reason) => println!("  {candidate:<15} rejected: {reason}"),
        }
    }
    println!();
}
