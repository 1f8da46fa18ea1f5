//! Coarse check that a user-supplied URL is something we are willing to fetch.
//!
//! Only the literal host string is inspected. Hostnames are not resolved, so a
//! public name pointing at a private address passes.

use url::Url;

const ALLOWED_SCHEMES: [&str; 2] = ["http", "https"];
const BLOCKED_HOST_PREFIXES: [&str; 4] = ["127.", "192.168.", "10.", "172."];

/// Returns `true` when `url` is an absolute http(s) URL whose host is not on
/// the private-network blocklist. Parse failures count as unsafe.
pub fn is_safe_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };

    if !ALLOWED_SCHEMES.contains(&parsed.scheme()) {
        return false;
    }

    match parsed.host_str() {
        Some(host) => !is_blocked_host(host),
        None => false,
    }
}

fn is_blocked_host(host: &str) -> bool {
    host == "localhost"
        || BLOCKED_HOST_PREFIXES
            .iter()
            .any(|prefix| host.starts_with(prefix))
}
