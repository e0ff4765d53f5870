/// Hostname handling: registrable domains and company names derived from URLs
use url::Url;

/// Extract the registrable domain from a URL with smart TLD handling
///
/// Algorithm:
/// 1. Parse URL to extract hostname
/// 2. Split hostname by "."
/// 3. If the TLD is 2 letters AND the second-to-last label is "co" or "com":
///    → keep the last 3 labels (e.g., "example.com.au", "bbc.co.uk")
/// 4. Else:
///    → keep the last 2 labels (e.g., "spotify.com", "greenhouse.io")
/// 5. localhost and IP addresses are returned untouched
///
/// Examples:
/// - https://www.spotify.com/jobs/123 → spotify.com
/// - https://boards.greenhouse.io/acme → greenhouse.io
/// - https://news.bbc.co.uk/article → bbc.co.uk
pub fn extract_domain(url: &str) -> Option<String> {
    let hostname = extract_hostname(url)?;

    if hostname == "localhost" || is_ip_address(&hostname) {
        return Some(hostname);
    }

    let parts: Vec<&str> = hostname.split('.').filter(|p| !p.is_empty()).collect();
    if parts.len() < 2 {
        return Some(hostname);
    }

    let num_parts = suffix_len(&parts) + 1;
    Some(parts[parts.len() - num_parts.min(parts.len())..].join("."))
}

/// Derive a readable company label from a URL's hostname.
///
/// `https://www.spotify.com/jobs/123` becomes `Spotify`. Returns `None` for
/// hosts without a usable label (IPs, localhost) and for labels on the
/// denylist, which holds the job boards' own names.
pub fn company_from_url(url: &str, denylist: &[String]) -> Option<String> {
    let domain = extract_domain(url)?;
    if domain == "localhost" || is_ip_address(&domain) {
        return None;
    }

    let parts: Vec<&str> = domain.split('.').collect();
    if parts.len() < 2 {
        return None;
    }
    let lowered = parts[0].to_lowercase();
    if denylist.iter().any(|d| d.eq_ignore_ascii_case(&lowered)) {
        return None;
    }

    Some(capitalize(&lowered))
}

/// Whether `url`'s hostname equals `suffix` or is a subdomain of it
pub fn host_matches(url: &str, suffix: &str) -> bool {
    let suffix = suffix.trim_start_matches('.').to_lowercase();
    match extract_hostname(url) {
        Some(host) => host == suffix || host.ends_with(&format!(".{}", suffix)),
        None => false,
    }
}

/// Number of labels forming the public suffix ("com" → 1, "co.uk" → 2)
fn suffix_len(parts: &[&str]) -> usize {
    let tld = parts[parts.len() - 1];
    if parts.len() >= 3 && tld.len() == 2 && matches!(parts[parts.len() - 2], "co" | "com") {
        2
    } else {
        1
    }
}

/// Extract the lowercase hostname from a URL string.
///
/// Scheme-less input such as `example.com/path` is accepted.
fn extract_hostname(url: &str) -> Option<String> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return None;
    }

    let parsed = if trimmed.contains("://") {
        Url::parse(trimmed)
    } else {
        Url::parse(&format!("https://{}", trimmed))
    };
    let hostname = parsed.ok()?.host_str()?.trim_matches(['[', ']']).to_lowercase();

    if hostname.is_empty() {
        None
    } else {
        Some(hostname)
    }
}

/// Check if a string looks like an IP address
fn is_ip_address(s: &str) -> bool {
    s.parse::<std::net::IpAddr>().is_ok()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
