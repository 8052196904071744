//! Registrable-label extraction.
//!
//! The classifier was trained on second-level domains split out with the
//! Public Suffix List, so serving must use the same splitting source. The
//! `psl` crate pins the list at compile time; no network, no drift at
//! runtime.

use tracing::debug;

/// Extracts the registrable label immediately left of the public suffix:
/// `"google"` from `http://www.google.com/path`, `"example"` from
/// `sub.example.co.uk`.
///
/// Never fails. Inputs without a recognized suffix (bare hostnames, garbage)
/// fall back to a naive dot-split and are logged at debug level as a
/// malformed-input signal. Case is preserved: entropy downstream must see
/// the characters the caller sent, matching training-time behavior.
pub fn extract_domain(url: &str) -> String {
    let host = host_of(url);
    let lower = host.to_ascii_lowercase();

    match psl::domain_str(&lower) {
        Some(registrable) => {
            // `registrable` is the trailing eTLD+1 of the lowercased host;
            // recover the original-case label by byte offsets (ASCII
            // lowercasing preserves lengths).
            let start = host.len() - registrable.len();
            let label_len = registrable
                .split('.')
                .next()
                .map_or(registrable.len(), str::len);
            host[start..start + label_len].to_string()
        }
        None => {
            debug!(url, "no recognized public suffix; using best-effort label");
            naive_label(host)
        }
    }
}

/// Isolates the host portion: strips scheme, userinfo, path, query,
/// fragment, and a trailing numeric port.
fn host_of(url: &str) -> &str {
    let rest = match url.split_once("://") {
        Some((_, rest)) => rest,
        None => url,
    };
    let authority = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or(rest);
    let host = match authority.rsplit_once('@') {
        Some((_, host)) => host,
        None => authority,
    };
    match host.rsplit_once(':') {
        Some((name, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => name,
        _ => host,
    }
}

/// Best-effort label when the suffix is unrecognized: second-to-last dot
/// label if there are at least two, otherwise the host itself.
fn naive_label(host: &str) -> String {
    let labels: Vec<&str> = host.split('.').filter(|s| !s.is_empty()).collect();
    match labels.len() {
        0 => String::new(),
        1 => labels[0].to_string(),
        n => labels[n - 2].to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scheme_subdomain_suffix_and_path() {
        assert_eq!(extract_domain("http://www.google.com/path"), "google");
    }

    #[test]
    fn handles_multi_part_suffixes() {
        assert_eq!(extract_domain("sub.example.co.uk"), "example");
    }

    #[test]
    fn strips_port_and_query() {
        assert_eq!(extract_domain("https://a.b.example.com:8080/p?q=1"), "example");
    }

    #[test]
    fn preserves_case() {
        assert_eq!(extract_domain("WWW.Google.COM"), "Google");
    }

    #[test]
    fn bare_hostname_falls_back_without_failing() {
        assert_eq!(extract_domain("localhost"), "localhost");
    }

    #[test]
    fn empty_input_yields_empty_label() {
        assert_eq!(extract_domain(""), "");
    }

    #[test]
    fn plain_hostname_without_url_decoration() {
        assert_eq!(extract_domain("www.1cb8a5f36f.com"), "1cb8a5f36f");
    }
}
