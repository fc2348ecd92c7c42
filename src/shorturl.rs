use url::Url;

pub const DEFAULT_SHORTENER_DOMAINS: &[&str] = &[
    "bit.ly",
    "goo.gl",
    "ow.ly",
    "deck.ly",
    "t.co",
    "su.pr",
    "spoti.fi",
    "fur.ly",
    "tinyurl.com",
    "tiny.cc",
];

/// Whether `url` points at a link shortener, either a built-in one or one of
/// `extra`. Subdomains of a shortener count.
pub fn is_short_url(url: &Url, extra: &[String]) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.to_ascii_lowercase();

    DEFAULT_SHORTENER_DOMAINS
        .iter()
        .copied()
        .chain(extra.iter().map(String::as_str))
        .any(|domain| host_matches(&host, domain))
}

fn host_matches(host: &str, domain: &str) -> bool {
    let domain = domain.trim_end_matches('.');
    if domain.is_empty() {
        return false;
    }
    host.eq_ignore_ascii_case(domain)
        || host
            .strip_suffix(&domain.to_ascii_lowercase())
            .is_some_and(|prefix| prefix.ends_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(input: &str) -> Url {
        Url::parse(input).unwrap()
    }

    #[test]
    fn test_builtin_shorteners() {
        assert!(is_short_url(&url("https://t.co/abc123"), &[]));
        assert!(is_short_url(&url("https://bit.ly/xyz"), &[]));
        assert!(is_short_url(&url("https://TinyURL.com/xyz"), &[]));
        assert!(!is_short_url(&url("https://example.com/"), &[]));
    }

    #[test]
    fn test_suffix_must_be_a_label_boundary() {
        assert!(is_short_url(&url("https://www.bit.ly/xyz"), &[]));
        assert!(!is_short_url(&url("https://rabbit.ly/xyz"), &[]));
        assert!(!is_short_url(&url("https://t.com/"), &[]));
    }

    #[test]
    fn test_configured_shorteners() {
        let extra = vec!["sho.rt".to_string(), "Links.Example.com".to_string()];
        assert!(is_short_url(&url("https://sho.rt/a"), &extra));
        assert!(is_short_url(&url("https://links.example.com/a"), &extra));
        assert!(!is_short_url(&url("https://example.com/a"), &extra));
    }

    #[test]
    fn test_urls_without_host() {
        assert!(!is_short_url(&url("mailto:someone@bit.ly"), &[]));
        assert!(!host_matches("bit.ly", ""));
    }
}
