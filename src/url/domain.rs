use url::{Host, Url};

/// Derives the short domain name used to recognise same-site links
///
/// This is the second-to-last dot-separated label of the host, so
/// `news.ycombinator.com` yields `ycombinator`. A single-label host yields
/// itself and an IP address yields the whole address (its labels carry no
/// site identity).
///
/// # Examples
///
/// ```
/// use url::Url;
/// use ripple_map::url::derive_domain_name;
///
/// let url = Url::parse("http://news.ycombinator.com").unwrap();
/// assert_eq!(derive_domain_name(&url), Some("ycombinator".to_string()));
/// ```
pub fn derive_domain_name(url: &Url) -> Option<String> {
    match url.host()? {
        Host::Domain(domain) => {
            let labels: Vec<&str> = domain.split('.').filter(|l| !l.is_empty()).collect();
            match labels.len() {
                0 => None,
                1 => Some(labels[0].to_lowercase()),
                n => Some(labels[n - 2].to_lowercase()),
            }
        }
        Host::Ipv4(addr) => Some(addr.to_string()),
        Host::Ipv6(addr) => Some(addr.to_string()),
    }
}

/// Returns the path component of an absolute link
///
/// Scheme, host, query and fragment are stripped; `None` if the link does not
/// parse as an absolute URL.
pub fn url_path(link: &str) -> Option<String> {
    Url::parse(link).ok().map(|url| url.path().to_string())
}
