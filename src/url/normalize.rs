use crate::UrlError;
use url::Url;

/// Normalizes a link string so scheme and `www.` variants compare equal
///
/// # Normalization Steps
///
/// 1. Rewrite every `https://` as `http://`
/// 2. Remove every `www.` substring
/// 3. Repeat until nothing changes, since a removal can splice a new match
///    together (`wwwww.w.` → `www.`)
///
/// The rewrite is lossy on purpose and only meant for comparison: trailing
/// slashes, query parameter order and fragments are left untouched, so
/// `/a` and `/a/` remain distinct pages.
///
/// # Examples
///
/// ```
/// use ripple_map::url::normalize;
///
/// assert_eq!(normalize("https://www.ex.com/a"), "http://ex.com/a");
/// ```
pub fn normalize(link: &str) -> String {
    let mut current = link.replace("https://", "http://").replace("www.", "");
    loop {
        let next = current.replace("https://", "http://").replace("www.", "");
        if next == current {
            return next;
        }
        current = next;
    }
}

/// Produces the canonical form of a crawl root
///
/// The root is parsed (which, among other things, gives a bare host a `/`
/// path) and then normalized, so that it matches links that were made
/// absolute against it.
///
/// # Examples
///
/// ```
/// use ripple_map::url::canonical_root;
///
/// let root = canonical_root("https://www.news.ycombinator.com").unwrap();
/// assert_eq!(root, "http://news.ycombinator.com/");
/// ```
pub fn canonical_root(root_url: &str) -> Result<String, UrlError> {
    let url = Url::parse(root_url.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }
    Ok(normalize(url.as_str()))
}
