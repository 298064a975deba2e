//! HTML parser for extracting link-bearing attributes
//!
//! Parsing happens once per fetched page. The `scraper` tree is walked
//! immediately and reduced to an owned [`Document`], which (unlike
//! `scraper::Html`) is `Send` and can travel with its page between tasks.

use scraper::{Html, Selector};
use url::Url;

/// Attributes whose value is a URL
const LINK_ATTRIBUTES: &[&str] = &[
    "action",
    "archive",
    "background",
    "cite",
    "classid",
    "codebase",
    "data",
    "dynsrc",
    "href",
    "longdesc",
    "lowsrc",
    "profile",
    "src",
    "usemap",
];

/// One URL found in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLink {
    /// Tag name of the element carrying the link
    pub element: String,

    /// Attribute the link came from (`href`, `src`, `style`, ...)
    pub attribute: String,

    /// The link, relative or absolute
    pub link: String,

    /// Byte offset of the link inside the attribute value
    pub position: usize,
}

/// Parsed representation of a fetched page
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// The page title (from the `<title>` tag)
    pub title: Option<String>,

    /// The first `<base href>` value, if any
    pub base_href: Option<String>,

    links: Vec<DocumentLink>,
}

impl Document {
    /// Parses HTML content into a document
    ///
    /// # Link Collection Rules
    ///
    /// - Every attribute listed in `LINK_ATTRIBUTES`, on any element
    /// - Every `url(...)` inside an inline `style` attribute
    /// - `<base href>` is recorded as the base, not as a link
    ///
    /// # Example
    ///
    /// ```
    /// use ripple_map::crawler::Document;
    ///
    /// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
    /// let document = Document::parse(html);
    /// assert_eq!(document.title, Some("Test".to_string()));
    /// assert_eq!(document.iter_links().count(), 1);
    /// ```
    pub fn parse(html: &str) -> Self {
        let parsed = Html::parse_document(html);

        let title = extract_title(&parsed);
        let base_href = extract_base_href(&parsed);
        let links = collect_links(&parsed);

        Self {
            title,
            base_href,
            links,
        }
    }

    /// Rewrites every link as an absolute URL
    ///
    /// Links are resolved against `base_url`, or against the document's
    /// `<base href>` (itself resolved against `base_url`) when
    /// `resolve_base_href` is set. Links that cannot be joined are left as they
    /// were.
    pub fn make_links_absolute(&mut self, base_url: &Url, resolve_base_href: bool) {
        let base = match (&self.base_href, resolve_base_href) {
            (Some(href), true) => base_url.join(href).unwrap_or_else(|_| base_url.clone()),
            _ => base_url.clone(),
        };

        for entry in &mut self.links {
            if let Ok(absolute) = base.join(&entry.link) {
                entry.link = absolute.to_string();
            }
        }
    }

    /// Iterates over every link in document order
    pub fn iter_links(&self) -> impl Iterator<Item = &DocumentLink> {
        self.links.iter()
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn extract_base_href(document: &Html) -> Option<String> {
    let base_selector = Selector::parse("base[href]").ok()?;

    document
        .select(&base_selector)
        .next()
        .and_then(|element| element.value().attr("href"))
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty())
}

/// Collects link-bearing attributes from every element
fn collect_links(document: &Html) -> Vec<DocumentLink> {
    let mut links = Vec::new();

    let Ok(all) = Selector::parse("*") else {
        return links;
    };

    for element in document.select(&all) {
        let tag = element.value().name();
        if tag == "base" {
            continue;
        }

        for (name, value) in element.value().attrs() {
            if name == "style" {
                for (position, link) in style_urls(value) {
                    links.push(DocumentLink {
                        element: tag.to_string(),
                        attribute: name.to_string(),
                        link,
                        position,
                    });
                }
                continue;
            }

            if !LINK_ATTRIBUTES.contains(&name) {
                continue;
            }

            let trimmed = value.trim();
            if trimmed.is_empty() {
                continue;
            }

            links.push(DocumentLink {
                element: tag.to_string(),
                attribute: name.to_string(),
                link: trimmed.to_string(),
                position: value.find(trimmed).unwrap_or(0),
            });
        }
    }

    links
}

/// Finds `url(...)` references in an inline style
fn style_urls(style: &str) -> Vec<(usize, String)> {
    let mut found = Vec::new();
    let mut offset = 0;

    while let Some(start) = style[offset..].find("url(") {
        let open = offset + start + "url(".len();
        let Some(len) = style[open..].find(')') else {
            break;
        };

        let raw = &style[open..open + len];
        let inner = raw.trim().trim_matches(|c: char| c == '"' || c == '\'');
        if !inner.is_empty() {
            let position = style[open..].find(inner).map_or(open, |p| open + p);
            found.push((position, inner.to_string()));
        }

        offset = open + len + 1;
    }

    found
}
