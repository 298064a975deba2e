use crate::crawler::parser::Document;

/// Links discovered on a page that share one URL path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathGroup {
    /// The shared path (scheme, host and query stripped)
    pub path: String,

    /// Distinct absolute links with this path, in first-seen order
    pub links: Vec<String>,
}

/// A node in the crawl tree
#[derive(Debug, Clone)]
pub struct Page {
    /// Absolute URL of this page
    pub url: String,

    /// Canonical URL of the crawl root, identical on every page of the tree
    pub domain_root_url: String,

    /// Short domain name used to recognise same-site links
    pub domain_name: String,

    /// Parsed content; set once by a successful fetch
    pub document: Option<Document>,

    /// True only for the entry page
    pub is_root: bool,

    /// One child per discovered path group (or per link, depending on policy)
    pub children: Vec<Page>,

    /// Deduplicated same-domain links in first-seen order
    pub links: Vec<String>,

    /// Discovered links grouped by URL path, in first-seen path order
    pub links_by_path: Vec<PathGroup>,
}

impl Page {
    /// Creates the entry page of a crawl
    pub fn root(
        url: impl Into<String>,
        domain_root_url: impl Into<String>,
        domain_name: impl Into<String>,
    ) -> Self {
        let mut page = Self::new(url, domain_root_url, domain_name);
        page.is_root = true;
        page
    }

    /// Creates an unfetched page
    pub fn new(
        url: impl Into<String>,
        domain_root_url: impl Into<String>,
        domain_name: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            domain_root_url: domain_root_url.into(),
            domain_name: domain_name.into(),
            document: None,
            is_root: false,
            children: Vec::new(),
            links: Vec::new(),
            links_by_path: Vec::new(),
        }
    }

    /// Creates a child page that inherits this page's domain identity
    pub fn child(&self, url: impl Into<String>) -> Self {
        Self::new(url, self.domain_root_url.clone(), self.domain_name.clone())
    }

    /// Returns true once a fetch has stored a document
    pub fn is_fetched(&self) -> bool {
        self.document.is_some()
    }

    /// Returns the links grouped under `path`, if that path was seen
    pub fn links_for_path(&self, path: &str) -> Option<&[String]> {
        self.links_by_path
            .iter()
            .find(|group| group.path == path)
            .map(|group| group.links.as_slice())
    }

    /// Follows a sequence of child indices down from this page
    pub fn descendant_mut(&mut self, indices: &[usize]) -> Option<&mut Page> {
        let mut current = self;
        for &index in indices {
            current = current.children.get_mut(index)?;
        }
        Some(current)
    }

    /// Counts this page and every page below it
    pub fn count_pages(&self) -> usize {
        1 + self.children.iter().map(Page::count_pages).sum::<usize>()
    }
}
