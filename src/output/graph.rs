use crate::crawler::Page;
use std::fmt;

/// A parent → child link in the crawl tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub parent: String,
    pub child: String,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.parent, self.child)
    }
}

/// Collects the edges of a crawl tree down to `depth` levels
///
/// Every child of a visited page yields an edge, but only children that were
/// fetched are descended into. With `depth == 0` the result is empty.
pub fn render_edges(root: &Page, depth: u32) -> Vec<Edge> {
    let mut edges = Vec::new();
    collect_edges(root, depth, 0, &mut edges);
    edges
}

fn collect_edges(page: &Page, depth: u32, cur_depth: u32, edges: &mut Vec<Edge>) {
    if cur_depth >= depth {
        return;
    }

    for child in &page.children {
        edges.push(Edge {
            parent: page.url.clone(),
            child: child.url.clone(),
        });
        if child.is_fetched() {
            collect_edges(child, depth, cur_depth + 1, edges);
        }
    }
}

/// Renders edges as text, one `parent => child` line each
pub fn format_edges(edges: &[Edge]) -> String {
    let mut output = String::new();
    for edge in edges {
        output.push_str(&edge.to_string());
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::Document;

    const ROOT: &str = "http://ex.com/";

    fn fetched(url: &str) -> Page {
        let mut page = Page::new(url, ROOT, "ex");
        page.document = Some(Document::default());
        page
    }

    /// root → a (fetched) → a1 (fetched) → a1x; root → b (failed) → (nothing)
    fn tree() -> Page {
        let mut root = Page::root("http://ex.com", ROOT, "ex");
        root.document = Some(Document::default());

        let mut a1 = fetched("http://ex.com/a/1");
        a1.children.push(Page::new("http://ex.com/a/1/x", ROOT, "ex"));

        let mut a = fetched("http://ex.com/a");
        a.children.push(a1);

        root.children.push(a);
        root.children.push(Page::new("http://ex.com/b", ROOT, "ex"));
        root
    }

    #[test]
    fn test_depth_zero_is_empty() {
        assert!(render_edges(&tree(), 0).is_empty());
    }

    #[test]
    fn test_depth_one() {
        let edges = render_edges(&tree(), 1);
        assert_eq!(
            edges,
            vec![
                Edge {
                    parent: "http://ex.com".to_string(),
                    child: "http://ex.com/a".to_string()
                },
                Edge {
                    parent: "http://ex.com".to_string(),
                    child: "http://ex.com/b".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_depth_two_descends_only_into_fetched() {
        let edges = render_edges(&tree(), 2);
        let children: Vec<&str> = edges.iter().map(|e| e.child.as_str()).collect();
        assert_eq!(
            children,
            vec!["http://ex.com/a", "http://ex.com/a/1", "http://ex.com/b"]
        );
    }

    #[test]
    fn test_depth_bound_stops_recursion() {
        assert_eq!(render_edges(&tree(), 3).len(), 4);
        assert_eq!(render_edges(&tree(), 10).len(), 4);
    }

    #[test]
    fn test_format_edges() {
        let text = format_edges(&render_edges(&tree(), 1));
        assert_eq!(
            text,
            "http://ex.com => http://ex.com/a\nhttp://ex.com => http://ex.com/b\n"
        );
    }
}
