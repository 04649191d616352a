//! Location-query parsing and evaluation.
//!
//! A location query is a slash-separated path of child steps, optionally
//! ending in a value leaf:
//!
//! ```text
//! channel/title/text()        direct text of <title> under <channel>
//! channel/item                the <item> elements themselves
//! ./enclosure/@url            attribute value, anchored at the context node
//! channel/itunes:author/text()  namespaced step (prefix from the caller's map)
//! ```
//!
//! Steps descend one child level at a time and keep every element that
//! matches, so evaluation returns all matches in document order. An
//! unprefixed step matches by local name regardless of namespace; a
//! prefixed step must resolve through the namespace-prefix mapping to the
//! element's namespace URI. The leading step may also match the context
//! node itself, so a query can name the document root.

use std::collections::HashMap;

use crate::error::{ExtractError, Result};
use crate::tree::{Document, NodeId};

/// One child-descent step.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    prefix: Option<String>,
    name: String,
}

/// Terminal value selector of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Leaf {
    /// `text()` — direct text children of each matched element.
    Text,
    /// `@name` — the named attribute of each matched element.
    Attribute(String),
}

/// A parsed location query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Query {
    steps: Vec<Step>,
    leaf: Option<Leaf>,
}

/// A single match produced by evaluating a query.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum QueryMatch {
    /// An element node (query ended on a name step).
    Node(NodeId),
    /// A string value (query ended on `text()` or `@attr`).
    Text(String),
}

impl Query {
    /// Parse a location query string.
    ///
    /// # Errors
    /// Returns `QuerySyntax` for empty queries, empty steps (`a//b`),
    /// steps after a value leaf, or unsupported step functions.
    pub(crate) fn parse(query: &str) -> Result<Self> {
        if query.is_empty() {
            return Err(ExtractError::query(query, "query is empty"));
        }

        let mut steps = Vec::new();
        let mut leaf = None;

        for (index, part) in query.split('/').enumerate() {
            if leaf.is_some() {
                return Err(ExtractError::query(
                    query,
                    "text() and @attribute must be the final step",
                ));
            }

            if part.is_empty() {
                return Err(ExtractError::query(query, "empty step"));
            }

            if part == "." {
                if index != 0 {
                    return Err(ExtractError::query(query, "'.' is only valid as the first step"));
                }
                continue;
            }

            if part == "text()" {
                leaf = Some(Leaf::Text);
                continue;
            }

            if let Some(attr) = part.strip_prefix('@') {
                if attr.is_empty() {
                    return Err(ExtractError::query(query, "attribute step has no name"));
                }
                leaf = Some(Leaf::Attribute(attr.to_string()));
                continue;
            }

            if part.contains('(') {
                return Err(ExtractError::query(
                    query,
                    format!("unsupported step function '{part}'"),
                ));
            }

            let (prefix, name) = match part.split_once(':') {
                Some((prefix, name)) => (Some(prefix.to_string()), name.to_string()),
                None => (None, part.to_string()),
            };
            if name.is_empty() {
                return Err(ExtractError::query(query, format!("empty name in step '{part}'")));
            }
            steps.push(Step { prefix, name });
        }

        Ok(Self { steps, leaf })
    }

    /// Evaluate this query against a context node.
    ///
    /// Returns every match in document order; an empty result is not an
    /// error.
    ///
    /// # Errors
    /// Returns `QuerySyntax` when a step uses a prefix absent from the
    /// namespace mapping.
    pub(crate) fn evaluate(
        &self,
        doc: &Document,
        context: NodeId,
        namespaces: Option<&HashMap<String, String>>,
    ) -> Result<Vec<QueryMatch>> {
        let mut frontier = vec![context];

        for (index, step) in self.steps.iter().enumerate() {
            let uri = step.resolve_namespace(namespaces)?;
            let mut next = Vec::new();

            for node in frontier {
                // The leading step may name the context node itself, so a
                // query like "channel/title" also works when <channel> is
                // the search root.
                if index == 0 && step.matches(doc, node, uri) {
                    next.push(node);
                }
                for child in doc.child_elements(node) {
                    if step.matches(doc, child, uri) {
                        next.push(child);
                    }
                }
            }

            frontier = next;
            if frontier.is_empty() {
                return Ok(Vec::new());
            }
        }

        let matches = match &self.leaf {
            None => frontier.into_iter().map(QueryMatch::Node).collect(),
            Some(Leaf::Text) => frontier
                .iter()
                .flat_map(|node| doc.direct_text(*node))
                .map(|text| QueryMatch::Text(text.to_string()))
                .collect(),
            Some(Leaf::Attribute(name)) => frontier
                .iter()
                .filter_map(|node| doc.attribute(*node, name))
                .map(|value| QueryMatch::Text(value.to_string()))
                .collect(),
        };

        Ok(matches)
    }
}

impl Step {
    /// Resolve this step's prefix to a namespace URI, if prefixed.
    fn resolve_namespace<'a>(
        &'a self,
        namespaces: Option<&'a HashMap<String, String>>,
    ) -> Result<Option<&'a str>> {
        match &self.prefix {
            None => Ok(None),
            Some(prefix) => namespaces
                .and_then(|map| map.get(prefix))
                .map(|uri| Some(uri.as_str()))
                .ok_or_else(|| {
                    ExtractError::query(
                        format!("{prefix}:{}", self.name),
                        format!("unknown namespace prefix '{prefix}'"),
                    )
                }),
        }
    }

    /// Whether a node matches this step.
    ///
    /// Unprefixed steps compare local names only; prefixed steps also
    /// require the resolved namespace URI.
    fn matches(&self, doc: &Document, node: NodeId, uri: Option<&str>) -> bool {
        if doc.local_name(node) != self.name {
            return false;
        }
        match uri {
            None => true,
            Some(uri) => doc.namespace(node) == Some(uri),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// `<rss><channel><title>Revolutions</title><item/><item/></channel></rss>`
    /// with a namespaced `<itunes:duration>` inside the first item.
    fn sample() -> Document {
        const ITUNES: &str = "http://www.itunes.com/dtds/podcast-1.0.dtd";
        let mut doc = Document::with_root("rss", None, Vec::new());
        let rss = doc.root();
        let channel = doc.add_element(rss, "channel", None, Vec::new());
        let title = doc.add_element(channel, "title", None, Vec::new());
        doc.add_text(title, "Revolutions");
        let item = doc.add_element(
            channel,
            "item",
            None,
            vec![("id".to_string(), "a".to_string())],
        );
        let duration = doc.add_element(item, "duration", Some(ITUNES.to_string()), Vec::new());
        doc.add_text(duration, "31:12");
        doc.add_element(channel, "item", None, Vec::new());
        doc
    }

    fn itunes_namespaces() -> HashMap<String, String> {
        HashMap::from([(
            "itunes".to_string(),
            "http://www.itunes.com/dtds/podcast-1.0.dtd".to_string(),
        )])
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(Query::parse("").is_err());
        assert!(Query::parse("a//b").is_err());
        assert!(Query::parse("a/").is_err());
    }

    #[test]
    fn test_parse_rejects_non_final_leaf() {
        assert!(Query::parse("text()/more").is_err());
        assert!(Query::parse("a/@href/b").is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_function() {
        assert!(Query::parse("channel/last()").is_err());
    }

    #[test]
    fn test_text_query() {
        let doc = sample();
        let query = Query::parse("channel/title/text()").unwrap();
        let matches = query.evaluate(&doc, doc.root(), None).unwrap();
        assert_eq!(
            matches,
            vec![QueryMatch::Text("Revolutions".to_string())]
        );
    }

    #[test]
    fn test_node_query_matches_all() {
        let doc = sample();
        let query = Query::parse("channel/item").unwrap();
        let matches = query.evaluate(&doc, doc.root(), None).unwrap();
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| matches!(m, QueryMatch::Node(_))));
    }

    #[test]
    fn test_leading_step_matches_context_node() {
        let doc = sample();
        let channel = doc.child_elements(doc.root()).next().unwrap();
        let query = Query::parse("channel/title/text()").unwrap();
        let matches = query.evaluate(&doc, channel, None).unwrap();
        assert_eq!(
            matches,
            vec![QueryMatch::Text("Revolutions".to_string())]
        );
    }

    #[test]
    fn test_dot_anchored_query() {
        let doc = sample();
        let channel = doc.child_elements(doc.root()).next().unwrap();
        let item = doc.child_elements(channel).nth(1).unwrap();
        let query = Query::parse("./@id").unwrap();
        let matches = query.evaluate(&doc, item, None).unwrap();
        assert_eq!(matches, vec![QueryMatch::Text("a".to_string())]);
    }

    #[test]
    fn test_attribute_query_skips_missing() {
        let doc = sample();
        let query = Query::parse("channel/item/@id").unwrap();
        // Only the first <item> carries an id attribute.
        let matches = query.evaluate(&doc, doc.root(), None).unwrap();
        assert_eq!(matches, vec![QueryMatch::Text("a".to_string())]);
    }

    #[test]
    fn test_namespaced_step() {
        let doc = sample();
        let query = Query::parse("channel/item/itunes:duration/text()").unwrap();
        let matches = query
            .evaluate(&doc, doc.root(), Some(&itunes_namespaces()))
            .unwrap();
        assert_eq!(matches, vec![QueryMatch::Text("31:12".to_string())]);
    }

    #[test]
    fn test_unprefixed_step_ignores_namespace() {
        let doc = sample();
        let query = Query::parse("channel/item/duration/text()").unwrap();
        let matches = query.evaluate(&doc, doc.root(), None).unwrap();
        assert_eq!(matches, vec![QueryMatch::Text("31:12".to_string())]);
    }

    #[test]
    fn test_unknown_prefix_is_error() {
        let doc = sample();
        let query = Query::parse("channel/itunes:summary/text()").unwrap();
        let err = query.evaluate(&doc, doc.root(), None).unwrap_err();
        assert!(matches!(err, ExtractError::QuerySyntax { .. }));
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let doc = sample();
        let query = Query::parse("channel/missing/text()").unwrap();
        let matches = query.evaluate(&doc, doc.root(), None).unwrap();
        assert!(matches.is_empty());
    }
}
