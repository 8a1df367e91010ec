use serde::{Deserialize, Serialize};

/// Edge renderer style used for every dependency link the app creates.
pub const LINK_KIND: &str = "smoothstep";

/// A dependency link: `source` must finish before `target`.
///
/// Nothing guarantees that either end exists; views filter dangling links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub animated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

impl Edge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            kind: None,
            animated: false,
            source_handle: None,
            target_handle: None,
        }
    }

    /// Build the conventional `edge-<source>-<target>` link.
    pub fn link(source: &str, target: &str) -> Self {
        let mut edge = Self::new(Self::link_id(source, target), source, target);
        edge.kind = Some(LINK_KIND.to_string());
        edge
    }

    pub fn link_id(source: &str, target: &str) -> String {
        format!("edge-{}-{}", source, target)
    }

    /// True if this edge touches `node_id` on either end.
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_id_convention() {
        let e = Edge::link("a", "b");
        assert_eq!(e.id, "edge-a-b");
        assert_eq!(e.kind.as_deref(), Some(LINK_KIND));
        assert!(e.touches("a"));
        assert!(e.touches("b"));
        assert!(!e.touches("c"));
    }

    #[test]
    fn test_serde_uses_type_key() {
        let json = serde_json::to_value(Edge::link("a", "b")).unwrap();
        assert_eq!(json["type"], "smoothstep");
        assert!(json.get("sourceHandle").is_none());
    }
}
