// Graph <-> persisted studio snapshot

use crate::config::AuthConfig;
use crate::error::Result;
use crate::generate::generate_config;
use crate::model::{Edge, Graph, Node};
use crate::traverse::Reachable;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

pub const SNAPSHOT_VERSION: &str = "1.0.0";
pub const GENERATOR: &str = "authflow-studio";

/// The reachable subgraph with positions rounded to whole pixels. Nodes keep
/// their original order; edges survive only when both ends are reachable.
pub fn export_graph(nodes: &[Node], edges: &[Edge]) -> Graph {
    let reachable = Reachable::from_root(nodes, edges);

    let kept_nodes: Vec<Node> = nodes
        .iter()
        .filter(|n| reachable.contains(&n.id))
        .map(|n| Node {
            position: n.position.rounded(),
            ..n.clone()
        })
        .collect();

    let kept_edges: Vec<Edge> = edges
        .iter()
        .filter(|e| reachable.contains(&e.source) && reachable.contains(&e.target))
        .cloned()
        .collect();

    debug!(
        "Exported {}/{} nodes and {}/{} edges",
        kept_nodes.len(),
        nodes.len(),
        kept_edges.len(),
        edges.len()
    );
    Graph::new(kept_nodes, kept_edges)
}

/// Whole-graph replace. A document with `nodes` and `edges` arrays is taken
/// as is; anything else becomes the single-root default graph.
pub fn import_graph(document: &Value) -> Graph {
    let (Some(nodes), Some(edges)) = (document.get("nodes"), document.get("edges")) else {
        return Graph::with_root();
    };
    if !nodes.is_array() || !edges.is_array() {
        return Graph::with_root();
    }

    match (
        serde_json::from_value::<Vec<Node>>(nodes.clone()),
        serde_json::from_value::<Vec<Edge>>(edges.clone()),
    ) {
        (Ok(nodes), Ok(edges)) => Graph::new(nodes, edges),
        (Err(e), _) | (_, Err(e)) => {
            warn!("Snapshot graph is unreadable ({}), starting from an empty graph", e);
            Graph::with_root()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    pub config_path: String,
    pub generated_at: DateTime<Utc>,
    pub version: String,
    pub generator: String,
}

impl SnapshotMetadata {
    pub fn new(config_path: &str) -> Self {
        Self {
            config_path: config_path.to_string(),
            generated_at: Utc::now(),
            version: SNAPSHOT_VERSION.to_string(),
            generator: GENERATOR.to_string(),
        }
    }
}

/// The studio's settings file: last graph, the raw source it came from and
/// the flat configuration derived from that graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudioSnapshot {
    pub metadata: SnapshotMetadata,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub auth_content: String,
    #[serde(default)]
    pub config: AuthConfig,
}

impl StudioSnapshot {
    /// Snapshot of the reachable part of `graph`; `config` is recomputed
    /// from it so graph and flat config cannot drift apart.
    pub fn capture(config_path: &str, graph: &Graph, auth_content: &str) -> Self {
        let exported = export_graph(&graph.nodes, &graph.edges);
        let config = generate_config(&exported.nodes, &exported.edges);
        Self {
            metadata: SnapshotMetadata::new(config_path),
            nodes: exported.nodes,
            edges: exported.edges,
            auth_content: auth_content.to_string(),
            config,
        }
    }

    /// Fresh snapshot holding only the root node.
    pub fn empty(config_path: &str) -> Self {
        Self::capture(config_path, &Graph::with_root(), "")
    }

    pub fn graph(&self) -> Graph {
        Graph::new(self.nodes.clone(), self.edges.clone())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Lenient load: text that is missing or not a snapshot still yields a
    /// usable snapshot around the default graph.
    pub fn from_json(text: Option<&str>, config_path: &str) -> Self {
        let Some(text) = text else {
            return Self::empty(config_path);
        };
        if let Ok(snapshot) = serde_json::from_str::<StudioSnapshot>(text) {
            return snapshot;
        }

        let document: Value = serde_json::from_str(text).unwrap_or(Value::Null);
        let graph = import_graph(&document);
        let auth_content = document
            .get("authContent")
            .and_then(Value::as_str)
            .unwrap_or_default();
        Self::capture(config_path, &graph, auth_content)
    }
}
