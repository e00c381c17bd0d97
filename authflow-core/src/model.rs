use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Id of the root node in freshly created and rebuilt graphs.
pub const ROOT_ID: &str = "auth-starter";

/// The type tag of a node. Decides which config fields are meaningful on it
/// and which emitter template applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    AuthStarter,
    Database,
    Prisma,
    Drizzle,
    DatabaseProvider,
    Sqlite,
    Postgresql,
    Mysql,
    EmailAuth,
    EmailVerification,
    SocialLogin,
    /// `oauth<Provider>`, holding the lowercase provider key (`google`).
    OAuth(String),
    Account,
    RateLimit,
    Advanced,
    Session,
    UserFields,
    Plugins,
    Polar,
    PolarCheckout,
    PolarPortal,
    PolarUsage,
    PolarWebhooks,
    NextCookies,
    /// Tags the transform does not know. Kept so editor graphs survive a load.
    Other(String),
}

impl NodeKind {
    pub fn tag(&self) -> String {
        let tag = match self {
            NodeKind::AuthStarter => "authStarter",
            NodeKind::Database => "database",
            NodeKind::Prisma => "prisma",
            NodeKind::Drizzle => "drizzle",
            NodeKind::DatabaseProvider => "databaseProvider",
            NodeKind::Sqlite => "sqlite",
            NodeKind::Postgresql => "postgresql",
            NodeKind::Mysql => "mysql",
            NodeKind::EmailAuth => "emailAuth",
            NodeKind::EmailVerification => "emailVerification",
            NodeKind::SocialLogin => "socialLogin",
            NodeKind::OAuth(provider) => return format!("oauth{}", capitalize(provider)),
            NodeKind::Account => "account",
            NodeKind::RateLimit => "rateLimit",
            NodeKind::Advanced => "advanced",
            NodeKind::Session => "session",
            NodeKind::UserFields => "userFields",
            NodeKind::Plugins => "plugins",
            NodeKind::Polar => "polar",
            NodeKind::PolarCheckout => "polarCheckout",
            NodeKind::PolarPortal => "polarPortal",
            NodeKind::PolarUsage => "polarUsage",
            NodeKind::PolarWebhooks => "polarWebhooks",
            NodeKind::NextCookies => "nextCookies",
            NodeKind::Other(tag) => return tag.clone(),
        };
        tag.to_string()
    }

    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "authStarter" => NodeKind::AuthStarter,
            "database" => NodeKind::Database,
            "prisma" => NodeKind::Prisma,
            "drizzle" => NodeKind::Drizzle,
            "databaseProvider" => NodeKind::DatabaseProvider,
            "sqlite" => NodeKind::Sqlite,
            "postgresql" => NodeKind::Postgresql,
            "mysql" => NodeKind::Mysql,
            "emailAuth" => NodeKind::EmailAuth,
            "emailVerification" => NodeKind::EmailVerification,
            "socialLogin" => NodeKind::SocialLogin,
            "account" => NodeKind::Account,
            "rateLimit" => NodeKind::RateLimit,
            "advanced" => NodeKind::Advanced,
            "session" => NodeKind::Session,
            "userFields" => NodeKind::UserFields,
            "plugins" => NodeKind::Plugins,
            "polar" => NodeKind::Polar,
            "polarCheckout" => NodeKind::PolarCheckout,
            "polarPortal" => NodeKind::PolarPortal,
            "polarUsage" => NodeKind::PolarUsage,
            "polarWebhooks" => NodeKind::PolarWebhooks,
            "nextCookies" => NodeKind::NextCookies,
            other => match other.strip_prefix("oauth") {
                Some(provider) if !provider.is_empty() => NodeKind::OAuth(decapitalize(provider)),
                _ => NodeKind::Other(other.to_string()),
            },
        }
    }

    /// Concrete database-type node for a provider string.
    pub fn for_database_provider(provider: &str) -> Self {
        match provider {
            "sqlite" => NodeKind::Sqlite,
            "postgresql" | "postgres" | "pg" => NodeKind::Postgresql,
            "mysql" => NodeKind::Mysql,
            other => NodeKind::Other(other.to_string()),
        }
    }
}

impl From<String> for NodeKind {
    fn from(tag: String) -> Self {
        NodeKind::from_tag(&tag)
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        kind.tag()
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}

pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn decapitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    #[serde(serialize_with = "whole_or_fraction")]
    pub x: f64,
    #[serde(serialize_with = "whole_or_fraction")]
    pub y: f64,
}

/// Whole coordinates are written as JSON integers.
fn whole_or_fraction<S: Serializer>(
    value: &f64,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn rounded(self) -> Self {
        Self {
            x: self.x.round(),
            y: self.y.round(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeKind, position: Position, label: &str) -> Self {
        let mut data = Map::new();
        data.insert("label".to_string(), Value::String(label.to_string()));
        Self {
            id: id.into(),
            kind,
            position,
            data,
        }
    }

    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.str_field("label")
    }

    pub fn bool_field(&self, key: &str) -> Option<bool> {
        self.data.get(key).and_then(Value::as_bool)
    }

    /// Numbers stored by the editor may arrive as floats or numeric strings.
    pub fn u64_field(&self, key: &str) -> Option<u64> {
        match self.data.get(key)? {
            Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f.max(0.0) as u64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }

    /// Arrays of strings; a single comma separated string is accepted too.
    pub fn list_field(&self, key: &str) -> Option<Vec<String>> {
        match self.data.get(key)? {
            Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect(),
            ),
            Value::String(s) => Some(
                s.split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            _ => None,
        }
    }

    pub fn object_field(&self, key: &str) -> Option<&Map<String, Value>> {
        self.data.get(key).and_then(Value::as_object)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub animated: bool,
}

impl Edge {
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            id: format!("e-{}-{}", source, target),
            source: source.to_string(),
            target: target.to_string(),
            animated: true,
        }
    }
}

/// An editable auth graph. Arbitrary shapes are tolerated; only the part
/// reachable from the root is ever generated or exported.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    /// A fresh graph holding only the root node.
    pub fn with_root() -> Self {
        Self {
            nodes: vec![root_node()],
            edges: Vec::new(),
        }
    }

    pub fn root(&self) -> Option<&Node> {
        find_root(&self.nodes)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn has_edge(&self, source: &str, target: &str) -> bool {
        self.edges
            .iter()
            .any(|e| e.source == source && e.target == target)
    }

    pub fn add_node(&mut self, node: Node) -> Result<()> {
        if self.node(&node.id).is_some() {
            return Err(CoreError::DuplicateNode(node.id));
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Editor-side edge creation: refuses self-loops, duplicates and
    /// endpoints that are not in the graph.
    pub fn connect(&mut self, source: &str, target: &str) -> Result<&Edge> {
        if source == target {
            return Err(CoreError::SelfLoop(source.to_string()));
        }
        for id in [source, target] {
            if self.node(id).is_none() {
                return Err(CoreError::UnknownNode(id.to_string()));
            }
        }
        if self.has_edge(source, target) {
            return Err(CoreError::DuplicateEdge {
                from: source.to_string(),
                to: target.to_string(),
            });
        }
        self.edges.push(Edge::new(source, target));
        Ok(&self.edges[self.edges.len() - 1])
    }

    /// Removes a node together with every edge touching it.
    pub fn remove_node(&mut self, id: &str) -> Option<Node> {
        let index = self.nodes.iter().position(|n| n.id == id)?;
        self.edges.retain(|e| e.source != id && e.target != id);
        Some(self.nodes.remove(index))
    }
}

pub fn root_node() -> Node {
    Node::new(ROOT_ID, NodeKind::AuthStarter, Position::new(400.0, 0.0), "Better Auth")
}

/// The first `authStarter` node in list order.
pub fn find_root(nodes: &[Node]) -> Option<&Node> {
    nodes.iter().find(|n| n.kind == NodeKind::AuthStarter)
}
