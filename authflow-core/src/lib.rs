//! Bidirectional transform between better-auth configuration source and an
//! editable node graph.
//!
//! ```text
//! source --extract_config--> AuthConfig --build_graph--> Graph
//! Graph --generate_config--> AuthConfig --emit_config--> source
//! ```
//!
//! Everything here is synchronous and pure; reading and writing files is the
//! caller's business.

pub mod builder;
pub mod config;
pub mod emit;
pub mod error;
pub mod extract;
pub mod generate;
pub mod model;
pub mod snapshot;
pub mod templates;
pub mod traverse;

pub use builder::build_graph;
pub use config::AuthConfig;
pub use emit::{emit_config, emit_env_template};
pub use error::{CoreError, Result};
pub use extract::extract_config;
pub use generate::{generate_config, generate_from_graph};
pub use model::{Edge, Graph, Node, NodeKind, Position};
pub use snapshot::{StudioSnapshot, export_graph, import_graph};

/// Source text straight to an editable graph.
pub fn graph_from_source(content: &str) -> Graph {
    build_graph(&extract_config(content))
}

/// Graph straight to configuration source text.
pub fn source_from_graph(graph: &Graph) -> String {
    emit_config(&generate_from_graph(graph))
}
