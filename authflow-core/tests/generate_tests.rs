// Tests for generating a flat configuration from a graph

use authflow_core::config::{AuthConfig, DatabaseAdapter};
use authflow_core::model::{Edge, Graph, Node, NodeKind, Position, ROOT_ID, root_node};
use authflow_core::{generate_config, generate_from_graph};
use serde_json::json;

fn node(id: &str, kind: NodeKind) -> Node {
    Node::new(id, kind, Position::default(), id)
}

fn chain(nodes: Vec<Node>) -> Graph {
    let edges = nodes
        .windows(2)
        .map(|pair| Edge::new(&pair[0].id, &pair[1].id))
        .collect();
    Graph::new(nodes, edges)
}

// ============================================================================
// Minimal Graph Tests
// ============================================================================

#[test]
fn test_root_only_has_base_url_and_secret() {
    let config = generate_from_graph(&Graph::with_root());
    let value = serde_json::to_value(&config).unwrap();
    let mut keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort();
    assert_eq!(keys, vec!["baseURL", "secret"]);
    assert_eq!(config.base_url, "process.env.BETTER_AUTH_URL");
    assert_eq!(config.secret, "process.env.BETTER_AUTH_SECRET");
}

#[test]
fn test_empty_graph_is_default() {
    let config = generate_config(&[], &[]);
    assert_eq!(config, AuthConfig::default());
}

#[test]
fn test_no_root_ignores_everything() {
    let nodes = vec![node("emailAuth-2", NodeKind::EmailAuth)];
    let config = generate_config(&nodes, &[]);
    assert!(config.email_and_password.is_none());
}

// ============================================================================
// Reachability Tests
// ============================================================================

#[test]
fn test_unreachable_nodes_do_not_count() {
    let mut graph = chain(vec![root_node(), node("session-2", NodeKind::Session)]);
    let before = generate_from_graph(&graph);

    graph.nodes.push(node("rateLimit-3", NodeKind::RateLimit));
    graph.nodes.push(node("oauthGithub", NodeKind::OAuth("github".to_string())));
    graph.edges.push(Edge::new("rateLimit-3", "oauthGithub"));

    assert_eq!(generate_from_graph(&graph), before);
    assert!(before.session.is_some());
}

#[test]
fn test_edges_are_undirected() {
    // the edge points at the root, not away from it
    let nodes = vec![root_node(), node("session-2", NodeKind::Session)];
    let edges = vec![Edge::new("session-2", ROOT_ID)];
    assert!(generate_config(&nodes, &edges).session.is_some());
}

#[test]
fn test_dangling_edges_are_ignored() {
    let nodes = vec![root_node(), node("session-2", NodeKind::Session)];
    let edges = vec![Edge::new(ROOT_ID, "ghost"), Edge::new("ghost", "session-2")];
    assert!(generate_config(&nodes, &edges).session.is_none());
}

#[test]
fn test_first_visited_node_wins() {
    let graph = chain(vec![
        root_node(),
        node("emailAuth-2", NodeKind::EmailAuth).with_field("minPasswordLength", 12),
        node("emailAuth-3", NodeKind::EmailAuth).with_field("minPasswordLength", 20),
    ]);
    let email = generate_from_graph(&graph).email_and_password.unwrap();
    assert_eq!(email.min_password_length, 12);
}

#[test]
fn test_root_owns_its_id_when_duplicated() {
    let lookalike = node(ROOT_ID, NodeKind::Session).with_field("expiresIn", 5);
    let root = root_node().with_field("baseURL", "process.env.APP_URL");
    let graph = Graph::new(
        vec![lookalike, root, node("emailAuth-2", NodeKind::EmailAuth)],
        vec![Edge::new(ROOT_ID, "emailAuth-2")],
    );

    let config = generate_from_graph(&graph);
    assert_eq!(config.base_url, "process.env.APP_URL");
    assert!(config.email_and_password.is_some());
    assert!(config.session.is_none());
}

// ============================================================================
// Feature Tests
// ============================================================================

#[test]
fn test_email_defaults_fill_missing_fields() {
    let graph = chain(vec![
        root_node(),
        node("emailAuth-2", NodeKind::EmailAuth).with_field("maxPasswordLength", "64"),
    ]);
    let email = generate_from_graph(&graph).email_and_password.unwrap();
    assert!(email.enabled);
    assert_eq!(email.min_password_length, 8);
    assert_eq!(email.max_password_length, 64);
}

#[test]
fn test_database_hub_alone_defaults_to_prisma_sqlite() {
    let graph = chain(vec![root_node(), node("database-2", NodeKind::Database)]);
    let database = generate_from_graph(&graph).database.unwrap();
    assert_eq!(database.adapter, DatabaseAdapter::Prisma);
    assert_eq!(database.provider, "sqlite");
}

#[test]
fn test_drizzle_postgres_maps_to_pg() {
    let graph = chain(vec![
        root_node(),
        node("database-2", NodeKind::Database),
        node("drizzle-3", NodeKind::Drizzle),
        node("postgresql-4", NodeKind::Postgresql),
    ]);
    let database = generate_from_graph(&graph).database.unwrap();
    assert_eq!(database.adapter, DatabaseAdapter::Drizzle);
    assert_eq!(database.provider, "pg");
}

#[test]
fn test_provider_selector_beats_concrete_node() {
    let graph = chain(vec![
        root_node(),
        node("prisma-2", NodeKind::Prisma),
        node("databaseProvider-3", NodeKind::DatabaseProvider).with_field("provider", "mysql"),
        node("sqlite-4", NodeKind::Sqlite),
    ]);
    assert_eq!(generate_from_graph(&graph).database.unwrap().provider, "mysql");
}

#[test]
fn test_social_providers_sorted_and_deduped() {
    let nodes = vec![
        root_node(),
        node("socialLogin-2", NodeKind::SocialLogin),
        node("oauthZoom", NodeKind::OAuth("zoom".to_string())),
        node("oauthGithub", NodeKind::OAuth("github".to_string())),
        node("oauthGithub-dup", NodeKind::OAuth("github".to_string())),
        node("oauthGoogle", NodeKind::OAuth("google".to_string())),
    ];
    let edges = nodes[2..]
        .iter()
        .map(|n| Edge::new("socialLogin-2", &n.id))
        .chain(std::iter::once(Edge::new(ROOT_ID, "socialLogin-2")))
        .collect::<Vec<_>>();
    let config = generate_config(&nodes, &edges);
    assert_eq!(config.social_providers, vec!["google", "github", "zoom"]);
}

#[test]
fn test_orphan_polar_feature_is_ignored() {
    let graph = chain(vec![
        root_node(),
        node("plugins-2", NodeKind::Plugins),
        node("polarCheckout-3", NodeKind::PolarCheckout),
    ]);
    let config = generate_from_graph(&graph);
    assert!(config.plugins.polar.is_none());
    assert!(config.plugins.is_empty());
}

#[test]
fn test_polar_features_under_polar() {
    let graph = chain(vec![
        root_node(),
        node("polar-2", NodeKind::Polar).with_field("createCustomerOnSignUp", false),
        node("polarUsage-3", NodeKind::PolarUsage),
    ]);
    let polar = generate_from_graph(&graph).plugins.polar.unwrap();
    assert!(!polar.create_customer_on_sign_up);
    assert!(polar.usage);
    assert!(!polar.checkout);
}

#[test]
fn test_rate_limit_custom_rules() {
    let graph = chain(vec![
        root_node(),
        node("rateLimit-2", NodeKind::RateLimit)
            .with_field("maxRequests", 10)
            .with_field("customRules", json!({ "/sign-in": 3 })),
    ]);
    let limit = generate_from_graph(&graph).rate_limit.unwrap();
    assert_eq!(limit.window, 60);
    assert_eq!(limit.max_requests, 10);
    assert_eq!(limit.custom_rules.get("/sign-in"), Some(&json!(3)));
}

#[test]
fn test_blank_base_url_falls_back() {
    let root = root_node().with_field("baseURL", "  ");
    let config = generate_config(&[root], &[]);
    assert_eq!(config.base_url, "process.env.BETTER_AUTH_URL");
}

#[test]
fn test_user_fields_from_comma_string() {
    let graph = chain(vec![
        root_node(),
        node("userFields-2", NodeKind::UserFields).with_field("fields", "role, specialty"),
    ]);
    assert_eq!(generate_from_graph(&graph).user_fields, vec!["role", "specialty"]);
}
