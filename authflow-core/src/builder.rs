// Flat configuration -> graph, with a fixed hand-placed layout

use crate::config::{AuthConfig, DatabaseAdapter};
use crate::model::{Edge, Graph, Node, NodeKind, Position, ROOT_ID, root_node};
use crate::templates::{polar_features, provider_env_prefix, provider_label};
use serde_json::Value;
use tracing::debug;

const COLUMN_WIDTH: f64 = 260.0;
const ROW_HEIGHT: f64 = 130.0;
const FIRST_ROW: f64 = 160.0;
const SIBLING_SPREAD: f64 = 180.0;

/// Expand a flat configuration into nodes and edges. Total and deterministic:
/// the same config always produces the same ids, edges and positions.
pub fn build_graph(config: &AuthConfig) -> Graph {
    let mut builder = GraphBuilder::new(config);
    builder.add_database();
    builder.add_email_password();
    builder.add_email_verification();
    builder.add_social_providers();
    builder.add_account_linking();
    builder.add_rate_limit();
    builder.add_advanced();
    builder.add_session();
    builder.add_user_fields();
    builder.add_plugins();

    let graph = builder.finish();
    debug!(
        "Built graph with {} nodes and {} edges",
        graph.nodes.len(),
        graph.edges.len()
    );
    graph
}

struct GraphBuilder<'a> {
    config: &'a AuthConfig,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    counter: usize,
    column: usize,
}

impl<'a> GraphBuilder<'a> {
    fn new(config: &'a AuthConfig) -> Self {
        let mut root = root_node();
        if !config.trusted_origins.is_empty() {
            root = root.with_field("trustedOrigins", config.trusted_origins.clone());
        }
        if config.base_url != AuthConfig::default().base_url {
            root = root.with_field("baseURL", config.base_url.clone());
        }

        Self {
            config,
            nodes: vec![root],
            edges: Vec::new(),
            counter: 1,
            column: 0,
        }
    }

    fn next_id(&mut self, kind: &NodeKind) -> String {
        self.counter += 1;
        format!("{}-{}", kind.tag(), self.counter)
    }

    /// Starts a new feature group and returns the x of its column.
    fn next_column(&mut self) -> f64 {
        let x = self.column as f64 * COLUMN_WIDTH;
        self.column += 1;
        x
    }

    fn push(&mut self, node: Node, parent: &str) -> String {
        let id = node.id.clone();
        self.edges.push(Edge::new(parent, &id));
        self.nodes.push(node);
        id
    }

    fn node(&mut self, kind: NodeKind, x: f64, row: usize, label: &str) -> Node {
        let id = self.next_id(&kind);
        Node::new(id, kind, Position::new(x, row_y(row)), label)
    }

    fn add_database(&mut self) {
        let config = self.config;
        let Some(database) = &config.database else {
            return;
        };
        let x = self.next_column();

        let hub = self.node(NodeKind::Database, x, 0, "Database");
        let hub = self.push(hub, ROOT_ID);

        let (adapter_kind, adapter_label) = match database.adapter {
            DatabaseAdapter::Prisma => (NodeKind::Prisma, "Prisma Adapter"),
            DatabaseAdapter::Drizzle => (NodeKind::Drizzle, "Drizzle Adapter"),
        };
        let adapter = self.node(adapter_kind, x, 1, adapter_label);
        let adapter = self.push(adapter, &hub);

        let selector = self
            .node(NodeKind::DatabaseProvider, x, 2, "Provider")
            .with_field("provider", database.provider.clone());
        let selector = self.push(selector, &adapter);

        let db_kind = NodeKind::for_database_provider(&database.provider);
        let db_label = database_label(&database.provider);
        let db_type = self.node(db_kind, x, 3, &db_label);
        self.push(db_type, &selector);
    }

    fn add_email_password(&mut self) {
        let config = self.config;
        let Some(email) = &config.email_and_password else {
            return;
        };
        let x = self.next_column();
        let node = self
            .node(NodeKind::EmailAuth, x, 0, "Email & Password")
            .with_field("enabled", email.enabled)
            .with_field("requireVerification", email.require_verification)
            .with_field("minPasswordLength", email.min_password_length)
            .with_field("maxPasswordLength", email.max_password_length)
            .with_field("autoSignIn", email.auto_sign_in)
            .with_field("disableSignUp", email.disable_sign_up);
        self.push(node, ROOT_ID);
    }

    fn add_email_verification(&mut self) {
        let config = self.config;
        let Some(verification) = &config.email_verification else {
            return;
        };
        let x = self.next_column();
        let node = self
            .node(NodeKind::EmailVerification, x, 0, "Email Verification")
            .with_field("sendOnSignUp", verification.send_on_sign_up)
            .with_field("sendOnSignIn", verification.send_on_sign_in)
            .with_field(
                "autoSignInAfterVerification",
                verification.auto_sign_in_after_verification,
            )
            .with_field("tokenExpiresIn", verification.token_expires_in);
        self.push(node, ROOT_ID);
    }

    /// Providers hang off a shared hub as siblings, spread around its x.
    fn add_social_providers(&mut self) {
        if self.config.social_providers.is_empty() {
            return;
        }
        let x = self.next_column();
        let hub = self.node(NodeKind::SocialLogin, x, 0, "Social Login");
        let hub = self.push(hub, ROOT_ID);

        let count = self.config.social_providers.len();
        let providers = self.config.social_providers.clone();
        for (i, provider) in providers.iter().enumerate() {
            let offset = (i as f64 - (count as f64 - 1.0) / 2.0) * SIBLING_SPREAD;
            let kind = NodeKind::OAuth(provider.clone());
            let prefix = provider_env_prefix(provider);
            let node = Node::new(
                kind.tag(),
                kind,
                Position::new(x + offset, row_y(1)),
                &provider_label(provider),
            )
            .with_field("clientId", format!("{}_CLIENT_ID", prefix))
            .with_field("clientSecret", format!("{}_CLIENT_SECRET", prefix));
            self.push(node, &hub);
        }
    }

    fn add_account_linking(&mut self) {
        let config = self.config;
        let Some(account) = &config.account_linking else {
            return;
        };
        let x = self.next_column();
        let node = self
            .node(NodeKind::Account, x, 0, "Account Linking")
            .with_field("trustedProviders", account.trusted_providers.clone())
            .with_field("allowDifferentEmails", account.allow_different_emails);
        self.push(node, ROOT_ID);
    }

    fn add_rate_limit(&mut self) {
        let config = self.config;
        let Some(rate_limit) = &config.rate_limit else {
            return;
        };
        let x = self.next_column();
        let node = self
            .node(NodeKind::RateLimit, x, 0, "Rate Limit")
            .with_field("window", rate_limit.window)
            .with_field("maxRequests", rate_limit.max_requests)
            .with_field("customRules", Value::Object(rate_limit.custom_rules.clone()));
        self.push(node, ROOT_ID);
    }

    fn add_advanced(&mut self) {
        let config = self.config;
        let Some(advanced) = &config.advanced else {
            return;
        };
        let x = self.next_column();
        let node = self
            .node(NodeKind::Advanced, x, 0, "Security")
            .with_field("useSecureCookies", advanced.use_secure_cookies)
            .with_field("httpOnly", advanced.http_only)
            .with_field("crossSubDomainCookies", advanced.cross_sub_domain_cookies);
        self.push(node, ROOT_ID);
    }

    fn add_session(&mut self) {
        let config = self.config;
        let Some(session) = &config.session else {
            return;
        };
        let x = self.next_column();
        let node = self
            .node(NodeKind::Session, x, 0, "Session")
            .with_field("expiresIn", session.expires_in)
            .with_field("updateAge", session.update_age);
        self.push(node, ROOT_ID);
    }

    fn add_user_fields(&mut self) {
        if self.config.user_fields.is_empty() {
            return;
        }
        let x = self.next_column();
        let node = self
            .node(NodeKind::UserFields, x, 0, "User Fields")
            .with_field("fields", self.config.user_fields.clone());
        self.push(node, ROOT_ID);
    }

    /// container -> polar -> sub-features, plus nextCookies on the container.
    /// Sub-features only exist under a polar node, so none can dangle.
    fn add_plugins(&mut self) {
        let config = self.config;
        if config.plugins.is_empty() {
            return;
        }

        let x = self.next_column();
        let container = self.node(NodeKind::Plugins, x, 0, "Plugins");
        let container = self.push(container, ROOT_ID);

        if let Some(polar) = &config.plugins.polar {
            let polar_node = self
                .node(NodeKind::Polar, x, 1, "Polar Payments")
                .with_field("createCustomerOnSignUp", polar.create_customer_on_sign_up);
            let polar_id = self.push(polar_node, &container);

            let enabled: Vec<_> = polar_features()
                .into_iter()
                .filter(|t| polar.feature_enabled(t.feature))
                .collect();
            let count = enabled.len();
            for (i, template) in enabled.into_iter().enumerate() {
                let offset = (i as f64 - (count as f64 - 1.0) / 2.0) * SIBLING_SPREAD;
                let node = self.node(template.kind, x + offset, 2, template.label);
                self.push(node, &polar_id);
            }
        }

        if config.plugins.next_cookies {
            let node = self.node(NodeKind::NextCookies, x + SIBLING_SPREAD, 1, "Next.js Cookies");
            self.push(node, &container);
        }
    }

    fn finish(self) -> Graph {
        Graph::new(self.nodes, self.edges)
    }
}

fn row_y(row: usize) -> f64 {
    FIRST_ROW + row as f64 * ROW_HEIGHT
}

fn database_label(provider: &str) -> String {
    match NodeKind::for_database_provider(provider) {
        NodeKind::Sqlite => "SQLite".to_string(),
        NodeKind::Postgresql => "PostgreSQL".to_string(),
        NodeKind::Mysql => "MySQL".to_string(),
        _ => provider.to_string(),
    }
}
