// Graph -> flat configuration, reading only the subgraph reachable from the root

use crate::config::{
    AccountLinkingConfig, AdvancedConfig, AuthConfig, DEFAULT_DATABASE_PROVIDER, DatabaseAdapter,
    DatabaseConfig, EmailPasswordConfig, EmailVerificationConfig, PluginsConfig, PolarConfig,
    RateLimitConfig, SessionConfig,
};
use crate::model::{Edge, Graph, Node, NodeKind};
use crate::templates::{polar_features, provider_rank};
use crate::traverse::Reachable;
use tracing::debug;

/// Flat configuration for the part of the graph connected to the root.
/// Unreachable nodes never influence the result, and a graph without a
/// root yields the default (minimal) configuration.
pub fn generate_config(nodes: &[Node], edges: &[Edge]) -> AuthConfig {
    let reachable = Reachable::from_root(nodes, edges);
    let Some(root) = reachable.nodes().first().copied() else {
        return AuthConfig::default();
    };

    let defaults = AuthConfig::default();
    let config = AuthConfig {
        database: read_database(&reachable),
        email_and_password: reachable.first(&NodeKind::EmailAuth).map(read_email_password),
        email_verification: reachable
            .first(&NodeKind::EmailVerification)
            .map(read_email_verification),
        social_providers: read_social_providers(&reachable),
        account_linking: reachable.first(&NodeKind::Account).map(read_account_linking),
        rate_limit: reachable.first(&NodeKind::RateLimit).map(read_rate_limit),
        advanced: reachable.first(&NodeKind::Advanced).map(read_advanced),
        session: reachable.first(&NodeKind::Session).map(read_session),
        user_fields: reachable
            .first(&NodeKind::UserFields)
            .and_then(|n| n.list_field("fields"))
            .unwrap_or_default(),
        plugins: read_plugins(&reachable),
        trusted_origins: root.list_field("trustedOrigins").unwrap_or_default(),
        base_url: root
            .str_field("baseURL")
            .filter(|url| !url.trim().is_empty())
            .map(str::to_string)
            .unwrap_or(defaults.base_url),
        secret: defaults.secret,
    };

    debug!(
        "Generated {} configuration sections from {} reachable nodes",
        config.feature_count(),
        reachable.len()
    );
    config
}

pub fn generate_from_graph(graph: &Graph) -> AuthConfig {
    generate_config(&graph.nodes, &graph.edges)
}

/// The adapter node decides prisma vs drizzle. A database node with no
/// adapter attached falls back to prisma.
fn read_database(reachable: &Reachable) -> Option<DatabaseConfig> {
    let adapter_node = reachable.first_where(|k| matches!(k, NodeKind::Prisma | NodeKind::Drizzle));
    let hub = reachable.first(&NodeKind::Database);
    if adapter_node.is_none() && hub.is_none() {
        return None;
    }

    let adapter = match adapter_node.map(|n| &n.kind) {
        Some(NodeKind::Drizzle) => DatabaseAdapter::Drizzle,
        _ => DatabaseAdapter::Prisma,
    };

    let provider = reachable
        .first(&NodeKind::DatabaseProvider)
        .and_then(|n| n.str_field("provider"))
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .or_else(|| {
            reachable
                .first_where(|k| matches!(k, NodeKind::Sqlite | NodeKind::Postgresql | NodeKind::Mysql))
                .map(|n| default_provider_for(&n.kind, adapter))
        })
        .unwrap_or_else(|| DEFAULT_DATABASE_PROVIDER.to_string());

    Some(DatabaseConfig { adapter, provider })
}

/// Provider string the adapter expects for a concrete database node.
fn default_provider_for(kind: &NodeKind, adapter: DatabaseAdapter) -> String {
    let provider = match (kind, adapter) {
        (NodeKind::Postgresql, DatabaseAdapter::Drizzle) => "pg",
        (NodeKind::Postgresql, DatabaseAdapter::Prisma) => "postgresql",
        (NodeKind::Mysql, _) => "mysql",
        _ => DEFAULT_DATABASE_PROVIDER,
    };
    provider.to_string()
}

fn read_email_password(node: &Node) -> EmailPasswordConfig {
    let defaults = EmailPasswordConfig::default();
    EmailPasswordConfig {
        enabled: node.bool_field("enabled").unwrap_or(defaults.enabled),
        require_verification: node
            .bool_field("requireVerification")
            .unwrap_or(defaults.require_verification),
        min_password_length: node
            .u64_field("minPasswordLength")
            .unwrap_or(defaults.min_password_length),
        max_password_length: node
            .u64_field("maxPasswordLength")
            .unwrap_or(defaults.max_password_length),
        auto_sign_in: node.bool_field("autoSignIn").unwrap_or(defaults.auto_sign_in),
        disable_sign_up: node.bool_field("disableSignUp").unwrap_or(defaults.disable_sign_up),
    }
}

fn read_email_verification(node: &Node) -> EmailVerificationConfig {
    let defaults = EmailVerificationConfig::default();
    EmailVerificationConfig {
        send_on_sign_up: node.bool_field("sendOnSignUp").unwrap_or(defaults.send_on_sign_up),
        send_on_sign_in: node.bool_field("sendOnSignIn").unwrap_or(defaults.send_on_sign_in),
        auto_sign_in_after_verification: node
            .bool_field("autoSignInAfterVerification")
            .unwrap_or(defaults.auto_sign_in_after_verification),
        token_expires_in: node
            .u64_field("tokenExpiresIn")
            .unwrap_or(defaults.token_expires_in),
    }
}

/// Known providers in probe order, then unknown ones in visit order.
fn read_social_providers(reachable: &Reachable) -> Vec<String> {
    let mut providers: Vec<String> = Vec::new();
    for node in reachable.all_where(|k| matches!(k, NodeKind::OAuth(_))) {
        if let NodeKind::OAuth(provider) = &node.kind
            && !providers.contains(provider)
        {
            providers.push(provider.clone());
        }
    }
    // stable sort keeps visit order among unknown providers
    providers.sort_by_key(|p| provider_rank(p));
    providers
}

fn read_account_linking(node: &Node) -> AccountLinkingConfig {
    AccountLinkingConfig {
        trusted_providers: node.list_field("trustedProviders").unwrap_or_default(),
        allow_different_emails: node.bool_field("allowDifferentEmails").unwrap_or(false),
    }
}

fn read_rate_limit(node: &Node) -> RateLimitConfig {
    let defaults = RateLimitConfig::default();
    RateLimitConfig {
        window: node.u64_field("window").unwrap_or(defaults.window),
        max_requests: node.u64_field("maxRequests").unwrap_or(defaults.max_requests),
        custom_rules: node.object_field("customRules").cloned().unwrap_or_default(),
    }
}

fn read_advanced(node: &Node) -> AdvancedConfig {
    let defaults = AdvancedConfig::default();
    AdvancedConfig {
        use_secure_cookies: node
            .bool_field("useSecureCookies")
            .unwrap_or(defaults.use_secure_cookies),
        http_only: node.bool_field("httpOnly").unwrap_or(defaults.http_only),
        cross_sub_domain_cookies: node
            .bool_field("crossSubDomainCookies")
            .unwrap_or(defaults.cross_sub_domain_cookies),
    }
}

fn read_session(node: &Node) -> SessionConfig {
    let defaults = SessionConfig::default();
    SessionConfig {
        expires_in: node.u64_field("expiresIn").unwrap_or(defaults.expires_in),
        update_age: node.u64_field("updateAge").unwrap_or(defaults.update_age),
    }
}

/// Sub-features count only while a polar node is reachable.
fn read_plugins(reachable: &Reachable) -> PluginsConfig {
    let polar = reachable.first(&NodeKind::Polar).map(|node| {
        let mut polar = PolarConfig {
            create_customer_on_sign_up: node.bool_field("createCustomerOnSignUp").unwrap_or(true),
            ..PolarConfig::default()
        };
        for template in polar_features() {
            polar.set_feature(template.feature, reachable.first(&template.kind).is_some());
        }
        polar
    });

    PluginsConfig {
        polar,
        next_cookies: reachable.first(&NodeKind::NextCookies).is_some(),
    }
}
