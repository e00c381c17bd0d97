//! The flat configuration object both directions of the transform pivot
//! through. Each feature block is `None` when the feature is absent; every
//! field inside a present block always carries a value, falling back to the
//! documented default when the source did not say.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_BASE_URL: &str = "process.env.BETTER_AUTH_URL";
pub const DEFAULT_SECRET: &str = "process.env.BETTER_AUTH_SECRET";
pub const DEFAULT_DATABASE_PROVIDER: &str = "sqlite";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_and_password: Option<EmailPasswordConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verification: Option<EmailVerificationConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub social_providers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_linking: Option<AccountLinkingConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimitConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced: Option<AdvancedConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub user_fields: Vec<String>,
    #[serde(default, skip_serializing_if = "PluginsConfig::is_empty")]
    pub plugins: PluginsConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trusted_origins: Vec<String>,
    #[serde(rename = "baseURL", default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_secret")]
    pub secret: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            database: None,
            email_and_password: None,
            email_verification: None,
            social_providers: Vec::new(),
            account_linking: None,
            rate_limit: None,
            advanced: None,
            session: None,
            user_fields: Vec::new(),
            plugins: PluginsConfig::default(),
            trusted_origins: Vec::new(),
            base_url: default_base_url(),
            secret: default_secret(),
        }
    }
}

impl AuthConfig {
    pub fn has_database(&self) -> bool {
        self.database.is_some()
    }

    pub fn has_email_password(&self) -> bool {
        self.email_and_password.is_some()
    }

    pub fn has_email_verification(&self) -> bool {
        self.email_verification.is_some()
    }

    pub fn has_account_linking(&self) -> bool {
        self.account_linking.is_some()
    }

    pub fn has_rate_limit(&self) -> bool {
        self.rate_limit.is_some()
    }

    pub fn has_advanced(&self) -> bool {
        self.advanced.is_some()
    }

    /// Number of optional top-level sections present. Zero for a
    /// configuration generated from a lone root node.
    pub fn feature_count(&self) -> usize {
        [
            self.database.is_some(),
            self.email_and_password.is_some(),
            self.email_verification.is_some(),
            !self.social_providers.is_empty(),
            self.account_linking.is_some(),
            self.rate_limit.is_some(),
            self.advanced.is_some(),
            self.session.is_some(),
            !self.user_fields.is_empty(),
            !self.plugins.is_empty(),
            !self.trusted_origins.is_empty(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_secret() -> String {
    DEFAULT_SECRET.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseAdapter {
    Prisma,
    Drizzle,
}

impl DatabaseAdapter {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseAdapter::Prisma => "prisma",
            DatabaseAdapter::Drizzle => "drizzle",
        }
    }

    /// The factory identifier the framework exports for this adapter.
    pub fn factory(&self) -> &'static str {
        match self {
            DatabaseAdapter::Prisma => "prismaAdapter",
            DatabaseAdapter::Drizzle => "drizzleAdapter",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseConfig {
    pub adapter: DatabaseAdapter,
    pub provider: String,
}

impl DatabaseConfig {
    pub fn new(adapter: DatabaseAdapter) -> Self {
        Self {
            adapter,
            provider: DEFAULT_DATABASE_PROVIDER.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailPasswordConfig {
    pub enabled: bool,
    pub require_verification: bool,
    pub min_password_length: u64,
    pub max_password_length: u64,
    pub auto_sign_in: bool,
    pub disable_sign_up: bool,
}

impl Default for EmailPasswordConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            require_verification: false,
            min_password_length: 8,
            max_password_length: 128,
            auto_sign_in: true,
            disable_sign_up: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailVerificationConfig {
    pub send_on_sign_up: bool,
    pub send_on_sign_in: bool,
    pub auto_sign_in_after_verification: bool,
    pub token_expires_in: u64,
}

impl Default for EmailVerificationConfig {
    fn default() -> Self {
        Self {
            send_on_sign_up: true,
            send_on_sign_in: false,
            auto_sign_in_after_verification: true,
            token_expires_in: 3600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountLinkingConfig {
    pub trusted_providers: Vec<String>,
    pub allow_different_emails: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitConfig {
    pub window: u64,
    pub max_requests: u64,
    pub custom_rules: Map<String, Value>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window: 60,
            max_requests: 100,
            custom_rules: Map::new(),
        }
    }
}

/// Cookie hardening. Detected as a package, so extraction always sets all
/// three together; the editor may still toggle them one by one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedConfig {
    pub use_secure_cookies: bool,
    pub http_only: bool,
    pub cross_sub_domain_cookies: bool,
}

impl Default for AdvancedConfig {
    fn default() -> Self {
        Self {
            use_secure_cookies: true,
            http_only: true,
            cross_sub_domain_cookies: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    pub expires_in: u64,
    pub update_age: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            expires_in: 60 * 60 * 24 * 7,
            update_age: 60 * 60 * 24,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polar: Option<PolarConfig>,
    #[serde(default)]
    pub next_cookies: bool,
}

impl PluginsConfig {
    pub fn is_empty(&self) -> bool {
        self.polar.is_none() && !self.next_cookies
    }
}

/// Payment plugin with its four optional sub-features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolarConfig {
    pub create_customer_on_sign_up: bool,
    pub checkout: bool,
    pub portal: bool,
    pub usage: bool,
    pub webhooks: bool,
}

impl Default for PolarConfig {
    fn default() -> Self {
        Self {
            create_customer_on_sign_up: true,
            checkout: false,
            portal: false,
            usage: false,
            webhooks: false,
        }
    }
}

impl PolarConfig {
    pub fn feature_enabled(&self, feature: PolarFeature) -> bool {
        match feature {
            PolarFeature::Checkout => self.checkout,
            PolarFeature::Portal => self.portal,
            PolarFeature::Usage => self.usage,
            PolarFeature::Webhooks => self.webhooks,
        }
    }

    pub fn set_feature(&mut self, feature: PolarFeature, enabled: bool) {
        match feature {
            PolarFeature::Checkout => self.checkout = enabled,
            PolarFeature::Portal => self.portal = enabled,
            PolarFeature::Usage => self.usage = enabled,
            PolarFeature::Webhooks => self.webhooks = enabled,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolarFeature {
    Checkout,
    Portal,
    Usage,
    Webhooks,
}

impl PolarFeature {
    pub const ALL: [PolarFeature; 4] = [
        PolarFeature::Checkout,
        PolarFeature::Portal,
        PolarFeature::Usage,
        PolarFeature::Webhooks,
    ];
}
