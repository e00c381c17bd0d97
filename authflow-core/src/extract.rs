//! Best-effort pattern extraction over framework idiom text.
//!
//! This is not a parser. Every concern is an independent regex or substring
//! probe against the whole file, and every probe that misses means "feature
//! absent" with defaults applied downstream. Scoped blocks end at the first
//! `}`, so a block holding a nested object is truncated there; callers rely
//! on that behaviour for the round-trip property, so it stays.

use crate::config::{
    AccountLinkingConfig, AdvancedConfig, AuthConfig, DatabaseAdapter, DatabaseConfig,
    EmailPasswordConfig, EmailVerificationConfig, PluginsConfig, PolarConfig, RateLimitConfig,
    SessionConfig,
};
use crate::templates::{PROVIDERS, USER_FIELDS, polar_features};
use regex::Regex;
use dashmap::DashMap;
use serde_json::{Map, Value};
use std::sync::LazyLock;
use tracing::debug;

/// Adapter call up to the first `}`, which closes its options object. The
/// client argument may itself be a call such as `new PrismaClient()`.
static ADAPTER_CALL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(prismaAdapter|drizzleAdapter)\s*\(([^}]*)\}").unwrap());

static PROVIDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"provider:\s*["'](\w+)["']"#).unwrap());

static BASE_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bbaseURL:\s*([^,\n}]+)").unwrap());

/// `word:` in key position, for turning an object literal into JSON.
static BARE_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([{,]\s*)([A-Za-z_$][\w$]*)\s*:").unwrap());

const ADVANCED_MARKERS: &[&str] = &[
    "useSecureCookies",
    "crossSubDomainCookies",
    "defaultCookieAttributes",
    "cookiePrefix",
];

/// Recover a flat configuration from configuration source text. Never fails.
pub fn extract_config(content: &str) -> AuthConfig {
    let config = AuthConfig {
        database: extract_database(content),
        email_and_password: extract_email_password(content),
        email_verification: extract_email_verification(content),
        social_providers: extract_social_providers(content),
        account_linking: extract_account_linking(content),
        rate_limit: extract_rate_limit(content),
        advanced: extract_advanced(content),
        session: extract_session(content),
        user_fields: extract_user_fields(content),
        plugins: extract_plugins(content),
        trusted_origins: extract_array_field(content, "trustedOrigins").unwrap_or_default(),
        base_url: BASE_URL_RE
            .captures(content)
            .map(|caps| caps[1].trim().to_string())
            .unwrap_or_else(|| AuthConfig::default().base_url),
        ..AuthConfig::default()
    };

    debug!("Extracted {} configuration sections", config.feature_count());
    config
}

fn extract_database(content: &str) -> Option<DatabaseConfig> {
    let adapter = if content.contains("prismaAdapter") {
        DatabaseAdapter::Prisma
    } else if content.contains("drizzleAdapter") {
        DatabaseAdapter::Drizzle
    } else {
        return None;
    };

    let mut database = DatabaseConfig::new(adapter);
    let provider = ADAPTER_CALL_RE
        .captures_iter(content)
        .find(|caps| &caps[1] == adapter.factory())
        .and_then(|caps| {
            PROVIDER_RE
                .captures(&caps[2])
                .map(|provider| provider[1].to_string())
        });
    if let Some(provider) = provider {
        database.provider = provider;
    }
    Some(database)
}

fn extract_email_password(content: &str) -> Option<EmailPasswordConfig> {
    if !content.contains("emailAndPassword") {
        return None;
    }

    let block = scoped_block(content, "emailAndPassword").unwrap_or_default();
    let defaults = EmailPasswordConfig::default();
    Some(EmailPasswordConfig {
        enabled: extract_bool_field(block, "enabled").unwrap_or(defaults.enabled),
        require_verification: extract_bool_field(block, "requireEmailVerification")
            .unwrap_or(defaults.require_verification),
        min_password_length: extract_numeric_field(block, "minPasswordLength")
            .unwrap_or(defaults.min_password_length),
        max_password_length: extract_numeric_field(block, "maxPasswordLength")
            .unwrap_or(defaults.max_password_length),
        auto_sign_in: extract_bool_field(block, "autoSignIn").unwrap_or(defaults.auto_sign_in),
        disable_sign_up: extract_bool_field(block, "disableSignUp")
            .unwrap_or(defaults.disable_sign_up),
    })
}

fn extract_email_verification(content: &str) -> Option<EmailVerificationConfig> {
    let block = scoped_block(content, "emailVerification")?;
    let defaults = EmailVerificationConfig::default();
    Some(EmailVerificationConfig {
        send_on_sign_up: extract_bool_field(block, "sendOnSignUp")
            .unwrap_or(defaults.send_on_sign_up),
        send_on_sign_in: extract_bool_field(block, "sendOnSignIn")
            .unwrap_or(defaults.send_on_sign_in),
        auto_sign_in_after_verification: extract_bool_field(block, "autoSignInAfterVerification")
            .unwrap_or(defaults.auto_sign_in_after_verification),
        token_expires_in: extract_numeric_field(block, "tokenExpiresIn")
            .unwrap_or(defaults.token_expires_in),
    })
}

/// A provider is present when `<key>:` occurs anywhere. Output follows the
/// probe table, not file order.
fn extract_social_providers(content: &str) -> Vec<String> {
    PROVIDERS
        .iter()
        .filter(|p| content.contains(&format!("{}:", p.key)))
        .map(|p| p.key.to_string())
        .collect()
}

fn extract_account_linking(content: &str) -> Option<AccountLinkingConfig> {
    let block = scoped_block(content, "accountLinking")?;
    Some(AccountLinkingConfig {
        trusted_providers: extract_array_field(block, "trustedProviders").unwrap_or_default(),
        allow_different_emails: extract_bool_field(block, "allowDifferentEmails").unwrap_or(false),
    })
}

fn extract_rate_limit(content: &str) -> Option<RateLimitConfig> {
    let block = scoped_block(content, "rateLimit")?;
    let defaults = RateLimitConfig::default();

    // customRules is itself an object, so it cannot live inside the
    // truncated block; look for it anywhere after the rateLimit key.
    let tail = content
        .find("rateLimit")
        .map(|start| &content[start..])
        .unwrap_or(content);

    Some(RateLimitConfig {
        window: extract_numeric_field(block, "window").unwrap_or(defaults.window),
        max_requests: extract_numeric_field(block, "max").unwrap_or(defaults.max_requests),
        custom_rules: extract_object_field(tail, "customRules").unwrap_or_default(),
    })
}

fn extract_advanced(content: &str) -> Option<AdvancedConfig> {
    ADVANCED_MARKERS
        .iter()
        .any(|marker| content.contains(marker))
        .then(AdvancedConfig::default)
}

fn extract_session(content: &str) -> Option<SessionConfig> {
    let block = scoped_block(content, "session")?;
    let defaults = SessionConfig::default();
    Some(SessionConfig {
        expires_in: extract_numeric_field(block, "expiresIn").unwrap_or(defaults.expires_in),
        update_age: extract_numeric_field(block, "updateAge").unwrap_or(defaults.update_age),
    })
}

fn extract_user_fields(content: &str) -> Vec<String> {
    USER_FIELDS
        .iter()
        .filter(|f| content.contains(&format!("{}:", f.name)))
        .map(|f| f.name.to_string())
        .collect()
}

fn extract_plugins(content: &str) -> PluginsConfig {
    let polar = content.contains("polar(").then(|| {
        let mut polar = PolarConfig {
            create_customer_on_sign_up: extract_bool_field(content, "createCustomerOnSignUp")
                .unwrap_or(true),
            ..PolarConfig::default()
        };
        for template in polar_features() {
            polar.set_feature(
                template.feature,
                content.contains(&format!("{}(", template.call)),
            );
        }
        polar
    });

    PluginsConfig {
        polar,
        next_cookies: content.contains("nextCookies"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum FieldShape {
    Block,
    Number,
    Bool,
    Array,
    Object,
}

impl FieldShape {
    fn pattern(self, key: &str) -> String {
        let key = regex::escape(key);
        match self {
            FieldShape::Block => format!(r"\b{}:\s*\{{([^}}]+)\}}", key),
            FieldShape::Number => format!(r"\b{}:\s*(\d+)", key),
            FieldShape::Bool => format!(r"\b{}:\s*(true|false)\b", key),
            FieldShape::Array => format!(r"\b{}:\s*\[([^\]]+)\]", key),
            FieldShape::Object => format!(r"\b{}:\s*(\{{[^}}]+\}})", key),
        }
    }
}

/// Keyed field patterns, compiled on first use.
static FIELD_PATTERNS: LazyLock<DashMap<(FieldShape, String), Regex>> =
    LazyLock::new(DashMap::new);

fn field_regex(shape: FieldShape, key: &str) -> Option<Regex> {
    let cache_key = (shape, key.to_string());
    if let Some(re) = FIELD_PATTERNS.get(&cache_key) {
        return Some(re.value().clone());
    }
    let re = Regex::new(&shape.pattern(key)).ok()?;
    FIELD_PATTERNS.insert(cache_key, re.clone());
    Some(re)
}

/// Body of `key: { ... }` up to the first closing brace. Nested braces are
/// not tracked.
pub fn scoped_block<'a>(content: &'a str, key: &str) -> Option<&'a str> {
    let re = field_regex(FieldShape::Block, key)?;
    re.captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// `key: 123`
pub fn extract_numeric_field(content: &str, key: &str) -> Option<u64> {
    let re = field_regex(FieldShape::Number, key)?;
    re.captures(content)?[1].parse().ok()
}

/// `key: true` / `key: false`
pub fn extract_bool_field(content: &str, key: &str) -> Option<bool> {
    let re = field_regex(FieldShape::Bool, key)?;
    Some(&re.captures(content)?[1] == "true")
}

/// `key: ["a", 'b', c]`, elements trimmed and unquoted.
pub fn extract_array_field(content: &str, key: &str) -> Option<Vec<String>> {
    let re = field_regex(FieldShape::Array, key)?;
    let caps = re.captures(content)?;
    Some(
        caps[1]
            .split(',')
            .map(|item| item.trim().trim_matches(|c| c == '"' || c == '\'' || c == '`'))
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

/// `key: { ... }` parsed as JSON after quoting bare keys. Text that still is
/// not JSON yields an empty object rather than an error.
pub fn extract_object_field(content: &str, key: &str) -> Option<Map<String, Value>> {
    let re = field_regex(FieldShape::Object, key)?;
    let raw = re.captures(content)?.get(1)?.as_str();
    let quoted = BARE_KEY_RE.replace_all(raw, "$1\"$2\":");

    match serde_json::from_str::<Value>(&quoted) {
        Ok(Value::Object(map)) => Some(map),
        _ => {
            debug!("Could not read {} as an object literal, using {{}}", key);
            Some(Map::new())
        }
    }
}
