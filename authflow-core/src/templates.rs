// Per-feature snippet table shared by the extractor, builder and emitter

use crate::config::PolarFeature;
use crate::model::{NodeKind, capitalize};

/// An OAuth provider the extractor probes for and the emitter knows how to
/// write. Table order is probe order.
pub struct ProviderTemplate {
    pub key: &'static str,
    pub label: &'static str,
    pub env_prefix: &'static str,
    /// Extra `key: value` lines emitted after the client credentials.
    pub extra_fields: &'static [(&'static str, &'static str)],
}

pub const PROVIDERS: &[ProviderTemplate] = &[
    ProviderTemplate { key: "google", label: "Google", env_prefix: "GOOGLE", extra_fields: &[] },
    ProviderTemplate { key: "github", label: "GitHub", env_prefix: "GITHUB", extra_fields: &[] },
    ProviderTemplate { key: "discord", label: "Discord", env_prefix: "DISCORD", extra_fields: &[] },
    ProviderTemplate { key: "facebook", label: "Facebook", env_prefix: "FACEBOOK", extra_fields: &[] },
    ProviderTemplate { key: "apple", label: "Apple", env_prefix: "APPLE", extra_fields: &[] },
    ProviderTemplate {
        key: "microsoft",
        label: "Microsoft",
        env_prefix: "MICROSOFT",
        extra_fields: &[("tenantId", "\"common\"")],
    },
    ProviderTemplate { key: "twitter", label: "Twitter", env_prefix: "TWITTER", extra_fields: &[] },
    ProviderTemplate { key: "gitlab", label: "GitLab", env_prefix: "GITLAB", extra_fields: &[] },
    ProviderTemplate { key: "linkedin", label: "LinkedIn", env_prefix: "LINKEDIN", extra_fields: &[] },
    ProviderTemplate { key: "spotify", label: "Spotify", env_prefix: "SPOTIFY", extra_fields: &[] },
    ProviderTemplate { key: "twitch", label: "Twitch", env_prefix: "TWITCH", extra_fields: &[] },
];

pub fn provider(key: &str) -> Option<&'static ProviderTemplate> {
    PROVIDERS.iter().find(|p| p.key == key)
}

/// Position of a provider in probe order; unknown providers sort last.
pub fn provider_rank(key: &str) -> usize {
    PROVIDERS
        .iter()
        .position(|p| p.key == key)
        .unwrap_or(PROVIDERS.len())
}

pub fn provider_label(key: &str) -> String {
    provider(key)
        .map(|p| p.label.to_string())
        .unwrap_or_else(|| capitalize(key))
}

pub fn provider_env_prefix(key: &str) -> String {
    provider(key)
        .map(|p| p.env_prefix.to_string())
        .unwrap_or_else(|| key.to_uppercase())
}

/// An additional user field recognised in `user.additionalFields`.
pub struct UserFieldTemplate {
    pub name: &'static str,
    pub snippet: &'static str,
}

pub const USER_FIELDS: &[UserFieldTemplate] = &[
    UserFieldTemplate {
        name: "role",
        snippet: "type: \"string\", required: false, defaultValue: \"user\", input: false",
    },
    UserFieldTemplate {
        name: "specialty",
        snippet: "type: \"string\", required: false",
    },
    UserFieldTemplate {
        name: "licenseNumber",
        snippet: "type: \"string\", required: false",
    },
];

pub fn user_field_snippet(name: &str) -> &'static str {
    USER_FIELDS
        .iter()
        .find(|f| f.name == name)
        .map(|f| f.snippet)
        .unwrap_or("type: \"string\", required: false")
}

/// A named sub-feature of the payment plugin.
pub struct PolarFeatureTemplate {
    pub feature: PolarFeature,
    /// Marker the extractor looks for, also the emitted call's name.
    pub call: &'static str,
    pub label: &'static str,
    pub kind: NodeKind,
    pub snippet: &'static str,
}

pub fn polar_features() -> [PolarFeatureTemplate; 4] {
    [
        PolarFeatureTemplate {
            feature: PolarFeature::Checkout,
            call: "checkout",
            label: "Checkout",
            kind: NodeKind::PolarCheckout,
            snippet: "checkout({\n          products: [{ productId: \"your-product-id\", slug: \"pro\" }],\n          successUrl: \"/success?checkout_id={CHECKOUT_ID}\",\n          authenticatedUsersOnly: true,\n        })",
        },
        PolarFeatureTemplate {
            feature: PolarFeature::Portal,
            call: "portal",
            label: "Customer Portal",
            kind: NodeKind::PolarPortal,
            snippet: "portal()",
        },
        PolarFeatureTemplate {
            feature: PolarFeature::Usage,
            call: "usage",
            label: "Usage Billing",
            kind: NodeKind::PolarUsage,
            snippet: "usage()",
        },
        PolarFeatureTemplate {
            feature: PolarFeature::Webhooks,
            call: "webhooks",
            label: "Webhooks",
            kind: NodeKind::PolarWebhooks,
            snippet: "webhooks({\n          secret: process.env.POLAR_WEBHOOK_SECRET as string,\n        })",
        },
    ]
}

pub fn polar_feature(feature: PolarFeature) -> PolarFeatureTemplate {
    let [checkout, portal, usage, webhooks] = polar_features();
    match feature {
        PolarFeature::Checkout => checkout,
        PolarFeature::Portal => portal,
        PolarFeature::Usage => usage,
        PolarFeature::Webhooks => webhooks,
    }
}
