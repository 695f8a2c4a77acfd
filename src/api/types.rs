//! Wire types for the platform addon API
//!
//! These mirror the JSON records the platform returns. Nested `app` and
//! `plan` refs are kept as-is; the resource layer flattens them into state.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Entity Records
// =============================================================================

/// Reference to an application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppRef {
    pub id: String,
    pub name: String,
}

/// Reference to a service plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRef {
    pub id: String,
    /// Fully qualified plan name (`service:tier`), resolved server-side
    pub name: String,
}

/// Reference to an addon (used inside attachments)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonRef {
    pub id: String,
    pub name: String,
}

/// A provisioned addon as reported by the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Addon {
    /// Opaque addon ID
    pub id: String,
    /// Platform-assigned addon name (e.g. `deployhooks-infinite-2387`)
    pub name: String,
    /// Owning application
    pub app: AppRef,
    /// Resolved plan
    pub plan: PlanRef,
    /// Identifier assigned by the addon's service provider
    pub provider_id: String,
    /// Config vars contributed by the addon
    #[serde(default)]
    pub config_vars: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A named binding between an addon and an application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddonAttachment {
    pub id: String,
    /// Attachment name, surfaced to the app as an env-style reference
    pub name: String,
    pub addon: AddonRef,
    pub app: AppRef,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Request Bodies
// =============================================================================

/// Attachment options passed at addon creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentSpec {
    /// Name for the attachment (the declared alias)
    pub name: String,
}

/// Body for `POST /apps/{app}/addons`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAddonRequest {
    /// Plan name, either `service` or `service:tier`
    pub plan: String,
    /// Initial configuration variables
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<BTreeMap<String, String>>,
    /// Optional named attachment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<AttachmentSpec>,
}

/// Body for `PATCH /apps/{app}/addons/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAddonRequest {
    /// Replacement configuration variables
    pub config: BTreeMap<String, String>,
}

/// Structured error body returned by the platform on non-2xx responses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addon_decodes_platform_record() {
        let addon: Addon = serde_json::from_value(serde_json::json!({
            "id": "01234567-89ab-cdef-0123-456789abcdef",
            "name": "deployhooks-infinite-2387",
            "app": {"id": "app-1", "name": "tftest-abc123"},
            "plan": {"id": "plan-1", "name": "deployhooks:http"},
            "provider_id": "provider|2387",
            "config_vars": {"DEPLOYHOOKS_URL": "http://google.com"},
            "created_at": "2024-05-01T12:00:00Z",
            "updated_at": "2024-05-01T12:00:00Z"
        }))
        .unwrap();

        assert_eq!(addon.app.name, "tftest-abc123");
        assert_eq!(addon.plan.name, "deployhooks:http");
        assert_eq!(
            addon.config_vars.get("DEPLOYHOOKS_URL").map(String::as_str),
            Some("http://google.com")
        );
    }

    #[test]
    fn test_create_request_omits_empty_options() {
        let req = CreateAddonRequest {
            plan: "memcachier".into(),
            config: None,
            attachment: None,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value, serde_json::json!({"plan": "memcachier"}));
    }

    #[test]
    fn test_config_vars_default_to_empty() {
        let addon: Addon = serde_json::from_value(serde_json::json!({
            "id": "a",
            "name": "memcachier-slim-1",
            "app": {"id": "app-1", "name": "tftest"},
            "plan": {"id": "plan-2", "name": "memcachier:dev"},
            "provider_id": "provider|1",
            "created_at": "2024-05-01T12:00:00Z",
            "updated_at": "2024-05-01T12:00:00Z"
        }))
        .unwrap();
        assert!(addon.config_vars.is_empty());
    }
}
