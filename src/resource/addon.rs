//! Addon resource lifecycle
//!
//! The four CRUD handlers the host framework drives. Each one is a single
//! remote call whose authoritative response is copied field by field into
//! state; nothing is computed locally. The host serializes operations per
//! entity, so no locking is needed here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::api::types::{Addon, AttachmentSpec, CreateAddonRequest, UpdateAddonRequest};
use crate::api::AddonApiRef;
use crate::error::{Error, Result};

// =============================================================================
// Declared Configuration
// =============================================================================

/// User-declared addon configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonConfig {
    /// Owning application name
    pub app: String,
    /// Plan name, `service` or `service:tier`
    pub plan: String,
    /// Optional attachment alias
    #[serde(rename = "as", default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Initial configuration variables
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<BTreeMap<String, String>>,
}

impl AddonConfig {
    /// Decode and validate the host's untyped declaration payload
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let config: AddonConfig = serde_json::from_value(value)
            .map_err(|e| Error::Validation(format!("invalid addon declaration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.app.trim().is_empty() {
            return Err(Error::Validation("app must not be empty".into()));
        }
        if self.plan.trim().is_empty() {
            return Err(Error::Validation("plan must not be empty".into()));
        }
        Ok(())
    }
}

// =============================================================================
// Persisted State
// =============================================================================

/// Addon state as persisted by the host framework
///
/// `alias` and `config` are the declared inputs carried through unchanged;
/// everything else is computed from the server response on every operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonState {
    /// Opaque addon ID
    pub id: String,
    /// Platform-assigned addon name
    pub name: String,
    /// Owning application name
    pub app: String,
    /// Plan name, normalized against the declaration (see [`normalized_plan`])
    pub plan: String,
    /// Identifier assigned by the addon's service provider
    pub provider_id: String,
    /// Config vars contributed by the addon
    #[serde(default)]
    pub config_vars: BTreeMap<String, String>,
    /// Declared attachment alias
    #[serde(rename = "as", default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Declared configuration variables
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<BTreeMap<String, String>>,
}

impl AddonState {
    fn from_remote(
        addon: &Addon,
        declared_plan: &str,
        alias: Option<String>,
        config: Option<BTreeMap<String, String>>,
    ) -> Self {
        Self {
            id: addon.id.clone(),
            name: addon.name.clone(),
            app: addon.app.name.clone(),
            plan: normalized_plan(&addon.plan.name, declared_plan),
            provider_id: addon.provider_id.clone(),
            config_vars: addon.config_vars.clone(),
            alias,
            config,
        }
    }
}

/// Normalize the server-resolved plan against the declared plan name
///
/// A declaration naming a bare service ("memcachier") resolves server-side
/// to a default tier ("memcachier:dev"). Storing the resolved name verbatim
/// would make every later reconcile of the bare declaration look like a
/// plan change, so state keeps only the service portion in that case. A
/// fully qualified declaration keeps the resolved name as-is.
pub fn normalized_plan(resolved: &str, declared: &str) -> String {
    if !declared.is_empty() && !declared.contains(':') {
        resolved.split(':').next().unwrap_or(resolved).to_string()
    } else {
        resolved.to_string()
    }
}

// =============================================================================
// CRUD Handlers
// =============================================================================

/// The addon resource the host framework reconciles
pub struct AddonResource {
    api: AddonApiRef,
}

impl AddonResource {
    pub fn new(api: AddonApiRef) -> Self {
        Self { api }
    }

    /// Provision a new addon from its declaration
    pub async fn create(&self, config: &AddonConfig) -> Result<AddonState> {
        config.validate()?;

        let req = CreateAddonRequest {
            plan: config.plan.clone(),
            config: config.config.clone(),
            attachment: config
                .alias
                .as_ref()
                .map(|name| AttachmentSpec { name: name.clone() }),
        };

        let addon = self.api.create_addon(&config.app, req).await?;
        info!(
            addon = %addon.name,
            app = %addon.app.name,
            plan = %addon.plan.name,
            "created addon"
        );
        Ok(AddonState::from_remote(
            &addon,
            &config.plan,
            config.alias.clone(),
            config.config.clone(),
        ))
    }

    /// Refresh state from the platform
    ///
    /// Returns `Ok(None)` when the addon no longer exists so the host can
    /// plan re-creation instead of failing the refresh.
    pub async fn read(&self, state: &AddonState) -> Result<Option<AddonState>> {
        match self.api.addon_info(&state.app, &state.id).await {
            Ok(addon) => Ok(Some(AddonState::from_remote(
                &addon,
                &state.plan,
                state.alias.clone(),
                state.config.clone(),
            ))),
            Err(e) if e.is_not_found() => {
                warn!(addon = %state.name, app = %state.app, "addon no longer exists");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Patch the configuration variables in place
    ///
    /// `app` and `plan` are immutable here: the schema marks them as
    /// forcing replacement, so the host never routes their changes through
    /// update.
    pub async fn update(&self, state: &AddonState, config: &AddonConfig) -> Result<AddonState> {
        config.validate()?;

        let addon = match &config.config {
            Some(vars) => {
                let req = UpdateAddonRequest {
                    config: vars.clone(),
                };
                let addon = self.api.update_addon(&state.app, &state.id, req).await?;
                info!(addon = %addon.name, app = %addon.app.name, "updated addon config vars");
                addon
            }
            // Nothing declared to patch; refresh computed attributes only.
            None => self.api.addon_info(&state.app, &state.id).await?,
        };

        Ok(AddonState::from_remote(
            &addon,
            &state.plan,
            state.alias.clone(),
            config.config.clone(),
        ))
    }

    /// Deprovision the addon; already-gone counts as success
    pub async fn delete(&self, state: &AddonState) -> Result<()> {
        match self.api.delete_addon(&state.app, &state.id).await {
            Ok(()) => {
                info!(addon = %state.name, app = %state.app, "deleted addon");
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                debug!(addon = %state.name, app = %state.app, "addon already deleted");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AddonApi, FakePlatform};
    use std::sync::Arc;

    fn config(app: &str, plan: &str) -> AddonConfig {
        AddonConfig {
            app: app.into(),
            plan: plan.into(),
            alias: None,
            config: None,
        }
    }

    async fn resource_with_app(app: &str) -> (AddonResource, Arc<FakePlatform>) {
        let platform = Arc::new(FakePlatform::new());
        platform.register_app(app).await;
        (AddonResource::new(platform.clone()), platform)
    }

    #[test]
    fn test_plan_normalization() {
        assert_eq!(normalized_plan("memcachier:dev", "memcachier"), "memcachier");
        assert_eq!(
            normalized_plan("memcachier:dev", "memcachier:dev"),
            "memcachier:dev"
        );
        assert_eq!(
            normalized_plan("deployhooks:http", "deployhooks:http"),
            "deployhooks:http"
        );
    }

    #[test]
    fn test_declaration_validation() {
        assert!(config("app", "plan").validate().is_ok());
        assert!(config("", "plan").validate().is_err());
        assert!(config("app", "  ").validate().is_err());

        let err = AddonConfig::from_value(serde_json::json!({"app": "x"})).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_populates_computed_fields() {
        let (resource, _) = resource_with_app("tftest-abc123").await;

        let state = resource
            .create(&config("tftest-abc123", "deployhooks:http"))
            .await
            .unwrap();

        assert!(!state.id.is_empty());
        assert!(!state.provider_id.is_empty());
        assert_eq!(state.app, "tftest-abc123");
        assert_eq!(state.plan, "deployhooks:http");
        assert!(state.name.starts_with("deployhooks-"));
    }

    #[tokio::test]
    async fn test_bare_plan_stays_bare_in_state() {
        let (resource, platform) = resource_with_app("tftest-abc123").await;

        let state = resource
            .create(&config("tftest-abc123", "memcachier"))
            .await
            .unwrap();
        assert_eq!(state.plan, "memcachier");

        // The remote record carries the fully resolved plan.
        let remote = platform
            .addon_info("tftest-abc123", &state.id)
            .await
            .unwrap();
        assert_eq!(remote.plan.name, "memcachier:dev");

        // A refresh must not reintroduce the tier.
        let refreshed = resource.read(&state).await.unwrap().unwrap();
        assert_eq!(refreshed.plan, "memcachier");
    }

    #[tokio::test]
    async fn test_read_reports_absence_after_external_delete() {
        let (resource, platform) = resource_with_app("tftest-abc123").await;

        let state = resource
            .create(&config("tftest-abc123", "deployhooks:http"))
            .await
            .unwrap();

        platform
            .delete_out_of_band("tftest-abc123", "deployhooks")
            .await
            .unwrap();

        assert_eq!(resource.read(&state).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (resource, _) = resource_with_app("tftest-abc123").await;

        let state = resource
            .create(&config("tftest-abc123", "deployhooks:http"))
            .await
            .unwrap();

        resource.delete(&state).await.unwrap();
        resource.delete(&state).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_leaves_app_and_plan_untouched() {
        let (resource, _) = resource_with_app("tftest-abc123").await;

        let mut declared = config("tftest-abc123", "deployhooks:http");
        declared.config = Some(BTreeMap::from([(
            "url".to_string(),
            "http://google.com".to_string(),
        )]));
        let state = resource.create(&declared).await.unwrap();

        declared.config = Some(BTreeMap::from([(
            "url".to_string(),
            "http://example.com".to_string(),
        )]));
        let updated = resource.update(&state, &declared).await.unwrap();

        assert_eq!(updated.app, state.app);
        assert_eq!(updated.plan, state.plan);
        assert_eq!(updated.id, state.id);
        assert_eq!(
            updated.config_vars.get("url").map(String::as_str),
            Some("http://example.com")
        );
    }

    #[tokio::test]
    async fn test_create_surfaces_invalid_plan_verbatim() {
        let (resource, _) = resource_with_app("tftest-abc123").await;

        let err = resource
            .create(&config("tftest-abc123", "nosuchservice:gold"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Api { status: 422, .. }));
    }
}
