//! Addon data source
//!
//! Read-only lookup of an existing addon by name. Unlike the resource's
//! read, a data source cannot represent absence: a missing addon is a hard
//! error, surfaced to the host as-is.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::AddonApiRef;
use crate::error::{Error, Result};

// =============================================================================
// Lookup Input / Output
// =============================================================================

/// Declared lookup arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonLookup {
    /// Addon name to look up, account-wide
    pub name: String,
}

impl AddonLookup {
    /// Decode and validate the host's untyped lookup payload
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let lookup: AddonLookup = serde_json::from_value(value)
            .map_err(|e| Error::Validation(format!("invalid addon lookup: {}", e)))?;
        lookup.validate()?;
        Ok(lookup)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("name must not be empty".into()));
        }
        Ok(())
    }
}

/// Computed outputs of the lookup, all taken from the server record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonFacts {
    pub id: String,
    pub name: String,
    pub app: String,
    /// Fully resolved plan name as the server reports it
    pub plan: String,
    pub provider_id: String,
    #[serde(default)]
    pub config_vars: BTreeMap<String, String>,
}

// =============================================================================
// Data Source
// =============================================================================

/// The addon lookup the host framework reads
pub struct AddonDataSource {
    api: AddonApiRef,
}

impl AddonDataSource {
    pub fn new(api: AddonApiRef) -> Self {
        Self { api }
    }

    /// Resolve an addon by name; not-found is a hard failure
    pub async fn read(&self, lookup: &AddonLookup) -> Result<AddonFacts> {
        lookup.validate()?;

        let addon = self.api.addon_info_by_name(&lookup.name).await?;
        debug!(addon = %addon.name, app = %addon.app.name, "resolved addon lookup");

        Ok(AddonFacts {
            id: addon.id,
            name: addon.name,
            app: addon.app.name,
            plan: addon.plan.name,
            provider_id: addon.provider_id,
            config_vars: addon.config_vars,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::CreateAddonRequest;
    use crate::api::{AddonApi, FakePlatform};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_lookup_returns_server_fields() {
        let platform = Arc::new(FakePlatform::new());
        platform.register_app("tftest-abc123").await;
        let addon = platform
            .create_addon(
                "tftest-abc123",
                CreateAddonRequest {
                    plan: "memcachier".into(),
                    config: None,
                    attachment: None,
                },
            )
            .await
            .unwrap();

        let source = AddonDataSource::new(platform.clone());
        let facts = source
            .read(&AddonLookup {
                name: addon.name.clone(),
            })
            .await
            .unwrap();

        assert_eq!(facts.id, addon.id);
        assert_eq!(facts.app, "tftest-abc123");
        // The data source reports the resolved plan, not the declaration.
        assert_eq!(facts.plan, "memcachier:dev");
        assert_eq!(facts.provider_id, addon.provider_id);
    }

    #[tokio::test]
    async fn test_missing_addon_is_a_hard_error() {
        let platform = Arc::new(FakePlatform::new());
        let source = AddonDataSource::new(platform);

        let err = source
            .read(&AddonLookup {
                name: "no-such-addon".into(),
            })
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_empty_name_rejected_before_any_call() {
        let platform = Arc::new(FakePlatform::new());
        let source = AddonDataSource::new(platform);

        let err = source
            .read(&AddonLookup { name: "  ".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
