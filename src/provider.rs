//! Provider surface
//!
//! Ties configuration, the shared API client and the schema declarations
//! into the shape a plugin host consumes: configure once, then hand out
//! resource and data-source handlers that all share the same client handle.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use crate::api::{AddonApiRef, PlatformClient};
use crate::config::ProviderConfig;
use crate::datasource::AddonDataSource;
use crate::error::Result;
use crate::resource::AddonResource;
use crate::schema::{self, Schema};

/// Resource type name registered with the host
pub const ADDON_RESOURCE: &str = "heroku_addon";

/// Data-source type name registered with the host
pub const ADDON_DATA_SOURCE: &str = "heroku_addon";

/// Full schema surface the provider registers with the host
#[derive(Debug, Clone)]
pub struct ProviderSchema {
    pub resources: BTreeMap<&'static str, Schema>,
    pub data_sources: BTreeMap<&'static str, Schema>,
}

/// The configured provider
pub struct Provider {
    api: AddonApiRef,
}

impl Provider {
    /// Validate configuration and build the shared API client
    pub fn configure(config: ProviderConfig) -> Result<Self> {
        let client = PlatformClient::new(&config)?;
        info!(base_url = %config.base_url, "provider configured");
        Ok(Self {
            api: Arc::new(client),
        })
    }

    /// Build a provider over an existing API implementation
    ///
    /// Used by tests to reconcile against [`crate::api::FakePlatform`].
    pub fn with_api(api: AddonApiRef) -> Self {
        Self { api }
    }

    /// Schemas for everything this provider registers
    pub fn schema() -> ProviderSchema {
        ProviderSchema {
            resources: BTreeMap::from([(ADDON_RESOURCE, schema::addon_resource())]),
            data_sources: BTreeMap::from([(ADDON_DATA_SOURCE, schema::addon_data_source())]),
        }
    }

    /// Handler for the addon resource
    pub fn addon_resource(&self) -> AddonResource {
        AddonResource::new(self.api.clone())
    }

    /// Handler for the addon data source
    pub fn addon_data_source(&self) -> AddonDataSource {
        AddonDataSource::new(self.api.clone())
    }
}
