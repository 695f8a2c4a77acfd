//! Heroku Addon Provider
//!
//! A resource/data-source pair for a declarative provisioning plugin: the
//! `heroku_addon` resource attaches an addon to a platform application, and
//! the matching data source looks an existing addon up by name. The crate
//! translates declarations into calls against the platform's addon REST API
//! and copies authoritative server state back into the host framework's
//! state model; diffing, drift detection and CRUD orchestration stay with
//! the host.
//!
//! # Modules
//!
//! - [`provider`]: configured provider surface handed to the host
//! - [`schema`]: attribute declarations (required/computed/forces-replacement)
//! - [`resource`]: the addon resource and its CRUD handlers
//! - [`datasource`]: the read-only addon lookup
//! - [`plan`]: attribute-level diffing helper
//! - [`api`]: typed platform API port, HTTP client and in-memory double
//! - [`config`]: typed provider configuration
//! - [`error`]: error types and handling

pub mod api;
pub mod config;
pub mod datasource;
pub mod error;
pub mod plan;
pub mod provider;
pub mod resource;
pub mod schema;

// Re-export commonly used types
pub use api::{
    Addon, AddonApi, AddonApiRef, AddonAttachment, CreateAddonRequest, FakePlatform,
    PlatformClient, UpdateAddonRequest,
};
pub use config::ProviderConfig;
pub use datasource::{AddonDataSource, AddonFacts, AddonLookup};
pub use error::{Error, Result};
pub use plan::{plan_addon, ResourceAction, ResourcePlan};
pub use provider::{Provider, ProviderSchema, ADDON_DATA_SOURCE, ADDON_RESOURCE};
pub use resource::{AddonConfig, AddonResource, AddonState};
pub use schema::{addon_data_source, addon_resource, Attribute, AttributeType, Schema};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
