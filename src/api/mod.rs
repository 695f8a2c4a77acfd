//! Platform API port and adapters
//!
//! [`AddonApi`] is the boundary between the CRUD handlers and the remote
//! platform. [`client::PlatformClient`] implements it over HTTP;
//! [`fake::FakePlatform`] is the in-memory double the tests reconcile
//! against.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

pub mod client;
pub mod fake;
pub mod types;

pub use client::PlatformClient;
pub use fake::FakePlatform;
pub use types::{
    Addon, AddonAttachment, AddonRef, ApiErrorBody, AppRef, AttachmentSpec, CreateAddonRequest,
    PlanRef, UpdateAddonRequest,
};

/// Port for addon management operations against the platform
#[async_trait]
pub trait AddonApi: Send + Sync {
    /// Provision a new addon under an application
    async fn create_addon(&self, app: &str, req: CreateAddonRequest) -> Result<Addon>;

    /// Fetch an addon by ID or name, scoped to an application
    async fn addon_info(&self, app: &str, id_or_name: &str) -> Result<Addon>;

    /// Fetch an addon by ID or name across the whole account
    async fn addon_info_by_name(&self, name: &str) -> Result<Addon>;

    /// Patch an addon's configuration variables
    async fn update_addon(&self, app: &str, id: &str, req: UpdateAddonRequest) -> Result<Addon>;

    /// Deprovision an addon
    async fn delete_addon(&self, app: &str, id: &str) -> Result<()>;

    /// List attachments for an addon
    async fn list_attachments(&self, addon_id: &str) -> Result<Vec<AddonAttachment>>;
}

/// Shared handle to an [`AddonApi`] implementation
pub type AddonApiRef = Arc<dyn AddonApi>;
