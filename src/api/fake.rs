//! In-memory platform double
//!
//! Implements [`AddonApi`] against process-local state so the CRUD handlers
//! and acceptance-style tests can reconcile without a network. The plan
//! catalog mimics server-side plan resolution: a bare service name resolves
//! to that service's default `service:tier` plan.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::api::types::{
    Addon, AddonAttachment, AddonRef, AppRef, CreateAddonRequest, PlanRef, UpdateAddonRequest,
};
use crate::api::AddonApi;
use crate::error::{Error, Result};

// =============================================================================
// Fake Platform
// =============================================================================

/// In-memory stand-in for the platform addon API
pub struct FakePlatform {
    /// Known applications, name -> id
    apps: RwLock<BTreeMap<String, String>>,
    /// Provisioned addons, id -> record
    addons: RwLock<BTreeMap<String, Addon>>,
    /// Attachments, id -> record
    attachments: RwLock<BTreeMap<String, AddonAttachment>>,
    /// Fully qualified plans the catalog accepts
    plans: Vec<&'static str>,
    /// Default plan per service, used to resolve bare plan names
    default_plans: BTreeMap<&'static str, &'static str>,
    next_id: AtomicU64,
}

impl Default for FakePlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl FakePlatform {
    /// Create a fake with a small seeded plan catalog
    pub fn new() -> Self {
        let mut default_plans = BTreeMap::new();
        default_plans.insert("deployhooks", "deployhooks:http");
        default_plans.insert("memcachier", "memcachier:dev");

        Self {
            apps: RwLock::new(BTreeMap::new()),
            addons: RwLock::new(BTreeMap::new()),
            attachments: RwLock::new(BTreeMap::new()),
            plans: vec!["deployhooks:http", "memcachier:dev", "memcachier:100"],
            default_plans,
            next_id: AtomicU64::new(1),
        }
    }

    /// Register an application addons can attach to
    pub async fn register_app(&self, name: &str) -> AppRef {
        let id = self.generate_id("app");
        self.apps.write().await.insert(name.to_string(), id.clone());
        info!(app = name, "registered application");
        AppRef {
            id,
            name: name.to_string(),
        }
    }

    /// Delete an application's addon for a service, bypassing the provider
    ///
    /// Models external out-of-band deletion, which a later read must detect.
    pub async fn delete_out_of_band(&self, app: &str, service: &str) -> Result<()> {
        let mut addons = self.addons.write().await;
        let target = addons
            .values()
            .find(|a| a.app.name == app && service_of(&a.plan.name) == service)
            .map(|a| a.id.clone())
            .ok_or_else(|| Error::not_found("Addon", service))?;
        addons.remove(&target);
        self.attachments
            .write()
            .await
            .retain(|_, att| att.addon.id != target);
        info!(app, service, "addon deleted out of band");
        Ok(())
    }

    /// Resolve a declared plan name against the catalog
    fn resolve_plan(&self, plan: &str) -> Result<String> {
        if plan.contains(':') {
            if self.plans.iter().any(|known| *known == plan) {
                return Ok(plan.to_string());
            }
        } else if let Some(full) = self.default_plans.get(plan) {
            return Ok(full.to_string());
        }
        Err(Error::Api {
            status: 422,
            code: "invalid_params".into(),
            message: format!("Couldn't find a plan matching {:?}", plan),
        })
    }

    fn generate_id(&self, prefix: &str) -> String {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed);
        format!("{}-{:012x}", prefix, n)
    }

    async fn find_addon(&self, app: Option<&str>, id_or_name: &str) -> Result<Addon> {
        let addons = self.addons.read().await;
        addons
            .values()
            .find(|a| {
                (a.id == id_or_name || a.name == id_or_name)
                    && app.map(|app| a.app.name == app).unwrap_or(true)
            })
            .cloned()
            .ok_or_else(|| Error::not_found("Addon", id_or_name))
    }
}

fn service_of(plan: &str) -> &str {
    plan.split(':').next().unwrap_or(plan)
}

// =============================================================================
// AddonApi Implementation
// =============================================================================

#[async_trait]
impl AddonApi for FakePlatform {
    async fn create_addon(&self, app: &str, req: CreateAddonRequest) -> Result<Addon> {
        let app_id = self
            .apps
            .read()
            .await
            .get(app)
            .cloned()
            .ok_or_else(|| Error::not_found("App", app))?;

        let plan = self.resolve_plan(&req.plan)?;
        let service = service_of(&plan).to_string();
        let id = self.generate_id("addon");
        let name = format!("{}-{}", service, self.next_id.fetch_add(1, Ordering::Relaxed));

        let mut config_vars = req.config.clone().unwrap_or_default();
        config_vars.insert(
            format!("{}_URL", service.to_uppercase().replace('-', "_")),
            format!("https://{}.addons.example.net", name),
        );

        let now = Utc::now();
        let addon = Addon {
            id: id.clone(),
            name: name.clone(),
            app: AppRef {
                id: app_id,
                name: app.to_string(),
            },
            plan: PlanRef {
                id: self.generate_id("plan"),
                name: plan,
            },
            provider_id: self.generate_id("provider"),
            config_vars,
            created_at: now,
            updated_at: now,
        };

        if let Some(spec) = &req.attachment {
            let attachment = AddonAttachment {
                id: self.generate_id("attachment"),
                name: spec.name.clone(),
                addon: AddonRef {
                    id: id.clone(),
                    name: name.clone(),
                },
                app: addon.app.clone(),
                created_at: now,
            };
            self.attachments
                .write()
                .await
                .insert(attachment.id.clone(), attachment);
        }

        self.addons.write().await.insert(id, addon.clone());
        debug!(app, addon = %addon.name, plan = %addon.plan.name, "provisioned addon");
        Ok(addon)
    }

    async fn addon_info(&self, app: &str, id_or_name: &str) -> Result<Addon> {
        self.find_addon(Some(app), id_or_name).await
    }

    async fn addon_info_by_name(&self, name: &str) -> Result<Addon> {
        self.find_addon(None, name).await
    }

    async fn update_addon(&self, app: &str, id: &str, req: UpdateAddonRequest) -> Result<Addon> {
        let mut addons = self.addons.write().await;
        let addon = addons
            .values_mut()
            .find(|a| a.app.name == app && (a.id == id || a.name == id))
            .ok_or_else(|| Error::not_found("Addon", id))?;

        // Patch semantics: provided keys overwrite, everything else stays.
        addon.config_vars.extend(req.config);
        addon.updated_at = Utc::now();
        debug!(app, addon = %addon.name, "patched addon config vars");
        Ok(addon.clone())
    }

    async fn delete_addon(&self, app: &str, id: &str) -> Result<()> {
        let target = self.find_addon(Some(app), id).await?;
        self.addons.write().await.remove(&target.id);
        self.attachments
            .write()
            .await
            .retain(|_, att| att.addon.id != target.id);
        debug!(app, addon = %target.name, "deprovisioned addon");
        Ok(())
    }

    async fn list_attachments(&self, addon_id: &str) -> Result<Vec<AddonAttachment>> {
        let attachments = self.attachments.read().await;
        Ok(attachments
            .values()
            .filter(|att| att.addon.id == addon_id || att.addon.name == addon_id)
            .cloned()
            .collect())
    }
}
