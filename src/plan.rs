//! Attribute-level planning helper
//!
//! Compares prior state against the desired declaration, attribute by
//! attribute, and decides what the host must do: nothing, patch in place,
//! or destroy-and-recreate when a forces-replacement attribute changed.
//! Absent prior state always plans a create, which is how out-of-band
//! deletion surfaces as a non-empty plan instead of an error.

use serde_json::Value;

use crate::error::Result;
use crate::resource::{AddonConfig, AddonState};
use crate::schema::{self, Schema};

// =============================================================================
// Plan Types
// =============================================================================

/// Action the host should take for one resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceAction {
    /// State matches the declaration
    Noop,
    /// Entity is absent and must be provisioned
    Create,
    /// Mutable attributes changed, patch in place
    Update,
    /// A forces-replacement attribute changed
    Replace,
}

/// Result of planning one resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePlan {
    pub action: ResourceAction,
    /// Declared attributes that differ from prior state
    pub changed: Vec<String>,
}

impl ResourcePlan {
    /// True when the host has nothing to do
    pub fn is_empty(&self) -> bool {
        self.action == ResourceAction::Noop
    }
}

// =============================================================================
// Planning
// =============================================================================

/// Diff desired declaration against prior state under a schema
///
/// Only declared (non-computed) attributes participate; computed attributes
/// are the server's to change and never produce a diff.
pub fn plan(schema: &Schema, prior: Option<&Value>, desired: &Value) -> ResourcePlan {
    let prior = match prior {
        Some(p) => p,
        None => {
            let changed = schema
                .iter()
                .filter(|(name, attr)| !attr.computed && non_null(desired.get(*name)).is_some())
                .map(|(name, _)| name.to_string())
                .collect();
            return ResourcePlan {
                action: ResourceAction::Create,
                changed,
            };
        }
    };

    let mut changed = Vec::new();
    let mut replace = false;
    for (name, attr) in schema.iter() {
        if attr.computed {
            continue;
        }
        let before = non_null(prior.get(name));
        let after = non_null(desired.get(name));
        if before != after {
            changed.push(name.to_string());
            if attr.forces_replacement {
                replace = true;
            }
        }
    }

    let action = if changed.is_empty() {
        ResourceAction::Noop
    } else if replace {
        ResourceAction::Replace
    } else {
        ResourceAction::Update
    };
    ResourcePlan { action, changed }
}

fn non_null(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

/// Plan the addon resource from its typed state and configuration
pub fn plan_addon(prior: Option<&AddonState>, desired: &AddonConfig) -> Result<ResourcePlan> {
    let schema = schema::addon_resource();
    let prior = prior.map(serde_json::to_value).transpose()?;
    let desired = serde_json::to_value(desired)?;
    Ok(plan(&schema, prior.as_ref(), &desired))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Schema {
        schema::addon_resource()
    }

    #[test]
    fn test_absent_prior_plans_create() {
        let desired = json!({"app": "tftest-abc123", "plan": "deployhooks:http"});
        let plan = plan(&schema(), None, &desired);
        assert_eq!(plan.action, ResourceAction::Create);
        assert!(!plan.is_empty());
        assert_eq!(plan.changed, vec!["app", "plan"]);
    }

    #[test]
    fn test_identical_state_is_noop() {
        let state = json!({
            "app": "tftest-abc123",
            "plan": "deployhooks:http",
            "config": {"url": "http://google.com"},
            "name": "deployhooks-2387",
            "provider_id": "provider-1"
        });
        let desired = json!({
            "app": "tftest-abc123",
            "plan": "deployhooks:http",
            "config": {"url": "http://google.com"}
        });
        assert!(plan(&schema(), Some(&state), &desired).is_empty());
    }

    #[test]
    fn test_computed_drift_is_ignored() {
        let state = json!({
            "app": "tftest-abc123",
            "plan": "memcachier",
            "config_vars": {"MEMCACHIER_URL": "something-new"}
        });
        let desired = json!({"app": "tftest-abc123", "plan": "memcachier"});
        assert!(plan(&schema(), Some(&state), &desired).is_empty());
    }

    #[test]
    fn test_config_change_updates_in_place() {
        let state = json!({"app": "a", "plan": "deployhooks:http", "config": {"url": "http://google.com"}});
        let desired = json!({"app": "a", "plan": "deployhooks:http", "config": {"url": "http://example.com"}});
        let plan = plan(&schema(), Some(&state), &desired);
        assert_eq!(plan.action, ResourceAction::Update);
        assert_eq!(plan.changed, vec!["config"]);
    }

    #[test]
    fn test_plan_change_forces_replacement() {
        let state = json!({"app": "a", "plan": "memcachier"});
        let desired = json!({"app": "a", "plan": "memcachier:100"});
        let plan = plan(&schema(), Some(&state), &desired);
        assert_eq!(plan.action, ResourceAction::Replace);
    }

    #[test]
    fn test_alias_change_forces_replacement() {
        let state = json!({"app": "a", "plan": "deployhooks:http", "as": "GOOGLE_HOOK"});
        let desired = json!({"app": "a", "plan": "deployhooks:http", "as": "OTHER_HOOK"});
        assert_eq!(
            plan(&schema(), Some(&state), &desired).action,
            ResourceAction::Replace
        );
    }
}
