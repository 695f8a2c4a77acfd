//! Declarative schema metadata
//!
//! Describes the attributes each resource and data source exposes to the
//! host framework: value type, required/optional/computed, and whether a
//! change forces destroy-and-recreate instead of an in-place update.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// =============================================================================
// Attributes
// =============================================================================

/// Value type of a schema attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    StringMap,
}

/// A single schema attribute declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub kind: AttributeType,
    /// Must be set in the declaration
    pub required: bool,
    /// Populated by the remote system, never settable by the declaration
    pub computed: bool,
    /// A change requires destroy-and-recreate
    pub forces_replacement: bool,
}

impl Attribute {
    fn new(kind: AttributeType) -> Self {
        Self {
            kind,
            required: false,
            computed: false,
            forces_replacement: false,
        }
    }

    pub fn required_string() -> Self {
        Self {
            required: true,
            ..Self::new(AttributeType::String)
        }
    }

    pub fn optional_string() -> Self {
        Self::new(AttributeType::String)
    }

    pub fn computed_string() -> Self {
        Self {
            computed: true,
            ..Self::new(AttributeType::String)
        }
    }

    pub fn optional_string_map() -> Self {
        Self::new(AttributeType::StringMap)
    }

    pub fn computed_string_map() -> Self {
        Self {
            computed: true,
            ..Self::new(AttributeType::StringMap)
        }
    }

    /// Mark this attribute as forcing replacement on change
    pub fn forces_replacement(mut self) -> Self {
        self.forces_replacement = true;
        self
    }
}

// =============================================================================
// Schema
// =============================================================================

/// Attribute set for one resource or data source
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    attributes: BTreeMap<String, Attribute>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Iterate attributes in stable name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Attribute)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Names of attributes whose change forces destroy-and-recreate
    pub fn replacement_triggers(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, a)| a.forces_replacement)
            .map(|(name, _)| name)
            .collect()
    }
}

// =============================================================================
// Addon Declarations
// =============================================================================

/// Schema of the addon resource block
pub fn addon_resource() -> Schema {
    Schema::new()
        .with_attribute("app", Attribute::required_string().forces_replacement())
        .with_attribute("plan", Attribute::required_string().forces_replacement())
        .with_attribute("as", Attribute::optional_string().forces_replacement())
        .with_attribute("config", Attribute::optional_string_map())
        .with_attribute("name", Attribute::computed_string())
        .with_attribute("provider_id", Attribute::computed_string())
        .with_attribute("config_vars", Attribute::computed_string_map())
}

/// Schema of the addon data-source block
pub fn addon_data_source() -> Schema {
    Schema::new()
        .with_attribute("name", Attribute::required_string())
        .with_attribute("id", Attribute::computed_string())
        .with_attribute("app", Attribute::computed_string())
        .with_attribute("plan", Attribute::computed_string())
        .with_attribute("provider_id", Attribute::computed_string())
        .with_attribute("config_vars", Attribute::computed_string_map())
}
