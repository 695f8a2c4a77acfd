//! Read-only data sources exposed by the provider

pub mod addon;

pub use addon::{AddonDataSource, AddonFacts, AddonLookup};
