//! Declarative resources managed by the provider

pub mod addon;

pub use addon::{AddonConfig, AddonResource, AddonState};
