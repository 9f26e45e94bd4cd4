//! Shared identity types used across the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Base path every resource is served under; `href` values are built from it.
pub const RESOURCES_PATH: &str = "/resources";

/// Opaque caller identifier taken from the identity header.
///
/// No format is enforced. An empty identifier is valid and simply owns nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Server-assigned resource identifier, unique across all owners.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Fresh random identifier (UUID v4, hyphenated).
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compound key required by every owner-scoped single-row store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerKey<'a> {
    pub owner: &'a UserId,
    pub id: &'a ResourceId,
}

impl<'a> OwnerKey<'a> {
    pub fn new(owner: &'a UserId, id: &'a ResourceId) -> Self {
        Self { owner, id }
    }
}
