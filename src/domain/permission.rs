//! Permission domain entity.

use super::lifecycle::{impl_entity, Lifecycle};
use super::require_text;
use crate::errors::AppResult;

/// Named capability, conventionally `can_<verb>_<noun>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    lifecycle: Lifecycle,
    name: String,
    description: String,
}

impl_entity!(Permission, "Permission");

/// Permission fields as submitted by callers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionData {
    pub name: String,
    pub description: String,
}

impl Permission {
    pub fn new(data: PermissionData) -> AppResult<Self> {
        Ok(Self {
            lifecycle: Lifecycle::new(),
            name: require_text("name", &data.name)?,
            description: require_text("description", &data.description)?,
        })
    }

    pub fn restore(lifecycle: Lifecycle, name: String, description: String) -> Self {
        Self {
            lifecycle,
            name,
            description,
        }
    }

    pub fn revise(self, data: PermissionData) -> AppResult<Self> {
        let mut lifecycle = self.lifecycle;
        lifecycle.touch();
        Ok(Self {
            lifecycle,
            name: require_text("name", &data.name)?,
            description: require_text("description", &data.description)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}
