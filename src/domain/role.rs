//! Role domain entity.

use super::lifecycle::{impl_entity, Lifecycle};
use super::require_text;
use crate::config::ROLE_MANAGER;
use crate::errors::AppResult;

/// Job role held by an employee (e.g. "employee", "manager").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    lifecycle: Lifecycle,
    name: String,
    description: String,
}

impl_entity!(Role, "Role");

/// Role fields as submitted by callers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleData {
    pub name: String,
    pub description: String,
}

impl Role {
    pub fn new(data: RoleData) -> AppResult<Self> {
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

    pub fn revise(self, data: RoleData) -> AppResult<Self> {
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

    pub fn is_manager(&self) -> bool {
        self.name == ROLE_MANAGER
    }
}
