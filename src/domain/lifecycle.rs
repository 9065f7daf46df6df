//! Lifecycle envelope shared by every entity.
//!
//! An entity is active while `inactivated_at` is `None`. Soft deletion stamps
//! the column, reactivation clears it; both touch `updated_at`.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Identity and timestamps common to all entities
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lifecycle {
    id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    inactivated_at: Option<DateTime<Utc>>,
}

impl Lifecycle {
    /// Fresh envelope with a new id
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            inactivated_at: None,
        }
    }

    /// Rebuild an envelope read back from storage
    pub fn restore(
        id: Uuid,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        inactivated_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            created_at,
            updated_at,
            inactivated_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn inactivated_at(&self) -> Option<DateTime<Utc>> {
        self.inactivated_at
    }

    pub fn is_deleted(&self) -> bool {
        self.inactivated_at.is_some()
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    fn inactivate(&mut self) {
        let now = Utc::now();
        self.inactivated_at = Some(now);
        self.updated_at = now;
    }

    fn activate(&mut self) {
        self.inactivated_at = None;
        self.touch();
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

/// Behaviour shared by every persisted entity.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Name used in not-found and duplicate errors
    const NAME: &'static str;

    fn lifecycle(&self) -> &Lifecycle;

    fn lifecycle_mut(&mut self) -> &mut Lifecycle;

    fn id(&self) -> Uuid {
        self.lifecycle().id()
    }

    fn is_deleted(&self) -> bool {
        self.lifecycle().is_deleted()
    }

    /// Stamp `inactivated_at`. Deleting twice is a caller error.
    fn soft_delete(&mut self) -> AppResult<()> {
        if self.is_deleted() {
            return Err(AppError::not_found(Self::NAME));
        }
        self.lifecycle_mut().inactivate();
        Ok(())
    }

    /// Clear `inactivated_at`.
    fn reactivate(&mut self) {
        self.lifecycle_mut().activate();
    }
}

/// Implements [`Entity`] for a struct holding a `lifecycle` field.
macro_rules! impl_entity {
    ($ty:ty, $name:literal) => {
        impl $crate::domain::Entity for $ty {
            const NAME: &'static str = $name;

            fn lifecycle(&self) -> &$crate::domain::Lifecycle {
                &self.lifecycle
            }

            fn lifecycle_mut(&mut self) -> &mut $crate::domain::Lifecycle {
                &mut self.lifecycle
            }
        }
    };
}

pub(crate) use impl_entity;

/// How delete use cases remove a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeletePolicy {
    /// Stamp `inactivated_at` and keep the row
    #[default]
    Soft,
    /// Remove the row
    Hard,
}

impl FromStr for DeletePolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "soft" => Ok(DeletePolicy::Soft),
            "hard" => Ok(DeletePolicy::Hard),
            other => Err(AppError::validation(format!("unknown delete mode: {}", other))),
        }
    }
}

impl std::fmt::Display for DeletePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeletePolicy::Soft => write!(f, "soft"),
            DeletePolicy::Hard => write!(f, "hard"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct Widget {
        lifecycle: Lifecycle,
    }

    impl_entity!(Widget, "Widget");

    #[test]
    fn test_new_entity_is_active() {
        let widget = Widget {
            lifecycle: Lifecycle::new(),
        };
        assert!(!widget.is_deleted());
        assert_eq!(widget.lifecycle().created_at(), widget.lifecycle().updated_at());
    }

    #[test]
    fn test_soft_delete_then_reactivate() {
        let mut widget = Widget {
            lifecycle: Lifecycle::new(),
        };
        let id = widget.id();

        widget.soft_delete().unwrap();
        assert!(widget.is_deleted());
        assert!(widget.lifecycle().inactivated_at().is_some());

        widget.reactivate();
        assert!(!widget.is_deleted());
        assert_eq!(widget.id(), id);
    }

    #[test]
    fn test_soft_delete_twice_fails() {
        let mut widget = Widget {
            lifecycle: Lifecycle::new(),
        };
        widget.soft_delete().unwrap();

        let err = widget.soft_delete().unwrap_err();
        assert!(matches!(err, AppError::NotFound(name) if name == "Widget"));
    }

    #[test]
    fn test_delete_policy_parsing() {
        assert_eq!("soft".parse::<DeletePolicy>().unwrap(), DeletePolicy::Soft);
        assert_eq!("HARD".parse::<DeletePolicy>().unwrap(), DeletePolicy::Hard);
        assert!("archive".parse::<DeletePolicy>().is_err());
    }
}
