//! Delete policy shared by every delete use case.

use uuid::Uuid;

use crate::domain::{DeletePolicy, Entity};
use crate::errors::{AppResult, OptionExt};

/// What a delete use case must persist.
#[derive(Debug)]
pub(crate) enum Removal<T> {
    /// Save the entity, now stamped as inactivated
    Soft(T),
    /// Remove the row with this id
    Hard(Uuid),
}

/// Decide how to remove `found` under `policy`.
///
/// Absent entities are `NotFound`; under the soft policy so are entities
/// that are already inactivated.
pub(crate) fn plan_removal<T: Entity>(policy: DeletePolicy, found: Option<T>) -> AppResult<Removal<T>> {
    let mut entity = found.ok_or_not_found(T::NAME)?;
    match policy {
        DeletePolicy::Soft => {
            entity.soft_delete()?;
            Ok(Removal::Soft(entity))
        }
        DeletePolicy::Hard => Ok(Removal::Hard(entity.id())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Role, RoleData};
    use crate::errors::AppError;

    fn role() -> Role {
        Role::new(RoleData {
            name: "cashier".to_string(),
            description: "front desk".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_soft_policy_stamps_entity() {
        let removal = plan_removal(DeletePolicy::Soft, Some(role())).unwrap();
        assert!(matches!(removal, Removal::Soft(role) if role.is_deleted()));
    }

    #[test]
    fn test_soft_policy_rejects_inactive_entity() {
        let mut inactive = role();
        inactive.soft_delete().unwrap();

        let err = plan_removal(DeletePolicy::Soft, Some(inactive)).unwrap_err();
        assert!(matches!(err, AppError::NotFound(name) if name == "Role"));
    }

    #[test]
    fn test_hard_policy_removes_by_id() {
        let role = role();
        let id = role.id();
        assert!(matches!(
            plan_removal(DeletePolicy::Hard, Some(role)).unwrap(),
            Removal::Hard(removed) if removed == id
        ));
    }

    #[test]
    fn test_missing_entity_is_not_found() {
        let err = plan_removal::<Role>(DeletePolicy::Hard, None).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
