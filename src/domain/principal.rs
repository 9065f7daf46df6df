//! Authenticated caller, as carried by a bearer token.

use uuid::Uuid;

use crate::config::PROFILE_CUSTOMER;

/// Caller identity and the permissions granted by its profile.
///
/// `id` is the customer id for customer tokens and the employee id for
/// employee tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub name: String,
    pub profile: String,
    pub permissions: Vec<String>,
}

impl Principal {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }

    /// Customers may only see and change their own customer record.
    pub fn is_customer(&self) -> bool {
        self.profile == PROFILE_CUSTOMER
    }

    /// Whether this caller may act on the customer with `customer_id`.
    pub fn can_access_customer(&self, customer_id: Uuid) -> bool {
        !self.is_customer() || self.id == customer_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(profile: &str) -> Principal {
        Principal {
            id: Uuid::new_v4(),
            name: "Ana".to_string(),
            profile: profile.to_string(),
            permissions: vec!["can_view_customers".to_string()],
        }
    }

    #[test]
    fn test_has_permission() {
        let caller = principal("employee");
        assert!(caller.has_permission("can_view_customers"));
        assert!(!caller.has_permission("can_delete_customer"));
    }

    #[test]
    fn test_customer_scope() {
        let customer = principal("customer");
        assert!(customer.can_access_customer(customer.id));
        assert!(!customer.can_access_customer(Uuid::new_v4()));

        let staff = principal("manager");
        assert!(staff.can_access_customer(Uuid::new_v4()));
    }
}
