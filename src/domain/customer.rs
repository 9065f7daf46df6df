//! Customer domain entity.

use super::lifecycle::{impl_entity, Lifecycle};
use super::person::Person;

/// External end user. Anonymous customers wrap a person with no CPF.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    lifecycle: Lifecycle,
    person: Person,
}

impl_entity!(Customer, "Customer");

impl Customer {
    pub fn new(person: Person) -> Self {
        Self {
            lifecycle: Lifecycle::new(),
            person,
        }
    }

    pub fn restore(lifecycle: Lifecycle, person: Person) -> Self {
        Self { lifecycle, person }
    }

    /// Same customer wrapping a revised person.
    pub fn with_person(self, person: Person) -> Self {
        let mut lifecycle = self.lifecycle;
        lifecycle.touch();
        Self { lifecycle, person }
    }

    pub fn person(&self) -> &Person {
        &self.person
    }
}
