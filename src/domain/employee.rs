//! Employee domain entity.

use chrono::NaiveDate;

use super::lifecycle::{impl_entity, Lifecycle};
use super::person::Person;
use super::role::Role;
use super::user::User;

/// Staff member: one person, one role and one login account.
#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    lifecycle: Lifecycle,
    person: Person,
    role: Role,
    user: User,
    admission_date: Option<NaiveDate>,
    termination_date: Option<NaiveDate>,
}

impl_entity!(Employee, "Employee");

/// Informational employment dates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmploymentDates {
    pub admission_date: Option<NaiveDate>,
    pub termination_date: Option<NaiveDate>,
}

impl Employee {
    pub fn new(person: Person, role: Role, user: User, dates: EmploymentDates) -> Self {
        Self {
            lifecycle: Lifecycle::new(),
            person,
            role,
            user,
            admission_date: dates.admission_date,
            termination_date: dates.termination_date,
        }
    }

    pub fn restore(
        lifecycle: Lifecycle,
        person: Person,
        role: Role,
        user: User,
        dates: EmploymentDates,
    ) -> Self {
        Self {
            lifecycle,
            person,
            role,
            user,
            admission_date: dates.admission_date,
            termination_date: dates.termination_date,
        }
    }

    /// Same employee record pointing at new references.
    pub fn reassign(self, person: Person, role: Role, user: User, dates: EmploymentDates) -> Self {
        let mut lifecycle = self.lifecycle;
        lifecycle.touch();
        Self::restore(lifecycle, person, role, user, dates)
    }

    pub fn person(&self) -> &Person {
        &self.person
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn dates(&self) -> EmploymentDates {
        EmploymentDates {
            admission_date: self.admission_date,
            termination_date: self.termination_date,
        }
    }
}
