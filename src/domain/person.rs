//! Person domain entity.

use chrono::NaiveDate;
use uuid::Uuid;
use validator::ValidateEmail;

use super::cpf::Cpf;
use super::lifecycle::{impl_entity, Lifecycle};
use crate::config::{
    ANONYMOUS_NAME_PREFIX, MAX_EMAIL_LENGTH, MAX_PERSON_NAME_LENGTH, MIN_PERSON_NAME_LENGTH,
};
use crate::errors::{AppError, AppResult};

/// Natural person behind a customer or employee record.
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    lifecycle: Lifecycle,
    name: String,
    cpf: Option<Cpf>,
    email: Option<String>,
    birth_date: Option<NaiveDate>,
}

impl_entity!(Person, "Person");

/// Mutable person fields, as submitted by callers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonData {
    pub name: String,
    pub cpf: Option<String>,
    pub email: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

/// Validated field values ready to be placed into an entity
struct PersonFields {
    name: String,
    cpf: Option<Cpf>,
    email: Option<String>,
    birth_date: Option<NaiveDate>,
}

impl PersonData {
    fn validate(self) -> AppResult<PersonFields> {
        let name = self.name.trim().to_string();
        let length = name.chars().count() as u64;
        if !(MIN_PERSON_NAME_LENGTH..=MAX_PERSON_NAME_LENGTH).contains(&length) {
            return Err(AppError::invalid_field(
                "name",
                format!(
                    "Name must be between {} and {} characters",
                    MIN_PERSON_NAME_LENGTH, MAX_PERSON_NAME_LENGTH
                ),
            ));
        }

        let cpf = self.cpf.as_deref().map(Cpf::parse).transpose()?;

        let email = self.email.map(|e| e.trim().to_string());
        if let Some(email) = &email {
            if email.len() as u64 > MAX_EMAIL_LENGTH || !email.validate_email() {
                return Err(AppError::invalid_field("email", "Invalid email format"));
            }
        }

        Ok(PersonFields {
            name,
            cpf,
            email,
            birth_date: self.birth_date,
        })
    }
}

impl Person {
    /// Create a new active person from validated data.
    pub fn new(data: PersonData) -> AppResult<Self> {
        let fields = data.validate()?;
        Ok(Self::assemble(Lifecycle::new(), fields))
    }

    /// Placeholder person minted by anonymous logins.
    pub fn anonymous() -> Self {
        Self {
            lifecycle: Lifecycle::new(),
            name: format!("{}{}", ANONYMOUS_NAME_PREFIX, Uuid::new_v4().simple()),
            cpf: None,
            email: None,
            birth_date: None,
        }
    }

    /// Rebuild a person read back from storage.
    pub fn restore(
        lifecycle: Lifecycle,
        name: String,
        cpf: Option<String>,
        email: Option<String>,
        birth_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            lifecycle,
            name,
            cpf: cpf.map(Cpf::from_stored),
            email,
            birth_date,
        }
    }

    /// New version of this person carrying `data`, same identity.
    pub fn revise(self, data: PersonData) -> AppResult<Self> {
        let fields = data.validate()?;
        let mut lifecycle = self.lifecycle;
        lifecycle.touch();
        Ok(Self::assemble(lifecycle, fields))
    }

    fn assemble(lifecycle: Lifecycle, fields: PersonFields) -> Self {
        Self {
            lifecycle,
            name: fields.name,
            cpf: fields.cpf,
            email: fields.email,
            birth_date: fields.birth_date,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cpf(&self) -> Option<&str> {
        self.cpf.as_ref().map(Cpf::as_str)
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn birth_date(&self) -> Option<NaiveDate> {
        self.birth_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Entity;

    fn data() -> PersonData {
        PersonData {
            name: "Maria Silva".to_string(),
            cpf: Some("036.199.660-87".to_string()),
            email: Some("maria@example.com".to_string()),
            birth_date: NaiveDate::from_ymd_opt(1990, 5, 17),
        }
    }

    #[test]
    fn test_new_person_normalizes_cpf() {
        let person = Person::new(data()).unwrap();
        assert_eq!(person.cpf(), Some("03619966087"));
        assert_eq!(person.email(), Some("maria@example.com"));
        assert!(!person.is_deleted());
    }

    #[test]
    fn test_name_length_is_checked() {
        let short = PersonData {
            name: "Al".to_string(),
            ..data()
        };
        assert!(Person::new(short).is_err());

        let long = PersonData {
            name: "a".repeat(201),
            ..data()
        };
        assert!(Person::new(long).is_err());
    }

    #[test]
    fn test_invalid_email_rejected() {
        let bad = PersonData {
            email: Some("not-an-email".to_string()),
            ..data()
        };
        assert!(Person::new(bad).is_err());
    }

    #[test]
    fn test_invalid_cpf_rejected() {
        let bad = PersonData {
            cpf: Some("03619966088".to_string()),
            ..data()
        };
        assert!(Person::new(bad).is_err());
    }

    #[test]
    fn test_revise_keeps_identity() {
        let person = Person::new(data()).unwrap();
        let id = person.id();
        let created_at = person.lifecycle().created_at();

        let revised = person
            .revise(PersonData {
                name: "Maria Souza".to_string(),
                ..data()
            })
            .unwrap();

        assert_eq!(revised.id(), id);
        assert_eq!(revised.lifecycle().created_at(), created_at);
        assert_eq!(revised.name(), "Maria Souza");
    }

    #[test]
    fn test_anonymous_person() {
        let first = Person::anonymous();
        let second = Person::anonymous();

        assert!(first.name().starts_with("Anonymous User - "));
        assert_ne!(first.name(), second.name());
        assert!(first.cpf().is_none());
        assert!(first.email().is_none());
    }
}
