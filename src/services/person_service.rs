//! Person service - Person CRUD use cases and the person upsert shared by
//! customer and employee sign-up.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::removal::{plan_removal, Removal};
use crate::domain::{Cpf, DeletePolicy, Entity, Person, PersonData};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{PersonRepository, UnitOfWork};

/// Person service trait for dependency injection.
#[async_trait]
pub trait PersonService: Send + Sync {
    /// Create a person, reactivating a soft-deleted one with the same CPF
    async fn create_person(&self, data: PersonData) -> AppResult<Person>;

    async fn get_person(&self, id: Uuid) -> AppResult<Person>;

    async fn get_person_by_cpf(&self, cpf: &str) -> AppResult<Person>;

    async fn list_persons(&self, include_deleted: bool) -> AppResult<Vec<Person>>;

    async fn update_person(&self, id: Uuid, data: PersonData) -> AppResult<Person>;

    async fn delete_person(&self, id: Uuid) -> AppResult<()>;
}

/// Fail with `Conflict(entity)` when `email` already belongs to a person
/// other than `owner`.
async fn ensure_email_free(
    persons: &dyn PersonRepository,
    owner: Option<&Person>,
    email: Option<&str>,
    entity: &str,
) -> AppResult<()> {
    let Some(email) = email.map(str::trim) else {
        return Ok(());
    };
    if owner.and_then(Person::email) == Some(email) {
        return Ok(());
    }
    if persons.exists_by_email(email).await? {
        return Err(AppError::conflict(entity));
    }
    Ok(())
}

/// Person holding the CPF in `data`, in any formatting.
async fn find_by_submitted_cpf(
    persons: &dyn PersonRepository,
    data: &PersonData,
) -> AppResult<Option<Person>> {
    match data.cpf.as_deref() {
        Some(cpf) => persons.find_by_cpf(Cpf::parse(cpf)?.as_str()).await,
        None => Ok(None),
    }
}

/// Find the person by CPF and refresh it from `data`, or create it.
///
/// A soft-deleted match is reactivated. An email held by someone else is
/// reported as a duplicate `entity`.
pub(crate) async fn upsert_person(
    persons: &dyn PersonRepository,
    data: PersonData,
    entity: &str,
) -> AppResult<Person> {
    let found = find_by_submitted_cpf(persons, &data).await?;

    ensure_email_free(persons, found.as_ref(), data.email.as_deref(), entity).await?;

    match found {
        Some(existing) => {
            let mut person = existing.revise(data)?;
            if person.is_deleted() {
                person.reactivate();
            }
            persons.update(&person).await
        }
        None => persons.create(&Person::new(data)?).await,
    }
}

/// Concrete implementation of PersonService using Unit of Work.
pub struct PersonManager<U: UnitOfWork> {
    uow: Arc<U>,
    policy: DeletePolicy,
}

impl<U: UnitOfWork> PersonManager<U> {
    pub fn new(uow: Arc<U>, policy: DeletePolicy) -> Self {
        Self { uow, policy }
    }
}

#[async_trait]
impl<U: UnitOfWork> PersonService for PersonManager<U> {
    async fn create_person(&self, data: PersonData) -> AppResult<Person> {
        let persons = self.uow.persons();
        let found = find_by_submitted_cpf(persons.as_ref(), &data).await?;

        match found {
            Some(existing) if !existing.is_deleted() => Err(AppError::conflict(Person::NAME)),
            Some(existing) => {
                ensure_email_free(persons.as_ref(), Some(&existing), data.email.as_deref(), Person::NAME)
                    .await?;
                let mut person = existing.revise(data)?;
                person.reactivate();
                let person = persons.update(&person).await?;
                tracing::info!(id = %person.id(), "Person reactivated");
                Ok(person)
            }
            None => {
                ensure_email_free(persons.as_ref(), None, data.email.as_deref(), Person::NAME).await?;
                let person = persons.create(&Person::new(data)?).await?;
                tracing::info!(id = %person.id(), "Person created");
                Ok(person)
            }
        }
    }

    async fn get_person(&self, id: Uuid) -> AppResult<Person> {
        self.uow
            .persons()
            .find_by_id(id)
            .await?
            .ok_or_not_found(Person::NAME)
    }

    async fn get_person_by_cpf(&self, cpf: &str) -> AppResult<Person> {
        self.uow
            .persons()
            .find_by_cpf(cpf)
            .await?
            .ok_or_not_found(Person::NAME)
    }

    async fn list_persons(&self, include_deleted: bool) -> AppResult<Vec<Person>> {
        self.uow.persons().list(include_deleted).await
    }

    async fn update_person(&self, id: Uuid, data: PersonData) -> AppResult<Person> {
        let persons = self.uow.persons();
        let current = persons
            .find_by_id(id)
            .await?
            .filter(|person| !person.is_deleted())
            .ok_or_not_found(Person::NAME)?;

        if let Some(cpf) = data.cpf.as_deref() {
            let cpf = Cpf::parse(cpf)?;
            if let Some(other) = persons.find_by_cpf(cpf.as_str()).await? {
                if other.id() != id {
                    return Err(AppError::conflict(Person::NAME));
                }
            }
        }
        ensure_email_free(persons.as_ref(), Some(&current), data.email.as_deref(), Person::NAME)
            .await?;

        persons.update(&current.revise(data)?).await
    }

    async fn delete_person(&self, id: Uuid) -> AppResult<()> {
        let persons = self.uow.persons();
        match plan_removal(self.policy, persons.find_by_id(id).await?)? {
            Removal::Soft(person) => {
                persons.update(&person).await?;
            }
            Removal::Hard(id) => persons.delete(id).await?,
        }
        tracing::info!(id = %id, policy = %self.policy, "Person deleted");
        Ok(())
    }
}
