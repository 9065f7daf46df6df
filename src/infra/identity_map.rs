//! Per-session identity map.
//!
//! Repositories consult the map before rehydrating a row so that one unit of
//! work never holds two diverging copies of the same entity. A map lives
//! exactly as long as its [`Session`](super::Session) and is cleared on
//! commit or rollback.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use crate::domain::Entity;

type Key = (TypeId, Uuid);

/// Cache of rehydrated entities keyed by (entity type, id).
#[derive(Default)]
pub struct IdentityMap {
    entries: Mutex<HashMap<Key, Box<dyn Any + Send + Sync>>>,
}

impl IdentityMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<Key, Box<dyn Any + Send + Sync>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn key<T: Entity>(id: Uuid) -> Key {
        (TypeId::of::<T>(), id)
    }

    /// Entity already seen in this session, if any.
    pub fn resolve<T: Entity>(&self, id: Uuid) -> Option<T> {
        self.entries()
            .get(&Self::key::<T>(id))
            .and_then(|entry| entry.downcast_ref::<T>())
            .cloned()
    }

    /// Record the current state of `entity`, replacing any previous copy.
    pub fn register<T: Entity>(&self, entity: &T) {
        self.entries()
            .insert(Self::key::<T>(entity.id()), Box::new(entity.clone()));
    }

    /// Return the cached copy, or register and return `fresh`.
    pub fn resolve_or_register<T: Entity>(&self, fresh: T) -> T {
        let mut entries = self.entries();
        let slot = entries
            .entry(Self::key::<T>(fresh.id()))
            .or_insert_with(|| Box::new(fresh.clone()));
        slot.downcast_ref::<T>().cloned().unwrap_or(fresh)
    }

    pub fn evict<T: Entity>(&self, id: Uuid) {
        self.entries().remove(&Self::key::<T>(id));
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Person, PersonData, Role, RoleData};

    fn person(name: &str) -> Person {
        Person::new(PersonData {
            name: name.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_resolve_returns_registered_copy() {
        let map = IdentityMap::new();
        let ana = person("Ana Souza");
        map.register(&ana);

        let cached: Person = map.resolve(ana.id()).unwrap();
        assert_eq!(cached, ana);
    }

    #[test]
    fn test_first_registration_wins() {
        let map = IdentityMap::new();
        let original = person("Ana Souza");
        let id = original.id();
        map.register(&original);

        let reread = Person::restore(
            original.lifecycle().clone(),
            "Stale Name".to_string(),
            None,
            None,
            None,
        );
        let resolved = map.resolve_or_register(reread);
        assert_eq!(resolved.name(), "Ana Souza");
        assert_eq!(resolved.id(), id);
    }

    #[test]
    fn test_keys_are_scoped_by_type() {
        let map = IdentityMap::new();
        let ana = person("Ana Souza");
        map.register(&ana);

        assert!(map.resolve::<Role>(ana.id()).is_none());

        let role = Role::new(RoleData {
            name: "employee".to_string(),
            description: "store employee".to_string(),
        })
        .unwrap();
        map.register(&role);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_evict_and_clear() {
        let map = IdentityMap::new();
        let ana = person("Ana Souza");
        let bia = person("Bia Lima");
        map.register(&ana);
        map.register(&bia);

        map.evict::<Person>(ana.id());
        assert!(map.resolve::<Person>(ana.id()).is_none());
        assert!(map.resolve::<Person>(bia.id()).is_some());

        map.clear();
        assert!(map.is_empty());
    }
}
