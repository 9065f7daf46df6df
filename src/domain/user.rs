//! User domain entity.

use super::lifecycle::{impl_entity, Lifecycle};
use super::password::Password;
use crate::config::{MAX_USER_NAME_LENGTH, MIN_USER_NAME_LENGTH};
use crate::errors::{AppError, AppResult};

/// Login account. `name` doubles as the employee username.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    lifecycle: Lifecycle,
    name: String,
    password: Password,
}

impl_entity!(User, "User");

/// User fields as submitted by callers
#[derive(Debug, Clone, PartialEq)]
pub struct UserData {
    pub name: String,
    pub password: String,
}

fn validate_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    let length = name.chars().count() as u64;
    if !(MIN_USER_NAME_LENGTH..=MAX_USER_NAME_LENGTH).contains(&length) {
        return Err(AppError::invalid_field(
            "name",
            format!(
                "Name must be between {} and {} characters",
                MIN_USER_NAME_LENGTH, MAX_USER_NAME_LENGTH
            ),
        ));
    }
    Ok(name.to_string())
}

impl User {
    /// Create a new active user, hashing the password.
    pub fn new(data: UserData) -> AppResult<Self> {
        Ok(Self {
            lifecycle: Lifecycle::new(),
            name: validate_name(&data.name)?,
            password: Password::new(&data.password)?,
        })
    }

    /// Rebuild a user read back from storage.
    pub fn restore(lifecycle: Lifecycle, name: String, password_hash: String) -> Self {
        Self {
            lifecycle,
            name,
            password: Password::from_hash(password_hash),
        }
    }

    /// New version of this user carrying `data`, same identity.
    pub fn revise(self, data: UserData) -> AppResult<Self> {
        let name = validate_name(&data.name)?;
        let mut user = Self { name, ..self };
        user.set_password(&data.password)?;
        Ok(user)
    }

    /// Replace the stored hash with a hash of `plain_text`.
    pub fn set_password(&mut self, plain_text: &str) -> AppResult<()> {
        self.password = Password::new(plain_text)?;
        self.lifecycle.touch();
        Ok(())
    }

    pub fn verify_password(&self, plain_text: &str) -> bool {
        self.password.verify(plain_text)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hash for persistence; the plain text is never retained.
    pub fn password_hash(&self) -> &str {
        self.password.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Entity;

    fn data() -> UserData {
        UserData {
            name: "jdoe".to_string(),
            password: "s3cret-pass".to_string(),
        }
    }

    #[test]
    fn test_new_user_hashes_password() {
        let user = User::new(data()).unwrap();
        assert_ne!(user.password_hash(), "s3cret-pass");
        assert!(user.verify_password("s3cret-pass"));
        assert!(!user.verify_password("other-pass"));
    }

    #[test]
    fn test_name_bounds() {
        let short = UserData {
            name: "jd".to_string(),
            ..data()
        };
        assert!(User::new(short).is_err());

        let long = UserData {
            name: "j".repeat(101),
            ..data()
        };
        assert!(User::new(long).is_err());
    }

    #[test]
    fn test_revise_rehashes_password() {
        let user = User::new(data()).unwrap();
        let id = user.id();

        let revised = user
            .revise(UserData {
                name: "jdoe2".to_string(),
                password: "another-pass".to_string(),
            })
            .unwrap();

        assert_eq!(revised.id(), id);
        assert_eq!(revised.name(), "jdoe2");
        assert!(revised.verify_password("another-pass"));
        assert!(!revised.verify_password("s3cret-pass"));
    }

    #[test]
    fn test_set_password_rejects_short_password() {
        let mut user = User::new(data()).unwrap();
        assert!(user.set_password("short").is_err());
        assert!(user.verify_password("s3cret-pass"));
    }
}
