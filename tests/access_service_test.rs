//! Permission, profile, role, user and link service tests.

mod common;

use mockall::predicate::eq;
use uuid::Uuid;

use identity_service::domain::{
    DeletePolicy, Entity, PermissionData, ProfileData, ProfilePermission, RoleData, UserData,
};
use identity_service::errors::AppError;
use identity_service::services::{
    PermissionManager, PermissionService, ProfileManager, ProfilePermissionManager,
    ProfilePermissionService, ProfileService, RoleManager, RoleService, UserManager, UserService,
};

use common::*;

#[tokio::test]
async fn test_create_permission_rejects_active_duplicate() {
    let existing = permission("can_view_orders");

    let mut repos = Repos::default();
    repos
        .permissions
        .expect_find_by_name()
        .withf(|name| name == "can_view_orders")
        .returning(move |_| Ok(Some(existing.clone())));
    repos.permissions.expect_create().never();

    let service = PermissionManager::new(TestUnitOfWork::new(repos), DeletePolicy::Soft);
    let result = service
        .create_permission(PermissionData {
            name: "  can_view_orders ".to_string(),
            description: "View orders".to_string(),
        })
        .await;

    let error = result.unwrap_err();
    assert!(matches!(&error, AppError::Conflict(entity) if entity == "Permission"));
    assert_eq!(error.to_string(), "Permission already exists.");
}

#[tokio::test]
async fn test_create_profile_reactivates_soft_deleted_match() {
    let mut deleted = profile("auditor", &["can_view_customers"]);
    deleted.soft_delete().unwrap();
    let id = deleted.id();

    let mut repos = Repos::default();
    repos
        .profiles
        .expect_find_by_name()
        .returning(move |_| Ok(Some(deleted.clone())));
    repos
        .profiles
        .expect_update()
        .withf(move |profile| profile.id() == id && !profile.is_deleted())
        .times(1)
        .returning(|profile| Ok(profile.clone()));
    repos.profiles.expect_create().never();

    let service = ProfileManager::new(TestUnitOfWork::new(repos), DeletePolicy::Soft);
    let profile = service
        .create_profile(ProfileData {
            name: "auditor".to_string(),
            description: "Read-only access".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(profile.id(), id);
    assert_eq!(profile.description(), "Read-only access");
    // Linked permissions survive the reactivation
    assert_eq!(profile.permission_names(), vec!["can_view_customers"]);
}

#[tokio::test]
async fn test_create_role_rejects_blank_description() {
    let mut repos = Repos::default();
    repos.roles.expect_find_by_name().returning(|_| Ok(None));
    repos.roles.expect_create().never();

    let service = RoleManager::new(TestUnitOfWork::new(repos), DeletePolicy::Soft);
    let result = service
        .create_role(RoleData {
            name: "cashier".to_string(),
            description: "   ".to_string(),
        })
        .await;

    assert!(matches!(result, Err(AppError::Validation { details, .. }) if details.contains_key("description")));
}

#[tokio::test]
async fn test_soft_delete_twice_is_not_found() {
    let mut deleted = role("cashier");
    deleted.soft_delete().unwrap();
    let id = deleted.id();

    let mut repos = Repos::default();
    repos
        .roles
        .expect_find_by_id()
        .with(eq(id))
        .returning(move |_| Ok(Some(deleted.clone())));
    repos.roles.expect_update().never();

    let service = RoleManager::new(TestUnitOfWork::new(repos), DeletePolicy::Soft);
    let result = service.delete_role(id).await;

    assert!(matches!(result, Err(AppError::NotFound(entity)) if entity == "Role"));
}

#[tokio::test]
async fn test_delete_follows_policy() {
    let active = role("cashier");
    let id = active.id();

    let mut repos = Repos::default();
    let found = active.clone();
    repos
        .roles
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    repos
        .roles
        .expect_update()
        .withf(|role| role.is_deleted())
        .times(1)
        .returning(|role| Ok(role.clone()));
    RoleManager::new(TestUnitOfWork::new(repos), DeletePolicy::Soft)
        .delete_role(id)
        .await
        .unwrap();

    let mut repos = Repos::default();
    repos
        .roles
        .expect_find_by_id()
        .returning(move |_| Ok(Some(active.clone())));
    repos
        .roles
        .expect_delete()
        .with(eq(id))
        .times(1)
        .returning(|_| Ok(()));
    repos.roles.expect_update().never();
    RoleManager::new(TestUnitOfWork::new(repos), DeletePolicy::Hard)
        .delete_role(id)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_update_user_rejects_taken_name_and_rehashes() {
    let current = user("maria.lima");
    let other = user("joao.silva");
    let id = current.id();

    // Renaming onto another user's name
    let mut repos = Repos::default();
    let found = current.clone();
    repos
        .users
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    repos
        .users
        .expect_find_by_name()
        .returning(move |_| Ok(Some(other.clone())));
    repos.users.expect_update().never();

    let result = UserManager::new(TestUnitOfWork::new(repos), DeletePolicy::Soft)
        .update_user(
            id,
            UserData {
                name: "joao.silva".to_string(),
                password: "AnotherPass456".to_string(),
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::Conflict(entity)) if entity == "User"));

    // Keeping its own name and changing the password
    let mut repos = Repos::default();
    let found = current.clone();
    repos
        .users
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    let same = current.clone();
    repos
        .users
        .expect_find_by_name()
        .returning(move |_| Ok(Some(same.clone())));
    repos
        .users
        .expect_update()
        .times(1)
        .returning(|user| Ok(user.clone()));

    let updated = UserManager::new(TestUnitOfWork::new(repos), DeletePolicy::Soft)
        .update_user(
            id,
            UserData {
                name: "maria.lima".to_string(),
                password: "AnotherPass456".to_string(),
            },
        )
        .await
        .unwrap();
    assert!(updated.verify_password("AnotherPass456"));
    assert!(!updated.verify_password(PASSWORD));
}

#[tokio::test]
async fn test_grant_requires_both_ends() {
    let profile = profile("auditor", &[]);
    let (profile_id, permission_id) = (profile.id(), Uuid::new_v4());

    let mut repos = Repos::default();
    repos
        .profiles
        .expect_find_by_id()
        .with(eq(profile_id))
        .returning(move |_| Ok(Some(profile.clone())));
    repos
        .permissions
        .expect_find_by_id()
        .with(eq(permission_id))
        .returning(|_| Ok(None));
    repos.profile_permissions.expect_create().never();

    let result = ProfilePermissionManager::new(TestUnitOfWork::new(repos), DeletePolicy::Soft)
        .create_profile_permission(profile_id, permission_id)
        .await;

    assert!(matches!(result, Err(AppError::NotFound(entity)) if entity == "Permission"));
}

#[tokio::test]
async fn test_grant_checks_the_exact_pair() {
    let profile = profile("auditor", &[]);
    let permission = permission("can_view_orders");
    let (profile_id, permission_id) = (profile.id(), permission.id());
    let existing = ProfilePermission::new(profile.clone(), permission.clone());

    let mut repos = Repos::default();
    repos
        .profiles
        .expect_find_by_id()
        .returning(move |_| Ok(Some(profile.clone())));
    repos
        .permissions
        .expect_find_by_id()
        .returning(move |_| Ok(Some(permission.clone())));
    repos
        .profile_permissions
        .expect_find_by_profile_id_and_permission_id()
        .with(eq(profile_id), eq(permission_id))
        .times(1)
        .returning(move |_, _| Ok(Some(existing.clone())));
    repos.profile_permissions.expect_create().never();

    let result = ProfilePermissionManager::new(TestUnitOfWork::new(repos), DeletePolicy::Soft)
        .create_profile_permission(profile_id, permission_id)
        .await;

    assert!(matches!(result, Err(AppError::Conflict(entity)) if entity == "ProfilePermission"));
}

#[tokio::test]
async fn test_grant_creates_link() {
    let profile = profile("auditor", &[]);
    let permission = permission("can_view_orders");
    let (profile_id, permission_id) = (profile.id(), permission.id());

    let mut repos = Repos::default();
    repos
        .profiles
        .expect_find_by_id()
        .returning(move |_| Ok(Some(profile.clone())));
    repos
        .permissions
        .expect_find_by_id()
        .returning(move |_| Ok(Some(permission.clone())));
    repos
        .profile_permissions
        .expect_find_by_profile_id_and_permission_id()
        .returning(|_, _| Ok(None));
    repos
        .profile_permissions
        .expect_create()
        .times(1)
        .returning(|link| Ok(link.clone()));

    let link = ProfilePermissionManager::new(TestUnitOfWork::new(repos), DeletePolicy::Soft)
        .create_profile_permission(profile_id, permission_id)
        .await
        .unwrap();

    assert_eq!(link.profile().id(), profile_id);
    assert_eq!(link.permission().name(), "can_view_orders");
    assert!(!link.is_deleted());
}
