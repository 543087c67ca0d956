//! Admin-role authorization shared by the governance services.

use crate::domain::ports::{
    OrganizationRepository, OrganizationRepositoryError, UserPersistenceError, UserRepository,
};
use crate::domain::{Error, OrganizationId, UserId};

fn map_org_error(error: OrganizationRepositoryError) -> Error {
    match error {
        OrganizationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("organization repository unavailable: {message}"))
        }
        OrganizationRepositoryError::Query { message } => {
            Error::internal(format!("organization repository error: {message}"))
        }
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } | UserPersistenceError::DuplicatePhone { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

/// Require `actor` to administer `org_id` or hold the superadmin flag.
pub(crate) async fn ensure_org_admin(
    orgs: &impl OrganizationRepository,
    users: &impl UserRepository,
    org_id: &OrganizationId,
    actor: &UserId,
) -> Result<(), Error> {
    if orgs.is_admin(org_id, actor).await.map_err(map_org_error)? {
        return Ok(());
    }

    let superadmin = users
        .find_by_id(actor)
        .await
        .map_err(map_user_error)?
        .is_some_and(|user| user.is_superadmin());
    if superadmin {
        return Ok(());
    }

    Err(Error::forbidden("not an admin of this organization"))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::Utc;

    use super::*;
    use crate::domain::ports::{MockOrganizationRepository, MockUserRepository};
    use crate::domain::{ErrorCode, Language, PasswordHash, PhoneNumber, User};

    fn superadmin() -> User {
        User::from_parts(
            UserId::random(),
            "Root".to_owned(),
            None,
            PhoneNumber::new("+14155550000").expect("valid phone"),
            PasswordHash::new("hashed"),
            Language::En,
            true,
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn direct_admin_passes_without_a_user_lookup() {
        let mut orgs = MockOrganizationRepository::new();
        orgs.expect_is_admin().times(1).return_once(|_, _| Ok(true));
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().times(0);

        ensure_org_admin(&orgs, &users, &OrganizationId::random(), &UserId::random())
            .await
            .expect("admin passes");
    }

    #[tokio::test]
    async fn superadmin_passes_everywhere() {
        let mut orgs = MockOrganizationRepository::new();
        orgs.expect_is_admin().times(1).return_once(|_, _| Ok(false));
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .times(1)
            .return_once(|_| Ok(Some(superadmin())));

        ensure_org_admin(&orgs, &users, &OrganizationId::random(), &UserId::random())
            .await
            .expect("superadmin passes");
    }

    #[tokio::test]
    async fn everyone_else_is_forbidden() {
        let mut orgs = MockOrganizationRepository::new();
        orgs.expect_is_admin().times(1).return_once(|_, _| Ok(false));
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().times(1).return_once(|_| Ok(None));

        let err = ensure_org_admin(&orgs, &users, &OrganizationId::random(), &UserId::random())
            .await
            .expect_err("plain users are rejected");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }
}
