//! Port for organization persistence and admin-role reads.

use async_trait::async_trait;

use crate::domain::{Organization, OrganizationId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by organization repository adapters.
    pub enum OrganizationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "organization repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "organization repository query failed: {message}",
    }
}

/// Port for the organization tree and its admin assignments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    /// Fetch an organization by identifier.
    async fn find_by_id(
        &self,
        id: &OrganizationId,
    ) -> Result<Option<Organization>, OrganizationRepositoryError>;

    /// Insert or update an organization.
    async fn save(&self, organization: &Organization)
    -> Result<(), OrganizationRepositoryError>;

    /// Direct children of `id` (non-archived).
    async fn children_of(
        &self,
        id: &OrganizationId,
    ) -> Result<Vec<OrganizationId>, OrganizationRepositoryError>;

    /// Whether `user_id` holds the admin role on `org_id`.
    async fn is_admin(
        &self,
        org_id: &OrganizationId,
        user_id: &UserId,
    ) -> Result<bool, OrganizationRepositoryError>;

    /// Grant the admin role. Granting twice is not an error.
    async fn grant_admin(
        &self,
        org_id: &OrganizationId,
        user_id: &UserId,
    ) -> Result<(), OrganizationRepositoryError>;

    /// Organizations on which `user_id` holds the admin role.
    async fn administered_by(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<OrganizationId>, OrganizationRepositoryError>;
}

/// Fixture implementation for tests that do not touch the organization tree.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureOrganizationRepository;

#[async_trait]
impl OrganizationRepository for FixtureOrganizationRepository {
    async fn find_by_id(
        &self,
        _id: &OrganizationId,
    ) -> Result<Option<Organization>, OrganizationRepositoryError> {
        Ok(None)
    }

    async fn save(
        &self,
        _organization: &Organization,
    ) -> Result<(), OrganizationRepositoryError> {
        Ok(())
    }

    async fn children_of(
        &self,
        _id: &OrganizationId,
    ) -> Result<Vec<OrganizationId>, OrganizationRepositoryError> {
        Ok(Vec::new())
    }

    async fn is_admin(
        &self,
        _org_id: &OrganizationId,
        _user_id: &UserId,
    ) -> Result<bool, OrganizationRepositoryError> {
        Ok(false)
    }

    async fn grant_admin(
        &self,
        _org_id: &OrganizationId,
        _user_id: &UserId,
    ) -> Result<(), OrganizationRepositoryError> {
        Ok(())
    }

    async fn administered_by(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<OrganizationId>, OrganizationRepositoryError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_denies_admin() {
        let repo = FixtureOrganizationRepository;
        let is_admin = repo
            .is_admin(&OrganizationId::random(), &UserId::random())
            .await
            .expect("fixture check succeeds");
        assert!(!is_admin);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_children_are_empty() {
        let repo = FixtureOrganizationRepository;
        let children = repo
            .children_of(&OrganizationId::random())
            .await
            .expect("fixture list succeeds");
        assert!(children.is_empty());
    }
}
