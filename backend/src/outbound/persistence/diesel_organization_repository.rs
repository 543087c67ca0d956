//! PostgreSQL-backed `OrganizationRepository` implementation using Diesel.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{OrganizationRepository, OrganizationRepositoryError};
use crate::domain::{Organization, OrganizationId, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewOrganizationAdminRow, OrganizationRow, OrganizationUpsert};
use super::pool::DbPool;
use super::schema::{organization_admins, organizations};

/// Diesel-backed implementation of the `OrganizationRepository` port.
#[derive(Clone)]
pub struct DieselOrganizationRepository {
    pool: DbPool,
}

impl DieselOrganizationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> OrganizationRepositoryError {
    map_diesel_error(
        error,
        OrganizationRepositoryError::query,
        OrganizationRepositoryError::connection,
    )
}

fn row_to_organization(row: OrganizationRow) -> Organization {
    Organization::from_parts(
        OrganizationId::from_uuid(row.id),
        row.name,
        row.description,
        row.parent_id.map(OrganizationId::from_uuid),
        UserId::from_uuid(row.created_by),
        row.created_at,
        row.archived_at,
    )
}

fn organization_to_upsert(organization: &Organization) -> OrganizationUpsert<'_> {
    OrganizationUpsert {
        id: *organization.id().as_uuid(),
        name: organization.name(),
        description: organization.description(),
        parent_id: organization.parent_id().map(|id| *id.as_uuid()),
        created_by: *organization.created_by().as_uuid(),
        created_at: organization.created_at(),
        archived_at: organization.archived_at(),
    }
}

#[async_trait]
impl OrganizationRepository for DieselOrganizationRepository {
    async fn find_by_id(
        &self,
        id: &OrganizationId,
    ) -> Result<Option<Organization>, OrganizationRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, OrganizationRepositoryError::connection))?;

        let row: Option<OrganizationRow> = organizations::table
            .filter(organizations::id.eq(id.as_uuid()))
            .select(OrganizationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;

        Ok(row.map(row_to_organization))
    }

    async fn save(
        &self,
        organization: &Organization,
    ) -> Result<(), OrganizationRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, OrganizationRepositoryError::connection))?;

        let row = organization_to_upsert(organization);

        diesel::insert_into(organizations::table)
            .values(&row)
            .on_conflict(organizations::id)
            .do_update()
            .set(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_error)
    }

    async fn children_of(
        &self,
        id: &OrganizationId,
    ) -> Result<Vec<OrganizationId>, OrganizationRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, OrganizationRepositoryError::connection))?;

        let ids: Vec<uuid::Uuid> = organizations::table
            .filter(organizations::parent_id.eq(id.as_uuid()))
            .filter(organizations::archived_at.is_null())
            .select(organizations::id)
            .load(&mut conn)
            .await
            .map_err(map_error)?;

        Ok(ids.into_iter().map(OrganizationId::from_uuid).collect())
    }

    async fn is_admin(
        &self,
        org_id: &OrganizationId,
        user_id: &UserId,
    ) -> Result<bool, OrganizationRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, OrganizationRepositoryError::connection))?;

        let count: i64 = organization_admins::table
            .filter(organization_admins::organization_id.eq(org_id.as_uuid()))
            .filter(organization_admins::user_id.eq(user_id.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_error)?;

        Ok(count > 0)
    }

    async fn grant_admin(
        &self,
        org_id: &OrganizationId,
        user_id: &UserId,
    ) -> Result<(), OrganizationRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, OrganizationRepositoryError::connection))?;

        let row = NewOrganizationAdminRow {
            organization_id: *org_id.as_uuid(),
            user_id: *user_id.as_uuid(),
            granted_at: Utc::now(),
        };

        // Re-granting is a no-op rather than an error.
        diesel::insert_into(organization_admins::table)
            .values(&row)
            .on_conflict((
                organization_admins::organization_id,
                organization_admins::user_id,
            ))
            .do_nothing()
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_error)
    }

    async fn administered_by(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<OrganizationId>, OrganizationRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, OrganizationRepositoryError::connection))?;

        let ids: Vec<uuid::Uuid> = organization_admins::table
            .filter(organization_admins::user_id.eq(user_id.as_uuid()))
            .select(organization_admins::organization_id)
            .load(&mut conn)
            .await
            .map_err(map_error)?;

        Ok(ids.into_iter().map(OrganizationId::from_uuid).collect())
    }
}
